//! Client management system
//!
//! Handles client connections, per-session state, and session lifecycle.

pub mod handler;
pub mod registry;
pub mod session;
pub mod state;

pub use handler::{handle_client, run_session};
pub use registry::SessionRegistry;
pub use session::SessionContext;
pub use state::{AuthState, Session, SessionSnapshot};
