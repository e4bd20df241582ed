//! Authentication system
//!
//! Handles credential storage and password validation.

pub mod credentials;
pub mod validator;

pub use credentials::Credentials;
pub use validator::validate_password;
