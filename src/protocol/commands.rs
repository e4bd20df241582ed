//! Module `command`
//!
//! Defines the FTP command set and the line parser that produces it.

use std::fmt;

/// Represents an FTP command parsed from the client input.
///
/// Arguments are kept verbatim: everything after the first space, or `None`
/// when the line carried no space at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    USER(Option<String>), // Username for login
    PASS(Option<String>), // Password for login
    PWD,
    SYST,
    TYPE(Option<String>), // Transfer type, `I` or `A`
    PORT(Option<String>), // Active mode data endpoint
    LIST(Option<String>), // Optional directory or file path
    RETR(Option<String>), // Retrieve/download file
    CWD(Option<String>),  // Change working directory
    CDUP,
    NOOP,
    QUIT,
    UNKNOWN(String), // Unknown or unsupported verb, kept for logging
}

/// Represents the outcome status of executing a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    Failure(String),
    CloseConnection,
}

/// Parses one newline-stripped line into a [`Command`].
///
/// The verb is case-sensitive and ends at the first space. Returns `None` for
/// an empty line, which the session treats as a disconnect.
pub fn parse_command(raw: &str) -> Option<Command> {
    if raw.is_empty() {
        return None;
    }

    let (verb, arg) = match raw.split_once(' ') {
        Some((verb, arg)) => (verb, Some(arg.to_string())),
        None => (raw, None),
    };

    let command = match verb {
        "USER" => Command::USER(arg),
        "PASS" => Command::PASS(arg),
        "PWD" => Command::PWD,
        "SYST" => Command::SYST,
        "TYPE" => Command::TYPE(arg),
        "PORT" => Command::PORT(arg),
        "LIST" => Command::LIST(arg),
        "RETR" => Command::RETR(arg),
        "CWD" => Command::CWD(arg),
        "CDUP" => Command::CDUP,
        "NOOP" => Command::NOOP,
        "QUIT" => Command::QUIT,
        other => Command::UNKNOWN(other.to_string()),
    };

    Some(command)
}

impl fmt::Display for Command {
    /// Log-safe rendering; the PASS argument is masked.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn with_arg(f: &mut fmt::Formatter<'_>, verb: &str, arg: &Option<String>) -> fmt::Result {
            match arg {
                Some(arg) => write!(f, "{} {}", verb, arg),
                None => write!(f, "{}", verb),
            }
        }

        match self {
            Command::USER(arg) => with_arg(f, "USER", arg),
            Command::PASS(_) => write!(f, "PASS ****"),
            Command::PWD => write!(f, "PWD"),
            Command::SYST => write!(f, "SYST"),
            Command::TYPE(arg) => with_arg(f, "TYPE", arg),
            Command::PORT(arg) => with_arg(f, "PORT", arg),
            Command::LIST(arg) => with_arg(f, "LIST", arg),
            Command::RETR(arg) => with_arg(f, "RETR", arg),
            Command::CWD(arg) => with_arg(f, "CWD", arg),
            Command::CDUP => write!(f, "CDUP"),
            Command::NOOP => write!(f, "NOOP"),
            Command::QUIT => write!(f, "QUIT"),
            Command::UNKNOWN(verb) => write!(f, "{} (unrecognized)", verb),
        }
    }
}
