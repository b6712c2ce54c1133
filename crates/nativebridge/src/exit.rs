use std::fmt;

use nativebridge::exchange::{CollaboratorError, ErrorKind, ExchangeError};

// Exit code constants; a failed session maps to the class of its first error.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Exit status for a session that ended in failure.
pub fn exchange_error(err: &ExchangeError) -> CliError {
    let code = match err {
        ExchangeError::Collaborator(CollaboratorError::Authentication { .. }) => {
            PERMISSION_DENIED
        }
        ExchangeError::Collaborator(CollaboratorError::Timeout(_)) => TIMEOUT,
        other => match other.kind() {
            ErrorKind::MalformedFrame | ErrorKind::PayloadDecode => DATA_INVALID,
            ErrorKind::MissingCredential | ErrorKind::Collaborator => FAILURE,
            ErrorKind::Encoding => INTERNAL,
        },
    };
    CliError::new(code, format!("session failed: {err}"))
}
