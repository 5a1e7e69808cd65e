use std::fmt;

#[derive(Debug)]
pub enum Error {
    /// Network-level failure reaching the Heatzy cloud (incl. timeouts).
    Http(reqwest::Error),
    /// Login rejected with a non-200 status.
    Auth { status: u16, message: String },
    /// Non-200 status on a read or control call.
    Vendor { status: u16, message: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Http(e) => write!(f, "HTTP error: {e}"),
            Error::Auth { status, message } => {
                write!(f, "authentication failed: {status} {message}")
            }
            Error::Vendor { status, message } => {
                write!(f, "vendor rejected request: {status} {message}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Http(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
