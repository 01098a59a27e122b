//! Unified error type.

use std::fmt;

/// The error type returned by relay's fallible operations.
///
/// Application-level errors (404, 422, etc.) are written to the response
/// sink by handlers, not returned as `Error`s. This type surfaces
/// infrastructure failures and broken handler chains.
#[derive(Debug)]
pub enum Error {
    /// Binding to a port or accepting a connection failed.
    Io(std::io::Error),
    /// The address given to [`Server::bind`](crate::Server::bind) is not a
    /// valid `host:port`.
    Addr(std::net::AddrParseError),
    /// A handler chain did not reach [`done`](crate::done) within the
    /// given number of steps.
    StepLimit(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Addr(e) => write!(f, "invalid address: {e}"),
            Self::StepLimit(n) => write!(f, "handler chain did not complete within {n} steps"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Addr(e) => Some(e),
            Self::StepLimit(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<std::net::AddrParseError> for Error {
    fn from(e: std::net::AddrParseError) -> Self {
        Self::Addr(e)
    }
}
