use serde_json::Error as SerdeError;
use std::{error, fmt, io};

/// Error type for map save/load and other editor failures.
#[derive(Debug)]
pub enum Error {
    /// File I/O error (path unopenable for reading or writing)
    Io(io::Error),
    /// JSON parse or serialize error
    Json(SerdeError),
    /// Structurally valid JSON that does not describe a valid map
    Corrupt(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::Json(err) => write!(f, "Failed to parse map JSON: {}", err),
            Error::Corrupt(msg) => write!(f, "Corrupt map file: {}", msg),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<SerdeError> for Error {
    fn from(err: SerdeError) -> Self {
        Error::Json(err)
    }
}

impl error::Error for Error {}
