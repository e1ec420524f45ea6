use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failure reported by a file-access capability for one directory or file.
#[derive(Debug, Error)]
pub enum AccessError {
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The host itself broke; nothing after this can be trusted.
    #[error("host fault: {0}")]
    Fault(String),
}

impl AccessError {
    pub fn from_io(path: impl Into<String>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => AccessError::PermissionDenied(path),
            std::io::ErrorKind::NotFound => AccessError::NotFound(path),
            _ => AccessError::Io { path, source },
        }
    }

    /// Whether a walk can skip past this failure and keep going.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, AccessError::Fault(_))
    }

    /// Access to the thing was refused or it is gone.
    pub fn is_denied(&self) -> bool {
        matches!(self, AccessError::PermissionDenied(_) | AccessError::NotFound(_))
    }
}
