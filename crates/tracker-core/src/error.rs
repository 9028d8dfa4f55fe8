use thiserror::Error;

/// Errors surfaced by issue tracker backends
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackerError {
    #[error("Authentication failed")]
    Unauthorized,

    #[error("Permission denied: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("TLS error: {0}")]
    Tls(String),

    /// The tracker answered with an `<error>` document
    #[error("Tracker error: {0}")]
    Server(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl TrackerError {
    /// HTTP status code behind the error, if it came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            TrackerError::Unauthorized => Some(401),
            TrackerError::Forbidden(_) => Some(403),
            TrackerError::NotFound(_) | TrackerError::ProjectNotFound(_) => Some(404),
            TrackerError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
