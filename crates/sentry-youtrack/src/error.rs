use thiserror::Error;
use tracker_core::TrackerError;

/// User-facing configuration failures, one message each
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorKind {
    Client,
    ProjectUnknown,
    ProjectNotFound,
    InvalidSsl,
    InvalidApiKey,
    InvalidProject,
    MissingFields,
    Permissions,
    Required,
}

impl ConfigErrorKind {
    /// Message shown next to the offending field; `subject` fills the project placeholders
    pub fn message(self, subject: &str) -> String {
        match self {
            ConfigErrorKind::Client => "Unable to connect to YouTrack.".to_string(),
            ConfigErrorKind::ProjectUnknown => "Unable to fetch project".to_string(),
            ConfigErrorKind::ProjectNotFound => format!("Project not found: {}", subject),
            ConfigErrorKind::InvalidSsl => "SSL certificate  verification failed.".to_string(),
            ConfigErrorKind::InvalidApiKey => "Invalid username or api_key.".to_string(),
            ConfigErrorKind::InvalidProject => format!("Invalid project: '{}'", subject),
            ConfigErrorKind::MissingFields => "Missing required fields.".to_string(),
            ConfigErrorKind::Permissions => {
                "User doesn't have Low-level Administration permissions.".to_string()
            }
            ConfigErrorKind::Required => "This field is required.".to_string(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("Field '{field}' must be at most {max} characters")]
    TooLong { field: String, max: usize },
}

#[derive(Error, Debug)]
pub enum PluginError {
    /// A configuration problem, carrying the user-facing message
    #[error("{0}")]
    Config(String),

    #[error("YouTrack integration is not configured for project '{0}'")]
    NotConfigured(String),

    #[error(transparent)]
    Tracker(#[from] TrackerError),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error("Option storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, PluginError>;
