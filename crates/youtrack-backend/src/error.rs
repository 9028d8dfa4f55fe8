use thiserror::Error;
use tracker_core::TrackerError;

#[derive(Error, Debug)]
pub enum YouTrackError {
    #[error("HTTP error: {0}")]
    Http(#[source] ureq::Error),

    #[error("Unable to connect: {0}")]
    Connection(#[source] ureq::Error),

    #[error("SSL error: {0}")]
    Tls(#[source] ureq::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Missing element in response: {0}")]
    MissingElement(String),

    #[error("Invalid YouTrack url: {0}")]
    InvalidUrl(String),

    #[error("Authentication failed")]
    Unauthorized,

    #[error("YouTrack error: {0}")]
    Server(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

impl YouTrackError {
    pub fn status(&self) -> Option<u16> {
        match self {
            YouTrackError::Unauthorized => Some(401),
            YouTrackError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Failures that mean "no such resource" rather than a broken request
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<ureq::Error> for YouTrackError {
    fn from(err: ureq::Error) -> Self {
        match &err {
            ureq::Error::StatusCode(code) => match *code {
                401 => YouTrackError::Unauthorized,
                404 => YouTrackError::Api {
                    status: 404,
                    message: "Resource not found".to_string(),
                },
                code => YouTrackError::Api {
                    status: code,
                    message: err.to_string(),
                },
            },
            ureq::Error::Tls(_) => YouTrackError::Tls(err),
            ureq::Error::Io(_)
            | ureq::Error::Timeout(_)
            | ureq::Error::HostNotFound
            | ureq::Error::ConnectionFailed => YouTrackError::Connection(err),
            _ if looks_like_tls(&err) => YouTrackError::Tls(err),
            _ => YouTrackError::Http(err),
        }
    }
}

// rustls/native-tls failures surface as backend specific variants
fn looks_like_tls(err: &ureq::Error) -> bool {
    let text = err.to_string().to_lowercase();
    text.contains("certificate") || text.contains("tls") || text.contains("ssl")
}

pub type Result<T> = std::result::Result<T, YouTrackError>;

impl From<YouTrackError> for TrackerError {
    fn from(err: YouTrackError) -> Self {
        match err {
            YouTrackError::Http(e) => TrackerError::Http(e.to_string()),
            YouTrackError::Connection(e) => TrackerError::Connection(e.to_string()),
            YouTrackError::Tls(e) => TrackerError::Tls(e.to_string()),
            YouTrackError::Parse(e) => TrackerError::Parse(e.to_string()),
            YouTrackError::Xml(e) => TrackerError::Parse(e.to_string()),
            YouTrackError::MissingElement(name) => {
                TrackerError::Parse(format!("missing element {}", name))
            }
            YouTrackError::InvalidUrl(url) => TrackerError::InvalidInput(url),
            YouTrackError::Unauthorized => TrackerError::Unauthorized,
            YouTrackError::Server(message) => TrackerError::Server(message),
            YouTrackError::Api { status: 403, message } => TrackerError::Forbidden(message),
            YouTrackError::Api { status: 404, message } => TrackerError::NotFound(message),
            YouTrackError::Api { status, message } => TrackerError::Api { status, message },
        }
    }
}
