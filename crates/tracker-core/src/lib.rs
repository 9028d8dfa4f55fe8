pub mod error;
pub mod models;
pub mod pagination;
pub mod traits;

pub use error::{Result, TrackerError};
pub use models::*;
pub use pagination::{fetch_issue_page, parse_int_or, IssuePage};
pub use traits::{Connector, IssueTracker};
