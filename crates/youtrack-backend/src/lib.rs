pub mod bundle;
pub mod client;
mod convert;
pub mod error;
pub mod models;
mod trait_impl;
pub mod xml;

#[cfg(test)]
mod client_tests;

pub use bundle::BundleKind;
pub use client::{YouTrackClient, TOKEN_ENV_VAR};
pub use trait_impl::YouTrackConnector;
pub use error::{Result, YouTrackError};
pub use models::*;

// Re-export tracker-core types for convenience
pub use tracker_core::{ClientSettings, Connector, IssueTracker, TrackerError};
