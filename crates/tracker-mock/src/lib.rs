//! In-memory issue tracker for tests
//!
//! [`MockTracker`] answers every `IssueTracker` call from data configured up
//! front and records the calls it received. [`MockConnector`] hands out
//! trackers that share the same state, so a test can configure responses,
//! let the code under test connect through the `Connector` trait, and then
//! inspect what was sent.

mod client;

pub use client::{Call, MockConnector, MockTracker};
