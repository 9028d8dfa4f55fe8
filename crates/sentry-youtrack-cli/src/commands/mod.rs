pub mod config;
pub mod issue;
pub mod tracker;

use anyhow::{anyhow, Result};
use sentry_youtrack::Group;

/// A group known only by its id; the CLI has no group pages
pub fn group(project: &str, id: &str) -> Group {
    Group {
        id: id.to_string(),
        project: project.to_string(),
        title: String::new(),
        description: String::new(),
        url: String::new(),
    }
}

/// Split `NAME=VALUE` on the first `=`
pub fn parse_assignment(raw: &str) -> Result<(&str, &str)> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("Invalid field '{}', expected NAME=VALUE", raw))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(anyhow!("Invalid field '{}', missing name", raw));
    }
    Ok((name, value.trim()))
}
