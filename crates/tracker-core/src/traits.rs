use crate::error::Result;
use crate::models::*;

/// Operations the plugin needs from an issue tracker
///
/// The YouTrack backend implements this over HTTP; tests use an in-memory double.
pub trait IssueTracker: Send + Sync {
    // ========== Read Operations ==========

    /// List all projects visible to the token
    fn get_projects(&self) -> Result<Vec<Project>>;

    /// Display name of a project
    fn get_project_name(&self, project_id: &str) -> Result<String>;

    /// Look up a user by login; fails with 403 when the token lacks admin rights
    fn get_user(&self, login: &str) -> Result<User>;

    /// List custom field references of a project
    fn get_project_fields_list(&self, project_id: &str) -> Result<Vec<CustomFieldRef>>;

    /// Resolve every custom field of a project except the ignored ones
    fn get_project_fields(
        &self,
        project_id: &str,
        ignore_fields: &[String],
    ) -> Result<Vec<CustomFieldDetail>>;

    /// Values of the instance-wide priority bundle
    fn get_priorities(&self) -> Result<Vec<String>>;

    /// Values of the instance-wide issue type bundle
    fn get_issue_types(&self) -> Result<Vec<String>>;

    /// List issues of a project
    ///
    /// * `query` - Optional tracker filter expression
    /// * `offset` - Number of issues to skip
    /// * `limit` - Maximum number of issues to return
    fn get_project_issues(
        &self,
        project_id: &str,
        query: Option<&str>,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<IssueSummary>>;

    // ========== Write Operations ==========

    /// Create an issue and return its readable id
    fn create_issue(&self, issue: &CreateIssue) -> Result<String>;

    /// Apply a free-text command to an issue
    fn execute_command(&self, issue_id: &str, command: &str) -> Result<()>;

    /// Add tags one command at a time; stops at the first failure
    fn add_tags(&self, issue_id: &str, tags: &[String]) -> Result<()> {
        for tag in tags {
            self.execute_command(issue_id, &format!("add tag {}", tag))?;
        }
        Ok(())
    }
}

/// Builds tracker clients from stored connection settings
pub trait Connector: Send + Sync {
    fn connect(&self, settings: &ClientSettings) -> Result<Box<dyn IssueTracker>>;
}
