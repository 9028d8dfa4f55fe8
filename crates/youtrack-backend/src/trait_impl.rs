//! IssueTracker and Connector implementations for the YouTrack backend

use crate::client::YouTrackClient;
use tracker_core::{
    ClientSettings, Connector, CreateIssue, CustomFieldDetail, CustomFieldRef, IssueSummary,
    IssueTracker, Project, Result, TrackerError, User,
};

impl IssueTracker for YouTrackClient {
    fn get_projects(&self) -> Result<Vec<Project>> {
        self.get_projects().map_err(TrackerError::from)
    }

    fn get_project_name(&self, project_id: &str) -> Result<String> {
        self.get_project_name(project_id).map_err(TrackerError::from)
    }

    fn get_user(&self, login: &str) -> Result<User> {
        self.get_user(login).map_err(TrackerError::from)
    }

    fn get_project_fields_list(&self, project_id: &str) -> Result<Vec<CustomFieldRef>> {
        self.get_project_fields_list(project_id)
            .map_err(TrackerError::from)
    }

    fn get_project_fields(
        &self,
        project_id: &str,
        ignore_fields: &[String],
    ) -> Result<Vec<CustomFieldDetail>> {
        self.get_project_fields(project_id, ignore_fields)
            .map_err(TrackerError::from)
    }

    fn get_priorities(&self) -> Result<Vec<String>> {
        self.get_priorities().map_err(TrackerError::from)
    }

    fn get_issue_types(&self) -> Result<Vec<String>> {
        self.get_issue_types().map_err(TrackerError::from)
    }

    fn get_project_issues(
        &self,
        project_id: &str,
        query: Option<&str>,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<IssueSummary>> {
        self.get_project_issues(project_id, query, offset, limit)
            .map_err(TrackerError::from)
    }

    fn create_issue(&self, issue: &CreateIssue) -> Result<String> {
        self.create_issue(issue).map_err(TrackerError::from)
    }

    fn execute_command(&self, issue_id: &str, command: &str) -> Result<()> {
        self.execute_command(issue_id, command)
            .map_err(TrackerError::from)
    }

    fn add_tags(&self, issue_id: &str, tags: &[String]) -> Result<()> {
        self.add_tags(issue_id, tags).map_err(TrackerError::from)
    }
}

/// Connector that builds [`YouTrackClient`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct YouTrackConnector;

impl Connector for YouTrackConnector {
    fn connect(&self, settings: &ClientSettings) -> Result<Box<dyn IssueTracker>> {
        let client = YouTrackClient::from_settings(settings).map_err(TrackerError::from)?;
        Ok(Box::new(client))
    }
}
