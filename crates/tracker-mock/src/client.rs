//! Mock client implementing the IssueTracker trait

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracker_core::{
    ClientSettings, Connector, CreateIssue, CustomFieldDetail, CustomFieldRef, IssueSummary,
    IssueTracker, Project, Result, TrackerError, User,
};

/// A call received by the mock, with its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetProjects,
    GetProjectName(String),
    GetUser(String),
    GetProjectFieldsList(String),
    GetProjectFields {
        project_id: String,
        ignore_fields: Vec<String>,
    },
    GetPriorities,
    GetIssueTypes,
    GetProjectIssues {
        project_id: String,
        query: Option<String>,
        offset: usize,
        limit: usize,
    },
    CreateIssue(CreateIssue),
    ExecuteCommand {
        issue_id: String,
        command: String,
    },
}

#[derive(Default)]
struct State {
    projects: Vec<Project>,
    users: HashMap<String, User>,
    fields: HashMap<String, Vec<CustomFieldDetail>>,
    issues: HashMap<String, Vec<IssueSummary>>,
    priorities: Vec<String>,
    issue_types: Vec<String>,
    /// Method name -> error returned instead of data
    failures: HashMap<String, TrackerError>,
    /// Command text -> error
    command_failures: HashMap<String, TrackerError>,
    calls: Vec<Call>,
    created: usize,
}

/// Tracker answering from in-memory data; clones share state
#[derive(Clone, Default)]
pub struct MockTracker {
    state: Arc<Mutex<State>>,
}

impl MockTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        // A panicking test may poison the lock; the data is still usable
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn with_project(self, id: &str, name: &str) -> Self {
        self.state().projects.push(Project {
            id: id.to_string(),
            name: name.to_string(),
        });
        self
    }

    pub fn with_user(self, login: &str) -> Self {
        self.state().users.insert(
            login.to_string(),
            User {
                login: login.to_string(),
                full_name: None,
                email: None,
            },
        );
        self
    }

    pub fn with_fields(self, project_id: &str, fields: Vec<CustomFieldDetail>) -> Self {
        self.state().fields.insert(project_id.to_string(), fields);
        self
    }

    pub fn with_issues(self, project_id: &str, issues: Vec<IssueSummary>) -> Self {
        self.state().issues.insert(project_id.to_string(), issues);
        self
    }

    pub fn with_priorities(self, values: &[&str]) -> Self {
        self.state().priorities = values.iter().map(|v| v.to_string()).collect();
        self
    }

    pub fn with_issue_types(self, values: &[&str]) -> Self {
        self.state().issue_types = values.iter().map(|v| v.to_string()).collect();
        self
    }

    /// Make every call to `method` (trait method name) fail with `error`
    pub fn fail_on(self, method: &str, error: TrackerError) -> Self {
        self.state().failures.insert(method.to_string(), error);
        self
    }

    /// Make `execute_command` fail for exactly this command text
    pub fn fail_command(self, command: &str, error: TrackerError) -> Self {
        self.state()
            .command_failures
            .insert(command.to_string(), error);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    /// Commands executed against `issue_id`, in order
    pub fn commands(&self, issue_id: &str) -> Vec<String> {
        self.state()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::ExecuteCommand {
                    issue_id: id,
                    command,
                } if id == issue_id => Some(command.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn count_calls(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.state().calls.iter().filter(|c| matches(c)).count()
    }

    fn record(&self, method: &str, call: Call) -> Result<MutexGuard<'_, State>> {
        let mut state = self.state();
        state.calls.push(call);
        if let Some(error) = state.failures.get(method).cloned() {
            return Err(error);
        }
        Ok(state)
    }
}

impl IssueTracker for MockTracker {
    fn get_projects(&self) -> Result<Vec<Project>> {
        let state = self.record("get_projects", Call::GetProjects)?;
        Ok(state.projects.clone())
    }

    fn get_project_name(&self, project_id: &str) -> Result<String> {
        let state = self.record(
            "get_project_name",
            Call::GetProjectName(project_id.to_string()),
        )?;
        state
            .projects
            .iter()
            .find(|p| p.id == project_id)
            .map(|p| p.name.clone())
            .ok_or_else(|| TrackerError::NotFound(project_id.to_string()))
    }

    fn get_user(&self, login: &str) -> Result<User> {
        let state = self.record("get_user", Call::GetUser(login.to_string()))?;
        state
            .users
            .get(login)
            .cloned()
            .ok_or_else(|| TrackerError::NotFound(login.to_string()))
    }

    fn get_project_fields_list(&self, project_id: &str) -> Result<Vec<CustomFieldRef>> {
        let state = self.record(
            "get_project_fields_list",
            Call::GetProjectFieldsList(project_id.to_string()),
        )?;
        let fields = state
            .fields
            .get(project_id)
            .ok_or_else(|| TrackerError::NotFound(project_id.to_string()))?;
        Ok(fields
            .iter()
            .map(|f| CustomFieldRef {
                name: f.name.clone(),
                url: format!("/rest/admin/project/{}/customfield/{}", project_id, f.name),
            })
            .collect())
    }

    fn get_project_fields(
        &self,
        project_id: &str,
        ignore_fields: &[String],
    ) -> Result<Vec<CustomFieldDetail>> {
        let state = self.record(
            "get_project_fields",
            Call::GetProjectFields {
                project_id: project_id.to_string(),
                ignore_fields: ignore_fields.to_vec(),
            },
        )?;
        let fields = state
            .fields
            .get(project_id)
            .ok_or_else(|| TrackerError::NotFound(project_id.to_string()))?;
        Ok(fields
            .iter()
            .filter(|f| !ignore_fields.contains(&f.name))
            .cloned()
            .collect())
    }

    fn get_priorities(&self) -> Result<Vec<String>> {
        let state = self.record("get_priorities", Call::GetPriorities)?;
        Ok(state.priorities.clone())
    }

    fn get_issue_types(&self) -> Result<Vec<String>> {
        let state = self.record("get_issue_types", Call::GetIssueTypes)?;
        Ok(state.issue_types.clone())
    }

    fn get_project_issues(
        &self,
        project_id: &str,
        query: Option<&str>,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<IssueSummary>> {
        let state = self.record(
            "get_project_issues",
            Call::GetProjectIssues {
                project_id: project_id.to_string(),
                query: query.map(str::to_string),
                offset,
                limit,
            },
        )?;
        Ok(state
            .issues
            .get(project_id)
            .map(|issues| {
                issues
                    .iter()
                    .filter(|i| query.map_or(true, |q| i.summary.contains(q)))
                    .skip(offset)
                    .take(limit)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn create_issue(&self, issue: &CreateIssue) -> Result<String> {
        let mut state = self.record("create_issue", Call::CreateIssue(issue.clone()))?;
        state.created += 1;
        Ok(format!("{}-{}", issue.project, state.created))
    }

    fn execute_command(&self, issue_id: &str, command: &str) -> Result<()> {
        let state = self.record(
            "execute_command",
            Call::ExecuteCommand {
                issue_id: issue_id.to_string(),
                command: command.to_string(),
            },
        )?;
        match state.command_failures.get(command) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

/// Connector handing out clones of one [`MockTracker`]
#[derive(Clone, Default)]
pub struct MockConnector {
    tracker: MockTracker,
    connect_error: Option<TrackerError>,
    connections: Arc<Mutex<Vec<ClientSettings>>>,
}

impl MockConnector {
    pub fn new(tracker: MockTracker) -> Self {
        Self {
            tracker,
            connect_error: None,
            connections: Arc::default(),
        }
    }

    /// Connector whose every `connect` fails
    pub fn failing(error: TrackerError) -> Self {
        Self {
            connect_error: Some(error),
            ..Self::default()
        }
    }

    pub fn tracker(&self) -> &MockTracker {
        &self.tracker
    }

    /// Settings passed to `connect`, in order
    pub fn connections(&self) -> Vec<ClientSettings> {
        self.connections
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl Connector for MockConnector {
    fn connect(&self, settings: &ClientSettings) -> Result<Box<dyn IssueTracker>> {
        self.connections
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(settings.clone());
        match &self.connect_error {
            Some(error) => Err(error.clone()),
            None => Ok(Box::new(self.tracker.clone())),
        }
    }
}
