//! The plugin façade called by the host.

use tracing::{debug, info};
use tracker_core::pagination::DEFAULT_PAGE_LIMIT;
use tracker_core::{
    fetch_issue_page, parse_int_or, ClientSettings, Connector, CreateIssue, CustomFieldDetail,
    IssuePage, IssueSummary, IssueTracker,
};
use youtrack_backend::YouTrackConnector;

use crate::configuration::{ConfigInput, YouTrackConfiguration};
use crate::error::{ConfigErrorKind, PluginError, Result};
use crate::field_cache::FieldSchemaCache;
use crate::forms::{
    default_field_key, AssignIssueForm, DefaultFieldForm, FormData, InitialData, NewIssueForm,
};
use crate::host::{Group, GroupMetaStore, OptionStore, ProjectOptions};
use crate::settings::PluginSettings;

/// Group metadata key of the linked issue id
pub const ISSUE_ID_KEY: &str = "youtrack:tid";
pub const EXISTING_ISSUE_TITLE: &str = "Assign existing YouTrack issue";

const DEFAULT_PAGE: usize = 1;

/// Actions reachable through `?action=<name>` on a group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginAction {
    AssignIssue,
    ProjectIssues,
    SaveFieldAsDefault,
}

impl PluginAction {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "assign_issue" => Some(PluginAction::AssignIssue),
            "project_issues" => Some(PluginAction::ProjectIssues),
            "save_field_as_default" => Some(PluginAction::SaveFieldAsDefault),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PluginAction::AssignIssue => "assign_issue",
            PluginAction::ProjectIssues => "project_issues",
            PluginAction::SaveFieldAsDefault => "save_field_as_default",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionResponse {
    /// The group is now linked to this issue
    Assigned(String),
    Issues(IssuePage<IssueSummary>),
    DefaultSaved,
}

pub struct YouTrackPlugin {
    connector: Box<dyn Connector>,
    options: Box<dyn OptionStore>,
    group_meta: Box<dyn GroupMetaStore>,
    settings: PluginSettings,
    field_cache: FieldSchemaCache,
}

impl YouTrackPlugin {
    pub fn new(
        connector: Box<dyn Connector>,
        options: Box<dyn OptionStore>,
        group_meta: Box<dyn GroupMetaStore>,
        settings: PluginSettings,
    ) -> Self {
        let field_cache = FieldSchemaCache::new(settings.field_cache_ttl());
        Self {
            connector,
            options,
            group_meta,
            settings,
            field_cache,
        }
    }

    /// Plugin talking to real YouTrack instances
    pub fn youtrack(
        options: Box<dyn OptionStore>,
        group_meta: Box<dyn GroupMetaStore>,
        settings: PluginSettings,
    ) -> Self {
        Self::new(Box::new(YouTrackConnector), options, group_meta, settings)
    }

    pub fn settings(&self) -> &PluginSettings {
        &self.settings
    }

    pub fn field_cache(&self) -> &FieldSchemaCache {
        &self.field_cache
    }

    pub fn options(&self, project: &str) -> Result<ProjectOptions> {
        self.options.load(project)
    }

    pub fn is_configured(&self, project: &str) -> Result<bool> {
        Ok(self.options.load(project)?.tracker_project().is_some())
    }

    /// Tracker client built from the stored options of `project`
    pub fn tracker(&self, project: &str) -> Result<Box<dyn IssueTracker>> {
        let options = self.options.load(project)?;
        self.client(project, &options)
    }

    fn client(&self, project: &str, options: &ProjectOptions) -> Result<Box<dyn IssueTracker>> {
        let url = options
            .url
            .clone()
            .ok_or_else(|| PluginError::NotConfigured(project.to_string()))?;
        let settings = ClientSettings {
            url,
            api_key: options.api_key.clone().filter(|k| !k.is_empty()),
            verify_ssl_certificate: self.settings.verify_ssl_certificate,
        };
        Ok(self.connector.connect(&settings)?)
    }

    fn linked(&self, project: &str) -> Result<(ProjectOptions, String)> {
        let options = self.options.load(project)?;
        let tracker_project = options
            .tracker_project()
            .map(str::to_string)
            .ok_or_else(|| PluginError::NotConfigured(project.to_string()))?;
        Ok((options, tracker_project))
    }

    /// Configuration form built from the stored options
    pub fn get_config(&self, project: &str) -> Result<YouTrackConfiguration> {
        let options = self.options.load(project)?;
        Ok(self.build_config(&ConfigInput::from(&options)))
    }

    fn build_config(&self, input: &ConfigInput) -> YouTrackConfiguration {
        YouTrackConfiguration::build(
            input,
            self.connector.as_ref(),
            self.settings.verify_ssl_certificate,
        )
    }

    /// Check submitted options against the tracker and store them
    ///
    /// A blank api key keeps the stored one. Credential errors also wipe the
    /// stored options.
    pub fn validate_config(
        &self,
        project: &str,
        submitted: ProjectOptions,
    ) -> Result<ProjectOptions> {
        let stored = self.options.load(project)?;
        let mut input = ConfigInput::from(&submitted);
        if input.api_key().is_none() {
            input.api_key = stored.api_key.clone();
        }

        if input.url().is_none() || input.username().is_none() {
            return Err(PluginError::Config(
                ConfigErrorKind::MissingFields.message(""),
            ));
        }

        let config = self.build_config(&input);
        for key in ["url", "username"] {
            if let Some(message) = config.errors.get(key) {
                self.reset_options(project)?;
                return Err(PluginError::Config(message.clone()));
            }
        }
        if let Some(message) = config.errors.values().next() {
            return Err(PluginError::Config(message.clone()));
        }
        if input.project().is_none() {
            return Err(PluginError::Config(format!(
                "project: {}",
                ConfigErrorKind::Required.message("")
            )));
        }

        let options = ProjectOptions {
            url: input.url().map(str::to_string),
            username: input.username().map(str::to_string),
            api_key: input.api_key().map(str::to_string),
            project: input.project().map(str::to_string),
            ignore_fields: submitted.ignore_fields,
            default_tags: submitted.default_tags,
            default_fields: stored.default_fields,
        };
        self.options.save(project, &options)?;
        self.field_cache.invalidate_project(project);
        debug!(project, "Saved YouTrack options");
        Ok(options)
    }

    pub fn reset_options(&self, project: &str) -> Result<()> {
        self.options.reset(project)?;
        self.field_cache.invalidate_project(project);
        Ok(())
    }

    /// Custom fields of the linked project, minus the ignored ones
    pub fn project_fields(&self, project: &str) -> Result<Vec<CustomFieldDetail>> {
        let (options, tracker_project) = self.linked(project)?;
        let client = self.client(project, &options)?;
        let fields = self.field_cache.get_or_fetch(
            project,
            &tracker_project,
            &options.ignore_fields,
            || client.get_project_fields(&tracker_project, &options.ignore_fields),
        )?;
        Ok(fields)
    }

    pub fn initial_form_data(&self, group: &Group) -> Result<InitialData> {
        let options = self.options.load(&group.project)?;
        Ok(InitialData {
            title: group.title.clone(),
            description: group.description.clone(),
            tags: options.default_tags,
            default_fields: options.default_fields,
        })
    }

    pub fn new_issue_form(&self, group: &Group) -> Result<NewIssueForm> {
        let fields = self.project_fields(&group.project)?;
        Ok(NewIssueForm::new(&fields, self.initial_form_data(group)?))
    }

    /// Create an issue from a submitted new issue form and link the group to it
    ///
    /// Field values and tags are applied with one command each after the
    /// issue exists. A failing command aborts the rest; nothing is rolled back.
    pub fn create_issue(&self, group: &Group, data: &FormData) -> Result<String> {
        let form = self.new_issue_form(group)?;
        let issue = form.clean(data)?;

        let (options, tracker_project) = self.linked(&group.project)?;
        let client = self.client(&group.project, &options)?;

        let issue_id = client.create_issue(&CreateIssue {
            project: tracker_project,
            summary: issue.title,
            description: issue.description,
        })?;
        info!(issue = %issue_id, group = %group.id, "Created YouTrack issue");

        for (field, value) in &issue.field_values {
            let Some(value) = value else { continue };
            for value in value.command_values() {
                client.execute_command(&issue_id, &format!("{} {}", field, value))?;
            }
        }
        if !issue.tags.is_empty() {
            client.add_tags(&issue_id, &issue.tags)?;
        }

        self.group_meta.set(&group.id, ISSUE_ID_KEY, &issue_id)?;
        Ok(issue_id)
    }

    pub fn issue_url(&self, project: &str, issue_id: &str) -> Result<String> {
        let options = self.options.load(project)?;
        let url = options
            .url
            .ok_or_else(|| PluginError::NotConfigured(project.to_string()))?;
        Ok(format!("{}/issue/{}", url.trim_end_matches('/'), issue_id))
    }

    pub fn linked_issue(&self, group: &Group) -> Result<Option<String>> {
        self.group_meta.get(&group.id, ISSUE_ID_KEY)
    }

    /// Extra actions offered on a group page as `(title, url)`
    pub fn actions(&self, group: &Group) -> Result<Vec<(String, String)>> {
        let mut actions = Vec::new();
        if self.is_configured(&group.project)? && self.linked_issue(group)?.is_none() {
            actions.push((
                EXISTING_ISSUE_TITLE.to_string(),
                format!("{}?action={}", group.url, PluginAction::AssignIssue.name()),
            ));
        }
        Ok(actions)
    }

    /// Dispatch a named action; unknown names yield `None`
    pub fn handle_action(
        &self,
        action: &str,
        group: &Group,
        data: &FormData,
    ) -> Result<Option<ActionResponse>> {
        let Some(action) = PluginAction::from_name(action) else {
            debug!(action, "Unknown action");
            return Ok(None);
        };

        let response = match action {
            PluginAction::AssignIssue => ActionResponse::Assigned(self.assign_issue(group, data)?),
            PluginAction::ProjectIssues => ActionResponse::Issues(self.project_issues(
                &group.project,
                data.get("q"),
                parse_int_or(data.get("page"), DEFAULT_PAGE),
                parse_int_or(data.get("page_limit"), DEFAULT_PAGE_LIMIT),
            )?),
            PluginAction::SaveFieldAsDefault => {
                self.save_field_as_default(&group.project, data)?;
                ActionResponse::DefaultSaved
            }
        };
        Ok(Some(response))
    }

    pub fn assign_issue(&self, group: &Group, data: &FormData) -> Result<String> {
        let issue_id = AssignIssueForm::clean(data)?;
        self.group_meta.set(&group.id, ISSUE_ID_KEY, &issue_id)?;
        Ok(issue_id)
    }

    /// One page of the linked project's issues
    pub fn project_issues(
        &self,
        project: &str,
        query: Option<&str>,
        page: usize,
        page_limit: usize,
    ) -> Result<IssuePage<IssueSummary>> {
        let (options, tracker_project) = self.linked(project)?;
        let client = self.client(project, &options)?;
        let query = query.map(str::trim).filter(|q| !q.is_empty());

        Ok(fetch_issue_page(
            |offset, limit| client.get_project_issues(&tracker_project, query, offset, limit),
            page,
            page_limit,
        )?)
    }

    pub fn save_field_as_default(&self, project: &str, data: &FormData) -> Result<()> {
        let default = DefaultFieldForm::clean(data)?;
        let mut options = self.options.load(project)?;
        options
            .default_fields
            .insert(default_field_key(&default.field), default.value);
        self.options.save(project, &options)
    }
}
