use std::collections::BTreeSet;

use tracing::{debug, warn};
use tracker_core::{
    ClientSettings, CreateIssue, CustomFieldDetail, CustomFieldRef, IssueSummary, Project, User,
};
use ureq::tls::TlsConfig;
use ureq::{Agent, RequestBuilder};

use crate::bundle::{self, BundleKind};
use crate::convert;
use crate::error::{Result, YouTrackError};
use crate::models::*;
use crate::xml::Element;

const PROJECTS_URL: &str = "/api/admin/projects/?fields=name,shortName";
const API_KEY_COOKIE_NAME: &str = "jetbrains.charisma.main.security.PRINCIPAL";
const USER_AGENT: &str = concat!("sentry-youtrack/", env!("CARGO_PKG_VERSION"));

/// Environment variable holding the token used when no api key is given
pub const TOKEN_ENV_VAR: &str = "YT_TOKEN";

/// Bundle names tried in order; instances may run with a localized default set
const PRIORITY_BUNDLES: &[&str] = &["Priorities", "Приоритеты"];
const ISSUE_TYPE_BUNDLES: &[&str] = &["Types", "Типы"];

pub struct YouTrackClient {
    agent: Agent,
    base_url: String,
    api_key: String,
}

impl YouTrackClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self::with_agent(build_agent(true), base_url, api_key)
    }

    /// Build a client from host settings, validating the url scheme
    ///
    /// A missing api key is read from `YT_TOKEN`.
    pub fn from_settings(settings: &ClientSettings) -> Result<Self> {
        let url = settings.url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(YouTrackError::InvalidUrl(settings.url.clone()));
        }

        let api_key = match &settings.api_key {
            Some(key) => key.clone(),
            None => std::env::var(TOKEN_ENV_VAR).unwrap_or_default(),
        };

        Ok(Self::with_agent(
            build_agent(settings.verify_ssl_certificate),
            url,
            &api_key,
        ))
    }

    fn with_agent(agent: Agent, base_url: &str, api_key: &str) -> Self {
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    fn authorized<B>(&self, request: RequestBuilder<B>) -> RequestBuilder<B> {
        request
            .header("User-Agent", USER_AGENT)
            .header("Authorization", &format!("Bearer {}", self.api_key))
            .header("Cookie", &format!("{}={}", API_KEY_COOKIE_NAME, self.api_key))
    }

    fn get_text(&self, url: &str, query: &[(&str, String)]) -> Result<String> {
        debug!("GET: {}", url);
        let mut request = self.authorized(self.agent.get(url));
        for (key, value) in query {
            request = request.query(*key, value);
        }
        let mut response = request.call()?;
        Ok(response.body_mut().read_to_string()?)
    }

    fn get_xml(&self, url: &str, query: &[(&str, String)]) -> Result<Element> {
        Element::parse(&self.get_text(url, query)?)
    }

    fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<String> {
        debug!("POST: {}", url);
        let mut response = self
            .authorized(self.agent.post(url))
            .send_form(form.iter().copied())?;
        Ok(response.body_mut().read_to_string()?)
    }

    pub fn get_project_name(&self, project_id: &str) -> Result<String> {
        let url = format!("{}/rest/admin/project/{}", self.base_url, project_id);
        let doc = self.get_xml(&url, &[])?;
        Ok(doc.require("project")?.required_attr("name")?.to_string())
    }

    pub fn get_user(&self, login: &str) -> Result<User> {
        let url = format!(
            "{}/rest/admin/user/{}",
            self.base_url,
            urlencoding::encode(login)
        );
        let doc = self.get_xml(&url, &[])?;
        convert::user_from_xml(&doc)
    }

    /// Projects come from the JSON admin API; the legacy XML listing is gone
    pub fn get_projects(&self) -> Result<Vec<Project>> {
        let url = format!("{}{}", self.base_url, PROJECTS_URL);
        let body = self.get_text(&url, &[])?;
        let projects: Vec<ProjectShort> = serde_json::from_str(&body)?;
        Ok(projects.into_iter().map(Into::into).collect())
    }

    pub fn get_priorities(&self) -> Result<Vec<String>> {
        self.get_localized_bundle(PRIORITY_BUNDLES)
    }

    pub fn get_issue_types(&self) -> Result<Vec<String>> {
        self.get_localized_bundle(ISSUE_TYPE_BUNDLES)
    }

    /// Try each enumeration bundle name in turn; only a 404 moves on to the next
    fn get_localized_bundle(&self, candidates: &[&str]) -> Result<Vec<String>> {
        let mut last_error = None;
        for name in candidates {
            match self.get_custom_field_values(BundleKind::Enumeration, name) {
                Ok(values) => return Ok(values),
                Err(e) if e.is_not_found() => {
                    warn!(bundle = *name, "Bundle not found, trying next name");
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }
        Err(last_error
            .unwrap_or_else(|| YouTrackError::MissingElement("bundle name".to_string())))
    }

    pub fn get_project_issues(
        &self,
        project_id: &str,
        query: Option<&str>,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<IssueSummary>> {
        let url = format!("{}/rest/issue/byproject/{}", self.base_url, project_id);
        let mut params = vec![("max", limit.to_string()), ("after", offset.to_string())];
        if let Some(filter) = query {
            params.push(("filter", filter.to_string()));
        }
        let doc = self.get_xml(&url, &params)?;
        convert::issues_from_xml(&doc)
    }

    /// Create an issue and return its readable id
    pub fn create_issue(&self, issue: &CreateIssue) -> Result<String> {
        let url = format!("{}/rest/issue", self.base_url);
        let body = self.post_form(
            &url,
            &[
                ("project", issue.project.as_str()),
                ("summary", issue.summary.as_str()),
                ("description", issue.description.as_str()),
            ],
        )?;
        let doc = Element::parse(&body)?;
        Ok(doc.require("issue")?.required_attr("id")?.to_string())
    }

    pub fn execute_command(&self, issue_id: &str, command: &str) -> Result<()> {
        let url = format!("{}/rest/issue/{}/execute", self.base_url, issue_id);
        self.post_form(&url, &[("command", command)])?;
        Ok(())
    }

    /// One `add tag` command per tag; earlier tags stay applied if a later one fails
    pub fn add_tags(&self, issue_id: &str, tags: &[String]) -> Result<()> {
        for tag in tags {
            self.execute_command(issue_id, &format!("add tag {}", tag))?;
        }
        Ok(())
    }

    pub fn get_project_fields_list(&self, project_id: &str) -> Result<Vec<CustomFieldRef>> {
        let url = format!(
            "{}/rest/admin/project/{}/customfield",
            self.base_url, project_id
        );
        let doc = self.get_xml(&url, &[])?;
        convert::field_refs_from_xml(&doc)
    }

    /// Resolve the custom fields of a project, skipping `ignore_fields` before any detail request
    pub fn get_project_fields(
        &self,
        project_id: &str,
        ignore_fields: &[String],
    ) -> Result<Vec<CustomFieldDetail>> {
        self.get_project_fields_list(project_id)?
            .iter()
            .filter(|field| {
                let ignored = ignore_fields.contains(&field.name);
                if ignored {
                    debug!(field = %field.name, "Skipping ignored field");
                }
                !ignored
            })
            .map(|field| self.get_custom_field_details(field))
            .collect()
    }

    fn get_custom_field_details(&self, field: &CustomFieldRef) -> Result<CustomFieldDetail> {
        let url = self.rebase_admin_url(&field.url)?;
        let doc = FieldDetailDoc::from_xml(&self.get_xml(&url, &[])?)?;

        let kind = BundleKind::from_type_prefix(tracker_core::type_prefix(&doc.field_type));
        let values = match (kind, &doc.bundle_name) {
            (Some(kind), Some(bundle_name)) => {
                Some(self.get_custom_field_values(kind, bundle_name)?)
            }
            _ => None,
        };

        Ok(CustomFieldDetail {
            name: doc.name,
            field_type: doc.field_type,
            empty_text: doc.empty_text,
            values,
        })
    }

    /// Detail urls carry the server's own host; keep only the path from `/rest/admin/`
    fn rebase_admin_url(&self, url: &str) -> Result<String> {
        match url.find("/rest/admin/") {
            Some(idx) => Ok(format!("{}{}", self.base_url, &url[idx..])),
            None => Err(YouTrackError::InvalidUrl(url.to_string())),
        }
    }

    pub fn get_custom_field_values(
        &self,
        kind: BundleKind,
        bundle_name: &str,
    ) -> Result<Vec<String>> {
        let url = format!(
            "{}/rest/admin/customfield/{}/{}",
            self.base_url,
            kind.path_segment(),
            urlencoding::encode(bundle_name)
        );
        let doc = self.get_xml(&url, &[])?;
        bundle::check_error(&doc)?;

        match kind {
            BundleKind::User => self.get_user_bundle_values(&doc),
            _ => bundle::element_values(&doc, kind),
        }
    }

    fn get_user_bundle_values(&self, doc: &Element) -> Result<Vec<String>> {
        let (mut users, groups) = bundle::user_bundle_members(doc)?;
        for group in groups {
            users.extend(self.get_users_from_group(&group)?);
        }
        Ok(users.into_iter().collect())
    }

    fn get_users_from_group(&self, group: &str) -> Result<BTreeSet<String>> {
        let url = format!("{}/rest/admin/user", self.base_url);
        let doc = self.get_xml(&url, &[("group", group.to_string())])?;
        Ok(bundle::logins(&doc))
    }
}

fn build_agent(verify_ssl_certificate: bool) -> Agent {
    Agent::config_builder()
        .tls_config(
            TlsConfig::builder()
                .disable_verification(!verify_ssl_certificate)
                .build(),
        )
        .build()
        .into()
}
