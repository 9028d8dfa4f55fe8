//! Conversions from YouTrack payloads to tracker-core models

use crate::error::Result;
use crate::models::ProjectShort;
use crate::xml::Element;
use tracker_core::{CustomFieldRef, IssueSummary, Project, User};

impl From<ProjectShort> for Project {
    fn from(p: ProjectShort) -> Self {
        Project {
            id: p.short_name,
            name: p.name,
        }
    }
}

pub(crate) fn user_from_xml(doc: &Element) -> Result<User> {
    let user = doc.require("user")?;
    Ok(User {
        login: user.required_attr("login")?.to_string(),
        full_name: user.attr("fullName").map(str::to_string),
        email: user.attr("email").map(str::to_string),
    })
}

pub(crate) fn field_refs_from_xml(doc: &Element) -> Result<Vec<CustomFieldRef>> {
    doc.find_all("projectCustomField")
        .into_iter()
        .map(|field| {
            Ok(CustomFieldRef {
                name: field.required_attr("name")?.to_string(),
                url: field.required_attr("url")?.to_string(),
            })
        })
        .collect()
}

pub(crate) fn issues_from_xml(doc: &Element) -> Result<Vec<IssueSummary>> {
    let issues = doc.require("issues")?;
    issues
        .children
        .iter()
        .filter(|child| child.name == "issue")
        .map(|issue| {
            let state = issue
                .child_with_attr("field", "name", "State")
                .map(|field| match field.find("value") {
                    Some(value) => value.text(),
                    None => field.text(),
                });
            let summary = issue
                .child_with_attr("field", "name", "summary")
                .map(|field| field.text())
                .unwrap_or_default();
            Ok(IssueSummary {
                id: issue.required_attr("id")?.to_string(),
                state,
                summary,
            })
        })
        .collect()
}
