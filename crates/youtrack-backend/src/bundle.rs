//! Bundle kinds backing custom field values.

use std::collections::BTreeSet;

use crate::error::{Result, YouTrackError};
use crate::xml::Element;

/// Server-side enumeration kinds a custom field type can point at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleKind {
    Enumeration,
    State,
    User,
    OwnedField,
    Version,
    Build,
}

/// Field type prefix -> bundle kind
const BUNDLE_KINDS: &[(&str, BundleKind)] = &[
    ("enum", BundleKind::Enumeration),
    ("state", BundleKind::State),
    ("user", BundleKind::User),
    ("ownedField", BundleKind::OwnedField),
    ("version", BundleKind::Version),
    ("build", BundleKind::Build),
];

impl BundleKind {
    pub fn from_type_prefix(prefix: &str) -> Option<Self> {
        BUNDLE_KINDS
            .iter()
            .find(|(name, _)| *name == prefix)
            .map(|(_, kind)| *kind)
    }

    /// Path segment under `/rest/admin/customfield/`
    pub fn path_segment(self) -> &'static str {
        match self {
            BundleKind::Enumeration => "bundle",
            BundleKind::State => "stateBundle",
            BundleKind::User => "userBundle",
            BundleKind::OwnedField => "ownedFieldBundle",
            BundleKind::Version => "versionBundle",
            BundleKind::Build => "buildBundle",
        }
    }

    /// Root element of the bundle document
    pub fn root_element(self) -> &'static str {
        match self {
            BundleKind::Enumeration => "enumeration",
            BundleKind::State => "stateBundle",
            BundleKind::User => "userBundle",
            BundleKind::OwnedField => "ownedFieldBundle",
            BundleKind::Version => "versions",
            BundleKind::Build => "buildBundle",
        }
    }
}

/// Fail with the server message when the document is an `<error>`
pub fn check_error(doc: &Element) -> Result<()> {
    match doc.find("error") {
        Some(error) => Err(YouTrackError::Server(error.text())),
        None => Ok(()),
    }
}

/// Values of a plain bundle: the text of each child of the bundle element
pub fn element_values(doc: &Element, kind: BundleKind) -> Result<Vec<String>> {
    let bundle = doc.require(kind.root_element())?;
    Ok(bundle.children.iter().map(|item| item.text()).collect())
}

/// Direct user logins and group names of a user bundle
pub fn user_bundle_members(doc: &Element) -> Result<(BTreeSet<String>, Vec<String>)> {
    let bundle = doc.require(BundleKind::User.root_element())?;
    let users = logins(bundle);
    let groups = bundle
        .find_all("userGroup")
        .into_iter()
        .filter_map(|group| group.attr("name").map(str::to_string))
        .collect();
    Ok((users, groups))
}

/// Logins of every `<user>` below `element`
pub fn logins(element: &Element) -> BTreeSet<String> {
    element
        .find_all("user")
        .into_iter()
        .filter_map(|user| user.attr("login").map(str::to_string))
        .collect()
}
