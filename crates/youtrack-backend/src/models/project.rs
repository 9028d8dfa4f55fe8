use serde::{Deserialize, Serialize};

/// Project as returned by the JSON admin endpoint
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProjectShort {
    pub name: String,
    pub short_name: String,
    #[serde(default, rename = "$type")]
    pub type_name: Option<String>,
}
