use crate::error::Result;
use crate::xml::Element;

/// `<projectCustomField>` detail document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDetailDoc {
    pub name: String,
    pub field_type: String,
    pub empty_text: Option<String>,
    /// Bundle name from `<param value=...>`, when the type is bundle backed
    pub bundle_name: Option<String>,
}

impl FieldDetailDoc {
    pub fn from_xml(doc: &Element) -> Result<Self> {
        let field = doc.require("projectCustomField")?;
        Ok(Self {
            name: field.required_attr("name")?.to_string(),
            field_type: field.required_attr("type")?.to_string(),
            empty_text: field.attr("emptyText").map(str::to_string),
            bundle_name: field
                .find("param")
                .and_then(|param| param.attr("value"))
                .map(str::to_string),
        })
    }
}
