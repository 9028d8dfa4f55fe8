//! YouTrack issue tracking for an error-tracking host.
//!
//! The host drives [`YouTrackPlugin`]: it renders the configuration built by
//! [`YouTrackConfiguration`], shows the issue forms and forwards submitted
//! data back to the plugin. Storage stays with the host behind
//! [`OptionStore`] and [`GroupMetaStore`].

pub mod configuration;
pub mod error;
pub mod field_cache;
pub mod forms;
pub mod host;
pub mod plugin;
pub mod settings;


pub use configuration::{ConfigField, ConfigFieldType, ConfigInput, YouTrackConfiguration};
pub use error::{ConfigErrorKind, FormError, PluginError, Result};
pub use field_cache::FieldSchemaCache;
pub use forms::{default_field_key, FieldValue, FormData, NewIssueForm, ProjectFieldsForm};
pub use host::{
    Group, GroupMetaStore, InMemoryGroupMetaStore, InMemoryOptionStore, OptionStore,
    ProjectOptions,
};
pub use plugin::{ActionResponse, PluginAction, YouTrackPlugin};
pub use settings::PluginSettings;
