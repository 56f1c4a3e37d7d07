//! Error types for the navigation core.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, NavigationError>;

#[derive(Error, Debug)]
pub enum NavigationError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Waypoint data error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Preference file is not valid TOML: {0}")]
    PreferenceParse(#[from] toml::de::Error),

    #[error("Could not encode preference file: {0}")]
    PreferenceWrite(#[from] toml::ser::Error),

    #[error("Preference entry {category}.{entry} is not a string")]
    PreferenceEntryType { category: String, entry: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("{0}")]
    Collaborator(String),
}

impl NavigationError {
    /// Wrap a failure reported by a host collaborator.
    pub fn collaborator(message: impl Into<String>) -> Self {
        NavigationError::Collaborator(message.into())
    }
}
