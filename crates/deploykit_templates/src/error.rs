//! Error types for templates.

use thiserror::Error;

/// Result type alias for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Errors that can occur while registering, resolving or generating templates.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Template already registered with a different generator: {0}")]
    Conflict(String),

    #[error("Invalid input for template {template}: {message}")]
    InvalidInput { template: String, message: String },

    #[error("Template {template} produced an invalid manifest: {message}")]
    InvalidTemplate { template: String, message: String },

    #[error("Invalid manifest in template {template}: {message}")]
    InvalidManifest { template: String, message: String },

    #[error("Invalid generator configuration: {0}")]
    InvalidConfig(String),

    #[error("Global template registry is already initialized")]
    AlreadyInitialized,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}
