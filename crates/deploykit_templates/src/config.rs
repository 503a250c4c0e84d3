//! Generator configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{TemplateError, TemplateResult};
use crate::identity::{is_valid_hostname, DEFAULT_HASH_LENGTH, MAX_HOSTNAME_LEN};

/// Environment variable overriding [`GeneratorConfig::base_domain`].
pub const BASE_DOMAIN_ENV: &str = "DEPLOYKIT_BASE_DOMAIN";

/// Shortest generated label a base domain must leave room for.
const MIN_LABEL_ROOM: usize = 16;

fn default_base_domain() -> String {
    "traefik.me".to_string()
}

fn default_random_label_length() -> usize {
    6
}

fn default_hash_length() -> usize {
    DEFAULT_HASH_LENGTH
}

/// Settings shared by every generator invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Suffix appended to generated domain labels
    #[serde(default = "default_base_domain")]
    pub base_domain: String,
    /// Number of random characters in a generated domain label
    #[serde(default = "default_random_label_length")]
    pub random_label_length: usize,
    /// Length of derived identifiers embedded in manifests
    #[serde(default = "default_hash_length")]
    pub hash_length: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            base_domain: default_base_domain(),
            random_label_length: default_random_label_length(),
            hash_length: default_hash_length(),
        }
    }
}

impl GeneratorConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> TemplateResult<Self> {
        let config: GeneratorConfig = toml::from_str(content)?;
        config.validated()
    }

    /// Load and validate a TOML file.
    pub fn load(path: &Path) -> TemplateResult<Self> {
        debug!("Loading generator config from {:?}", path);
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Apply `DEPLOYKIT_BASE_DOMAIN` when it is set.
    pub fn with_env_overrides(self) -> TemplateResult<Self> {
        match std::env::var(BASE_DOMAIN_ENV) {
            Ok(domain) if !domain.trim().is_empty() => self.with_base_domain(domain),
            _ => Ok(self),
        }
    }

    pub fn with_base_domain(mut self, base_domain: impl Into<String>) -> TemplateResult<Self> {
        self.base_domain = base_domain.into();
        self.validated()
    }

    /// Normalize the base domain and bound the numeric settings.
    pub fn validated(mut self) -> TemplateResult<Self> {
        self.base_domain = self
            .base_domain
            .trim()
            .trim_matches('.')
            .to_ascii_lowercase();

        if !self.base_domain.is_empty() && !is_valid_hostname(&self.base_domain) {
            return Err(TemplateError::InvalidConfig(format!(
                "base_domain is not a valid hostname: {:?}",
                self.base_domain
            )));
        }
        if self.base_domain.len() + 1 + MIN_LABEL_ROOM > MAX_HOSTNAME_LEN {
            return Err(TemplateError::InvalidConfig(format!(
                "base_domain leaves no room for generated labels: {} bytes",
                self.base_domain.len()
            )));
        }
        if !(1..=16).contains(&self.random_label_length) {
            return Err(TemplateError::InvalidConfig(format!(
                "random_label_length must be between 1 and 16, got {}",
                self.random_label_length
            )));
        }
        if !(4..=64).contains(&self.hash_length) {
            return Err(TemplateError::InvalidConfig(format!(
                "hash_length must be between 4 and 64, got {}",
                self.hash_length
            )));
        }

        Ok(self)
    }
}
