//! Templates described as data rather than code.
//!
//! A declarative template is a `template.yaml` holding catalog metadata, a
//! table of variables and the manifest shape with `${...}` placeholders.
//! [`DeclarativeGenerator`] plugs such a file into the registry like any
//! built-in generator.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::context::GeneratorContext;
use crate::error::{TemplateError, TemplateResult};
use crate::identity::derive_hash_with_length;
use crate::manifest::{Schema, Template, TemplateMetadata};
use crate::processor::process_template;
use crate::registry::TemplateGenerator;

/// Domain entry; a missing host is replaced by a generated domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainTemplate {
    pub service_name: String,
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

/// Mount entry; both fields may contain placeholders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MountTemplate {
    pub file_path: String,
    #[serde(default)]
    pub content: String,
}

/// Environment as either `KEY=VALUE` lines or a key/value table.
///
/// Table values may be strings, booleans or numbers. Tables are emitted in
/// key order; use the list form when line order matters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnvTemplate {
    List(Vec<String>),
    Map(BTreeMap<String, serde_json::Value>),
}

impl Default for EnvTemplate {
    fn default() -> Self {
        EnvTemplate::List(Vec::new())
    }
}

/// Manifest shape of a declarative template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeclarativeConfig {
    #[serde(default)]
    pub domains: Vec<DomainTemplate>,
    #[serde(default)]
    pub env: EnvTemplate,
    #[serde(default)]
    pub mounts: Vec<MountTemplate>,
}

/// A complete declarative template file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclarativeTemplate {
    #[serde(flatten)]
    pub metadata: TemplateMetadata,
    #[serde(default)]
    pub variables: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub config: DeclarativeConfig,
}

impl DeclarativeTemplate {
    /// Parse a template from YAML and check its structure.
    pub fn from_yaml_str(content: &str) -> TemplateResult<Self> {
        let template: DeclarativeTemplate = serde_yaml::from_str(content)?;
        template.validate()?;
        Ok(template)
    }

    /// Structural checks that do not need a schema.
    pub fn validate(&self) -> TemplateResult<()> {
        let invalid = |message: String| TemplateError::InvalidManifest {
            template: self.metadata.id.clone(),
            message,
        };

        if self.metadata.id.trim().is_empty() {
            return Err(invalid("template id is empty".into()));
        }
        for domain in &self.config.domains {
            if domain.port == 0 {
                return Err(invalid(format!(
                    "domain for service {:?} has port 0",
                    domain.service_name
                )));
            }
            if domain.service_name.trim().is_empty() {
                return Err(invalid("domain has an empty serviceName".into()));
            }
        }
        for mount in &self.config.mounts {
            if mount.file_path.trim().is_empty() {
                return Err(invalid("mount has an empty filePath".into()));
            }
        }
        Ok(())
    }
}

/// Registry adapter for a [`DeclarativeTemplate`].
#[derive(Debug, Clone)]
pub struct DeclarativeGenerator {
    template: DeclarativeTemplate,
}

impl DeclarativeGenerator {
    pub fn new(template: DeclarativeTemplate) -> Self {
        Self { template }
    }

    pub fn template(&self) -> &DeclarativeTemplate {
        &self.template
    }
}

impl TemplateGenerator for DeclarativeGenerator {
    fn metadata(&self) -> TemplateMetadata {
        self.template.metadata.clone()
    }

    /// Content hash, so reloading an unchanged file is not a conflict.
    fn fingerprint(&self) -> Option<String> {
        let body = serde_json::to_string(&self.template).ok()?;
        Some(format!("declarative:{}", derive_hash_with_length(&body, 32)))
    }

    fn generate(&self, schema: &Schema, ctx: &GeneratorContext<'_>) -> TemplateResult<Template> {
        process_template(&self.template, schema, ctx)
    }
}
