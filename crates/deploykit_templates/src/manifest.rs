//! Template contract: the shapes every generator consumes and emits.
//!
//! A [`Schema`] describes the project a template is installed into. A
//! [`Template`] is the manifest fragment a generator hands back to the
//! installer: environment lines, exposed domains and optional file mounts.

use std::collections::BTreeMap;
use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::error::{TemplateError, TemplateResult};
use crate::identity::is_valid_hostname;

/// Upper bound on a project name before it is rejected outright.
pub const MAX_PROJECT_NAME_LEN: usize = 1024;

/// Input to every template generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    project_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    server_ip: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    metadata: BTreeMap<String, String>,
}

impl Schema {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            server_ip: None,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_server_ip(mut self, server_ip: impl Into<String>) -> Self {
        self.server_ip = Some(server_ip.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// Server IP, treating a blank value as absent.
    pub fn server_ip(&self) -> Option<&str> {
        self.server_ip
            .as_deref()
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
    }

    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// Reject schemas no generator can work with.
    ///
    /// An empty project name is fine (domains fall back to a default label).
    /// Control characters are not: they would split `KEY=VALUE` lines.
    pub fn validate(&self, template: &str) -> TemplateResult<()> {
        let invalid = |message: String| TemplateError::InvalidInput {
            template: template.to_string(),
            message,
        };

        if self.project_name.len() > MAX_PROJECT_NAME_LEN {
            return Err(invalid(format!(
                "project name exceeds {} bytes",
                MAX_PROJECT_NAME_LEN
            )));
        }
        if self.project_name.chars().any(char::is_control) {
            return Err(invalid("project name contains control characters".into()));
        }
        if let Some(ip) = self.server_ip() {
            if ip.chars().any(char::is_control) {
                return Err(invalid("server IP contains control characters".into()));
            }
        }
        Ok(())
    }
}

/// One exposed network endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainSpec {
    pub host: String,
    pub port: u16,
    pub service_name: String,
}

impl DomainSpec {
    pub fn new(host: impl Into<String>, port: u16, service_name: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            service_name: service_name.into(),
        }
    }

    fn check(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err(format!("domain {} has port 0", self.host));
        }
        if !is_valid_hostname(&self.host) {
            return Err(format!("domain host is not a valid hostname: {:?}", self.host));
        }
        if self.service_name.trim().is_empty() {
            return Err(format!("domain {} has no service name", self.host));
        }
        Ok(())
    }
}

/// A file mounted into one of the template's services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MountSpec {
    pub file_path: String,
    pub content: String,
}

impl MountSpec {
    pub fn new(file_path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            content: content.into(),
        }
    }
}

/// Manifest fragment returned by a generator.
///
/// Every field may be empty; consumers treat absence as "nothing to do".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    #[serde(default)]
    pub envs: Vec<String>,
    #[serde(default)]
    pub domains: Vec<DomainSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mounts: Option<Vec<MountSpec>>,
}

impl Template {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a `KEY=VALUE` line.
    pub fn with_env(mut self, key: &str, value: impl Display) -> Self {
        self.envs.push(format!("{}={}", key, value));
        self
    }

    pub fn with_domain(mut self, domain: DomainSpec) -> Self {
        self.domains.push(domain);
        self
    }

    pub fn with_mount(mut self, mount: MountSpec) -> Self {
        self.mounts.get_or_insert_with(Vec::new).push(mount);
        self
    }

    /// Mounts, empty when the template declares none.
    pub fn mounts(&self) -> &[MountSpec] {
        self.mounts.as_deref().unwrap_or_default()
    }

    /// Value of the first env line with the given key.
    pub fn env(&self, key: &str) -> Option<&str> {
        self.envs.iter().find_map(|line| {
            line.split_once('=')
                .filter(|(k, _)| *k == key)
                .map(|(_, v)| v)
        })
    }

    /// Check the manifest before it reaches provisioning.
    pub fn validate(&self, template: &str) -> TemplateResult<()> {
        let invalid = |message: String| TemplateError::InvalidTemplate {
            template: template.to_string(),
            message,
        };

        for line in &self.envs {
            match line.split_once('=') {
                Some((key, _)) if !key.trim().is_empty() => {}
                _ => return Err(invalid(format!("env entry is not KEY=VALUE: {:?}", line))),
            }
        }

        for domain in &self.domains {
            domain.check().map_err(invalid)?;
        }

        for mount in self.mounts() {
            if mount.file_path.trim().is_empty() {
                return Err(invalid("mount has an empty file path".into()));
            }
        }

        Ok(())
    }
}

/// Links shown next to a template in catalogs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docs: Option<String>,
}

/// Catalog information about a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateMetadata {
    /// Unique template identifier, also its registry name
    pub id: String,
    /// Display name
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default)]
    pub links: TemplateLinks,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_version() -> String {
    "latest".to_string()
}

impl TemplateMetadata {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            version: default_version(),
            description: String::new(),
            logo: None,
            links: TemplateLinks::default(),
            tags: Vec::new(),
        }
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn logo(mut self, logo: impl Into<String>) -> Self {
        self.logo = Some(logo.into());
        self
    }

    pub fn links(mut self, github: &str, website: &str, docs: &str) -> Self {
        self.links = TemplateLinks {
            github: Some(github.to_string()),
            website: Some(website.to_string()),
            docs: Some(docs.to_string()),
        };
        self
    }

    pub fn tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}
