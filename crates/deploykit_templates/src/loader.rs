//! Declarative template discovery.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::declarative::{DeclarativeGenerator, DeclarativeTemplate};
use crate::error::{TemplateError, TemplateResult};
use crate::registry::TemplateRegistry;

/// Loads `template.yaml` files from the immediate subdirectories of a root.
pub struct TemplateLoader {
    templates_path: PathBuf,
}

impl TemplateLoader {
    /// Create a new template loader.
    pub fn new(templates_path: impl Into<PathBuf>) -> Self {
        Self {
            templates_path: templates_path.into(),
        }
    }

    pub fn templates_path(&self) -> &Path {
        &self.templates_path
    }

    /// Load every template under the root, sorted by id.
    ///
    /// Directories without a manifest or with an invalid one are skipped
    /// with a warning. A missing root yields no templates.
    pub fn load_all(&self) -> Vec<DeclarativeTemplate> {
        let mut templates = Vec::new();

        if !self.templates_path.exists() {
            warn!("Templates directory does not exist: {:?}", self.templates_path);
            return templates;
        }

        for entry in WalkDir::new(&self.templates_path)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            match self.load_template(path) {
                Ok(template) => {
                    info!(
                        "Loaded template: {} ({})",
                        template.metadata.name, template.metadata.id
                    );
                    templates.push(template);
                }
                Err(e) => {
                    warn!("Failed to load template from {:?}: {}", path, e);
                }
            }
        }

        templates.sort_by(|a, b| a.metadata.id.cmp(&b.metadata.id));
        templates
    }

    /// Load a single template from a directory.
    pub fn load_template(&self, path: &Path) -> TemplateResult<DeclarativeTemplate> {
        let manifest_path = path.join("template.yaml");
        if manifest_path.exists() {
            return self.load_manifest(&manifest_path);
        }

        let alt_path = path.join("template.yml");
        if alt_path.exists() {
            return self.load_manifest(&alt_path);
        }

        Err(TemplateError::NotFound(format!(
            "No template.yaml found in {:?}",
            path
        )))
    }

    fn load_manifest(&self, path: &Path) -> TemplateResult<DeclarativeTemplate> {
        debug!("Loading manifest from {:?}", path);
        let content = fs::read_to_string(path)?;
        DeclarativeTemplate::from_yaml_str(&content)
    }

    /// Load every template and register it.
    ///
    /// Returns the number of templates registered. A template whose id is
    /// taken by a different generator aborts with `Conflict`.
    pub fn register_all(&self, registry: &mut TemplateRegistry) -> TemplateResult<usize> {
        let templates = self.load_all();
        let count = templates.len();

        for template in templates {
            registry.register_generator(Arc::new(DeclarativeGenerator::new(template)))?;
        }

        info!("Registered {} declarative template(s) from {:?}", count, self.templates_path);
        Ok(count)
    }
}
