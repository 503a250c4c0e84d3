//! Template registry mapping template names to generators.
//!
//! The registry is filled once at start-up and read concurrently afterwards.
//! Registration takes `&mut self`, so once a registry is shared behind `&` or
//! in the [`global`] slot it can no longer change and lookups need no locks.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use tracing::debug;

use crate::context::GeneratorContext;
use crate::error::{TemplateError, TemplateResult};
use crate::generators;
use crate::manifest::{Schema, Template, TemplateMetadata};

/// A generator turning a [`Schema`] into a [`Template`].
pub trait TemplateGenerator: Send + Sync {
    /// Catalog information; `metadata().id` is the default registry name.
    fn metadata(&self) -> TemplateMetadata;

    /// Identity used to tell a repeated registration from a conflicting one.
    ///
    /// Generators without a fingerprint only match the very same instance.
    /// Return one only when it captures every piece of configuration.
    fn fingerprint(&self) -> Option<String> {
        None
    }

    /// Produce the manifest fragment for one installation.
    fn generate(&self, schema: &Schema, ctx: &GeneratorContext<'_>) -> TemplateResult<Template>;
}

/// A registry of template generators.
#[derive(Default, Clone)]
pub struct TemplateRegistry {
    generators: HashMap<String, Arc<dyn TemplateGenerator>>,
}

impl TemplateRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            generators: HashMap::new(),
        }
    }

    /// Create a registry holding every built-in generator.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for generator in generators::builtin() {
            let name = generator.metadata().id;
            debug!("Registering built-in template: {}", name);
            registry.generators.insert(name, generator);
        }
        registry
    }

    /// Register a generator under its own metadata id.
    pub fn register_generator(&mut self, generator: Arc<dyn TemplateGenerator>) -> TemplateResult<()> {
        let name = generator.metadata().id;
        self.register(name, generator)
    }

    /// Register a generator under `name`.
    ///
    /// Registering the same generator twice is a no-op. Registering a
    /// different generator under a taken name fails with `Conflict`.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        generator: Arc<dyn TemplateGenerator>,
    ) -> TemplateResult<()> {
        let name = name.into();

        if let Some(existing) = self.generators.get(&name) {
            let same_content = matches!(
                (existing.fingerprint(), generator.fingerprint()),
                (Some(a), Some(b)) if a == b
            );
            if Arc::ptr_eq(existing, &generator) || same_content {
                debug!("Template already registered, skipping: {}", name);
                return Ok(());
            }
            return Err(TemplateError::Conflict(name));
        }

        debug!("Registering template: {}", name);
        self.generators.insert(name, generator);
        Ok(())
    }

    /// Look up a generator by name.
    pub fn resolve(&self, name: &str) -> TemplateResult<Arc<dyn TemplateGenerator>> {
        self.generators
            .get(name)
            .cloned()
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))
    }

    /// Resolve `name`, run it and validate the result.
    pub fn generate(
        &self,
        name: &str,
        schema: &Schema,
        ctx: &GeneratorContext<'_>,
    ) -> TemplateResult<Template> {
        let generator = self.resolve(name)?;
        schema.validate(name)?;

        let template = generator.generate(schema, ctx)?;
        template.validate(name)?;

        debug!(
            "Generated template {}: {} env(s), {} domain(s), {} mount(s)",
            name,
            template.envs.len(),
            template.domains.len(),
            template.mounts().len()
        );
        Ok(template)
    }

    /// Check if a template is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.generators.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.generators.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Metadata of every registered template, sorted by id.
    pub fn list(&self) -> Vec<TemplateMetadata> {
        let mut list: Vec<TemplateMetadata> = self.generators.values().map(|g| g.metadata()).collect();
        list.sort_by(|a, b| a.id.cmp(&b.id));
        list
    }

    /// Metadata of templates carrying `tag`, sorted by id.
    pub fn by_tag(&self, tag: &str) -> Vec<TemplateMetadata> {
        self.list().into_iter().filter(|m| m.has_tag(tag)).collect()
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }
}

impl std::fmt::Debug for TemplateRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateRegistry")
            .field("templates", &self.names())
            .finish()
    }
}

static GLOBAL: OnceLock<TemplateRegistry> = OnceLock::new();

/// The process-wide registry, built-ins only unless [`init_global`] ran first.
pub fn global() -> &'static TemplateRegistry {
    GLOBAL.get_or_init(TemplateRegistry::builtin)
}

/// Install a fully populated registry as the process-wide one.
///
/// Must run before the first call to [`global`].
pub fn init_global(registry: TemplateRegistry) -> TemplateResult<&'static TemplateRegistry> {
    GLOBAL
        .set(registry)
        .map_err(|_| TemplateError::AlreadyInitialized)?;
    Ok(global())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::manifest::DomainSpec;
    use crate::random::SeededRandom;

    struct StaticGenerator {
        id: &'static str,
        port: u16,
    }

    impl TemplateGenerator for StaticGenerator {
        fn metadata(&self) -> TemplateMetadata {
            TemplateMetadata::new(self.id, self.id)
        }

        fn fingerprint(&self) -> Option<String> {
            Some(format!("static:{}:{}", self.id, self.port))
        }

        fn generate(&self, _schema: &Schema, _ctx: &GeneratorContext<'_>) -> TemplateResult<Template> {
            Ok(Template::new().with_domain(DomainSpec::new("static.traefik.me", self.port, self.id)))
        }
    }

    fn generator(id: &'static str, port: u16) -> Arc<dyn TemplateGenerator> {
        Arc::new(StaticGenerator { id, port })
    }

    #[test]
    fn test_register_then_resolve() {
        let mut registry = TemplateRegistry::new();
        let gen = generator("web", 80);
        registry.register("web", gen.clone()).unwrap();

        let resolved = registry.resolve("web").unwrap();
        assert!(Arc::ptr_eq(&resolved, &gen));
    }

    #[test]
    fn test_resolve_unknown_is_not_found() {
        let registry = TemplateRegistry::new();
        assert!(matches!(
            registry.resolve("unknown"),
            Err(TemplateError::NotFound(name)) if name == "unknown"
        ));
    }

    #[test]
    fn test_reregister_identical_is_ok() {
        let mut registry = TemplateRegistry::new();
        let gen = generator("web", 80);
        registry.register("web", gen.clone()).unwrap();
        registry.register("web", gen).unwrap();
        registry.register("web", generator("web", 80)).unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_different_generator_conflicts() {
        let mut registry = TemplateRegistry::new();
        registry.register("web", generator("web", 80)).unwrap();
        let err = registry.register("web", generator("web", 8080)).unwrap_err();
        assert!(matches!(err, TemplateError::Conflict(name) if name == "web"));
    }

    struct PortGenerator {
        port: u16,
    }

    impl TemplateGenerator for PortGenerator {
        fn metadata(&self) -> TemplateMetadata {
            TemplateMetadata::new("web", "web")
        }

        fn generate(&self, _schema: &Schema, _ctx: &GeneratorContext<'_>) -> TemplateResult<Template> {
            Ok(Template::new().with_domain(DomainSpec::new("web.traefik.me", self.port, "web")))
        }
    }

    #[test]
    fn test_register_same_type_without_fingerprint_conflicts() {
        let mut registry = TemplateRegistry::new();
        let first: Arc<dyn TemplateGenerator> = Arc::new(PortGenerator { port: 80 });
        registry.register("web", first.clone()).unwrap();
        registry.register("web", first.clone()).unwrap();

        let err = registry
            .register("web", Arc::new(PortGenerator { port: 8080 }))
            .unwrap_err();
        assert!(matches!(err, TemplateError::Conflict(name) if name == "web"));
        // Equal configuration is still a different instance without a fingerprint.
        assert!(registry.register("web", Arc::new(PortGenerator { port: 80 })).is_err());
        assert!(Arc::ptr_eq(&registry.resolve("web").unwrap(), &first));
    }

    #[test]
    fn test_generate_rejects_invalid_output() {
        let mut registry = TemplateRegistry::new();
        registry.register("broken", generator("broken", 0)).unwrap();

        let config = GeneratorConfig::default();
        let random = SeededRandom::new(1);
        let ctx = GeneratorContext::new(&config, &random);
        let err = registry.generate("broken", &Schema::new("p"), &ctx).unwrap_err();
        assert!(matches!(err, TemplateError::InvalidTemplate { .. }));
    }

    #[test]
    fn test_generate_rejects_catastrophic_schema() {
        let registry = TemplateRegistry::builtin();
        let config = GeneratorConfig::default();
        let random = SeededRandom::new(1);
        let ctx = GeneratorContext::new(&config, &random);
        let err = registry
            .generate("ghost", &Schema::new("a\u{0}b"), &ctx)
            .unwrap_err();
        assert!(matches!(err, TemplateError::InvalidInput { .. }));
    }

    #[test]
    fn test_builtin_names_are_sorted_and_listed() {
        let registry = TemplateRegistry::builtin();
        let names = registry.names();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
        assert_eq!(registry.list().len(), registry.len());
        assert!(registry.contains("ghost"));
    }

    #[test]
    fn test_by_tag() {
        let registry = TemplateRegistry::builtin();
        let analytics: Vec<String> = registry
            .by_tag("analytics")
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(analytics, vec!["plausible", "umami"]);
    }

    #[test]
    fn test_global_registry_has_builtins() {
        assert!(global().contains("wordpress"));
        assert!(matches!(
            init_global(TemplateRegistry::new()),
            Err(TemplateError::AlreadyInitialized)
        ));
    }
}
