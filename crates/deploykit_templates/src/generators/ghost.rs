//! Ghost publishing platform.

use crate::context::GeneratorContext;
use crate::error::TemplateResult;
use crate::manifest::{DomainSpec, Schema, Template, TemplateMetadata};
use crate::registry::TemplateGenerator;

/// Port Ghost listens on inside its container.
pub const GHOST_PORT: u16 = 2368;

/// Single-service Ghost install.
///
/// `HASH` carries the project identifier so the compose file can suffix its
/// container and network names with it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ghost;

impl TemplateGenerator for Ghost {
    fn metadata(&self) -> TemplateMetadata {
        TemplateMetadata::new("ghost", "Ghost")
            .version("5.0.0")
            .description(
                "Ghost is a free and open source, professional publishing platform built on a modern Node.js technology stack.",
            )
            .logo("ghost.jpeg")
            .links(
                "https://github.com/TryGhost/Ghost",
                "https://ghost.org/",
                "https://ghost.org/docs/",
            )
            .tags(&["cms"])
    }

    fn generate(&self, schema: &Schema, ctx: &GeneratorContext<'_>) -> TemplateResult<Template> {
        let main_domain = ctx.domain(schema).host();
        let hash = ctx.hash(schema);

        Ok(Template::new()
            .with_domain(DomainSpec::new(&main_domain, GHOST_PORT, "ghost"))
            .with_env("GHOST_HOST", &main_domain)
            .with_env("GHOST_PORT", GHOST_PORT)
            .with_env("HASH", hash))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::identity::{derive_hash, is_valid_hostname};
    use crate::random::SeededRandom;

    fn generate(name: &str, seed: u64) -> Template {
        let config = GeneratorConfig::default();
        let random = SeededRandom::new(seed);
        Ghost
            .generate(&Schema::new(name), &GeneratorContext::new(&config, &random))
            .unwrap()
    }

    fn entries<'a>(template: &'a Template, key: &str) -> Vec<&'a str> {
        let prefix = format!("{}=", key);
        template
            .envs
            .iter()
            .filter_map(|line| line.strip_prefix(prefix.as_str()))
            .collect()
    }

    #[test]
    fn test_ghost_envs() {
        let template = generate("My Blog!!", 1);

        assert_eq!(entries(&template, "GHOST_PORT"), vec!["2368"]);

        let hosts = entries(&template, "GHOST_HOST");
        assert_eq!(hosts.len(), 1);
        assert!(is_valid_hostname(hosts[0]));
        assert_eq!(template.domains[0].host, hosts[0]);

        let hashes = entries(&template, "HASH");
        assert_eq!(hashes, vec![derive_hash("My Blog!!").as_str()]);
    }

    #[test]
    fn test_ghost_hash_follows_project_name() {
        let a = generate("My Blog!!", 1);
        let b = generate("My Blog!!", 2);
        let c = generate("Other Blog", 1);

        assert_eq!(a.env("HASH"), b.env("HASH"));
        assert_ne!(a.env("HASH"), c.env("HASH"));
    }

    #[test]
    fn test_ghost_domain() {
        let template = generate("blog", 3);
        assert_eq!(template.domains.len(), 1);
        assert_eq!(template.domains[0].port, GHOST_PORT);
        assert_eq!(template.domains[0].service_name, "ghost");
        assert!(template.mounts.is_none());
    }
}
