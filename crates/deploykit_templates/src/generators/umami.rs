//! Umami web analytics.

use crate::context::GeneratorContext;
use crate::error::TemplateResult;
use crate::manifest::{DomainSpec, Schema, Template, TemplateMetadata};
use crate::registry::TemplateGenerator;

#[derive(Debug, Clone, Copy, Default)]
pub struct Umami;

impl TemplateGenerator for Umami {
    fn metadata(&self) -> TemplateMetadata {
        TemplateMetadata::new("umami", "Umami")
            .version("v2.14.0")
            .description("Umami is a simple, fast, privacy-focused alternative to Google Analytics.")
            .logo("umami.png")
            .links(
                "https://github.com/umami-software/umami",
                "https://umami.is",
                "https://umami.is/docs",
            )
            .tags(&["analytics"])
    }

    fn generate(&self, schema: &Schema, ctx: &GeneratorContext<'_>) -> TemplateResult<Template> {
        let main_domain = ctx.domain(schema).host();
        let hash = ctx.hash(schema);

        Ok(Template::new()
            .with_domain(DomainSpec::new(main_domain, 3000, "umami"))
            .with_env("HASH", hash)
            .with_env("APP_SECRET", ctx.password(32)))
    }
}
