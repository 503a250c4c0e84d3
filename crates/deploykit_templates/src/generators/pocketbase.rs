//! PocketBase backend.

use crate::context::GeneratorContext;
use crate::error::TemplateResult;
use crate::manifest::{DomainSpec, Schema, Template, TemplateMetadata};
use crate::registry::TemplateGenerator;

#[derive(Debug, Clone, Copy, Default)]
pub struct Pocketbase;

impl TemplateGenerator for Pocketbase {
    fn metadata(&self) -> TemplateMetadata {
        TemplateMetadata::new("pocketbase", "Pocketbase")
            .version("v0.22.12")
            .description(
                "Pocketbase is a self-hosted alternative to Firebase that allows you to build and host your own backend services.",
            )
            .logo("pocketbase.svg")
            .links(
                "https://github.com/pocketbase/pocketbase",
                "https://pocketbase.io/",
                "https://pocketbase.io/docs/",
            )
            .tags(&["database", "cms", "headless"])
    }

    fn generate(&self, schema: &Schema, ctx: &GeneratorContext<'_>) -> TemplateResult<Template> {
        let main_domain = ctx.domain(schema).host();
        Ok(Template::new().with_domain(DomainSpec::new(main_domain, 80, "pocketbase")))
    }
}
