//! Appsmith internal tool builder.

use crate::context::GeneratorContext;
use crate::error::TemplateResult;
use crate::manifest::{DomainSpec, Schema, Template, TemplateMetadata};
use crate::registry::TemplateGenerator;

#[derive(Debug, Clone, Copy, Default)]
pub struct Appsmith;

impl TemplateGenerator for Appsmith {
    fn metadata(&self) -> TemplateMetadata {
        TemplateMetadata::new("appsmith", "Appsmith")
            .version("v1.29")
            .description(
                "Appsmith is a free and open source platform for building internal tools and applications.",
            )
            .logo("appsmith.png")
            .links(
                "https://github.com/appsmithorg/appsmith",
                "https://appsmith.com/",
                "https://docs.appsmith.com/",
            )
            .tags(&["cms"])
    }

    fn generate(&self, schema: &Schema, ctx: &GeneratorContext<'_>) -> TemplateResult<Template> {
        let main_domain = ctx.domain(schema).host();
        Ok(Template::new().with_domain(DomainSpec::new(main_domain, 80, "appsmith")))
    }
}
