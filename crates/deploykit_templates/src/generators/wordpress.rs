//! WordPress.

use crate::context::GeneratorContext;
use crate::error::TemplateResult;
use crate::manifest::{DomainSpec, Schema, Template, TemplateMetadata};
use crate::registry::TemplateGenerator;

#[derive(Debug, Clone, Copy, Default)]
pub struct Wordpress;

impl TemplateGenerator for Wordpress {
    fn metadata(&self) -> TemplateMetadata {
        TemplateMetadata::new("wordpress", "Wordpress")
            .version("5.8.3")
            .description(
                "Wordpress is a free and open source content management system (CMS) for publishing and managing websites.",
            )
            .logo("wordpress.png")
            .links(
                "https://github.com/WordPress/WordPress",
                "https://wordpress.org/",
                "https://wordpress.org/documentation/",
            )
            .tags(&["cms"])
    }

    fn generate(&self, schema: &Schema, ctx: &GeneratorContext<'_>) -> TemplateResult<Template> {
        let main_domain = ctx.domain(schema).host();
        Ok(Template::new().with_domain(DomainSpec::new(main_domain, 80, "wordpress")))
    }
}
