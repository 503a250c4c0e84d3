//! Excalidraw whiteboard.

use crate::context::GeneratorContext;
use crate::error::TemplateResult;
use crate::manifest::{DomainSpec, Schema, Template, TemplateMetadata};
use crate::registry::TemplateGenerator;

#[derive(Debug, Clone, Copy, Default)]
pub struct Excalidraw;

impl TemplateGenerator for Excalidraw {
    fn metadata(&self) -> TemplateMetadata {
        TemplateMetadata::new("excalidraw", "Excalidraw")
            .description(
                "Excalidraw is a free and open source online diagramming tool that lets you easily create and share beautiful diagrams.",
            )
            .logo("excalidraw.jpg")
            .links(
                "https://github.com/excalidraw/excalidraw",
                "https://excalidraw.com/",
                "https://docs.excalidraw.com/",
            )
            .tags(&["drawing"])
    }

    fn generate(&self, schema: &Schema, ctx: &GeneratorContext<'_>) -> TemplateResult<Template> {
        let main_domain = ctx.domain(schema).host();
        Ok(Template::new().with_domain(DomainSpec::new(main_domain, 80, "excalidraw")))
    }
}
