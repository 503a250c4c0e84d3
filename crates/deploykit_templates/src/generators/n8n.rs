//! n8n workflow automation.

use crate::context::GeneratorContext;
use crate::error::TemplateResult;
use crate::manifest::{DomainSpec, Schema, Template, TemplateMetadata};
use crate::registry::TemplateGenerator;

pub const N8N_PORT: u16 = 5678;

/// Timezone applied when the schema does not carry a `timezone` entry.
pub const DEFAULT_TIMEZONE: &str = "Europe/Berlin";

#[derive(Debug, Clone, Copy, Default)]
pub struct N8n;

impl TemplateGenerator for N8n {
    fn metadata(&self) -> TemplateMetadata {
        TemplateMetadata::new("n8n", "n8n")
            .version("1.70.3")
            .description("n8n is an open source low-code platform for automating workflows and integrations.")
            .logo("n8n.png")
            .links(
                "https://github.com/n8n-io/n8n",
                "https://n8n.io/",
                "https://docs.n8n.io/",
            )
            .tags(&["automation"])
    }

    fn generate(&self, schema: &Schema, ctx: &GeneratorContext<'_>) -> TemplateResult<Template> {
        let main_domain = ctx.domain(schema).host();
        let timezone = schema
            .metadata("timezone")
            .filter(|tz| !tz.trim().is_empty() && !tz.contains(char::is_control))
            .unwrap_or(DEFAULT_TIMEZONE);

        Ok(Template::new()
            .with_domain(DomainSpec::new(&main_domain, N8N_PORT, "n8n"))
            .with_env("N8N_HOST", &main_domain)
            .with_env("N8N_PORT", N8N_PORT)
            .with_env("GENERIC_TIMEZONE", timezone))
    }
}
