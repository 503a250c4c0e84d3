//! Grafana dashboards.

use crate::context::GeneratorContext;
use crate::error::TemplateResult;
use crate::manifest::{DomainSpec, Schema, Template, TemplateMetadata};
use crate::registry::TemplateGenerator;

#[derive(Debug, Clone, Copy, Default)]
pub struct Grafana;

impl TemplateGenerator for Grafana {
    fn metadata(&self) -> TemplateMetadata {
        TemplateMetadata::new("grafana", "Grafana")
            .version("9.5.20")
            .description("Grafana is an open source platform for data visualization and monitoring.")
            .logo("grafana.svg")
            .links(
                "https://github.com/grafana/grafana",
                "https://grafana.com/",
                "https://grafana.com/docs/",
            )
            .tags(&["monitoring"])
    }

    fn generate(&self, schema: &Schema, ctx: &GeneratorContext<'_>) -> TemplateResult<Template> {
        let main_domain = ctx.domain(schema).host();
        Ok(Template::new()
            .with_domain(DomainSpec::new(&main_domain, 3000, "grafana"))
            .with_env("GF_SERVER_ROOT_URL", format!("http://{}", main_domain))
            .with_env("GF_SECURITY_ADMIN_PASSWORD", ctx.password(24)))
    }
}
