//! Uptime Kuma monitoring.

use crate::context::GeneratorContext;
use crate::error::TemplateResult;
use crate::manifest::{DomainSpec, Schema, Template, TemplateMetadata};
use crate::registry::TemplateGenerator;

pub const UPTIME_KUMA_PORT: u16 = 3001;

#[derive(Debug, Clone, Copy, Default)]
pub struct UptimeKuma;

impl TemplateGenerator for UptimeKuma {
    fn metadata(&self) -> TemplateMetadata {
        TemplateMetadata::new("uptime-kuma", "Uptime Kuma")
            .version("1.23.15")
            .description(
                "Uptime Kuma is a free and open source monitoring tool that allows you to monitor your websites and applications.",
            )
            .logo("uptime-kuma.png")
            .links(
                "https://github.com/louislam/uptime-kuma",
                "https://uptime.kuma.pet/",
                "https://github.com/louislam/uptime-kuma/wiki",
            )
            .tags(&["monitoring"])
    }

    fn generate(&self, schema: &Schema, ctx: &GeneratorContext<'_>) -> TemplateResult<Template> {
        let main_domain = ctx.domain(schema).host();
        Ok(Template::new().with_domain(DomainSpec::new(
            main_domain,
            UPTIME_KUMA_PORT,
            "uptime-kuma",
        )))
    }
}
