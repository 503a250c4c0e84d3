//! Plausible analytics with its ClickHouse event store.

use crate::context::GeneratorContext;
use crate::error::TemplateResult;
use crate::manifest::{DomainSpec, MountSpec, Schema, Template, TemplateMetadata};
use crate::registry::TemplateGenerator;

pub const PLAUSIBLE_PORT: u16 = 8000;

const CLICKHOUSE_CONFIG: &str = r#"<clickhouse>
    <logger>
        <level>warning</level>
        <console>true</console>
    </logger>

    <!-- Stop all the unnecessary logging -->
    <query_thread_log remove="remove"/>
    <query_log remove="remove"/>
    <text_log remove="remove"/>
    <trace_log remove="remove"/>
    <metric_log remove="remove"/>
    <asynchronous_metric_log remove="remove"/>
    <session_log remove="remove"/>
    <part_log remove="remove"/>
</clickhouse>
"#;

const CLICKHOUSE_USER_CONFIG: &str = r#"<clickhouse>
    <profiles>
        <default>
            <log_queries>0</log_queries>
            <log_query_threads>0</log_query_threads>
        </default>
    </profiles>
</clickhouse>
"#;

/// Plausible plus ClickHouse.
///
/// Secrets come from the context's random source. The two ClickHouse files
/// silence the event store's internal logging.
#[derive(Debug, Clone, Copy, Default)]
pub struct Plausible;

impl TemplateGenerator for Plausible {
    fn metadata(&self) -> TemplateMetadata {
        TemplateMetadata::new("plausible", "Plausible")
            .version("v2.1.0")
            .description(
                "Plausible is a open source, self-hosted web analytics platform that lets you track website traffic and user behavior.",
            )
            .logo("plausible.svg")
            .links(
                "https://github.com/plausible/plausible",
                "https://plausible.io/",
                "https://plausible.io/docs",
            )
            .tags(&["analytics"])
    }

    fn generate(&self, schema: &Schema, ctx: &GeneratorContext<'_>) -> TemplateResult<Template> {
        let main_domain = ctx.domain(schema).host();
        let hash = ctx.hash(schema);

        Ok(Template::new()
            .with_domain(DomainSpec::new(&main_domain, PLAUSIBLE_PORT, "plausible"))
            .with_env("BASE_URL", format!("http://{}", main_domain))
            .with_env("SECRET_KEY_BASE", ctx.password(64))
            .with_env("TOTP_VAULT_KEY", ctx.password(32))
            .with_env("HASH", hash)
            .with_mount(MountSpec::new(
                "/clickhouse/clickhouse-config.xml",
                CLICKHOUSE_CONFIG,
            ))
            .with_mount(MountSpec::new(
                "/clickhouse/clickhouse-user-config.xml",
                CLICKHOUSE_USER_CONFIG,
            )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::random::SeededRandom;

    #[test]
    fn test_plausible_manifest() {
        let config = GeneratorConfig::default();
        let random = SeededRandom::new(8);
        let template = Plausible
            .generate(&Schema::new("stats"), &GeneratorContext::new(&config, &random))
            .unwrap();

        let base_url = template.env("BASE_URL").unwrap();
        assert_eq!(base_url, format!("http://{}", template.domains[0].host));
        assert_eq!(template.env("SECRET_KEY_BASE").unwrap().len(), 64);
        assert_eq!(template.env("TOTP_VAULT_KEY").unwrap().len(), 32);
        assert_eq!(template.mounts().len(), 2);
        assert!(template.mounts()[0].content.contains("<clickhouse>"));
    }
}
