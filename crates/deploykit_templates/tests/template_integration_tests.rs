//! Integration tests for template resolution.

use std::fs;
use std::sync::Arc;

use deploykit_templates::{
    derive_hash, is_valid_dns_label, is_valid_hostname, GeneratorConfig, GeneratorContext, Schema,
    SeededRandom, Template, TemplateError, TemplateGenerator, TemplateLoader, TemplateRegistry,
};
use tempfile::tempdir;

fn generate_with(registry: &TemplateRegistry, name: &str, schema: &Schema, seed: u64) -> Template {
    let config = GeneratorConfig::default();
    let random = SeededRandom::new(seed);
    let ctx = GeneratorContext::new(&config, &random);
    registry.generate(name, schema, &ctx).unwrap()
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
fn test_ghost_end_to_end() {
    let registry = TemplateRegistry::builtin();
    let template = generate_with(&registry, "ghost", &Schema::new("My Blog!!"), 7);

    assert_eq!(entries(&template, "GHOST_PORT"), vec!["2368"]);

    let hosts = entries(&template, "GHOST_HOST");
    assert_eq!(hosts.len(), 1);
    assert!(is_valid_hostname(hosts[0]), "{}", hosts[0]);
    assert!(hosts[0].starts_with("my-blog-"));

    let hashes = entries(&template, "HASH");
    assert_eq!(hashes.len(), 1);
    assert_eq!(hashes[0], derive_hash("My Blog!!").as_str());

    let again = generate_with(&registry, "ghost", &Schema::new("My Blog!!"), 99);
    assert_eq!(entries(&again, "HASH"), hashes);

    let other = generate_with(&registry, "ghost", &Schema::new("My Shop"), 7);
    assert_ne!(entries(&other, "HASH"), hashes);
}

#[test]
fn test_every_builtin_produces_valid_labels() {
    let registry = TemplateRegistry::builtin();
    let schemas = [
        Schema::new("My Blog!!"),
        Schema::new(""),
        Schema::new("日本語のプロジェクト"),
        Schema::new("x".repeat(300)).with_server_ip("203.0.113.42"),
    ];

    for name in registry.names() {
        for (seed, schema) in schemas.iter().enumerate() {
            let template = generate_with(&registry, name, schema, seed as u64);
            for domain in &template.domains {
                let label = domain.host.split('.').next().unwrap();
                assert!(is_valid_dns_label(label), "{}: {:?}", name, domain.host);
                assert!(is_valid_hostname(&domain.host), "{}: {:?}", name, domain.host);
            }
        }
    }
}

#[test]
fn test_same_seed_gives_identical_templates() {
    let registry = TemplateRegistry::builtin();
    let schema = Schema::new("analytics").with_server_ip("10.0.0.5");

    for name in registry.names() {
        let a = serde_json::to_string(&generate_with(&registry, name, &schema, 42)).unwrap();
        let b = serde_json::to_string(&generate_with(&registry, name, &schema, 42)).unwrap();
        assert_eq!(a, b, "{} is not reproducible", name);
    }
}

#[test]
fn test_resolve_after_register_returns_same_generator() {
    let mut registry = TemplateRegistry::new();
    let ghost: Arc<dyn TemplateGenerator> = Arc::new(deploykit_templates::generators::Ghost);
    registry.register("blog", ghost.clone()).unwrap();

    assert!(Arc::ptr_eq(&registry.resolve("blog").unwrap(), &ghost));
    assert!(matches!(
        registry.resolve("unknown"),
        Err(TemplateError::NotFound(_))
    ));
}

#[test]
fn test_declarative_template_through_registry() {
    let temp = tempdir().unwrap();
    let dir = temp.path().join("plausible-lite");
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("template.yaml"),
        r#"
id: plausible-lite
name: Plausible Lite
version: v2.1.0
tags: [analytics]
variables:
  main_domain: ${domain}
  secret_base: ${password:64}
config:
  domains:
    - serviceName: plausible
      port: 8000
      host: ${main_domain}
  env:
    BASE_URL: http://${main_domain}
    SECRET_KEY_BASE: ${secret_base}
    HASH: ${hash}
    DISABLE_REGISTRATION: true
  mounts:
    - filePath: /clickhouse/logs.xml
      content: "<host>${main_domain}</host>"
"#,
    )
    .unwrap();

    let mut registry = TemplateRegistry::builtin();
    TemplateLoader::new(temp.path())
        .register_all(&mut registry)
        .unwrap();

    let ids: Vec<String> = registry
        .by_tag("analytics")
        .into_iter()
        .map(|m| m.id)
        .collect();
    assert_eq!(ids, vec!["plausible", "plausible-lite", "umami"]);

    let schema = Schema::new("stats").with_server_ip("192.168.1.10");
    let template = generate_with(&registry, "plausible-lite", &schema, 3);

    let host = &template.domains[0].host;
    assert!(host.starts_with("stats-"));
    assert!(host.ends_with("-192-168-1-10.traefik.me"));
    assert_eq!(template.env("BASE_URL"), Some(format!("http://{}", host).as_str()));
    assert_eq!(template.env("SECRET_KEY_BASE").unwrap().len(), 64);
    assert_eq!(template.env("HASH"), Some(derive_hash("stats").as_str()));
    assert_eq!(template.env("DISABLE_REGISTRATION"), Some("true"));
    assert_eq!(template.mounts()[0].content, format!("<host>{}</host>", host));

    let again = generate_with(&registry, "plausible-lite", &schema, 3);
    assert_eq!(template, again);
}

#[test]
fn test_custom_base_domain() {
    let registry = TemplateRegistry::builtin();
    let config = GeneratorConfig::default()
        .with_base_domain("apps.example.com")
        .unwrap();
    let random = SeededRandom::new(1);
    let ctx = GeneratorContext::new(&config, &random);

    let template = registry
        .generate("wordpress", &Schema::new("site"), &ctx)
        .unwrap();
    assert!(template.domains[0].host.ends_with(".apps.example.com"));
}
