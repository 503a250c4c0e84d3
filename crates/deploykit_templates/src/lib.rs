//! # deploykit_templates
//!
//! Template resolution for one-click application installs.
//!
//! A template generator turns a project description ([`Schema`]) into a
//! deployment manifest fragment ([`Template`]): environment variables,
//! routable domains and file mounts. This crate provides:
//!
//! - Stable identifiers and collision-resistant hostnames
//! - A registry of generators keyed by template name
//! - Built-in generators for common self-hosted applications
//! - Declarative templates loaded from `template.yaml` files
//!
//! ## Example
//!
//! ```rust,no_run
//! use deploykit_templates::{
//!     GeneratorConfig, GeneratorContext, Schema, TemplateLoader, TemplateRegistry, ThreadRandom,
//! };
//!
//! let mut registry = TemplateRegistry::builtin();
//! TemplateLoader::new("templates").register_all(&mut registry).unwrap();
//!
//! let config = GeneratorConfig::default();
//! let ctx = GeneratorContext::new(&config, &ThreadRandom);
//! let schema = Schema::new("my-blog").with_server_ip("203.0.113.7");
//!
//! let template = registry.generate("ghost", &schema, &ctx).unwrap();
//! println!("{}", serde_json::to_string_pretty(&template).unwrap());
//! ```

pub mod config;
pub mod context;
pub mod declarative;
pub mod error;
pub mod generators;
pub mod identity;
pub mod loader;
pub mod manifest;
pub mod processor;
pub mod random;
pub mod registry;

pub use config::GeneratorConfig;
pub use context::GeneratorContext;
pub use declarative::{DeclarativeGenerator, DeclarativeTemplate, EnvTemplate};
pub use error::{TemplateError, TemplateResult};
pub use identity::{
    derive_domain, derive_hash, derive_hash_with_length, is_valid_dns_label, is_valid_hostname,
    GeneratedDomain, Identifier,
};
pub use loader::TemplateLoader;
pub use manifest::{DomainSpec, MountSpec, Schema, Template, TemplateLinks, TemplateMetadata};
pub use processor::process_template;
pub use random::{RandomSource, SeededRandom, ThreadRandom};
pub use registry::{global, init_global, TemplateGenerator, TemplateRegistry};
