//! Per-invocation generator context.

use chrono::{DateTime, Utc};

use crate::config::GeneratorConfig;
use crate::identity::{derive_domain, derive_hash_with_length, GeneratedDomain, Identifier};
use crate::manifest::Schema;
use crate::random::{generate_password, random_token, RandomSource};

/// Everything a generator may draw on besides its [`Schema`].
///
/// The context carries the configuration, the random source and the clock,
/// so a generator touches no process-wide state.
#[derive(Clone, Copy)]
pub struct GeneratorContext<'a> {
    config: &'a GeneratorConfig,
    random: &'a dyn RandomSource,
    now: DateTime<Utc>,
}

impl<'a> GeneratorContext<'a> {
    pub fn new(config: &'a GeneratorConfig, random: &'a dyn RandomSource) -> Self {
        Self {
            config,
            random,
            now: Utc::now(),
        }
    }

    /// Pin the clock used for timestamp helpers.
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        self.config
    }

    pub fn random(&self) -> &dyn RandomSource {
        self.random
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Fresh routable hostname for the schema's project.
    pub fn domain(&self, schema: &Schema) -> GeneratedDomain {
        derive_domain(schema, self.random, self.config)
    }

    /// Stable identifier for the schema's project.
    pub fn hash(&self, schema: &Schema) -> Identifier {
        derive_hash_with_length(schema.project_name(), self.config.hash_length)
    }

    pub fn password(&self, len: usize) -> String {
        generate_password(self.random, len)
    }

    pub fn token(&self, len: usize) -> String {
        random_token(self.random, len)
    }
}

impl std::fmt::Debug for GeneratorContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorContext")
            .field("config", &self.config)
            .field("now", &self.now)
            .finish()
    }
}
