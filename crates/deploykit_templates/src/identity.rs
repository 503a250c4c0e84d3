//! Identifier derivation.
//!
//! Turns a project's identity into short, stable tokens and routable
//! hostnames. Everything here is total: any input, including an empty or
//! entirely non-alphanumeric project name, yields a well-formed result.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::GeneratorConfig;
use crate::manifest::Schema;
use crate::random::{random_token, RandomSource, LOWER_ALNUM};

/// Label used when a project name has nothing usable in it.
pub const DEFAULT_LABEL: &str = "app";

/// Maximum length of a single DNS label.
pub const MAX_LABEL_LEN: usize = 63;

/// Maximum length of a full hostname.
pub const MAX_HOSTNAME_LEN: usize = 253;

/// Token length of [`derive_hash`].
pub const DEFAULT_HASH_LENGTH: usize = 8;

/// Deterministic token derived from a seed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Derive the default-length identifier for `seed`.
pub fn derive_hash(seed: &str) -> Identifier {
    derive_hash_with_length(seed, DEFAULT_HASH_LENGTH)
}

/// Derive an identifier of exactly `length` lowercase alphanumerics.
///
/// The token is SHA-256 output mapped onto `[a-z0-9]`. Tokens longer than
/// one digest can supply are extended with further counter blocks.
pub fn derive_hash_with_length(seed: &str, length: usize) -> Identifier {
    let length = length.max(1);
    let width = LOWER_ALNUM.len();
    let limit = 256 - (256 % width);
    let mut token = String::with_capacity(length);
    let mut block: u32 = 0;

    while token.len() < length {
        let mut hasher = Sha256::new();
        hasher.update((seed.len() as u64).to_be_bytes());
        hasher.update(seed.as_bytes());
        hasher.update(block.to_be_bytes());
        let digest = hasher.finalize();

        for &byte in digest.iter() {
            if (byte as usize) < limit {
                token.push(LOWER_ALNUM[byte as usize % width] as char);
                if token.len() == length {
                    break;
                }
            }
        }
        block = block.wrapping_add(1);
    }

    Identifier(token)
}

/// Lowercase `input`, keep ASCII alphanumerics and collapse every other run
/// of characters into a single hyphen.
///
/// The result never starts or ends with a hyphen and may be empty.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_hyphen = false;

    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Trim a candidate label into a valid DNS label, or the default label.
pub fn fit_label(candidate: &str, max_len: usize) -> String {
    let max_len = max_len.clamp(1, MAX_LABEL_LEN);
    let slug = slugify(candidate);
    let truncated: String = slug.chars().take(max_len).collect();
    let trimmed = truncated.trim_end_matches('-');
    if trimmed.is_empty() {
        DEFAULT_LABEL.to_string()
    } else {
        trimmed.to_string()
    }
}

fn dns_label_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?$").expect("DNS label pattern compiles")
    })
}

/// Whether `label` is a lowercase DNS label.
pub fn is_valid_dns_label(label: &str) -> bool {
    dns_label_pattern().is_match(label)
}

/// Whether `host` is a dot-separated sequence of valid DNS labels.
pub fn is_valid_hostname(host: &str) -> bool {
    !host.is_empty() && host.len() <= MAX_HOSTNAME_LEN && host.split('.').all(is_valid_dns_label)
}

/// A hostname built for a template installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedDomain {
    label: String,
    base_domain: String,
}

impl GeneratedDomain {
    /// The generated leftmost label; always a valid DNS label.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn base_domain(&self) -> &str {
        &self.base_domain
    }

    /// Full hostname, `label.base_domain`.
    pub fn host(&self) -> String {
        if self.base_domain.is_empty() {
            self.label.clone()
        } else {
            format!("{}.{}", self.label, self.base_domain)
        }
    }
}

impl fmt::Display for GeneratedDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.base_domain.is_empty() {
            f.write_str(&self.label)
        } else {
            write!(f, "{}.{}", self.label, self.base_domain)
        }
    }
}

/// Build a routable hostname for `schema`.
///
/// The label is `<project>-<random>[-<server-ip>]`. It stays within the
/// 63-character label limit and leaves room for the base domain under the
/// 253-character hostname limit. The random part always survives. The
/// server IP is cut only when it would crowd out the project part, which
/// absorbs any remaining shortening.
pub fn derive_domain(
    schema: &Schema,
    random: &dyn RandomSource,
    config: &GeneratorConfig,
) -> GeneratedDomain {
    let label_budget = if config.base_domain.is_empty() {
        MAX_LABEL_LEN
    } else {
        MAX_LABEL_LEN.min(MAX_HOSTNAME_LEN.saturating_sub(config.base_domain.len() + 1))
    }
    .max(1);

    let random_len = config.random_label_length.clamp(1, 16).min(label_budget);
    let mut suffix = random_token(random, random_len);

    // One project character plus two hyphens must still fit.
    let ip_budget = label_budget.saturating_sub(random_len + 3);
    if let Some(ip) = schema.server_ip().map(slugify).filter(|_| ip_budget > 0) {
        let ip: String = ip.chars().take(ip_budget).collect();
        let ip = ip.trim_end_matches('-');
        if !ip.is_empty() {
            suffix.push('-');
            suffix.push_str(ip);
        }
    }

    let label = if suffix.len() + 2 <= label_budget {
        let prefix = fit_label(schema.project_name(), label_budget - suffix.len() - 1);
        format!("{}-{}", prefix, suffix)
    } else {
        fit_label(&suffix, label_budget)
    };

    GeneratedDomain {
        label,
        base_domain: config.base_domain.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SeededRandom;

    #[test]
    fn test_derive_hash_deterministic() {
        assert_eq!(derive_hash("My Blog!!"), derive_hash("My Blog!!"));
        assert_eq!(derive_hash("x").as_str().len(), DEFAULT_HASH_LENGTH);
    }

    #[test]
    fn test_derive_hash_distinct_seeds() {
        let seeds = ["blog", "blog ", "Blog", "shop", "", "a", "b"];
        for (i, a) in seeds.iter().enumerate() {
            for b in &seeds[i + 1..] {
                assert_ne!(derive_hash(a), derive_hash(b), "{:?} vs {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_derive_hash_does_not_leak_seed() {
        let token = derive_hash("secretproject");
        assert!(!token.as_str().contains("secret"));
        assert!(token.as_str().bytes().all(|b| LOWER_ALNUM.contains(&b)));
    }

    #[test]
    fn test_derive_hash_long_tokens_extend() {
        let long = derive_hash_with_length("blog", 100);
        assert_eq!(long.as_str().len(), 100);
        assert!(long.as_str().starts_with(derive_hash_with_length("blog", 8).as_str()));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("My Blog!!"), "my-blog");
        assert_eq!(slugify("--Hello__World--"), "hello-world");
        assert_eq!(slugify("127.0.0.1"), "127-0-0-1");
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify("café"), "caf");
    }

    #[test]
    fn test_fit_label_fallback_and_truncation() {
        assert_eq!(fit_label("", MAX_LABEL_LEN), DEFAULT_LABEL);
        assert_eq!(fit_label("???", MAX_LABEL_LEN), DEFAULT_LABEL);
        assert_eq!(fit_label("ab-cd", 3), "ab");
        assert_eq!(fit_label(&"x".repeat(200), MAX_LABEL_LEN).len(), MAX_LABEL_LEN);
    }

    #[test]
    fn test_dns_label_validation() {
        assert!(is_valid_dns_label("a"));
        assert!(is_valid_dns_label("my-blog-1a2b3c"));
        assert!(!is_valid_dns_label("-a"));
        assert!(!is_valid_dns_label("a-"));
        assert!(!is_valid_dns_label("A"));
        assert!(!is_valid_dns_label(&"a".repeat(64)));
        assert!(is_valid_hostname("blog-abc123.traefik.me"));
        assert!(!is_valid_hostname("blog..traefik.me"));
    }

    #[test]
    fn test_derive_domain_shape() {
        let config = GeneratorConfig::default();
        let schema = Schema::new("My Blog!!").with_server_ip("127.0.0.1");
        let domain = derive_domain(&schema, &SeededRandom::new(1), &config);

        assert!(is_valid_dns_label(domain.label()));
        assert!(domain.label().starts_with("my-blog-"));
        assert!(domain.label().ends_with("-127-0-0-1"));
        assert!(domain.host().ends_with(".traefik.me"));
        assert_eq!(domain.to_string(), domain.host());
    }

    #[test]
    fn test_derive_domain_hostile_names() {
        let config = GeneratorConfig::default();
        let random = SeededRandom::new(3);
        let names = [
            String::new(),
            "!!!".to_string(),
            "-".repeat(80),
            "Ünïcødé ☃".to_string(),
            "a".repeat(500),
            "UPPER_case.dots/and/slashes".to_string(),
        ];
        for name in names {
            let schema = Schema::new(name.clone()).with_server_ip("2001:db8::ff00:42:8329");
            let domain = derive_domain(&schema, &random, &config);
            assert!(is_valid_dns_label(domain.label()), "{:?} -> {}", name, domain.label());
            assert!(is_valid_hostname(&domain.host()));
        }
    }

    #[test]
    fn test_derive_domain_long_server_ip_keeps_random_part() {
        let config = GeneratorConfig::default();
        let ip = "fe80:0000:0000:0000:0202:b3ff:fe1e:8329%eth0-with-a-very-long-zone-identifier";
        let schema = Schema::new("shop").with_server_ip(ip);

        let domain = derive_domain(&schema, &SeededRandom::new(9), &config);
        let token = random_token(&SeededRandom::new(9), config.random_label_length);

        assert!(is_valid_dns_label(domain.label()), "{}", domain.label());
        assert!(domain.label().starts_with('s'));
        assert!(domain.label().contains(&format!("-{}-fe80-", token)));
    }

    #[test]
    fn test_derive_domain_respects_hostname_limit() {
        // Built directly, so no validation caps the base domain.
        let config = GeneratorConfig {
            base_domain: vec!["b".repeat(49); 4].join("."),
            ..GeneratorConfig::default()
        };
        let schema = Schema::new("a".repeat(100)).with_server_ip("203.0.113.42");

        let domain = derive_domain(&schema, &SeededRandom::new(2), &config);
        assert_eq!(domain.host().len(), MAX_HOSTNAME_LEN);
        assert!(is_valid_hostname(&domain.host()), "{}", domain.host());
        assert!(domain.label().ends_with("-203-0-113-42"));
    }

    #[test]
    fn test_derive_domain_seeded_is_reproducible() {
        let config = GeneratorConfig::default();
        let schema = Schema::new("shop");
        let a = derive_domain(&schema, &SeededRandom::new(5), &config);
        let b = derive_domain(&schema, &SeededRandom::new(5), &config);
        assert_eq!(a, b);
    }
}
