//! Placeholder processing for declarative templates.
//!
//! `${name}` expands a template variable; anything else inside `${...}` is
//! a helper call, optionally with a parameter after a colon:
//!
//! | placeholder                    | expands to                                   |
//! |--------------------------------|----------------------------------------------|
//! | `${domain}`                    | a freshly generated hostname                 |
//! | `${hash}` / `${hash:N}`        | the project identifier, N characters long    |
//! | `${password}` / `${password:N}`| random alphanumerics, 16 by default          |
//! | `${uuid}`                      | random version 4 UUID                        |
//! | `${randomPort}`                | random port in `1024..=65535`                |
//! | `${username}` / `${email}`     | random account name / address                |
//! | `${base64}` / `${base64:N}`    | N random bytes in padded base64, 32 default  |
//! | `${jwt:N}`                     | N random bytes in hex                        |
//! | `${jwt}` / `${jwt:S}` / `${jwt:S:P}` | HS256 token signed with secret S, claims P |
//! | `${timestamp}` `${timestampms}`| milliseconds since the epoch                 |
//! | `${timestamps}`                | seconds since the epoch                      |
//!
//! Timestamp helpers accept a date (`2025-01-01`) or RFC 3339 parameter and
//! otherwise use the context clock. Unknown placeholders are kept verbatim.
//!
//! The JWT secret and payload name variables and fall back to the literal
//! text. Without a secret a random one is used. The payload is a JSON
//! object; `iat` and `exp` default to now and ten years on, and `iss` to
//! `dokploy`.

use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine as _;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use hmac::{Hmac, Mac};
use regex::Regex;
use serde_json::{Map, Value};
use sha2::Sha256;
use tracing::debug;

use crate::context::GeneratorContext;
use crate::declarative::{DeclarativeTemplate, EnvTemplate};
use crate::error::{TemplateError, TemplateResult};
use crate::identity::derive_hash_with_length;
use crate::manifest::{DomainSpec, MountSpec, Schema, Template};
use crate::random::random_port;

const DEFAULT_PASSWORD_LENGTH: usize = 16;
const DEFAULT_BYTE_LENGTH: usize = 32;
const MAX_GENERATED_LENGTH: usize = 1024;

const JWT_HEADER: &str = r#"{"alg":"HS256","typ":"JWT"}"#;
const JWT_ISSUER: &str = "dokploy";
const JWT_LIFETIME_SECS: i64 = 10 * 365 * 24 * 60 * 60;

type HmacSha256 = Hmac<Sha256>;

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern compiles"))
}

/// Render a scalar the way it should appear in an env line.
fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn length_param(param: Option<&str>, default: usize) -> usize {
    param
        .and_then(|p| p.trim().parse::<usize>().ok())
        .filter(|n| (1..=MAX_GENERATED_LENGTH).contains(n))
        .unwrap_or(default)
}

fn parse_instant(param: &str) -> Option<DateTime<Utc>> {
    let param = param.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(param) {
        return Some(instant.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(param, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(param, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Resolves placeholders against one template's variables.
struct Resolver<'a> {
    template_id: &'a str,
    variables: &'a BTreeMap<String, Value>,
    schema: &'a Schema,
    ctx: &'a GeneratorContext<'a>,
    resolved: HashMap<String, String>,
    in_progress: Vec<String>,
}

impl<'a> Resolver<'a> {
    fn new(
        template: &'a DeclarativeTemplate,
        schema: &'a Schema,
        ctx: &'a GeneratorContext<'a>,
    ) -> Self {
        Self {
            template_id: &template.metadata.id,
            variables: &template.variables,
            schema,
            ctx,
            resolved: HashMap::new(),
            in_progress: Vec::new(),
        }
    }

    fn render(&mut self, input: &str) -> TemplateResult<String> {
        let mut out = String::with_capacity(input.len());
        let mut last = 0;

        for caps in placeholder_pattern().captures_iter(input) {
            let (Some(whole), Some(expr)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            out.push_str(&input[last..whole.start()]);
            match self.evaluate(expr.as_str())? {
                Some(value) => out.push_str(&value),
                None => out.push_str(whole.as_str()),
            }
            last = whole.end();
        }

        out.push_str(&input[last..]);
        Ok(out)
    }

    /// Variables take precedence over helpers of the same name.
    fn evaluate(&mut self, expr: &str) -> TemplateResult<Option<String>> {
        if self.variables.contains_key(expr) {
            return self.variable(expr).map(Some);
        }

        let (helper, param) = match expr.split_once(':') {
            Some((helper, param)) => (helper, Some(param)),
            None => (expr, None),
        };

        let value = match helper {
            "domain" => Some(self.ctx.domain(self.schema).host()),
            "hash" => {
                let len = length_param(param, self.ctx.config().hash_length);
                Some(derive_hash_with_length(self.schema.project_name(), len).into_string())
            }
            "password" => Some(self.ctx.password(length_param(param, DEFAULT_PASSWORD_LENGTH))),
            "uuid" => {
                let mut bytes = [0u8; 16];
                self.ctx.random().fill_bytes(&mut bytes);
                Some(uuid::Builder::from_random_bytes(bytes).into_uuid().to_string())
            }
            "randomPort" => Some(random_port(self.ctx.random()).to_string()),
            "base64" => {
                let len = length_param(param, DEFAULT_BYTE_LENGTH);
                Some(STANDARD.encode(self.random_bytes(len)))
            }
            "jwt" => self.jwt(param)?,
            "username" => Some(format!("user-{}", self.ctx.token(8))),
            "email" => Some(format!("user-{}@example.com", self.ctx.token(8))),
            "timestamp" | "timestampms" => self.instant(param).map(|t| t.timestamp_millis().to_string()),
            "timestamps" => self.instant(param).map(|t| t.timestamp().to_string()),
            _ => None,
        };

        if value.is_none() {
            debug!("Leaving placeholder unexpanded in {}: ${{{}}}", self.template_id, expr);
        }
        Ok(value)
    }

    fn random_bytes(&self, len: usize) -> Vec<u8> {
        let mut bytes = vec![0u8; len];
        self.ctx.random().fill_bytes(&mut bytes);
        bytes
    }

    /// The resolved variable called `name`, or `name` itself.
    fn lookup(&mut self, name: &str) -> TemplateResult<String> {
        if self.variables.contains_key(name) {
            self.variable(name)
        } else {
            Ok(name.to_string())
        }
    }

    fn jwt(&mut self, param: Option<&str>) -> TemplateResult<Option<String>> {
        let param = param.unwrap_or_default();
        if (1..=3).contains(&param.len()) && param.bytes().all(|b| b.is_ascii_digit()) {
            let len = param.parse::<usize>().unwrap_or_default();
            return Ok(Some(hex::encode(self.random_bytes(len))));
        }

        let (secret, payload) = match param.split_once(':') {
            Some((secret, payload)) => (secret, Some(payload)),
            None => (param, None),
        };
        let secret = match self.lookup(secret)? {
            secret if secret.is_empty() => hex::encode(self.random_bytes(DEFAULT_BYTE_LENGTH)),
            secret => secret,
        };

        let claims = match payload.filter(|p| !p.is_empty()) {
            Some(name) => match serde_json::from_str::<Value>(&self.lookup(name)?) {
                Ok(Value::Object(claims)) => claims,
                _ => {
                    debug!("JWT payload {:?} in {} is not a JSON object", name, self.template_id);
                    return Ok(None);
                }
            },
            None => Map::new(),
        };

        let now = self.ctx.now().timestamp();
        let mut body = Map::new();
        body.insert("iat".into(), claims.get("iat").cloned().unwrap_or_else(|| now.into()));
        body.insert(
            "exp".into(),
            claims
                .get("exp")
                .cloned()
                .unwrap_or_else(|| (now + JWT_LIFETIME_SECS).into()),
        );
        for (key, value) in claims {
            body.entry(key).or_insert(value);
        }
        body.entry("iss").or_insert_with(|| JWT_ISSUER.into());

        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(JWT_HEADER),
            URL_SAFE_NO_PAD.encode(Value::Object(body).to_string())
        );
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|e| {
            TemplateError::InvalidManifest {
                template: self.template_id.to_string(),
                message: format!("invalid JWT secret: {}", e),
            }
        })?;
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(Some(format!("{}.{}", signing_input, signature)))
    }

    fn instant(&self, param: Option<&str>) -> Option<DateTime<Utc>> {
        match param {
            Some(param) => parse_instant(param),
            None => Some(self.ctx.now()),
        }
    }

    fn variable(&mut self, name: &str) -> TemplateResult<String> {
        if let Some(value) = self.resolved.get(name) {
            return Ok(value.clone());
        }
        if self.in_progress.iter().any(|n| n == name) {
            let mut chain = self.in_progress.clone();
            chain.push(name.to_string());
            return Err(TemplateError::InvalidManifest {
                template: self.template_id.to_string(),
                message: format!("variable cycle: {}", chain.join(" -> ")),
            });
        }

        let raw = self
            .variables
            .get(name)
            .map(value_to_string)
            .unwrap_or_default();

        self.in_progress.push(name.to_string());
        let rendered = self.render(&raw);
        self.in_progress.pop();

        let rendered = rendered?;
        self.resolved.insert(name.to_string(), rendered.clone());
        Ok(rendered)
    }
}

/// Expand a declarative template for one schema.
///
/// Each variable is evaluated at most once, so `${main_domain}` names the
/// same host everywhere it appears.
pub fn process_template(
    template: &DeclarativeTemplate,
    schema: &Schema,
    ctx: &GeneratorContext<'_>,
) -> TemplateResult<Template> {
    let mut resolver = Resolver::new(template, schema, ctx);
    let mut out = Template::new();

    for domain in &template.config.domains {
        let host = match &domain.host {
            Some(host) => resolver.render(host)?,
            None => ctx.domain(schema).host(),
        };
        out = out.with_domain(DomainSpec::new(host, domain.port, &domain.service_name));
    }

    match &template.config.env {
        EnvTemplate::List(lines) => {
            for line in lines {
                out.envs.push(resolver.render(line)?);
            }
        }
        EnvTemplate::Map(entries) => {
            for (key, value) in entries {
                let value = resolver.render(&value_to_string(value))?;
                out = out.with_env(key, value);
            }
        }
    }

    for mount in &template.config.mounts {
        out = out.with_mount(MountSpec::new(
            resolver.render(&mount.file_path)?,
            resolver.render(&mount.content)?,
        ));
    }

    Ok(out)
}
