//! Push event extraction for Git hosting webhooks.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{TriggerError, TriggerResult};

/// Git hosting provider that sent a webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GitProvider {
    GitHub,
    GitLab,
    Gitea,
    Bitbucket,
}

impl GitProvider {
    /// Detect the provider from request headers.
    ///
    /// Header names are compared case-insensitively. Gitea also sends the
    /// GitHub event header, so its own header is checked first.
    pub fn from_headers<I, K, V>(headers: I) -> Option<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut found = None;
        for (name, value) in headers {
            let provider = match name.as_ref().to_ascii_lowercase().as_str() {
                "x-gitea-event" => Some(GitProvider::Gitea),
                "x-github-event" => Some(GitProvider::GitHub),
                "x-gitlab-event" => Some(GitProvider::GitLab),
                "x-event-key" if value.as_ref().contains("repo:push") => {
                    Some(GitProvider::Bitbucket)
                }
                _ => None,
            };
            found = match (found, provider) {
                (Some(GitProvider::Gitea), _) => Some(GitProvider::Gitea),
                (current, None) => current,
                (_, next) => next,
            };
        }
        found
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GitProvider::GitHub => "github",
            GitProvider::GitLab => "gitlab",
            GitProvider::Gitea => "gitea",
            GitProvider::Bitbucket => "bitbucket",
        }
    }
}

impl fmt::Display for GitProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GitProvider {
    type Err = TriggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "github" => Ok(GitProvider::GitHub),
            "gitlab" => Ok(GitProvider::GitLab),
            "gitea" => Ok(GitProvider::Gitea),
            "bitbucket" => Ok(GitProvider::Bitbucket),
            _ => Err(TriggerError::UnknownProvider),
        }
    }
}

/// Whether the headers describe a GitHub `ping` delivery.
pub fn is_ping<I, K, V>(headers: I) -> bool
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    headers.into_iter().any(|(name, value)| {
        name.as_ref().eq_ignore_ascii_case("x-github-event") && value.as_ref() == "ping"
    })
}

/// The parts of a push event the deploy pipeline cares about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushEvent {
    pub provider: GitProvider,
    pub branch: Option<String>,
    pub commit_hash: Option<String>,
    pub commit_message: Option<String>,
    /// `None` when the provider does not list files in its payload.
    pub changed_files: Option<Vec<String>>,
}

fn string_at(value: &Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Union of `added`, `modified` and `removed` over `commits[]`, in order,
/// without duplicates. `None` when the payload has no `commits` array.
fn commit_files(payload: &Value) -> Option<Vec<String>> {
    let commits = payload.get("commits")?.as_array()?;
    let mut files: Vec<String> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for commit in commits {
        for key in ["added", "modified", "removed"] {
            let Some(list) = commit.get(key).and_then(Value::as_array) else {
                continue;
            };
            for file in list.iter().filter_map(Value::as_str) {
                if seen.insert(file) {
                    files.push(file.to_string());
                }
            }
        }
    }

    Some(files)
}

impl PushEvent {
    /// Extract a push event from a decoded payload.
    pub fn from_payload(provider: GitProvider, payload: &Value) -> TriggerResult<Self> {
        if !payload.is_object() {
            return Err(TriggerError::InvalidPayload(
                "payload is not a JSON object".into(),
            ));
        }

        let branch_from_ref = || {
            string_at(payload, "/ref")
                .map(|r| r.strip_prefix("refs/heads/").map(str::to_string).unwrap_or(r))
        };

        let event = match provider {
            GitProvider::GitHub => PushEvent {
                provider,
                branch: branch_from_ref(),
                commit_hash: string_at(payload, "/head_commit/id"),
                commit_message: string_at(payload, "/head_commit/message"),
                changed_files: commit_files(payload),
            },
            GitProvider::GitLab => PushEvent {
                provider,
                branch: branch_from_ref(),
                commit_hash: string_at(payload, "/checkout_sha")
                    .or_else(|| string_at(payload, "/commits/0/id")),
                commit_message: string_at(payload, "/commits/0/message"),
                changed_files: commit_files(payload),
            },
            GitProvider::Gitea => PushEvent {
                provider,
                branch: branch_from_ref(),
                commit_hash: string_at(payload, "/after"),
                commit_message: string_at(payload, "/commits/0/message"),
                changed_files: commit_files(payload),
            },
            GitProvider::Bitbucket => PushEvent {
                provider,
                branch: string_at(payload, "/push/changes/0/new/name"),
                commit_hash: string_at(payload, "/push/changes/0/new/target/hash"),
                commit_message: string_at(payload, "/push/changes/0/new/target/message"),
                changed_files: None,
            },
        };

        debug!(
            "Parsed {} push: branch={:?} commit={:?} files={:?}",
            provider,
            event.branch,
            event.commit_hash,
            event.changed_files.as_ref().map(Vec::len)
        );
        Ok(event)
    }

    /// Decode a raw JSON body and extract the push event.
    pub fn from_slice(provider: GitProvider, body: &[u8]) -> TriggerResult<Self> {
        let payload: Value = serde_json::from_slice(body)?;
        Self::from_payload(provider, &payload)
    }

    /// Detect the provider from headers, then extract the push event.
    pub fn from_request<I, K, V>(headers: I, body: &[u8]) -> TriggerResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let provider = GitProvider::from_headers(headers).ok_or(TriggerError::UnknownProvider)?;
        Self::from_slice(provider, body)
    }

    pub fn changed_files(&self) -> Option<&[String]> {
        self.changed_files.as_deref()
    }
}
