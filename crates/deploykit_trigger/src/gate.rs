//! Deploy-trigger gate.
//!
//! Decides from a project's watch paths and the files touched by a push
//! whether an automatic deployment should run.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::glob::WatchPattern;

/// Why a [`DeployDecision`] came out the way it did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeployReason {
    /// The project has no watch paths.
    NoRestriction,
    /// The event did not say which files changed.
    UnknownChanges,
    /// `file` matched `pattern`.
    Matched { pattern: String, file: String },
    /// No changed file matched any watch path.
    NoMatch,
}

/// Outcome of a gate evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployDecision {
    pub deploy: bool,
    pub reason: DeployReason,
}

impl DeployDecision {
    pub fn deploy(reason: DeployReason) -> Self {
        Self {
            deploy: true,
            reason,
        }
    }

    pub fn skip() -> Self {
        Self {
            deploy: false,
            reason: DeployReason::NoMatch,
        }
    }

    /// One-line description for logs and CLI output.
    pub fn summary(&self) -> String {
        match &self.reason {
            DeployReason::NoRestriction => "deploy: no watch paths configured".to_string(),
            DeployReason::UnknownChanges => "deploy: changed files unknown".to_string(),
            DeployReason::Matched { pattern, file } => {
                format!("deploy: {} matches {}", file, pattern)
            }
            DeployReason::NoMatch => "skip: no changed file matches the watch paths".to_string(),
        }
    }
}

/// Compiled watch paths for one project, reusable across events.
#[derive(Debug, Clone, Default)]
pub struct DeployGate {
    patterns: Vec<WatchPattern>,
}

impl DeployGate {
    /// Compile watch paths. Blank entries are ignored.
    pub fn new<P: AsRef<str>>(watch_paths: &[P]) -> Self {
        let patterns = watch_paths
            .iter()
            .map(AsRef::as_ref)
            .filter(|p| !p.trim().is_empty())
            .map(WatchPattern::new)
            .collect();
        Self { patterns }
    }

    /// A gate for optional watch paths; `None` places no restriction.
    pub fn from_option<P: AsRef<str>>(watch_paths: Option<&[P]>) -> Self {
        watch_paths.map(Self::new).unwrap_or_default()
    }

    pub fn patterns(&self) -> &[WatchPattern] {
        &self.patterns
    }

    /// Whether every push deploys regardless of the files it touches.
    pub fn is_unrestricted(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Evaluate a push.
    ///
    /// `None` means the provider did not report changed files; such pushes
    /// deploy. An empty list is a push that touched nothing watched.
    pub fn evaluate<F: AsRef<str>>(&self, changed_files: Option<&[F]>) -> DeployDecision {
        if self.is_unrestricted() {
            debug!("No watch paths configured, deploying");
            return DeployDecision::deploy(DeployReason::NoRestriction);
        }

        let Some(files) = changed_files else {
            warn!("Changed files unknown, deploying");
            return DeployDecision::deploy(DeployReason::UnknownChanges);
        };

        for file in files.iter().map(AsRef::as_ref) {
            if let Some(pattern) = self.patterns.iter().find(|p| p.matches(file)) {
                info!("Watch path {} matched {}, deploying", pattern, file);
                return DeployDecision::deploy(DeployReason::Matched {
                    pattern: pattern.as_str().to_string(),
                    file: file.to_string(),
                });
            }
            debug!("No watch path matched {}", file);
        }

        info!(
            "None of {} changed file(s) matched {} watch path(s), skipping",
            files.len(),
            self.patterns.len()
        );
        DeployDecision::skip()
    }
}

/// Whether a push touching `modified_files` should deploy.
///
/// Absent or empty watch paths always deploy. Otherwise at least one file
/// must match at least one pattern.
pub fn should_deploy<P, F>(watch_paths: Option<&[P]>, modified_files: &[F]) -> bool
where
    P: AsRef<str>,
    F: AsRef<str>,
{
    DeployGate::from_option(watch_paths)
        .evaluate(Some(modified_files))
        .deploy
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: Option<&[&str]> = None;

    #[test]
    fn test_no_watch_paths_deploys() {
        assert!(should_deploy(NONE, &["anything"]));
        assert!(should_deploy(NONE, &[] as &[&str]));
        assert!(should_deploy(Some(&[] as &[&str]), &["anything"]));
    }

    #[test]
    fn test_blank_patterns_are_ignored() {
        let gate = DeployGate::new(&["", "  "]);
        assert!(gate.is_unrestricted());
        assert!(should_deploy(Some(&["", "src/**"][..]), &["src/a.ts"]));
        assert!(!should_deploy(Some(&["", "src/**"][..]), &["docs/a.md"]));
    }

    #[test]
    fn test_matching() {
        assert!(should_deploy(Some(&["src/**"][..]), &["src/a.ts"]));
        assert!(!should_deploy(Some(&["src/**"][..]), &["docs/readme.md"]));
        assert!(should_deploy(Some(&["src/**", "docs/*"][..]), &["docs/readme.md"]));
    }

    #[test]
    fn test_empty_change_list_skips_when_restricted() {
        assert!(!should_deploy(Some(&["src/**"][..]), &[] as &[&str]));
    }

    #[test]
    fn test_evaluate_reasons() {
        let gate = DeployGate::new(&["src/**", "docs/*"]);

        let matched = gate.evaluate(Some(&["README.md", "docs/intro.md"][..]));
        assert_eq!(
            matched,
            DeployDecision::deploy(DeployReason::Matched {
                pattern: "docs/*".into(),
                file: "docs/intro.md".into(),
            })
        );

        let unknown = gate.evaluate(None::<&[String]>);
        assert_eq!(unknown.reason, DeployReason::UnknownChanges);
        assert!(unknown.deploy);

        let skipped = gate.evaluate(Some(&["README.md"][..]));
        assert_eq!(skipped, DeployDecision::skip());
        assert!(skipped.summary().starts_with("skip"));
    }

    #[test]
    fn test_decision_serializes_with_reason_kind() {
        let json = serde_json::to_value(DeployDecision::deploy(DeployReason::NoRestriction)).unwrap();
        assert_eq!(json["deploy"], true);
        assert_eq!(json["reason"]["kind"], "no_restriction");
    }
}
