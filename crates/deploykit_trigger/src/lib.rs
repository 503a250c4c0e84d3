//! # deploykit_trigger
//!
//! Deploy-trigger gate for push webhooks.
//!
//! Projects may restrict automatic deployments to pushes touching certain
//! paths. This crate provides:
//!
//! - **Watch patterns**: a small, documented glob grammar
//! - **Deploy gate**: the decision, with the reason behind it
//! - **Push events**: branch, commit and changed files from GitHub, GitLab,
//!   Gitea and Bitbucket payloads
//!
//! ## Example
//!
//! ```rust
//! use deploykit_trigger::{should_deploy, DeployGate};
//!
//! assert!(should_deploy(Some(&["src/**"][..]), &["src/main.rs"]));
//!
//! let gate = DeployGate::new(&["docs/*"]);
//! let decision = gate.evaluate(Some(&["src/main.rs"][..]));
//! assert!(!decision.deploy);
//! ```

pub mod error;
pub mod gate;
pub mod glob;
pub mod webhook;

pub use error::{TriggerError, TriggerResult};
pub use gate::{should_deploy, DeployDecision, DeployGate, DeployReason};
pub use glob::WatchPattern;
pub use webhook::{is_ping, GitProvider, PushEvent};
