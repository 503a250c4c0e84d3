//! Integration tests for the deploy gate.

use deploykit_trigger::{should_deploy, DeployGate, DeployReason, GitProvider, PushEvent};

#[test]
fn test_absent_or_empty_watch_paths_always_deploy() {
    let files = ["anything/at/all.txt"];
    assert!(should_deploy(None::<&[&str]>, &files));
    assert!(should_deploy(Some(&[] as &[&str]), &files));
}

#[test]
fn test_documented_examples() {
    assert!(should_deploy(Some(&["src/**"][..]), &["src/a.ts"]));
    assert!(!should_deploy(Some(&["src/**"][..]), &["docs/readme.md"]));
    assert!(should_deploy(
        Some(&["src/**", "docs/*"][..]),
        &["docs/readme.md"]
    ));
}

#[test]
fn test_owned_strings() {
    let watch: Vec<String> = vec!["apps/api/**".to_string()];
    let files: Vec<String> = vec!["apps/web/index.ts".to_string(), "apps/api/main.rs".to_string()];
    assert!(should_deploy(Some(watch.as_slice()), &files));
}

#[test]
fn test_gate_is_reusable_and_thread_safe() {
    let gate = DeployGate::new(&["services/billing/**"]);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let gate = &gate;
                scope.spawn(move || {
                    let file = if i % 2 == 0 {
                        "services/billing/invoice.rs"
                    } else {
                        "services/auth/login.rs"
                    };
                    gate.evaluate(Some(&[file][..])).deploy
                })
            })
            .collect();

        let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results, vec![true, false, true, false]);
    });
}

#[test]
fn test_webhook_to_decision() {
    let body = br#"{
        "ref": "refs/heads/main",
        "head_commit": { "id": "0123abcd", "message": "Update docs" },
        "commits": [{ "added": [], "modified": ["docs/guide.md"], "removed": [] }]
    }"#;
    let headers = [("X-GitHub-Event", "push"), ("Content-Type", "application/json")];

    let event = PushEvent::from_request(headers, body).unwrap();
    assert_eq!(event.provider, GitProvider::GitHub);

    let source_only = DeployGate::new(&["src/**"]);
    assert!(!source_only.evaluate(event.changed_files()).deploy);

    let docs = DeployGate::new(&["docs/**"]);
    let decision = docs.evaluate(event.changed_files());
    assert!(decision.deploy);
    assert_eq!(
        decision.reason,
        DeployReason::Matched {
            pattern: "docs/**".into(),
            file: "docs/guide.md".into()
        }
    );
}

#[test]
fn test_bitbucket_push_deploys_without_file_list() {
    let body = br#"{"push": {"changes": [{"new": {"name": "main", "target": {"hash": "beef"}}}]}}"#;
    let event = PushEvent::from_request([("X-Event-Key", "repo:push")], body).unwrap();

    let decision = DeployGate::new(&["src/**"]).evaluate(event.changed_files());
    assert!(decision.deploy);
    assert_eq!(decision.reason, DeployReason::UnknownChanges);
}
