use hearth_router::{load_assignments, MacRouter, RoleProfile, RouterError};
use hearth_types::{RoleAssignmentEntry, RoleId};

fn stock_router() -> MacRouter {
    MacRouter::with_default_profiles(Vec::new()).unwrap()
}

// ── Classification ───────────────────────────────────────────────

#[test]
fn emotional_content_routes_to_limbic() {
    let router = stock_router();
    assert_eq!(
        router.evaluate_routing("I feel really anxious and scared"),
        RoleId::from("limbic")
    );
}

#[test]
fn technical_content_routes_to_developer() {
    let router = stock_router();
    assert_eq!(
        router.evaluate_routing("please refactor this function and fix the bug"),
        RoleId::from("developer")
    );
}

#[test]
fn analytical_content_routes_to_analyst() {
    let router = stock_router();
    assert_eq!(
        router.evaluate_routing("analyze the market and rebalance the portfolio"),
        RoleId::from("analyst")
    );
}

#[test]
fn empty_content_routes_to_default() {
    let router = stock_router();
    assert_eq!(router.evaluate_routing(""), RoleId::from("persona"));
    let ranked = router.evaluate_routing_detailed("");
    assert!(ranked.iter().all(|s| s.score == 0.0));
}

#[test]
fn weak_signal_falls_back_to_default() {
    // "function" alone scores 0.2, under the 0.5 selection threshold.
    let router = stock_router();
    assert_eq!(router.evaluate_routing("what is a function"), RoleId::from("persona"));
}

#[test]
fn score_exactly_at_threshold_is_not_enough() {
    // Selection requires strictly exceeding the threshold.
    let profiles = vec![
        RoleProfile::new("general", 1.0),
        RoleProfile::new("exact", 0.5).with_keyword("magic", 0.5),
    ];
    let router = MacRouter::new(profiles, Vec::new()).unwrap();
    assert_eq!(router.evaluate_routing("magic"), RoleId::from("general"));
}

// ── Tie-breaking ─────────────────────────────────────────────────

#[test]
fn ties_resolve_by_declaration_order() {
    let profiles = vec![
        RoleProfile::new("general", 1.0),
        RoleProfile::new("first", 0.5).with_keyword("shared", 0.8),
        RoleProfile::new("second", 0.5).with_keyword("shared", 0.8),
    ];
    let router = MacRouter::new(profiles, Vec::new()).unwrap();

    let ranked = router.evaluate_routing_detailed("shared keyword here");
    assert_eq!(ranked[0].role, RoleId::from("first"));
    assert_eq!(ranked[1].role, RoleId::from("second"));
    assert_eq!(router.evaluate_routing("shared keyword here"), RoleId::from("first"));
}

// ── Delegation ───────────────────────────────────────────────────

#[test]
fn default_role_never_delegates_even_at_zero_threshold() {
    let router = stock_router();
    // Routes to persona (no specialist signal), so never delegate.
    assert!(!router.should_delegate("hello there, how are you", Some(0.0)));
    assert!(!router.should_delegate("", Some(0.0)));
}

#[test]
fn specialist_delegates_at_its_own_threshold() {
    let router = stock_router();
    // limbic threshold is 0.6; feel+anxious+scared = 1.1.
    assert!(router.should_delegate("I feel really anxious and scared", None));
    // feel alone is 0.3, under limbic's 0.6.
    assert!(!router.should_delegate("I feel fine", None));
}

#[test]
fn explicit_threshold_overrides_role_threshold() {
    let router = stock_router();
    assert!(router.should_delegate("I feel fine", Some(0.2)));
    assert!(!router.should_delegate("I feel fine", Some(0.9)));
}

// ── Assignment configuration ─────────────────────────────────────

#[test]
fn missing_assignment_file_yields_empty() {
    let dir = tempfile::tempdir().unwrap();
    let entries = load_assignments(&dir.path().join("absent.json")).unwrap();
    assert!(entries.is_empty());
}

#[test]
fn assignment_file_parses_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("assignments.json");
    std::fs::write(
        &path,
        r#"[
            {"role": "persona", "model": "companion-large"},
            {"role": "limbic", "model": "empath-mini"}
        ]"#,
    )
    .unwrap();

    let entries = load_assignments(&path).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].role, RoleId::from("persona"));
    assert_eq!(entries[1].model, "empath-mini");
}

#[test]
fn malformed_assignment_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("assignments.json");
    std::fs::write(&path, b"{oops").unwrap();
    assert!(matches!(
        load_assignments(&path),
        Err(RouterError::MalformedConfig(_))
    ));
}

#[test]
fn override_visible_immediately_to_route() {
    let router = MacRouter::with_default_profiles(vec![RoleAssignmentEntry {
        role: RoleId::from("limbic"),
        model: "empath-mini".to_string(),
    }])
    .unwrap();

    let before = router.route("I feel really anxious and scared");
    assert_eq!(before.selected_model, Some("empath-mini".into()));

    router.set_role_assignment("limbic", "empath-pro");
    let after = router.route("I feel really anxious and scared");
    assert_eq!(after.selected_model, Some("empath-pro".into()));
}
