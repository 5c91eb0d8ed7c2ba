use hearth_types::{PluginId, PluginManifest, RoleAssignmentEntry, RoleId};
use pretty_assertions::assert_eq;

#[test]
fn manifest_builder_accumulates() {
    let manifest = PluginManifest::new("social", "Social", "1.2.0")
        .with_domain("social")
        .with_domain("relationships")
        .with_subscription("TICK_HOURLY")
        .with_publication("SOCIAL_POST");

    assert_eq!(manifest.id, PluginId::from("social"));
    assert_eq!(manifest.owned_domains, vec!["social", "relationships"]);
    assert_eq!(manifest.events.subscribes, vec!["TICK_HOURLY"]);
    assert_eq!(manifest.events.publishes, vec!["SOCIAL_POST"]);
}

#[test]
fn manifest_deserializes_with_defaults() {
    // Only the required fields; everything else defaults.
    let manifest: PluginManifest =
        serde_json::from_str(r#"{"id": "avatar", "name": "Avatar", "version": "0.1.0"}"#).unwrap();

    assert_eq!(manifest.id.as_str(), "avatar");
    assert!(manifest.owned_domains.is_empty());
    assert!(manifest.events.subscribes.is_empty());
    assert!(manifest.api_routes.is_empty());
}

#[test]
fn manifest_missing_required_field_fails() {
    let result: Result<PluginManifest, _> =
        serde_json::from_str(r#"{"id": "avatar", "name": "Avatar"}"#);
    assert!(result.is_err());
}

#[test]
fn manifest_serde_roundtrip() {
    let manifest = PluginManifest::new("world", "World", "2.0.0")
        .with_domain("weather")
        .with_subscription("TICK_DAILY");
    let json = serde_json::to_string(&manifest).unwrap();
    let parsed: PluginManifest = serde_json::from_str(&json).unwrap();
    assert_eq!(manifest, parsed);
}

#[test]
fn role_assignment_entry_serde() {
    let entry: RoleAssignmentEntry =
        serde_json::from_str(r#"{"role": "limbic", "model": "empath-mini"}"#).unwrap();
    assert_eq!(entry.role, RoleId::from("limbic"));
    assert_eq!(entry.model, "empath-mini");
}
