use super::*;
use crate::config::parse_config;
use tempfile::TempDir;

#[tokio::test]
async fn test_resolver_for_applies_config() {
    let mut snap = TypeSnapshot::new();
    let s = snap.primitive(PrimitiveKind::String);
    let user = snap.object("User", &[("name", s)]);

    let config = parse_config(r#"{ "resolver": { "maxDepth": 0 } }"#).unwrap();
    assert!(resolver_for(&snap, &config).is_err());

    let config = parse_config(r#"{ "resolver": { "maxDepth": 1 } }"#).unwrap();
    let mut resolver = resolver_for(&snap, &config).unwrap();
    assert_eq!(resolver.options().max_depth, 1);
    let info = resolver.resolve(user).await.unwrap();
    assert_eq!(info.to_string(), "User");
}

#[tokio::test]
async fn test_load_snapshot_from_disk() {
    let mut snap = TypeSnapshot::new();
    let n = snap.primitive(PrimitiveKind::Number);
    let point = snap.object("Point", &[("x", n), ("y", n)]);

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("types.json");
    std::fs::write(&path, snap.to_json().unwrap()).unwrap();

    let loaded = load_snapshot(&path).unwrap();
    let info = TypeResolver::new(&loaded).resolve(point).await.unwrap();
    assert_eq!(
        info.as_object().unwrap().property_names(),
        vec!["x", "y"]
    );
}

#[test]
fn test_load_snapshot_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = load_snapshot(&path).unwrap_err();
    assert!(err.to_string().contains("broken.json"));
}
