//! Manifest discovery through a canned source.

use korporus_federation::{DiscoveryError, HostRegistry, fetch_manifest, load_manifests};
use korporus_test::{MockManifestSource, hello_manifest_json, test_manifest_json};
use serde_json::json;

const HELLO: &str = "/apps/hello/manifest.json";
const MISSING: &str = "/apps/missing/manifest.json";

#[tokio::test]
async fn keeps_valid_manifests_and_skips_failures() {
    let source = MockManifestSource::new()
        .with_manifest(HELLO, hello_manifest_json())
        .with_manifest("/apps/broken/manifest.json", json!({ "id": "broken" }))
        .with_manifest("/apps/notes/manifest.json", test_manifest_json("notes"))
        .with_transport_error("/apps/offline/manifest.json", "connection refused");
    let urls: Vec<String> = [
        HELLO,
        MISSING,
        "/apps/broken/manifest.json",
        "/apps/offline/manifest.json",
        "/apps/notes/manifest.json",
    ]
    .iter()
    .map(|u| (*u).to_owned())
    .collect();

    let manifests = load_manifests(&source, &urls).await;

    let ids: Vec<&str> = manifests.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["hello-app", "notes"]);
    assert_eq!(source.requests().len(), 5);
}

#[tokio::test]
async fn no_urls_means_no_manifests() {
    let source = MockManifestSource::new();
    assert!(load_manifests(&source, &[]).await.is_empty());
    assert!(source.requests().is_empty());
}

#[tokio::test]
async fn fetch_manifest_distinguishes_failures() {
    let source = MockManifestSource::new()
        .with_status("/a.json", 500)
        .with_manifest("/b.json", json!({ "id": "" }));

    match fetch_manifest(&source, "/a.json").await {
        Err(DiscoveryError::Fetch(e)) => assert!(e.to_string().contains("HTTP 500")),
        other => panic!("expected fetch error, got {other:?}"),
    }
    match fetch_manifest(&source, "/b.json").await {
        Err(DiscoveryError::Validation { url, source }) => {
            assert_eq!(url, "/b.json");
            assert!(source.to_string().contains("Missing required field"));
        },
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn registry_refresh_replaces_the_list() {
    let registry = HostRegistry::new();
    let source = MockManifestSource::new().with_manifest(HELLO, hello_manifest_json());

    let count = registry
        .refresh(&source, &[HELLO.to_owned(), MISSING.to_owned()])
        .await;

    assert_eq!(count, 1);
    assert!(registry.is_loaded());
    assert_eq!(registry.find("hello-app").unwrap().name, "Hello World");

    registry.refresh(&source, &[MISSING.to_owned()]).await;
    assert!(registry.apps().is_empty());
    assert!(registry.is_loaded());
}
