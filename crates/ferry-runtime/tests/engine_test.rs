//! Engine-level tests: precondition checks and config wiring.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use ferry_common::config::EngineConfig;
use ferry_common::error::FerryError;
use ferry_common::types::ResourceLimits;
use ferry_runtime::Engine;
use sha2::{Digest, Sha256};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn tar_with_file(name: &str, data: &[u8]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    let mut header = tar::Header::new_gnu();
    header.set_size(data.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    builder.append_data(&mut header, name, data).expect("append");
    builder.into_inner().expect("finish tar")
}

#[test]
fn run_unpulled_image_fails_with_precondition_and_no_side_effects() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = EngineConfig::rooted_at(dir.path());
    let containers_root = config.containers_root.clone();
    let cgroup_cpu_root = config.cgroup_cpu_root.clone();
    let engine = Engine::new(config);

    let result = engine.run(
        "busybox",
        "latest",
        ResourceLimits {
            cpus: Some(1.0),
            memory_bytes: Some(50 * 1024 * 1024),
        },
        vec!["/bin/echo".into(), "hi".into()],
    );

    assert!(matches!(result, Err(FerryError::Precondition { .. })));
    // Zero side effects: no container directories, no cgroup groups.
    assert!(!containers_root.exists());
    assert!(!cgroup_cpu_root.exists());
}

#[test]
fn run_with_empty_command_fails_with_precondition() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = EngineConfig::rooted_at(dir.path());
    // Fake a pulled image so the command check is what trips.
    let contents = config
        .images_root
        .join("library_busybox_latest/layers/contents");
    std::fs::create_dir_all(&contents).expect("mkdir");
    let engine = Engine::new(config);

    let result = engine.run("busybox", "latest", ResourceLimits::unlimited(), vec![]);
    assert!(matches!(result, Err(FerryError::Precondition { .. })));
}

#[tokio::test]
async fn engine_pull_uses_configured_registry_endpoints() {
    let layer = tar_with_file("etc/os-release", b"ferry-test");
    let digest_hex = format!("{:x}", Sha256::digest(&layer));

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token": "test-token"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/library/busybox/manifests/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"{{"schemaVersion": 1, "name": "library/busybox", "tag": "latest",
                "fsLayers": [{{"blobSum": "sha256:{digest_hex}"}}]}}"#
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/v2/library/busybox/blobs/sha256:{digest_hex}")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(layer))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = EngineConfig::rooted_at(dir.path());
    config.registry_base = format!("{}/v2", server.uri());
    config.auth_base = server.uri();
    let images_root = config.images_root.clone();

    let pulled = tokio::task::spawn_blocking(move || Engine::new(config).pull("busybox", "latest"))
        .await
        .expect("join")
        .expect("pull");

    assert_eq!(pulled.layer_count, 1);
    assert!(images_root.join("library_busybox_latest.json").exists());
    assert!(images_root
        .join("library_busybox_latest/layers/contents/etc/os-release")
        .exists());

    // The content the engine resolves for `run` is exactly what pull produced.
    assert_eq!(
        pulled.content_root,
        images_root.join("library_busybox_latest/layers/contents")
    );
}
