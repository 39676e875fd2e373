//! CLI integration tests for discovery-schema binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("discovery-schema"));
    cmd.env_remove("RUST_LOG").env_remove("DISCOVERY_TOKEN");
    cmd
}

// Helper to create a temp snapshot file
fn write_temp_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

const SNAPSHOT: &str = r#"{
    "groups": [
        {"name": "", "versions": [{"groupVersion": "v1", "version": "v1"}],
         "preferredVersion": {"groupVersion": "v1", "version": "v1"}},
        {"name": "extensions",
         "versions": [{"groupVersion": "extensions/v1beta1", "version": "v1beta1"}],
         "preferredVersion": {"groupVersion": "extensions/v1beta1", "version": "v1beta1"}},
        {"name": "autoscaling",
         "versions": [{"groupVersion": "autoscaling/v1", "version": "v1"},
                      {"groupVersion": "autoscaling/v2beta2", "version": "v2beta2"}],
         "preferredVersion": {"groupVersion": "autoscaling/v1", "version": "v1"}}
    ],
    "resources": [
        {"groupVersion": "v1", "resources": [
            {"name": "pods", "kind": "Pod", "namespaced": true},
            {"name": "pods/status", "kind": "Pod", "namespaced": true}
        ]},
        {"groupVersion": "extensions/v1beta1", "resources": [
            {"name": "deployments", "kind": "Deployment", "namespaced": true}
        ]},
        {"groupVersion": "autoscaling/v1", "resources": [
            {"name": "horizontalpodautoscalers", "kind": "HorizontalPodAutoscaler",
             "namespaced": true}
        ]}
    ]
}"#;

fn run_json(args: &[&str]) -> serde_json::Value {
    let output = cmd().args(args).output().unwrap();
    assert!(output.status.success(), "command failed: {:?}", output);
    serde_json::from_slice(&output.stdout).unwrap()
}

mod sync_command {
    use super::*;

    #[test]
    fn sync_from_snapshot() {
        let dir = TempDir::new().unwrap();
        let snapshot = write_temp_file(&dir, "snapshot.json", SNAPSHOT);

        let registry = run_json(&["sync", "--snapshot", snapshot.to_str().unwrap()]);

        let ids: Vec<&String> = registry.as_object().unwrap().keys().collect();
        assert_eq!(
            ids,
            vec![
                "v1.autoscaling.horizontalpodautoscaler",
                "v1.pod",
                "v1beta1.extensions.deployment",
            ]
        );
        assert_eq!(registry["v1.pod"]["pluralName"], "pods");
        assert_eq!(
            registry["v1.autoscaling.horizontalpodautoscaler"]["attributes"]["preferredVersion"],
            "v2beta2"
        );
        assert_eq!(
            registry["v1beta1.extensions.deployment"]["attributes"]["preferredGroup"],
            "apps"
        );
    }

    #[test]
    fn sync_with_pretty() {
        let dir = TempDir::new().unwrap();
        let snapshot = write_temp_file(&dir, "snapshot.json", SNAPSHOT);

        let snapshot = snapshot.to_str().unwrap();

        cmd()
            .args(["sync", "--snapshot", snapshot, "--pretty"])
            .assert()
            .success()
            // Pretty output has newlines and indentation
            .stdout(predicate::str::contains("{\n"));
    }

    #[test]
    fn sync_with_output_file() {
        let dir = TempDir::new().unwrap();
        let snapshot = write_temp_file(&dir, "snapshot.json", SNAPSHOT);
        let output = dir.path().join("registry.json");

        cmd()
            .args([
                "sync",
                "--snapshot",
                snapshot.to_str().unwrap(),
                "--output",
                output.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::is_empty());

        let content = fs::read_to_string(&output).unwrap();
        assert!(content.contains(r#""id":"v1.pod""#));
    }

    #[test]
    fn bad_group_version_exits_1_but_prints_registry() {
        let dir = TempDir::new().unwrap();
        let snapshot = write_temp_file(
            &dir,
            "snapshot.json",
            r#"{
                "groups": [],
                "resources": [
                    {"groupVersion": "??", "resources": [{"name": "ghosts", "kind": "Ghost"}]},
                    {"groupVersion": "v1", "resources": [{"name": "pods", "kind": "Pod"}]}
                ]
            }"#,
        );

        cmd()
            .args(["sync", "--snapshot", snapshot.to_str().unwrap()])
            .assert()
            .code(1)
            .stdout(predicate::str::contains(r#""v1.pod""#))
            .stderr(predicate::str::contains("skipped"))
            .stderr(predicate::str::contains("??"));
    }

    #[test]
    fn missing_snapshot_exits_3() {
        cmd()
            .args(["sync", "--snapshot", "/nonexistent/snapshot.json"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("file not found"));
    }

    #[test]
    fn invalid_snapshot_exits_2() {
        let dir = TempDir::new().unwrap();
        let snapshot = write_temp_file(&dir, "snapshot.json", "{not json");

        cmd()
            .args(["sync", "--snapshot", snapshot.to_str().unwrap()])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("invalid JSON"));
    }

    #[test]
    fn requires_a_source() {
        cmd().args(["sync"]).assert().failure();
    }

    #[test]
    fn zero_timeout_is_rejected() {
        cmd()
            .args([
                "sync",
                "--server",
                "https://127.0.0.1:6443",
                "--timeout",
                "0",
            ])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("invalid value '0'"));
    }

    #[test]
    fn snapshot_and_server_conflict() {
        cmd()
            .args([
                "sync",
                "--snapshot",
                "snapshot.json",
                "--server",
                "https://127.0.0.1:6443",
            ])
            .assert()
            .failure()
            .stderr(predicate::str::contains("cannot be used with"));
    }

    #[cfg(feature = "remote")]
    #[test]
    fn invalid_server_url_exits_2() {
        cmd()
            .args(["sync", "--server", "not a url"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("invalid server URL"));
    }

    #[cfg(feature = "remote")]
    #[test]
    fn sync_from_server() {
        let mut server = mockito::Server::new();
        let json = |server: &mut mockito::Server, path: &str, body: &str| {
            server
                .mock("GET", path)
                .with_status(200)
                .with_header("content-type", "application/json")
                .with_body(body)
                .create()
        };
        let _api = json(&mut server, "/api", r#"{"versions": ["v1"]}"#);
        let _v1 = json(
            &mut server,
            "/api/v1",
            r#"{"groupVersion": "v1", "resources": [{"name": "pods", "kind": "Pod"}]}"#,
        );
        let _apis = json(&mut server, "/apis", r#"{"groups": []}"#);

        let url = server.url();
        let registry = run_json(&["sync", "--server", url.as_str()]);
        assert_eq!(registry["v1.pod"]["pluralName"], "pods");
    }
}

mod versions_command {
    use super::*;

    #[test]
    fn prints_effective_versions() {
        let dir = TempDir::new().unwrap();
        let snapshot = write_temp_file(&dir, "snapshot.json", SNAPSHOT);

        let versions = run_json(&["versions", "--snapshot", snapshot.to_str().unwrap()]);

        assert_eq!(versions[""], "v1");
        assert_eq!(versions["extensions"], "v1beta1");
        assert_eq!(versions["autoscaling"], "v2beta2");
    }
}
