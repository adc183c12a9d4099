//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against fixture files and verify outputs.

use std::path::{Path, PathBuf};
use std::process::Command;

const TREE: &str = r#"{
    "subject": "Rust",
    "modules": [
        {"title": "Ownership", "topics": [{"title": "Moves", "subtopics": [
            {"id": "a", "title": "Move semantics"},
            {"id": "b", "title": "Borrowing"},
            {"id": "c", "title": "Lifetimes"}
        ]}]},
        {"title": "Traits", "topics": [{"title": "Basics", "subtopics": [
            {"id": "d", "title": "Defining traits"},
            {"id": "e", "title": "Generics"},
            {"id": "f", "title": "dyn Trait"}
        ]}]}
    ]
}"#;

const LEDGER: &str = r#"[
    {"sub_topic_id": "a", "status": "completed"},
    {"sub_topic_id": "b", "status": "not_started", "learn_completed": true}
]"#;

const REVIEWS: &str = r#"[
    {"sub_topic_id": "b", "title": "Borrowing", "next_review_date": "2026-10-20T08:00:00Z"},
    {"sub_topic_id": "a", "title": "Move semantics", "next_review_date": "2026-10-15T08:00:00Z"},
    {"sub_topic_id": "c", "title": "Lifetimes", "next_review_date": "2026-10-17T06:00:00Z"}
]"#;

struct Fixture {
    dir: tempfile::TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        std::fs::write(dir.path().join("tree.json"), TREE).unwrap();
        std::fs::write(dir.path().join("ledger.json"), LEDGER).unwrap();
        std::fs::write(dir.path().join("reviews.json"), REVIEWS).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn home(&self) -> &Path {
        self.dir.path()
    }

    /// Run a CLI command and return (stdout, stderr, exit code).
    fn run(&self, args: &[&str]) -> (String, String, i32) {
        let output = Command::new(env!("CARGO_BIN_EXE_questmap-cli"))
            .args(args)
            .env("QUESTMAP_HOME", self.home())
            .env_remove("QUESTMAP_ENV")
            .output()
            .expect("Failed to execute CLI command");

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let code = output.status.code().unwrap_or(-1);

        (stdout, stderr, code)
    }

    fn run_json(&self, args: &[&str]) -> serde_json::Value {
        let (stdout, stderr, code) = self.run(args);
        assert_eq!(code, 0, "CLI command failed: {args:?}\n{stderr}");
        serde_json::from_str(&stdout).expect("Failed to parse JSON output")
    }

    fn tree_args<'a>(&'a self, command: &'a str, tree: &'a str, ledger: Option<&'a str>) -> Vec<String> {
        let mut args = vec![command.to_string(), "--tree".to_string(), tree.to_string()];
        if let Some(ledger) = ledger {
            args.push("--ledger".to_string());
            args.push(ledger.to_string());
        }
        args
    }
}

fn as_strs(args: &[String]) -> Vec<&str> {
    args.iter().map(String::as_str).collect()
}

#[test]
fn test_validate_summarizes_tree() {
    let fx = Fixture::new();
    let tree = fx.path("tree.json");
    let json = fx.run_json(&["validate", "--tree", tree.to_str().unwrap()]);
    assert_eq!(json["modules"], 2);
    assert_eq!(json["subtopics"], 6);
    assert_eq!(json["subject"], "Rust");
}

#[test]
fn test_validate_rejects_missing_topics() {
    let fx = Fixture::new();
    let bad = fx.path("bad.json");
    std::fs::write(&bad, r#"{"modules": [{"title": "Ownership"}]}"#).unwrap();
    let (_, stderr, code) = fx.run(&["validate", "--tree", bad.to_str().unwrap()]);
    assert_eq!(code, 1);
    assert!(stderr.contains("has no topics collection"), "stderr: {stderr}");
}

#[test]
fn test_status_without_ledger() {
    let fx = Fixture::new();
    let tree = fx.path("tree.json");
    let args = fx.tree_args("status", tree.to_str().unwrap(), None);
    let json = fx.run_json(&as_strs(&args));
    assert_eq!(json["a"], "available");
    assert_eq!(json["d"], "locked");
}

#[test]
fn test_status_accessible_drops_locked() {
    let fx = Fixture::new();
    let (tree, ledger) = (fx.path("tree.json"), fx.path("ledger.json"));
    let mut args = fx.tree_args("status", tree.to_str().unwrap(), ledger.to_str());
    args.push("--accessible".to_string());
    let json = fx.run_json(&as_strs(&args));
    let keys: Vec<_> = json.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["a", "b", "c"]);
    assert_eq!(json["b"], "current");
}

#[test]
fn test_status_modules_with_ledger() {
    let fx = Fixture::new();
    let (tree, ledger) = (fx.path("tree.json"), fx.path("ledger.json"));
    let mut args = fx.tree_args("status", tree.to_str().unwrap(), ledger.to_str());
    args.push("--modules".to_string());
    let json = fx.run_json(&as_strs(&args));
    assert_eq!(json[0]["status"], "current");
    assert_eq!(json[0]["completed"], 1);
    assert_eq!(json[1]["status"], "locked");
}

#[test]
fn test_progress_policies() {
    let fx = Fixture::new();
    let (tree, ledger) = (fx.path("tree.json"), fx.path("ledger.json"));
    let args = fx.tree_args("progress", tree.to_str().unwrap(), ledger.to_str());
    let json = fx.run_json(&as_strs(&args));
    assert_eq!(json, serde_json::json!({"completed": 1, "total": 6, "percent": 17}));

    let mut args = args.clone();
    args.extend(["--policy".to_string(), "tree-authoritative".to_string()]);
    let json = fx.run_json(&as_strs(&args));
    assert_eq!(json["total"], 6);
}

#[test]
fn test_plan_with_start_date() {
    let fx = Fixture::new();
    let (tree, ledger) = (fx.path("tree.json"), fx.path("ledger.json"));
    let mut args = fx.tree_args("plan", tree.to_str().unwrap(), ledger.to_str());
    args.extend(["--start".to_string(), "2026-10-17".to_string(), "--per-day".to_string(), "2".to_string()]);
    let json = fx.run_json(&as_strs(&args));

    let days = json["days"].as_array().unwrap();
    assert_eq!(days.len(), 3);
    assert_eq!(days[0]["date"], "2026-10-17");
    assert_eq!(days[2]["date"], "2026-10-19");
    assert_eq!(days[0]["completion_rate"], 50.0);
    assert_eq!(json["current_day"], 1);
}

#[test]
fn test_plan_single_day_and_out_of_range() {
    let fx = Fixture::new();
    let tree = fx.path("tree.json");
    let mut args = fx.tree_args("plan", tree.to_str().unwrap(), None);
    args.extend(["--day".to_string(), "2".to_string()]);
    let json = fx.run_json(&as_strs(&args));
    assert_eq!(json["day"], 2);
    assert_eq!(json["topics"][0]["id"], "d");
    assert_eq!(json["topics"][0]["priority"], "medium");

    let mut args = fx.tree_args("plan", tree.to_str().unwrap(), None);
    args.extend(["--day".to_string(), "9".to_string()]);
    let (_, _, code) = fx.run(&as_strs(&args));
    assert_eq!(code, 1);
}

#[test]
fn test_map_nodes_and_svg() {
    let fx = Fixture::new();
    let (tree, ledger) = (fx.path("tree.json"), fx.path("ledger.json"));
    let args = fx.tree_args("map", tree.to_str().unwrap(), ledger.to_str());
    let json = fx.run_json(&as_strs(&args));
    let nodes = json["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 3);
    assert_eq!(nodes[1]["kind"], "checkpoint");
    assert_eq!(json["current_position"]["sub_topic_id"], "b");

    let mut args = args.clone();
    args.push("--svg".to_string());
    let json = fx.run_json(&as_strs(&args));
    assert_eq!(json.as_array().unwrap().len(), 2);
    assert!(json[0]["d"].as_str().unwrap().starts_with("M "));
}

#[test]
fn test_review_queue_order() {
    let fx = Fixture::new();
    let queue = fx.path("reviews.json");
    let json = fx.run_json(&[
        "review",
        "--queue",
        queue.to_str().unwrap(),
        "--now",
        "2026-10-17T09:00:00Z",
    ]);
    let items = json["items"].as_array().unwrap();
    let ids: Vec<_> = items.iter().map(|i| i["sub_topic_id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["a", "c", "b"]);
    assert_eq!(items[0]["band"], "overdue");
    assert_eq!(items[1]["band"], "overdue");
    assert_eq!(items[2]["band"], "due_soon");
    assert_eq!(items[0]["label"], "Overdue");
    assert_eq!(items[2]["label"], "Due soon");
    assert_eq!(json["summary"]["overdue"], 2);
}

#[test]
fn test_config_set_get_reset() {
    let fx = Fixture::new();
    let (stdout, _, code) = fx.run(&["config", "set", "pacing.subtopics_per_day", "2"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "ok");

    let (stdout, _, _) = fx.run(&["config", "get", "pacing.subtopics_per_day"]);
    assert_eq!(stdout.trim(), "2");

    let tree = fx.path("tree.json");
    let args = fx.tree_args("plan", tree.to_str().unwrap(), None);
    let json = fx.run_json(&as_strs(&args));
    assert_eq!(json["days"].as_array().unwrap().len(), 3);

    let (_, _, code) = fx.run(&["config", "reset"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = fx.run(&["config", "get", "pacing.subtopics_per_day"]);
    assert_eq!(stdout.trim(), "3");
}

#[test]
fn test_config_rejects_unknown_key() {
    let fx = Fixture::new();
    let (_, stderr, code) = fx.run(&["config", "set", "pacing.bogus", "1"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown config key"), "stderr: {stderr}");
}

#[test]
fn test_completions() {
    let fx = Fixture::new();
    let (stdout, _, code) = fx.run(&["completions", "bash"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("questmap-cli"));
}
