use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

const NODES: &str = r#"[
    {"name": "owner-github-api", "owner": "acme", "repo": "api"},
    {"name": "GitHub-Mirror"},
    {"name": "HPCC-node", "path": "/scratch/run"},
    {"name": "quay_hpcc_login"}
]"#;

fn config_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("nodes.json"), NODES).unwrap();
    dir
}

fn bloom(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("bloom").unwrap();
    cmd.env("BLOOM_CONFIG_DIR", dir.path())
        .env_remove("GITHUB_TOKEN")
        .env("BLOOM_LOG", "off");
    cmd
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn node_list_reads_registry() {
    let dir = config_dir();
    let output = bloom(&dir).args(["node", "list"]).output().unwrap();

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["count"], 4);
    assert_eq!(json["data"]["nodes"][2]["path"], "/scratch/run");
}

#[test]
fn unknown_node_exits_4_with_hint() {
    let dir = config_dir();
    bloom(&dir)
        .args(["node", "show", "ghost"])
        .assert()
        .code(4)
        .stdout(predicate::str::contains("node.not_found"))
        .stdout(predicate::str::contains("owner-github-api"));
}

#[test]
fn filter_chains_in_fixed_order() {
    let dir = config_dir();
    let output = bloom(&dir)
        .args(["filter", "--where", "hpcc", "--repo", "^HPCC"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["data"]["total"], 4);
    assert_eq!(json["data"]["count"], 1);
    assert_eq!(json["data"]["nodes"][0]["name"], "HPCC-node");
    assert_eq!(json["data"]["filters"]["where"], "hpcc");
}

#[test]
fn invalid_repo_regex_is_validation_error() {
    let dir = config_dir();
    bloom(&dir)
        .args(["filter", "--repo", "(unclosed"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("validation.invalid_argument"));
}

#[test]
fn inline_nodes_override_registry() {
    let dir = config_dir();
    let output = bloom(&dir)
        .args(["filter", "--receiver", "github"])
        .args(["--nodes", r#"[{"name": "x-github"}, {"name": "y"}]"#])
        .output()
        .unwrap();

    let json = stdout_json(&output);
    assert_eq!(json["data"]["count"], 1);
    assert_eq!(json["data"]["nodes"][0]["name"], "x-github");
}

#[test]
fn notify_is_accepted_without_side_effects() {
    let dir = config_dir();
    let output = bloom(&dir)
        .args(["trigger", "quay_hpcc_login", "notify"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["data"]["ok"], true);
    assert_eq!(json["data"]["action"], "notify");
    assert_eq!(
        json["data"]["message"],
        "notify not implemented (platform-specific)"
    );
}

#[test]
fn unknown_action_exits_1_and_names_it() {
    let dir = config_dir();
    let output = bloom(&dir)
        .args(["trigger", "quay_hpcc_login", "bogus_action"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let json = stdout_json(&output);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["ok"], false);
    assert_eq!(json["data"]["error"], "unknown action: bogus_action");
}

#[test]
fn workflow_dispatch_without_token_reports_variable() {
    let dir = config_dir();
    let output = bloom(&dir)
        .args(["trigger", "owner-github-api", "workflow_dispatch"])
        .arg(r#"{"workflow_id": "ci.yml"}"#)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let json = stdout_json(&output);
    assert_eq!(json["data"]["error"], "GITHUB_TOKEN not set");
}

#[test]
fn git_action_on_missing_directory_fails_before_spawning() {
    let dir = config_dir();
    let output = bloom(&dir)
        .args(["trigger", "GitHub-Mirror", "git_fetch"])
        .args(["--", "--path", "/definitely/not/here"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let json = stdout_json(&output);
    assert_eq!(json["data"]["ok"], false);
    assert_eq!(json["data"]["error"], "missing path");
}

#[test]
fn run_script_executes_in_node_directory() {
    let dir = config_dir();
    let work = TempDir::new().unwrap();
    let nodes = serde_json::json!([{"name": "box", "path": work.path()}]).to_string();

    let output = bloom(&dir)
        .args(["trigger", "box", "run_script", "--nodes", &nodes])
        .args(["--", "--script", "echo done > marker.txt"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["data"]["ok"], true);
    let marker = fs::read_to_string(work.path().join("marker.txt")).unwrap();
    assert_eq!(marker.trim(), "done");
}

#[test]
fn context_resolve_reports_route_and_command() {
    let dir = config_dir();
    fs::write(
        dir.path().join("bloom.json"),
        r#"{"defaults": {"context": {"scripts_dir": "/opt/bloom/scripts"}}}"#,
    )
    .unwrap();

    let output = bloom(&dir)
        .args(["context", "resolve", "--cluster", "hpcc"])
        .args(["--model", "qwen", "--project", "owner-x"])
        .output()
        .unwrap();

    let json = stdout_json(&output);
    assert_eq!(json["data"]["context_key"], "owner_hpcc_qwen");
    assert_eq!(json["data"]["route"], "hpcc");
    assert_eq!(json["data"]["action_where"], "hpcc");
    assert_eq!(
        json["data"]["command"],
        "CONTEXT_KEY=owner_hpcc_qwen /opt/bloom/scripts/connect-hpcc.sh"
    );
}

#[test]
fn github_context_command_uses_projects_dir() {
    let dir = config_dir();
    fs::write(
        dir.path().join("bloom.json"),
        r#"{"defaults": {"context": {"scripts_dir": "/opt/bloom/scripts"}}}"#,
    )
    .unwrap();

    let from_env = bloom(&dir)
        .env("PROJECTS_DIR", "/srv/projects")
        .args(["context", "resolve", "--key", "owner_github_granite"])
        .output()
        .unwrap();
    assert_eq!(
        stdout_json(&from_env)["data"]["command"],
        "CONTEXT_KEY=owner_github_granite PROJECTS_DIR=/srv/projects \
         /opt/bloom/scripts/daily-github-sync.sh sync"
    );

    let from_flag = bloom(&dir)
        .env("PROJECTS_DIR", "/srv/projects")
        .args(["context", "resolve", "--key", "owner_github_granite"])
        .args(["--projects-dir", "/work"])
        .output()
        .unwrap();
    let command = stdout_json(&from_flag)["data"]["command"].clone();
    assert!(command.as_str().unwrap().contains("PROJECTS_DIR=/work "));
}

#[test]
fn local_context_has_null_command() {
    let dir = config_dir();
    let output = bloom(&dir)
        .args(["context", "resolve", "--key", "desk_granite"])
        .output()
        .unwrap();

    let json = stdout_json(&output);
    assert_eq!(json["data"]["route"], "local");
    assert!(json["data"]["command"].is_null());
}

#[test]
fn empty_program_in_config_is_invalid_value() {
    let dir = config_dir();
    fs::write(
        dir.path().join("bloom.json"),
        r#"{"defaults": {"programs": {"git": ""}}}"#,
    )
    .unwrap();

    bloom(&dir)
        .args(["config", "show"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("config.invalid_value"));
}

#[test]
fn agent_filter_respects_context_route() {
    let dir = config_dir();
    fs::write(
        dir.path().join("agents.json"),
        r#"{"filter_agents": [{"id": "hpcc", "filter_criteria": {"action_where": "hpcc"}}]}"#,
    )
    .unwrap();

    let matched = bloom(&dir)
        .args(["agent", "filter", "hpcc", "--context-key", "quay_hpcc_granite"])
        .output()
        .unwrap();
    assert_eq!(stdout_json(&matched)["data"]["count"], 4);

    let routed_away = bloom(&dir)
        .args(["agent", "filter", "hpcc", "--context-key", "owner_github_granite"])
        .output()
        .unwrap();
    assert_eq!(stdout_json(&routed_away)["data"]["count"], 0);

    bloom(&dir)
        .args(["agent", "filter", "nope"])
        .assert()
        .code(4)
        .stdout(predicate::str::contains("agent.not_found"));
}

#[test]
fn malformed_config_is_reported_by_config_show() {
    let dir = config_dir();
    fs::write(dir.path().join("bloom.json"), "{not json").unwrap();

    bloom(&dir)
        .args(["config", "show"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("config.invalid_json"));
}

#[test]
fn config_show_merges_file_over_defaults() {
    let dir = config_dir();
    fs::write(
        dir.path().join("bloom.json"),
        r#"{"defaults": {"github": {"token_env": "GH_PAT"}}}"#,
    )
    .unwrap();

    let output = bloom(&dir).args(["config", "show"]).output().unwrap();
    let json = stdout_json(&output);
    assert_eq!(json["data"]["exists"], true);
    assert_eq!(json["data"]["config"]["defaults"]["github"]["token_env"], "GH_PAT");
    assert_eq!(
        json["data"]["config"]["defaults"]["github"]["api_base"],
        "https://api.github.com"
    );
}
