//! Action dispatch: run exactly one external operation against a node.
//!
//! Every path returns a [`TriggerResult`]; spawn, I/O and network failures are
//! folded into `ok: false` with the underlying message.

mod git;
mod job;
mod workflow;

use serde::Serialize;
use std::path::PathBuf;

use crate::defaults::{self, Defaults};
use crate::executor::{Executor, SystemExecutor};
use crate::host::{Host, SystemHost};
use crate::node::Node;
use crate::payload::Payload;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    WorkflowDispatch,
    GitPush,
    GitFetch,
    FetchMerge,
    PushMerge,
    PullMerge,
    JobSubmit,
    RunScript,
    Notify,
}

impl Action {
    pub const ALL: [Action; 9] = [
        Action::WorkflowDispatch,
        Action::GitPush,
        Action::GitFetch,
        Action::FetchMerge,
        Action::PushMerge,
        Action::PullMerge,
        Action::JobSubmit,
        Action::RunScript,
        Action::Notify,
    ];

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == tag)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::WorkflowDispatch => "workflow_dispatch",
            Action::GitPush => "git_push",
            Action::GitFetch => "git_fetch",
            Action::FetchMerge => "fetch_merge",
            Action::PushMerge => "push_merge",
            Action::PullMerge => "pull_merge",
            Action::JobSubmit => "job_submit",
            Action::RunScript => "run_script",
            Action::Notify => "notify",
        }
    }
}

/// Uniform outcome of a dispatch call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriggerResult {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TriggerResult {
    pub fn success() -> Self {
        Self {
            ok: true,
            error: None,
            message: None,
        }
    }

    /// Accepted, but nothing was run.
    pub fn accepted(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            error: None,
            message: Some(message.into()),
        }
    }

    /// External step ran and reported failure; no further detail.
    pub fn failed() -> Self {
        Self {
            ok: false,
            error: None,
            message: None,
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(error.into()),
            message: None,
        }
    }

    fn from_exit(code: i32) -> Self {
        if code == 0 {
            Self::success()
        } else {
            Self::failed()
        }
    }

    fn from_call(result: crate::Result<i32>) -> Self {
        match result {
            Ok(code) => Self::from_exit(code),
            Err(err) => Self::error(err.message),
        }
    }
}

/// Dispatches actions through an injectable executor and host.
pub struct Dispatcher<'a> {
    executor: &'a dyn Executor,
    host: &'a dyn Host,
    defaults: Defaults,
}

impl<'a> Dispatcher<'a> {
    pub fn new(executor: &'a dyn Executor, host: &'a dyn Host, defaults: Defaults) -> Self {
        Self {
            executor,
            host,
            defaults,
        }
    }

    pub fn trigger(&self, node: &Node, action: &str, payload: Option<&Payload>) -> TriggerResult {
        let empty = Payload::new();
        let payload = payload.unwrap_or(&empty);

        let Some(parsed) = Action::from_tag(action) else {
            log::warn!("Unknown action '{}' for node {}", action, node.name);
            return TriggerResult::error(format!("unknown action: {}", action));
        };

        log::debug!("Dispatching {} for node {}", parsed.as_str(), node.name);

        match parsed {
            Action::WorkflowDispatch => self.workflow_dispatch(node, payload),
            Action::GitPush => self.git_single(node, "push", payload),
            Action::GitFetch => self.git_single(node, "fetch", payload),
            Action::PullMerge => self.git_single(node, "pull", payload),
            Action::FetchMerge => self.fetch_merge(node, payload),
            Action::PushMerge => self.push_merge(node, payload),
            Action::JobSubmit => self.job_submit(node, payload),
            Action::RunScript => self.run_script(node, payload),
            Action::Notify => TriggerResult::accepted("notify not implemented (platform-specific)"),
        }
    }

    /// Node path first, then payload path; tilde-expanded.
    fn resolve_path(&self, node: &Node, payload: &Payload) -> Option<PathBuf> {
        let raw = node
            .path()
            .map(str::to_string)
            .or_else(|| payload.str("path"))?;
        Some(PathBuf::from(shellexpand::tilde(&raw).as_ref()))
    }

    /// Resolved path, only when it is an existing directory.
    fn resolve_dir(&self, node: &Node, payload: &Payload) -> Option<PathBuf> {
        self.resolve_path(node, payload)
            .filter(|p| self.host.is_dir(p))
    }

    fn setting(&self, payload: &Payload, key: &str, fallback: &str) -> String {
        payload.str(key).unwrap_or_else(|| fallback.to_string())
    }
}

/// Dispatch with the real executor, the process environment and bloom.json defaults.
pub fn trigger(node: &Node, action: &str, payload: Option<&Payload>) -> TriggerResult {
    let defaults = defaults::load_defaults();
    let executor = SystemExecutor::new(defaults.programs.shell.clone());
    let host = SystemHost;
    Dispatcher::new(&executor, &host, defaults).trigger(node, action, payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::recording::{Call, Outcome, RecordingExecutor};
    use crate::host::fake::FakeHost;
    use serde_json::json;

    fn dispatch(
        executor: &RecordingExecutor,
        host: &FakeHost,
        node: &Node,
        action: &str,
        payload: Option<&Payload>,
    ) -> TriggerResult {
        Dispatcher::new(executor, host, Defaults::default()).trigger(node, action, payload)
    }

    #[test]
    fn action_tags_round_trip() {
        for action in Action::ALL {
            assert_eq!(Action::from_tag(action.as_str()), Some(action));
        }
        assert_eq!(Action::from_tag("Notify"), None);
    }

    #[test]
    fn notify_is_accepted_for_any_node() {
        let executor = RecordingExecutor::new();
        let host = FakeHost::new();

        for node in [Node::new(""), Node::new("hpcc").with_path("/nope").with_owner("x")] {
            let result = dispatch(&executor, &host, &node, "notify", None);
            assert!(result.ok);
            assert!(result.error.is_none());
            assert!(result.message.unwrap().contains("not implemented"));
        }
        assert!(executor.calls().is_empty());
    }

    #[test]
    fn unknown_action_names_the_tag() {
        let executor = RecordingExecutor::new();
        let result = dispatch(
            &executor,
            &FakeHost::new(),
            &Node::new("n"),
            "bogus_action",
            Some(&Payload::new()),
        );

        assert!(!result.ok);
        assert_eq!(result.error.as_deref(), Some("unknown action: bogus_action"));
        assert!(executor.calls().is_empty());
    }

    #[test]
    fn spawn_failure_becomes_error_result() {
        let executor =
            RecordingExecutor::replying([Outcome::Fail("Failed to run git: boom".into())]);
        let host = FakeHost::new().with_dir("/srv/app");
        let node = Node::new("app").with_path("/srv/app");

        let result = dispatch(&executor, &host, &node, "git_push", None);

        assert!(!result.ok);
        assert_eq!(result.error.as_deref(), Some("Failed to run git: boom"));
    }

    #[test]
    fn payload_is_left_untouched() {
        let executor = RecordingExecutor::new();
        let host = FakeHost::new().with_dir("/srv/app");
        let node = Node::new("app").with_path("/srv/app");
        let payload =
            Payload::from_value(json!({"remote": "upstream", "args": ["--tags"]})).unwrap();
        let before = payload.clone();

        dispatch(&executor, &host, &node, "push_merge", Some(&payload));

        assert_eq!(payload, before);
        assert_eq!(executor.calls().len(), 2);
    }

    #[test]
    fn result_serializes_without_absent_fields() {
        let value = serde_json::to_value(TriggerResult::success()).unwrap();
        assert_eq!(value, json!({"ok": true}));

        let value = serde_json::to_value(TriggerResult::error("missing path")).unwrap();
        assert_eq!(value, json!({"ok": false, "error": "missing path"}));
    }

    #[test]
    fn tilde_paths_are_expanded_before_checks() {
        let home = std::env::var("HOME").unwrap_or_default();
        if home.is_empty() {
            return;
        }
        let executor = RecordingExecutor::new();
        let host = FakeHost::new().with_dir(&format!("{}/repos/app", home));
        let node = Node::new("app").with_path("~/repos/app");

        let result = dispatch(&executor, &host, &node, "git_fetch", None);

        assert!(result.ok);
        assert_eq!(
            executor.calls()[0],
            Call::Spawn {
                program: "git".to_string(),
                args: vec![
                    "-C".to_string(),
                    format!("{}/repos/app", home),
                    "fetch".to_string()
                ],
                cwd: None,
            }
        );
    }
}
