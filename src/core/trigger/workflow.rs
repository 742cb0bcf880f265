use serde_json::{json, Value};

use super::{Dispatcher, TriggerResult};
use crate::node::Node;
use crate::payload::Payload;

impl Dispatcher<'_> {
    /// POST a workflow_dispatch event for `owner/repo`'s `workflow_id`.
    ///
    /// Payload values win over node fields; `repo` falls back to the node slug.
    pub(super) fn workflow_dispatch(&self, node: &Node, payload: &Payload) -> TriggerResult {
        let owner = payload.str("owner").or_else(|| node.owner().map(str::to_string));
        let repo = payload
            .str("repo")
            .or_else(|| node.repo().map(str::to_string))
            .or_else(|| node.slug().map(str::to_string));
        let workflow_id = payload.str("workflow_id");

        let (Some(owner), Some(repo), Some(workflow_id)) = (owner, repo, workflow_id) else {
            return TriggerResult::error("missing owner/repo/workflow_id");
        };

        let token_env = &self.defaults.github.token_env;
        let Some(token) = self.host.var(token_env).filter(|t| !t.is_empty()) else {
            return TriggerResult::error(format!("{} not set", token_env));
        };

        let url = format!(
            "{}/repos/{}/{}/actions/workflows/{}/dispatches",
            self.defaults.github.api_base.trim_end_matches('/'),
            owner,
            repo,
            workflow_id
        );
        let git_ref = self.setting(payload, "ref", &self.defaults.payload.git_ref);

        let mut body = json!({ "ref": git_ref });
        if let (Some(inputs), Value::Object(map)) = (payload.value("inputs"), &mut body) {
            map.insert("inputs".to_string(), inputs.clone());
        }

        let headers = vec![
            (
                "Accept".to_string(),
                "application/vnd.github.v3+json".to_string(),
            ),
            ("Authorization".to_string(), format!("Bearer {}", token)),
            ("Content-Type".to_string(), "application/json".to_string()),
        ];

        log_status!("workflow", "Dispatching {} on {}/{}@{}", workflow_id, owner, repo, git_ref);
        match self.executor.post_json(&url, &headers, &body) {
            Ok(status) if (200..300).contains(&status) => TriggerResult::success(),
            Ok(status) => {
                log::warn!("workflow dispatch to {} returned HTTP {}", url, status);
                TriggerResult::failed()
            }
            Err(err) => TriggerResult::error(err.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::defaults::Defaults;
    use crate::executor::recording::{Call, Outcome, RecordingExecutor};
    use crate::host::fake::FakeHost;
    use crate::node::Node;
    use crate::payload::Payload;
    use crate::trigger::{Dispatcher, TriggerResult};
    use serde_json::json;

    fn token_host() -> FakeHost {
        FakeHost::new().with_var("GITHUB_TOKEN", "ghp_test")
    }

    fn run(
        executor: &RecordingExecutor,
        host: &FakeHost,
        node: &Node,
        payload: serde_json::Value,
    ) -> TriggerResult {
        let payload = Payload::from_value(payload).unwrap();
        Dispatcher::new(executor, host, Defaults::default()).trigger(
            node,
            "workflow_dispatch",
            Some(&payload),
        )
    }

    fn repo_node() -> Node {
        Node::new("owner-github-api").with_owner("acme").with_repo("api")
    }

    #[test]
    fn posts_dispatch_with_headers_and_default_ref() {
        let executor = RecordingExecutor::new();

        let result = run(&executor, &token_host(), &repo_node(), json!({"workflow_id": "ci.yml"}));

        assert!(result.ok);
        assert_eq!(
            executor.calls(),
            vec![Call::Post {
                url: "https://api.github.com/repos/acme/api/actions/workflows/ci.yml/dispatches"
                    .to_string(),
                headers: vec![
                    ("Accept".to_string(), "application/vnd.github.v3+json".to_string()),
                    ("Authorization".to_string(), "Bearer ghp_test".to_string()),
                    ("Content-Type".to_string(), "application/json".to_string()),
                ],
                body: json!({"ref": "main"}),
            }]
        );
    }

    #[test]
    fn missing_token_names_variable_and_skips_network() {
        let executor = RecordingExecutor::new();

        let payload = json!({"workflow_id": "ci.yml"});
        let result = run(&executor, &FakeHost::new(), &repo_node(), payload);

        assert!(!result.ok);
        assert!(result.error.unwrap().contains("GITHUB_TOKEN"));
        assert!(executor.calls().is_empty());
    }

    #[test]
    fn empty_token_counts_as_unset() {
        let executor = RecordingExecutor::new();
        let host = FakeHost::new().with_var("GITHUB_TOKEN", "");

        let result = run(&executor, &host, &repo_node(), json!({"workflow_id": "ci.yml"}));

        assert_eq!(result.error.as_deref(), Some("GITHUB_TOKEN not set"));
        assert!(executor.calls().is_empty());
    }

    #[test]
    fn token_variable_name_comes_from_defaults() {
        let executor = RecordingExecutor::new();
        let mut defaults = Defaults::default();
        defaults.github.token_env = "GH_PAT".to_string();
        let payload = Payload::new().with("workflow_id", "ci.yml");

        let result = Dispatcher::new(&executor, &token_host(), defaults).trigger(
            &repo_node(),
            "workflow_dispatch",
            Some(&payload),
        );

        assert_eq!(result.error.as_deref(), Some("GH_PAT not set"));
    }

    #[test]
    fn missing_identifiers_are_reported() {
        let executor = RecordingExecutor::new();

        let no_workflow = run(&executor, &token_host(), &repo_node(), json!({}));
        let ownerless = Node::new("x").with_repo("api");
        let no_owner = run(&executor, &token_host(), &ownerless, json!({"workflow_id": 7}));

        for result in [no_workflow, no_owner] {
            assert_eq!(result.error.as_deref(), Some("missing owner/repo/workflow_id"));
        }
        assert!(executor.calls().is_empty());
    }

    #[test]
    fn payload_overrides_node_and_slug_backs_up_repo() {
        let executor = RecordingExecutor::new();
        let node = Node::new("quay-github").with_owner("acme").with_slug("registry");

        run(
            &executor,
            &token_host(),
            &node,
            json!({
                "owner": "forks",
                "workflow_id": 4821,
                "ref": "v2",
                "inputs": {"dry_run": "true"}
            }),
        );

        let Call::Post { url, body, .. } = &executor.calls()[0] else {
            panic!("expected a POST");
        };
        assert_eq!(
            url,
            "https://api.github.com/repos/forks/registry/actions/workflows/4821/dispatches"
        );
        assert_eq!(body, &json!({"ref": "v2", "inputs": {"dry_run": "true"}}));
    }

    #[test]
    fn non_2xx_status_is_plain_failure() {
        let executor = RecordingExecutor::replying([Outcome::Status(422)]);
        let result = run(&executor, &token_host(), &repo_node(), json!({"workflow_id": "ci.yml"}));
        assert_eq!(result, TriggerResult::failed());
    }

    #[test]
    fn transport_error_carries_message() {
        let executor = RecordingExecutor::replying([Outcome::Fail("connection refused".into())]);
        let result = run(&executor, &token_host(), &repo_node(), json!({"workflow_id": "ci.yml"}));
        assert_eq!(
            result.error.as_deref(),
            Some("HTTP request failed: connection refused")
        );
    }
}
