use std::path::Path;

use super::{Dispatcher, TriggerResult};
use crate::node::Node;
use crate::payload::Payload;

const MISSING_PATH: &str = "missing path";

impl Dispatcher<'_> {
    /// `git -C <path> <subcommand> <args...>`
    fn run_git(&self, path: &Path, subcommand: &str, extra: &[String]) -> crate::Result<i32> {
        let mut args = vec![
            "-C".to_string(),
            path.display().to_string(),
            subcommand.to_string(),
        ];
        args.extend(extra.iter().cloned());

        log_status!("git", "{} in {}", subcommand, path.display());
        self.executor.spawn(&self.defaults.programs.git, &args, None)
    }

    /// git_push, git_fetch and pull_merge: one git step plus payload `args`.
    pub(super) fn git_single(
        &self,
        node: &Node,
        subcommand: &str,
        payload: &Payload,
    ) -> TriggerResult {
        let Some(path) = self.resolve_dir(node, payload) else {
            return TriggerResult::error(MISSING_PATH);
        };

        TriggerResult::from_call(self.run_git(&path, subcommand, &payload.args("args")))
    }

    /// Fetch `remote`, then merge `remote/branch`. A failed fetch stops here.
    pub(super) fn fetch_merge(&self, node: &Node, payload: &Payload) -> TriggerResult {
        let Some(path) = self.resolve_dir(node, payload) else {
            return TriggerResult::error(MISSING_PATH);
        };
        let remote = self.setting(payload, "remote", &self.defaults.payload.remote);
        let branch = self.setting(payload, "branch", &self.defaults.payload.branch);

        match self.run_git(&path, "fetch", std::slice::from_ref(&remote)) {
            Ok(0) => {}
            Ok(code) => {
                log::warn!("fetch of {} exited with {}, skipping merge", remote, code);
                return TriggerResult::failed();
            }
            Err(err) => return TriggerResult::error(err.message),
        }

        let target = format!("{}/{}", remote, branch);
        TriggerResult::from_call(self.run_git(&path, "merge", &[target]))
    }

    /// Merge local `branch`, then push to `remote` with payload `args`.
    ///
    /// The merge exit code is not consulted: the push runs regardless.
    pub(super) fn push_merge(&self, node: &Node, payload: &Payload) -> TriggerResult {
        let Some(path) = self.resolve_dir(node, payload) else {
            return TriggerResult::error(MISSING_PATH);
        };
        let remote = self.setting(payload, "remote", &self.defaults.payload.remote);
        let branch = self.setting(payload, "branch", &self.defaults.payload.branch);

        match self.run_git(&path, "merge", std::slice::from_ref(&branch)) {
            Ok(0) => {}
            Ok(code) => log::warn!("merge of {} exited with {}, pushing anyway", branch, code),
            Err(err) => return TriggerResult::error(err.message),
        }

        let mut push_args = vec![remote];
        push_args.extend(payload.args("args"));
        TriggerResult::from_call(self.run_git(&path, "push", &push_args))
    }
}
