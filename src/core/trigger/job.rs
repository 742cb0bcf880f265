use super::{Dispatcher, TriggerResult};
use crate::node::Node;
use crate::payload::Payload;

impl Dispatcher<'_> {
    /// Submit `<path>/<script>` to the batch scheduler from inside `path`.
    ///
    /// Only presence of the path is required; the scheduler reports a bad one.
    pub(super) fn job_submit(&self, node: &Node, payload: &Payload) -> TriggerResult {
        let Some(path) = self.resolve_path(node, payload) else {
            return TriggerResult::error("missing path");
        };
        let script = self.setting(payload, "script", &self.defaults.payload.script);
        let script_path = path.join(&script);

        log_status!("job", "Submitting {}", script_path.display());
        TriggerResult::from_call(self.executor.spawn(
            &self.defaults.programs.batch_submit,
            &[script_path.display().to_string()],
            Some(&path),
        ))
    }

    /// Run the payload `script` string through the shell from inside `path`.
    pub(super) fn run_script(&self, node: &Node, payload: &Payload) -> TriggerResult {
        let (Some(path), Some(script)) = (self.resolve_path(node, payload), payload.str("script"))
        else {
            return TriggerResult::error("missing path/script");
        };

        log_status!("script", "Running in {}", path.display());
        TriggerResult::from_call(self.executor.shell(&script, Some(&path)))
    }
}
