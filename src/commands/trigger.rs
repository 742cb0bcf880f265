use clap::Args;
use serde::Serialize;

use bloom::node;
use bloom::{Payload, TriggerResult};

use super::{merge_json_sources, CmdResult, GlobalArgs};

#[derive(Args)]
pub struct TriggerArgs {
    /// Node name
    node: String,

    /// Action to run (workflow_dispatch, git_push, git_fetch, fetch_merge,
    /// push_merge, pull_merge, job_submit, run_script, notify)
    action: String,

    /// Payload JSON spec (inline, @file, or - for stdin)
    #[arg(value_name = "PAYLOAD", conflicts_with = "json")]
    spec: Option<String>,

    /// Payload JSON spec (alias for the positional PAYLOAD)
    #[arg(long, value_name = "PAYLOAD")]
    json: Option<String>,

    /// Payload overrides as --key value pairs (after --)
    #[arg(last = true, allow_hyphen_values = true)]
    extra: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TriggerOutput {
    command: String,
    node: String,
    action: String,
    #[serde(flatten)]
    result: TriggerResult,
}

pub fn run(args: TriggerArgs, global: &GlobalArgs) -> CmdResult<TriggerOutput> {
    let nodes = global.load_nodes()?;
    let target = node::find(&nodes, &args.node)?;

    let spec = args.json.as_deref().or(args.spec.as_deref());
    let payload = Payload::from_value(merge_json_sources(spec, &args.extra)?)?;

    crate::tty::status(&format!("Triggering {} on {}...", args.action, target.name));
    let result = bloom::trigger(target, &args.action, Some(&payload));
    let exit_code = if result.ok { 0 } else { 1 };

    Ok((
        TriggerOutput {
            command: "trigger".to_string(),
            node: target.name.clone(),
            action: args.action,
            result,
        },
        exit_code,
    ))
}
