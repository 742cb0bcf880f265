use clap::Args;
use serde::Serialize;

use bloom::filter::{FilterChain, RepoPattern};
use bloom::node::Node;

use super::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct FilterArgs {
    /// Receiver tag (github, hpcc)
    #[arg(long)]
    receiver: Option<String>,

    /// Where the action runs (github, hpcc)
    #[arg(long = "where", value_name = "WHERE")]
    action_where: Option<String>,

    /// Client tag (macbook, rockydesktop)
    #[arg(long)]
    client: Option<String>,

    /// Regex matched against node names
    #[arg(long, value_name = "PATTERN")]
    repo: Option<String>,

    /// Treat --repo as literal text instead of a regex
    #[arg(long, requires = "repo")]
    literal: bool,
}

#[derive(Debug, Default, Serialize)]
pub struct AppliedFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    receiver: Option<String>,
    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    action_where: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    client: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    repo: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FilterOutput {
    command: String,
    filters: AppliedFilters,
    total: usize,
    count: usize,
    nodes: Vec<Node>,
}

pub fn run(args: FilterArgs, global: &GlobalArgs) -> CmdResult<FilterOutput> {
    let nodes = global.load_nodes()?;

    let repo = match args.repo.as_deref() {
        Some(text) if args.literal => Some(RepoPattern::literal(text)?),
        Some(pattern) => Some(RepoPattern::regex(pattern)?),
        None => None,
    };

    let filters = AppliedFilters {
        receiver: args.receiver.clone(),
        action_where: args.action_where.clone(),
        client: args.client.clone(),
        repo: repo.as_ref().map(|p| p.as_str().to_string()),
    };

    let chain = FilterChain {
        receiver: args.receiver,
        action_where: args.action_where,
        client: args.client,
        repo,
    };
    let matched = chain.apply(&nodes);

    Ok((
        FilterOutput {
            command: "filter".to_string(),
            filters,
            total: nodes.len(),
            count: matched.len(),
            nodes: matched,
        },
        0,
    ))
}
