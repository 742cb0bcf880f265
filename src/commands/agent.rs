use clap::{Args, Subcommand};
use serde::Serialize;

use bloom::agent::{self, FilterAgent};
use bloom::node::Node;

use super::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct AgentArgs {
    #[command(subcommand)]
    command: AgentCommand,
}

#[derive(Subcommand)]
enum AgentCommand {
    /// List filter agents from agents.json
    List,
    /// Select nodes for an agent under a context key
    Filter {
        /// Agent id
        id: String,
        /// Context key deciding where actions run
        #[arg(long)]
        context_key: Option<String>,
    },
}

#[derive(Debug, Serialize)]
pub struct AgentOutput {
    command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    agents: Option<Vec<FilterAgent>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    agent: Option<FilterAgent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    context_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    nodes: Option<Vec<Node>>,
}

pub fn run(args: AgentArgs, global: &GlobalArgs) -> CmdResult<AgentOutput> {
    let agents = agent::load_all()?;

    match args.command {
        AgentCommand::List => Ok((
            AgentOutput {
                command: "agent.list".to_string(),
                agents: Some(agents),
                agent: None,
                context_key: None,
                count: None,
                nodes: None,
            },
            0,
        )),
        AgentCommand::Filter { id, context_key } => {
            let found = agent::find(&agents, &id)?;
            let nodes = global.load_nodes()?;
            let selected = agent::filter_nodes_for_agent(&nodes, found, context_key.as_deref());

            Ok((
                AgentOutput {
                    command: "agent.filter".to_string(),
                    agents: None,
                    agent: Some(found.clone()),
                    context_key,
                    count: Some(selected.len()),
                    nodes: Some(selected),
                },
                0,
            ))
        }
    }
}
