use clap::{Args, Subcommand};
use serde::Serialize;

use bloom::node::{self, Node};

use super::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct NodeArgs {
    #[command(subcommand)]
    command: NodeCommand,
}

#[derive(Subcommand)]
enum NodeCommand {
    /// List all known nodes
    List,
    /// Show a single node by name
    Show {
        /// Node name
        name: String,
    },
}

#[derive(Debug, Serialize)]
pub struct NodeOutput {
    command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    nodes: Option<Vec<Node>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    node: Option<Node>,
}

pub fn run(args: NodeArgs, global: &GlobalArgs) -> CmdResult<NodeOutput> {
    let nodes = global.load_nodes()?;

    match args.command {
        NodeCommand::List => Ok((
            NodeOutput {
                command: "node.list".to_string(),
                count: Some(nodes.len()),
                nodes: Some(nodes),
                node: None,
            },
            0,
        )),
        NodeCommand::Show { name } => {
            let found = node::find(&nodes, &name)?.clone();
            Ok((
                NodeOutput {
                    command: "node.show".to_string(),
                    count: None,
                    nodes: None,
                    node: Some(found),
                },
                0,
            ))
        }
    }
}
