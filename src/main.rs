use clap::{Parser, Subcommand};

use commands::GlobalArgs;

mod commands;
mod output;
mod tty;

use commands::{agent, config, context, filter, node, trigger};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "bloom")]
#[command(version = VERSION)]
#[command(about = "Filter nodes and trigger actions against them")]
struct Cli {
    /// Node list spec (inline JSON, @file, or - for stdin); defaults to nodes.json
    #[arg(long, global = true, value_name = "SPEC")]
    nodes: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect the node registry
    #[command(visible_alias = "nodes")]
    Node(node::NodeArgs),
    /// Select nodes by receiver, where, client and repo name
    Filter(filter::FilterArgs),
    /// Run one action against a node
    Trigger(trigger::TriggerArgs),
    /// Resolve context keys
    Context(context::ContextArgs),
    /// Filter agents from agents.json
    #[command(visible_alias = "agents")]
    Agent(agent::AgentArgs),
    /// Show bloom configuration
    Config(config::ConfigArgs),
}

fn main() -> std::process::ExitCode {
    env_logger::Builder::from_env(env_logger::Env::new().filter_or("BLOOM_LOG", "warn")).init();

    let cli = Cli::parse();
    let global = GlobalArgs { nodes: cli.nodes };

    let (json_result, exit_code) = commands::run_json(cli.command, &global);
    output::print_json_result(json_result);

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
