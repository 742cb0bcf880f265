use clap::{Args, Subcommand};
use serde::Serialize;

use bloom::context::{self, ContextQuery, Route};
use bloom::defaults;
use bloom::host::SystemHost;

use super::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct ContextArgs {
    #[command(subcommand)]
    command: ContextCommand,
}

#[derive(Subcommand)]
enum ContextCommand {
    /// Resolve a context key and the route it selects
    Resolve {
        /// Explicit context key; wins over the parts below
        #[arg(long)]
        key: Option<String>,
        /// Project name
        #[arg(long)]
        project: Option<String>,
        /// Cluster name
        #[arg(long)]
        cluster: Option<String>,
        /// Model name
        #[arg(long)]
        model: Option<String>,
        /// Projects directory for the github sync (default: $PROJECTS_DIR, then config)
        #[arg(long)]
        projects_dir: Option<String>,
    },
}

#[derive(Debug, Serialize)]
pub struct ContextOutput {
    context_key: Option<String>,
    route: Route,
    #[serde(skip_serializing_if = "Option::is_none")]
    action_where: Option<String>,
    /// Shell command that carries out the route; null for local.
    command: Option<String>,
}

pub fn run(args: ContextArgs, _global: &GlobalArgs) -> CmdResult<ContextOutput> {
    match args.command {
        ContextCommand::Resolve {
            key,
            project,
            cluster,
            model,
            projects_dir,
        } => {
            let context_key = context::resolve_context_key(&ContextQuery {
                key: key.as_deref(),
                project: project.as_deref(),
                cluster: cluster.as_deref(),
                model: model.as_deref(),
            });
            let route = Route::for_key(context_key.as_deref());

            let settings = defaults::load_defaults().context;
            let projects_dir = context::resolve_projects_dir(
                projects_dir.as_deref(),
                &SystemHost,
                &settings.projects_dir,
            );
            let command = context::command_for_route(
                route,
                context_key.as_deref(),
                &settings.scripts_path(),
                &projects_dir,
            );

            Ok((
                ContextOutput {
                    context_key,
                    route,
                    action_where: route.where_tag().map(str::to_string),
                    command,
                },
                0,
            ))
        }
    }
}
