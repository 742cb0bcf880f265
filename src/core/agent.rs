use serde::{Deserialize, Serialize};

use crate::config;
use crate::context::Route;
use crate::error::{Error, Result};
use crate::node::Node;
use crate::paths;

/// A named filter configuration from agents.json.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterAgent {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub filter_criteria: FilterCriteria,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_where: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shell: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcs: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct AgentsFile {
    #[serde(default, alias = "blooming_directed_graph_filter_agents")]
    filter_agents: Vec<FilterAgent>,
}

pub fn parse(content: &str) -> Result<Vec<FilterAgent>> {
    let file: AgentsFile = config::from_str(content, "parse filter agents")?;
    Ok(file.filter_agents)
}

/// Load agents.json from the config dir; missing file means no agents.
pub fn load_all() -> Result<Vec<FilterAgent>> {
    let file: AgentsFile = config::load_optional(&paths::agents_json()?)?;
    Ok(file.filter_agents)
}

pub fn find<'a>(agents: &'a [FilterAgent], id: &str) -> Result<&'a FilterAgent> {
    agents
        .iter()
        .find(|a| a.id == id)
        .ok_or_else(|| Error::agent_not_found(id, agents.iter().map(|a| a.id.clone()).collect()))
}

/// All nodes, unless the agent pins an `action_where` and the context key
/// routes elsewhere, in which case none.
pub fn filter_nodes_for_agent(
    nodes: &[Node],
    agent: &FilterAgent,
    context_key: Option<&str>,
) -> Vec<Node> {
    let action_where = agent
        .filter_criteria
        .action_where
        .as_deref()
        .filter(|w| !w.is_empty());
    let context_key = context_key.filter(|k| !k.is_empty());

    match (action_where, context_key) {
        (Some(action_where), Some(key)) => {
            if Route::for_key(Some(key)).where_tag() == Some(action_where) {
                nodes.to_vec()
            } else {
                Vec::new()
            }
        }
        _ => nodes.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AGENTS: &str = r#"{
        "blooming_directed_graph_filter_agents": [
            {"id": "git", "name": "Git agent", "role": "vcs",
             "filter_criteria": {"vcs": "git"}},
            {"id": "github", "name": "GitHub agent", "role": "action_where",
             "filter_criteria": {"action_where": "github"}},
            {"id": "hpcc", "name": "HPCC agent", "role": "action_where",
             "filter_criteria": {"action_where": "hpcc"}}
        ]
    }"#;

    fn nodes() -> Vec<Node> {
        vec![Node::new("owner-github-api"), Node::new("quay_hpcc_login")]
    }

    #[test]
    fn parses_legacy_collection_key() {
        let agents = parse(AGENTS).unwrap();
        assert_eq!(agents.len(), 3);
        assert_eq!(agents[1].filter_criteria.action_where.as_deref(), Some("github"));
    }

    #[test]
    fn matching_route_keeps_all_nodes() {
        let agents = parse(AGENTS).unwrap();
        let github = find(&agents, "github").unwrap();
        assert_eq!(filter_nodes_for_agent(&nodes(), github, Some("owner_github_qwen")), nodes());
    }

    #[test]
    fn mismatched_route_drops_everything() {
        let agents = parse(AGENTS).unwrap();
        let hpcc = find(&agents, "hpcc").unwrap();
        assert!(filter_nodes_for_agent(&nodes(), hpcc, Some("owner_github_qwen")).is_empty());
        assert!(filter_nodes_for_agent(&nodes(), hpcc, Some("desk_granite")).is_empty());
    }

    #[test]
    fn no_key_or_no_criteria_passes_through() {
        let agents = parse(AGENTS).unwrap();
        let hpcc = find(&agents, "hpcc").unwrap();
        let git = find(&agents, "git").unwrap();

        assert_eq!(filter_nodes_for_agent(&nodes(), hpcc, None), nodes());
        assert_eq!(filter_nodes_for_agent(&nodes(), hpcc, Some("")), nodes());
        assert_eq!(filter_nodes_for_agent(&nodes(), git, Some("quay_hpcc_granite")), nodes());
    }

    #[test]
    fn unknown_agent_lists_known_ids() {
        let agents = parse(AGENTS).unwrap();
        let err = find(&agents, "zsh").unwrap_err();
        assert_eq!(err.code.as_str(), "agent.not_found");
        assert_eq!(err.details["available"][0], "git");
    }
}
