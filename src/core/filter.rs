//! Node filters.
//!
//! Each filter takes the full node list and one criterion, and returns the
//! matching subset in input order. Criteria outside the recognized set pass
//! the input through unchanged. Filters never compose on their own; callers
//! chain them.

use regex::Regex;

use crate::error::{Error, Result};
use crate::node::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receiver {
    Github,
    Hpcc,
}

impl Receiver {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "github" => Some(Receiver::Github),
            "hpcc" => Some(Receiver::Hpcc),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionWhere {
    Github,
    Hpcc,
}

impl ActionWhere {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "github" => Some(ActionWhere::Github),
            "hpcc" => Some(ActionWhere::Hpcc),
            _ => None,
        }
    }

    fn matches(&self, name: &str) -> bool {
        match self {
            // Case-sensitive on purpose: only the hpcc branch folds case.
            ActionWhere::Github => name.contains("github"),
            ActionWhere::Hpcc => name.to_lowercase().contains("hpcc"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionClient {
    Macbook,
    RockyDesktop,
}

impl ActionClient {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "macbook" => Some(ActionClient::Macbook),
            "rockydesktop" => Some(ActionClient::RockyDesktop),
            _ => None,
        }
    }

    /// Name fragment that marks a node as reachable from this client.
    fn marker(&self) -> &'static str {
        match self {
            ActionClient::Macbook => "owner",
            ActionClient::RockyDesktop => "quay",
        }
    }
}

/// Name pattern for `filter_by_repo_name`: a regex, or a literal substring.
#[derive(Debug, Clone)]
pub struct RepoPattern {
    regex: Regex,
}

impl RepoPattern {
    pub fn regex(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| {
            Error::validation_invalid_argument(
                "repo",
                format!("Invalid repo name pattern '{}': {}", pattern, e),
                None,
                None,
            )
        })?;
        Ok(Self { regex })
    }

    pub fn literal(text: &str) -> Result<Self> {
        Self::regex(&regex::escape(text))
    }

    pub fn is_match(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

fn keep(nodes: &[Node], pred: impl Fn(&Node) -> bool) -> Vec<Node> {
    nodes.iter().filter(|n| pred(n)).cloned().collect()
}

/// Keep nodes with both owner and repo set when `receiver` is a known tag.
///
/// Which receiver was given does not change the predicate.
pub fn filter_by_receiver(nodes: &[Node], receiver: &str) -> Vec<Node> {
    if Receiver::from_tag(receiver).is_none() {
        return nodes.to_vec();
    }
    keep(nodes, |n| n.owner().is_some() && n.repo().is_some())
}

pub fn filter_by_action_where(nodes: &[Node], action_where: &str) -> Vec<Node> {
    match ActionWhere::from_tag(action_where) {
        Some(w) => keep(nodes, |n| w.matches(&n.name)),
        None => nodes.to_vec(),
    }
}

pub fn filter_by_action_client(nodes: &[Node], client: &str) -> Vec<Node> {
    match ActionClient::from_tag(client) {
        Some(c) => keep(nodes, |n| n.name.contains(c.marker())),
        None => nodes.to_vec(),
    }
}

/// Keep nodes whose name matches `pattern` anywhere (unanchored search).
pub fn filter_by_repo_name(nodes: &[Node], pattern: &RepoPattern) -> Vec<Node> {
    keep(nodes, |n| pattern.is_match(&n.name))
}

/// Filters applied in a fixed order: receiver, where, client, repo name.
#[derive(Debug, Clone, Default)]
pub struct FilterChain {
    pub receiver: Option<String>,
    pub action_where: Option<String>,
    pub client: Option<String>,
    pub repo: Option<RepoPattern>,
}

impl FilterChain {
    pub fn apply(&self, nodes: &[Node]) -> Vec<Node> {
        let mut out = nodes.to_vec();
        if let Some(receiver) = &self.receiver {
            out = filter_by_receiver(&out, receiver);
        }
        if let Some(action_where) = &self.action_where {
            out = filter_by_action_where(&out, action_where);
        }
        if let Some(client) = &self.client {
            out = filter_by_action_client(&out, client);
        }
        if let Some(pattern) = &self.repo {
            out = filter_by_repo_name(&out, pattern);
        }
        out
    }
}
