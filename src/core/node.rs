use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::{Error, Result};
use crate::paths;

/// A named target (repository, host, or cluster) with optional metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,

    /// Fallback repository identifier when `repo` is unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn with_repo(mut self, repo: impl Into<String>) -> Self {
        self.repo = Some(repo.into());
        self
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn path(&self) -> Option<&str> {
        non_empty(&self.path)
    }

    pub fn owner(&self) -> Option<&str> {
        non_empty(&self.owner)
    }

    pub fn repo(&self) -> Option<&str> {
        non_empty(&self.repo)
    }

    pub fn slug(&self) -> Option<&str> {
        non_empty(&self.slug)
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

// ============================================================================
// Registry
// ============================================================================

/// Load nodes from a JSON spec (inline, @file, or - for stdin).
pub fn from_spec(spec: &str) -> Result<Vec<Node>> {
    let raw = config::read_json_spec_to_string(spec)?;
    config::from_str(&raw, "parse node list")
}

/// Load the node registry from nodes.json in the config dir.
pub fn load_registry() -> Result<Vec<Node>> {
    config::load_optional(&paths::nodes_json()?)
}

/// Load nodes from `spec` when given, otherwise from the registry.
pub fn load(spec: Option<&str>) -> Result<Vec<Node>> {
    match spec {
        Some(spec) => from_spec(spec),
        None => load_registry(),
    }
}

pub fn find<'a>(nodes: &'a [Node], name: &str) -> Result<&'a Node> {
    nodes.iter().find(|n| n.name == name).ok_or_else(|| {
        Error::node_not_found(name, nodes.iter().map(|n| n.name.clone()).collect())
    })
}
