//! Context keys: `<env>_<model>` strings that pick where an action runs.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::host::Host;
use crate::utils::shell::quote_arg;

const MODELS: [&str; 4] = ["granite", "deepseek", "qwen", "codellama"];
const DEFAULT_MODEL: &str = "granite";

pub const PROJECTS_DIR_ENV: &str = "PROJECTS_DIR";
const GITHUB_SYNC_SCRIPT: &str = "daily-github-sync.sh";
const HPCC_CONNECT_SCRIPT: &str = "connect-hpcc.sh";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Github,
    Hpcc,
    Local,
}

impl Route {
    /// "github" anywhere in the key wins over "hpcc"; no key is local.
    pub fn for_key(key: Option<&str>) -> Self {
        match key {
            Some(k) if k.contains("github") => Route::Github,
            Some(k) if k.contains("hpcc") => Route::Hpcc,
            _ => Route::Local,
        }
    }

    /// The `action_where` tag this route corresponds to, if any.
    pub fn where_tag(&self) -> Option<&'static str> {
        match self {
            Route::Github => Some("github"),
            Route::Hpcc => Some("hpcc"),
            Route::Local => None,
        }
    }
}

/// Inputs for building a context key when none is given explicitly.
#[derive(Debug, Clone, Default)]
pub struct ContextQuery<'a> {
    pub key: Option<&'a str>,
    pub project: Option<&'a str>,
    pub cluster: Option<&'a str>,
    pub model: Option<&'a str>,
}

pub fn resolve_context_key(query: &ContextQuery) -> Option<String> {
    if let Some(key) = query.key.filter(|k| !k.trim().is_empty()) {
        return Some(key.to_string());
    }

    let cluster = query.cluster.filter(|c| !c.is_empty())?.to_lowercase();
    let model = query.model.filter(|m| !m.is_empty())?.to_lowercase();
    let project = query.project.unwrap_or_default().to_lowercase();

    let env = if cluster.contains("hpcc") {
        if project.starts_with("owner") {
            "owner_hpcc"
        } else {
            "quay_hpcc"
        }
    } else if cluster.contains("github") {
        if project.starts_with("hpcc") {
            "hpcc_github"
        } else if project.starts_with("quay") {
            "quay_github"
        } else {
            "owner_github"
        }
    } else {
        "owner_github"
    };

    let model = MODELS
        .iter()
        .find(|m| **m == model)
        .copied()
        .unwrap_or(DEFAULT_MODEL);

    Some(format!("{}_{}", env, model))
}

/// Explicit dir, then `PROJECTS_DIR`, then the configured fallback; tilde-expanded.
pub fn resolve_projects_dir(explicit: Option<&str>, host: &dyn Host, fallback: &str) -> PathBuf {
    let raw = explicit
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .or_else(|| host.var(PROJECTS_DIR_ENV).filter(|d| !d.is_empty()))
        .unwrap_or_else(|| fallback.to_string());
    PathBuf::from(shellexpand::tilde(&raw).as_ref())
}

/// Shell command line that carries out `route` for `key`; local routes run nothing.
pub fn command_for_route(
    route: Route,
    key: Option<&str>,
    scripts_dir: &Path,
    projects_dir: &Path,
) -> Option<String> {
    let key = quote_arg(key.unwrap_or_default());

    match route {
        Route::Github => {
            let script = scripts_dir.join(GITHUB_SYNC_SCRIPT);
            Some(format!(
                "CONTEXT_KEY={} PROJECTS_DIR={} {} sync",
                key,
                quote_arg(&projects_dir.display().to_string()),
                quote_arg(&script.display().to_string())
            ))
        }
        Route::Hpcc => {
            let script = scripts_dir.join(HPCC_CONNECT_SCRIPT);
            Some(format!(
                "CONTEXT_KEY={} {}",
                key,
                quote_arg(&script.display().to_string())
            ))
        }
        Route::Local => None,
    }
}
