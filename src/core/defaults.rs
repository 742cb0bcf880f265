use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::paths;

/// Root configuration structure for bloom.json
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BloomConfig {
    #[serde(default)]
    pub defaults: Defaults,
}

/// All configurable defaults that can be overridden via bloom.json
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Defaults {
    #[serde(default = "default_github")]
    pub github: GithubConfig,

    #[serde(default = "default_programs")]
    pub programs: ProgramsConfig,

    #[serde(default = "default_payload")]
    pub payload: PayloadDefaults,

    #[serde(default = "default_context")]
    pub context: ContextDefaults,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            github: default_github(),
            programs: default_programs(),
            payload: default_payload(),
            context: default_context(),
        }
    }
}

/// Workflow dispatch endpoint and credentials source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GithubConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Environment variable holding the bearer token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

/// External programs spawned by the dispatcher
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProgramsConfig {
    #[serde(default = "default_git")]
    pub git: String,

    #[serde(default = "default_batch_submit")]
    pub batch_submit: String,

    #[serde(default = "default_shell")]
    pub shell: String,
}

/// Fallbacks for payload keys that neither the payload nor the node supplies
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PayloadDefaults {
    #[serde(default = "default_ref", rename = "ref")]
    pub git_ref: String,

    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default = "default_branch")]
    pub branch: String,

    #[serde(default = "default_script")]
    pub script: String,
}

/// Where context-route commands find their scripts and projects
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContextDefaults {
    /// Holds `daily-github-sync.sh` and `connect-hpcc.sh`.
    #[serde(default = "default_scripts_dir")]
    pub scripts_dir: String,

    /// Used when neither `--projects-dir` nor `PROJECTS_DIR` is set.
    #[serde(default = "default_projects_dir")]
    pub projects_dir: String,
}

impl ContextDefaults {
    /// `scripts_dir` with `~` expanded.
    pub fn scripts_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.scripts_dir).as_ref())
    }
}

// =============================================================================
// Default value functions (match built-in behavior)
// =============================================================================

fn default_github() -> GithubConfig {
    GithubConfig {
        api_base: default_api_base(),
        token_env: default_token_env(),
    }
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

fn default_programs() -> ProgramsConfig {
    ProgramsConfig {
        git: default_git(),
        batch_submit: default_batch_submit(),
        shell: default_shell(),
    }
}

fn default_git() -> String {
    "git".to_string()
}

fn default_batch_submit() -> String {
    "sbatch".to_string()
}

fn default_shell() -> String {
    "sh".to_string()
}

fn default_payload() -> PayloadDefaults {
    PayloadDefaults {
        git_ref: default_ref(),
        remote: default_remote(),
        branch: default_branch(),
        script: default_script(),
    }
}

fn default_ref() -> String {
    "main".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_script() -> String {
    "job.sh".to_string()
}

fn default_context() -> ContextDefaults {
    ContextDefaults {
        scripts_dir: default_scripts_dir(),
        projects_dir: default_projects_dir(),
    }
}

fn default_scripts_dir() -> String {
    "~/.config/bloom/scripts".to_string()
}

fn default_projects_dir() -> String {
    "~/projects".to_string()
}

// =============================================================================
// Validation
// =============================================================================

impl Defaults {
    /// Reject values that would make every dispatch fail in a confusing way.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("defaults.github.api_base", &self.github.api_base),
            ("defaults.github.token_env", &self.github.token_env),
            ("defaults.programs.git", &self.programs.git),
            ("defaults.programs.batch_submit", &self.programs.batch_submit),
            ("defaults.programs.shell", &self.programs.shell),
            ("defaults.context.scripts_dir", &self.context.scripts_dir),
        ];

        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(Error::config_invalid_value(
                    key,
                    Some(value.clone()),
                    "must not be empty",
                ));
            }
        }

        Ok(())
    }
}

// =============================================================================
// Loading functions
// =============================================================================

/// Load the full bloom.json config. A missing file yields built-in defaults;
/// a malformed or invalid one is an error.
pub fn load_config() -> Result<BloomConfig> {
    let path = paths::bloom_json()?;

    if !path.exists() {
        return Ok(BloomConfig::default());
    }

    let content = fs::read_to_string(&path).map_err(|e| {
        Error::internal_io(e.to_string(), Some(format!("read {}", path.display())))
    })?;

    parse_config(&path.display().to_string(), &content)
}

fn parse_config(path: &str, content: &str) -> Result<BloomConfig> {
    let config: BloomConfig =
        serde_json::from_str(content).map_err(|e| Error::config_invalid_json(path, e))?;
    config.defaults.validate()?;
    Ok(config)
}

/// Load defaults, falling back to built-in values when bloom.json can't be read.
pub fn load_defaults() -> Defaults {
    match load_config() {
        Ok(config) => config.defaults,
        Err(err) => {
            log::warn!("Ignoring bloom.json: {} ({})", err.message, err.details);
            Defaults::default()
        }
    }
}

/// Get the path to bloom.json (for display purposes)
pub fn config_path() -> Result<String> {
    Ok(paths::bloom_json()?.display().to_string())
}
