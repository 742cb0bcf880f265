//! The one seam through which the dispatcher touches the outside world.
//!
//! `SystemExecutor` spawns real processes and issues real HTTP requests.
//! Tests substitute a recording executor so dispatch logic runs without
//! side effects.

use serde_json::Value;
use std::path::Path;

use crate::error::Result;
use crate::http;
use crate::utils::command;

pub trait Executor {
    /// Run `program args...`, blocking until it exits; returns the exit code.
    fn spawn(&self, program: &str, args: &[String], cwd: Option<&Path>) -> Result<i32>;

    /// Run a command string through a shell; returns the exit code.
    fn shell(&self, command: &str, cwd: Option<&Path>) -> Result<i32>;

    /// POST a JSON body; returns the HTTP status code.
    fn post_json(&self, url: &str, headers: &[(String, String)], body: &Value) -> Result<u16>;
}

/// Real processes with inherited stdio, and a fresh blocking HTTP client per call.
#[derive(Debug, Clone)]
pub struct SystemExecutor {
    shell: String,
}

impl SystemExecutor {
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

impl Default for SystemExecutor {
    fn default() -> Self {
        Self::new("sh")
    }
}

impl Executor for SystemExecutor {
    fn spawn(&self, program: &str, args: &[String], cwd: Option<&Path>) -> Result<i32> {
        command::run_inherited(program, args, cwd)
    }

    fn shell(&self, command: &str, cwd: Option<&Path>) -> Result<i32> {
        command::run_shell_inherited(&self.shell, command, cwd)
    }

    fn post_json(&self, url: &str, headers: &[(String, String)], body: &Value) -> Result<u16> {
        http::post_json(url, headers, body)
    }
}
