use crate::invocation::{Invocation, ToolOutput};
use crate::{Error, Result};
use std::process::Output;

/// Executes an external tool and captures its result. Implemented by the
/// plain and elevated runners; tests provide their own recording fakes.
pub trait Runner: Send + Sync {
    fn run(&self, invocation: &Invocation) -> Result<ToolOutput>;
}

fn capture(invocation: &Invocation, output: Output) -> ToolOutput {
    // A signal-terminated child has no exit code; report -1.
    let code = output.status.code().unwrap_or(-1);
    invocation.output(
        code,
        String::from_utf8_lossy(&output.stdout).into_owned(),
        String::from_utf8_lossy(&output.stderr).into_owned(),
    )
}

/// Runs the program directly, blocking until it exits with both output
/// streams fully buffered.
#[derive(Debug, Default)]
pub struct DirectRunner;

impl DirectRunner {
    pub fn new() -> Self {
        Self
    }

    /// Non-blocking variant with identical completion semantics, for callers
    /// that must not stall a cooperative scheduler.
    pub async fn run_async(&self, invocation: &Invocation) -> Result<ToolOutput> {
        let output = tokio::process::Command::new(invocation.program())
            .args(invocation.arguments())
            .output()
            .await
            .map_err(|e| Error::Spawn {
                program: invocation.program().to_string(),
                source: e,
            })?;
        Ok(capture(invocation, output))
    }
}

impl Runner for DirectRunner {
    fn run(&self, invocation: &Invocation) -> Result<ToolOutput> {
        let output = std::process::Command::new(invocation.program())
            .args(invocation.arguments())
            .output()
            .map_err(|e| Error::Spawn {
                program: invocation.program().to_string(),
                source: e,
            })?;
        Ok(capture(invocation, output))
    }
}

/// Re-invokes the program through `sudo -A -E`, forwarding the argument
/// contract unchanged. `-A` makes sudo read credentials from the configured
/// askpass agent instead of prompting; if elevation cannot be obtained
/// non-interactively the call fails like any other non-zero exit.
#[derive(Debug, Default)]
pub struct SudoRunner;

const SUDO_ARGS: [&str; 2] = ["-A", "-E"];

impl SudoRunner {
    pub fn new() -> Self {
        Self
    }

    pub async fn run_async(&self, invocation: &Invocation) -> Result<ToolOutput> {
        let output = tokio::process::Command::new("sudo")
            .args(SUDO_ARGS)
            .arg(invocation.program())
            .args(invocation.arguments())
            .output()
            .await
            .map_err(|e| Error::Spawn {
                program: invocation.program().to_string(),
                source: e,
            })?;
        Ok(capture(invocation, output))
    }
}

impl Runner for SudoRunner {
    fn run(&self, invocation: &Invocation) -> Result<ToolOutput> {
        let output = std::process::Command::new("sudo")
            .args(SUDO_ARGS)
            .arg(invocation.program())
            .args(invocation.arguments())
            .output()
            .map_err(|e| Error::Spawn {
                program: invocation.program().to_string(),
                source: e,
            })?;
        Ok(capture(invocation, output))
    }
}
