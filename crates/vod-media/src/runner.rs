//! External tool invocation.
//!
//! Prober and transcoder logic is written against the `MediaToolRunner`
//! capability so tests can substitute a scripted runner and never spawn
//! real binaries.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::{MediaError, MediaResult};

/// Captured result of one external tool invocation.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Process exit code, if the process exited normally
    pub exit_code: Option<i32>,
    /// Captured stdout
    pub stdout: Vec<u8>,
    /// Captured stderr
    pub stderr: Vec<u8>,
}

impl ToolOutput {
    /// Whether the tool exited with status zero.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Stderr as lossy UTF-8, for log messages.
    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Capability for invoking an external media tool.
#[async_trait]
pub trait MediaToolRunner: Send + Sync {
    /// Run `program` with `args`, capturing output. An `Err` means the
    /// process could not be run at all; a non-zero exit is reported through
    /// `ToolOutput`, not as an `Err`.
    async fn run(&self, program: &str, args: &[String]) -> MediaResult<ToolOutput>;
}

/// Runner that spawns real processes.
#[derive(Debug, Clone, Default)]
pub struct SystemToolRunner;

impl SystemToolRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MediaToolRunner for SystemToolRunner {
    async fn run(&self, program: &str, args: &[String]) -> MediaResult<ToolOutput> {
        which::which(program).map_err(|_| MediaError::ToolNotFound(program.to_string()))?;

        debug!("Running {} {}", program, args.join(" "));

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        Ok(ToolOutput {
            exit_code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_requires_zero_exit() {
        let ok = ToolOutput {
            exit_code: Some(0),
            stdout: Vec::new(),
            stderr: Vec::new(),
        };
        let failed = ToolOutput {
            exit_code: Some(1),
            stdout: Vec::new(),
            stderr: b"boom".to_vec(),
        };
        let killed = ToolOutput {
            exit_code: None,
            stdout: Vec::new(),
            stderr: Vec::new(),
        };

        assert!(ok.success());
        assert!(!failed.success());
        assert!(!killed.success());
        assert_eq!(failed.stderr_text(), "boom");
    }
}
