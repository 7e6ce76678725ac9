//! Worker connection count from a socket-listing command.
//!
//! Runs `netstat -tapn` (or a configured equivalent) and counts the output
//! lines that mention the worker process name. The command runs on a small
//! private runtime so it can be bounded by a timeout and killed when it
//! overruns.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

use super::ProcessCountSource;
use crate::error::SourceError;

/// Counts lines of a command's output that contain a filter string.
pub struct NetstatCounter {
    program: String,
    args: Vec<String>,
    filter: String,
    timeout: Duration,
    description: String,
    runtime: Runtime,
}

impl std::fmt::Debug for NetstatCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetstatCounter")
            .field("description", &self.description)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl NetstatCounter {
    /// Create a counter for `program args...` filtered by `filter`.
    pub fn new(
        program: impl Into<String>,
        args: Vec<String>,
        filter: impl Into<String>,
        timeout: Duration,
    ) -> std::io::Result<Self> {
        let program = program.into();
        let filter = filter.into();
        let description = format!("{} {} | grep {}", program, args.join(" "), filter);
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self {
            program,
            args,
            filter,
            timeout,
            description,
            runtime,
        })
    }

    /// The default `netstat -tapn` counter for a process name.
    pub fn netstat(filter: impl Into<String>, timeout: Duration) -> std::io::Result<Self> {
        Self::new("netstat", vec!["-tapn".to_string()], filter, timeout)
    }

    async fn run(&self) -> Result<String, SourceError> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| SourceError::Command(format!("{}: {}", self.program, e)))?;

        if !output.status.success() {
            return Err(SourceError::Command(format!(
                "{} exited with {}",
                self.program, output.status
            )));
        }

        String::from_utf8(output.stdout)
            .map_err(|_| SourceError::parse(&self.program, "non UTF-8 output"))
    }
}

impl ProcessCountSource for NetstatCounter {
    fn fetch(&mut self) -> Result<u64, SourceError> {
        let limit = self.timeout;
        let stdout = self
            .runtime
            .block_on(async { tokio::time::timeout(limit, self.run()).await })
            .map_err(|_| SourceError::Timeout(limit))??;

        let count = count_matching_lines(&stdout, &self.filter);
        debug!(program = %self.program, filter = %self.filter, count, "counted worker connections");
        Ok(count)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Number of lines in `output` containing `filter`.
pub fn count_matching_lines(output: &str, filter: &str) -> u64 {
    output.lines().filter(|line| line.contains(filter)).count() as u64
}
