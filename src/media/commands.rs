use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::error::{Result, EmanetError};

/// External tool invocation (yt-dlp, whisper, vlc, ...)
#[derive(Debug, Clone)]
pub struct ToolCommand {
    pub binary_path: String,
    pub args: Vec<String>,
    pub description: String,
}

/// Captured result of a finished command
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

impl ToolCommand {
    pub fn new<S1: Into<String>, S2: Into<String>>(binary_path: S1, description: S2) -> Self {
        Self {
            binary_path: binary_path.into(),
            args: Vec::new(),
            description: description.into(),
        }
    }

    /// Add an argument
    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(|s| s.into()));
        self
    }

    /// Add a path argument
    pub fn path<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg(path.as_ref().to_string_lossy().to_string())
    }

    /// Add `flag value`
    pub fn option<S1: Into<String>, S2: Into<String>>(self, flag: S1, value: S2) -> Self {
        self.arg(flag).arg(value)
    }

    /// Add `flag value` only when a value is present
    pub fn option_if<S1: Into<String>, S2: Into<String>>(self, flag: S1, value: Option<S2>) -> Self {
        match value {
            Some(value) => self.option(flag, value),
            None => self,
        }
    }

    /// Command line as a single string, for logs
    pub fn display(&self) -> String {
        std::iter::once(self.binary_path.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run to completion, failing on a non-zero exit status
    pub async fn execute(&self) -> Result<ToolOutput> {
        debug!("Executing: {}", self.display());
        debug!("Description: {}", self.description);

        let output = Command::new(&self.binary_path)
            .args(&self.args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| EmanetError::Media(format!(
                "Failed to execute {}: {}", self.binary_path, e
            )))?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            return Err(EmanetError::Media(format!(
                "{} failed ({}): {}",
                self.description,
                output.status,
                stderr.trim()
            )));
        }

        Ok(ToolOutput { stdout, stderr })
    }

    /// Start the program without waiting for it to exit
    pub fn spawn_detached(&self) -> Result<u32> {
        debug!("Spawning: {}", self.display());

        let child = Command::new(&self.binary_path)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| EmanetError::Media(format!(
                "Failed to start {}: {}", self.binary_path, e
            )))?;

        Ok(child.id().unwrap_or_default())
    }

    /// True when the binary can be started and exits successfully
    pub async fn probe(&self) -> bool {
        self.execute().await.is_ok()
    }
}
