//! External command execution
//!
//! Commands are spawned directly with an argv array (no shell). Their stdout
//! and stderr are captured and echoed so the pipeline log shows exactly what
//! each step printed.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command as ProcessCommand;

use tracing::{debug, warn};

use crate::{MadDbError, Result};

/// A program plus arguments, run in an optional working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
}

/// Captured result of one command
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
}

impl Command {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.working_dir = Some(dir.to_path_buf());
        self
    }

    /// Run the command and echo its output. A non-zero exit is not an error here.
    pub fn execute(&self) -> Result<ExecutionResult> {
        debug!("Executing: {}", self);

        let mut process = ProcessCommand::new(&self.program);
        process.args(&self.args);
        if let Some(dir) = &self.working_dir {
            process.current_dir(dir);
        }

        let output = process.output().map_err(|source| MadDbError::CommandSpawn {
            command: self.to_string(),
            source,
        })?;

        let result = ExecutionResult {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            success: output.status.success(),
        };

        if let Err(e) = std::io::stdout().write_all(result.stdout.as_bytes()) {
            warn!("Failed to echo stdout of `{}`: {}", self, e);
        }
        if let Err(e) = std::io::stderr().write_all(result.stderr.as_bytes()) {
            warn!("Failed to echo stderr of `{}`: {}", self, e);
        }

        debug!("`{}` exited with {:?}", self, result.exit_code);
        Ok(result)
    }

    /// Run the command and fail on a non-zero exit
    pub fn run(&self) -> Result<ExecutionResult> {
        let result = self.execute()?;
        if !result.success {
            return Err(MadDbError::CommandFailed {
                command: self.to_string(),
                code: result.exit_code,
            });
        }
        Ok(result)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " {:?}", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}
