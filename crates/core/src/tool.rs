use std::{
    ffi::{OsStr, OsString},
    fmt,
    path::Path,
    process::Stdio,
};

use tokio::process::Command;

use crate::error::Result;

/// A fully structured external command. Arguments are never passed through a shell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub program: &'static str,
    pub args: Vec<OsString>,
}

impl Invocation {
    pub fn new(program: &'static str) -> Self {
        Self {
            program,
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// The file the invocation writes; by contract always the last argument.
    pub fn output_path(&self) -> Option<&Path> {
        self.args.last().map(Path::new)
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// How an external command ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolOutcome {
    pub success: bool,
    pub code: Option<i32>,
    pub stderr: String,
}

impl ToolOutcome {
    pub fn ok() -> Self {
        Self {
            success: true,
            code: Some(0),
            stderr: String::new(),
        }
    }

    /// Human readable failure reason
    pub fn reason(&self) -> String {
        let code = match self.code {
            Some(code) => format!("process exited with code {}", code),
            None => "process was terminated by a signal".to_string(),
        };
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            code
        } else {
            format!("{}: {}", code, stderr)
        }
    }
}

/// Runs external media tools. Swapped for a recording stub in tests.
#[allow(async_fn_in_trait)]
pub trait ToolRunner {
    /// Run to completion. `Err` means the process could not be started at all.
    async fn run(&self, invocation: &Invocation) -> Result<ToolOutcome>;
}

impl<T: ToolRunner> ToolRunner for &T {
    async fn run(&self, invocation: &Invocation) -> Result<ToolOutcome> {
        (**self).run(invocation).await
    }
}

/// Spawns the real binaries from PATH.
#[derive(Clone, Debug, Default)]
pub struct ProcessRunner {
    /// Pass the tool's own output through to the terminal.
    pub verbose: bool,
}

impl ProcessRunner {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl ToolRunner for ProcessRunner {
    async fn run(&self, invocation: &Invocation) -> Result<ToolOutcome> {
        tracing::info!(command = %invocation, "invoking");

        let mut command = Command::new(invocation.program);
        command.args(&invocation.args).stdin(Stdio::null());

        if self.verbose {
            let status = command
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit())
                .status()
                .await?;
            return Ok(ToolOutcome {
                success: status.success(),
                code: status.code(),
                stderr: String::new(),
            });
        }

        let output = command.output().await?;
        Ok(ToolOutcome {
            success: output.status.success(),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Whether `program <version_flag>` can be run from PATH.
pub fn is_on_path(program: &str, version_flag: &str) -> bool {
    std::process::Command::new(program)
        .arg(version_flag)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
