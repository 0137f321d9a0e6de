//! External process execution.
//!
//! Every script and system utility the connector drives is started through a
//! [`ProcessRunner`]. The default [`SystemRunner`] spawns real processes; tests
//! substitute a fake that records invocations and returns canned output.

use std::io;
use std::path::PathBuf;
use std::process::Command;

use tracing::debug;

/// Exit status and captured output of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, or `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Human readable description of a non-successful exit.
    pub fn describe_failure(&self) -> String {
        let status = match self.code {
            Some(code) => format!("exited with status {}", code),
            None => "terminated by signal".to_string(),
        };
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            status
        } else {
            format!("{} ({})", status, stderr)
        }
    }
}

/// Capability to run an external program to completion.
pub trait ProcessRunner {
    /// Runs `program` with `args`, blocking until it exits.
    ///
    /// An `Err` means the process could not be started at all; a process that
    /// starts and fails is reported through [`ProcessOutput::code`].
    fn run(&self, program: &str, args: &[String]) -> io::Result<ProcessOutput>;
}

impl<R: ProcessRunner + ?Sized> ProcessRunner for &R {
    fn run(&self, program: &str, args: &[String]) -> io::Result<ProcessOutput> {
        (**self).run(program, args)
    }
}

/// Runs processes on the host, inheriting the current environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> io::Result<ProcessOutput> {
        debug!(program, ?args, "spawning process");

        let output = Command::new(program).args(args).output()?;

        let result = ProcessOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(
            program,
            code = ?result.code,
            stdout = %result.stdout.trim_end(),
            stderr = %result.stderr.trim_end(),
            "process finished"
        );

        Ok(result)
    }
}

/// Location of the helper scripts and how to invoke them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptSet {
    /// Directory holding `scan.sh`, `connect.sh` and `disconnect.sh`.
    pub dir: PathBuf,
    /// Run the scripts through `sudo -E`.
    pub elevate: bool,
    /// Program that turns an SSID and passphrase into a network block.
    pub passphrase_tool: String,
}

pub const SCAN_SCRIPT: &str = "scan.sh";
pub const CONNECT_SCRIPT: &str = "connect.sh";
pub const DISCONNECT_SCRIPT: &str = "disconnect.sh";

impl Default for ScriptSet {
    fn default() -> Self {
        ScriptSet {
            dir: PathBuf::from("scripts"),
            elevate: true,
            passphrase_tool: "wpa_passphrase".to_string(),
        }
    }
}

impl ScriptSet {
    /// Builds the program and argument list for one of the helper scripts.
    pub fn command(&self, script: &str, args: &[String]) -> (String, Vec<String>) {
        let path = self.dir.join(script).to_string_lossy().into_owned();

        if self.elevate {
            let mut full = Vec::with_capacity(args.len() + 2);
            full.push("-E".to_string());
            full.push(path);
            full.extend_from_slice(args);
            ("sudo".to_string(), full)
        } else {
            (path, args.to_vec())
        }
    }

    /// Runs a helper script and returns its output regardless of exit status.
    pub fn run<R: ProcessRunner>(
        &self,
        runner: &R,
        script: &str,
        args: &[String],
    ) -> io::Result<ProcessOutput> {
        let (program, full_args) = self.command(script, args);
        runner.run(&program, &full_args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elevated_command_goes_through_sudo() {
        let scripts = ScriptSet::default();
        let (program, args) = scripts.command(CONNECT_SCRIPT, &["a.conf".into(), "s.txt".into()]);

        assert_eq!(program, "sudo");
        assert_eq!(args, vec!["-E", "scripts/connect.sh", "a.conf", "s.txt"]);
    }

    #[test]
    fn plain_command_runs_script_directly() {
        let scripts = ScriptSet {
            dir: PathBuf::from("/opt/wifi"),
            elevate: false,
            ..ScriptSet::default()
        };
        let (program, args) = scripts.command(SCAN_SCRIPT, &[]);

        assert_eq!(program, "/opt/wifi/scan.sh");
        assert!(args.is_empty());
    }

    #[test]
    fn failure_description_includes_stderr() {
        let output = ProcessOutput {
            code: Some(3),
            stdout: String::new(),
            stderr: "no such device\n".into(),
        };
        assert!(!output.success());
        assert_eq!(output.describe_failure(), "exited with status 3 (no such device)");

        let killed = ProcessOutput::default();
        assert_eq!(killed.describe_failure(), "terminated by signal");
    }

    #[test]
    fn system_runner_reports_spawn_failure() {
        let result = SystemRunner.run("/nonexistent/definitely-not-a-program", &[]);
        assert!(result.is_err());
    }
}
