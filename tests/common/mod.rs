//! Shared test helpers.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use wifi_connector::{ProcessOutput, ProcessRunner, ScriptSet};

/// One recorded invocation: the script or tool name plus its own arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub name: String,
    pub args: Vec<String>,
}

#[derive(Debug)]
enum Reply {
    Output(ProcessOutput),
    SpawnError,
}

/// Process runner that records calls and answers from a script table.
///
/// Calls through `sudo -E <script>` are recorded under the script's file
/// name. Anything without a configured reply exits 0 with no output.
#[derive(Debug, Default)]
pub struct FakeRunner {
    replies: RefCell<HashMap<String, Reply>>,
    calls: RefCell<Vec<Call>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, name: &str, code: i32, stdout: &str) -> &Self {
        self.replies.borrow_mut().insert(
            name.to_string(),
            Reply::Output(ProcessOutput {
                code: Some(code),
                stdout: stdout.to_string(),
                stderr: String::new(),
            }),
        );
        self
    }

    pub fn fail_to_spawn(&self, name: &str) -> &Self {
        self.replies
            .borrow_mut()
            .insert(name.to_string(), Reply::SpawnError);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|c| c.name.clone()).collect()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}

fn file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

impl ProcessRunner for FakeRunner {
    fn run(&self, program: &str, args: &[String]) -> io::Result<ProcessOutput> {
        let (name, rest) = if program == "sudo" {
            assert_eq!(args.first().map(String::as_str), Some("-E"));
            (file_name(&args[1]), args[2..].to_vec())
        } else {
            (file_name(program), args.to_vec())
        };

        self.calls.borrow_mut().push(Call {
            name: name.clone(),
            args: rest,
        });

        match self.replies.borrow().get(&name) {
            Some(Reply::Output(output)) => Ok(output.clone()),
            Some(Reply::SpawnError) => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{}: not found", name),
            )),
            None => Ok(ProcessOutput {
                code: Some(0),
                ..ProcessOutput::default()
            }),
        }
    }
}

/// Scratch directory with config and status paths inside it.
pub struct Workspace {
    pub dir: TempDir,
    pub config: PathBuf,
    pub status: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let config = dir.path().join("wpa.conf");
        let status = dir.path().join("status.txt");
        Workspace {
            dir,
            config,
            status,
        }
    }
}

pub fn scripts() -> ScriptSet {
    ScriptSet::default()
}

pub const NETWORK_BLOCK: &str = "network={\n\tssid=\"Home\"\n\t#psk=\"password123\"\n\tpsk=9f2c1e\n}\n";
