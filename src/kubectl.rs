//! Invocation of the external resource CLI
//!
//! Listing and deleting both shell out. The `CommandRunner` trait is the
//! seam between the pipeline and the operating system, so every stage can
//! run against a scripted runner in tests.

use crate::error::{Error, Result};
use std::fmt;
use std::process::Command;
use tracing::debug;

/// Captured result of one external process run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, `None` when the process was killed by a signal
    pub code: Option<i32>,
}

impl CommandOutput {
    /// Output of a process that exited zero
    pub fn success<S: Into<String>>(stdout: S) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            code: Some(0),
        }
    }

    /// Output of a process that exited with `code`
    pub fn failure<S: Into<String>>(code: i32, stderr: S) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.into(),
            code: Some(code),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }

    /// Stdout followed by stderr, as an operator would see them
    pub fn combined(&self) -> String {
        let mut text = self.stdout.clone();
        if !text.is_empty() && !self.stderr.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&self.stderr);
        text
    }

    /// Human readable exit status
    pub fn status(&self) -> String {
        match self.code {
            Some(code) => format!("exit status {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Runs an external program to completion
pub trait CommandRunner {
    /// Run `program` with `args`, blocking until it exits
    ///
    /// A non-zero exit is not an error at this level; it is reported
    /// through `CommandOutput::code`. Only failing to start is.
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput>;
}

/// Runner backed by `std::process::Command`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        let output = Command::new(program).args(args).output().map_err(|e| {
            Error::ExternalProcess {
                command: CommandLine::new(program, args).to_string(),
                output: String::new(),
                reason: e.to_string(),
            }
        })?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            code: output.status.code(),
        })
    }
}

/// A program and its arguments, printable for the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    pub fn new(program: &str, args: &[String]) -> Self {
        Self {
            program: program.to_string(),
            args: args.to_vec(),
        }
    }
}

fn quote(word: &str) -> String {
    let plain = !word.is_empty()
        && !word
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '\\' | '$' | '`'));
    if plain {
        word.to_string()
    } else {
        format!("{:?}", word)
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", quote(arg))?;
        }
        Ok(())
    }
}

/// The external resource CLI, bound to a program name and a runner
pub struct Kubectl<'a> {
    program: String,
    runner: &'a dyn CommandRunner,
}

impl<'a> Kubectl<'a> {
    pub fn new<S: Into<String>>(program: S, runner: &'a dyn CommandRunner) -> Self {
        Self {
            program: program.into(),
            runner,
        }
    }

    /// The command line that `run` would execute
    pub fn command_line(&self, args: &[String]) -> CommandLine {
        CommandLine::new(&self.program, args)
    }

    /// Run the program, returning its output whatever the exit status
    pub fn run(&self, args: &[String]) -> Result<CommandOutput> {
        debug!(command = %self.command_line(args), "running external command");
        let output = self.runner.run(&self.program, args)?;
        debug!(status = %output.status(), "external command finished");
        Ok(output)
    }

    /// Run the program and fail unless it exits zero
    pub fn run_checked(&self, args: &[String]) -> Result<CommandOutput> {
        let output = self.run(args)?;
        if output.is_success() {
            Ok(output)
        } else {
            Err(Error::ExternalProcess {
                command: self.command_line(args).to_string(),
                output: output.combined(),
                reason: output.status(),
            })
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted runner shared by the pipeline tests

    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Replays canned outputs and records every invocation
    #[derive(Default)]
    pub struct FakeRunner {
        responses: RefCell<VecDeque<CommandOutput>>,
        calls: RefCell<Vec<CommandLine>>,
    }

    impl FakeRunner {
        pub fn new(responses: Vec<CommandOutput>) -> Self {
            Self {
                responses: RefCell::new(responses.into()),
                calls: RefCell::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> Vec<CommandLine> {
            self.calls.borrow().clone()
        }
    }

    impl CommandRunner for FakeRunner {
        fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
            self.calls.borrow_mut().push(CommandLine::new(program, args));
            Ok(self
                .responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| CommandOutput::success("")))
        }
    }

    pub fn args(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{args, FakeRunner};
    use super::*;

    #[test]
    fn test_combined_output_order() {
        let output = CommandOutput {
            stdout: "pod \"a\" deleted".to_string(),
            stderr: "warning: something".to_string(),
            code: Some(0),
        };
        assert_eq!(output.combined(), "pod \"a\" deleted\nwarning: something");
    }

    #[test]
    fn test_command_line_quotes_only_when_needed() {
        let line = CommandLine::new("kubectl", &args(&["get", "-l", "app in (a, b)"]));
        assert_eq!(line.to_string(), "kubectl get -l \"app in (a, b)\"");
    }

    #[test]
    fn test_run_checked_wraps_failure() {
        let runner = FakeRunner::new(vec![CommandOutput::failure(1, "forbidden")]);
        let kubectl = Kubectl::new("kubectl", &runner);
        let err = kubectl.run_checked(&args(&["get", "pods"])).unwrap_err();
        match err {
            Error::ExternalProcess {
                command,
                output,
                reason,
            } => {
                assert_eq!(command, "kubectl get pods");
                assert_eq!(output, "forbidden");
                assert_eq!(reason, "exit status 1");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_program_is_external_error() {
        let err = SystemRunner
            .run("kubectl-multidelete-does-not-exist", &args(&["get"]))
            .unwrap_err();
        assert_eq!(err.category(), "external");
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_captures_streams() {
        use std::fs;
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fake-kubectl");
        fs::write(
            &script,
            "#!/bin/sh\necho \"args: $*\"\necho 'to stderr' >&2\nexit 3\n",
        )
        .unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        let output = SystemRunner
            .run(script.to_str().unwrap(), &args(&["get", "pods"]))
            .unwrap();
        assert_eq!(output.stdout, "args: get pods\n");
        assert_eq!(output.stderr, "to stderr\n");
        assert_eq!(output.code, Some(3));
        assert!(!output.is_success());
    }
}
