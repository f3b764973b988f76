use crate::{Error, Result};
use std::collections::HashMap;

/// One external tool call: program, arguments, and optional per-exit-code
/// message overrides. Built once, handed to a [`crate::Runner`].
#[derive(Debug, Clone)]
pub struct Invocation {
    program: String,
    args: Vec<String>,
    exit_messages: HashMap<i32, String>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            exit_messages: HashMap::new(),
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

    /// Replace the generic failure text for a known non-zero exit code with
    /// a descriptive message.
    pub fn exit_message(mut self, code: i32, message: impl Into<String>) -> Self {
        self.exit_messages.insert(code, message.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    /// Assemble the captured result of running this invocation. Runners call
    /// this so the exit-code message table travels with the output.
    pub fn output(&self, code: i32, stdout: String, stderr: String) -> ToolOutput {
        ToolOutput {
            program: self.program.clone(),
            code,
            stdout,
            stderr,
            exit_messages: self.exit_messages.clone(),
        }
    }
}

/// Captured result of one tool call. Exit code 0 is success; everything else
/// is a failure unless the caller tolerates it explicitly.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    program: String,
    code: i32,
    stdout: String,
    stderr: String,
    exit_messages: HashMap<i32, String>,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.code == 0
    }

    pub fn code(&self) -> i32 {
        self.code
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stdout_trimmed(&self) -> &str {
        self.stdout.trim()
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    /// Fail with [`Error::ToolFailed`] on a non-zero exit code, using the
    /// registered override message for that code when one exists, else the
    /// raw stderr text.
    pub fn require_success(self) -> Result<Self> {
        if self.code == 0 {
            return Ok(self);
        }
        let message = match self.exit_messages.get(&self.code) {
            Some(message) => message.clone(),
            None => self.stderr.trim().to_string(),
        };
        Err(Error::ToolFailed {
            program: self.program,
            code: self.code,
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_builder() {
        let inv = Invocation::new("xdg-mime")
            .arg("install")
            .args(["--mode", "system"]);
        assert_eq!(inv.program(), "xdg-mime");
        assert_eq!(inv.arguments(), ["install", "--mode", "system"]);
    }

    #[test]
    fn test_require_success_on_zero() {
        let inv = Invocation::new("true");
        let out = inv.output(0, String::new(), String::new());
        assert!(out.require_success().is_ok());
    }

    #[test]
    fn test_require_success_uses_stderr() {
        let inv = Invocation::new("tool");
        let out = inv.output(1, String::new(), "boom\n".to_string());
        let err = out.require_success().unwrap_err();
        match err {
            Error::ToolFailed {
                program,
                code,
                message,
            } => {
                assert_eq!(program, "tool");
                assert_eq!(code, 1);
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_require_success_prefers_mapped_message() {
        let inv = Invocation::new("tool").exit_message(2, "executable path does not exist");
        let out = inv.output(2, String::new(), "raw stderr".to_string());
        let err = out.require_success().unwrap_err();
        assert!(matches!(
            err,
            Error::ToolFailed { code: 2, ref message, .. }
                if message == "executable path does not exist"
        ));
    }

    #[test]
    fn test_mapped_message_only_applies_to_its_code() {
        let inv = Invocation::new("tool").exit_message(2, "mapped");
        let out = inv.output(3, String::new(), "other failure".to_string());
        let err = out.require_success().unwrap_err();
        assert!(matches!(
            err,
            Error::ToolFailed { code: 3, ref message, .. } if message == "other failure"
        ));
    }

    #[test]
    fn test_stdout_trimmed() {
        let inv = Invocation::new("xdg-settings");
        let out = inv.output(0, "foo.desktop\n".to_string(), String::new());
        assert_eq!(out.stdout_trimmed(), "foo.desktop");
    }
}
