// src/report/actions.rs

use std::io::{self, Write};
use std::path::PathBuf;

use tracing::warn;

use super::Reporter;
use crate::errors::Result;
use crate::workflow::{append_file_command, format_command};

/// Reporter speaking GitHub Actions workflow commands on stdout.
#[derive(Debug, Clone, Default)]
pub struct ActionsReporter {
    output_file: Option<PathBuf>,
}

impl ActionsReporter {
    pub fn new(output_file: Option<PathBuf>) -> Self {
        Self { output_file }
    }

    pub fn from_env() -> Self {
        Self::new(std::env::var_os("GITHUB_OUTPUT").map(PathBuf::from))
    }

    fn emit(&self, line: &str) {
        let mut out = io::stdout().lock();
        // Nothing sensible to do if stdout is gone.
        let _ = writeln!(out, "{line}");
        let _ = out.flush();
    }
}

impl Reporter for ActionsReporter {
    fn info(&self, message: &str) {
        self.emit(message);
    }

    fn warning(&self, message: &str) {
        self.emit(&format_command("warning", message));
    }

    fn error(&self, message: &str) {
        self.emit(&format_command("error", message));
    }

    fn start_group(&self, name: &str) {
        self.emit(&format_command("group", name));
    }

    fn end_group(&self) {
        self.emit("::endgroup::");
    }

    fn set_output(&self, name: &str, value: &str) -> Result<()> {
        match self.output_file {
            Some(ref path) => append_file_command(path, name, value),
            None => {
                warn!(name, value, "GITHUB_OUTPUT is not set; step output not recorded");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_is_written_to_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("github_output");
        let reporter = ActionsReporter::new(Some(path.clone()));

        reporter.set_output("command-exit-code", "137").unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("command-exit-code<<"));
        assert!(contents.contains("\n137\n"));
    }

    #[test]
    fn missing_output_file_is_not_an_error() {
        let reporter = ActionsReporter::default();
        assert!(reporter.set_output("command-exit-code", "0").is_ok());
    }
}
