//! Operator-facing terminal output.

use std::io::Write;

/// Prints progress for the operator.
///
/// Normal output goes to stdout and is suppressed in quiet mode; warnings
/// and errors go to stderr and are always shown. Write failures (a closed
/// pipe, for instance) are ignored.
#[derive(Debug, Clone, Copy)]
pub struct OutputManager {
    verbose: bool,
    quiet: bool,
}

impl OutputManager {
    /// Creates an output manager.
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    /// Whether verbose lines are printed.
    pub fn is_verbose(&self) -> bool {
        self.verbose && !self.quiet
    }

    fn out(&self, line: &str) {
        if !self.quiet {
            let _ = writeln!(std::io::stdout().lock(), "{line}");
        }
    }

    fn err(&self, line: &str) {
        let _ = writeln!(std::io::stderr().lock(), "{line}");
    }

    /// Detail only shown in verbose mode.
    pub fn verbose(&self, message: &str) {
        if self.is_verbose() {
            self.out(&format!("  {message}"));
        }
    }

    /// Progress line.
    pub fn progress(&self, message: &str) {
        self.out(message);
    }

    /// Completed action.
    pub fn success(&self, message: &str) {
        self.out(&format!("✓ {message}"));
    }

    /// Non-fatal problem.
    pub fn warn(&self, message: &str) {
        self.err(&format!("⚠ {message}"));
    }

    /// Fatal problem.
    pub fn error(&self, message: &str) {
        self.err(&format!("✗ {message}"));
    }

    /// Section heading.
    pub fn section(&self, title: &str) {
        self.out(&format!("\n==> {title}"));
    }

    /// Indented passthrough line, used for tool output.
    pub fn indent(&self, message: &str) {
        self.out(&format!("    {message}"));
    }
}
