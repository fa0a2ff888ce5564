//! Pattern tables for recognizing error lines and stack frames in CI logs.
//!
//! One compiled table per process is plenty; construct [`LogPatterns`]
//! once and reuse it. The table order matters: the first matching error
//! pattern wins for a given line.

use faultline_core::Severity;
use regex::Regex;

/// Classification of a matched error line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    PythonError,
    TestFailure,
    BuildError,
    NpmError,
    TypescriptError,
    LintWarning,
    GenericError,
}

impl ErrorKind {
    /// Severity assigned to signals produced from this kind of line.
    pub fn severity(&self) -> Severity {
        match self {
            ErrorKind::TestFailure => Severity::Critical,
            ErrorKind::LintWarning => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// True for kinds that become lint-error signals rather than
    /// log-pattern signals.
    pub fn is_lint(&self) -> bool {
        matches!(self, ErrorKind::LintWarning)
    }
}

/// A matched stack frame: source location plus optional symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameMatch {
    pub file: String,
    pub line: u32,
    pub symbol: Option<String>,
}

/// Compiled error and stack-frame patterns.
pub struct LogPatterns {
    errors: Vec<(Regex, ErrorKind)>,
    frames: Vec<Regex>,
    failed_test: Regex,
}

impl Default for LogPatterns {
    fn default() -> Self {
        Self::new()
    }
}

impl LogPatterns {
    /// Compiles the pattern tables. Patterns are constants; compilation
    /// cannot fail at runtime.
    pub fn new() -> Self {
        let errors = vec![
            (
                Regex::new(r"\b\w+Error: .+").expect("invalid python error pattern"),
                ErrorKind::PythonError,
            ),
            (
                Regex::new(r"FAILED\s+\S+::\w+").expect("invalid test failure pattern"),
                ErrorKind::TestFailure,
            ),
            (
                Regex::new(r"(?i)\berror: .+").expect("invalid build error pattern"),
                ErrorKind::BuildError,
            ),
            (
                Regex::new(r"npm ERR! .+").expect("invalid npm error pattern"),
                ErrorKind::NpmError,
            ),
            (
                Regex::new(r"\bTS\d+: .+").expect("invalid typescript error pattern"),
                ErrorKind::TypescriptError,
            ),
            (
                Regex::new(r"(?i)^\s*warning: .+").expect("invalid lint warning pattern"),
                ErrorKind::LintWarning,
            ),
            (
                Regex::new(r"(?i)\bError: .+").expect("invalid generic error pattern"),
                ErrorKind::GenericError,
            ),
        ];

        let frames = vec![
            // Python: File "pay.py", line 12
            Regex::new(r#"^\s*File "(?P<file>[^"]+)", line (?P<line>\d+)"#)
                .expect("invalid python frame pattern"),
            // JavaScript: at charge (pay.js:12:3)
            Regex::new(r"^\s+at (?P<sym>[\w.$<>]+) \((?P<file>[^():]+):(?P<line>\d+)")
                .expect("invalid js frame pattern"),
            // Generic: path/to/file.go:42
            Regex::new(r"^\s*(?P<file>[\w./-]+\.\w+):(?P<line>\d+)")
                .expect("invalid generic frame pattern"),
        ];

        let failed_test =
            Regex::new(r"FAILED\s+(?P<path>\S+?)::(?P<test>\w+)").expect("invalid FAILED pattern");

        LogPatterns {
            errors,
            frames,
            failed_test,
        }
    }

    /// Classifies a line against the error table; first match wins.
    pub fn match_error(&self, line: &str) -> Option<ErrorKind> {
        self.errors
            .iter()
            .find(|(re, _)| re.is_match(line))
            .map(|(_, kind)| *kind)
    }

    /// Tries to read a stack frame from a line.
    pub fn match_frame(&self, line: &str) -> Option<FrameMatch> {
        for re in &self.frames {
            if let Some(caps) = re.captures(line) {
                let file = caps.name("file")?.as_str().to_string();
                let line_no: u32 = caps.name("line")?.as_str().parse().ok()?;
                let symbol = caps.name("sym").map(|m| m.as_str().to_string());
                return Some(FrameMatch {
                    file,
                    line: line_no,
                    symbol,
                });
            }
        }
        None
    }

    /// Extracts (test path, test name) from a `FAILED path::test` line.
    pub fn match_failed_test<'a>(&self, line: &'a str) -> Option<(&'a str, &'a str)> {
        let caps = self.failed_test.captures(line)?;
        Some((
            caps.name("path")?.as_str(),
            caps.name("test")?.as_str(),
        ))
    }
}
