//! User-facing status output.
//!
//! The validator and renderer report progress through `OutputSink` instead of
//! writing to the console, so they stay testable without capturing stdio.
//! Diagnostics for developers go through `tracing`, not through this sink.

use std::io::IsTerminal;

const RESET: &str = "\x1b[0m";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

const RULE: &str = "═══════════════════════════════════════";

pub trait OutputSink {
    fn banner(&self, title: &str);
    fn info(&self, message: &str);
    fn success(&self, message: &str);
    fn warning(&self, message: &str);
    fn error(&self, message: &str);
}

/// Prints coloured status lines; errors go to stderr.
///
/// Colour is decided per stream, so redirecting one of them never leaves
/// escape codes in a file.
pub struct ConsoleSink {
    stdout_color: bool,
    stderr_color: bool,
}

impl ConsoleSink {
    pub fn new(color: bool) -> Self {
        Self {
            stdout_color: color,
            stderr_color: color,
        }
    }

    /// Colour a stream only when it is a terminal and `NO_COLOR` is unset.
    pub fn detect() -> Self {
        Self::for_streams(
            std::io::stdout().is_terminal(),
            std::io::stderr().is_terminal(),
            std::env::var_os("NO_COLOR").is_some(),
        )
    }

    fn for_streams(stdout_tty: bool, stderr_tty: bool, no_color: bool) -> Self {
        Self {
            stdout_color: stdout_tty && !no_color,
            stderr_color: stderr_tty && !no_color,
        }
    }

    fn paint(&self, color: &str, text: &str) -> String {
        paint(self.stdout_color, color, text)
    }
}

fn paint(enabled: bool, color: &str, text: &str) -> String {
    if enabled {
        format!("{color}{text}{RESET}")
    } else {
        text.to_string()
    }
}

impl OutputSink for ConsoleSink {
    fn banner(&self, title: &str) {
        println!("{}", self.paint(CYAN, RULE));
        println!("{}", self.paint(CYAN, &format!("   {title}")));
        println!("{}", self.paint(CYAN, RULE));
    }

    fn info(&self, message: &str) {
        println!("{}", self.paint(CYAN, &format!("ℹ {message}")));
    }

    fn success(&self, message: &str) {
        println!("{}", self.paint(GREEN, &format!("✓ {message}")));
    }

    fn warning(&self, message: &str) {
        println!("{}", self.paint(YELLOW, &format!("⚠ {message}")));
    }

    fn error(&self, message: &str) {
        eprintln!(
            "{}",
            paint(self.stderr_color, RED, &format!("❌ ERROR: {message}"))
        );
    }
}

/// Discards everything. Used by `validate --json`, where stdout carries the report.
pub struct NullSink;

impl OutputSink for NullSink {
    fn banner(&self, _title: &str) {}
    fn info(&self, _message: &str) {}
    fn success(&self, _message: &str) {}
    fn warning(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}

#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Banner,
    Info,
    Success,
    Warning,
    Error,
}

/// Captures messages for assertions.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingSink {
    messages: std::cell::RefCell<Vec<(Level, String)>>,
}

#[cfg(test)]
impl RecordingSink {
    pub fn messages(&self) -> Vec<(Level, String)> {
        self.messages.borrow().clone()
    }

    pub fn at(&self, level: Level) -> Vec<String> {
        self.messages
            .borrow()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn successes(&self) -> Vec<String> {
        self.at(Level::Success)
    }

    fn push(&self, level: Level, message: &str) {
        self.messages.borrow_mut().push((level, message.to_string()));
    }
}

#[cfg(test)]
impl OutputSink for RecordingSink {
    fn banner(&self, title: &str) {
        self.push(Level::Banner, title);
    }
    fn info(&self, message: &str) {
        self.push(Level::Info, message);
    }
    fn success(&self, message: &str) {
        self.push(Level::Success, message);
    }
    fn warning(&self, message: &str) {
        self.push(Level::Warning, message);
    }
    fn error(&self, message: &str) {
        self.push(Level::Error, message);
    }
}
