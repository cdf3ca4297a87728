//! Output sinks for dispatch and help.
//!
//! Everything the framework prints goes through the [`Display`] trait: leveled
//! lines gated by [`Verbosity`], plain informational lines that are always
//! shown, and error renderings. [`ConsoleDisplay`] writes to the terminal;
//! [`BufferDisplay`] records lines in memory for tests and embedding hosts.
//!
//! # Testing
//!
//! ```
//! use switchyard::{BufferDisplay, Display, Verbosity};
//!
//! let mut display = BufferDisplay::new(Verbosity::Normal);
//! display.write_line(Verbosity::Quiet, "shown");
//! display.write_line(Verbosity::Full, "hidden");
//!
//! assert_eq!(display.text(), vec!["shown"]);
//! ```

use std::error::Error;

use console::{Style, Term};
use tracing::warn;

use crate::args::ArgumentStore;
use crate::verbosity::Verbosity;

/// A sink accepting leveled text lines.
pub trait Display {
    /// Verbosity above which leveled lines are suppressed.
    fn verbosity(&self) -> Verbosity;

    /// Writes a line if `level` does not exceed [`verbosity`](Self::verbosity).
    fn write_line(&mut self, level: Verbosity, message: &str);

    /// Writes an informational line regardless of verbosity.
    fn write_message(&mut self, message: &str);

    /// Renders an error followed by its source chain.
    fn write_error(&mut self, error: &dyn Error);

    /// Number of lines written so far.
    fn lines_written(&self) -> usize;
}

/// Expands the `[tab]`, `\r` and `\n` escapes, ignoring case.
pub fn expand_escapes(message: &str) -> String {
    let mut out = String::with_capacity(message.len());
    let mut rest = message;
    while let Some(c) = rest.chars().next() {
        if starts_with_ignore_case(rest, "[tab]") {
            out.push('\t');
            rest = &rest[5..];
        } else if starts_with_ignore_case(rest, "\\r") {
            out.push('\r');
            rest = &rest[2..];
        } else if starts_with_ignore_case(rest, "\\n") {
            out.push('\n');
            rest = &rest[2..];
        } else {
            out.push(c);
            rest = &rest[c.len_utf8()..];
        }
    }
    out
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .map(|head| head.eq_ignore_ascii_case(prefix))
        .unwrap_or(false)
}

fn error_chain(error: &dyn Error) -> Vec<String> {
    let mut lines = vec![error.to_string()];
    let mut source = error.source();
    while let Some(cause) = source {
        lines.push(format!("Caused by: {}", cause));
        source = cause.source();
    }
    lines
}

/// Terminal display built on `console`.
///
/// Leveled and informational lines go to stdout, errors to stderr. Styles
/// are applied only when the terminal supports colors.
pub struct ConsoleDisplay {
    verbosity: Verbosity,
    out: Term,
    err: Term,
    message_style: Style,
    error_style: Style,
    lines: usize,
}

impl ConsoleDisplay {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            out: Term::stdout(),
            err: Term::stderr(),
            message_style: Style::new().yellow().bold(),
            error_style: Style::new().red(),
            lines: 0,
        }
    }

    /// Creates a display using the verbosity switch (`-v:<level>`) in `store`.
    pub fn from_store(store: &ArgumentStore) -> Self {
        Self::new(Verbosity::from_store(store))
    }

    fn emit(&mut self, to_err: bool, style: Option<&Style>, message: &str) {
        let text = expand_escapes(message);
        let text = match style {
            Some(style) => style.apply_to(text).to_string(),
            None => text,
        };
        let term = if to_err { &self.err } else { &self.out };
        if let Err(e) = term.write_line(&text) {
            warn!(error = %e, "failed to write to terminal");
            return;
        }
        self.lines += 1;
    }
}

impl Display for ConsoleDisplay {
    fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    fn write_line(&mut self, level: Verbosity, message: &str) {
        if level > self.verbosity {
            return;
        }
        self.emit(false, None, message);
    }

    fn write_message(&mut self, message: &str) {
        let style = self.message_style.clone();
        self.emit(false, Some(&style), message);
    }

    fn write_error(&mut self, error: &dyn Error) {
        let style = self.error_style.clone();
        for line in error_chain(error) {
            self.emit(true, Some(&style), &line);
        }
    }

    fn lines_written(&self) -> usize {
        self.lines
    }
}

/// Kind of a recorded line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Leveled(Verbosity),
    Message,
    Error,
}

/// A line recorded by [`BufferDisplay`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub kind: LineKind,
    pub text: String,
}

/// In-memory display recording every line that passes the verbosity gate.
#[derive(Debug, Clone, Default)]
pub struct BufferDisplay {
    verbosity: Verbosity,
    lines: Vec<Line>,
}

impl BufferDisplay {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            lines: Vec::new(),
        }
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Text of every recorded line in order.
    pub fn text(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.text.as_str()).collect()
    }

    /// Text of the informational lines only.
    pub fn messages(&self) -> Vec<&str> {
        self.text_of(LineKind::Message)
    }

    /// Text of the error lines only.
    pub fn errors(&self) -> Vec<&str> {
        self.text_of(LineKind::Error)
    }

    /// All recorded lines joined with newlines.
    pub fn output(&self) -> String {
        self.text().join("\n")
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    fn text_of(&self, kind: LineKind) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|l| l.kind == kind)
            .map(|l| l.text.as_str())
            .collect()
    }

    fn push(&mut self, kind: LineKind, text: impl Into<String>) {
        self.lines.push(Line {
            kind,
            text: text.into(),
        });
    }
}

impl Display for BufferDisplay {
    fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    fn write_line(&mut self, level: Verbosity, message: &str) {
        if level <= self.verbosity {
            self.push(LineKind::Leveled(level), message);
        }
    }

    fn write_message(&mut self, message: &str) {
        self.push(LineKind::Message, message);
    }

    fn write_error(&mut self, error: &dyn Error) {
        for line in error_chain(error) {
            self.push(LineKind::Error, line);
        }
    }

    fn lines_written(&self) -> usize {
        self.lines.len()
    }
}
