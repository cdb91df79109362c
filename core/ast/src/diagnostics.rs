//! Diagnostics as plain values.
//!
//! A [`Diagnostic`] carries a message plus one primary labelled span and any
//! number of related labels. Producers (the parser and the type checker)
//! build diagnostics; [`Diagnostic::render`] is a pure formatter that turns
//! one into the code-frame string the fixture corpus expects:
//!
//! ```text
//! Error: <message>:
//!  --> <filename>:<line>:<col>
//!
//!   | <context line n-1>
//! n | <context line>
//!   |       ^^^^^ <annotation>
//!   | <context line n+1>
//! ```

use crate::nodes::Location;

/// A span with an explanatory caret annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub location: Location,
    pub annotation: String,
}

/// A user-facing compile error, independent of any output format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub primary: Label,
    pub related: Vec<Label>,
}

impl Diagnostic {
    #[must_use]
    pub fn new(message: impl Into<String>, location: Location, annotation: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            primary: Label {
                location,
                annotation: annotation.into(),
            },
            related: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_related(mut self, location: Location, annotation: impl Into<String>) -> Self {
        self.related.push(Label {
            location,
            annotation: annotation.into(),
        });
        self
    }

    /// Renders this diagnostic as a code frame over `source`.
    ///
    /// `filename` only appears in the `-->` header; the source itself is the
    /// text the spans were produced from.
    #[must_use]
    pub fn render(&self, source: &str, filename: &str) -> String {
        let loc = self.primary.location;
        let lines: Vec<&str> = source.lines().collect();
        let line_no = loc.start_line.max(1) as usize;
        let width = line_no.to_string().len();
        let blank = " ".repeat(width);

        let mut out = String::new();
        out.push_str(&format!("Error: {}:\n", self.message));
        out.push_str(&format!(
            " --> {}:{}:{}\n",
            filename, loc.start_line, loc.start_column
        ));
        out.push('\n');

        if line_no >= 2 {
            if let Some(previous) = lines.get(line_no - 2) {
                out.push_str(&format!("{blank} | {previous}\n"));
            }
        }

        let subject = lines.get(line_no - 1).copied().unwrap_or("");
        out.push_str(&format!("{line_no} | {subject}\n"));

        let column = loc.start_column.max(1) as usize;
        let caret_count = if loc.end_line == loc.start_line {
            loc.end_column.saturating_sub(loc.start_column).max(1) as usize
        } else {
            // Multi-line spans underline to the end of the subject line.
            subject.len().saturating_sub(column - 1).max(1)
        };
        out.push_str(&format!(
            "{blank} | {}{} {}\n",
            " ".repeat(column - 1),
            "^".repeat(caret_count),
            self.primary.annotation
        ));

        if let Some(next) = lines.get(line_no) {
            out.push_str(&format!("{blank} | {next}\n"));
        }

        for label in &self.related {
            out.push_str(&format!(
                "{blank} = note: {} at {}:{}\n",
                label.annotation, label.location.start_line, label.location.start_column
            ));
        }

        out
    }
}
