//! Batch-compiler rendering of a [`DiagnosticReport`].
//!
//! ```text
//! ----------
//! 1. ERROR in mod.a/a/A.java (at line 3)
//! 	import p.X;
//! 	       ^^^
//! The package p is accessible from more than one module: mod.one, mod.two
//! ----------
//! 1 problem (1 error)
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use jpms_graph::{Diagnostic, DiagnosticKind, DiagnosticReport, ProjectInput, Severity, SourceSpan};
use owo_colors::OwoColorize;
use serde::Serialize;

const SEPARATOR: &str = "----------";

/// Source text for excerpts: embedded in the project description, or read
/// from disk on first use.
#[derive(Debug, Default)]
pub struct SourceTexts {
    texts: HashMap<PathBuf, Option<String>>,
}

impl SourceTexts {
    pub fn from_input(input: &ProjectInput) -> Self {
        let units = input
            .modules
            .iter()
            .flat_map(|m| &m.units)
            .chain(&input.classpath);
        let texts = units
            .filter_map(|unit| {
                let text = unit.source.clone()?;
                Some((unit.path.clone(), Some(text)))
            })
            .collect();
        Self { texts }
    }

    fn line(&mut self, root: &Path, path: &Path, line: u32) -> Option<String> {
        let text = self
            .texts
            .entry(path.to_path_buf())
            .or_insert_with(|| std::fs::read_to_string(root.join(path)).ok());
        let index = usize::try_from(line).ok()?.checked_sub(1)?;
        text.as_deref()?.lines().nth(index).map(str::to_string)
    }
}

pub struct ReportRenderer {
    root: PathBuf,
    texts: RefCell<SourceTexts>,
    color: bool,
}

impl ReportRenderer {
    /// `root` is the directory diagnostic paths are relative to.
    pub fn new(root: impl Into<PathBuf>, texts: SourceTexts) -> Self {
        Self {
            root: root.into(),
            texts: RefCell::new(texts),
            color: false,
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Every diagnostic followed by the summary line. Empty for an empty
    /// report.
    pub fn render(&self, report: &DiagnosticReport) -> String {
        let mut out = String::new();
        for (index, diagnostic) in report.diagnostics().iter().enumerate() {
            out.push_str(SEPARATOR);
            out.push('\n');
            out.push_str(&self.header(index + 1, diagnostic));
            out.push('\n');
            if let Some(excerpt) = self.excerpt(diagnostic) {
                out.push_str(&excerpt);
            }
            out.push_str(&diagnostic.message());
            out.push('\n');
        }
        if let Some(summary) = report.summary() {
            out.push_str(SEPARATOR);
            out.push('\n');
            out.push_str(&summary);
            out.push('\n');
        }
        out
    }

    fn header(&self, number: usize, diagnostic: &Diagnostic) -> String {
        let severity = diagnostic.severity.to_string();
        let severity = match (self.color, diagnostic.severity) {
            (false, _) => severity,
            (true, Severity::Error) => severity.red().bold().to_string(),
            (true, Severity::Warning) => severity.yellow().bold().to_string(),
        };
        let location = &diagnostic.location;
        if location.span.is_known() {
            format!(
                "{number}. {severity} in {} (at line {})",
                location.path.display(),
                location.span.line
            )
        } else {
            format!("{number}. {severity} in {}", location.path.display())
        }
    }

    fn excerpt(&self, diagnostic: &Diagnostic) -> Option<String> {
        let span = diagnostic.location.span;
        if !span.is_known() {
            return None;
        }
        let line = self
            .texts
            .borrow_mut()
            .line(&self.root, &diagnostic.location.path, span.line)?;
        Some(excerpt(&line, span))
    }
}

/// The source line without leading whitespace, and carets under the span.
fn excerpt(line: &str, span: SourceSpan) -> String {
    let trimmed = line.trim_start();
    let indent = line.chars().count() - trimmed.chars().count();
    let column = (span.column as usize).saturating_sub(1).saturating_sub(indent);
    let width = (span.length as usize).max(1);
    format!(
        "\t{}\n\t{}{}\n",
        trimmed.trim_end(),
        " ".repeat(column),
        "^".repeat(width)
    )
}

/// Machine-readable report for `--format json`.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub diagnostics: Vec<JsonDiagnostic<'a>>,
    pub errors: usize,
    pub warnings: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct JsonDiagnostic<'a> {
    pub code: &'static str,
    pub severity: Severity,
    pub module: &'a str,
    pub path: &'a Path,
    pub line: u32,
    pub column: u32,
    pub message: String,
    pub details: &'a DiagnosticKind,
}

impl<'a> JsonReport<'a> {
    pub fn new(report: &'a DiagnosticReport) -> Self {
        let diagnostics = report
            .diagnostics()
            .iter()
            .map(|d| JsonDiagnostic {
                code: d.kind.code(),
                severity: d.severity,
                module: d.module.as_str(),
                path: &d.location.path,
                line: d.location.span.line,
                column: d.location.span.column,
                message: d.message(),
                details: &d.kind,
            })
            .collect();
        Self {
            diagnostics,
            errors: report.error_count(),
            warnings: report.warning_count(),
            summary: report.summary(),
        }
    }
}
