//! Structured diagnostics shared by indexing, ingestion and sample loading.
//!
//! Routines that would otherwise log through a global take a [`Reporter`]
//! explicitly. [`Report`] collects issues so callers (and tests) can inspect
//! them; [`TracingReporter`] forwards them to `tracing`.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Sink for issues raised while indexing or loading data.
pub trait Reporter {
    /// Records a single issue.
    fn report(&mut self, issue: Issue);
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn report(&mut self, issue: Issue) {
        (**self).report(issue);
    }
}

/// Forwards every issue to the `tracing` subscriber at the matching level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&mut self, issue: Issue) {
        match issue.severity {
            Severity::Info => {
                tracing::info!(code = ?issue.code, context = %issue.context, "{}", issue.message)
            }
            Severity::Warning => {
                tracing::warn!(code = ?issue.code, context = %issue.context, "{}", issue.message)
            }
            Severity::Error => {
                tracing::error!(code = ?issue.code, context = %issue.context, "{}", issue.message)
            }
        }
    }
}

/// Collected issues, categorized by severity.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Report {
    /// All issues in the order they were raised.
    pub issues: Vec<Issue>,
}

impl Reporter for Report {
    fn report(&mut self, issue: Issue) {
        self.add(issue);
    }
}

impl Report {
    /// Creates a new empty report.
    pub fn new() -> Self {
        Self { issues: Vec::new() }
    }

    /// Adds an issue to the report.
    pub fn add(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    /// Returns the number of errors in the report.
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    /// Returns the number of warnings in the report.
    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    /// Returns the number of informational notes in the report.
    pub fn info_count(&self) -> usize {
        self.count(Severity::Info)
    }

    /// Returns true if there are no errors.
    pub fn is_ok(&self) -> bool {
        self.error_count() == 0
    }

    /// Returns true if there are neither errors nor warnings.
    pub fn is_ok_strict(&self) -> bool {
        self.error_count() == 0 && self.warning_count() == 0
    }

    /// Iterates over issues carrying the given code.
    pub fn with_code(&self, code: IssueCode) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |i| i.code == code)
    }

    fn count(&self, severity: Severity) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == severity)
            .count()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.issues.is_empty() {
            return writeln!(f, "No issues found");
        }

        writeln!(
            f,
            "Finished with {} error(s), {} warning(s) and {} note(s):",
            self.error_count(),
            self.warning_count(),
            self.info_count()
        )?;
        writeln!(f)?;

        for issue in &self.issues {
            writeln!(f, "  {}", issue)?;
        }

        Ok(())
    }
}

/// A single reported issue.
#[derive(Clone, Debug, Serialize)]
pub struct Issue {
    pub severity: Severity,
    /// A stable code for the issue type.
    pub code: IssueCode,
    pub message: String,
    /// Where the issue occurred.
    pub context: IssueContext,
}

impl Issue {
    pub fn new(
        severity: Severity,
        code: IssueCode,
        message: impl Into<String>,
        context: IssueContext,
    ) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            context,
        }
    }

    pub fn info(code: IssueCode, message: impl Into<String>, context: IssueContext) -> Self {
        Self::new(Severity::Info, code, message, context)
    }

    pub fn warning(code: IssueCode, message: impl Into<String>, context: IssueContext) -> Self {
        Self::new(Severity::Warning, code, message, context)
    }

    pub fn error(code: IssueCode, message: impl Into<String>, context: IssueContext) -> Self {
        Self::new(Severity::Error, code, message, context)
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Info => "INFO ",
            Severity::Warning => "WARN ",
            Severity::Error => "ERROR",
        };
        write!(
            f,
            "[{}] {:?} in {}: {}",
            severity, self.code, self.context, self.message
        )
    }
}

/// The severity of an issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Progress notes and policy decisions.
    Info,
    /// Recoverable problem; the affected sample was skipped.
    Warning,
    /// The operation could not produce its result.
    Error,
}

/// A stable code identifying the type of issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum IssueCode {
    /// The `image/` or `label/` directory of a split does not exist.
    MissingDirectory,
    /// A label file has no image with the same stem.
    MissingImage,
    /// An image file has no label with the same stem.
    MissingLabel,
    /// More than one image matched a label stem in the fallback search.
    AmbiguousImage,
    /// Image and label sizes differ.
    DimensionMismatch,
    /// A header-only size probe failed.
    UnreadableDimensions,
    /// Summary of an indexing pass.
    IndexSummary,
    /// A decode strategy failed and the next one was tried.
    DecodeFallback,
    /// Every decode strategy failed.
    DecodeFailed,
}

/// Where an issue occurred.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum IssueContext {
    /// A dataset split as a whole.
    Split { name: String },
    /// A specific file.
    File { path: PathBuf },
    /// An in-memory buffer.
    Memory,
}

impl IssueContext {
    pub fn split(name: impl Into<String>) -> Self {
        IssueContext::Split { name: name.into() }
    }

    pub fn file(path: &Path) -> Self {
        IssueContext::File {
            path: path.to_path_buf(),
        }
    }
}

impl fmt::Display for IssueContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueContext::Split { name } => write!(f, "split '{}'", name),
            IssueContext::File { path } => write!(f, "{}", path.display()),
            IssueContext::Memory => write!(f, "<memory>"),
        }
    }
}
