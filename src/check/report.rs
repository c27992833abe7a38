//! Check report types for a processed dataset tree.

use serde::Serialize;
use std::fmt;

use crate::split::SplitKind;

/// Result of checking a processed dataset.
#[derive(Clone, Debug, Default, Serialize)]
pub struct CheckReport {
    /// Per-split file counts, in train, val, test order.
    pub splits: Vec<SplitStats>,
    /// Number of classes declared by the manifest.
    pub classes: usize,
    /// All issues found.
    pub issues: Vec<CheckIssue>,
}

/// File counts for one split.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SplitStats {
    pub split: SplitKind,
    /// Files in `images/` with an image extension.
    pub images: usize,
    /// `.txt` files in `labels/`.
    pub labels: usize,
    /// Label files that already hold at least one non-blank line.
    pub annotated: usize,
}

impl CheckReport {
    /// Record a finding.
    pub fn add(&mut self, issue: CheckIssue) {
        self.issues.push(issue);
    }

    /// Number of findings with [`Severity::Error`].
    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }

    /// Number of findings with [`Severity::Warning`].
    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }

    /// Returns true if there are no errors.
    pub fn is_ok(&self) -> bool {
        self.error_count() == 0
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Classes: {}", self.classes)?;
        for stats in &self.splits {
            writeln!(
                f,
                "  {:<5} {} images, {} labels ({} annotated)",
                stats.split.as_str(),
                stats.images,
                stats.labels,
                stats.annotated
            )?;
        }
        writeln!(f)?;

        if self.issues.is_empty() {
            return writeln!(f, "Check passed: no issues found");
        }

        writeln!(
            f,
            "Check completed with {} error(s) and {} warning(s):",
            self.error_count(),
            self.warning_count()
        )?;
        writeln!(f)?;

        for issue in &self.issues {
            writeln!(f, "  {}", issue)?;
        }

        Ok(())
    }
}

/// A single check finding.
#[derive(Clone, Debug, Serialize)]
pub struct CheckIssue {
    pub severity: Severity,
    pub code: IssueCode,
    pub message: String,
    pub context: IssueContext,
}

impl CheckIssue {
    /// Create an error-level finding.
    pub fn error(code: IssueCode, message: impl Into<String>, context: IssueContext) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            context,
        }
    }

    /// Create a warning-level finding.
    pub fn warning(code: IssueCode, message: impl Into<String>, context: IssueContext) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            context,
        }
    }
}

impl fmt::Display for CheckIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARN ",
        };
        write!(
            f,
            "[{}] {:?} in {}: {}",
            severity, self.code, self.context, self.message
        )
    }
}

/// How serious a finding is. Only errors fail the check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Severity {
    /// Worth fixing, but the tree is still usable for training.
    Warning,
    /// The tree is inconsistent.
    Error,
}

/// A stable code identifying the kind of finding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum IssueCode {
    /// `nc` is absent or disagrees with the number of names.
    ClassCountMismatch,
    /// The `names` mapping skips an ID.
    ClassNameGap,
    /// A split key is absent or does not point at `<split>/images`.
    UnexpectedSplitPath,
    /// A split's `images/` or `labels/` directory does not exist.
    MissingSplitDir,
    /// An image has no label file.
    MissingLabel,
    /// A label file has no image.
    OrphanLabel,
}

/// Where a finding was made.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueContext {
    /// The `data.yaml` file.
    Manifest,
    /// A whole split directory.
    Split { split: SplitKind },
    /// One file inside a split.
    File { split: SplitKind, name: String },
}

impl fmt::Display for IssueContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueContext::Manifest => write!(f, "manifest"),
            IssueContext::Split { split } => write!(f, "split {}", split),
            IssueContext::File { split, name } => write!(f, "{}/{}", split, name),
        }
    }
}
