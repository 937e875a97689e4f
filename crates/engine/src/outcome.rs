use chrono::{DateTime, Local};
use rewire_wiring::WiringRecord;
use std::path::{Path, PathBuf};

/// Terminal status of one record's conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    /// Created by the orchestrator before resolution
    Pending,
    Success,
    Failed,
    Skipped,
    /// Rewrite succeeded but some reference property had no matching field
    Partial,
}

impl OutcomeStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            OutcomeStatus::Pending => "pending",
            OutcomeStatus::Success => "success",
            OutcomeStatus::Failed => "failed",
            OutcomeStatus::Skipped => "skipped",
            OutcomeStatus::Partial => "partial",
        }
    }
}

/// One record's conversion result. Created `Pending`, finalized exactly once.
#[derive(Debug, Clone)]
pub struct ConversionOutcome {
    pub status: OutcomeStatus,
    pub source_file: PathBuf,
    pub record_id: String,
    pub type_name: String,
    pub target_file: Option<PathBuf>,
    pub markers_added: Vec<String>,
    pub notes: Vec<String>,
    pub error_message: Option<String>,
}

impl ConversionOutcome {
    pub fn pending(record: &WiringRecord) -> Self {
        Self {
            status: OutcomeStatus::Pending,
            source_file: record.source_file.clone(),
            record_id: record.id.clone(),
            type_name: record.type_name.clone(),
            target_file: None,
            markers_added: Vec::new(),
            notes: Vec::new(),
            error_message: None,
        }
    }

    pub fn mark_success(
        &mut self,
        target: &Path,
        markers_added: Vec<String>,
        notes: Vec<String>,
    ) {
        self.status = OutcomeStatus::Success;
        self.target_file = Some(target.to_path_buf());
        self.markers_added = markers_added;
        self.notes = notes;
    }

    pub fn mark_partial(
        &mut self,
        target: &Path,
        markers_added: Vec<String>,
        notes: Vec<String>,
    ) {
        self.mark_success(target, markers_added, notes);
        self.status = OutcomeStatus::Partial;
    }

    pub fn mark_failed(&mut self, message: impl Into<String>) {
        self.status = OutcomeStatus::Failed;
        self.error_message = Some(message.into());
    }

    pub fn mark_skipped(&mut self, message: impl Into<String>) {
        self.status = OutcomeStatus::Skipped;
        self.error_message = Some(message.into());
    }

    pub fn is_converted(&self) -> bool {
        matches!(self.status, OutcomeStatus::Success | OutcomeStatus::Partial)
    }
}

/// Why a follow-up item exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUpCategory {
    AmbiguousMapping,
    CustomNamespaceElement,
    ComplexFactory,
    ExternalReference,
    NonStandardWiring,
    UnsupportedElement,
    ManualReview,
    ConfigurationIssue,
}

impl FollowUpCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            FollowUpCategory::AmbiguousMapping => "ambiguous-mapping",
            FollowUpCategory::CustomNamespaceElement => "custom-namespace-element",
            FollowUpCategory::ComplexFactory => "complex-factory",
            FollowUpCategory::ExternalReference => "external-reference",
            FollowUpCategory::NonStandardWiring => "non-standard-wiring",
            FollowUpCategory::UnsupportedElement => "unsupported-element",
            FollowUpCategory::ManualReview => "manual-review",
            FollowUpCategory::ConfigurationIssue => "configuration-issue",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUpPriority {
    High,
    Medium,
    Low,
}

impl FollowUpPriority {
    pub const fn as_str(self) -> &'static str {
        match self {
            FollowUpPriority::High => "high",
            FollowUpPriority::Medium => "medium",
            FollowUpPriority::Low => "low",
        }
    }
}

/// A manual-review ticket. Append-only; the tool never resolves one itself.
#[derive(Debug, Clone)]
pub struct FollowUpItem {
    /// Sequential id assigned by the ledger on append
    pub id: String,
    pub category: FollowUpCategory,
    pub priority: FollowUpPriority,
    pub description: String,
    pub file_path: PathBuf,
    pub line_number: u32,
    pub suggested_action: Option<String>,
    pub record_id: Option<String>,
    pub type_name: Option<String>,
    pub created_at: DateTime<Local>,
}

impl FollowUpItem {
    pub fn new(
        description: impl Into<String>,
        file_path: impl Into<PathBuf>,
        category: FollowUpCategory,
    ) -> Self {
        Self {
            id: String::new(),
            category,
            priority: FollowUpPriority::Medium,
            description: description.into(),
            file_path: file_path.into(),
            line_number: 0,
            suggested_action: None,
            record_id: None,
            type_name: None,
            created_at: Local::now(),
        }
    }

    pub fn priority(mut self, priority: FollowUpPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn suggested_action(mut self, action: impl Into<String>) -> Self {
        self.suggested_action = Some(action.into());
        self
    }

    /// Back-reference to the record this item came from
    pub fn for_record(mut self, record: &WiringRecord) -> Self {
        self.record_id = Some(record.id.clone());
        self.type_name = Some(record.type_name.clone());
        self.line_number = record.line_number;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MarkupParse,
    SourceParse,
    FileNotFound,
    PermissionDenied,
    InvalidRecord,
    AmbiguousMapping,
    UnsupportedElement,
    Configuration,
    Backup,
    Write,
}

impl ErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorKind::MarkupParse => "markup-parse",
            ErrorKind::SourceParse => "source-parse",
            ErrorKind::FileNotFound => "file-not-found",
            ErrorKind::PermissionDenied => "permission-denied",
            ErrorKind::InvalidRecord => "invalid-record",
            ErrorKind::AmbiguousMapping => "ambiguous-mapping",
            ErrorKind::UnsupportedElement => "unsupported-element",
            ErrorKind::Configuration => "configuration",
            ErrorKind::Backup => "backup",
            ErrorKind::Write => "write",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Critical,
    High,
    Medium,
    Low,
}

impl ErrorSeverity {
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorSeverity::Critical => "critical",
            ErrorSeverity::High => "high",
            ErrorSeverity::Medium => "medium",
            ErrorSeverity::Low => "low",
        }
    }
}

/// An error recorded against the run. Every one of these makes the run
/// unsuccessful (non-zero exit).
#[derive(Debug, Clone)]
pub struct RunError {
    /// Sequential id assigned by the ledger on append
    pub id: String,
    pub message: String,
    pub file_path: PathBuf,
    pub kind: ErrorKind,
    pub severity: ErrorSeverity,
    pub record_id: Option<String>,
    pub timestamp: DateTime<Local>,
}

impl RunError {
    pub fn new(
        message: impl Into<String>,
        file_path: impl Into<PathBuf>,
        kind: ErrorKind,
    ) -> Self {
        Self {
            id: String::new(),
            message: message.into(),
            file_path: file_path.into(),
            kind,
            severity: ErrorSeverity::High,
            record_id: None,
            timestamp: Local::now(),
        }
    }

    pub fn severity(mut self, severity: ErrorSeverity) -> Self {
        self.severity = severity;
        self
    }
}
