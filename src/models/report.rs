//! Run report models.
//!
//! Outcomes of reconciling one document and the summary of a whole import run.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Rows touched while reconciling one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileOutcome {
    /// Rows created.
    pub inserted: usize,
    /// Existing rows overwritten in place.
    pub updated: usize,
}

impl std::ops::AddAssign for ReconcileOutcome {
    fn add_assign(&mut self, other: Self) {
        self.inserted += other.inserted;
        self.updated += other.updated;
    }
}

/// Changes made to the employee roster table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterOutcome {
    /// Employees added to the roster.
    pub added: usize,
    /// Roster entries whose salary was raised.
    pub updated: usize,
    /// Employees already on the roster with nothing to change.
    pub unchanged: usize,
}

impl std::ops::AddAssign for RosterOutcome {
    fn add_assign(&mut self, other: Self) {
        self.added += other.added;
        self.updated += other.updated;
        self.unchanged += other.unchanged;
    }
}

/// A document that could not be imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFailure {
    /// The document identifier (file name).
    pub document: String,
    /// Why the document was skipped or rolled back.
    pub reason: String,
}

/// Summary of one import run.
///
/// Every document in the source directory ends up in exactly one of: counted
/// as imported, listed in `empty_documents`, or listed in `failures`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    /// Correlation id of the run.
    pub run_id: Uuid,
    /// Whether the run skipped persistence.
    pub dry_run: bool,
    /// Documents found in the source directory.
    pub documents_found: usize,
    /// Documents extracted successfully (including empty ones).
    pub documents_processed: usize,
    /// Employee records extracted.
    pub employee_records: usize,
    /// KPI records extracted.
    pub kpi_records: usize,
    /// Store rows inserted and updated.
    pub reconciled: ReconcileOutcome,
    /// Roster changes, when roster sync was requested.
    pub roster: Option<RosterOutcome>,
    /// Documents that produced no records and need manual review.
    pub empty_documents: Vec<String>,
    /// Documents that failed, with reasons.
    pub failures: Vec<DocumentFailure>,
}

impl ImportSummary {
    /// Creates an empty summary for a run.
    pub fn new(run_id: Uuid, dry_run: bool) -> Self {
        Self {
            run_id,
            dry_run,
            documents_found: 0,
            documents_processed: 0,
            employee_records: 0,
            kpi_records: 0,
            reconciled: ReconcileOutcome::default(),
            roster: None,
            empty_documents: vec![],
            failures: vec![],
        }
    }

    /// Returns true if no document failed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}
