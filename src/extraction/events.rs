//! Structured pipeline events.
//!
//! The extractor and the reconciler report what they matched, skipped and
//! wrote through an [`EventSink`] instead of logging inline. The default
//! [`TracingSink`] forwards events to `tracing`; [`RecordingSink`] keeps them
//! for inspection.

use std::sync::Mutex;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::models::DocumentKind;

/// Something the pipeline decided while processing a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PipelineEvent {
    /// The document was classified into a layout family.
    DocumentClassified {
        /// The document identifier.
        document: String,
        /// The layout family.
        kind: DocumentKind,
    },
    /// A period rule fired.
    PeriodResolved {
        /// The document identifier.
        document: String,
        /// The rule that produced the period.
        rule_id: String,
        /// The resolved period, rendered as `Month/Year`.
        period: String,
    },
    /// A field rule produced a value.
    FieldMatched {
        /// The employee registration id, or empty for document-level fields.
        subject: String,
        /// The field name.
        field: String,
        /// The rule that matched.
        rule_id: String,
        /// How many occurrences the rule matched.
        occurrences: usize,
    },
    /// No rule of a field's chain matched; the field defaults to zero.
    FieldMissing {
        /// The employee registration id, or empty for document-level fields.
        subject: String,
        /// The field name.
        field: String,
    },
    /// A derived value exceeded the decimal range and was replaced by zero.
    ValueOverflow {
        /// The employee registration id, or empty for document-level values.
        subject: String,
        /// The value that overflowed.
        field: String,
    },
    /// An employee block produced no record.
    BlockSkipped {
        /// The block's registration id.
        registration_id: String,
        /// Why the block was skipped.
        reason: String,
    },
    /// A row was inserted into the store.
    RowInserted {
        /// The table written.
        table: String,
        /// The identity key of the row.
        key: String,
    },
    /// An existing row was overwritten in place.
    RowUpdated {
        /// The table written.
        table: String,
        /// The identity key of the row.
        key: String,
    },
    /// Reconciled tables were emptied before an import.
    TablesWiped {
        /// The tables emptied.
        tables: Vec<String>,
        /// Rows removed across all tables.
        rows: usize,
    },
}

/// Receives pipeline events.
pub trait EventSink {
    /// Handles one event.
    fn emit(&self, event: PipelineEvent);
}

/// Forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: PipelineEvent) {
        match event {
            PipelineEvent::DocumentClassified { document, kind } => {
                info!(document = %document, kind = kind.as_str(), "Document classified");
            }
            PipelineEvent::PeriodResolved {
                document,
                rule_id,
                period,
            } => {
                info!(document = %document, rule_id = %rule_id, period = %period, "Period resolved");
            }
            PipelineEvent::FieldMatched {
                subject,
                field,
                rule_id,
                occurrences,
            } => {
                debug!(subject = %subject, field = %field, rule_id = %rule_id, occurrences, "Field matched");
            }
            PipelineEvent::FieldMissing { subject, field } => {
                debug!(subject = %subject, field = %field, "Field missing, defaulting to zero");
            }
            PipelineEvent::ValueOverflow { subject, field } => {
                warn!(subject = %subject, field = %field, "Value out of range, stored as zero");
            }
            PipelineEvent::BlockSkipped {
                registration_id,
                reason,
            } => {
                warn!(registration_id = %registration_id, reason = %reason, "Employee block skipped");
            }
            PipelineEvent::RowInserted { table, key } => {
                debug!(table = %table, key = %key, "Row inserted");
            }
            PipelineEvent::RowUpdated { table, key } => {
                debug!(table = %table, key = %key, "Row updated");
            }
            PipelineEvent::TablesWiped { tables, rows } => {
                info!(tables = ?tables, rows, "Reconciled tables wiped");
            }
        }
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<PipelineEvent>>,
}

impl RecordingSink {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the events recorded so far.
    pub fn events(&self) -> Vec<PipelineEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: PipelineEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}
