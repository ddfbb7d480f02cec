//! Extraction result model.
//!
//! This module contains the [`DocumentExtraction`] type that carries everything
//! the pipeline recovered from one document, ready for reconciliation.

use serde::{Deserialize, Serialize};

use super::{DocumentKind, EmployeeRecord, KpiRecord, Period};

/// Everything recovered from one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentExtraction {
    /// The document identifier (file name).
    pub source: String,
    /// The layout family the document was classified as.
    pub kind: DocumentKind,
    /// The resolved pay period.
    pub period: Period,
    /// One record per employee, in document order.
    pub employees: Vec<EmployeeRecord>,
    /// Document-level totals with a positive value.
    pub kpis: Vec<KpiRecord>,
}

impl DocumentExtraction {
    /// Returns true if the document produced neither employee nor KPI records.
    pub fn is_empty(&self) -> bool {
        self.employees.is_empty() && self.kpis.is_empty()
    }

    /// Returns the total number of records produced.
    pub fn record_count(&self) -> usize {
        self.employees.len() + self.kpis.len()
    }
}
