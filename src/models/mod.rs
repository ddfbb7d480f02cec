//! Core data models for the payroll import engine.
//!
//! This module contains all the domain models used throughout the engine.

mod document;
mod employee;
mod extraction_result;
mod kpi;
mod period;
mod report;

pub use document::{DocumentKind, DocumentPage, RawDocument, RawTable};
pub use employee::{EmployeeRecord, OvertimeLine};
pub use extraction_result::DocumentExtraction;
pub use kpi::{KpiLabel, KpiRecord};
pub use period::Period;
pub use report::{DocumentFailure, ImportSummary, ReconcileOutcome, RosterOutcome};
