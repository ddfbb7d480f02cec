//! Payroll Document Extraction & Reconciliation Engine
//!
//! This crate turns the JSON output of a PDF text extraction step (monthly
//! payroll statements and timesheets) into per-employee attendance records and
//! payroll KPIs, and reconciles them into a SQLite reporting database.
//!
//! # Example
//!
//! ```
//! use payroll_import::config::PolicyConfig;
//! use payroll_import::extraction::{Extractor, RecordingSink};
//! use payroll_import::models::RawDocument;
//!
//! let text = "Mês/Ano: 03/2026\nFuncionário: 101 - ANA SILVA\nSalário Base: 2.200,00";
//! let doc = RawDocument::from_text("Folha Mensal 03.26.pdf", text);
//! let extractor = Extractor::new(PolicyConfig::default());
//! let extraction = extractor.extract("folha.json", &doc, &RecordingSink::new());
//! assert_eq!(extraction.employees.len(), 1);
//! assert_eq!(extraction.employees[0].name, "ANA SILVA");
//! ```

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod error;
pub mod extraction;
pub mod import;
pub mod models;
pub mod store;
