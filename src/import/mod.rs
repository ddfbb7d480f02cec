//! Batch import of extracted payroll documents.
//!
//! Reads every `*.json` file of a source directory in file-name order,
//! extracts its records and reconciles them into the store, one transaction
//! per document. A failing document is recorded in the summary and the batch
//! moves on.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};
use uuid::Uuid;

use crate::config::PolicyConfig;
use crate::error::{EngineError, EngineResult};
use crate::extraction::{EventSink, Extractor, TracingSink};
use crate::models::{DocumentFailure, ImportSummary, RawDocument, RosterOutcome};
use crate::store::{Reconciler, SqliteStore};

/// Options of one import run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    /// Directory holding the extractor's JSON files.
    pub source_dir: PathBuf,
    /// SQLite database to reconcile into.
    pub database: PathBuf,
    /// Empty the attendance and KPI tables before the first document.
    pub wipe: bool,
    /// Extract and report without touching the store.
    pub dry_run: bool,
    /// Also merge employees into the roster table.
    pub sync_roster: bool,
}

impl ImportOptions {
    /// Creates options with the default behaviour: wipe, persist, no roster sync.
    pub fn new(source_dir: impl Into<PathBuf>, database: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            database: database.into(),
            wipe: true,
            dry_run: false,
            sync_roster: false,
        }
    }
}

/// Runs an import with the given policy, logging through `tracing`.
///
/// Opens the database (creating the tables when absent) unless the run is a
/// dry run, in which case the store is never opened.
///
/// # Errors
///
/// Returns an error if the source directory cannot be listed or the store
/// cannot be opened. Per-document failures are reported in the summary.
pub fn run_import(options: &ImportOptions, config: PolicyConfig) -> EngineResult<ImportSummary> {
    let extractor = Extractor::new(config);
    let sink = TracingSink;
    let importer = Importer::new(&extractor, &sink);

    if options.dry_run {
        return importer.run(options, None);
    }

    let mut store = SqliteStore::open(&options.database)?;
    store.ensure_schema()?;
    importer.run(options, Some(&mut store))
}

/// Lists the `*.json` documents of `dir`, sorted by file name.
pub fn list_documents(dir: &Path) -> EngineResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(EngineError::SourceNotFound {
            path: dir.display().to_string(),
        });
    }

    let entries = fs::read_dir(dir).map_err(|e| EngineError::SourceNotFound {
        path: format!("{}: {}", dir.display(), e),
    })?;
    let mut documents: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        })
        .collect();
    documents.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(documents)
}

/// Reads and deserializes one extractor JSON file.
pub fn read_document(path: &Path) -> EngineResult<RawDocument> {
    let name = document_name(path);
    let content = fs::read_to_string(path).map_err(|e| EngineError::DocumentRead {
        document: name.clone(),
        message: e.to_string(),
    })?;
    serde_json::from_str(&content).map_err(|e| EngineError::DocumentParse {
        document: name,
        message: e.to_string(),
    })
}

fn document_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Drives extraction and reconciliation over a directory of documents.
pub struct Importer<'a> {
    extractor: &'a Extractor,
    sink: &'a dyn EventSink,
}

impl<'a> Importer<'a> {
    /// Creates an importer.
    pub fn new(extractor: &'a Extractor, sink: &'a dyn EventSink) -> Self {
        Self { extractor, sink }
    }

    /// Imports every document of `options.source_dir`.
    ///
    /// With `store` set to `None` nothing is persisted, whatever
    /// `options.dry_run` says. The wipe, when requested, is applied by the
    /// first document that reconciles successfully.
    pub fn run(
        &self,
        options: &ImportOptions,
        mut store: Option<&mut SqliteStore>,
    ) -> EngineResult<ImportSummary> {
        let run_id = Uuid::new_v4();
        let dry_run = options.dry_run || store.is_none();
        let documents = list_documents(&options.source_dir)?;

        info!(
            run_id = %run_id,
            source = %options.source_dir.display(),
            documents = documents.len(),
            dry_run,
            "Starting import"
        );

        let mut summary = ImportSummary::new(run_id, dry_run);
        summary.documents_found = documents.len();
        if options.sync_roster && !dry_run {
            summary.roster = Some(RosterOutcome::default());
        }
        let mut wipe_pending = options.wipe;

        for path in &documents {
            let name = document_name(path);
            let document = match read_document(path) {
                Ok(document) => document,
                Err(err) => {
                    warn!(run_id = %run_id, document = %name, error = %err, "Skipping document");
                    summary.failures.push(DocumentFailure {
                        document: name,
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            let extraction = self.extractor.extract(&name, &document, self.sink);
            summary.documents_processed += 1;
            summary.employee_records += extraction.employees.len();
            summary.kpi_records += extraction.kpis.len();
            if extraction.is_empty() {
                warn!(run_id = %run_id, document = %name, "Document produced no records");
                summary.empty_documents.push(name.clone());
            }

            let Some(store) = store.as_deref_mut() else {
                continue;
            };

            let mut reconciler =
                Reconciler::new(store, self.sink).with_roster_sync(options.sync_roster);
            match reconciler.reconcile_document(&extraction, wipe_pending) {
                Ok(outcome) => {
                    wipe_pending = false;
                    summary.reconciled += outcome.reconciled;
                    if let (Some(total), Some(roster)) = (summary.roster.as_mut(), outcome.roster) {
                        *total += roster;
                    }
                }
                Err(err) => {
                    warn!(run_id = %run_id, document = %name, error = %err, "Document rolled back");
                    summary.failures.push(DocumentFailure {
                        document: name,
                        reason: err.to_string(),
                    });
                }
            }
        }

        info!(
            run_id = %run_id,
            processed = summary.documents_processed,
            employees = summary.employee_records,
            kpis = summary.kpi_records,
            inserted = summary.reconciled.inserted,
            updated = summary.reconciled.updated,
            empty = summary.empty_documents.len(),
            failed = summary.failures.len(),
            "Import finished"
        );
        Ok(summary)
    }
}
