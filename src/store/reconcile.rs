//! Idempotent reconciliation of extracted records into the store.
//!
//! Each record is looked up by its natural identity and either updated in
//! place or inserted, so re-importing the same period never duplicates rows.

use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::debug;

use super::roster::sync_roster;
use super::{ATTENDANCE_TABLE, KPI_TABLE, REGISTRATION_COLUMN, SqliteStore, table_columns};
use crate::error::EngineResult;
use crate::extraction::{EventSink, PipelineEvent};
use crate::models::{DocumentExtraction, EmployeeRecord, KpiRecord, ReconcileOutcome, RosterOutcome};

/// What reconciling one document changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentOutcome {
    /// Attendance and KPI rows written.
    pub reconciled: ReconcileOutcome,
    /// Roster changes, when roster sync is enabled.
    pub roster: Option<RosterOutcome>,
    /// Rows removed by the wipe, if one was requested.
    pub wiped_rows: usize,
}

/// Merges document extractions into a [`SqliteStore`].
///
/// # Example
///
/// ```
/// use payroll_import::config::Calendar;
/// use payroll_import::extraction::RecordingSink;
/// use payroll_import::models::{DocumentExtraction, DocumentKind, EmployeeRecord, Period};
/// use payroll_import::store::{Reconciler, SqliteStore};
///
/// let mut store = SqliteStore::open_in_memory().unwrap();
/// store.ensure_schema().unwrap();
///
/// let period = Period::new(3, 2026, &Calendar::default());
/// let extraction = DocumentExtraction {
///     source: "folha.json".to_string(),
///     kind: DocumentKind::PayrollStatement,
///     period: period.clone(),
///     employees: vec![EmployeeRecord::new("101", "ANA", period)],
///     kpis: vec![],
/// };
///
/// let sink = RecordingSink::new();
/// let mut reconciler = Reconciler::new(&mut store, &sink);
/// assert_eq!(reconciler.reconcile(&extraction, false).unwrap().inserted, 1);
/// assert_eq!(reconciler.reconcile(&extraction, false).unwrap().inserted, 0);
/// ```
pub struct Reconciler<'a> {
    store: &'a mut SqliteStore,
    sink: &'a dyn EventSink,
    sync_roster: bool,
}

impl<'a> Reconciler<'a> {
    /// Creates a reconciler writing to `store` and reporting to `sink`.
    pub fn new(store: &'a mut SqliteStore, sink: &'a dyn EventSink) -> Self {
        Self {
            store,
            sink,
            sync_roster: false,
        }
    }

    /// Also upserts every employee into the roster table.
    pub fn with_roster_sync(mut self, enabled: bool) -> Self {
        self.sync_roster = enabled;
        self
    }

    /// Reconciles one document.
    ///
    /// # Arguments
    ///
    /// * `extraction` - The records of one document
    /// * `wipe_before_import` - Empties the attendance and KPI tables first,
    ///   inside the same transaction
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Store`](crate::error::EngineError::Store) on any
    /// database failure; the whole document is rolled back.
    pub fn reconcile(
        &mut self,
        extraction: &DocumentExtraction,
        wipe_before_import: bool,
    ) -> EngineResult<ReconcileOutcome> {
        Ok(self.reconcile_document(extraction, wipe_before_import)?.reconciled)
    }

    /// Reconciles one document and reports everything it changed.
    pub fn reconcile_document(
        &mut self,
        extraction: &DocumentExtraction,
        wipe_before_import: bool,
    ) -> EngineResult<DocumentOutcome> {
        let sink = self.sink;
        let sync = self.sync_roster;
        let tx = self
            .store
            .connection_mut()
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut outcome = DocumentOutcome::default();
        if wipe_before_import {
            outcome.wiped_rows = wipe(&tx, sink)?;
        }

        let has_registration = table_columns(&tx, ATTENDANCE_TABLE)?
            .iter()
            .any(|c| c == REGISTRATION_COLUMN);
        for record in &extraction.employees {
            outcome.reconciled += upsert_attendance(&tx, record, has_registration, sink)?;
        }
        for kpi in &extraction.kpis {
            outcome.reconciled += upsert_kpi(&tx, kpi, sink)?;
        }
        if sync {
            outcome.roster = Some(sync_roster(&tx, &extraction.employees, sink)?);
        }

        tx.commit()?;
        debug!(
            document = %extraction.source,
            inserted = outcome.reconciled.inserted,
            updated = outcome.reconciled.updated,
            "Document reconciled"
        );
        Ok(outcome)
    }
}

fn wipe(conn: &Connection, sink: &dyn EventSink) -> EngineResult<usize> {
    let mut rows = 0;
    for table in [ATTENDANCE_TABLE, KPI_TABLE] {
        rows += conn.execute(&format!("DELETE FROM {}", super::quote_ident(table)), params![])?;
    }
    sink.emit(PipelineEvent::TablesWiped {
        tables: vec![ATTENDANCE_TABLE.to_string(), KPI_TABLE.to_string()],
        rows,
    });
    Ok(rows)
}

pub(crate) fn as_real(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

fn attendance_key(record: &EmployeeRecord) -> String {
    format!(
        "{}|{}|{}",
        record.name, record.period.month_name, record.period.year
    )
}

/// Finds the attendance row for `record`.
///
/// With a registration column and a registration id, a row carrying the same
/// id is preferred, a row without one is adopted, and a row with a different
/// id never matches.
fn find_attendance(
    conn: &Connection,
    record: &EmployeeRecord,
    has_registration: bool,
) -> EngineResult<Option<i64>> {
    let period = &record.period;
    let rowid = if has_registration && !record.registration_id.is_empty() {
        conn.query_row(
            r#"SELECT rowid FROM "absenteísmo"
               WHERE "Nome" = ?1 AND "Mês" = ?2 AND "Ano" = ?3
                 AND ("Matricula" IS NULL OR "Matricula" = '' OR "Matricula" = ?4)
               ORDER BY CASE WHEN "Matricula" = ?4 THEN 0 ELSE 1 END, rowid
               LIMIT 1"#,
            params![record.name, period.month_name, period.year, record.registration_id],
            |row| row.get(0),
        )
        .optional()?
    } else {
        conn.query_row(
            r#"SELECT rowid FROM "absenteísmo"
               WHERE "Nome" = ?1 AND "Mês" = ?2 AND "Ano" = ?3
               ORDER BY rowid
               LIMIT 1"#,
            params![record.name, period.month_name, period.year],
            |row| row.get(0),
        )
        .optional()?
    };
    Ok(rowid)
}

fn upsert_attendance(
    conn: &Connection,
    record: &EmployeeRecord,
    has_registration: bool,
    sink: &dyn EventSink,
) -> EngineResult<ReconcileOutcome> {
    let period = &record.period;
    let overtime_hours = as_real(record.overtime_hours);
    let overtime_cost = as_real(record.overtime_cost);
    let absences = as_real(record.absence_count);
    let excused = as_real(record.excused_absence_hours);
    let salary = as_real(record.stored_salary());
    let unit_value = as_real(record.overtime_unit_value);
    let key = attendance_key(record);

    match find_attendance(conn, record, has_registration)? {
        Some(rowid) => {
            conn.execute(
                r#"UPDATE "absenteísmo"
                   SET "Horas_Extras" = ?1, "Custo_Horas_Extras" = ?2, "Faltas" = ?3,
                       "Abonos" = ?4, "Salário" = ?5, "Valor_Hora_Extra" = ?6
                   WHERE rowid = ?7"#,
                params![overtime_hours, overtime_cost, absences, excused, salary, unit_value, rowid],
            )?;
            if has_registration && !record.registration_id.is_empty() {
                conn.execute(
                    r#"UPDATE "absenteísmo" SET "Matricula" = ?1 WHERE rowid = ?2"#,
                    params![record.registration_id, rowid],
                )?;
            }
            sink.emit(PipelineEvent::RowUpdated {
                table: ATTENDANCE_TABLE.to_string(),
                key,
            });
            Ok(ReconcileOutcome {
                inserted: 0,
                updated: 1,
            })
        }
        None => {
            if has_registration {
                conn.execute(
                    r#"INSERT INTO "absenteísmo" ("CPF", "Nome", "Matricula", "Mês", "Ano",
                           "Horas_Extras", "Custo_Horas_Extras", "Faltas", "Abonos", "Salário",
                           "Valor_Hora_Extra")
                       VALUES ('', ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"#,
                    params![
                        record.name,
                        record.registration_id,
                        period.month_name,
                        period.year,
                        overtime_hours,
                        overtime_cost,
                        absences,
                        excused,
                        salary,
                        unit_value
                    ],
                )?;
            } else {
                conn.execute(
                    r#"INSERT INTO "absenteísmo" ("CPF", "Nome", "Mês", "Ano",
                           "Horas_Extras", "Custo_Horas_Extras", "Faltas", "Abonos", "Salário",
                           "Valor_Hora_Extra")
                       VALUES ('', ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"#,
                    params![
                        record.name,
                        period.month_name,
                        period.year,
                        overtime_hours,
                        overtime_cost,
                        absences,
                        excused,
                        salary,
                        unit_value
                    ],
                )?;
            }
            sink.emit(PipelineEvent::RowInserted {
                table: ATTENDANCE_TABLE.to_string(),
                key,
            });
            Ok(ReconcileOutcome {
                inserted: 1,
                updated: 0,
            })
        }
    }
}

fn upsert_kpi(
    conn: &Connection,
    kpi: &KpiRecord,
    sink: &dyn EventSink,
) -> EngineResult<ReconcileOutcome> {
    let label = kpi.label.as_str();
    let period = &kpi.period;
    let value = as_real(kpi.value);
    let key = format!("{}|{}|{}", label, period.month_name, period.year);

    let existing: Option<i64> = conn
        .query_row(
            r#"SELECT rowid FROM "base_kpi"
               WHERE "KPI" = ?1 AND "Mês" = ?2 AND "Ano" = ?3
               ORDER BY rowid
               LIMIT 1"#,
            params![label, period.month_name, period.year],
            |row| row.get(0),
        )
        .optional()?;

    match existing {
        Some(rowid) => {
            conn.execute(
                r#"UPDATE "base_kpi" SET "Valor" = ?1, "Tipo" = ?2 WHERE rowid = ?3"#,
                params![value, kpi.category, rowid],
            )?;
            sink.emit(PipelineEvent::RowUpdated {
                table: KPI_TABLE.to_string(),
                key,
            });
            Ok(ReconcileOutcome {
                inserted: 0,
                updated: 1,
            })
        }
        None => {
            conn.execute(
                r#"INSERT INTO "base_kpi" ("KPI", "Mês", "Ano", "Valor", "Tipo")
                   VALUES (?1, ?2, ?3, ?4, ?5)"#,
                params![label, period.month_name, period.year, value, kpi.category],
            )?;
            sink.emit(PipelineEvent::RowInserted {
                table: KPI_TABLE.to_string(),
                key,
            });
            Ok(ReconcileOutcome {
                inserted: 1,
                updated: 0,
            })
        }
    }
}
