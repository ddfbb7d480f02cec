//! Employee roster sync.
//!
//! Extracted employees are merged into the `colaboradores` table: an employee
//! already on the roster (same normalized name or same registration) has its
//! salary raised when the new figure is higher; anyone else is added as
//! active.

use rusqlite::types::Value;
use rusqlite::{Connection, params};
use rust_decimal::prelude::ToPrimitive;

use super::reconcile::as_real;
use super::{ROSTER_TABLE, quote_ident, table_columns};
use crate::error::EngineResult;
use crate::extraction::{EventSink, PipelineEvent, parse_decimal};
use crate::models::{EmployeeRecord, RosterOutcome};

/// Status given to employees added from a payroll document.
pub const ACTIVE_STATUS: &str = "Ativo";

/// Upper-cases a name and collapses its whitespace for roster matching.
///
/// # Example
///
/// ```
/// use payroll_import::store::normalize_name;
///
/// assert_eq!(normalize_name("  Ana  Maria\tSilva "), "ANA MARIA SILVA");
/// assert_eq!(normalize_name("joão"), "JOÃO");
/// ```
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_uppercase)
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug)]
struct RosterEntry {
    rowid: i64,
    name: String,
    registration_id: String,
    salary: f64,
}

/// Reads a roster cell as text whatever its storage class.
fn text_value(value: Value) -> String {
    match value {
        Value::Integer(i) => i.to_string(),
        Value::Real(r) if r.fract() == 0.0 && r.abs() < 1e15 => format!("{r:.0}"),
        Value::Real(r) => r.to_string(),
        Value::Text(t) => t.trim().to_string(),
        Value::Null | Value::Blob(_) => String::new(),
    }
}

/// Reads a roster cell as a number. Text with a decimal comma is read pt-BR
/// style, other text as a plain number.
fn real_value(value: Value) -> f64 {
    match value {
        Value::Integer(i) => i as f64,
        Value::Real(r) => r,
        Value::Text(t) => {
            let t = t.trim();
            if t.contains(',') {
                parse_decimal(t).to_f64().unwrap_or(0.0)
            } else {
                t.parse::<f64>().ok().filter(|r| r.is_finite()).unwrap_or(0.0)
            }
        }
        Value::Null | Value::Blob(_) => 0.0,
    }
}

fn load_roster(conn: &Connection) -> EngineResult<Vec<RosterEntry>> {
    let mut stmt =
        conn.prepare(r#"SELECT rowid, "Nome", "Matricula", "Salário" FROM "colaboradores""#)?;
    let entries = stmt
        .query_map(params![], |row| {
            Ok(RosterEntry {
                rowid: row.get(0)?,
                name: normalize_name(&text_value(row.get(1)?)),
                registration_id: text_value(row.get(2)?),
                salary: real_value(row.get(3)?),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(entries)
}

/// Merges `employees` into the roster on the given connection.
///
/// Runs on the caller's transaction, so a failing document leaves the roster
/// unchanged.
pub(crate) fn sync_roster(
    conn: &Connection,
    employees: &[EmployeeRecord],
    sink: &dyn EventSink,
) -> EngineResult<RosterOutcome> {
    let columns = table_columns(conn, ROSTER_TABLE)?;
    let has_role = columns.iter().any(|c| c == "Função");
    let has_admission = columns.iter().any(|c| c == "Admissão");

    let mut roster = load_roster(conn)?;
    let mut outcome = RosterOutcome::default();

    for employee in employees {
        let name = normalize_name(&employee.name);
        let salary = as_real(employee.stored_salary());
        let found = roster.iter_mut().find(|entry| {
            (!name.is_empty() && entry.name == name)
                || (!employee.registration_id.is_empty()
                    && entry.registration_id == employee.registration_id)
        });

        match found {
            Some(entry) if salary > 0.0 && entry.salary < salary => {
                conn.execute(
                    r#"UPDATE "colaboradores" SET "Salário" = ?1 WHERE rowid = ?2"#,
                    params![salary, entry.rowid],
                )?;
                entry.salary = salary;
                outcome.updated += 1;
                sink.emit(PipelineEvent::RowUpdated {
                    table: ROSTER_TABLE.to_string(),
                    key: name,
                });
            }
            Some(_) => outcome.unchanged += 1,
            None => {
                let mut names = vec![
                    "CPF",
                    "Nome",
                    "Nome Completo Funcionário",
                    "Matricula",
                    "Salário",
                    "Status",
                ];
                let role = employee.role.clone().unwrap_or_default();
                let admission = employee.admission_date.clone().unwrap_or_default();
                let mut values: Vec<&dyn rusqlite::ToSql> = vec![
                    &"",
                    &employee.name,
                    &employee.name,
                    &employee.registration_id,
                    &salary,
                    &ACTIVE_STATUS,
                ];
                if has_role {
                    names.push("Função");
                    values.push(&role);
                }
                if has_admission {
                    names.push("Admissão");
                    values.push(&admission);
                }

                let placeholders = (1..=names.len())
                    .map(|i| format!("?{i}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                let column_list = names
                    .iter()
                    .map(|c| quote_ident(c))
                    .collect::<Vec<_>>()
                    .join(", ");
                conn.execute(
                    &format!(
                        "INSERT INTO {} ({column_list}) VALUES ({placeholders})",
                        quote_ident(ROSTER_TABLE)
                    ),
                    values.as_slice(),
                )?;

                roster.push(RosterEntry {
                    rowid: conn.last_insert_rowid(),
                    name: name.clone(),
                    registration_id: employee.registration_id.clone(),
                    salary,
                });
                outcome.added += 1;
                sink.emit(PipelineEvent::RowInserted {
                    table: ROSTER_TABLE.to_string(),
                    key: name,
                });
            }
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Calendar;
    use crate::extraction::RecordingSink;
    use crate::models::Period;
    use crate::store::SqliteStore;
    use rust_decimal::Decimal;

    fn employee(id: &str, name: &str, salary: i64) -> EmployeeRecord {
        let mut record = EmployeeRecord::new(id, name, Period::new(3, 2026, &Calendar::default()));
        record.base_salary = Decimal::from(salary);
        record.role = Some("PEDREIRO".to_string());
        record.admission_date = Some("01/02/2020".to_string());
        record
    }

    fn store() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        store.ensure_schema().unwrap();
        store
    }

    #[test]
    fn test_new_employee_is_added_as_active() {
        let store = store();
        let sink = RecordingSink::new();
        let outcome = sync_roster(store.connection(), &[employee("101", "Ana Silva", 2200)], &sink).unwrap();
        assert_eq!(outcome, RosterOutcome { added: 1, updated: 0, unchanged: 0 });

        let (status, role, admission, salary): (String, String, String, f64) = store
            .connection()
            .query_row(
                r#"SELECT "Status", "Função", "Admissão", "Salário" FROM "colaboradores""#,
                params![],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .unwrap();
        assert_eq!(status, "Ativo");
        assert_eq!(role, "PEDREIRO");
        assert_eq!(admission, "01/02/2020");
        assert_eq!(salary, 2200.0);
    }

    #[test]
    fn test_existing_employee_matched_by_normalized_name() {
        let store = store();
        store
            .connection()
            .execute(
                r#"INSERT INTO "colaboradores" ("Nome", "Salário") VALUES ('ana  silva', 2000)"#,
                params![],
            )
            .unwrap();
        let sink = RecordingSink::new();

        let outcome = sync_roster(store.connection(), &[employee("", "ANA SILVA", 2200)], &sink).unwrap();
        assert_eq!(outcome.updated, 1);

        let outcome = sync_roster(store.connection(), &[employee("", "ANA SILVA", 1800)], &sink).unwrap();
        assert_eq!(outcome.unchanged, 1);

        let salary: f64 = store
            .connection()
            .query_row(r#"SELECT "Salário" FROM "colaboradores""#, params![], |row| row.get(0))
            .unwrap();
        assert_eq!(salary, 2200.0);
        assert_eq!(store.count_rows(ROSTER_TABLE).unwrap(), 1);
    }

    #[test]
    fn test_existing_employee_matched_by_registration() {
        let store = store();
        store
            .connection()
            .execute(
                r#"INSERT INTO "colaboradores" ("Nome", "Matricula", "Salário") VALUES ('A. SILVA', '101', 2500)"#,
                params![],
            )
            .unwrap();
        let sink = RecordingSink::new();
        let outcome = sync_roster(store.connection(), &[employee("101", "ANA SILVA", 2200)], &sink).unwrap();
        assert_eq!(outcome, RosterOutcome { added: 0, updated: 0, unchanged: 1 });
    }

    #[test]
    fn test_duplicate_in_one_document_is_added_once() {
        let store = store();
        let sink = RecordingSink::new();
        let outcome = sync_roster(
            store.connection(),
            &[employee("7", "JOSE", 1000), employee("7", "JOSE", 1000)],
            &sink,
        )
        .unwrap();
        assert_eq!(outcome, RosterOutcome { added: 1, updated: 0, unchanged: 1 });
    }

    #[test]
    fn test_legacy_roster_without_role_columns() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .connection()
            .execute_batch(
                r#"CREATE TABLE "colaboradores" ("CPF" TEXT, "Nome" TEXT,
                       "Nome Completo Funcionário" TEXT, "Matricula" TEXT, "Salário" REAL, "Status" TEXT);"#,
            )
            .unwrap();
        let sink = RecordingSink::new();
        let outcome = sync_roster(store.connection(), &[employee("1", "ANA", 1000)], &sink).unwrap();
        assert_eq!(outcome.added, 1);
    }

    #[test]
    fn test_typed_legacy_roster_columns() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .connection()
            .execute_batch(
                r#"CREATE TABLE "colaboradores" ("CPF" TEXT, "Nome" TEXT,
                       "Nome Completo Funcionário" TEXT, "Matricula" INTEGER, "Salário" TEXT, "Status" TEXT);
                   INSERT INTO "colaboradores" ("Nome", "Matricula", "Salário") VALUES ('A. SILVA', 101, '2.000,00');
                   INSERT INTO "colaboradores" ("Nome", "Matricula", "Salário") VALUES (NULL, 202, '3000.5');"#,
            )
            .unwrap();
        let sink = RecordingSink::new();

        let outcome = sync_roster(
            store.connection(),
            &[employee("101", "ANA SILVA", 2200), employee("202", "BRUNO", 3000)],
            &sink,
        )
        .unwrap();
        assert_eq!(outcome, RosterOutcome { added: 0, updated: 1, unchanged: 1 });
        assert_eq!(store.count_rows(ROSTER_TABLE).unwrap(), 2);
    }

    #[test]
    fn test_cell_conversions() {
        assert_eq!(text_value(Value::Integer(101)), "101");
        assert_eq!(text_value(Value::Real(101.0)), "101");
        assert_eq!(text_value(Value::Text(" 7 ".to_string())), "7");
        assert_eq!(text_value(Value::Null), "");
        assert_eq!(real_value(Value::Text("2.000,00".to_string())), 2000.0);
        assert_eq!(real_value(Value::Text("1500.25".to_string())), 1500.25);
        assert_eq!(real_value(Value::Integer(2200)), 2200.0);
        assert_eq!(real_value(Value::Null), 0.0);
    }
}
