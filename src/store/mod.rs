//! SQLite persistence for reconciled payroll records.
//!
//! The store owns one connection per run. Reconciliation of a document
//! happens inside one `IMMEDIATE` transaction (see [`Reconciler`]).

mod reconcile;
mod roster;

pub use reconcile::{DocumentOutcome, Reconciler};
pub use roster::normalize_name;

use std::path::Path;

use rusqlite::{Connection, params};
use tracing::debug;

use crate::error::EngineResult;

/// Attendance table, one row per employee and period.
pub const ATTENDANCE_TABLE: &str = "absenteísmo";
/// KPI table, one row per label and period.
pub const KPI_TABLE: &str = "base_kpi";
/// Employee roster table.
pub const ROSTER_TABLE: &str = "colaboradores";
/// Optional registration column of the attendance table.
pub const REGISTRATION_COLUMN: &str = "Matricula";

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS "absenteísmo" (
    rowid INTEGER PRIMARY KEY AUTOINCREMENT,
    "CPF" TEXT,
    "Nome" TEXT,
    "Matricula" TEXT,
    "Mês" TEXT,
    "Ano" INTEGER,
    "Horas_Extras" REAL,
    "Custo_Horas_Extras" REAL,
    "Faltas" REAL,
    "Abonos" REAL,
    "Salário" REAL,
    "Valor_Hora_Extra" REAL
);

CREATE TABLE IF NOT EXISTS "base_kpi" (
    rowid INTEGER PRIMARY KEY AUTOINCREMENT,
    "KPI" TEXT,
    "Mês" TEXT,
    "Ano" INTEGER,
    "Valor" REAL,
    "Tipo" TEXT
);

CREATE TABLE IF NOT EXISTS "colaboradores" (
    rowid INTEGER PRIMARY KEY AUTOINCREMENT,
    "CPF" TEXT,
    "Nome" TEXT,
    "Nome Completo Funcionário" TEXT,
    "Matricula" TEXT,
    "Função" TEXT,
    "Departamento" TEXT,
    "Base" TEXT,
    "Status" TEXT,
    "Admissão" TEXT,
    "Salário" REAL
);
"#;

/// SQLite-backed record store.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) the database at `path`.
    pub fn open(path: &Path) -> EngineResult<Self> {
        debug!(path = %path.display(), "Opening store");
        let conn = Connection::open(path)?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        Ok(Self { conn })
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> EngineResult<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Creates the attendance, KPI and roster tables when absent.
    ///
    /// Existing tables are left untouched, including legacy attendance tables
    /// without a registration column.
    pub fn ensure_schema(&self) -> EngineResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Returns the column names of `table`, empty if the table does not exist.
    pub fn table_columns(&self, table: &str) -> EngineResult<Vec<String>> {
        table_columns(&self.conn, table)
    }

    /// Returns the number of rows in `table`.
    pub fn count_rows(&self, table: &str) -> EngineResult<usize> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", quote_ident(table)),
            params![],
            |row| row.get(0),
        )?;
        Ok(count.max(0) as usize)
    }

    /// Returns the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub(crate) fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}

/// Column names of `table` via `PRAGMA table_info`.
pub(crate) fn table_columns(conn: &Connection, table: &str) -> EngineResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", quote_ident(table)))?;
    let columns = stmt
        .query_map(params![], |row| row.get::<_, String>(1))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(columns)
}

/// Quotes an SQL identifier.
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
