//! Employee record model.
//!
//! This module defines the [`EmployeeRecord`] produced for each employee block
//! of a payroll statement (or for a whole timesheet), and the
//! [`OvertimeLine`] items it is built from.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Period;

/// One overtime line item recovered from a document.
///
/// A single employee can have several of these in one pay period, typically
/// one per premium rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeLine {
    /// Hours worked on this line.
    pub hours: Decimal,
    /// The premium printed on the line (50 for `HORA EXTRA 50%`), if any.
    pub premium_percent: Option<Decimal>,
}

/// The normalized record for one employee in one period.
///
/// Every numeric field is non-negative; fields the document did not carry are
/// zero rather than absent.
///
/// # Example
///
/// ```
/// use payroll_import::config::Calendar;
/// use payroll_import::models::{EmployeeRecord, Period};
/// use rust_decimal::Decimal;
///
/// let mut record = EmployeeRecord::new("101", "ANA SILVA", Period::new(3, 2026, &Calendar::default()));
/// record.base_salary = Decimal::from(2200);
/// assert_eq!(record.stored_salary(), Decimal::from(2200));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    /// Registration number (ASCII digits). Empty when the document has none.
    pub registration_id: String,
    /// Employee name, trimmed with internal whitespace collapsed.
    pub name: String,
    /// The period this record belongs to.
    pub period: Period,
    /// Admission date as printed (dd/mm/yyyy).
    pub admission_date: Option<String>,
    /// Job role as printed.
    pub role: Option<String>,
    /// Monthly base salary.
    pub base_salary: Decimal,
    /// Total earnings for the period.
    pub gross_earnings: Decimal,
    /// Total deductions for the period.
    pub deductions: Decimal,
    /// Net pay for the period.
    pub net_pay: Decimal,
    /// Employer FGTS contribution.
    pub fgts: Decimal,
    /// Social-contribution (INSS) withholding.
    pub inss: Decimal,
    /// Income-tax (IRRF) withholding.
    pub irrf: Decimal,
    /// Overtime line items, in document order.
    pub overtime_lines: Vec<OvertimeLine>,
    /// Total overtime hours, rounded to 2 decimal places.
    pub overtime_hours: Decimal,
    /// Unexcused absence count.
    pub absence_count: Decimal,
    /// Excused absence hours (timesheets only).
    pub excused_absence_hours: Decimal,
    /// Cost of one overtime hour.
    pub overtime_unit_value: Decimal,
    /// Total overtime cost for the period.
    pub overtime_cost: Decimal,
}

impl EmployeeRecord {
    /// Creates a record with every monetary and count field at zero.
    pub fn new(registration_id: impl Into<String>, name: impl Into<String>, period: Period) -> Self {
        Self {
            registration_id: registration_id.into(),
            name: name.into(),
            period,
            admission_date: None,
            role: None,
            base_salary: Decimal::ZERO,
            gross_earnings: Decimal::ZERO,
            deductions: Decimal::ZERO,
            net_pay: Decimal::ZERO,
            fgts: Decimal::ZERO,
            inss: Decimal::ZERO,
            irrf: Decimal::ZERO,
            overtime_lines: vec![],
            overtime_hours: Decimal::ZERO,
            absence_count: Decimal::ZERO,
            excused_absence_hours: Decimal::ZERO,
            overtime_unit_value: Decimal::ZERO,
            overtime_cost: Decimal::ZERO,
        }
    }

    /// Returns the salary figure written to the store: the base salary, or the
    /// gross earnings when the document carried no base salary.
    pub fn stored_salary(&self) -> Decimal {
        if self.base_salary > Decimal::ZERO {
            self.base_salary
        } else {
            self.gross_earnings
        }
    }
}
