//! Document-level KPI model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Period;

/// The fixed vocabulary of KPI labels written to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KpiLabel {
    /// Total gross earnings of the payroll.
    Payroll,
    /// Sum of base salaries.
    BaseSalaryTotal,
    /// Total deductions.
    DeductionsTotal,
    /// Total net pay.
    NetPayTotal,
    /// Employer FGTS contributions.
    ChargesFgts,
    /// INSS withholdings.
    ChargesInss,
    /// IRRF withholdings.
    ChargesIrrf,
    /// FGTS + INSS + IRRF combined.
    Charges,
}

impl KpiLabel {
    /// Every label, in emission order.
    pub const ALL: [KpiLabel; 8] = [
        KpiLabel::Payroll,
        KpiLabel::BaseSalaryTotal,
        KpiLabel::DeductionsTotal,
        KpiLabel::NetPayTotal,
        KpiLabel::ChargesFgts,
        KpiLabel::ChargesInss,
        KpiLabel::ChargesIrrf,
        KpiLabel::Charges,
    ];

    /// Returns the label exactly as stored in the KPI table.
    pub fn as_str(&self) -> &'static str {
        match self {
            KpiLabel::Payroll => "Folha de pagamento",
            KpiLabel::BaseSalaryTotal => "Salário Base Total",
            KpiLabel::DeductionsTotal => "Descontos Total",
            KpiLabel::NetPayTotal => "Líquido Total",
            KpiLabel::ChargesFgts => "Encargos FGTS",
            KpiLabel::ChargesInss => "Encargos INSS",
            KpiLabel::ChargesIrrf => "Encargos IRRF",
            KpiLabel::Charges => "Encargos",
        }
    }
}

/// One document-level aggregate figure for a period.
///
/// Only built for strictly positive totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KpiRecord {
    /// Which figure this is.
    pub label: KpiLabel,
    /// The period the figure belongs to.
    pub period: Period,
    /// The figure itself; always greater than zero.
    pub value: Decimal,
    /// The KPI category (e.g., "Folha").
    pub category: String,
}
