//! Document-level KPI aggregation.
//!
//! Explicit trailer totals always win. Only a monthly statement that prints
//! no trailer at all falls back to summing its employee blocks.

use rust_decimal::Decimal;

use crate::extraction::{DocumentTotals, EventSink, PipelineEvent};
use crate::models::{EmployeeRecord, KpiLabel, KpiRecord, Period};

/// Builds the KPI records of one document.
///
/// # Arguments
///
/// * `totals` - The trailer totals printed in the document
/// * `employees` - The employee records extracted from the document
/// * `monthly` - Whether the document is a monthly statement
/// * `period` - The document's period
/// * `category` - The category stamped on each KPI
/// * `sink` - Receives a [`PipelineEvent::ValueOverflow`] per total that
///   does not fit in a `Decimal`; such totals are dropped
///
/// # Returns
///
/// One [`KpiRecord`] per strictly positive total, in [`KpiLabel::ALL`] order.
/// `Encargos` is the sum of FGTS, INSS and IRRF and is emitted when at least
/// one of them is positive. `Salário Base Total` only exists on the block-sum
/// path, since trailers do not print it.
///
/// # Example
///
/// ```
/// use payroll_import::calculation::aggregate_totals;
/// use payroll_import::config::Calendar;
/// use payroll_import::extraction::{DocumentTotals, RecordingSink};
/// use payroll_import::models::{KpiLabel, Period};
/// use rust_decimal::Decimal;
///
/// let totals = DocumentTotals {
///     gross: Some(Decimal::from(5200)),
///     deductions: Some(Decimal::ZERO),
///     net: Some(Decimal::from(4400)),
///     ..DocumentTotals::default()
/// };
/// let period = Period::new(3, 2026, &Calendar::default());
///
/// let kpis = aggregate_totals(&totals, &[], false, &period, "Folha", &RecordingSink::new());
/// assert_eq!(kpis.len(), 2);
/// assert_eq!(kpis[0].label, KpiLabel::Payroll);
/// assert_eq!(kpis[1].label, KpiLabel::NetPayTotal);
/// ```
pub fn aggregate_totals(
    totals: &DocumentTotals,
    employees: &[EmployeeRecord],
    monthly: bool,
    period: &Period,
    category: &str,
    sink: &dyn EventSink,
) -> Vec<KpiRecord> {
    let values = if totals.is_empty() && monthly && !employees.is_empty() {
        block_sums(employees)
    } else {
        explicit(totals)
    };

    KpiLabel::ALL
        .iter()
        .zip(values)
        .filter_map(|(label, value)| match value {
            Some(value) => Some((label, value)),
            None => {
                sink.emit(PipelineEvent::ValueOverflow {
                    subject: String::new(),
                    field: label.as_str().to_string(),
                });
                None
            }
        })
        .filter(|(_, value)| *value > Decimal::ZERO)
        .map(|(label, value)| KpiRecord {
            label: *label,
            period: period.clone(),
            value,
            category: category.to_string(),
        })
        .collect()
}

/// Sum of FGTS, INSS and IRRF; `None` if any part is missing or overflows.
fn charges(fgts: Option<Decimal>, inss: Option<Decimal>, irrf: Option<Decimal>) -> Option<Decimal> {
    fgts?.checked_add(inss?)?.checked_add(irrf?)
}

/// Values in [`KpiLabel::ALL`] order from the trailer.
fn explicit(totals: &DocumentTotals) -> [Option<Decimal>; 8] {
    let value = |v: Option<Decimal>| Some(v.unwrap_or(Decimal::ZERO));
    let fgts = value(totals.fgts);
    let inss = value(totals.inss);
    let irrf = value(totals.irrf);
    [
        value(totals.gross),
        Some(Decimal::ZERO),
        value(totals.deductions),
        value(totals.net),
        fgts,
        inss,
        irrf,
        charges(fgts, inss, irrf),
    ]
}

/// Values in [`KpiLabel::ALL`] order summed over the employee records.
/// `None` marks a sum that overflowed.
fn block_sums(employees: &[EmployeeRecord]) -> [Option<Decimal>; 8] {
    let sum = |f: fn(&EmployeeRecord) -> Decimal| {
        employees
            .iter()
            .try_fold(Decimal::ZERO, |acc, e| acc.checked_add(f(e)))
    };
    let fgts = sum(|e| e.fgts);
    let inss = sum(|e| e.inss);
    let irrf = sum(|e| e.irrf);
    [
        sum(|e| e.gross_earnings),
        sum(|e| e.base_salary),
        sum(|e| e.deductions),
        sum(|e| e.net_pay),
        fgts,
        inss,
        irrf,
        charges(fgts, inss, irrf),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Calendar;
    use crate::extraction::RecordingSink;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn period() -> Period {
        Period::new(3, 2026, &Calendar::default())
    }

    fn employee(id: &str, salary: &str, gross: &str, net: &str) -> EmployeeRecord {
        let mut record = EmployeeRecord::new(id, format!("EMP {id}"), period());
        record.base_salary = dec(salary);
        record.gross_earnings = dec(gross);
        record.net_pay = dec(net);
        record
    }

    fn labels(kpis: &[KpiRecord]) -> Vec<&'static str> {
        kpis.iter().map(|k| k.label.as_str()).collect()
    }

    #[test]
    fn test_explicit_combined_totals() {
        let totals = DocumentTotals {
            gross: Some(dec("5200")),
            deductions: Some(dec("800")),
            net: Some(dec("4400")),
            ..DocumentTotals::default()
        };
        let kpis = aggregate_totals(&totals, &[], true, &period(), "Folha", &RecordingSink::new());
        assert_eq!(
            labels(&kpis),
            vec!["Folha de pagamento", "Descontos Total", "Líquido Total"]
        );
        assert_eq!(kpis[0].value, dec("5200"));
        assert_eq!(kpis[1].value, dec("800"));
        assert_eq!(kpis[2].value, dec("4400"));
        assert!(kpis.iter().all(|k| k.category == "Folha"));
        assert!(kpis.iter().all(|k| k.period == period()));
    }

    #[test]
    fn test_explicit_totals_win_over_block_sums() {
        let totals = DocumentTotals {
            net: Some(dec("100")),
            ..DocumentTotals::default()
        };
        let employees = vec![employee("1", "2200", "2500", "2000")];
        let kpis = aggregate_totals(&totals, &employees, true, &period(), "Folha", &RecordingSink::new());
        assert_eq!(labels(&kpis), vec!["Líquido Total"]);
        assert_eq!(kpis[0].value, dec("100"));
    }

    #[test]
    fn test_monthly_statement_falls_back_to_block_sums() {
        let mut first = employee("1", "2200", "2500", "2000");
        first.fgts = dec("200");
        let second = employee("2", "3000", "3000", "2700");
        let kpis = aggregate_totals(
            &DocumentTotals::default(),
            &[first, second],
            true,
            &period(),
            "Folha",
            &RecordingSink::new(),
        );
        assert_eq!(
            labels(&kpis),
            vec![
                "Folha de pagamento",
                "Salário Base Total",
                "Líquido Total",
                "Encargos FGTS",
                "Encargos",
            ]
        );
        assert_eq!(kpis[0].value, dec("5500"));
        assert_eq!(kpis[1].value, dec("5200"));
        assert_eq!(kpis[2].value, dec("4700"));
        assert_eq!(kpis[4].value, dec("200"));
    }

    #[test]
    fn test_non_monthly_without_totals_has_no_kpis() {
        let employees = vec![employee("1", "2200", "2500", "2000")];
        let kpis = aggregate_totals(&DocumentTotals::default(), &employees, false, &period(), "Folha", &RecordingSink::new());
        assert!(kpis.is_empty());
    }

    #[test]
    fn test_zero_totals_produce_no_kpi() {
        let totals = DocumentTotals {
            gross: Some(Decimal::ZERO),
            deductions: Some(Decimal::ZERO),
            net: Some(Decimal::ZERO),
            fgts: Some(Decimal::ZERO),
            ..DocumentTotals::default()
        };
        assert!(aggregate_totals(&totals, &[], true, &period(), "Folha", &RecordingSink::new()).is_empty());
    }

    #[test]
    fn test_charges_combine_fgts_inss_irrf() {
        let totals = DocumentTotals {
            fgts: Some(dec("800")),
            inss: Some(dec("900")),
            irrf: Some(dec("120.50")),
            ..DocumentTotals::default()
        };
        let kpis = aggregate_totals(&totals, &[], false, &period(), "Folha", &RecordingSink::new());
        assert_eq!(
            labels(&kpis),
            vec!["Encargos FGTS", "Encargos INSS", "Encargos IRRF", "Encargos"]
        );
        assert_eq!(kpis[3].value, dec("1820.50"));
    }

    #[test]
    fn test_overflowing_block_sum_is_dropped_and_reported() {
        let mut first = employee("1", "1000", "0", "500");
        first.gross_earnings = Decimal::MAX;
        let mut second = employee("2", "2000", "0", "700");
        second.gross_earnings = Decimal::MAX;

        let sink = RecordingSink::new();
        let kpis = aggregate_totals(
            &DocumentTotals::default(),
            &[first, second],
            true,
            &period(),
            "Folha",
            &sink,
        );
        assert_eq!(labels(&kpis), vec!["Salário Base Total", "Líquido Total"]);
        assert_eq!(kpis[0].value, dec("3000"));
        assert_eq!(
            sink.events(),
            vec![PipelineEvent::ValueOverflow {
                subject: String::new(),
                field: "Folha de pagamento".to_string(),
            }]
        );
    }

    #[test]
    fn test_overflowing_charges_keep_their_parts() {
        let totals = DocumentTotals {
            fgts: Some(Decimal::MAX),
            inss: Some(Decimal::MAX),
            ..DocumentTotals::default()
        };
        let sink = RecordingSink::new();
        let kpis = aggregate_totals(&totals, &[], false, &period(), "Folha", &sink);
        assert_eq!(labels(&kpis), vec!["Encargos FGTS", "Encargos INSS"]);
        assert_eq!(sink.events().len(), 1);
    }
}
