//! Payroll statement block extraction.
//!
//! Each employee block of a consolidated statement is read with one
//! [`RuleChain`] per field. Block-level patterns carry the trailing colon of
//! their label (`Total de Vencimentos:`); the document trailer prints the
//! same labels without one, so the last block never picks up document totals.

use std::sync::LazyLock;

use regex::Captures;
use rust_decimal::Decimal;

use super::events::{EventSink, PipelineEvent};
use super::rules::{FieldRule, RuleChain, count_group, decimal_group, text_group};
use super::segment::EmployeeBlock;
use super::{parse_decimal, parse_duration};
use crate::models::{EmployeeRecord, OvertimeLine, Period};

static NAME: LazyLock<RuleChain<String>> = LazyLock::new(|| {
    RuleChain::new(
        "name",
        vec![FieldRule::new(
            "name.first_line",
            r"\A[ \t]*([^\n]+?)(?:\s+Adm(?:iss[aã]o)?:|[ \t]*\n|[ \t]*\z)",
            text_group,
        )],
    )
});

static ADMISSION_DATE: LazyLock<RuleChain<String>> = LazyLock::new(|| {
    RuleChain::new(
        "admission_date",
        vec![FieldRule::new(
            "admission.label",
            r"Adm(?:iss[aã]o)?:\s*(\d{2}/\d{2}/\d{4})",
            text_group,
        )],
    )
});

static ROLE: LazyLock<RuleChain<String>> = LazyLock::new(|| {
    RuleChain::new(
        "role",
        vec![
            FieldRule::new("role.label", r"(?m)Fun[cç][aã]o:[ \t]*([^\n]+?)[ \t]*$", text_group),
            FieldRule::new("role.cargo_label", r"(?m)Cargo:[ \t]*([^\n]+?)[ \t]*$", text_group),
        ],
    )
});

pub(crate) static BASE_SALARY: LazyLock<RuleChain<Decimal>> = LazyLock::new(|| {
    RuleChain::new(
        "base_salary",
        vec![
            FieldRule::new(
                "salary.base_label",
                r"Sal[aá]rio Base:\s*(\d[\d.,]*)",
                decimal_group,
            ),
            FieldRule::new("salary.plain_label", r"Sal[aá]rio:\s*(\d[\d.,]*)", decimal_group),
        ],
    )
});

static GROSS_EARNINGS: LazyLock<RuleChain<Decimal>> = LazyLock::new(|| {
    RuleChain::new(
        "gross_earnings",
        vec![FieldRule::new(
            "gross.total_label",
            r"(?i)Total de Vencimentos:\s*(\d[\d.,]*)",
            decimal_group,
        )],
    )
});

static DEDUCTIONS: LazyLock<RuleChain<Decimal>> = LazyLock::new(|| {
    RuleChain::new(
        "deductions",
        vec![FieldRule::new(
            "deductions.total_label",
            r"(?i)Total de Descontos:\s*(\d[\d.,]*)",
            decimal_group,
        )],
    )
});

static NET_PAY: LazyLock<RuleChain<Decimal>> = LazyLock::new(|| {
    RuleChain::new(
        "net_pay",
        vec![
            FieldRule::new(
                "net.receivable_label",
                r"(?i)L[ií]quido a Receber:\s*(\d[\d.,]*)",
                decimal_group,
            ),
            FieldRule::new(
                "net.total_label",
                r"(?i)Total L[ií]quido:\s*(\d[\d.,]*)",
                decimal_group,
            ),
        ],
    )
});

static FGTS: LazyLock<RuleChain<Decimal>> = LazyLock::new(|| {
    RuleChain::new(
        "fgts",
        vec![
            FieldRule::new("fgts.value_label", r"(?i)Valor do FGTS:\s*(\d[\d.,]*)", decimal_group),
            FieldRule::new(
                "fgts.month_label",
                r"(?i)FGTS do M[eê]s:\s*(\d[\d.,]*)",
                decimal_group,
            ),
        ],
    )
});

static INSS: LazyLock<RuleChain<Decimal>> = LazyLock::new(|| {
    RuleChain::new(
        "inss",
        vec![
            FieldRule::new(
                "inss.line",
                r"(?im)^[^\n]*?(?:I\.N\.S\.S\.?|\bINSS\b)[^\n]*?(\d[\d.]*,\d{2})[ \t]*$",
                withholding_line,
            ),
            FieldRule::new(
                "inss.contribution_line",
                r"(?im)^[^\n]*?Contribui[cç][aã]o Previdenci[aá]ria[^\n]*?(\d[\d.]*,\d{2})[ \t]*$",
                withholding_line,
            ),
        ],
    )
});

static IRRF: LazyLock<RuleChain<Decimal>> = LazyLock::new(|| {
    RuleChain::new(
        "irrf",
        vec![
            FieldRule::new(
                "irrf.line",
                r"(?im)^[^\n]*?(?:I\.R\.R\.F\.?|\bIRRF\b)[^\n]*?(\d[\d.]*,\d{2})[ \t]*$",
                withholding_line,
            ),
            FieldRule::new(
                "irrf.income_tax_line",
                r"(?im)^[^\n]*?Imposto de Renda[^\n]*?(\d[\d.]*,\d{2})[ \t]*$",
                withholding_line,
            ),
        ],
    )
});

pub(crate) static OVERTIME_LINES: LazyLock<RuleChain<OvertimeLine>> = LazyLock::new(|| {
    RuleChain::new(
        "overtime_hours",
        vec![
            FieldRule::new(
                "overtime.with_premium",
                r"(?i)HORAS? EXTRAS?\s+(\d{1,3})\s*%\s+(\d{1,3}):(\d{2})",
                overtime_with_premium,
            ),
            FieldRule::new(
                "overtime.without_premium",
                r"(?i)HORAS? EXTRAS?:?\s+(\d{1,3}):(\d{2})",
                overtime_without_premium,
            ),
        ],
    )
});

pub(crate) static UNEXCUSED_ABSENCES: LazyLock<RuleChain<Decimal>> = LazyLock::new(|| {
    RuleChain::new(
        "absence_count",
        vec![
            FieldRule::new(
                "absences.unexcused",
                r"(?i)FALTAS INJUSTIFICADAS:?\s+(\d+)",
                count_group,
            ),
            FieldRule::new("absences.count_label", r"(?i)\bFaltas:\s*(\d+)", count_group),
        ],
    )
});

/// A withholding line item; totals and calculation bases are not deductions.
fn withholding_line(caps: &Captures<'_>) -> Option<Decimal> {
    let line = caps.get(0)?.as_str().to_lowercase();
    if line.contains("total") || line.contains("base") {
        return None;
    }
    caps.get(1).map(|m| parse_decimal(m.as_str()))
}

fn overtime_with_premium(caps: &Captures<'_>) -> Option<OvertimeLine> {
    Some(OvertimeLine {
        hours: parse_duration(caps.get(2)?.as_str(), caps.get(3)?.as_str()),
        premium_percent: Some(parse_decimal(caps.get(1)?.as_str())),
    })
}

fn overtime_without_premium(caps: &Captures<'_>) -> Option<OvertimeLine> {
    Some(OvertimeLine {
        hours: parse_duration(caps.get(1)?.as_str(), caps.get(2)?.as_str()),
        premium_percent: None,
    })
}

/// Sum of the hours of `lines`, rounded to 2 decimal places.
pub(crate) fn total_hours(lines: &[OvertimeLine]) -> Decimal {
    lines.iter().map(|l| l.hours).sum::<Decimal>().round_dp(2)
}

/// Extracts the record of one statement block.
///
/// Fields the block does not carry are zero. Gross earnings fall back to net
/// pay, then to the base salary, when the block prints no earnings total.
/// Overtime cost and unit value are left at zero for the calculator.
///
/// # Returns
///
/// `None` when the block has no recoverable name. A
/// [`PipelineEvent::BlockSkipped`] is emitted in that case.
///
/// # Example
///
/// ```
/// use payroll_import::config::Calendar;
/// use payroll_import::extraction::{RecordingSink, extract_block, segment};
/// use payroll_import::models::Period;
/// use rust_decimal::Decimal;
///
/// let text = "Funcionário: 101 - ANA SILVA Adm: 01/02/2020\nSalário Base: 2.200,00\n\
///             00009 HORA EXTRA 050% 10:00\nLíquido a Receber: 2.000,00\n";
/// let block = &segment(text).blocks[0];
/// let period = Period::new(3, 2026, &Calendar::default());
///
/// let record = extract_block(block, &period, &RecordingSink::new()).unwrap();
/// assert_eq!(record.name, "ANA SILVA");
/// assert_eq!(record.base_salary, Decimal::from(2200));
/// assert_eq!(record.overtime_hours, Decimal::from(10));
/// assert_eq!(record.gross_earnings, Decimal::from(2000));
/// ```
pub fn extract_block(
    block: &EmployeeBlock,
    period: &Period,
    sink: &dyn EventSink,
) -> Option<EmployeeRecord> {
    let subject = block.registration_id.as_str();
    let text = block.text.as_str();

    let Some(name) = NAME.first_reported(text, subject, sink) else {
        sink.emit(PipelineEvent::BlockSkipped {
            registration_id: block.registration_id.clone(),
            reason: "no employee name after marker".to_string(),
        });
        return None;
    };

    let mut record = EmployeeRecord::new(block.registration_id.clone(), name, period.clone());
    record.admission_date = ADMISSION_DATE.first_reported(text, subject, sink);
    record.role = ROLE.first_reported(text, subject, sink);
    record.base_salary = BASE_SALARY.value_reported(text, subject, sink);
    record.deductions = DEDUCTIONS.value_reported(text, subject, sink);
    record.net_pay = NET_PAY.value_reported(text, subject, sink);
    record.gross_earnings = GROSS_EARNINGS
        .first_reported(text, subject, sink)
        .unwrap_or_else(|| fallback_gross(record.net_pay, record.base_salary));
    record.fgts = FGTS.value_reported(text, subject, sink);
    record.inss = INSS.sum_reported(text, subject, sink);
    record.irrf = IRRF.sum_reported(text, subject, sink);
    record.overtime_lines = OVERTIME_LINES.all_reported(text, subject, sink);
    record.overtime_hours = total_hours(&record.overtime_lines);
    record.absence_count = UNEXCUSED_ABSENCES.value_reported(text, subject, sink);

    Some(record)
}

fn fallback_gross(net_pay: Decimal, base_salary: Decimal) -> Decimal {
    if net_pay > Decimal::ZERO {
        net_pay
    } else {
        base_salary
    }
}
