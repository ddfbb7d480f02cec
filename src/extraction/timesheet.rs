//! Timesheet extraction.
//!
//! A timesheet (`Folha de Ponto`, `Cartão de Ponto`, `Espelho de Ponto`)
//! describes a single employee, so the whole document text is read as one
//! block and yields at most one record.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use rust_decimal::Decimal;

use super::events::{EventSink, PipelineEvent};
use super::period::{PeriodResolver, month_year};
use super::rules::{FieldRule, RuleChain, duration_groups, text_group};
use super::statement::{BASE_SALARY, OVERTIME_LINES, UNEXCUSED_ABSENCES, total_hours};
use crate::models::{EmployeeRecord, Period};

static TIMESHEET_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:FOLHA|CART[AÃ]O|ESPELHO)\s+DE\s+PONTO")
        .unwrap_or_else(|e| panic!("invalid timesheet title pattern: {e}"))
});

static EMPLOYEE_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bEmpregado:")
        .unwrap_or_else(|e| panic!("invalid employee label pattern: {e}"))
});

static REGISTRATION: LazyLock<RuleChain<String>> = LazyLock::new(|| {
    RuleChain::new(
        "registration_id",
        vec![
            FieldRule::new(
                "registration.employee_line",
                r"(?i)(?:Empregado|Funcion[aá]rio|Colaborador):\s*(\d+)\s*-",
                ascii_digits,
            ),
            FieldRule::new(
                "registration.label",
                r"(?i)Matr[ií]cula:\s*(\d+)",
                ascii_digits,
            ),
        ],
    )
});

static NAME: LazyLock<RuleChain<String>> = LazyLock::new(|| {
    RuleChain::new(
        "name",
        vec![
            FieldRule::new(
                "name.employee_line",
                r"(?im)(?:Empregado|Funcion[aá]rio|Colaborador):\s*\d+\s*-\s*([^\n]+?)(?:\s+(?:Adm|CPF|PIS|Cargo|Fun[cç][aã]o)\b[^\n]*)?[ \t]*$",
                text_group,
            ),
            FieldRule::new(
                "name.label",
                r"(?im)\bNome:[ \t]*([^\n]+?)(?:\s+(?:Adm|CPF|PIS|Cargo|Fun[cç][aã]o|Matr[ií]cula)\b[^\n]*)?[ \t]*$",
                text_group,
            ),
            FieldRule::new(
                "name.employee_label",
                r"(?im)(?:Empregado|Colaborador):[ \t]*([^\d\s][^\n]*?)[ \t]*$",
                text_group,
            ),
        ],
    )
});

static DECLARED_PERIOD: LazyLock<RuleChain<(u32, i32)>> = LazyLock::new(|| {
    RuleChain::new(
        "period",
        vec![FieldRule::new(
            "period.declared_range",
            r"(?i)Per[ií]odo:?\s*\d{2}/(\d{2})/(\d{4})",
            month_year,
        )],
    )
});

static EXCUSED_HOURS: LazyLock<RuleChain<Decimal>> = LazyLock::new(|| {
    RuleChain::new(
        "excused_absence_hours",
        vec![FieldRule::new(
            "excused.hours",
            r"(?i)(?:Abonos?|Faltas Justificadas):?\s+(\d{1,3}):(\d{2})",
            duration_groups,
        )],
    )
});

fn ascii_digits(caps: &Captures<'_>) -> Option<String> {
    caps.get(1)
        .map(|m| m.as_str())
        .filter(|id| id.bytes().all(|b| b.is_ascii_digit()))
        .map(str::to_string)
}

/// Returns true if `text` carries a timesheet title.
pub fn has_timesheet_title(text: &str) -> bool {
    TIMESHEET_TITLE.is_match(text)
}

/// Returns true if `text` carries an `Empregado:` identity label.
pub fn has_employee_label(text: &str) -> bool {
    EMPLOYEE_LABEL.is_match(text)
}

/// Resolves a timesheet's period from its declared range, falling back to the
/// generic resolver.
///
/// Returns the period and the id of the rule that produced it.
pub fn resolve_timesheet_period(
    text: &str,
    resolver: &PeriodResolver,
) -> (Period, &'static str) {
    match DECLARED_PERIOD.first(text) {
        Some(found) => {
            let (month, year) = found.value;
            (resolver.period(month, year), found.rule_id)
        }
        None => {
            let resolved = resolver.resolve(text);
            (resolved.period, resolved.rule_id)
        }
    }
}

/// Extracts the single record of a timesheet.
///
/// The registration id is empty when the document prints none. Overtime and
/// excused absence durations are summed over every matching line.
///
/// # Returns
///
/// `None` when no employee name can be recovered. A
/// [`PipelineEvent::BlockSkipped`] is emitted in that case.
///
/// # Example
///
/// ```
/// use payroll_import::config::Calendar;
/// use payroll_import::extraction::{RecordingSink, extract_timesheet};
/// use payroll_import::models::Period;
/// use rust_decimal::Decimal;
///
/// let text = "ESPELHO DE PONTO\nEmpregado: 42 - JOAO PEREIRA\n\
///             HORA EXTRA 50% 01:30\nHORA EXTRA 50% 02:00\nAbono 08:00\n";
/// let period = Period::new(3, 2026, &Calendar::default());
///
/// let record = extract_timesheet(text, &period, &RecordingSink::new()).unwrap();
/// assert_eq!(record.registration_id, "42");
/// assert_eq!(record.name, "JOAO PEREIRA");
/// assert_eq!(record.overtime_hours, Decimal::new(35, 1));
/// assert_eq!(record.excused_absence_hours, Decimal::from(8));
/// ```
pub fn extract_timesheet(
    text: &str,
    period: &Period,
    sink: &dyn EventSink,
) -> Option<EmployeeRecord> {
    let registration_id = REGISTRATION.first_reported(text, "", sink).unwrap_or_default();
    let subject = registration_id.as_str();

    let Some(name) = NAME.first_reported(text, subject, sink) else {
        sink.emit(PipelineEvent::BlockSkipped {
            registration_id: registration_id.clone(),
            reason: "no employee name in timesheet".to_string(),
        });
        return None;
    };

    let mut record = EmployeeRecord::new(registration_id.clone(), name, period.clone());
    record.base_salary = BASE_SALARY.value_reported(text, subject, sink);
    record.overtime_lines = OVERTIME_LINES.all_reported(text, subject, sink);
    record.overtime_hours = total_hours(&record.overtime_lines);
    record.excused_absence_hours = EXCUSED_HOURS.sum_reported(text, subject, sink).round_dp(2);
    record.absence_count = UNEXCUSED_ABSENCES.value_reported(text, subject, sink);

    Some(record)
}
