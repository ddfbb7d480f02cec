//! Configuration types for payroll extraction policy.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Canonical pt-BR month names, January first.
pub const DEFAULT_MONTH_NAMES: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

/// Where the overtime premium for a line comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PremiumSource {
    /// Every overtime hour is paid at the configured multiplier.
    #[default]
    Fixed,
    /// Each overtime line is paid at the percentage printed on it
    /// (`HORA EXTRA 100%` pays 2.0x); lines without one use the multiplier.
    Declared,
}

/// Overtime costing policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OvertimePolicy {
    /// Standard hours in a month, used to turn a monthly salary into an hourly rate.
    pub monthly_hours: Decimal,
    /// Multiplier applied to the hourly rate for overtime hours.
    pub multiplier: Decimal,
    /// Whether the multiplier or the document-declared premium wins.
    #[serde(default)]
    pub premium_source: PremiumSource,
}

impl Default for OvertimePolicy {
    fn default() -> Self {
        Self {
            monthly_hours: Decimal::from(220),
            multiplier: Decimal::new(15, 1),
            premium_source: PremiumSource::Fixed,
        }
    }
}

/// KPI emission policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiPolicy {
    /// Category stamped on every KPI row.
    pub category: String,
}

impl Default for KpiPolicy {
    fn default() -> Self {
        Self {
            category: "Folha".to_string(),
        }
    }
}

/// Structure of `policy.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyFile {
    /// Overtime costing policy.
    pub overtime: OvertimePolicy,
    /// KPI emission policy.
    pub kpi: KpiPolicy,
}

/// The 12-entry month calendar used to name periods.
///
/// # Example
///
/// ```
/// use payroll_import::config::Calendar;
///
/// let calendar = Calendar::default();
/// assert_eq!(calendar.month_name(3), "Março");
/// assert_eq!(calendar.month_name(13), "Janeiro");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    /// Month names, January first. Always exactly 12 entries once validated.
    pub months: Vec<String>,
}

impl Calendar {
    /// Returns the name of a 1-based month number.
    ///
    /// Month numbers outside 1-12 resolve to the first month.
    pub fn month_name(&self, month: u32) -> &str {
        let index = match month {
            1..=12 => (month - 1) as usize,
            _ => 0,
        };
        self.months
            .get(index)
            .or_else(|| self.months.first())
            .map(String::as_str)
            .unwrap_or(DEFAULT_MONTH_NAMES[0])
    }

    /// Returns the 1-based number of a month name, if it is in the calendar.
    pub fn month_number(&self, name: &str) -> Option<u32> {
        self.months
            .iter()
            .position(|m| m == name)
            .map(|i| i as u32 + 1)
    }
}

impl Default for Calendar {
    fn default() -> Self {
        Self {
            months: DEFAULT_MONTH_NAMES.iter().map(|m| m.to_string()).collect(),
        }
    }
}

/// The complete extraction policy.
///
/// Injected into the period resolver and the derived-value calculator so that
/// policy changes never touch extraction logic.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolicyConfig {
    overtime: OvertimePolicy,
    kpi: KpiPolicy,
    calendar: Calendar,
}

impl PolicyConfig {
    /// Creates a new PolicyConfig from its component parts.
    pub fn new(overtime: OvertimePolicy, kpi: KpiPolicy, calendar: Calendar) -> Self {
        Self {
            overtime,
            kpi,
            calendar,
        }
    }

    /// Returns the overtime policy.
    pub fn overtime(&self) -> &OvertimePolicy {
        &self.overtime
    }

    /// Returns the KPI policy.
    pub fn kpi(&self) -> &KpiPolicy {
        &self.kpi
    }

    /// Returns the month calendar.
    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }
}
