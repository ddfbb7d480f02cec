//! Overtime cost calculation.
//!
//! This module turns a monthly salary and the overtime lines recovered from a
//! document into the cost of one overtime hour and the total overtime cost.
//!
//! ## Rate Structure
//!
//! - Hourly rate: `salary / monthly_hours` (220 by default)
//! - Fixed premium: every hour is paid at `hourly × multiplier` (1.5 by default)
//! - Declared premium: each line is paid at `hourly × (1 + pct / 100)` using the
//!   percentage printed on it; the unit value is the blended cost per hour

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{OvertimePolicy, PremiumSource};
use crate::extraction::{EventSink, PipelineEvent};
use crate::models::{EmployeeRecord, OvertimeLine};

const ONE_HUNDRED: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// The result of an overtime cost calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeCost {
    /// The cost of one overtime hour, rounded to 2 decimal places.
    pub unit_value: Decimal,
    /// The total overtime cost, rounded to 2 decimal places.
    pub cost: Decimal,
}

impl OvertimeCost {
    /// Zero unit value and zero cost.
    pub const ZERO: OvertimeCost = OvertimeCost {
        unit_value: Decimal::ZERO,
        cost: Decimal::ZERO,
    };
}

/// Computes overtime costs under an [`OvertimePolicy`].
///
/// # Example
///
/// ```
/// use payroll_import::calculation::OvertimeCalculator;
/// use payroll_import::config::OvertimePolicy;
/// use payroll_import::models::OvertimeLine;
/// use rust_decimal::Decimal;
///
/// let calculator = OvertimeCalculator::new(OvertimePolicy::default());
/// let lines = vec![OvertimeLine { hours: Decimal::from(10), premium_percent: None }];
///
/// let result = calculator.calculate(Decimal::from(2200), &lines);
/// assert_eq!(result.unit_value, Decimal::new(1500, 2));
/// assert_eq!(result.cost, Decimal::new(15000, 2));
/// ```
#[derive(Debug, Clone)]
pub struct OvertimeCalculator {
    policy: OvertimePolicy,
}

impl OvertimeCalculator {
    /// Creates a calculator for the given policy.
    pub fn new(policy: OvertimePolicy) -> Self {
        Self { policy }
    }

    /// Returns the policy in use.
    pub fn policy(&self) -> &OvertimePolicy {
        &self.policy
    }

    /// Returns the ordinary hourly rate for a monthly salary, unrounded.
    ///
    /// Zero when the salary or the configured monthly hours are not positive,
    /// or when the rate does not fit in a `Decimal`.
    pub fn hourly_rate(&self, salary: Decimal) -> Decimal {
        if salary > Decimal::ZERO && self.policy.monthly_hours > Decimal::ZERO {
            salary
                .checked_div(self.policy.monthly_hours)
                .unwrap_or(Decimal::ZERO)
        } else {
            Decimal::ZERO
        }
    }

    /// Calculates the overtime unit value and cost.
    ///
    /// # Arguments
    ///
    /// * `salary` - The monthly base salary
    /// * `lines` - The overtime lines worked in the period
    ///
    /// # Returns
    ///
    /// An [`OvertimeCost`]. A zero salary yields zero for both values; a
    /// positive salary with no overtime yields the unit value and zero cost.
    /// A result outside the `Decimal` range yields [`OvertimeCost::ZERO`].
    pub fn calculate(&self, salary: Decimal, lines: &[OvertimeLine]) -> OvertimeCost {
        self.checked_calculate(salary, lines)
            .unwrap_or(OvertimeCost::ZERO)
    }

    /// Like [`calculate`](Self::calculate), returning `None` when an
    /// intermediate value overflows.
    pub fn checked_calculate(&self, salary: Decimal, lines: &[OvertimeLine]) -> Option<OvertimeCost> {
        if salary <= Decimal::ZERO || self.policy.monthly_hours <= Decimal::ZERO {
            return Some(OvertimeCost::ZERO);
        }
        let hourly = salary.checked_div(self.policy.monthly_hours)?;
        if hourly.is_zero() {
            return Some(OvertimeCost::ZERO);
        }

        let fixed_unit = hourly.checked_mul(self.policy.multiplier)?;
        let hours = lines
            .iter()
            .try_fold(Decimal::ZERO, |acc, l| acc.checked_add(l.hours))?;

        let result = match self.policy.premium_source {
            PremiumSource::Fixed => OvertimeCost {
                unit_value: fixed_unit.round_dp(2),
                cost: hours.checked_mul(fixed_unit)?.round_dp(2),
            },
            PremiumSource::Declared => {
                let cost = lines.iter().try_fold(Decimal::ZERO, |acc, line| {
                    let line_cost = line
                        .hours
                        .checked_mul(hourly)?
                        .checked_mul(self.line_multiplier(line))?;
                    acc.checked_add(line_cost)
                })?;
                let unit_value = if hours > Decimal::ZERO {
                    cost.checked_div(hours)?
                } else {
                    fixed_unit
                };
                OvertimeCost {
                    unit_value: unit_value.round_dp(2),
                    cost: cost.round_dp(2),
                }
            }
        };
        Some(result)
    }

    /// Returns `record` with its overtime unit value and cost filled in.
    ///
    /// The cost is computed from the base salary and the unrounded line hours.
    /// When the cost overflows both values stay zero and a
    /// [`PipelineEvent::ValueOverflow`] is emitted.
    pub fn apply(&self, mut record: EmployeeRecord, sink: &dyn EventSink) -> EmployeeRecord {
        let result = match self.checked_calculate(record.base_salary, &record.overtime_lines) {
            Some(result) => result,
            None => {
                sink.emit(PipelineEvent::ValueOverflow {
                    subject: record.registration_id.clone(),
                    field: "overtime_cost".to_string(),
                });
                OvertimeCost::ZERO
            }
        };
        record.overtime_unit_value = result.unit_value;
        record.overtime_cost = result.cost;
        record
    }

    fn line_multiplier(&self, line: &OvertimeLine) -> Decimal {
        match line.premium_percent {
            Some(pct) if pct > Decimal::ZERO => Decimal::ONE + pct / ONE_HUNDRED,
            _ => self.policy.multiplier,
        }
    }
}
