//! Pay period model.
//!
//! A [`Period`] identifies the pay cycle (month and year) a record belongs to.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::Calendar;

/// A (month, year) pair identifying a pay cycle.
///
/// The month name always comes from the configured calendar, so two periods
/// built from the same calendar compare equal when month and year match.
///
/// # Example
///
/// ```
/// use payroll_import::config::Calendar;
/// use payroll_import::models::Period;
///
/// let period = Period::new(3, 2026, &Calendar::default());
/// assert_eq!(period.month_name, "Março");
/// assert_eq!(period.to_string(), "Março/2026");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    /// The 1-based month number (1-12).
    pub month: u32,
    /// The calendar name of the month (e.g., "Março").
    pub month_name: String,
    /// The four-digit year.
    pub year: i32,
}

impl Period {
    /// Builds a period, clamping out-of-range months to January and promoting
    /// two-digit years to the 2000s.
    pub fn new(month: u32, year: i32, calendar: &Calendar) -> Self {
        let month = if (1..=12).contains(&month) { month } else { 1 };
        let year = if (0..100).contains(&year) {
            2000 + year
        } else {
            year
        };
        Self {
            month,
            month_name: calendar.month_name(month).to_string(),
            year,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.month_name, self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_calendar_name() {
        let period = Period::new(2, 2026, &Calendar::default());
        assert_eq!(period.month, 2);
        assert_eq!(period.month_name, "Fevereiro");
        assert_eq!(period.year, 2026);
    }

    #[test]
    fn test_out_of_range_month_falls_back_to_january() {
        let period = Period::new(13, 2026, &Calendar::default());
        assert_eq!(period.month, 1);
        assert_eq!(period.month_name, "Janeiro");

        let period = Period::new(0, 2026, &Calendar::default());
        assert_eq!(period.month_name, "Janeiro");
    }

    #[test]
    fn test_two_digit_year_is_promoted() {
        let period = Period::new(5, 26, &Calendar::default());
        assert_eq!(period.year, 2026);
    }

    #[test]
    fn test_custom_calendar_names() {
        let calendar = Calendar {
            months: [
                "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov",
                "Dec",
            ]
            .iter()
            .map(|m| m.to_string())
            .collect(),
        };
        let period = Period::new(10, 2025, &calendar);
        assert_eq!(period.to_string(), "Oct/2025");
    }

    #[test]
    fn test_serialize_period() {
        let period = Period::new(3, 2026, &Calendar::default());
        let json = serde_json::to_string(&period).unwrap();
        assert!(json.contains("\"month\":3"));
        assert!(json.contains("\"month_name\":\"Março\""));
        assert!(json.contains("\"year\":2026"));
    }
}
