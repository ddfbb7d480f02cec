//! Pay period resolution.
//!
//! The period comes from an ordered chain: the explicit `Mês/Ano: MM/YYYY`
//! label, then a bare `MM.YY` token (as in `Folha Mensal 03.26`), then a
//! fallback that never fails.

use std::sync::LazyLock;

use chrono::{Datelike, Utc};
use regex::Captures;

use super::rules::{FieldRule, RuleChain};
use crate::config::Calendar;
use crate::models::Period;

/// Rule id reported when no pattern matched.
pub const FALLBACK_RULE_ID: &str = "period.fallback";

static PERIOD_RULES: LazyLock<RuleChain<(u32, i32)>> = LazyLock::new(|| {
    RuleChain::new(
        "period",
        vec![
            FieldRule::new(
                "period.label",
                r"(?i)M[êe]s\s*/\s*Ano:\s*(\d{2})/(\d{4})",
                month_year,
            ),
            // Two digits, a dot, two digits, not embedded in a longer number
            // such as 12.345,00.
            FieldRule::new(
                "period.dotted_token",
                r"(?:^|[^\d.,])(\d{2})\.(\d{2})(?:[^\d,]|$)",
                month_year,
            ),
        ],
    )
});

pub(super) fn month_year(caps: &Captures<'_>) -> Option<(u32, i32)> {
    let month = caps.get(1)?.as_str().parse::<u32>().ok()?;
    let year = caps.get(2)?.as_str().parse::<i32>().ok()?;
    Some((month, year))
}

/// A resolved period and the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPeriod {
    /// The period.
    pub period: Period,
    /// The id of the rule that fired.
    pub rule_id: &'static str,
}

impl ResolvedPeriod {
    /// Returns true if no pattern matched and the fallback was used.
    pub fn is_fallback(&self) -> bool {
        self.rule_id == FALLBACK_RULE_ID
    }
}

/// Resolves the pay period of a document from its text.
///
/// # Example
///
/// ```
/// use payroll_import::config::Calendar;
/// use payroll_import::extraction::PeriodResolver;
///
/// let resolver = PeriodResolver::new(Calendar::default(), 2025);
/// let resolved = resolver.resolve("Empresa X  Mês/Ano: 03/2026");
/// assert_eq!(resolved.period.month_name, "Março");
/// assert_eq!(resolved.period.year, 2026);
/// assert_eq!(resolved.rule_id, "period.label");
/// ```
#[derive(Debug, Clone)]
pub struct PeriodResolver {
    calendar: Calendar,
    fallback_year: i32,
}

impl PeriodResolver {
    /// Creates a resolver with an explicit fallback year.
    pub fn new(calendar: Calendar, fallback_year: i32) -> Self {
        Self {
            calendar,
            fallback_year,
        }
    }

    /// Creates a resolver that falls back to the current calendar year.
    pub fn with_current_year(calendar: Calendar) -> Self {
        Self::new(calendar, Utc::now().year())
    }

    /// Returns the year used when no pattern matches.
    pub fn fallback_year(&self) -> i32 {
        self.fallback_year
    }

    /// Resolves the period of `text`. Never fails.
    pub fn resolve(&self, text: &str) -> ResolvedPeriod {
        match PERIOD_RULES.first(text) {
            Some(found) => {
                let (month, year) = found.value;
                ResolvedPeriod {
                    period: Period::new(month, year, &self.calendar),
                    rule_id: found.rule_id,
                }
            }
            None => ResolvedPeriod {
                period: Period::new(1, self.fallback_year, &self.calendar),
                rule_id: FALLBACK_RULE_ID,
            },
        }
    }

    /// Builds a period from an explicit month and year using this resolver's
    /// calendar.
    pub fn period(&self, month: u32, year: i32) -> Period {
        Period::new(month, year, &self.calendar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> PeriodResolver {
        PeriodResolver::new(Calendar::default(), 2025)
    }

    #[test]
    fn test_label_rule() {
        let resolved = resolver().resolve("Folha de Pagamento\nMês/Ano: 03/2026\n");
        assert_eq!(resolved.period.month, 3);
        assert_eq!(resolved.period.month_name, "Março");
        assert_eq!(resolved.period.year, 2026);
        assert_eq!(resolved.rule_id, "period.label");
    }

    #[test]
    fn test_label_rule_case_and_accent_tolerant() {
        let resolved = resolver().resolve("MES/ANO: 11/2025");
        assert_eq!(resolved.period.month_name, "Novembro");
        assert_eq!(resolved.period.year, 2025);
        assert_eq!(resolved.rule_id, "period.label");
    }

    #[test]
    fn test_label_wins_over_dotted_token() {
        let resolved = resolver().resolve("Folha 02.26\nMês/Ano: 03/2026");
        assert_eq!(resolved.period.month, 3);
        assert_eq!(resolved.rule_id, "period.label");
    }

    #[test]
    fn test_dotted_token_rule() {
        let resolved = resolver().resolve("Folha Mensal 02.26");
        assert_eq!(resolved.period.month_name, "Fevereiro");
        assert_eq!(resolved.period.year, 2026);
        assert_eq!(resolved.rule_id, "period.dotted_token");
    }

    #[test]
    fn test_dotted_token_ignores_amounts() {
        let resolved = resolver().resolve("Salário Base: 12.345,00\nLíquido: 1.234,56");
        assert!(resolved.is_fallback());
    }

    #[test]
    fn test_dotted_token_followed_by_extension() {
        let resolved = resolver().resolve("Folha Mensal 07.25.pdf");
        assert_eq!(resolved.period.month_name, "Julho");
        assert_eq!(resolved.period.year, 2025);
    }

    #[test]
    fn test_fallback_is_january_of_fallback_year() {
        let resolved = resolver().resolve("nothing to see");
        assert_eq!(resolved.period.month_name, "Janeiro");
        assert_eq!(resolved.period.year, 2025);
        assert_eq!(resolved.rule_id, FALLBACK_RULE_ID);
    }

    #[test]
    fn test_out_of_range_month_resolves_to_january() {
        let resolved = resolver().resolve("Mês/Ano: 13/2026");
        assert_eq!(resolved.period.month_name, "Janeiro");
        assert_eq!(resolved.period.year, 2026);
    }

    #[test]
    fn test_current_year_fallback() {
        let resolved = PeriodResolver::with_current_year(Calendar::default()).resolve("");
        assert_eq!(resolved.period.year, Utc::now().year());
    }
}
