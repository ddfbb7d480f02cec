//! Document-level totals.
//!
//! Statements close with a trailer of totals printed without a colon after
//! the label, either on one combined line
//! (`Total de Vencimentos X Total de Descontos Y Total Líquido Z`) or on
//! separate lines, plus charge totals such as `VALOR DO FGTS`.

use std::sync::LazyLock;

use regex::Captures;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::events::EventSink;
use super::parse_decimal;
use super::rules::{FieldRule, RuleChain, decimal_group};

/// Gross, deductions and net printed on one trailer line.
type CombinedTotals = (Decimal, Decimal, Decimal);

static COMBINED: LazyLock<RuleChain<CombinedTotals>> = LazyLock::new(|| {
    RuleChain::new(
        "combined_totals",
        vec![FieldRule::new(
            "totals.combined_line",
            r"(?i)Total de Vencimentos\s+(\d[\d.,]*)\s+Total de Descontos\s+(\d[\d.,]*)\s+Total L[ií]quido\s+(\d[\d.,]*)",
            combined,
        )],
    )
});

static GROSS: LazyLock<RuleChain<Decimal>> = LazyLock::new(|| {
    RuleChain::new(
        "total_gross",
        vec![FieldRule::new(
            "totals.gross_line",
            r"(?i)Total de Vencimentos\s+(\d[\d.,]*)",
            decimal_group,
        )],
    )
});

static DEDUCTIONS: LazyLock<RuleChain<Decimal>> = LazyLock::new(|| {
    RuleChain::new(
        "total_deductions",
        vec![FieldRule::new(
            "totals.deductions_line",
            r"(?i)Total de Descontos\s+(\d[\d.,]*)",
            decimal_group,
        )],
    )
});

static NET: LazyLock<RuleChain<Decimal>> = LazyLock::new(|| {
    RuleChain::new(
        "total_net",
        vec![FieldRule::new(
            "totals.net_line",
            r"(?i)Total L[ií]quido\s+(\d[\d.,]*)",
            decimal_group,
        )],
    )
});

static FGTS: LazyLock<RuleChain<Decimal>> = LazyLock::new(|| {
    RuleChain::new(
        "total_fgts",
        vec![
            FieldRule::new("totals.fgts_value", r"(?i)Valor do FGTS\s+(\d[\d.,]*)", decimal_group),
            FieldRule::new(
                "totals.fgts_line",
                r"(?i)Total (?:do |de )?FGTS\s+(\d[\d.,]*)",
                decimal_group,
            ),
        ],
    )
});

static INSS: LazyLock<RuleChain<Decimal>> = LazyLock::new(|| {
    RuleChain::new(
        "total_inss",
        vec![FieldRule::new(
            "totals.inss_line",
            r"(?i)Total (?:do |de )?(?:I\.N\.S\.S\.?|INSS)\s+(\d[\d.,]*)",
            decimal_group,
        )],
    )
});

static IRRF: LazyLock<RuleChain<Decimal>> = LazyLock::new(|| {
    RuleChain::new(
        "total_irrf",
        vec![FieldRule::new(
            "totals.irrf_line",
            r"(?i)Total (?:do |de )?(?:I\.R\.R\.F\.?|IRRF)\s+(\d[\d.,]*)",
            decimal_group,
        )],
    )
});

fn combined(caps: &Captures<'_>) -> Option<CombinedTotals> {
    Some((
        parse_decimal(caps.get(1)?.as_str()),
        parse_decimal(caps.get(2)?.as_str()),
        parse_decimal(caps.get(3)?.as_str()),
    ))
}

/// Totals printed in a document's trailer. `None` means not printed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTotals {
    /// Total gross earnings.
    pub gross: Option<Decimal>,
    /// Total deductions.
    pub deductions: Option<Decimal>,
    /// Total net pay.
    pub net: Option<Decimal>,
    /// Total FGTS.
    pub fgts: Option<Decimal>,
    /// Total INSS.
    pub inss: Option<Decimal>,
    /// Total IRRF.
    pub irrf: Option<Decimal>,
}

impl DocumentTotals {
    /// Reads the trailer totals of `text`.
    ///
    /// The combined line wins over separate lines for gross, deductions and
    /// net pay.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_import::extraction::{DocumentTotals, RecordingSink};
    /// use rust_decimal::Decimal;
    ///
    /// let text = "Total de Vencimentos 5.200,00 Total de Descontos 800,00 Total Líquido 4.400,00";
    /// let totals = DocumentTotals::extract(text, &RecordingSink::new());
    /// assert_eq!(totals.gross, Some(Decimal::from(5200)));
    /// assert_eq!(totals.net, Some(Decimal::from(4400)));
    /// assert_eq!(totals.fgts, None);
    /// ```
    pub fn extract(text: &str, sink: &dyn EventSink) -> Self {
        let mut totals = match COMBINED.first_reported(text, "", sink) {
            Some((gross, deductions, net)) => Self {
                gross: Some(gross),
                deductions: Some(deductions),
                net: Some(net),
                ..Self::default()
            },
            None => Self {
                gross: GROSS.first_reported(text, "", sink),
                deductions: DEDUCTIONS.first_reported(text, "", sink),
                net: NET.first_reported(text, "", sink),
                ..Self::default()
            },
        };
        totals.fgts = FGTS.first_reported(text, "", sink);
        totals.inss = INSS.first_reported(text, "", sink);
        totals.irrf = IRRF.first_reported(text, "", sink);
        totals
    }

    /// Returns true if the trailer printed no total at all.
    pub fn is_empty(&self) -> bool {
        self.gross.is_none()
            && self.deductions.is_none()
            && self.net.is_none()
            && self.fgts.is_none()
            && self.inss.is_none()
            && self.irrf.is_none()
    }
}
