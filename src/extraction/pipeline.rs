//! Document extraction pipeline.
//!
//! Classifies a [`RawDocument`], resolves its period, extracts one record per
//! employee, derives overtime costs and aggregates the document totals.

use tracing::debug;

use super::events::{EventSink, PipelineEvent};
use super::period::PeriodResolver;
use super::segment::{has_employee_block, segment};
use super::statement::extract_block;
use super::timesheet::{
    extract_timesheet, has_employee_label, has_timesheet_title, resolve_timesheet_period,
};
use super::totals::DocumentTotals;
use crate::calculation::{OvertimeCalculator, aggregate_totals};
use crate::config::PolicyConfig;
use crate::models::{DocumentExtraction, DocumentKind, Period, RawDocument};

/// Classifies document text into a layout family.
///
/// A timesheet title wins; otherwise any employee marker makes a payroll
/// statement, and a bare `Empregado:` label makes a timesheet.
///
/// # Example
///
/// ```
/// use payroll_import::extraction::classify;
/// use payroll_import::models::DocumentKind;
///
/// assert_eq!(classify("Funcionário: 1 - ANA"), DocumentKind::PayrollStatement);
/// assert_eq!(classify("CARTÃO DE PONTO\nFuncionário: 1 - ANA"), DocumentKind::Timesheet);
/// assert_eq!(classify("relatório qualquer"), DocumentKind::Unrecognized);
/// ```
pub fn classify(text: &str) -> DocumentKind {
    if has_timesheet_title(text) {
        DocumentKind::Timesheet
    } else if has_employee_block(text) {
        DocumentKind::PayrollStatement
    } else if has_employee_label(text) {
        DocumentKind::Timesheet
    } else {
        DocumentKind::Unrecognized
    }
}

/// Returns true if the document is a monthly statement.
pub fn is_monthly(name: &str, document: &RawDocument, text: &str) -> bool {
    [name, document.source.as_str(), text]
        .iter()
        .any(|s| s.to_lowercase().contains("mensal"))
}

/// Turns raw documents into [`DocumentExtraction`]s under one policy.
#[derive(Debug, Clone)]
pub struct Extractor {
    config: PolicyConfig,
    resolver: PeriodResolver,
    calculator: OvertimeCalculator,
}

impl Extractor {
    /// Creates an extractor whose period fallback is the current year.
    pub fn new(config: PolicyConfig) -> Self {
        let resolver = PeriodResolver::with_current_year(config.calendar().clone());
        Self::with_resolver(config, resolver)
    }

    /// Creates an extractor with an explicit period resolver.
    pub fn with_resolver(config: PolicyConfig, resolver: PeriodResolver) -> Self {
        let calculator = OvertimeCalculator::new(config.overtime().clone());
        Self {
            config,
            resolver,
            calculator,
        }
    }

    /// Returns the policy in use.
    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Extracts every record from one document.
    ///
    /// Never fails: an unrecognized or unreadable layout yields an empty
    /// extraction, and missing fields are zero.
    ///
    /// # Arguments
    ///
    /// * `name` - The document identifier (usually its file name)
    /// * `document` - The extractor output for the document
    /// * `sink` - Receives the pipeline events
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_import::config::{Calendar, PolicyConfig};
    /// use payroll_import::extraction::{Extractor, PeriodResolver, RecordingSink};
    /// use payroll_import::models::RawDocument;
    ///
    /// let extractor = Extractor::with_resolver(
    ///     PolicyConfig::default(),
    ///     PeriodResolver::new(Calendar::default(), 2025),
    /// );
    /// let document = RawDocument::from_text(
    ///     "folha.pdf",
    ///     "Mês/Ano: 03/2026\nFuncionário: 101 - ANA\nSalário Base: 2.200,00\n",
    /// );
    ///
    /// let extraction = extractor.extract("folha.json", &document, &RecordingSink::new());
    /// assert_eq!(extraction.employees.len(), 1);
    /// assert_eq!(extraction.period.month_name, "Março");
    /// ```
    pub fn extract(
        &self,
        name: &str,
        document: &RawDocument,
        sink: &dyn EventSink,
    ) -> DocumentExtraction {
        let text = document.text();
        let kind = classify(&text);
        sink.emit(PipelineEvent::DocumentClassified {
            document: name.to_string(),
            kind,
        });

        let (period, rule_id) = match kind {
            DocumentKind::Timesheet => resolve_timesheet_period(&text, &self.resolver),
            _ => self.resolve_period(name, document, &text),
        };
        sink.emit(PipelineEvent::PeriodResolved {
            document: name.to_string(),
            rule_id: rule_id.to_string(),
            period: period.to_string(),
        });

        let (employees, kpis) = match kind {
            DocumentKind::PayrollStatement => {
                let employees: Vec<_> = segment(&text)
                    .blocks
                    .iter()
                    .filter_map(|block| extract_block(block, &period, sink))
                    .map(|record| self.calculator.apply(record, sink))
                    .collect();
                let totals = DocumentTotals::extract(&text, sink);
                let kpis = aggregate_totals(
                    &totals,
                    &employees,
                    is_monthly(name, document, &text),
                    &period,
                    &self.config.kpi().category,
                    sink,
                );
                (employees, kpis)
            }
            DocumentKind::Timesheet => {
                let employees = extract_timesheet(&text, &period, sink)
                    .map(|record| self.calculator.apply(record, sink))
                    .into_iter()
                    .collect();
                (employees, vec![])
            }
            DocumentKind::Unrecognized => (vec![], vec![]),
        };

        debug!(
            document = %name,
            employees = employees.len(),
            kpis = kpis.len(),
            "Document extracted"
        );

        DocumentExtraction {
            source: name.to_string(),
            kind,
            period,
            employees,
            kpis,
        }
    }

    /// Resolves from the text first, then from the file names when the text
    /// carries no period.
    fn resolve_period(
        &self,
        name: &str,
        document: &RawDocument,
        text: &str,
    ) -> (Period, &'static str) {
        let resolved = [text, document.source.as_str(), name]
            .iter()
            .map(|candidate| self.resolver.resolve(candidate))
            .find(|resolved| !resolved.is_fallback())
            .unwrap_or_else(|| self.resolver.resolve(""));
        (resolved.period, resolved.rule_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Calendar;
    use crate::extraction::events::RecordingSink;
    use crate::models::KpiLabel;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn extractor() -> Extractor {
        Extractor::with_resolver(
            PolicyConfig::default(),
            PeriodResolver::new(Calendar::default(), 2025),
        )
    }

    const STATEMENT: &str = "FOLHA DE PAGAMENTO\nMês/Ano: 03/2026\n\
        Funcionário: 101 - ANA SILVA Adm: 01/02/2020\n\
        Função: AUXILIAR\n\
        Salário Base: 2.200,00\n\
        00009 HORA EXTRA 050% 10:00\n\
        Líquido a Receber: 2.100,00\n\
        Funcionário: 202 - BRUNO COSTA Adm: 15/06/2021\n\
        Salário Base: 3.000,00\n\
        Líquido a Receber: 2.300,00\n\
        Total de Vencimentos 5.200,00 Total de Descontos 800,00 Total Líquido 4.400,00\n";

    #[test]
    fn test_statement_end_to_end() {
        let document = RawDocument::from_text("folha.pdf", STATEMENT);
        let extraction = extractor().extract("folha.json", &document, &RecordingSink::new());

        assert_eq!(extraction.kind, DocumentKind::PayrollStatement);
        assert_eq!(extraction.period.month_name, "Março");
        assert_eq!(extraction.period.year, 2026);
        assert_eq!(extraction.employees.len(), 2);

        let ana = &extraction.employees[0];
        assert_eq!(ana.name, "ANA SILVA");
        assert_eq!(ana.overtime_hours, dec("10"));
        assert_eq!(ana.overtime_unit_value, dec("15.00"));
        assert_eq!(ana.overtime_cost, dec("150.00"));

        let bruno = &extraction.employees[1];
        assert_eq!(bruno.name, "BRUNO COSTA");
        assert_eq!(bruno.overtime_hours, Decimal::ZERO);
        assert_eq!(bruno.overtime_cost, Decimal::ZERO);

        let kpis: Vec<(KpiLabel, Decimal)> =
            extraction.kpis.iter().map(|k| (k.label, k.value)).collect();
        assert_eq!(
            kpis,
            vec![
                (KpiLabel::Payroll, dec("5200")),
                (KpiLabel::DeductionsTotal, dec("800")),
                (KpiLabel::NetPayTotal, dec("4400")),
            ]
        );
    }

    #[test]
    fn test_period_from_file_name_when_text_has_none() {
        let document = RawDocument::from_text(
            "Folha Mensal 02.26.pdf",
            "Funcionário: 1 - ANA\nSalário Base: 1.000,00\n",
        );
        let extraction = extractor().extract("Folha Mensal 02.26.json", &document, &RecordingSink::new());
        assert_eq!(extraction.period.month_name, "Fevereiro");
        assert_eq!(extraction.period.year, 2026);
    }

    #[test]
    fn test_monthly_statement_without_trailer_sums_blocks() {
        let document = RawDocument::from_text(
            "Folha Mensal 02.26.pdf",
            "Funcionário: 1 - ANA\nSalário Base: 1.000,00\nLíquido a Receber: 900,00\n\
             Funcionário: 2 - BIA\nSalário Base: 2.000,00\nLíquido a Receber: 1.800,00\n",
        );
        let extraction = extractor().extract("a.json", &document, &RecordingSink::new());
        let kpis: Vec<(KpiLabel, Decimal)> =
            extraction.kpis.iter().map(|k| (k.label, k.value)).collect();
        assert_eq!(
            kpis,
            vec![
                (KpiLabel::Payroll, dec("2700")),
                (KpiLabel::BaseSalaryTotal, dec("3000")),
                (KpiLabel::NetPayTotal, dec("2700")),
            ]
        );
    }

    #[test]
    fn test_timesheet_document() {
        let document = RawDocument::from_text(
            "ponto.pdf",
            "FOLHA DE PONTO\nEmpregado: 77 - RITA\nPeríodo: 01/05/2026 a 31/05/2026\nHORA EXTRA 50% 02:00\nSalário: 2.200,00\n",
        );
        let extraction = extractor().extract("ponto.json", &document, &RecordingSink::new());
        assert_eq!(extraction.kind, DocumentKind::Timesheet);
        assert_eq!(extraction.period.month_name, "Maio");
        assert_eq!(extraction.employees.len(), 1);
        assert_eq!(extraction.employees[0].overtime_cost, dec("30.00"));
        assert!(extraction.kpis.is_empty());
    }

    #[test]
    fn test_unrecognized_document_is_empty() {
        let document = RawDocument::from_text("x.pdf", "lorem ipsum");
        let sink = RecordingSink::new();
        let extraction = extractor().extract("x.json", &document, &sink);
        assert!(extraction.is_empty());
        assert_eq!(extraction.period.year, 2025);
        assert!(matches!(
            sink.events()[0],
            PipelineEvent::DocumentClassified {
                kind: DocumentKind::Unrecognized,
                ..
            }
        ));
    }

    #[test]
    fn test_empty_document_has_no_content() {
        let extraction =
            extractor().extract("vazio.json", &RawDocument::default(), &RecordingSink::new());
        assert!(extraction.is_empty());
        assert_eq!(extraction.kind, DocumentKind::Unrecognized);
    }

    #[test]
    fn test_out_of_range_salary_keeps_record_with_zero_cost() {
        let document = RawDocument::from_text(
            "folha.pdf",
            "Mês/Ano: 03/2026\n\
             Funcionário: 1 - ANA\nSalário Base: 79.228.162.514.264.337.593.543.950.335\n\
             HORA EXTRA 50% 999:00\n\
             Funcionário: 2 - BIA\nSalário Base: 2.200,00\nHORA EXTRA 50% 10:00\n",
        );
        let sink = RecordingSink::new();
        let extraction = extractor().extract("folha.json", &document, &sink);

        assert_eq!(extraction.employees.len(), 2);
        assert_eq!(extraction.employees[0].base_salary, Decimal::MAX);
        assert_eq!(extraction.employees[0].overtime_cost, Decimal::ZERO);
        assert_eq!(extraction.employees[1].overtime_cost, dec("150.00"));
        assert!(sink.events().contains(&PipelineEvent::ValueOverflow {
            subject: "1".to_string(),
            field: "overtime_cost".to_string(),
        }));
    }

    #[test]
    fn test_non_ascii_registration_is_not_a_statement() {
        assert_eq!(classify("Funcionário: ١٢ - X"), DocumentKind::Unrecognized);
        assert_eq!(
            classify("Funcionário: ١٢ - X\nEmpregado: 5 - ANA"),
            DocumentKind::Timesheet
        );
    }
}
