//! Raw document model.
//!
//! A [`RawDocument`] is the output of the external PDF text/table extraction
//! step, deserialized from the JSON files it writes. It is consumed once by the
//! pipeline and never persisted.

use serde::{Deserialize, Serialize};

/// One page of extracted text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentPage {
    /// The 1-based page number.
    #[serde(rename = "numero", default)]
    pub number: u32,
    /// The page text. `None` or blank means the page had no content.
    #[serde(rename = "texto", default)]
    pub text: Option<String>,
}

/// A table grid recovered from one page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTable {
    /// The 1-based page the table was found on.
    #[serde(rename = "pagina", default)]
    pub page: u32,
    /// Rows of cells; empty cells are `None`.
    #[serde(rename = "dados", default)]
    pub cells: Vec<Vec<Option<String>>>,
}

/// The extractor's output for one source document.
///
/// # Example
///
/// ```
/// use payroll_import::models::RawDocument;
///
/// let json = r#"{
///     "arquivo": "Folha Mensal 03.26.pdf",
///     "paginas": [{"numero": 1, "texto": "Mês/Ano: 03/2026"}],
///     "tabelas": []
/// }"#;
/// let doc: RawDocument = serde_json::from_str(json).unwrap();
/// assert_eq!(doc.text(), "Mês/Ano: 03/2026");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDocument {
    /// The source file name reported by the extractor.
    #[serde(rename = "arquivo", default)]
    pub source: String,
    /// Page texts in document order.
    #[serde(rename = "paginas", default)]
    pub pages: Vec<DocumentPage>,
    /// Table grids in document order.
    #[serde(rename = "tabelas", default)]
    pub tables: Vec<RawTable>,
    /// The extractor's pre-joined text, when it wrote one.
    #[serde(rename = "texto_completo", default)]
    pub full_text: Option<String>,
}

impl RawDocument {
    /// Builds a single-page document from plain text.
    pub fn from_text(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            pages: vec![DocumentPage {
                number: 1,
                text: Some(text.into()),
            }],
            tables: vec![],
            full_text: None,
        }
    }

    /// Returns the document text the pipeline works on.
    ///
    /// Prefers the extractor's joined text, then the page texts joined by
    /// newlines, then the table rows rendered one line per row. Returns an
    /// empty string when the document has no content at all.
    pub fn text(&self) -> String {
        if let Some(full) = self.full_text.as_deref().filter(|t| !t.trim().is_empty()) {
            return full.to_string();
        }

        let pages: Vec<&str> = self
            .pages
            .iter()
            .filter_map(|p| p.text.as_deref())
            .filter(|t| !t.trim().is_empty())
            .collect();
        if !pages.is_empty() {
            return pages.join("\n");
        }

        self.tables
            .iter()
            .flat_map(|table| table.cells.iter())
            .map(|row| {
                row.iter()
                    .filter_map(|cell| cell.as_deref())
                    .map(str::trim)
                    .filter(|cell| !cell.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// The layout family a document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// A consolidated payroll statement with one block per employee.
    PayrollStatement,
    /// An individual timesheet report for one employee.
    Timesheet,
    /// Neither layout was recognised; the document yields no records.
    Unrecognized,
}

impl DocumentKind {
    /// Returns the kind as a short string for logs and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::PayrollStatement => "payroll_statement",
            DocumentKind::Timesheet => "timesheet",
            DocumentKind::Unrecognized => "unrecognized",
        }
    }
}
