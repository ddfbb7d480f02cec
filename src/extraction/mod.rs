//! Field extraction for payroll documents.
//!
//! This module turns the text of a [`RawDocument`](crate::models::RawDocument)
//! into normalized records: locale-aware number parsing, period resolution,
//! employee block segmentation, ordered fallback rule chains per field, and
//! the pipeline that ties them together. Everything the pipeline decides is
//! reported through an [`EventSink`].

mod events;
mod normalize;
mod period;
mod pipeline;
mod rules;
mod segment;
mod statement;
mod timesheet;
mod totals;

pub use events::{EventSink, PipelineEvent, RecordingSink, TracingSink};
pub use normalize::{clean_text, parse_count, parse_decimal, parse_duration};
pub use period::{FALLBACK_RULE_ID, PeriodResolver, ResolvedPeriod};
pub use pipeline::{Extractor, classify, is_monthly};
pub use rules::{FieldRule, RuleChain, RuleMatch, RuleMatches};
pub use segment::{EmployeeBlock, Segmentation, has_employee_block, segment};
pub use statement::extract_block;
pub use timesheet::{extract_timesheet, resolve_timesheet_period};
pub use totals::DocumentTotals;
