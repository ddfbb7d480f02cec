//! Ordered fallback rule chains.
//!
//! Each field is recovered by a [`RuleChain`]: an ordered list of
//! `(id, pattern, extractor)` rules evaluated in priority order. Supporting a
//! new layout variant means appending a rule, not editing the extractor.

use regex::{Captures, Regex};
use rust_decimal::Decimal;

use super::events::{EventSink, PipelineEvent};

/// Turns a regex match into a typed value, or `None` if the match is unusable.
pub type ExtractFn<T> = fn(&Captures<'_>) -> Option<T>;

/// One candidate pattern for a field.
#[derive(Debug)]
pub struct FieldRule<T> {
    id: &'static str,
    pattern: Regex,
    extract: ExtractFn<T>,
}

impl<T> FieldRule<T> {
    /// Builds a rule from a pattern literal.
    ///
    /// # Panics
    ///
    /// Panics if `pattern` is not a valid regex. Rules are built from
    /// literals at start-up, so an invalid pattern is a programming error.
    pub fn new(id: &'static str, pattern: &str, extract: ExtractFn<T>) -> Self {
        Self {
            id,
            pattern: Regex::new(pattern)
                .unwrap_or_else(|e| panic!("invalid pattern for rule '{id}': {e}")),
            extract,
        }
    }

    /// Returns the rule id reported in events.
    pub fn id(&self) -> &'static str {
        self.id
    }
}

/// A value produced by a rule, tagged with the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch<T> {
    /// The rule that matched.
    pub rule_id: &'static str,
    /// The extracted value.
    pub value: T,
}

/// Every value produced by the first rule of a chain that matched at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatches<T> {
    /// The rule that matched.
    pub rule_id: &'static str,
    /// One value per occurrence, in text order.
    pub values: Vec<T>,
}

/// An ordered list of rules for one field.
#[derive(Debug)]
pub struct RuleChain<T> {
    field: &'static str,
    rules: Vec<FieldRule<T>>,
}

impl<T> RuleChain<T> {
    /// Creates a chain; rules are tried in the given order.
    pub fn new(field: &'static str, rules: Vec<FieldRule<T>>) -> Self {
        Self { field, rules }
    }

    /// Returns the field this chain recovers.
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Returns the first value of the first rule that produces one.
    pub fn first(&self, text: &str) -> Option<RuleMatch<T>> {
        self.rules.iter().find_map(|rule| {
            rule.pattern
                .captures_iter(text)
                .find_map(|caps| (rule.extract)(&caps))
                .map(|value| RuleMatch {
                    rule_id: rule.id,
                    value,
                })
        })
    }

    /// Returns every occurrence of the first rule that matches at least once.
    ///
    /// Later rules are not consulted once one has matched, so a qualified and
    /// an unqualified pattern never count the same line twice.
    pub fn all(&self, text: &str) -> Option<RuleMatches<T>> {
        self.rules.iter().find_map(|rule| {
            let values: Vec<T> = rule
                .pattern
                .captures_iter(text)
                .filter_map(|caps| (rule.extract)(&caps))
                .collect();
            if values.is_empty() {
                None
            } else {
                Some(RuleMatches {
                    rule_id: rule.id,
                    values,
                })
            }
        })
    }

    /// Like [`first`](Self::first), reporting the outcome to `sink`.
    pub fn first_reported(
        &self,
        text: &str,
        subject: &str,
        sink: &dyn EventSink,
    ) -> Option<T> {
        match self.first(text) {
            Some(found) => {
                self.report_match(subject, found.rule_id, 1, sink);
                Some(found.value)
            }
            None => {
                self.report_missing(subject, sink);
                None
            }
        }
    }

    /// Like [`all`](Self::all), reporting the outcome to `sink`.
    pub fn all_reported(&self, text: &str, subject: &str, sink: &dyn EventSink) -> Vec<T> {
        match self.all(text) {
            Some(found) => {
                self.report_match(subject, found.rule_id, found.values.len(), sink);
                found.values
            }
            None => {
                self.report_missing(subject, sink);
                vec![]
            }
        }
    }

    fn report_match(&self, subject: &str, rule_id: &str, occurrences: usize, sink: &dyn EventSink) {
        sink.emit(PipelineEvent::FieldMatched {
            subject: subject.to_string(),
            field: self.field.to_string(),
            rule_id: rule_id.to_string(),
            occurrences,
        });
    }

    fn report_missing(&self, subject: &str, sink: &dyn EventSink) {
        sink.emit(PipelineEvent::FieldMissing {
            subject: subject.to_string(),
            field: self.field.to_string(),
        });
    }
}

impl RuleChain<Decimal> {
    /// Sums every occurrence of the first matching rule; zero when none match.
    ///
    /// A sum past the decimal range is reported as
    /// [`PipelineEvent::ValueOverflow`] and yields zero.
    pub fn sum_reported(&self, text: &str, subject: &str, sink: &dyn EventSink) -> Decimal {
        let total = self
            .all_reported(text, subject, sink)
            .into_iter()
            .try_fold(Decimal::ZERO, |acc, value| acc.checked_add(value));
        match total {
            Some(total) => total,
            None => {
                sink.emit(PipelineEvent::ValueOverflow {
                    subject: subject.to_string(),
                    field: self.field.to_string(),
                });
                Decimal::ZERO
            }
        }
    }

    /// The first value, or zero when no rule matches.
    pub fn value_reported(&self, text: &str, subject: &str, sink: &dyn EventSink) -> Decimal {
        self.first_reported(text, subject, sink)
            .unwrap_or(Decimal::ZERO)
    }
}

/// Extracts capture group 1 as a pt-BR decimal.
pub fn decimal_group(caps: &Captures<'_>) -> Option<Decimal> {
    caps.get(1).map(|m| super::parse_decimal(m.as_str()))
}

/// Extracts capture groups 1 and 2 as `HH` and `MM`.
pub fn duration_groups(caps: &Captures<'_>) -> Option<Decimal> {
    match (caps.get(1), caps.get(2)) {
        (Some(h), Some(m)) => Some(super::parse_duration(h.as_str(), m.as_str())),
        _ => None,
    }
}

/// Extracts capture group 1 as an integer count.
pub fn count_group(caps: &Captures<'_>) -> Option<Decimal> {
    caps.get(1).map(|m| super::parse_count(m.as_str()))
}

/// Extracts capture group 1 as cleaned text; blank captures do not count.
pub fn text_group(caps: &Captures<'_>) -> Option<String> {
    caps.get(1)
        .map(|m| super::clean_text(m.as_str()))
        .filter(|s| !s.is_empty())
}
