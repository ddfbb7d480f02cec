//! Derived-value calculation for the payroll import engine.
//!
//! This module contains the overtime cost calculator, driven by the injected
//! overtime policy, and the aggregation of document totals into KPI records.

mod overtime;
mod totals;

pub use overtime::{OvertimeCalculator, OvertimeCost};
pub use totals::aggregate_totals;
