//! Configuration loading and management for the payroll import engine.
//!
//! This module loads the extraction policy from YAML files: the overtime
//! costing policy, the KPI category and the month calendar used to name
//! periods.
//!
//! # Example
//!
//! ```no_run
//! use payroll_import::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/folha").unwrap();
//! println!("Overtime multiplier: {}", loader.config().overtime().multiplier);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    Calendar, DEFAULT_MONTH_NAMES, KpiPolicy, OvertimePolicy, PolicyConfig, PolicyFile,
    PremiumSource,
};
