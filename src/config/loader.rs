//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading extraction
//! policy from YAML files.

use rust_decimal::Decimal;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{Calendar, PolicyConfig, PolicyFile};

/// Loads and validates extraction policy.
///
/// # Directory Structure
///
/// ```text
/// config/folha/
/// ├── policy.yaml    # Overtime policy and KPI category
/// └── calendar.yaml  # The 12 month names used to label periods
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_import::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/folha").unwrap();
/// println!("Monthly hours: {}", loader.config().overtime().monthly_hours);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: PolicyConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if either file is missing, is not valid YAML, or holds
    /// a value the engine cannot work with (a calendar without exactly 12
    /// months, non-positive monthly hours, a multiplier below 1).
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let policy = Self::load_yaml::<PolicyFile>(&path.join("policy.yaml"))?;
        let calendar = Self::load_yaml::<Calendar>(&path.join("calendar.yaml"))?;

        let config = PolicyConfig::new(policy.overtime, policy.kpi, calendar);
        Self::validate(&config)?;

        Ok(Self { config })
    }

    /// Wraps an already-built policy, validating it the same way [`load`](Self::load) does.
    pub fn from_config(config: PolicyConfig) -> EngineResult<Self> {
        Self::validate(&config)?;
        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    fn validate(config: &PolicyConfig) -> EngineResult<()> {
        let months = &config.calendar().months;
        if months.len() != 12 {
            return Err(EngineError::InvalidConfig {
                field: "calendar.months".to_string(),
                message: format!("expected 12 month names, found {}", months.len()),
            });
        }
        if let Some(blank) = months.iter().position(|m| m.trim().is_empty()) {
            return Err(EngineError::InvalidConfig {
                field: "calendar.months".to_string(),
                message: format!("month {} has an empty name", blank + 1),
            });
        }

        let overtime = config.overtime();
        if overtime.monthly_hours <= Decimal::ZERO {
            return Err(EngineError::InvalidConfig {
                field: "overtime.monthly_hours".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if overtime.multiplier < Decimal::ONE {
            return Err(EngineError::InvalidConfig {
                field: "overtime.multiplier".to_string(),
                message: format!("must be at least 1, got {}", overtime.multiplier),
            });
        }

        if config.kpi().category.trim().is_empty() {
            return Err(EngineError::InvalidConfig {
                field: "kpi.category".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Returns the loaded policy.
    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Consumes the loader and returns the policy.
    pub fn into_config(self) -> PolicyConfig {
        self.config
    }
}
