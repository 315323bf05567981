use core_config::{ConfigError, FromEnv, env_flag, env_or_default, env_parse};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strum::IntoEnumIterator;

use crate::calculators::painting::DEFAULT_PAINTING_PRICE_PER_M2;
use crate::models::CategoryKind;

/// Categories the orchestrator actually runs; the rest report zero
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnabledCategories(BTreeSet<CategoryKind>);

impl EnabledCategories {
    pub fn all() -> Self {
        Self(CategoryKind::iter().collect())
    }

    pub fn none() -> Self {
        Self(BTreeSet::new())
    }

    pub fn with(mut self, kind: CategoryKind) -> Self {
        self.0.insert(kind);
        self
    }

    pub fn without(mut self, kind: CategoryKind) -> Self {
        self.0.remove(&kind);
        self
    }

    pub fn set(&mut self, kind: CategoryKind, enabled: bool) {
        if enabled {
            self.0.insert(kind);
        } else {
            self.0.remove(&kind);
        }
    }

    pub fn is_enabled(&self, kind: CategoryKind) -> bool {
        self.0.contains(&kind)
    }
}

impl Default for EnabledCategories {
    /// Everything except Cutting and Painting
    fn default() -> Self {
        Self::all()
            .without(CategoryKind::Cutting)
            .without(CategoryKind::Painting)
    }
}

/// Settings for the calculation service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostingSettings {
    /// Waste fraction used when the caller does not pass one
    pub waste_percentage: f64,
    pub enabled: EnabledCategories,
    pub painting_price_per_m2: f64,
    /// Version tag stamped on every result
    pub version: String,
}

impl Default for CostingSettings {
    fn default() -> Self {
        Self {
            waste_percentage: 0.0,
            enabled: EnabledCategories::default(),
            painting_price_per_m2: DEFAULT_PAINTING_PRICE_PER_M2,
            version: "1.0.0".to_string(),
        }
    }
}

impl FromEnv for CostingSettings {
    /// Reads from environment variables with these defaults:
    /// - COSTING_WASTE_PERCENTAGE: 0.0
    /// - COSTING_ENABLE_CUTTING / COSTING_ENABLE_PAINTING: false
    /// - COSTING_PAINTING_PRICE_PER_M2: 50000
    /// - COSTING_VERSION_TAG: 1.0.0
    fn from_env() -> Result<Self, ConfigError> {
        let waste_percentage = env_parse("COSTING_WASTE_PERCENTAGE", 0.0)?;
        if waste_percentage < 0.0 {
            return Err(ConfigError::ParseError {
                key: "COSTING_WASTE_PERCENTAGE".to_string(),
                details: "must not be negative".to_string(),
            });
        }

        let mut enabled = EnabledCategories::default();
        enabled.set(
            CategoryKind::Cutting,
            env_flag("COSTING_ENABLE_CUTTING", false)?,
        );
        enabled.set(
            CategoryKind::Painting,
            env_flag("COSTING_ENABLE_PAINTING", false)?,
        );

        Ok(Self {
            waste_percentage,
            enabled,
            painting_price_per_m2: env_parse(
                "COSTING_PAINTING_PRICE_PER_M2",
                DEFAULT_PAINTING_PRICE_PER_M2,
            )?,
            version: env_or_default("COSTING_VERSION_TAG", "1.0.0"),
        })
    }
}
