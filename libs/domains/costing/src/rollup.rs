//! Financial roll-up: category totals → overheads → profit → final price.
//!
//! Nothing is rounded here; rounding happens once, at category level.

use crate::models::{
    CategoryTotals, FinancialSummary, Overheads, PricingBreakdownPercentages, PricingConfig,
    PricingConfigOverride,
};
use crate::spreadsheet::safe_div;

impl PricingConfig {
    /// Sum of the four overheads and the contingency, as a fraction
    pub fn total_overhead_rate(&self) -> f64 {
        self.overhead1 + self.overhead2 + self.overhead3 + self.overhead4 + self.contingency
    }

    /// Overhead amount for a subtotal
    pub fn overheads_for(&self, subtotal: f64) -> f64 {
        subtotal * self.overhead1
            + subtotal * self.overhead2
            + subtotal * self.overhead3
            + subtotal * self.overhead4
            + subtotal * self.contingency
    }

    /// Final price for a subtotal, without the itemized breakdown
    pub fn final_price_from_subtotal(&self, subtotal: f64) -> f64 {
        (subtotal + self.overheads_for(subtotal)) * (1.0 + self.profit_margin)
    }

    /// Inverse of [`final_price_from_subtotal`](Self::final_price_from_subtotal)
    pub fn subtotal_from_final_price(&self, final_price: f64) -> f64 {
        let multiplier = (1.0 + self.total_overhead_rate()) * (1.0 + self.profit_margin);
        safe_div(final_price, multiplier)
    }

    pub fn breakdown_percentages(&self) -> PricingBreakdownPercentages {
        PricingBreakdownPercentages {
            overhead1_percent: self.overhead1 * 100.0,
            overhead2_percent: self.overhead2 * 100.0,
            overhead3_percent: self.overhead3 * 100.0,
            overhead4_percent: self.overhead4 * 100.0,
            contingency_percent: self.contingency * 100.0,
            profit_percent: self.profit_margin * 100.0,
            total_overhead_percent: self.total_overhead_rate() * 100.0,
        }
    }
}

impl PricingConfigOverride {
    /// Replace each field of `base` that this override sets
    pub fn apply_to(&self, base: PricingConfig) -> PricingConfig {
        PricingConfig {
            overhead1: self.overhead1.unwrap_or(base.overhead1),
            overhead2: self.overhead2.unwrap_or(base.overhead2),
            overhead3: self.overhead3.unwrap_or(base.overhead3),
            overhead4: self.overhead4.unwrap_or(base.overhead4),
            contingency: self.contingency.unwrap_or(base.contingency),
            profit_margin: self.profit_margin.unwrap_or(base.profit_margin),
        }
    }
}

/// Effective config: the loaded one (or defaults), then the caller's override
pub fn resolve_config(
    loaded: Option<PricingConfig>,
    override_config: Option<&PricingConfigOverride>,
) -> PricingConfig {
    let base = loaded.unwrap_or_else(|| {
        tracing::info!("No active pricing config, using defaults");
        PricingConfig::default()
    });

    match override_config {
        Some(over) => over.apply_to(base),
        None => base,
    }
}

pub fn summarize(breakdown: CategoryTotals, config: &PricingConfig) -> FinancialSummary {
    let subtotal = breakdown.sum();

    let overhead1 = subtotal * config.overhead1;
    let overhead2 = subtotal * config.overhead2;
    let overhead3 = subtotal * config.overhead3;
    let overhead4 = subtotal * config.overhead4;
    let contingency = subtotal * config.contingency;
    let total_overheads = overhead1 + overhead2 + overhead3 + overhead4 + contingency;

    let total_with_overheads = subtotal + total_overheads;
    let profit_amount = total_with_overheads * config.profit_margin;

    FinancialSummary {
        subtotal,
        breakdown,
        overheads: Overheads {
            overhead1,
            overhead2,
            overhead3,
            overhead4,
            contingency,
            total_overheads,
        },
        total_with_overheads,
        profit_amount,
        final_price: total_with_overheads + profit_amount,
        profit_percentage: config.profit_margin,
    }
}
