//! Metrics for the cost calculation pipeline.

use metrics::{counter, gauge, histogram};
use std::time::Instant;

pub const CALCULATIONS_TOTAL: &str = "costing_calculations_total";
pub const CALCULATION_DURATION_SECONDS: &str = "costing_calculation_duration_seconds";
pub const LOOKUP_FALLBACKS_TOTAL: &str = "costing_lookup_fallbacks_total";
pub const FINAL_PRICE: &str = "costing_final_price";

/// Costing metrics recorder
pub struct CostingMetrics;

impl CostingMetrics {
    /// Start timing a calculation
    pub fn start_calculation() -> CalculationTimer {
        CalculationTimer {
            start: Instant::now(),
            finished: false,
        }
    }

    /// Record a catalog miss that was priced with a fallback value
    pub fn record_lookup_fallback(kind: &str) {
        counter!(LOOKUP_FALLBACKS_TOTAL, "kind" => kind.to_string()).increment(1);
    }

    /// Record a calculation that failed on infrastructure
    pub fn record_calculation_failed(error: &str) {
        counter!(CALCULATIONS_TOTAL, "status" => "failed").increment(1);
        tracing::error!(error = error, "Cost calculation failed");
    }
}

/// Timer guard for a single calculation.
///
/// `finish` records success; dropping an unfinished timer records only the
/// duration.
pub struct CalculationTimer {
    start: Instant,
    finished: bool,
}

impl CalculationTimer {
    /// Record a successful calculation. Returns the duration in milliseconds.
    pub fn finish(mut self, final_price: f64) -> u64 {
        self.finished = true;
        let duration = self.start.elapsed();

        counter!(CALCULATIONS_TOTAL, "status" => "completed").increment(1);
        histogram!(CALCULATION_DURATION_SECONDS).record(duration.as_secs_f64());
        gauge!(FINAL_PRICE).set(final_price);

        duration.as_millis() as u64
    }
}

impl Drop for CalculationTimer {
    fn drop(&mut self) {
        if !self.finished {
            histogram!(CALCULATION_DURATION_SECONDS).record(self.start.elapsed().as_secs_f64());
        }
    }
}
