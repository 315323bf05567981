//! Observability utilities for the costing workspace.
//!
//! This crate provides:
//! - Prometheus metrics recording and rendering
//! - Costing metrics (calculations, lookup fallbacks, quoted prices)
//!
//! # Example
//!
//! ```rust,ignore
//! use observability::{init_metrics, render_metrics, CostingMetrics};
//!
//! init_metrics()?;
//!
//! let timer = CostingMetrics::start_calculation();
//! // ... run the calculation ...
//! timer.finish(16_531_000.0);
//!
//! println!("{}", render_metrics());
//! ```

pub mod costing;

pub use costing::{CalculationTimer, CostingMetrics};

// Re-export metrics macros for convenience
pub use metrics::{counter, gauge, histogram};

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::info;

static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the Prometheus recorder once and return its handle.
///
/// Later calls return the handle installed by the first one.
pub fn init_metrics() -> Result<&'static PrometheusHandle, BuildError> {
    METRICS_HANDLE.get_or_try_init(|| {
        let handle = PrometheusBuilder::new().install_recorder()?;

        info!("Prometheus metrics recorder initialized");
        register_metric_descriptions();

        Ok(handle)
    })
}

/// Get the metrics handle (must call init_metrics first)
pub fn get_metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

/// Prometheus text exposition of everything recorded so far
pub fn render_metrics() -> String {
    match get_metrics_handle() {
        Some(handle) => handle.render(),
        None => "# Metrics not initialized\n".to_string(),
    }
}

fn register_metric_descriptions() {
    use metrics::{describe_counter, describe_gauge, describe_histogram};

    describe_counter!(
        costing::CALCULATIONS_TOTAL,
        "Total cost calculations by outcome"
    );
    describe_histogram!(
        costing::CALCULATION_DURATION_SECONDS,
        "Cost calculation duration in seconds"
    );
    describe_counter!(
        costing::LOOKUP_FALLBACKS_TOTAL,
        "Catalog lookups resolved with a fallback price, by catalog kind"
    );
    describe_gauge!(
        costing::FINAL_PRICE,
        "Final price of the most recent calculation"
    );
}
