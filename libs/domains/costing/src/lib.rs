//! Costing Domain
//!
//! Estimates the manufacturing cost and sale price of a cabinetry project from
//! the cut-part list exported by the nesting software.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │     Service      │  ← Orchestration, result envelope, metrics
//! └────────┬─────────┘
//!          │
//! ┌────────▼─────────┐
//! │   Normalizer     │  ← Derived geometry, CNC tag stripping
//! └────────┬─────────┘
//!          │
//! ┌────────▼─────────┐
//! │ Calculators (8)  │  ← Material, Cutting, CNC, EdgeBanding, Fittings,
//! └────────┬─────────┘    Painting, Plate, WoodTooling
//!          │
//! ┌────────▼─────────┐
//! │     Roll-up      │  ← Overheads, profit, final price
//! └──────────────────┘
//!
//!   Catalog gateway (trait + in-memory implementation) feeds the calculators
//! ```

pub mod calculators;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod normalizer;
pub mod rollup;
pub mod service;
pub mod spreadsheet;

// Re-export commonly used types
pub use catalog::{CatalogDocument, CatalogGateway, CatalogRecord, InMemoryCatalog};
pub use config::{CostingSettings, EnabledCategories};
pub use error::{CostingError, CostingResult};
pub use models::{
    CalculationResult, CatalogEntry, CatalogKind, CategoryKind, CostBreakdown, CostCategory,
    CostItem, FinancialSummary, LookupWarning, MaterialCosts, NormalizedComponent,
    PricingConfig, PricingConfigOverride, ProjectMeta, RawComponent,
};
pub use normalizer::{ProcessingStats, normalize};
pub use service::CostCalculationService;
