use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{Display, EnumIter, EnumString};
use uuid::Uuid;
use validator::Validate;

// ============================================================================
// Components
// ============================================================================

/// One cut part as exported by the nesting software
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawComponent {
    /// Component name/description
    pub name: String,
    /// Component ID or secondary description
    #[serde(default)]
    pub component_id: String,
    pub quantity: u32,
    /// Edge treatment codes; an empty string means "no banding on this edge"
    #[serde(default)]
    pub edge1: String,
    #[serde(default)]
    pub edge2: String,
    #[serde(default)]
    pub edge3: String,
    #[serde(default)]
    pub edge4: String,
    /// Material name or code, free text (often Persian)
    #[serde(default)]
    pub material_type: String,
    /// Instance type, may carry a "CNC-" tag
    #[serde(default)]
    pub instance_type: String,
    /// Length in millimeters
    #[serde(default)]
    pub length: f64,
    /// Width in millimeters
    #[serde(default)]
    pub width: f64,
    /// Area of a single piece in m²
    #[serde(default)]
    pub area: f64,
    /// Declared cutting thickness in millimeters, when the export carries it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thickness: Option<f64>,
}

impl RawComponent {
    pub fn edges(&self) -> [&str; 4] {
        [&self.edge1, &self.edge2, &self.edge3, &self.edge4]
    }
}

/// Component with the derived fields used by the category calculators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedComponent {
    #[serde(flatten)]
    pub raw: RawComponent,
    /// quantity × area
    pub sum_area: f64,
    /// (length × quantity) / 100
    pub length_quantity: f64,
    /// (length × width × quantity × (1 + waste)) / 10 000
    pub area_with_waste: f64,
    pub double_area_with_waste: f64,
    /// Instance type without the "CNC-" tag, whitespace collapsed
    pub clean_instance_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl NormalizedComponent {
    /// Whether this part goes through the CNC machine.
    ///
    /// Checks the raw instance type as well as the cleaned one.
    pub fn is_cnc(&self) -> bool {
        self.raw.instance_type.to_uppercase().contains("CNC")
            || self.clean_instance_type.to_uppercase().contains("CNC")
    }

    /// Number of non-blank edge fields (0..=4)
    pub fn edges_to_band(&self) -> usize {
        self.raw
            .edges()
            .iter()
            .filter(|edge| !edge.trim().is_empty())
            .count()
    }

    pub fn quantity(&self) -> f64 {
        f64::from(self.raw.quantity)
    }
}

// ============================================================================
// Cost categories
// ============================================================================

/// The eight cost buckets of a quote
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
pub enum CategoryKind {
    Material,
    Cutting,
    #[serde(rename = "CNC")]
    #[strum(to_string = "CNC", serialize = "cnc")]
    Cnc,
    EdgeBanding,
    Fittings,
    Painting,
    Plate,
    WoodTooling,
}

/// One priced line in a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostItem {
    pub cost: f64,
    pub description: String,
    pub unit: String,
    pub quantity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Result of a single category calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostCategory {
    pub category: CategoryKind,
    pub items: Vec<CostItem>,
    pub total_cost: f64,
}

impl CostCategory {
    /// Build a category, totalling the item costs
    pub fn new(category: CategoryKind, items: Vec<CostItem>) -> Self {
        let total_cost = crate::spreadsheet::round(items.iter().map(|i| i.cost).sum(), 0);
        Self {
            category,
            items,
            total_cost,
        }
    }

    pub fn empty(category: CategoryKind) -> Self {
        Self {
            category,
            items: Vec::new(),
            total_cost: 0.0,
        }
    }
}

/// Material category with pivot totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialCosts {
    #[serde(flatten)]
    pub costs: CostCategory,
    /// Σ of grouped areas, rounded to 2 decimals
    pub total_area: f64,
    /// Σ of group member counts
    pub total_quantity: u64,
}

/// All eight category results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub material: MaterialCosts,
    pub cutting: CostCategory,
    pub cnc: CostCategory,
    pub edge_banding: CostCategory,
    pub fittings: CostCategory,
    pub painting: CostCategory,
    pub plate: CostCategory,
    pub wood_tooling: CostCategory,
}

impl CostBreakdown {
    pub fn totals(&self) -> CategoryTotals {
        CategoryTotals {
            material: self.material.costs.total_cost,
            cutting: self.cutting.total_cost,
            cnc: self.cnc.total_cost,
            edge_banding: self.edge_banding.total_cost,
            fittings: self.fittings.total_cost,
            painting: self.painting.total_cost,
            plate: self.plate.total_cost,
            wood_tooling: self.wood_tooling.total_cost,
        }
    }
}

// ============================================================================
// Financial summary
// ============================================================================

/// Category totals by name, as carried in the financial summary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotals {
    pub material: f64,
    pub cutting: f64,
    pub cnc: f64,
    pub edge_banding: f64,
    pub fittings: f64,
    pub painting: f64,
    pub plate: f64,
    pub wood_tooling: f64,
}

impl CategoryTotals {
    pub fn sum(&self) -> f64 {
        self.material
            + self.cutting
            + self.cnc
            + self.edge_banding
            + self.fittings
            + self.painting
            + self.plate
            + self.wood_tooling
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Overheads {
    pub overhead1: f64,
    pub overhead2: f64,
    pub overhead3: f64,
    pub overhead4: f64,
    pub contingency: f64,
    pub total_overheads: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub subtotal: f64,
    pub breakdown: CategoryTotals,
    pub overheads: Overheads,
    pub total_with_overheads: f64,
    pub profit_amount: f64,
    pub final_price: f64,
    /// Profit margin applied (0.22 = 22%)
    pub profit_percentage: f64,
}

/// Overhead and profit percentages used by the roll-up
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PricingConfig {
    /// General overhead
    #[validate(range(min = 0.0))]
    pub overhead1: f64,
    /// Administrative overhead
    #[validate(range(min = 0.0))]
    pub overhead2: f64,
    #[validate(range(min = 0.0))]
    pub overhead3: f64,
    #[validate(range(min = 0.0))]
    pub overhead4: f64,
    #[validate(range(min = 0.0))]
    pub contingency: f64,
    #[validate(range(min = 0.0))]
    pub profit_margin: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            overhead1: 0.25,
            overhead2: 0.04,
            overhead3: 0.02,
            overhead4: 0.02,
            contingency: 0.025,
            profit_margin: 0.22,
        }
    }
}

/// Caller-supplied percentages that replace the loaded ones field by field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct PricingConfigOverride {
    #[validate(range(min = 0.0))]
    pub overhead1: Option<f64>,
    #[validate(range(min = 0.0))]
    pub overhead2: Option<f64>,
    #[validate(range(min = 0.0))]
    pub overhead3: Option<f64>,
    #[validate(range(min = 0.0))]
    pub overhead4: Option<f64>,
    #[validate(range(min = 0.0))]
    pub contingency: Option<f64>,
    #[validate(range(min = 0.0))]
    pub profit_margin: Option<f64>,
}

/// Percentages as whole-number percents, for reporting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingBreakdownPercentages {
    pub overhead1_percent: f64,
    pub overhead2_percent: f64,
    pub overhead3_percent: f64,
    pub overhead4_percent: f64,
    pub contingency_percent: f64,
    pub profit_percent: f64,
    pub total_overhead_percent: f64,
}

// ============================================================================
// Catalog
// ============================================================================

/// Kind of priced catalog record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CatalogKind {
    Material,
    EdgeBanding,
    CncOperation,
    Fitting,
}

/// A resolved catalog price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub code: String,
    pub description: String,
    pub unit: String,
    pub unit_price: f64,
}

impl CatalogEntry {
    /// Unit price, or `fallback` when the catalog carries no positive price
    pub fn price_or(&self, fallback: f64) -> f64 {
        if self.unit_price > 0.0 {
            self.unit_price
        } else {
            fallback
        }
    }
}

/// A catalog miss that was resolved with a fallback price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupWarning {
    pub kind: CatalogKind,
    /// Code or name that was looked up
    pub key: String,
    pub message: String,
}

impl LookupWarning {
    pub fn new(kind: CatalogKind, key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            key: key.into(),
            message: message.into(),
        }
    }
}

/// Output of a calculator together with the fallbacks it had to take
#[derive(Debug, Clone, PartialEq)]
pub struct Calculated<T> {
    pub costs: T,
    pub warnings: Vec<LookupWarning>,
}

impl<T> Calculated<T> {
    pub fn new(costs: T, warnings: Vec<LookupWarning>) -> Self {
        Self { costs, warnings }
    }

    pub fn clean(costs: T) -> Self {
        Self {
            costs,
            warnings: Vec::new(),
        }
    }
}

// ============================================================================
// Project & result envelope
// ============================================================================

/// Project metadata supplied by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMeta {
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub contract_date: String,
    #[serde(default)]
    pub custom_fields: BTreeMap<String, String>,
}

/// Project block of the result envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    pub name: String,
    pub client: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_fields: BTreeMap<String, String>,
}

impl From<ProjectMeta> for ProjectInfo {
    fn from(meta: ProjectMeta) -> Self {
        Self {
            name: meta.project_name,
            client: meta.client_name,
            date: meta.contract_date,
            custom_fields: meta.custom_fields,
        }
    }
}

/// Complete result of one calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub calculation_id: Uuid,
    pub project: ProjectInfo,
    pub costs: CostBreakdown,
    pub financial_summary: FinancialSummary,
    #[serde(default)]
    pub warnings: Vec<LookupWarning>,
    pub calculated_at: DateTime<Utc>,
    pub version: String,
}
