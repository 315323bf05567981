use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::CostingResult;
use crate::models::{CatalogEntry, CatalogKind, PricingConfig};

/// Read-only lookup interface over the pricing catalog
///
/// The persisted store lives outside this crate. Lookups return `None` on a
/// miss; only infrastructure failures are errors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogGateway: Send + Sync {
    /// Material by exact code
    async fn material_by_code(&self, code: &str) -> CostingResult<Option<CatalogEntry>>;

    /// Material by fuzzy/multilingual name
    async fn material_by_name(&self, name: &str) -> CostingResult<Option<CatalogEntry>>;

    /// All active materials, ordered by description
    async fn active_materials(&self) -> CostingResult<Vec<CatalogEntry>>;

    /// Edge banding by exact code
    async fn edge_banding_by_code(&self, code: &str) -> CostingResult<Option<CatalogEntry>>;

    /// CNC operation by exact code
    async fn cnc_operation_by_code(&self, code: &str) -> CostingResult<Option<CatalogEntry>>;

    /// Fitting by exact code
    async fn fitting_by_code(&self, code: &str) -> CostingResult<Option<CatalogEntry>>;

    /// Fitting by fuzzy name
    async fn fitting_by_name(&self, name: &str) -> CostingResult<Option<CatalogEntry>>;

    /// Active overhead/profit configuration, if one is configured
    async fn active_pricing_config(&self) -> CostingResult<Option<PricingConfig>>;
}

// ============================================================================
// In-memory catalog
// ============================================================================

/// Catalog record as stored in a price list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRecord {
    pub code: String,
    /// Fittings lists call this column `name`
    #[serde(alias = "name")]
    pub description: String,
    #[serde(default = "default_unit")]
    pub unit: String,
    pub unit_price: f64,
    /// Alternative (usually Persian) names used by the name lookup
    #[serde(default, alias = "persianNames")]
    pub aliases: Vec<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_unit() -> String {
    "unit".to_string()
}

fn default_active() -> bool {
    true
}

impl CatalogRecord {
    pub fn new(code: &str, description: &str, unit: &str, unit_price: f64) -> Self {
        Self {
            code: code.to_string(),
            description: description.to_string(),
            unit: unit.to_string(),
            unit_price,
            aliases: Vec::new(),
            is_active: true,
        }
    }

    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases = aliases.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    fn to_entry(&self) -> CatalogEntry {
        CatalogEntry {
            code: self.code.clone(),
            description: self.description.clone(),
            unit: self.unit.clone(),
            unit_price: self.unit_price,
        }
    }
}

/// Price lists in the JSON layout exported by the catalog admin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CatalogDocument {
    #[serde(default)]
    pub materials: Vec<CatalogRecord>,
    #[serde(default)]
    pub edge_banding: Vec<CatalogRecord>,
    #[serde(default)]
    pub cnc_operations: Vec<CatalogRecord>,
    #[serde(default)]
    pub fittings: Vec<CatalogRecord>,
    #[serde(default)]
    pub pricing_config: Option<PricingConfig>,
}

impl CatalogDocument {
    pub fn from_json(json: &str) -> CostingResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn records(&self, kind: CatalogKind) -> &[CatalogRecord] {
        match kind {
            CatalogKind::Material => &self.materials,
            CatalogKind::EdgeBanding => &self.edge_banding,
            CatalogKind::CncOperation => &self.cnc_operations,
            CatalogKind::Fitting => &self.fittings,
        }
    }

    fn records_mut(&mut self, kind: CatalogKind) -> &mut Vec<CatalogRecord> {
        match kind {
            CatalogKind::Material => &mut self.materials,
            CatalogKind::EdgeBanding => &mut self.edge_banding,
            CatalogKind::CncOperation => &mut self.cnc_operations,
            CatalogKind::Fitting => &mut self.fittings,
        }
    }
}

/// Exact, case-sensitive code match among active records
fn find_by_code<'a>(records: &'a [CatalogRecord], code: &str) -> Option<&'a CatalogRecord> {
    records.iter().find(|r| r.is_active && r.code == code)
}

/// Name resolution: description contains the query or the code equals it
/// (case-insensitive), then alias containment in either direction.
fn find_by_name<'a>(records: &'a [CatalogRecord], name: &str) -> Option<&'a CatalogRecord> {
    let query = name.trim().to_lowercase();
    if query.is_empty() {
        return None;
    }

    let active = || records.iter().filter(|r| r.is_active);

    active()
        .find(|r| r.description.to_lowercase().contains(&query) || r.code.to_lowercase() == query)
        .or_else(|| {
            active().find(|r| {
                r.aliases.iter().any(|alias| {
                    let alias = alias.trim().to_lowercase();
                    !alias.is_empty() && (query.contains(&alias) || alias.contains(&query))
                })
            })
        })
}

/// In-memory implementation of CatalogGateway (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalog {
    tables: Arc<RwLock<CatalogDocument>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_document(document: CatalogDocument) -> Self {
        Self {
            tables: Arc::new(RwLock::new(document)),
        }
    }

    pub fn from_json(json: &str) -> CostingResult<Self> {
        Ok(Self::from_document(CatalogDocument::from_json(json)?))
    }

    /// Replace every table at once
    pub async fn replace(&self, document: CatalogDocument) {
        *self.tables.write().await = document;
        tracing::info!("Catalog replaced");
    }

    /// Insert a record, replacing any record with the same code
    pub async fn upsert(&self, kind: CatalogKind, record: CatalogRecord) {
        let mut tables = self.tables.write().await;
        let records = tables.records_mut(kind);

        match records.iter_mut().find(|r| r.code == record.code) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
    }

    pub async fn set_pricing_config(&self, config: Option<PricingConfig>) {
        self.tables.write().await.pricing_config = config;
    }

    pub async fn snapshot(&self) -> CatalogDocument {
        self.tables.read().await.clone()
    }

    async fn lookup_code(&self, kind: CatalogKind, code: &str) -> Option<CatalogEntry> {
        let tables = self.tables.read().await;
        find_by_code(tables.records(kind), code).map(CatalogRecord::to_entry)
    }

    async fn lookup_name(&self, kind: CatalogKind, name: &str) -> Option<CatalogEntry> {
        let tables = self.tables.read().await;
        find_by_name(tables.records(kind), name).map(CatalogRecord::to_entry)
    }
}

#[async_trait]
impl CatalogGateway for InMemoryCatalog {
    async fn material_by_code(&self, code: &str) -> CostingResult<Option<CatalogEntry>> {
        Ok(self.lookup_code(CatalogKind::Material, code).await)
    }

    async fn material_by_name(&self, name: &str) -> CostingResult<Option<CatalogEntry>> {
        Ok(self.lookup_name(CatalogKind::Material, name).await)
    }

    async fn active_materials(&self) -> CostingResult<Vec<CatalogEntry>> {
        let tables = self.tables.read().await;
        let mut materials: Vec<CatalogEntry> = tables
            .materials
            .iter()
            .filter(|r| r.is_active)
            .map(CatalogRecord::to_entry)
            .collect();
        materials.sort_by(|a, b| a.description.cmp(&b.description));
        Ok(materials)
    }

    async fn edge_banding_by_code(&self, code: &str) -> CostingResult<Option<CatalogEntry>> {
        Ok(self.lookup_code(CatalogKind::EdgeBanding, code).await)
    }

    async fn cnc_operation_by_code(&self, code: &str) -> CostingResult<Option<CatalogEntry>> {
        Ok(self.lookup_code(CatalogKind::CncOperation, code).await)
    }

    async fn fitting_by_code(&self, code: &str) -> CostingResult<Option<CatalogEntry>> {
        Ok(self.lookup_code(CatalogKind::Fitting, code).await)
    }

    async fn fitting_by_name(&self, name: &str) -> CostingResult<Option<CatalogEntry>> {
        Ok(self.lookup_name(CatalogKind::Fitting, name).await)
    }

    async fn active_pricing_config(&self) -> CostingResult<Option<PricingConfig>> {
        Ok(self.tables.read().await.pricing_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> InMemoryCatalog {
        InMemoryCatalog::from_document(CatalogDocument {
            materials: vec![
                CatalogRecord::new("MAT-16", "ام دی اف 16 میل - سفید", "متر مربع", 22_000_000.0)
                    .with_aliases(&["MDF 16mm"]),
                CatalogRecord::new("MAT-PVC", "پی وی سی 16 میل", "متر مربع", 18_000_000.0),
                CatalogRecord::new("MAT-OLD", "Chipboard", "متر مربع", 9_000_000.0).inactive(),
            ],
            cnc_operations: vec![CatalogRecord::new("CNC002", "Routing", "piece", 350_000.0)],
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_material_by_name_matches_description_substring() {
        let found = catalog().material_by_name("  ام دی اف ").await.unwrap();
        assert_eq!(found.unwrap().code, "MAT-16");
    }

    #[tokio::test]
    async fn test_material_by_name_matches_code_case_insensitively() {
        let found = catalog().material_by_name("mat-pvc").await.unwrap();
        assert_eq!(found.unwrap().code, "MAT-PVC");
    }

    #[tokio::test]
    async fn test_material_by_name_matches_alias_both_ways() {
        let catalog = catalog();
        let longer = catalog.material_by_name("MDF 16mm white gloss").await.unwrap();
        assert_eq!(longer.unwrap().code, "MAT-16");

        let shorter = catalog.material_by_name("mdf 16").await.unwrap();
        assert_eq!(shorter.unwrap().code, "MAT-16");
    }

    #[tokio::test]
    async fn test_lookups_skip_inactive_and_blank() {
        let catalog = catalog();
        assert!(catalog.material_by_name("chipboard").await.unwrap().is_none());
        assert!(catalog.material_by_code("MAT-OLD").await.unwrap().is_none());
        assert!(catalog.material_by_name("   ").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_code_lookup_is_exact() {
        let catalog = catalog();
        assert!(catalog.cnc_operation_by_code("CNC002").await.unwrap().is_some());
        assert!(catalog.cnc_operation_by_code("cnc002").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_active_materials_sorted_by_description() {
        let materials = catalog().active_materials().await.unwrap();
        assert_eq!(materials.len(), 2);
        assert!(materials[0].description <= materials[1].description);
    }

    #[tokio::test]
    async fn test_upsert_replaces_by_code() {
        let catalog = catalog();
        catalog
            .upsert(
                CatalogKind::CncOperation,
                CatalogRecord::new("CNC002", "Routing", "piece", 400_000.0),
            )
            .await;
        catalog
            .upsert(
                CatalogKind::CncOperation,
                CatalogRecord::new("CNC003", "Complex cut", "piece", 500_000.0),
            )
            .await;

        let routing = catalog.cnc_operation_by_code("CNC002").await.unwrap().unwrap();
        assert_eq!(routing.unit_price, 400_000.0);
        assert_eq!(catalog.snapshot().await.cnc_operations.len(), 2);
    }

    #[tokio::test]
    async fn test_pricing_config_visible_after_change() {
        let catalog = catalog();
        assert!(catalog.active_pricing_config().await.unwrap().is_none());

        catalog
            .set_pricing_config(Some(PricingConfig {
                profit_margin: 0.3,
                ..Default::default()
            }))
            .await;
        let config = catalog.active_pricing_config().await.unwrap().unwrap();
        assert_eq!(config.profit_margin, 0.3);
    }

    #[test]
    fn test_document_from_json_accepts_admin_layout() {
        let json = r#"{
            "materials": [{"code":"M1","description":"MDF","unit":"m2","unitPrice":100,"persianNames":["ام دی اف"]}],
            "fittings": [{"code":"FITTING-1","name":"Hinge","unitPrice":200000,"isActive":true}],
            "pricingConfig": {"overhead1":0.2,"overhead2":0.04,"overhead3":0.02,"overhead4":0.02,"contingency":0.025,"profitMargin":0.2}
        }"#;
        let document = CatalogDocument::from_json(json).unwrap();

        assert_eq!(document.materials[0].aliases, vec!["ام دی اف".to_string()]);
        assert_eq!(document.fittings[0].description, "Hinge");
        assert_eq!(document.fittings[0].unit, "unit");
        assert!(document.edge_banding.is_empty());
        assert_eq!(document.pricing_config.unwrap().overhead1, 0.2);
    }
}
