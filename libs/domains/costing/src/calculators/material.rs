//! Material calculator: the pivot of sumArea per material, priced per m².

use futures::future::try_join_all;
use serde::{Deserialize, Serialize};

use super::{MaterialGroup, fallback_warning, group_by_material, item};
use crate::catalog::CatalogGateway;
use crate::error::CostingResult;
use crate::models::{
    Calculated, CatalogEntry, CatalogKind, CategoryKind, CostCategory, CostItem, LookupWarning,
    MaterialCosts, NormalizedComponent,
};
use crate::spreadsheet::{round, safe_div};

/// Price used when the fallback material itself carries no price
pub const DEFAULT_MATERIAL_PRICE: f64 = 125_000.0;

/// Name lookup first (handles multilingual names), then exact code
async fn resolve<C>(catalog: &C, material_type: &str) -> CostingResult<Option<CatalogEntry>>
where
    C: CatalogGateway + ?Sized,
{
    if let Some(entry) = catalog.material_by_name(material_type).await? {
        return Ok(Some(entry));
    }
    catalog.material_by_code(material_type).await
}

pub async fn calculate<C>(
    catalog: &C,
    components: &[NormalizedComponent],
) -> CostingResult<Calculated<MaterialCosts>>
where
    C: CatalogGateway + ?Sized,
{
    let groups = group_by_material(components);
    tracing::debug!(groups = groups.len(), "Material groups");

    let resolved = try_join_all(groups.iter().map(|g| resolve(catalog, &g.material_type))).await?;

    // Only read the full material list when something missed
    let default_material = if resolved.iter().any(Option::is_none) {
        catalog.active_materials().await?.into_iter().next()
    } else {
        None
    };

    let mut items = Vec::with_capacity(groups.len());
    let mut warnings = Vec::new();
    let mut total_area = 0.0;
    let mut total_quantity: u64 = 0;

    for (group, entry) in groups.iter().zip(resolved) {
        let MaterialGroup {
            material_type,
            area,
            count,
        } = group;

        let line = match (entry, &default_material) {
            (Some(entry), _) => item(
                round(area * entry.unit_price, 0),
                entry.description,
                entry.unit,
                *area,
                Some(material_type.clone()),
            ),
            (None, Some(default)) => {
                let unit_price = default.price_or(DEFAULT_MATERIAL_PRICE);
                warnings.push(fallback_warning(CatalogKind::Material, material_type, unit_price));
                let description = if material_type.is_empty() {
                    default.description.clone()
                } else {
                    material_type.clone()
                };
                item(
                    round(area * unit_price, 0),
                    description,
                    default.unit.clone(),
                    *area,
                    Some(material_type.clone()),
                )
            }
            (None, None) => {
                tracing::warn!(material = %material_type, "No active materials in catalog, skipping group");
                warnings.push(LookupWarning::new(
                    CatalogKind::Material,
                    material_type.as_str(),
                    format!("material '{material_type}' not found and the catalog has no active materials; group skipped"),
                ));
                continue;
            }
        };

        items.push(line);
        total_area += *area;
        total_quantity += *count;
    }

    Ok(Calculated::new(
        MaterialCosts {
            costs: CostCategory::new(CategoryKind::Material, items),
            total_area: round(total_area, 2),
            total_quantity,
        },
        warnings,
    ))
}

/// Headline figures over a material category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialSummary {
    pub total_materials: usize,
    pub average_cost_per_item: f64,
    pub total_area: f64,
    /// Description of the costliest line, empty when there are none
    pub most_expensive_material: String,
}

impl MaterialSummary {
    pub fn of(costs: &MaterialCosts) -> Self {
        let items = &costs.costs.items;
        let most_expensive = items
            .iter()
            .fold(None, |max: Option<&CostItem>, item| match max {
                Some(current) if current.cost >= item.cost => Some(current),
                _ => Some(item),
            })
            .map(|item| item.description.clone())
            .unwrap_or_default();

        Self {
            total_materials: items.len(),
            average_cost_per_item: round(safe_div(costs.costs.total_cost, items.len() as f64), 0),
            total_area: costs.total_area,
            most_expensive_material: most_expensive,
        }
    }
}

/// Outcome of [`validate_material_costs`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialValidation {
    pub is_valid: bool,
    pub warnings: Vec<String>,
}

/// Sanity checks that catch zero-priced or zero-area lines
pub fn validate_material_costs(costs: &MaterialCosts) -> MaterialValidation {
    let mut warnings = Vec::new();

    if costs.costs.total_cost <= 0.0 {
        warnings.push("Total material cost is zero or negative".to_string());
    }

    for (index, item) in costs.costs.items.iter().enumerate() {
        if item.cost <= 0.0 {
            warnings.push(format!(
                "Item {} ({}) has zero or negative cost",
                index + 1,
                item.description
            ));
        }
        if item.quantity <= 0.0 {
            warnings.push(format!(
                "Item {} ({}) has zero or negative quantity",
                index + 1,
                item.description
            ));
        }
    }

    MaterialValidation {
        is_valid: warnings.is_empty(),
        warnings,
    }
}

/// Scale a material category by (1 + waste_pct)
pub fn apply_waste(costs: &MaterialCosts, waste_pct: f64) -> MaterialCosts {
    let factor = 1.0 + waste_pct;
    let items = costs
        .costs
        .items
        .iter()
        .map(|item| CostItem {
            cost: round(item.cost * factor, 0),
            quantity: round(item.quantity * factor, 2),
            ..item.clone()
        })
        .collect();

    MaterialCosts {
        costs: CostCategory {
            category: CategoryKind::Material,
            items,
            total_cost: round(costs.costs.total_cost * factor, 0),
        },
        total_area: round(costs.total_area * factor, 2),
        total_quantity: costs.total_quantity,
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{component, entry};
    use super::*;
    use crate::catalog::MockCatalogGateway;

    #[tokio::test]
    async fn test_priced_by_name() {
        let mut catalog = MockCatalogGateway::new();
        catalog
            .expect_material_by_name()
            .returning(|_| Ok(Some(entry("MAT-16", "ام دی اف 16 میل", "متر مربع", 22_000_000.0))));
        catalog.expect_active_materials().never();

        let components = vec![component("Side", "ام دی اف 16 میل", 2, 0.24)];
        let result = calculate(&catalog, &components).await.unwrap();

        assert_eq!(result.costs.costs.total_cost, 10_560_000.0);
        assert_eq!(result.costs.total_area, 0.48);
        assert_eq!(result.costs.total_quantity, 1);
        assert_eq!(result.costs.costs.items[0].description, "ام دی اف 16 میل");
        assert_eq!(result.costs.costs.items[0].code.as_deref(), Some("ام دی اف 16 میل"));
        assert!(result.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_code_lookup_after_name_miss() {
        let mut catalog = MockCatalogGateway::new();
        catalog.expect_material_by_name().returning(|_| Ok(None));
        catalog
            .expect_material_by_code()
            .withf(|code| code == "MAT-PVC")
            .returning(|_| Ok(Some(entry("MAT-PVC", "PVC 16", "m2", 1_000_000.0))));

        let components = vec![component("Shelf", "MAT-PVC", 1, 0.5)];
        let result = calculate(&catalog, &components).await.unwrap();

        assert_eq!(result.costs.costs.total_cost, 500_000.0);
        assert!(result.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_fallback_to_first_active_material() {
        let mut catalog = MockCatalogGateway::new();
        catalog.expect_material_by_name().returning(|_| Ok(None));
        catalog.expect_material_by_code().returning(|_| Ok(None));
        catalog.expect_active_materials().times(1).returning(|| {
            Ok(vec![
                entry("A", "Alpha board", "m2", 0.0),
                entry("B", "Beta board", "m2", 9_000_000.0),
            ])
        });

        let components = vec![
            component("x", "Unknown wood", 1, 1.0),
            component("y", "Other wood", 1, 2.0),
        ];
        let result = calculate(&catalog, &components).await.unwrap();
        let items = &result.costs.costs.items;

        // First active material has no price, so the default per-m² price applies
        assert_eq!(items[0].cost, 125_000.0);
        assert_eq!(items[0].description, "Unknown wood");
        assert_eq!(items[1].cost, 250_000.0);
        assert_eq!(result.warnings.len(), 2);
        assert_eq!(result.warnings[0].kind, CatalogKind::Material);
    }

    #[tokio::test]
    async fn test_group_skipped_when_catalog_has_no_materials() {
        let mut catalog = MockCatalogGateway::new();
        catalog.expect_material_by_name().returning(|_| Ok(None));
        catalog.expect_material_by_code().returning(|_| Ok(None));
        catalog.expect_active_materials().returning(|| Ok(Vec::new()));

        let components = vec![component("x", "Unknown", 2, 1.0)];
        let result = calculate(&catalog, &components).await.unwrap();

        assert!(result.costs.costs.items.is_empty());
        assert_eq!(result.costs.total_area, 0.0);
        assert_eq!(result.costs.total_quantity, 0);
        assert_eq!(result.warnings.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let catalog = MockCatalogGateway::new();
        let result = calculate(&catalog, &[]).await.unwrap();

        assert!(result.costs.costs.items.is_empty());
        assert_eq!(result.costs.costs.total_cost, 0.0);
        assert_eq!(result.costs.total_area, 0.0);
    }

    #[tokio::test]
    async fn test_gateway_error_propagates() {
        let mut catalog = MockCatalogGateway::new();
        catalog
            .expect_material_by_name()
            .returning(|_| Err(crate::error::CostingError::Catalog("down".to_string())));

        let components = vec![component("x", "MDF", 1, 1.0)];
        assert!(calculate(&catalog, &components).await.is_err());
    }

    fn sample_costs() -> MaterialCosts {
        MaterialCosts {
            costs: CostCategory::new(
                CategoryKind::Material,
                vec![
                    item(1_000_000.0, "MDF", "m2", 0.5, None),
                    item(3_000_000.0, "HDF", "m2", 1.2, None),
                ],
            ),
            total_area: 2.0,
            total_quantity: 4,
        }
    }

    #[test]
    fn test_material_summary() {
        let summary = MaterialSummary::of(&sample_costs());

        assert_eq!(summary.total_materials, 2);
        assert_eq!(summary.average_cost_per_item, 2_000_000.0);
        assert_eq!(summary.most_expensive_material, "HDF");
    }

    #[test]
    fn test_material_summary_empty() {
        let empty = MaterialCosts {
            costs: CostCategory::empty(CategoryKind::Material),
            total_area: 0.0,
            total_quantity: 0,
        };
        let summary = MaterialSummary::of(&empty);

        assert_eq!(summary.average_cost_per_item, 0.0);
        assert!(summary.most_expensive_material.is_empty());
    }

    #[test]
    fn test_validate_material_costs() {
        assert!(validate_material_costs(&sample_costs()).is_valid);

        let mut costs = sample_costs();
        costs.costs.items[0].cost = 0.0;
        costs.costs.items[1].quantity = 0.0;
        let validation = validate_material_costs(&costs);

        assert!(!validation.is_valid);
        assert_eq!(validation.warnings.len(), 2);
    }

    #[test]
    fn test_apply_waste() {
        let wasted = apply_waste(&sample_costs(), 0.15);

        assert_eq!(wasted.costs.total_cost, 4_600_000.0);
        assert_eq!(wasted.total_area, 2.3);
        assert_eq!(wasted.costs.items[0].cost, 1_150_000.0);
        assert_eq!(wasted.costs.items[1].quantity, 1.38);
    }
}
