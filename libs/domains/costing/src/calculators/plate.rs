//! Plate calculator: thin sheet stock, grouped and priced like material.

use futures::future::try_join_all;

use super::{fallback_warning, group_by_material, item};
use crate::catalog::CatalogGateway;
use crate::error::CostingResult;
use crate::models::{Calculated, CatalogKind, CategoryKind, CostCategory, NormalizedComponent};
use crate::spreadsheet::round;

/// Price per m² when the plate material is not in the catalog
pub const DEFAULT_PLATE_PRICE: f64 = 3_500_000.0;

/// Parts thinner than this (mm) are plate
pub const PLATE_MAX_THICKNESS: f64 = 5.0;

const PLATE_KEYWORDS: &[&str] = &["plate", "sheet", "صفحه", "3 میل"];

/// Declared thickness under 5 mm, or a thin-sheet keyword in the material.
///
/// A missing thickness never qualifies on its own.
pub fn is_plate(component: &NormalizedComponent) -> bool {
    let thin = component
        .raw
        .thickness
        .is_some_and(|thickness| thickness < PLATE_MAX_THICKNESS);
    let material = component.raw.material_type.to_lowercase();

    thin || PLATE_KEYWORDS.iter().any(|keyword| material.contains(keyword))
}

pub async fn calculate<C>(
    catalog: &C,
    components: &[NormalizedComponent],
) -> CostingResult<Calculated<CostCategory>>
where
    C: CatalogGateway + ?Sized,
{
    let groups = group_by_material(components.iter().filter(|c| is_plate(c)));
    let entries =
        try_join_all(groups.iter().map(|g| catalog.material_by_name(&g.material_type))).await?;

    let mut warnings = Vec::new();
    let items = groups
        .into_iter()
        .zip(entries)
        .map(|(group, entry)| {
            let unit_price = match entry {
                Some(entry) => entry.price_or(DEFAULT_PLATE_PRICE),
                None => {
                    warnings.push(fallback_warning(
                        CatalogKind::Material,
                        &group.material_type,
                        DEFAULT_PLATE_PRICE,
                    ));
                    DEFAULT_PLATE_PRICE
                }
            };
            item(
                round(group.area * unit_price, 0),
                format!("Plate - {}", group.material_type),
                "m²",
                group.area,
                Some(group.material_type),
            )
        })
        .collect();

    Ok(Calculated::new(
        CostCategory::new(CategoryKind::Plate, items),
        warnings,
    ))
}
