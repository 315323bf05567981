//! Cutting calculator: perimeter metres per part at the saw rate.

use super::{fallback_warning, item};
use crate::catalog::CatalogGateway;
use crate::error::CostingResult;
use crate::models::{Calculated, CatalogKind, CategoryKind, CostCategory, NormalizedComponent};
use crate::spreadsheet::round;

/// Catalog code of the saw operation
pub const CUTTING_CODE: &str = "CUT001";
/// Price per metre when the catalog has no saw rate
pub const DEFAULT_CUTTING_PRICE: f64 = 2_000.0;

pub async fn calculate<C>(
    catalog: &C,
    components: &[NormalizedComponent],
) -> CostingResult<Calculated<CostCategory>>
where
    C: CatalogGateway + ?Sized,
{
    let cuttable: Vec<_> = components
        .iter()
        .filter(|c| c.raw.length > 0.0 && c.raw.width > 0.0)
        .collect();

    if cuttable.is_empty() {
        return Ok(Calculated::clean(CostCategory::empty(CategoryKind::Cutting)));
    }

    let mut warnings = Vec::new();
    let unit_price = match catalog.cnc_operation_by_code(CUTTING_CODE).await? {
        Some(entry) => entry.price_or(DEFAULT_CUTTING_PRICE),
        None => {
            warnings.push(fallback_warning(
                CatalogKind::CncOperation,
                CUTTING_CODE,
                DEFAULT_CUTTING_PRICE,
            ));
            DEFAULT_CUTTING_PRICE
        }
    };

    let items = cuttable
        .into_iter()
        .filter_map(|component| {
            let perimeter = 2.0 * (component.raw.length + component.raw.width) / 1000.0;
            let cost = round(perimeter * unit_price * component.quantity(), 0);
            (cost > 0.0).then(|| {
                item(
                    cost,
                    "Cutting Operation",
                    "m",
                    perimeter * component.quantity(),
                    Some(component.raw.material_type.clone()),
                )
            })
        })
        .collect();

    Ok(Calculated::new(
        CostCategory::new(CategoryKind::Cutting, items),
        warnings,
    ))
}
