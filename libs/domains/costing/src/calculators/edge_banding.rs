//! Edge banding calculator.
//!
//! Every banded part is priced at the single default banding code; the edge
//! type written into edge1..edge4 only decides whether an edge is banded.

use super::{fallback_warning, item};
use crate::catalog::CatalogGateway;
use crate::error::CostingResult;
use crate::models::{Calculated, CatalogKind, CategoryKind, CostCategory, NormalizedComponent};
use crate::spreadsheet::round;

pub const EDGE_BANDING_CODE: &str = "EDGE001";
/// Price per metre when the catalog has no banding entry
pub const DEFAULT_EDGE_BANDING_PRICE: f64 = 3_500.0;

/// Banded length in metres: (length + width) / 1000 per banded edge, per piece
pub fn banded_length(component: &NormalizedComponent) -> f64 {
    let per_edge = (component.raw.length + component.raw.width) / 1000.0;
    per_edge * component.edges_to_band() as f64 * component.quantity()
}

pub async fn calculate<C>(
    catalog: &C,
    components: &[NormalizedComponent],
) -> CostingResult<Calculated<CostCategory>>
where
    C: CatalogGateway + ?Sized,
{
    let banded: Vec<_> = components.iter().filter(|c| c.edges_to_band() > 0).collect();

    if banded.is_empty() {
        return Ok(Calculated::clean(CostCategory::empty(CategoryKind::EdgeBanding)));
    }

    let mut warnings = Vec::new();
    let unit_price = match catalog.edge_banding_by_code(EDGE_BANDING_CODE).await? {
        Some(entry) => entry.price_or(DEFAULT_EDGE_BANDING_PRICE),
        None => {
            warnings.push(fallback_warning(
                CatalogKind::EdgeBanding,
                EDGE_BANDING_CODE,
                DEFAULT_EDGE_BANDING_PRICE,
            ));
            DEFAULT_EDGE_BANDING_PRICE
        }
    };

    let items = banded
        .into_iter()
        .map(|component| {
            let length = banded_length(component);
            item(
                round(length * unit_price, 0),
                format!("Edge Banding - {}", component.raw.name),
                "m",
                length,
                Some(component.raw.material_type.clone()),
            )
        })
        .collect();

    Ok(Calculated::new(
        CostCategory::new(CategoryKind::EdgeBanding, items),
        warnings,
    ))
}
