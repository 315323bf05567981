//! Painting calculator: finished area at a flat rate per m².

use super::item;
use crate::models::{CategoryKind, CostCategory, NormalizedComponent};
use crate::spreadsheet::{finite_or_zero, round};

pub const DEFAULT_PAINTING_PRICE_PER_M2: f64 = 50_000.0;

pub fn calculate(components: &[NormalizedComponent], price_per_m2: f64) -> CostCategory {
    let items = components
        .iter()
        .filter_map(|component| {
            let area = finite_or_zero(component.raw.area * component.quantity());
            let cost = round(area * price_per_m2, 0);
            (cost > 0.0).then(|| {
                item(
                    cost,
                    format!("Painting - {}", component.raw.name),
                    "m²",
                    area,
                    None,
                )
            })
        })
        .collect();

    CostCategory::new(CategoryKind::Painting, items)
}
