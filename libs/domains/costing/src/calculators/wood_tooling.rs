//! Wood-tooling calculator: fixed tooling charges by project complexity.

use std::collections::HashSet;

use super::item;
use crate::models::{CategoryKind, CostCategory, NormalizedComponent};

pub const BASE_TOOLING_COST: f64 = 500_000.0;
pub const PER_EXTRA_MATERIAL_COST: f64 = 50_000.0;
pub const PER_CNC_COMPONENT_COST: f64 = 20_000.0;

pub fn calculate(components: &[NormalizedComponent]) -> CostCategory {
    let mut items = vec![item(
        BASE_TOOLING_COST,
        "هزینه پایه ابزار چوبی",
        "پروژه",
        1.0,
        None,
    )];

    let distinct_materials = components
        .iter()
        .map(|c| c.raw.material_type.as_str())
        .collect::<HashSet<_>>()
        .len();
    let extra_materials = distinct_materials.saturating_sub(1);
    if extra_materials > 0 {
        items.push(item(
            extra_materials as f64 * PER_EXTRA_MATERIAL_COST,
            "پیچیدگی مواد متنوع",
            "تنوع",
            extra_materials as f64,
            None,
        ));
    }

    let cnc_components = components.iter().filter(|c| c.is_cnc()).count();
    if cnc_components > 0 {
        items.push(item(
            cnc_components as f64 * PER_CNC_COMPONENT_COST,
            "ابزار ویژه CNC",
            "قطعه",
            cnc_components as f64,
            None,
        ));
    }

    CostCategory::new(CategoryKind::WoodTooling, items)
}
