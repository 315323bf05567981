//! Component normalization
//!
//! Derives the geometric fields every calculator reads. Pure: no catalog
//! access, no I/O, output has the same length and order as the input.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::models::{NormalizedComponent, RawComponent};
use crate::spreadsheet::{finite_or_zero, trim};

/// Tag the nesting export prefixes onto CNC parts
const CNC_TAG: &str = "CNC-";

/// Decorative-finish colors keyed by material code
const COLORS: &[(&str, &str)] = &[
    ("COL001", "White"),
    ("COL002", "Black"),
    ("COL003", "Oak"),
    ("COL004", "Walnut"),
];

/// Color for a material code, if it is a known finish code
pub fn color_for_code(code: &str) -> Option<&'static str> {
    COLORS
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, color)| *color)
}

/// Strip every literal "CNC-" tag (case-sensitive) and collapse whitespace
pub fn clean_instance_type(instance_type: &str) -> String {
    trim(&instance_type.replace(CNC_TAG, ""))
}

/// Normalize one component with the given waste fraction
pub fn normalize_component(raw: &RawComponent, waste_pct: f64) -> NormalizedComponent {
    let quantity = f64::from(raw.quantity);
    let waste_factor = 1.0 + finite_or_zero(waste_pct);

    let sum_area = finite_or_zero(quantity * raw.area);
    let length_quantity = finite_or_zero(raw.length * quantity / 100.0);
    let area_with_waste = finite_or_zero(raw.length * raw.width * quantity * waste_factor / 10_000.0);

    NormalizedComponent {
        sum_area,
        length_quantity,
        area_with_waste,
        double_area_with_waste: area_with_waste * 2.0,
        clean_instance_type: clean_instance_type(&raw.instance_type),
        color: color_for_code(&raw.material_type).map(str::to_string),
        raw: raw.clone(),
    }
}

/// Normalize a component list, preserving order
pub fn normalize(components: &[RawComponent], waste_pct: f64) -> Vec<NormalizedComponent> {
    components
        .iter()
        .map(|raw| normalize_component(raw, waste_pct))
        .collect()
}

/// Aggregate figures over a normalized list, for logging and diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingStats {
    pub total_components: usize,
    pub total_quantity: u64,
    pub total_area: f64,
    pub total_sum_area: f64,
    pub unique_materials: usize,
    pub cnc_components: usize,
}

impl ProcessingStats {
    pub fn collect(components: &[NormalizedComponent]) -> Self {
        let unique_materials = components
            .iter()
            .map(|c| c.raw.material_type.as_str())
            .collect::<HashSet<_>>()
            .len();

        Self {
            total_components: components.len(),
            total_quantity: components.iter().map(|c| u64::from(c.raw.quantity)).sum(),
            total_area: components.iter().map(|c| finite_or_zero(c.raw.area)).sum(),
            total_sum_area: components.iter().map(|c| c.sum_area).sum(),
            unique_materials,
            cnc_components: components.iter().filter(|c| c.is_cnc()).count(),
        }
    }
}
