//! The eight category calculators
//!
//! Each calculator reads the normalized component list (and, for most, the
//! catalog) and produces one [`CostCategory`](crate::models::CostCategory).
//! Catalog misses never fail a calculator: the documented fallback price is
//! used and a [`LookupWarning`] is returned alongside the costs.

pub mod cnc;
pub mod cutting;
pub mod edge_banding;
pub mod fittings;
pub mod material;
pub mod painting;
pub mod plate;
pub mod wood_tooling;

use crate::models::{CatalogKind, CostItem, LookupWarning, NormalizedComponent};

/// Components sharing one exact materialType
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialGroup {
    pub material_type: String,
    /// Σ sumArea of the members
    pub area: f64,
    /// Number of member components
    pub count: u64,
}

/// Group by exact (case-sensitive) materialType in first-seen order
pub fn group_by_material<'a, I>(components: I) -> Vec<MaterialGroup>
where
    I: IntoIterator<Item = &'a NormalizedComponent>,
{
    let mut groups: Vec<MaterialGroup> = Vec::new();

    for component in components {
        let key = component.raw.material_type.as_str();
        match groups.iter_mut().find(|g| g.material_type == key) {
            Some(group) => {
                group.area += component.sum_area;
                group.count += 1;
            }
            None => groups.push(MaterialGroup {
                material_type: key.to_string(),
                area: component.sum_area,
                count: 1,
            }),
        }
    }

    groups
}

pub(crate) fn item(
    cost: f64,
    description: impl Into<String>,
    unit: impl Into<String>,
    quantity: f64,
    code: Option<String>,
) -> CostItem {
    CostItem {
        cost,
        description: description.into(),
        unit: unit.into(),
        quantity,
        code,
    }
}

/// Log and build the warning for a lookup that fell back to a default price
pub(crate) fn fallback_warning(
    kind: CatalogKind,
    key: &str,
    fallback_price: f64,
) -> LookupWarning {
    tracing::warn!(
        kind = %kind,
        key = %key,
        fallback_price,
        "Catalog entry not found, using fallback price"
    );
    LookupWarning::new(
        kind,
        key,
        format!("{kind} '{key}' not found in catalog, using fallback price {fallback_price}"),
    )
}
