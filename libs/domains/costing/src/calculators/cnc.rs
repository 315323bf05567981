//! CNC calculator: one line per machined part, priced by operation.

use futures::future::try_join_all;
use std::collections::BTreeMap;

use super::{fallback_warning, item};
use crate::catalog::CatalogGateway;
use crate::error::CostingResult;
use crate::models::{Calculated, CatalogKind, CategoryKind, CostCategory, NormalizedComponent};
use crate::spreadsheet::round;

pub const DRILL_CODE: &str = "CNC001";
pub const ROUTE_CODE: &str = "CNC002";
pub const COMPLEX_CODE: &str = "CNC003";

/// Price per piece when an operation is missing from the catalog
pub const DEFAULT_CNC_PRICE: f64 = 5_000.0;

/// Keyword → operation code, first match wins
const OPERATIONS: &[(&str, &str)] = &[
    ("ROUTE", ROUTE_CODE),
    ("COMPLEX", COMPLEX_CODE),
    ("DRILL", DRILL_CODE),
];

/// Operation code for an upper-cased, cleaned instance type
pub fn operation_code(operation: &str) -> &'static str {
    OPERATIONS
        .iter()
        .find(|(keyword, _)| operation.contains(keyword))
        .map(|(_, code)| *code)
        .unwrap_or(DRILL_CODE)
}

pub async fn calculate<C>(
    catalog: &C,
    components: &[NormalizedComponent],
) -> CostingResult<Calculated<CostCategory>>
where
    C: CatalogGateway + ?Sized,
{
    let machined: Vec<(&NormalizedComponent, String)> = components
        .iter()
        .filter(|c| c.is_cnc())
        .map(|c| (c, c.clean_instance_type.to_uppercase()))
        .collect();

    // One lookup per distinct operation code
    let mut codes: Vec<&'static str> = machined.iter().map(|(_, op)| operation_code(op)).collect();
    codes.sort_unstable();
    codes.dedup();

    let entries = try_join_all(codes.iter().map(|code| catalog.cnc_operation_by_code(code))).await?;

    let mut warnings = Vec::new();
    let prices: BTreeMap<&str, f64> = codes
        .iter()
        .zip(entries)
        .map(|(code, entry)| {
            let price = match entry {
                Some(entry) => entry.price_or(DEFAULT_CNC_PRICE),
                None => {
                    warnings.push(fallback_warning(
                        CatalogKind::CncOperation,
                        code,
                        DEFAULT_CNC_PRICE,
                    ));
                    DEFAULT_CNC_PRICE
                }
            };
            (*code, price)
        })
        .collect();

    let items = machined
        .into_iter()
        .map(|(component, operation)| {
            let unit_price = prices
                .get(operation_code(&operation))
                .copied()
                .unwrap_or(DEFAULT_CNC_PRICE);
            item(
                round(unit_price * component.quantity(), 0),
                format!("CNC - {}", component.raw.name),
                "piece",
                component.quantity(),
                Some(operation),
            )
        })
        .collect();

    Ok(Calculated::new(
        CostCategory::new(CategoryKind::Cnc, items),
        warnings,
    ))
}
