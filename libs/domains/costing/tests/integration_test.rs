//! Integration tests for the Costing domain
//!
//! These run the full pipeline against the seeded in-memory catalog:
//! - Roll-up invariants hold for realistic projects
//! - Reference scenarios reproduce the quote sheet figures
//! - Catalog misses degrade to fallback prices with warnings
//! - Catalog changes are visible on the next calculation

use domain_costing::calculators::{edge_banding, material};
use domain_costing::rollup::summarize;
use domain_costing::*;
use test_utils::catalog::{self, MDF_3, MDF_16, HIGH_GLOSS_18};
use test_utils::{ComponentBuilder, TestDataBuilder, assertions::*};

fn service(catalog: InMemoryCatalog) -> CostCalculationService<InMemoryCatalog> {
    CostCalculationService::new(catalog, CostingSettings::default())
}

fn kitchen() -> Vec<RawComponent> {
    vec![
        ComponentBuilder::new("Cabinet side")
            .size(720.0, 560.0)
            .quantity(4)
            .edges(1, "PVC")
            .build(),
        ComponentBuilder::new("Cabinet Door")
            .material(HIGH_GLOSS_18)
            .size(700.0, 400.0)
            .quantity(2)
            .instance("CNC-Drill")
            .edges(4, "PVC")
            .build(),
        ComponentBuilder::new("Drawer Front")
            .material(HIGH_GLOSS_18)
            .size(180.0, 460.0)
            .quantity(3)
            .instance("CNC-Route")
            .edges(4, "PVC")
            .build(),
        ComponentBuilder::new("Back panel")
            .material(MDF_3)
            .size(720.0, 560.0)
            .thickness(3.0)
            .quantity(2)
            .build(),
        ComponentBuilder::new("Base shelf")
            .size(900.0, 560.0)
            .quantity(1)
            .build(),
    ]
}

// ============================================================================
// Roll-up invariants
// ============================================================================

#[tokio::test]
async fn test_sum_invariant() {
    let builder = TestDataBuilder::from_test_name("sum_invariant");
    let result = service(catalog::seeded_catalog())
        .calculate(&kitchen(), builder.project(), 0.0)
        .await
        .unwrap();

    let summary = &result.financial_summary;
    let breakdown = summary.breakdown;

    assert_eq!(summary.subtotal, breakdown.sum());
    assert_eq!(breakdown.material, result.costs.material.costs.total_cost);
    assert_eq!(breakdown.wood_tooling, result.costs.wood_tooling.total_cost);
    assert!(summary.subtotal > 0.0);
    assert!(summary.total_with_overheads > summary.subtotal);
    assert!(summary.final_price > summary.total_with_overheads);

    // Category totals are whole amounts
    for total in [
        breakdown.material,
        breakdown.cnc,
        breakdown.edge_banding,
        breakdown.fittings,
        breakdown.plate,
        breakdown.wood_tooling,
    ] {
        assert_eq!(total, total.round());
    }
}

#[tokio::test]
async fn test_overhead_linearity_and_profit_formula() {
    let result = service(catalog::seeded_catalog())
        .calculate(&kitchen(), ProjectMeta::default(), 0.0)
        .await
        .unwrap();

    let config = PricingConfig::default();
    let summary = result.financial_summary;
    let overheads = summary.overheads;
    let subtotal = summary.subtotal;

    assert_amount(overheads.overhead1, subtotal * config.overhead1, "overhead1");
    assert_amount(overheads.overhead2, subtotal * config.overhead2, "overhead2");
    assert_amount(overheads.overhead3, subtotal * config.overhead3, "overhead3");
    assert_amount(overheads.overhead4, subtotal * config.overhead4, "overhead4");
    assert_amount(overheads.contingency, subtotal * config.contingency, "contingency");
    assert_amount(
        overheads.total_overheads,
        overheads.overhead1
            + overheads.overhead2
            + overheads.overhead3
            + overheads.overhead4
            + overheads.contingency,
        "total overheads",
    );
    assert_amount(
        summary.profit_amount,
        summary.total_with_overheads * config.profit_margin,
        "profit",
    );
    assert_amount(
        summary.final_price,
        summary.total_with_overheads + summary.profit_amount,
        "final price",
    );
    assert_eq!(summary.profit_percentage, 0.22);
}

#[tokio::test]
async fn test_inverse_roll_up() {
    let result = service(catalog::seeded_catalog())
        .calculate(&kitchen(), ProjectMeta::default(), 0.1)
        .await
        .unwrap();

    let config = PricingConfig::default();
    let final_price = result.financial_summary.final_price;
    let subtotal = config.subtotal_from_final_price(final_price);

    assert_amount(subtotal, result.financial_summary.subtotal, "recovered subtotal");
    assert_amount(
        config.final_price_from_subtotal(subtotal),
        final_price,
        "recomputed final price",
    );
}

#[test]
fn test_roll_up_reference_scenario() {
    let breakdown = domain_costing::models::CategoryTotals {
        material: 10_000_000.0,
        ..Default::default()
    };
    let summary = summarize(breakdown, &PricingConfig::default());

    assert_amount(summary.overheads.overhead1, 2_500_000.0, "overhead1");
    assert_amount(summary.overheads.overhead2, 400_000.0, "overhead2");
    assert_amount(summary.overheads.overhead3, 200_000.0, "overhead3");
    assert_amount(summary.overheads.overhead4, 200_000.0, "overhead4");
    assert_amount(summary.overheads.contingency, 250_000.0, "contingency");
    assert_amount(summary.overheads.total_overheads, 3_550_000.0, "total overheads");
    assert_amount(summary.total_with_overheads, 13_550_000.0, "total with overheads");
    assert_amount(summary.profit_amount, 2_981_000.0, "profit");
    assert_amount(summary.final_price, 16_531_000.0, "final price");
}

// ============================================================================
// Category scenarios
// ============================================================================

#[tokio::test]
async fn test_material_reference_scenario() {
    let components = vec![
        ComponentBuilder::new("Side")
            .material(MDF_16)
            .area(0.24)
            .quantity(2)
            .build(),
    ];
    let result = service(catalog::seeded_catalog())
        .calculate(&components, ProjectMeta::default(), 0.0)
        .await
        .unwrap();

    assert_eq!(result.costs.material.costs.total_cost, 10_560_000.0);
    assert_eq!(result.costs.material.total_area, 0.48);
    assert_eq!(result.costs.material.total_quantity, 1);
}

#[tokio::test]
async fn test_grouping_conservation() {
    let components = kitchen();
    let normalized = normalize(&components, 0.0);
    let costs = material::calculate(&catalog::seeded_catalog(), &normalized)
        .await
        .unwrap()
        .costs;

    let grouped: f64 = costs.costs.items.iter().map(|item| item.quantity).sum();
    let direct: f64 = normalized.iter().map(|c| c.sum_area).sum();

    assert_close(grouped, direct, 1e-9, "grouped area");
    assert_eq!(costs.total_quantity, components.len() as u64);
    assert_eq!(costs.costs.items.len(), 3);
}

#[tokio::test]
async fn test_door_gets_one_hinge_line() {
    let components = vec![
        ComponentBuilder::new("Cabinet Door")
            .size(700.0, 400.0)
            .quantity(2)
            .build(),
    ];
    let result = service(catalog::seeded_catalog())
        .calculate(&components, ProjectMeta::default(), 0.0)
        .await
        .unwrap();

    let hinges: Vec<_> = result
        .costs
        .fittings
        .items
        .iter()
        .filter(|item| item.code.as_deref() == Some("FITTING-1"))
        .collect();

    assert_eq!(hinges.len(), 1);
    assert_eq!(hinges[0].quantity, 4.0);
    assert_eq!(hinges[0].cost, 800_000.0);
}

#[tokio::test]
async fn test_four_banded_edges() {
    let components = vec![
        ComponentBuilder::new("Side")
            .size(600.0, 400.0)
            .quantity(1)
            .edges(4, "PVC")
            .build(),
    ];
    let normalized = normalize(&components, 0.0);
    let result = edge_banding::calculate(&catalog::seeded_catalog(), &normalized)
        .await
        .unwrap();

    // (600 + 400) / 1000 per banded edge, four edges
    let line = &result.costs.items[0];
    assert_eq!(line.quantity, 4.0);
    assert_eq!(line.unit, "m");
    assert_eq!(line.cost, 4.0 * catalog::EDGE_PRICE);
}

#[tokio::test]
async fn test_plate_by_thickness_and_keyword() {
    let result = service(catalog::seeded_catalog())
        .calculate(&kitchen(), ProjectMeta::default(), 0.0)
        .await
        .unwrap();

    let plate = &result.costs.plate;
    assert_eq!(plate.items.len(), 1);
    assert_eq!(plate.items[0].description, format!("Plate - {MDF_3}"));
    // 2 × 0.4032 m² at the catalog price
    assert_eq!(plate.total_cost, (0.8064 * catalog::MDF_3_PRICE).round());
}

#[tokio::test]
async fn test_cnc_and_wood_tooling_for_kitchen() {
    let result = service(catalog::seeded_catalog())
        .calculate(&kitchen(), ProjectMeta::default(), 0.0)
        .await
        .unwrap();

    let cnc = &result.costs.cnc;
    assert_eq!(cnc.items.len(), 2);
    assert_eq!(
        cnc.total_cost,
        2.0 * catalog::DRILL_PRICE + 3.0 * catalog::ROUTE_PRICE
    );

    // Base + two extra materials + two CNC parts
    assert_eq!(result.costs.wood_tooling.total_cost, 500_000.0 + 100_000.0 + 40_000.0);
}

// ============================================================================
// Baselines, fallbacks and configuration
// ============================================================================

#[tokio::test]
async fn test_zero_input_baseline() {
    let result = service(catalog::seeded_catalog())
        .calculate(&[], ProjectMeta::default(), 0.0)
        .await
        .unwrap();

    let breakdown = result.financial_summary.breakdown;
    assert_eq!(breakdown.material, 0.0);
    assert_eq!(breakdown.cutting, 0.0);
    assert_eq!(breakdown.cnc, 0.0);
    assert_eq!(breakdown.edge_banding, 0.0);
    assert_eq!(breakdown.fittings, 0.0);
    assert_eq!(breakdown.painting, 0.0);
    assert_eq!(breakdown.plate, 0.0);
    assert_eq!(breakdown.wood_tooling, 500_000.0);
    assert!(result.warnings.is_empty());
}

#[tokio::test]
async fn test_inert_components_do_not_crash() {
    let components = vec![
        ComponentBuilder::new("Ghost").quantity(0).size(600.0, 400.0).build(),
        ComponentBuilder::new("Flat").area(0.0).build(),
    ];
    let result = service(catalog::seeded_catalog())
        .calculate(&components, ProjectMeta::default(), 0.0)
        .await
        .unwrap();

    assert_eq!(result.costs.material.costs.total_cost, 0.0);
    assert_eq!(result.financial_summary.breakdown.wood_tooling, 500_000.0);
}

#[tokio::test]
async fn test_empty_catalog_falls_back_everywhere() {
    let result = service(catalog::empty_catalog())
        .calculate(&kitchen(), ProjectMeta::default(), 0.0)
        .await
        .unwrap();

    let kinds: Vec<_> = result.warnings.iter().map(|w| w.kind).collect();
    assert!(kinds.contains(&CatalogKind::Material));
    assert!(kinds.contains(&CatalogKind::CncOperation));
    assert!(kinds.contains(&CatalogKind::EdgeBanding));
    assert!(kinds.contains(&CatalogKind::Fitting));

    // No active materials: material groups are skipped, the rest use fallbacks
    assert_eq!(result.costs.material.costs.total_cost, 0.0);
    assert!(result.costs.cnc.total_cost > 0.0);
    assert!(result.costs.plate.total_cost > 0.0);
    assert!(result.financial_summary.final_price > 0.0);
}

#[tokio::test]
async fn test_config_change_visible_on_next_calculation() {
    let shared = catalog::seeded_catalog();
    let service = CostCalculationService::new(shared.clone(), CostingSettings::default());
    let components = kitchen();

    let before = service
        .calculate(&components, ProjectMeta::default(), 0.0)
        .await
        .unwrap();

    shared
        .set_pricing_config(Some(PricingConfig {
            profit_margin: 0.5,
            ..Default::default()
        }))
        .await;

    let after = service
        .calculate(&components, ProjectMeta::default(), 0.0)
        .await
        .unwrap();

    assert_eq!(before.financial_summary.profit_percentage, 0.22);
    assert_eq!(after.financial_summary.profit_percentage, 0.5);
    assert_eq!(before.financial_summary.subtotal, after.financial_summary.subtotal);
    assert!(after.financial_summary.final_price > before.financial_summary.final_price);
}

#[tokio::test]
async fn test_idempotent_except_identity_and_timestamp() {
    let builder = TestDataBuilder::from_test_name("idempotent");
    let service = service(catalog::seeded_catalog());
    let components = kitchen();

    let first = service
        .calculate(&components, builder.project(), 0.15)
        .await
        .unwrap();
    let second = service
        .calculate(&components, builder.project(), 0.15)
        .await
        .unwrap();

    assert_ne!(first.calculation_id, second.calculation_id);
    assert_eq!(first.project, second.project);
    assert_eq!(first.costs, second.costs);
    assert_eq!(first.financial_summary, second.financial_summary);
    assert_eq!(first.warnings, second.warnings);
    assert_eq!(
        serde_json::to_string(&first.costs).unwrap(),
        serde_json::to_string(&second.costs).unwrap()
    );
}

#[tokio::test]
async fn test_envelope_json_shape() {
    let result = service(catalog::seeded_catalog())
        .calculate(&kitchen(), ProjectMeta::default(), 0.0)
        .await
        .unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert!(json["financialSummary"]["finalPrice"].is_number());
    assert_eq!(json["costs"]["cnc"]["category"], "CNC");
    assert_eq!(json["costs"]["material"]["category"], "Material");
    assert!(json["costs"]["material"]["totalArea"].is_number());
    assert_eq!(json["version"], "1.0.0");
}

#[tokio::test]
async fn test_json_catalog_drives_the_quote() {
    let json = r#"{
        "materials": [
            {"code": "MAT-001", "name": "MDF", "unit": "m2", "unitPrice": 1000000, "persianNames": ["ام دی اف"]}
        ],
        "pricingConfig": {
            "overhead1": 0.0, "overhead2": 0.0, "overhead3": 0.0,
            "overhead4": 0.0, "contingency": 0.0, "profitMargin": 0.1
        }
    }"#;
    let catalog = InMemoryCatalog::from_json(json).unwrap();
    let components = vec![
        ComponentBuilder::new("Side")
            .material("ام دی اف")
            .area(0.5)
            .quantity(2)
            .build(),
    ];

    let result = service(catalog)
        .calculate(&components, ProjectMeta::default(), 0.0)
        .await
        .unwrap();
    let summary = result.financial_summary;

    assert_eq!(result.costs.material.costs.total_cost, 1_000_000.0);
    assert_eq!(result.costs.material.costs.items[0].description, "MDF");
    assert_eq!(summary.subtotal, 1_500_000.0);
    assert_amount(summary.final_price, 1_650_000.0, "final price");
}
