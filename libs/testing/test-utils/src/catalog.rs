//! Seeded price list used across the costing tests

use domain_costing::{CatalogDocument, CatalogRecord, InMemoryCatalog};

pub const MDF_16: &str = "ام دی اف 16 میل";
pub const MDF_3: &str = "ام دی اف 3 میل";
pub const HIGH_GLOSS_18: &str = "هایگلاس 18 میل";

pub const MDF_16_PRICE: f64 = 22_000_000.0;
pub const MDF_3_PRICE: f64 = 4_200_000.0;
pub const HIGH_GLOSS_18_PRICE: f64 = 26_000_000.0;
pub const EDGE_PRICE: f64 = 85_000.0;
pub const DRILL_PRICE: f64 = 150_000.0;
pub const ROUTE_PRICE: f64 = 350_000.0;
pub const COMPLEX_PRICE: f64 = 500_000.0;
pub const CUT_PRICE: f64 = 3_000.0;

/// Every table filled; no pricing config so defaults apply
pub fn seeded_document() -> CatalogDocument {
    CatalogDocument {
        materials: vec![
            CatalogRecord::new("MAT-001", MDF_16, "متر مربع", MDF_16_PRICE)
                .with_aliases(&["MDF 16mm", "MDF16"]),
            CatalogRecord::new("MAT-002", MDF_3, "متر مربع", MDF_3_PRICE)
                .with_aliases(&["MDF 3mm"]),
            CatalogRecord::new("MAT-003", HIGH_GLOSS_18, "متر مربع", HIGH_GLOSS_18_PRICE)
                .with_aliases(&["High Gloss 18mm"]),
            CatalogRecord::new("MAT-900", "چوب طبیعی", "متر مربع", 40_000_000.0).inactive(),
        ],
        edge_banding: vec![CatalogRecord::new("EDGE001", "نوار لبه PVC", "متر", EDGE_PRICE)],
        cnc_operations: vec![
            CatalogRecord::new("CNC001", "سوراخکاری", "عدد", DRILL_PRICE),
            CatalogRecord::new("CNC002", "فرز کاری", "عدد", ROUTE_PRICE),
            CatalogRecord::new("CNC003", "برش پیچیده", "عدد", COMPLEX_PRICE),
            CatalogRecord::new("CUT001", "برش", "متر", CUT_PRICE),
        ],
        fittings: vec![
            CatalogRecord::new("FITTING-1", "لولا گازور -آرام بند", "عدد", 200_000.0),
            CatalogRecord::new("FITTING-3", "ریل ساچمه ای 50", "جفت", 700_000.0),
            CatalogRecord::new("FITTING-4", "ریل ساچمه ای 45", "جفت", 600_000.0),
            CatalogRecord::new("FITTING-5", "ریل ساچمه ای 40", "جفت", 550_000.0),
            CatalogRecord::new("FITTING-6", "ریل ساچمه ای 35", "جفت", 500_000.0),
            CatalogRecord::new("FITTING-7", "ریل ساچمه ای 30", "جفت", 450_000.0),
            CatalogRecord::new("FITTING-8", "ریل ساچمه ای 25", "جفت", 400_000.0),
            CatalogRecord::new("FITTING-9", "جک 120", "عدد", 250_000.0),
            CatalogRecord::new("FITTING-10", "دستکیره کابینت", "عدد", 450_000.0),
            CatalogRecord::new("FITTING-12", "جا آویز لباس", "عدد", 200_000.0),
            CatalogRecord::new("FITTING-19", "پایه 14 سانتی", "عدد", 120_000.0),
        ],
        pricing_config: None,
    }
}

pub fn seeded_catalog() -> InMemoryCatalog {
    InMemoryCatalog::from_document(seeded_document())
}

/// A catalog with no entries at all; every lookup misses
pub fn empty_catalog() -> InMemoryCatalog {
    InMemoryCatalog::new()
}
