//! Fittings calculator
//!
//! Hardware is inferred from part names. Every component is matched against
//! every rule in [`RULES`]; one part can pull in several fittings. Quantities
//! are aggregated per fitting code across the whole project before pricing,
//! so each code yields exactly one line.

use futures::future::try_join_all;

use super::{fallback_warning, item};
use crate::catalog::CatalogGateway;
use crate::error::CostingResult;
use crate::models::{Calculated, CatalogKind, CategoryKind, CostCategory, NormalizedComponent};
use crate::spreadsheet::round;

/// A fitting with the price list values used when the catalog misses it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FittingSpec {
    pub code: &'static str,
    pub description: &'static str,
    pub unit: &'static str,
    pub default_price: f64,
}

pub const HINGE: FittingSpec = FittingSpec {
    code: "FITTING-1",
    description: "لولا گازور -آرام بند",
    unit: "عدد",
    default_price: 200_000.0,
};

pub const HANDLE: FittingSpec = FittingSpec {
    code: "FITTING-10",
    description: "دستکیره کابینت",
    unit: "عدد",
    default_price: 450_000.0,
};

pub const LEG: FittingSpec = FittingSpec {
    code: "FITTING-19",
    description: "پایه 14 سانتی",
    unit: "عدد",
    default_price: 120_000.0,
};

pub const HANGER: FittingSpec = FittingSpec {
    code: "FITTING-12",
    description: "جا آویز لباس",
    unit: "عدد",
    default_price: 200_000.0,
};

pub const LIFT: FittingSpec = FittingSpec {
    code: "FITTING-9",
    description: "جک 120",
    unit: "عدد",
    default_price: 250_000.0,
};

const fn rail(code: &'static str, default_price: f64) -> FittingSpec {
    FittingSpec {
        code,
        description: "ریل ساچمه ای",
        unit: "جفت",
        default_price,
    }
}

/// Drawer rail tiers by minimum drawer width (mm), widest first
pub const DRAWER_RAILS: &[(f64, FittingSpec)] = &[
    (500.0, rail("FITTING-3", 700_000.0)),
    (450.0, rail("FITTING-4", 600_000.0)),
    (400.0, rail("FITTING-5", 550_000.0)),
    (350.0, rail("FITTING-6", 500_000.0)),
    (300.0, rail("FITTING-7", 450_000.0)),
];

/// Rail for drawers narrower than every tier
pub const SMALLEST_RAIL: FittingSpec = rail("FITTING-8", 400_000.0);

/// Rail tier for a drawer width
pub fn rail_for_width(width: f64) -> FittingSpec {
    DRAWER_RAILS
        .iter()
        .find(|(min_width, _)| width >= *min_width)
        .map(|(_, spec)| *spec)
        .unwrap_or(SMALLEST_RAIL)
}

/// How a rule picks its fitting
#[derive(Debug, Clone, Copy)]
pub enum FittingSelector {
    Fixed(FittingSpec),
    DrawerRailByWidth,
}

impl FittingSelector {
    fn select(&self, component: &NormalizedComponent) -> FittingSpec {
        match self {
            FittingSelector::Fixed(spec) => *spec,
            FittingSelector::DrawerRailByWidth => rail_for_width(component.raw.width),
        }
    }
}

/// Lower-cased name and instance type, joined by a space
pub struct MatchText<'a> {
    pub text: String,
    pub component: &'a NormalizedComponent,
}

impl<'a> MatchText<'a> {
    pub fn new(component: &'a NormalizedComponent) -> Self {
        Self {
            text: format!(
                "{} {}",
                component.raw.name.to_lowercase(),
                component.raw.instance_type.to_lowercase()
            ),
            component,
        }
    }

    fn contains_any(&self, tokens: &[&str]) -> bool {
        tokens.iter().any(|token| self.text.contains(token))
    }
}

const DOOR_TOKENS: &[&str] = &["door", "درب"];
const DRAWER_TOKENS: &[&str] = &["drawer", "کشو"];
const CABINET_TOKENS: &[&str] = &["cabinet", "کابینت"];
const BASE_TOKENS: &[&str] = &["base", "پایه"];
const HANGER_TOKENS: &[&str] = &["hanger", "آویز"];
const LIFT_TOKENS: &[&str] = &["lift", "jack", "جک"];

/// Shelves larger than this (m² per piece) stand on legs
const SHELF_LEG_MIN_AREA: f64 = 0.5;

fn is_door(m: &MatchText) -> bool {
    m.contains_any(DOOR_TOKENS)
}

fn is_drawer(m: &MatchText) -> bool {
    m.contains_any(DRAWER_TOKENS)
}

fn is_cabinet_body(m: &MatchText) -> bool {
    m.contains_any(CABINET_TOKENS) && !is_door(m) && !is_drawer(m)
}

fn needs_legs(m: &MatchText) -> bool {
    m.contains_any(BASE_TOKENS)
        || (m.text.contains("shelf") && m.component.raw.area > SHELF_LEG_MIN_AREA)
}

fn is_hanger(m: &MatchText) -> bool {
    m.contains_any(HANGER_TOKENS)
}

fn is_lift(m: &MatchText) -> bool {
    m.contains_any(LIFT_TOKENS)
}

/// One heuristic: when `applies`, add `multiplier × quantity` of each fitting
pub struct FittingRule {
    pub name: &'static str,
    pub applies: fn(&MatchText) -> bool,
    pub fittings: &'static [FittingSelector],
    pub multiplier: f64,
}

pub const RULES: &[FittingRule] = &[
    FittingRule {
        name: "door hinges",
        applies: is_door,
        fittings: &[FittingSelector::Fixed(HINGE)],
        multiplier: 2.0,
    },
    FittingRule {
        name: "drawer rails and handle",
        applies: is_drawer,
        fittings: &[
            FittingSelector::DrawerRailByWidth,
            FittingSelector::Fixed(HANDLE),
        ],
        multiplier: 1.0,
    },
    FittingRule {
        name: "cabinet handle",
        applies: is_cabinet_body,
        fittings: &[FittingSelector::Fixed(HANDLE)],
        multiplier: 1.0,
    },
    FittingRule {
        name: "legs",
        applies: needs_legs,
        fittings: &[FittingSelector::Fixed(LEG)],
        multiplier: 4.0,
    },
    FittingRule {
        name: "hanging rail",
        applies: is_hanger,
        fittings: &[FittingSelector::Fixed(HANGER)],
        multiplier: 1.0,
    },
    FittingRule {
        name: "lift mechanism",
        applies: is_lift,
        fittings: &[FittingSelector::Fixed(LIFT)],
        multiplier: 1.0,
    },
];

/// Aggregated quantity per fitting, in first-seen order
pub fn aggregate(components: &[NormalizedComponent]) -> Vec<(FittingSpec, f64)> {
    let mut totals: Vec<(FittingSpec, f64)> = Vec::new();

    for component in components {
        let text = MatchText::new(component);

        for rule in RULES.iter().filter(|rule| (rule.applies)(&text)) {
            tracing::trace!(component = %component.raw.name, rule = rule.name, "Fitting rule matched");

            for selector in rule.fittings {
                let spec = selector.select(component);
                let quantity = rule.multiplier * component.quantity();

                match totals.iter_mut().find(|(known, _)| known.code == spec.code) {
                    Some((_, total)) => *total += quantity,
                    None => totals.push((spec, quantity)),
                }
            }
        }
    }

    totals
}

pub async fn calculate<C>(
    catalog: &C,
    components: &[NormalizedComponent],
) -> CostingResult<Calculated<CostCategory>>
where
    C: CatalogGateway + ?Sized,
{
    let totals = aggregate(components);
    let entries =
        try_join_all(totals.iter().map(|(spec, _)| catalog.fitting_by_code(spec.code))).await?;

    let mut warnings = Vec::new();
    let items = totals
        .into_iter()
        .zip(entries)
        .map(|((spec, quantity), entry)| match entry {
            Some(entry) => {
                let unit_price = entry.price_or(spec.default_price);
                item(
                    round(unit_price * quantity, 0),
                    entry.description,
                    entry.unit,
                    quantity,
                    Some(spec.code.to_string()),
                )
            }
            None => {
                warnings.push(fallback_warning(
                    CatalogKind::Fitting,
                    spec.code,
                    spec.default_price,
                ));
                item(
                    round(spec.default_price * quantity, 0),
                    spec.description,
                    spec.unit,
                    quantity,
                    Some(spec.code.to_string()),
                )
            }
        })
        .collect();

    Ok(Calculated::new(
        CostCategory::new(CategoryKind::Fittings, items),
        warnings,
    ))
}
