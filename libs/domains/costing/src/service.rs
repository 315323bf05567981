use chrono::Utc;
use observability::CostingMetrics;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::calculators::{
    cnc, cutting, edge_banding, fittings, material, painting, plate, wood_tooling,
};
use crate::catalog::CatalogGateway;
use crate::config::CostingSettings;
use crate::error::{CostingError, CostingResult};
use crate::models::{
    CalculationResult, Calculated, CategoryKind, CostBreakdown, CostCategory, LookupWarning,
    MaterialCosts, PricingConfig, PricingConfigOverride, ProjectMeta, RawComponent,
};
use crate::normalizer::{ProcessingStats, normalize};
use crate::rollup::{resolve_config, summarize};

/// Runs the full pipeline: normalize → eight calculators → roll-up
#[derive(Clone)]
pub struct CostCalculationService<C: CatalogGateway> {
    catalog: Arc<C>,
    settings: CostingSettings,
}

impl<C: CatalogGateway> CostCalculationService<C> {
    pub fn new(catalog: C, settings: CostingSettings) -> Self {
        Self::from_shared(Arc::new(catalog), settings)
    }

    pub fn from_shared(catalog: Arc<C>, settings: CostingSettings) -> Self {
        Self { catalog, settings }
    }

    pub fn settings(&self) -> &CostingSettings {
        &self.settings
    }

    /// Calculate a quote with the catalog's active pricing config
    pub async fn calculate(
        &self,
        components: &[RawComponent],
        project: ProjectMeta,
        waste_pct: f64,
    ) -> CostingResult<CalculationResult> {
        self.run(components, project, waste_pct, None).await
    }

    /// Calculate a quote, replacing individual percentages of the loaded config
    pub async fn calculate_with_override(
        &self,
        components: &[RawComponent],
        project: ProjectMeta,
        waste_pct: f64,
        pricing_override: PricingConfigOverride,
    ) -> CostingResult<CalculationResult> {
        pricing_override.validate()?;
        self.run(components, project, waste_pct, Some(&pricing_override))
            .await
    }

    #[instrument(
        skip(self, components, project, pricing_override),
        fields(components = components.len(), project = %project.project_name)
    )]
    async fn run(
        &self,
        components: &[RawComponent],
        project: ProjectMeta,
        waste_pct: f64,
        pricing_override: Option<&PricingConfigOverride>,
    ) -> CostingResult<CalculationResult> {
        if !waste_pct.is_finite() || waste_pct < 0.0 {
            return Err(CostingError::InvalidInput(format!(
                "waste percentage must be a non-negative number, got {waste_pct}"
            )));
        }

        let timer = CostingMetrics::start_calculation();
        let outcome = self.price(components, waste_pct, pricing_override).await;

        let (costs, summary_config, warnings) = match outcome {
            Ok(priced) => priced,
            Err(err) => {
                CostingMetrics::record_calculation_failed(&err.to_string());
                return Err(err);
            }
        };

        let financial_summary = summarize(costs.totals(), &summary_config);
        let duration_ms = timer.finish(financial_summary.final_price);

        for warning in &warnings {
            CostingMetrics::record_lookup_fallback(&warning.kind.to_string());
        }

        tracing::info!(
            subtotal = financial_summary.subtotal,
            final_price = financial_summary.final_price,
            warnings = warnings.len(),
            duration_ms,
            "Cost calculation completed"
        );

        Ok(CalculationResult {
            calculation_id: Uuid::now_v7(),
            project: project.into(),
            costs,
            financial_summary,
            warnings,
            calculated_at: Utc::now(),
            version: self.settings.version.clone(),
        })
    }

    /// Normalize, run the enabled calculators concurrently and load the config
    async fn price(
        &self,
        components: &[RawComponent],
        waste_pct: f64,
        pricing_override: Option<&PricingConfigOverride>,
    ) -> CostingResult<(CostBreakdown, PricingConfig, Vec<LookupWarning>)> {
        let normalized = normalize(components, waste_pct);
        let stats = ProcessingStats::collect(&normalized);
        tracing::debug!(?stats, "Components normalized");

        let catalog = self.catalog.as_ref();
        let enabled = &self.settings.enabled;
        let parts = normalized.as_slice();

        let material = async {
            if enabled.is_enabled(CategoryKind::Material) {
                material::calculate(catalog, parts).await
            } else {
                Ok(Calculated::clean(MaterialCosts {
                    costs: CostCategory::empty(CategoryKind::Material),
                    total_area: 0.0,
                    total_quantity: 0,
                }))
            }
        };
        let cutting = async {
            if enabled.is_enabled(CategoryKind::Cutting) {
                cutting::calculate(catalog, parts).await
            } else {
                Ok(disabled(CategoryKind::Cutting))
            }
        };
        let cnc = async {
            if enabled.is_enabled(CategoryKind::Cnc) {
                cnc::calculate(catalog, parts).await
            } else {
                Ok(disabled(CategoryKind::Cnc))
            }
        };
        let edge_banding = async {
            if enabled.is_enabled(CategoryKind::EdgeBanding) {
                edge_banding::calculate(catalog, parts).await
            } else {
                Ok(disabled(CategoryKind::EdgeBanding))
            }
        };
        let fittings = async {
            if enabled.is_enabled(CategoryKind::Fittings) {
                fittings::calculate(catalog, parts).await
            } else {
                Ok(disabled(CategoryKind::Fittings))
            }
        };
        let plate = async {
            if enabled.is_enabled(CategoryKind::Plate) {
                plate::calculate(catalog, parts).await
            } else {
                Ok(disabled(CategoryKind::Plate))
            }
        };

        let (material, cutting, cnc, edge_banding, fittings, plate, loaded_config) = futures::try_join!(
            material,
            cutting,
            cnc,
            edge_banding,
            fittings,
            plate,
            catalog.active_pricing_config(),
        )?;

        let painting = if enabled.is_enabled(CategoryKind::Painting) {
            painting::calculate(parts, self.settings.painting_price_per_m2)
        } else {
            CostCategory::empty(CategoryKind::Painting)
        };
        let wood_tooling = if enabled.is_enabled(CategoryKind::WoodTooling) {
            wood_tooling::calculate(parts)
        } else {
            CostCategory::empty(CategoryKind::WoodTooling)
        };

        let warnings = [
            material.warnings,
            cutting.warnings,
            cnc.warnings,
            edge_banding.warnings,
            fittings.warnings,
            plate.warnings,
        ]
        .concat();

        let costs = CostBreakdown {
            material: material.costs,
            cutting: cutting.costs,
            cnc: cnc.costs,
            edge_banding: edge_banding.costs,
            fittings: fittings.costs,
            painting,
            plate: plate.costs,
            wood_tooling,
        };

        Ok((costs, resolve_config(loaded_config, pricing_override), warnings))
    }
}

fn disabled(kind: CategoryKind) -> Calculated<CostCategory> {
    Calculated::clean(CostCategory::empty(kind))
}
