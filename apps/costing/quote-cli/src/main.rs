//! Quote CLI
//!
//! Prices a cabinetry cut-part list against a catalog file and prints the
//! full calculation result as JSON.

use clap::{Parser, Subcommand};
use core_config::tracing::{init_tracing, install_color_eyre};
use core_config::{Environment, FromEnv};
use domain_costing::rollup::resolve_config;
use domain_costing::{
    CatalogGateway, CategoryKind, CostCalculationService, CostingSettings, PricingConfigOverride,
};
use eyre::Result;
use std::path::PathBuf;
use tracing::{info, warn};

mod input;

#[derive(Parser)]
#[command(name = "quote")]
#[command(about = "Estimate the cost and sale price of a cabinetry project")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate a quote
    Calculate {
        /// Catalog JSON (materials, edge banding, CNC operations, fittings, pricing config)
        #[arg(short, long)]
        catalog: PathBuf,

        /// Components JSON: an array of parts or {"project": .., "components": [..]}
        #[arg(short = 'i', long)]
        components: PathBuf,

        /// Waste fraction (0.15 = 15%). Defaults to COSTING_WASTE_PERCENTAGE.
        #[arg(short, long)]
        waste: Option<f64>,

        #[arg(long)]
        project_name: Option<String>,

        #[arg(long)]
        client: Option<String>,

        /// Contract date, free text
        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        enable_cutting: bool,

        #[arg(long)]
        enable_painting: bool,

        /// Replace the catalog's profit margin for this quote
        #[arg(long)]
        profit_margin: Option<f64>,

        /// Replace the catalog's contingency for this quote
        #[arg(long)]
        contingency: Option<f64>,

        /// Print Prometheus metrics to stderr when done
        #[arg(long)]
        metrics: bool,
    },

    /// Show the effective settings and pricing config
    Config {
        /// Read the pricing config from this catalog instead of using defaults
        #[arg(short, long)]
        catalog: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();

    let environment = Environment::from_env();
    init_tracing(&environment);

    let settings = CostingSettings::from_env()?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Calculate {
            catalog,
            components,
            waste,
            project_name,
            client,
            date,
            enable_cutting,
            enable_painting,
            profit_margin,
            contingency,
            metrics,
        } => {
            if metrics {
                observability::init_metrics()?;
            }

            let mut settings = settings;
            if enable_cutting {
                settings.enabled.set(CategoryKind::Cutting, true);
            }
            if enable_painting {
                settings.enabled.set(CategoryKind::Painting, true);
            }
            let waste = waste.unwrap_or(settings.waste_percentage);

            let input = input::read_components(&components)?;
            let mut project = input.project.unwrap_or_default();
            if let Some(name) = project_name {
                project.project_name = name;
            }
            if let Some(client) = client {
                project.client_name = client;
            }
            if let Some(date) = date {
                project.contract_date = date;
            }

            let catalog = input::read_catalog(&catalog)?;
            let service = CostCalculationService::new(catalog, settings);

            info!(
                components = input.components.len(),
                waste, "Calculating quote"
            );

            let pricing_override = PricingConfigOverride {
                profit_margin,
                contingency,
                ..Default::default()
            };
            let result = if pricing_override == PricingConfigOverride::default() {
                service.calculate(&input.components, project, waste).await?
            } else {
                service
                    .calculate_with_override(&input.components, project, waste, pricing_override)
                    .await?
            };

            for warning in &result.warnings {
                warn!(kind = %warning.kind, key = %warning.key, "{}", warning.message);
            }
            info!(
                subtotal = result.financial_summary.subtotal,
                final_price = result.financial_summary.final_price,
                "Quote ready"
            );

            println!("{}", serde_json::to_string_pretty(&result)?);

            if metrics {
                eprintln!("{}", observability::render_metrics());
            }
        }

        Commands::Config { catalog } => {
            let loaded = match catalog {
                Some(path) => input::read_catalog(&path)?.active_pricing_config().await?,
                None => None,
            };
            let pricing = resolve_config(loaded, None);

            let report = serde_json::json!({
                "settings": settings,
                "pricingConfig": pricing,
                "percentages": pricing.breakdown_percentages(),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
