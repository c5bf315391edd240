use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use configuration::SettingsOverrides;
use core_types::{AllocationPolicy, BiometrySample, LotId};
use engine::{Collaborators, LotAnalyticsEngine};
use providers::InMemoryFarmStore;
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod output;

/// The main entry point for the Aquafarm lot analytics tool.
fn main() -> Result<()> {
    // Load environment overrides (e.g. AQUAFARM__SURVIVAL_ASSUMPTION) from a .env file, if present.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let _log_guard = init_logging(cli.verbose);

    let settings = configuration::load_settings()
        .context("Failed to load analytics settings")?
        .with_overrides(&cli.overrides)?;

    let store = InMemoryFarmStore::load(&cli.data)
        .with_context(|| format!("Failed to load farm snapshot {}", cli.data.display()))?;
    let engine = LotAnalyticsEngine::new(settings, Collaborators::from_store(Arc::new(store)));

    run(&engine, cli.command, cli.json)
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Growth, cost and harvest analytics for shrimp cultivation lots.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON snapshot of the farm records to analyse.
    #[arg(long, default_value = "farm.json", global = true)]
    data: PathBuf,

    /// Print results as JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    overrides: SettingsOverrides,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cost breakdown, shares and per-unit costs of a lot.
    Costs(LotArgs),
    /// Profit, ROI and margin of a harvested lot.
    Roi(LotArgs),
    /// Indicators a new biometry sample would receive.
    Growth(GrowthArgs),
    /// Observed daily gain between consecutive biometries.
    Curve(LotArgs),
    /// Projected weight, biomass, revenue and profit on a target date.
    Project(ProjectArgs),
    /// Suggested harvest date within the cultivation window.
    HarvestDate(HarvestDateArgs),
    /// Split a shared cost across lots.
    Allocate(AllocateArgs),
    /// Final survival, FCA and productivity of a harvested lot.
    Performance(LotArgs),
}

#[derive(Parser)]
struct LotArgs {
    #[arg(long)]
    lot: LotId,
}

#[derive(Parser)]
struct GrowthArgs {
    #[arg(long)]
    lot: LotId,

    /// Measurement date (format: YYYY-MM-DD).
    #[arg(long)]
    date: NaiveDate,

    /// Average individual weight in grams.
    #[arg(long)]
    weight: Decimal,

    /// Number of shrimp in the sample.
    #[arg(long)]
    count: u32,

    /// Total weight of the sample in grams, if it was weighed as a batch.
    #[arg(long)]
    sample_weight: Option<Decimal>,
}

#[derive(Parser)]
struct ProjectArgs {
    #[arg(long)]
    lot: LotId,

    /// Target harvest date (format: YYYY-MM-DD).
    #[arg(long)]
    target: NaiveDate,

    /// Sale price per kilogram. Revenue and profit are projected only when given.
    #[arg(long)]
    price: Option<Decimal>,
}

#[derive(Parser)]
struct HarvestDateArgs {
    #[arg(long)]
    lot: LotId,

    /// Evaluate as of this date instead of today.
    #[arg(long)]
    on: Option<NaiveDate>,
}

#[derive(Parser)]
struct AllocateArgs {
    /// The shared cost to split.
    #[arg(long)]
    total: Decimal,

    /// Comma-separated lot ids; leftover cents go to the first ones.
    #[arg(long, value_delimiter = ',', required = true)]
    lots: Vec<LotId>,

    /// equal, days or biomass.
    #[arg(long, default_value = "equal")]
    policy: AllocationPolicy,
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn run(engine: &LotAnalyticsEngine, command: Commands, json: bool) -> Result<()> {
    match command {
        Commands::Costs(args) => {
            let report = output::CostReport {
                breakdown: engine.cost_breakdown(args.lot)?,
                percentages: engine.cost_percentages(args.lot)?,
                cost_per_kg: engine.cost_per_kg(args.lot)?,
                cost_per_shrimp: engine.cost_per_shrimp(args.lot)?,
                average_daily_cost: engine.average_daily_cost(args.lot)?,
            };
            emit(json, &report, output::cost_table)
        }
        Commands::Roi(args) => match engine.roi(args.lot)? {
            Some(roi) => emit(json, &roi, output::roi_table),
            None => {
                tracing::info!(lot_id = args.lot, "Lot has no harvest yet, ROI is not available.");
                Ok(())
            }
        },
        Commands::Growth(args) => {
            let sample = BiometrySample {
                measurement_date: args.date,
                average_weight: args.weight,
                sampled_count: args.count,
                sampled_total_weight: args.sample_weight,
            };
            let biometry = engine.create_biometry(args.lot, &sample)?;
            emit(json, &biometry, output::biometry_table)
        }
        Commands::Curve(args) => {
            let curve = engine.growth_curve(args.lot)?;
            emit(json, &curve, |c| output::curve_table(c))
        }
        Commands::Project(args) => {
            let weight = engine.project_average_weight(args.lot, args.target)?;
            let biomass = engine.project_biomass_at_harvest(args.lot, args.target)?;
            let profit = args
                .price
                .map(|price| engine.project_profit_at_harvest(args.lot, args.target, price))
                .transpose()?;
            let report = output::ProjectionReport {
                target_date: args.target,
                projected_weight_g: weight,
                projected_biomass_kg: biomass,
                profit,
            };
            emit(json, &report, output::projection_table)
        }
        Commands::HarvestDate(args) => {
            let on = args.on.unwrap_or_else(|| Local::now().date_naive());
            let suggestion = engine.suggest_harvest_date(args.lot, on)?;
            emit(json, &suggestion, output::suggestion_table)
        }
        Commands::Allocate(args) => {
            let shares = engine.allocate_shared_cost(args.total, &args.lots, args.policy)?;
            emit(json, &shares, |s| output::shares_table(s))
        }
        Commands::Performance(args) => match engine.harvest_performance(args.lot)? {
            Some(performance) => emit(json, &performance, output::performance_table),
            None => {
                tracing::info!(lot_id = args.lot, "Lot has no harvest yet.");
                Ok(())
            }
        },
    }
}

/// Prints `value` either as pretty JSON or through its table renderer.
fn emit<T, F>(json: bool, value: &T, table: F) -> Result<()>
where
    T: Serialize + ?Sized,
    F: Fn(&T) -> comfy_table::Table,
{
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", table(value));
    }
    Ok(())
}

/// Installs the global subscriber, writing to stderr through a non-blocking writer
/// so tables and JSON on stdout stay clean. The guard must live until exit.
fn init_logging(verbose: bool) -> tracing_appender::non_blocking::WorkerGuard {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_target(false)
                .compact(),
        )
        .init();

    guard
}
