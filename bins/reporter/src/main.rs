//! Propledger reporter
//!
//! Runs one analysis and exports its report archive.
//!
//! Usage:
//!   propledger buildings <id,id,...> <YYYY-MM> <YYYY-MM> [--charts]
//!   propledger project <id> <YYYY-MM> <YYYY-MM> [--charts]

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use propledger_client::{ApiClient, cache};
use propledger_export::{AnalysisPipeline, ArchiveSink, PipelineSettings, renderer_for};
use propledger_shared::AppConfig;
use propledger_shared::types::{AnalysisPeriod, BuildingId, PeriodError, ProjectId, YearMonth};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use validator::Validate;

#[derive(Debug, Parser)]
#[command(name = "propledger")]
#[command(about = "Profitability report export for buildings and projects")]
#[command(version)]
struct Cli {
    /// Print chart data as JSON before exporting
    #[arg(long, global = true)]
    charts: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
enum Commands {
    /// Analyse a selection of buildings
    Buildings {
        /// Comma-separated building IDs
        #[arg(value_delimiter = ',', num_args = 1, required = true, action = clap::ArgAction::Set, value_parser = building_id)]
        ids: Vec<BuildingId>,

        /// First month (YYYY-MM)
        start: YearMonth,

        /// Last month (YYYY-MM)
        end: YearMonth,
    },

    /// Analyse a construction project
    Project {
        /// Project ID
        id: ProjectId,

        /// First month (YYYY-MM)
        start: YearMonth,

        /// Last month (YYYY-MM)
        end: YearMonth,
    },
}

impl Commands {
    fn period(&self) -> Result<AnalysisPeriod, PeriodError> {
        match self {
            Self::Buildings { start, end, .. } | Self::Project { start, end, .. } => {
                AnalysisPeriod::new(*start, *end)
            }
        }
    }
}

fn building_id(raw: &str) -> Result<BuildingId, String> {
    let id = raw.trim();
    if id.is_empty() {
        return Err("empty building ID".to_string());
    }
    Ok(BuildingId::new(id))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "propledger=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let period = cli.command.period()?;

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    let client = Arc::new(ApiClient::from_config(&config.api)?);
    let sink = ArchiveSink::from_provider(&config.storage)?;
    info!(
        api = %config.api.base_url,
        storage = sink.provider_name(),
        format = ?config.export.document_format,
        "Reporter configured"
    );

    let pipeline = AnalysisPipeline::new(
        client,
        cache::from_config(&config.cache),
        renderer_for(&config.export),
        PipelineSettings::from_config(&config)?,
    )
    .with_sink(sink);

    let run = match &cli.command {
        Commands::Buildings { ids, .. } => pipeline.analyze_buildings(ids, period).await,
        Commands::Project { id, .. } => pipeline.analyze_project(id, period).await,
    };

    if cli.charts {
        println!("{}", serde_json::to_string_pretty(&run.charts())?);
    }

    let outcome = pipeline.export(&run).await?;
    for warning in &outcome.archive.warnings {
        warn!("{warning}");
    }
    println!(
        "{}",
        outcome
            .location
            .as_deref()
            .unwrap_or(&outcome.archive.filename)
    );

    Ok(())
}
