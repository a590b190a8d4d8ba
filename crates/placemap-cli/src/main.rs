//! Command-line interface for placemap
//!
//! Loads GeoJSON files as named datasets, runs one analysis tool against
//! them and prints the tool output.
//!
//! # Usage
//!
//! ```bash
//! placemap-cli list
//!
//! placemap-cli run findPlace \
//!     --dataset placeSearch_1=places.geojson \
//!     --dataset spatialJoin_1=join.geojson \
//!     --args '{"placesDatasetName":"placeSearch_1","spatialFilterDatasetName":"spatialJoin_1"}'
//! ```

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use geojson::{Feature, GeoJson};
use placemap_analysis::{AnalysisConfig, DatasetStore, create_tools};
use placemap_core::{Dataset, DatasetName};
use placemap_utils::Config;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "placemap-cli")]
#[command(about = "Run placemap analysis tools against local GeoJSON datasets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the definitions of every available tool
    List,
    /// Run a tool and print its output as JSON
    Run {
        /// Tool name, e.g. findPlace or buyHouse
        tool: String,

        /// Dataset to load before the call, as NAME=PATH (repeatable)
        #[arg(short, long = "dataset", value_name = "NAME=PATH")]
        datasets: Vec<DatasetArg>,

        /// Tool arguments as a JSON object
        #[arg(short, long, default_value = "{}")]
        args: String,
    },
}

/// A `NAME=PATH` dataset argument
#[derive(Debug, Clone, PartialEq)]
struct DatasetArg {
    name: String,
    path: PathBuf,
}

impl FromStr for DatasetArg {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.split_once('=') {
            Some((name, path)) if !name.trim().is_empty() && !path.trim().is_empty() => Ok(Self {
                name: name.trim().to_string(),
                path: PathBuf::from(path.trim()),
            }),
            _ => Err(format!("expected NAME=PATH, got '{value}'")),
        }
    }
}

/// Read a GeoJSON file as a dataset
///
/// A FeatureCollection is taken as is; a single Feature or Geometry becomes a
/// one-feature dataset.
async fn load_dataset(path: &Path) -> anyhow::Result<Dataset> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let geojson = GeoJson::from_str(&text)
        .with_context(|| format!("Failed to parse GeoJSON in {}", path.display()))?;

    Ok(match geojson {
        GeoJson::FeatureCollection(collection) => Dataset::GeoJson(collection),
        GeoJson::Feature(feature) => Dataset::from_features(vec![feature]),
        GeoJson::Geometry(geometry) => Dataset::from_features(vec![Feature::from(geometry)]),
    })
}

async fn run_tool(
    config: &AnalysisConfig,
    tool: &str,
    datasets: &[DatasetArg],
    args: &str,
) -> anyhow::Result<()> {
    let params: serde_json::Value =
        serde_json::from_str(args).context("--args must be a JSON object")?;
    if !params.is_object() {
        bail!("--args must be a JSON object");
    }

    let store = DatasetStore::from_config(config)?;
    for dataset in datasets {
        let loaded = load_dataset(&dataset.path).await?;
        info!(dataset = %dataset.name, features = loaded.len(), "Loaded dataset");
        store.insert(DatasetName::new(dataset.name.as_str()), loaded).await;
    }

    let registry = create_tools(store, config);
    let output = registry.execute(tool, params).await?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_config = Config::from_env();
    placemap_utils::init_tracing_with(&app_config);

    let cli = Cli::parse();
    let config = AnalysisConfig::default().with_env()?;

    info!(environment = %app_config.environment, "Starting placemap-cli");

    match cli.command {
        Commands::List => {
            let registry = create_tools(DatasetStore::from_config(&config)?, &config);
            let definitions = serde_json::Value::Array(registry.definitions());
            println!("{}", serde_json::to_string_pretty(&definitions)?);
        }
        Commands::Run {
            tool,
            datasets,
            args,
        } => run_tool(&config, &tool, &datasets, &args).await?,
    }

    Ok(())
}
