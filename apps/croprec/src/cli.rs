//! # CLI Commands
//!
//! `croprec serve | predict | report | info`.
//!
//! Each `cmd_*` function is callable on its own so the integration tests can
//! drive it without spawning a process.

use crate::api::{AppState, create_router};
use crate::config::{
    DEFAULT_HOST, DEFAULT_MODEL_DIR, DEFAULT_PORT, DEFAULT_RATE_LIMIT, ServerConfig,
};
use crate::report::{Report, display_crop, format_with_unit, render_pdf};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use croprec_core::sample::{MAX_TEXT_LEN, sanitize_text};
use croprec_core::{ModelArtifact, ModelInfo, PredictionResult, SoilReadings, SoilSample};
use std::error::Error;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub type CliResult<T> = Result<T, Box<dyn Error>>;

// =============================================================================
// ARGUMENTS
// =============================================================================

/// Crop recommendation from soil and climate readings.
#[derive(Parser, Debug)]
#[command(name = "croprec", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Serve {
        #[arg(long, env = "CROPREC_HOST", default_value = DEFAULT_HOST)]
        host: String,

        #[arg(long, env = "CROPREC_PORT", default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Directory holding rf_model.json and label_encoder.json
        #[arg(long, env = "CROPREC_MODEL_DIR", default_value = DEFAULT_MODEL_DIR)]
        model_dir: PathBuf,

        /// Requests per second on the prediction routes (0 disables)
        #[arg(long, env = "CROPREC_RATE_LIMIT", default_value_t = DEFAULT_RATE_LIMIT)]
        rate_limit: u32,
    },

    /// Predict a crop for one set of readings
    Predict {
        #[command(flatten)]
        readings: ReadingArgs,

        #[arg(long, env = "CROPREC_MODEL_DIR", default_value = DEFAULT_MODEL_DIR)]
        model_dir: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Write a PDF report for readings and a crop label
    Report {
        #[command(flatten)]
        readings: ReadingArgs,

        /// Crop label printed on the report
        #[arg(long)]
        crop: String,

        /// Output PDF path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Describe the model artifact
    Info {
        #[arg(long, env = "CROPREC_MODEL_DIR", default_value = DEFAULT_MODEL_DIR)]
        model_dir: PathBuf,

        #[arg(long)]
        json: bool,
    },
}

/// The seven readings as command-line flags.
#[derive(Args, Debug, Clone, Copy)]
pub struct ReadingArgs {
    /// Nitrogen, kg/ha
    #[arg(long = "n")]
    pub nitrogen: f64,

    /// Phosphorus, kg/ha
    #[arg(long = "p")]
    pub phosphorus: f64,

    /// Potassium, kg/ha
    #[arg(long = "k")]
    pub potassium: f64,

    /// Temperature, °C
    #[arg(long, allow_hyphen_values = true)]
    pub temperature: f64,

    /// Relative humidity, %
    #[arg(long)]
    pub humidity: f64,

    #[arg(long)]
    pub ph: f64,

    /// Rainfall, mm
    #[arg(long)]
    pub rainfall: f64,
}

impl From<ReadingArgs> for SoilReadings {
    fn from(args: ReadingArgs) -> Self {
        Self {
            nitrogen: args.nitrogen,
            phosphorus: args.phosphorus,
            potassium: args.potassium,
            temperature: args.temperature,
            humidity: args.humidity,
            ph: args.ph,
            rainfall: args.rainfall,
        }
    }
}

impl ReadingArgs {
    pub fn to_sample(self) -> CliResult<SoilSample> {
        Ok(SoilSample::try_from(SoilReadings::from(self))?)
    }
}

// =============================================================================
// COMMANDS
// =============================================================================

/// Dispatch a parsed command line.
pub async fn run(cli: Cli) -> CliResult<()> {
    match cli.command {
        Commands::Serve {
            host,
            port,
            model_dir,
            rate_limit,
        } => {
            cmd_serve(ServerConfig {
                host,
                port,
                model_dir,
                rate_limit_per_second: rate_limit,
            })
            .await
        }
        Commands::Predict {
            readings,
            model_dir,
            json,
        } => {
            let result = cmd_predict(&model_dir, &readings.to_sample()?)?;
            print_prediction(&result, json)
        }
        Commands::Report {
            readings,
            crop,
            output,
        } => cmd_report(&output, &crop, &readings.to_sample()?),
        Commands::Info { model_dir, json } => {
            let info = cmd_info(&model_dir)?;
            print_info(&info, json)
        }
    }
}

/// Load the artifact and serve until Ctrl-C.
pub async fn cmd_serve(config: ServerConfig) -> CliResult<()> {
    let model = ModelArtifact::load_files(&config.model_path(), &config.encoder_path())?;
    info!(
        "Loaded model from {:?}: {} trees, {} classes",
        config.model_dir,
        model.forest().n_trees(),
        model.decoder().len()
    );

    let state = AppState::new(Some(model)).with_rate_limit(config.rate_limit_per_second);
    let app = create_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("croprec v{} listening on http://{}", env!("CARGO_PKG_VERSION"), addr);
    if config.rate_limit_per_second == 0 {
        warn!("rate limiting disabled");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {e}");
    }
}

/// Predict with the artifact in `model_dir`.
pub fn cmd_predict(model_dir: &Path, sample: &SoilSample) -> CliResult<PredictionResult> {
    let model = ModelArtifact::load(model_dir)?;
    Ok(model.predict(sample)?)
}

/// Render a PDF report to `output`.
pub fn cmd_report(output: &Path, crop: &str, sample: &SoilSample) -> CliResult<()> {
    let crop = sanitize_text(crop, MAX_TEXT_LEN);
    if crop.is_empty() {
        return Err("crop label must not be empty".into());
    }

    let report = Report::new(crop, *sample, Local::now().naive_local());
    let bytes = render_pdf(&report)?;
    std::fs::write(output, &bytes)?;
    println!("Wrote {} ({} bytes)", output.display(), bytes.len());
    Ok(())
}

/// Describe the artifact in `model_dir`.
pub fn cmd_info(model_dir: &Path) -> CliResult<ModelInfo> {
    Ok(ModelArtifact::load(model_dir)?.info())
}

// =============================================================================
// OUTPUT
// =============================================================================

fn print_prediction(result: &PredictionResult, json: bool) -> CliResult<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        print!("{}", prediction_text(result));
    }
    Ok(())
}

fn print_info(info: &ModelInfo, json: bool) -> CliResult<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(info)?);
    } else {
        print!("{}", info_text(info));
    }
    Ok(())
}

/// Human-readable prediction summary.
pub fn prediction_text(result: &PredictionResult) -> String {
    let total: usize = result.votes.iter().map(|v| v.votes).sum();
    let mut out = format!(
        "Recommended crop: {}\nConfidence: {}% of {} trees\n",
        display_crop(&result.crop),
        result.confidence_percent,
        total
    );

    out.push_str("Input:\n");
    for (field, value) in result.input.iter() {
        out.push_str(&format!(
            "  {}: {}\n",
            field.label(),
            format_with_unit(field, value)
        ));
    }

    if result.votes.len() > 1 {
        out.push_str("Votes:\n");
        for share in &result.votes {
            out.push_str(&format!("  {}: {}\n", share.crop, share.votes));
        }
    }
    out
}

/// Human-readable artifact summary.
pub fn info_text(info: &ModelInfo) -> String {
    format!(
        "Model: {}\nTrees: {} ({} nodes, max depth {})\nFeatures: {}\nClasses ({}): {}\n",
        info.model_type,
        info.n_trees,
        info.total_nodes,
        info.max_depth,
        info.features.join(", "),
        info.n_classes,
        info.classes.join(", ")
    )
}
