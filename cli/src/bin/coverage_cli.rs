use clap::{Parser, Subcommand};
use cli::{describe_outside, write_json_lines, OutputFormat, SurveyConfig};
use color_eyre::eyre::{eyre, Result};
use coverage::{DiscoveryStatus, FailurePolicy};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(author, version, about = "Find ground control points outside the coverage of a geotagged image set", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify control points against the image coverage
    Run {
        /// Path to a TOML or JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Directory holding the geotagged images
        #[arg(short, long)]
        image_dir: Option<PathBuf>,
        /// Control point CSV file (name, lat, lng)
        #[arg(short = 'p', long)]
        control_points: Option<PathBuf>,
        /// Accepted image extensions, comma separated
        #[arg(long, value_delimiter = ',')]
        extensions: Option<Vec<String>>,
        /// all_or_nothing or skip_and_log
        #[arg(long)]
        failure_policy: Option<FailurePolicy>,
        /// Per-image metadata read timeout in milliseconds
        #[arg(long)]
        read_timeout_ms: Option<u64>,
        /// Negate coordinates for S/W hemisphere references
        #[arg(long)]
        apply_hemisphere_ref: bool,
        /// text or json-lines
        #[arg(short, long, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Also write the coverage ring and classified points as GeoJSON
        #[arg(long)]
        geojson: Option<PathBuf>,
    },
    /// Write a configuration file with the default settings
    Init {
        /// Where to write the configuration
        #[arg(short, long, default_value = "coverage.toml")]
        output: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the JSON schema of the configuration file
    Schema,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            image_dir,
            control_points,
            extensions,
            failure_policy,
            read_timeout_ms,
            apply_hemisphere_ref,
            format,
            geojson,
        } => {
            let mut survey = match config {
                Some(path) => SurveyConfig::from_file(&path)?,
                None => SurveyConfig::default(),
            };
            if let Some(dir) = image_dir {
                survey.image_dir = dir.to_string_lossy().to_string();
            }
            if let Some(path) = control_points {
                survey.set_control_point_path(&path);
            }
            if let Some(extensions) = extensions {
                survey.image_extensions = extensions;
            }
            if let Some(policy) = failure_policy {
                survey.failure_policy = policy;
            }
            if read_timeout_ms.is_some() {
                survey.read_timeout_ms = read_timeout_ms;
            }
            survey.apply_hemisphere_ref |= apply_hemisphere_ref;

            run_survey(&survey, format, geojson.as_deref()).await?;
        }
        Commands::Init { output, force } => {
            if output.exists() && !force {
                return Err(eyre!("{:?} already exists (use --force to overwrite)", output));
            }
            SurveyConfig::default().to_toml_file(&output)?;
            info!("📄 Default configuration written to {:?}", output);
        }
        Commands::Schema => {
            println!("{}", serde_json::to_string_pretty(&SurveyConfig::schema())?);
        }
    }

    Ok(())
}

async fn run_survey(survey: &SurveyConfig, format: OutputFormat, geojson: Option<&Path>) -> Result<()> {
    let pipeline = survey.pipeline();
    info!("{}", pipeline.info());

    let report = pipeline.run().await?;

    if report.discovery_status == DiscoveryStatus::Unavailable {
        warn!("Image directory {:?} could not be listed", report.image_dir);
    }
    for image in &report.skipped_images {
        warn!("Image '{}' left out: {}", image.name, image.reason);
    }
    for row in &report.rejected_rows {
        warn!("Control point row {} skipped: {}", row.line, row.reason);
    }
    debug!("Image positions: {}", report.images_json()?);

    info!("🛰️  {} images formed the coverage ring", report.images.len());

    match format {
        OutputFormat::Text => {
            let mut outside = 0;
            for point in report.outside() {
                info!("❌ {}", describe_outside(point));
                outside += 1;
            }
            if outside == 0 {
                info!("✅ All {} control points are covered", report.control_points().len());
            }
        }
        OutputFormat::JsonLines => {
            write_json_lines(&report, &mut std::io::stdout().lock())?;
        }
    }

    if let Some(path) = geojson {
        report.save_geojson(path)?;
        info!("🗺️  GeoJSON written to {:?}", path);
    }

    Ok(())
}
