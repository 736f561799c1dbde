//! idfgen CLI - generate building energy models from templates
//!
//! Lists the template catalog and applies building specifications (JSON)
//! to templates, writing customized IDF models.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use idfgen::TemplateCatalog;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use commands::Context;
use config::Config;

#[derive(Parser)]
#[command(name = "idfgen")]
#[command(about = "Generate EnergyPlus building models from templates", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path (default: ./idfgen.toml if present)
    #[arg(short, long, env = "IDFGEN_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Template catalog directory
    #[arg(short, long, env = "IDFGEN_TEMPLATES", global = true)]
    templates: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available templates
    List {
        /// Only templates tagged with this building type
        #[arg(short, long)]
        building_type: Option<String>,
    },
    /// Show one template's metadata
    Show {
        /// Template id
        id: String,
    },
    /// Generate a model from a building specification
    Generate {
        /// Building specification (JSON)
        #[arg(short, long)]
        spec: PathBuf,
        /// Template id (default: chosen by building type)
        #[arg(long)]
        template: Option<String>,
        /// Output file (default: <output dir>/<project>_<timestamp>.idf)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate models for several specifications in parallel
    Batch {
        /// Building specifications (JSON)
        #[arg(required = true)]
        specs: Vec<PathBuf>,
        /// Output directory (default from config)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
        /// Template id applied to every specification
        #[arg(long)]
        template: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().without_time().with_writer(std::io::stderr))
        .init();

    let config = Config::load(cli.config.as_deref())?;
    let templates_dir = cli.templates.unwrap_or_else(|| config.templates_dir());
    let mut ctx = Context {
        catalog: TemplateCatalog::load(&templates_dir),
        output_dir: config.output_dir(),
        default_building_type: config.default_building_type,
    };

    match cli.command {
        Commands::List { building_type } => commands::list(&ctx, building_type.as_deref()),
        Commands::Show { id } => commands::show(&ctx, &id),
        Commands::Generate {
            spec,
            template,
            output,
            json,
        } => commands::generate(&ctx, &spec, template.as_deref(), output, json),
        Commands::Batch {
            specs,
            output_dir,
            template,
        } => {
            if let Some(dir) = output_dir {
                ctx.output_dir = dir;
            }
            commands::batch(&ctx, &specs, template.as_deref())
        }
    }
}
