use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use eyre::Result;
use testology_cli::commands::{self, ScoreRequest};
use testology_cli::config::{self, OutputFormat};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "testology",
    about = "Score psychological test submissions and generate their interpretation",
    version
)]
struct Cli {
    /// Config file (defaults to <config dir>/testology/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the built-in tests
    List {
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Check a scoring config without scoring anything
    Validate {
        /// Path to a scoring config JSON file
        path: PathBuf,
    },
    /// Score a submission and print its interpretation
    Score(ScoreArgs),
}

#[derive(Args, Debug)]
struct ScoreArgs {
    /// Test id, e.g. gad7
    #[arg(long)]
    test: String,
    /// JSON file with the answers
    #[arg(long)]
    answers: PathBuf,
    /// Scoring config to use instead of the built-in one
    #[arg(long)]
    scoring: Option<PathBuf>,
    /// Interpretation table to use instead of the built-in rules
    #[arg(long)]
    interpretation: Option<PathBuf>,
    /// Earlier result snapshot to combine with; repeatable
    #[arg(long = "with")]
    with: Vec<PathBuf>,
    /// Combine with every snapshot in the results directory
    #[arg(long)]
    with_saved: bool,
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
    /// Include the per-item breakdown
    #[arg(long)]
    trace: bool,
    /// Write a result snapshot to the results directory
    #[arg(long)]
    save: bool,
    /// Override the configured results directory
    #[arg(long)]
    results_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => config::default_path()?,
    };
    let loaded = config::load(&config_path)?;
    let mut settings = loaded.config;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if cli.log_json || settings.log_json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    if loaded.migrated {
        tracing::info!(path = %config_path.display(), "migrated config to current version");
        config::save(&settings, &config_path)?;
    }

    match cli.command {
        Command::List { format } => {
            print!("{}", commands::list(format.unwrap_or(settings.output))?);
        }
        Command::Validate { path } => {
            print!("{}", commands::validate(&path)?);
        }
        Command::Score(args) => {
            if args.results_dir.is_some() {
                settings.results_dir = args.results_dir;
            }
            let request = ScoreRequest {
                test: args.test,
                answers: args.answers,
                scoring: args.scoring,
                interpretation: args.interpretation,
                with: args.with,
                with_saved: args.with_saved,
                format: args.format,
                trace: args.trace,
                save: args.save,
            };
            let output = commands::score(&request, &settings)?;
            println!("{}", output.rendered);
            if let Some(path) = output.saved {
                eprintln!("saved {}", path.display());
            }
        }
    }

    Ok(())
}
