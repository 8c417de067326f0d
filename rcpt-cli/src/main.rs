use anyhow::{bail, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use rcpt_ingest::{discover_receipts, PdfExtractor};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod config;
mod llm;
mod llm_stream;
mod pipeline;
mod prompt;
mod version;

use config::Config;
use llm::OllamaClient;
use pipeline::Pipeline;

#[derive(Parser, Debug)]
#[command(
    name = "rcptpixie",
    version = version::VERSION,
    about = "Rename PDF receipts using a local Ollama model",
    args_conflicts_with_subcommands = true,
    after_help = "Examples:\n  rcptpixie receipt.pdf\n  rcptpixie --model llama3.2 ./receipts/\n  rcptpixie --verbose --dry-run receipt.pdf"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(Args, Debug, Default)]
struct RunArgs {
    /// PDF file or directory of receipts
    path: Option<PathBuf>,

    /// Ollama model to use (default: config ollama.model, then llama3.2)
    #[arg(long)]
    model: Option<String>,

    /// Ollama base URL (default: http://localhost:11434)
    #[arg(long)]
    host: Option<String>,

    /// Sampling temperature
    #[arg(long)]
    temperature: Option<f32>,

    /// Files processed concurrently
    #[arg(long, short = 'j')]
    jobs: Option<usize>,

    /// Expect Check-in/Check-out Date labels and MM/DD/YYYY dates
    #[arg(long, default_value_t = false)]
    legacy_format: bool,

    /// Show what would be renamed without touching any file
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Enable verbose logging
    #[arg(long, short = 'v', default_value_t = false)]
    verbose: bool,

    /// Skip the Ollama availability checks
    #[arg(long, default_value_t = false)]
    skip_checks: bool,

    /// Config file (default: ~/.rcptpixie/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Config file helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommand,

        /// Config file (default: ~/.rcptpixie/config.toml)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config file if none exists
    Init,
    /// Print the effective config
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Config { command, path }) => match command {
            ConfigCommand::Init => config::init_config(path.as_deref())?,
            ConfigCommand::Show => {
                let cfg = config::load_config(path.as_deref())?;
                print!("{}", toml::to_string_pretty(&cfg)?);
            }
        },
        None => {
            let Some(path) = cli.run.path.clone() else {
                Cli::command().print_help()?;
                return Ok(());
            };
            init_tracing(cli.run.verbose);
            let cfg = apply_overrides(config::load_config(cli.run.config.as_deref())?, &cli.run);
            run(path, &cfg, &cli.run).await?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn apply_overrides(mut cfg: Config, args: &RunArgs) -> Config {
    if let Some(m) = &args.model {
        cfg.ollama.model = m.clone();
    }
    if let Some(h) = &args.host {
        cfg.ollama.base_url = h.clone();
    }
    if let Some(t) = args.temperature {
        cfg.ollama.temperature = t;
    }
    if let Some(j) = args.jobs {
        cfg.run.jobs = j;
    }
    if args.legacy_format {
        cfg.parser.legacy_format = true;
    }
    cfg
}

async fn run(path: PathBuf, cfg: &Config, args: &RunArgs) -> Result<()> {
    tracing::info!(model = %cfg.ollama.model, path = %path.display(), "starting");

    let client = OllamaClient::new(&cfg.ollama);
    if !args.skip_checks {
        if !client.is_running().await {
            bail!(
                "Ollama is not running at {}. Start it with `ollama serve`",
                client.base_url()
            );
        }
        if !client.has_model().await {
            bail!(
                "model '{}' is not available. Pull it with `ollama pull {}`",
                client.model(),
                client.model()
            );
        }
    }

    let single_file = path.is_file();
    let receipts = discover_receipts(&path)?;
    tracing::info!(count = receipts.len(), "found receipts");

    let pipeline = Pipeline::new(Arc::new(PdfExtractor::new()), client, cfg.parser.schema())
        .dry_run(args.dry_run);
    let summary = pipeline.run(receipts, cfg.run.jobs).await;

    if single_file {
        if let Some((p, msg)) = summary.failed.first() {
            bail!("error processing {}: {}", p.display(), msg);
        }
        return Ok(());
    }

    println!(
        "\nRenamed {} | unchanged {} | failed {}",
        summary.renamed,
        summary.unchanged,
        summary.failed.len()
    );
    Ok(())
}
