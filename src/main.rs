use anyhow::Result;
use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use std::io;
use std::path::PathBuf;

mod brief;
mod bundle;
mod commands;
mod config;
mod gather;
mod ingest;

use config::{Config, Overrides, Settings};

#[derive(Parser)]
#[command(name = "site-bundler")]
#[command(
    about = "Aggregate the active site brief and source documents into a single markdown file"
)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    paths: PathArgs,

    /// Config file to use instead of site-bundler.toml / the user config
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct PathArgs {
    /// Directory containing source material to ingest [default: source]
    #[arg(long)]
    source_dir: Option<PathBuf>,

    /// YAML or text file describing the desired website [default: request/site-brief.yaml]
    #[arg(long)]
    request_file: Option<PathBuf>,

    /// Destination markdown file that consolidates the inputs [default: build/context-bundle.md]
    #[arg(long)]
    output: Option<PathBuf>,
}

impl From<PathArgs> for Overrides {
    fn from(args: PathArgs) -> Self {
        Self {
            source_dir: args.source_dir,
            request_file: args.request_file,
            output: args.output,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the resolved settings
    Show,
    /// Write site-bundler.toml with the defaults
    Init,
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match verbose {
        0 => "warn",
        1 => "site_bundler=debug",
        _ => "site_bundler=trace",
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(Commands::Config { action }) => match action {
            ConfigAction::Show => {
                let settings = Settings::load(cli.paths.into(), cli.config.as_deref())?;
                commands::config::show(&settings);
            }
            ConfigAction::Init => {
                let path = cli
                    .config
                    .unwrap_or_else(|| PathBuf::from(Config::LOCAL_FILE));
                commands::config::init(&path)?;
            }
        },
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut io::stdout());
        }
        None => {
            let settings = Settings::load(cli.paths.into(), cli.config.as_deref())?;
            commands::build::run(&settings)?;
        }
    }

    Ok(())
}
