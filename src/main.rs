use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use bkp::cli::{self, CliContext};
use bkp::config::BkpPaths;

#[derive(Parser)]
#[command(
    name = "bkp",
    version,
    about = "Personal backup bookkeeping on S3",
    long_about = "bkp archives local directories to S3 together with a \
                  manifest describing why each backup was taken, and keeps \
                  a local catalog of every published backup."
)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// AWS CLI profile used for S3 access
    #[arg(long, global = true, env = "BKP_AWS_PROFILE")]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a manifest template pre-filled from the config
    Template,

    /// Validate a manifest file without uploading anything
    Validate {
        /// Path to the manifest YAML file
        file: PathBuf,
    },

    /// Archive and upload every backup described in a manifest file
    Create {
        /// Path to the manifest YAML file
        file: PathBuf,
        /// Keep going after a failed archive or upload step
        #[arg(long)]
        keep_going: bool,
    },

    /// Rebuild the local catalog from the remote manifests
    Sync,

    /// List backups in the local catalog
    #[command(alias = "ls")]
    List,

    /// Show one backup from the local catalog
    Show {
        /// List id or backup name
        backup: String,
    },

    /// Show current configuration and paths
    Config,

    /// Show recent audit log entries
    Log {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_logging(args.verbose);

    let paths = BkpPaths::new()?;
    let ctx = CliContext::new(paths, args.profile);

    match args.command {
        Commands::Template => cli::handle_template(&ctx)?,
        Commands::Validate { file } => cli::handle_validate(&ctx, &file)?,
        Commands::Create { file, keep_going } => cli::handle_create(&ctx, &file, keep_going)?,
        Commands::Sync => cli::handle_sync(&ctx)?,
        Commands::List => cli::handle_list(&ctx)?,
        Commands::Show { backup } => cli::handle_show(&ctx, &backup)?,
        Commands::Config => cli::handle_config(&ctx)?,
        Commands::Log { limit } => cli::handle_log(&ctx, limit)?,
    }

    Ok(())
}

/// Send diagnostics to stderr; `BKP_LOG` or `RUST_LOG` override the level
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = std::env::var("BKP_LOG")
        .ok()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
