// CLI commands for running the bundle task from the pipeline binary

use crate::bundler::EsbuildBundler;
use crate::cache::{BundleCache, ModulePathCache};
use crate::context::BuildContext;
use crate::events::EventBus;
use crate::task::BundleTask;
use anyhow::Result;
use clap::Subcommand;
use std::path::PathBuf;
use std::sync::Arc;

/// Bundle task subcommands, embedded in the pipeline CLI
#[derive(Subcommand, Debug)]
pub enum BundleCommands {
    /// Bundle the application once and write the result to the build directory
    Run {
        /// Explicit bundler config file (default: bundle.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Build output directory
        #[arg(long, default_value = "dist")]
        build_dir: PathBuf,

        /// Temp directory substituted for the {tmp} placeholder
        #[arg(long, default_value = ".tmp")]
        tmp_dir: PathBuf,

        /// Production build (skips the in-bundle source transform)
        #[arg(long)]
        production: bool,
    },
}

impl BundleCommands {
    /// Execute the bundle command
    pub async fn run(self) -> Result<()> {
        match self {
            BundleCommands::Run {
                config,
                build_dir,
                tmp_dir,
                production,
            } => Self::run_cmd(config, build_dir, tmp_dir, production).await,
        }
    }

    async fn run_cmd(
        config: Option<PathBuf>,
        build_dir: PathBuf,
        tmp_dir: PathBuf,
        production: bool,
    ) -> Result<()> {
        let mut ctx = BuildContext::new(build_dir, tmp_dir);
        ctx.production = production;

        let task = BundleTask::new(
            Arc::new(EsbuildBundler::new()?),
            Arc::new(BundleCache::new()),
            Arc::new(ModulePathCache::new()),
            Arc::new(EventBus::new()),
        );

        task.run(&ctx, config.as_deref()).await?;
        tracing::info!(modules = ctx.module_files().len(), "bundle task finished");
        Ok(())
    }
}

/// Install the default tracing subscriber for standalone runs.
///
/// The embedding pipeline normally owns subscriber setup; this is for using
/// the task directly from a thin binary.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
