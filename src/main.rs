mod cli;
mod config;
mod engine;
mod process;
mod runner;
mod script;

use anyhow::Result;
use config::Config;
use engine::RProcessEngine;
use is_terminal::IsTerminal;
use runner::{Mode, PlotRunner};
use script::Curve;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    // stdout carries only the plot path; diagnostics go to stderr.
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cfg = Config::load();
    debug!(config = %cfg.config_path.display(), "configuration loaded");

    // CLI overrides config
    let curve = Curve::parse(&args.curve.clone().unwrap_or_else(|| cfg.curve()))?;
    let mode = Mode::from_flags(args.display, args.display_only);
    debug!(curve = curve.expr(), ?mode, "plot requested");

    let runner = PlotRunner::new(
        RProcessEngine::new(cfg.r_binary()),
        curve,
        cfg.display_device(),
    );
    let mut stdout = std::io::stdout().lock();
    runner.run(&args.r_args, mode, &mut stdout).await
}
