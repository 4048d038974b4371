use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use recommender_app::platform::config::DEFAULT_CONFIG_FILE;
use recommender_app::platform::{
    logging, render, upload, JobLayout, Orchestrator, RecommenderConfig,
};
use recommender_core::AppState;
use recommender_engine::{EngineHandle, ReqwestGateway};
use recommender_logging::{rec_info, rec_warn};

/// Analyze a resume and suggest matching jobs.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Resume to analyze
    resume: Option<PathBuf>,

    /// Configuration file (RON)
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Overrides the service base URL from the config
    #[arg(long)]
    base_url: Option<String>,

    /// Overrides the job listing layout from the config
    #[arg(long, value_enum)]
    layout: Option<JobLayout>,

    /// Stop after the analysis
    #[arg(long)]
    skip_jobs: bool,

    /// Probe the service health endpoint and exit
    #[arg(long)]
    check: bool,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,

    /// How long to wait for each pipeline step
    #[arg(long, default_value_t = 180)]
    timeout_secs: u64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = RecommenderConfig::load(&cli.config)?;
    if let Some(base_url) = cli.base_url {
        config.gateway.base_url = base_url;
    }
    if let Some(layout) = cli.layout {
        config.jobs.layout = layout;
    }

    logging::initialize(config.logging.destination, config.logging.level_filter());
    rec_info!("Using service at {}", config.gateway.base_url);

    if cli.print_config {
        println!("{}", config.to_ron()?);
        return Ok(());
    }

    if cli.check {
        return check_health(&config);
    }

    let Some(resume) = cli.resume else {
        bail!("no resume given; pass a file path or use --check");
    };
    let document = upload::load_document(&resume)
        .with_context(|| format!("failed to read resume {}", resume.display()))?;

    let engine = EngineHandle::new(config.gateway_settings())?;
    let state = AppState::with_options(config.document_policy(), config.aggregate_options());
    let mut orchestrator = Orchestrator::new(state, engine);
    orchestrator.subscribe(|view| rec_info!("{}", render::status_line(view)));

    let timeout = Duration::from_secs(cli.timeout_secs);

    if let Err(err) = orchestrator.submit_document(document) {
        bail!("{}", err.user_message());
    }
    wait_for(&mut orchestrator, timeout)?;

    let view = orchestrator.snapshot();
    print!("{}", render::render_analysis(&view));
    if view.analysis.is_none() {
        bail!("analysis did not succeed");
    }
    if cli.skip_jobs {
        return Ok(());
    }

    if !orchestrator.request_recommendations() {
        rec_warn!("No summary available for recommendations");
        return Ok(());
    }
    wait_for(&mut orchestrator, timeout)?;
    print!("{}", render::render_recommendations(&orchestrator.snapshot()));
    Ok(())
}

fn wait_for(orchestrator: &mut Orchestrator, timeout: Duration) -> anyhow::Result<()> {
    if !orchestrator.run_until_idle(timeout) {
        bail!("gave up after {}s waiting for the service", timeout.as_secs());
    }
    Ok(())
}

fn check_health(config: &RecommenderConfig) -> anyhow::Result<()> {
    let gateway = ReqwestGateway::new(config.gateway_settings())?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;

    match runtime.block_on(gateway.health()) {
        Ok(()) => {
            println!("Service at {} is healthy", gateway.base_url());
            Ok(())
        }
        Err(err) => bail!("{}: {}", err.user_message(), err),
    }
}
