//! ReviewReply
//!
//! Sentiment analysis and automatic replies for customer reviews, served over
//! HTTP, with command line tools for deployment checks and dataset preparation.

use anyhow::{Context, Result};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use reviewreply_classifiers::ReviewProcessor;
use reviewreply_core::Review;
use reviewreply_responder::TextGenerator;
use reviewreply_server::cli::{Cli, Commands, DatasetCommands};
use reviewreply_server::{build_router, check, dataset, AppState, ReviewPipeline, ServeOverrides, ServiceConfig};
use reviewreply_telemetry::MetricsCollector;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    match cli.command {
        Commands::Serve {
            config,
            host,
            port,
            enable_ai_model,
            debug,
        } => {
            let overrides = ServeOverrides {
                host,
                port,
                enable_ai_model,
                debug,
            };
            serve(config.as_deref(), &overrides).await
        }

        Commands::Analyse { text, rating, config } => {
            let config = ServiceConfig::load(config.as_deref())?;
            let generator = load_generator(&config).await;
            let pipeline = Arc::new(ReviewPipeline::from_config(&config, generator, MetricsCollector::new())?);

            let review = Review::with_raw_rating(text, rating)?;
            let analysis = pipeline.analyse(review).await?;
            println!("{}", serde_json::to_string_pretty(&analysis)?);
            Ok(())
        }

        Commands::Check { target } => run_check(&target).await,

        Commands::Dataset { command } => run_dataset(command),
    }
}

async fn serve(config_path: Option<&Path>, overrides: &ServeOverrides) -> Result<()> {
    info!("Starting ReviewReply");

    let mut config = ServiceConfig::load(config_path)?;
    config.apply_overrides(overrides);
    info!("Configuration loaded successfully");
    info!("Generative replies: {}", if config.generation.enabled { "enabled" } else { "disabled" });
    info!("Debug endpoints: {}", config.server.debug);

    let metrics_handle = init_metrics()?;

    let generator = load_generator(&config).await;
    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .with_context(|| format!("Invalid listen address {}", config.bind_address()))?;

    let state = AppState::new(config, generator)?.with_metrics_handle(metrics_handle);
    info!("Mode: {}", state.mode());

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("ReviewReply listening on http://{}", addr);

    let shutdown = async {
        shutdown_signal().await;
        warn!("Shutdown signal received, stopping server...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Load the generative model when enabled; any failure leaves the service in template mode
#[cfg(feature = "ml-models")]
async fn load_generator(config: &ServiceConfig) -> Option<Arc<dyn TextGenerator>> {
    if !config.generation.enabled {
        return None;
    }

    info!("Loading generative model...");
    let settings = config.generation.model.clone();
    let loaded = tokio::task::spawn_blocking(move || reviewreply_responder::GenerativeModel::load(&settings)).await;

    match loaded {
        Ok(Ok(model)) => {
            info!(model = model.name(), "Generative model ready");
            Some(Arc::new(model))
        }
        Ok(Err(e)) => {
            warn!(error = %e, "Generative model unavailable, using template replies");
            None
        }
        Err(e) => {
            warn!(error = %e, "Model loading task failed, using template replies");
            None
        }
    }
}

#[cfg(not(feature = "ml-models"))]
async fn load_generator(config: &ServiceConfig) -> Option<Arc<dyn TextGenerator>> {
    if config.generation.enabled {
        warn!("Built without the ml-models feature, using template replies");
    }
    None
}

async fn run_check(target: &str) -> Result<()> {
    let report = check::run_check(target)
        .await
        .with_context(|| format!("Deployment at {target} is unreachable"))?;

    println!("Health: {} (version {}, mode {})", report.health.status, report.health.version, report.health.mode);
    for case in &report.cases {
        let status = match (&case.error, case.matched()) {
            (Some(error), _) => format!("FAILED: {error}"),
            (None, true) => "ok".to_string(),
            (None, false) => format!("mismatch (expected {}, got {:?})", case.expected, case.actual),
        };
        println!("  {:<15} {}", case.name, status);
    }
    println!(
        "{} cases, {} failed, {} mismatched",
        report.cases.len(),
        report.failures(),
        report.mismatches()
    );

    if report.failures() > 0 {
        anyhow::bail!("{} check case(s) failed", report.failures());
    }
    Ok(())
}

fn run_dataset(command: DatasetCommands) -> Result<()> {
    match command {
        DatasetCommands::Synth { out } => {
            let reviews = dataset::synthetic_reviews();
            dataset::write_json(&out, &reviews)?;
            println!("Wrote {} synthetic reviews to {}", reviews.len(), out.display());
        }

        DatasetCommands::Prepare { input, out, text_out } => {
            let processor = dataset_processor()?;
            let reviews = dataset::load_reviews(&input)?;
            let pairs = dataset::prepare_training_pairs(&reviews, &processor);
            dataset::write_json(&out, &pairs)?;
            println!("Wrote {} training pairs to {}", pairs.len(), out.display());

            if let Some(text_out) = text_out {
                std::fs::write(&text_out, dataset::to_text_format(&pairs))
                    .with_context(|| format!("Failed to write {}", text_out.display()))?;
                println!("Wrote text format to {}", text_out.display());
            }
        }

        DatasetCommands::Stats { input } => {
            let reviews = dataset::load_reviews(&input)?;
            let stats = dataset::dataset_stats(&reviews);
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }

        DatasetCommands::Evaluate { input } => {
            let processor = dataset_processor()?;
            let reviews = dataset::load_reviews(&input)?;
            let evaluation = dataset::evaluate(&reviews, &processor);

            println!(
                "Accuracy: {:.1}% ({}/{}, {} skipped)",
                evaluation.accuracy() * 100.0,
                evaluation.correct,
                evaluation.evaluated,
                evaluation.skipped
            );
            for (expected, row) in &evaluation.confusion {
                let cells: Vec<String> = row.iter().map(|(predicted, n)| format!("{predicted}={n}")).collect();
                println!("  {:<9} -> {}", expected.as_str(), cells.join(", "));
            }
        }
    }
    Ok(())
}

fn dataset_processor() -> Result<ReviewProcessor> {
    let config = ServiceConfig::load(None)?;
    Ok(ReviewProcessor::from_config(&config.text)?)
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("reviewreply=debug,reviewreply_server=debug,reviewreply_classifiers=debug,reviewreply_responder=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("reviewreply=info,reviewreply_server=info,reviewreply_classifiers=info,reviewreply_responder=info")
        })
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Initialize metrics exporter and return handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    reviewreply_telemetry::describe_metrics();

    info!("Metrics exporter initialized");
    Ok(handle)
}
