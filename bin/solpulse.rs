use std::sync::Arc;

use anyhow::Context;
use jemallocator::Jemalloc;
use log::{error, info, LevelFilter};
use simple_logger::SimpleLogger;
use tokio_util::sync::CancellationToken;

#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use solpulse::{
    api, create_router, ApiState, CronScheduler, CronSettings, MetricsService, MetricsSource,
    MetricsStore, RefreshOrchestrator, Settings, Synthesizer,
};

#[tokio::main()]
async fn main() -> anyhow::Result<()> {
    SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .env()
        .init()
        .context("Failed to initialize logger")?;

    // Load configuration
    let settings = Arc::new(Settings::new().context(
        "Failed to load configuration. Please check config.yaml and SOLPULSE__* variables",
    )?);

    let store = Arc::new(MetricsStore::new());
    let source: Arc<dyn MetricsSource> = Arc::new(
        Synthesizer::from_settings(&settings.price_feed)
            .context("Failed to initialize price feed")?,
    );

    let service = Arc::new(
        MetricsService::new(store.clone(), source.clone(), &settings.freshness)
            .context("Invalid freshness configuration")?,
    );
    let orchestrator = Arc::new(RefreshOrchestrator::new(
        store,
        source,
        settings.windows,
    ));

    let cancellation_token = CancellationToken::new();

    return run_server(settings, service, orchestrator, cancellation_token).await;
}

async fn run_server(
    settings: Arc<Settings>,
    service: Arc<MetricsService>,
    orchestrator: Arc<RefreshOrchestrator>,
    cancellation_token: CancellationToken,
) -> anyhow::Result<()> {
    // Periodic refresh runs alongside the HTTP server
    let cron_scheduler = CronScheduler::new(
        orchestrator.clone(),
        CronSettings::from(&settings.refresh),
    );

    let cron_token = cancellation_token.child_token();
    let cron_handle = tokio::spawn(async move {
        if let Err(e) = cron_scheduler.run(cron_token).await {
            error!("Cron scheduler failed: {:#}", e);
        }
    });

    let app = create_router(ApiState {
        service,
        orchestrator,
        windows: settings.windows,
    });

    let listener = api::bind(&settings.server).await?;

    let addr = listener
        .local_addr()
        .context("Failed to read listener address")?;
    info!("API listening on http://{}/api", addr);

    let shutdown_token = cancellation_token.clone();
    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move { shutdown_token.cancelled().await })
            .await
    });

    #[cfg(unix)]
    let mut sigterm_stream = {
        use tokio::signal::unix::{signal, SignalKind};
        signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?
    };

    // Set up graceful shutdown signal handler
    info!("Server running. Press Ctrl+C to stop.");

    #[cfg(unix)]
    {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal (Ctrl+C), exiting gracefully...");
            },
            _ = sigterm_stream.recv() => {
                info!("Received SIGTERM, exiting gracefully...");
            },
        };
    }

    #[cfg(not(unix))]
    {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal (Ctrl+C), exiting gracefully...");
            },
        };
    }

    // Cancel all running tasks
    info!("Finishing all tasks...");

    cancellation_token.cancel();

    info!("Waiting for HTTP server to stop...");
    match server_handle.await {
        Ok(Err(e)) => error!("HTTP server error: {:#}", e),
        Err(e) => error!("HTTP server task panicked: {:#}", e),
        Ok(Ok(())) => {}
    }

    info!("Waiting for cron scheduler to stop...");
    let _ = cron_handle.await;

    info!("Shutdown complete");
    Ok(())
}
