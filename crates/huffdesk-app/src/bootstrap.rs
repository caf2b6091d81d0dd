use std::future::Future;
use std::sync::Arc;

use huffdesk_api::ApiServer;
use huffdesk_codec::{CodecInvoker, CodecRunner};
use huffdesk_config::ServiceConfig;
use huffdesk_jobs::{JobOrchestrator, spawn_sweep_scheduler};
use huffdesk_store::{ArtifactStore, SweepPolicy};
use huffdesk_telemetry::{GlobalContextGuard, LogFormat, LoggingConfig, Metrics};
use tracing::{info, warn};

use crate::error::{AppError, AppResult};

const BUILD_SHA: &str = match option_env!("HUFFDESK_BUILD_SHA") {
    Some(sha) => sha,
    None => "dev",
};

/// Dependencies required to bootstrap huffdesk.
pub(crate) struct BootstrapDependencies {
    config: ServiceConfig,
    telemetry: Metrics,
}

impl BootstrapDependencies {
    /// Construct production dependencies from the environment for the binary entrypoint.
    pub(crate) fn from_env() -> AppResult<Self> {
        let config = huffdesk_config::load_from_env()
            .map_err(|err| AppError::config("config.load_from_env", err))?;
        Self::with_config(config)
    }

    pub(crate) fn with_config(config: ServiceConfig) -> AppResult<Self> {
        let telemetry =
            Metrics::new().map_err(|err| AppError::telemetry("telemetry.metrics", err))?;
        Ok(Self { config, telemetry })
    }
}

/// Entry point for the huffdesk boot sequence.
///
/// # Errors
///
/// Returns an error if configuration is invalid, logging cannot be installed, the data
/// root cannot be prepared or the listener fails.
pub async fn run_app() -> AppResult<()> {
    let dependencies = BootstrapDependencies::from_env()?;
    let format = dependencies
        .config
        .log_format
        .as_deref()
        .map_or_else(LogFormat::infer, LogFormat::from_name);
    huffdesk_telemetry::init_logging(&LoggingConfig {
        level: &dependencies.config.log_level,
        format,
        build_sha: BUILD_SHA,
    })
    .map_err(|err| AppError::telemetry("telemetry.init", err))?;
    let _context = GlobalContextGuard::new("huffdesk");

    run_app_with(dependencies, shutdown_signal()).await
}

/// Boot sequence over injected dependencies; serves until `shutdown` resolves.
pub(crate) async fn run_app_with<F>(
    dependencies: BootstrapDependencies,
    shutdown: F,
) -> AppResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let BootstrapDependencies { config, telemetry } = dependencies;
    info!(
        bind_addr = %config.bind_addr,
        data_root = %config.data_root.display(),
        codec = %config.codec.program.display(),
        "huffdesk bootstrap starting"
    );

    let store = ArtifactStore::new(&config.data_root, config.max_upload_bytes);
    store
        .ensure_layout()
        .await
        .map_err(|err| AppError::store("store.ensure_layout", err))?;

    let runner = codec_runner(&config);
    let orchestrator = JobOrchestrator::new(store.clone(), runner, telemetry.clone());
    let policy = SweepPolicy {
        max_age: config.retention,
    };

    let sweeper = config.sweep_interval.map(|every| {
        spawn_sweep_scheduler(store, telemetry.clone(), policy, every)
    });

    let api = ApiServer::new(orchestrator, telemetry, policy);
    let serve_result = api.serve(config.bind_addr, shutdown).await;

    if let Some(sweeper) = sweeper {
        sweeper.abort();
        if let Err(err) = sweeper.await
            && !err.is_cancelled()
        {
            warn!(error = %err, "sweep scheduler join failed");
        }
    }

    serve_result.map_err(|err| AppError::api_server("api_server.serve", err))?;
    info!("API server shutdown complete");
    Ok(())
}

fn codec_runner(config: &ServiceConfig) -> Arc<dyn CodecRunner> {
    let settings = &config.codec;
    if settings.program.components().count() > 1 && !settings.program.exists() {
        warn!(
            program = %settings.program.display(),
            "codec executable not found; jobs will fail until it is installed"
        );
    }
    let mut invoker = CodecInvoker::new(&settings.program).with_timeout(settings.timeout);
    if let Some(dir) = &settings.working_dir {
        invoker = invoker.with_working_dir(dir);
    }
    Arc::new(invoker)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for ctrl-c; serving until killed");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
