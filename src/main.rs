//! Teller HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use teller::classifier::{Classifier, KeywordConfig, KeywordTable};
use teller::config::Config;
use teller::embedding::{Modality, StubEmbeddingProvider};
use teller::gateway::{HandlerState, create_router_with_state};
use teller::registry::ModelRegistry;
use teller::router::{RequestRouter, WorkerPool};
use teller::transcription::StubTranscriber;
use teller::verification::{VerificationConfig, VerificationEngine};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!(
        r#"
████████╗███████╗██╗     ██╗     ███████╗██████╗
╚══██╔══╝██╔════╝██║     ██║     ██╔════╝██╔══██╗
   ██║   █████╗  ██║     ██║     █████╗  ██████╔╝
   ██║   ██╔══╝  ██║     ██║     ██╔══╝  ██╔══██╗
   ██║   ███████╗███████╗███████╗███████╗██║  ██║
   ╚═╝   ╚══════╝╚══════╝╚══════╝╚══════╝╚═╝  ╚═╝

        VERIFY. CLASSIFY. ROUTE.
                                        AGPL-3.0
"#
    );

    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check());
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        "Teller starting"
    );

    std::fs::create_dir_all(&config.storage_path)?;

    let keywords = match &config.keywords_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading keyword configuration");
            KeywordTable::new(&KeywordConfig::from_json_file(path)?)?
        }
        None => KeywordTable::new(&KeywordConfig::builtin())?,
    };

    let registry = Arc::new(ModelRegistry::new());
    let model_path = config.model_bundle_path();
    let classifier = Arc::new(Classifier::new(
        keywords,
        Arc::clone(&registry),
        model_path.clone(),
        config.fallback_department,
    ));

    let engine = VerificationEngine::new(VerificationConfig {
        dims: config.dims,
        face_threshold: config.face_threshold,
        voice_threshold: config.voice_threshold,
    })?;

    tracing::warn!("No face/voice extractor configured, running extractors in stub mode");
    tracing::warn!("No speech engine configured, running transcriber in stub mode");

    let router = RequestRouter::new(
        Arc::new(StubEmbeddingProvider::new(Modality::Face, config.dims.face_dim)),
        Arc::new(StubEmbeddingProvider::new(Modality::Voice, config.dims.voice_dim)),
        Arc::new(StubTranscriber::new()),
        engine,
        classifier,
        WorkerPool::new(config.worker_pool_size, config.external_timeout),
    )?;

    // Warm the bundle off the request path; requests arriving first share the same load.
    tokio::spawn(async move {
        match registry.load_or_train(&model_path).await {
            Ok(bundle) => tracing::info!(
                path = %model_path.display(),
                bundle_id = %bundle.bundle_id,
                "Classification model ready"
            ),
            Err(e) => tracing::error!(
                path = %model_path.display(),
                error = %e,
                "Classification model warm-up failed"
            ),
        }
    });

    let state = HandlerState::new(
        Arc::new(router),
        config.storage_path.clone(),
        config.max_upload_bytes,
    );

    let app = create_router_with_state(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Teller shutdown complete");
    Ok(())
}

fn run_health_check() -> i32 {
    let port = std::env::var("TELLER_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8000);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(_) => return 1,
    };

    rt.block_on(async {
        let client = match reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
        {
            Ok(client) => client,
            Err(_) => return 1,
        };

        match client.get(&url).send().await {
            Ok(res) if res.status().is_success() => 0,
            _ => 1,
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
