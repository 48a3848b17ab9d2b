//! Test server harness.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use teller::classifier::{Classifier, Department, KeywordTable};
use teller::config::Config;
use teller::embedding::{Modality, StubEmbeddingProvider};
use teller::gateway::{HandlerState, create_router_with_state};
use teller::registry::ModelRegistry;
use teller::router::{RequestRouter, WorkerPool};
use teller::transcription::{StubTranscriber, Transcriber};
use teller::verification::{VerificationConfig, VerificationEngine};

const STARTUP_WAIT_TIMEOUT_SECS: u64 = 5;
const STARTUP_POLL_INTERVAL_MS: u64 = 50;

#[derive(Debug, Clone)]
pub struct TestServerConfig {
    pub port: u16,
    pub storage_path: Option<PathBuf>,
    pub face_threshold: f64,
    pub voice_threshold: f64,
    pub fallback_department: Department,
    /// Train the classification bundle before accepting connections.
    pub warm_model: bool,
    pub transcriber: Option<Arc<dyn Transcriber>>,
}

impl Default for TestServerConfig {
    fn default() -> Self {
        let defaults = Config::default();
        Self {
            port: 0,
            storage_path: None,
            face_threshold: defaults.face_threshold,
            voice_threshold: defaults.voice_threshold,
            fallback_department: defaults.fallback_department,
            warm_model: true,
            transcriber: None,
        }
    }
}

pub struct TestServer {
    pub addr: SocketAddr,
    pub registry: Arc<ModelRegistry>,
    pub model_path: PathBuf,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    _temp_dir: Option<TempDir>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

pub async fn find_available_port() -> std::io::Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    Ok(addr.port())
}

pub async fn wait_for_server_ready(
    addr: SocketAddr,
    timeout: Duration,
    interval: Duration,
) -> Result<(), ServerStartupError> {
    let start = std::time::Instant::now();

    loop {
        if start.elapsed() > timeout {
            return Err(ServerStartupError::Timeout);
        }

        match tokio::net::TcpStream::connect(addr).await {
            Ok(_) => return Ok(()),
            Err(_) => {
                tokio::time::sleep(interval).await;
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerStartupError {
    #[error("Server failed to start within timeout")]
    Timeout,
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
    #[error("Server startup failed: {0}")]
    StartupFailed(String),
}

/// Spawns a server wired the way `main` wires it: stub extractors at the default
/// dimensions, a stub transcriber unless one is supplied, and the built-in keyword
/// table and training corpus. The model bundle lives in a temporary directory.
pub async fn spawn_test_server(config: TestServerConfig) -> Result<TestServer, ServerStartupError> {
    let port = if config.port == 0 {
        find_available_port().await?
    } else {
        config.port
    };

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;

    let (storage_path, _temp_dir) = if let Some(path) = config.storage_path {
        (path, None)
    } else {
        let temp_dir =
            TempDir::new().map_err(|e| ServerStartupError::StartupFailed(e.to_string()))?;
        (temp_dir.path().to_path_buf(), Some(temp_dir))
    };

    let defaults = Config {
        storage_path: storage_path.clone(),
        ..Default::default()
    };
    let model_path = defaults.model_bundle_path();

    let registry = Arc::new(ModelRegistry::new());
    if config.warm_model {
        registry
            .load_or_train(&model_path)
            .await
            .map_err(|e| ServerStartupError::StartupFailed(e.to_string()))?;
    }

    let classifier = Classifier::new(
        KeywordTable::builtin(),
        Arc::clone(&registry),
        model_path.clone(),
        config.fallback_department,
    );

    let engine = VerificationEngine::new(VerificationConfig {
        dims: defaults.dims,
        face_threshold: config.face_threshold,
        voice_threshold: config.voice_threshold,
    })
    .map_err(|e| ServerStartupError::StartupFailed(e.to_string()))?;

    let transcriber = config
        .transcriber
        .unwrap_or_else(|| Arc::new(StubTranscriber::new()));

    let router = RequestRouter::new(
        Arc::new(StubEmbeddingProvider::new(
            Modality::Face,
            defaults.dims.face_dim,
        )),
        Arc::new(StubEmbeddingProvider::new(
            Modality::Voice,
            defaults.dims.voice_dim,
        )),
        transcriber,
        engine,
        Arc::new(classifier),
        WorkerPool::new(defaults.worker_pool_size, defaults.external_timeout),
    )
    .map_err(|e| ServerStartupError::StartupFailed(e.to_string()))?;

    let state = HandlerState::new(Arc::new(router), storage_path, defaults.max_upload_bytes);
    let app = create_router_with_state(state);

    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    wait_for_server_ready(
        local_addr,
        Duration::from_secs(STARTUP_WAIT_TIMEOUT_SECS),
        Duration::from_millis(STARTUP_POLL_INTERVAL_MS),
    )
    .await?;

    Ok(TestServer {
        addr: local_addr,
        registry,
        model_path,
        _server_handle: server_handle,
        shutdown_tx: Some(shutdown_tx),
        _temp_dir,
    })
}
