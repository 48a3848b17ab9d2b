//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `TELLER_*` environment variables; a variable
//! that is set but unparsable is a load-time error rather than a silent default.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::classifier::Department;
use crate::constants::{
    DEFAULT_EXTERNAL_TIMEOUT_MS, DEFAULT_FACE_THRESHOLD, DEFAULT_MAX_UPLOAD_BYTES,
    DEFAULT_MODEL_FILENAME, DEFAULT_VOICE_THRESHOLD, DEFAULT_WORKER_POOL_SIZE, DimConfig,
    FACE_EMBEDDING_DIM, VOICE_EMBEDDING_DIM,
};

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `TELLER_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8000`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Directory holding the cached model bundle. Default: `./.data`.
    pub storage_path: PathBuf,

    /// Explicit model bundle file. Default: `<storage_path>/categorization_model.rkyv`.
    pub model_path: Option<PathBuf>,

    /// JSON keyword configuration. Default: built-in multilingual sets.
    pub keywords_path: Option<PathBuf>,

    /// Default face match threshold. Default: `0.5`.
    pub face_threshold: f64,

    /// Default voice match threshold. Default: `0.8`.
    pub voice_threshold: f64,

    /// Per-modality embedding widths.
    pub dims: DimConfig,

    /// Concurrent extraction/transcription calls. Default: `4`.
    pub worker_pool_size: usize,

    /// Deadline applied to every external model call. Default: 30s.
    pub external_timeout: Duration,

    /// Request body limit in bytes. Default: 50 MiB.
    pub max_upload_bytes: usize,

    /// Department used when classification degrades. Default: Loan Services.
    pub fallback_department: Department,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            storage_path: PathBuf::from("./.data"),
            model_path: None,
            keywords_path: None,
            face_threshold: DEFAULT_FACE_THRESHOLD,
            voice_threshold: DEFAULT_VOICE_THRESHOLD,
            dims: DimConfig::default(),
            worker_pool_size: DEFAULT_WORKER_POOL_SIZE,
            external_timeout: Duration::from_millis(DEFAULT_EXTERNAL_TIMEOUT_MS),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            fallback_department: Department::FALLBACK,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "TELLER_PORT";
    const ENV_BIND_ADDR: &'static str = "TELLER_BIND_ADDR";
    const ENV_STORAGE_PATH: &'static str = "TELLER_STORAGE_PATH";
    const ENV_MODEL_PATH: &'static str = "TELLER_MODEL_PATH";
    const ENV_KEYWORDS_PATH: &'static str = "TELLER_KEYWORDS_PATH";
    const ENV_FACE_THRESHOLD: &'static str = "TELLER_FACE_THRESHOLD";
    const ENV_VOICE_THRESHOLD: &'static str = "TELLER_VOICE_THRESHOLD";
    const ENV_FACE_DIM: &'static str = "TELLER_FACE_DIM";
    const ENV_VOICE_DIM: &'static str = "TELLER_VOICE_DIM";
    const ENV_WORKER_POOL_SIZE: &'static str = "TELLER_WORKER_POOL_SIZE";
    const ENV_EXTERNAL_TIMEOUT_MS: &'static str = "TELLER_EXTERNAL_TIMEOUT_MS";
    const ENV_MAX_UPLOAD_BYTES: &'static str = "TELLER_MAX_UPLOAD_BYTES";
    const ENV_FALLBACK_DEPARTMENT: &'static str = "TELLER_FALLBACK_DEPARTMENT";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let storage_path = Self::parse_path_from_env(Self::ENV_STORAGE_PATH, defaults.storage_path);
        let model_path = Self::parse_optional_path_from_env(Self::ENV_MODEL_PATH);
        let keywords_path = Self::parse_optional_path_from_env(Self::ENV_KEYWORDS_PATH);
        let face_threshold =
            Self::parse_number_from_env(Self::ENV_FACE_THRESHOLD, defaults.face_threshold)?;
        let voice_threshold =
            Self::parse_number_from_env(Self::ENV_VOICE_THRESHOLD, defaults.voice_threshold)?;
        let face_dim = Self::parse_number_from_env(Self::ENV_FACE_DIM, FACE_EMBEDDING_DIM)?;
        let voice_dim = Self::parse_number_from_env(Self::ENV_VOICE_DIM, VOICE_EMBEDDING_DIM)?;
        let worker_pool_size =
            Self::parse_number_from_env(Self::ENV_WORKER_POOL_SIZE, defaults.worker_pool_size)?;
        let timeout_ms =
            Self::parse_number_from_env(Self::ENV_EXTERNAL_TIMEOUT_MS, DEFAULT_EXTERNAL_TIMEOUT_MS)?;
        let max_upload_bytes =
            Self::parse_number_from_env(Self::ENV_MAX_UPLOAD_BYTES, defaults.max_upload_bytes)?;
        let fallback_department = Self::parse_department_from_env(defaults.fallback_department)?;

        Ok(Self {
            port,
            bind_addr,
            storage_path,
            model_path,
            keywords_path,
            face_threshold,
            voice_threshold,
            dims: DimConfig::new(face_dim, voice_dim),
            worker_pool_size,
            external_timeout: Duration::from_millis(timeout_ms),
            max_upload_bytes,
            fallback_department,
        })
    }

    /// Validates paths and numeric invariants (does not create directories).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_path.exists() && !self.storage_path.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.storage_path.clone(),
            });
        }

        // The bundle file may not exist yet (trained on first use), but it can't be a directory.
        if let Some(ref path) = self.model_path
            && path.is_dir()
        {
            return Err(ConfigError::NotAFile { path: path.clone() });
        }

        if let Some(ref path) = self.keywords_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_file() {
                return Err(ConfigError::NotAFile { path: path.clone() });
            }
        }

        Self::check_threshold(Self::ENV_FACE_THRESHOLD, self.face_threshold)?;
        Self::check_threshold(Self::ENV_VOICE_THRESHOLD, self.voice_threshold)?;
        self.dims.validate()?;

        if self.worker_pool_size == 0 {
            return Err(ConfigError::ZeroValue {
                name: Self::ENV_WORKER_POOL_SIZE,
            });
        }
        if self.external_timeout.is_zero() {
            return Err(ConfigError::ZeroValue {
                name: Self::ENV_EXTERNAL_TIMEOUT_MS,
            });
        }
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::ZeroValue {
                name: Self::ENV_MAX_UPLOAD_BYTES,
            });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Where the classifier's model bundle is cached.
    pub fn model_bundle_path(&self) -> PathBuf {
        self.model_path
            .clone()
            .unwrap_or_else(|| self.storage_path.join(DEFAULT_MODEL_FILENAME))
    }

    fn check_threshold(name: &'static str, value: f64) -> Result<(), ConfigError> {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(ConfigError::InvalidThreshold { name, value });
        }
        Ok(())
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_department_from_env(default: Department) -> Result<Department, ConfigError> {
        match env::var(Self::ENV_FALLBACK_DEPARTMENT) {
            Ok(value) => {
                Department::from_str(value.trim()).map_err(|_| ConfigError::UnknownDepartment {
                    value,
                })
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_number_from_env<T>(var_name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match env::var(var_name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|e: T::Err| ConfigError::InvalidNumber {
                    name: var_name,
                    value,
                    reason: e.to_string(),
                }),
            Err(_) => Ok(default),
        }
    }
}
