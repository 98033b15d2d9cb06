//! Server configuration.
//!
//! Values come from built-in defaults, then an optional TOML file, then
//! `TALLY_*` environment variables, later sources winning.

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_CONFIG_FILE: &str = "tally.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid value for {var}: '{value}'")]
    InvalidEnv { var: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrBackendKind {
    Tesseract,
    Disabled,
}

impl Default for OcrBackendKind {
    fn default() -> Self {
        if cfg!(feature = "tesseract") {
            OcrBackendKind::Tesseract
        } else {
            OcrBackendKind::Disabled
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    pub backend: OcrBackendKind,
    /// Tesseract language code(s), e.g. `eng` or `eng+hin`.
    pub language: String,
    /// Directory holding `*.traineddata`; the engine's default when unset.
    pub tessdata: Option<PathBuf>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            backend: OcrBackendKind::default(),
            language: "eng".to_string(),
            tessdata: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub data_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub log_format: LogFormat,
    pub ocr: OcrConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let data_dir = directories::ProjectDirs::from("com", "tally", "Tally")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("data"));
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 5000)),
            data_dir,
            max_upload_bytes: 10 * 1024 * 1024,
            log_format: LogFormat::Pretty,
            ocr: OcrConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load from `$TALLY_CONFIG` (which must exist when set) or `./tally.toml`
    /// (if present), then apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let explicit = std::env::var_os("TALLY_CONFIG").map(PathBuf::from);
        let mut config = match explicit {
            Some(path) => Self::from_file(&path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.apply_env(|var| std::env::var(var).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Override fields from `TALLY_*` variables looked up through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        fn invalid(var: &'static str, value: String) -> ConfigError {
            ConfigError::InvalidEnv { var, value }
        }

        if let Some(v) = lookup("TALLY_BIND") {
            self.bind = v.parse().map_err(|_| invalid("TALLY_BIND", v))?;
        }
        if let Some(v) = lookup("TALLY_DATA_DIR") {
            self.data_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("TALLY_MAX_UPLOAD_BYTES") {
            self.max_upload_bytes = v.parse().map_err(|_| invalid("TALLY_MAX_UPLOAD_BYTES", v))?;
        }
        if let Some(v) = lookup("TALLY_LOG_FORMAT") {
            self.log_format = match v.to_ascii_lowercase().as_str() {
                "pretty" => LogFormat::Pretty,
                "json" => LogFormat::Json,
                _ => return Err(invalid("TALLY_LOG_FORMAT", v)),
            };
        }
        if let Some(v) = lookup("TALLY_OCR_BACKEND") {
            self.ocr.backend = match v.to_ascii_lowercase().as_str() {
                "tesseract" => OcrBackendKind::Tesseract,
                "disabled" | "none" => OcrBackendKind::Disabled,
                _ => return Err(invalid("TALLY_OCR_BACKEND", v)),
            };
        }
        if let Some(v) = lookup("TALLY_OCR_LANG") {
            self.ocr.language = v;
        }
        if let Some(v) = lookup("TALLY_TESSDATA") {
            self.ocr.tessdata = Some(PathBuf::from(v));
        }
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("expenses.db")
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.data_dir.join("uploads")
    }
}
