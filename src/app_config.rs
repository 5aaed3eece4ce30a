use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::{Path, PathBuf};
use url::Url;

use crate::document::LengthTier;
use crate::errors::ConfigurationError;
use crate::providers::huggingface::{DEFAULT_ENDPOINT, DEFAULT_MODEL};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.

/// Environment variable holding the inference API credential
pub const API_KEY_ENV_VAR: &str = "HUGGINGFACE_API_KEY";

/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Summarization service settings
    #[serde(default)]
    pub summarizer: SummarizerConfig,

    /// Upload checks
    #[serde(default)]
    pub upload: UploadConfig,

    /// Export destination
    #[serde(default)]
    pub export: ExportConfig,

    /// Text-to-speech program
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Length used when none is given on the command line
    #[serde(default)]
    pub default_length: LengthTier,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Hosted summarization model settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SummarizerConfig {
    /// Model identifier (e.g., "facebook/bart-large-cnn")
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the inference API
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds, 0 disables it
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Ask the API to wait for a cold model instead of answering 503
    #[serde(default)]
    pub wait_for_model: bool,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            wait_for_model: false,
        }
    }
}

/// Upload validation settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UploadConfig {
    /// Largest accepted file in bytes
    #[serde(default = "default_max_file_size")]
    pub max_file_size: usize,

    /// Extraction timeout in seconds, 0 disables it
    #[serde(default = "default_extraction_timeout_secs")]
    pub extraction_timeout_secs: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
            extraction_timeout_secs: default_extraction_timeout_secs(),
        }
    }
}

/// Export settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ExportConfig {
    /// Directory exported files are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

/// Text-to-speech settings; the summary is written to the program's stdin
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SpeechConfig {
    /// Program to run
    #[serde(default = "default_speech_command")]
    pub command: String,

    /// Arguments making the program read text from stdin
    #[serde(default = "default_speech_args")]
    pub args: Vec<String>,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            command: default_speech_command(),
            args: default_speech_args(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_file_size() -> usize {
    10 * 1024 * 1024 // 10 MiB
}

fn default_extraction_timeout_secs() -> u64 {
    30
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_speech_command() -> String {
    if cfg!(target_os = "macos") {
        "say".to_string()
    } else {
        "espeak".to_string()
    }
}

fn default_speech_args() -> Vec<String> {
    if cfg!(target_os = "macos") {
        vec!["-f".to_string(), "-".to_string()]
    } else {
        vec!["--stdin".to_string()]
    }
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.summarizer.model.trim().is_empty() {
            return Err(ConfigurationError::Invalid("summarizer model must not be empty".to_string()));
        }

        let endpoint = Url::parse(&self.summarizer.endpoint).map_err(|e| {
            ConfigurationError::Invalid(format!("summarizer endpoint '{}': {}", self.summarizer.endpoint, e))
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(ConfigurationError::Invalid(format!(
                "summarizer endpoint must use http or https, got '{}'",
                endpoint.scheme()
            )));
        }

        if self.upload.max_file_size == 0 {
            return Err(ConfigurationError::Invalid("upload max_file_size must be greater than 0".to_string()));
        }

        if self.speech.command.trim().is_empty() {
            return Err(ConfigurationError::Invalid("speech command must not be empty".to_string()));
        }

        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to open config file {:?}: {}", path, e))?;
        serde_json::from_str(&content).map_err(|e| anyhow!("Failed to parse config file {:?}: {}", path, e))
    }

    /// Write configuration to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| anyhow!("Failed to serialize config to JSON: {}", e))?;
        crate::file_utils::FileManager::write_to_file(path, &json)
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            summarizer: SummarizerConfig::default(),
            upload: UploadConfig::default(),
            export: ExportConfig::default(),
            speech: SpeechConfig::default(),
            default_length: LengthTier::default(),
            log_level: LogLevel::default(),
        }
    }
}

/// The inference API credential; never part of the configuration file
#[derive(Clone, PartialEq)]
pub struct Credentials {
    api_key: String,
}

impl Credentials {
    /// Read the credential from the process environment
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the credential through `lookup`, failing when it is unset or blank
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(API_KEY_ENV_VAR) {
            Some(key) if !key.trim().is_empty() => Ok(Self {
                api_key: key.trim().to_string(),
            }),
            _ => Err(ConfigurationError::MissingCredential(API_KEY_ENV_VAR.to_string())),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials").field("api_key", &"<redacted>").finish()
    }
}
