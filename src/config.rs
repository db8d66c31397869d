use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub generator: GeneratorSettings,
    #[serde(default)]
    pub ocr: OcrSettings,
    #[serde(default)]
    pub survey: SurveySettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 4000 }

/// External text generation service
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_generator_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_generator_model")]
    pub model: String,
    pub api_key: Option<String>,
    #[serde(default = "default_generator_timeout")]
    pub timeout_secs: u64,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_generator_endpoint(),
            model: default_generator_model(),
            api_key: None,
            timeout_secs: default_generator_timeout(),
        }
    }
}

fn default_true() -> bool { true }
fn default_generator_endpoint() -> String { "https://generativelanguage.googleapis.com".to_string() }
fn default_generator_model() -> String { "gemini-1.5-flash".to_string() }
fn default_generator_timeout() -> u64 { 30 }

/// Text recognition for uploaded images
#[derive(Debug, Clone, Deserialize)]
pub struct OcrSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_ocr_binary")]
    pub binary: String,
    #[serde(default = "default_ocr_language")]
    pub language: String,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            binary: default_ocr_binary(),
            language: default_ocr_language(),
        }
    }
}

fn default_ocr_binary() -> String { "tesseract".to_string() }
fn default_ocr_language() -> String { "eng".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct SurveySettings {
    #[serde(default = "default_recognition_confidence")]
    pub default_recognition_confidence: f64,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for SurveySettings {
    fn default() -> Self {
        Self {
            default_recognition_confidence: default_recognition_confidence(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_recognition_confidence() -> f64 { crate::models::DEFAULT_RECOGNITION_CONFIDENCE }
fn default_max_upload_bytes() -> usize { 5 * 1024 * 1024 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with HRP__)
    /// 5. GEMINI_API_KEY for the generator key
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., HRP__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("HRP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("HRP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply well-known environment variables that don't follow the HRP__ scheme
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    let mut builder = Config::builder().add_source(settings);

    if let Ok(api_key) = std::env::var("GEMINI_API_KEY") {
        if !api_key.trim().is_empty() {
            builder = builder.set_override("generator.api_key", api_key)?;
        }
    }

    builder.build()
}
