use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use crate::scoring::GenerationParams;

const DEFAULT_SYSTEM_PROMPT: &str =
    "You are an expert in analyzing behavioral characteristics of software engineers.";

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub model: ModelConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            model: ModelConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where and how to reach the chat-completions deployment that scores answers.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub api_base: Option<String>,
    pub api_key: Option<String>,
    pub api_version: String,
    pub deployment: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub json_mode: bool,
    /// Unset means the outbound call may block indefinitely.
    pub timeout: Option<Duration>,
    pub system_prompt: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_base: None,
            api_key: None,
            api_version: "2024-02-01".to_string(),
            deployment: "gpt-35-turbo".to_string(),
            max_tokens: 512,
            temperature: 0.2,
            json_mode: true,
            timeout: None,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

impl ModelConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let timeout = optional_var("MODEL_TIMEOUT_SECS")
            .map(|raw| parse_var::<u64>("MODEL_TIMEOUT_SECS", &raw))
            .transpose()?
            .map(Duration::from_secs);

        Ok(Self {
            api_base: optional_var("AZURE_OPENAI_API_BASE_URL"),
            api_key: optional_var("AZURE_OPENAI_API_KEY"),
            api_version: optional_var("AZURE_OPENAI_API_VERSION").unwrap_or(defaults.api_version),
            deployment: optional_var("AZURE_OPENAI_DEPLOYMENT").unwrap_or(defaults.deployment),
            max_tokens: var_or("MODEL_MAX_TOKENS", defaults.max_tokens)?,
            temperature: var_or("MODEL_TEMPERATURE", defaults.temperature)?,
            json_mode: match optional_var("MODEL_JSON_MODE") {
                Some(raw) => parse_flag("MODEL_JSON_MODE", &raw)?,
                None => defaults.json_mode,
            },
            timeout,
            system_prompt: optional_var("MODEL_SYSTEM_PROMPT").unwrap_or(defaults.system_prompt),
        })
    }

    pub fn generation_params(&self) -> GenerationParams {
        GenerationParams {
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            json_mode: self.json_mode,
        }
    }
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_var<T: FromStr>(name: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.parse::<T>()
        .map_err(|_| ConfigError::InvalidValue { name })
}

fn var_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match optional_var(name) {
        Some(raw) => parse_var(name, &raw),
        None => Ok(default),
    }
}

fn parse_flag(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue { name }),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidValue { name: &'static str },
    MissingSetting { name: &'static str },
    HttpClient(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidValue { name } => write!(f, "{name} has an invalid value"),
            ConfigError::MissingSetting { name } => write!(f, "{name} must be set"),
            ConfigError::HttpClient(reason) => {
                write!(f, "unable to build model service client: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidValue { .. }
            | ConfigError::MissingSetting { .. }
            | ConfigError::HttpClient(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    const VARS: [&str; 13] = [
        "APP_ENV",
        "APP_HOST",
        "APP_PORT",
        "APP_LOG_LEVEL",
        "AZURE_OPENAI_API_BASE_URL",
        "AZURE_OPENAI_API_KEY",
        "AZURE_OPENAI_API_VERSION",
        "AZURE_OPENAI_DEPLOYMENT",
        "MODEL_MAX_TOKENS",
        "MODEL_TEMPERATURE",
        "MODEL_JSON_MODE",
        "MODEL_TIMEOUT_SECS",
        "MODEL_SYSTEM_PROMPT",
    ];

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for name in VARS {
            env::remove_var(name);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.model.deployment, "gpt-35-turbo");
        assert_eq!(config.model.max_tokens, 512);
        assert!(config.model.json_mode);
        assert!(config.model.timeout.is_none());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn reads_model_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("AZURE_OPENAI_API_BASE_URL", "https://example.openai.azure.com");
        env::set_var("AZURE_OPENAI_DEPLOYMENT", "gpt-4o");
        env::set_var("MODEL_TEMPERATURE", "0.5");
        env::set_var("MODEL_JSON_MODE", "off");
        env::set_var("MODEL_TIMEOUT_SECS", "30");

        let model = ModelConfig::from_env().expect("model config loads");
        assert_eq!(
            model.api_base.as_deref(),
            Some("https://example.openai.azure.com")
        );
        assert_eq!(model.deployment, "gpt-4o");
        assert!(!model.generation_params().json_mode);
        assert_eq!(model.generation_params().temperature, 0.5);
        assert_eq!(model.timeout, Some(Duration::from_secs(30)));
        reset_env();
    }

    #[test]
    fn rejects_unparseable_numbers() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("MODEL_MAX_TOKENS", "lots");
        match ModelConfig::from_env() {
            Err(ConfigError::InvalidValue { name }) => assert_eq!(name, "MODEL_MAX_TOKENS"),
            other => panic!("expected invalid value, got {other:?}"),
        }
        reset_env();
    }
}
