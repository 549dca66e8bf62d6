use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Top-level application configuration, loaded from `cropmind.toml` and
/// `CROPMIND_*` environment variables layered over built-in defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    /// Path of the forum persistence file.
    #[serde(default = "default_forum_file")]
    pub forum_file: String,
    /// Directory holding the serialized model artifacts.
    #[serde(default = "default_model_dir")]
    pub model_dir: String,
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub insights: InsightsConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key. Weather pages report a configuration
    /// message when unset.
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InsightsConfig {
    /// Inference endpoint for the text-generation collaborator.
    pub api_url: String,
    /// Bearer token. Advisory text reports a configuration message when unset.
    pub api_token: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api-inference.huggingface.co/models/mistralai/Mistral-Nemo-Instruct-2407"
                .to_string(),
            api_token: None,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct IdentityConfig {
    /// Identity service API key. Demo-mode login is used when unset.
    pub api_key: Option<String>,
    /// Identity service project identifier.
    pub project_id: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            forum_file: default_forum_file(),
            model_dir: default_model_dir(),
            weather: WeatherConfig::default(),
            insights: InsightsConfig::default(),
            identity: IdentityConfig::default(),
        }
    }
}

fn default_forum_file() -> String {
    "forum_data.json".to_string()
}

fn default_model_dir() -> String {
    "models".to_string()
}

pub fn load_config() -> Result<AppConfig, figment::Error> {
    let figment = Figment::from(Serialized::defaults(AppConfig::default()))
        .merge(Toml::file("cropmind.toml"))
        .merge(Env::prefixed("CROPMIND_").split("__"));

    let config: AppConfig = figment.extract()?;

    if config.model_dir.trim().is_empty() {
        return Err(figment::Error::from("model_dir must be set".to_string()));
    }

    Ok(config)
}
