use crate::{
    auth_provider::AuthProvider,
    config_loader::AppConfig,
    errors::{AdvisorError, AdvisorResult},
    forum_store::ForumStore,
    insights_client::InsightsClient,
    model_artifacts::{self, PredictArtifacts},
    session_context::SessionRegistry,
    weather_client::WeatherClient,
};
use std::path::Path;

/// Shared state handed to every request handler.
///
/// The prediction artifacts are loaded once here and treated as immutable.
/// When loading fails the rest of the application keeps running; only the
/// prediction feature reports itself unavailable.
pub struct AppState {
    pub config: AppConfig,
    pub artifacts: Option<PredictArtifacts>,
    pub forum: ForumStore,
    pub sessions: SessionRegistry,
    pub auth: AuthProvider,
    pub weather: WeatherClient,
    pub insights: InsightsClient,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let artifacts = match model_artifacts::load_artifacts(Path::new(&config.model_dir)) {
            Ok(artifacts) => Some(artifacts),
            Err(e) => {
                tracing::error!("Prediction unavailable, failed to load model artifacts: {e}");
                None
            }
        };

        Self {
            forum: ForumStore::new(&config.forum_file),
            sessions: SessionRegistry::new(),
            auth: AuthProvider::new(&config.identity),
            weather: WeatherClient::new(&config.weather),
            insights: InsightsClient::new(&config.insights),
            artifacts,
            config,
        }
    }

    /// Build a state with explicit artifacts, bypassing disk loading.
    pub fn with_artifacts(config: AppConfig, artifacts: Option<PredictArtifacts>) -> Self {
        Self {
            forum: ForumStore::new(&config.forum_file),
            sessions: SessionRegistry::new(),
            auth: AuthProvider::new(&config.identity),
            weather: WeatherClient::new(&config.weather),
            insights: InsightsClient::new(&config.insights),
            artifacts,
            config,
        }
    }

    /// The loaded artifacts, or the configuration error the caller reports.
    pub fn artifacts(&self) -> AdvisorResult<&PredictArtifacts> {
        self.artifacts.as_ref().ok_or_else(|| {
            AdvisorError::config("Prediction model not available. Please check model files.")
        })
    }
}
