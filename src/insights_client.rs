//! Client for the external text-generation collaborator.
//!
//! The call never raises past this module: a missing token, a non-success
//! status, a timeout, or an unexpected response shape all come back as a
//! human-readable message the caller can show directly.

use crate::config_loader::InsightsConfig;
use std::time::Duration;

/// Shown when the response is unusable for any reason.
pub const FALLBACK_MESSAGE: &str = "Unable to fetch agricultural insights.";

/// Shown when no API token is configured.
pub const NOT_CONFIGURED_MESSAGE: &str =
    "AI assistant not configured. Please add an insights API token.";

pub struct InsightsClient {
    http: reqwest::Client,
    api_url: String,
    api_token: Option<String>,
}

impl InsightsClient {
    pub fn new(config: &InsightsConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            http,
            api_url: config.api_url.clone(),
            api_token: config.api_token.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_token.is_some()
    }

    /// Send one prompt and return generated text or a descriptive message.
    pub async fn generate(&self, prompt: &str) -> String {
        let Some(token) = &self.api_token else {
            return NOT_CONFIGURED_MESSAGE.to_string();
        };

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(token)
            .json(&serde_json::json!({ "inputs": prompt }))
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Insights request failed: {e}");
                return format!("Error fetching insights: {e}");
            }
        };

        let status = response.status();
        if !status.is_success() {
            return format!("{FALLBACK_MESSAGE} Status: {}", status.as_u16());
        }

        match response.json::<serde_json::Value>().await {
            Ok(body) => {
                extract_generated_text(&body).unwrap_or_else(|| FALLBACK_MESSAGE.to_string())
            }
            Err(e) => {
                tracing::warn!("Insights response was not JSON: {e}");
                FALLBACK_MESSAGE.to_string()
            }
        }
    }
}

/// The collaborator answers with a list whose first element carries
/// `generated_text`; anything else is an unusable shape.
fn extract_generated_text(body: &serde_json::Value) -> Option<String> {
    body.as_array()?
        .first()?
        .get("generated_text")?
        .as_str()
        .map(|s| s.to_string())
}
