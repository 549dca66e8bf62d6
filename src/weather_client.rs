//! Client for the weather and forecast collaborators.
//!
//! Both calls return either the mapped data or an explicit user-facing error
//! message, never both and never a fault. Missing configuration is itself a
//! reportable message, not an exception.

use crate::config_loader::WeatherConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const CURRENT_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
const FORECAST_URL: &str = "https://api.openweathermap.org/data/2.5/forecast";

/// Number of forecast entries returned at most.
pub const FORECAST_LIMIT: usize = 8;

/// Current conditions for one city.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherInfo {
    pub city: String,
    pub country: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: i64,
    pub description: String,
    pub wind_speed: f64,
    pub pressure: i64,
}

/// One short-term forecast step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastEntry {
    pub datetime: String,
    pub temp: f64,
    pub description: String,
    pub humidity: i64,
}

#[derive(Debug, Deserialize)]
struct CurrentPayload {
    name: String,
    sys: SysBlock,
    main: MainBlock,
    weather: Vec<ConditionBlock>,
    wind: WindBlock,
}

#[derive(Debug, Deserialize)]
struct SysBlock {
    country: String,
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: f64,
    #[serde(default)]
    feels_like: f64,
    humidity: i64,
    #[serde(default)]
    pressure: i64,
}

#[derive(Debug, Deserialize)]
struct ConditionBlock {
    description: String,
}

#[derive(Debug, Deserialize)]
struct WindBlock {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct ForecastPayload {
    list: Vec<ForecastItem>,
}

#[derive(Debug, Deserialize)]
struct ForecastItem {
    dt_txt: String,
    main: MainBlock,
    weather: Vec<ConditionBlock>,
}

pub struct WeatherClient {
    http: reqwest::Client,
    api_key: Option<String>,
}

impl WeatherClient {
    pub fn new(config: &WeatherConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            http,
            api_key: config.api_key.clone(),
        }
    }

    /// Current conditions for `city`, or a user-facing error message.
    pub async fn current(&self, city: &str) -> Result<WeatherInfo, String> {
        let body = self.fetch(CURRENT_URL, city).await?;
        let payload: CurrentPayload = serde_json::from_value(body)
            .map_err(|e| format!("Error fetching weather: {e}"))?;
        Ok(map_current(payload))
    }

    /// Up to [`FORECAST_LIMIT`] forecast steps for `city`, or a user-facing
    /// error message.
    pub async fn forecast(&self, city: &str) -> Result<Vec<ForecastEntry>, String> {
        let body = self.fetch(FORECAST_URL, city).await?;
        let payload: ForecastPayload = serde_json::from_value(body)
            .map_err(|e| format!("Error fetching forecast: {e}"))?;
        Ok(map_forecast(payload))
    }

    async fn fetch(&self, url: &str, city: &str) -> Result<serde_json::Value, String> {
        let Some(api_key) = &self.api_key else {
            return Err("Weather API key not configured".to_string());
        };

        let response = self
            .http
            .get(url)
            .query(&[("q", city), ("appid", api_key.as_str()), ("units", "metric")])
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Weather request for {city} failed: {e}");
                format!("Error fetching weather: {e}")
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("City not found or API error: {}", status.as_u16()));
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| format!("Error fetching weather: {e}"))
    }
}

fn map_current(payload: CurrentPayload) -> WeatherInfo {
    WeatherInfo {
        city: payload.name,
        country: payload.sys.country,
        temperature: payload.main.temp,
        feels_like: payload.main.feels_like,
        humidity: payload.main.humidity,
        description: payload
            .weather
            .first()
            .map(|c| c.description.clone())
            .unwrap_or_default(),
        wind_speed: payload.wind.speed,
        pressure: payload.main.pressure,
    }
}

fn map_forecast(payload: ForecastPayload) -> Vec<ForecastEntry> {
    payload
        .list
        .into_iter()
        .take(FORECAST_LIMIT)
        .map(|item| ForecastEntry {
            datetime: item.dt_txt,
            temp: item.main.temp,
            description: item
                .weather
                .first()
                .map(|c| c.description.clone())
                .unwrap_or_default(),
            humidity: item.main.humidity,
        })
        .collect()
}
