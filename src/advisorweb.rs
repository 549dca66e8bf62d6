//! HTTP surface of the advisory service.
//!
//! All routes speak JSON. Everything except the auth endpoints and the health
//! checks is gated behind a session id issued at login.

use crate::advisory_prompt::{build_prompt, Language};
use crate::api_errors::AppError;
use crate::app_state::AppState;
use crate::feature_pipeline::FeatureVector;
use crate::forum_store::{validate_post_fields, ForumPost};
use crate::session_context::{ChatRole, SessionContext};
use crate::weather_client::{ForecastEntry, WeatherInfo};
use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

#[derive(Debug, Deserialize)]
pub struct AuthRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub language: Option<Language>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    pub session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub session_id: String,
    pub features: Vec<f64>,
    #[serde(default)]
    pub language: Option<Language>,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub crop: Option<String>,
    pub insights: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub session_id: String,
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    pub session_id: String,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct NewPostRequest {
    pub session_id: String,
    pub name: String,
    pub topic: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct PostSubmitResponse {
    pub success: bool,
    pub message: String,
}

/// Build the full application router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Auth
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        // Prediction and advisory chat
        .route("/api/predict", post(predict))
        .route("/api/chat", post(chat))
        // Weather
        .route("/api/weather/{city}", get(weather_current))
        .route("/api/weather/{city}/forecast", get(weather_forecast))
        // Forum
        .route("/api/forum/posts", get(forum_list).post(forum_submit))
        // Health endpoints
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn require_session(state: &AppState, session_id: &str) -> Result<SessionContext, AppError> {
    state
        .sessions
        .get(session_id)
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::unauthorized("Not logged in or session expired"))
}

async fn signup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AuthRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    match state.auth.signup(&req.email, &req.password).await {
        Ok(message) => {
            let session_id = state
                .sessions
                .create(&req.email, req.language.unwrap_or_default())?;
            Ok(Json(AuthResponse {
                success: true,
                message,
                session_id: Some(session_id),
            }))
        }
        Err(message) => Err(AppError::unauthorized(message)),
    }
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AuthRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    match state.auth.login(&req.email, &req.password).await {
        Ok(message) => {
            let session_id = state
                .sessions
                .create(&req.email, req.language.unwrap_or_default())?;
            tracing::info!("Session started for {}", req.email);
            Ok(Json(AuthResponse {
                success: true,
                message,
                session_id: Some(session_id),
            }))
        }
        Err(message) => Err(AppError::unauthorized(message)),
    }
}

async fn logout(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LogoutRequest>,
) -> Result<Json<LogoutResponse>, AppError> {
    let success = state.sessions.remove(&req.session_id)?;
    Ok(Json(LogoutResponse { success }))
}

async fn predict(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, AppError> {
    require_session(&state, &req.session_id)?;

    let features = FeatureVector::from_slice(&req.features).map_err(AppError::from)?;
    let artifacts = state.artifacts().map_err(AppError::from)?;

    let Some(crop) = artifacts.predict_crop(&features) else {
        // No-result outcome, distinct from an error.
        return Ok(Json(PredictResponse {
            crop: None,
            insights: None,
            message: Some("No crop recommendation could be made for these measurements".into()),
        }));
    };

    let language = state.sessions.with_session(&req.session_id, |ctx| {
        if let Some(language) = req.language {
            ctx.language = language;
        }
        ctx.set_prediction(crop, features);
        ctx.language
    })?;

    let prompt = build_prompt(crop, &features, language, None);
    let insights = state.insights.generate(&prompt).await;

    Ok(Json(PredictResponse {
        crop: Some(crop.to_string()),
        insights: Some(insights),
        message: None,
    }))
}

async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let context = require_session(&state, &req.session_id)?;

    let (Some(crop), Some(features)) = (context.current_crop, context.current_features) else {
        return Err(AppError::bad_request(
            "Please get a crop recommendation first to start chatting",
        ));
    };

    let prompt = build_prompt(&crop, &features, context.language, Some(&req.question));
    let reply = state.insights.generate(&prompt).await;

    state.sessions.with_session(&req.session_id, |ctx| {
        ctx.push_chat(ChatRole::User, req.question.clone());
        ctx.push_chat(ChatRole::Assistant, reply.clone());
    })?;

    Ok(Json(ChatResponse { reply }))
}

async fn weather_current(
    State(state): State<Arc<AppState>>,
    Path(city): Path<String>,
    Query(query): Query<SessionQuery>,
) -> Result<Json<WeatherInfo>, AppError> {
    require_session(&state, &query.session_id)?;

    state
        .weather
        .current(&city)
        .await
        .map(Json)
        .map_err(weather_error)
}

async fn weather_forecast(
    State(state): State<Arc<AppState>>,
    Path(city): Path<String>,
    Query(query): Query<SessionQuery>,
) -> Result<Json<Vec<ForecastEntry>>, AppError> {
    require_session(&state, &query.session_id)?;

    state
        .weather
        .forecast(&city)
        .await
        .map(Json)
        .map_err(weather_error)
}

fn weather_error(message: String) -> AppError {
    if message.contains("not configured") {
        AppError::service_unavailable(message)
    } else {
        AppError::not_found(message)
    }
}

async fn forum_list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SessionQuery>,
) -> Result<Json<Vec<ForumPost>>, AppError> {
    require_session(&state, &query.session_id)?;

    let limit = query.limit.unwrap_or(10);
    Ok(Json(state.forum.get_posts(limit)))
}

async fn forum_submit(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewPostRequest>,
) -> Result<Json<PostSubmitResponse>, AppError> {
    require_session(&state, &req.session_id)?;

    validate_post_fields(&req.name, &req.topic, &req.message).map_err(AppError::from)?;

    if state.forum.add_post(&req.name, &req.topic, &req.message) {
        Ok(Json(PostSubmitResponse {
            success: true,
            message: "Your post has been added!".to_string(),
        }))
    } else {
        Err(AppError::internal("Failed to add post. Please try again."))
    }
}

async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn readyz(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ready": state.artifacts.is_some() }))
}
