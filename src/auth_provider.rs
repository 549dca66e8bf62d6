//! Login and signup against the external identity service.
//!
//! Authentication is delegated: when an identity API key is configured, the
//! provider calls the service's REST endpoints and maps its error codes to
//! friendly messages. When it is not, a documented demo mode accepts any
//! credentials so the rest of the application stays usable.

use crate::config_loader::IdentityConfig;
use std::time::Duration;

const SIGN_IN_URL: &str = "https://identitytoolkit.googleapis.com/v1/accounts:signInWithPassword";
const SIGN_UP_URL: &str = "https://identitytoolkit.googleapis.com/v1/accounts:signUp";

const DEMO_LOGIN_MESSAGE: &str =
    "Logged in (demo mode - identity service not configured. To enable real auth, add identity credentials)";
const DEMO_SIGNUP_MESSAGE: &str =
    "Account created (demo mode - identity service not configured. To enable real auth, add identity credentials)";

pub struct AuthProvider {
    http: reqwest::Client,
    api_key: Option<String>,
}

impl AuthProvider {
    pub fn new(config: &IdentityConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        if config.api_key.is_none() {
            tracing::info!("Identity service not configured; running auth in demo mode");
        }

        Self {
            http,
            api_key: config.api_key.clone(),
        }
    }

    pub fn is_demo_mode(&self) -> bool {
        self.api_key.is_none()
    }

    /// Verify credentials. `Ok` carries the success message, `Err` the
    /// user-facing rejection.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, String> {
        if email.is_empty() || password.is_empty() {
            return Err("Please enter both email and password".to_string());
        }

        let Some(api_key) = &self.api_key else {
            return Ok(DEMO_LOGIN_MESSAGE.to_string());
        };

        match self.post_credentials(SIGN_IN_URL, api_key, email, password).await {
            Ok(()) => Ok("Login successful!".to_string()),
            Err(code) => Err(map_login_error(&code)),
        }
    }

    /// Create an account. Same message conventions as [`AuthProvider::login`].
    pub async fn signup(&self, email: &str, password: &str) -> Result<String, String> {
        if email.is_empty() || password.is_empty() {
            return Err("Please enter both email and password".to_string());
        }

        if password.chars().count() < 6 {
            return Err("Password must be at least 6 characters long".to_string());
        }

        let Some(api_key) = &self.api_key else {
            return Ok(DEMO_SIGNUP_MESSAGE.to_string());
        };

        match self.post_credentials(SIGN_UP_URL, api_key, email, password).await {
            Ok(()) => Ok("Account created successfully!".to_string()),
            Err(code) => Err(map_signup_error(&code)),
        }
    }

    /// Send credentials to the identity endpoint; `Err` carries the service's
    /// error code (or a transport description) for mapping.
    async fn post_credentials(
        &self,
        url: &str,
        api_key: &str,
        email: &str,
        password: &str,
    ) -> Result<(), String> {
        let response = self
            .http
            .post(url)
            .query(&[("key", api_key)])
            .json(&serde_json::json!({
                "email": email,
                "password": password,
                "returnSecureToken": true,
            }))
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Identity request failed: {e}");
                e.to_string()
            })?;

        if response.status().is_success() {
            return Ok(());
        }

        let body = response
            .json::<serde_json::Value>()
            .await
            .unwrap_or_default();
        Err(extract_error_code(&body))
    }
}

fn extract_error_code(body: &serde_json::Value) -> String {
    body.get("error")
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
        .unwrap_or("UNKNOWN")
        .to_string()
}

fn map_login_error(code: &str) -> String {
    if code.contains("INVALID_PASSWORD")
        || code.contains("INVALID_EMAIL")
        || code.contains("INVALID_LOGIN_CREDENTIALS")
    {
        "Invalid email or password".to_string()
    } else if code.contains("EMAIL_NOT_FOUND") {
        "No account found with this email".to_string()
    } else {
        format!("Login failed: {code}")
    }
}

fn map_signup_error(code: &str) -> String {
    if code.contains("EMAIL_EXISTS") {
        "An account with this email already exists".to_string()
    } else if code.contains("INVALID_EMAIL") {
        "Please enter a valid email address".to_string()
    } else if code.contains("WEAK_PASSWORD") {
        "Password is too weak. Use at least 6 characters".to_string()
    } else {
        format!("Signup failed: {code}")
    }
}
