//! Per-session state and the registry that owns it.
//!
//! Each login creates one [`SessionContext`]; logout removes it. Contexts are
//! never shared across sessions, and the chat history is reset every time a
//! new prediction is stored.

use crate::advisory_prompt::Language;
use crate::errors::{AdvisorError, AdvisorResult};
use crate::feature_pipeline::FeatureVector;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct SessionContext {
    pub session_id: String,
    pub user_email: String,
    pub language: Language,
    pub current_crop: Option<String>,
    pub current_features: Option<FeatureVector>,
    pub chat_history: Vec<ChatMessage>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl SessionContext {
    pub fn new(user_email: &str, language: Language) -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            user_email: user_email.to_string(),
            language,
            current_crop: None,
            current_features: None,
            chat_history: Vec::new(),
            created_at: chrono::Utc::now(),
        }
    }

    /// Store a fresh prediction; the chat history belongs to the previous
    /// crop and is cleared.
    pub fn set_prediction(&mut self, crop: &str, features: FeatureVector) {
        self.current_crop = Some(crop.to_string());
        self.current_features = Some(features);
        self.chat_history.clear();
    }

    pub fn push_chat(&mut self, role: ChatRole, content: impl Into<String>) {
        self.chat_history.push(ChatMessage {
            role,
            content: content.into(),
        });
    }
}

/// In-memory registry of live sessions, keyed by session id.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, SessionContext>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context for a freshly logged-in user and return its id.
    pub fn create(&self, user_email: &str, language: Language) -> AdvisorResult<String> {
        let context = SessionContext::new(user_email, language);
        let session_id = context.session_id.clone();

        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| AdvisorError::internal("session registry lock poisoned"))?;
        sessions.insert(session_id.clone(), context);

        Ok(session_id)
    }

    /// Snapshot of a session, if it exists.
    pub fn get(&self, session_id: &str) -> AdvisorResult<Option<SessionContext>> {
        let sessions = self
            .sessions
            .read()
            .map_err(|_| AdvisorError::internal("session registry lock poisoned"))?;
        Ok(sessions.get(session_id).cloned())
    }

    /// Run `f` against a live session, failing with a session error when the
    /// id is unknown.
    pub fn with_session<T>(
        &self,
        session_id: &str,
        f: impl FnOnce(&mut SessionContext) -> T,
    ) -> AdvisorResult<T> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| AdvisorError::internal("session registry lock poisoned"))?;

        let context = sessions
            .get_mut(session_id)
            .ok_or_else(|| AdvisorError::session("Not logged in or session expired"))?;

        Ok(f(context))
    }

    /// Drop a session at logout. Returns false for an unknown id.
    pub fn remove(&self, session_id: &str) -> AdvisorResult<bool> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| AdvisorError::internal("session registry lock poisoned"))?;
        Ok(sessions.remove(session_id).is_some())
    }
}
