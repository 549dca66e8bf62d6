//! File-backed forum post store.
//!
//! The store is a single JSON array in one UTF-8 file. The file is the only
//! source of truth: every read loads it fully, every mutation rewrites it
//! wholesale. There is no locking; the store assumes a single writer, and two
//! concurrent `add_post` calls may lose one of the posts. Post ids are
//! assigned as `current_count + 1` and can repeat once eviction kicks in.

use crate::errors::{AdvisorError, AdvisorResult};
use crate::input_sanitizer::sanitize;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Retention cap: the store never holds more than this many posts.
pub const MAX_POSTS: usize = 100;

const NAME_MAX: usize = 100;
const TOPIC_MAX: usize = 200;
const MESSAGE_MAX: usize = 1000;

const NAME_MIN: usize = 2;
const TOPIC_MIN: usize = 5;
const MESSAGE_MIN: usize = 10;

/// One user-submitted discussion entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForumPost {
    pub id: usize,
    pub name: String,
    pub topic: String,
    pub message: String,
    /// Assigned server-side at insert, `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: String,
    /// Reserved for threading; currently always empty.
    #[serde(default)]
    pub replies: Vec<serde_json::Value>,
}

/// Check the post fields as they would look after sanitization, naming the
/// violated constraint. Callers that want a specific user-facing warning run
/// this before [`ForumStore::add_post`]; the store re-checks on its own.
pub fn validate_post_fields(name: &str, topic: &str, message: &str) -> AdvisorResult<()> {
    if sanitize(name, NAME_MAX).chars().count() < NAME_MIN {
        return Err(AdvisorError::validation(
            "name",
            format!("Name must be at least {NAME_MIN} characters"),
        ));
    }
    if sanitize(topic, TOPIC_MAX).chars().count() < TOPIC_MIN {
        return Err(AdvisorError::validation(
            "topic",
            format!("Topic must be at least {TOPIC_MIN} characters"),
        ));
    }
    if sanitize(message, MESSAGE_MAX).chars().count() < MESSAGE_MIN {
        return Err(AdvisorError::validation(
            "message",
            format!("Message must be at least {MESSAGE_MIN} characters"),
        ));
    }
    Ok(())
}

pub struct ForumStore {
    path: PathBuf,
}

impl ForumStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Read the persisted posts, newest first.
    ///
    /// A missing, unreadable, or corrupt file is a recoverable condition and
    /// yields an empty sequence, never a fault.
    pub fn load(&self) -> Vec<ForumPost> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read forum file {:?}: {e}", self.path);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<ForumPost>>(&content) {
            Ok(posts) => posts,
            Err(e) => {
                tracing::warn!("Forum file {:?} is not a valid post list: {e}", self.path);
                Vec::new()
            }
        }
    }

    /// Rewrite the full sequence to disk, pretty-printed with non-ASCII
    /// characters preserved verbatim. Returns false on any I/O failure.
    pub fn save(&self, posts: &[ForumPost]) -> bool {
        let serialized = match serde_json::to_string_pretty(posts) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!("Failed to serialize forum posts: {e}");
                return false;
            }
        };

        match std::fs::write(&self.path, serialized) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to write forum file {:?}: {e}", self.path);
                false
            }
        }
    }

    /// Sanitize, validate, and persist a new post at the front of the store.
    ///
    /// Returns false without touching the file when any field, after
    /// sanitization, is empty or shorter than its minimum length.
    pub fn add_post(&self, name: &str, topic: &str, message: &str) -> bool {
        let name = sanitize(name, NAME_MAX);
        let topic = sanitize(topic, TOPIC_MAX);
        let message = sanitize(message, MESSAGE_MAX);

        if name.chars().count() < NAME_MIN
            || topic.chars().count() < TOPIC_MIN
            || message.chars().count() < MESSAGE_MIN
        {
            return false;
        }

        let mut posts = self.load();

        let new_post = ForumPost {
            id: posts.len() + 1,
            name,
            topic,
            message,
            timestamp: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            replies: Vec::new(),
        };

        posts.insert(0, new_post);
        posts.truncate(MAX_POSTS);

        self.save(&posts)
    }

    /// Return the first `limit` posts of the newest-first sequence.
    pub fn get_posts(&self, limit: usize) -> Vec<ForumPost> {
        let mut posts = self.load();
        posts.truncate(limit);
        posts
    }
}
