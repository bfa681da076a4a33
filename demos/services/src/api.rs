//! In-memory todo API
//!
//! Stands in for a remote backend: every call waits for the configured latency
//! before touching the shared list.

use crate::config::ServicesConfig;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;

/// A todo item as stored by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Identifier assigned by the API
    pub id: u64,
    /// What needs doing
    pub title: String,
    /// Whether it has been done
    pub done: bool,
}

/// API errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// No todo with this id exists
    #[error("Todo {0} not found")]
    NotFound(u64),

    /// Titles must contain something other than whitespace
    #[error("Todo title must not be empty")]
    EmptyTitle,

    /// The backend is not accepting requests
    #[error("Todo API unavailable")]
    Unavailable,
}

#[derive(Debug)]
struct Remote {
    todos: Vec<Todo>,
    next_id: u64,
}

/// Client for the in-memory todo backend
///
/// Clones share the same backend.
#[derive(Debug, Clone)]
pub struct TodoApi {
    remote: Arc<Mutex<Remote>>,
    online: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
    latency: Duration,
}

impl TodoApi {
    /// Create a backend seeded from the configuration
    #[must_use]
    pub fn new(config: &ServicesConfig) -> Self {
        let todos: Vec<Todo> = (1..)
            .zip(&config.seed_todos)
            .map(|(id, title)| Todo {
                id,
                title: title.clone(),
                done: false,
            })
            .collect();
        let next_id = todos.last().map_or(1, |todo| todo.id + 1);

        Self {
            remote: Arc::new(Mutex::new(Remote { todos, next_id })),
            online: Arc::new(AtomicBool::new(true)),
            calls: Arc::new(AtomicUsize::new(0)),
            latency: config.latency,
        }
    }

    /// Take the backend offline or bring it back
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    /// Number of requests received so far
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Fetch every todo
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unavailable`] if the backend is offline.
    pub async fn fetch_all(&self) -> Result<Vec<Todo>, ApiError> {
        self.request("fetch_all").await?;
        Ok(self.remote.lock().await.todos.clone())
    }

    /// Create a todo
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::EmptyTitle`] for a blank title, or
    /// [`ApiError::Unavailable`] if the backend is offline.
    pub async fn create(&self, title: String) -> Result<Todo, ApiError> {
        self.request("create").await?;

        let title = title.trim();
        if title.is_empty() {
            return Err(ApiError::EmptyTitle);
        }

        let mut remote = self.remote.lock().await;
        let todo = Todo {
            id: remote.next_id,
            title: title.to_string(),
            done: false,
        };
        remote.next_id += 1;
        remote.todos.push(todo.clone());
        Ok(todo)
    }

    /// Flip a todo's `done` flag
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an unknown id, or
    /// [`ApiError::Unavailable`] if the backend is offline.
    pub async fn toggle(&self, id: u64) -> Result<Todo, ApiError> {
        self.request("toggle").await?;

        let mut remote = self.remote.lock().await;
        let todo = remote
            .todos
            .iter_mut()
            .find(|todo| todo.id == id)
            .ok_or(ApiError::NotFound(id))?;
        todo.done = !todo.done;
        Ok(todo.clone())
    }

    async fn request(&self, endpoint: &'static str) -> Result<(), ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(endpoint, latency_ms = self.latency.as_millis(), "Todo API request");

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if self.online.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ApiError::Unavailable)
        }
    }
}
