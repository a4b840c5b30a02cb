//! Backend trait for the offer email task queue.
//!
//! This module defines the hand-off boundary between offer email rendering
//! and the out-of-process worker that actually sends mail. Backends only
//! accept tasks; delivery, retries and failure handling belong to the worker.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::dispatch::EmailTask;

/// Errors that can occur while handing a task to the queue.
#[derive(Debug, Error)]
pub enum QueueError {
    /// Queue is disabled
    #[error("Task queue is disabled")]
    Disabled,

    /// Redis operation failed
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backend cannot accept tasks right now
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

/// A task as stored on the queue.
///
/// This is the serializable envelope the worker consumes, used by both the
/// memory and Redis backends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedTask {
    /// Unique task ID
    pub id: Uuid,

    /// Worker task to invoke
    pub task_name: String,

    /// The email payload
    #[serde(flatten)]
    pub task: EmailTask,

    /// When the task was queued
    pub queued_at: DateTime<Utc>,
}

impl QueuedTask {
    /// Wrap an email task in a new envelope.
    pub fn new(task: EmailTask) -> Self {
        Self {
            id: Uuid::new_v4(),
            task_name: task.task_name().to_string(),
            task,
            queued_at: Utc::now(),
        }
    }
}

/// Backend trait for the offer email task queue.
///
/// # Thread Safety
///
/// Implementations must be thread-safe (`Send + Sync`) as they are shared
/// across request handlers.
///
/// # Error Handling
///
/// `submit` reports only hand-off failures. Implementations never wait for
/// the worker and never retry.
#[async_trait]
pub trait TaskQueue: Send + Sync {
    /// Backend type identifier, for logs.
    fn backend_type(&self) -> &'static str;

    /// Check if the queue accepts tasks.
    fn is_enabled(&self) -> bool;

    /// Hand a task to the worker queue and return its ID.
    ///
    /// # Errors
    ///
    /// Returns `QueueError::Disabled` if the queue is disabled.
    /// Returns `QueueError::Redis` for Redis backend failures.
    async fn submit(&self, task: EmailTask) -> Result<Uuid, QueueError>;
}
