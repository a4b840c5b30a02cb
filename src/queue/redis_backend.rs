//! Redis-based task queue backend.
//!
//! Tasks are serialized as JSON envelopes and pushed onto one Redis list per
//! worker task name. The worker pops from the other end (`BRPOP`), so the
//! list behaves as a FIFO.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::dispatch::EmailTask;
use crate::redis::RedisPool;

use super::backend::{QueueError, QueuedTask, TaskQueue};

/// Redis-based task queue backend.
///
/// Each task name has a dedicated list: `{prefix}:{task_name}`.
#[derive(Debug)]
pub struct RedisTaskQueue {
    /// Redis connection pool
    pool: Arc<RedisPool>,

    /// Key prefix for Redis keys
    prefix: String,

    enabled: bool,
}

impl RedisTaskQueue {
    /// Create a new Redis task queue.
    pub fn new(pool: Arc<RedisPool>, prefix: String, enabled: bool) -> Self {
        Self {
            pool,
            prefix,
            enabled,
        }
    }

    /// Generate the Redis key for a task name.
    fn queue_key(&self, task_name: &str) -> String {
        format!("{}:{}", self.prefix, task_name)
    }
}

#[async_trait]
impl TaskQueue for RedisTaskQueue {
    fn backend_type(&self) -> &'static str {
        "redis"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn submit(&self, task: EmailTask) -> Result<Uuid, QueueError> {
        if !self.enabled {
            return Err(QueueError::Disabled);
        }

        let queued = QueuedTask::new(task);
        let key = self.queue_key(&queued.task_name);

        let payload = serde_json::to_string(&queued)?;
        let depth = self.pool.lpush(&key, &payload).await?;

        tracing::debug!(
            task_id = %queued.id,
            key = %key,
            queue_depth = depth,
            "Task pushed to Redis"
        );

        Ok(queued.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_backend(enabled: bool) -> RedisTaskQueue {
        // The pool connects lazily, so no Redis server is needed here
        let pool = Arc::new(RedisPool::new("redis://localhost:6379").unwrap());
        RedisTaskQueue::new(pool, "ecommerce_worker".to_string(), enabled)
    }

    #[test]
    fn test_queue_key_generation() {
        let backend = create_backend(true);

        assert_eq!(
            backend.queue_key("send_offer_assignment_email"),
            "ecommerce_worker:send_offer_assignment_email"
        );
    }

    #[tokio::test]
    async fn test_submit_when_disabled() {
        let backend = create_backend(false);
        let task = EmailTask::Revocation {
            learner_email: "a@example.com".to_string(),
            subject: "Revoked".to_string(),
            email_body: "body".to_string(),
        };

        let result = backend.submit(task).await;
        assert!(matches!(result, Err(QueueError::Disabled)));
        assert_eq!(backend.backend_type(), "redis");
    }
}
