//! Task queue backend factory

use std::sync::Arc;

use crate::config::QueueSettings;
use crate::redis::RedisPool;

use super::backend::TaskQueue;
use super::memory_backend::MemoryTaskQueue;
use super::redis_backend::RedisTaskQueue;

/// Create a task queue based on configuration.
///
/// Returns the appropriate backend implementation based on the `backend` setting:
/// - `"redis"`: Returns a `RedisTaskQueue` if a Redis pool is provided
/// - `"memory"` (default): Returns a `MemoryTaskQueue`
///
/// # Example
///
/// ```rust,ignore
/// let queue = create_task_queue(&settings.queue, Some(redis_pool.clone()));
/// ```
pub fn create_task_queue(
    settings: &QueueSettings,
    redis_pool: Option<Arc<RedisPool>>,
) -> Arc<dyn TaskQueue> {
    match settings.backend.as_str() {
        "redis" => {
            if let Some(pool) = redis_pool {
                tracing::info!(
                    backend = "redis",
                    prefix = %settings.redis_prefix,
                    "Creating Redis task queue"
                );
                Arc::new(RedisTaskQueue::new(
                    pool,
                    settings.redis_prefix.clone(),
                    settings.enabled,
                ))
            } else {
                tracing::warn!(
                    "Redis backend requested but no pool provided, falling back to memory"
                );
                Arc::new(MemoryTaskQueue::new(settings.enabled, settings.max_pending))
            }
        }
        _ => {
            tracing::info!(backend = "memory", "Creating memory task queue");
            Arc::new(MemoryTaskQueue::new(settings.enabled, settings.max_pending))
        }
    }
}
