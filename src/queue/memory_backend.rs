//! In-memory task queue backend using DashMap.
//!
//! This module provides a memory-based implementation of the `TaskQueue` trait.
//! Tasks are kept per worker task name and are lost on restart. Used for tests
//! and local development, where a consumer drains them in-process.

use std::collections::VecDeque;

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::dispatch::EmailTask;

use super::backend::{QueueError, QueuedTask, TaskQueue};

/// In-memory task queue backend.
///
/// Each worker task name has a `VecDeque` acting as a bounded FIFO.
/// When a queue is full, the oldest task is dropped.
#[derive(Debug)]
pub struct MemoryTaskQueue {
    /// Per-task-name queues
    queues: DashMap<String, VecDeque<QueuedTask>>,
    enabled: bool,
    max_pending: usize,
}

impl MemoryTaskQueue {
    /// Create a new memory queue holding at most `max_pending` tasks per task name.
    ///
    /// The newest task is always kept, so a cap of 0 behaves as a cap of 1.
    pub fn new(enabled: bool, max_pending: usize) -> Self {
        Self {
            queues: DashMap::new(),
            enabled,
            max_pending: max_pending.max(1),
        }
    }

    /// Effective per-task-name cap
    pub fn max_pending(&self) -> usize {
        self.max_pending
    }

    /// Remove and return all pending tasks for a task name, oldest first.
    pub fn drain(&self, task_name: &str) -> Vec<QueuedTask> {
        match self.queues.remove(task_name) {
            Some((_, queue)) => queue.into_iter().collect(),
            None => Vec::new(),
        }
    }

    /// Number of pending tasks for a task name
    pub fn pending(&self, task_name: &str) -> usize {
        self.queues.get(task_name).map(|q| q.len()).unwrap_or(0)
    }

    /// Number of pending tasks across all task names
    pub fn total_pending(&self) -> usize {
        self.queues.iter().map(|q| q.len()).sum()
    }
}

impl Default for MemoryTaskQueue {
    fn default() -> Self {
        Self::new(true, 10_000)
    }
}

#[async_trait]
impl TaskQueue for MemoryTaskQueue {
    fn backend_type(&self) -> &'static str {
        "memory"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn submit(&self, task: EmailTask) -> Result<Uuid, QueueError> {
        if !self.enabled {
            return Err(QueueError::Disabled);
        }

        let queued = QueuedTask::new(task);
        let id = queued.id;

        let mut queue = self.queues.entry(queued.task_name.clone()).or_default();

        // If queue is full, remove oldest task
        if queue.len() >= self.max_pending {
            if let Some(dropped) = queue.pop_front() {
                tracing::debug!(
                    task_name = %dropped.task_name,
                    dropped_id = %dropped.id,
                    queue_size = queue.len(),
                    "Dropped oldest task from full queue"
                );
            }
        }

        queue.push_back(queued);

        tracing::debug!(
            task_id = %id,
            queue_size = queue.len(),
            "Task enqueued in memory"
        );

        Ok(id)
    }
}
