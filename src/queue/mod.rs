//! Task queue for handing offer emails to the asynchronous worker.
//!
//! Backends:
//! - `MemoryTaskQueue`: in-process, for tests and local development
//! - `RedisTaskQueue`: JSON envelopes on Redis lists consumed by the worker

mod backend;
mod factory;
mod memory_backend;
mod redis_backend;

pub use backend::{QueueError, QueuedTask, TaskQueue};
pub use factory::create_task_queue;
pub use memory_backend::MemoryTaskQueue;
pub use redis_backend::RedisTaskQueue;
