//! Redis connectivity for the task broker

pub mod pool;

pub use pool::RedisPool;
