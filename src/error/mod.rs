use thiserror::Error;

use crate::benefit::BenefitError;
use crate::queue::QueueError;
use crate::telemetry::TelemetryError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Queue error: {0}")]
    Queue(#[from] QueueError),

    #[error("Benefit error: {0}")]
    Benefit(#[from] BenefitError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
}

pub type Result<T> = std::result::Result<T, AppError>;
