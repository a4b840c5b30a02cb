// Infrastructure layer (shared components)
pub mod config;
pub mod error;
pub mod redis;
pub mod telemetry;

// Domain layer (offer email logic)
pub mod benefit;
pub mod template;

// Application layer
pub mod dispatch;
pub mod queue;
