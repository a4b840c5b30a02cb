//! Dispatch of rendered offer emails to the asynchronous worker.
//!
//! `OfferMailer` renders the configured template for each offer event and
//! submits a single `EmailTask` to the task queue. It returns as soon as the
//! queue accepts the task.

mod mailer;
mod task;

pub use mailer::{MailerStats, MailerStatsSnapshot, OfferMailer};
pub use task::{EmailTask, ASSIGNMENT_TASK, UPDATE_TASK};
