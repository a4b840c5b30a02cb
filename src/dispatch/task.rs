//! Email task payloads consumed by the worker

use serde::{Deserialize, Serialize};

/// Worker task that sends offer assignment emails
pub const ASSIGNMENT_TASK: &str = "send_offer_assignment_email";

/// Worker task that sends reminder and revocation emails
pub const UPDATE_TASK: &str = "send_offer_update_email";

/// A fully rendered offer email, ready for the worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EmailTask {
    /// A code was assigned to a learner; the worker reports delivery status
    /// back against `offer_assignment_id`.
    Assignment {
        learner_email: String,
        offer_assignment_id: u64,
        subject: String,
        email_body: String,
    },
    Reminder {
        learner_email: String,
        subject: String,
        email_body: String,
    },
    Revocation {
        learner_email: String,
        subject: String,
        email_body: String,
    },
}

impl EmailTask {
    /// Name of the worker task that handles this payload
    pub fn task_name(&self) -> &'static str {
        match self {
            Self::Assignment { .. } => ASSIGNMENT_TASK,
            Self::Reminder { .. } | Self::Revocation { .. } => UPDATE_TASK,
        }
    }

    pub fn recipient(&self) -> &str {
        match self {
            Self::Assignment { learner_email, .. }
            | Self::Reminder { learner_email, .. }
            | Self::Revocation { learner_email, .. } => learner_email,
        }
    }

    pub fn subject(&self) -> &str {
        match self {
            Self::Assignment { subject, .. }
            | Self::Reminder { subject, .. }
            | Self::Revocation { subject, .. } => subject,
        }
    }

    pub fn email_body(&self) -> &str {
        match self {
            Self::Assignment { email_body, .. }
            | Self::Reminder { email_body, .. }
            | Self::Revocation { email_body, .. } => email_body,
        }
    }

    /// Short label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Assignment { .. } => "assignment",
            Self::Reminder { .. } => "reminder",
            Self::Revocation { .. } => "revocation",
        }
    }
}
