use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;

use crate::config::{EmailSettings, Settings};
use crate::error::Result;
use crate::queue::{create_task_queue, QueueError, TaskQueue};
use crate::redis::RedisPool;
use crate::template::{format_email, placeholder_names, PlaceholderMap};

use super::EmailTask;

/// Counters for tasks handed to the queue
#[derive(Debug, Default)]
pub struct MailerStats {
    /// Tasks accepted by the queue
    pub total_submitted: AtomicU64,
    /// Hand-offs rejected by the queue
    pub total_failed: AtomicU64,
    pub assignments: AtomicU64,
    pub reminders: AtomicU64,
    pub revocations: AtomicU64,
}

impl MailerStats {
    pub fn snapshot(&self) -> MailerStatsSnapshot {
        MailerStatsSnapshot {
            total_submitted: self.total_submitted.load(Ordering::Relaxed),
            total_failed: self.total_failed.load(Ordering::Relaxed),
            assignments: self.assignments.load(Ordering::Relaxed),
            reminders: self.reminders.load(Ordering::Relaxed),
            revocations: self.revocations.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of mailer statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MailerStatsSnapshot {
    pub total_submitted: u64,
    pub total_failed: u64,
    pub assignments: u64,
    pub reminders: u64,
    pub revocations: u64,
}

/// Renders offer emails and hands them to the worker queue.
///
/// Every `send_*` call submits exactly one task and returns once the queue
/// has accepted it. Delivery happens out of process; nothing here waits for
/// or retries it.
pub struct OfferMailer {
    queue: Arc<dyn TaskQueue>,
    settings: EmailSettings,
    stats: MailerStats,
}

impl OfferMailer {
    pub fn new(queue: Arc<dyn TaskQueue>, settings: EmailSettings) -> Self {
        Self {
            queue,
            settings,
            stats: MailerStats::default(),
        }
    }

    /// Build a mailer and its queue backend from application settings
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let redis_pool = match settings.queue.backend.as_str() {
            "redis" => Some(Arc::new(RedisPool::new(&settings.queue.redis_url)?)),
            _ => None,
        };

        let queue = create_task_queue(&settings.queue, redis_pool);
        Ok(Self::new(queue, settings.email.clone()))
    }

    pub fn settings(&self) -> &EmailSettings {
        &self.settings
    }

    pub fn stats(&self) -> MailerStatsSnapshot {
        self.stats.snapshot()
    }

    /// Send the email announcing a newly assigned code.
    #[allow(clippy::too_many_arguments)]
    pub async fn send_assigned_offer_email(
        &self,
        greeting: Option<&str>,
        closing: Option<&str>,
        offer_assignment_id: u64,
        learner_email: &str,
        code: &str,
        redemptions_remaining: u64,
        code_expiration_date: impl Display,
    ) -> std::result::Result<(), QueueError> {
        let placeholders = PlaceholderMap::new()
            .with("REDEMPTIONS_REMAINING", redemptions_remaining)
            .with("USER_EMAIL", learner_email)
            .with("CODE", code)
            .with("EXPIRATION_DATE", code_expiration_date);

        let email_body = self.render(
            &self.settings.assignment_template,
            &placeholders,
            greeting,
            closing,
        );

        self.submit(EmailTask::Assignment {
            learner_email: learner_email.to_string(),
            offer_assignment_id,
            subject: self.settings.assignment_subject.clone(),
            email_body,
        })
        .await
    }

    /// Send a reminder for a code that is assigned but not fully redeemed.
    #[allow(clippy::too_many_arguments)]
    pub async fn send_assigned_offer_reminder_email(
        &self,
        greeting: Option<&str>,
        closing: Option<&str>,
        learner_email: &str,
        code: &str,
        redeemed_offer_count: u64,
        total_offer_count: u64,
        code_expiration_date: impl Display,
    ) -> std::result::Result<(), QueueError> {
        let placeholders = PlaceholderMap::new()
            .with("REDEEMED_OFFER_COUNT", redeemed_offer_count)
            .with("TOTAL_OFFER_COUNT", total_offer_count)
            .with("USER_EMAIL", learner_email)
            .with("CODE", code)
            .with("EXPIRATION_DATE", code_expiration_date);

        let email_body = self.render(
            &self.settings.reminder_template,
            &placeholders,
            greeting,
            closing,
        );

        self.submit(EmailTask::Reminder {
            learner_email: learner_email.to_string(),
            subject: self.settings.reminder_subject.clone(),
            email_body,
        })
        .await
    }

    /// Tell a learner their code assignment was revoked.
    pub async fn send_revoked_offer_email(
        &self,
        greeting: Option<&str>,
        closing: Option<&str>,
        learner_email: &str,
        code: &str,
    ) -> std::result::Result<(), QueueError> {
        let placeholders = PlaceholderMap::new()
            .with("USER_EMAIL", learner_email)
            .with("CODE", code);

        let email_body = self.render(
            &self.settings.revoke_template,
            &placeholders,
            greeting,
            closing,
        );

        self.submit(EmailTask::Revocation {
            learner_email: learner_email.to_string(),
            subject: self.settings.revoke_subject.clone(),
            email_body,
        })
        .await
    }

    fn render(
        &self,
        template: &str,
        placeholders: &PlaceholderMap,
        greeting: Option<&str>,
        closing: Option<&str>,
    ) -> String {
        let unresolved: Vec<String> = placeholder_names(template)
            .into_iter()
            .filter(|name| !placeholders.contains(name))
            .collect();

        if !unresolved.is_empty() {
            tracing::debug!(
                unresolved = ?unresolved,
                "Template references placeholders with no value; leaving them as-is"
            );
        }

        format_email(template, placeholders, greeting, closing)
    }

    async fn submit(&self, task: EmailTask) -> std::result::Result<(), QueueError> {
        let kind = task.kind();
        let recipient = task.recipient().to_string();
        let counter = match &task {
            EmailTask::Assignment { .. } => &self.stats.assignments,
            EmailTask::Reminder { .. } => &self.stats.reminders,
            EmailTask::Revocation { .. } => &self.stats.revocations,
        };

        match self.queue.submit(task).await {
            Ok(task_id) => {
                self.stats.total_submitted.fetch_add(1, Ordering::Relaxed);
                counter.fetch_add(1, Ordering::Relaxed);

                tracing::info!(
                    task_id = %task_id,
                    kind = kind,
                    recipient = %recipient,
                    backend = self.queue.backend_type(),
                    "Offer email handed to worker queue"
                );
                Ok(())
            }
            Err(e) => {
                self.stats.total_failed.fetch_add(1, Ordering::Relaxed);
                tracing::error!(
                    error = %e,
                    kind = kind,
                    recipient = %recipient,
                    "Failed to hand offer email to worker queue"
                );
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use uuid::Uuid;

    use super::*;
    use crate::queue::MemoryTaskQueue;

    /// Records every submission without queueing anything
    #[derive(Default)]
    struct RecordingQueue {
        submitted: Mutex<Vec<EmailTask>>,
        fail: bool,
    }

    #[async_trait]
    impl TaskQueue for RecordingQueue {
        fn backend_type(&self) -> &'static str {
            "recording"
        }

        fn is_enabled(&self) -> bool {
            true
        }

        async fn submit(&self, task: EmailTask) -> std::result::Result<Uuid, QueueError> {
            self.submitted.lock().unwrap().push(task);
            if self.fail {
                return Err(QueueError::Unavailable("broker down".to_string()));
            }
            Ok(Uuid::new_v4())
        }
    }

    fn mailer_with(queue: Arc<RecordingQueue>) -> OfferMailer {
        OfferMailer::new(queue, EmailSettings::default())
    }

    #[tokio::test]
    async fn test_assignment_submitted_once() {
        let queue = Arc::new(RecordingQueue::default());
        let mailer = mailer_with(queue.clone());

        mailer
            .send_assigned_offer_email(
                Some("hi"),
                Some("bye"),
                555,
                "johndoe@unknown.com",
                "GIL7RUEOU7VHBH7Q",
                10,
                "2018-12-19",
            )
            .await
            .unwrap();

        let submitted = queue.submitted.lock().unwrap();
        assert_eq!(submitted.len(), 1);
        match &submitted[0] {
            EmailTask::Assignment {
                learner_email,
                offer_assignment_id,
                subject,
                email_body,
            } => {
                assert_eq!(learner_email, "johndoe@unknown.com");
                assert_eq!(*offer_assignment_id, 555);
                assert_eq!(subject, &mailer.settings().assignment_subject);
                assert!(email_body.starts_with("hi\n"));
                assert!(email_body.ends_with("\nbye"));
                assert!(email_body.contains("GIL7RUEOU7VHBH7Q"));
                assert!(email_body.contains("2018-12-19"));
                assert!(email_body.contains("10"));
            }
            other => panic!("unexpected task: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_reminder_uses_configured_subject() {
        let queue = Arc::new(RecordingQueue::default());
        let settings = EmailSettings {
            reminder_subject: "Don't forget your code".to_string(),
            ..Default::default()
        };
        let mailer = OfferMailer::new(queue.clone(), settings);

        mailer
            .send_assigned_offer_reminder_email(
                Some("hi"),
                Some("bye"),
                "johndoe@unknown.com",
                "GIL7RUEOU7VHBH7Q",
                0,
                1,
                "2018-12-19",
            )
            .await
            .unwrap();

        let submitted = queue.submitted.lock().unwrap();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].recipient(), "johndoe@unknown.com");
        assert_eq!(submitted[0].subject(), "Don't forget your code");
        assert!(submitted[0]
            .email_body()
            .contains("redeemed this code 0 of times out of 1"));
    }

    #[tokio::test]
    async fn test_revocation_without_greeting() {
        let queue = Arc::new(RecordingQueue::default());
        let settings = EmailSettings {
            revoke_template: "Code {CODE} for {USER_EMAIL} was revoked. {SUPPORT_LINK}".to_string(),
            ..Default::default()
        };
        let mailer = OfferMailer::new(queue.clone(), settings);

        mailer
            .send_revoked_offer_email(None, None, "johndoe@unknown.com", "GIL7RUEOU7VHBH7Q")
            .await
            .unwrap();

        let submitted = queue.submitted.lock().unwrap();
        assert_eq!(submitted.len(), 1);
        assert_eq!(
            submitted[0].email_body(),
            "Code GIL7RUEOU7VHBH7Q for johndoe@unknown.com was revoked. {SUPPORT_LINK}"
        );
        assert_eq!(submitted[0].task_name(), "send_offer_update_email");
    }

    #[tokio::test]
    async fn test_queue_failure_is_returned() {
        let queue = Arc::new(RecordingQueue {
            fail: true,
            ..Default::default()
        });
        let mailer = mailer_with(queue.clone());

        let result = mailer
            .send_revoked_offer_email(Some("hi"), Some("bye"), "johndoe@unknown.com", "CODE1")
            .await;

        assert!(matches!(result, Err(QueueError::Unavailable(_))));
        // no retry
        assert_eq!(queue.submitted.lock().unwrap().len(), 1);

        let stats = mailer.stats();
        assert_eq!(stats.total_failed, 1);
        assert_eq!(stats.total_submitted, 0);
    }

    #[tokio::test]
    async fn test_stats_count_by_kind() {
        let mailer = OfferMailer::new(
            Arc::new(MemoryTaskQueue::default()),
            EmailSettings::default(),
        );

        mailer
            .send_assigned_offer_email(None, None, 1, "a@example.com", "C1", 5, "2018-12-19")
            .await
            .unwrap();
        mailer
            .send_assigned_offer_reminder_email(None, None, "a@example.com", "C1", 0, 1, "2018-12-19")
            .await
            .unwrap();
        mailer
            .send_revoked_offer_email(None, None, "a@example.com", "C1")
            .await
            .unwrap();
        mailer
            .send_revoked_offer_email(None, None, "b@example.com", "C2")
            .await
            .unwrap();

        assert_eq!(
            mailer.stats(),
            MailerStatsSnapshot {
                total_submitted: 4,
                total_failed: 0,
                assignments: 1,
                reminders: 1,
                revocations: 2,
            }
        );
    }

    #[test]
    fn test_from_settings_memory() {
        let settings = Settings {
            email: EmailSettings::default(),
            queue: Default::default(),
            log: Default::default(),
        };

        let mailer = OfferMailer::from_settings(&settings).unwrap();
        assert_eq!(mailer.settings().default_currency, "USD");
    }
}
