use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

pub const DEFAULT_ASSIGNMENT_SUBJECT: &str = "New edX course assignment";
pub const DEFAULT_REMINDER_SUBJECT: &str = "Reminder on edX course assignment";
pub const DEFAULT_REVOKE_SUBJECT: &str = "edX Course Assignment Revoked";

pub const DEFAULT_ASSIGNMENT_TEMPLATE: &str = "\
Your learning manager has provided you with a new access code to take a course at edX.
You may redeem this code for {REDEMPTIONS_REMAINING} courses.

edX login: {USER_EMAIL}
Access Code: {CODE}
Expiration date: {EXPIRATION_DATE}

You can insert the access code at check out under \"coupon code\" for applicable courses.

For any questions, please reach out to your Learning Manager.";

pub const DEFAULT_REMINDER_TEMPLATE: &str = "\
This is a reminder email that your learning manager has provided you with a access code to take a course at edX.
You have redeemed this code {REDEEMED_OFFER_COUNT} of times out of {TOTAL_OFFER_COUNT} number of available course redemptions.

edX login: {USER_EMAIL}
Access Code: {CODE}
Expiration date: {EXPIRATION_DATE}

You can insert the access code at check out under \"coupon code\" for applicable courses.

For any questions, please reach out to your Learning Manager.";

pub const DEFAULT_REVOKE_TEMPLATE: &str = "\
Your Learning Manager has revoked access code {CODE} and it is no longer assigned to your edX account {USER_EMAIL}.

For any questions, please reach out to your Learning Manager.";

/// Environment variables must start with `OFFER_` to be read as settings
pub const ENV_PREFIX: &str = "OFFER";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub email: EmailSettings,
    #[serde(default)]
    pub queue: QueueSettings,
    #[serde(default)]
    pub log: LogSettings,
}

/// Subjects and bodies for the three offer emails
#[derive(Debug, Clone, Deserialize)]
pub struct EmailSettings {
    #[serde(default = "default_assignment_subject")]
    pub assignment_subject: String,
    #[serde(default = "default_reminder_subject")]
    pub reminder_subject: String,
    #[serde(default = "default_revoke_subject")]
    pub revoke_subject: String,
    #[serde(default = "default_assignment_template")]
    pub assignment_template: String,
    #[serde(default = "default_reminder_template")]
    pub reminder_template: String,
    #[serde(default = "default_revoke_template")]
    pub revoke_template: String,
    /// ISO code used for fixed-amount benefits stored without a currency
    #[serde(default = "default_currency")]
    pub default_currency: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueueSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// "memory" or "redis"
    #[serde(default = "default_backend")]
    pub backend: String,
    #[serde(default = "default_redis_url")]
    pub redis_url: String,
    #[serde(default = "default_redis_prefix")]
    pub redis_prefix: String,
    /// Per-task cap for the memory backend, at least 1
    #[serde(default = "default_max_pending")]
    pub max_pending: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

fn default_assignment_subject() -> String {
    DEFAULT_ASSIGNMENT_SUBJECT.to_string()
}

fn default_reminder_subject() -> String {
    DEFAULT_REMINDER_SUBJECT.to_string()
}

fn default_revoke_subject() -> String {
    DEFAULT_REVOKE_SUBJECT.to_string()
}

fn default_assignment_template() -> String {
    DEFAULT_ASSIGNMENT_TEMPLATE.to_string()
}

fn default_reminder_template() -> String {
    DEFAULT_REMINDER_TEMPLATE.to_string()
}

fn default_revoke_template() -> String {
    DEFAULT_REVOKE_TEMPLATE.to_string()
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_true() -> bool {
    true
}

fn default_backend() -> String {
    "memory".to_string()
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_redis_prefix() -> String {
    "ecommerce_worker".to_string()
}

fn default_max_pending() -> usize {
    10_000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            .set_default("queue.enabled", true)?
            .set_default("queue.backend", "memory")?
            .set_default("log.level", "info")?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Load from environment variables
            // OFFER_EMAIL__ASSIGNMENT_SUBJECT, OFFER_QUEUE__BACKEND, OFFER_LOG__LEVEL, etc.
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let settings: Self = builder.build()?.try_deserialize()?;
        settings.queue.validate()?;
        Ok(settings)
    }
}

impl QueueSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_pending == 0 {
            return Err(ConfigError::Message(
                "queue.max_pending must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for EmailSettings {
    fn default() -> Self {
        Self {
            assignment_subject: default_assignment_subject(),
            reminder_subject: default_reminder_subject(),
            revoke_subject: default_revoke_subject(),
            assignment_template: default_assignment_template(),
            reminder_template: default_reminder_template(),
            revoke_template: default_revoke_template(),
            default_currency: default_currency(),
        }
    }
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            backend: default_backend(),
            redis_url: default_redis_url(),
            redis_prefix: default_redis_prefix(),
            max_pending: default_max_pending(),
        }
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
