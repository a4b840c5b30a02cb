mod settings;

pub use settings::{EmailSettings, LogSettings, QueueSettings, Settings};
