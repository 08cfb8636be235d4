use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct RawSettings {
    pub logging: LoggingSettings,
    pub events: RawEventSettings,
    pub secrets: SecretSettings,
}

/// Logging configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: String,
}

/// Event queue configuration as it appears in the settings file.
#[derive(Debug, Deserialize, Clone)]
pub struct RawEventSettings {
    /// How long the worker sleeps between polls when the queue is empty.
    pub poll_interval_ms: u64,
    /// How often a failed event is attempted before it is marked failed.
    pub max_attempts: i32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SecretSettings {
    pub database_url: String,
}
