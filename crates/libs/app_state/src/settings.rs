use crate::{LoggingSettings, RawSettings, SecretSettings};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub logging: LoggingSettings,
    pub events: EventSettings,
    pub secrets: SecretSettings,
}

#[derive(Debug, Clone)]
pub struct EventSettings {
    pub poll_interval: Duration,
    pub max_attempts: i32,
}

impl From<RawSettings> for AppSettings {
    fn from(raw: RawSettings) -> Self {
        let events = EventSettings {
            poll_interval: Duration::from_millis(raw.events.poll_interval_ms),
            max_attempts: raw.events.max_attempts,
        };

        Self {
            logging: raw.logging,
            events,
            secrets: raw.secrets,
        }
    }
}
