//! Runtime configuration for the duel server.

use once_cell::sync::Lazy;
use std::env;
use tokio::time::Duration;

#[derive(Debug)]
pub struct Settings {
    /// Address the HTTP/WS server binds to.
    pub server_addr: String,
    /// Seconds in one planning countdown.
    pub turn_time: u32,
    /// Seconds a vacated seat is held before the room is torn down.
    pub disconnect_grace: u64,
    /// Percentage applied to resolution pacing delays (0 = no pacing).
    pub resolution_pace: u64,
}

fn var_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl Settings {
    fn from_env() -> Self {
        let server_addr = env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".into());
        let turn_time = var_or("TURN_TIME", 90);
        let disconnect_grace = var_or("DISCONNECT_GRACE", 60);
        let resolution_pace = var_or("RESOLUTION_PACE", 100);

        Settings {
            server_addr,
            turn_time,
            disconnect_grace,
            resolution_pace,
        }
    }
}

static SETTINGS: Lazy<Settings> = Lazy::new(Settings::from_env);

pub fn settings() -> &'static Settings {
    &SETTINGS
}

/// The subset of [`Settings`] a room needs, passed in explicitly.
#[derive(Debug, Clone, Copy)]
pub struct RoomSettings {
    pub turn_time: u32,
    pub disconnect_grace: Duration,
    pub resolution_pace: u64,
}

impl RoomSettings {
    /// Scales a pacing delay by the configured pace.
    pub fn pace(&self, ms: u64) -> Duration {
        Duration::from_millis(ms.saturating_mul(self.resolution_pace) / 100)
    }
}

impl Default for RoomSettings {
    fn default() -> Self {
        RoomSettings {
            turn_time: 90,
            disconnect_grace: Duration::from_secs(60),
            resolution_pace: 100,
        }
    }
}

impl From<&Settings> for RoomSettings {
    fn from(s: &Settings) -> Self {
        RoomSettings {
            turn_time: s.turn_time,
            disconnect_grace: Duration::from_secs(s.disconnect_grace),
            resolution_pace: s.resolution_pace,
        }
    }
}
