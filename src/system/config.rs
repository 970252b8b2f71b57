//! Configuration for a fresh container.

use crate::task::domain::Time;
use serde::{Deserialize, Serialize};

/// Configuration for [`super::services::TaskManSystem`].
///
/// # Examples
///
/// ```
/// use taskman::system::config::SystemConfig;
/// use taskman::task::domain::Time;
///
/// let config = SystemConfig::default();
/// assert_eq!(config.start_time, Time::ZERO);
///
/// let later = SystemConfig::starting_at(Time::from_minutes(480));
/// assert_eq!(later.start_time.minutes(), 480);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Logical time the clock starts at.
    pub start_time: Time,
}

impl SystemConfig {
    /// Creates a configuration whose clock starts at `start_time`.
    #[must_use]
    pub const fn starting_at(start_time: Time) -> Self {
        Self { start_time }
    }
}
