//! Worker configuration and environment loaders.
use std::env;
use std::time::Duration;

/// Tunables for one actor worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkerConfig {
    /// Interval between executor ticks.
    pub tick_interval: Duration,
    pub command_buffer_size: usize,
    /// Capacity of each event bus topic.
    pub event_buffer_size: usize,
}

impl WorkerConfig {
    pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(16);
    pub const DEFAULT_COMMAND_BUFFER: usize = 32;
    pub const DEFAULT_EVENT_BUFFER: usize = 100;
    /// Shortest interval the worker will tick at.
    pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

    pub fn new() -> Self {
        Self {
            tick_interval: Self::DEFAULT_TICK_INTERVAL,
            command_buffer_size: Self::DEFAULT_COMMAND_BUFFER,
            event_buffer_size: Self::DEFAULT_EVENT_BUFFER,
        }
    }

    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval.max(Self::MIN_TICK_INTERVAL);
        self
    }

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `ACTION_TICK_MS` - Milliseconds between ticks (default: 16, minimum: 1)
    /// - `ACTION_COMMAND_BUFFER` - Command queue size (default: 32)
    /// - `ACTION_EVENT_BUFFER` - Per-topic event capacity (default: 100)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(ms) = read_env::<u64>("ACTION_TICK_MS") {
            config.tick_interval = Duration::from_millis(ms).max(Self::MIN_TICK_INTERVAL);
        }

        if let Some(capacity) = read_env::<usize>("ACTION_COMMAND_BUFFER") {
            config.command_buffer_size = capacity.max(1);
        }

        if let Some(capacity) = read_env::<usize>("ACTION_EVENT_BUFFER") {
            config.event_buffer_size = capacity.max(1);
        }

        config
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = WorkerConfig::default();
        assert_eq!(config.tick_interval, Duration::from_millis(16));
        assert_eq!(config.command_buffer_size, 32);
        assert_eq!(config.event_buffer_size, 100);
    }

    #[test]
    fn zero_tick_interval_is_clamped() {
        let config = WorkerConfig::new().with_tick_interval(Duration::ZERO);
        assert_eq!(config.tick_interval, Duration::from_millis(1));
    }
}
