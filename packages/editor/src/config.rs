use std::time::Duration;

/// Default trailing-edge debounce for property edits
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Default number of undo levels
pub const DEFAULT_HISTORY_LEVELS: usize = 100;

/// Edit session tuning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Quiet period after the last property edit before it commits
    pub debounce: Duration,

    /// Maximum number of undo levels (0 = unlimited)
    pub history_levels: usize,
}

impl SessionConfig {
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_history_levels(mut self, history_levels: usize) -> Self {
        self.history_levels = history_levels;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            history_levels: DEFAULT_HISTORY_LEVELS,
        }
    }
}
