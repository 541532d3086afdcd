//! Severity set filters for sinks

use super::log_level::LogLevel;

/// Whether the listed levels are the ones removed or the only ones kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Suppress,
    PassOnly,
}

/// Filter over a fixed set of severities.
///
/// Used to split redirected standard output away from real log levels:
/// the stdout sink passes only `STDOUT`, the stderr sink suppresses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelFilter {
    levels: Vec<LogLevel>,
    mode: FilterMode,
}

impl LevelFilter {
    pub fn suppress(levels: impl IntoIterator<Item = LogLevel>) -> Self {
        Self {
            levels: levels.into_iter().collect(),
            mode: FilterMode::Suppress,
        }
    }

    pub fn pass_only(levels: impl IntoIterator<Item = LogLevel>) -> Self {
        Self {
            levels: levels.into_iter().collect(),
            mode: FilterMode::PassOnly,
        }
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    pub fn allows(&self, level: LogLevel) -> bool {
        let listed = self.levels.contains(&level);
        match self.mode {
            FilterMode::Suppress => !listed,
            FilterMode::PassOnly => listed,
        }
    }
}
