//! Parser warnings with colored terminal output.
//!
//! A [`WarningLog`] belongs to a single parse. It deduplicates messages so
//! the same recoverable problem is reported once, and only writes to stderr
//! when the owner asked for it.

use std::collections::HashSet;

use owo_colors::OwoColorize;

fn warning_key(component: &str, message: &str) -> String {
    format!("[{component}] {message}")
}

/// Deduplicated warnings for one parse.
#[derive(Debug, Clone, Default)]
pub struct WarningLog {
    /// Warnings we've already seen (to deduplicate)
    seen: HashSet<String>,
    /// Whether first occurrences are echoed to stderr.
    echo: bool,
}

impl WarningLog {
    /// A silent log. Messages are recorded but never printed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A log that also prints each first occurrence to stderr.
    #[must_use]
    pub fn echoing() -> Self {
        Self {
            seen: HashSet::new(),
            echo: true,
        }
    }

    /// Whether this log writes to stderr.
    #[must_use]
    pub const fn echoes(&self) -> bool {
        self.echo
    }

    /// Warn about a recoverable problem (prints once per unique message).
    ///
    /// Returns true the first time a message is seen.
    ///
    /// # Example
    /// ```
    /// let mut log = sumi_common::warning::WarningLog::new();
    /// assert!(log.warn_once("HTML Tokenizer", "unexpected-null-character at 12"));
    /// assert!(!log.warn_once("HTML Tokenizer", "unexpected-null-character at 12"));
    /// ```
    pub fn warn_once(&mut self, component: &str, message: &str) -> bool {
        let first_time = self.seen.insert(warning_key(component, message));
        if first_time && self.echo {
            eprintln!("{}", format!("[sumi {component}] ⚠ {message}").yellow());
        }
        first_time
    }

    /// Returns true if `warn_once` has already seen this exact warning.
    #[must_use]
    pub fn has_warned(&self, component: &str, message: &str) -> bool {
        self.seen.contains(&warning_key(component, message))
    }

    /// Number of distinct warnings recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// True when nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Forget every recorded warning.
    pub fn clear(&mut self) {
        self.seen.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_is_recorded_once() {
        let mut log = WarningLog::new();
        assert!(log.warn_once("Test", "recorded-once"));
        assert!(!log.warn_once("Test", "recorded-once"));
        assert!(log.has_warned("Test", "recorded-once"));
        assert!(!log.has_warned("Other", "recorded-once"));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_logs_do_not_share_state() {
        let mut first = WarningLog::new();
        let second = WarningLog::echoing();
        let _ = first.warn_once("Test", "isolated");
        assert!(!second.has_warned("Test", "isolated"));
        assert!(second.echoes() && !first.echoes());

        first.clear();
        assert!(first.is_empty());
    }
}
