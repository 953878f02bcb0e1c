// Warning filter - deduplicates and suppresses known-noisy bundler warnings

use crate::config::WarnHook;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

/// Substrings of bundler diagnostics that are known to be benign and are
/// suppressed outright rather than forwarded to the logger
const SUPPRESSED_FRAGMENTS: &[&str] = &[
    "Circular dependency",
    "has been rewritten to undefined",
    "Use of eval",
];

/// Deduplicating warning filter for one bundler invocation.
///
/// A given distinct message is forwarded to the logger at most once per
/// build; repeats and known-benign diagnostics are dropped. The dedup set is
/// recreated with the filter, so a fresh invocation starts clean.
#[derive(Debug, Default)]
pub struct WarningFilter {
    seen: Mutex<HashSet<String>>,
}

impl WarningFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle one bundler warning, forwarding it if it is new and not on the
    /// suppress list. Returns whether the message was forwarded.
    pub fn warn(&self, message: &str) -> bool {
        if !self.seen.lock().insert(message.to_string()) {
            return false;
        }

        if SUPPRESSED_FRAGMENTS.iter().any(|f| message.contains(f)) {
            tracing::debug!(message, "suppressed known-benign bundler warning");
            return false;
        }

        tracing::warn!("{message}");
        true
    }

    /// Wrap the filter into a callback compatible with the bundler's
    /// warning-reporting hook.
    pub fn into_hook(self) -> WarnHook {
        let filter = Arc::new(self);
        Arc::new(move |message: &str| {
            filter.warn(message);
        })
    }
}
