//! Presentation state for one scan/replace session.
//!
//! Holds the displayed records, the per-row selection and the pending
//! replacement URL, independent of any rendering toolkit.

use serde::Serialize;
use std::collections::HashMap;

/// One distinct tracked URL from the latest scan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ImageUsage {
    /// Image URL; unique within a scan.
    pub url: String,
    /// Number of references found.
    pub count: usize,
    /// Size in bytes, when a size lookup succeeded.
    pub size: Option<u64>,
}

/// Where the session is in its scan/replace cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Nothing scanned yet.
    #[default]
    Idle,
    /// Collecting references and probing sizes.
    Scanning,
    /// Records are shown and editable.
    Displaying,
    /// Rewriting references in the host.
    Replacing,
}

/// Records, selection and replacement input for the current session.
#[derive(Clone, Debug, Default)]
pub struct ScanState {
    records: Vec<ImageUsage>,
    selection: HashMap<String, bool>,
    replacement: String,
    phase: Phase,
}

impl ScanState {
    /// Fresh state before the first scan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Records from the latest completed scan.
    pub fn records(&self) -> &[ImageUsage] {
        &self.records
    }

    /// Pending replacement URL.
    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Enters [`Phase::Scanning`].
    pub fn begin_scan(&mut self) {
        self.phase = Phase::Scanning;
    }

    /// Installs a new record set and clears every selection.
    pub fn on_scan_complete(&mut self, records: Vec<ImageUsage>) {
        self.records = records;
        self.selection.clear();
        self.phase = Phase::Displaying;
    }

    /// Enters [`Phase::Replacing`].
    pub fn begin_replace(&mut self) {
        self.phase = Phase::Replacing;
    }

    /// Clears the replacement input; a rescan always follows.
    pub fn on_replace_complete(&mut self) {
        self.replacement.clear();
        self.phase = Phase::Scanning;
    }

    /// Returns to [`Phase::Displaying`] after a failed replacement, keeping
    /// the input and selection so the action can be retried.
    pub fn on_replace_failed(&mut self) {
        self.phase = Phase::Displaying;
    }

    /// Flips the selection of a displayed URL.
    pub fn toggle(&mut self, url: &str) {
        let current = self.is_selected(url);
        self.set_selected(url, !current);
    }

    /// Sets the selection of a displayed URL; unknown URLs are ignored.
    pub fn set_selected(&mut self, url: &str, selected: bool) {
        if self.records.iter().any(|record| record.url == url) {
            self.selection.insert(url.to_string(), selected);
        }
    }

    /// Whether `url` is currently selected.
    pub fn is_selected(&self, url: &str) -> bool {
        self.selection.get(url).copied().unwrap_or(false)
    }

    /// Updates the pending replacement URL.
    pub fn set_replacement(&mut self, text: impl Into<String>) {
        self.replacement = text.into();
    }

    /// Selected URLs in record order.
    pub fn selected_urls(&self) -> Vec<String> {
        self.records
            .iter()
            .filter(|record| self.is_selected(&record.url))
            .map(|record| record.url.clone())
            .collect()
    }

    /// Whether the replace action is available.
    pub fn can_replace(&self) -> bool {
        !self.replacement.is_empty() && self.selection.values().any(|selected| *selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn usage(url: &str, count: usize) -> ImageUsage {
        ImageUsage {
            url: url.to_string(),
            count,
            size: None,
        }
    }

    fn displaying() -> ScanState {
        let mut state = ScanState::new();
        state.begin_scan();
        state.on_scan_complete(vec![usage("a", 2), usage("b", 1)]);
        state
    }

    #[test]
    fn scan_completion_resets_selection() {
        let mut state = displaying();
        state.toggle("a");
        assert_eq!(state.selected_urls(), vec!["a".to_string()]);

        state.begin_scan();
        state.on_scan_complete(vec![usage("a", 2)]);
        assert_eq!(state.phase(), Phase::Displaying);
        assert!(state.selected_urls().is_empty());
    }

    #[test]
    fn replace_requires_input_and_selection() {
        let mut state = displaying();
        assert!(!state.can_replace());
        state.set_replacement("c");
        assert!(!state.can_replace());
        state.toggle("b");
        assert!(state.can_replace());
        state.toggle("b");
        assert!(!state.can_replace());
    }

    #[test]
    fn unknown_urls_are_not_selectable() {
        let mut state = displaying();
        state.set_selected("zzz", true);
        assert!(state.selected_urls().is_empty());
    }

    #[test]
    fn replace_completion_clears_input() {
        let mut state = displaying();
        state.set_replacement("c");
        state.begin_replace();
        assert_eq!(state.phase(), Phase::Replacing);
        state.on_replace_complete();
        assert_eq!(state.replacement(), "");
        assert_eq!(state.phase(), Phase::Scanning);
    }
}
