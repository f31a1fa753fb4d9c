//! Scan and replace orchestration over a [`Host`].

use crate::collector::collect_usage;
use crate::controls::ScanControls;
use crate::host::{Host, HostError};
use crate::matcher::UrlMatcher;
use crate::replacer::{replace_references, ReplaceOutcome, ReplaceRequest};
use crate::sizer::SizeResolver;
use crate::state::{ImageUsage, ScanState};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Runs one collect-then-size cycle and returns records in first-seen order.
///
/// Never fails: missing host capabilities yield fewer records and failed
/// lookups yield unknown sizes.
pub async fn scan_usage(
    host: &dyn Host,
    matcher: &UrlMatcher,
    resolver: &SizeResolver,
) -> Vec<ImageUsage> {
    let counts = collect_usage(host, matcher).await;
    let mut sizes = resolver.resolve_all(counts.keys().cloned()).await;
    counts
        .into_iter()
        .map(|(url, count)| {
            let size = sizes.remove(&url).flatten();
            ImageUsage { url, count, size }
        })
        .collect()
}

/// Usage scanner bound to one host, carrying the session state.
pub struct UsageScanner {
    host: Arc<dyn Host>,
    matcher: UrlMatcher,
    resolver: SizeResolver,
    state: ScanState,
}

impl UsageScanner {
    /// Builds a scanner whose matcher and HTTP client follow `controls`.
    pub fn new(host: Arc<dyn Host>, controls: &ScanControls) -> Result<Self, reqwest::Error> {
        Ok(Self::with_resolver(
            host,
            controls.matcher(),
            SizeResolver::new(controls)?,
        ))
    }

    /// Builds a scanner from preassembled parts.
    pub fn with_resolver(host: Arc<dyn Host>, matcher: UrlMatcher, resolver: SizeResolver) -> Self {
        Self {
            host,
            matcher,
            resolver,
            state: ScanState::new(),
        }
    }

    /// Current session state.
    pub fn state(&self) -> &ScanState {
        &self.state
    }

    /// Mutable session state, for selection and input edits.
    pub fn state_mut(&mut self) -> &mut ScanState {
        &mut self.state
    }

    /// Rebuilds the record set from live host data.
    pub async fn scan(&mut self) -> &[ImageUsage] {
        self.state.begin_scan();
        let started = Instant::now();
        let records = scan_usage(self.host.as_ref(), &self.matcher, &self.resolver).await;
        info!(
            urls = records.len(),
            references = records.iter().map(|record| record.count).sum::<usize>(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "scan complete"
        );
        self.state.on_scan_complete(records);
        self.state.records()
    }

    /// Replaces the selected URLs with the pending replacement, then rescans.
    ///
    /// Returns `Ok(None)` without touching the host when the input is empty or
    /// nothing is selected. Otherwise the input is cleared and a rescan runs,
    /// even when no reference matched.
    pub async fn replace_selected(&mut self) -> Result<Option<ReplaceOutcome>, HostError> {
        let selected = self.state.selected_urls();
        let Some(request) = ReplaceRequest::new(selected, self.state.replacement()) else {
            return Ok(None);
        };

        self.state.begin_replace();
        let outcome = match replace_references(self.host.as_ref(), &self.matcher, &request).await
        {
            Ok(outcome) => outcome,
            Err(err) => {
                self.state.on_replace_failed();
                return Err(err);
            }
        };
        self.state.on_replace_complete();
        self.scan().await;
        Ok(Some(outcome))
    }
}
