//! Rendering of usage records for terminals and machines.

use crate::state::ImageUsage;

/// Shown in place of a size that could not be determined.
pub const UNKNOWN_SIZE: &str = "-";

/// Formats a byte count as kilobytes with two decimals.
pub fn format_size(size: Option<u64>) -> String {
    match size {
        Some(bytes) => format!("{:.2} KB", bytes as f64 / 1024.0),
        None => UNKNOWN_SIZE.to_string(),
    }
}

/// Aggregate figures over a record set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsageSummary {
    /// Distinct URLs.
    pub urls: usize,
    /// References across all URLs.
    pub references: usize,
    /// Bytes over URLs with a known size.
    pub known_bytes: u64,
    /// URLs whose size is unknown.
    pub unknown_sizes: usize,
}

impl UsageSummary {
    /// Totals the provided records.
    pub fn from_records(records: &[ImageUsage]) -> Self {
        records.iter().fold(Self::default(), |mut acc, record| {
            acc.urls += 1;
            acc.references += record.count;
            match record.size {
                Some(bytes) => acc.known_bytes += bytes,
                None => acc.unknown_sizes += 1,
            }
            acc
        })
    }
}

/// Renders records as an aligned table followed by a summary line.
pub fn render_table(records: &[ImageUsage]) -> String {
    let sizes: Vec<String> = records.iter().map(|r| format_size(r.size)).collect();
    let url_width = records
        .iter()
        .map(|r| r.url.len())
        .chain(std::iter::once("URL".len()))
        .max()
        .unwrap_or(0);
    let size_width = sizes
        .iter()
        .map(String::len)
        .chain(std::iter::once("SIZE".len()))
        .max()
        .unwrap_or(0);

    let mut out = format!("{:<url_width$}  {:>5}  {:>size_width$}\n", "URL", "USES", "SIZE");
    for (record, size) in records.iter().zip(&sizes) {
        out.push_str(&format!(
            "{:<url_width$}  {:>5}  {:>size_width$}\n",
            record.url, record.count, size
        ));
    }

    let summary = UsageSummary::from_records(records);
    out.push_str(&format!(
        "{} urls, {} references, {} known",
        summary.urls,
        summary.references,
        format_size(Some(summary.known_bytes))
    ));
    if summary.unknown_sizes > 0 {
        out.push_str(&format!(" ({} unknown)", summary.unknown_sizes));
    }
    out
}

/// Renders records as a pretty JSON array.
pub fn render_json(records: &[ImageUsage]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(records)
}
