//! Counts qualifying image URLs across canvas nodes and collection items.

use crate::host::Host;
use crate::matcher::UrlMatcher;
use indexmap::IndexMap;
use tracing::debug;

/// Occurrence count per URL, in first-seen order.
pub type UsageCounts = IndexMap<String, usize>;

/// Walks both host sources and tallies every qualifying reference.
///
/// Each node contributes at most one increment (its resolved image slot); each
/// item contributes one increment per qualifying field. Nodes are walked
/// first, then collections one at a time.
pub async fn collect_usage(host: &dyn Host, matcher: &UrlMatcher) -> UsageCounts {
    let mut counts = UsageCounts::new();

    let nodes = host.nodes().await;
    for node in &nodes {
        if let Some(url) = matcher.node_url(&node.properties) {
            bump(&mut counts, url);
        }
    }
    debug!(nodes = nodes.len(), distinct = counts.len(), "scanned canvas nodes");

    for collection in host.collections().await {
        let items = host.items(&collection.id).await;
        for item in &items {
            for value in item.field_data.values() {
                if let Some(url) = matcher.qualifying_value(value) {
                    bump(&mut counts, url);
                }
            }
        }
        debug!(
            collection = %collection.id,
            items = items.len(),
            "scanned collection"
        );
    }

    counts
}

fn bump(counts: &mut UsageCounts, url: &str) {
    match counts.get_mut(url) {
        Some(count) => *count += 1,
        None => {
            counts.insert(url.to_string(), 1);
        }
    }
}
