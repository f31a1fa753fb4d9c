//! Rewrites selected image URLs across canvas nodes and collection items.

use crate::host::{FieldMap, Host, HostError};
use crate::matcher::{UrlMatcher, IMAGE_SLOT, SRC_SLOT};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// A replacement that satisfies the preconditions: a non-empty target and at
/// least one selected URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplaceRequest {
    selected: HashSet<String>,
    replacement: String,
}

impl ReplaceRequest {
    /// Returns `None` when there is nothing to replace or nothing to replace with.
    pub fn new<I>(selected: I, replacement: impl Into<String>) -> Option<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let replacement = replacement.into();
        let selected: HashSet<String> = selected.into_iter().collect();
        if replacement.is_empty() || selected.is_empty() {
            return None;
        }
        Some(Self {
            selected,
            replacement,
        })
    }

    /// URLs that will be rewritten.
    pub fn selected(&self) -> &HashSet<String> {
        &self.selected
    }

    /// URL written in their place.
    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    fn is_selected(&self, value: &Value) -> bool {
        value
            .as_str()
            .is_some_and(|text| self.selected.contains(text))
    }
}

/// Mutation calls issued by one replacement pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ReplaceOutcome {
    /// Nodes whose image slots were rewritten.
    pub nodes_updated: usize,
    /// Items that received a full field-set update.
    pub items_updated: usize,
    /// Individual item fields that changed.
    pub fields_rewritten: usize,
    /// Matching nodes or items left alone because the host cannot mutate them.
    pub updates_skipped: usize,
}

impl ReplaceOutcome {
    /// Whether any reference was rewritten.
    pub fn is_empty(&self) -> bool {
        self.nodes_updated == 0 && self.items_updated == 0
    }
}

/// Applies `request` to every node and item, one mutation at a time.
///
/// A matching node has both image slots set to the replacement in a single
/// update, whichever slot held the match. An item with at least one matching
/// field gets exactly one update carrying its complete field set. A mutation
/// the host does not support is logged and skipped. Any other failing mutation
/// stops the pass; earlier updates stay applied.
pub async fn replace_references(
    host: &dyn Host,
    matcher: &UrlMatcher,
    request: &ReplaceRequest,
) -> Result<ReplaceOutcome, HostError> {
    let mut outcome = ReplaceOutcome::default();
    let replacement = Value::String(request.replacement.clone());

    for node in host.nodes().await {
        let Some(url) = matcher.node_url(&node.properties) else {
            continue;
        };
        if !request.selected.contains(url) {
            continue;
        }
        let mut patch = FieldMap::new();
        patch.insert(IMAGE_SLOT.to_string(), replacement.clone());
        patch.insert(SRC_SLOT.to_string(), replacement.clone());
        debug!(node = %node.id, from = url, "rewriting node image");
        match host.update_node(&node.id, patch).await {
            Ok(()) => outcome.nodes_updated += 1,
            Err(HostError::Unsupported(capability)) => {
                warn!(node = %node.id, capability, "host cannot update nodes; skipping");
                outcome.updates_skipped += 1;
            }
            Err(err) => return Err(err),
        }
    }

    for collection in host.collections().await {
        for item in host.items(&collection.id).await {
            let mut fields = item.field_data;
            let mut changed = 0;
            for value in fields.values_mut() {
                if request.is_selected(value) {
                    *value = replacement.clone();
                    changed += 1;
                }
            }
            if changed == 0 {
                continue;
            }
            debug!(
                collection = %collection.id,
                item = %item.id,
                fields = changed,
                "rewriting item fields"
            );
            match host.set_item_fields(&collection.id, &item.id, fields).await {
                Ok(()) => {
                    outcome.items_updated += 1;
                    outcome.fields_rewritten += changed;
                }
                Err(HostError::Unsupported(capability)) => {
                    warn!(
                        collection = %collection.id,
                        item = %item.id,
                        capability,
                        "host cannot update items; skipping"
                    );
                    outcome.updates_skipped += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    info!(
        selected = request.selected.len(),
        nodes = outcome.nodes_updated,
        items = outcome.items_updated,
        skipped = outcome.updates_skipped,
        "replacement pass finished"
    );
    Ok(outcome)
}
