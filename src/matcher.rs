//! URL matching shared by the collector and the replacer.

use crate::host::FieldMap;
use serde_json::Value;

/// Domain fragment that marks a URL as a tracked image asset.
pub const DEFAULT_HOST_SUBSTRING: &str = "framerusercontent.com";
/// Primary node property holding an image reference.
pub const IMAGE_SLOT: &str = "image";
/// Fallback node property consulted when the primary slot is not a string.
pub const SRC_SLOT: &str = "src";

/// Predicate deciding whether a string value belongs to the tracked asset space.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UrlMatcher {
    host_substring: String,
}

impl UrlMatcher {
    /// Builds a matcher for the provided host fragment.
    pub fn new(host_substring: impl Into<String>) -> Self {
        Self {
            host_substring: host_substring.into(),
        }
    }

    /// The fragment a qualifying value must contain.
    pub fn host_substring(&self) -> &str {
        &self.host_substring
    }

    /// Returns `true` when `value` contains the host fragment.
    pub fn is_qualifying(&self, value: &str) -> bool {
        value.contains(self.host_substring.as_str())
    }

    /// Returns the string held by `value` when it qualifies.
    pub fn qualifying_value<'a>(&self, value: &'a Value) -> Option<&'a str> {
        value.as_str().filter(|text| self.is_qualifying(text))
    }

    /// Resolves the image URL a node refers to.
    ///
    /// The primary slot wins whenever it holds a string, even a non-qualifying
    /// one; the fallback slot is only read when the primary is missing or not a
    /// string. The resolved string is returned only if it qualifies.
    pub fn node_url<'a>(&self, properties: &'a FieldMap) -> Option<&'a str> {
        let resolved = properties
            .get(IMAGE_SLOT)
            .and_then(Value::as_str)
            .or_else(|| properties.get(SRC_SLOT).and_then(Value::as_str))?;
        self.is_qualifying(resolved).then_some(resolved)
    }
}

impl Default for UrlMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_HOST_SUBSTRING)
    }
}
