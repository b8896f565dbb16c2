//! Provider capabilities.

use crate::models::SourceTag;

/// Describes what a series provider can serve.
///
/// Used by the router to map an instrument's source tag to a provider.
#[derive(Clone, Debug)]
pub struct ProviderCapabilities {
    /// Source tags this provider answers for (e.g. "csv", "cn_index").
    pub sources: Vec<SourceTag>,

    /// Longest history, in calendar days, the provider can return in one call.
    /// `None` means unbounded.
    pub max_history_days: Option<u32>,
}

impl ProviderCapabilities {
    pub fn supports(&self, source: &SourceTag) -> bool {
        self.sources.iter().any(|s| s == source)
    }
}
