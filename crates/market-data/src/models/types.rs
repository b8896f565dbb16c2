use std::fmt;

use serde::{Deserialize, Serialize};

/// Data-source tag attached to an instrument in the universe configuration.
///
/// Examples: "csv", "cn_index", "spot_price"
///
/// The tag only selects which [`SeriesProvider`](crate::provider::SeriesProvider)
/// fetches the instrument; the calculation core never inspects it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceTag(pub String);

impl SourceTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SourceTag {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SourceTag {
    fn from(s: String) -> Self {
        Self(s)
    }
}
