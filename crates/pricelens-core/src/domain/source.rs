//! Supported marketplace sources.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigurationError;

/// A marketplace that pricelens knows how to query.
///
/// The set is closed: adding a marketplace means adding a variant here and
/// an adapter under [`crate::adapters`], both checked at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Amazon,
    Flipkart,
}

impl Source {
    /// Every supported source, in declaration order.
    pub const ALL: [Source; 2] = [Source::Amazon, Source::Flipkart];

    /// Wire identifier (`"amazon"`, `"flipkart"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Amazon => "amazon",
            Source::Flipkart => "flipkart",
        }
    }

    /// Human-facing label used in reports.
    pub fn display_name(&self) -> &'static str {
        match self {
            Source::Amazon => "Amazon",
            Source::Flipkart => "Flipkart",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifiers must match exactly; `" Amazon "` is not a source.
impl FromStr for Source {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "amazon" => Ok(Source::Amazon),
            "flipkart" => Ok(Source::Flipkart),
            _ => Err(ConfigurationError::UnsupportedSource {
                source_id: s.to_string(),
            }),
        }
    }
}
