// Trading-pair symbols: display form for labels, canonical form for upstream calls.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonicalizes a user-supplied pair: trims, upper-cases and strips `-` and `/`.
///
/// `"XRP-EUR"` and `"xrp/eur"` both become `"XRPEUR"`. Whitespace-only input
/// yields an empty string, which callers treat as a missing symbol.
pub fn normalize(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| *c != '-' && *c != '/')
        .flat_map(char::to_uppercase)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol {
    display: String,
    canonical: String,
}

impl Symbol {
    /// Derives the canonical form once; the display form is kept only for labeling.
    pub fn parse(raw: &str) -> Self {
        Symbol {
            display: raw.trim().to_string(),
            canonical: normalize(raw),
        }
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}
