//! macOS version parsing and comparison.
//!
//! Versions are ordered sequences of non-negative integers parsed from
//! dotted strings. Comparison is numeric per component, never lexical,
//! so `10.13 > 10.9`.
//!
//! # Ordering rule
//!
//! Sequences are compared element-wise; at the first differing component
//! the numeric comparison decides. A strict prefix compares as LESS than
//! its extension: `10.15 < 10.15.0`. This is the slice ordering Rust
//! gives `Vec<u32>`, made explicit here because call sites depend on it.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Result, StrapError};

/// First `10.N` run inside raw `sw_vers -productVersion` output.
static PRODUCT_VERSION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"10\.\d+").expect("PRODUCT_VERSION_REGEX must compile"));

/// A dotted macOS release version, e.g. `10.14.6`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacosVersion {
    parts: Vec<u32>,
}

impl MacosVersion {
    /// Extract the version from raw `sw_vers -productVersion` output.
    ///
    /// Only the first `10.N` run is kept (trailing patch components and
    /// any surrounding noise are discarded), matching the two-component
    /// granularity the support gates operate on.
    pub fn from_product_version(raw: &str) -> Result<Self> {
        let matched = PRODUCT_VERSION_REGEX
            .find(raw)
            .ok_or_else(|| StrapError::MalformedVersion {
                input: raw.trim().to_string(),
            })?;
        matched.as_str().parse()
    }

    /// The numeric components, most significant first.
    pub fn parts(&self) -> &[u32] {
        &self.parts
    }
}

impl FromStr for MacosVersion {
    type Err = StrapError;

    /// Parse an explicit dotted string like `"10.13"`.
    ///
    /// Non-numeric or empty components are rejected with
    /// [`StrapError::MalformedVersion`]; they are never coerced to 0.
    fn from_str(s: &str) -> Result<Self> {
        let malformed = || StrapError::MalformedVersion {
            input: s.to_string(),
        };
        if s.is_empty() {
            return Err(malformed());
        }
        let parts = s
            .split('.')
            .map(|token| token.parse::<u32>().map_err(|_| malformed()))
            .collect::<Result<Vec<u32>>>()?;
        Ok(Self { parts })
    }
}

impl fmt::Display for MacosVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .parts
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(".");
        f.write_str(&rendered)
    }
}

impl Ord for MacosVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        // Element-wise numeric comparison; a fully-consumed shorter
        // sequence orders before any extension of it.
        self.parts.cmp(&other.parts)
    }
}

impl PartialOrd for MacosVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Call sites compare against literals like `version > "10.13"`. A
// malformed literal yields no ordering rather than a bogus one.
impl PartialEq<str> for MacosVersion {
    fn eq(&self, other: &str) -> bool {
        other.parse::<MacosVersion>().is_ok_and(|v| *self == v)
    }
}

impl PartialOrd<str> for MacosVersion {
    fn partial_cmp(&self, other: &str) -> Option<Ordering> {
        other.parse::<MacosVersion>().ok().map(|v| self.cmp(&v))
    }
}

impl PartialEq<&str> for MacosVersion {
    fn eq(&self, other: &&str) -> bool {
        self.eq(*other)
    }
}

impl PartialOrd<&str> for MacosVersion {
    fn partial_cmp(&self, other: &&str) -> Option<Ordering> {
        self.partial_cmp(*other)
    }
}
