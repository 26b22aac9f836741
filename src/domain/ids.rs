// SPDX-License-Identifier: MPL-2.0
//! Identifier newtypes for overlays and insets.
//!
//! Both identifiers are supplied by the embedder and compared by value.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique, externally supplied identifier of an overlay.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverlayId(String);

impl OverlayId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OverlayId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for OverlayId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique, externally supplied identifier of an inset source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InsetId(String);

impl InsetId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for InsetId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for InsetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_ids_compare_by_value() {
        assert_eq!(OverlayId::from("toast"), OverlayId::new(String::from("toast")));
        assert_ne!(OverlayId::from("toast"), OverlayId::from("banner"));
    }

    #[test]
    fn display_prints_raw_identifier() {
        assert_eq!(OverlayId::from("a-1").to_string(), "a-1");
        assert_eq!(InsetId::from("navbar").to_string(), "navbar");
    }
}
