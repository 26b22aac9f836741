// SPDX-License-Identifier: MPL-2.0
//! Responsive rule resolution.
//!
//! Each region may carry an ordered list of breakpoint rules. The first rule
//! whose query matches the current viewport decides where overlays requested
//! for that region actually go and which constraints apply there.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::Region;
use crate::surface::Viewport;

/// Capacity constraint applied to a destination region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Constraint {
    /// At most `max` overlays may be listed in the region.
    MaxItems { max: usize },
}

/// One breakpoint rule of a region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakpointRule {
    pub query: String,
    /// `None` keeps overlays in the region they asked for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<Region>,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
}

impl BreakpointRule {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            destination: None,
            constraints: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_destination(mut self, destination: Region) -> Self {
        self.destination = Some(destination);
        self
    }

    #[must_use]
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }
}

/// Outcome of resolving a region against the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution<'a> {
    pub destination: Region,
    pub constraints: &'a [Constraint],
}

/// Breakpoint rules of every region, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponsiveRules {
    rules: HashMap<Region, Vec<BreakpointRule>>,
}

impl ResponsiveRules {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `rule` after the existing rules of `region`.
    pub fn push(&mut self, region: Region, rule: BreakpointRule) {
        self.rules.entry(region).or_default().push(rule);
    }

    #[must_use]
    pub fn with_rule(mut self, region: Region, rule: BreakpointRule) -> Self {
        self.push(region, rule);
        self
    }

    /// Rules of `region` in evaluation order.
    #[must_use]
    pub fn rules_for(&self, region: Region) -> &[BreakpointRule] {
        self.rules.get(&region).map(Vec::as_slice).unwrap_or_default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.values().all(Vec::is_empty)
    }

    /// First rule of `region` matching the viewport.
    pub fn matching(&self, region: Region, viewport: &dyn Viewport) -> Option<&BreakpointRule> {
        self.rules_for(region)
            .iter()
            .find(|rule| viewport.matches(&rule.query))
    }

    /// Resolves where overlays requested for `region` go.
    ///
    /// Without a matching rule the overlay stays in `region` unconstrained.
    pub fn resolve(&self, region: Region, viewport: &dyn Viewport) -> Resolution<'_> {
        match self.matching(region, viewport) {
            Some(rule) => Resolution {
                destination: rule.destination.unwrap_or(region),
                constraints: &rule.constraints,
            },
            None => Resolution {
                destination: region,
                constraints: &[],
            },
        }
    }
}
