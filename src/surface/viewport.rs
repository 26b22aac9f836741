// SPDX-License-Identifier: MPL-2.0
//! Viewport predicate capability.

use std::cell::RefCell;
use std::collections::HashSet;

/// Query that every viewport matches.
pub const MATCH_ALL: &str = "all";

/// Answers whether a breakpoint query matches the current viewport.
///
/// The engine treats queries as opaque strings; only the embedder knows how
/// to evaluate them.
pub trait Viewport {
    fn matches(&self, query: &str) -> bool;
}

impl<F> Viewport for F
where
    F: Fn(&str) -> bool,
{
    fn matches(&self, query: &str) -> bool {
        self(query)
    }
}

/// Viewport whose matching queries are switched on and off explicitly.
///
/// [`MATCH_ALL`] always matches. Every other query matches only while it is
/// active. An embedder typically toggles queries from its resize handler and
/// then asks the engine to recalculate the layout.
#[derive(Debug, Default)]
pub struct Breakpoints {
    active: RefCell<HashSet<String>>,
}

impl Breakpoints {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a viewport with the given queries active.
    pub fn with_active<I, S>(queries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            active: RefCell::new(queries.into_iter().map(Into::into).collect()),
        }
    }

    /// Switches `query` on or off.
    pub fn set(&self, query: &str, active: bool) {
        let mut set = self.active.borrow_mut();
        if active {
            set.insert(query.to_string());
        } else {
            set.remove(query);
        }
    }

    #[must_use]
    pub fn is_active(&self, query: &str) -> bool {
        self.active.borrow().contains(query)
    }
}

impl Viewport for Breakpoints {
    fn matches(&self, query: &str) -> bool {
        query == MATCH_ALL || self.is_active(query)
    }
}
