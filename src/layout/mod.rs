// SPDX-License-Identifier: MPL-2.0
//! Layout computation: ordering, responsive resolution and capacity limits.
//!
//! Everything here is synchronous and free of side effects except
//! [`ordered::remove`], which detaches the removed overlay's node.

pub mod constraints;
pub mod ordered;
pub mod responsive;
pub mod store;

pub use constraints::{ConstraintViolation, OverlaySummary, ViolationReaction};
pub use ordered::SortKey;
pub use responsive::{BreakpointRule, Constraint, Resolution, ResponsiveRules};
pub use store::LayoutStore;
