// SPDX-License-Identifier: MPL-2.0
//! Rendering surface model and the capabilities the engine consumes.
//!
//! # Architecture
//!
//! ```text
//! SurfaceRoot ──owns──► ContainerHandle (one per region) ──owns──► NodeHandle
//!                                                     ◄──weak──┘
//! ```
//!
//! The engine moves nodes between containers; an injected [`Animator`]
//! performs the visual transitions and a [`Viewport`] answers breakpoint
//! queries.

pub mod animator;
pub mod node;
pub mod root;
pub mod viewport;

pub use animator::{Animator, InstantAnimator, TimedAnimator};
pub use node::{ContainerHandle, FinalWidth, NodeHandle, Size, Visual};
pub use root::{container_id, SurfaceRoot};
pub use viewport::{Breakpoints, Viewport, MATCH_ALL};
