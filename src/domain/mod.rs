// SPDX-License-Identifier: MPL-2.0
//! Domain layer: pure value types shared by every other module.
//!
//! Nothing in this module performs I/O or schedules work.

pub mod ids;
pub mod newtypes;
pub mod region;

pub use ids::{InsetId, OverlayId};
pub use newtypes::{BufferCapacity, InsetDebounce, RecalculateInterval, StaggerStep};
pub use region::{Region, Side};
