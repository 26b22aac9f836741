// SPDX-License-Identifier: MPL-2.0
//! Lifecycle event log.
//!
//! Attach a [`DiagnosticsHandle`] to the engine to record what happens to
//! every overlay. The [`DiagnosticsCollector`] keeps the most recent events
//! in a [`CircularBuffer`] for an embedder to display or export.
//!
//! Developer-facing logging goes through `tracing` independently of this log.

mod buffer;
mod collector;
mod events;

pub use buffer::{BufferCapacity, CircularBuffer};
pub use collector::{DiagnosticsCollector, DiagnosticsHandle};
pub use events::{DiagnosticEvent, EngineEvent};
