// SPDX-License-Identifier: MPL-2.0
//! `overlay_regions` places transient overlays (toasts, popovers, banners)
//! into eight screen regions.
//!
//! Overlays are ordered by priority within their region, relocated by
//! responsive breakpoint rules, capped by per-region item limits, and kept
//! clear of reserved screen edges through aggregated insets.
//!
//! The engine is single-threaded and schedules its work with
//! `tokio::task::spawn_local`; drive it from inside a `tokio::task::LocalSet`.
//!
//! ```
//! use overlay_regions::config::EngineConfig;
//! use overlay_regions::domain::{OverlayId, Region};
//! use overlay_regions::engine::{OverlayRequest, OverlayState};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! tokio::task::LocalSet::new()
//!     .run_until(async {
//!         let state = OverlayState::new(EngineConfig::default());
//!         state.register_overlay(OverlayRequest::new("saved", Region::BottomCenter, 0));
//!         state
//!             .set_overlay_ready(&OverlayId::from("saved"))
//!             .await
//!             .expect("layout pass runs");
//!         assert_eq!(state.layout(Region::BottomCenter).len(), 1);
//!     })
//!     .await;
//! # }
//! ```

#![doc(html_root_url = "https://docs.rs/overlay_regions/0.1.0")]

pub mod config;
pub mod diagnostics;
pub mod domain;
pub mod engine;
pub mod error;
pub mod inset;
pub mod layout;
pub mod scheduler;
pub mod signal;
pub mod surface;
