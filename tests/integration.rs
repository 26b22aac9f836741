// SPDX-License-Identifier: MPL-2.0
use overlay_regions::config::{self, EngineConfig};
use overlay_regions::diagnostics::{DiagnosticsCollector, EngineEvent};
use overlay_regions::domain::{OverlayId, Region, Side};
use overlay_regions::engine::{OverlayContext, OverlayHandle, OverlayRequest, OverlayState};
use overlay_regions::inset::{InsetRecord, Rect};
use overlay_regions::surface::{container_id, Breakpoints, TimedAnimator, Visual};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tempfile::tempdir;
use tokio::task::LocalSet;
use tokio::time::sleep;

const CONFIG: &str = r#"
root_id = "app-overlays"
recalculate_interval_ms = 100
stagger_step_ms = 10

[[rules]]
region = "TOP_RIGHT"
query = "all"
constraints = [{ type = "MAX_ITEMS", max = 2 }]

[[rules]]
region = "TOP_LEFT"
query = "(max-width: 600px)"
destination = "BOTTOM_FULL_WIDTH"
"#;

fn load_config() -> EngineConfig {
    let dir = tempdir().expect("Failed to create temporary directory");
    let path = dir.path().join("overlays.toml");
    std::fs::write(&path, CONFIG).expect("Failed to write config file");
    config::load_from_path(&path).expect("Failed to load config from path")
}

#[test]
fn config_file_drives_root_and_rules() {
    let config = load_config();
    assert_eq!(config.root_id, "app-overlays");
    assert_eq!(config.recalculate_interval().value(), 100);
    assert_eq!(config.inset_debounce_ms, 300);

    let state = OverlayState::new(config);
    assert_eq!(state.root().id(), "app-overlays");
    let container = state.container(Region::TopRight).expect("region enabled");
    assert_eq!(container.id(), container_id("app-overlays", Region::TopRight));
    assert_eq!(container.id(), "app-overlays_TOP_RIGHT");
}

#[test]
fn saved_config_loads_back_unchanged() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let path = dir.path().join("overlays.toml");
    let original = load_config();

    config::save_to_path(&original, &path).expect("Failed to save config");
    let reloaded = config::load_from_path(&path).expect("Failed to reload config");
    assert_eq!(reloaded, original);
}

#[tokio::test(start_paused = true)]
async fn toasts_are_capped_then_hidden() {
    LocalSet::new()
        .run_until(async {
            let mut collector = DiagnosticsCollector::default();
            let evicted = Rc::new(RefCell::new(Vec::<OverlayId>::new()));
            let state = OverlayState::builder(load_config())
                .with_animator(Rc::new(TimedAnimator::new(Duration::from_millis(50))))
                .with_diagnostics(collector.handle())
                .build();

            let mut passes = Vec::new();
            for name in ["toast-1", "toast-2", "toast-3"] {
                let log = Rc::clone(&evicted);
                state.register_overlay(
                    OverlayRequest::new(name, Region::TopRight, 0)
                        .with_hide_after(Duration::from_secs(1))
                        .on_removed_after_violation(move |id| log.borrow_mut().push(id.clone())),
                );
                passes.push(state.set_overlay_ready(&OverlayId::from(name)));
            }
            for pass in passes {
                pass.await.expect("layout pass runs");
            }

            assert_eq!(*evicted.borrow(), vec![OverlayId::from("toast-1")]);
            let container = state.container(Region::TopRight).expect("region enabled");
            assert_eq!(
                container.child_ids(),
                vec![OverlayId::from("toast-2"), OverlayId::from("toast-3")]
            );
            assert!(container
                .children()
                .iter()
                .all(|node| node.visual() == Visual::Shown));

            sleep(Duration::from_millis(1200)).await;
            assert!(state.is_empty());
            assert!(container.is_empty());

            let kinds = collector.drain_kinds();
            let removed = kinds
                .iter()
                .filter(|kind| matches!(kind, EngineEvent::Removed { .. }))
                .count();
            assert_eq!(removed, 3);
            assert!(kinds.contains(&EngineEvent::Evicted {
                id: OverlayId::from("toast-1"),
                region: Region::TopRight,
            }));
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn narrow_viewport_sends_menu_to_bottom_bar() {
    LocalSet::new()
        .run_until(async {
            let viewport = Rc::new(Breakpoints::new());
            let state = OverlayState::builder(load_config())
                .with_viewport(viewport.clone())
                .build();
            let menu = OverlayHandle::register(
                state.clone(),
                OverlayRequest::new("menu", Region::TopLeft, 0),
            );
            menu.ready().await.expect("layout pass runs");

            sleep(Duration::from_millis(150)).await;
            viewport.set("(max-width: 600px)", true);
            state.recalculate_layout().await.expect("layout pass runs");
            let bottom = state
                .container(Region::BottomFullWidth)
                .expect("region enabled");
            assert!(bottom.contains(menu.node()));

            sleep(Duration::from_millis(150)).await;
            viewport.set("(max-width: 600px)", false);
            state.recalculate_layout().await.expect("layout pass runs");
            let top_left = state.container(Region::TopLeft).expect("region enabled");
            assert!(top_left.contains(menu.node()));
            assert!(bottom.is_empty());

            drop(menu);
            assert!(top_left.is_empty());
        })
        .await;
}

/// A component that only knows the context trait.
fn reserve_toolbar(context: &impl OverlayContext, height: f64) {
    context.set_inset(InsetRecord::fixed("toolbar", Side::Top, height).with_padding(8.0));
    context.set_inset(InsetRecord::measured(
        "status-bar",
        Side::Bottom,
        Rc::new(Rect {
            top: 0.0,
            left: 0.0,
            width: 1280.0,
            height: 24.0,
        }),
    ));
}

#[tokio::test(start_paused = true)]
async fn safe_area_follows_inset_sources() {
    LocalSet::new()
        .run_until(async {
            let state = OverlayState::new(load_config());
            reserve_toolbar(&state, 48.0);
            sleep(Duration::from_millis(400)).await;

            let safe_area = state.safe_area();
            assert_eq!(safe_area.top, 56.0);
            assert_eq!(safe_area.bottom, 48.0);
            assert_eq!(safe_area.left, 0.0);

            state.clear();
            assert_eq!(state.safe_area().top, 0.0);
        })
        .await;
}
