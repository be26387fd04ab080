//! Property invariants for layout transitions.
//!
//! Random operation streams are applied through the pure transition function
//! and the engine; after every step the state must keep unique ids, a valid
//! fullscreen reference and clamped geometry, and must survive a persistence
//! round-trip unchanged. Added panels and patches vary every descriptor field.

use std::collections::BTreeMap;

use dock_core::geometry::PercentBounds;
use dock_layout::persistence::{load_state, save_state};
use dock_layout::{
    DockPosition, LayoutEngine, LayoutOp, LayoutState, LoadOutcome, MemoryStore, PanelContent,
    PanelDescriptor, PanelId, PanelPatch, apply,
};
use proptest::prelude::*;
use rustc_hash::FxHashSet;
use serde_json::Value;

const POOL: [&str; 5] = ["chart", "orders", "book", "news", "alerts"];

fn panel_id() -> impl Strategy<Value = PanelId> {
    (0..POOL.len()).prop_map(|i| PanelId::new(POOL[i]))
}

fn percent() -> impl Strategy<Value = f64> {
    prop_oneof![-50.0f64..150.0, Just(f64::NAN), Just(10.0), Just(90.0)]
}

fn pixels() -> impl Strategy<Value = f64> {
    prop_oneof![
        0.0f64..4000.0,
        Just(f64::INFINITY),
        Just(f64::NEG_INFINITY),
        Just(f64::NAN),
    ]
}

fn position() -> impl Strategy<Value = DockPosition> {
    prop_oneof![
        Just(DockPosition::Left),
        Just(DockPosition::Right),
        Just(DockPosition::Top),
        Just(DockPosition::Bottom),
        Just(DockPosition::Center),
    ]
}

fn prop_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
        "[a-zA-Z0-9 -]{0,12}".prop_map(Value::from),
        (-1e9f64..1e9).prop_map(Value::from),
        Just(Value::Null),
    ]
}

fn content() -> impl Strategy<Value = PanelContent> {
    (
        "[a-z_]{0,10}",
        prop::collection::btree_map("[a-z]{1,6}", prop_value(), 0..3),
    )
        .prop_map(|(component, props): (String, BTreeMap<String, Value>)| PanelContent {
            component,
            props,
        })
}

fn arb_panel() -> impl Strategy<Value = PanelDescriptor> {
    (
        (panel_id(), "\\PC{0,12}", content(), position()),
        (
            percent(),
            percent(),
            proptest::option::of(percent()),
            proptest::option::of(percent()),
        ),
        (
            proptest::option::of(pixels()),
            proptest::option::of(pixels()),
            proptest::option::of(pixels()),
            proptest::option::of(pixels()),
        ),
        (
            any::<bool>(),
            any::<bool>(),
            any::<bool>(),
            proptest::option::of(any::<i32>()),
        ),
    )
        .prop_map(
            |(
                (id, title, content, position),
                (width, height, min_percent, max_percent),
                (min_width_px, min_height_px, max_width_px, max_height_px),
                (resizable, closable, collapsed, z_index),
            )| PanelDescriptor {
                id,
                title,
                content,
                width,
                height,
                min_percent,
                max_percent,
                min_width_px,
                min_height_px,
                max_width_px,
                max_height_px,
                resizable,
                closable,
                collapsed,
                position,
                z_index,
            },
        )
}

fn arb_patch() -> impl Strategy<Value = PanelPatch> {
    (
        (
            proptest::option::of("\\PC{0,12}"),
            proptest::option::of(content()),
            proptest::option::of(percent()),
            proptest::option::of(percent()),
        ),
        (
            proptest::option::of(proptest::option::of(percent())),
            proptest::option::of(proptest::option::of(percent())),
            proptest::option::of(proptest::option::of(pixels())),
            proptest::option::of(proptest::option::of(pixels())),
        ),
        (
            proptest::option::of(any::<bool>()),
            proptest::option::of(any::<bool>()),
            proptest::option::of(position()),
            proptest::option::of(proptest::option::of(any::<i32>())),
        ),
    )
        .prop_map(
            |(
                (title, content, width, height),
                (min_percent, max_percent, min_width_px, max_height_px),
                (resizable, closable, position, z_index),
            )| PanelPatch {
                title,
                content,
                width,
                height,
                min_percent,
                max_percent,
                min_width_px,
                max_height_px,
                resizable,
                closable,
                position,
                z_index,
                ..PanelPatch::default()
            },
        )
}

fn layout_op() -> impl Strategy<Value = LayoutOp> {
    prop_oneof![
        arb_panel().prop_map(|panel| LayoutOp::AddPanel { panel }),
        panel_id().prop_map(|id| LayoutOp::RemovePanel { id }),
        panel_id().prop_map(|id| LayoutOp::ClosePanel { id }),
        (panel_id(), percent(), percent()).prop_map(|(id, w, h)| LayoutOp::UpdatePanel {
            id,
            patch: PanelPatch::geometry(w, h),
        }),
        (panel_id(), arb_patch()).prop_map(|(id, patch)| LayoutOp::UpdatePanel { id, patch }),
        panel_id().prop_map(|id| LayoutOp::ToggleCollapse { id }),
        proptest::option::of(panel_id()).prop_map(|id| LayoutOp::ToggleFullscreen { id }),
        any::<bool>().prop_map(|collapsed| LayoutOp::SetSidebarCollapsed { collapsed }),
        any::<bool>().prop_map(|visible| LayoutOp::SetHeaderVisible { visible }),
        any::<bool>().prop_map(|visible| LayoutOp::SetFooterVisible { visible }),
    ]
}

fn assert_invariants(state: &LayoutState, bounds: PercentBounds) -> Result<(), TestCaseError> {
    let mut seen = FxHashSet::default();
    for panel in state.panels().iter() {
        prop_assert!(seen.insert(panel.id.clone()), "duplicate id {}", panel.id);
        let panel_bounds = panel.percent_bounds(bounds);
        prop_assert!(panel_bounds.contains(panel.width), "width {} out of bounds", panel.width);
        prop_assert!(panel_bounds.contains(panel.height), "height {} out of bounds", panel.height);
        for limit in [
            panel.min_percent,
            panel.max_percent,
            panel.min_width_px,
            panel.min_height_px,
            panel.max_width_px,
            panel.max_height_px,
        ]
        .into_iter()
        .flatten()
        {
            prop_assert!(limit.is_finite(), "non-finite limit stored on {}", panel.id);
        }
    }
    if let Some(id) = state.fullscreen_panel_id() {
        prop_assert!(state.panels().contains(id), "dangling fullscreen {id}");
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn random_streams_preserve_invariants(ops in prop::collection::vec(layout_op(), 1..64)) {
        let bounds = PercentBounds::default();
        let mut state = LayoutState::default();
        for op in &ops {
            if let Ok(next) = apply(&state, op, bounds) {
                state = next;
            }
            assert_invariants(&state, bounds)?;
        }
    }

    #[test]
    fn failed_ops_are_noops(ops in prop::collection::vec(layout_op(), 1..32)) {
        let bounds = PercentBounds::new(20.0, 80.0);
        let mut state = LayoutState::default();
        for op in &ops {
            let before = state.clone();
            match apply(&state, op, bounds) {
                Ok(next) => state = next,
                Err(_) => {
                    prop_assert_eq!(&state, &before);
                }
            }
        }
    }

    #[test]
    fn persistence_round_trip(ops in prop::collection::vec(layout_op(), 0..48)) {
        let bounds = PercentBounds::default();
        let mut state = LayoutState::default();
        for op in &ops {
            if let Ok(next) = apply(&state, op, bounds) {
                state = next;
            }
        }
        let store = MemoryStore::new();
        save_state(&store, "prop", &state).map_err(|w| TestCaseError::fail(w.to_string()))?;
        match load_state(&store, "prop", bounds) {
            LoadOutcome::Restored { state: loaded, notes } => {
                prop_assert_eq!(loaded, state);
                prop_assert!(notes.is_empty());
            }
            other => {
                prop_assert!(false, "unexpected outcome {:?}", other);
            }
        }
    }

    #[test]
    fn fullscreen_is_exclusive_and_reversible(ids in prop::collection::vec(panel_id(), 1..16)) {
        let mut engine = LayoutEngine::builder("fs")
            .mount(POOL.iter().map(|id| PanelDescriptor::new(*id, *id)))
            .unwrap();
        let panels_before = engine.state().panels().clone();
        for id in &ids {
            engine.toggle_fullscreen(Some(id)).unwrap();
            let frame = engine.frame();
            prop_assert!(frame.panels.iter().filter(|p| p.fullscreen).count() <= 1);
        }
        engine.toggle_fullscreen(None).unwrap();
        prop_assert_eq!(engine.state().fullscreen_panel_id(), None);
        prop_assert_eq!(engine.state().panels(), &panels_before);
    }

    #[test]
    fn repeated_identical_moves_are_stable(dx in -2000.0f64..2000.0, dy in -2000.0f64..2000.0, repeats in 1usize..8) {
        use dock_core::event::PointerPosition;
        use dock_core::geometry::WorkspaceBounds;

        let mut engine = LayoutEngine::builder("drag")
            .mount([PanelDescriptor::new("chart", "Chart")])
            .unwrap();
        let chart = PanelId::new("chart");
        let workspace = WorkspaceBounds::new(1280.0, 720.0);
        engine.handle_resize_start(&chart, PointerPosition::new(0.0, 0.0));
        engine.handle_resize_move(PointerPosition::new(dx, dy), workspace);
        let first = engine.state().panel(&chart).cloned();
        for _ in 0..repeats {
            engine.handle_resize_move(PointerPosition::new(dx, dy), workspace);
        }
        prop_assert_eq!(engine.state().panel(&chart).cloned(), first);
        engine.handle_resize_end();
        assert_invariants(engine.state(), PercentBounds::default())?;
    }
}
