use canopy_common::types::{Point, Rect, Region};

use super::*;
use crate::plugin_registry::PluginProcessRegistry;
use crate::tooltip::TooltipHost;
use crate::window::WindowSystem;

fn frame(platform: &HeadlessPlatform) -> WindowId {
    platform.create_top_level(Rect::new(100, 50, 800, 600))
}

#[test]
fn create_child_under_frame() {
    let platform = HeadlessPlatform::new();
    let top = frame(&platform);
    let child = platform
        .create_window(Some(top), WindowKind::Child, Rect::new(10, 20, 300, 200))
        .unwrap();
    assert_eq!(platform.parent(child), Some(top));
    assert_eq!(platform.children(top), vec![child]);
    assert_eq!(platform.root_ancestor(child), top);
    assert_eq!(platform.client_rect(child), Rect::new(0, 0, 300, 200));
    assert_eq!(platform.screen_origin(child), Point::new(110, 70));
}

#[test]
fn creation_under_missing_parent_fails() {
    let platform = HeadlessPlatform::new();
    let err = platform
        .create_window(Some(WindowId(99)), WindowKind::Child, Rect::default())
        .unwrap_err();
    assert!(err.to_string().contains("window-99"));
}

#[test]
fn intermediate_windows_are_flagged() {
    let platform = HeadlessPlatform::new();
    let top = frame(&platform);
    let wrapper = platform
        .create_window(Some(top), WindowKind::Intermediate, Rect::default())
        .unwrap();
    assert!(!platform.is_disabled(wrapper));
    platform.set_disabled(wrapper, true);
    assert!(platform.is_disabled(wrapper));
    assert!(platform.is_intermediate_window(wrapper));
    assert!(!platform.is_plugin_window(wrapper));
}

#[test]
fn destroy_removes_subtree_and_state() {
    let platform = HeadlessPlatform::new();
    let top = frame(&platform);
    let view = platform
        .create_window(Some(top), WindowKind::Child, Rect::new(0, 0, 10, 10))
        .unwrap();
    let plugin = platform.spawn_plugin_window(view, Rect::new(0, 0, 5, 5));
    platform.set_capture(view);
    platform.set_focus(Some(plugin));
    let tip = platform.create_tooltip(view).unwrap();

    platform.destroy_window(view);
    assert!(!platform.is_window(view));
    assert!(!platform.is_window(plugin));
    assert_eq!(platform.capture(), None);
    assert_eq!(platform.focus(), None);
    assert!(!platform.is_tooltip(tip));
}

#[test]
fn placement_transaction_is_all_or_nothing() {
    let platform = HeadlessPlatform::new();
    let top = frame(&platform);
    let a = platform.spawn_plugin_window(top, Rect::new(0, 0, 10, 10));
    let result = platform.apply_placements(&[
        WindowPlacement {
            window: a,
            bounds: Some(Rect::new(5, 5, 10, 10)),
            show: Some(false),
        },
        WindowPlacement {
            window: WindowId(404),
            bounds: None,
            show: Some(true),
        },
    ]);
    assert!(result.is_err());
    let record = platform.window(a).unwrap();
    assert_eq!(record.bounds, Rect::new(0, 0, 10, 10));
    assert!(record.visible);
}

#[test]
fn forced_placement_failure_is_one_shot() {
    let platform = HeadlessPlatform::new();
    let top = frame(&platform);
    let a = platform.spawn_plugin_window(top, Rect::new(0, 0, 10, 10));
    let placement = [WindowPlacement {
        window: a,
        bounds: Some(Rect::new(1, 1, 10, 10)),
        show: None,
    }];
    platform.fail_next_placement();
    assert!(platform.apply_placements(&placement).is_err());
    assert!(platform.apply_placements(&placement).is_ok());
    assert_eq!(platform.window(a).unwrap().bounds, Rect::new(1, 1, 10, 10));
}

#[test]
fn child_at_prefers_topmost_visible() {
    let platform = HeadlessPlatform::new();
    let top = frame(&platform);
    let lower = platform.spawn_plugin_window(top, Rect::new(0, 0, 50, 50));
    let upper = platform.spawn_plugin_window(top, Rect::new(10, 10, 50, 50));
    assert_eq!(platform.child_at(top, Point::new(20, 20)), Some(upper));
    assert_eq!(platform.child_at(top, Point::new(5, 5)), Some(lower));
    platform.set_visible(upper, false, false);
    assert_eq!(platform.child_at(top, Point::new(20, 20)), Some(lower));
    assert_eq!(platform.child_at(top, Point::new(500, 500)), None);
}

#[test]
fn window_region_is_stored() {
    let platform = HeadlessPlatform::new();
    let top = frame(&platform);
    let a = platform.spawn_plugin_window(top, Rect::new(0, 0, 10, 10));
    platform.set_window_region(a, Some(Region::from_rect(Rect::new(0, 0, 4, 4))), false);
    assert_eq!(platform.window(a).unwrap().region.unwrap().area(), 16);
    platform.set_window_region(a, None, false);
    assert!(platform.window(a).unwrap().region.is_none());
}

#[test]
fn tooltip_show_hide_counters() {
    let platform = HeadlessPlatform::new();
    let top = frame(&platform);
    let tip = platform.create_tooltip(top).unwrap();
    platform.set_tool_rect(tip, Rect::new(0, 0, 10, 10));
    platform.popup(tip);
    platform.pop(tip);
    let record = platform.tooltip(tip).unwrap();
    assert_eq!(record.rect, Rect::new(0, 0, 10, 10));
    assert_eq!((record.popups, record.pops), (1, 1));
    assert!(!record.showing);
}

#[test]
fn registration_outcomes_are_consumed_in_order() {
    let platform = HeadlessPlatform::new();
    platform.push_registration_outcome(RegistrationOutcome::ProcessStarting);
    let (p, i) = (WindowId(1), WindowId(2));
    assert_eq!(
        platform.register_intermediate_window(p, i),
        RegistrationOutcome::ProcessStarting
    );
    assert_eq!(
        platform.register_intermediate_window(p, i),
        RegistrationOutcome::Registered
    );
}

#[test]
fn take_paint_requests_dedups_and_drains() {
    let platform = HeadlessPlatform::new();
    let top = frame(&platform);
    platform.request_paint(top);
    platform.request_paint(top);
    platform.request_paint(WindowId(77));
    assert_eq!(platform.take_paint_requests(), vec![top]);
    assert!(platform.take_paint_requests().is_empty());
}
