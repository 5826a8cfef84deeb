//! Adapter between a native event loop and one [`ViewSurface`].
//!
//! The event loop hands over [`NativeEvent`]s; the host owns the paint
//! frame, drains the view's deferred tasks and finalizes the view once its
//! window is gone.

use std::time::Instant;

use canopy_common::types::{Rect, WindowId};
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::channel::AccessibleHandle;
use crate::ime::CompositionUpdate;
use crate::input::{ConsumedBy, InputOutcome};
use crate::surface::{MouseActivation, PaintOutcome, ViewSurface};
use canopy_platform::{KeyEvent, PointerEvent, WheelEvent};

/// A native window notification addressed to the view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum NativeEvent {
    Paint,
    Activate { active: bool },
    SetFocus,
    KillFocus,
    CaptureChanged,
    CancelMode,
    InputLanguageChanged,
    ThemeChanged,
    Pointer(PointerEvent),
    Key(KeyEvent),
    Wheel(WheelEvent),
    MouseActivate,
    SetCursor,
    TooltipShown,
    TooltipPopped,
    TooltipTextRequest,
    ImeSetContext { active: bool },
    ImeStartComposition,
    ImeComposition(CompositionUpdate),
    ImeEndComposition,
    AccessibilityRequest,
}

/// What the view made of a [`NativeEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "disposition", rename_all = "snake_case")]
pub enum Disposition {
    /// Handled by the view itself.
    Handled,
    /// Converted and sent to the remote side.
    Forwarded,
    /// Swallowed before reaching the remote side.
    Consumed { by: ConsumedBy },
    /// No window or no remote widget to deliver to.
    Dropped,
    Painted(PaintOutcome),
    Activation { result: MouseActivation },
    TooltipText { text: Option<String> },
    Accessible { root: Option<AccessibleHandle> },
}

impl From<InputOutcome> for Disposition {
    fn from(outcome: InputOutcome) -> Self {
        match outcome {
            InputOutcome::Forwarded => Disposition::Forwarded,
            InputOutcome::Consumed(by) => Disposition::Consumed { by },
            InputOutcome::Dropped => Disposition::Dropped,
        }
    }
}

pub struct ViewHost {
    surface: Option<ViewSurface>,
    frame: RgbaImage,
}

impl ViewHost {
    pub fn new(surface: ViewSurface) -> Self {
        Self {
            surface: Some(surface),
            frame: RgbaImage::new(0, 0),
        }
    }

    /// The view, until it has been finalized.
    pub fn surface(&self) -> Option<&ViewSurface> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut ViewSurface> {
        self.surface.as_mut()
    }

    /// Pixels as of the last paint.
    pub fn frame(&self) -> &RgbaImage {
        &self.frame
    }

    pub fn is_finalized(&self) -> bool {
        self.surface.is_none()
    }

    pub fn dispatch(&mut self, event: &NativeEvent, now: Instant) -> Disposition {
        let Some(surface) = self.surface.as_mut() else {
            return Disposition::Dropped;
        };
        trace!(?event, "dispatching native event");
        let disposition = match event {
            NativeEvent::Paint => {
                fit_frame(&mut self.frame, surface);
                Disposition::Painted(surface.on_paint_requested(&mut self.frame, now))
            }
            NativeEvent::Activate { active } => {
                surface.on_activate(*active, now);
                Disposition::Handled
            }
            NativeEvent::SetFocus => {
                surface.on_set_focus();
                Disposition::Handled
            }
            NativeEvent::KillFocus => {
                surface.on_kill_focus();
                Disposition::Handled
            }
            NativeEvent::CaptureChanged => {
                surface.on_capture_changed();
                Disposition::Handled
            }
            NativeEvent::CancelMode => {
                surface.on_cancel_mode(now);
                Disposition::Handled
            }
            NativeEvent::InputLanguageChanged => {
                surface.on_input_language_changed();
                Disposition::Handled
            }
            NativeEvent::ThemeChanged => {
                surface.on_theme_changed();
                Disposition::Handled
            }
            NativeEvent::Pointer(pointer) => surface.on_pointer(pointer).into(),
            NativeEvent::Key(key) => surface.on_key(key, now).into(),
            NativeEvent::Wheel(wheel) => surface.on_wheel(wheel).into(),
            NativeEvent::MouseActivate => Disposition::Activation {
                result: surface.on_mouse_activate(),
            },
            NativeEvent::SetCursor => {
                surface.on_set_cursor();
                Disposition::Handled
            }
            NativeEvent::TooltipShown => {
                surface.on_tooltip_shown();
                Disposition::Handled
            }
            NativeEvent::TooltipPopped => {
                surface.on_tooltip_popped();
                Disposition::Handled
            }
            NativeEvent::TooltipTextRequest => Disposition::TooltipText {
                text: surface.on_tooltip_text_request(),
            },
            NativeEvent::ImeSetContext { active } => {
                surface.on_ime_set_context(*active);
                Disposition::Handled
            }
            NativeEvent::ImeStartComposition => {
                surface.on_ime_start_composition();
                Disposition::Handled
            }
            NativeEvent::ImeComposition(update) => {
                surface.on_ime_composition(update);
                Disposition::Handled
            }
            NativeEvent::ImeEndComposition => {
                surface.on_ime_end_composition();
                Disposition::Handled
            }
            NativeEvent::AccessibilityRequest => Disposition::Accessible {
                root: surface.on_accessibility_request(),
            },
        };
        self.finalize_if_destroyed();
        disposition
    }

    /// The remote side painted `rects` into the backing store.
    pub fn backing_store_updated(&mut self, rects: &[Rect], now: Instant) -> PaintOutcome {
        let Some(surface) = self.surface.as_mut() else {
            return PaintOutcome::Suppressed;
        };
        fit_frame(&mut self.frame, surface);
        surface.did_paint_backing_store_rects(rects, &mut self.frame, now)
    }

    /// The plugin process tore down `intermediate`.
    pub fn intermediate_released(&mut self, intermediate: WindowId) -> bool {
        self.surface
            .as_mut()
            .is_some_and(|surface| surface.on_intermediate_released(intermediate))
    }

    /// Run deferred tasks that are due. Returns how many ran.
    pub fn pump(&mut self, now: Instant) -> usize {
        let Some(surface) = self.surface.as_mut() else {
            return 0;
        };
        let ran = surface.run_pending_tasks(now);
        self.finalize_if_destroyed();
        ran
    }

    /// Earliest deadline among the view's deferred tasks.
    pub fn next_wakeup(&self) -> Option<Instant> {
        self.surface.as_ref()?.next_task_due()
    }

    /// Destroy and finalize the view now.
    pub fn close(&mut self) {
        if let Some(mut surface) = self.surface.take() {
            surface.destroy();
            surface.finalize();
        }
    }

    fn finalize_if_destroyed(&mut self) {
        if self.surface.as_ref().is_some_and(ViewSurface::is_destroyed) {
            if let Some(surface) = self.surface.take() {
                debug!("view window gone, finalizing");
                surface.finalize();
            }
        }
    }
}

/// Keep the frame the size of the view's client area.
fn fit_frame(frame: &mut RgbaImage, surface: &ViewSurface) {
    let size = surface.client_size();
    let (width, height) = (size.width.max(0) as u32, size.height.max(0) as u32);
    if frame.dimensions() != (width, height) {
        *frame = RgbaImage::new(width, height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    use canopy_config::ViewConfig;
    use canopy_platform::{HeadlessPlatform, KeyCode, Platform, WindowSystem};

    use crate::channel::{RecordingRemote, RemoteMessage};
    use crate::process::ProcessContext;

    fn host(popup: bool) -> (Rc<HeadlessPlatform>, RecordingRemote, ViewHost, WindowId) {
        let backend = Rc::new(HeadlessPlatform::new());
        let top = backend.create_top_level(Rect::new(0, 0, 800, 600));
        let ctx = Rc::new(ProcessContext::new(
            Platform::headless(backend.clone()),
            ViewConfig::default(),
        ));
        let remote = RecordingRemote::new();
        let mut surface = ViewSurface::new(ctx, Box::new(remote.clone()));
        let window = if popup {
            surface
                .init_as_popup(top, Rect::new(10, 10, 100, 80), true)
                .unwrap()
        } else {
            surface.create(top, Rect::new(0, 40, 800, 560)).unwrap()
        };
        remote.take_sent();
        (backend, remote, ViewHost::new(surface), window)
    }

    #[test]
    fn native_events_parse_from_json() {
        let event: NativeEvent = serde_json::from_str(r#"{"event":"activate","active":false}"#).unwrap();
        assert_eq!(event, NativeEvent::Activate { active: false });

        let event: NativeEvent = serde_json::from_str(
            r#"{"event":"pointer","kind":"move","position":{"x":1,"y":2}}"#,
        )
        .unwrap();
        assert!(matches!(event, NativeEvent::Pointer(_)));
    }

    #[test]
    fn paint_sizes_frame_to_client_area() {
        let (_, _, mut host, _) = host(false);
        host.surface_mut()
            .unwrap()
            .backing_store_mut()
            .damage(Rect::new(0, 0, 10, 10));

        let disposition = host.dispatch(&NativeEvent::Paint, Instant::now());
        assert!(matches!(
            disposition,
            Disposition::Painted(PaintOutcome::Blank { .. })
        ));
        assert_eq!(host.frame().dimensions(), (800, 560));
    }

    #[test]
    fn key_is_forwarded() {
        let (_, remote, mut host, _) = host(false);
        let event = NativeEvent::Key(KeyEvent::char('a'));
        assert_eq!(host.dispatch(&event, Instant::now()), Disposition::Forwarded);
        assert_eq!(remote.sent(), vec![RemoteMessage::Key(KeyEvent::char('a'))]);
    }

    #[test]
    fn popup_dismissal_finalizes_on_pump() {
        let (backend, remote, mut host, window) = host(true);
        let now = Instant::now();

        let tab = NativeEvent::Key(KeyEvent::down(KeyCode::Tab));
        assert_eq!(
            host.dispatch(&tab, now),
            Disposition::Consumed {
                by: ConsumedBy::PopupDismissal
            }
        );
        assert_eq!(host.next_wakeup(), Some(now));

        assert_eq!(host.pump(now), 1);
        assert!(host.is_finalized());
        assert!(!backend.is_window(window));
        let sent = remote.sent();
        assert_eq!(
            &sent[sent.len() - 2..],
            &[RemoteMessage::Shutdown, RemoteMessage::ViewDestroyed]
        );
        assert_eq!(host.dispatch(&NativeEvent::Paint, now), Disposition::Dropped);
    }

    #[test]
    fn released_intermediate_reaches_the_view() {
        let (backend, _, mut host, window) = host(false);
        let plugin = backend.spawn_plugin_window(window, Rect::new(0, 0, 20, 20));
        let batch = [crate::plugins::PluginGeometry {
            window: plugin,
            window_rect: Rect::new(0, 0, 20, 20),
            clip: None,
            visible: true,
        }];
        let now = Instant::now();
        host.surface_mut().unwrap().apply_plugin_geometry(&batch, now);
        let intermediate = backend.parent(plugin).unwrap();
        assert_ne!(intermediate, window);

        assert!(host.intermediate_released(intermediate));
        assert_eq!(backend.parent(plugin), Some(window));
        host.close();
        assert!(!host.intermediate_released(intermediate));
    }

    #[test]
    fn close_finalizes_once() {
        let (backend, remote, mut host, window) = host(false);
        host.close();
        host.close();
        assert!(!backend.is_window(window));
        assert_eq!(remote.sent(), vec![RemoteMessage::ViewDestroyed]);
    }
}
