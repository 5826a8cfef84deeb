//! Owns the view's single native tooltip control.
//!
//! Whether the tooltip is showing is learned only from the control's own
//! show/pop notifications.

use canopy_common::types::{Rect, TooltipId, WindowId};
use canopy_config::TooltipConfig;
use canopy_platform::{PointerEvent, TooltipHost};
use tracing::{debug, warn};

/// What [`TooltipController::set_text`] asked the control to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TooltipUpdate {
    /// Nothing visible changed.
    Unchanged,
    /// New text while showing: popped and re-shown to restart the timer.
    Restarted,
    /// Same text while not showing: any pending show was cancelled.
    CancelledPendingShow,
}

#[derive(Debug)]
pub struct TooltipController {
    handle: Option<TooltipId>,
    text: String,
    showing: bool,
    max_length: usize,
    max_width_px: u32,
}

impl TooltipController {
    pub fn new(config: &TooltipConfig) -> Self {
        Self {
            handle: None,
            text: String::new(),
            showing: false,
            max_length: config.max_length,
            max_width_px: config.max_width_px,
        }
    }

    pub fn handle(&self) -> Option<TooltipId> {
        self.handle
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_showing(&self) -> bool {
        self.showing
    }

    /// Create the control if needed and make its hover area cover `client`.
    pub fn ensure(&mut self, host: &dyn TooltipHost, owner: WindowId, client: Rect) {
        let handle = match self.live_handle(host) {
            Some(handle) => handle,
            None => match host.create_tooltip(owner) {
                Some(handle) => {
                    debug!(%owner, "tooltip control created");
                    self.handle = Some(handle);
                    handle
                }
                None => {
                    warn!(%owner, "could not create tooltip control");
                    return;
                }
            },
        };
        host.set_tool_rect(handle, client);
    }

    /// Destroy the control. The text is kept for the next one.
    pub fn reset(&mut self, host: &dyn TooltipHost) {
        if let Some(handle) = self.handle.take() {
            if host.is_tooltip(handle) {
                host.destroy_tooltip(handle);
            }
        }
        self.showing = false;
    }

    pub fn set_text(&mut self, host: &dyn TooltipHost, text: &str) -> TooltipUpdate {
        let text = truncate(text, self.max_length);
        let live = self.live_handle(host);
        if text != self.text {
            self.text = text;
            match live {
                Some(handle) if self.showing => {
                    host.pop(handle);
                    host.popup(handle);
                    TooltipUpdate::Restarted
                }
                _ => TooltipUpdate::Unchanged,
            }
        } else if !self.showing {
            match live {
                Some(handle) => {
                    host.pop(handle);
                    TooltipUpdate::CancelledPendingShow
                }
                None => TooltipUpdate::Unchanged,
            }
        } else {
            TooltipUpdate::Unchanged
        }
    }

    pub fn on_shown(&mut self) {
        if self.handle.is_some() {
            self.showing = true;
        }
    }

    pub fn on_popped(&mut self) {
        if self.handle.is_some() {
            self.showing = false;
        }
    }

    /// The control wants the text it is about to show.
    pub fn text_request(&self, host: &dyn TooltipHost) -> Option<&str> {
        let handle = self.handle?;
        host.set_max_width(handle, self.max_width_px);
        Some(&self.text)
    }

    pub fn relay(&self, host: &dyn TooltipHost, event: &PointerEvent) {
        if let Some(handle) = self.live_handle(host) {
            host.relay(handle, event);
        }
    }

    fn live_handle(&self, host: &dyn TooltipHost) -> Option<TooltipId> {
        self.handle.filter(|h| host.is_tooltip(*h))
    }
}

/// Clamp `text` to `max` characters, ending in an ellipsis when cut.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_owned();
    }
    if max == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(max - 1).collect();
    out.push('\u{2026}');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_platform::HeadlessPlatform;

    fn setup() -> (HeadlessPlatform, WindowId, TooltipController) {
        let host = HeadlessPlatform::new();
        let owner = host.create_top_level(Rect::new(0, 0, 200, 100));
        let mut tooltip = TooltipController::new(&TooltipConfig::default());
        tooltip.ensure(&host, owner, Rect::new(0, 0, 200, 100));
        (host, owner, tooltip)
    }

    #[test]
    fn ensure_creates_once_and_tracks_client_rect() {
        let (host, owner, mut tooltip) = setup();
        let first = tooltip.handle().unwrap();
        tooltip.ensure(&host, owner, Rect::new(0, 0, 50, 50));
        assert_eq!(tooltip.handle(), Some(first));
        assert_eq!(host.tooltip(first).unwrap().rect, Rect::new(0, 0, 50, 50));
    }

    #[test]
    fn same_text_twice_while_showing_changes_nothing() {
        let (host, _, mut tooltip) = setup();
        let handle = tooltip.handle().unwrap();
        tooltip.set_text(&host, "A");
        tooltip.on_shown();
        assert_eq!(tooltip.set_text(&host, "A"), TooltipUpdate::Unchanged);
        let record = host.tooltip(handle).unwrap();
        assert_eq!((record.pops, record.popups), (0, 0));
        assert!(tooltip.is_showing());
    }

    #[test]
    fn new_text_while_showing_restarts_once() {
        let (host, _, mut tooltip) = setup();
        let handle = tooltip.handle().unwrap();
        tooltip.set_text(&host, "A");
        tooltip.on_shown();
        assert_eq!(tooltip.set_text(&host, "B"), TooltipUpdate::Restarted);
        let record = host.tooltip(handle).unwrap();
        assert_eq!((record.pops, record.popups), (1, 1));
        assert_eq!(tooltip.text(), "B");
    }

    #[test]
    fn same_text_while_hidden_cancels_pending_show() {
        let (host, _, mut tooltip) = setup();
        let handle = tooltip.handle().unwrap();
        assert_eq!(tooltip.set_text(&host, "A"), TooltipUpdate::Unchanged);
        assert_eq!(
            tooltip.set_text(&host, "A"),
            TooltipUpdate::CancelledPendingShow
        );
        let record = host.tooltip(handle).unwrap();
        assert_eq!((record.pops, record.popups), (1, 0));
    }

    #[test]
    fn visibility_follows_notifications_only() {
        let (host, _, mut tooltip) = setup();
        tooltip.set_text(&host, "A");
        tooltip.on_shown();
        tooltip.set_text(&host, "B");
        // Restarting does not flip the flag by itself.
        assert!(tooltip.is_showing());
        tooltip.on_popped();
        assert!(!tooltip.is_showing());
    }

    #[test]
    fn text_is_truncated() {
        let (host, _, mut tooltip) = setup();
        let long = "x".repeat(5000);
        tooltip.set_text(&host, &long);
        assert_eq!(tooltip.text().chars().count(), 1024);
        assert!(tooltip.text().ends_with('\u{2026}'));
    }

    #[test]
    fn text_request_applies_max_width() {
        let (host, _, mut tooltip) = setup();
        tooltip.set_text(&host, "hello");
        assert_eq!(tooltip.text_request(&host), Some("hello"));
        let handle = tooltip.handle().unwrap();
        assert_eq!(host.tooltip(handle).unwrap().max_width, 300);
    }

    #[test]
    fn reset_destroys_control() {
        let (host, _, mut tooltip) = setup();
        let handle = tooltip.handle().unwrap();
        tooltip.on_shown();
        tooltip.reset(&host);
        assert!(tooltip.handle().is_none());
        assert!(!tooltip.is_showing());
        assert!(host.tooltip(handle).is_none());
    }

    #[test]
    fn truncate_handles_short_and_zero() {
        assert_eq!(truncate("abc", 3), "abc");
        assert_eq!(truncate("abcd", 3), "ab\u{2026}");
        assert_eq!(truncate("abcd", 0), "");
    }
}
