//! Reconciles native focus, activation and capture with the remote
//! widget's focus state, and owns the auto-dismiss popup policy.

use canopy_common::types::WindowId;
use canopy_platform::WindowSystem;
use tracing::debug;

use crate::channel::{RemoteMessage, RemoteSlot};
use crate::tasks::TaskId;

#[derive(Debug, Default)]
pub struct FocusCoordinator {
    close_on_deactivate: bool,
    being_destroyed: bool,
    pending_shutdown: Option<TaskId>,
}

impl FocusCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make this an auto-dismiss popup.
    pub fn set_close_on_deactivate(&mut self, close: bool) {
        self.close_on_deactivate = close;
    }

    pub fn close_on_deactivate(&self) -> bool {
        self.close_on_deactivate
    }

    pub fn being_destroyed(&self) -> bool {
        self.being_destroyed
    }

    /// Teardown has started: deactivation must no longer schedule anything.
    pub fn mark_being_destroyed(&mut self) {
        self.close_on_deactivate = false;
        self.being_destroyed = true;
    }

    pub fn on_focus_gained(&self, remote: &mut RemoteSlot) {
        remote.send(RemoteMessage::Focused);
    }

    pub fn on_focus_lost(&self, remote: &mut RemoteSlot) {
        remote.send(RemoteMessage::Blurred);
    }

    pub fn on_capture_lost(&self, remote: &mut RemoteSlot) {
        remote.send(RemoteMessage::LostCapture);
    }

    /// Drop focus if the remote widget allows it. A view without a parent
    /// (hidden) has nothing to clear. Returns whether focus was cleared.
    pub fn blur(&self, windows: &dyn WindowSystem, window: WindowId, remote: &RemoteSlot) -> bool {
        if windows.parent(window).is_none() || !remote.can_blur() {
            return false;
        }
        windows.set_focus(None);
        true
    }

    /// True when losing activation should dismiss the popup.
    pub fn should_dismiss_on_activate(&self, active: bool) -> bool {
        self.close_on_deactivate && !active
    }

    /// Cancel mode arrived. Reports capture loss and returns true when the
    /// caller should hide now and schedule a deferred teardown.
    pub fn on_cancel_mode(&self, remote: &mut RemoteSlot) -> bool {
        remote.send(RemoteMessage::LostCapture);
        let dismiss = self.close_on_deactivate && self.pending_shutdown.is_none();
        if dismiss {
            debug!("popup dismissed by cancel mode");
        }
        dismiss
    }

    pub fn set_pending_shutdown(&mut self, task: TaskId) {
        self.pending_shutdown = Some(task);
    }

    pub fn take_pending_shutdown(&mut self) -> Option<TaskId> {
        self.pending_shutdown.take()
    }

    pub fn has_pending_shutdown(&self) -> bool {
        self.pending_shutdown.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_common::types::Rect;
    use canopy_platform::{HeadlessPlatform, WindowKind};

    use crate::channel::RecordingRemote;
    use crate::tasks::TaskQueue;

    fn slot() -> (RecordingRemote, RemoteSlot) {
        let remote = RecordingRemote::new();
        let slot = RemoteSlot::new(Box::new(remote.clone()));
        (remote, slot)
    }

    #[test]
    fn focus_transitions_are_forwarded() {
        let (remote, mut slot) = slot();
        let focus = FocusCoordinator::new();
        focus.on_focus_gained(&mut slot);
        focus.on_focus_lost(&mut slot);
        focus.on_capture_lost(&mut slot);
        assert_eq!(
            remote.sent(),
            vec![
                RemoteMessage::Focused,
                RemoteMessage::Blurred,
                RemoteMessage::LostCapture,
            ]
        );
    }

    #[test]
    fn blur_respects_remote_veto() {
        let platform = HeadlessPlatform::new();
        let top = platform.create_top_level(Rect::new(0, 0, 100, 100));
        let view = platform
            .create_window(Some(top), WindowKind::Child, Rect::new(0, 0, 10, 10))
            .unwrap();
        platform.set_focus(Some(view));
        let (remote, slot) = slot();
        let focus = FocusCoordinator::new();

        remote.log().borrow_mut().can_blur = false;
        assert!(!focus.blur(&platform, view, &slot));
        assert_eq!(platform.focus(), Some(view));

        remote.log().borrow_mut().can_blur = true;
        assert!(focus.blur(&platform, view, &slot));
        assert_eq!(platform.focus(), None);
    }

    #[test]
    fn blur_without_parent_does_nothing() {
        let platform = HeadlessPlatform::new();
        let orphan = platform.create_top_level(Rect::new(0, 0, 10, 10));
        let (_remote, slot) = slot();
        assert!(!FocusCoordinator::new().blur(&platform, orphan, &slot));
    }

    #[test]
    fn cancel_mode_dismisses_popup_once() {
        let (_remote, mut slot) = slot();
        let mut focus = FocusCoordinator::new();
        assert!(!focus.on_cancel_mode(&mut slot));

        focus.set_close_on_deactivate(true);
        assert!(focus.should_dismiss_on_activate(false));
        assert!(!focus.should_dismiss_on_activate(true));
        assert!(focus.on_cancel_mode(&mut slot));

        let mut queue = TaskQueue::new();
        focus.set_pending_shutdown(queue.schedule(std::time::Instant::now(), ()));
        assert!(!focus.on_cancel_mode(&mut slot));
    }

    #[test]
    fn being_destroyed_disables_dismissal() {
        let (_remote, mut slot) = slot();
        let mut focus = FocusCoordinator::new();
        focus.set_close_on_deactivate(true);
        focus.mark_being_destroyed();
        assert!(focus.being_destroyed());
        assert!(!focus.should_dismiss_on_activate(false));
        assert!(!focus.on_cancel_mode(&mut slot));
    }
}
