//! Input method composition state machine.
//!
//! ```text
//!   Idle --start--> Composing --update(composition)--> Composing
//!   Composing --update(result)--> Idle   (re-enters Composing if the same
//!                                         update also carries a composition)
//!   Composing --end--> Idle              (sends a discard)
//! ```
//!
//! Every notification is ignored while the remote widget is gone.

use canopy_common::types::{Rect, WindowId};
use canopy_platform::InputMethod;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::channel::{CompositionCommand, RemoteMessage, RemoteSlot};

/// A composition string with its cursor and target clause.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Composition {
    pub text: String,
    pub cursor: i32,
    pub target_start: i32,
    pub target_end: i32,
}

impl Composition {
    fn message(&self, command: CompositionCommand) -> RemoteMessage {
        RemoteMessage::ImeSetComposition {
            command,
            cursor: self.cursor,
            target_start: self.target_start,
            target_end: self.target_end,
            text: self.text.clone(),
        }
    }
}

/// Payload of one composition notification. `result` is finished text;
/// `composition` is the string still being composed. Either may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositionUpdate {
    pub result: Option<Composition>,
    pub composition: Option<Composition>,
}

/// Focused-field IME request from the remote side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImeControl {
    Disable,
    MoveWindows,
    CompleteComposition,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum ImeState {
    #[default]
    Idle,
    Composing(Composition),
}

#[derive(Debug, Default)]
pub struct ImeController {
    state: ImeState,
    /// Last status-notification mode the remote side acknowledged.
    notification: bool,
}

impl ImeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_composing(&self) -> bool {
        matches!(self.state, ImeState::Composing(_))
    }

    pub fn composition(&self) -> Option<&Composition> {
        match &self.state {
            ImeState::Composing(c) => Some(c),
            ImeState::Idle => None,
        }
    }

    pub fn notification_enabled(&self) -> bool {
        self.notification
    }

    /// The active input language changed. Tell the remote side only when
    /// the wanted notification mode differs from what it last accepted.
    pub fn on_input_language_changed(&mut self, ime: &dyn InputMethod, remote: &mut RemoteSlot) {
        let wanted = ime.set_input_language();
        if wanted != self.notification
            && remote.send(RemoteMessage::ImeSetMode { enabled: wanted })
        {
            debug!(enabled = wanted, "ime notification mode changed");
            self.notification = wanted;
        }
    }

    /// The window's input context was activated or deactivated.
    pub fn on_set_context(
        &mut self,
        ime: &dyn InputMethod,
        window: WindowId,
        active: bool,
        remote: &mut RemoteSlot,
    ) {
        if !remote.is_present() {
            return;
        }
        if remote.send(RemoteMessage::ImeSetMode { enabled: active }) {
            self.notification = active;
        }
        if self.notification {
            ime.create_ime_window(window);
        }
        ime.cleanup_composition(window);
    }

    pub fn on_start_composition(
        &mut self,
        ime: &dyn InputMethod,
        window: WindowId,
        remote: &RemoteSlot,
    ) {
        if !remote.is_present() {
            return;
        }
        ime.create_ime_window(window);
        ime.reset_composition(window);
        self.state = ImeState::Composing(Composition::default());
    }

    pub fn on_composition(
        &mut self,
        ime: &dyn InputMethod,
        window: WindowId,
        update: &CompositionUpdate,
        remote: &mut RemoteSlot,
    ) {
        if !remote.is_present() {
            return;
        }
        ime.update_ime_window(window);

        if let Some(result) = &update.result {
            remote.send(result.message(CompositionCommand::Confirm));
            ime.reset_composition(window);
            self.state = ImeState::Idle;
        }
        if let Some(composition) = &update.composition {
            remote.send(composition.message(CompositionCommand::Set));
            self.state = ImeState::Composing(composition.clone());
        }
    }

    pub fn on_end_composition(
        &mut self,
        ime: &dyn InputMethod,
        window: WindowId,
        remote: &mut RemoteSlot,
    ) {
        if !remote.is_present() {
            return;
        }
        if self.is_composing() {
            debug!(%window, "composition cancelled");
            remote.send(RemoteMessage::discard_composition());
            ime.reset_composition(window);
            self.state = ImeState::Idle;
        }
        ime.destroy_ime_window(window);
    }

    /// Apply the remote side's view of the focused field.
    pub fn update_status(
        &self,
        ime: &dyn InputMethod,
        window: WindowId,
        control: ImeControl,
        caret: Rect,
    ) {
        match control {
            ImeControl::Disable => ime.disable_ime(window),
            ImeControl::MoveWindows => ime.enable_ime(window, caret, false),
            ImeControl::CompleteComposition => ime.enable_ime(window, caret, true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_platform::headless::{ImeOp, PlatformOp};
    use canopy_platform::HeadlessPlatform;

    use crate::channel::RecordingRemote;

    struct Fixture {
        ime: HeadlessPlatform,
        window: WindowId,
        remote: RecordingRemote,
        slot: RemoteSlot,
        controller: ImeController,
    }

    fn fixture() -> Fixture {
        let ime = HeadlessPlatform::new();
        let window = ime.create_top_level(Rect::new(0, 0, 100, 100));
        let remote = RecordingRemote::new();
        let slot = RemoteSlot::new(Box::new(remote.clone()));
        Fixture {
            ime,
            window,
            remote,
            slot,
            controller: ImeController::new(),
        }
    }

    fn comp(text: &str, cursor: i32) -> Composition {
        Composition {
            text: text.into(),
            cursor,
            target_start: 0,
            target_end: cursor,
        }
    }

    fn commands(messages: &[RemoteMessage]) -> Vec<(CompositionCommand, String)> {
        messages
            .iter()
            .filter_map(|m| match m {
                RemoteMessage::ImeSetComposition { command, text, .. } => {
                    Some((*command, text.clone()))
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn result_confirms_once_and_returns_to_idle() {
        let mut f = fixture();
        f.controller.on_start_composition(&f.ime, f.window, &f.slot);
        assert!(f.controller.is_composing());
        f.controller.on_composition(
            &f.ime,
            f.window,
            &CompositionUpdate {
                result: None,
                composition: Some(comp("ab", 2)),
            },
            &mut f.slot,
        );
        f.remote.take_sent();
        f.controller.on_composition(
            &f.ime,
            f.window,
            &CompositionUpdate {
                result: Some(comp("ab", 2)),
                composition: None,
            },
            &mut f.slot,
        );
        assert_eq!(
            commands(&f.remote.sent()),
            vec![(CompositionCommand::Confirm, "ab".to_string())]
        );
        assert!(!f.controller.is_composing());
    }

    #[test]
    fn result_with_new_composition_reenters_composing() {
        let mut f = fixture();
        f.controller.on_start_composition(&f.ime, f.window, &f.slot);
        f.controller.on_composition(
            &f.ime,
            f.window,
            &CompositionUpdate {
                result: Some(comp("done", 4)),
                composition: Some(comp("n", 1)),
            },
            &mut f.slot,
        );
        assert_eq!(
            commands(&f.remote.sent()),
            vec![
                (CompositionCommand::Confirm, "done".to_string()),
                (CompositionCommand::Set, "n".to_string()),
            ]
        );
        assert_eq!(f.controller.composition(), Some(&comp("n", 1)));
    }

    #[test]
    fn end_while_composing_discards() {
        let mut f = fixture();
        f.controller.on_start_composition(&f.ime, f.window, &f.slot);
        f.controller.on_composition(
            &f.ime,
            f.window,
            &CompositionUpdate {
                result: None,
                composition: Some(comp("x", 1)),
            },
            &mut f.slot,
        );
        f.remote.take_sent();
        f.controller.on_end_composition(&f.ime, f.window, &mut f.slot);
        assert_eq!(f.remote.sent(), vec![RemoteMessage::discard_composition()]);
        assert!(!f.controller.is_composing());
        assert!(f.ime.ops().contains(&PlatformOp::Ime {
            window: Some(f.window),
            op: ImeOp::DestroyWindow,
        }));
    }

    #[test]
    fn end_after_result_sends_nothing() {
        let mut f = fixture();
        f.controller.on_start_composition(&f.ime, f.window, &f.slot);
        f.controller.on_composition(
            &f.ime,
            f.window,
            &CompositionUpdate {
                result: Some(comp("ok", 2)),
                composition: None,
            },
            &mut f.slot,
        );
        f.remote.take_sent();
        f.controller.on_end_composition(&f.ime, f.window, &mut f.slot);
        assert!(f.remote.sent().is_empty());
    }

    #[test]
    fn language_change_notifies_only_on_edges() {
        let mut f = fixture();
        f.ime.set_language_has_ime(true);
        f.controller.on_input_language_changed(&f.ime, &mut f.slot);
        f.controller.on_input_language_changed(&f.ime, &mut f.slot);
        f.ime.set_language_has_ime(false);
        f.controller.on_input_language_changed(&f.ime, &mut f.slot);
        f.controller.on_input_language_changed(&f.ime, &mut f.slot);
        assert_eq!(
            f.remote.sent(),
            vec![
                RemoteMessage::ImeSetMode { enabled: true },
                RemoteMessage::ImeSetMode { enabled: false },
            ]
        );
    }

    #[test]
    fn refused_mode_change_is_retried_next_time() {
        let mut f = fixture();
        f.ime.set_language_has_ime(true);
        f.remote.log().borrow_mut().refuse_sends = true;
        f.controller.on_input_language_changed(&f.ime, &mut f.slot);
        assert!(!f.controller.notification_enabled());
        f.remote.log().borrow_mut().refuse_sends = false;
        f.controller.on_input_language_changed(&f.ime, &mut f.slot);
        assert!(f.controller.notification_enabled());
    }

    #[test]
    fn set_context_creates_window_when_active() {
        let mut f = fixture();
        f.controller.on_set_context(&f.ime, f.window, true, &mut f.slot);
        assert_eq!(f.remote.sent(), vec![RemoteMessage::ImeSetMode { enabled: true }]);
        let ops = f.ime.ops();
        assert!(ops.contains(&PlatformOp::Ime {
            window: Some(f.window),
            op: ImeOp::CreateWindow,
        }));
        assert!(ops.contains(&PlatformOp::Ime {
            window: Some(f.window),
            op: ImeOp::Cleanup,
        }));
    }

    #[test]
    fn notifications_ignored_without_remote() {
        let mut f = fixture();
        f.slot.clear();
        f.controller.on_start_composition(&f.ime, f.window, &f.slot);
        assert!(!f.controller.is_composing());
        assert!(f.ime.ops().is_empty());
    }

    #[test]
    fn update_status_maps_controls() {
        let f = fixture();
        let caret = Rect::new(5, 5, 1, 10);
        f.controller
            .update_status(&f.ime, f.window, ImeControl::CompleteComposition, caret);
        f.controller
            .update_status(&f.ime, f.window, ImeControl::Disable, caret);
        assert_eq!(
            f.ime.ops(),
            vec![
                PlatformOp::Ime {
                    window: Some(f.window),
                    op: ImeOp::Enable {
                        caret,
                        complete: true,
                    },
                },
                PlatformOp::Ime {
                    window: Some(f.window),
                    op: ImeOp::Disable,
                },
            ]
        );
    }
}
