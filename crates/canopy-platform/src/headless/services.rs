use canopy_common::types::{Rect, TooltipId, WindowId};

use super::{HeadlessPlatform, ImeOp, PlatformOp, TooltipRecord};
use crate::ime::InputMethod;
use crate::input::PointerEvent;
use crate::keyboard::{KeyboardLayouts, LanguageId};
use crate::plugin_registry::{PluginProcessRegistry, RegistrationOutcome};
use crate::tooltip::TooltipHost;

impl TooltipHost for HeadlessPlatform {
    fn create_tooltip(&self, owner: WindowId) -> Option<TooltipId> {
        let mut state = self.state.borrow_mut();
        if state.fail_tooltip_creation || !state.windows.contains_key(&owner) {
            return None;
        }
        let id = TooltipId(state.allocate_id());
        state.tooltips.insert(
            id,
            TooltipRecord {
                owner: Some(owner),
                ..TooltipRecord::default()
            },
        );
        Some(id)
    }

    fn is_tooltip(&self, tooltip: TooltipId) -> bool {
        self.state.borrow().tooltips.contains_key(&tooltip)
    }

    fn destroy_tooltip(&self, tooltip: TooltipId) {
        self.state.borrow_mut().tooltips.remove(&tooltip);
    }

    fn set_tool_rect(&self, tooltip: TooltipId, rect: Rect) {
        if let Some(tip) = self.state.borrow_mut().tooltips.get_mut(&tooltip) {
            tip.rect = rect;
        }
    }

    fn set_max_width(&self, tooltip: TooltipId, pixels: u32) {
        if let Some(tip) = self.state.borrow_mut().tooltips.get_mut(&tooltip) {
            tip.max_width = pixels;
        }
    }

    fn pop(&self, tooltip: TooltipId) {
        if let Some(tip) = self.state.borrow_mut().tooltips.get_mut(&tooltip) {
            tip.showing = false;
            tip.pops += 1;
        }
    }

    fn popup(&self, tooltip: TooltipId) {
        if let Some(tip) = self.state.borrow_mut().tooltips.get_mut(&tooltip) {
            tip.showing = true;
            tip.popups += 1;
        }
    }

    fn relay(&self, tooltip: TooltipId, _event: &PointerEvent) {
        if let Some(tip) = self.state.borrow_mut().tooltips.get_mut(&tooltip) {
            tip.relayed += 1;
        }
    }
}

impl HeadlessPlatform {
    fn record_ime(&self, window: Option<WindowId>, op: ImeOp) {
        self.record(PlatformOp::Ime { window, op });
    }
}

impl InputMethod for HeadlessPlatform {
    fn set_input_language(&self) -> bool {
        self.record_ime(None, ImeOp::SetLanguage);
        self.state.borrow().language_has_ime
    }

    fn create_ime_window(&self, window: WindowId) {
        self.record_ime(Some(window), ImeOp::CreateWindow);
    }

    fn destroy_ime_window(&self, window: WindowId) {
        self.record_ime(Some(window), ImeOp::DestroyWindow);
    }

    fn update_ime_window(&self, window: WindowId) {
        self.record_ime(Some(window), ImeOp::UpdateWindow);
    }

    fn cleanup_composition(&self, window: WindowId) {
        self.record_ime(Some(window), ImeOp::Cleanup);
    }

    fn reset_composition(&self, window: WindowId) {
        self.record_ime(Some(window), ImeOp::Reset);
    }

    fn enable_ime(&self, window: WindowId, caret: Rect, complete: bool) {
        self.record_ime(Some(window), ImeOp::Enable { caret, complete });
    }

    fn disable_ime(&self, window: WindowId) {
        self.record_ime(Some(window), ImeOp::Disable);
    }
}

impl KeyboardLayouts for HeadlessPlatform {
    fn installed_layouts(&self) -> Option<Vec<LanguageId>> {
        let mut state = self.state.borrow_mut();
        state.layout_queries += 1;
        state.layouts.clone()
    }
}

impl PluginProcessRegistry for HeadlessPlatform {
    fn register_intermediate_window(
        &self,
        plugin: WindowId,
        intermediate: WindowId,
    ) -> RegistrationOutcome {
        let mut state = self.state.borrow_mut();
        let outcome = state
            .registration_outcomes
            .pop_front()
            .unwrap_or(RegistrationOutcome::Registered);
        state.ops.push(PlatformOp::Registration {
            plugin,
            intermediate,
            outcome,
        });
        outcome
    }

    fn teardown_intermediate_window(&self, intermediate: WindowId) {
        self.record(PlatformOp::Teardown(intermediate));
    }
}
