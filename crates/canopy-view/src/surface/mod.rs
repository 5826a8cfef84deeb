//! The per-view controller.
//!
//! [`ViewSurface`] owns the native window of one remotely rendered view and
//! composes the backing store cache, tooltip, IME, focus, plugin and input
//! components. Every method runs on the UI thread; anything deferred goes
//! through the view's own [`TaskQueue`] and is revoked on destroy.

mod events;
mod lifecycle;
mod paint;


use std::rc::{Rc, Weak};
use std::time::Instant;

use canopy_common::errors::PlatformError;
use canopy_common::types::{Rect, Size, WindowId};
use canopy_platform::{CursorKind, Platform, WindowKind};
use image::RgbaImage;
use serde::Serialize;
use tracing::{debug, warn};

use crate::backing_store::BackingStoreCache;
use crate::channel::{AccessibleHandle, RemoteMessage, RemoteSlot, RemoteWidget};
use crate::focus::FocusCoordinator;
use crate::ime::{ImeControl, ImeController};
use crate::input::InputRouter;
use crate::metrics::PaintMetrics;
use crate::parent::ParentContainer;
use crate::plugins::{BatchReport, PluginGeometry, PluginWindowEmbedder, RegistrationRequest};
use crate::process::ProcessContext;
use crate::tasks::TaskQueue;
use crate::tooltip::{TooltipController, TooltipUpdate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Visible,
    Hidden,
}

/// Answer to a mouse-activation query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseActivation {
    Activate,
    NoActivate,
}

/// What a paint pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum PaintOutcome {
    /// Hidden or without a window. Damage was dropped.
    Suppressed,
    /// Nothing was damaged.
    Clean,
    /// Drawn from the backing store; `area` bounds the damage.
    Painted { area: Rect },
    /// No backing store yet, background only.
    Blank { area: Rect },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeferredTask {
    ShutdownHost,
    Register(RegistrationRequest),
}

pub struct ViewSurface {
    ctx: Rc<ProcessContext>,
    window: Option<WindowId>,
    /// Parent to restore on `show()`, cached while hidden.
    parent_window: Option<WindowId>,
    container: Option<Weak<dyn ParentContainer>>,
    remote: RemoteSlot,
    cache: BackingStoreCache,
    visibility: Visibility,
    deemphasized: bool,
    background: Option<RgbaImage>,
    activatable: bool,
    is_loading: bool,
    cursor: CursorKind,
    resizer: Rect,
    tooltip: TooltipController,
    ime: ImeController,
    focus: FocusCoordinator,
    plugins: PluginWindowEmbedder,
    input: InputRouter,
    tasks: TaskQueue<DeferredTask>,
    metrics: PaintMetrics,
    accessibility_root: Option<AccessibleHandle>,
}

impl ViewSurface {
    pub fn new(ctx: Rc<ProcessContext>, remote: Box<dyn RemoteWidget>) -> Self {
        let config = ctx.config();
        let tooltip = TooltipController::new(&config.tooltip);
        let plugins = PluginWindowEmbedder::new(&config.plugins);
        Self {
            ctx,
            window: None,
            parent_window: None,
            container: None,
            remote: RemoteSlot::new(remote),
            cache: BackingStoreCache::new(),
            visibility: Visibility::Visible,
            deemphasized: false,
            background: None,
            activatable: true,
            is_loading: false,
            cursor: CursorKind::Arrow,
            resizer: Rect::default(),
            tooltip,
            ime: ImeController::new(),
            focus: FocusCoordinator::new(),
            plugins,
            input: InputRouter::new(),
            tasks: TaskQueue::new(),
            metrics: PaintMetrics::new(),
            accessibility_root: None,
        }
    }

    /// Create the native window as a child of `parent`.
    pub fn create(&mut self, parent: WindowId, bounds: Rect) -> Result<WindowId, PlatformError> {
        let ctx = self.ctx.clone();
        let window = ctx
            .platform()
            .windows
            .create_window(Some(parent), WindowKind::Child, bounds)?;
        debug!(%window, %parent, "view window created");
        self.window = Some(window);
        self.parent_window = Some(parent);
        // Pick up the input language the process starts with.
        self.on_input_language_changed();
        Ok(window)
    }

    /// Create the window as an auto-dismiss popup owned by `parent_window`.
    pub fn init_as_popup(
        &mut self,
        parent_window: WindowId,
        rect: Rect,
        activatable: bool,
    ) -> Result<WindowId, PlatformError> {
        let ctx = self.ctx.clone();
        let windows = &*ctx.platform().windows;
        self.activatable = activatable;
        self.focus.set_close_on_deactivate(true);
        let window = windows.create_window(Some(parent_window), WindowKind::Popup, rect)?;
        debug!(%window, owner = %parent_window, activatable, "popup window created");
        self.window = Some(window);
        self.parent_window = Some(parent_window);
        self.on_input_language_changed();
        windows.set_bounds(window, rect);
        windows.set_visible(window, true, activatable);
        Ok(window)
    }

    pub fn set_parent_container(&mut self, container: &Rc<dyn ParentContainer>) {
        self.container = Some(Rc::downgrade(container));
    }

    fn container(&self) -> Option<Rc<dyn ParentContainer>> {
        self.container.as_ref()?.upgrade()
    }

    fn platform(&self) -> &Platform {
        self.ctx.platform()
    }

    pub fn window(&self) -> Option<WindowId> {
        self.window
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_hidden(&self) -> bool {
        self.visibility == Visibility::Hidden
    }

    pub fn is_popup(&self) -> bool {
        self.focus.close_on_deactivate()
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_present()
    }

    pub fn is_deemphasized(&self) -> bool {
        self.deemphasized
    }

    pub fn backing_store(&self) -> &BackingStoreCache {
        &self.cache
    }

    pub fn backing_store_mut(&mut self) -> &mut BackingStoreCache {
        &mut self.cache
    }

    pub fn metrics(&self) -> &PaintMetrics {
        &self.metrics
    }

    pub fn tooltip(&self) -> &TooltipController {
        &self.tooltip
    }

    pub fn ime(&self) -> &ImeController {
        &self.ime
    }

    pub fn plugins(&self) -> &PluginWindowEmbedder {
        &self.plugins
    }

    pub fn input(&self) -> &InputRouter {
        &self.input
    }

    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    pub fn next_task_due(&self) -> Option<Instant> {
        self.tasks.next_due()
    }

    pub fn client_size(&self) -> Size {
        self.window
            .map(|w| self.platform().windows.client_rect(w).size())
            .unwrap_or_default()
    }

    /// Reattach to the cached parent and make the view visible again.
    pub fn show(&mut self, now: Instant) {
        let Some(window) = self.window else {
            return;
        };
        let Some(parent) = self.parent_window else {
            warn!(%window, "show() without a parent window");
            return;
        };
        let windows = &*self.platform().windows;
        windows.set_parent(window, Some(parent));
        windows.set_visible(window, true, false);
        self.did_become_selected(now);
    }

    /// Hide and orphan the window so it stops receiving native events.
    pub fn hide(&mut self) {
        let Some(window) = self.window else {
            return;
        };
        let windows = &*self.ctx.platform().windows;
        let Some(parent) = windows.parent(window) else {
            warn!(%window, cached_parent = ?self.parent_window, "hide() called twice in a row");
            return;
        };
        if windows.focus() == Some(window) {
            windows.set_focus(None);
        }
        windows.set_visible(window, false, false);
        self.parent_window = Some(parent);
        windows.set_parent(window, None);
        self.was_hidden();
    }

    pub fn did_become_selected(&mut self, now: Instant) {
        if !self.is_hidden() {
            return;
        }
        self.metrics.mark_restored(now);
        self.visibility = Visibility::Visible;
        self.ensure_tooltip();
        // Damage was dropped while hidden; regenerate all of it.
        if let Some(window) = self.window {
            let windows = &*self.ctx.platform().windows;
            self.cache.damage(windows.client_rect(window));
            windows.request_paint(window);
        }
        self.remote.send(RemoteMessage::Restored);
    }

    pub fn was_hidden(&mut self) {
        if self.is_hidden() {
            return;
        }
        self.visibility = Visibility::Hidden;
        self.tooltip.reset(&*self.ctx.platform().tooltips);
        self.cache.drop_damage();
        self.remote.send(RemoteMessage::Hidden);
    }

    pub fn set_size(&mut self, size: Size) {
        if self.is_hidden() {
            return;
        }
        let Some(window) = self.window else {
            return;
        };
        self.platform().windows.resize(window, size);
        self.remote.send(RemoteMessage::Resize { size });
        self.ensure_tooltip();
    }

    fn ensure_tooltip(&mut self) {
        let Some(window) = self.window else {
            return;
        };
        let platform = self.ctx.platform();
        let client = platform.windows.client_rect(window);
        self.tooltip.ensure(&*platform.tooltips, window, client);
    }

    pub fn focus(&self) {
        if let Some(window) = self.window {
            let windows = &*self.platform().windows;
            if windows.is_window(window) {
                windows.set_focus(Some(window));
            }
        }
    }

    pub fn blur(&self) -> bool {
        match self.window {
            Some(window) => self
                .focus
                .blur(&*self.platform().windows, window, &self.remote),
            None => false,
        }
    }

    pub fn has_focus(&self) -> bool {
        self.window.is_some() && self.platform().windows.focus() == self.window
    }

    pub fn update_cursor(&mut self, cursor: CursorKind) {
        self.cursor = cursor;
        self.update_cursor_if_over_self();
    }

    pub fn set_is_loading(&mut self, is_loading: bool) {
        self.is_loading = is_loading;
        self.update_cursor_if_over_self();
    }

    /// Apply the current cursor, but only while the pointer is over us.
    fn update_cursor_if_over_self(&self) {
        let Some(window) = self.window else {
            return;
        };
        let windows = &*self.platform().windows;
        if windows.window_under_cursor() != Some(window) {
            return;
        }
        let origin = windows.screen_origin(window);
        let pointer = windows.cursor_position().offset(-origin.x, -origin.y);
        let cursor = if self.resizer.contains(pointer.x, pointer.y) {
            if self.ctx.is_rtl_ui() {
                CursorKind::ResizeNesw
            } else {
                CursorKind::ResizeNwse
            }
        } else if self.is_loading && self.cursor == CursorKind::Arrow {
            CursorKind::AppStarting
        } else {
            self.cursor
        };
        windows.set_cursor(cursor);
    }

    /// Resize corner of the top-level window, in view coordinates.
    pub fn set_resizer_rect(&mut self, rect: Rect) {
        self.resizer = rect;
    }

    pub fn ime_update_status(&self, control: ImeControl, caret: Rect) {
        if let Some(window) = self.window {
            self.ime
                .update_status(&*self.platform().ime, window, control, caret);
        }
    }

    pub fn set_tooltip_text(&mut self, text: &str) -> TooltipUpdate {
        let tooltips = &*self.ctx.platform().tooltips;
        self.tooltip.set_text(tooltips, text)
    }

    /// Background drawn where the page has no pixels; also sent to the
    /// remote side. An empty image clears it.
    pub fn set_background(&mut self, background: RgbaImage) {
        self.remote.send(RemoteMessage::SetBackground {
            width: background.width(),
            height: background.height(),
            rgba: background.as_raw().clone(),
        });
        self.background = (background.width() > 0 && background.height() > 0).then_some(background);
    }

    /// True if `window` is the view's window or one of its descendants.
    pub fn contains_native_view(&self, window: WindowId) -> bool {
        let Some(own) = self.window else {
            return false;
        };
        if own == window {
            return true;
        }
        let windows = &*self.platform().windows;
        let mut current = windows.parent(window);
        while let Some(parent) = current {
            if parent == own {
                return true;
            }
            current = windows.parent(parent);
        }
        false
    }

    pub fn set_visually_deemphasized(&mut self, deemphasized: bool) {
        if self.deemphasized == deemphasized {
            return;
        }
        self.deemphasized = deemphasized;
        if let Some(window) = self.window {
            let windows = &*self.ctx.platform().windows;
            self.cache.damage(windows.client_rect(window));
            windows.request_paint(window);
        }
    }

    /// Place plugin windows. Newly wrapped plugin windows are registered
    /// with the plugin process registry from the task queue.
    pub fn apply_plugin_geometry(&mut self, batch: &[PluginGeometry], now: Instant) -> BatchReport {
        let Some(window) = self.window else {
            return BatchReport::default();
        };
        let ctx = self.ctx.clone();
        let report = self
            .plugins
            .apply_batch(&*ctx.platform().windows, window, batch);
        for request in &report.registrations {
            self.tasks.schedule(now, DeferredTask::Register(*request));
        }
        report
    }

    /// The plugin process is done with `intermediate`. The plugin window
    /// stays, moved back under the view.
    pub fn on_intermediate_released(&mut self, intermediate: WindowId) -> bool {
        let Some(window) = self.window else {
            return false;
        };
        let ctx = self.ctx.clone();
        self.plugins
            .release_intermediate(&*ctx.platform().windows, window, intermediate)
    }
}
