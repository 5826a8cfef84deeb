//! Executes a [`Script`] against the headless platform.
//!
//! Time is virtual: it starts at a fixed instant and only moves on
//! `advance` steps. After every step the runner behaves like a native
//! event loop would: due tasks run, then queued paints are delivered.

use std::rc::Rc;
use std::time::{Duration, Instant};

use canopy_common::types::{Point, Rect, WindowId};
use canopy_common::CanopyError;
use canopy_config::ViewConfig;
use canopy_platform::headless::PlatformOp;
use canopy_platform::{HeadlessPlatform, LanguageId, Platform};
use canopy_view::{
    Disposition, NativeEvent, PaintOutcome, ProcessContext, RecordingRemote, RemoteMessage,
    ViewHost, ViewSurface,
};
use image::{Rgba, RgbaImage};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::script::{parse_color, Script, Step};

/// Paint passes per step before giving up on a view that keeps damaging
/// itself.
const MAX_PAINT_PASSES: usize = 8;

/// What one step produced.
#[derive(Debug, Serialize)]
pub struct StepReport {
    pub step: usize,
    pub op: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disposition: Option<Disposition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spawned: Option<WindowId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub paints: Vec<PaintOutcome>,
    pub sent: Vec<RemoteMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ops: Option<Vec<PlatformOp>>,
}

#[derive(Debug, Default)]
struct Applied {
    disposition: Option<Disposition>,
    spawned: Option<WindowId>,
}

impl From<Disposition> for Applied {
    fn from(disposition: Disposition) -> Self {
        Self {
            disposition: Some(disposition),
            spawned: None,
        }
    }
}

pub struct Replay {
    backend: Rc<HeadlessPlatform>,
    remote: RecordingRemote,
    host: ViewHost,
    view: WindowId,
    start: Instant,
    elapsed: Duration,
    record_ops: bool,
}

impl Replay {
    pub fn new(script: &Script, config: ViewConfig, record_ops: bool) -> Result<Self, CanopyError> {
        let backend = Rc::new(HeadlessPlatform::new());
        if script.rtl_layout {
            backend.set_layouts(Some(vec![LanguageId::ENGLISH, LanguageId::HEBREW]));
        }
        let top = backend.create_top_level(script.top_level);
        backend.set_foreground(Some(top));

        let ctx = ProcessContext::new(Platform::headless(backend.clone()), config)
            .with_rtl_ui(script.rtl_ui);
        let remote = RecordingRemote::new();
        let mut surface = ViewSurface::new(Rc::new(ctx), Box::new(remote.clone()));
        let view = match &script.popup {
            Some(popup) => surface.init_as_popup(top, script.view, popup.activatable)?,
            None => surface.create(top, script.view)?,
        };
        info!(%view, popup = script.popup.is_some(), "replay view created");

        Ok(Self {
            backend,
            remote,
            host: ViewHost::new(surface),
            view,
            start: Instant::now(),
            elapsed: Duration::ZERO,
            record_ops,
        })
    }

    pub fn view(&self) -> WindowId {
        self.view
    }

    pub fn frame(&self) -> &RgbaImage {
        self.host.frame()
    }

    fn now(&self) -> Instant {
        self.start + self.elapsed
    }

    /// Messages and platform calls made while setting the view up.
    pub fn setup_report(&mut self) -> StepReport {
        StepReport {
            step: 0,
            op: "setup",
            disposition: None,
            spawned: None,
            paints: Vec::new(),
            sent: self.remote.take_sent(),
            ops: self.record_ops.then(|| self.backend.take_ops()),
        }
    }

    pub fn run(&mut self, steps: &[Step]) -> Result<Vec<StepReport>, CanopyError> {
        steps
            .iter()
            .enumerate()
            .map(|(index, step)| self.step(index + 1, step))
            .collect()
    }

    fn step(&mut self, index: usize, step: &Step) -> Result<StepReport, CanopyError> {
        debug!(step = index, op = step.name(), "replaying");
        let applied = self.apply(step)?;
        let now = self.now();
        self.host.pump(now);
        let paints = self.deliver_paints(now);
        Ok(StepReport {
            step: index,
            op: step.name(),
            disposition: applied.disposition,
            spawned: applied.spawned,
            paints,
            sent: self.remote.take_sent(),
            ops: self.record_ops.then(|| self.backend.take_ops()),
        })
    }

    /// Answer queued paint requests for the view window.
    fn deliver_paints(&mut self, now: Instant) -> Vec<PaintOutcome> {
        let mut paints = Vec::new();
        for _ in 0..MAX_PAINT_PASSES {
            if !self.backend.take_paint_requests().contains(&self.view) {
                return paints;
            }
            if let Disposition::Painted(outcome) = self.host.dispatch(&NativeEvent::Paint, now) {
                paints.push(outcome);
            }
        }
        warn!(passes = MAX_PAINT_PASSES, "view still requests paints, moving on");
        paints
    }

    /// Run deferred tasks in deadline order up to `target`.
    fn advance(&mut self, by: Duration) {
        let target = self.now() + by;
        while let Some(due) = self.host.next_wakeup().filter(|due| *due <= target) {
            self.elapsed = due.saturating_duration_since(self.start);
            self.host.pump(due);
        }
        self.elapsed = target.saturating_duration_since(self.start);
    }

    fn apply(&mut self, step: &Step) -> Result<Applied, CanopyError> {
        let now = self.now();
        match step {
            Step::Native(event) => return Ok(self.host.dispatch(event, now).into()),
            Step::Advance { ms } => {
                self.advance(Duration::from_millis(*ms));
                return Ok(Applied::default());
            }
            Step::PointerAt { x, y, over_view } => {
                self.backend.set_cursor_position(Point::new(*x, *y));
                self.backend
                    .set_window_under_cursor(over_view.then_some(self.view));
                return Ok(Applied::default());
            }
            Step::Registration { outcome } => {
                self.backend.push_registration_outcome(*outcome);
                return Ok(Applied::default());
            }
            Step::SpawnPlugin { rect } => {
                let plugin = self.backend.spawn_plugin_window(self.view, *rect);
                info!(%plugin, "plugin window spawned");
                return Ok(Applied {
                    disposition: None,
                    spawned: Some(plugin),
                });
            }
            Step::Store {
                width,
                height,
                color,
            } => {
                let color = parse_color(color)?;
                self.remote.log().borrow_mut().pending_store = Some(RgbaImage::from_pixel(
                    *width,
                    *height,
                    Rgba(color.to_rgba8()),
                ));
                let rect = Rect::new(0, 0, *width as i32, *height as i32);
                let outcome = self.host.backing_store_updated(&[rect], now);
                return Ok(Disposition::Painted(outcome).into());
            }
            Step::Update { rect, color } => {
                let color = parse_color(color)?;
                self.remote
                    .log()
                    .borrow_mut()
                    .pending_updates
                    .push_back((*rect, color));
                let outcome = self.host.backing_store_updated(&[*rect], now);
                return Ok(Disposition::Painted(outcome).into());
            }
            Step::ReleaseIntermediate { window } => {
                let released = self.host.intermediate_released(*window);
                debug!(%window, released, "intermediate release delivered");
                return Ok(Disposition::Handled.into());
            }
            Step::KillWindow { window } => {
                self.backend.kill_window(*window);
                return Ok(Applied::default());
            }
            Step::Close => {
                self.host.close();
                return Ok(Disposition::Handled.into());
            }
            _ => {}
        }

        let Some(surface) = self.host.surface_mut() else {
            warn!(op = step.name(), "view already finalized, step ignored");
            return Ok(Disposition::Dropped.into());
        };
        match step {
            Step::Resize { size } => surface.set_size(*size),
            Step::Hide => surface.hide(),
            Step::Show => surface.show(now),
            Step::Focus => surface.focus(),
            Step::Blur => {
                surface.blur();
            }
            Step::Cursor { cursor } => surface.update_cursor(*cursor),
            Step::Loading { loading } => surface.set_is_loading(*loading),
            Step::Resizer { rect } => surface.set_resizer_rect(*rect),
            Step::Tooltip { text } => {
                let update = surface.set_tooltip_text(text);
                debug!(?update, "tooltip text set");
            }
            Step::Deemphasize { on } => surface.set_visually_deemphasized(*on),
            Step::Background {
                width,
                height,
                color,
            } => {
                let color = parse_color(color)?;
                surface.set_background(RgbaImage::from_pixel(
                    *width,
                    *height,
                    Rgba(color.to_rgba8()),
                ));
            }
            Step::Scroll { rect, dx, dy } => surface.did_scroll_backing_store(*rect, *dx, *dy),
            Step::Plugins { batch } => {
                let report = surface.apply_plugin_geometry(batch, now);
                info!(
                    placed = report.placed,
                    skipped = report.skipped,
                    swept = report.swept,
                    committed = report.committed,
                    registrations = report.registrations.len(),
                    "plugin geometry applied"
                );
            }
            Step::ImeStatus { control, caret } => surface.ime_update_status(*control, *caret),
            Step::WidgetGone => surface.widget_gone(),
            Step::RemoteGone => surface.will_destroy_remote_widget(),
            Step::Destroy => surface.destroy(),
            Step::Native(_)
            | Step::Advance { .. }
            | Step::PointerAt { .. }
            | Step::Registration { .. }
            | Step::SpawnPlugin { .. }
            | Step::ReleaseIntermediate { .. }
            | Step::KillWindow { .. }
            | Step::Store { .. }
            | Step::Update { .. }
            | Step::Close => {}
        }
        Ok(Disposition::Handled.into())
    }
}
