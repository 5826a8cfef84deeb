use std::time::Instant;

use canopy_common::types::{Rect, Region};
use canopy_platform::PaintTarget;
use image::RgbaImage;
use tracing::trace;

use super::{PaintOutcome, ViewSurface};

impl ViewSurface {
    /// Native paint request: draw the pending damage into `target`.
    ///
    /// The damage is taken before the backing store is refreshed, so
    /// anything the refresh damages is painted by a follow-up request.
    pub fn on_paint_requested(&mut self, target: &mut dyn PaintTarget, now: Instant) -> PaintOutcome {
        let Some(window) = self.window else {
            return PaintOutcome::Suppressed;
        };
        if self.is_hidden() {
            self.cache.drop_damage();
            return PaintOutcome::Suppressed;
        }
        let damage = self.cache.take_damage();
        if damage.is_empty() {
            return PaintOutcome::Clean;
        }

        self.remote.refresh_backing_store(&mut self.cache);

        let area = damage.bounds();
        let outcome = match self.cache.store() {
            Some(store) => {
                self.draw_from_store(target, &damage, store);
                PaintOutcome::Painted { area }
            }
            None => {
                for rect in damage.rects() {
                    self.draw_background(target, *rect);
                }
                PaintOutcome::Blank { area }
            }
        };
        let had_store = matches!(outcome, PaintOutcome::Painted { .. });
        self.metrics.on_painted(now, had_store);
        trace!(%window, ?area, had_store, "painted");

        if self.cache.has_damage() {
            self.ctx.platform().windows.request_paint(window);
        }
        outcome
    }

    fn draw_from_store(&self, target: &mut dyn PaintTarget, damage: &Region, store: &RgbaImage) {
        let bounds = Rect::new(0, 0, store.width() as i32, store.height() as i32);
        let deemphasis = self
            .deemphasized
            .then(|| self.ctx.config().paint.deemphasis_color());
        for rect in damage.rects() {
            let paint_rect = rect.intersect(&bounds);
            if paint_rect.is_empty() {
                continue;
            }
            target.blit(store, paint_rect);
            if let Some(overlay) = deemphasis {
                target.blend(paint_rect, overlay);
            }
        }

        // Damage the store does not cover (it is smaller than the window).
        let mut uncovered = damage.clone();
        uncovered.subtract(&bounds);
        for rect in uncovered.rects() {
            self.draw_background(target, *rect);
        }
    }

    fn draw_background(&self, target: &mut dyn PaintTarget, rect: Rect) {
        match &self.background {
            Some(tile) => target.tile(tile, rect),
            None => target.fill(rect, self.ctx.config().paint.background_color()),
        }
    }

    /// The remote side updated `rects` of the backing store. Paints them
    /// synchronously and tells plugin windows to repaint over the result.
    pub fn did_paint_backing_store_rects(
        &mut self,
        rects: &[Rect],
        target: &mut dyn PaintTarget,
        now: Instant,
    ) -> PaintOutcome {
        if self.is_hidden() {
            return PaintOutcome::Suppressed;
        }
        let Some(window) = self.window else {
            return PaintOutcome::Suppressed;
        };
        for rect in rects {
            self.cache.damage(*rect);
        }
        let painted = self.cache.damage_region().bounds();
        let outcome = self.on_paint_requested(target, now);

        if !painted.is_empty() {
            let ctx = self.ctx.clone();
            let windows = &*ctx.platform().windows;
            let origin = windows.screen_origin(window);
            self.plugins
                .notify_painted(windows, window, painted.offset(origin.x, origin.y));
        }
        outcome
    }

    /// The remote side scrolled `clip` by (`dx`, `dy`) in the store.
    pub fn did_scroll_backing_store(&mut self, clip: Rect, dx: i32, dy: i32) {
        if self.is_hidden() {
            return;
        }
        let Some(window) = self.window else {
            return;
        };
        self.cache.scroll(clip, dx, dy);
        self.cache.damage(clip);
        self.ctx.platform().windows.request_paint(window);
    }
}
