//! Drawing primitives a paint pass needs.
//!
//! Coordinates are window client pixels. Every operation clips to the
//! target's bounds.

use canopy_common::types::{Color, Rect, Size};
use image::{Rgba, RgbaImage};

pub trait PaintTarget {
    fn size(&self) -> Size;
    /// Copy `rect` from `source` to the same position on the target.
    fn blit(&mut self, source: &RgbaImage, rect: Rect);
    fn fill(&mut self, rect: Rect, color: Color);
    /// Fill `rect` by repeating `tile`, anchored at the target origin.
    fn tile(&mut self, tile: &RgbaImage, rect: Rect);
    /// Blend `overlay` over the pixels of `rect`.
    fn blend(&mut self, rect: Rect, overlay: Color);
}

fn image_bounds(image: &RgbaImage) -> Rect {
    Rect::new(0, 0, image.width() as i32, image.height() as i32)
}

fn pixels(rect: Rect) -> impl Iterator<Item = (u32, u32)> {
    (rect.y..rect.bottom())
        .flat_map(move |y| (rect.x..rect.right()).map(move |x| (x as u32, y as u32)))
}

impl PaintTarget for RgbaImage {
    fn size(&self) -> Size {
        Size::new(self.width() as i32, self.height() as i32)
    }

    fn blit(&mut self, source: &RgbaImage, rect: Rect) {
        let rect = rect
            .intersect(&image_bounds(self))
            .intersect(&image_bounds(source));
        for (x, y) in pixels(rect) {
            self.put_pixel(x, y, *source.get_pixel(x, y));
        }
    }

    fn fill(&mut self, rect: Rect, color: Color) {
        let rect = rect.intersect(&image_bounds(self));
        let px = Rgba(color.to_rgba8());
        for (x, y) in pixels(rect) {
            self.put_pixel(x, y, px);
        }
    }

    fn tile(&mut self, tile: &RgbaImage, rect: Rect) {
        if tile.width() == 0 || tile.height() == 0 {
            return;
        }
        let rect = rect.intersect(&image_bounds(self));
        for (x, y) in pixels(rect) {
            let px = *tile.get_pixel(x % tile.width(), y % tile.height());
            self.put_pixel(x, y, px);
        }
    }

    fn blend(&mut self, rect: Rect, overlay: Color) {
        let rect = rect.intersect(&image_bounds(self));
        for (x, y) in pixels(rect) {
            let dst = self.get_pixel(x, y).0;
            self.put_pixel(x, y, Rgba(overlay.blend_over(dst)));
        }
    }
}
