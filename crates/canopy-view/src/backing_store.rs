//! Cached page pixels plus the damage accumulated since the last paint.

use canopy_common::types::{Color, Point, Rect, Region, Size};
use canopy_platform::PaintTarget;
use image::RgbaImage;

#[derive(Debug, Default)]
pub struct BackingStoreCache {
    store: Option<RgbaImage>,
    damage: Region,
}

impl BackingStoreCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> Option<&RgbaImage> {
        self.store.as_ref()
    }

    pub fn size(&self) -> Option<Size> {
        self.store
            .as_ref()
            .map(|s| Size::new(s.width() as i32, s.height() as i32))
    }

    pub fn bounds(&self) -> Option<Rect> {
        self.size().map(Rect::from_size)
    }

    /// Swap in a whole new bitmap, as happens on resize.
    pub fn replace(&mut self, store: RgbaImage) {
        self.store = Some(store);
    }

    /// Forget the bitmap; paints fall back to the background.
    pub fn discard(&mut self) {
        self.store = None;
    }

    /// Copy `patch` into the store with its top-left corner at `origin`.
    /// Returns the part of the store that changed.
    pub fn apply_patch(&mut self, origin: Point, patch: &RgbaImage) -> Rect {
        let Some(store) = self.store.as_mut() else {
            return Rect::default();
        };
        let target = Rect::new(
            origin.x,
            origin.y,
            patch.width() as i32,
            patch.height() as i32,
        )
        .intersect(&Rect::new(0, 0, store.width() as i32, store.height() as i32));
        for y in target.y..target.bottom() {
            for x in target.x..target.right() {
                let px = *patch.get_pixel((x - origin.x) as u32, (y - origin.y) as u32);
                store.put_pixel(x as u32, y as u32, px);
            }
        }
        target
    }

    /// Fill `rect` of the store with a solid color.
    pub fn fill(&mut self, rect: Rect, color: Color) {
        if let Some(store) = self.store.as_mut() {
            store.fill(rect, color);
        }
    }

    /// Shift the pixels inside `clip` by (`dx`, `dy`). Pixels scrolled in
    /// from outside `clip` keep their old value until the remote side sends
    /// them; the returned region is that exposed strip.
    pub fn scroll(&mut self, clip: Rect, dx: i32, dy: i32) -> Region {
        let Some(store) = self.store.as_mut() else {
            return Region::new();
        };
        let clip = clip.intersect(&Rect::new(0, 0, store.width() as i32, store.height() as i32));
        if clip.is_empty() || (dx == 0 && dy == 0) {
            return Region::new();
        }
        let moved = clip.offset(dx, dy).intersect(&clip);
        let source = store.clone();
        for y in moved.y..moved.bottom() {
            for x in moved.x..moved.right() {
                let px = *source.get_pixel((x - dx) as u32, (y - dy) as u32);
                store.put_pixel(x as u32, y as u32, px);
            }
        }
        let mut exposed = Region::from_rect(clip);
        exposed.subtract(&moved);
        exposed
    }

    pub fn damage(&mut self, rect: Rect) {
        self.damage.add(rect);
    }

    pub fn damage_region(&self) -> &Region {
        &self.damage
    }

    pub fn has_damage(&self) -> bool {
        !self.damage.is_empty()
    }

    /// Take the whole damage region, leaving it empty.
    pub fn take_damage(&mut self) -> Region {
        self.damage.take()
    }

    pub fn drop_damage(&mut self) {
        self.damage.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(width: u32, height: u32, value: u8) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([value, value, value, 255]))
    }

    #[test]
    fn empty_cache_has_no_bounds() {
        let cache = BackingStoreCache::new();
        assert!(cache.store().is_none());
        assert_eq!(cache.bounds(), None);
    }

    #[test]
    fn patch_is_clipped_to_store() {
        let mut cache = BackingStoreCache::new();
        cache.replace(solid(10, 10, 0));
        let changed = cache.apply_patch(Point::new(8, 8), &solid(4, 4, 200));
        assert_eq!(changed, Rect::new(8, 8, 2, 2));
        let store = cache.store().unwrap();
        assert_eq!(store.get_pixel(9, 9).0[0], 200);
        assert_eq!(store.get_pixel(7, 7).0[0], 0);
    }

    #[test]
    fn patch_without_store_changes_nothing() {
        let mut cache = BackingStoreCache::new();
        assert!(cache.apply_patch(Point::new(0, 0), &solid(2, 2, 1)).is_empty());
    }

    #[test]
    fn scroll_down_exposes_top_strip() {
        let mut cache = BackingStoreCache::new();
        let mut store = solid(4, 4, 0);
        store.put_pixel(1, 0, Rgba([50, 50, 50, 255]));
        cache.replace(store);

        let exposed = cache.scroll(Rect::new(0, 0, 4, 4), 0, 2);
        assert_eq!(exposed.bounds(), Rect::new(0, 0, 4, 2));
        assert_eq!(cache.store().unwrap().get_pixel(1, 2).0[0], 50);
    }

    #[test]
    fn zero_scroll_is_noop() {
        let mut cache = BackingStoreCache::new();
        cache.replace(solid(4, 4, 0));
        assert!(cache.scroll(Rect::new(0, 0, 4, 4), 0, 0).is_empty());
    }

    #[test]
    fn take_damage_clears_atomically() {
        let mut cache = BackingStoreCache::new();
        cache.damage(Rect::new(0, 0, 5, 5));
        cache.damage(Rect::new(10, 10, 5, 5));
        let taken = cache.take_damage();
        assert_eq!(taken.area(), 50);
        assert!(!cache.has_damage());
    }
}
