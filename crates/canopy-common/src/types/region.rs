//! A set of pixels described by disjoint rectangles.
//!
//! Used for the damage region of a view and for plugin clip regions
//! (clip rect minus cutouts).

use serde::{Deserialize, Serialize};

use super::core::Rect;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Region {
    rects: Vec<Rect>,
}

impl Region {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rect(rect: Rect) -> Self {
        let mut region = Self::new();
        region.add(rect);
        region
    }

    /// Add `rect`, keeping the stored rects disjoint.
    pub fn add(&mut self, rect: Rect) {
        if rect.is_empty() {
            return;
        }
        let mut pending = vec![rect];
        for existing in &self.rects {
            pending = pending
                .into_iter()
                .flat_map(|piece| piece.subtract(existing))
                .collect();
            if pending.is_empty() {
                return;
            }
        }
        self.rects.extend(pending);
    }

    pub fn add_all<'a>(&mut self, rects: impl IntoIterator<Item = &'a Rect>) {
        for rect in rects {
            self.add(*rect);
        }
    }

    /// Remove `rect` from the region.
    pub fn subtract(&mut self, rect: &Rect) {
        if rect.is_empty() {
            return;
        }
        self.rects = self
            .rects
            .iter()
            .flat_map(|existing| existing.subtract(rect))
            .collect();
    }

    pub fn intersect(&self, rect: &Rect) -> Region {
        Region {
            rects: self
                .rects
                .iter()
                .map(|r| r.intersect(rect))
                .filter(|r| !r.is_empty())
                .collect(),
        }
    }

    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.rects.iter().any(|r| r.contains(x, y))
    }

    /// Bounding box of the region (empty rect if the region is empty).
    pub fn bounds(&self) -> Rect {
        self.rects
            .iter()
            .fold(Rect::default(), |acc, r| acc.union(r))
    }

    pub fn area(&self) -> i64 {
        self.rects.iter().map(Rect::area).sum()
    }

    pub fn clear(&mut self) {
        self.rects.clear();
    }

    /// Move the whole region out, leaving it empty.
    pub fn take(&mut self) -> Region {
        std::mem::take(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_rects_are_ignored() {
        let mut region = Region::new();
        region.add(Rect::new(5, 5, 0, 10));
        assert!(region.is_empty());
    }

    #[test]
    fn overlapping_adds_stay_disjoint() {
        let mut region = Region::new();
        region.add(Rect::new(0, 0, 10, 10));
        region.add(Rect::new(5, 5, 10, 10));
        assert_eq!(region.area(), 100 + 100 - 25);
        let rects = region.rects();
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                assert!(!a.intersects(b));
            }
        }
    }

    #[test]
    fn adding_contained_rect_is_noop() {
        let mut region = Region::from_rect(Rect::new(0, 0, 100, 100));
        region.add(Rect::new(10, 10, 5, 5));
        assert_eq!(region.rects().len(), 1);
    }

    #[test]
    fn subtract_cutout() {
        let mut region = Region::from_rect(Rect::new(0, 0, 100, 50));
        region.subtract(&Rect::new(40, 10, 20, 20));
        assert_eq!(region.area(), 5000 - 400);
        assert!(!region.contains(45, 15));
        assert!(region.contains(5, 5));
    }

    #[test]
    fn bounds_covers_all() {
        let mut region = Region::new();
        region.add(Rect::new(0, 0, 10, 10));
        region.add(Rect::new(50, 60, 10, 10));
        assert_eq!(region.bounds(), Rect::from_ltrb(0, 0, 60, 70));
    }

    #[test]
    fn take_leaves_empty() {
        let mut region = Region::from_rect(Rect::new(0, 0, 4, 4));
        let taken = region.take();
        assert!(region.is_empty());
        assert_eq!(taken.area(), 16);
    }

    #[test]
    fn intersect_clips_to_rect() {
        let mut region = Region::new();
        region.add(Rect::new(0, 0, 10, 10));
        region.add(Rect::new(20, 0, 10, 10));
        let clipped = region.intersect(&Rect::new(5, 0, 20, 10));
        assert_eq!(clipped.area(), 50 + 50);
    }
}
