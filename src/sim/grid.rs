//! Uniform-bucket spatial grid for static geometry
//!
//! Rectangles are indexed by the cells their bounds touch. The grid stores
//! indices into the owner's solid list, never the rectangles themselves, so
//! two solids with identical bounds stay distinct.

use std::collections::HashMap;

use super::rect::Rect;
use crate::consts::GRID_CELL;

/// Broad-phase index over static rectangles
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialGrid {
    cell_size: f32,
    cells: HashMap<(i32, i32), Vec<usize>>,
}

impl Default for SpatialGrid {
    fn default() -> Self {
        Self::new(GRID_CELL)
    }
}

impl SpatialGrid {
    pub fn new(cell_size: f32) -> Self {
        debug_assert!(cell_size > 0.0);
        Self {
            cell_size,
            cells: HashMap::new(),
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Inclusive cell range `(cx1, cy1, cx2, cy2)` covered by a rect
    fn cell_range(&self, rect: &Rect) -> (i32, i32, i32, i32) {
        let cs = self.cell_size;
        (
            (rect.left() / cs).floor() as i32,
            (rect.top() / cs).floor() as i32,
            (rect.right() / cs).floor() as i32,
            (rect.bottom() / cs).floor() as i32,
        )
    }

    /// Register solid `id` in every cell its bounds touch
    pub fn insert(&mut self, id: usize, rect: &Rect) {
        let (cx1, cy1, cx2, cy2) = self.cell_range(rect);
        for cx in cx1..=cx2 {
            for cy in cy1..=cy2 {
                self.cells.entry((cx, cy)).or_default().push(id);
            }
        }
    }

    /// Candidate solids near `rect`, each id at most once, in discovery order
    pub fn query(&self, rect: &Rect) -> Vec<usize> {
        let (cx1, cy1, cx2, cy2) = self.cell_range(rect);
        let mut found = Vec::new();
        for cx in cx1..=cx2 {
            for cy in cy1..=cy2 {
                let Some(bucket) = self.cells.get(&(cx, cy)) else {
                    continue;
                };
                for &id in bucket {
                    if !found.contains(&id) {
                        found.push(id);
                    }
                }
            }
        }
        found
    }

    /// Drop every bucket
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Reindex a whole solid list (ids are positions in the slice)
    pub fn rebuild(&mut self, rects: &[Rect]) {
        self.clear();
        for (id, rect) in rects.iter().enumerate() {
            self.insert(id, rect);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of occupied cells
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_query() {
        let grid = SpatialGrid::default();
        assert!(grid.query(&Rect::new(0.0, 0.0, 100.0, 100.0)).is_empty());
    }

    #[test]
    fn test_wide_rect_spans_many_cells() {
        let mut grid = SpatialGrid::new(64.0);
        // Ground strip across two screens: cells 0..=20 on x, 5..=6 on y
        grid.insert(0, &Rect::new(0.0, 368.0, 1280.0, 32.0));
        assert_eq!(grid.occupied_cells(), 21 * 2);

        let near_end = grid.query(&Rect::new(1200.0, 340.0, 16.0, 32.0));
        assert_eq!(near_end, vec![0]);
    }

    #[test]
    fn test_query_dedups_by_id_not_value() {
        let mut grid = SpatialGrid::new(64.0);
        let r = Rect::new(10.0, 10.0, 100.0, 100.0);
        grid.insert(0, &r);
        grid.insert(1, &r);

        let hits = grid.query(&Rect::new(0.0, 0.0, 200.0, 200.0));
        assert_eq!(hits, vec![0, 1]);
    }

    #[test]
    fn test_negative_coordinates_floor() {
        let mut grid = SpatialGrid::new(64.0);
        grid.insert(3, &Rect::new(-10.0, -10.0, 5.0, 5.0));
        assert_eq!(grid.query(&Rect::new(-60.0, -60.0, 4.0, 4.0)), vec![3]);
        assert!(grid.query(&Rect::new(10.0, 10.0, 4.0, 4.0)).is_empty());
    }

    #[test]
    fn test_clear_and_rebuild() {
        let mut grid = SpatialGrid::new(64.0);
        grid.insert(0, &Rect::new(0.0, 0.0, 10.0, 10.0));
        grid.clear();
        assert!(grid.is_empty());

        grid.rebuild(&[Rect::new(200.0, 0.0, 10.0, 10.0), Rect::new(0.0, 0.0, 10.0, 10.0)]);
        assert_eq!(grid.query(&Rect::new(0.0, 0.0, 5.0, 5.0)), vec![1]);
    }

    fn arb_rect() -> impl Strategy<Value = Rect> {
        (-500i32..500, -500i32..500, 1i32..200, 1i32..200)
            .prop_map(|(x, y, w, h)| Rect::new(x as f32, y as f32, w as f32, h as f32))
    }

    proptest! {
        #[test]
        fn query_finds_every_overlap_exactly_once(
            rects in prop::collection::vec(arb_rect(), 0..40),
            probe in arb_rect(),
        ) {
            let mut grid = SpatialGrid::new(64.0);
            grid.rebuild(&rects);
            let hits = grid.query(&probe);

            let mut sorted = hits.clone();
            sorted.sort_unstable();
            sorted.dedup();
            prop_assert_eq!(sorted.len(), hits.len());

            for (id, r) in rects.iter().enumerate() {
                if r.overlaps(&probe) {
                    prop_assert!(hits.contains(&id));
                }
            }
        }
    }
}
