//! Uniform-cell spatial grid for proximity queries
//!
//! Entries are bucketed by `floor(pos / cell_size)`. A query visits every cell
//! overlapping the query square and filters by true distance. Cells are
//! visited in coordinate order, so results are deterministic.

use std::collections::HashMap;

use glam::Vec2;

#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f32,
    cells: HashMap<(i32, i32), Vec<(usize, Vec2)>>,
}

impl SpatialGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size: cell_size.max(f32::EPSILON),
            cells: HashMap::new(),
        }
    }

    #[inline]
    fn cell_of(&self, x: f32, y: f32) -> (i32, i32) {
        (
            (x / self.cell_size).floor() as i32,
            (y / self.cell_size).floor() as i32,
        )
    }

    /// Empty every bucket, keeping allocations for reuse
    pub fn clear(&mut self) {
        for bucket in self.cells.values_mut() {
            bucket.clear();
        }
    }

    pub fn insert(&mut self, id: usize, pos: Vec2) {
        let key = self.cell_of(pos.x, pos.y);
        self.cells.entry(key).or_default().push((id, pos));
    }

    /// Collect ids within `radius` of `center` (inclusive) into `out`
    pub fn query_into(&self, center: Vec2, radius: f32, out: &mut Vec<usize>) {
        out.clear();
        let (min_cx, min_cy) = self.cell_of(center.x - radius, center.y - radius);
        let (max_cx, max_cy) = self.cell_of(center.x + radius, center.y + radius);
        let r2 = radius * radius;

        for cx in min_cx..=max_cx {
            for cy in min_cy..=max_cy {
                let Some(bucket) = self.cells.get(&(cx, cy)) else {
                    continue;
                };
                out.extend(
                    bucket
                        .iter()
                        .filter(|(_, pos)| pos.distance_squared(center) <= r2)
                        .map(|(id, _)| *id),
                );
            }
        }
    }

    pub fn query(&self, center: Vec2, radius: f32) -> Vec<usize> {
        let mut out = Vec::new();
        self.query_into(center, radius, &mut out);
        out
    }

    pub fn len(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
