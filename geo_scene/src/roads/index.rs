//! Uniform hash grid over scene positions for coincidence queries.

use std::collections::HashMap;

use crate::geometry::SceneCoordinate;

type Cell = (i64, i64);

/// Buckets point indices by horizontal grid cell. Cells are at least as large
/// as the query tolerance, so every match lies in the 3x3 neighbourhood of the
/// query cell.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f64,
    cells: HashMap<Cell, Vec<usize>>,
}

impl SpatialGrid {
    /// Indexes `points` by position. Indices returned from queries refer to
    /// this slice.
    pub fn build(points: &[SceneCoordinate], tolerance: f64) -> Self {
        let cell_size = if tolerance.is_finite() && tolerance > 0.0 {
            tolerance
        } else {
            1e-9
        };
        let mut cells: HashMap<Cell, Vec<usize>> = HashMap::new();
        for (idx, p) in points.iter().enumerate() {
            cells.entry(cell_of(p, cell_size)).or_default().push(idx);
        }
        Self { cell_size, cells }
    }

    /// Index of the point closest to `query` within `tolerance`, preferring the
    /// lowest index among equally distant points.
    pub fn nearest_within(
        &self,
        points: &[SceneCoordinate],
        query: &SceneCoordinate,
        tolerance: f64,
    ) -> Option<usize> {
        let mut best: Option<(f64, usize)> = None;
        for idx in self.neighbours(query) {
            let d = points[idx].distance(query);
            if d > tolerance {
                continue;
            }
            let better = match best {
                None => true,
                Some((bd, bi)) => d.total_cmp(&bd).then(idx.cmp(&bi)).is_lt(),
            };
            if better {
                best = Some((d, idx));
            }
        }
        best.map(|(_, idx)| idx)
    }

    /// Indices of every point within `tolerance` of `query`, ascending.
    pub fn within(
        &self,
        points: &[SceneCoordinate],
        query: &SceneCoordinate,
        tolerance: f64,
    ) -> Vec<usize> {
        let mut found: Vec<usize> = self
            .neighbours(query)
            .filter(|&idx| points[idx].distance(query) <= tolerance)
            .collect();
        found.sort_unstable();
        found
    }

    /// Groups points chained together by distances within `tolerance` and
    /// returns, for each point, the lowest index of its group.
    pub fn clusters(&self, points: &[SceneCoordinate], tolerance: f64) -> Vec<usize> {
        let mut parent: Vec<usize> = (0..points.len()).collect();
        for (idx, p) in points.iter().enumerate() {
            for other in self.within(points, p, tolerance) {
                union(&mut parent, idx, other);
            }
        }
        (0..points.len()).map(|idx| find(&mut parent, idx)).collect()
    }

    fn neighbours<'a>(&'a self, query: &SceneCoordinate) -> impl Iterator<Item = usize> + 'a {
        let (cx, cy) = cell_of(query, self.cell_size);
        (-1..=1)
            .flat_map(move |dx| {
                (-1..=1).map(move |dy| (cx.saturating_add(dx), cy.saturating_add(dy)))
            })
            .filter_map(move |cell| self.cells.get(&cell))
            .flat_map(|bucket| bucket.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

// Roots are always the smallest index in their set.
fn find(parent: &mut [usize], mut idx: usize) -> usize {
    while parent[idx] != idx {
        parent[idx] = parent[parent[idx]];
        idx = parent[idx];
    }
    idx
}

fn union(parent: &mut [usize], a: usize, b: usize) {
    let (ra, rb) = (find(parent, a), find(parent, b));
    if ra != rb {
        parent[ra.max(rb)] = ra.min(rb);
    }
}

fn cell_of(p: &SceneCoordinate, cell_size: f64) -> Cell {
    // `as` saturates for huge or non-finite values
    (
        (p.x / cell_size).floor() as i64,
        (p.y / cell_size).floor() as i64,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_points_across_cell_borders() {
        let pts = vec![
            SceneCoordinate::new(0.0099, 0.0, 0.0),
            SceneCoordinate::new(5.0, 5.0, 0.0),
        ];
        let grid = SpatialGrid::build(&pts, 0.01);
        assert_eq!(grid.len(), 2);
        let q = SceneCoordinate::new(0.0101, 0.0, 0.0);
        assert_eq!(grid.nearest_within(&pts, &q, 0.01), Some(0));
        let far = SceneCoordinate::new(0.05, 0.0, 0.0);
        assert_eq!(grid.nearest_within(&pts, &far, 0.01), None);
    }

    #[test]
    fn ties_prefer_lowest_index() {
        let pts = vec![
            SceneCoordinate::new(1.0, 1.0, 0.0),
            SceneCoordinate::new(1.0, 1.0, 0.0),
        ];
        let grid = SpatialGrid::build(&pts, 0.01);
        assert_eq!(grid.nearest_within(&pts, &pts[1], 0.01), Some(0));
    }

    #[test]
    fn within_returns_every_match() {
        let pts = vec![
            SceneCoordinate::new(0.0, 0.0, 0.0),
            SceneCoordinate::new(0.004, 0.0, 0.0),
            SceneCoordinate::new(0.5, 0.0, 0.0),
        ];
        let grid = SpatialGrid::build(&pts, 0.01);
        assert_eq!(grid.within(&pts, &pts[1], 0.01), vec![0, 1]);
        assert_eq!(grid.within(&pts, &pts[2], 0.01), vec![2]);
    }

    #[test]
    fn clusters_chain_to_lowest_index() {
        let pts = vec![
            SceneCoordinate::new(3.0, 3.0, 0.0),
            SceneCoordinate::new(0.008, 0.0, 0.0),
            SceneCoordinate::new(0.0, 0.0, 0.0),
            SceneCoordinate::new(0.016, 0.0, 0.0),
        ];
        let grid = SpatialGrid::build(&pts, 0.01);
        assert_eq!(grid.clusters(&pts, 0.01), vec![0, 1, 1, 1]);
    }

    #[test]
    fn vertical_separation_counts() {
        let pts = vec![SceneCoordinate::new(0.0, 0.0, 10.0)];
        let grid = SpatialGrid::build(&pts, 0.01);
        let q = SceneCoordinate::new(0.0, 0.0, 0.0);
        assert_eq!(grid.nearest_within(&pts, &q, 0.01), None);
    }
}
