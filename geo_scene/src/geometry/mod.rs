//! Basic geometry primitives for scene space.

pub mod point;
pub use point::{GeoCoordinate, SceneCoordinate, UtmCoordinate};

/// Calculates the Euclidean distance between two scene coordinates.
pub fn distance(a: SceneCoordinate, b: SceneCoordinate) -> f64 {
    a.distance(&b)
}

/// Total length of a polyline computed as the sum of the distances between
/// consecutive vertices.
pub fn polyline_length(vertices: &[SceneCoordinate]) -> f64 {
    if vertices.len() < 2 {
        return 0.0;
    }
    vertices
        .windows(2)
        .map(|pair| distance(pair[0], pair[1]))
        .sum()
}

/// Axis aligned rectangle in the horizontal scene plane.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl SceneBounds {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Smallest bounds enclosing every coordinate, or `None` for empty input.
    pub fn from_coordinates<'a, I>(coords: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a SceneCoordinate>,
    {
        let mut iter = coords.into_iter();
        let first = iter.next()?;
        let mut bounds = Self::new(first.x, first.y, first.x, first.y);
        for c in iter {
            bounds.min_x = bounds.min_x.min(c.x);
            bounds.min_y = bounds.min_y.min(c.y);
            bounds.max_x = bounds.max_x.max(c.x);
            bounds.max_y = bounds.max_y.max(c.y);
        }
        Some(bounds)
    }

    /// Returns `true` when `(x, y)` lies inside or on the edge of the bounds.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}
