use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lat: f64,
    pub lng: f64,
}

impl Point {
    pub fn new(lat: f64, lng: f64) -> Point {
        Point { lat, lng }
    }

    /// Bitwise identity of the location, with -0.0 folded into 0.0.
    pub fn key(&self) -> (u64, u64) {
        ((self.lat + 0.0).to_bits(), (self.lng + 0.0).to_bits())
    }
}

impl From<(f64, f64)> for Point {
    fn from((lat, lng): (f64, f64)) -> Self {
        Point { lat, lng }
    }
}

/// Label of a group of points, either read from input or assigned by the clusterer.
///
/// Labels that parse as integers are kept as integers so that `07` and `7`
/// name the same cluster and integer ids sort numerically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClusterId {
    Int(i64),
    Label(String),
}

impl ClusterId {
    pub fn parse(raw: &str) -> Option<ClusterId> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        match raw.parse::<i64>() {
            Ok(id) => Some(ClusterId::Int(id)),
            Err(_) => Some(ClusterId::Label(raw.to_string())),
        }
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClusterId::Int(id) => write!(f, "{}", id),
            ClusterId::Label(label) => write!(f, "{}", label),
        }
    }
}

impl From<usize> for ClusterId {
    fn from(id: usize) -> Self {
        ClusterId::Int(id as i64)
    }
}

pub type PointSet = Vec<Point>;

pub fn distinct_count(points: &[Point]) -> usize {
    let mut keys: Vec<(u64, u64)> = points.iter().map(Point::key).collect();
    keys.sort_unstable();
    keys.dedup();
    keys.len()
}

/// Closed boundary of a convex hull: the first point is repeated as the last one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polygon {
    points: Vec<Point>,
}

impl Polygon {
    /// Closes an ordered vertex cycle by repeating its first vertex.
    pub(crate) fn close(mut vertices: Vec<Point>) -> Polygon {
        if let Some(first) = vertices.first().copied() {
            vertices.push(first);
        }
        Polygon { points: vertices }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Distinct vertices, without the closing repeat.
    pub fn vertices(&self) -> &[Point] {
        &self.points[..self.points.len().saturating_sub(1)]
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cluster_ids_normalise_integers() {
        assert_eq!(ClusterId::parse(" 07 "), Some(ClusterId::Int(7)));
        assert_eq!(ClusterId::parse("mission"), Some(ClusterId::Label("mission".into())));
        assert_eq!(ClusterId::parse("  "), None);
        assert!(ClusterId::Int(99) < ClusterId::Label("0".into()));
    }

    #[test]
    fn negative_zero_is_the_same_location() {
        let points = vec![Point::new(0.0, -0.0), Point::new(-0.0, 0.0), Point::new(1.0, 1.0)];
        assert_eq!(distinct_count(&points), 2);
    }

    #[test]
    fn closed_polygon_repeats_first_vertex() {
        let polygon = Polygon::close(vec![(0.0, 0.0).into(), (1.0, 0.0).into(), (0.0, 1.0).into()]);
        assert_eq!(polygon.len(), 4);
        assert_eq!(polygon.points()[0], polygon.points()[3]);
        assert_eq!(polygon.vertices().len(), 3);
    }
}
