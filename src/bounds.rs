use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::{HullsError, Result};
use crate::point::{ClusterId, Point, Polygon};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    #[serde(rename = "SW")]
    pub south_west: Point,
    #[serde(rename = "NE")]
    pub north_east: Point,
}

/// Bounding box over every point of every polygon.
///
/// West and east are swapped when some longitude falls outside
/// `[west, east]`. This is a best-effort guard for inverted longitude ranges,
/// not an antimeridian-aware box: a set of points straddling 180° still gets
/// the wide box spanning the whole range between its extremes.
pub fn compute_bounds(polygons: &BTreeMap<ClusterId, Polygon>) -> Result<BoundingBox> {
    let all_points: Vec<&Point> = polygons.values().flat_map(|p| p.points()).collect();
    if all_points.is_empty() {
        return Err(HullsError::EmptyInput);
    }

    let (mut south, mut north) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut west, mut east) = (f64::INFINITY, f64::NEG_INFINITY);
    for point in &all_points {
        south = south.min(point.lat);
        north = north.max(point.lat);
        west = west.min(point.lng);
        east = east.max(point.lng);
    }

    // Flip east/west if the box doesn't contain every longitude
    if !all_points.iter().all(|p| west <= p.lng && p.lng <= east) {
        std::mem::swap(&mut west, &mut east);
    }

    Ok(BoundingBox {
        south_west: Point::new(south, west),
        north_east: Point::new(north, east),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convex_hull::build_hull;

    fn hulls(groups: &[&[(f64, f64)]]) -> BTreeMap<ClusterId, Polygon> {
        groups
            .iter()
            .enumerate()
            .map(|(id, coords)| {
                let points: Vec<Point> = coords.iter().map(|&c| Point::from(c)).collect();
                (ClusterId::from(id), build_hull(&points).unwrap())
            })
            .collect()
    }

    #[test]
    fn spans_all_polygons() {
        let polygons = hulls(&[
            &[(10.0, -122.0), (12.0, -121.5), (11.0, -121.8)],
            &[(18.0, -121.2), (20.0, -121.0), (19.0, -121.9)],
        ]);
        let bounds = compute_bounds(&polygons).unwrap();
        assert_eq!(bounds.south_west, Point::new(10.0, -122.0));
        assert_eq!(bounds.north_east, Point::new(20.0, -121.0));
    }

    #[test]
    fn recomputing_gives_the_same_box() {
        let polygons = hulls(&[&[(1.0, 1.0), (3.0, 2.0), (2.0, 5.0)]]);
        assert_eq!(
            compute_bounds(&polygons).unwrap(),
            compute_bounds(&polygons).unwrap()
        );
    }

    #[test]
    fn empty_input_fails() {
        assert!(matches!(
            compute_bounds(&BTreeMap::new()),
            Err(HullsError::EmptyInput)
        ));
    }

    #[test]
    fn serializes_with_corner_names() {
        let polygons = hulls(&[&[(1.0, 1.0), (3.0, 2.0), (2.0, 5.0)]]);
        let json = serde_json::to_value(compute_bounds(&polygons).unwrap()).unwrap();
        assert_eq!(json["SW"]["lat"], 1.0);
        assert_eq!(json["NE"]["lng"], 5.0);
    }
}
