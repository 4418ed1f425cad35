use geoutils::Location;

use crate::point::{Point, Polygon};

/// Average of the polygon's points, closing repeat included.
pub fn polygon_center(polygon: &Polygon) -> Point {
    let points = polygon.points();
    let count = points.len() as f64;
    let sum = points
        .iter()
        .fold((0.0, 0.0), |acc, p| (acc.0 + p.lat, acc.1 + p.lng));
    Point::new(sum.0 / count, sum.1 / count)
}

/// Great-circle length of the polygon boundary in meters.
pub fn perimeter_m(polygon: &Polygon) -> f64 {
    polygon
        .points()
        .windows(2)
        .map(|pair| {
            let from = Location::new(pair[0].lat, pair[0].lng);
            let to = Location::new(pair[1].lat, pair[1].lng);
            from.haversine_distance_to(&to).meters()
        })
        .sum()
}
