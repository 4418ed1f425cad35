use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::error::{HullsError, Result};
use crate::point::{distinct_count, Point, Polygon};

/// `neighbor` follows `vertex` when walking the hull boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HullEdge {
    pub vertex: usize,
    pub neighbor: usize,
}

/// Produces the boundary of the convex hull as successor edges over indices
/// into `points`, all in one rotational direction.
pub trait HullAlgorithm {
    fn hull_edges(&self, points: &[Point]) -> Vec<HullEdge>;
}

/// Andrew's monotone chain over the (lng, lat) plane. Edges run
/// counter-clockwise, collinear boundary points are dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct MonotoneChain;

fn cross(o: &Point, a: &Point, b: &Point) -> f64 {
    (a.lng - o.lng) * (b.lat - o.lat) - (a.lat - o.lat) * (b.lng - o.lng)
}

impl HullAlgorithm for MonotoneChain {
    fn hull_edges(&self, points: &[Point]) -> Vec<HullEdge> {
        let mut order: Vec<usize> = (0..points.len()).collect();
        order.sort_by(|&a, &b| {
            // -0.0 must sort with 0.0, as `Point::key` treats them as one location
            let (pa, pb) = (&points[a], &points[b]);
            match (pa.lng + 0.0).total_cmp(&(pb.lng + 0.0)) {
                Ordering::Equal => (pa.lat + 0.0).total_cmp(&(pb.lat + 0.0)),
                ordering => ordering,
            }
        });
        order.dedup_by_key(|i| points[*i].key());

        if order.len() < 2 {
            return vec![];
        }

        let mut lower: Vec<usize> = Vec::with_capacity(order.len());
        for &i in &order {
            // Pop while the last two points and this one make a right turn or go straight
            while lower.len() >= 2
                && cross(&points[lower[lower.len() - 2]], &points[lower[lower.len() - 1]], &points[i]) <= 0.0
            {
                lower.pop();
            }
            lower.push(i);
        }

        let mut upper: Vec<usize> = Vec::with_capacity(order.len());
        for &i in order.iter().rev() {
            while upper.len() >= 2
                && cross(&points[upper[upper.len() - 2]], &points[upper[upper.len() - 1]], &points[i]) <= 0.0
            {
                upper.pop();
            }
            upper.push(i);
        }

        // The last point of each chain is the first point of the other
        lower.pop();
        upper.pop();
        lower.extend(upper);

        let count = lower.len();
        lower
            .iter()
            .enumerate()
            .map(|(i, &vertex)| HullEdge {
                vertex,
                neighbor: lower[(i + 1) % count],
            })
            .collect()
    }
}

fn corrupt(reason: String) -> HullsError {
    HullsError::CorruptHullTopology { reason }
}

/// Walks the successor relation from the first edge's vertex and returns the
/// vertex cycle in traversal order, without the closing repeat.
///
/// The walk takes at most one step per known vertex. Any edge set that is not
/// exactly one simple cycle (a vertex with two successors, a dangling
/// successor, a vertex reached twice, or a cycle that misses vertices) is
/// reported as corrupt instead of being followed.
pub fn follow_successors(edges: &[HullEdge]) -> Result<Vec<usize>> {
    let mut successors: HashMap<usize, usize> = HashMap::with_capacity(edges.len());
    for edge in edges {
        if successors.insert(edge.vertex, edge.neighbor).is_some() {
            return Err(corrupt(format!(
                "vertex {} has more than one successor",
                edge.vertex
            )));
        }
    }

    let start = match edges.first() {
        Some(edge) => edge.vertex,
        None => return Err(corrupt("no hull edges".to_string())),
    };

    let vertex_count = successors.len();
    let mut cycle = Vec::with_capacity(vertex_count);
    let mut visited: HashSet<usize> = HashSet::with_capacity(vertex_count);
    let mut current = start;

    for _ in 0..vertex_count {
        cycle.push(current);
        visited.insert(current);

        let next = *successors
            .get(&current)
            .ok_or_else(|| corrupt(format!("vertex {} has no successor", current)))?;

        if next == start {
            if cycle.len() != vertex_count {
                return Err(corrupt(format!(
                    "cycle closes after {} of {} vertices",
                    cycle.len(),
                    vertex_count
                )));
            }
            return Ok(cycle);
        }
        if visited.contains(&next) {
            return Err(corrupt(format!(
                "vertex {} reached twice before returning to {}",
                next, start
            )));
        }
        current = next;
    }

    Err(corrupt(format!(
        "no return to vertex {} within {} steps",
        start, vertex_count
    )))
}

#[derive(Debug, Default, Clone)]
pub struct HullBuilder<A: HullAlgorithm = MonotoneChain> {
    algorithm: A,
}

impl<A: HullAlgorithm> HullBuilder<A> {
    pub fn new(algorithm: A) -> Self {
        HullBuilder { algorithm }
    }

    /// Computes the convex hull of `points` as a closed polygon.
    ///
    /// Fewer than 3 distinct locations, or locations that are all collinear,
    /// fail with `DegenerateInput`.
    pub fn build(&self, points: &[Point]) -> Result<Polygon> {
        let distinct = distinct_count(points);
        if distinct < 3 {
            return Err(HullsError::DegenerateInput {
                reason: format!("{} distinct points, at least 3 required", distinct),
            });
        }

        let edges = self.algorithm.hull_edges(points);
        if edges.len() < 3 {
            return Err(HullsError::DegenerateInput {
                reason: format!("{} distinct points are collinear", distinct),
            });
        }

        let vertices = follow_successors(&edges)?
            .into_iter()
            .map(|index| {
                points
                    .get(index)
                    .copied()
                    .ok_or_else(|| corrupt(format!("vertex {} is out of range", index)))
            })
            .collect::<Result<Vec<Point>>>()?;

        Ok(Polygon::close(vertices))
    }
}

pub fn build_hull(points: &[Point]) -> Result<Polygon> {
    HullBuilder::<MonotoneChain>::default().build(points)
}
