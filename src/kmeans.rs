use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

use crate::error::{HullsError, Result};
use crate::point::{distinct_count, ClusterId, Point, PointSet};

/// Splits a flat point set into `k` groups.
///
/// Every input point ends up in exactly one output group.
pub trait Clusterer {
    fn partition(&self, points: &[Point], k: usize) -> Result<BTreeMap<ClusterId, PointSet>>;
}

#[derive(Debug, Clone)]
pub struct KMeansParams {
    pub max_iterations: usize, // Upper bound on assign/update rounds
    pub seed: u64,             // Seed for picking the first centroid
}

impl Default for KMeansParams {
    fn default() -> Self {
        KMeansParams {
            max_iterations: 100,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone)]
pub struct KMeansCluster {
    pub cluster_id: usize,
    pub centroid: Point,
    pub points: PointSet,
}

#[derive(Debug, Clone, Default)]
pub struct KMeans {
    pub params: KMeansParams,
}

impl KMeans {
    pub fn new(params: KMeansParams) -> KMeans {
        KMeans { params }
    }
}

impl Clusterer for KMeans {
    fn partition(&self, points: &[Point], k: usize) -> Result<BTreeMap<ClusterId, PointSet>> {
        Ok(kmeans(points, k, &self.params)?
            .into_iter()
            .map(|cluster| (ClusterId::from(cluster.cluster_id), cluster.points))
            .collect())
    }
}

fn squared_distance(a: &Point, b: &Point) -> f64 {
    let d_lat = a.lat - b.lat;
    let d_lng = a.lng - b.lng;
    d_lat * d_lat + d_lng * d_lng
}

fn nearest(point: &Point, centroids: &[Point]) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (idx, centroid) in centroids.iter().enumerate() {
        let distance = squared_distance(point, centroid);
        if distance < best_distance {
            best = idx;
            best_distance = distance;
        }
    }
    best
}

fn mean(points: &[&Point]) -> Point {
    let count = points.len() as f64;
    let sum = points
        .iter()
        .fold((0.0, 0.0), |acc, p| (acc.0 + p.lat, acc.1 + p.lng));
    Point::new(sum.0 / count, sum.1 / count)
}

/// Farthest-first seeding: a random first centroid, then repeatedly the point
/// farthest from every centroid chosen so far.
fn initial_centroids(points: &[Point], k: usize, rng: &mut StdRng) -> Vec<Point> {
    let mut centroids = vec![points[rng.random_range(0..points.len())]];
    let mut closest: Vec<f64> = points
        .iter()
        .map(|p| squared_distance(p, &centroids[0]))
        .collect();

    while centroids.len() < k {
        let (far_idx, _) = closest
            .iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (idx, &d)| {
                if d > best.1 {
                    (idx, d)
                } else {
                    best
                }
            });
        let next = points[far_idx];
        for (idx, p) in points.iter().enumerate() {
            closest[idx] = closest[idx].min(squared_distance(p, &next));
        }
        centroids.push(next);
    }
    centroids
}

/// Lloyd's k-means on raw (lat, lng) coordinates.
///
/// Fails with `ClusterParameter` when `k` is zero or larger than the number of
/// distinct locations.
pub fn kmeans(points: &[Point], k: usize, params: &KMeansParams) -> Result<Vec<KMeansCluster>> {
    let distinct_points = distinct_count(points);
    if k == 0 || k > distinct_points {
        return Err(HullsError::ClusterParameter { k, distinct_points });
    }

    let n = points.len();
    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut centroids = initial_centroids(points, k, &mut rng);
    let mut assignments = vec![usize::MAX; n];
    let mut iterations = 0;

    for _ in 0..params.max_iterations.max(1) {
        iterations += 1;

        // Assign each point to its nearest centroid
        let mut changed = false;
        for (idx, point) in points.iter().enumerate() {
            let best = nearest(point, &centroids);
            if assignments[idx] != best {
                changed = true;
                assignments[idx] = best;
            }
        }

        if !changed {
            break;
        }

        // Recompute centroids
        let mut sizes = vec![0usize; k];
        for c in 0..k {
            let members: Vec<&Point> = points
                .iter()
                .zip(assignments.iter())
                .filter(|&(_, a)| *a == c)
                .map(|(p, _)| p)
                .collect();
            sizes[c] = members.len();
            if !members.is_empty() {
                centroids[c] = mean(&members);
            }
        }

        // Reseed empty clusters with the point farthest from its own centroid
        for c in 0..k {
            if sizes[c] > 0 {
                continue;
            }
            let donor = (0..n)
                .filter(|&idx| sizes[assignments[idx]] > 1)
                .map(|idx| (idx, squared_distance(&points[idx], &centroids[assignments[idx]])))
                .fold(None, |best: Option<(usize, f64)>, candidate| match best {
                    Some(b) if b.1 >= candidate.1 => Some(b),
                    _ => Some(candidate),
                });
            if let Some((idx, _)) = donor {
                debug!("reseeding empty cluster {} with point {}", c, idx);
                sizes[assignments[idx]] -= 1;
                sizes[c] = 1;
                assignments[idx] = c;
                centroids[c] = points[idx];
            }
        }
    }
    debug!("k-means finished after {} iterations", iterations);

    let mut clusters: Vec<KMeansCluster> = centroids
        .iter()
        .map(|&centroid| KMeansCluster {
            cluster_id: 0,
            centroid,
            points: vec![],
        })
        .collect();
    for (point, &cluster_idx) in points.iter().zip(assignments.iter()) {
        clusters[cluster_idx].points.push(*point);
    }
    // A reseed in the last round leaves the donor's centroid behind its members
    for cluster in clusters.iter_mut().filter(|c| !c.points.is_empty()) {
        let members: Vec<&Point> = cluster.points.iter().collect();
        cluster.centroid = mean(&members);
    }

    let before = clusters.len();
    clusters.retain(|cluster| !cluster.points.is_empty());
    if clusters.len() < before {
        warn!(
            "k-means dropped {} empty clusters",
            before - clusters.len()
        );
    }
    for (idx, cluster) in clusters.iter_mut().enumerate() {
        cluster.cluster_id = idx;
    }

    Ok(clusters)
}
