use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use crate::bounds::compute_bounds;
use crate::convex_hull::build_hull;
use crate::error::Result;
use crate::kmeans::{Clusterer, KMeans, KMeansParams};
use crate::location_utils::perimeter_m;
use crate::output::RecordSink;
use crate::point::{ClusterId, PointSet, Polygon};
use crate::point_store::{load_path, InputMode, LoadedPoints};
use crate::render::{load_template, render_html, MapData};

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub input: PathBuf,
    /// Render every polygon into one HTML page at this path.
    pub output_html: Option<PathBuf>,
    /// Append records to `<prefix>.csv` instead of standard output.
    pub cluster_prefix: Option<String>,
    /// Treat the input as unclustered and partition it into this many groups.
    pub num_clusters: Option<usize>,
    pub html_template: Option<PathBuf>,
    pub kmeans: KMeansParams,
    /// Leave out clusters whose hull is degenerate instead of failing the run.
    pub skip_degenerate: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub polygons: BTreeMap<ClusterId, Polygon>,
    pub skipped: Vec<ClusterId>,
}

/// Loads the input and groups it, by the ids it carries or with `clusterer`.
pub fn load_clusters<C: Clusterer>(
    options: &RunOptions,
    clusterer: &C,
) -> Result<BTreeMap<ClusterId, PointSet>> {
    let mode = match options.num_clusters {
        Some(_) => InputMode::Unclustered,
        None => InputMode::Clustered,
    };

    match load_path(&options.input, mode)? {
        LoadedPoints::Clustered(clusters) => {
            info!("[LOAD] {} clusters read from {}", clusters.len(), options.input.display());
            Ok(clusters)
        }
        LoadedPoints::Unclustered(points) => {
            info!("[LOAD] {} points read from {}", points.len(), options.input.display());
            let k = options.num_clusters.unwrap_or(1);
            let now = Instant::now();
            let clusters = clusterer.partition(&points, k)?;
            info!(
                "[CLUSTER] {} clusters formed in {:.2?}",
                clusters.len(),
                now.elapsed()
            );
            Ok(clusters)
        }
    }
}

/// Builds one hull per cluster. Degenerate clusters abort unless
/// `skip_degenerate` is set, in which case they are reported in the summary.
pub fn build_hulls(
    clusters: &BTreeMap<ClusterId, PointSet>,
    skip_degenerate: bool,
) -> Result<RunSummary> {
    let mut polygons = BTreeMap::new();
    let mut skipped = vec![];

    for (id, points) in clusters {
        match build_hull(points) {
            Ok(polygon) => {
                debug!(
                    "[HULL] cluster {}: {} points, {} hull vertices, perimeter {:.0}m",
                    id,
                    points.len(),
                    polygon.vertices().len(),
                    perimeter_m(&polygon)
                );
                polygons.insert(id.clone(), polygon);
            }
            Err(e) if skip_degenerate && e.is_degenerate() => {
                warn!("[HULL] skipping cluster {}: {}", id, e);
                skipped.push(id.clone());
            }
            Err(e) => return Err(e.in_cluster(id)),
        }
    }

    info!("[HULL] {} hulls built, {} skipped", polygons.len(), skipped.len());
    Ok(RunSummary { polygons, skipped })
}

pub fn run(options: &RunOptions) -> Result<RunSummary> {
    run_with(options, &KMeans::new(options.kmeans.clone()))
}

/// Load, optionally cluster, build hulls, then write the HTML page and the
/// text records. Nothing is written unless every hull succeeded.
pub fn run_with<C: Clusterer>(options: &RunOptions, clusterer: &C) -> Result<RunSummary> {
    let clusters = load_clusters(options, clusterer)?;
    let summary = build_hulls(&clusters, options.skip_degenerate)?;

    // Render the page and open the record file before writing either
    let html = match &options.output_html {
        Some(html_path) => {
            let template = load_template(options.html_template.as_deref())?;
            let bounds = compute_bounds(&summary.polygons)?;
            debug!("[OUTPUT] map bounds {:?}", bounds);
            let page = render_html(&template, &MapData::new(&summary.polygons, bounds))?;
            Some((html_path, page))
        }
        None => None,
    };

    let mut sink = match &options.cluster_prefix {
        Some(prefix) => {
            info!(
                "[OUTPUT] appending records to {}",
                RecordSink::prefix_path(prefix).display()
            );
            RecordSink::append_to_prefix_file(prefix)?
        }
        None => RecordSink::stdout(),
    };

    if let Some((html_path, page)) = html {
        fs::write(html_path, page)?;
        info!("[OUTPUT] html written to {}", html_path.display());
    }

    for (id, polygon) in &summary.polygons {
        sink.write(id, polygon)?;
    }
    sink.finish()?;

    Ok(summary)
}
