use clap::Parser;
use dotenv::dotenv;
use log::{error, info};
use neighborhood_hulls::{
    config::Settings,
    pipeline::{run, RunOptions},
};
use std::path::PathBuf;
use std::process;
use std::time::Instant;

/// Convex hull polygons for clustered lat/lng points.
///
/// Input rows are `lat,lng,cluster_id`, or `lat,lng` when `--num-clusters` is
/// given. The first row is a header.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    filename: PathBuf,

    /// Render all hulls into an html map at this path
    #[arg(long)]
    html: Option<PathBuf>,

    /// Append rows to <prefix>.csv, labelled with the prefix, instead of printing them
    #[arg(long)]
    cluster_prefix: Option<String>,

    /// Compute this many k-means clusters from unclustered input
    #[arg(long)]
    num_clusters: Option<usize>,

    /// Html template containing a {{map_data}} placeholder
    #[arg(long)]
    template: Option<PathBuf>,

    /// Seed for k-means centroid selection
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    max_iterations: Option<usize>,

    /// Skip clusters whose points cannot form a polygon instead of failing
    #[arg(long)]
    skip_degenerate: bool,
}

fn main() {
    dotenv().ok();
    env_logger::init();
    let args = Args::parse();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };

    let mut kmeans = settings.kmeans;
    if let Some(seed) = args.seed {
        kmeans.seed = seed;
    }
    if let Some(max_iterations) = args.max_iterations {
        kmeans.max_iterations = max_iterations;
    }

    let options = RunOptions {
        input: args.filename,
        output_html: args.html,
        cluster_prefix: args.cluster_prefix,
        num_clusters: args.num_clusters,
        html_template: args.template.or(settings.html_template),
        kmeans,
        skip_degenerate: args.skip_degenerate || settings.skip_degenerate,
    };

    let now = Instant::now();
    match run(&options) {
        Ok(summary) => info!(
            "{} neighborhoods written in {:.2?}",
            summary.polygons.len(),
            now.elapsed()
        ),
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}
