pub mod bounds;
pub mod config;
pub mod convex_hull;
pub mod error;
pub mod kmeans;
pub mod location_utils;
pub mod output;
pub mod pipeline;
pub mod point;
pub mod point_store;
pub mod render;

pub use error::{HullsError, Result};
