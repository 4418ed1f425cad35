use thiserror::Error;

use crate::point::ClusterId;

#[derive(Error, Debug)]
pub enum HullsError {
    #[error("Malformed row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },

    #[error("Invalid cluster count k={k} for {distinct_points} distinct points")]
    ClusterParameter { k: usize, distinct_points: usize },

    #[error("Degenerate input: {reason}")]
    DegenerateInput { reason: String },

    #[error("Corrupt hull topology: {reason}")]
    CorruptHullTopology { reason: String },

    #[error("No points to compute bounds from")]
    EmptyInput,

    #[error("Cluster {cluster}: {source}")]
    InCluster {
        cluster: ClusterId,
        source: Box<HullsError>,
    },

    #[error("Invalid setting {name}: {value:?}")]
    Config { name: String, value: String },

    #[error("Template error: {0}")]
    Template(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
}

impl HullsError {
    /// Attaches the cluster being processed when the error surfaced.
    pub fn in_cluster(self, cluster: &ClusterId) -> HullsError {
        HullsError::InCluster {
            cluster: cluster.clone(),
            source: Box::new(self),
        }
    }

    pub fn is_degenerate(&self) -> bool {
        match self {
            HullsError::DegenerateInput { .. } => true,
            HullsError::InCluster { source, .. } => source.is_degenerate(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, HullsError>;
