use csv::{ReaderBuilder, StringRecord, Trim};
use log::debug;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{HullsError, Result};
use crate::point::{ClusterId, Point, PointSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Rows are `lat,lng,cluster_id`.
    Clustered,
    /// Rows are `lat,lng`; clusters are assigned later.
    Unclustered,
}

impl InputMode {
    fn field_count(&self) -> usize {
        match self {
            InputMode::Clustered => 3,
            InputMode::Unclustered => 2,
        }
    }
}

#[derive(Debug)]
pub enum LoadedPoints {
    Clustered(BTreeMap<ClusterId, PointSet>),
    Unclustered(PointSet),
}

pub fn load_path<P: AsRef<Path>>(path: P, mode: InputMode) -> Result<LoadedPoints> {
    load(File::open(path)?, mode)
}

pub fn load<R: Read>(source: R, mode: InputMode) -> Result<LoadedPoints> {
    Ok(match mode {
        InputMode::Clustered => LoadedPoints::Clustered(read_clustered(source)?),
        InputMode::Unclustered => LoadedPoints::Unclustered(read_unclustered(source)?),
    })
}

/// Reads `lat,lng,cluster_id` rows into one point set per cluster id.
pub fn read_clustered<R: Read>(source: R) -> Result<BTreeMap<ClusterId, PointSet>> {
    let mut clusters: BTreeMap<ClusterId, PointSet> = BTreeMap::new();
    read_rows(source, InputMode::Clustered, |record, row, point| {
        let id = ClusterId::parse(&record[2]).ok_or_else(|| HullsError::MalformedRow {
            row,
            reason: "empty cluster id".to_string(),
        })?;
        // Output records are comma separated, so a label may not carry one
        if record[2].contains(',') {
            return Err(HullsError::MalformedRow {
                row,
                reason: format!("cluster id {:?} contains a comma", &record[2]),
            });
        }
        clusters.entry(id).or_default().push(point);
        Ok(())
    })?;
    debug!("read {} clusters", clusters.len());
    Ok(clusters)
}

/// Reads `lat,lng` rows into a single flat point set.
pub fn read_unclustered<R: Read>(source: R) -> Result<PointSet> {
    let mut points: PointSet = vec![];
    read_rows(source, InputMode::Unclustered, |_, _, point| {
        points.push(point);
        Ok(())
    })?;
    debug!("read {} unclustered points", points.len());
    Ok(points)
}

/// Parses every row of a delimited source, skipping the header row.
fn read_rows<R, F>(source: R, mode: InputMode, mut on_row: F) -> Result<()>
where
    R: Read,
    F: FnMut(&StringRecord, usize, Point) -> Result<()>,
{
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(source);

    for record in reader.records() {
        let record = record?;
        let row = record.position().map(|p| p.line() as usize).unwrap_or(0);

        if record.len() != mode.field_count() {
            return Err(HullsError::MalformedRow {
                row,
                reason: format!(
                    "expected {} fields, found {}",
                    mode.field_count(),
                    record.len()
                ),
            });
        }

        let point = Point::new(
            parse_coordinate(&record, 0, "lat", row)?,
            parse_coordinate(&record, 1, "lng", row)?,
        );
        on_row(&record, row, point)?;
    }
    Ok(())
}

fn parse_coordinate(record: &StringRecord, index: usize, name: &str, row: usize) -> Result<f64> {
    let raw = &record[index];
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(HullsError::MalformedRow {
            row,
            reason: format!("{} is not a finite number: {:?}", name, raw),
        }),
    }
}
