use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use crate::error::{HullsError, Result};
use crate::point::{ClusterId, Point, Polygon};

/// One text record per cluster:
/// `[prefix,]neighborhood_<id>,lat1 lng1;lat2 lng2;...`
pub fn format_record(prefix: Option<&str>, id: &ClusterId, polygon: &Polygon) -> String {
    let formatted_points = polygon
        .points()
        .iter()
        .map(|p| format!("{} {}", p.lat, p.lng))
        .collect::<Vec<String>>()
        .join(";");

    match prefix {
        Some(prefix) => format!("{},neighborhood_{},{}", prefix, id, formatted_points),
        None => format!("neighborhood_{},{}", id, formatted_points),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRecord {
    pub prefix: Option<String>,
    pub id: ClusterId,
    pub points: Vec<Point>,
}

/// Reads back a line written by [`format_record`].
pub fn parse_record(line: &str) -> Result<ParsedRecord> {
    let malformed = |reason: &str| HullsError::MalformedRow {
        row: 1,
        reason: reason.to_string(),
    };

    let fields: Vec<&str> = line.trim_end().split(',').collect();
    let (prefix, name, points) = match fields.as_slice() {
        [name, points] => (None, *name, *points),
        [prefix, name, points] => (Some(prefix.to_string()), *name, *points),
        _ => return Err(malformed("expected 2 or 3 fields")),
    };

    let id = name
        .strip_prefix("neighborhood_")
        .and_then(ClusterId::parse)
        .ok_or_else(|| malformed("missing neighborhood_ label"))?;

    let points = points
        .split(';')
        .map(|pair| {
            let mut coords = pair.split(' ').map(str::parse::<f64>);
            match (coords.next(), coords.next(), coords.next()) {
                (Some(Ok(lat)), Some(Ok(lng)), None) => Ok(Point::new(lat, lng)),
                _ => Err(malformed("point is not a `lat lng` pair")),
            }
        })
        .collect::<Result<Vec<Point>>>()?;

    Ok(ParsedRecord { prefix, id, points })
}

/// Where formatted records go: standard output, or `<prefix>.csv` opened for appending.
pub struct RecordSink {
    prefix: Option<String>,
    writer: BufWriter<Box<dyn Write>>,
}

impl RecordSink {
    pub fn stdout() -> RecordSink {
        RecordSink {
            prefix: None,
            writer: BufWriter::new(Box::new(io::stdout())),
        }
    }

    /// The prefix becomes the first column of every record, so it may not
    /// contain a comma.
    pub fn append_to_prefix_file(prefix: &str) -> Result<RecordSink> {
        if prefix.contains(',') {
            return Err(HullsError::Config {
                name: "cluster-prefix".to_string(),
                value: prefix.to_string(),
            });
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(Self::prefix_path(prefix))?;
        Ok(RecordSink {
            prefix: Some(prefix.to_string()),
            writer: BufWriter::new(Box::new(file)),
        })
    }

    pub fn prefix_path(prefix: &str) -> PathBuf {
        PathBuf::from(format!("{}.csv", prefix))
    }

    pub fn write(&mut self, id: &ClusterId, polygon: &Polygon) -> Result<()> {
        let record = format_record(self.prefix.as_deref(), id, polygon);
        writeln!(self.writer, "{}", record)?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
