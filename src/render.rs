use chrono::Utc;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::bounds::BoundingBox;
use crate::error::{HullsError, Result};
use crate::location_utils::{perimeter_m, polygon_center};
use crate::point::{ClusterId, Point, Polygon};

pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/map.html");
pub const MAP_DATA_PLACEHOLDER: &str = "{{map_data}}";

#[derive(Debug, Serialize)]
pub struct MapData<'a> {
    pub generated_at: String,
    pub bounds: BoundingBox,
    pub neighborhoods: Vec<Neighborhood<'a>>,
}

#[derive(Debug, Serialize)]
pub struct Neighborhood<'a> {
    pub id: String,
    pub polygon: &'a [Point],
    pub center: Point,
    pub perimeter_m: f64,
}

impl<'a> MapData<'a> {
    pub fn new(polygons: &'a BTreeMap<ClusterId, Polygon>, bounds: BoundingBox) -> MapData<'a> {
        MapData {
            generated_at: Utc::now().to_rfc3339(),
            bounds,
            neighborhoods: polygons
                .iter()
                .map(|(id, polygon)| Neighborhood {
                    id: id.to_string(),
                    polygon: polygon.points(),
                    center: polygon_center(polygon),
                    perimeter_m: perimeter_m(polygon),
                })
                .collect(),
        }
    }
}

/// Reads a user template, or falls back to the bundled Leaflet page.
pub fn load_template(path: Option<&Path>) -> Result<String> {
    let template = match path {
        Some(path) => fs::read_to_string(path)?,
        None => DEFAULT_TEMPLATE.to_string(),
    };
    if !template.contains(MAP_DATA_PLACEHOLDER) {
        return Err(HullsError::Template(format!(
            "template has no {} placeholder",
            MAP_DATA_PLACEHOLDER
        )));
    }
    Ok(template)
}

pub fn render_html(template: &str, data: &MapData) -> Result<String> {
    // Keep a `</script>` inside a label from ending the script block
    let json = serde_json::to_string(data)?.replace("</", "<\\/");
    Ok(template.replace(MAP_DATA_PLACEHOLDER, &json))
}
