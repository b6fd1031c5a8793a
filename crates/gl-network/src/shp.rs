//! ESRI shapefile readers — enabled with the `shapefile` Cargo feature.
//!
//! # Usage
//!
//! ```ignore
//! use gl_network::shp::{read_areas, read_roads};
//!
//! let roads = read_roads("data/roads.shp", &["ID_ID"])?;
//! let areas = read_areas("data/areas.shp")?;
//! ```
//!
//! Only the attribute columns named by the caller are copied into each
//! [`RoadFeature`]; a feature whose `.dbf` row lacks one of them simply has
//! no entry, and the network builder reports the missing attribute.

use std::collections::HashMap;
use std::path::Path;

use geo_types::{LineString, Polygon};
use shapefile::dbase::{FieldValue, Record};
use shapefile::{PolygonRing, Shape};

use gl_core::Coord;

use crate::layer::{AreaLayer, AttributeValue, RoadFeature, RoadLayer};
use crate::NetworkError;

// ── Roads ─────────────────────────────────────────────────────────────────────

/// Read a polyline shapefile into a [`RoadLayer`], copying the attribute
/// columns listed in `fields`.
///
/// # Errors
///
/// [`NetworkError::Shapefile`] if the file cannot be opened or parsed;
/// [`NetworkError::UnsupportedGeometry`] for non-polyline shapes.
pub fn read_roads<P: AsRef<Path>>(path: P, fields: &[&str]) -> Result<RoadLayer, NetworkError> {
    let path = path.as_ref();
    log::info!("reading roads layer from {}...", path.display());
    let rows = shapefile::read(path).map_err(|e| shp_error(path, e))?;

    let mut features = Vec::with_capacity(rows.len());
    for (idx, (shape, record)) in rows.into_iter().enumerate() {
        let parts: Vec<Vec<Coord>> = match shape {
            Shape::Polyline(p) => p
                .parts()
                .iter()
                .map(|part| part.iter().map(|pt| Coord { x: pt.x, y: pt.y }).collect())
                .collect(),
            Shape::PolylineM(p) => p
                .parts()
                .iter()
                .map(|part| part.iter().map(|pt| Coord { x: pt.x, y: pt.y }).collect())
                .collect(),
            Shape::PolylineZ(p) => p
                .parts()
                .iter()
                .map(|part| part.iter().map(|pt| Coord { x: pt.x, y: pt.y }).collect())
                .collect(),
            other => {
                return Err(NetworkError::UnsupportedGeometry {
                    feature: idx,
                    reason:  format!("expected polyline, found {}", other.shapetype()),
                })
            }
        };
        features.push(RoadFeature { parts, attributes: copy_fields(&record, fields) });
    }

    log::info!("read {} road features", features.len());
    Ok(RoadLayer::new(features))
}

// ── Areas ─────────────────────────────────────────────────────────────────────

/// Read a polygon shapefile into an [`AreaLayer`].
///
/// Each outer ring starts a new polygon; inner rings become holes of the
/// most recent outer ring.  Non-polygon shapes are skipped with a warning.
pub fn read_areas<P: AsRef<Path>>(path: P) -> Result<AreaLayer, NetworkError> {
    let path = path.as_ref();
    log::info!("reading tracts layer from {}...", path.display());
    let rows = shapefile::read(path).map_err(|e| shp_error(path, e))?;

    let mut polygons = Vec::new();
    for (idx, (shape, _record)) in rows.into_iter().enumerate() {
        let rings: Vec<(bool, Vec<Coord>)> = match shape {
            Shape::Polygon(p) => p.rings().iter().map(|r| ring_coords(r, |pt| (pt.x, pt.y))).collect(),
            Shape::PolygonM(p) => p.rings().iter().map(|r| ring_coords(r, |pt| (pt.x, pt.y))).collect(),
            Shape::PolygonZ(p) => p.rings().iter().map(|r| ring_coords(r, |pt| (pt.x, pt.y))).collect(),
            other => {
                log::warn!("tract feature {idx}: skipping non-polygon shape {}", other.shapetype());
                continue;
            }
        };
        assemble_polygons(rings, &mut polygons);
    }

    log::info!("read {} tract polygons", polygons.len());
    Ok(AreaLayer::new(polygons))
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn ring_coords<P>(ring: &PolygonRing<P>, xy: impl Fn(&P) -> (f64, f64)) -> (bool, Vec<Coord>) {
    let outer = matches!(ring, PolygonRing::Outer(_));
    let coords = ring
        .points()
        .iter()
        .map(|p| {
            let (x, y) = xy(p);
            Coord { x, y }
        })
        .collect();
    (outer, coords)
}

pub(crate) fn assemble_polygons(rings: Vec<(bool, Vec<Coord>)>, out: &mut Vec<Polygon<f64>>) {
    let mut current: Option<(LineString<f64>, Vec<LineString<f64>>)> = None;
    for (outer, coords) in rings {
        if outer {
            if let Some((ext, holes)) = current.take() {
                out.push(Polygon::new(ext, holes));
            }
            current = Some((LineString::new(coords), Vec::new()));
        } else if let Some((_, holes)) = current.as_mut() {
            holes.push(LineString::new(coords));
        }
    }
    if let Some((ext, holes)) = current {
        out.push(Polygon::new(ext, holes));
    }
}

fn copy_fields(record: &Record, fields: &[&str]) -> HashMap<String, AttributeValue> {
    fields
        .iter()
        .filter_map(|&name| record.get(name).map(|v| (name.to_string(), convert(v))))
        .collect()
}

pub(crate) fn convert(value: &FieldValue) -> AttributeValue {
    match value {
        FieldValue::Integer(v)         => AttributeValue::Integer(*v as i64),
        FieldValue::Numeric(Some(v))   => AttributeValue::Float(*v),
        FieldValue::Float(Some(v))     => AttributeValue::Float(*v as f64),
        FieldValue::Double(v)          => AttributeValue::Float(*v),
        FieldValue::Character(Some(s)) => AttributeValue::Text(s.clone()),
        _                              => AttributeValue::Null,
    }
}

fn shp_error(path: &Path, e: shapefile::Error) -> NetworkError {
    NetworkError::Shapefile { path: path.display().to_string(), message: e.to_string() }
}
