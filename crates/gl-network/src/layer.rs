//! In-memory geometry layers handed to the network builder.
//!
//! These are the loader-agnostic shapes of the inputs: a field of attributed
//! line features for the roads, and a field of polygons for the areal
//! background.  The shapefile reader in [`crate::shp`] produces them, and
//! tests build them by hand.

use std::collections::HashMap;

use geo_types::Polygon;

use gl_core::{Coord, Extent};

/// A single attribute value attached to a feature.
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeValue {
    Integer(i64),
    Float(f64),
    Text(String),
    Null,
}

impl AttributeValue {
    /// Interpret the value as an integer identifier.
    ///
    /// Floats are accepted only when they hold an exact integer (dBase stores
    /// most numeric columns as `N` fields, which arrive as `f64`).  Text is
    /// accepted when it parses as an `i64` after trimming.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttributeValue::Integer(v) => Some(*v),
            AttributeValue::Float(v) if v.fract() == 0.0 && v.is_finite() => Some(*v as i64),
            AttributeValue::Float(_) => None,
            AttributeValue::Text(s) => s.trim().parse().ok(),
            AttributeValue::Null => None,
        }
    }
}

impl std::fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttributeValue::Integer(v) => write!(f, "{v}"),
            AttributeValue::Float(v)   => write!(f, "{v}"),
            AttributeValue::Text(s)    => f.write_str(s),
            AttributeValue::Null       => f.write_str("null"),
        }
    }
}

/// One road feature: one or more polyline parts plus its attribute table row.
#[derive(Clone, Debug, Default)]
pub struct RoadFeature {
    pub parts:      Vec<Vec<Coord>>,
    pub attributes: HashMap<String, AttributeValue>,
}

impl RoadFeature {
    /// Single-part feature with one integer attribute, the common case in
    /// tests and synthetic networks.
    pub fn with_id(field: &str, id: i64, coords: Vec<Coord>) -> Self {
        let mut attributes = HashMap::new();
        attributes.insert(field.to_string(), AttributeValue::Integer(id));
        Self { parts: vec![coords], attributes }
    }

    pub fn attribute(&self, field: &str) -> Option<&AttributeValue> {
        self.attributes.get(field)
    }
}

/// A field of road line features.
#[derive(Clone, Debug, Default)]
pub struct RoadLayer {
    pub features: Vec<RoadFeature>,
}

impl RoadLayer {
    pub fn new(features: Vec<RoadFeature>) -> Self {
        Self { features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Bounding extent of every coordinate of every feature.
    pub fn extent(&self) -> Extent {
        Extent::from_coords(
            self.features
                .iter()
                .flat_map(|f| f.parts.iter())
                .flat_map(|p| p.iter().copied()),
        )
    }
}

/// A field of areal features (census tracts).  Only used for the shared
/// extent and as a display background.
#[derive(Clone, Debug, Default)]
pub struct AreaLayer {
    pub polygons: Vec<Polygon<f64>>,
}

impl AreaLayer {
    pub fn new(polygons: Vec<Polygon<f64>>) -> Self {
        Self { polygons }
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Bounding extent of every exterior ring.
    pub fn extent(&self) -> Extent {
        Extent::from_coords(
            self.polygons
                .iter()
                .flat_map(|p| p.exterior().coords().copied()),
        )
    }
}
