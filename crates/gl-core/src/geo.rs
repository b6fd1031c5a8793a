//! Planar coordinate type and bounding extent.
//!
//! Road and tract layers come in projected map units, so all geometry is
//! plain Euclidean `f64`, with no geodesic maths.

/// A planar coordinate in the dataset's projected map units.
pub type Coord = geo_types::Coord<f64>;

/// Axis-aligned bounding rectangle (a layer's "minimum bounding rectangle").
///
/// An `Extent` built from no coordinates is *empty*: `min > max`, and
/// expanding it by any other extent yields that other extent.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Extent {
    pub min: Coord,
    pub max: Coord,
}

impl Extent {
    /// The empty extent.
    pub const EMPTY: Extent = Extent {
        min: Coord { x: f64::INFINITY, y: f64::INFINITY },
        max: Coord { x: f64::NEG_INFINITY, y: f64::NEG_INFINITY },
    };

    /// Smallest extent containing every coordinate in `coords`.
    pub fn from_coords<I: IntoIterator<Item = Coord>>(coords: I) -> Self {
        let mut e = Self::EMPTY;
        for c in coords {
            e.include(c);
        }
        e
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Grow to cover `c`.
    #[inline]
    pub fn include(&mut self, c: Coord) {
        self.min.x = self.min.x.min(c.x);
        self.min.y = self.min.y.min(c.y);
        self.max.x = self.max.x.max(c.x);
        self.max.y = self.max.y.max(c.y);
    }

    /// Grow to cover `other`.  Including an empty extent is a no-op.
    pub fn expand_to_include(&mut self, other: &Extent) {
        if other.is_empty() {
            return;
        }
        self.include(other.min);
        self.include(other.max);
    }

    pub fn contains(&self, c: Coord) -> bool {
        c.x >= self.min.x && c.x <= self.max.x && c.y >= self.min.y && c.y <= self.max.y
    }

    pub fn width(&self) -> f64 {
        if self.is_empty() { 0.0 } else { self.max.x - self.min.x }
    }

    pub fn height(&self) -> f64 {
        if self.is_empty() { 0.0 } else { self.max.y - self.min.y }
    }

    /// Convert to a `geo_types::Rect`, or `None` if empty.
    pub fn to_rect(&self) -> Option<geo_types::Rect<f64>> {
        (!self.is_empty()).then(|| geo_types::Rect::new(self.min, self.max))
    }
}

impl Default for Extent {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl std::fmt::Display for Extent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return f.write_str("[empty]");
        }
        write!(
            f,
            "[({:.3}, {:.3}) .. ({:.3}, {:.3})]",
            self.min.x, self.min.y, self.max.x, self.max.y
        )
    }
}
