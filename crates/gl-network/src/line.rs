//! Polyline geometry for a single road edge.


use gl_core::Coord;

/// A road polyline with precomputed cumulative segment lengths.
///
/// `cumulative[i]` is the distance from the first vertex to vertex `i`, so
/// locating the point at a given distance along the road is a binary search.
/// Always holds at least two vertices (enforced by the builder).
#[derive(Clone, Debug, PartialEq)]
pub struct RoadLine {
    coords:     Vec<Coord>,
    cumulative: Vec<f64>,
}

impl RoadLine {
    /// Build from at least two vertices.  Returns `None` for fewer.
    pub fn new(coords: Vec<Coord>) -> Option<Self> {
        if coords.len() < 2 {
            return None;
        }
        let mut cumulative = Vec::with_capacity(coords.len());
        let mut total = 0.0;
        cumulative.push(0.0);
        for w in coords.windows(2) {
            total += segment_length(w[0], w[1]);
            cumulative.push(total);
        }
        Some(Self { coords, cumulative })
    }

    /// Euclidean length in map units.
    #[inline]
    pub fn length(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    #[inline]
    pub fn coords(&self) -> &[Coord] {
        &self.coords
    }

    #[inline]
    pub fn first(&self) -> Coord {
        self.coords[0]
    }

    #[inline]
    pub fn last(&self) -> Coord {
        self.coords[self.coords.len() - 1]
    }

    /// The point `distance` map units from the first vertex, clamped to the
    /// line's ends.
    pub fn point_at(&self, distance: f64) -> Coord {
        let len = self.length();
        if distance.is_nan() || distance <= 0.0 {
            return self.first();
        }
        if distance >= len {
            return self.last();
        }
        // Index of the last vertex at or before `distance`.
        let i = self
            .cumulative
            .partition_point(|&c| c <= distance)
            .saturating_sub(1)
            .min(self.coords.len() - 2);
        let seg = self.cumulative[i + 1] - self.cumulative[i];
        let t = if seg > 0.0 { (distance - self.cumulative[i]) / seg } else { 0.0 };
        let (a, b) = (self.coords[i], self.coords[i + 1]);
        Coord {
            x: a.x + (b.x - a.x) * t,
            y: a.y + (b.y - a.y) * t,
        }
    }

    /// Point at `distance` measured from whichever end the traversal starts.
    #[inline]
    pub fn point_along(&self, distance: f64, forward: bool) -> Coord {
        if forward {
            self.point_at(distance)
        } else {
            self.point_at(self.length() - distance)
        }
    }
}

#[inline]
fn segment_length(a: Coord, b: Coord) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}
