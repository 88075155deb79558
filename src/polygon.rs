// The quad the user reshapes. Always exactly four vertices, in boundary order.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::types::Point;

pub const VERTEX_COUNT: usize = 4;

/// Starting quad when nothing else is configured.
pub const DEFAULT_VERTICES: [Point; VERTEX_COUNT] = [
    Point::new(300, 300),
    Point::new(1500, 300),
    Point::new(1500, 900),
    Point::new(300, 900),
];

/// Ordered quad; consecutive vertices form edges and the last closes back to the first.
/// Degenerate shapes (coincident or crossing vertices) are allowed and kept as given.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Polygon {
    vertices: [Point; VERTEX_COUNT],
}

impl Polygon {
    pub fn new(vertices: [Point; VERTEX_COUNT]) -> Self {
        Self { vertices }
    }

    /// Build a quad from two hands' fingertips.
    ///
    /// Detections arrive as `[thumb_a, index_a, thumb_b, index_b]`; drawn in that
    /// order the outline would cross itself. Swapping the last two gives a
    /// boundary walk `thumb_a -> index_a -> index_b -> thumb_b`.
    pub fn from_fingertip_pairs(a: (Point, Point), b: (Point, Point)) -> Self {
        let mut vertices = [a.0, a.1, b.0, b.1];
        vertices.swap(2, 3);
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Point; VERTEX_COUNT] {
        &self.vertices
    }

    /// Vertex at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<Point> {
        self.vertices.get(index).copied()
    }

    /// Overwrite one vertex. Returns `false` (and changes nothing) for a bad index.
    pub fn set(&mut self, index: usize, p: Point) -> bool {
        match self.vertices.get_mut(index) {
            Some(v) => {
                *v = p;
                true
            }
            None => false,
        }
    }

    /// Axis-aligned bounds as `(min, max)`, both inclusive.
    pub fn bounds(&self) -> (Point, Point) {
        let mut min = self.vertices[0];
        let mut max = self.vertices[0];
        for v in &self.vertices[1..] {
            min.x = min.x.min(v.x);
            min.y = min.y.min(v.y);
            max.x = max.x.max(v.x);
            max.y = max.y.max(v.y);
        }
        (min, max)
    }
}

impl Default for Polygon {
    fn default() -> Self {
        Self::new(DEFAULT_VERTICES)
    }
}

/// Parses `"x,y;x,y;x,y;x,y"` (whitespace around numbers is ignored).
impl FromStr for Polygon {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(';').map(str::trim).filter(|p| !p.is_empty()).collect();
        if parts.len() != VERTEX_COUNT {
            return Err(Error::InvalidPolygon(format!(
                "expected {VERTEX_COUNT} vertices, got {}",
                parts.len()
            )));
        }

        let mut vertices = [Point::default(); VERTEX_COUNT];
        for (slot, part) in vertices.iter_mut().zip(&parts) {
            let (x, y) = part
                .split_once(',')
                .ok_or_else(|| Error::InvalidPolygon(format!("`{part}` is not `x,y`")))?;
            let parse = |t: &str| {
                t.trim()
                    .parse::<i32>()
                    .map_err(|e| Error::InvalidPolygon(format!("`{part}`: {e}")))
            };
            *slot = Point::new(parse(x)?, parse(y)?);
        }
        Ok(Self { vertices })
    }
}

impl fmt::Display for Polygon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.vertices.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{},{}", v.x, v.y)?;
        }
        Ok(())
    }
}
