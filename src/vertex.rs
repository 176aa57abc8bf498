use std::fmt;

/// A location in 3D space.
///
/// Equality is exact on all three components; the query machinery relies on
/// it to recognise a sample point reached along more than one traversal path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    pub fn new(x: f64, y: f64, z: f64) -> Point {
        Point { x, y, z }
    }

    /// Coordinate on the given axis (0 = x, 1 = y, 2 = z).
    pub fn axis(&self, axis: usize) -> f64 {
        match axis {
            0 => self.x,
            1 => self.y,
            2 => self.z,
            _ => unreachable!("axis index {}", axis),
        }
    }

    pub fn squared_distance(&self, other: &Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        dx * dx + dy * dy + dz * dz
    }

    pub fn distance(&self, other: &Point) -> f64 {
        self.squared_distance(other).sqrt()
    }

    pub(crate) fn has_nan(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}

impl From<[f64; 3]> for Point {
    fn from(coords: [f64; 3]) -> Point {
        Point::new(coords[0], coords[1], coords[2])
    }
}

/// A sampled location together with its measured payload, typically a
/// three-component field reading.
///
/// Two vertices are the same sample when they sit at the same location; the
/// payload never takes part in comparisons.
#[derive(Clone, Copy, Debug)]
pub struct FieldVertex<F> {
    pub point: Point,
    pub field: F,
}

impl<F> FieldVertex<F> {
    pub fn new(point: Point, field: F) -> FieldVertex<F> {
        FieldVertex { point, field }
    }
}

impl<F> PartialEq for FieldVertex<F> {
    fn eq(&self, other: &FieldVertex<F>) -> bool {
        self.point == other.point
    }
}
