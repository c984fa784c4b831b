//! In-memory geometry values.
//!
//! Leaf geometries (`Point`, `LineString`, `Polygon`) carry their own
//! [`Dimension`] and keep it even when empty. Containers are plain ordered
//! vectors of their elements; each element keeps its own dimension.

use std::fmt;

use crate::error::{GeomSerdeError, Result};
use crate::wire::GeometryKind;

/// Number of ordinates stored per coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dimension {
    #[default]
    Xy,
    Xyz,
}

impl Dimension {
    pub const fn from_has_z(has_z: bool) -> Self {
        if has_z {
            Dimension::Xyz
        } else {
            Dimension::Xy
        }
    }

    pub const fn has_z(self) -> bool {
        matches!(self, Dimension::Xyz)
    }

    /// Ordinates per coordinate (2 or 3).
    pub const fn size(self) -> usize {
        match self {
            Dimension::Xy => 2,
            Dimension::Xyz => 3,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Dimension::Xy => "XY",
            Dimension::Xyz => "XYZ",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
}

impl Coord {
    pub const fn xy(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    pub const fn xyz(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z: Some(z) }
    }

    pub const fn dimension(&self) -> Dimension {
        Dimension::from_has_z(self.z.is_some())
    }
}

impl From<(f64, f64)> for Coord {
    fn from((x, y): (f64, f64)) -> Self {
        Coord::xy(x, y)
    }
}

impl From<(f64, f64, f64)> for Coord {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Coord::xyz(x, y, z)
    }
}

fn check_dimension(expected: Dimension, coords: &[Coord]) -> Result<()> {
    match coords.iter().find(|c| c.dimension() != expected) {
        Some(c) => Err(GeomSerdeError::DimensionMismatch {
            expected,
            found: c.dimension(),
        }),
        None => Ok(()),
    }
}

/// Minimum number of coordinates in a closed ring (a triangle plus closure).
pub const MIN_RING_COORDS: usize = 4;

/// Reject rings that are too short to close or whose endpoints differ.
pub fn validate_ring(ring: &[Coord]) -> Result<()> {
    if ring.len() < MIN_RING_COORDS {
        return Err(GeomSerdeError::MalformedRing(
            "ring has fewer than 4 coordinates",
        ));
    }
    if ring.first() != ring.last() {
        return Err(GeomSerdeError::MalformedRing("ring is not closed"));
    }
    Ok(())
}

// ── Leaves ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    dim: Dimension,
    coord: Option<Coord>,
}

impl Point {
    pub const fn new(coord: Coord) -> Self {
        Self {
            dim: coord.dimension(),
            coord: Some(coord),
        }
    }

    pub const fn xy(x: f64, y: f64) -> Self {
        Self::new(Coord::xy(x, y))
    }

    pub const fn xyz(x: f64, y: f64, z: f64) -> Self {
        Self::new(Coord::xyz(x, y, z))
    }

    /// `POINT EMPTY` (or `POINT Z EMPTY`).
    pub const fn empty(dim: Dimension) -> Self {
        Self { dim, coord: None }
    }

    pub const fn coord(&self) -> Option<Coord> {
        self.coord
    }

    pub const fn dimension(&self) -> Dimension {
        self.dim
    }

    pub const fn is_empty(&self) -> bool {
        self.coord.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineString {
    dim: Dimension,
    coords: Vec<Coord>,
}

impl LineString {
    /// Build a line string, taking the dimension from the first coordinate.
    ///
    /// An empty coordinate list yields an empty XY line string.
    ///
    /// # Example
    ///
    /// ```
    /// use geomserde_core::value::{Coord, Dimension, LineString};
    ///
    /// let line = LineString::new(vec![Coord::xy(10.0, 20.0), Coord::xy(30.0, 40.0)]).unwrap();
    /// assert_eq!(line.dimension(), Dimension::Xy);
    /// assert_eq!(line.len(), 2);
    ///
    /// let mixed = LineString::new(vec![Coord::xy(0.0, 0.0), Coord::xyz(1.0, 1.0, 1.0)]);
    /// assert!(mixed.is_err());
    /// ```
    pub fn new(coords: Vec<Coord>) -> Result<Self> {
        let dim = coords.first().map(Coord::dimension).unwrap_or_default();
        Self::with_dimension(dim, coords)
    }

    pub fn with_dimension(dim: Dimension, coords: Vec<Coord>) -> Result<Self> {
        check_dimension(dim, &coords)?;
        Ok(Self { dim, coords })
    }

    pub const fn empty(dim: Dimension) -> Self {
        Self {
            dim,
            coords: Vec::new(),
        }
    }

    pub(crate) fn from_parts(dim: Dimension, coords: Vec<Coord>) -> Self {
        Self { dim, coords }
    }

    pub fn coords(&self) -> &[Coord] {
        &self.coords
    }

    pub const fn dimension(&self) -> Dimension {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    dim: Dimension,
    rings: Vec<Vec<Coord>>,
}

impl Polygon {
    /// Build a polygon from its shell followed by its holes.
    ///
    /// The dimension is taken from the shell's first coordinate. No rings
    /// yields an empty XY polygon.
    ///
    /// # Example
    ///
    /// ```
    /// use geomserde_core::value::{Coord, Polygon};
    ///
    /// let shell = [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 0.0)]
    ///     .into_iter()
    ///     .map(Coord::from)
    ///     .collect();
    /// let polygon = Polygon::new(vec![shell]).unwrap();
    /// assert_eq!(polygon.interiors().len(), 0);
    ///
    /// let open = vec![Coord::xy(0.0, 0.0), Coord::xy(1.0, 0.0), Coord::xy(1.0, 1.0), Coord::xy(0.0, 1.0)];
    /// assert!(Polygon::new(vec![open]).is_err());
    /// ```
    pub fn new(rings: Vec<Vec<Coord>>) -> Result<Self> {
        let dim = rings
            .first()
            .and_then(|shell| shell.first())
            .map(Coord::dimension)
            .unwrap_or_default();
        Self::with_dimension(dim, rings)
    }

    pub fn with_dimension(dim: Dimension, rings: Vec<Vec<Coord>>) -> Result<Self> {
        for ring in &rings {
            validate_ring(ring)?;
            check_dimension(dim, ring)?;
        }
        Ok(Self { dim, rings })
    }

    pub const fn empty(dim: Dimension) -> Self {
        Self {
            dim,
            rings: Vec::new(),
        }
    }

    pub(crate) fn from_parts(dim: Dimension, rings: Vec<Vec<Coord>>) -> Self {
        Self { dim, rings }
    }

    pub fn exterior(&self) -> Option<&[Coord]> {
        self.rings.first().map(Vec::as_slice)
    }

    pub fn interiors(&self) -> &[Vec<Coord>] {
        self.rings.get(1..).unwrap_or_default()
    }

    /// Shell first, then holes.
    pub fn rings(&self) -> &[Vec<Coord>] {
        &self.rings
    }

    pub const fn dimension(&self) -> Dimension {
        self.dim
    }

    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    pub fn num_coords(&self) -> usize {
        self.rings.iter().map(Vec::len).sum()
    }
}

// ── Containers ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiPoint(pub Vec<Point>);

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiLineString(pub Vec<LineString>);

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiPolygon(pub Vec<Polygon>);

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryCollection(pub Vec<GeometryValue>);

macro_rules! container_impls {
    ($container:ident, $element:ty) => {
        impl $container {
            /// True iff the container has no elements.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            pub fn len(&self) -> usize {
                self.0.len()
            }

            /// `Xyz` if any element is three-dimensional.
            pub fn dimension(&self) -> Dimension {
                Dimension::from_has_z(self.0.iter().any(|e| e.dimension().has_z()))
            }
        }

        impl From<Vec<$element>> for $container {
            fn from(elements: Vec<$element>) -> Self {
                $container(elements)
            }
        }
    };
}

container_impls!(MultiPoint, Point);
container_impls!(MultiLineString, LineString);
container_impls!(MultiPolygon, Polygon);
container_impls!(GeometryCollection, GeometryValue);

/// Any of the seven supported geometry kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryValue {
    Point(Point),
    LineString(LineString),
    Polygon(Polygon),
    MultiPoint(MultiPoint),
    MultiLineString(MultiLineString),
    MultiPolygon(MultiPolygon),
    GeometryCollection(GeometryCollection),
}

impl GeometryValue {
    pub fn kind(&self) -> GeometryKind {
        match self {
            GeometryValue::Point(_) => GeometryKind::Point,
            GeometryValue::LineString(_) => GeometryKind::LineString,
            GeometryValue::Polygon(_) => GeometryKind::Polygon,
            GeometryValue::MultiPoint(_) => GeometryKind::MultiPoint,
            GeometryValue::MultiLineString(_) => GeometryKind::MultiLineString,
            GeometryValue::MultiPolygon(_) => GeometryKind::MultiPolygon,
            GeometryValue::GeometryCollection(_) => GeometryKind::GeometryCollection,
        }
    }

    /// Leaves are empty when they hold no coordinates; containers when they
    /// hold no elements.
    pub fn is_empty(&self) -> bool {
        match self {
            GeometryValue::Point(p) => p.is_empty(),
            GeometryValue::LineString(ls) => ls.is_empty(),
            GeometryValue::Polygon(p) => p.is_empty(),
            GeometryValue::MultiPoint(mp) => mp.is_empty(),
            GeometryValue::MultiLineString(mls) => mls.is_empty(),
            GeometryValue::MultiPolygon(mp) => mp.is_empty(),
            GeometryValue::GeometryCollection(gc) => gc.is_empty(),
        }
    }

    /// A leaf's own dimension, or for containers `Xyz` if any element is.
    pub fn dimension(&self) -> Dimension {
        match self {
            GeometryValue::Point(p) => p.dimension(),
            GeometryValue::LineString(ls) => ls.dimension(),
            GeometryValue::Polygon(p) => p.dimension(),
            GeometryValue::MultiPoint(mp) => mp.dimension(),
            GeometryValue::MultiLineString(mls) => mls.dimension(),
            GeometryValue::MultiPolygon(mp) => mp.dimension(),
            GeometryValue::GeometryCollection(gc) => gc.dimension(),
        }
    }

    pub fn num_coords(&self) -> usize {
        match self {
            GeometryValue::Point(p) => usize::from(!p.is_empty()),
            GeometryValue::LineString(ls) => ls.len(),
            GeometryValue::Polygon(p) => p.num_coords(),
            GeometryValue::MultiPoint(mp) => mp.0.iter().filter(|p| !p.is_empty()).count(),
            GeometryValue::MultiLineString(mls) => mls.0.iter().map(LineString::len).sum(),
            GeometryValue::MultiPolygon(mp) => mp.0.iter().map(Polygon::num_coords).sum(),
            GeometryValue::GeometryCollection(gc) => {
                gc.0.iter().map(GeometryValue::num_coords).sum()
            }
        }
    }
}

macro_rules! value_from {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for GeometryValue {
                fn from(inner: $variant) -> Self {
                    GeometryValue::$variant(inner)
                }
            }
        )*
    };
}

value_from!(
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
);
