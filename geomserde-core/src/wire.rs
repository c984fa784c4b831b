//! Wire-level constants and node headers.
//!
//! Every node starts with a two-byte header:
//!
//! ```text
//! [u8]   geometry type tag (0=Point ... 6=GeometryCollection)
//! [u8]   flags
//!          bit 0 (0x01): has Z
//!          bit 1 (0x02): empty, no payload follows
//!          bits 2-7:     reserved, must be zero
//! ...    payload (absent when the empty flag is set)
//! ```
//!
//! Counts are u32 and ordinates f64, both little-endian.

use crate::error::{GeomSerdeError, Result};
use crate::value::Dimension;

// ── Type tags ─────────────────────────────────────────────────────────────────
pub const TAG_POINT: u8 = 0;
pub const TAG_LINESTRING: u8 = 1;
pub const TAG_POLYGON: u8 = 2;
pub const TAG_MULTIPOINT: u8 = 3;
pub const TAG_MULTILINESTRING: u8 = 4;
pub const TAG_MULTIPOLYGON: u8 = 5;
pub const TAG_GEOMETRYCOLLECTION: u8 = 6;

// ── Flag bits ─────────────────────────────────────────────────────────────────
pub const FLAG_HAS_Z: u8 = 0x01;
pub const FLAG_EMPTY: u8 = 0x02;
const FLAG_RESERVED: u8 = !(FLAG_HAS_Z | FLAG_EMPTY);

/// Size of the tag + flags header.
pub const HEADER_LEN: usize = 2;
/// Size of a count field.
pub const COUNT_LEN: usize = 4;
/// Size of one ordinate.
pub const ORDINATE_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
}

impl GeometryKind {
    pub const fn tag(self) -> u8 {
        match self {
            GeometryKind::Point => TAG_POINT,
            GeometryKind::LineString => TAG_LINESTRING,
            GeometryKind::Polygon => TAG_POLYGON,
            GeometryKind::MultiPoint => TAG_MULTIPOINT,
            GeometryKind::MultiLineString => TAG_MULTILINESTRING,
            GeometryKind::MultiPolygon => TAG_MULTIPOLYGON,
            GeometryKind::GeometryCollection => TAG_GEOMETRYCOLLECTION,
        }
    }

    /// Human-readable kind name.
    ///
    /// # Example
    ///
    /// ```
    /// use geomserde_core::wire::GeometryKind;
    ///
    /// assert_eq!(GeometryKind::Polygon.name(), "Polygon");
    /// assert_eq!(GeometryKind::GeometryCollection.name(), "GeometryCollection");
    /// ```
    pub const fn name(self) -> &'static str {
        match self {
            GeometryKind::Point => "Point",
            GeometryKind::LineString => "LineString",
            GeometryKind::Polygon => "Polygon",
            GeometryKind::MultiPoint => "MultiPoint",
            GeometryKind::MultiLineString => "MultiLineString",
            GeometryKind::MultiPolygon => "MultiPolygon",
            GeometryKind::GeometryCollection => "GeometryCollection",
        }
    }

    /// The leaf kind a homogeneous collection holds, if this is one.
    pub const fn element_kind(self) -> Option<GeometryKind> {
        match self {
            GeometryKind::MultiPoint => Some(GeometryKind::Point),
            GeometryKind::MultiLineString => Some(GeometryKind::LineString),
            GeometryKind::MultiPolygon => Some(GeometryKind::Polygon),
            _ => None,
        }
    }
}

impl TryFrom<u8> for GeometryKind {
    type Error = GeomSerdeError;

    fn try_from(tag: u8) -> Result<Self> {
        match tag {
            TAG_POINT => Ok(GeometryKind::Point),
            TAG_LINESTRING => Ok(GeometryKind::LineString),
            TAG_POLYGON => Ok(GeometryKind::Polygon),
            TAG_MULTIPOINT => Ok(GeometryKind::MultiPoint),
            TAG_MULTILINESTRING => Ok(GeometryKind::MultiLineString),
            TAG_MULTIPOLYGON => Ok(GeometryKind::MultiPolygon),
            TAG_GEOMETRYCOLLECTION => Ok(GeometryKind::GeometryCollection),
            other => Err(GeomSerdeError::InvalidTag(other)),
        }
    }
}

/// Decoded tag and flags of one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeHeader {
    pub kind: GeometryKind,
    /// Authoritative for leaves, a hint for containers.
    pub has_z: bool,
    pub is_empty: bool,
}

impl NodeHeader {
    pub const fn new(kind: GeometryKind, dim: Dimension, is_empty: bool) -> Self {
        Self {
            kind,
            has_z: dim.has_z(),
            is_empty,
        }
    }

    pub const fn dimension(&self) -> Dimension {
        Dimension::from_has_z(self.has_z)
    }

    pub const fn flags(&self) -> u8 {
        let mut flags = 0;
        if self.has_z {
            flags |= FLAG_HAS_Z;
        }
        if self.is_empty {
            flags |= FLAG_EMPTY;
        }
        flags
    }

    /// Interpret a raw tag/flags pair.
    pub fn from_bytes(tag: u8, flags: u8) -> Result<Self> {
        let kind = GeometryKind::try_from(tag)?;
        if flags & FLAG_RESERVED != 0 {
            return Err(GeomSerdeError::InvalidFlags(flags));
        }
        Ok(Self {
            kind,
            has_z: flags & FLAG_HAS_Z != 0,
            is_empty: flags & FLAG_EMPTY != 0,
        })
    }
}

/// Peek at the header of the node at the start of `buf` without decoding it.
///
/// # Example
///
/// ```
/// use geomserde_core::value::{GeometryValue, Point};
/// use geomserde_core::wire::{parse_node_header, GeometryKind};
///
/// let buf = geomserde_core::encode(&GeometryValue::Point(Point::xyz(1.0, 2.0, 3.0))).unwrap();
/// let header = parse_node_header(&buf).unwrap();
/// assert_eq!(header.kind, GeometryKind::Point);
/// assert!(header.has_z);
/// assert!(!header.is_empty);
/// ```
pub fn parse_node_header(buf: &[u8]) -> Result<NodeHeader> {
    match buf {
        [tag, flags, ..] => NodeHeader::from_bytes(*tag, *flags),
        _ => Err(GeomSerdeError::Truncated {
            context: "node header",
            offset: 0,
            needed: HEADER_LEN,
            available: buf.len(),
        }),
    }
}

/// Kind of the node at the start of `buf`, or `None` if the header is invalid.
pub fn peek_kind(buf: &[u8]) -> Option<GeometryKind> {
    parse_node_header(buf).ok().map(|h| h.kind)
}
