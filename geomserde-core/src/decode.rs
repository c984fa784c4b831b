//! Bytes → geometry value.

use crate::cursor::{coords_len, normalize, ByteReader, ByteView};
use crate::error::{GeomSerdeError, Result};
use crate::value::{
    validate_ring, Coord, Dimension, GeometryCollection, GeometryValue, LineString, MultiLineString,
    MultiPoint, MultiPolygon, Point, Polygon, MIN_RING_COORDS,
};
use crate::wire::{GeometryKind, NodeHeader, COUNT_LEN, HEADER_LEN};

/// Default ceiling on container nesting.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Options for decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Deepest container nesting accepted before failing with
    /// `RecursionTooDeep`. The top-level node is depth 0, its elements depth 1.
    pub max_depth: usize,
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Decode the node at the start of `buf`.
///
/// Returns the value and the number of bytes the node occupied; anything
/// after it is left untouched.
///
/// # Example
///
/// ```
/// use geomserde_core::value::{GeometryValue, Point};
///
/// let value = GeometryValue::Point(Point::xy(10.0, 20.0));
/// let mut buf = geomserde_core::encode(&value).unwrap();
/// let len = buf.len();
/// buf.extend_from_slice(b"trailing");
///
/// let (decoded, consumed) = geomserde_core::decode(&buf).unwrap();
/// assert_eq!(decoded, value);
/// assert_eq!(consumed, len);
/// ```
pub fn decode(buf: &[u8]) -> Result<(GeometryValue, usize)> {
    decode_with(buf, &DecodeOptions::default())
}

pub fn decode_with(buf: &[u8], options: &DecodeOptions) -> Result<(GeometryValue, usize)> {
    let mut reader = ByteReader::new(buf);
    let value = Decoder { options }.read_node(&mut reader, 0)?;
    Ok((value, reader.position()))
}

/// Decode from any byte view, normalizing strided input to contiguous bytes first.
///
/// Contiguous views are read in place and strided ones are copied once.
/// Either way the decoded value owns its coordinates and never borrows
/// from the input.
///
/// # Example
///
/// ```
/// use geomserde_core::cursor::StridedBytes;
/// use geomserde_core::value::{GeometryValue, Point};
///
/// let buf = geomserde_core::encode(&GeometryValue::Point(Point::xy(1.0, 2.0))).unwrap();
/// // interleave with unrelated bytes, then view every other byte
/// let interleaved: Vec<u8> = buf.iter().flat_map(|b| [*b, 0xEE]).collect();
/// let view = StridedBytes::every_nth(&interleaved, 0, 2).unwrap();
///
/// let (decoded, consumed) = geomserde_core::decode_view(&view).unwrap();
/// assert_eq!(decoded, GeometryValue::Point(Point::xy(1.0, 2.0)));
/// assert_eq!(consumed, buf.len());
/// ```
pub fn decode_view<V: ByteView + ?Sized>(view: &V) -> Result<(GeometryValue, usize)> {
    decode(&normalize(view))
}

struct Decoder<'o> {
    options: &'o DecodeOptions,
}

impl Decoder<'_> {
    fn read_header(&self, reader: &mut ByteReader<'_>) -> Result<NodeHeader> {
        let tag = reader.read_u8("geometry type tag")?;
        let flags = reader.read_u8("geometry flags")?;
        NodeHeader::from_bytes(tag, flags)
    }

    fn read_node(&self, reader: &mut ByteReader<'_>, depth: usize) -> Result<GeometryValue> {
        let header = self.read_header(reader)?;
        self.read_body(reader, header, depth)
    }

    fn read_body(
        &self,
        reader: &mut ByteReader<'_>,
        header: NodeHeader,
        depth: usize,
    ) -> Result<GeometryValue> {
        let value: GeometryValue = match header.kind {
            GeometryKind::Point => read_point(reader, header)?.into(),
            GeometryKind::LineString => read_linestring(reader, header)?.into(),
            GeometryKind::Polygon => read_polygon(reader, header)?.into(),
            GeometryKind::MultiPoint => {
                let points = self.read_elements(reader, header, depth, |reader, child| {
                    read_point(reader, child)
                })?;
                MultiPoint(points).into()
            }
            GeometryKind::MultiLineString => {
                let lines = self.read_elements(reader, header, depth, |reader, child| {
                    read_linestring(reader, child)
                })?;
                MultiLineString(lines).into()
            }
            GeometryKind::MultiPolygon => {
                let polygons = self.read_elements(reader, header, depth, |reader, child| {
                    read_polygon(reader, child)
                })?;
                MultiPolygon(polygons).into()
            }
            GeometryKind::GeometryCollection => {
                let children = self.read_elements(reader, header, depth, |reader, child| {
                    self.read_body(reader, child, depth + 1)
                })?;
                GeometryCollection(children).into()
            }
        };
        Ok(value)
    }

    /// Read the element count and each element node of a container.
    ///
    /// Homogeneous containers only accept their own leaf kind.
    fn read_elements<T>(
        &self,
        reader: &mut ByteReader<'_>,
        header: NodeHeader,
        depth: usize,
        mut read_element: impl FnMut(&mut ByteReader<'_>, NodeHeader) -> Result<T>,
    ) -> Result<Vec<T>> {
        if header.is_empty {
            return Ok(Vec::new());
        }
        if depth >= self.options.max_depth {
            return Err(GeomSerdeError::RecursionTooDeep {
                limit: self.options.max_depth,
            });
        }

        let count = reader.read_count(HEADER_LEN, "collection elements")?;
        if count == 0 {
            return Err(GeomSerdeError::InconsistentEmptiness {
                kind: header.kind.name(),
            });
        }

        let expected = header.kind.element_kind();
        let mut elements = Vec::with_capacity(count);
        for _ in 0..count {
            let child = self.read_header(reader)?;
            if let Some(expected) = expected {
                if child.kind != expected {
                    return Err(GeomSerdeError::UnexpectedChild {
                        parent: header.kind.name(),
                        child: child.kind.name(),
                    });
                }
            }
            elements.push(read_element(reader, child)?);
        }
        Ok(elements)
    }
}

#[inline]
fn read_coord(reader: &mut ByteReader<'_>, dim: Dimension) -> Result<Coord> {
    let x = reader.read_f64("x ordinate")?;
    let y = reader.read_f64("y ordinate")?;
    Ok(match dim {
        Dimension::Xy => Coord::xy(x, y),
        Dimension::Xyz => Coord::xyz(x, y, reader.read_f64("z ordinate")?),
    })
}

/// Read a u32 point count and that many coordinates.
fn read_coords(
    reader: &mut ByteReader<'_>,
    dim: Dimension,
    context: &'static str,
) -> Result<Vec<Coord>> {
    let count = reader.read_count(coords_len(1, dim.size()), context)?;
    let mut coords = Vec::with_capacity(count);
    for _ in 0..count {
        coords.push(read_coord(reader, dim)?);
    }
    Ok(coords)
}

fn read_point(reader: &mut ByteReader<'_>, header: NodeHeader) -> Result<Point> {
    let dim = header.dimension();
    if header.is_empty {
        return Ok(Point::empty(dim));
    }
    read_coord(reader, dim).map(Point::new)
}

fn read_linestring(reader: &mut ByteReader<'_>, header: NodeHeader) -> Result<LineString> {
    let dim = header.dimension();
    if header.is_empty {
        return Ok(LineString::empty(dim));
    }
    let coords = read_coords(reader, dim, "linestring points")?;
    if coords.is_empty() {
        return Err(GeomSerdeError::InconsistentEmptiness {
            kind: GeometryKind::LineString.name(),
        });
    }
    Ok(LineString::from_parts(dim, coords))
}

fn read_polygon(reader: &mut ByteReader<'_>, header: NodeHeader) -> Result<Polygon> {
    let dim = header.dimension();
    if header.is_empty {
        return Ok(Polygon::empty(dim));
    }
    // every ring is at least a count plus a triangle and its closing point
    let min_ring_len = COUNT_LEN + coords_len(MIN_RING_COORDS, dim.size());
    let num_rings = reader.read_count(min_ring_len, "polygon rings")?;
    if num_rings == 0 {
        return Err(GeomSerdeError::MalformedRing(
            "polygon has no rings but is not flagged empty",
        ));
    }
    let mut rings = Vec::with_capacity(num_rings);
    for _ in 0..num_rings {
        let ring = read_coords(reader, dim, "ring points")?;
        validate_ring(&ring)?;
        rings.push(ring);
    }
    Ok(Polygon::from_parts(dim, rings))
}
