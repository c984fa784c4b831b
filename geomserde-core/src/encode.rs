//! Geometry value → bytes.

use crate::cursor::{coords_len, ByteWriter};
use crate::decode::DEFAULT_MAX_DEPTH;
use crate::error::{GeomSerdeError, Result};
use crate::value::{Coord, Dimension, GeometryValue, LineString, Point, Polygon};
use crate::wire::{GeometryKind, NodeHeader, COUNT_LEN, HEADER_LEN};

/// Serialise a geometry value into a freshly allocated buffer.
///
/// The buffer is sized exactly once from [`encoded_len`]. Encoding fails
/// when an element count does not fit the u32 wire field, or when containers
/// nest deeper than [`DEFAULT_MAX_DEPTH`], which the decoder would refuse.
///
/// # Example
///
/// ```
/// use geomserde_core::value::{GeometryValue, Point};
///
/// let buf = geomserde_core::encode(&GeometryValue::Point(Point::xy(10.0, 20.0))).unwrap();
/// // tag + flags + two ordinates
/// assert_eq!(buf.len(), 2 + 16);
/// assert_eq!(&buf[..2], &[0, 0]);
/// ```
pub fn encode(value: &GeometryValue) -> Result<Vec<u8>> {
    check_depth(value, 0)?;
    let mut writer = ByteWriter::with_capacity(encoded_len(value));
    write_node(&mut writer, value)?;
    Ok(writer.into_bytes())
}

/// Append the encoding of `value` to an existing writer.
pub fn write_value(writer: &mut ByteWriter, value: &GeometryValue) -> Result<()> {
    check_depth(value, 0)?;
    write_node(writer, value)
}

/// Reject non-empty containers at or past the decoder's default depth limit.
///
/// Walks no deeper than the limit itself.
fn check_depth(value: &GeometryValue, depth: usize) -> Result<()> {
    let is_container = !matches!(
        value,
        GeometryValue::Point(_) | GeometryValue::LineString(_) | GeometryValue::Polygon(_)
    );
    if !is_container || value.is_empty() {
        return Ok(());
    }
    if depth >= DEFAULT_MAX_DEPTH {
        return Err(GeomSerdeError::RecursionTooDeep {
            limit: DEFAULT_MAX_DEPTH,
        });
    }
    if let GeometryValue::GeometryCollection(gc) = value {
        for child in &gc.0 {
            check_depth(child, depth + 1)?;
        }
    }
    Ok(())
}

fn write_node(writer: &mut ByteWriter, value: &GeometryValue) -> Result<()> {
    match value {
        GeometryValue::Point(p) => write_point(writer, p),
        GeometryValue::LineString(ls) => write_linestring(writer, ls),
        GeometryValue::Polygon(p) => write_polygon(writer, p),
        GeometryValue::MultiPoint(mp) => {
            write_header(writer, value.kind(), mp.dimension(), mp.is_empty());
            if !mp.is_empty() {
                writer.write_count(mp.len(), "multipoint elements")?;
                for p in &mp.0 {
                    write_point(writer, p)?;
                }
            }
            Ok(())
        }
        GeometryValue::MultiLineString(mls) => {
            write_header(writer, value.kind(), mls.dimension(), mls.is_empty());
            if !mls.is_empty() {
                writer.write_count(mls.len(), "multilinestring elements")?;
                for ls in &mls.0 {
                    write_linestring(writer, ls)?;
                }
            }
            Ok(())
        }
        GeometryValue::MultiPolygon(mp) => {
            write_header(writer, value.kind(), mp.dimension(), mp.is_empty());
            if !mp.is_empty() {
                writer.write_count(mp.len(), "multipolygon elements")?;
                for p in &mp.0 {
                    write_polygon(writer, p)?;
                }
            }
            Ok(())
        }
        GeometryValue::GeometryCollection(gc) => {
            write_header(writer, value.kind(), gc.dimension(), gc.is_empty());
            if !gc.is_empty() {
                writer.write_count(gc.len(), "collection elements")?;
                for child in &gc.0 {
                    write_node(writer, child)?;
                }
            }
            Ok(())
        }
    }
}

fn write_header(writer: &mut ByteWriter, kind: GeometryKind, dim: Dimension, is_empty: bool) {
    let header = NodeHeader::new(kind, dim, is_empty);
    writer.write_u8(kind.tag());
    writer.write_u8(header.flags());
}

#[inline]
fn write_coord(writer: &mut ByteWriter, coord: &Coord, dim: Dimension) {
    writer.write_f64(coord.x);
    writer.write_f64(coord.y);
    if dim.has_z() {
        writer.write_f64(coord.z.unwrap_or(f64::NAN));
    }
}

fn write_coords(
    writer: &mut ByteWriter,
    coords: &[Coord],
    dim: Dimension,
    context: &'static str,
) -> Result<()> {
    writer.write_count(coords.len(), context)?;
    for c in coords {
        write_coord(writer, c, dim);
    }
    Ok(())
}

fn write_point(writer: &mut ByteWriter, point: &Point) -> Result<()> {
    write_header(writer, GeometryKind::Point, point.dimension(), point.is_empty());
    if let Some(c) = point.coord() {
        write_coord(writer, &c, point.dimension());
    }
    Ok(())
}

fn write_linestring(writer: &mut ByteWriter, line: &LineString) -> Result<()> {
    write_header(writer, GeometryKind::LineString, line.dimension(), line.is_empty());
    if !line.is_empty() {
        write_coords(writer, line.coords(), line.dimension(), "linestring points")?;
    }
    Ok(())
}

fn write_polygon(writer: &mut ByteWriter, polygon: &Polygon) -> Result<()> {
    write_header(writer, GeometryKind::Polygon, polygon.dimension(), polygon.is_empty());
    if !polygon.is_empty() {
        writer.write_count(polygon.rings().len(), "polygon rings")?;
        for ring in polygon.rings() {
            write_coords(writer, ring, polygon.dimension(), "ring points")?;
        }
    }
    Ok(())
}

/// Exact number of bytes [`encode`] produces for `value`.
///
/// Recurses once per nesting level, like [`encode`]; values that pass
/// [`encode`]'s depth check are bounded by [`DEFAULT_MAX_DEPTH`].
pub fn encoded_len(value: &GeometryValue) -> usize {
    match value {
        GeometryValue::Point(p) => point_len(p),
        GeometryValue::LineString(ls) => linestring_len(ls),
        GeometryValue::Polygon(p) => polygon_len(p),
        GeometryValue::MultiPoint(mp) => container_len(mp.0.iter().map(point_len)),
        GeometryValue::MultiLineString(mls) => container_len(mls.0.iter().map(linestring_len)),
        GeometryValue::MultiPolygon(mp) => container_len(mp.0.iter().map(polygon_len)),
        GeometryValue::GeometryCollection(gc) => container_len(gc.0.iter().map(encoded_len)),
    }
}

fn point_len(point: &Point) -> usize {
    HEADER_LEN + coords_len(usize::from(!point.is_empty()), point.dimension().size())
}

fn linestring_len(line: &LineString) -> usize {
    if line.is_empty() {
        return HEADER_LEN;
    }
    HEADER_LEN + COUNT_LEN + coords_len(line.len(), line.dimension().size())
}

fn polygon_len(polygon: &Polygon) -> usize {
    if polygon.is_empty() {
        return HEADER_LEN;
    }
    let ordinates = polygon.dimension().size();
    let rings: usize = polygon
        .rings()
        .iter()
        .map(|ring| COUNT_LEN + coords_len(ring.len(), ordinates))
        .sum();
    HEADER_LEN + COUNT_LEN + rings
}

fn container_len(children: impl ExactSizeIterator<Item = usize>) -> usize {
    if children.len() == 0 {
        return HEADER_LEN;
    }
    HEADER_LEN + COUNT_LEN + children.sum::<usize>()
}
