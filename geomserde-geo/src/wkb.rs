//! WKB and WKT interchange through geozero.
//!
//! [`GeozeroValue`] streams a [`GeometryValue`] into any geozero processor,
//! which gives WKB and WKT output without going through `geo`. Z ordinates
//! are forwarded whenever the processor asks for them.

use geo::Geometry;
use geomserde_core::{Coord, GeometryValue, LineString, Point, Polygon};
use geozero::wkt::Wkt;
use geozero::{CoordDimensions, GeomProcessor, GeozeroGeometry, ToGeo, ToWkb, ToWkt};

use crate::convert::to_value;
use crate::error::Result;

/// How empty points are handed to a geozero processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyPoints {
    /// `empty_point` events, for processors that support them (WKT, `geo`).
    #[default]
    Event,
    /// A point whose ordinates are all NaN, the WKB convention.
    NanCoordinate,
}

/// Borrowing wrapper that lets geozero walk a [`GeometryValue`].
#[derive(Debug, Clone, Copy)]
pub struct GeozeroValue<'a> {
    value: &'a GeometryValue,
    empty_points: EmptyPoints,
}

impl<'a> GeozeroValue<'a> {
    pub fn new(value: &'a GeometryValue) -> Self {
        Self {
            value,
            empty_points: EmptyPoints::default(),
        }
    }

    pub fn with_empty_points(mut self, empty_points: EmptyPoints) -> Self {
        self.empty_points = empty_points;
        self
    }
}

impl GeozeroGeometry for GeozeroValue<'_> {
    fn process_geom<P: GeomProcessor>(&self, processor: &mut P) -> geozero::error::Result<()>
    where
        Self: Sized,
    {
        process_value(self.value, self.empty_points, 0, processor)
    }
}

fn nan_coord(point: &Point) -> Coord {
    Coord {
        x: f64::NAN,
        y: f64::NAN,
        z: point.dimension().has_z().then_some(f64::NAN),
    }
}

fn process_value<P: GeomProcessor>(
    value: &GeometryValue,
    empty_points: EmptyPoints,
    idx: usize,
    processor: &mut P,
) -> geozero::error::Result<()> {
    match value {
        GeometryValue::Point(p) => process_point(p, empty_points, idx, processor),
        GeometryValue::LineString(ls) => process_linestring(ls, true, idx, processor),
        GeometryValue::Polygon(p) => process_polygon(p, true, idx, processor),
        GeometryValue::MultiPoint(mp) => {
            processor.multipoint_begin(mp.len(), idx)?;
            for (i, p) in mp.0.iter().enumerate() {
                // multipoint members are bare coordinates in WKB
                match (p.coord(), empty_points) {
                    (Some(c), _) => process_coord(&c, i, processor)?,
                    (None, EmptyPoints::Event) => processor.empty_point(i)?,
                    (None, EmptyPoints::NanCoordinate) => {
                        process_coord(&nan_coord(p), i, processor)?
                    }
                }
            }
            processor.multipoint_end(idx)
        }
        GeometryValue::MultiLineString(mls) => {
            processor.multilinestring_begin(mls.len(), idx)?;
            for (i, ls) in mls.0.iter().enumerate() {
                process_linestring(ls, false, i, processor)?;
            }
            processor.multilinestring_end(idx)
        }
        GeometryValue::MultiPolygon(mp) => {
            processor.multipolygon_begin(mp.len(), idx)?;
            for (i, p) in mp.0.iter().enumerate() {
                process_polygon(p, false, i, processor)?;
            }
            processor.multipolygon_end(idx)
        }
        GeometryValue::GeometryCollection(gc) => {
            processor.geometrycollection_begin(gc.len(), idx)?;
            for (i, child) in gc.0.iter().enumerate() {
                process_value(child, empty_points, i, processor)?;
            }
            processor.geometrycollection_end(idx)
        }
    }
}

fn process_coord<P: GeomProcessor>(
    coord: &Coord,
    idx: usize,
    processor: &mut P,
) -> geozero::error::Result<()> {
    if processor.multi_dim() {
        processor.coordinate(coord.x, coord.y, coord.z, None, None, None, idx)
    } else {
        processor.xy(coord.x, coord.y, idx)
    }
}

fn process_coords<P: GeomProcessor>(
    coords: &[Coord],
    processor: &mut P,
) -> geozero::error::Result<()> {
    for (i, c) in coords.iter().enumerate() {
        process_coord(c, i, processor)?;
    }
    Ok(())
}

fn process_point<P: GeomProcessor>(
    point: &Point,
    empty_points: EmptyPoints,
    idx: usize,
    processor: &mut P,
) -> geozero::error::Result<()> {
    let c = match (point.coord(), empty_points) {
        (Some(c), _) => c,
        (None, EmptyPoints::Event) => return processor.empty_point(idx),
        (None, EmptyPoints::NanCoordinate) => nan_coord(point),
    };
    processor.point_begin(idx)?;
    process_coord(&c, 0, processor)?;
    processor.point_end(idx)
}

fn process_linestring<P: GeomProcessor>(
    line: &LineString,
    tagged: bool,
    idx: usize,
    processor: &mut P,
) -> geozero::error::Result<()> {
    processor.linestring_begin(tagged, line.len(), idx)?;
    process_coords(line.coords(), processor)?;
    processor.linestring_end(tagged, idx)
}

fn process_polygon<P: GeomProcessor>(
    polygon: &Polygon,
    tagged: bool,
    idx: usize,
    processor: &mut P,
) -> geozero::error::Result<()> {
    processor.polygon_begin(tagged, polygon.rings().len(), idx)?;
    for (i, ring) in polygon.rings().iter().enumerate() {
        processor.linestring_begin(false, ring.len(), i)?;
        process_coords(ring, processor)?;
        processor.linestring_end(false, i)?;
    }
    processor.polygon_end(tagged, idx)
}

/// Encode a value as ISO WKB, with Z when any leaf carries it.
///
/// Empty points are written as points with NaN ordinates.
pub fn to_wkb(value: &GeometryValue) -> Result<Vec<u8>> {
    let dims = if value.dimension().has_z() {
        CoordDimensions::xyz()
    } else {
        CoordDimensions::xy()
    };
    let walker = GeozeroValue::new(value).with_empty_points(EmptyPoints::NanCoordinate);
    Ok(walker.to_wkb(dims)?)
}

/// Render a value as 2D WKT.
pub fn to_wkt(value: &GeometryValue) -> Result<String> {
    Ok(GeozeroValue::new(value).to_wkt()?)
}

/// Parse WKT into a value, through `geo`.
pub fn value_from_wkt(wkt: &str) -> Result<GeometryValue> {
    let geom: Geometry<f64> = Wkt(wkt.as_bytes()).to_geo()?;
    to_value(&geom)
}
