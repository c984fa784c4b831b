//! Conversion between [`GeometryValue`] and `geo::Geometry<f64>`.

use geo::Geometry;
use geomserde_core::{
    Coord, Dimension, GeomSerdeError, GeometryCollection, GeometryValue, LineString,
    MultiLineString, MultiPoint, MultiPolygon, Point, Polygon,
};

use crate::error::{AdapterError, Result};

fn is_empty_point(p: &geo::Point<f64>) -> bool {
    p.x().is_nan() && p.y().is_nan()
}

/// Convert a `geo` geometry into a codec value.
///
/// A `(NaN, NaN)` point becomes an empty point. `Line`, `Rect` and
/// `Triangle` have no wire tag and are rejected.
pub fn to_value(geom: &Geometry<f64>) -> Result<GeometryValue> {
    let value: GeometryValue = match geom {
        Geometry::Point(p) => point_to_value(p).into(),
        Geometry::LineString(ls) => linestring_to_value(ls)?.into(),
        Geometry::Polygon(p) => polygon_to_value(p)?.into(),
        Geometry::MultiPoint(mp) => MultiPoint(mp.0.iter().map(point_to_value).collect()).into(),
        Geometry::MultiLineString(mls) => MultiLineString(
            mls.0
                .iter()
                .map(linestring_to_value)
                .collect::<Result<_>>()?,
        )
        .into(),
        Geometry::MultiPolygon(mp) => {
            MultiPolygon(mp.0.iter().map(polygon_to_value).collect::<Result<_>>()?).into()
        }
        Geometry::GeometryCollection(gc) => {
            GeometryCollection(gc.0.iter().map(to_value).collect::<Result<_>>()?).into()
        }
        Geometry::Line(_) => return Err(AdapterError::UnsupportedGeometry("Line")),
        Geometry::Rect(_) => return Err(AdapterError::UnsupportedGeometry("Rect")),
        Geometry::Triangle(_) => return Err(AdapterError::UnsupportedGeometry("Triangle")),
    };
    Ok(value)
}

fn point_to_value(p: &geo::Point<f64>) -> Point {
    if is_empty_point(p) {
        Point::empty(Dimension::Xy)
    } else {
        Point::xy(p.x(), p.y())
    }
}

fn ring_coords(ls: &geo::LineString<f64>) -> Vec<Coord> {
    ls.0.iter().map(|c| Coord::xy(c.x, c.y)).collect()
}

fn linestring_to_value(ls: &geo::LineString<f64>) -> Result<LineString> {
    Ok(LineString::with_dimension(Dimension::Xy, ring_coords(ls))?)
}

fn polygon_to_value(p: &geo::Polygon<f64>) -> Result<Polygon> {
    if p.exterior().0.is_empty() {
        if !p.interiors().is_empty() {
            return Err(GeomSerdeError::MalformedRing("polygon has holes but no shell").into());
        }
        return Ok(Polygon::empty(Dimension::Xy));
    }
    let rings = std::iter::once(p.exterior())
        .chain(p.interiors())
        .map(ring_coords)
        .collect();
    Ok(Polygon::with_dimension(Dimension::Xy, rings)?)
}

/// Convert a codec value into a `geo` geometry.
///
/// Any leaf carrying Z ordinates fails with
/// [`AdapterError::UnsupportedDimensions`]; empty leaves convert whatever
/// their dimension since they carry no ordinates to drop.
pub fn from_value(value: &GeometryValue) -> Result<Geometry<f64>> {
    let geom = match value {
        GeometryValue::Point(p) => Geometry::Point(point_from_value(p)?),
        GeometryValue::LineString(ls) => Geometry::LineString(linestring_from_value(ls)?),
        GeometryValue::Polygon(p) => Geometry::Polygon(polygon_from_value(p)?),
        GeometryValue::MultiPoint(mp) => Geometry::MultiPoint(geo::MultiPoint(
            mp.0.iter().map(point_from_value).collect::<Result<_>>()?,
        )),
        GeometryValue::MultiLineString(mls) => Geometry::MultiLineString(geo::MultiLineString(
            mls.0
                .iter()
                .map(linestring_from_value)
                .collect::<Result<_>>()?,
        )),
        GeometryValue::MultiPolygon(mp) => Geometry::MultiPolygon(geo::MultiPolygon(
            mp.0.iter().map(polygon_from_value).collect::<Result<_>>()?,
        )),
        GeometryValue::GeometryCollection(gc) => Geometry::GeometryCollection(
            geo::GeometryCollection(gc.0.iter().map(from_value).collect::<Result<_>>()?),
        ),
    };
    Ok(geom)
}

fn ensure_xy(dimensions: Dimension, is_empty: bool) -> Result<()> {
    if dimensions.has_z() && !is_empty {
        return Err(AdapterError::UnsupportedDimensions { dimensions });
    }
    Ok(())
}

fn point_from_value(p: &Point) -> Result<geo::Point<f64>> {
    ensure_xy(p.dimension(), p.is_empty())?;
    Ok(match p.coord() {
        Some(c) => geo::Point::new(c.x, c.y),
        None => geo::Point::new(f64::NAN, f64::NAN),
    })
}

fn to_geo_line(coords: &[Coord]) -> geo::LineString<f64> {
    geo::LineString(coords.iter().map(|c| geo::coord! { x: c.x, y: c.y }).collect())
}

fn linestring_from_value(ls: &LineString) -> Result<geo::LineString<f64>> {
    ensure_xy(ls.dimension(), ls.is_empty())?;
    Ok(to_geo_line(ls.coords()))
}

fn polygon_from_value(p: &Polygon) -> Result<geo::Polygon<f64>> {
    ensure_xy(p.dimension(), p.is_empty())?;
    let exterior = p.exterior().map(to_geo_line).unwrap_or_else(|| geo::LineString(Vec::new()));
    let interiors = p.interiors().iter().map(|ring| to_geo_line(ring)).collect();
    Ok(geo::Polygon::new(exterior, interiors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{coord, point, polygon, Line, Rect, Triangle};

    #[test]
    fn point_round_trips() {
        let geom = Geometry::Point(point! { x: 10.0, y: 20.0 });
        let value = to_value(&geom).unwrap();
        assert_eq!(value, Point::xy(10.0, 20.0).into());
        assert_eq!(from_value(&value).unwrap(), geom);
    }

    #[test]
    fn nan_point_is_empty() {
        let geom = Geometry::Point(geo::Point::new(f64::NAN, f64::NAN));
        let value = to_value(&geom).unwrap();
        assert!(value.is_empty());

        let Geometry::Point(back) = from_value(&value).unwrap() else {
            panic!("expected point");
        };
        assert!(is_empty_point(&back));
    }

    #[test]
    fn half_nan_point_is_not_empty() {
        let value = to_value(&Geometry::Point(geo::Point::new(f64::NAN, 1.0))).unwrap();
        assert!(!value.is_empty());
    }

    #[test]
    fn polygon_keeps_holes() {
        let geom = Geometry::Polygon(polygon!(
            exterior: [(x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 10.0, y: 10.0), (x: 0.0, y: 10.0)],
            interiors: [[(x: 1.0, y: 1.0), (x: 1.0, y: 2.0), (x: 2.0, y: 2.0), (x: 2.0, y: 1.0)]]
        ));
        let value = to_value(&geom).unwrap();
        let GeometryValue::Polygon(poly) = &value else {
            panic!("expected polygon");
        };
        assert_eq!(poly.rings().len(), 2);
        assert_eq!(from_value(&value).unwrap(), geom);
    }

    #[test]
    fn empty_shapes_convert() {
        let empty_line = Geometry::LineString(geo::LineString(Vec::new()));
        assert!(to_value(&empty_line).unwrap().is_empty());

        let empty_poly = Geometry::Polygon(geo::Polygon::new(geo::LineString(Vec::new()), vec![]));
        let value = to_value(&empty_poly).unwrap();
        assert_eq!(value, Polygon::empty(Dimension::Xy).into());
        assert_eq!(from_value(&value).unwrap(), empty_poly);
    }

    #[test]
    fn shapes_without_tag_are_rejected() {
        let cases = [
            (Geometry::Line(Line::new((0.0, 0.0), (1.0, 1.0))), "Line"),
            (Geometry::Rect(Rect::new((0.0, 0.0), (1.0, 1.0))), "Rect"),
            (
                Geometry::Triangle(Triangle::new(
                    coord! { x: 0.0, y: 0.0 },
                    coord! { x: 1.0, y: 0.0 },
                    coord! { x: 0.0, y: 1.0 },
                )),
                "Triangle",
            ),
        ];
        for (geom, name) in cases {
            assert!(matches!(
                to_value(&geom),
                Err(AdapterError::UnsupportedGeometry(n)) if n == name
            ));
        }
    }

    #[test]
    fn z_coordinates_are_rejected() {
        let nested = GeometryValue::from(GeometryCollection(vec![
            Point::xy(1.0, 2.0).into(),
            Point::xyz(1.0, 2.0, 3.0).into(),
        ]));
        assert!(matches!(
            from_value(&nested),
            Err(AdapterError::UnsupportedDimensions {
                dimensions: Dimension::Xyz
            })
        ));
    }

    #[test]
    fn empty_z_leaves_convert() {
        let value = GeometryValue::from(LineString::empty(Dimension::Xyz));
        assert_eq!(
            from_value(&value).unwrap(),
            Geometry::LineString(geo::LineString(Vec::new()))
        );
    }

    #[test]
    fn degenerate_ring_is_a_codec_error() {
        let degenerate = geo::Polygon::new(geo::LineString(vec![coord! { x: 1.0, y: 1.0 }]), vec![]);
        assert!(matches!(
            to_value(&Geometry::Polygon(degenerate)),
            Err(AdapterError::Codec(GeomSerdeError::MalformedRing(_)))
        ));
    }

    #[test]
    fn holes_without_shell_are_rejected() {
        let hole = geo::LineString(vec![
            coord! { x: 1.0, y: 1.0 },
            coord! { x: 1.0, y: 2.0 },
            coord! { x: 2.0, y: 2.0 },
            coord! { x: 1.0, y: 1.0 },
        ]);
        let shell_less = geo::Polygon::new(geo::LineString(Vec::new()), vec![hole]);
        assert!(matches!(
            to_value(&Geometry::Polygon(shell_less.clone())),
            Err(AdapterError::Codec(GeomSerdeError::MalformedRing(_)))
        ));

        let multi = geo::MultiPolygon(vec![shell_less]);
        assert!(to_value(&Geometry::MultiPolygon(multi)).is_err());
    }
}
