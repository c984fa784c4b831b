//! Round-trip behaviour of the codec across every geometry kind.

use geomserde_core::cursor::StridedBytes;
use geomserde_core::{
    decode, decode_view, encode, Coord, Dimension, GeometryCollection, GeometryValue, LineString,
    MultiLineString, MultiPoint, MultiPolygon, Point, Polygon,
};

fn coords(points: &[(f64, f64)]) -> Vec<Coord> {
    points.iter().copied().map(Coord::from).collect()
}

fn coords_z(points: &[(f64, f64, f64)]) -> Vec<Coord> {
    points.iter().copied().map(Coord::from).collect()
}

fn line(points: &[(f64, f64)]) -> LineString {
    LineString::new(coords(points)).unwrap()
}

fn line_z(points: &[(f64, f64, f64)]) -> LineString {
    LineString::new(coords_z(points)).unwrap()
}

fn polygon(rings: &[&[(f64, f64)]]) -> Polygon {
    Polygon::new(rings.iter().map(|r| coords(r)).collect()).unwrap()
}

const SHELL: &[(f64, f64)] = &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)];
const HOLE: &[(f64, f64)] = &[(1.0, 1.0), (1.0, 2.0), (2.0, 2.0), (2.0, 1.0), (1.0, 1.0)];
const TRIANGLE: &[(f64, f64)] = &[(10.0, 10.0), (20.0, 20.0), (20.0, 10.0), (10.0, 10.0)];

fn assert_round_trip(value: GeometryValue) {
    let buf = encode(&value).unwrap();
    let (decoded, consumed) = decode(&buf).unwrap();
    assert_eq!(decoded, value);
    assert_eq!(consumed, buf.len(), "consumed length of {value:?}");
}

#[test]
fn empty_geometries() {
    let values: Vec<GeometryValue> = vec![
        Point::empty(Dimension::Xy).into(),
        Point::empty(Dimension::Xyz).into(),
        LineString::empty(Dimension::Xy).into(),
        LineString::empty(Dimension::Xyz).into(),
        Polygon::empty(Dimension::Xy).into(),
        MultiPoint::default().into(),
        MultiLineString::default().into(),
        MultiPolygon::default().into(),
        GeometryCollection::default().into(),
    ];
    for value in values {
        assert_round_trip(value);
    }
}

#[test]
fn leaf_geometries_xy_and_xyz() {
    assert_round_trip(Point::xy(10.0, 20.0).into());
    assert_round_trip(Point::xyz(10.0, 20.0, 30.0).into());
    assert_round_trip(line(&[(10.0, 20.0), (30.0, 40.0)]).into());
    assert_round_trip(line_z(&[(10.0, 20.0, 30.0), (40.0, 50.0, 60.0)]).into());
    assert_round_trip(polygon(&[TRIANGLE]).into());
    assert_round_trip(
        Polygon::new(vec![coords_z(&[
            (10.0, 10.0, 10.0),
            (20.0, 20.0, 10.0),
            (20.0, 10.0, 10.0),
            (10.0, 10.0, 10.0),
        ])])
        .unwrap()
        .into(),
    );
}

#[test]
fn polygon_keeps_shell_then_hole_order() {
    let value = GeometryValue::from(polygon(&[SHELL, HOLE]));
    let (decoded, _) = decode(&encode(&value).unwrap()).unwrap();
    let GeometryValue::Polygon(decoded) = decoded else {
        panic!("expected polygon, got {decoded:?}");
    };
    assert_eq!(decoded.exterior(), Some(coords(SHELL).as_slice()));
    assert_eq!(decoded.interiors(), &[coords(HOLE)]);
    for ring in decoded.rings() {
        assert_eq!(ring.first(), ring.last(), "ring must stay closed");
    }
}

#[test]
fn polygon_with_several_holes() {
    let hole_a: &[(f64, f64)] = &[(1.0, 1.0), (1.0, 1.5), (1.5, 1.5), (1.5, 1.0), (1.0, 1.0)];
    let hole_b: &[(f64, f64)] = &[(2.0, 2.0), (2.0, 2.5), (2.5, 2.5), (2.5, 2.0), (2.0, 2.0)];
    assert_round_trip(polygon(&[SHELL, hole_a, hole_b]).into());
}

#[test]
fn multi_geometries() {
    assert_round_trip(MultiPoint(vec![Point::xy(10.0, 20.0), Point::xy(30.0, 40.0)]).into());
    assert_round_trip(
        MultiPoint(vec![Point::xyz(10.0, 20.0, 30.0), Point::xyz(40.0, 50.0, 60.0)]).into(),
    );
    assert_round_trip(
        MultiLineString(vec![
            line(&[(10.0, 20.0), (30.0, 40.0)]),
            line(&[(50.0, 60.0), (70.0, 80.0)]),
        ])
        .into(),
    );
    assert_round_trip(
        MultiLineString(vec![
            line_z(&[(10.0, 20.0, 30.0), (40.0, 50.0, 60.0)]),
            line_z(&[(70.0, 80.0, 90.0), (100.0, 110.0, 120.0)]),
        ])
        .into(),
    );
    let negative: &[(f64, f64)] = &[(-10.0, -10.0), (-20.0, -20.0), (-20.0, -10.0), (-10.0, -10.0)];
    assert_round_trip(MultiPolygon(vec![polygon(&[TRIANGLE]), polygon(&[negative])]).into());
    assert_round_trip(MultiPolygon(vec![polygon(&[TRIANGLE]), polygon(&[SHELL, HOLE])]).into());
}

#[test]
fn multipoint_keeps_empty_member() {
    let value = GeometryValue::from(MultiPoint(vec![
        Point::empty(Dimension::Xy),
        Point::xy(10.0, 20.0),
    ]));
    let (decoded, _) = decode(&encode(&value).unwrap()).unwrap();
    let GeometryValue::MultiPoint(MultiPoint(points)) = decoded else {
        panic!("expected multipoint");
    };
    assert!(points[0].is_empty());
    assert_eq!(points[1].coord(), Some(Coord::xy(10.0, 20.0)));
}

#[test]
fn multi_geometries_with_empty_members() {
    assert_round_trip(
        MultiPoint(vec![Point::empty(Dimension::Xy), Point::empty(Dimension::Xy)]).into(),
    );
    assert_round_trip(
        MultiLineString(vec![
            LineString::empty(Dimension::Xy),
            line(&[(10.0, 20.0), (30.0, 40.0)]),
        ])
        .into(),
    );
    assert_round_trip(
        MultiLineString(vec![
            LineString::empty(Dimension::Xy),
            LineString::empty(Dimension::Xy),
        ])
        .into(),
    );
    assert_round_trip(
        MultiPolygon(vec![Polygon::empty(Dimension::Xy), polygon(&[TRIANGLE])]).into(),
    );
    assert_round_trip(
        MultiPolygon(vec![Polygon::empty(Dimension::Xy), Polygon::empty(Dimension::Xy)]).into(),
    );
}

#[test]
fn collection_children_keep_their_own_dimension() {
    let value = GeometryValue::from(GeometryCollection(vec![
        Point::xy(10.0, 20.0).into(),
        line_z(&[(10.0, 20.0, 30.0), (40.0, 50.0, 60.0)]).into(),
    ]));
    let (decoded, _) = decode(&encode(&value).unwrap()).unwrap();
    let GeometryValue::GeometryCollection(GeometryCollection(children)) = decoded else {
        panic!("expected collection");
    };
    assert_eq!(children[0].dimension(), Dimension::Xy);
    assert_eq!(children[1].dimension(), Dimension::Xyz);
}

#[test]
fn collections_and_nesting() {
    assert_round_trip(
        GeometryCollection(vec![
            Point::xy(10.0, 20.0).into(),
            line(&[(10.0, 20.0), (30.0, 40.0)]).into(),
            polygon(&[TRIANGLE]).into(),
        ])
        .into(),
    );
    let inner = GeometryCollection(vec![
        Point::xy(10.0, 20.0).into(),
        line(&[(10.0, 20.0), (30.0, 40.0)]).into(),
    ]);
    assert_round_trip(GeometryCollection(vec![inner.clone().into()]).into());
    assert_round_trip(GeometryCollection(vec![Point::xy(1.0, 2.0).into(), inner.into()]).into());
    assert_round_trip(
        GeometryCollection(vec![
            Point::xy(10.0, 20.0).into(),
            Point::empty(Dimension::Xy).into(),
            line(&[(10.0, 20.0), (30.0, 40.0)]).into(),
        ])
        .into(),
    );
    assert_round_trip(
        GeometryCollection(vec![
            MultiPoint::default().into(),
            MultiLineString::default().into(),
            MultiPolygon::default().into(),
            GeometryCollection::default().into(),
        ])
        .into(),
    );
}

#[test]
fn trailing_bytes_are_not_consumed() {
    let value = GeometryValue::from(MultiPolygon(vec![polygon(&[SHELL, HOLE])]));
    let buf = encode(&value).unwrap();
    let mut framed = buf.clone();
    framed.extend_from_slice(&[0xFF, 0x00, 0xAB, 0x07, 0x06]);

    let (decoded, consumed) = decode(&framed).unwrap();
    assert_eq!(decoded, value);
    assert_eq!(consumed, buf.len());
}

#[test]
fn back_to_back_geometries_decode_by_offset() {
    let first = GeometryValue::from(Point::xyz(1.0, 2.0, 3.0));
    let second = GeometryValue::from(line(&[(0.0, 0.0), (5.0, 5.0)]));
    let mut buf = encode(&first).unwrap();
    buf.extend(encode(&second).unwrap());

    let (a, used) = decode(&buf).unwrap();
    let (b, rest) = decode(&buf[used..]).unwrap();
    assert_eq!(a, first);
    assert_eq!(b, second);
    assert_eq!(used + rest, buf.len());
}

#[test]
fn strided_view_decodes_like_contiguous_bytes() {
    let value = GeometryValue::from(GeometryCollection(vec![
        polygon(&[SHELL, HOLE]).into(),
        Point::xyz(1.0, 2.0, 3.0).into(),
    ]));
    let buf = encode(&value).unwrap();
    let interleaved: Vec<u8> = buf.iter().flat_map(|b| [0x5A, *b]).collect();
    let view = StridedBytes::every_nth(&interleaved, 1, 2).unwrap();

    assert_eq!(decode_view(&view).unwrap(), decode(&buf).unwrap());
}

#[test]
fn strided_view_over_unrelated_bytes_fails_cleanly() {
    // every other byte of this buffer starts with tag 0x09
    let base: Vec<u8> = (0..64u8).map(|i| if i % 2 == 0 { 0x09 } else { 0x00 }).collect();
    let view = StridedBytes::every_nth(&base, 0, 2).unwrap();
    assert!(decode_view(&view).is_err());
}

#[test]
fn contiguous_views_decode_directly() {
    let buf = encode(&Point::xy(3.0, 4.0).into()).unwrap();
    assert_eq!(decode_view(&buf).unwrap(), decode(&buf).unwrap());
    assert_eq!(decode_view(buf.as_slice()).unwrap(), decode(&buf).unwrap());
}

#[test]
fn removing_any_payload_byte_is_truncation() {
    let buf = encode(&polygon(&[SHELL, HOLE]).into()).unwrap();
    // header (2) + ring count (4) + shell count (4) + 5 shell coords (80),
    // then the hole's count (4) and its 5 coords
    assert_eq!(buf.len(), 174);
    for removed in (10..90).chain(94..buf.len()) {
        let mut damaged = buf.clone();
        damaged.remove(removed);
        let err = decode(&damaged).unwrap_err();
        assert!(
            matches!(err, geomserde_core::GeomSerdeError::Truncated { .. }),
            "removing byte {removed} gave {err:?}"
        );
    }
}
