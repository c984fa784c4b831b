#![doc = include_str!("../../README.md")]
//! Crate-specific API surface for `geomserde-core`.

pub mod cursor;
pub mod decode;
pub mod encode;
pub mod error;
pub mod value;
pub mod wire;

pub use decode::{decode, decode_view, decode_with, DecodeOptions, DEFAULT_MAX_DEPTH};
pub use encode::{encode, encoded_len};
pub use error::{GeomSerdeError, Result};
pub use value::{
    Coord, Dimension, GeometryCollection, GeometryValue, LineString, MultiLineString, MultiPoint,
    MultiPolygon, Point, Polygon,
};
pub use wire::GeometryKind;
