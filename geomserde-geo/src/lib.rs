//! Bridge between [`geomserde_core`] geometry values and `geo` geometries.
//!
//! `geo` has no empty point and no Z ordinate: the `(NaN, NaN)` point stands
//! for `POINT EMPTY`, and values with Z coordinates cannot be converted into
//! `geo` geometries.

pub mod convert;
pub mod engine;
pub mod error;
pub mod wkb;

pub use convert::{from_value, to_value};
pub use engine::{EngineAdapter, GeoEngine};
pub use error::{AdapterError, Result};
pub use wkb::{to_wkb, to_wkt, value_from_wkt, EmptyPoints, GeozeroValue};
