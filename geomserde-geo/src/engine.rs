//! Engine adapters: serialize and deserialize a host library's geometries.

use geo::Geometry;
use geomserde_core::cursor::ByteView;
use geomserde_core::GeometryValue;

use crate::convert;
use crate::error::Result;

/// A host geometry library plugged into the codec.
///
/// Implementors only convert to and from [`GeometryValue`]; the provided
/// methods run the codec. Absent inputs produce absent outputs.
pub trait EngineAdapter {
    /// The library's own geometry type.
    type Native;

    fn to_value(&self, native: &Self::Native) -> Result<GeometryValue>;

    fn from_value(&self, value: &GeometryValue) -> Result<Self::Native>;

    fn serialize(&self, native: Option<&Self::Native>) -> Result<Option<Vec<u8>>> {
        let Some(native) = native else {
            return Ok(None);
        };
        let value = self.to_value(native)?;
        Ok(Some(geomserde_core::encode(&value)?))
    }

    /// Decode one geometry from the front of `buf`, returning it with the
    /// number of bytes it occupied.
    fn deserialize<V: ByteView + ?Sized>(
        &self,
        buf: Option<&V>,
    ) -> Result<Option<(Self::Native, usize)>> {
        let Some(buf) = buf else {
            return Ok(None);
        };
        let (value, consumed) = geomserde_core::decode_view(buf)?;
        Ok(Some((self.from_value(&value)?, consumed)))
    }
}

/// Adapter for `geo::Geometry<f64>`. `geo` is linked statically, so there
/// is nothing to load or configure.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoEngine;

impl EngineAdapter for GeoEngine {
    type Native = Geometry<f64>;

    fn to_value(&self, native: &Geometry<f64>) -> Result<GeometryValue> {
        convert::to_value(native)
    }

    fn from_value(&self, value: &GeometryValue) -> Result<Geometry<f64>> {
        convert::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdapterError;
    use geo::{line_string, point};
    use geomserde_core::cursor::StridedBytes;
    use geomserde_core::GeomSerdeError;

    #[test]
    fn absent_input_gives_absent_output() {
        assert_eq!(GeoEngine.serialize(None).unwrap(), None);
        assert!(GeoEngine.deserialize::<[u8]>(None).unwrap().is_none());
    }

    #[test]
    fn serialize_then_deserialize() {
        let geom = Geometry::LineString(line_string![(x: 1.0, y: 2.0), (x: 3.0, y: 4.0)]);
        let buf = GeoEngine.serialize(Some(&geom)).unwrap().unwrap();
        assert_eq!(buf.len(), 2 + 4 + 32);

        let (back, consumed) = GeoEngine.deserialize(Some(buf.as_slice())).unwrap().unwrap();
        assert_eq!(back, geom);
        assert_eq!(consumed, buf.len());
    }

    #[test]
    fn deserialize_reads_strided_views() {
        let geom = Geometry::Point(point! { x: 5.0, y: 6.0 });
        let buf = GeoEngine.serialize(Some(&geom)).unwrap().unwrap();
        let interleaved: Vec<u8> = buf.iter().flat_map(|b| [*b, 0]).collect();
        let view = StridedBytes::every_nth(&interleaved, 0, 2).unwrap();

        let (back, consumed) = GeoEngine.deserialize(Some(&view)).unwrap().unwrap();
        assert_eq!(back, geom);
        assert_eq!(consumed, buf.len());
    }

    #[test]
    fn codec_errors_surface() {
        let err = GeoEngine.deserialize(Some(&[0x07u8, 0x00][..])).unwrap_err();
        assert!(matches!(
            err,
            AdapterError::Codec(GeomSerdeError::InvalidTag(0x07))
        ));
    }
}
