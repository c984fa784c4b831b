use geomserde_core::{Dimension, GeomSerdeError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error(transparent)]
    Codec(#[from] GeomSerdeError),

    #[error("unsupported geometry: {0} has no geomserde equivalent")]
    UnsupportedGeometry(&'static str),

    #[error("unsupported coordinate dimensions: {dimensions}")]
    UnsupportedDimensions { dimensions: Dimension },

    #[error("geozero error: {0}")]
    Geozero(#[from] geozero::error::GeozeroError),
}

pub type Result<T> = std::result::Result<T, AdapterError>;
