use thiserror::Error;

use crate::value::Dimension;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeomSerdeError {
    #[error("truncated buffer: {context} needs {needed} bytes at offset {offset}, {available} available")]
    Truncated {
        context: &'static str,
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("invalid geometry type tag: {0}")]
    InvalidTag(u8),

    #[error("invalid flags byte 0x{0:02x}: reserved bits are set")]
    InvalidFlags(u8),

    #[error("malformed ring: {0}")]
    MalformedRing(&'static str),

    #[error("{kind} has no elements but is not flagged empty")]
    InconsistentEmptiness { kind: &'static str },

    #[error("{parent} cannot contain a {child}")]
    UnexpectedChild {
        parent: &'static str,
        child: &'static str,
    },

    #[error("geometry nesting exceeds the maximum depth of {limit}")]
    RecursionTooDeep { limit: usize },

    #[error("coordinate dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        expected: Dimension,
        found: Dimension,
    },

    #[error("invalid byte view: {0}")]
    InvalidView(&'static str),

    #[error("{context} count {count} does not fit in the u32 wire field")]
    CountOverflow { context: &'static str, count: usize },
}

pub type Result<T> = std::result::Result<T, GeomSerdeError>;
