//! Bounds-checked byte reader/writer and input normalization.

use std::borrow::Cow;

use crate::error::{GeomSerdeError, Result};
use crate::wire::{COUNT_LEN, ORDINATE_LEN};

// =============================================================================
// READING
// =============================================================================

/// Position-tracking reader over a contiguous byte slice.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining_len(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Fail with `Truncated` unless at least `needed` bytes remain.
    #[inline]
    pub fn ensure(&self, needed: usize, context: &'static str) -> Result<()> {
        if needed > self.remaining_len() {
            return Err(GeomSerdeError::Truncated {
                context,
                offset: self.pos,
                needed,
                available: self.remaining_len(),
            });
        }
        Ok(())
    }

    #[inline]
    pub fn read_bytes(&mut self, n: usize, context: &'static str) -> Result<&'a [u8]> {
        self.ensure(n, context)?;
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    #[inline]
    fn read_array<const N: usize>(&mut self, context: &'static str) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N, context)?);
        Ok(out)
    }

    #[inline]
    pub fn read_u8(&mut self, context: &'static str) -> Result<u8> {
        let [byte] = self.read_array::<1>(context)?;
        Ok(byte)
    }

    #[inline]
    pub fn read_u32(&mut self, context: &'static str) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array(context)?))
    }

    #[inline]
    pub fn read_f64(&mut self, context: &'static str) -> Result<f64> {
        Ok(f64::from_le_bytes(self.read_array(context)?))
    }

    /// Read a u32 count and check that `count * unit` bytes could still follow.
    ///
    /// Rejects impossible counts before anything is allocated for them.
    pub fn read_count(&mut self, unit: usize, context: &'static str) -> Result<usize> {
        let offset = self.pos;
        let count = self.read_u32(context)? as usize;
        match count.checked_mul(unit) {
            Some(needed) => self.ensure(needed, context)?,
            None => {
                return Err(GeomSerdeError::Truncated {
                    context,
                    offset: offset + COUNT_LEN,
                    needed: usize::MAX,
                    available: self.remaining_len(),
                })
            }
        }
        Ok(count)
    }
}

// =============================================================================
// WRITING
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[inline]
    pub fn write_u8(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    #[inline]
    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    #[inline]
    pub fn write_f64(&mut self, value: f64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Write a collection length as a u32 count.
    pub fn write_count(&mut self, count: usize, context: &'static str) -> Result<()> {
        let count = u32::try_from(count)
            .map_err(|_| GeomSerdeError::CountOverflow { context, count })?;
        self.write_u32(count);
        Ok(())
    }
}

/// Bytes needed for `count` coordinates of `ordinates` components each.
pub(crate) const fn coords_len(count: usize, ordinates: usize) -> usize {
    count * ordinates * ORDINATE_LEN
}

// =============================================================================
// NORMALIZATION
// =============================================================================

/// Anything that can present itself as a sequence of bytes.
///
/// Contiguous inputs expose a slice directly; windowed or strided inputs
/// copy their bytes out in logical order.
pub trait ByteView {
    /// Number of logical bytes in the view.
    fn byte_len(&self) -> usize;

    /// The view as one slice, if its bytes are already adjacent in memory.
    fn as_contiguous(&self) -> Option<&[u8]>;

    /// Append the view's bytes, in logical order, to `out`.
    fn copy_to(&self, out: &mut Vec<u8>);
}

impl ByteView for [u8] {
    fn byte_len(&self) -> usize {
        self.len()
    }

    fn as_contiguous(&self) -> Option<&[u8]> {
        Some(self)
    }

    fn copy_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self);
    }
}

impl<const N: usize> ByteView for [u8; N] {
    fn byte_len(&self) -> usize {
        N
    }

    fn as_contiguous(&self) -> Option<&[u8]> {
        Some(self)
    }

    fn copy_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self);
    }
}

impl ByteView for Vec<u8> {
    fn byte_len(&self) -> usize {
        self.len()
    }

    fn as_contiguous(&self) -> Option<&[u8]> {
        Some(self)
    }

    fn copy_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self);
    }
}

/// A window over a larger buffer that addresses every `stride`-th byte.
///
/// Element `i` is `base[start + i * stride]`. The stride may be zero
/// (every element repeats one byte) or negative (the window walks backwards).
#[derive(Debug, Clone, Copy)]
pub struct StridedBytes<'a> {
    base: &'a [u8],
    start: usize,
    stride: isize,
    len: usize,
}

impl<'a> StridedBytes<'a> {
    /// # Example
    ///
    /// ```
    /// use geomserde_core::cursor::{normalize, StridedBytes};
    ///
    /// let base = [0u8, 10, 1, 11, 2, 12];
    /// let evens = StridedBytes::new(&base, 0, 2, 3).unwrap();
    /// assert_eq!(normalize(&evens).as_ref(), &[0, 1, 2]);
    ///
    /// assert!(StridedBytes::new(&base, 1, 2, 4).is_err());
    /// ```
    pub fn new(base: &'a [u8], start: usize, stride: isize, len: usize) -> Result<Self> {
        if len > 0 {
            if start >= base.len() {
                return Err(GeomSerdeError::InvalidView("start offset is out of bounds"));
            }
            let last = isize::try_from(len - 1)
                .ok()
                .and_then(|steps| steps.checked_mul(stride))
                .and_then(|span| isize::try_from(start).ok()?.checked_add(span));
            match last {
                Some(last) if last >= 0 && (last as usize) < base.len() => {}
                _ => return Err(GeomSerdeError::InvalidView("view runs past the buffer")),
            }
        }
        Ok(Self {
            base,
            start,
            stride,
            len,
        })
    }

    /// Every `step`-th byte of `base` from `start` to the end.
    pub fn every_nth(base: &'a [u8], start: usize, step: usize) -> Result<Self> {
        if step == 0 {
            return Err(GeomSerdeError::InvalidView("step must be positive"));
        }
        let stride = isize::try_from(step)
            .map_err(|_| GeomSerdeError::InvalidView("step is too large"))?;
        let len = base.len().saturating_sub(start).div_ceil(step);
        Self::new(base, start, stride, len)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, index: usize) -> Option<u8> {
        if index >= self.len {
            return None;
        }
        // In bounds: `new` checked both ends of the walk.
        let offset = self.start as isize + index as isize * self.stride;
        self.base.get(offset as usize).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..self.len).filter_map(move |i| self.get(i))
    }
}

impl ByteView for StridedBytes<'_> {
    fn byte_len(&self) -> usize {
        self.len
    }

    fn as_contiguous(&self) -> Option<&[u8]> {
        match (self.stride, self.len) {
            (_, 0) => Some(&self.base[..0]),
            (1, len) => Some(&self.base[self.start..self.start + len]),
            (_, 1) => Some(&self.base[self.start..self.start + 1]),
            _ => None,
        }
    }

    fn copy_to(&self, out: &mut Vec<u8>) {
        out.reserve(self.len);
        out.extend(self.iter());
    }
}

/// Present any byte view as one contiguous slice.
///
/// Already-contiguous views are borrowed as-is; anything else is copied once
/// into an owned buffer.
pub fn normalize<V: ByteView + ?Sized>(view: &V) -> Cow<'_, [u8]> {
    match view.as_contiguous() {
        Some(slice) => Cow::Borrowed(slice),
        None => {
            let mut out = Vec::with_capacity(view.byte_len());
            view.copy_to(&mut out);
            Cow::Owned(out)
        }
    }
}
