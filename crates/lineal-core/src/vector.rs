//! Dense strided vector views.

use std::ops::{Bound, RangeBounds};

use crate::buffer::Buffer;
use crate::error::{Error, Result};
use crate::span::RawSpan;
use crate::MAX_EXTENT;

/// Strided view of `f64` elements over a shared [`Buffer`].
///
/// A vector is `{ len, stride, offset, buffer }`; element `i` lives at buffer
/// index `offset + i*stride`. Sub-vectors and matrix minor views alias the
/// parent buffer without copying, so cloning and sub-viewing are cheap and
/// every write is visible through all aliases.
#[derive(Clone, Debug)]
pub struct Vector {
    buf: Buffer,
    offset: usize,
    stride: usize,
    len: usize,
}

pub(crate) fn check_extent(extent: usize, what: &str) -> Result<()> {
    if extent < 1 || extent > MAX_EXTENT {
        return Err(Error::argument(format!("bad {what}: {extent}")));
    }
    Ok(())
}

pub(crate) fn resolve_bounds(
    range: impl RangeBounds<usize>,
    len: usize,
    what: &str,
) -> Result<(usize, usize)> {
    let start = match range.start_bound() {
        Bound::Included(&s) => s,
        Bound::Excluded(&s) => s + 1,
        Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        Bound::Included(&e) => e + 1,
        Bound::Excluded(&e) => e,
        Bound::Unbounded => len,
    };
    if start >= end || end > len {
        return Err(Error::index(what.to_string()));
    }
    Ok((start, end))
}

impl Vector {
    /// Create a zero-initialized vector owning the only buffer reference.
    pub fn zeros(len: usize) -> Result<Self> {
        check_extent(len, "vector length")?;
        Ok(Vector {
            buf: Buffer::zeroed(len),
            offset: 0,
            stride: 1,
            len,
        })
    }

    /// Marshal a slice of numbers into a fresh vector.
    pub fn from_slice(values: &[f64]) -> Result<Self> {
        check_extent(values.len(), "vector length")?;
        Ok(Vector {
            buf: Buffer::from_vec(values.to_vec()),
            offset: 0,
            stride: 1,
            len: values.len(),
        })
    }

    pub(crate) fn over(buf: Buffer, offset: usize, stride: usize, len: usize) -> Self {
        debug_assert!(len >= 1 && stride >= 1);
        debug_assert!(offset + (len - 1) * stride < buf.len());
        Vector {
            buf,
            offset,
            stride,
            len,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// A view never has fewer than one element.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Increment between consecutive elements in the underlying buffer.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// The shared storage behind this view.
    pub fn buffer(&self) -> &Buffer {
        &self.buf
    }

    pub(crate) fn offset(&self) -> usize {
        self.offset
    }

    pub(crate) fn raw_span(&self) -> RawSpan {
        RawSpan {
            offset: self.offset,
            stride: self.stride,
            len: self.len,
        }
    }

    /// Element at `index`, or `None` when out of range.
    pub fn get(&self, index: usize) -> Option<f64> {
        if index >= self.len {
            return None;
        }
        Some(self.buf.with(|data| data[self.offset + index * self.stride]))
    }

    /// Store `value` at `index`.
    pub fn set(&self, index: usize, value: f64) -> Result<()> {
        if index >= self.len {
            return Err(Error::index("vector element"));
        }
        self.buf
            .with_mut(|data| data[self.offset + index * self.stride] = value);
        Ok(())
    }

    /// Aliasing sub-view over `range` (half-open, like slice indexing).
    ///
    /// The sub-vector keeps the parent's stride and buffer; writes through
    /// either view are visible through the other.
    pub fn sub(&self, range: impl RangeBounds<usize>) -> Result<Vector> {
        let (start, end) = resolve_bounds(range, self.len, "sub-vector bounds")?;
        Ok(Vector {
            buf: self.buf.clone(),
            offset: self.offset + start * self.stride,
            stride: self.stride,
            len: end - start,
        })
    }

    /// Copy the viewed elements out in order.
    pub fn to_vec(&self) -> Vec<f64> {
        self.buf.with(|data| {
            (0..self.len)
                .map(|i| data[self.offset + i * self.stride])
                .collect()
        })
    }
}
