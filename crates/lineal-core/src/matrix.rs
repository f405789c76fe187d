//! Dense matrix views with row- or column-major storage order.

use std::ops::RangeBounds;

use crate::buffer::Buffer;
use crate::error::{Error, Result};
use crate::span::RawSpan;
use crate::vector::{check_extent, resolve_bounds, Vector};
use crate::MAX_EXTENT;

/// Storage order of a matrix: the axis along which element-contiguous major
/// vectors run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Order {
    #[default]
    RowMajor,
    ColMajor,
}

/// Strided matrix view over a shared [`Buffer`].
///
/// A matrix is `{ rows, cols, ld, order, offset, buffer }`. The leading
/// dimension `ld` is the increment between successive major vectors; it
/// equals the minor extent for a packed matrix and exceeds it for sub-views.
/// Sub-matrices and transposed minor views alias the parent buffer.
#[derive(Clone, Debug)]
pub struct Matrix {
    buf: Buffer,
    offset: usize,
    rows: usize,
    cols: usize,
    ld: usize,
    order: Order,
}

impl Matrix {
    /// Create a zero-initialized packed matrix owning the only buffer
    /// reference.
    pub fn zeros(rows: usize, cols: usize, order: Order) -> Result<Self> {
        check_extent(rows, "row count")?;
        check_extent(cols, "column count")?;
        let total = rows
            .checked_mul(cols)
            .ok_or_else(|| Error::allocation("matrix storage".to_string()))?;
        let ld = match order {
            Order::RowMajor => cols,
            Order::ColMajor => rows,
        };
        Ok(Matrix {
            buf: Buffer::zeroed(total),
            offset: 0,
            rows,
            cols,
            ld,
            order,
        })
    }

    /// Marshal nested sequences into a fresh matrix.
    ///
    /// The outer slice holds the major vectors in storage order: rows for a
    /// row-major matrix, columns for a column-major one. All inner sequences
    /// must share one length.
    pub fn from_nested(major: &[Vec<f64>], order: Order) -> Result<Self> {
        check_extent(major.len(), "major extent")?;
        let minor = major[0].len();
        check_extent(minor, "minor extent")?;
        for (i, v) in major.iter().enumerate() {
            if v.len() != minor {
                return Err(Error::dimension(
                    minor,
                    v.len(),
                    format!("nested sequence {i}"),
                ));
            }
        }
        let (rows, cols) = match order {
            Order::RowMajor => (major.len(), minor),
            Order::ColMajor => (minor, major.len()),
        };
        let mut values = Vec::with_capacity(major.len() * minor);
        for v in major {
            values.extend_from_slice(v);
        }
        Ok(Matrix {
            buf: Buffer::from_vec(values),
            offset: 0,
            rows,
            cols,
            ld: minor,
            order,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn order(&self) -> Order {
        self.order
    }

    /// Increment between successive major vectors.
    pub fn ld(&self) -> usize {
        self.ld
    }

    pub fn shape(&self) -> (usize, usize, Order) {
        (self.rows, self.cols, self.order)
    }

    /// Number of major vectors: rows for row-major, columns for col-major.
    pub fn major_dim(&self) -> usize {
        match self.order {
            Order::RowMajor => self.rows,
            Order::ColMajor => self.cols,
        }
    }

    /// Length of each major vector.
    pub fn minor_dim(&self) -> usize {
        match self.order {
            Order::RowMajor => self.cols,
            Order::ColMajor => self.rows,
        }
    }

    /// Whether the major vectors are packed end to end, enabling the
    /// flattened fast path in dispatch.
    pub fn is_contiguous(&self) -> bool {
        self.ld == self.minor_dim() && self.rows * self.cols <= MAX_EXTENT
    }

    /// The shared storage behind this view.
    pub fn buffer(&self) -> &Buffer {
        &self.buf
    }

    pub(crate) fn offset(&self) -> usize {
        self.offset
    }

    pub(crate) fn index_of(&self, row: usize, col: usize) -> usize {
        match self.order {
            Order::RowMajor => self.offset + row * self.ld + col,
            Order::ColMajor => self.offset + col * self.ld + row,
        }
    }

    /// Element at `(row, col)`, or `None` when out of range.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(self.buf.with(|data| data[self.index_of(row, col)]))
    }

    /// Store `value` at `(row, col)`.
    pub fn set(&self, row: usize, col: usize, value: f64) -> Result<()> {
        if row >= self.rows || col >= self.cols {
            return Err(Error::index("matrix element"));
        }
        self.buf.with_mut(|data| data[self.index_of(row, col)] = value);
        Ok(())
    }

    /// The contiguous major-order vector at major index `index`.
    pub fn major(&self, index: usize) -> Result<Vector> {
        if index >= self.major_dim() {
            return Err(Error::index("major vector"));
        }
        Ok(Vector::over(
            self.buf.clone(),
            self.offset + index * self.ld,
            1,
            self.minor_dim(),
        ))
    }

    /// The transposed minor-order vector at minor index `index`: a column of
    /// a row-major matrix or a row of a col-major one. Its stride is the
    /// matrix leading dimension.
    pub fn minor(&self, index: usize) -> Result<Vector> {
        if index >= self.minor_dim() {
            return Err(Error::index("minor vector"));
        }
        Ok(Vector::over(
            self.buf.clone(),
            self.offset + index,
            self.ld,
            self.major_dim(),
        ))
    }

    /// Aliasing sub-matrix over the given row and column ranges (half-open).
    ///
    /// The sub-view inherits order and leading dimension; writes through
    /// either view are visible through the other.
    pub fn sub(
        &self,
        rows: impl RangeBounds<usize>,
        cols: impl RangeBounds<usize>,
    ) -> Result<Matrix> {
        let (row_start, row_end) = resolve_bounds(rows, self.rows, "sub-matrix row bounds")?;
        let (col_start, col_end) = resolve_bounds(cols, self.cols, "sub-matrix column bounds")?;
        Ok(Matrix {
            buf: self.buf.clone(),
            offset: self.index_of(row_start, col_start),
            rows: row_end - row_start,
            cols: col_end - col_start,
            ld: self.ld,
            order: self.order,
        })
    }

    /// Copy the major vectors out as nested sequences.
    pub fn to_nested(&self) -> Vec<Vec<f64>> {
        self.buf.with(|data| {
            (0..self.major_dim())
                .map(|i| {
                    let base = self.offset + i * self.ld;
                    data[base..base + self.minor_dim()].to_vec()
                })
                .collect()
        })
    }

    /// Window covering the row at `index`.
    pub(crate) fn row_span(&self, index: usize) -> RawSpan {
        debug_assert!(index < self.rows);
        match self.order {
            Order::RowMajor => RawSpan {
                offset: self.offset + index * self.ld,
                stride: 1,
                len: self.cols,
            },
            Order::ColMajor => RawSpan {
                offset: self.offset + index,
                stride: self.ld,
                len: self.cols,
            },
        }
    }

    /// Window covering the column at `index`.
    pub(crate) fn col_span(&self, index: usize) -> RawSpan {
        debug_assert!(index < self.cols);
        match self.order {
            Order::RowMajor => RawSpan {
                offset: self.offset + index,
                stride: self.ld,
                len: self.rows,
            },
            Order::ColMajor => RawSpan {
                offset: self.offset + index * self.ld,
                stride: 1,
                len: self.rows,
            },
        }
    }

    /// Window covering the major vector at `index`.
    pub(crate) fn major_span(&self, index: usize) -> RawSpan {
        debug_assert!(index < self.major_dim());
        RawSpan {
            offset: self.offset + index * self.ld,
            stride: 1,
            len: self.minor_dim(),
        }
    }

    /// Window flattening all major vectors; only valid when contiguous.
    pub(crate) fn flat_span(&self) -> RawSpan {
        debug_assert!(self.is_contiguous());
        RawSpan {
            offset: self.offset,
            stride: 1,
            len: self.rows * self.cols,
        }
    }
}
