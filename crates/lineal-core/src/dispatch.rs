//! Generic dispatch across the scalar/vector/matrix operand set.
//!
//! Three entry points cover the operation shapes of the library: in-place
//! elementary transforms, reductions to a scalar or vector, and paired
//! two-operand transforms. Each resolves the operand kinds through the closed
//! [`Operand`] set and walks major or minor vectors accordingly, with a
//! flattened fast path for packed matrices.

use log::trace;

use crate::buffer::Buffer;
use crate::error::{Error, Result};
use crate::matrix::Matrix;
use crate::span::{RawSpan, Span, SpanMut};
use crate::vector::Vector;

/// Operand of a dispatched operation.
///
/// The set is closed: a number, a vector view, or a matrix view of either
/// order. Vector and matrix variants hold cheap view clones, so building an
/// operand from a view only bumps the buffer reference count.
#[derive(Clone, Debug)]
pub enum Operand {
    Scalar(f64),
    Vector(Vector),
    Matrix(Matrix),
}

impl Operand {
    /// The transformed number after an elementary call on a scalar operand.
    pub fn scalar(&self) -> Option<f64> {
        match self {
            Operand::Scalar(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<f64> for Operand {
    fn from(value: f64) -> Self {
        Operand::Scalar(value)
    }
}

impl From<&Vector> for Operand {
    fn from(x: &Vector) -> Self {
        Operand::Vector(x.clone())
    }
}

impl From<Vector> for Operand {
    fn from(x: Vector) -> Self {
        Operand::Vector(x)
    }
}

impl From<&Matrix> for Operand {
    fn from(x: &Matrix) -> Self {
        Operand::Matrix(x.clone())
    }
}

impl From<Matrix> for Operand {
    fn from(x: Matrix) -> Self {
        Operand::Matrix(x)
    }
}

/// Axis selector for matrix reductions and vector-matrix broadcasts.
///
/// `Rows` operates on every row (the default), `Cols` on every column,
/// independent of the matrix storage order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Axis {
    #[default]
    Rows,
    Cols,
}

/// In-place unary transform over a strided window.
pub trait ElementaryOp {
    fn apply(&mut self, xs: SpanMut<'_>);
}

/// Reduction of a strided window to a single number.
pub trait ReduceOp {
    /// Validate parameters against the length being reduced.
    fn validate(&self, len: usize) -> Result<()> {
        let _ = len;
        Ok(())
    }

    fn reduce(&self, xs: Span<'_>) -> f64;
}

/// Two-operand transform over equal-length strided windows.
///
/// Both windows are mutable; `Swap` is the only stock operation writing
/// through the first one.
pub trait PairOp {
    fn apply(&mut self, x: SpanMut<'_>, y: SpanMut<'_>);
}

fn apply_span<K: ElementaryOp>(op: &mut K, buf: &Buffer, s: RawSpan) {
    buf.with_mut(|data| {
        op.apply(SpanMut::new(&mut data[s.offset..s.end()], s.stride, s.len));
    });
}

/// Apply an elementary operation in place.
///
/// A scalar operand is transformed once and left in the enum; vector and
/// matrix operands are mutated through their views. A packed matrix is
/// processed as one flattened window, otherwise major vector by major vector.
pub fn elementary<K: ElementaryOp>(op: &mut K, operand: &mut Operand) {
    match operand {
        Operand::Scalar(value) => {
            let mut one = [*value];
            op.apply(SpanMut::new(&mut one, 1, 1));
            *value = one[0];
        }
        Operand::Vector(x) => apply_span(op, x.buffer(), x.raw_span()),
        Operand::Matrix(x) => {
            if x.is_contiguous() {
                trace!(
                    "elementary: flattened fast path over {} elements",
                    x.rows() * x.cols()
                );
                apply_span(op, x.buffer(), x.flat_span());
            } else {
                for i in 0..x.major_dim() {
                    apply_span(op, x.buffer(), x.major_span(i));
                }
            }
        }
    }
}

fn reduce_span<K: ReduceOp>(op: &K, buf: &Buffer, s: RawSpan) -> f64 {
    buf.with(|data| op.reduce(Span::new(&data[s.offset..s.end()], s.stride, s.len)))
}

/// Reduce a vector to a scalar.
pub fn reduce<K: ReduceOp>(op: &K, x: &Vector) -> Result<f64> {
    op.validate(x.len())?;
    Ok(reduce_span(op, x.buffer(), x.raw_span()))
}

/// Reduce every row or column of a matrix into the corresponding slot of
/// `out`.
///
/// `out` must have one slot per reduced vector; parameters are validated
/// against the reduced length before anything is written.
pub fn reduce_into<K: ReduceOp>(op: &K, x: &Matrix, out: &Vector, axis: Axis) -> Result<()> {
    let (count, reduced_len) = match axis {
        Axis::Rows => (x.rows(), x.cols()),
        Axis::Cols => (x.cols(), x.rows()),
    };
    if out.len() != count {
        return Err(Error::dimension(count, out.len(), "reduction target"));
    }
    op.validate(reduced_len)?;
    for i in 0..count {
        let s = match axis {
            Axis::Rows => x.row_span(i),
            Axis::Cols => x.col_span(i),
        };
        let value = reduce_span(op, x.buffer(), s);
        out.set(i, value)?;
    }
    Ok(())
}

fn run_pair<K: PairOp>(op: &mut K, xb: &Buffer, xs: RawSpan, yb: &Buffer, ys: RawSpan) {
    debug_assert_eq!(xs.len, ys.len);
    if xb.shares(yb) {
        // The windows may overlap arbitrarily, so the first operand is staged
        // through scratch and written back afterwards.
        let mut scratch: Vec<f64> =
            xb.with(|data| (0..xs.len).map(|i| data[xs.offset + i * xs.stride]).collect());
        yb.with_mut(|data| {
            op.apply(
                SpanMut::new(&mut scratch, 1, xs.len),
                SpanMut::new(&mut data[ys.offset..ys.end()], ys.stride, ys.len),
            );
        });
        xb.with_mut(|data| {
            for (i, v) in scratch.iter().enumerate() {
                data[xs.offset + i * xs.stride] = *v;
            }
        });
    } else {
        xb.with_mut(|xd| {
            yb.with_mut(|yd| {
                op.apply(
                    SpanMut::new(&mut xd[xs.offset..xs.end()], xs.stride, xs.len),
                    SpanMut::new(&mut yd[ys.offset..ys.end()], ys.stride, ys.len),
                );
            });
        });
    }
}

/// Apply a paired operation, broadcasting onto rows where an axis applies.
pub fn pair<K: PairOp>(op: &mut K, x: &Operand, y: &Operand) -> Result<()> {
    pair_with(op, x, y, Axis::Rows)
}

/// Apply a paired operation with an explicit broadcast axis.
///
/// Vector-vector requires equal lengths. Vector-matrix broadcasts the vector
/// against every row (`Axis::Rows`) or column (`Axis::Cols`) of the matrix;
/// the vector length must equal the matrix's opposite extent. Matrix-matrix
/// requires identical shape and order and walks major vectors, flattened when
/// both are packed.
pub fn pair_with<K: PairOp>(op: &mut K, x: &Operand, y: &Operand, axis: Axis) -> Result<()> {
    match (x, y) {
        (Operand::Vector(x), Operand::Vector(y)) => {
            if y.len() != x.len() {
                return Err(Error::dimension(x.len(), y.len(), "paired vector"));
            }
            run_pair(op, x.buffer(), x.raw_span(), y.buffer(), y.raw_span());
            Ok(())
        }
        (Operand::Vector(x), Operand::Matrix(y)) => {
            match axis {
                Axis::Rows => {
                    if x.len() != y.cols() {
                        return Err(Error::dimension(y.cols(), x.len(), "broadcast vector"));
                    }
                    for i in 0..y.rows() {
                        run_pair(op, x.buffer(), x.raw_span(), y.buffer(), y.row_span(i));
                    }
                }
                Axis::Cols => {
                    if x.len() != y.rows() {
                        return Err(Error::dimension(y.rows(), x.len(), "broadcast vector"));
                    }
                    for j in 0..y.cols() {
                        run_pair(op, x.buffer(), x.raw_span(), y.buffer(), y.col_span(j));
                    }
                }
            }
            Ok(())
        }
        (Operand::Matrix(x), Operand::Matrix(y)) => {
            if x.order() != y.order() {
                return Err(Error::order("paired matrices"));
            }
            if x.rows() != y.rows() {
                return Err(Error::dimension(x.rows(), y.rows(), "paired matrix rows"));
            }
            if x.cols() != y.cols() {
                return Err(Error::dimension(x.cols(), y.cols(), "paired matrix columns"));
            }
            if x.is_contiguous() && y.is_contiguous() {
                trace!(
                    "pair: flattened fast path over {} elements",
                    x.rows() * x.cols()
                );
                run_pair(op, x.buffer(), x.flat_span(), y.buffer(), y.flat_span());
            } else {
                for i in 0..x.major_dim() {
                    run_pair(op, x.buffer(), x.major_span(i), y.buffer(), y.major_span(i));
                }
            }
            Ok(())
        }
        (Operand::Matrix(_), Operand::Vector(_)) => Err(Error::argument(
            "matrix-vector pairing takes the vector as the first operand",
        )),
        _ => Err(Error::argument("vector or matrix operands expected")),
    }
}
