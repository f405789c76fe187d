//! Paired two-operand transforms.

use crate::backend::{LinearBackend, NalgebraBackend};
use crate::dispatch::PairOp;
use crate::span::SpanMut;

/// `y <- alpha * x + y`, forwarding to the backend `axpy` primitive.
#[derive(Clone, Copy, Debug)]
pub struct Axpy<B: LinearBackend = NalgebraBackend> {
    pub alpha: f64,
    pub backend: B,
}

impl Axpy<NalgebraBackend> {
    pub fn new(alpha: f64) -> Self {
        Axpy {
            alpha,
            backend: NalgebraBackend,
        }
    }
}

impl<B: LinearBackend + Default> Default for Axpy<B> {
    fn default() -> Self {
        Axpy {
            alpha: 1.0,
            backend: B::default(),
        }
    }
}

impl<B: LinearBackend> PairOp for Axpy<B> {
    fn apply(&mut self, x: SpanMut<'_>, mut y: SpanMut<'_>) {
        let (n, incx, incy) = (x.len(), x.stride(), y.stride());
        self.backend
            .axpy(n, self.alpha, x.as_span().raw(), incx, y.raw_mut(), incy);
    }
}

/// `y <- alpha * x + beta * y`, composed from the backend `scal` and `axpy`
/// primitives.
#[derive(Clone, Copy, Debug)]
pub struct Axpby<B: LinearBackend = NalgebraBackend> {
    pub alpha: f64,
    pub beta: f64,
    pub backend: B,
}

impl Axpby<NalgebraBackend> {
    pub fn new(alpha: f64, beta: f64) -> Self {
        Axpby {
            alpha,
            beta,
            backend: NalgebraBackend,
        }
    }
}

impl<B: LinearBackend + Default> Default for Axpby<B> {
    fn default() -> Self {
        Axpby {
            alpha: 1.0,
            beta: 0.0,
            backend: B::default(),
        }
    }
}

impl<B: LinearBackend> PairOp for Axpby<B> {
    fn apply(&mut self, x: SpanMut<'_>, mut y: SpanMut<'_>) {
        let (n, incx, incy) = (x.len(), x.stride(), y.stride());
        if self.beta != 1.0 {
            self.backend.scal(n, self.beta, y.raw_mut(), incy);
        }
        self.backend
            .axpy(n, self.alpha, x.as_span().raw(), incx, y.raw_mut(), incy);
    }
}

/// `y <- y * x^alpha`, with shortcuts for plain product, quotient, and square
/// root.
#[derive(Clone, Copy, Debug)]
pub struct Mul {
    pub alpha: f64,
}

impl Default for Mul {
    fn default() -> Self {
        Mul { alpha: 1.0 }
    }
}

impl PairOp for Mul {
    fn apply(&mut self, x: SpanMut<'_>, mut y: SpanMut<'_>) {
        let alpha = self.alpha;
        let xs = x.as_span();
        if alpha == 1.0 {
            for (i, v) in y.iter_mut().enumerate() {
                *v *= xs.get(i);
            }
        } else if alpha == -1.0 {
            for (i, v) in y.iter_mut().enumerate() {
                *v /= xs.get(i);
            }
        } else if alpha == 0.5 {
            for (i, v) in y.iter_mut().enumerate() {
                *v *= xs.get(i).sqrt();
            }
        } else if alpha != 0.0 {
            for (i, v) in y.iter_mut().enumerate() {
                *v *= xs.get(i).powf(alpha);
            }
        }
    }
}

/// Exchanges the two operands, forwarding to the backend `swap` primitive.
#[derive(Clone, Copy, Debug, Default)]
pub struct Swap<B: LinearBackend = NalgebraBackend> {
    pub backend: B,
}

impl Swap<NalgebraBackend> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<B: LinearBackend> PairOp for Swap<B> {
    fn apply(&mut self, mut x: SpanMut<'_>, mut y: SpanMut<'_>) {
        let (n, incx, incy) = (x.len(), x.stride(), y.stride());
        self.backend.swap(n, x.raw_mut(), incx, y.raw_mut(), incy);
    }
}

/// Copies the first operand into the second, forwarding to the backend `copy`
/// primitive.
#[derive(Clone, Copy, Debug, Default)]
pub struct Assign<B: LinearBackend = NalgebraBackend> {
    pub backend: B,
}

impl Assign<NalgebraBackend> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<B: LinearBackend> PairOp for Assign<B> {
    fn apply(&mut self, x: SpanMut<'_>, mut y: SpanMut<'_>) {
        let (n, incx, incy) = (x.len(), x.stride(), y.stride());
        self.backend
            .copy(n, x.as_span().raw(), incx, y.raw_mut(), incy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{pair, pair_with, Axis, Operand};
    use crate::matrix::{Matrix, Order};
    use crate::vector::Vector;

    #[test]
    fn test_axpy_vectors() {
        let x = Vector::from_slice(&[1.0, 2.0, 3.0]).unwrap();
        let y = Vector::from_slice(&[10.0, 10.0, 10.0]).unwrap();
        pair(&mut Axpy::new(2.0), &Operand::from(&x), &Operand::from(&y)).unwrap();
        assert_eq!(y.to_vec(), vec![12.0, 14.0, 16.0]);
        assert_eq!(x.to_vec(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_axpy_length_mismatch() {
        let x = Vector::zeros(2).unwrap();
        let y = Vector::zeros(3).unwrap();
        let err = pair(&mut Axpy::new(1.0), &Operand::from(&x), &Operand::from(&y));
        assert!(err.is_err());
    }

    #[test]
    fn test_axpy_broadcast_rows() {
        let x = Vector::from_slice(&[1.0, 2.0, 3.0]).unwrap();
        let y = Matrix::from_nested(&[vec![1.0, 1.0, 1.0], vec![2.0, 2.0, 2.0]], Order::RowMajor)
            .unwrap();
        pair(&mut Axpy::new(1.0), &Operand::from(&x), &Operand::from(&y)).unwrap();
        assert_eq!(
            y.to_nested(),
            vec![vec![2.0, 3.0, 4.0], vec![3.0, 4.0, 5.0]]
        );
    }

    #[test]
    fn test_axpy_broadcast_cols() {
        let x = Vector::from_slice(&[10.0, 20.0]).unwrap();
        let y = Matrix::from_nested(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]], Order::RowMajor)
            .unwrap();
        pair_with(
            &mut Axpy::new(1.0),
            &Operand::from(&x),
            &Operand::from(&y),
            Axis::Cols,
        )
        .unwrap();
        assert_eq!(
            y.to_nested(),
            vec![vec![11.0, 12.0, 13.0], vec![24.0, 25.0, 26.0]]
        );
    }

    #[test]
    fn test_axpby() {
        let x = Vector::from_slice(&[1.0, 2.0]).unwrap();
        let y = Vector::from_slice(&[10.0, 20.0]).unwrap();
        pair(
            &mut Axpby::new(2.0, 0.5),
            &Operand::from(&x),
            &Operand::from(&y),
        )
        .unwrap();
        assert_eq!(y.to_vec(), vec![7.0, 14.0]);
    }

    #[test]
    fn test_mul_variants() {
        let x = Vector::from_slice(&[4.0, 9.0]).unwrap();

        let y = Vector::from_slice(&[2.0, 3.0]).unwrap();
        pair(&mut Mul { alpha: 1.0 }, &Operand::from(&x), &Operand::from(&y)).unwrap();
        assert_eq!(y.to_vec(), vec![8.0, 27.0]);

        let y = Vector::from_slice(&[8.0, 27.0]).unwrap();
        pair(
            &mut Mul { alpha: -1.0 },
            &Operand::from(&x),
            &Operand::from(&y),
        )
        .unwrap();
        assert_eq!(y.to_vec(), vec![2.0, 3.0]);

        let y = Vector::from_slice(&[1.0, 1.0]).unwrap();
        pair(
            &mut Mul { alpha: 0.5 },
            &Operand::from(&x),
            &Operand::from(&y),
        )
        .unwrap();
        assert_eq!(y.to_vec(), vec![2.0, 3.0]);
    }

    #[test]
    fn test_swap_writes_both_operands() {
        let x = Vector::from_slice(&[1.0, 2.0]).unwrap();
        let y = Vector::from_slice(&[9.0, 8.0]).unwrap();
        pair(&mut Swap::new(), &Operand::from(&x), &Operand::from(&y)).unwrap();
        assert_eq!(x.to_vec(), vec![9.0, 8.0]);
        assert_eq!(y.to_vec(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_assign() {
        let x = Vector::from_slice(&[1.0, 2.0]).unwrap();
        let y = Vector::zeros(2).unwrap();
        pair(&mut Assign::new(), &Operand::from(&x), &Operand::from(&y)).unwrap();
        assert_eq!(y.to_vec(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_pair_over_aliasing_views() {
        // x and y overlap inside one buffer; the staged path keeps this
        // well-defined element by element.
        let base = Vector::from_slice(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        let x = base.sub(0..2).unwrap();
        let y = base.sub(2..4).unwrap();
        pair(&mut Axpy::new(1.0), &Operand::from(&x), &Operand::from(&y)).unwrap();
        assert_eq!(base.to_vec(), vec![1.0, 2.0, 4.0, 6.0]);
    }

    #[test]
    fn test_matrix_pair_requires_same_order() {
        let x = Matrix::zeros(2, 2, Order::RowMajor).unwrap();
        let y = Matrix::zeros(2, 2, Order::ColMajor).unwrap();
        let err = pair(
            &mut Axpy::new(1.0),
            &Operand::from(&x),
            &Operand::from(&y),
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_matrix_pair_flattened_and_strided_agree() {
        let a = Matrix::from_nested(&[vec![1.0, 2.0], vec![3.0, 4.0]], Order::RowMajor).unwrap();
        let b = Matrix::from_nested(&[vec![10.0, 20.0], vec![30.0, 40.0]], Order::RowMajor)
            .unwrap();
        pair(&mut Axpy::new(1.0), &Operand::from(&a), &Operand::from(&b)).unwrap();
        assert_eq!(b.to_nested(), vec![vec![11.0, 22.0], vec![33.0, 44.0]]);

        // Same operation through non-contiguous sub-views.
        let big_a = Matrix::from_nested(
            &[vec![1.0, 2.0, 0.0], vec![3.0, 4.0, 0.0], vec![0.0, 0.0, 0.0]],
            Order::RowMajor,
        )
        .unwrap();
        let big_b = Matrix::from_nested(
            &[
                vec![10.0, 20.0, 0.0],
                vec![30.0, 40.0, 0.0],
                vec![0.0, 0.0, 0.0],
            ],
            Order::RowMajor,
        )
        .unwrap();
        let sa = big_a.sub(0..2, 0..2).unwrap();
        let sb = big_b.sub(0..2, 0..2).unwrap();
        pair(&mut Axpy::new(1.0), &Operand::from(&sa), &Operand::from(&sb)).unwrap();
        assert_eq!(sb.to_nested(), b.to_nested());
    }
}
