//! lineal: strided vector/matrix views over shared buffers, with generic
//! dispatch and self-contained statistical kernels.
//!
//! The workspace splits into four crates, re-exported here:
//!
//! - [`lineal_core`] (aliased below): buffers, views, the
//!   elementary/reduction/paired dispatch layer, the stock operation set, and
//!   the numerical backend contract with its `nalgebra`-backed default.
//! - [`quantile`]: interpolated rank and quantile estimation.
//! - [`spline`]: cubic spline construction and evaluation.
//! - [`sample`]: uniform and normal sampling plus the normal distribution
//!   family.
//!
//! # Example
//!
//! ```rust
//! use lineal::ops::Axpy;
//! use lineal::{pair, Matrix, Operand, Order, Vector};
//!
//! let x = Vector::from_slice(&[1.0, 2.0, 3.0]).unwrap();
//! let m = Matrix::zeros(2, 3, Order::RowMajor).unwrap();
//! pair(&mut Axpy::new(1.0), &Operand::from(&x), &Operand::from(&m)).unwrap();
//! assert_eq!(m.major(0).unwrap().to_vec(), vec![1.0, 2.0, 3.0]);
//! ```

pub use lineal_core::{
    backend, dispatch, elementary, error, ops, pair, pair_with, programs, reduce, reduce_into,
    reshape, structural, unwind, Axis, Buffer, ElementaryOp, Error, LinearBackend, Matrix,
    NalgebraBackend, Operand, Order, PairOp, ReduceOp, Result, Span, SpanMut, Transpose, Vector,
    MAX_EXTENT,
};

pub use lineal_quantile as quantile;
pub use lineal_sample as sample;
pub use lineal_spline as spline;

/// Prelude module for convenient imports
pub mod prelude {
    pub use lineal_core::prelude::*;
    pub use lineal_quantile::{median, normalized_ranks, quantile, quantiles, rank, ranks};
    pub use lineal_sample::{normal_cdf, normal_pdf, normal_quantile};
    pub use lineal_spline::{Boundary, Extrapolation, Spline};
}
