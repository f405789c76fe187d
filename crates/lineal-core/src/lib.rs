//! Core memory model and dispatch for the lineal workspace.
//!
//! The crate is organized around three layers:
//!
//! 1. **Buffers and views** - [`Buffer`] owns reference-counted `f64`
//!    storage; [`Vector`] and [`Matrix`] are strided views over it that alias
//!    freely (sub-views, transposed minor views) without copying.
//! 2. **Dispatch** - three generic entry points ([`elementary`], [`reduce`] /
//!    [`reduce_into`], [`pair`]) resolve the closed [`Operand`] set and walk
//!    major or minor vectors, flattening packed matrices into one window.
//! 3. **Backend** - everything factorization-shaped is forwarded through the
//!    [`LinearBackend`] contract; [`NalgebraBackend`] is the default
//!    implementation.
//!
//! The library is single-threaded by construction: views are `Rc`-based and
//! `!Send`, which is the intended concurrency model rather than a limitation.
//!
//! # Example
//!
//! ```rust
//! use lineal_core::ops::{Axpy, Sum};
//! use lineal_core::{pair, reduce, Operand, Vector};
//!
//! let x = Vector::from_slice(&[1.0, 2.0, 3.0]).unwrap();
//! let y = Vector::from_slice(&[10.0, 10.0, 10.0]).unwrap();
//! pair(&mut Axpy::new(2.0), &Operand::from(&x), &Operand::from(&y)).unwrap();
//! assert_eq!(reduce(&Sum, &y).unwrap(), 42.0);
//! ```

pub mod backend;
pub mod buffer;
pub mod dispatch;
pub mod error;
pub mod matrix;
pub mod ops;
pub mod programs;
pub mod span;
pub mod structural;
pub mod vector;

pub use backend::{LinearBackend, NalgebraBackend, Transpose};
pub use buffer::Buffer;
pub use dispatch::{
    elementary, pair, pair_with, reduce, reduce_into, Axis, ElementaryOp, Operand, PairOp,
    ReduceOp,
};
pub use error::{Error, Result};
pub use matrix::{Matrix, Order};
pub use span::{Span, SpanMut};
pub use structural::{reshape, unwind};
pub use vector::Vector;

/// Largest extent accepted for any dimension or flattened element count.
pub const MAX_EXTENT: usize = i32::MAX as usize;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::backend::{LinearBackend, NalgebraBackend, Transpose};
    pub use crate::dispatch::{
        elementary, pair, pair_with, reduce, reduce_into, Axis, Operand,
    };
    pub use crate::error::{Error, Result};
    pub use crate::matrix::{Matrix, Order};
    pub use crate::vector::Vector;
}
