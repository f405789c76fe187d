//! The stock operation set for the dispatch layer.
//!
//! Each operation is a small struct whose fields are its typed parameters,
//! carrying defaults through `Default` impls. Operations whose calling
//! convention forwards to the numerical backend (scaling, axpy-style
//! updates, norms, copy/swap) are generic over
//! [`LinearBackend`](crate::backend::LinearBackend) with the default backend
//! filled in.

pub mod elementary;
pub mod pair;
pub mod reduce;

pub use elementary::{
    Abs, Apply, Clip, Exp, Inc, Ln, Logistic, Pow, Scale, Set, Sgn, Tanh,
};
pub use pair::{Assign, Axpby, Axpy, Mul, Swap};
pub use reduce::{Asum, Max, Mean, Min, Nrm2, Std, Sum, Var};
