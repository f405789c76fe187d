//! Reductions of strided windows to scalars.

use crate::backend::{LinearBackend, NalgebraBackend};
use crate::dispatch::ReduceOp;
use crate::error::{Error, Result};
use crate::span::Span;

/// Sum of all elements.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sum;

impl ReduceOp for Sum {
    fn reduce(&self, xs: Span<'_>) -> f64 {
        xs.iter().sum()
    }
}

/// Arithmetic mean.
#[derive(Clone, Copy, Debug, Default)]
pub struct Mean;

impl ReduceOp for Mean {
    fn reduce(&self, xs: Span<'_>) -> f64 {
        xs.iter().sum::<f64>() / xs.len() as f64
    }
}

fn variance(xs: &Span<'_>, ddof: usize) -> f64 {
    let n = xs.len();
    let mean = xs.iter().sum::<f64>() / n as f64;
    let ssd = xs.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>();
    ssd / (n - ddof) as f64
}

fn check_ddof(ddof: usize, len: usize) -> Result<()> {
    if ddof >= len {
        return Err(Error::argument(format!(
            "ddof {ddof} out of range for {len} values"
        )));
    }
    Ok(())
}

/// Population or sample variance, per the delta-degrees-of-freedom
/// adjustment.
#[derive(Clone, Copy, Debug, Default)]
pub struct Var {
    pub ddof: usize,
}

impl ReduceOp for Var {
    fn validate(&self, len: usize) -> Result<()> {
        check_ddof(self.ddof, len)
    }

    fn reduce(&self, xs: Span<'_>) -> f64 {
        variance(&xs, self.ddof)
    }
}

/// Standard deviation with a delta-degrees-of-freedom adjustment.
#[derive(Clone, Copy, Debug, Default)]
pub struct Std {
    pub ddof: usize,
}

impl ReduceOp for Std {
    fn validate(&self, len: usize) -> Result<()> {
        check_ddof(self.ddof, len)
    }

    fn reduce(&self, xs: Span<'_>) -> f64 {
        variance(&xs, self.ddof).sqrt()
    }
}

/// Euclidean norm, forwarding to the backend `nrm2` primitive.
#[derive(Clone, Copy, Debug, Default)]
pub struct Nrm2<B: LinearBackend = NalgebraBackend> {
    pub backend: B,
}

impl Nrm2<NalgebraBackend> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<B: LinearBackend> ReduceOp for Nrm2<B> {
    fn reduce(&self, xs: Span<'_>) -> f64 {
        self.backend.nrm2(xs.len(), xs.raw(), xs.stride())
    }
}

/// Sum of absolute values, forwarding to the backend `asum` primitive.
#[derive(Clone, Copy, Debug, Default)]
pub struct Asum<B: LinearBackend = NalgebraBackend> {
    pub backend: B,
}

impl Asum<NalgebraBackend> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<B: LinearBackend> ReduceOp for Asum<B> {
    fn reduce(&self, xs: Span<'_>) -> f64 {
        self.backend.asum(xs.len(), xs.raw(), xs.stride())
    }
}

/// Smallest element under the `<` order; NaN elements never win a
/// comparison, so only a NaN in the first slot propagates.
#[derive(Clone, Copy, Debug, Default)]
pub struct Min;

impl ReduceOp for Min {
    fn reduce(&self, xs: Span<'_>) -> f64 {
        let mut m = xs.get(0);
        for v in xs.iter().skip(1) {
            if v < m {
                m = v;
            }
        }
        m
    }
}

/// Largest element under the `>` order.
#[derive(Clone, Copy, Debug, Default)]
pub struct Max;

impl ReduceOp for Max {
    fn reduce(&self, xs: Span<'_>) -> f64 {
        let mut m = xs.get(0);
        for v in xs.iter().skip(1) {
            if v > m {
                m = v;
            }
        }
        m
    }
}
