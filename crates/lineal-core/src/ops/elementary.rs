//! Elementary in-place transforms.

use crate::backend::{LinearBackend, NalgebraBackend};
use crate::dispatch::ElementaryOp;
use crate::span::SpanMut;

/// Adds a constant to every element.
#[derive(Clone, Copy, Debug)]
pub struct Inc {
    pub alpha: f64,
}

impl Default for Inc {
    fn default() -> Self {
        Inc { alpha: 1.0 }
    }
}

impl ElementaryOp for Inc {
    fn apply(&mut self, mut xs: SpanMut<'_>) {
        let alpha = self.alpha;
        for v in xs.iter_mut() {
            *v += alpha;
        }
    }
}

/// Scales every element, forwarding to the backend `scal` primitive.
#[derive(Clone, Copy, Debug)]
pub struct Scale<B: LinearBackend = NalgebraBackend> {
    pub alpha: f64,
    pub backend: B,
}

impl Scale<NalgebraBackend> {
    pub fn new(alpha: f64) -> Self {
        Scale {
            alpha,
            backend: NalgebraBackend,
        }
    }
}

impl<B: LinearBackend + Default> Default for Scale<B> {
    fn default() -> Self {
        Scale {
            alpha: 1.0,
            backend: B::default(),
        }
    }
}

impl<B: LinearBackend> ElementaryOp for Scale<B> {
    fn apply(&mut self, mut xs: SpanMut<'_>) {
        let (n, inc) = (xs.len(), xs.stride());
        self.backend.scal(n, self.alpha, xs.raw_mut(), inc);
    }
}

/// Raises every element to a constant power, with the usual shortcuts for
/// reciprocal, square root, and the trivial exponents.
#[derive(Clone, Copy, Debug)]
pub struct Pow {
    pub alpha: f64,
}

impl Default for Pow {
    fn default() -> Self {
        Pow { alpha: 1.0 }
    }
}

impl ElementaryOp for Pow {
    fn apply(&mut self, mut xs: SpanMut<'_>) {
        let alpha = self.alpha;
        if alpha == -1.0 {
            for v in xs.iter_mut() {
                *v = 1.0 / *v;
            }
        } else if alpha == 0.0 {
            for v in xs.iter_mut() {
                *v = 1.0;
            }
        } else if alpha == 0.5 {
            for v in xs.iter_mut() {
                *v = v.sqrt();
            }
        } else if alpha != 1.0 {
            for v in xs.iter_mut() {
                *v = v.powf(alpha);
            }
        }
    }
}

/// Replaces every element by its exponential.
#[derive(Clone, Copy, Debug, Default)]
pub struct Exp;

impl ElementaryOp for Exp {
    fn apply(&mut self, mut xs: SpanMut<'_>) {
        for v in xs.iter_mut() {
            *v = v.exp();
        }
    }
}

/// Replaces every element by its natural logarithm.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ln;

impl ElementaryOp for Ln {
    fn apply(&mut self, mut xs: SpanMut<'_>) {
        for v in xs.iter_mut() {
            *v = v.ln();
        }
    }
}

/// Replaces positive elements by 1 and negative ones by -1; zero and NaN pass
/// through.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sgn;

impl ElementaryOp for Sgn {
    fn apply(&mut self, mut xs: SpanMut<'_>) {
        for v in xs.iter_mut() {
            if *v > 0.0 {
                *v = 1.0;
            } else if *v < 0.0 {
                *v = -1.0;
            }
        }
    }
}

/// Replaces every element by its absolute value.
#[derive(Clone, Copy, Debug, Default)]
pub struct Abs;

impl ElementaryOp for Abs {
    fn apply(&mut self, mut xs: SpanMut<'_>) {
        for v in xs.iter_mut() {
            *v = v.abs();
        }
    }
}

/// Applies the standard logistic function.
#[derive(Clone, Copy, Debug, Default)]
pub struct Logistic;

impl ElementaryOp for Logistic {
    fn apply(&mut self, mut xs: SpanMut<'_>) {
        for v in xs.iter_mut() {
            *v = 1.0 / (1.0 + (-*v).exp());
        }
    }
}

/// Applies the hyperbolic tangent.
#[derive(Clone, Copy, Debug, Default)]
pub struct Tanh;

impl ElementaryOp for Tanh {
    fn apply(&mut self, mut xs: SpanMut<'_>) {
        for v in xs.iter_mut() {
            *v = v.tanh();
        }
    }
}

/// Sets every element to a constant.
#[derive(Clone, Copy, Debug)]
pub struct Set {
    pub alpha: f64,
}

impl Default for Set {
    fn default() -> Self {
        Set { alpha: 1.0 }
    }
}

impl ElementaryOp for Set {
    fn apply(&mut self, mut xs: SpanMut<'_>) {
        let alpha = self.alpha;
        for v in xs.iter_mut() {
            *v = alpha;
        }
    }
}

/// Clamps every element into `[min, max]`.
#[derive(Clone, Copy, Debug)]
pub struct Clip {
    pub min: f64,
    pub max: f64,
}

impl Default for Clip {
    fn default() -> Self {
        Clip { min: 0.0, max: 1.0 }
    }
}

impl ElementaryOp for Clip {
    fn apply(&mut self, mut xs: SpanMut<'_>) {
        let (min, max) = (self.min, self.max);
        for v in xs.iter_mut() {
            if *v < min {
                *v = min;
            } else if *v > max {
                *v = max;
            }
        }
    }
}

/// Applies a caller-supplied function to every element.
///
/// The closure and whatever context it captures are passed in explicitly, so
/// re-entering dispatch from inside the callback is the caller's business and
/// no hidden state is involved.
pub struct Apply<F> {
    f: F,
}

impl<F: FnMut(f64) -> f64> Apply<F> {
    pub fn new(f: F) -> Self {
        Apply { f }
    }
}

impl<F: FnMut(f64) -> f64> ElementaryOp for Apply<F> {
    fn apply(&mut self, mut xs: SpanMut<'_>) {
        for v in xs.iter_mut() {
            *v = (self.f)(*v);
        }
    }
}
