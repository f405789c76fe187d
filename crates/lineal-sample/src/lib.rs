//! Uniform and normal sampling, and the normal distribution family.
//!
//! Random draws come from a caller-supplied [`rand`] generator, so seeding
//! and reproducibility are the caller's choice. The generators here are
//! statistically adequate for simulation work and explicitly unsuitable for
//! anything cryptographic.
//!
//! The normal quantile function inverts the error function by
//! Newton-Raphson from an analytic seed; the forward error function comes
//! from `statrs`.

use lineal_core::{ElementaryOp, SpanMut};
use rand::Rng;
use statrs::function::erf::erf;
use std::f64::consts::{FRAC_2_SQRT_PI, PI, SQRT_2};

/// One uniform draw in `[0, 1)`.
pub fn uniform<R: Rng>(rng: &mut R) -> f64 {
    rng.gen()
}

/// One Box-Muller transform: two independent standard normal draws from two
/// uniforms in `(0, 1]`.
pub fn normal_pair<R: Rng>(rng: &mut R) -> (f64, f64) {
    let u1 = 1.0 - rng.gen::<f64>();
    let u2 = 1.0 - rng.gen::<f64>();
    let r = (-2.0 * u1.ln()).sqrt();
    let (s, c) = (2.0 * PI * u2).sin_cos();
    (r * c, r * s)
}

/// Fills the operand with uniform draws in `[0, 1)`.
#[derive(Debug)]
pub struct Uniform<R: Rng> {
    rng: R,
}

impl<R: Rng> Uniform<R> {
    pub fn new(rng: R) -> Self {
        Uniform { rng }
    }
}

impl<R: Rng> ElementaryOp for Uniform<R> {
    fn apply(&mut self, mut xs: SpanMut<'_>) {
        for v in xs.iter_mut() {
            *v = uniform(&mut self.rng);
        }
    }
}

/// Fills the operand with standard normal draws, two per Box-Muller
/// transform; an odd tail takes the cosine branch alone.
#[derive(Debug)]
pub struct Normal<R: Rng> {
    rng: R,
}

impl<R: Rng> Normal<R> {
    pub fn new(rng: R) -> Self {
        Normal { rng }
    }
}

impl<R: Rng> ElementaryOp for Normal<R> {
    fn apply(&mut self, mut xs: SpanMut<'_>) {
        let mut it = xs.iter_mut();
        while let Some(first) = it.next() {
            match it.next() {
                Some(second) => {
                    let (z0, z1) = normal_pair(&mut self.rng);
                    *first = z0;
                    *second = z1;
                }
                None => {
                    *first = normal_pair(&mut self.rng).0;
                    break;
                }
            }
        }
    }
}

/// Gaussian density at `x`.
pub fn normal_pdf(x: f64, mu: f64, sigma: f64) -> f64 {
    let z = (x - mu) / sigma;
    (FRAC_2_SQRT_PI / (sigma * SQRT_2 * 2.0)) * (-0.5 * z * z).exp()
}

/// Gaussian cumulative distribution at `x`, via the error function.
pub fn normal_cdf(x: f64, mu: f64, sigma: f64) -> f64 {
    0.5 * (1.0 + erf((x - mu) / (sigma * SQRT_2)))
}

const INVERSE_ERF_MAX_ITER: usize = 50;

/// Inverse error function by Newton-Raphson.
///
/// Returns the infinities at the endpoints and NaN outside `[-1, 1]`. The
/// iteration starts from the analytic seed
/// `sign(p) * sqrt(-ln((1 - p)(1 + p)))` and stops once successive iterates
/// agree to 1e-16, typically after four to eight steps. For `p` so close to
/// an endpoint that the derivative underflows, the last finite iterate is
/// returned instead of stepping to infinity.
pub fn inverse_erf(p: f64) -> f64 {
    if !(-1.0..=1.0).contains(&p) {
        return f64::NAN;
    }
    if p == -1.0 {
        return f64::NEG_INFINITY;
    }
    if p == 1.0 {
        return f64::INFINITY;
    }
    let mut inv = (-((1.0 - p) * (1.0 + p)).ln()).sqrt() * if p >= 0.0 { 1.0 } else { -1.0 };
    for _ in 0..INVERSE_ERF_MAX_ITER {
        let prev = inv;
        let f = erf(inv) - p;
        let fx = FRAC_2_SQRT_PI * (-(inv * inv)).exp();
        if fx == 0.0 || !fx.is_finite() {
            break;
        }
        let next = inv - f / fx;
        if !next.is_finite() {
            break;
        }
        inv = next;
        if (inv - prev).abs() <= 1e-16 {
            break;
        }
    }
    inv
}

/// Gaussian quantile function: `mu + sigma * sqrt(2) * erf^-1(2p - 1)`.
///
/// Returns the infinities at `p = 0` and `p = 1`, and NaN outside `[0, 1]`.
pub fn normal_quantile(p: f64, mu: f64, sigma: f64) -> f64 {
    mu + sigma * SQRT_2 * inverse_erf(2.0 * p - 1.0)
}

/// Replaces every element by the normal density at that point.
#[derive(Clone, Copy, Debug)]
pub struct NormalPdf {
    pub mu: f64,
    pub sigma: f64,
}

impl Default for NormalPdf {
    fn default() -> Self {
        NormalPdf { mu: 0.0, sigma: 1.0 }
    }
}

impl ElementaryOp for NormalPdf {
    fn apply(&mut self, mut xs: SpanMut<'_>) {
        for v in xs.iter_mut() {
            *v = normal_pdf(*v, self.mu, self.sigma);
        }
    }
}

/// Replaces every element by the normal cumulative distribution at that
/// point.
#[derive(Clone, Copy, Debug)]
pub struct NormalCdf {
    pub mu: f64,
    pub sigma: f64,
}

impl Default for NormalCdf {
    fn default() -> Self {
        NormalCdf { mu: 0.0, sigma: 1.0 }
    }
}

impl ElementaryOp for NormalCdf {
    fn apply(&mut self, mut xs: SpanMut<'_>) {
        for v in xs.iter_mut() {
            *v = normal_cdf(*v, self.mu, self.sigma);
        }
    }
}

/// Replaces every element, read as a probability, by the normal quantile at
/// that point.
#[derive(Clone, Copy, Debug)]
pub struct NormalQf {
    pub mu: f64,
    pub sigma: f64,
}

impl Default for NormalQf {
    fn default() -> Self {
        NormalQf { mu: 0.0, sigma: 1.0 }
    }
}

impl ElementaryOp for NormalQf {
    fn apply(&mut self, mut xs: SpanMut<'_>) {
        for v in xs.iter_mut() {
            *v = normal_quantile(*v, self.mu, self.sigma);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use lineal_core::{elementary, Operand, Vector};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_uniform_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..1000 {
            let v = uniform(&mut rng);
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_normal_pair_finite() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..1000 {
            let (a, b) = normal_pair(&mut rng);
            assert!(a.is_finite() && b.is_finite());
        }
    }

    #[test]
    fn test_uniform_op_fills_vector() {
        let x = Vector::zeros(5).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut operand = Operand::from(&x);
        elementary(&mut Uniform::new(&mut rng), &mut operand);
        assert!(x.to_vec().iter().all(|v| (0.0..1.0).contains(v)));
    }

    #[test]
    fn test_normal_op_odd_length() {
        let x = Vector::zeros(7).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut operand = Operand::from(&x);
        elementary(&mut Normal::new(&mut rng), &mut operand);
        assert!(x.to_vec().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_normal_pdf_cdf_reference_values() {
        assert_relative_eq!(
            normal_pdf(0.0, 0.0, 1.0),
            1.0 / (2.0 * PI).sqrt(),
            epsilon = 1e-12
        );
        assert_relative_eq!(normal_cdf(0.0, 0.0, 1.0), 0.5, epsilon = 1e-12);
        assert_relative_eq!(normal_cdf(1.96, 0.0, 1.0), 0.975, epsilon = 1e-3);
        assert_relative_eq!(normal_pdf(2.0, 2.0, 3.0), normal_pdf(0.0, 0.0, 3.0), epsilon = 1e-12);
    }

    #[test]
    fn test_normal_quantile_inverts_cdf() {
        for &p in &[0.01, 0.1, 0.25, 0.5, 0.75, 0.9, 0.99] {
            let x = normal_quantile(p, 0.0, 1.0);
            assert_relative_eq!(normal_cdf(x, 0.0, 1.0), p, epsilon = 1e-10);
        }
        for &p in &[0.2, 0.8] {
            let x = normal_quantile(p, 5.0, 2.0);
            assert_relative_eq!(normal_cdf(x, 5.0, 2.0), p, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_normal_quantile_edges() {
        assert_eq!(normal_quantile(0.0, 0.0, 1.0), f64::NEG_INFINITY);
        assert_eq!(normal_quantile(1.0, 0.0, 1.0), f64::INFINITY);
        assert!(normal_quantile(-0.1, 0.0, 1.0).is_nan());
        assert!(normal_quantile(1.1, 0.0, 1.0).is_nan());
        assert!(normal_quantile(f64::NAN, 0.0, 1.0).is_nan());
        assert_eq!(normal_quantile(0.5, 3.0, 1.0), 3.0);
    }

    #[test]
    fn test_normal_quantile_extreme_probabilities_terminate() {
        // Probabilities at the edge of representability must not hang the
        // Newton iteration or step to infinity through a vanishing slope.
        let hi = normal_quantile(1.0 - f64::EPSILON, 0.0, 1.0);
        assert!(hi.is_finite() && hi > 5.0, "hi = {hi}");

        let lo = normal_quantile(f64::MIN_POSITIVE, 0.0, 1.0);
        assert!(
            lo == f64::NEG_INFINITY || (lo.is_finite() && lo < -5.0),
            "lo = {lo}"
        );

        assert!(inverse_erf(1.0 - f64::EPSILON).is_finite());
        assert!(inverse_erf(-1.0 + f64::EPSILON).is_finite());
    }

    #[test]
    fn test_quantile_reference_value() {
        // Phi^-1(0.975) = 1.959963984540054
        assert_relative_eq!(
            normal_quantile(0.975, 0.0, 1.0),
            1.959963984540054,
            epsilon = 1e-9
        );
    }
}
