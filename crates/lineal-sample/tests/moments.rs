//! Sample-moment checks for the generators, on a fixed seed.

use lineal_core::ops::{Mean, Std};
use lineal_core::{elementary, reduce, Operand, Vector};
use lineal_sample::{Normal, Uniform};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const DRAWS: usize = 100_000;

#[test]
fn uniform_moments() {
    let x = Vector::zeros(DRAWS).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut operand = Operand::from(&x);
    elementary(&mut Uniform::new(&mut rng), &mut operand);

    let mean = reduce(&Mean, &x).unwrap();
    assert!((mean - 0.5).abs() < 0.005, "mean = {mean}");

    let std = reduce(&Std { ddof: 1 }, &x).unwrap();
    let variance = std * std;
    assert!((variance - 1.0 / 12.0).abs() < 0.001, "variance = {variance}");
}

#[test]
fn normal_moments() {
    let x = Vector::zeros(DRAWS).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(43);
    let mut operand = Operand::from(&x);
    elementary(&mut Normal::new(&mut rng), &mut operand);

    let mean = reduce(&Mean, &x).unwrap();
    assert!(mean.abs() < 0.02, "mean = {mean}");

    let std = reduce(&Std { ddof: 1 }, &x).unwrap();
    assert!((std - 1.0).abs() < 0.02, "std = {std}");
}
