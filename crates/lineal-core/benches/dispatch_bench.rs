use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lineal_core::ops::{Axpy, Exp, Sum};
use lineal_core::{elementary, pair, reduce_into, Axis, Matrix, Operand, Order, Vector};

fn bench_elementary(c: &mut Criterion) {
    let mut group = c.benchmark_group("elementary_exp");
    for &n in &[64usize, 1024] {
        let packed = Matrix::zeros(n, n, Order::RowMajor).unwrap();
        group.bench_with_input(BenchmarkId::new("contiguous", n), &packed, |b, m| {
            b.iter(|| {
                let mut operand = Operand::from(m);
                elementary(&mut Exp, black_box(&mut operand));
            });
        });

        let holder = Matrix::zeros(n, n + 1, Order::RowMajor).unwrap();
        let strided = holder.sub(.., 0..n).unwrap();
        group.bench_with_input(BenchmarkId::new("strided", n), &strided, |b, m| {
            b.iter(|| {
                let mut operand = Operand::from(m);
                elementary(&mut Exp, black_box(&mut operand));
            });
        });
    }
    group.finish();
}

fn bench_pair_and_reduce(c: &mut Criterion) {
    let n = 1024;
    let x = Vector::from_slice(&vec![1.0; n]).unwrap();
    let m = Matrix::zeros(n, n, Order::RowMajor).unwrap();
    c.bench_function("pair_axpy_broadcast", |b| {
        b.iter(|| {
            pair(
                &mut Axpy::new(0.5),
                black_box(&Operand::from(&x)),
                black_box(&Operand::from(&m)),
            )
            .unwrap();
        });
    });

    let out = Vector::zeros(n).unwrap();
    c.bench_function("reduce_sum_rows", |b| {
        b.iter(|| reduce_into(&Sum, black_box(&m), &out, Axis::Rows).unwrap());
    });
}

criterion_group!(benches, bench_elementary, bench_pair_and_reduce);
criterion_main!(benches);
