//! End-to-end checks of the dispatch layer against its documented laws.

use lineal_core::ops::{Apply, Axpy, Exp, Sum, Var};
use lineal_core::{
    elementary, pair, reduce, reduce_into, Axis, Matrix, Operand, Order, Vector,
};

#[test]
fn elementary_is_order_symmetric() {
    let rows = vec![vec![0.5, 1.0, 1.5], vec![2.0, 2.5, 3.0]];
    let row_major = Matrix::from_nested(&rows, Order::RowMajor).unwrap();
    // Same logical values, stored transposed in column-major order.
    let col_major = Matrix::from_nested(&rows, Order::ColMajor).unwrap();

    let mut a = Operand::from(&row_major);
    let mut b = Operand::from(&col_major);
    elementary(&mut Exp, &mut a);
    elementary(&mut Exp, &mut b);

    for i in 0..2 {
        for j in 0..3 {
            assert_eq!(row_major.get(i, j), col_major.get(j, i));
        }
    }
}

#[test]
fn elementary_strided_matches_contiguous() {
    let rows = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]];
    let packed = Matrix::from_nested(&rows, Order::RowMajor).unwrap();

    let holder = Matrix::from_nested(
        &[
            vec![1.0, 2.0, 3.0, 0.0],
            vec![4.0, 5.0, 6.0, 0.0],
        ],
        Order::RowMajor,
    )
    .unwrap();
    let strided = holder.sub(.., 0..3).unwrap();
    assert!(packed.is_contiguous());
    assert!(!strided.is_contiguous());

    let mut a = Operand::from(&packed);
    let mut b = Operand::from(&strided);
    elementary(&mut Exp, &mut a);
    elementary(&mut Exp, &mut b);
    assert_eq!(packed.to_nested(), strided.to_nested());
    // The padding column is untouched by the strided walk.
    assert_eq!(holder.get(0, 3), Some(0.0));
}

#[test]
fn paired_broadcast_matches_documented_example() {
    let x = Vector::from_slice(&[1.0, 2.0, 3.0]).unwrap();
    let y = Matrix::from_nested(
        &[vec![1.0, 1.0, 1.0], vec![2.0, 2.0, 2.0]],
        Order::RowMajor,
    )
    .unwrap();
    pair(&mut Axpy::new(1.0), &Operand::from(&x), &Operand::from(&y)).unwrap();
    assert_eq!(
        y.to_nested(),
        vec![vec![2.0, 3.0, 4.0], vec![3.0, 4.0, 5.0]]
    );
}

#[test]
fn reduction_validates_before_writing() {
    let m = Matrix::from_nested(&[vec![1.0, 2.0], vec![3.0, 4.0]], Order::RowMajor).unwrap();
    let out = Vector::from_slice(&[-7.0, -7.0]).unwrap();
    // ddof 2 is out of range for rows of length 2: nothing may be written.
    assert!(reduce_into(&Var { ddof: 2 }, &m, &out, Axis::Rows).is_err());
    assert_eq!(out.to_vec(), vec![-7.0, -7.0]);
}

#[test]
fn reduction_over_minor_view_equals_column_sum() {
    let m = Matrix::from_nested(&[vec![1.0, 2.0], vec![3.0, 4.0]], Order::RowMajor).unwrap();
    let col = m.minor(1).unwrap();
    let direct = reduce(&Sum, &col).unwrap();

    let by_axis = Vector::zeros(2).unwrap();
    reduce_into(&Sum, &m, &by_axis, Axis::Cols).unwrap();
    assert_eq!(by_axis.get(1), Some(direct));
}

#[test]
fn apply_reenters_with_explicit_context() {
    // The callback closes over its own context; dispatch adds none.
    let offsets = [10.0, 20.0];
    let mut index = 0;
    let x = Vector::from_slice(&[1.0, 2.0]).unwrap();
    let mut op = Apply::new(|v| {
        let out = v + offsets[index % 2];
        index += 1;
        out
    });
    let mut operand = Operand::from(&x);
    elementary(&mut op, &mut operand);
    drop(op);
    assert_eq!(x.to_vec(), vec![11.0, 22.0]);
    assert_eq!(index, 2);
}

#[test]
fn scalar_operand_round_trips() {
    let mut operand = Operand::from(1.0);
    elementary(&mut Exp, &mut operand);
    let e = operand.scalar().unwrap();
    assert!((e - std::f64::consts::E).abs() < 1e-15);

    // Vector and matrix operands report no scalar.
    let x = Vector::zeros(1).unwrap();
    assert!(Operand::from(&x).scalar().is_none());
}
