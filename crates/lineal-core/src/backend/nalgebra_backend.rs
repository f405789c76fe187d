//! Default backend forwarding factorization-class primitives to `nalgebra`.

use log::debug;
use nalgebra::{DMatrix, DVector};

use super::{LinearBackend, Transpose};
use crate::error::{Error, Result};
use crate::matrix::Order;

const SVD_MAX_ITER: usize = 10_000;

/// Backend packing strided operands into `nalgebra` structures and forwarding
/// the decompositions to it. Level-1 primitives use the trait's strided
/// loops.
#[derive(Clone, Copy, Debug, Default)]
pub struct NalgebraBackend;

fn pack(order: Order, rows: usize, cols: usize, a: &[f64], lda: usize) -> DMatrix<f64> {
    match order {
        Order::RowMajor => DMatrix::from_fn(rows, cols, |i, j| a[i * lda + j]),
        Order::ColMajor => DMatrix::from_fn(rows, cols, |i, j| a[j * lda + i]),
    }
}

fn unpack(order: Order, m: &DMatrix<f64>, a: &mut [f64], lda: usize) {
    for i in 0..m.nrows() {
        for j in 0..m.ncols() {
            match order {
                Order::RowMajor => a[i * lda + j] = m[(i, j)],
                Order::ColMajor => a[j * lda + i] = m[(i, j)],
            }
        }
    }
}

fn pack_vec(n: usize, x: &[f64], incx: usize) -> DVector<f64> {
    DVector::from_fn(n, |i, _| x[i * incx])
}

fn unpack_vec(v: &DVector<f64>, y: &mut [f64], incy: usize) {
    for i in 0..v.len() {
        y[i * incy] = v[i];
    }
}

impl LinearBackend for NalgebraBackend {
    fn name(&self) -> &'static str {
        "nalgebra"
    }

    fn gemv(
        &self,
        order: Order,
        trans: Transpose,
        m: usize,
        n: usize,
        alpha: f64,
        a: &[f64],
        lda: usize,
        x: &[f64],
        incx: usize,
        beta: f64,
        y: &mut [f64],
        incy: usize,
    ) {
        let a = pack(order, m, n, a, lda);
        let (xn, yn) = match trans {
            Transpose::NoTrans => (n, m),
            Transpose::Trans => (m, n),
        };
        let xv = pack_vec(xn, x, incx);
        let mut yv = pack_vec(yn, y, incy);
        match trans {
            Transpose::NoTrans => yv.gemv(alpha, &a, &xv, beta),
            Transpose::Trans => yv.gemv_tr(alpha, &a, &xv, beta),
        }
        unpack_vec(&yv, y, incy);
    }

    fn ger(
        &self,
        order: Order,
        m: usize,
        n: usize,
        alpha: f64,
        x: &[f64],
        incx: usize,
        y: &[f64],
        incy: usize,
        a: &mut [f64],
        lda: usize,
    ) {
        let mut av = pack(order, m, n, a, lda);
        let xv = pack_vec(m, x, incx);
        let yv = pack_vec(n, y, incy);
        av.ger(alpha, &xv, &yv, 1.0);
        unpack(order, &av, a, lda);
    }

    fn gemm(
        &self,
        order: Order,
        ta: Transpose,
        tb: Transpose,
        m: usize,
        n: usize,
        k: usize,
        alpha: f64,
        a: &[f64],
        lda: usize,
        b: &[f64],
        ldb: usize,
        beta: f64,
        c: &mut [f64],
        ldc: usize,
    ) {
        let (ar, ac) = match ta {
            Transpose::NoTrans => (m, k),
            Transpose::Trans => (k, m),
        };
        let (br, bc) = match tb {
            Transpose::NoTrans => (k, n),
            Transpose::Trans => (n, k),
        };
        let am = pack(order, ar, ac, a, lda);
        let bm = pack(order, br, bc, b, ldb);
        let a_op = match ta {
            Transpose::NoTrans => am,
            Transpose::Trans => am.transpose(),
        };
        let b_op = match tb {
            Transpose::NoTrans => bm,
            Transpose::Trans => bm.transpose(),
        };
        let mut cm = pack(order, m, n, c, ldc);
        cm.gemm(alpha, &a_op, &b_op, beta);
        unpack(order, &cm, c, ldc);
    }

    fn gesv(
        &self,
        order: Order,
        n: usize,
        nrhs: usize,
        a: &mut [f64],
        lda: usize,
        b: &mut [f64],
        ldb: usize,
    ) -> Result<bool> {
        let am = pack(order, n, n, a, lda);
        let bm = pack(order, n, nrhs, b, ldb);
        match am.lu().solve(&bm) {
            Some(solution) => {
                unpack(order, &solution, b, ldb);
                Ok(true)
            }
            None => {
                debug!("gesv: coefficient matrix is singular at machine precision");
                Ok(false)
            }
        }
    }

    fn gels(
        &self,
        order: Order,
        trans: Transpose,
        m: usize,
        n: usize,
        nrhs: usize,
        a: &mut [f64],
        lda: usize,
        b: &mut [f64],
        ldb: usize,
    ) -> Result<bool> {
        let am = pack(order, m, n, a, lda);
        let a_op = match trans {
            Transpose::NoTrans => am,
            Transpose::Trans => am.transpose(),
        };
        let (rows_op, cols_op) = (a_op.nrows(), a_op.ncols());
        let rhs = pack(order, rows_op, nrhs, b, ldb);
        let svd = a_op.svd(true, true);
        let smax = svd.singular_values.max();
        let eps = smax * f64::EPSILON * rows_op.max(cols_op) as f64;
        if svd.rank(eps) < cols_op {
            debug!("gels: rank-deficient system");
            return Ok(false);
        }
        let solution = svd.solve(&rhs, eps).map_err(|e| Error::backend(e))?;
        unpack(order, &solution, b, ldb);
        Ok(true)
    }

    fn inv(&self, order: Order, n: usize, a: &mut [f64], lda: usize) -> Result<bool> {
        let am = pack(order, n, n, a, lda);
        match am.try_inverse() {
            Some(inverse) => {
                unpack(order, &inverse, a, lda);
                Ok(true)
            }
            None => {
                debug!("inv: matrix is singular at machine precision");
                Ok(false)
            }
        }
    }

    fn det(&self, order: Order, n: usize, a: &[f64], lda: usize) -> Result<f64> {
        let am = pack(order, n, n, a, lda);
        Ok(am.lu().determinant())
    }

    fn gesvd(
        &self,
        order: Order,
        m: usize,
        n: usize,
        a: &[f64],
        lda: usize,
        s: &mut [f64],
        u: Option<&mut [f64]>,
        vt: Option<&mut [f64]>,
    ) -> Result<bool> {
        let am = pack(order, m, n, a, lda);
        let k = m.min(n);
        let svd = match am.try_svd(u.is_some(), vt.is_some(), f64::EPSILON, SVD_MAX_ITER) {
            Some(svd) => svd,
            None => {
                debug!("gesvd: iteration did not converge");
                return Ok(false);
            }
        };
        for (i, sv) in svd.singular_values.iter().enumerate() {
            s[i] = *sv;
        }
        if let Some(dst) = u {
            let um = svd
                .u
                .ok_or_else(|| Error::backend("svd left vectors missing"))?;
            let ld = match order {
                Order::RowMajor => k,
                Order::ColMajor => m,
            };
            unpack(order, &um, dst, ld);
        }
        if let Some(dst) = vt {
            let vm = svd
                .v_t
                .ok_or_else(|| Error::backend("svd right vectors missing"))?;
            let ld = match order {
                Order::RowMajor => n,
                Order::ColMajor => k,
            };
            unpack(order, &vm, dst, ld);
        }
        Ok(true)
    }

    fn gtsv(
        &self,
        n: usize,
        dl: &mut [f64],
        d: &mut [f64],
        du: &mut [f64],
        b: &mut [f64],
    ) -> Result<bool> {
        debug_assert!(n >= 1);
        debug_assert!(dl.len() + 1 >= n && du.len() + 1 >= n);
        debug_assert!(d.len() >= n && b.len() >= n);

        // Gaussian elimination with partial pivoting, the dgtsv scheme; du2
        // holds the second super-diagonal fill-in created by row interchanges.
        let mut du2 = vec![0.0; n.saturating_sub(2)];
        for i in 0..n.saturating_sub(1) {
            if d[i].abs() >= dl[i].abs() {
                if d[i] == 0.0 {
                    return Ok(false);
                }
                let fact = dl[i] / d[i];
                d[i + 1] -= fact * du[i];
                b[i + 1] -= fact * b[i];
            } else {
                let fact = d[i] / dl[i];
                d[i] = dl[i];
                let temp = d[i + 1];
                d[i + 1] = du[i] - fact * temp;
                if i + 2 < n {
                    du2[i] = du[i + 1];
                    du[i + 1] = -fact * du2[i];
                }
                du[i] = temp;
                let tb = b[i];
                b[i] = b[i + 1];
                b[i + 1] = tb - fact * b[i + 1];
            }
        }
        if d[n - 1] == 0.0 {
            return Ok(false);
        }

        b[n - 1] /= d[n - 1];
        if n > 1 {
            b[n - 2] = (b[n - 2] - du[n - 2] * b[n - 1]) / d[n - 2];
        }
        for i in (0..n.saturating_sub(2)).rev() {
            b[i] = (b[i] - du[i] * b[i + 1] - du2[i] * b[i + 2]) / d[i];
        }
        Ok(true)
    }
}
