//! Program functions over views: backend-forwarded linear algebra plus the
//! bespoke covariance/correlation kernels.
//!
//! Read-only matrix and vector operands are copied into packed scratch before
//! the backend call; the written operand is accessed through its view, so the
//! result lands in the caller's buffer with the view's own leading dimension
//! and stride.

use log::debug;

use crate::backend::{LinearBackend, Transpose};
use crate::error::{Error, Result};
use crate::matrix::Matrix;
use crate::vector::Vector;

/// Packed copy of a matrix region: major vectors end to end, leading
/// dimension equal to the minor extent.
fn packed(a: &Matrix) -> Vec<f64> {
    a.buffer().with(|data| {
        let minor = a.minor_dim();
        let mut out = Vec::with_capacity(a.major_dim() * minor);
        for i in 0..a.major_dim() {
            let s = a.major_span(i);
            out.extend_from_slice(&data[s.offset..s.offset + minor]);
        }
        out
    })
}

/// Write a packed buffer produced by the backend back through a view.
fn write_packed(dst: &Matrix, packed: &[f64]) {
    let minor = dst.minor_dim();
    dst.buffer().with_mut(|data| {
        for i in 0..dst.major_dim() {
            let s = dst.major_span(i);
            data[s.offset..s.offset + minor].copy_from_slice(&packed[i * minor..(i + 1) * minor]);
        }
    });
}

/// Column of a matrix copied out in order, independent of storage order.
fn column(a: &Matrix, j: usize) -> Vec<f64> {
    a.buffer().with(|data| {
        let s = a.col_span(j);
        (0..s.len).map(|i| data[s.offset + i * s.stride]).collect()
    })
}

/// Dot product of two equal-length vectors.
pub fn dot<B: LinearBackend>(backend: &B, x: &Vector, y: &Vector) -> Result<f64> {
    if y.len() != x.len() {
        return Err(Error::dimension(x.len(), y.len(), "dot operand"));
    }
    Ok(x.buffer().with(|xd| {
        y.buffer().with(|yd| {
            backend.dot(
                x.len(),
                &xd[x.offset()..],
                x.stride(),
                &yd[y.offset()..],
                y.stride(),
            )
        })
    }))
}

/// Rank-one update `a <- alpha * x * y^T + a`.
pub fn ger<B: LinearBackend>(
    backend: &B,
    x: &Vector,
    y: &Vector,
    a: &Matrix,
    alpha: f64,
) -> Result<()> {
    if x.len() != a.rows() {
        return Err(Error::dimension(a.rows(), x.len(), "ger x"));
    }
    if y.len() != a.cols() {
        return Err(Error::dimension(a.cols(), y.len(), "ger y"));
    }
    let xv = x.to_vec();
    let yv = y.to_vec();
    a.buffer().with_mut(|data| {
        backend.ger(
            a.order(),
            a.rows(),
            a.cols(),
            alpha,
            &xv,
            1,
            &yv,
            1,
            &mut data[a.offset()..],
            a.ld(),
        );
    });
    Ok(())
}

/// `y <- alpha * op(a) * x + beta * y`.
pub fn gemv<B: LinearBackend>(
    backend: &B,
    a: &Matrix,
    x: &Vector,
    y: &Vector,
    trans: Transpose,
    alpha: f64,
    beta: f64,
) -> Result<()> {
    let (m, n) = match trans {
        Transpose::NoTrans => (a.rows(), a.cols()),
        Transpose::Trans => (a.cols(), a.rows()),
    };
    if x.len() != n {
        return Err(Error::dimension(n, x.len(), "gemv x"));
    }
    if y.len() != m {
        return Err(Error::dimension(m, y.len(), "gemv y"));
    }
    let ap = packed(a);
    let xv = x.to_vec();
    y.buffer().with_mut(|data| {
        backend.gemv(
            a.order(),
            trans,
            a.rows(),
            a.cols(),
            alpha,
            &ap,
            a.minor_dim(),
            &xv,
            1,
            beta,
            &mut data[y.offset()..],
            y.stride(),
        );
    });
    Ok(())
}

/// `c <- alpha * op(a) * op(b) + beta * c`; all three orders must match.
pub fn gemm<B: LinearBackend>(
    backend: &B,
    a: &Matrix,
    b: &Matrix,
    c: &Matrix,
    ta: Transpose,
    tb: Transpose,
    alpha: f64,
    beta: f64,
) -> Result<()> {
    if b.order() != a.order() {
        return Err(Error::order("gemm b"));
    }
    if c.order() != a.order() {
        return Err(Error::order("gemm c"));
    }
    let m = match ta {
        Transpose::NoTrans => a.rows(),
        Transpose::Trans => a.cols(),
    };
    let ka = match ta {
        Transpose::NoTrans => a.cols(),
        Transpose::Trans => a.rows(),
    };
    let n = match tb {
        Transpose::NoTrans => b.cols(),
        Transpose::Trans => b.rows(),
    };
    let kb = match tb {
        Transpose::NoTrans => b.rows(),
        Transpose::Trans => b.cols(),
    };
    if ka != kb {
        return Err(Error::dimension(ka, kb, "gemm inner extent"));
    }
    if c.rows() != m || c.cols() != n {
        return Err(Error::dimension(m * n, c.rows() * c.cols(), "gemm c"));
    }
    let ap = packed(a);
    let bp = packed(b);
    c.buffer().with_mut(|data| {
        backend.gemm(
            a.order(),
            ta,
            tb,
            m,
            n,
            ka,
            alpha,
            &ap,
            a.minor_dim(),
            &bp,
            b.minor_dim(),
            beta,
            &mut data[c.offset()..],
            c.ld(),
        );
    });
    Ok(())
}

/// Solve `a * x = b`, writing the solution over `b`.
///
/// Returns `Ok(false)` when the coefficient matrix is singular at machine
/// precision; `a` itself is left untouched.
pub fn gesv<B: LinearBackend>(backend: &B, a: &Matrix, b: &Matrix) -> Result<bool> {
    if a.rows() != a.cols() {
        return Err(Error::dimension(a.rows(), a.cols(), "gesv a"));
    }
    if b.order() != a.order() {
        return Err(Error::order("gesv b"));
    }
    if b.rows() != a.rows() {
        return Err(Error::dimension(a.rows(), b.rows(), "gesv b"));
    }
    let mut ap = packed(a);
    b.buffer().with_mut(|data| {
        backend.gesv(
            a.order(),
            a.rows(),
            b.cols(),
            &mut ap,
            a.minor_dim(),
            &mut data[b.offset()..],
            b.ld(),
        )
    })
}

/// Least-squares solve of `op(a) * x = b`.
///
/// `b` must have `max(rows, cols)` rows; the solution occupies its leading
/// rows. Returns `Ok(false)` when `a` is rank deficient.
pub fn gels<B: LinearBackend>(
    backend: &B,
    a: &Matrix,
    b: &Matrix,
    trans: Transpose,
) -> Result<bool> {
    if b.order() != a.order() {
        return Err(Error::order("gels b"));
    }
    let expected = a.rows().max(a.cols());
    if b.rows() != expected {
        return Err(Error::dimension(expected, b.rows(), "gels b"));
    }
    let mut ap = packed(a);
    b.buffer().with_mut(|data| {
        backend.gels(
            a.order(),
            trans,
            a.rows(),
            a.cols(),
            b.cols(),
            &mut ap,
            a.minor_dim(),
            &mut data[b.offset()..],
            b.ld(),
        )
    })
}

/// Invert a square matrix in place.
///
/// Returns `Ok(false)` and leaves `a` unchanged when it is singular at
/// machine precision.
pub fn inv<B: LinearBackend>(backend: &B, a: &Matrix) -> Result<bool> {
    if a.rows() != a.cols() {
        return Err(Error::dimension(a.rows(), a.cols(), "inv a"));
    }
    let mut ap = packed(a);
    if !backend.inv(a.order(), a.rows(), &mut ap, a.minor_dim())? {
        return Ok(false);
    }
    write_packed(a, &ap);
    Ok(true)
}

/// LU-based determinant of a square matrix; `0.0` when singular.
pub fn det<B: LinearBackend>(backend: &B, a: &Matrix) -> Result<f64> {
    if a.rows() != a.cols() {
        return Err(Error::dimension(a.rows(), a.cols(), "det a"));
    }
    a.buffer()
        .with(|data| backend.det(a.order(), a.rows(), &data[a.offset()..], a.ld()))
}

/// Economy singular value decomposition.
///
/// Writes the singular values into `s` (length `min(rows, cols)`) and, when
/// requested, the left vectors into `u` (`rows x min`) and the transposed
/// right vectors into `vt` (`min x cols`). Returns `Ok(false)` when the
/// decomposition does not converge.
pub fn svd<B: LinearBackend>(
    backend: &B,
    a: &Matrix,
    s: &Vector,
    u: Option<&Matrix>,
    vt: Option<&Matrix>,
) -> Result<bool> {
    let (m, n) = (a.rows(), a.cols());
    let k = m.min(n);
    if s.len() != k {
        return Err(Error::dimension(k, s.len(), "svd s"));
    }
    if let Some(u) = u {
        if u.order() != a.order() {
            return Err(Error::order("svd u"));
        }
        if u.rows() != m || u.cols() != k {
            return Err(Error::dimension(m * k, u.rows() * u.cols(), "svd u"));
        }
    }
    if let Some(vt) = vt {
        if vt.order() != a.order() {
            return Err(Error::order("svd vt"));
        }
        if vt.rows() != k || vt.cols() != n {
            return Err(Error::dimension(k * n, vt.rows() * vt.cols(), "svd vt"));
        }
    }
    let ap = packed(a);
    let mut sv = vec![0.0; k];
    let mut uv = u.map(|_| vec![0.0; m * k]);
    let mut vtv = vt.map(|_| vec![0.0; k * n]);
    let ok = backend.gesvd(
        a.order(),
        m,
        n,
        &ap,
        a.minor_dim(),
        &mut sv,
        uv.as_deref_mut(),
        vtv.as_deref_mut(),
    )?;
    if !ok {
        debug!("svd: backend did not converge");
        return Ok(false);
    }
    for (i, value) in sv.iter().enumerate() {
        s.set(i, *value)?;
    }
    if let (Some(dst), Some(data)) = (u, &uv) {
        write_packed(dst, data);
    }
    if let (Some(dst), Some(data)) = (vt, &vtv) {
        write_packed(dst, data);
    }
    Ok(true)
}

/// Covariance matrix of the columns of `a`, written symmetrically into the
/// square matrix `b`.
pub fn cov(a: &Matrix, b: &Matrix, ddof: usize) -> Result<()> {
    if b.rows() != a.cols() {
        return Err(Error::dimension(a.cols(), b.rows(), "covariance target"));
    }
    if b.rows() != b.cols() {
        return Err(Error::dimension(b.rows(), b.cols(), "covariance target"));
    }
    if ddof >= a.rows() {
        return Err(Error::argument(format!(
            "ddof {ddof} out of range for {} observations",
            a.rows()
        )));
    }
    let rows = a.rows() as f64;
    let vars: Vec<Vec<f64>> = (0..a.cols()).map(|j| column(a, j)).collect();
    let means: Vec<f64> = vars.iter().map(|c| c.iter().sum::<f64>() / rows).collect();
    for i in 0..a.cols() {
        for j in i..a.cols() {
            let sum: f64 = vars[i]
                .iter()
                .zip(vars[j].iter())
                .map(|(&vi, &vj)| (vi - means[i]) * (vj - means[j]))
                .sum();
            let value = sum / (a.rows() - ddof) as f64;
            b.set(i, j, value)?;
            b.set(j, i, value)?;
        }
    }
    Ok(())
}

/// Pearson product-moment correlation of the columns of `a`, written
/// symmetrically into the square matrix `b`.
pub fn corr(a: &Matrix, b: &Matrix) -> Result<()> {
    if b.rows() != a.cols() {
        return Err(Error::dimension(a.cols(), b.rows(), "correlation target"));
    }
    if b.rows() != b.cols() {
        return Err(Error::dimension(b.rows(), b.cols(), "correlation target"));
    }
    let rows = a.rows() as f64;
    let vars: Vec<Vec<f64>> = (0..a.cols()).map(|j| column(a, j)).collect();
    let means: Vec<f64> = vars.iter().map(|c| c.iter().sum::<f64>() / rows).collect();
    let norms: Vec<f64> = vars
        .iter()
        .zip(means.iter())
        .map(|(c, &m)| c.iter().map(|&v| (v - m) * (v - m)).sum::<f64>().sqrt())
        .collect();
    for i in 0..a.cols() {
        for j in i..a.cols() {
            let sum: f64 = vars[i]
                .iter()
                .zip(vars[j].iter())
                .map(|(&vi, &vj)| (vi - means[i]) * (vj - means[j]))
                .sum();
            let value = sum / (norms[i] * norms[j]);
            b.set(i, j, value)?;
            b.set(j, i, value)?;
        }
    }
    Ok(())
}
