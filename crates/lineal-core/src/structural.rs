//! Serialization of matrices into vectors and back.

use crate::buffer::Buffer;
use crate::error::{Error, Result};
use crate::matrix::Matrix;
use crate::span::RawSpan;
use crate::vector::Vector;

fn copy_span(src: &Buffer, s: RawSpan, dst: &Buffer, d: RawSpan) {
    debug_assert_eq!(s.len, d.len);
    if src.shares(dst) {
        src.with_mut(|data| {
            for i in 0..s.len {
                data[d.offset + i * d.stride] = data[s.offset + i * s.stride];
            }
        });
    } else {
        src.with(|s_data| {
            dst.with_mut(|d_data| {
                for i in 0..s.len {
                    d_data[d.offset + i * d.stride] = s_data[s.offset + i * s.stride];
                }
            });
        });
    }
}

/// Serialize the major-order vectors of the given matrices, in argument
/// order, into consecutive slots of `dest`.
///
/// Fails when a matrix does not fit into the remaining space or the total
/// element count does not exactly match the target length.
pub fn unwind(sources: &[Matrix], dest: &Vector) -> Result<()> {
    let span = dest.raw_span();
    let mut at = 0;
    for (argn, m) in sources.iter().enumerate() {
        let count = m.rows() * m.cols();
        if at + count > dest.len() {
            return Err(Error::dimension(
                dest.len() - at,
                count,
                format!("unwind source {argn}"),
            ));
        }
        for i in 0..m.major_dim() {
            copy_span(
                m.buffer(),
                m.major_span(i),
                dest.buffer(),
                RawSpan {
                    offset: span.offset + at * span.stride,
                    stride: span.stride,
                    len: m.minor_dim(),
                },
            );
            at += m.minor_dim();
        }
    }
    if at != dest.len() {
        return Err(Error::dimension(dest.len(), at, "unwind total"));
    }
    Ok(())
}

/// Deserialize consecutive slots of `src` into the major-order vectors of the
/// given matrices, in argument order; the inverse of [`unwind`].
pub fn reshape(src: &Vector, dests: &[Matrix]) -> Result<()> {
    let span = src.raw_span();
    let mut at = 0;
    for (argn, m) in dests.iter().enumerate() {
        let count = m.rows() * m.cols();
        if at + count > src.len() {
            return Err(Error::dimension(
                src.len() - at,
                count,
                format!("reshape target {argn}"),
            ));
        }
        for i in 0..m.major_dim() {
            copy_span(
                src.buffer(),
                RawSpan {
                    offset: span.offset + at * span.stride,
                    stride: span.stride,
                    len: m.minor_dim(),
                },
                m.buffer(),
                m.major_span(i),
            );
            at += m.minor_dim();
        }
    }
    if at != src.len() {
        return Err(Error::dimension(src.len(), at, "reshape total"));
    }
    Ok(())
}
