//! Compute kernels, one module per operation family.
//!
//! Entry points share one shape: log the call, validate, honor size-query
//! mode, resolve the scalar operands, then run the kernel per batch instance
//! with optional numerics-guard scans around it. Kernels are element-parallel
//! over their output inside an instance; the batch loop is sequential.

pub(crate) mod gemm;
pub(crate) mod gemv;
pub(crate) mod ger;
pub(crate) mod level1;
pub(crate) mod symv;
pub(crate) mod syrk;
pub(crate) mod trmv;
pub(crate) mod trsm;

use crate::batch::{neg_inc_offset, vec_index};
use crate::layout::general_offset;
use crate::scalar::Scalar;

/// Write `alpha * acc + beta * old` into `slot`.
///
/// When `beta == 0` the slot is overwritten without being read, so an output
/// holding NaN or uninitialized garbage still produces a clean result.
///
/// # Safety
/// `slot` must be valid for reads and writes and not accessed concurrently.
#[inline(always)]
pub(crate) unsafe fn store_scaled<T: Scalar>(slot: *mut T, acc: T, alpha: T, beta: T) {
    if beta.is_zero() {
        *slot = alpha * acc;
    } else {
        *slot = alpha * acc + beta * *slot;
    }
}

/// Scale a strided vector in place. `beta == 0` writes exact zeros and
/// `beta == 1` leaves the data untouched, NaN payloads included.
pub(crate) fn scale_strided<T: Scalar>(n: usize, inc: isize, data: &mut [T], beta: T) {
    if beta.is_one() {
        return;
    }
    let base = neg_inc_offset(n, inc);
    if beta.is_zero() {
        for j in 0..n {
            data[vec_index(base, j, inc)] = T::zero();
        }
    } else {
        for j in 0..n {
            let idx = vec_index(base, j, inc);
            data[idx] = beta * data[idx];
        }
    }
}

/// Scale a general column-major matrix in place. `beta == 0` writes zeros.
pub(crate) fn scale_general<T: Scalar>(
    rows: usize,
    cols: usize,
    lda: usize,
    data: &mut [T],
    beta: T,
) {
    if beta.is_one() {
        return;
    }
    for col in 0..cols {
        for row in 0..rows {
            let idx = general_offset(row, col, lda);
            if beta.is_zero() {
                data[idx] = T::zero();
            } else {
                data[idx] = beta * data[idx];
            }
        }
    }
}

/// Scale the stored triangle of a matrix in place, forcing the diagonal real
/// when the operand is Hermitian.
pub(crate) fn scale_triangle<T: Scalar>(
    upper: bool,
    n: usize,
    lda: usize,
    data: &mut [T],
    beta: T,
    hermitian: bool,
) {
    // Hermitian outputs still need the diagonal forced real at beta == 1.
    if beta.is_one() && !hermitian {
        return;
    }
    for col in 0..n {
        let (lo, hi) = if upper { (0, col + 1) } else { (col, n) };
        for row in lo..hi {
            let idx = general_offset(row, col, lda);
            let v = if beta.is_zero() {
                T::zero()
            } else {
                beta * data[idx]
            };
            data[idx] = if hermitian && row == col {
                v.force_real()
            } else {
                v
            };
        }
    }
}
