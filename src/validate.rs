//! Per-operation argument validation and the quick-return policy.
//!
//! Every entry point funnels through one `*_args` function here before any
//! kernel work. The check ordering is a contract, reproduced exactly by the
//! conformance tests:
//!
//! 1. enum/mode validity: a pointer-mode mismatch or an operation-specific
//!    enum restriction (e.g. `herk` with `Trans`) always wins, even over
//!    size errors;
//! 2. size and stride checks: zero vector increments, negative batch
//!    strides, insufficient leading dimensions;
//! 3. degenerate-dimension quick return: `n == 0` or `batch_count == 0`
//!    succeeds before any operand is inspected;
//! 4. pointer nullability, contingent on the *host-resident* values of
//!    alpha/beta: with host pointer mode and `alpha == 0` the read operands
//!    may be absent, and with additionally `beta == 1` the output may be
//!    absent too (pure no-op). With device pointer mode the scalars cannot
//!    be inspected, so every non-scalar operand is required and the
//!    shortcut moves into the kernel as a runtime branch. Span checks on
//!    present operands also live in this step, since they presuppose
//!    presence.

use crate::batch::{BatchMut, BatchRef};
use crate::context::Context;
use crate::layout::{Side, Transpose, Uplo};
use crate::scalar::{Scalar, ScalarArg};
use crate::{BlasError, Result};

/// Outcome of a successful validation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Launch {
    /// Proceed to dispatch and kernel execution.
    Go,
    /// Degenerate or no-op call: return success without touching memory.
    QuickReturn,
}

// ============================================================================
// Shared checks
// ============================================================================

fn check_mode<T: Copy>(ctx: &Context, s: &ScalarArg<'_, T>, name: &'static str) -> Result<()> {
    if s.mode() != ctx.pointer_mode() {
        return Err(BlasError::InvalidValue(name));
    }
    Ok(())
}

fn check_inc(inc: isize, name: &'static str) -> Result<()> {
    if inc == 0 {
        return Err(BlasError::InvalidSize(name));
    }
    Ok(())
}

fn stride_ok<T>(x: Option<&BatchRef<'_, T>>, name: &'static str) -> Result<()> {
    if let Some(s) = x.and_then(|x| x.stride()) {
        if s < 0 {
            return Err(BlasError::InvalidSize(name));
        }
    }
    Ok(())
}

fn stride_ok_mut<T>(x: Option<&BatchMut<'_, T>>, name: &'static str) -> Result<()> {
    if let Some(s) = x.and_then(|x| x.stride()) {
        if s < 0 {
            return Err(BlasError::InvalidSize(name));
        }
    }
    Ok(())
}

/// Elements a vector of `n` logical entries at increment `inc` spans.
pub(crate) fn vec_span(n: usize, inc: isize) -> usize {
    if n == 0 {
        0
    } else {
        (n - 1) * inc.unsigned_abs() + 1
    }
}

/// Elements a `rows x cols` general matrix at leading dimension `lda` spans.
pub(crate) fn mat_span(rows: usize, cols: usize, lda: usize) -> usize {
    if rows == 0 || cols == 0 {
        0
    } else {
        (cols - 1) * lda + rows
    }
}

fn require<'x, 'a, T>(
    x: Option<&'x BatchRef<'a, T>>,
    name: &'static str,
) -> Result<&'x BatchRef<'a, T>> {
    x.ok_or(BlasError::InvalidPointer(name))
}

fn require_mut<'x, 'a, T>(
    x: Option<&'x BatchMut<'a, T>>,
    name: &'static str,
) -> Result<&'x BatchMut<'a, T>> {
    x.ok_or(BlasError::InvalidPointer(name))
}

fn check_in<T>(
    x: &BatchRef<'_, T>,
    need: usize,
    batch_count: usize,
    name: &'static str,
) -> Result<()> {
    if let Some(count) = x.pointer_count() {
        if count < batch_count {
            return Err(BlasError::InvalidPointer(name));
        }
    }
    if x.min_len(batch_count) < need {
        return Err(BlasError::InvalidSize(name));
    }
    Ok(())
}

fn check_out<T>(
    x: &BatchMut<'_, T>,
    need: usize,
    batch_count: usize,
    name: &'static str,
) -> Result<()> {
    if let Some(count) = x.pointer_count() {
        if count < batch_count {
            return Err(BlasError::InvalidPointer(name));
        }
    }
    x.check_output_shape(batch_count, name)?;
    if x.min_len(batch_count) < need {
        return Err(BlasError::InvalidSize(name));
    }
    Ok(())
}

fn host_is_zero<T: Scalar>(s: &ScalarArg<'_, T>) -> bool {
    matches!(s.host_value(), Some(v) if v.is_zero())
}

fn host_is_one<T: Scalar>(s: &ScalarArg<'_, T>) -> bool {
    matches!(s.host_value(), Some(v) if v.is_one())
}

// ============================================================================
// Level 1
// ============================================================================

pub(crate) fn scal_args<T: Scalar, A: Scalar>(
    ctx: &Context,
    n: usize,
    alpha: &ScalarArg<'_, A>,
    x: Option<&BatchMut<'_, T>>,
    incx: isize,
    batch_count: usize,
) -> Result<Launch> {
    check_mode(ctx, alpha, "alpha")?;
    check_inc(incx, "incx")?;
    stride_ok_mut(x, "x")?;
    // scal follows the reference convention: a negative increment is a
    // documented no-op, not an error.
    if n == 0 || batch_count == 0 || incx < 0 {
        return Ok(Launch::QuickReturn);
    }
    // x is written even when alpha == 0 (zero-fill), so it is always
    // required past the quick returns.
    let x = require_mut(x, "x")?;
    check_out(x, vec_span(n, incx), batch_count, "x")?;
    Ok(Launch::Go)
}

pub(crate) fn axpy_args<T: Scalar>(
    ctx: &Context,
    n: usize,
    alpha: &ScalarArg<'_, T>,
    x: Option<&BatchRef<'_, T>>,
    incx: isize,
    y: Option<&BatchMut<'_, T>>,
    incy: isize,
    batch_count: usize,
) -> Result<Launch> {
    check_mode(ctx, alpha, "alpha")?;
    check_inc(incx, "incx")?;
    check_inc(incy, "incy")?;
    stride_ok(x, "x")?;
    stride_ok_mut(y, "y")?;
    if n == 0 || batch_count == 0 {
        return Ok(Launch::QuickReturn);
    }
    if host_is_zero(alpha) {
        // y += 0 * x is a pure no-op; both operands may be absent.
        return Ok(Launch::QuickReturn);
    }
    let x = require(x, "x")?;
    let y = require_mut(y, "y")?;
    check_in(x, vec_span(n, incx), batch_count, "x")?;
    check_out(y, vec_span(n, incy), batch_count, "y")?;
    Ok(Launch::Go)
}

pub(crate) fn copy_args<T>(
    n: usize,
    x: Option<&BatchRef<'_, T>>,
    incx: isize,
    y: Option<&BatchMut<'_, T>>,
    incy: isize,
    batch_count: usize,
) -> Result<Launch> {
    check_inc(incx, "incx")?;
    check_inc(incy, "incy")?;
    stride_ok(x, "x")?;
    stride_ok_mut(y, "y")?;
    if n == 0 || batch_count == 0 {
        return Ok(Launch::QuickReturn);
    }
    let x = require(x, "x")?;
    let y = require_mut(y, "y")?;
    check_in(x, vec_span(n, incx), batch_count, "x")?;
    check_out(y, vec_span(n, incy), batch_count, "y")?;
    Ok(Launch::Go)
}

pub(crate) fn swap_args<T>(
    n: usize,
    x: Option<&BatchMut<'_, T>>,
    incx: isize,
    y: Option<&BatchMut<'_, T>>,
    incy: isize,
    batch_count: usize,
) -> Result<Launch> {
    check_inc(incx, "incx")?;
    check_inc(incy, "incy")?;
    stride_ok_mut(x, "x")?;
    stride_ok_mut(y, "y")?;
    if n == 0 || batch_count == 0 {
        return Ok(Launch::QuickReturn);
    }
    let x = require_mut(x, "x")?;
    let y = require_mut(y, "y")?;
    check_out(x, vec_span(n, incx), batch_count, "x")?;
    check_out(y, vec_span(n, incy), batch_count, "y")?;
    Ok(Launch::Go)
}

pub(crate) fn dot_args<T>(
    n: usize,
    x: Option<&BatchRef<'_, T>>,
    incx: isize,
    y: Option<&BatchRef<'_, T>>,
    incy: isize,
    result_len: usize,
    batch_count: usize,
) -> Result<Launch> {
    check_inc(incx, "incx")?;
    check_inc(incy, "incy")?;
    stride_ok(x, "x")?;
    stride_ok(y, "y")?;
    if result_len < batch_count {
        return Err(BlasError::InvalidSize("result"));
    }
    if batch_count == 0 || n == 0 {
        return Ok(Launch::QuickReturn);
    }
    let x = require(x, "x")?;
    let y = require(y, "y")?;
    check_in(x, vec_span(n, incx), batch_count, "x")?;
    check_in(y, vec_span(n, incy), batch_count, "y")?;
    Ok(Launch::Go)
}

/// Shared by nrm2/asum/iamax: one input vector, one per-batch result slot.
pub(crate) fn reduce_args<T>(
    n: usize,
    x: Option<&BatchRef<'_, T>>,
    incx: isize,
    result_len: usize,
    batch_count: usize,
) -> Result<Launch> {
    check_inc(incx, "incx")?;
    stride_ok(x, "x")?;
    if result_len < batch_count {
        return Err(BlasError::InvalidSize("result"));
    }
    if batch_count == 0 || n == 0 || incx < 0 {
        return Ok(Launch::QuickReturn);
    }
    let x = require(x, "x")?;
    check_in(x, vec_span(n, incx), batch_count, "x")?;
    Ok(Launch::Go)
}

// ============================================================================
// Level 2
// ============================================================================

#[allow(clippy::too_many_arguments)]
pub(crate) fn gemv_args<T: Scalar>(
    ctx: &Context,
    trans: Transpose,
    m: usize,
    n: usize,
    alpha: &ScalarArg<'_, T>,
    a: Option<&BatchRef<'_, T>>,
    lda: usize,
    x: Option<&BatchRef<'_, T>>,
    incx: isize,
    beta: &ScalarArg<'_, T>,
    y: Option<&BatchMut<'_, T>>,
    incy: isize,
    batch_count: usize,
) -> Result<Launch> {
    check_mode(ctx, alpha, "alpha")?;
    check_mode(ctx, beta, "beta")?;
    check_inc(incx, "incx")?;
    check_inc(incy, "incy")?;
    if lda < m.max(1) {
        return Err(BlasError::InvalidSize("lda"));
    }
    stride_ok(a, "a")?;
    stride_ok(x, "x")?;
    stride_ok_mut(y, "y")?;
    if m == 0 || n == 0 || batch_count == 0 {
        return Ok(Launch::QuickReturn);
    }
    let (ydim, xdim) = match trans {
        Transpose::NoTrans => (m, n),
        _ => (n, m),
    };
    let alpha_zero = host_is_zero(alpha);
    if alpha_zero && host_is_one(beta) {
        return Ok(Launch::QuickReturn);
    }
    if !alpha_zero {
        let a = require(a, "a")?;
        let x = require(x, "x")?;
        check_in(a, mat_span(m, n, lda), batch_count, "a")?;
        check_in(x, vec_span(xdim, incx), batch_count, "x")?;
    }
    let y = require_mut(y, "y")?;
    check_out(y, vec_span(ydim, incy), batch_count, "y")?;
    Ok(Launch::Go)
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn gbmv_args<T: Scalar>(
    ctx: &Context,
    trans: Transpose,
    m: usize,
    n: usize,
    kl: usize,
    ku: usize,
    alpha: &ScalarArg<'_, T>,
    a: Option<&BatchRef<'_, T>>,
    lda: usize,
    x: Option<&BatchRef<'_, T>>,
    incx: isize,
    beta: &ScalarArg<'_, T>,
    y: Option<&BatchMut<'_, T>>,
    incy: isize,
    batch_count: usize,
) -> Result<Launch> {
    check_mode(ctx, alpha, "alpha")?;
    check_mode(ctx, beta, "beta")?;
    check_inc(incx, "incx")?;
    check_inc(incy, "incy")?;
    if lda < kl + ku + 1 {
        return Err(BlasError::InvalidSize("lda"));
    }
    stride_ok(a, "a")?;
    stride_ok(x, "x")?;
    stride_ok_mut(y, "y")?;
    if m == 0 || n == 0 || batch_count == 0 {
        return Ok(Launch::QuickReturn);
    }
    let (ydim, xdim) = match trans {
        Transpose::NoTrans => (m, n),
        _ => (n, m),
    };
    let alpha_zero = host_is_zero(alpha);
    if alpha_zero && host_is_one(beta) {
        return Ok(Launch::QuickReturn);
    }
    if !alpha_zero {
        let a = require(a, "a")?;
        let x = require(x, "x")?;
        check_in(a, mat_span(kl + ku + 1, n, lda), batch_count, "a")?;
        check_in(x, vec_span(xdim, incx), batch_count, "x")?;
    }
    let y = require_mut(y, "y")?;
    check_out(y, vec_span(ydim, incy), batch_count, "y")?;
    Ok(Launch::Go)
}

/// Storage of the half-stored matrix operand in the symv/hemv family.
#[derive(Debug, Clone, Copy)]
pub(crate) enum SymStorage {
    Full { lda: usize },
    Banded { k: usize, lda: usize },
    Packed,
}

impl SymStorage {
    fn min_lda_ok(&self, n: usize) -> bool {
        match *self {
            SymStorage::Full { lda } => lda >= n.max(1),
            SymStorage::Banded { k, lda } => lda >= k + 1,
            SymStorage::Packed => true,
        }
    }

    fn span(&self, n: usize) -> usize {
        match *self {
            SymStorage::Full { lda } => mat_span(n, n, lda),
            SymStorage::Banded { k, lda } => mat_span(k + 1, n, lda),
            SymStorage::Packed => n * (n + 1) / 2,
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn symv_args<T: Scalar>(
    ctx: &Context,
    _uplo: Uplo,
    n: usize,
    storage: SymStorage,
    alpha: &ScalarArg<'_, T>,
    a: Option<&BatchRef<'_, T>>,
    x: Option<&BatchRef<'_, T>>,
    incx: isize,
    beta: &ScalarArg<'_, T>,
    y: Option<&BatchMut<'_, T>>,
    incy: isize,
    batch_count: usize,
) -> Result<Launch> {
    check_mode(ctx, alpha, "alpha")?;
    check_mode(ctx, beta, "beta")?;
    check_inc(incx, "incx")?;
    check_inc(incy, "incy")?;
    if !storage.min_lda_ok(n) {
        return Err(BlasError::InvalidSize("lda"));
    }
    stride_ok(a, "a")?;
    stride_ok(x, "x")?;
    stride_ok_mut(y, "y")?;
    if n == 0 || batch_count == 0 {
        return Ok(Launch::QuickReturn);
    }
    let alpha_zero = host_is_zero(alpha);
    if alpha_zero && host_is_one(beta) {
        return Ok(Launch::QuickReturn);
    }
    if !alpha_zero {
        let a = require(a, "a")?;
        let x = require(x, "x")?;
        check_in(a, storage.span(n), batch_count, "a")?;
        check_in(x, vec_span(n, incx), batch_count, "x")?;
    }
    let y = require_mut(y, "y")?;
    check_out(y, vec_span(n, incy), batch_count, "y")?;
    Ok(Launch::Go)
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn trmv_args<T>(
    n: usize,
    a: Option<&BatchRef<'_, T>>,
    lda: usize,
    x: Option<&BatchMut<'_, T>>,
    incx: isize,
    batch_count: usize,
) -> Result<Launch> {
    check_inc(incx, "incx")?;
    if lda < n.max(1) {
        return Err(BlasError::InvalidSize("lda"));
    }
    stride_ok(a, "a")?;
    stride_ok_mut(x, "x")?;
    if n == 0 || batch_count == 0 {
        return Ok(Launch::QuickReturn);
    }
    let a = require(a, "a")?;
    let x = require_mut(x, "x")?;
    check_in(a, mat_span(n, n, lda), batch_count, "a")?;
    check_out(x, vec_span(n, incx), batch_count, "x")?;
    Ok(Launch::Go)
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn ger_args<T: Scalar>(
    ctx: &Context,
    m: usize,
    n: usize,
    alpha: &ScalarArg<'_, T>,
    x: Option<&BatchRef<'_, T>>,
    incx: isize,
    y: Option<&BatchRef<'_, T>>,
    incy: isize,
    a: Option<&BatchMut<'_, T>>,
    lda: usize,
    batch_count: usize,
) -> Result<Launch> {
    check_mode(ctx, alpha, "alpha")?;
    check_inc(incx, "incx")?;
    check_inc(incy, "incy")?;
    if lda < m.max(1) {
        return Err(BlasError::InvalidSize("lda"));
    }
    stride_ok(x, "x")?;
    stride_ok(y, "y")?;
    stride_ok_mut(a, "a")?;
    if m == 0 || n == 0 || batch_count == 0 {
        return Ok(Launch::QuickReturn);
    }
    if host_is_zero(alpha) {
        // A += 0 * x yᵀ leaves A untouched.
        return Ok(Launch::QuickReturn);
    }
    let x = require(x, "x")?;
    let y = require(y, "y")?;
    let a = require_mut(a, "a")?;
    check_in(x, vec_span(m, incx), batch_count, "x")?;
    check_in(y, vec_span(n, incy), batch_count, "y")?;
    check_out(a, mat_span(m, n, lda), batch_count, "a")?;
    Ok(Launch::Go)
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn syr_args<T: Scalar, A: Scalar>(
    ctx: &Context,
    _uplo: Uplo,
    n: usize,
    alpha: &ScalarArg<'_, A>,
    x: Option<&BatchRef<'_, T>>,
    incx: isize,
    a: Option<&BatchMut<'_, T>>,
    lda: usize,
    batch_count: usize,
) -> Result<Launch> {
    check_mode(ctx, alpha, "alpha")?;
    check_inc(incx, "incx")?;
    if lda < n.max(1) {
        return Err(BlasError::InvalidSize("lda"));
    }
    stride_ok(x, "x")?;
    stride_ok_mut(a, "a")?;
    if n == 0 || batch_count == 0 {
        return Ok(Launch::QuickReturn);
    }
    if host_is_zero(alpha) {
        return Ok(Launch::QuickReturn);
    }
    let x = require(x, "x")?;
    let a = require_mut(a, "a")?;
    check_in(x, vec_span(n, incx), batch_count, "x")?;
    check_out(a, mat_span(n, n, lda), batch_count, "a")?;
    Ok(Launch::Go)
}

// ============================================================================
// Level 3
// ============================================================================

#[allow(clippy::too_many_arguments)]
pub(crate) fn gemm_args<T: Scalar>(
    ctx: &Context,
    transa: Transpose,
    transb: Transpose,
    m: usize,
    n: usize,
    k: usize,
    alpha: &ScalarArg<'_, T>,
    a: Option<&BatchRef<'_, T>>,
    lda: usize,
    b: Option<&BatchRef<'_, T>>,
    ldb: usize,
    beta: &ScalarArg<'_, T>,
    c: Option<&BatchMut<'_, T>>,
    ldc: usize,
    batch_count: usize,
) -> Result<Launch> {
    check_mode(ctx, alpha, "alpha")?;
    check_mode(ctx, beta, "beta")?;
    let a_rows = match transa {
        Transpose::NoTrans => m,
        _ => k,
    };
    let a_cols = match transa {
        Transpose::NoTrans => k,
        _ => m,
    };
    let b_rows = match transb {
        Transpose::NoTrans => k,
        _ => n,
    };
    let b_cols = match transb {
        Transpose::NoTrans => n,
        _ => k,
    };
    if lda < a_rows.max(1) {
        return Err(BlasError::InvalidSize("lda"));
    }
    if ldb < b_rows.max(1) {
        return Err(BlasError::InvalidSize("ldb"));
    }
    if ldc < m.max(1) {
        return Err(BlasError::InvalidSize("ldc"));
    }
    stride_ok(a, "a")?;
    stride_ok(b, "b")?;
    stride_ok_mut(c, "c")?;
    if m == 0 || n == 0 || batch_count == 0 {
        return Ok(Launch::QuickReturn);
    }
    let reads_ab = !host_is_zero(alpha) && k > 0;
    if !reads_ab && host_is_one(beta) && alpha.host_value().is_some() {
        return Ok(Launch::QuickReturn);
    }
    if reads_ab || alpha.host_value().is_none() {
        let a = require(a, "a")?;
        let b = require(b, "b")?;
        if k > 0 {
            check_in(a, mat_span(a_rows, a_cols, lda), batch_count, "a")?;
            check_in(b, mat_span(b_rows, b_cols, ldb), batch_count, "b")?;
        }
    }
    let c = require_mut(c, "c")?;
    check_out(c, mat_span(m, n, ldc), batch_count, "c")?;
    Ok(Launch::Go)
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn syrk_args<T: Scalar, A: Scalar, B: Scalar>(
    ctx: &Context,
    _uplo: Uplo,
    trans: Transpose,
    n: usize,
    k: usize,
    hermitian: bool,
    alpha: &ScalarArg<'_, A>,
    a: Option<&BatchRef<'_, T>>,
    lda: usize,
    beta: &ScalarArg<'_, B>,
    c: Option<&BatchMut<'_, T>>,
    ldc: usize,
    batch_count: usize,
) -> Result<Launch> {
    check_mode(ctx, alpha, "alpha")?;
    check_mode(ctx, beta, "beta")?;
    // Hermitian updates have no plain-transpose form; complex symmetric
    // updates have no conjugate-transpose form.
    if hermitian && trans == Transpose::Trans {
        return Err(BlasError::InvalidValue("trans"));
    }
    if !hermitian && T::IS_COMPLEX && trans == Transpose::ConjTrans {
        return Err(BlasError::InvalidValue("trans"));
    }
    let a_rows = match trans {
        Transpose::NoTrans => n,
        _ => k,
    };
    let a_cols = match trans {
        Transpose::NoTrans => k,
        _ => n,
    };
    if lda < a_rows.max(1) {
        return Err(BlasError::InvalidSize("lda"));
    }
    if ldc < n.max(1) {
        return Err(BlasError::InvalidSize("ldc"));
    }
    stride_ok(a, "a")?;
    stride_ok_mut(c, "c")?;
    if n == 0 || batch_count == 0 {
        return Ok(Launch::QuickReturn);
    }
    let reads_a = !host_is_zero(alpha) && k > 0;
    if !reads_a && host_is_one(beta) && alpha.host_value().is_some() {
        return Ok(Launch::QuickReturn);
    }
    if reads_a || alpha.host_value().is_none() {
        let a = require(a, "a")?;
        if k > 0 {
            check_in(a, mat_span(a_rows, a_cols, lda), batch_count, "a")?;
        }
    }
    let c = require_mut(c, "c")?;
    check_out(c, mat_span(n, n, ldc), batch_count, "c")?;
    Ok(Launch::Go)
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn syr2k_args<T: Scalar, A: Scalar, B: Scalar>(
    ctx: &Context,
    _uplo: Uplo,
    trans: Transpose,
    n: usize,
    k: usize,
    hermitian: bool,
    alpha: &ScalarArg<'_, A>,
    a: Option<&BatchRef<'_, T>>,
    lda: usize,
    b: Option<&BatchRef<'_, T>>,
    ldb: usize,
    beta: &ScalarArg<'_, B>,
    c: Option<&BatchMut<'_, T>>,
    ldc: usize,
    batch_count: usize,
) -> Result<Launch> {
    check_mode(ctx, alpha, "alpha")?;
    check_mode(ctx, beta, "beta")?;
    if hermitian && trans == Transpose::Trans {
        return Err(BlasError::InvalidValue("trans"));
    }
    if !hermitian && T::IS_COMPLEX && trans == Transpose::ConjTrans {
        return Err(BlasError::InvalidValue("trans"));
    }
    // A and B share one shape: n x k as operated on.
    let rows = match trans {
        Transpose::NoTrans => n,
        _ => k,
    };
    let cols = match trans {
        Transpose::NoTrans => k,
        _ => n,
    };
    if lda < rows.max(1) {
        return Err(BlasError::InvalidSize("lda"));
    }
    if ldb < rows.max(1) {
        return Err(BlasError::InvalidSize("ldb"));
    }
    if ldc < n.max(1) {
        return Err(BlasError::InvalidSize("ldc"));
    }
    stride_ok(a, "a")?;
    stride_ok(b, "b")?;
    stride_ok_mut(c, "c")?;
    if n == 0 || batch_count == 0 {
        return Ok(Launch::QuickReturn);
    }
    let reads_ab = !host_is_zero(alpha) && k > 0;
    if !reads_ab && host_is_one(beta) && alpha.host_value().is_some() {
        return Ok(Launch::QuickReturn);
    }
    if reads_ab || alpha.host_value().is_none() {
        let a = require(a, "a")?;
        let b = require(b, "b")?;
        if k > 0 {
            check_in(a, mat_span(rows, cols, lda), batch_count, "a")?;
            check_in(b, mat_span(rows, cols, ldb), batch_count, "b")?;
        }
    }
    let c = require_mut(c, "c")?;
    check_out(c, mat_span(n, n, ldc), batch_count, "c")?;
    Ok(Launch::Go)
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn trsm_args<T: Scalar>(
    ctx: &Context,
    side: Side,
    m: usize,
    n: usize,
    alpha: &ScalarArg<'_, T>,
    a: Option<&BatchRef<'_, T>>,
    lda: usize,
    b: Option<&BatchMut<'_, T>>,
    ldb: usize,
    batch_count: usize,
) -> Result<Launch> {
    check_mode(ctx, alpha, "alpha")?;
    let ka = match side {
        Side::Left => m,
        Side::Right => n,
    };
    if lda < ka.max(1) {
        return Err(BlasError::InvalidSize("lda"));
    }
    if ldb < m.max(1) {
        return Err(BlasError::InvalidSize("ldb"));
    }
    stride_ok(a, "a")?;
    stride_ok_mut(b, "b")?;
    if m == 0 || n == 0 || batch_count == 0 {
        return Ok(Launch::QuickReturn);
    }
    // alpha == 0 zero-fills B without reading A, so B stays required.
    if !host_is_zero(alpha) {
        let a = require(a, "a")?;
        check_in(a, mat_span(ka, ka, lda), batch_count, "a")?;
    }
    let b = require_mut(b, "b")?;
    check_out(b, mat_span(m, n, ldb), batch_count, "b")?;
    Ok(Launch::Go)
}
