//! Optional numerics guard: pre/post kernel scans for NaN/Inf/zero/denormal.
//!
//! The guard runs the same addressing logic as the compute engine but only
//! reads, folding every visited element into a [`CheckNumericsResult`] whose
//! four flags are set monotonically. It never alters the main computation:
//! in `Info` mode findings are reported through `tracing`, in `Fail` mode a
//! NaN or Inf yields [`BlasError::CheckNumericsFail`]. Output scans run
//! after the kernel has already written; a completed computation is never
//! rolled back.

use crate::batch::{neg_inc_offset, vec_index, BatchMut, BatchRef};
use crate::context::Context;
use crate::layout::{banded_offset, general_banded_offset, general_offset, packed_offset, Uplo};
use crate::scalar::Scalar;
use crate::{BlasError, Result};

/// Guard activation level, session-scoped on the [`Context`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckNumericsMode {
    /// No scanning.
    #[default]
    Off,
    /// Scan and report findings via `tracing`.
    Info,
    /// Scan and fail the call when a NaN or Inf is present.
    Fail,
}

/// Monotone accumulator for one scan pass: flags are only ever set, never
/// reset. Owned by the call that requested the scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckNumericsResult {
    pub has_zero: bool,
    pub has_nan: bool,
    pub has_inf: bool,
    pub has_denorm: bool,
}

impl CheckNumericsResult {
    #[inline]
    pub fn absorb<T: Scalar>(&mut self, v: T) {
        if v.is_zero() {
            self.has_zero = true;
        }
        if v.is_nan() {
            self.has_nan = true;
        }
        if v.is_inf() {
            self.has_inf = true;
        }
        if v.is_denormal() {
            self.has_denorm = true;
        }
    }

    /// Combine two per-block results.
    #[inline]
    pub fn merge(self, other: Self) -> Self {
        CheckNumericsResult {
            has_zero: self.has_zero || other.has_zero,
            has_nan: self.has_nan || other.has_nan,
            has_inf: self.has_inf || other.has_inf,
            has_denorm: self.has_denorm || other.has_denorm,
        }
    }

    #[inline]
    pub fn any(&self) -> bool {
        self.has_zero || self.has_nan || self.has_inf || self.has_denorm
    }

    /// Whether the scan found a value the `Fail` mode treats as fatal.
    #[inline]
    pub fn has_invalid(&self) -> bool {
        self.has_nan || self.has_inf
    }
}

/// Read-only per-instance access, satisfied by both operand mutabilities so
/// scans are written once.
pub(crate) trait Instances<T> {
    fn at(&self, i: usize) -> &[T];
}

impl<T> Instances<T> for BatchRef<'_, T> {
    fn at(&self, i: usize) -> &[T] {
        self.instance(i)
    }
}

impl<T> Instances<T> for BatchMut<'_, T> {
    fn at(&self, i: usize) -> &[T] {
        self.instance(i)
    }
}

// ============================================================================
// Scan passes
// ============================================================================

pub(crate) fn scan_vector<T: Scalar>(
    n: usize,
    inc: isize,
    x: &impl Instances<T>,
    batch_count: usize,
) -> CheckNumericsResult {
    let mut r = CheckNumericsResult::default();
    let base = neg_inc_offset(n, inc);
    for b in 0..batch_count {
        let xi = x.at(b);
        for j in 0..n {
            r.absorb(xi[vec_index(base, j, inc)]);
        }
    }
    r
}

pub(crate) fn scan_general<T: Scalar>(
    rows: usize,
    cols: usize,
    lda: usize,
    a: &impl Instances<T>,
    batch_count: usize,
) -> CheckNumericsResult {
    let mut r = CheckNumericsResult::default();
    for b in 0..batch_count {
        let ai = a.at(b);
        for col in 0..cols {
            for row in 0..rows {
                r.absorb(ai[general_offset(row, col, lda)]);
            }
        }
    }
    r
}

/// Scan only the stored triangle of a half-stored operand.
pub(crate) fn scan_triangle<T: Scalar>(
    uplo: Uplo,
    n: usize,
    lda: usize,
    a: &impl Instances<T>,
    batch_count: usize,
) -> CheckNumericsResult {
    let mut r = CheckNumericsResult::default();
    for b in 0..batch_count {
        let ai = a.at(b);
        for col in 0..n {
            let (lo, hi) = match uplo {
                Uplo::Upper => (0, col + 1),
                Uplo::Lower => (col, n),
            };
            for row in lo..hi {
                r.absorb(ai[general_offset(row, col, lda)]);
            }
        }
    }
    r
}

/// Scan the referenced slots of a symmetric/triangular banded operand.
pub(crate) fn scan_banded<T: Scalar>(
    uplo: Uplo,
    n: usize,
    k: usize,
    lda: usize,
    ab: &impl Instances<T>,
    batch_count: usize,
) -> CheckNumericsResult {
    let mut r = CheckNumericsResult::default();
    for b in 0..batch_count {
        let abi = ab.at(b);
        for col in 0..n {
            let (lo, hi) = match uplo {
                Uplo::Upper => (col.saturating_sub(k), col + 1),
                Uplo::Lower => (col, (col + k + 1).min(n)),
            };
            for row in lo..hi {
                r.absorb(abi[banded_offset(uplo, k, row, col, lda)]);
            }
        }
    }
    r
}

/// Scan the referenced slots of a general banded operand.
pub(crate) fn scan_general_band<T: Scalar>(
    m: usize,
    n: usize,
    kl: usize,
    ku: usize,
    lda: usize,
    ab: &impl Instances<T>,
    batch_count: usize,
) -> CheckNumericsResult {
    let mut r = CheckNumericsResult::default();
    for b in 0..batch_count {
        let abi = ab.at(b);
        for col in 0..n {
            let lo = col.saturating_sub(ku);
            let hi = (col + kl + 1).min(m);
            for row in lo..hi {
                r.absorb(abi[general_banded_offset(ku, row, col, lda)]);
            }
        }
    }
    r
}

/// Scan the stored triangle of a packed operand.
pub(crate) fn scan_packed<T: Scalar>(
    uplo: Uplo,
    n: usize,
    ap: &impl Instances<T>,
    batch_count: usize,
) -> CheckNumericsResult {
    let mut r = CheckNumericsResult::default();
    for b in 0..batch_count {
        let api = ap.at(b);
        for col in 0..n {
            let (lo, hi) = match uplo {
                Uplo::Upper => (0, col + 1),
                Uplo::Lower => (col, n),
            };
            for row in lo..hi {
                r.absorb(api[packed_offset(uplo, n, row, col)]);
            }
        }
    }
    r
}

// ============================================================================
// Reporting
// ============================================================================

/// Surface a scan result per the context's guard mode.
pub(crate) fn report(
    ctx: &Context,
    op: &'static str,
    operand: &'static str,
    is_input: bool,
    result: CheckNumericsResult,
) -> Result<()> {
    match ctx.check_numerics() {
        CheckNumericsMode::Off => Ok(()),
        CheckNumericsMode::Info => {
            if result.any() {
                tracing::warn!(
                    target: "strided_blas::check_numerics",
                    op,
                    operand,
                    is_input,
                    has_zero = result.has_zero,
                    has_nan = result.has_nan,
                    has_inf = result.has_inf,
                    has_denorm = result.has_denorm,
                    "check_numerics findings"
                );
            }
            Ok(())
        }
        CheckNumericsMode::Fail => {
            if result.has_invalid() {
                Err(BlasError::CheckNumericsFail(operand))
            } else {
                Ok(())
            }
        }
    }
}

/// Scan + report a vector operand when the guard is enabled.
pub(crate) fn guard_vector<T: Scalar>(
    ctx: &Context,
    op: &'static str,
    operand: &'static str,
    is_input: bool,
    n: usize,
    inc: isize,
    x: &impl Instances<T>,
    batch_count: usize,
) -> Result<()> {
    if ctx.check_numerics() == CheckNumericsMode::Off {
        return Ok(());
    }
    report(ctx, op, operand, is_input, scan_vector(n, inc, x, batch_count))
}

/// Scan + report a general matrix operand when the guard is enabled.
pub(crate) fn guard_general<T: Scalar>(
    ctx: &Context,
    op: &'static str,
    operand: &'static str,
    is_input: bool,
    rows: usize,
    cols: usize,
    lda: usize,
    a: &impl Instances<T>,
    batch_count: usize,
) -> Result<()> {
    if ctx.check_numerics() == CheckNumericsMode::Off {
        return Ok(());
    }
    report(
        ctx,
        op,
        operand,
        is_input,
        scan_general(rows, cols, lda, a, batch_count),
    )
}

/// Scan + report a half-stored triangle when the guard is enabled.
pub(crate) fn guard_triangle<T: Scalar>(
    ctx: &Context,
    op: &'static str,
    operand: &'static str,
    is_input: bool,
    uplo: Uplo,
    n: usize,
    lda: usize,
    a: &impl Instances<T>,
    batch_count: usize,
) -> Result<()> {
    if ctx.check_numerics() == CheckNumericsMode::Off {
        return Ok(());
    }
    report(
        ctx,
        op,
        operand,
        is_input,
        scan_triangle(uplo, n, lda, a, batch_count),
    )
}

/// Scan + report a symmetric/Hermitian/triangular banded operand.
#[allow(clippy::too_many_arguments)]
pub(crate) fn guard_banded<T: Scalar>(
    ctx: &Context,
    op: &'static str,
    operand: &'static str,
    is_input: bool,
    uplo: Uplo,
    n: usize,
    k: usize,
    lda: usize,
    ab: &impl Instances<T>,
    batch_count: usize,
) -> Result<()> {
    if ctx.check_numerics() == CheckNumericsMode::Off {
        return Ok(());
    }
    report(
        ctx,
        op,
        operand,
        is_input,
        scan_banded(uplo, n, k, lda, ab, batch_count),
    )
}

/// Scan + report a general banded operand.
#[allow(clippy::too_many_arguments)]
pub(crate) fn guard_general_band<T: Scalar>(
    ctx: &Context,
    op: &'static str,
    operand: &'static str,
    is_input: bool,
    m: usize,
    n: usize,
    kl: usize,
    ku: usize,
    lda: usize,
    ab: &impl Instances<T>,
    batch_count: usize,
) -> Result<()> {
    if ctx.check_numerics() == CheckNumericsMode::Off {
        return Ok(());
    }
    report(
        ctx,
        op,
        operand,
        is_input,
        scan_general_band(m, n, kl, ku, lda, ab, batch_count),
    )
}

/// Scan + report a packed triangular operand.
pub(crate) fn guard_packed<T: Scalar>(
    ctx: &Context,
    op: &'static str,
    operand: &'static str,
    is_input: bool,
    uplo: Uplo,
    n: usize,
    ap: &impl Instances<T>,
    batch_count: usize,
) -> Result<()> {
    if ctx.check_numerics() == CheckNumericsMode::Off {
        return Ok(());
    }
    report(ctx, op, operand, is_input, scan_packed(uplo, n, ap, batch_count))
}
