//! Storage-format addressing for general, banded, and packed operands.
//!
//! All matrices are column-major. Three storage formats are supported:
//!
//! - **general**: `lda`-strided dense columns, offset `row + col * lda`;
//! - **banded**: a `(k + 1) x n` (or `(kl + ku + 1) x n`) array holding only
//!   the diagonals within the band;
//! - **packed triangular**: one triangle linearized into `n (n + 1) / 2`
//!   elements.
//!
//! For symmetric/Hermitian operands only the declared triangle is stored; the
//! `*_sym_get` accessors reflect a request for the other triangle to the
//! transposed position and conjugate it when the operand is Hermitian. On the
//! main diagonal of a Hermitian matrix the imaginary part is forced to zero
//! on read; rank-update kernels force it to zero on store.

use crate::scalar::Scalar;

// ============================================================================
// Shape enums
// ============================================================================

/// Which triangle of a symmetric/Hermitian/triangular operand is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Uplo {
    Upper,
    Lower,
}

/// Operation applied to a matrix operand before use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transpose {
    NoTrans,
    Trans,
    ConjTrans,
}

/// Whether a triangular operand has an implicit unit diagonal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diag {
    NonUnit,
    Unit,
}

/// Which side a triangular operand multiplies from in trsm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Uplo {
    pub fn as_char(self) -> char {
        match self {
            Uplo::Upper => 'U',
            Uplo::Lower => 'L',
        }
    }
}

impl Transpose {
    pub fn as_char(self) -> char {
        match self {
            Transpose::NoTrans => 'N',
            Transpose::Trans => 'T',
            Transpose::ConjTrans => 'C',
        }
    }

    /// Whether the operation conjugates elements.
    #[inline]
    pub(crate) fn conjugates(self) -> bool {
        matches!(self, Transpose::ConjTrans)
    }
}

impl Diag {
    pub fn as_char(self) -> char {
        match self {
            Diag::NonUnit => 'N',
            Diag::Unit => 'U',
        }
    }
}

impl Side {
    pub fn as_char(self) -> char {
        match self {
            Side::Left => 'L',
            Side::Right => 'R',
        }
    }
}

// ============================================================================
// Offset arithmetic
// ============================================================================

/// Offset of `(row, col)` in a column-major general matrix.
#[inline(always)]
pub fn general_offset(row: usize, col: usize, lda: usize) -> usize {
    row + col * lda
}

/// Offset of `(row, col)` in a packed triangular matrix of order `n`.
///
/// The coordinate must lie inside the stored triangle.
#[inline]
pub fn packed_offset(uplo: Uplo, n: usize, row: usize, col: usize) -> usize {
    match uplo {
        Uplo::Upper => {
            debug_assert!(row <= col && col < n);
            row + col * (col + 1) / 2
        }
        Uplo::Lower => {
            debug_assert!(col <= row && row < n);
            row + col * (2 * n - col - 1) / 2
        }
    }
}

/// Offset of `(row, col)` in a symmetric/triangular banded matrix with
/// bandwidth `k`. The coordinate must lie inside the band and the stored
/// triangle; `lda >= k + 1`.
#[inline]
pub fn banded_offset(uplo: Uplo, k: usize, row: usize, col: usize, lda: usize) -> usize {
    let banded_row = match uplo {
        // row in [col - k, col] maps to banded row (k + row - col) in [0, k]
        Uplo::Upper => (k as isize + row as isize - col as isize) as usize,
        // row in [col, col + k] maps to banded row (row - col) in [0, k]
        Uplo::Lower => row - col,
    };
    debug_assert!(banded_row <= k);
    banded_row + col * lda
}

/// Offset of `(row, col)` in a general banded matrix with `kl` sub- and `ku`
/// super-diagonals; `lda >= kl + ku + 1`.
#[inline]
pub fn general_banded_offset(ku: usize, row: usize, col: usize, lda: usize) -> usize {
    let banded_row = (ku as isize + row as isize - col as isize) as usize;
    banded_row + col * lda
}

// ============================================================================
// Half-stored reads (reflect + conjugate)
// ============================================================================

/// Read logical element `(row, col)` of a symmetric or Hermitian matrix of
/// which only the `uplo` triangle is stored in general format.
#[inline]
pub(crate) fn sym_get<T: Scalar>(
    a: &[T],
    uplo: Uplo,
    lda: usize,
    row: usize,
    col: usize,
    hermitian: bool,
) -> T {
    let stored = match uplo {
        Uplo::Upper => row <= col,
        Uplo::Lower => row >= col,
    };
    let v = if stored {
        a[general_offset(row, col, lda)]
    } else {
        let t = a[general_offset(col, row, lda)];
        if hermitian {
            t.conj()
        } else {
            t
        }
    };
    if hermitian && row == col {
        v.force_real()
    } else {
        v
    }
}

/// Read logical element `(row, col)` of a half-stored symmetric/Hermitian
/// matrix in packed format.
#[inline]
pub(crate) fn packed_get<T: Scalar>(
    ap: &[T],
    uplo: Uplo,
    n: usize,
    row: usize,
    col: usize,
    hermitian: bool,
) -> T {
    let stored = match uplo {
        Uplo::Upper => row <= col,
        Uplo::Lower => row >= col,
    };
    let v = if stored {
        ap[packed_offset(uplo, n, row, col)]
    } else {
        let t = ap[packed_offset(uplo, n, col, row)];
        if hermitian {
            t.conj()
        } else {
            t
        }
    };
    if hermitian && row == col {
        v.force_real()
    } else {
        v
    }
}

/// Read logical element `(row, col)` of a half-stored symmetric/Hermitian
/// banded matrix with bandwidth `k`. Returns zero outside the band.
#[inline]
pub(crate) fn banded_sym_get<T: Scalar>(
    ab: &[T],
    uplo: Uplo,
    k: usize,
    lda: usize,
    row: usize,
    col: usize,
    hermitian: bool,
) -> T {
    let (lo, hi) = if row < col { (row, col) } else { (col, row) };
    if hi - lo > k {
        return T::zero();
    }
    let stored = match uplo {
        Uplo::Upper => row <= col,
        Uplo::Lower => row >= col,
    };
    let v = if stored {
        ab[banded_offset(uplo, k, row, col, lda)]
    } else {
        let t = ab[banded_offset(uplo, k, col, row, lda)];
        if hermitian {
            t.conj()
        } else {
            t
        }
    };
    if hermitian && row == col {
        v.force_real()
    } else {
        v
    }
}
