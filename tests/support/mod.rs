#![allow(dead_code)]

//! Shared helpers for the integration tests: seeded random data and naive
//! reference implementations to compare against.

use num_complex::{Complex32, Complex64};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::StandardNormal;
use strided_blas::{Diag, Transpose, Uplo};

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn rand_vec_f64(rng: &mut StdRng, n: usize) -> Vec<f64> {
    (0..n).map(|_| rng.sample(StandardNormal)).collect()
}

pub fn rand_vec_c64(rng: &mut StdRng, n: usize) -> Vec<Complex64> {
    (0..n)
        .map(|_| Complex64::new(rng.sample(StandardNormal), rng.sample(StandardNormal)))
        .collect()
}

pub fn rand_vec_f32(rng: &mut StdRng, n: usize) -> Vec<f32> {
    (0..n).map(|_| rng.sample::<f32, _>(StandardNormal)).collect()
}

pub fn rand_vec_c32(rng: &mut StdRng, n: usize) -> Vec<Complex32> {
    (0..n)
        .map(|_| {
            Complex32::new(
                rng.sample::<f32, _>(StandardNormal),
                rng.sample::<f32, _>(StandardNormal),
            )
        })
        .collect()
}

/// Upcast single-precision data so the f64 references can serve as oracles.
pub fn up(v: &[f32]) -> Vec<f64> {
    v.iter().map(|&e| e as f64).collect()
}

pub fn upc(v: &[Complex32]) -> Vec<Complex64> {
    v.iter()
        .map(|e| Complex64::new(e.re as f64, e.im as f64))
        .collect()
}

/// Buffer index of logical element `j` for a vector of `n` entries at
/// increment `inc` (negative increments walk backwards from the far end).
pub fn vidx(n: usize, inc: isize, j: usize) -> usize {
    let base = if inc < 0 { (n as isize - 1) * -inc } else { 0 };
    (base + j as isize * inc) as usize
}

pub fn close(a: f64, b: f64, tol: f64) -> bool {
    approx::abs_diff_eq!(a, b, epsilon = tol * (1.0 + a.abs().max(b.abs())))
}

pub fn assert_close(a: f64, b: f64, tol: f64) {
    assert!(close(a, b, tol), "{a} vs {b}");
}

pub fn assert_close_c(a: Complex64, b: Complex64, tol: f64) {
    assert!(
        (a - b).norm() <= tol * (1.0 + a.norm().max(b.norm())),
        "{a} vs {b}"
    );
}

// ============================================================================
// Storage materializers (column-major, lda = n/m)
// ============================================================================

/// Expand a half-stored symmetric matrix to a full n x n column-major one.
pub fn sym_full(uplo: Uplo, n: usize, lda: usize, a: &[f64]) -> Vec<f64> {
    let mut full = vec![0.0; n * n];
    for j in 0..n {
        for i in 0..n {
            let stored = match uplo {
                Uplo::Upper => i <= j,
                Uplo::Lower => i >= j,
            };
            full[i + j * n] = if stored {
                a[i + j * lda]
            } else {
                a[j + i * lda]
            };
        }
    }
    full
}

/// Expand a half-stored Hermitian matrix: reflected reads conjugate, the
/// diagonal imaginary part is dropped.
pub fn herm_full(uplo: Uplo, n: usize, lda: usize, a: &[Complex64]) -> Vec<Complex64> {
    let mut full = vec![Complex64::new(0.0, 0.0); n * n];
    for j in 0..n {
        for i in 0..n {
            let stored = match uplo {
                Uplo::Upper => i <= j,
                Uplo::Lower => i >= j,
            };
            let mut v = if stored {
                a[i + j * lda]
            } else {
                a[j + i * lda].conj()
            };
            if i == j {
                v = Complex64::new(v.re, 0.0);
            }
            full[i + j * n] = v;
        }
    }
    full
}

/// Expand a symmetric banded matrix (bandwidth `k`, band storage) to full.
pub fn band_sym_full(uplo: Uplo, n: usize, k: usize, lda: usize, ab: &[f64]) -> Vec<f64> {
    let mut full = vec![0.0; n * n];
    for j in 0..n {
        for i in 0..n {
            let (lo, hi) = if i < j { (i, j) } else { (j, i) };
            if hi - lo > k {
                continue;
            }
            let stored = match uplo {
                Uplo::Upper => i <= j,
                Uplo::Lower => i >= j,
            };
            let (r, c) = if stored { (i, j) } else { (j, i) };
            let band_row = match uplo {
                Uplo::Upper => k + r - c,
                Uplo::Lower => r - c,
            };
            full[i + j * n] = ab[band_row + c * lda];
        }
    }
    full
}

/// Expand a Hermitian banded matrix (bandwidth `k`, band storage) to full.
pub fn band_herm_full(
    uplo: Uplo,
    n: usize,
    k: usize,
    lda: usize,
    ab: &[Complex64],
) -> Vec<Complex64> {
    let mut full = vec![Complex64::new(0.0, 0.0); n * n];
    for j in 0..n {
        for i in 0..n {
            let (lo, hi) = if i < j { (i, j) } else { (j, i) };
            if hi - lo > k {
                continue;
            }
            let stored = match uplo {
                Uplo::Upper => i <= j,
                Uplo::Lower => i >= j,
            };
            let (r, c) = if stored { (i, j) } else { (j, i) };
            let band_row = match uplo {
                Uplo::Upper => k + r - c,
                Uplo::Lower => r - c,
            };
            let mut v = ab[band_row + c * lda];
            if !stored {
                v = v.conj();
            }
            if i == j {
                v = Complex64::new(v.re, 0.0);
            }
            full[i + j * n] = v;
        }
    }
    full
}

/// Expand a general banded m x n matrix to full; zero outside the band.
pub fn gband_full(m: usize, n: usize, kl: usize, ku: usize, lda: usize, ab: &[f64]) -> Vec<f64> {
    let mut full = vec![0.0; m * n];
    for j in 0..n {
        let lo = j.saturating_sub(ku);
        let hi = (j + kl + 1).min(m);
        for i in lo..hi {
            full[i + j * m] = ab[ku + i - j + j * lda];
        }
    }
    full
}

/// Expand a packed symmetric matrix to full.
pub fn packed_sym_full(uplo: Uplo, n: usize, ap: &[f64]) -> Vec<f64> {
    let mut full = vec![0.0; n * n];
    for j in 0..n {
        for i in 0..n {
            let stored = match uplo {
                Uplo::Upper => i <= j,
                Uplo::Lower => i >= j,
            };
            let (r, c) = if stored { (i, j) } else { (j, i) };
            let off = match uplo {
                Uplo::Upper => r + c * (c + 1) / 2,
                Uplo::Lower => r + c * (2 * n - c - 1) / 2,
            };
            full[i + j * n] = ap[off];
        }
    }
    full
}

/// Expand a packed Hermitian matrix to full.
pub fn packed_herm_full(uplo: Uplo, n: usize, ap: &[Complex64]) -> Vec<Complex64> {
    let mut full = vec![Complex64::new(0.0, 0.0); n * n];
    for j in 0..n {
        for i in 0..n {
            let stored = match uplo {
                Uplo::Upper => i <= j,
                Uplo::Lower => i >= j,
            };
            let (r, c) = if stored { (i, j) } else { (j, i) };
            let off = match uplo {
                Uplo::Upper => r + c * (c + 1) / 2,
                Uplo::Lower => r + c * (2 * n - c - 1) / 2,
            };
            let mut v = ap[off];
            if !stored {
                v = v.conj();
            }
            if i == j {
                v = Complex64::new(v.re, 0.0);
            }
            full[i + j * n] = v;
        }
    }
    full
}

/// Expand a triangular matrix to full, honoring an implicit unit diagonal.
pub fn tri_full(uplo: Uplo, diag: Diag, n: usize, lda: usize, a: &[f64]) -> Vec<f64> {
    let mut full = vec![0.0; n * n];
    for j in 0..n {
        for i in 0..n {
            let stored = match uplo {
                Uplo::Upper => i <= j,
                Uplo::Lower => i >= j,
            };
            if !stored {
                continue;
            }
            full[i + j * n] = if i == j && diag == Diag::Unit {
                1.0
            } else {
                a[i + j * lda]
            };
        }
    }
    full
}

// ============================================================================
// Naive references
// ============================================================================

/// y = alpha * op(A) * x + beta * y for a full column-major A.
#[allow(clippy::too_many_arguments)]
pub fn naive_gemv_f64(
    trans: Transpose,
    m: usize,
    n: usize,
    alpha: f64,
    a: &[f64],
    lda: usize,
    x: &[f64],
    incx: isize,
    beta: f64,
    y: &mut [f64],
    incy: isize,
) {
    let (ydim, xdim) = match trans {
        Transpose::NoTrans => (m, n),
        _ => (n, m),
    };
    for i in 0..ydim {
        let mut acc = 0.0;
        for j in 0..xdim {
            let aij = match trans {
                Transpose::NoTrans => a[i + j * lda],
                _ => a[j + i * lda],
            };
            acc += aij * x[vidx(xdim, incx, j)];
        }
        let yi = vidx(ydim, incy, i);
        y[yi] = if beta == 0.0 {
            alpha * acc
        } else {
            alpha * acc + beta * y[yi]
        };
    }
}

#[allow(clippy::too_many_arguments)]
pub fn naive_gemv_c64(
    trans: Transpose,
    m: usize,
    n: usize,
    alpha: Complex64,
    a: &[Complex64],
    lda: usize,
    x: &[Complex64],
    incx: isize,
    beta: Complex64,
    y: &mut [Complex64],
    incy: isize,
) {
    let (ydim, xdim) = match trans {
        Transpose::NoTrans => (m, n),
        _ => (n, m),
    };
    for i in 0..ydim {
        let mut acc = Complex64::new(0.0, 0.0);
        for j in 0..xdim {
            let aij = match trans {
                Transpose::NoTrans => a[i + j * lda],
                Transpose::Trans => a[j + i * lda],
                Transpose::ConjTrans => a[j + i * lda].conj(),
            };
            acc += aij * x[vidx(xdim, incx, j)];
        }
        let yi = vidx(ydim, incy, i);
        y[yi] = if beta == Complex64::new(0.0, 0.0) {
            alpha * acc
        } else {
            alpha * acc + beta * y[yi]
        };
    }
}

fn opf(a: &[f64], trans: Transpose, lda: usize, i: usize, l: usize) -> f64 {
    match trans {
        Transpose::NoTrans => a[i + l * lda],
        _ => a[l + i * lda],
    }
}

fn opc(a: &[Complex64], trans: Transpose, lda: usize, i: usize, l: usize) -> Complex64 {
    match trans {
        Transpose::NoTrans => a[i + l * lda],
        Transpose::Trans => a[l + i * lda],
        Transpose::ConjTrans => a[l + i * lda].conj(),
    }
}

/// C = alpha * op(A) * op(B) + beta * C for full column-major operands.
#[allow(clippy::too_many_arguments)]
pub fn naive_gemm_f64(
    transa: Transpose,
    transb: Transpose,
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
    for j in 0..n {
        for i in 0..m {
            let mut acc = 0.0;
            for l in 0..k {
                acc += opf(a, transa, lda, i, l) * opf(b, transb, ldb, l, j);
            }
            let idx = i + j * ldc;
            c[idx] = if beta == 0.0 {
                alpha * acc
            } else {
                alpha * acc + beta * c[idx]
            };
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn naive_gemm_c64(
    transa: Transpose,
    transb: Transpose,
    m: usize,
    n: usize,
    k: usize,
    alpha: Complex64,
    a: &[Complex64],
    lda: usize,
    b: &[Complex64],
    ldb: usize,
    beta: Complex64,
    c: &mut [Complex64],
    ldc: usize,
) {
    for j in 0..n {
        for i in 0..m {
            let mut acc = Complex64::new(0.0, 0.0);
            for l in 0..k {
                acc += opc(a, transa, lda, i, l) * opc(b, transb, ldb, l, j);
            }
            let idx = i + j * ldc;
            c[idx] = if beta == Complex64::new(0.0, 0.0) {
                alpha * acc
            } else {
                alpha * acc + beta * c[idx]
            };
        }
    }
}
