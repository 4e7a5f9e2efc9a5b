//! Batched dense linear algebra (BLAS levels 1-3) over strided host buffers.
//!
//! Every operation comes in one shape that covers the plain, strided-batched
//! and pointer-batched calling conventions: array operands are passed as
//! [`BatchRef`] / [`BatchMut`], scalars as [`ScalarArg`], and a per-session
//! [`Context`] carries pointer mode, numerics checking and logging settings.
//!
//! # Core Types
//!
//! - [`Context`]: session settings plus workspace size queries
//! - [`BatchRef`] / [`BatchMut`]: the three batched operand shapes
//! - [`ScalarArg`]: a host-resident or indirect (device-style) scalar
//! - [`Scalar`]: the element trait, implemented for `f32`, `f64`,
//!   [`half::f16`], `Complex<f32>` and `Complex<f64>`
//!
//! # Operations
//!
//! ## Level 1 (vector)
//!
//! - [`scal`], [`axpy`], [`copy`], [`swap`]
//! - [`dot`], [`dotc`], [`nrm2`], [`asum`], [`iamax`]
//!
//! ## Level 2 (matrix-vector)
//!
//! - [`gemv`], [`gbmv`]: general and general-banded
//! - [`symv`], [`hemv`], [`sbmv`], [`hbmv`], [`spmv`], [`hpmv`]: half-stored
//!   symmetric/Hermitian in full, banded and packed storage
//! - [`trmv`], [`trsv`]: triangular multiply and solve
//! - [`ger`], [`gerc`], [`syr`], [`her`]: rank-1 updates
//!
//! ## Level 3 (matrix-matrix)
//!
//! - [`gemm`]
//! - [`syrk`], [`herk`], [`syr2k`], [`her2k`]: symmetric/Hermitian rank-k
//! - [`trsm`]: triangular solve with multiple right-hand sides
//!
//! # Example
//!
//! ```rust
//! use strided_blas::{gemv, BatchMut, BatchRef, Context, ScalarArg, Transpose};
//!
//! let ctx = Context::new();
//!
//! // Column-major 2x2 matrix [[1, 2], [3, 4]].
//! let a = vec![1.0f64, 3.0, 2.0, 4.0];
//! let x = vec![1.0f64, 1.0];
//! let mut y = vec![0.0f64; 2];
//!
//! // y = 1.0 * A * x + 0.0 * y
//! gemv(
//!     &ctx,
//!     Transpose::NoTrans,
//!     2,
//!     2,
//!     ScalarArg::Host(1.0),
//!     Some(BatchRef::Plain(&a)),
//!     2,
//!     Some(BatchRef::Plain(&x)),
//!     1,
//!     ScalarArg::Host(0.0),
//!     Some(BatchMut::Plain(&mut y)),
//!     1,
//!     1,
//! )?;
//! assert_eq!(y, vec![3.0, 7.0]);
//! # Ok::<(), strided_blas::BlasError>(())
//! ```
//!
//! # Batched calls
//!
//! A plain operand is a batch of one. `BatchRef::Strided { data, stride }`
//! packs `batch_count` instances at a fixed element stride (stride 0
//! broadcasts an input instance to the whole batch), and
//! `BatchRef::Pointers` takes one buffer per instance. Output operands
//! reject shapes that alias across instances.
//!
//! # Execution model
//!
//! Kernels are element-parallel over their output with reproducible chunked
//! reductions, on the rayon pool when the default `parallel` feature is
//! enabled. Results are identical between serial and parallel runs.

mod batch;
mod context;
mod grid;
mod guard;
mod kernels;
mod layout;
mod logging;
mod scalar;
mod validate;

// ============================================================================
// Core types
// ============================================================================
pub use batch::{BatchMut, BatchRef};
pub use context::Context;
pub use guard::{CheckNumericsMode, CheckNumericsResult};
pub use layout::{Diag, Side, Transpose, Uplo};
pub use logging::LogMask;
pub use scalar::{PointerMode, Scalar, ScalarArg};

// ============================================================================
// Level 1
// ============================================================================
pub use kernels::level1::{asum, axpy, copy, dot, dotc, iamax, nrm2, scal, swap};

// ============================================================================
// Level 2
// ============================================================================
pub use kernels::gemv::{gbmv, gemv};
pub use kernels::ger::{ger, gerc, her, syr};
pub use kernels::symv::{hbmv, hemv, hpmv, sbmv, spmv, symv};
pub use kernels::trmv::{trmv, trsv};

// ============================================================================
// Level 3
// ============================================================================
pub use kernels::gemm::gemm;
pub use kernels::syrk::{her2k, herk, syr2k, syrk};
pub use kernels::trsm::trsm;

// ============================================================================
// Error types
// ============================================================================

/// Errors that can occur during batched BLAS calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BlasError {
    /// The context is unusable for this call.
    #[error("invalid handle")]
    InvalidHandle,

    /// An enum or mode argument is invalid for the operation.
    #[error("invalid value for argument {0}")]
    InvalidValue(&'static str),

    /// A dimension, increment, stride or leading-dimension argument is
    /// out of range, or an operand buffer is too short.
    #[error("invalid size for argument {0}")]
    InvalidSize(&'static str),

    /// A required operand was not supplied.
    #[error("missing required operand {0}")]
    InvalidPointer(&'static str),

    /// Workspace allocation failed.
    #[error("workspace allocation failed")]
    MemoryError,

    /// The requested configuration is recognized but not implemented.
    #[error("not implemented: {0}")]
    NotImplemented(&'static str),

    /// The numerics guard found a NaN or Inf while in `Fail` mode.
    #[error("check_numerics failure in operand {0}")]
    CheckNumericsFail(&'static str),
}

/// Result type for batched BLAS calls.
pub type Result<T> = std::result::Result<T, BlasError>;
