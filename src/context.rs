//! Per-session execution context.
//!
//! A [`Context`] carries the session-scoped settings every call reads once:
//! the scalar pointer mode, the numerics-guard mode, and the logging mask.
//! It also owns the workspace machinery: kernels that need scratch space
//! acquire it through [`Context::take_workspace`], which doubles as the
//! size-query ("dry run") mechanism: between [`Context::start_size_query`]
//! and [`Context::stop_size_query`] every entry point reports the workspace
//! bytes it would need and returns without touching operand memory.

use crate::guard::CheckNumericsMode;
use crate::logging::LogMask;
use crate::scalar::{PointerMode, Scalar};
use crate::{BlasError, Result};
use std::cell::Cell;

/// Execution context for batched BLAS calls.
///
/// Host-side orchestration is sequential per call; a context is not `Sync`
/// and concurrent callers use one context each.
#[derive(Debug, Default)]
pub struct Context {
    pointer_mode: PointerMode,
    check_numerics: CheckNumericsMode,
    log_mask: LogMask,
    size_query: Cell<Option<usize>>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pointer_mode(&self) -> PointerMode {
        self.pointer_mode
    }

    pub fn set_pointer_mode(&mut self, mode: PointerMode) {
        self.pointer_mode = mode;
    }

    pub fn check_numerics(&self) -> CheckNumericsMode {
        self.check_numerics
    }

    pub fn set_check_numerics(&mut self, mode: CheckNumericsMode) {
        self.check_numerics = mode;
    }

    pub fn log_mask(&self) -> LogMask {
        self.log_mask
    }

    pub fn set_log_mask(&mut self, mask: LogMask) {
        self.log_mask = mask;
    }

    // ------------------------------------------------------------------
    // Workspace size query
    // ------------------------------------------------------------------

    /// Enter size-query mode. Subsequent calls compute and record their
    /// workspace requirement instead of executing.
    pub fn start_size_query(&mut self) {
        self.size_query.set(Some(0));
    }

    /// Leave size-query mode, returning the largest workspace byte count
    /// any queried call would need.
    pub fn stop_size_query(&mut self) -> usize {
        self.size_query.take().unwrap_or(0)
    }

    pub(crate) fn is_size_query(&self) -> bool {
        self.size_query.get().is_some()
    }

    pub(crate) fn record_workspace_bytes(&self, bytes: usize) {
        if let Some(current) = self.size_query.get() {
            self.size_query.set(Some(current.max(bytes)));
        }
    }

    /// Acquire a zero-initialized scratch buffer of `elems` elements.
    ///
    /// In size-query mode the requirement is recorded and `None` is
    /// returned; the caller must then skip the computation. Allocation
    /// failure surfaces as [`BlasError::MemoryError`] before any kernel
    /// runs.
    pub(crate) fn take_workspace<T: Scalar>(&self, elems: usize) -> Result<Option<Vec<T>>> {
        let bytes = elems * std::mem::size_of::<T>();
        if self.is_size_query() {
            self.record_workspace_bytes(bytes);
            return Ok(None);
        }
        let mut buf: Vec<T> = Vec::new();
        buf.try_reserve_exact(elems)
            .map_err(|_| BlasError::MemoryError)?;
        buf.resize(elems, T::zero());
        Ok(Some(buf))
    }
}
