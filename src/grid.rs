//! Grid execution helpers for the data-parallel kernels.
//!
//! Kernels are written against a block-grid model: output elements are
//! partitioned into independent work items that may execute in any order and
//! never communicate, and reductions accumulate fixed-width chunk partials
//! that are combined by a pairwise tree. With the `parallel` feature the
//! work items run on the rayon pool; otherwise they run sequentially. Small
//! problems always run sequentially.

use crate::scalar::Scalar;

/// Reduction tile width: one chunk of the reduction axis is accumulated
/// serially before entering the combining tree.
pub(crate) const REDUCE_CHUNK: usize = 256;

/// Minimum total scalar work before a kernel is split across threads.
pub(crate) const MIN_PAR_WORK: usize = 8192;

/// A raw output pointer shareable across work items.
///
/// Work items write disjoint strided locations of one output buffer; slices
/// cannot express that split, so kernels go through a raw pointer the same
/// way the batched GEMM kernels do. The caller must guarantee that distinct
/// work items touch distinct offsets.
#[derive(Clone, Copy)]
pub(crate) struct SendPtr<T>(pub *mut T);

unsafe impl<T> Send for SendPtr<T> {}
unsafe impl<T> Sync for SendPtr<T> {}

impl<T> SendPtr<T> {
    /// Pointer to the element at `idx`.
    ///
    /// # Safety
    /// `idx` must be in bounds for the buffer the pointer was taken from,
    /// and no other work item may access the same offset.
    #[inline(always)]
    pub(crate) unsafe fn at(self, idx: usize) -> *mut T {
        self.0.add(idx)
    }
}

/// Run `f(i)` for every work item `i` in `0..items`.
///
/// `work_per_item` is an estimate of the scalar operations per item, used
/// only to decide whether splitting is worth it. Item execution order is
/// unspecified; `f` must not depend on it.
pub(crate) fn par_for_each<F>(items: usize, work_per_item: usize, f: F)
where
    F: Fn(usize) + Send + Sync,
{
    #[cfg(feature = "parallel")]
    {
        if items > 1 && items.saturating_mul(work_per_item.max(1)) >= MIN_PAR_WORK {
            use rayon::prelude::*;
            (0..items).into_par_iter().for_each(f);
            return;
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = work_per_item;
    for i in 0..items {
        f(i);
    }
}

/// Combine partial sums pairwise until one value remains.
///
/// The combination order is a fixed tree independent of thread count, so a
/// reduction gives the same rounding for serial and parallel runs.
pub(crate) fn tree_reduce<T: Scalar>(partials: &mut [T]) -> T {
    if partials.is_empty() {
        return T::zero();
    }
    let mut len = partials.len();
    while len > 1 {
        let half = len / 2;
        for i in 0..half {
            let hi = partials[len - 1 - i];
            partials[i] = partials[i] + hi;
        }
        len -= half;
    }
    partials[0]
}

/// Sum `term(j)` for `j in 0..n` via chunked partials and a combining tree.
///
/// This is the reduction pattern every dot-product-shaped kernel uses: each
/// `REDUCE_CHUNK`-wide slice of the reduction axis is accumulated serially
/// (one block's tile), then the per-chunk partials are folded pairwise.
pub(crate) fn reduce_chunked<T, F>(n: usize, mut term: F) -> T
where
    T: Scalar,
    F: FnMut(usize) -> T,
{
    if n <= REDUCE_CHUNK {
        let mut acc = T::zero();
        for j in 0..n {
            acc = acc + term(j);
        }
        return acc;
    }
    let mut partials: Vec<T> = Vec::with_capacity(n.div_ceil(REDUCE_CHUNK));
    let mut j = 0;
    while j < n {
        let end = (j + REDUCE_CHUNK).min(n);
        let mut acc = T::zero();
        for jj in j..end {
            acc = acc + term(jj);
        }
        partials.push(acc);
        j = end;
    }
    tree_reduce(&mut partials)
}
