//! Batched operand representations and their uniform per-instance resolution.
//!
//! Every operation accepts its array operands in one of three shapes:
//!
//! - **plain**: one buffer, batch count implicitly 1;
//! - **strided-batched**: one buffer plus a fixed element stride between
//!   consecutive instances (stride 0 broadcasts the same instance to every
//!   batch index, inputs only);
//! - **pointer-batched**: an explicit list of per-instance buffers.
//!
//! The dispatch layer resolves all three to a per-instance slice through
//! [`BatchRef::instance`] / [`BatchMut::instance_mut`], so each kernel is
//! written once: a plain operand is just a strided one with stride 0 and
//! batch count 1.

use crate::{BlasError, Result};

/// A read-only batched operand.
#[derive(Debug, Clone, Copy)]
pub enum BatchRef<'a, T> {
    /// Single instance.
    Plain(&'a [T]),
    /// `batch_count` instances at a fixed element stride.
    Strided { data: &'a [T], stride: isize },
    /// One independent buffer per instance.
    Pointers(&'a [&'a [T]]),
}

/// A mutable batched operand.
#[derive(Debug)]
pub enum BatchMut<'a, T> {
    Plain(&'a mut [T]),
    Strided { data: &'a mut [T], stride: isize },
    Pointers(&'a mut [&'a mut [T]]),
}

impl<'a, T> BatchRef<'a, T> {
    /// Base slice of instance `i`.
    #[inline]
    pub(crate) fn instance(&self, i: usize) -> &'a [T] {
        match *self {
            BatchRef::Plain(data) => data,
            BatchRef::Strided { data, stride } => &data[i * stride as usize..],
            BatchRef::Pointers(ptrs) => ptrs[i],
        }
    }

    /// The smallest instance span available across `batch_count` instances.
    /// Validation compares this against the operation's required span.
    pub(crate) fn min_len(&self, batch_count: usize) -> usize {
        match *self {
            BatchRef::Plain(data) => data.len(),
            BatchRef::Strided { data, stride } => {
                if batch_count == 0 {
                    data.len()
                } else {
                    data.len()
                        .saturating_sub((batch_count - 1) * stride.unsigned_abs())
                }
            }
            BatchRef::Pointers(ptrs) => ptrs
                .iter()
                .take(batch_count)
                .map(|p| p.len())
                .min()
                .unwrap_or(0),
        }
    }

    /// The batch stride, when the representation carries one.
    pub(crate) fn stride(&self) -> Option<isize> {
        match self {
            BatchRef::Strided { stride, .. } => Some(*stride),
            _ => None,
        }
    }

    /// Number of per-instance pointers, for the pointer-batched shape.
    pub(crate) fn pointer_count(&self) -> Option<usize> {
        match self {
            BatchRef::Pointers(ptrs) => Some(ptrs.len()),
            _ => None,
        }
    }
}

impl<'a, T> BatchMut<'a, T> {
    /// Base slice of instance `i`, mutably.
    #[inline]
    pub(crate) fn instance_mut(&mut self, i: usize) -> &mut [T] {
        match self {
            BatchMut::Plain(data) => data,
            BatchMut::Strided { data, stride } => &mut data[i * *stride as usize..],
            BatchMut::Pointers(ptrs) => ptrs[i],
        }
    }

    /// Base slice of instance `i`, read-only (numerics-guard scans).
    #[inline]
    pub(crate) fn instance(&self, i: usize) -> &[T] {
        match self {
            BatchMut::Plain(data) => data,
            BatchMut::Strided { data, stride } => &data[i * *stride as usize..],
            BatchMut::Pointers(ptrs) => ptrs[i],
        }
    }

    pub(crate) fn min_len(&self, batch_count: usize) -> usize {
        match self {
            BatchMut::Plain(data) => data.len(),
            BatchMut::Strided { data, stride } => {
                if batch_count == 0 {
                    data.len()
                } else {
                    data.len()
                        .saturating_sub((batch_count - 1) * stride.unsigned_abs())
                }
            }
            BatchMut::Pointers(ptrs) => ptrs
                .iter()
                .take(batch_count)
                .map(|p| p.len())
                .min()
                .unwrap_or(0),
        }
    }

    pub(crate) fn stride(&self) -> Option<isize> {
        match self {
            BatchMut::Strided { stride, .. } => Some(*stride),
            _ => None,
        }
    }

    pub(crate) fn pointer_count(&self) -> Option<usize> {
        match self {
            BatchMut::Pointers(ptrs) => Some(ptrs.len()),
            _ => None,
        }
    }

    /// Whether distinct batch indices resolve to overlapping memory.
    /// Output operands must not alias across instances.
    pub(crate) fn check_output_shape(&self, batch_count: usize, name: &'static str) -> Result<()> {
        match self {
            BatchMut::Plain(_) if batch_count > 1 => Err(BlasError::InvalidSize(name)),
            BatchMut::Strided { stride, .. } if *stride == 0 && batch_count > 1 => {
                Err(BlasError::InvalidSize(name))
            }
            _ => Ok(()),
        }
    }
}

// ============================================================================
// Increment handling
// ============================================================================

/// Base offset for a vector traversed with increment `inc`.
///
/// A negative increment walks the buffer backwards; shifting the base by
/// `-(inc) * (n - 1)` makes loop index 0 address the first logically-visited
/// element, so kernels never special-case the direction.
#[inline(always)]
pub(crate) fn neg_inc_offset(n: usize, inc: isize) -> isize {
    if inc < 0 {
        (n as isize - 1) * (-inc)
    } else {
        0
    }
}

/// Buffer index of logical element `j` given a precomputed base offset.
#[inline(always)]
pub(crate) fn vec_index(base: isize, j: usize, inc: isize) -> usize {
    (base + j as isize * inc) as usize
}
