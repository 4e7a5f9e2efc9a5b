//! Scalar model shared by every kernel.
//!
//! Two concerns live here:
//!
//! - the [`Scalar`] trait, which closes over the element types the kernels
//!   support (`f32`, `f64`, `half::f16`, `Complex<f32>`, `Complex<f64>`) and
//!   exposes the conjugation/real-part/NaN-Inf-denormal predicates the
//!   compute engine and the numerics guard need;
//! - the [`ScalarArg`] operand, which models the two residencies a scaling
//!   factor can have: a host value that argument validation may inspect, or
//!   a device-resident value that only a kernel may dereference.

use half::f16;
use num_complex::Complex;
use num_traits::{Float, One, Zero};
use std::fmt::Debug;
use std::num::FpCategory;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Element types usable with the batched kernels.
///
/// The predicates operate per real/imaginary component for complex types: a
/// complex value is NaN if either component is NaN (IEEE convention extended
/// elementwise). `conj` is the identity for real types.
pub trait Scalar:
    Copy
    + Send
    + Sync
    + Debug
    + PartialEq
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + Zero
    + One
    + 'static
{
    /// The associated real type (`Self` for real scalars).
    type Real: Scalar + Float;

    /// Machine epsilon of the underlying real type, as `f64`.
    const EPS: f64;

    /// Whether the type carries an imaginary component.
    const IS_COMPLEX: bool;

    /// Complex conjugate; identity for real types.
    fn conj(self) -> Self;

    /// Real part.
    fn re(self) -> Self::Real;

    /// Imaginary part; zero for real types.
    fn im(self) -> Self::Real;

    /// Lift a real value into `Self` (imaginary part zero).
    fn from_real(r: Self::Real) -> Self;

    /// Drop the imaginary part. Used on the main diagonal of Hermitian
    /// operands, which is real by definition regardless of what is stored.
    fn force_real(self) -> Self;

    /// Squared modulus, as a real value.
    #[inline]
    fn abs_sqr(self) -> Self::Real {
        self.re() * self.re() + self.im() * self.im()
    }

    /// The |re| + |im| "one-norm" used by asum/iamax.
    #[inline]
    fn abs1(self) -> Self::Real {
        self.re().abs() + self.im().abs()
    }

    fn is_nan(self) -> bool;
    fn is_inf(self) -> bool;
    fn is_denormal(self) -> bool;
}

macro_rules! impl_scalar_real {
    ($($t:ty => $eps:expr),* $(,)?) => {
        $(
            impl Scalar for $t {
                type Real = $t;
                const EPS: f64 = $eps;
                const IS_COMPLEX: bool = false;

                #[inline(always)]
                fn conj(self) -> Self {
                    self
                }
                #[inline(always)]
                fn re(self) -> Self::Real {
                    self
                }
                #[inline(always)]
                fn im(self) -> Self::Real {
                    Self::Real::zero()
                }
                #[inline(always)]
                fn from_real(r: Self::Real) -> Self {
                    r
                }
                #[inline(always)]
                fn force_real(self) -> Self {
                    self
                }
                #[inline(always)]
                fn is_nan(self) -> bool {
                    Float::is_nan(self)
                }
                #[inline(always)]
                fn is_inf(self) -> bool {
                    Float::is_infinite(self)
                }
                #[inline(always)]
                fn is_denormal(self) -> bool {
                    Float::classify(self) == FpCategory::Subnormal
                }
            }
        )*
    };
}

impl_scalar_real!(
    f32 => 1.1920929e-7,
    f64 => 2.220446049250313e-16,
    f16 => 9.765625e-4,
);

macro_rules! impl_scalar_complex {
    ($($t:ty),* $(,)?) => {
        $(
            impl Scalar for Complex<$t> {
                type Real = $t;
                const EPS: f64 = <$t as Scalar>::EPS;
                const IS_COMPLEX: bool = true;

                #[inline(always)]
                fn conj(self) -> Self {
                    Complex::conj(&self)
                }
                #[inline(always)]
                fn re(self) -> Self::Real {
                    self.re
                }
                #[inline(always)]
                fn im(self) -> Self::Real {
                    self.im
                }
                #[inline(always)]
                fn from_real(r: Self::Real) -> Self {
                    Complex::new(r, <$t>::zero())
                }
                #[inline(always)]
                fn force_real(self) -> Self {
                    Complex::new(self.re, <$t>::zero())
                }
                #[inline(always)]
                fn is_nan(self) -> bool {
                    self.re.is_nan() || self.im.is_nan()
                }
                #[inline(always)]
                fn is_inf(self) -> bool {
                    self.re.is_infinite() || self.im.is_infinite()
                }
                #[inline(always)]
                fn is_denormal(self) -> bool {
                    self.re.classify() == FpCategory::Subnormal
                        || self.im.classify() == FpCategory::Subnormal
                }
            }
        )*
    };
}

impl_scalar_complex!(f32, f64);

// ============================================================================
// Pointer mode and scalar operands
// ============================================================================

/// Residency of the alpha/beta scaling factors for a call.
///
/// In `Host` mode the values are visible to argument validation, which may
/// branch on them (alpha == 0 fast paths, beta == 1 no-op shortcuts). In
/// `Device` mode validation must not dereference them; every value-dependent
/// decision moves into the kernel as a runtime branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerMode {
    #[default]
    Host,
    Device,
}

/// A scaling factor, either host-resident or device-resident.
///
/// The `Device` variant stands in for a pointer into kernel-visible memory:
/// it can be constructed and passed around freely, but only
/// [`ScalarArg::load`] (crate-private, called at kernel entry) reads it.
#[derive(Debug, Clone, Copy)]
pub enum ScalarArg<'a, T> {
    Host(T),
    Device(&'a T),
}

impl<T: Copy> ScalarArg<'_, T> {
    /// The residency of this operand.
    #[inline]
    pub fn mode(&self) -> PointerMode {
        match self {
            ScalarArg::Host(_) => PointerMode::Host,
            ScalarArg::Device(_) => PointerMode::Device,
        }
    }

    /// The value, if it is inspectable at validation time.
    ///
    /// Returns `None` for device-resident operands; callers must then defer
    /// all value-dependent logic into the kernel.
    #[inline]
    pub fn host_value(&self) -> Option<T> {
        match self {
            ScalarArg::Host(v) => Some(*v),
            ScalarArg::Device(_) => None,
        }
    }

    /// Dereference the operand. Kernel-entry use only: by this point the
    /// call is committed and both residencies are loadable.
    #[inline]
    pub(crate) fn load(&self) -> T {
        match self {
            ScalarArg::Host(v) => *v,
            ScalarArg::Device(p) => **p,
        }
    }
}
