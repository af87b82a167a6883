// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scalar abstraction over `f32` and `f64`.

use core::fmt::Debug;
use core::ops::{Add, Div, Mul, Sub};

/// Floating-point scalar used for row extents, offsets, and scroll positions.
///
/// Only the handful of operations needed by row arithmetic are exposed, so the
/// crate stays `no_std` without pulling in a math library.
pub trait Scalar:
    Copy
    + Debug
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
{
    /// Additive identity.
    fn zero() -> Self;

    /// Converts an index or count into this scalar.
    fn from_usize(value: usize) -> Self;

    /// Returns the larger of `self` and `other`.
    #[must_use]
    fn max(self, other: Self) -> Self;

    /// Returns the smaller of `self` and `other`.
    #[must_use]
    fn min(self, other: Self) -> Self;

    /// Returns `true` if the value is neither infinite nor NaN.
    fn is_finite(self) -> bool;

    /// Returns `true` if the sign bit is set (including `-0.0`).
    fn is_sign_negative(self) -> bool;

    /// Largest integer less than or equal to `self`, saturating at the `isize` range.
    ///
    /// NaN maps to `0`.
    fn floor_to_isize(self) -> isize;

    /// Smallest integer greater than or equal to `self`, saturating at the `isize` range.
    ///
    /// NaN maps to `0`.
    fn ceil_to_isize(self) -> isize;
}

macro_rules! impl_scalar {
    ($t:ty) => {
        impl Scalar for $t {
            #[inline]
            fn zero() -> Self {
                0.0
            }

            #[inline]
            #[allow(
                clippy::cast_precision_loss,
                reason = "Row counts far below 2^24 are exact; larger counts only lose sub-pixel precision"
            )]
            fn from_usize(value: usize) -> Self {
                value as $t
            }

            #[inline]
            fn max(self, other: Self) -> Self {
                <$t>::max(self, other)
            }

            #[inline]
            fn min(self, other: Self) -> Self {
                <$t>::min(self, other)
            }

            #[inline]
            fn is_finite(self) -> bool {
                <$t>::is_finite(self)
            }

            #[inline]
            fn is_sign_negative(self) -> bool {
                <$t>::is_sign_negative(self)
            }

            #[inline]
            #[allow(
                clippy::cast_possible_truncation,
                reason = "Float to int casts saturate; the result is corrected by one step at most"
            )]
            fn floor_to_isize(self) -> isize {
                let truncated = self as isize;
                if (truncated as $t) > self {
                    truncated - 1
                } else {
                    truncated
                }
            }

            #[inline]
            #[allow(
                clippy::cast_possible_truncation,
                reason = "Float to int casts saturate; the result is corrected by one step at most"
            )]
            fn ceil_to_isize(self) -> isize {
                let truncated = self as isize;
                if (truncated as $t) < self {
                    truncated + 1
                } else {
                    truncated
                }
            }
        }
    };
}

impl_scalar!(f32);
impl_scalar!(f64);
