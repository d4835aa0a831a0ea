use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Sub, SubAssign};

use primitive_types::{U256, U512};

/// The unsigned integer used by a dictionary to express counts and by the coder to express
/// interval bounds.
///
/// Two instantiations are provided: `u64`, the fast path used by every counting model, and
/// [`U256`], used by the blended PPM models whose totals are products of one factor per context
/// level.
pub trait Count:
    Copy
    + Debug
    + Display
    + Default
    + Eq
    + Ord
    + Hash
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
{
    /// How many bits the type can hold.
    const BITS: u32;

    fn zero() -> Self;

    fn one() -> Self;

    fn from_u64(value: u64) -> Self;

    /// Returns `2^exp`. `exp` must be smaller than [`Self::BITS`].
    fn pow2(exp: u32) -> Self;

    fn checked_sub(self, other: Self) -> Option<Self>;

    /// The lowest 64 bits of the value.
    fn low_u64(self) -> u64;

    /// Computes `floor(a * b / c)` through a double-width product.
    ///
    /// # Panics
    /// Panics if `c` is zero or if the quotient doesn't fit into `Self`.
    fn mul_div(a: Self, b: Self, c: Self) -> Self;

    /// Computes `floor((a * b - 1) / c)` through a double-width product.
    ///
    /// # Panics
    /// Panics if `c` is zero, if `a * b` is zero or if the quotient doesn't fit into `Self`.
    fn mul_dec_div(a: Self, b: Self, c: Self) -> Self;
}

impl Count for u64 {
    const BITS: u32 = u64::BITS;

    #[inline(always)]
    fn zero() -> Self {
        0
    }

    #[inline(always)]
    fn one() -> Self {
        1
    }

    #[inline(always)]
    fn from_u64(value: u64) -> Self {
        value
    }

    #[inline(always)]
    fn pow2(exp: u32) -> Self {
        1_u64 << exp
    }

    #[inline(always)]
    fn checked_sub(self, other: Self) -> Option<Self> {
        u64::checked_sub(self, other)
    }

    #[inline(always)]
    fn low_u64(self) -> u64 {
        self
    }

    #[inline(always)]
    fn mul_div(a: Self, b: Self, c: Self) -> Self {
        assert_ne!(c, 0, "Division by zero while scaling a range");
        let quotient = (a as u128 * b as u128) / c as u128;
        u64::try_from(quotient).expect("Scaled value doesn't fit into u64")
    }

    #[inline(always)]
    fn mul_dec_div(a: Self, b: Self, c: Self) -> Self {
        assert_ne!(c, 0, "Division by zero while scaling a range");
        let quotient = (a as u128 * b as u128 - 1) / c as u128;
        u64::try_from(quotient).expect("Scaled value doesn't fit into u64")
    }
}

impl Count for U256 {
    const BITS: u32 = 256;

    #[inline(always)]
    fn zero() -> Self {
        U256::zero()
    }

    #[inline(always)]
    fn one() -> Self {
        U256::one()
    }

    #[inline(always)]
    fn from_u64(value: u64) -> Self {
        U256::from(value)
    }

    #[inline(always)]
    fn pow2(exp: u32) -> Self {
        U256::one() << exp
    }

    #[inline(always)]
    fn checked_sub(self, other: Self) -> Option<Self> {
        U256::checked_sub(self, other)
    }

    #[inline(always)]
    fn low_u64(self) -> u64 {
        U256::low_u64(&self)
    }

    fn mul_div(a: Self, b: Self, c: Self) -> Self {
        assert!(!c.is_zero(), "Division by zero while scaling a range");
        let quotient = a.full_mul(b) / U512::from(c);
        U256::try_from(quotient).expect("Scaled value doesn't fit into U256")
    }

    fn mul_dec_div(a: Self, b: Self, c: Self) -> Self {
        assert!(!c.is_zero(), "Division by zero while scaling a range");
        let quotient = (a.full_mul(b) - U512::one()) / U512::from(c);
        U256::try_from(quotient).expect("Scaled value doesn't fit into U256")
    }
}

/// Computes `floor(a * b / c)` for any [`Count`].
#[inline(always)]
pub fn mul_div<C: Count>(a: C, b: C, c: C) -> C {
    C::mul_div(a, b, c)
}

/// Computes `floor((a * b - 1) / c)` for any [`Count`].
#[inline(always)]
pub fn mul_dec_div<C: Count>(a: C, b: C, c: C) -> C {
    C::mul_dec_div(a, b, c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_div_does_not_overflow_on_wide_products() {
        let a = u64::MAX;
        let b = u64::MAX - 1;
        assert_eq!(mul_div(a, b, u64::MAX), u64::MAX - 1);
        assert_eq!(mul_div(1_u64 << 62, 3, 4), 3 << 60);
    }

    #[test]
    fn mul_dec_div_rounds_down_the_decremented_product() {
        assert_eq!(mul_dec_div(4_u64, 4, 4), 3);
        assert_eq!(mul_dec_div(5_u64, 3, 5), 2);
        assert_eq!(mul_dec_div(1_u64, 1, 1), 0);
    }

    #[test]
    fn wide_path_agrees_with_the_fast_path() {
        let cases = [(17_u64, 99_u64, 5_u64), (1 << 40, 1 << 41, 7), (u64::MAX, 3, 11)];

        for (a, b, c) in cases {
            let wide = mul_div(U256::from(a), U256::from(b), U256::from(c));
            let fast = mul_div(a, b, c);
            assert_eq!(wide, U256::from(fast));

            let wide = mul_dec_div(U256::from(a), U256::from(b), U256::from(c));
            let fast = mul_dec_div(a, b, c);
            assert_eq!(wide, U256::from(fast));
        }
    }

    #[test]
    fn wide_path_handles_240_bit_operands() {
        let total = U256::pow2(240);
        let half = U256::pow2(239);
        assert_eq!(mul_div(total, half, total), half);
        assert_eq!(mul_div(total, U256::from(3), U256::from(4)), U256::pow2(238) * 3_u64);
    }

    #[test]
    #[should_panic]
    fn mul_div_panics_on_zero_divisor() {
        mul_div(1_u64, 1, 0);
    }
}
