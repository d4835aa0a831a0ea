use crate::arith::{mul_div, Count};
use crate::dictionary::ProbabilityStats;

/// A coding interval `[low, high)` on a domain of `2^W` values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Range<C> {
    pub low: C,
    pub high: C,
}

/// Which of the three renormalisation cases applies to a range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RangeCase {
    /// The interval is entirely in the lower half.
    Lower,
    /// The interval is entirely in the upper half.
    Upper,
    /// The interval straddles the midpoint inside `[quarter, threeQuarters]`.
    Middle,
}

/// Interval arithmetic on a fixed bit width `W`.
///
/// The width is a property of the dictionary in use, so encoder and decoder build their
/// calculator from the same `COUNT_NUM_BITS`.
#[derive(Clone, Copy, Debug)]
pub struct RangesCalc<C> {
    pub num_bits: u32,
    pub total: C,
    pub half: C,
    pub quarter: C,
    pub three_quarters: C,
}

impl<C: Count> RangesCalc<C> {
    /// Creates the calculator for a `2^num_bits` domain.
    ///
    /// # Panics
    /// Panics if `num_bits` is smaller than 2 or leaves no headroom in `C`.
    pub fn new(num_bits: u32) -> Self {
        assert!(
            num_bits >= 2 && num_bits < C::BITS,
            "Range width must be in [2, {})",
            C::BITS
        );
        let quarter = C::pow2(num_bits - 2);

        Self {
            num_bits,
            total: C::pow2(num_bits),
            half: C::pow2(num_bits - 1),
            quarter,
            three_quarters: quarter + quarter + quarter,
        }
    }

    /// The whole domain `[0, total)`.
    #[inline(always)]
    pub fn full_range(&self) -> Range<C> {
        Range {
            low: C::zero(),
            high: self.total,
        }
    }

    /// Tells which renormalisation case, if any, applies to the given range.
    #[inline(always)]
    pub fn case(&self, range: &Range<C>) -> Option<RangeCase> {
        if range.high <= self.half {
            Some(RangeCase::Lower)
        } else if range.low >= self.half {
            Some(RangeCase::Upper)
        } else if range.low >= self.quarter && range.high <= self.three_quarters {
            Some(RangeCase::Middle)
        } else {
            None
        }
    }

    /// Applies one renormalisation step for the given case, doubling the interval.
    #[inline(always)]
    pub fn recalc(&self, range: Range<C>, case: RangeCase) -> Range<C> {
        let two = C::from_u64(2);
        match case {
            RangeCase::Lower => Range {
                low: range.low * two,
                high: range.high * two,
            },
            RangeCase::Upper => Range {
                low: range.low * two - self.total,
                high: range.high * two - self.total,
            },
            RangeCase::Middle => Range {
                low: range.low * two - self.half,
                high: range.high * two - self.half,
            },
        }
    }

    /// Narrows the range to the sub-interval described by `stats`.
    #[inline(always)]
    pub fn narrow(&self, range: Range<C>, stats: &ProbabilityStats<C>) -> Range<C> {
        let width = range.high - range.low;
        Range {
            low: range.low + mul_div(width, stats.low, stats.total),
            high: range.low + mul_div(width, stats.high, stats.total),
        }
    }
}
