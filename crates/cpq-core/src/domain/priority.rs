//! Numeric priority contract.
//!
//! Priorities and weights share one type. Lower priority values are more
//! urgent. The store orders keys with `total_cmp`, so every accepted value
//! must have a place in a total order: `is_valid` is checked at the queue
//! boundary and invalid values never reach the store.

use std::cmp::Ordering;
use std::fmt;

/// Ordered numeric type usable as a priority and as a weight.
///
/// Contract:
/// - `total_cmp` is a total order and agrees with `PartialOrd` on valid values;
///   in particular `-0.0` and `0.0` compare equal.
/// - `is_valid` is false for values with no place in that order (NaN, infinities).
/// - `zero()` is the floor every released priority is clamped to.
/// - `one()` is the default weight.
/// - `saturating_sub` does not overflow.
pub trait Priority: Copy + PartialOrd + fmt::Debug + fmt::Display + Send + Sync + 'static {
    fn zero() -> Self;

    fn one() -> Self;

    fn is_valid(&self) -> bool;

    fn total_cmp(&self, other: &Self) -> Ordering;

    fn saturating_sub(self, rhs: Self) -> Self;

    /// Priority after a resolved cause of weight `weight` releases this task.
    ///
    /// `max(0, self - weight)`. A negative priority is lifted to zero.
    fn released_by(self, weight: Self) -> Self {
        let zero = Self::zero();
        let lowered = self.saturating_sub(weight);
        if lowered.total_cmp(&zero) == Ordering::Greater {
            lowered
        } else {
            zero
        }
    }

    /// Weights must be strictly positive.
    fn is_valid_weight(&self) -> bool {
        self.is_valid() && self.total_cmp(&Self::zero()) == Ordering::Greater
    }
}

macro_rules! impl_integer_priority {
    ($($t:ty),* $(,)?) => {
        $(
            impl Priority for $t {
                fn zero() -> Self {
                    0
                }

                fn one() -> Self {
                    1
                }

                fn is_valid(&self) -> bool {
                    true
                }

                fn total_cmp(&self, other: &Self) -> Ordering {
                    Ord::cmp(self, other)
                }

                fn saturating_sub(self, rhs: Self) -> Self {
                    <$t>::saturating_sub(self, rhs)
                }
            }
        )*
    };
}

macro_rules! impl_float_priority {
    ($($t:ty),* $(,)?) => {
        $(
            impl Priority for $t {
                fn zero() -> Self {
                    0.0
                }

                fn one() -> Self {
                    1.0
                }

                fn is_valid(&self) -> bool {
                    self.is_finite()
                }

                fn total_cmp(&self, other: &Self) -> Ordering {
                    // signed zeros are one priority
                    if self == other {
                        Ordering::Equal
                    } else {
                        <$t>::total_cmp(self, other)
                    }
                }

                fn saturating_sub(self, rhs: Self) -> Self {
                    self - rhs
                }
            }
        )*
    };
}

impl_integer_priority!(i32, i64, u32, u64);
impl_float_priority!(f32, f64);

/// `Ord` wrapper so priorities can key a `BTreeMap`.
#[derive(Debug, Clone, Copy)]
pub struct PriorityKey<P>(pub P);

impl<P: Priority> PartialEq for PriorityKey<P> {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}

impl<P: Priority> Eq for PriorityKey<P> {}

impl<P: Priority> PartialOrd for PriorityKey<P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<P: Priority> Ord for PriorityKey<P> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}
