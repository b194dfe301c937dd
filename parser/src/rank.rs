use std::fmt;

use serde::*;

/// The rank that means "never recurse"
pub const INFINITE_RANK: i32 = 100;

/// The per-argument ranks of a function
///
/// A rank decides, for each application, whether the function recurses into
/// the elements of an argument or receives the argument whole.
/// Non-negative ranks compare against the argument's depth.
/// Negative ranks recurse until only that many levels above the leaves remain.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "(i32, i32, i32)", into = "(i32, i32, i32)")]
pub struct RankSpec {
    /// The rank used when the function is called with one argument
    pub monadic: i32,
    /// The rank of the left argument of a dyadic call
    pub left: i32,
    /// The rank of the right argument of a dyadic call
    pub right: i32,
}

impl RankSpec {
    /// A rank that never recurses
    pub const INFINITE: Self = Self::uniform(INFINITE_RANK);
    /// Create a rank from all three components
    pub const fn new(monadic: i32, left: i32, right: i32) -> Self {
        Self {
            monadic,
            left,
            right,
        }
    }
    /// Use the same rank for every argument
    pub const fn uniform(rank: i32) -> Self {
        Self::new(rank, rank, rank)
    }
    /// Build a rank from a left rank and a right rank
    ///
    /// The right rank doubles as the monadic rank.
    pub const fn pair(left: i32, right: i32) -> Self {
        Self::new(right, left, right)
    }
    /// Build a rank from one, two, or three integers
    pub fn from_slice(ranks: &[i32]) -> Option<Self> {
        Some(match *ranks {
            [r] => Self::uniform(r),
            [left, right] => Self::pair(left, right),
            [monadic, left, right] => Self::new(monadic, left, right),
            _ => return None,
        })
    }
}

impl From<i32> for RankSpec {
    fn from(rank: i32) -> Self {
        Self::uniform(rank)
    }
}

impl From<(i32, i32)> for RankSpec {
    fn from((left, right): (i32, i32)) -> Self {
        Self::pair(left, right)
    }
}

impl From<(i32, i32, i32)> for RankSpec {
    fn from((monadic, left, right): (i32, i32, i32)) -> Self {
        Self::new(monadic, left, right)
    }
}

impl From<RankSpec> for (i32, i32, i32) {
    fn from(rank: RankSpec) -> Self {
        (rank.monadic, rank.left, rank.right)
    }
}

impl fmt::Debug for RankSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.monadic, self.left, self.right)
    }
}

impl fmt::Display for RankSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |f: &mut fmt::Formatter<'_>, r: i32| {
            if r >= INFINITE_RANK {
                write!(f, "∞")
            } else {
                write!(f, "{r}")
            }
        };
        show(f, self.monadic)?;
        write!(f, " ")?;
        show(f, self.left)?;
        write!(f, " ")?;
        show(f, self.right)
    }
}

/// The minimum nesting each argument is wrapped to before a body runs
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(from = "(u8, u8, u8)", into = "(u8, u8, u8)")]
pub struct PadSpec {
    /// The pad depth of the sole argument of a monadic call
    pub monadic: u8,
    /// The pad depth of the left argument of a dyadic call
    pub left: u8,
    /// The pad depth of the right argument of a dyadic call
    pub right: u8,
}

impl PadSpec {
    /// No padding
    pub const NONE: Self = Self::new(0, 0, 0);
    /// Create a pad from all three components
    pub const fn new(monadic: u8, left: u8, right: u8) -> Self {
        Self {
            monadic,
            left,
            right,
        }
    }
}

impl From<u8> for PadSpec {
    fn from(pad: u8) -> Self {
        Self::new(pad, pad, pad)
    }
}

impl From<(u8, u8, u8)> for PadSpec {
    fn from((monadic, left, right): (u8, u8, u8)) -> Self {
        Self::new(monadic, left, right)
    }
}

impl From<PadSpec> for (u8, u8, u8) {
    fn from(pad: PadSpec) -> Self {
        (pad.monadic, pad.left, pad.right)
    }
}

impl fmt::Debug for PadSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.monadic, self.left, self.right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization() {
        assert_eq!(RankSpec::from(5), RankSpec::new(5, 5, 5));
        assert_eq!(RankSpec::from((2, 7)), RankSpec::new(7, 2, 7));
        assert_eq!(RankSpec::from_slice(&[2, 7]), Some(RankSpec::new(7, 2, 7)));
        assert_eq!(RankSpec::from_slice(&[1, 2, 3]), Some(RankSpec::new(1, 2, 3)));
        assert_eq!(RankSpec::from_slice(&[]), None);
        assert_eq!(RankSpec::from_slice(&[1, 2, 3, 4]), None);
    }

    #[test]
    fn infinite_display() {
        assert_eq!(RankSpec::new(100, 0, -1).to_string(), "∞ 0 -1");
    }
}
