//! Three-valued truth for predicates that are not always decidable.

use std::fmt;
use std::ops::Not;

/// The answer of a predicate such as `equal` or `is_zero`.
///
/// `Unknown` is returned whenever the backend cannot decide, e.g. when two
/// overlapping real intervals are compared. A predicate never guesses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Truth {
    /// Definitely true.
    True,
    /// Definitely false.
    False,
    /// Undecided.
    Unknown,
}

impl Truth {
    /// Three-valued conjunction.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        match (self, other) {
            (Self::False, _) | (_, Self::False) => Self::False,
            (Self::True, Self::True) => Self::True,
            _ => Self::Unknown,
        }
    }

    /// Three-valued disjunction.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        match (self, other) {
            (Self::True, _) | (_, Self::True) => Self::True,
            (Self::False, Self::False) => Self::False,
            _ => Self::Unknown,
        }
    }

    /// Conjunction over a sequence, stopping at the first definite `False`.
    pub fn all<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        let mut acc = Self::True;
        for t in iter {
            match t {
                Self::False => return Self::False,
                Self::Unknown => acc = Self::Unknown,
                Self::True => {}
            }
        }
        acc
    }

    /// Returns true if this is definitely true.
    #[must_use]
    pub fn is_true(self) -> bool {
        self == Self::True
    }

    /// Returns true if this is definitely false.
    #[must_use]
    pub fn is_false(self) -> bool {
        self == Self::False
    }

    /// Converts to a boolean when decided.
    #[must_use]
    pub fn to_bool(self) -> Option<bool> {
        match self {
            Self::True => Some(true),
            Self::False => Some(false),
            Self::Unknown => None,
        }
    }
}

impl Not for Truth {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Self::True => Self::False,
            Self::False => Self::True,
            Self::Unknown => Self::Unknown,
        }
    }
}

impl From<bool> for Truth {
    fn from(value: bool) -> Self {
        if value {
            Self::True
        } else {
            Self::False
        }
    }
}

impl fmt::Display for Truth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::True => write!(f, "true"),
            Self::False => write!(f, "false"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connectives() {
        use Truth::{False, True, Unknown};

        assert_eq!(True.and(Unknown), Unknown);
        assert_eq!(False.and(Unknown), False);
        assert_eq!(True.or(Unknown), True);
        assert_eq!(False.or(Unknown), Unknown);
        assert_eq!(!Unknown, Unknown);
        assert_eq!(!True, False);
    }

    #[test]
    fn test_all_short_circuits() {
        let mut seen = 0;
        let t = Truth::all(
            [Truth::Unknown, Truth::False, Truth::True]
                .into_iter()
                .inspect(|_| seen += 1),
        );
        assert_eq!(t, Truth::False);
        assert_eq!(seen, 2);

        assert_eq!(Truth::all([Truth::True, Truth::Unknown]), Truth::Unknown);
        assert_eq!(Truth::all(std::iter::empty()), Truth::True);
    }
}
