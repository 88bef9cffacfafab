//! Outcome codes for fallible ring operations.
//!
//! Every operation that can fail returns a [`GrResult`]. The error side has
//! two cases: either the operation is mathematically undefined for
//! its inputs ([`GrError::Domain`]) or the backend could not decide or does
//! not implement it ([`GrError::Unable`]).
//!
//! Operations built from several sub-operations accumulate their outcomes in
//! a [`Status`], where `Domain` dominates `Unable`, which dominates success.

use std::ops::{BitOr, BitOrAssign};

use thiserror::Error;

/// Failure of a ring operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum GrError {
    /// The operation is undefined for the given inputs in this structure,
    /// e.g. exact division with a nonzero remainder or inverting a non-unit.
    #[error("operation is undefined for the given input")]
    Domain,
    /// The backend could not determine an answer, or the operation is not
    /// implemented for this structure.
    #[error("unable to compute a result")]
    Unable,
}

impl GrError {
    /// Returns the more severe of two errors.
    #[must_use]
    pub fn worst(self, other: Self) -> Self {
        if self == Self::Domain || other == Self::Domain {
            Self::Domain
        } else {
            Self::Unable
        }
    }
}

/// Result of a ring operation.
pub type GrResult<T = ()> = Result<T, GrError>;

/// Accumulated outcome of a sequence of sub-operations.
///
/// ```
/// use gring_rings::{GrError, Status};
///
/// let mut status = Status::default();
/// status |= Ok(());
/// status |= Err(GrError::Unable);
/// status |= Ok(());
/// assert_eq!(status.into_result(), Err(GrError::Unable));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Status(Option<GrError>);

impl Status {
    /// The empty accumulator.
    pub const SUCCESS: Self = Self(None);

    /// Folds one more outcome into the accumulator.
    pub fn record(&mut self, outcome: GrResult) {
        if let Err(err) = outcome {
            self.0 = Some(match self.0 {
                Some(prev) => prev.worst(err),
                None => err,
            });
        }
    }

    /// Returns true if no failure has been recorded.
    #[must_use]
    pub fn is_success(self) -> bool {
        self.0.is_none()
    }

    /// Returns the worst failure recorded so far.
    #[must_use]
    pub fn error(self) -> Option<GrError> {
        self.0
    }

    /// Converts the accumulator into an operation result.
    ///
    /// # Errors
    ///
    /// Returns the most severe recorded failure.
    pub fn into_result(self) -> GrResult {
        match self.0 {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl BitOrAssign<GrResult> for Status {
    fn bitor_assign(&mut self, rhs: GrResult) {
        self.record(rhs);
    }
}

impl BitOrAssign for Status {
    fn bitor_assign(&mut self, rhs: Self) {
        self.record(rhs.into_result());
    }
}

impl BitOr for Status {
    type Output = Self;

    fn bitor(mut self, rhs: Self) -> Self::Output {
        self |= rhs;
        self
    }
}

impl From<GrError> for Status {
    fn from(value: GrError) -> Self {
        Self(Some(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_dominates_unable() {
        assert_eq!(GrError::Unable.worst(GrError::Domain), GrError::Domain);
        assert_eq!(GrError::Domain.worst(GrError::Unable), GrError::Domain);
        assert_eq!(GrError::Unable.worst(GrError::Unable), GrError::Unable);
    }

    #[test]
    fn test_accumulate() {
        let mut status = Status::SUCCESS;
        assert!(status.is_success());

        status |= Err(GrError::Domain);
        status |= Err(GrError::Unable);
        status |= Ok(());
        assert_eq!(status.error(), Some(GrError::Domain));
        assert_eq!(status.into_result(), Err(GrError::Domain));
    }

    #[test]
    fn test_combine_statuses() {
        let a = Status::from(GrError::Unable);
        let b = Status::SUCCESS;
        assert_eq!((a | b).into_result(), Err(GrError::Unable));
        assert_eq!((b | b).into_result(), Ok(()));
    }
}
