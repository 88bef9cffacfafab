//! Element storage.
//!
//! An [`Elem`] is a slot whose contents are meaningful only relative to the
//! [`Context`](crate::Context) that produced it. Ring semantics (equality,
//! arithmetic) always go through the context; the derived `PartialEq` here
//! compares representations only.

use std::ops::Deref;

use dashu::integer::IBig;
use dashu::rational::RBig;

use crate::balls::Ball;

/// One element of some ring.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Elem {
    /// An element of Z.
    Integer(IBig),
    /// An element of Q.
    Rational(RBig),
    /// A residue in Z/nZ, always reduced into `0..n`.
    Residue(u64),
    /// A real ball with exact rational midpoint and radius.
    Ball(Ball),
    /// A dense polynomial over some base ring.
    Poly(Poly),
}

impl Elem {
    /// Short name of the representation, used in log messages.
    #[must_use]
    pub fn repr_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::Rational(_) => "rational",
            Self::Residue(_) => "residue",
            Self::Ball(_) => "ball",
            Self::Poly(_) => "poly",
        }
    }

    /// Returns the integer payload, if any.
    #[must_use]
    pub fn as_integer(&self) -> Option<&IBig> {
        match self {
            Self::Integer(x) => Some(x),
            _ => None,
        }
    }

    /// Returns the rational payload, if any.
    #[must_use]
    pub fn as_rational(&self) -> Option<&RBig> {
        match self {
            Self::Rational(x) => Some(x),
            _ => None,
        }
    }

    /// Returns the residue payload, if any.
    #[must_use]
    pub fn as_residue(&self) -> Option<u64> {
        match self {
            Self::Residue(x) => Some(*x),
            _ => None,
        }
    }

    /// Returns the ball payload, if any.
    #[must_use]
    pub fn as_ball(&self) -> Option<&Ball> {
        match self {
            Self::Ball(x) => Some(x),
            _ => None,
        }
    }

    /// Returns the polynomial payload, if any.
    #[must_use]
    pub fn as_poly(&self) -> Option<&Poly> {
        match self {
            Self::Poly(x) => Some(x),
            _ => None,
        }
    }
}

/// A dense univariate polynomial.
///
/// Coefficients are stored in ascending degree order and belong to the base
/// ring of the polynomial context.
/// Invariant: the last stored coefficient is never definitely zero.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Poly {
    pub(crate) coeffs: Vec<Elem>,
}

impl Poly {
    /// Number of stored coefficients; zero for the zero polynomial.
    #[must_use]
    pub fn len(&self) -> usize {
        self.coeffs.len()
    }

    /// Returns true if no coefficients are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// Degree of the polynomial, `None` for the zero polynomial.
    #[must_use]
    pub fn degree(&self) -> Option<usize> {
        self.coeffs.len().checked_sub(1)
    }

    /// Returns all stored coefficients.
    #[must_use]
    pub fn coeffs(&self) -> &[Elem] {
        &self.coeffs
    }

    /// Returns the coefficient of x^i, if stored.
    #[must_use]
    pub fn coeff(&self, i: usize) -> Option<&Elem> {
        self.coeffs.get(i)
    }
}

/// A read-only view of another element, produced by `set_shallow`.
///
/// The view borrows its source, so the source outlives every use of the
/// view and the view can never be released on its own.
#[derive(Clone, Copy, Debug)]
pub struct Shallow<'a>(pub(crate) &'a Elem);

impl Deref for Shallow<'_> {
    type Target = Elem;

    fn deref(&self) -> &Self::Target {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poly_accessors() {
        let p = Poly {
            coeffs: vec![Elem::Integer(IBig::from(1)), Elem::Integer(IBig::from(2))],
        };
        assert_eq!(p.len(), 2);
        assert_eq!(p.degree(), Some(1));
        assert_eq!(p.coeff(1), Some(&Elem::Integer(IBig::from(2))));
        assert_eq!(p.coeff(2), None);
        assert_eq!(Poly::default().degree(), None);
    }

    #[test]
    fn test_payload_accessors() {
        let x = Elem::Residue(3);
        assert_eq!(x.as_residue(), Some(3));
        assert!(x.as_integer().is_none());
        assert_eq!(x.repr_name(), "residue");
    }
}
