//! Factorization of univariate polynomials over Q.
//!
//! The polynomial is made monic, split into square-free parts with Yun's
//! algorithm, and each part is searched for rational roots. What remains
//! after removing the linear factors is irreducible when its degree is two
//! or three; higher-degree remainders are reported as `Unable`.

use dashu::base::{Gcd, UnsignedAbs};
use dashu::integer::{IBig, UBig};
use dashu::rational::RBig;

use crate::context::Context;
use crate::elem::{Elem, Poly};
use crate::methods::FactorFlags;
use crate::rationals;
use crate::status::{GrError, GrResult};

/// Rational root candidates are enumerated from divisors of the constant
/// and leading integer coefficients; both must stay below this bound.
const ROOT_SEARCH_BOUND: u64 = 1 << 32;

/// Upper bound on the number of candidate roots tried per square-free part.
const MAX_CANDIDATES: usize = 1 << 16;

/// Dense polynomial over Q in ascending order, without trailing zeros.
type QPoly = Vec<RBig>;

fn trim(mut p: QPoly) -> QPoly {
    while p.last().is_some_and(|c| *c == RBig::ZERO) {
        p.pop();
    }
    p
}

fn derivative(p: &[RBig]) -> QPoly {
    let d = p
        .iter()
        .enumerate()
        .skip(1)
        .map(|(i, c)| c * RBig::from(IBig::from(i)))
        .collect();
    trim(d)
}

fn sub(a: &[RBig], b: &[RBig]) -> QPoly {
    let len = a.len().max(b.len());
    let d = (0..len)
        .map(|i| match (a.get(i), b.get(i)) {
            (Some(x), Some(y)) => x - y,
            (Some(x), None) => x.clone(),
            (None, Some(y)) => -y,
            (None, None) => RBig::ZERO,
        })
        .collect();
    trim(d)
}

/// Quotient and remainder; `b` must be nonzero.
fn divrem(a: &[RBig], b: &[RBig]) -> (QPoly, QPoly) {
    let Some(lead) = b.last() else {
        return (Vec::new(), a.to_vec());
    };
    if a.len() < b.len() {
        return (Vec::new(), a.to_vec());
    }
    let mut rem = a.to_vec();
    let mut quot = vec![RBig::ZERO; a.len() - b.len() + 1];
    for k in (0..quot.len()).rev() {
        let q = &rem[k + b.len() - 1] / lead;
        for (j, bj) in b.iter().enumerate() {
            rem[k + j] = &rem[k + j] - &q * bj;
        }
        quot[k] = q;
    }
    rem.truncate(b.len() - 1);
    (trim(quot), trim(rem))
}

fn make_monic(p: QPoly) -> QPoly {
    match p.last().cloned() {
        Some(lead) => p.into_iter().map(|c| c / &lead).collect(),
        None => p,
    }
}

/// Monic gcd; `gcd(0, 0) = 0`.
fn gcd(a: &[RBig], b: &[RBig]) -> QPoly {
    let (mut a, mut b) = (a.to_vec(), b.to_vec());
    while !b.is_empty() {
        let (_, r) = divrem(&a, &b);
        a = std::mem::replace(&mut b, r);
    }
    make_monic(a)
}

fn div_exact(a: &[RBig], b: &[RBig]) -> QPoly {
    divrem(a, b).0
}

fn eval(p: &[RBig], x: &RBig) -> RBig {
    p.iter().rev().fold(RBig::ZERO, |acc, c| acc * x + c)
}

/// Square-free decomposition of a monic polynomial of positive degree.
/// Returns the parts of positive degree with their multiplicities.
fn square_free(f: &[RBig]) -> Vec<(QPoly, u64)> {
    let mut parts = Vec::new();
    let fp = derivative(f);
    let a0 = gcd(f, &fp);
    let mut b = div_exact(f, &a0);
    let mut c = div_exact(&fp, &a0);
    let mut d = sub(&c, &derivative(&b));
    let mut i = 1;

    loop {
        let a = gcd(&b, &d);
        if a.len() > 1 {
            parts.push((a.clone(), i));
        }
        b = div_exact(&b, &a);
        if b.len() <= 1 {
            break;
        }
        c = div_exact(&d, &a);
        d = sub(&c, &derivative(&b));
        i += 1;
    }
    parts
}

fn divisors(n: u64) -> Vec<u64> {
    let mut small = Vec::new();
    let mut large = Vec::new();
    let mut k = 1;
    while k * k <= n {
        if n % k == 0 {
            small.push(k);
            if k * k != n {
                large.push(n / k);
            }
        }
        k += 1;
    }
    small.extend(large.into_iter().rev());
    small
}

/// Clears the denominators of `p` and returns the constant and leading
/// coefficients of the resulting integer polynomial.
fn integer_ends(p: &[RBig]) -> Option<(IBig, IBig)> {
    let den = p.iter().fold(UBig::ONE, |l, c| {
        let d = c.denominator();
        let g = (&l).gcd(d);
        &l / &g * d
    });
    let scale = RBig::from(IBig::from(den));
    let first = p.first()? * &scale;
    let last = p.last()? * &scale;
    Some((first.numerator().clone(), last.numerator().clone()))
}

fn small_abs(n: &IBig) -> GrResult<u64> {
    match u64::try_from(n.unsigned_abs()) {
        Ok(v) if v < ROOT_SEARCH_BOUND => Ok(v),
        _ => {
            log::debug!("coefficient {n} too large for rational root search");
            Err(GrError::Unable)
        }
    }
}

/// Splits a square-free monic polynomial into monic irreducible factors.
fn split_square_free(mut p: QPoly) -> GrResult<Vec<QPoly>> {
    let mut factors = Vec::new();

    if p.first().is_some_and(|c| *c == RBig::ZERO) {
        p.remove(0);
        factors.push(vec![RBig::ZERO, RBig::ONE]);
    }

    if p.len() > 2 {
        let (c0, cn) = integer_ends(&p).ok_or(GrError::Unable)?;
        let (nums, dens) = (divisors(small_abs(&c0)?), divisors(small_abs(&cn)?));
        if nums.len().saturating_mul(dens.len()) > MAX_CANDIDATES {
            log::debug!(
                "{} rational root candidates exceed the search limit",
                nums.len() * dens.len()
            );
            return Err(GrError::Unable);
        }

        'search: for &num in &nums {
            for &den in &dens {
                for negative in [false, true] {
                    if p.len() <= 2 {
                        break 'search;
                    }
                    let num = if negative { -IBig::from(num) } else { IBig::from(num) };
                    let root = RBig::from_parts(num, UBig::from(den));
                    if eval(&p, &root) == RBig::ZERO {
                        let linear = vec![-root, RBig::ONE];
                        p = div_exact(&p, &linear);
                        factors.push(linear);
                    }
                }
            }
        }
    }

    match p.len() {
        0 | 1 => {}
        2..=4 => factors.push(p),
        _ => {
            log::debug!("no factorization for a part of degree {}", p.len() - 1);
            return Err(GrError::Unable);
        }
    }
    Ok(factors)
}

fn to_elem(p: QPoly) -> Elem {
    Elem::Poly(Poly {
        coeffs: p.into_iter().map(Elem::Rational).collect(),
    })
}

/// Factors a polynomial with rational coefficients as
/// `c * prod(factors[i]^mults[i])` with monic irreducible factors.
///
/// `factors` and `mults` are overwritten. The zero polynomial gives `c = 0`
/// and no factors.
pub(crate) fn poly_factor_rational(
    c: &mut Elem,
    factors: &mut Vec<Elem>,
    mults: &mut Vec<u64>,
    pol: &Elem,
    _flags: FactorFlags,
    ctx: &Context,
) -> GrResult {
    let pol = pol.as_poly().ok_or(GrError::Unable)?;
    let coeffs = pol
        .coeffs()
        .iter()
        .map(|e| rationals::get(e).cloned())
        .collect::<GrResult<QPoly>>()?;
    let coeffs = trim(coeffs);

    factors.clear();
    mults.clear();

    let Some(lead) = coeffs.last().cloned() else {
        return ctx.zero(c);
    };
    let monic = make_monic(coeffs);

    let mut found = Vec::new();
    if monic.len() > 1 {
        for (part, m) in square_free(&monic) {
            for f in split_square_free(part)? {
                found.push((f, m));
            }
        }
    }

    log::trace!("factored degree {} polynomial into {} factors", monic.len() - 1, found.len());
    for (f, m) in found {
        factors.push(to_elem(f));
        mults.push(m);
    }
    ctx.set_rational(c, &lead)
}
