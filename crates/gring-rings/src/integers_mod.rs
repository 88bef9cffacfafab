//! Integers modulo n.
//!
//! Residues are stored as `u64` values reduced into `0..n`; products go
//! through `u128`. The ring is a field exactly when n is prime, which is
//! decided by a deterministic Miller-Rabin test.

use std::fmt;
use std::sync::OnceLock;

use dashu::integer::IBig;
use dashu::rational::RBig;
use rand::{Rng, RngCore};

use crate::context::{Context, ContextData, RingKind};
use crate::elem::Elem;
use crate::generic::{ctx_predicate_false, ctx_predicate_true, set_other_from_polynomial};
use crate::methods::{Method, MethodFn, MethodTable};
use crate::status::{GrError, GrResult};
use crate::truth::Truth;

static TABLE: OnceLock<MethodTable> = OnceLock::new();

static METHODS: &[(Method, MethodFn)] = &[
    (Method::CtxWrite, MethodFn::CtxWrite(ctx_write)),
    (Method::CtxIsRing, MethodFn::CtxPredicate(ctx_predicate_true)),
    (Method::CtxIsCommutativeRing, MethodFn::CtxPredicate(ctx_predicate_true)),
    (Method::CtxIsIntegralDomain, MethodFn::CtxPredicate(ctx_is_field)),
    (Method::CtxIsUniqueFactorizationDomain, MethodFn::CtxPredicate(ctx_is_field)),
    (Method::CtxIsField, MethodFn::CtxPredicate(ctx_is_field)),
    (Method::CtxIsRationalVectorSpace, MethodFn::CtxPredicate(ctx_predicate_false)),
    (Method::CtxIsRealVectorSpace, MethodFn::CtxPredicate(ctx_predicate_false)),
    (Method::CtxIsComplexVectorSpace, MethodFn::CtxPredicate(ctx_predicate_false)),
    (Method::CtxIsThreadsafe, MethodFn::CtxPredicate(ctx_predicate_true)),
    (Method::Randtest, MethodFn::Randtest(randtest)),
    (Method::Write, MethodFn::Write(write)),
    (Method::IsZero, MethodFn::Predicate(is_zero)),
    (Method::IsOne, MethodFn::Predicate(is_one)),
    (Method::IsNegOne, MethodFn::Predicate(is_neg_one)),
    (Method::Equal, MethodFn::Equal(equal)),
    (Method::SetU64, MethodFn::SetU64(set_u64)),
    (Method::SetI64, MethodFn::SetI64(set_i64)),
    (Method::SetInteger, MethodFn::SetInteger(set_integer)),
    (Method::SetRational, MethodFn::SetRational(set_rational)),
    (Method::SetOther, MethodFn::SetOther(set_other)),
    (Method::Neg, MethodFn::Unary(neg)),
    (Method::Add, MethodFn::Binary(add)),
    (Method::Sub, MethodFn::Binary(sub)),
    (Method::Mul, MethodFn::Binary(mul)),
    (Method::PowU64, MethodFn::OpU64(pow_u64)),
    (Method::Div, MethodFn::Binary(div)),
    (Method::Inv, MethodFn::Unary(inv)),
    (Method::EuclideanDivRem, MethodFn::DivRem(euclidean_divrem)),
    (Method::Gcd, MethodFn::Binary(gcd)),
];

fn init(_: &Context) -> Elem {
    Elem::Residue(0)
}

impl Context {
    /// The ring of integers modulo `n`.
    ///
    /// # Panics
    ///
    /// Panics if `n` is zero.
    #[must_use]
    pub fn integers_mod(n: u64) -> Self {
        assert!(n > 0, "modulus must be positive");
        let methods =
            TABLE.get_or_init(|| MethodTable::build(RingKind::IntegersMod, init, METHODS));
        Self::from_parts(
            RingKind::IntegersMod,
            std::mem::size_of::<u64>(),
            methods,
            ContextData::Modulus(n),
        )
    }
}

fn modulus(ctx: &Context) -> GrResult<u64> {
    ctx.modulus().ok_or(GrError::Unable)
}

fn get(x: &Elem) -> GrResult<u64> {
    x.as_residue().ok_or_else(|| {
        log::trace!("residue ring received a {} element", x.repr_name());
        GrError::Unable
    })
}

fn store(res: &mut Elem, value: u64) -> GrResult {
    *res = Elem::Residue(value);
    Ok(())
}

fn mul_mod(a: u64, b: u64, n: u64) -> u64 {
    // The remainder is below n, so it fits in a u64.
    ((u128::from(a) * u128::from(b)) % u128::from(n)) as u64
}

fn pow_mod(mut base: u64, mut exp: u64, n: u64) -> u64 {
    let mut result = 1 % n;
    base %= n;
    while exp > 0 {
        if exp & 1 == 1 {
            result = mul_mod(result, base, n);
        }
        base = mul_mod(base, base, n);
        exp >>= 1;
    }
    result
}

fn gcd_u64(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Inverse of `a` modulo `n`, if `gcd(a, n) = 1`.
fn inv_mod(a: u64, n: u64) -> Option<u64> {
    let (mut t, mut new_t) = (0i128, 1i128);
    let (mut r, mut new_r) = (i128::from(n), i128::from(a % n));

    while new_r != 0 {
        let quotient = r / new_r;
        (t, new_t) = (new_t, t - quotient * new_t);
        (r, new_r) = (new_r, r - quotient * new_r);
    }

    if r != 1 {
        return None;
    }
    // In 0..n after the adjustment.
    Some(t.rem_euclid(i128::from(n)) as u64)
}

/// Deterministic Miller-Rabin for 64-bit inputs.
pub(crate) fn is_prime(n: u64) -> bool {
    const BASES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

    if n < 2 {
        return false;
    }
    for p in BASES {
        if n % p == 0 {
            return n == p;
        }
    }

    let s = (n - 1).trailing_zeros();
    let d = (n - 1) >> s;

    'witness: for a in BASES {
        let mut x = pow_mod(a, d, n);
        if x == 1 || x == n - 1 {
            continue;
        }
        for _ in 1..s {
            x = mul_mod(x, x, n);
            if x == n - 1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

fn reduce_integer(c: &IBig, n: u64) -> u64 {
    let n = IBig::from(n);
    let (_, r) = crate::integers::divrem_nonneg(c, &n);
    // 0 <= r < n <= u64::MAX
    u64::try_from(r).unwrap_or(0)
}

fn ctx_write(ctx: &Context, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match ctx.modulus() {
        Some(n) => write!(f, "Integers mod {n} (Z/{n}Z)"),
        None => f.write_str("Integers mod n"),
    }
}

fn ctx_is_field(ctx: &Context) -> Truth {
    match ctx.modulus() {
        Some(n) => Truth::from(is_prime(n)),
        None => Truth::Unknown,
    }
}

fn randtest(res: &mut Elem, rng: &mut dyn RngCore, ctx: &Context) -> GrResult {
    let n = modulus(ctx)?;
    store(res, rng.gen_range(0..n))
}

fn write(out: &mut dyn fmt::Write, x: &Elem, _: &Context) -> GrResult {
    write!(out, "{}", get(x)?).map_err(|_| GrError::Unable)
}

fn compare(x: &Elem, value: Option<u64>) -> Truth {
    match (x.as_residue(), value) {
        (Some(x), Some(v)) => Truth::from(x == v),
        _ => Truth::Unknown,
    }
}

fn is_zero(x: &Elem, _: &Context) -> Truth {
    compare(x, Some(0))
}

fn is_one(x: &Elem, ctx: &Context) -> Truth {
    compare(x, ctx.modulus().map(|n| 1 % n))
}

fn is_neg_one(x: &Elem, ctx: &Context) -> Truth {
    compare(x, ctx.modulus().map(|n| n - 1))
}

fn equal(x: &Elem, y: &Elem, _: &Context) -> Truth {
    match (x.as_residue(), y.as_residue()) {
        (Some(x), Some(y)) => Truth::from(x == y),
        _ => Truth::Unknown,
    }
}

fn set_u64(res: &mut Elem, c: u64, ctx: &Context) -> GrResult {
    store(res, c % modulus(ctx)?)
}

fn set_i64(res: &mut Elem, c: i64, ctx: &Context) -> GrResult {
    let n = modulus(ctx)?;
    let r = i128::from(c).rem_euclid(i128::from(n));
    store(res, r as u64)
}

fn set_integer(res: &mut Elem, c: &IBig, ctx: &Context) -> GrResult {
    store(res, reduce_integer(c, modulus(ctx)?))
}

fn set_rational(res: &mut Elem, c: &RBig, ctx: &Context) -> GrResult {
    let n = modulus(ctx)?;
    let num = reduce_integer(c.numerator(), n);
    let den = reduce_integer(&IBig::from(c.denominator().clone()), n);
    match inv_mod(den, n) {
        Some(d) => store(res, mul_mod(num, d, n)),
        None => {
            store(res, 0)?;
            Err(GrError::Domain)
        }
    }
}

fn set_other(res: &mut Elem, x: &Elem, x_ctx: &Context, ctx: &Context) -> GrResult {
    let n = modulus(ctx)?;
    match (x_ctx.kind(), x) {
        (RingKind::Integers, Elem::Integer(c)) => set_integer(res, c, ctx),
        (RingKind::Rationals, Elem::Rational(c)) => set_rational(res, c, ctx),
        (RingKind::IntegersMod, Elem::Residue(c)) => match x_ctx.modulus() {
            // Reduction Z/mZ -> Z/nZ is a ring map when n divides m.
            Some(m) if m % n == 0 => store(res, c % n),
            _ => {
                store(res, 0)?;
                Err(GrError::Domain)
            }
        },
        (RingKind::Polynomial, _) => set_other_from_polynomial(res, x, x_ctx, ctx),
        _ => {
            store(res, 0)?;
            Err(GrError::Unable)
        }
    }
}

fn neg(res: &mut Elem, x: &Elem, ctx: &Context) -> GrResult {
    let (x, n) = (get(x)?, modulus(ctx)?);
    store(res, if x == 0 { 0 } else { n - x })
}

fn add(res: &mut Elem, x: &Elem, y: &Elem, ctx: &Context) -> GrResult {
    let n = u128::from(modulus(ctx)?);
    let s = (u128::from(get(x)?) + u128::from(get(y)?)) % n;
    store(res, s as u64)
}

fn sub(res: &mut Elem, x: &Elem, y: &Elem, ctx: &Context) -> GrResult {
    let n = u128::from(modulus(ctx)?);
    let d = (u128::from(get(x)?) + n - u128::from(get(y)?)) % n;
    store(res, d as u64)
}

fn mul(res: &mut Elem, x: &Elem, y: &Elem, ctx: &Context) -> GrResult {
    let n = modulus(ctx)?;
    store(res, mul_mod(get(x)?, get(y)?, n))
}

fn pow_u64(res: &mut Elem, x: &Elem, e: u64, ctx: &Context) -> GrResult {
    let n = modulus(ctx)?;
    store(res, pow_mod(get(x)?, e, n))
}

/// Solves `y * q = x`. A solution exists iff `gcd(y, n)` divides `x`; the
/// smallest one is returned.
fn div(res: &mut Elem, x: &Elem, y: &Elem, ctx: &Context) -> GrResult {
    let (x, y, n) = (get(x)?, get(y)?, modulus(ctx)?);
    let g = gcd_u64(y, n);
    if x % g != 0 {
        return Err(GrError::Domain);
    }
    let m = n / g;
    match inv_mod(y / g, m) {
        Some(inv) => store(res, mul_mod(x / g, inv, m)),
        None => Err(GrError::Domain),
    }
}

fn inv(res: &mut Elem, x: &Elem, ctx: &Context) -> GrResult {
    let (x, n) = (get(x)?, modulus(ctx)?);
    match inv_mod(x, n) {
        Some(inv) => store(res, inv),
        None => Err(GrError::Domain),
    }
}

fn euclidean_divrem(q: &mut Elem, r: &mut Elem, x: &Elem, y: &Elem, ctx: &Context) -> GrResult {
    if !ctx_is_field(ctx).is_true() {
        return Err(GrError::Unable);
    }
    div(q, x, y, ctx)?;
    store(r, 0)
}

fn gcd(res: &mut Elem, x: &Elem, y: &Elem, ctx: &Context) -> GrResult {
    if !ctx_is_field(ctx).is_true() {
        return Err(GrError::Unable);
    }
    let both_zero = get(x)? == 0 && get(y)? == 0;
    store(res, if both_zero { 0 } else { 1 % modulus(ctx)? })
}

#[cfg(test)]
mod tests {
    use dashu::integer::UBig;

    use super::*;

    #[test]
    fn test_primality() {
        let primes = [2u64, 3, 5, 97, 65_537, 1_000_000_007, 18_446_744_073_709_551_557];
        let composites = [0u64, 1, 4, 561, 1_000_000_007 * 3, 3_215_031_751];
        for p in primes {
            assert!(is_prime(p), "{p}");
        }
        for c in composites {
            assert!(!is_prime(c), "{c}");
        }
    }

    #[test]
    fn test_field_detection() {
        assert_eq!(Context::integers_mod(7).is_field(), Truth::True);
        assert_eq!(Context::integers_mod(6).is_field(), Truth::False);
        assert_eq!(Context::integers_mod(6).is_integral_domain(), Truth::False);
        assert_eq!(Context::integers_mod(6).to_string(), "Integers mod 6 (Z/6Z)");
    }

    #[test]
    fn test_inverse_and_division() {
        let r = Context::integers_mod(7);
        let mut res = r.init();

        r.inv(&mut res, &Elem::Residue(3)).unwrap();
        assert_eq!(res, Elem::Residue(5));
        assert_eq!(r.inv(&mut res, &Elem::Residue(0)), Err(GrError::Domain));

        let r = Context::integers_mod(6);
        r.div(&mut res, &Elem::Residue(4), &Elem::Residue(2)).unwrap();
        assert_eq!(res, Elem::Residue(2));
        assert_eq!(
            r.div(&mut res, &Elem::Residue(3), &Elem::Residue(2)),
            Err(GrError::Domain)
        );
    }

    #[test]
    fn test_large_modulus_arithmetic() {
        let n = u64::MAX - 58;
        let r = Context::integers_mod(n);
        let mut res = r.init();

        r.mul(&mut res, &Elem::Residue(n - 1), &Elem::Residue(n - 1)).unwrap();
        assert_eq!(res, Elem::Residue(1));
        r.add(&mut res, &Elem::Residue(n - 1), &Elem::Residue(2)).unwrap();
        assert_eq!(res, Elem::Residue(1));
    }

    #[test]
    fn test_conversions() {
        let r = Context::integers_mod(5);
        let mut res = r.init();

        r.set_i64(&mut res, -1).unwrap();
        assert_eq!(r.is_neg_one(&res), Truth::True);
        r.set_rational(&mut res, &RBig::from_parts(IBig::from(1), UBig::from(2u8)))
            .unwrap();
        assert_eq!(res, Elem::Residue(3));
        assert_eq!(
            r.set_rational(&mut res, &RBig::from_parts(IBig::from(1), UBig::from(5u8))),
            Err(GrError::Domain)
        );

        let r10 = Context::integers_mod(10);
        r.set_other(&mut res, &Elem::Residue(7), &r10).unwrap();
        assert_eq!(res, Elem::Residue(2));
        assert_eq!(
            r10.set_other(&mut res, &Elem::Residue(2), &r),
            Err(GrError::Domain)
        );
    }

    #[test]
    fn test_gcd_needs_field() {
        let mut res = Elem::Residue(0);
        let r = Context::integers_mod(9);
        assert_eq!(
            r.gcd(&mut res, &Elem::Residue(3), &Elem::Residue(6)),
            Err(GrError::Unable)
        );
        let f = Context::integers_mod(11);
        f.gcd(&mut res, &Elem::Residue(3), &Elem::Residue(6)).unwrap();
        assert_eq!(res, Elem::Residue(1));
    }
}
