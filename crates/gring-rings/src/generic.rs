//! Generic fallback implementations.
//!
//! These are written purely against the dispatch interface and are installed
//! in every method table before the kind-specific entries, so a kind only
//! needs to override what it can do better.

use dashu::integer::IBig;
use dashu::rational::RBig;

use crate::context::{Context, ContextData};
use crate::elem::Elem;
use crate::methods::{Method, MethodFn};
use crate::parse;
use crate::status::{GrError, GrResult, Status};
use crate::truth::Truth;

/// Entries present in every method table unless overridden.
pub(crate) static DEFAULT_METHODS: &[(Method, MethodFn)] = &[
    (Method::CtxIsRing, MethodFn::CtxPredicate(ctx_predicate_unknown)),
    (Method::CtxIsCommutativeRing, MethodFn::CtxPredicate(ctx_predicate_unknown)),
    (Method::CtxIsIntegralDomain, MethodFn::CtxPredicate(ctx_predicate_unknown)),
    (Method::CtxIsUniqueFactorizationDomain, MethodFn::CtxPredicate(ctx_predicate_unknown)),
    (Method::CtxIsField, MethodFn::CtxPredicate(ctx_predicate_unknown)),
    (Method::CtxIsRationalVectorSpace, MethodFn::CtxPredicate(ctx_predicate_unknown)),
    (Method::CtxIsRealVectorSpace, MethodFn::CtxPredicate(ctx_predicate_unknown)),
    (Method::CtxIsComplexVectorSpace, MethodFn::CtxPredicate(ctx_predicate_unknown)),
    (Method::CtxIsThreadsafe, MethodFn::CtxPredicate(ctx_predicate_unknown)),
    (Method::Clear, MethodFn::Clear(clear)),
    (Method::Swap, MethodFn::Swap(swap)),
    (Method::Zero, MethodFn::Constant(zero)),
    (Method::One, MethodFn::Constant(one)),
    (Method::NegOne, MethodFn::Constant(neg_one)),
    (Method::Gens, MethodFn::Gens(gens_single)),
    (Method::GensRecursive, MethodFn::Gens(gens_single)),
    (Method::IsZero, MethodFn::Predicate(is_zero)),
    (Method::IsOne, MethodFn::Predicate(is_one)),
    (Method::Set, MethodFn::Unary(set)),
    (Method::SetU64, MethodFn::SetU64(set_u64)),
    (Method::SetI64, MethodFn::SetI64(set_i64)),
    (Method::SetIntervalMidRad, MethodFn::Binary(set_interval_mid_rad_exact)),
    (Method::SetStr, MethodFn::SetStr(parse::set_str_balance_additions)),
    (Method::Sub, MethodFn::Binary(sub)),
    (Method::AddU64, MethodFn::OpU64(add_u64)),
    (Method::AddI64, MethodFn::OpI64(add_i64)),
    (Method::AddInteger, MethodFn::OpInteger(add_integer)),
    (Method::AddRational, MethodFn::OpRational(add_rational)),
    (Method::SubU64, MethodFn::OpU64(sub_u64)),
    (Method::SubI64, MethodFn::OpI64(sub_i64)),
    (Method::SubInteger, MethodFn::OpInteger(sub_integer)),
    (Method::SubRational, MethodFn::OpRational(sub_rational)),
    (Method::MulU64, MethodFn::OpU64(mul_u64)),
    (Method::MulI64, MethodFn::OpI64(mul_i64)),
    (Method::MulInteger, MethodFn::OpInteger(mul_integer)),
    (Method::MulRational, MethodFn::OpRational(mul_rational)),
    (Method::MulOther, MethodFn::MulOther(mul_other)),
    (Method::OtherMul, MethodFn::OtherMul(other_mul)),
    (Method::PowU64, MethodFn::OpU64(pow_u64_binexp)),
    (Method::PowI64, MethodFn::OpI64(pow_i64)),
    (Method::PowInteger, MethodFn::OpInteger(pow_integer)),
    (Method::DivExact, MethodFn::Binary(divexact)),
    (Method::Inv, MethodFn::Unary(inv)),
    (Method::EuclideanDiv, MethodFn::Binary(euclidean_div)),
    (Method::EuclideanRem, MethodFn::Binary(euclidean_rem)),
    (Method::CanonicalAssociate, MethodFn::CanonicalAssociate(canonical_associate_field)),
];

pub(crate) fn ctx_predicate_true(_: &Context) -> Truth {
    Truth::True
}

pub(crate) fn ctx_predicate_false(_: &Context) -> Truth {
    Truth::False
}

pub(crate) fn ctx_predicate_unknown(_: &Context) -> Truth {
    Truth::Unknown
}

fn clear(x: Elem, _: &Context) {
    drop(x);
}

fn swap(x: &mut Elem, y: &mut Elem, _: &Context) {
    std::mem::swap(x, y);
}

fn zero(res: &mut Elem, ctx: &Context) -> GrResult {
    ctx.set_i64(res, 0)
}

fn one(res: &mut Elem, ctx: &Context) -> GrResult {
    ctx.set_i64(res, 1)
}

fn neg_one(res: &mut Elem, ctx: &Context) -> GrResult {
    ctx.set_i64(res, -1)
}

/// The single generator, for rings generated by one element. Rings with a
/// `Gen` entry get `[gen]`, rings without one get no generators.
fn gens_single(res: &mut Vec<Elem>, ctx: &Context) -> GrResult {
    res.clear();
    if !ctx.methods.implements(Method::Gen) {
        return Ok(());
    }
    let mut g = ctx.init();
    ctx.gen(&mut g)?;
    res.push(g);
    Ok(())
}

fn compare_with(x: &Elem, ctx: &Context, make: fn(&Context, &mut Elem) -> GrResult) -> Truth {
    let mut t = ctx.init();
    let truth = match make(ctx, &mut t) {
        Ok(()) => ctx.equal(x, &t),
        Err(_) => Truth::Unknown,
    };
    ctx.clear(t);
    truth
}

fn is_zero(x: &Elem, ctx: &Context) -> Truth {
    compare_with(x, ctx, Context::zero)
}

fn is_one(x: &Elem, ctx: &Context) -> Truth {
    compare_with(x, ctx, Context::one)
}

fn set(res: &mut Elem, x: &Elem, _: &Context) -> GrResult {
    res.clone_from(x);
    Ok(())
}

fn set_u64(res: &mut Elem, c: u64, ctx: &Context) -> GrResult {
    ctx.set_integer(res, &IBig::from(c))
}

fn set_i64(res: &mut Elem, c: i64, ctx: &Context) -> GrResult {
    ctx.set_integer(res, &IBig::from(c))
}

/// Exact rings only represent zero-radius intervals.
fn set_interval_mid_rad_exact(res: &mut Elem, mid: &Elem, rad: &Elem, ctx: &Context) -> GrResult {
    match ctx.is_zero(rad) {
        Truth::True => ctx.set(res, mid),
        _ => Err(GrError::Unable),
    }
}

fn sub(res: &mut Elem, x: &Elem, y: &Elem, ctx: &Context) -> GrResult {
    let mut t = ctx.init();
    let mut status = Status::SUCCESS;
    status |= ctx.neg(&mut t, y);
    if status.is_success() {
        status |= ctx.add(res, x, &t);
    }
    ctx.clear(t);
    status.into_result()
}

/// Converts a scalar with `set`, then applies `op`.
fn with_scalar(
    res: &mut Elem,
    x: &Elem,
    ctx: &Context,
    set: impl FnOnce(&mut Elem) -> GrResult,
    op: fn(&Context, &mut Elem, &Elem, &Elem) -> GrResult,
) -> GrResult {
    let mut t = ctx.init();
    let status = set(&mut t).and_then(|()| op(ctx, res, x, &t));
    ctx.clear(t);
    status
}

fn add_u64(res: &mut Elem, x: &Elem, c: u64, ctx: &Context) -> GrResult {
    with_scalar(res, x, ctx, |t| ctx.set_u64(t, c), Context::add)
}

fn add_i64(res: &mut Elem, x: &Elem, c: i64, ctx: &Context) -> GrResult {
    with_scalar(res, x, ctx, |t| ctx.set_i64(t, c), Context::add)
}

fn add_integer(res: &mut Elem, x: &Elem, c: &IBig, ctx: &Context) -> GrResult {
    with_scalar(res, x, ctx, |t| ctx.set_integer(t, c), Context::add)
}

fn add_rational(res: &mut Elem, x: &Elem, c: &RBig, ctx: &Context) -> GrResult {
    with_scalar(res, x, ctx, |t| ctx.set_rational(t, c), Context::add)
}

fn sub_u64(res: &mut Elem, x: &Elem, c: u64, ctx: &Context) -> GrResult {
    with_scalar(res, x, ctx, |t| ctx.set_u64(t, c), Context::sub)
}

fn sub_i64(res: &mut Elem, x: &Elem, c: i64, ctx: &Context) -> GrResult {
    with_scalar(res, x, ctx, |t| ctx.set_i64(t, c), Context::sub)
}

fn sub_integer(res: &mut Elem, x: &Elem, c: &IBig, ctx: &Context) -> GrResult {
    with_scalar(res, x, ctx, |t| ctx.set_integer(t, c), Context::sub)
}

fn sub_rational(res: &mut Elem, x: &Elem, c: &RBig, ctx: &Context) -> GrResult {
    with_scalar(res, x, ctx, |t| ctx.set_rational(t, c), Context::sub)
}

fn mul_u64(res: &mut Elem, x: &Elem, c: u64, ctx: &Context) -> GrResult {
    with_scalar(res, x, ctx, |t| ctx.set_u64(t, c), Context::mul)
}

fn mul_i64(res: &mut Elem, x: &Elem, c: i64, ctx: &Context) -> GrResult {
    with_scalar(res, x, ctx, |t| ctx.set_i64(t, c), Context::mul)
}

fn mul_integer(res: &mut Elem, x: &Elem, c: &IBig, ctx: &Context) -> GrResult {
    with_scalar(res, x, ctx, |t| ctx.set_integer(t, c), Context::mul)
}

fn mul_rational(res: &mut Elem, x: &Elem, c: &RBig, ctx: &Context) -> GrResult {
    with_scalar(res, x, ctx, |t| ctx.set_rational(t, c), Context::mul)
}

fn mul_other(res: &mut Elem, x: &Elem, y: &Elem, y_ctx: &Context, ctx: &Context) -> GrResult {
    let mut t = ctx.init();
    let status = ctx.set_other(&mut t, y, y_ctx).and_then(|()| ctx.mul(res, x, &t));
    ctx.clear(t);
    status
}

fn other_mul(res: &mut Elem, x: &Elem, x_ctx: &Context, y: &Elem, ctx: &Context) -> GrResult {
    let mut t = ctx.init();
    let status = ctx.set_other(&mut t, x, x_ctx).and_then(|()| ctx.mul(res, &t, y));
    ctx.clear(t);
    status
}

/// `x^e` by repeated squaring: O(log e) multiplications.
pub(crate) fn pow_u64_binexp(res: &mut Elem, x: &Elem, e: u64, ctx: &Context) -> GrResult {
    if e == 0 {
        return ctx.one(res);
    }

    let mut status = Status::SUCCESS;
    let mut acc = x.clone();
    let mut t = ctx.init();
    let mut exp = e;

    // Skip the low zero bits by squaring the base.
    while exp & 1 == 0 {
        status |= ctx.mul(&mut t, &acc, &acc);
        ctx.swap(&mut acc, &mut t);
        exp >>= 1;
    }

    let mut result = acc.clone();
    exp >>= 1;
    while exp > 0 && status.is_success() {
        status |= ctx.mul(&mut t, &acc, &acc);
        ctx.swap(&mut acc, &mut t);
        if exp & 1 == 1 {
            status |= ctx.mul(&mut t, &result, &acc);
            ctx.swap(&mut result, &mut t);
        }
        exp >>= 1;
    }

    ctx.swap(res, &mut result);
    ctx.clear(result);
    ctx.clear(acc);
    ctx.clear(t);
    status.into_result()
}

fn pow_i64(res: &mut Elem, x: &Elem, e: i64, ctx: &Context) -> GrResult {
    if e >= 0 {
        return ctx.pow_u64(res, x, e.unsigned_abs());
    }
    let mut t = ctx.init();
    let status = ctx.inv(&mut t, x).and_then(|()| ctx.pow_u64(res, &t, e.unsigned_abs()));
    ctx.clear(t);
    status
}

fn pow_integer(res: &mut Elem, x: &Elem, e: &IBig, ctx: &Context) -> GrResult {
    if let Ok(e) = u64::try_from(e.clone()) {
        return ctx.pow_u64(res, x, e);
    }
    if let Ok(e) = i64::try_from(e.clone()) {
        return ctx.pow_i64(res, x, e);
    }

    // Huge exponents are only feasible for 0, 1 and -1.
    if ctx.is_one(x).is_true() {
        return ctx.one(res);
    }
    if ctx.is_zero(x).is_true() {
        return if *e > IBig::ZERO {
            ctx.zero(res)
        } else {
            Err(GrError::Domain)
        };
    }
    if ctx.is_neg_one(x).is_true() {
        let odd = (e % IBig::from(2)) != IBig::ZERO;
        return if odd { ctx.neg_one(res) } else { ctx.one(res) };
    }
    Err(GrError::Unable)
}

fn divexact(res: &mut Elem, x: &Elem, y: &Elem, ctx: &Context) -> GrResult {
    ctx.div(res, x, y)
}

fn inv(res: &mut Elem, x: &Elem, ctx: &Context) -> GrResult {
    let mut t = ctx.init();
    let status = ctx.one(&mut t).and_then(|()| ctx.div(res, &t, x));
    ctx.clear(t);
    status
}

fn euclidean_div(res: &mut Elem, x: &Elem, y: &Elem, ctx: &Context) -> GrResult {
    let mut r = ctx.init();
    let status = ctx.euclidean_divrem(res, &mut r, x, y);
    ctx.clear(r);
    status
}

fn euclidean_rem(res: &mut Elem, x: &Elem, y: &Elem, ctx: &Context) -> GrResult {
    let mut q = ctx.init();
    let status = ctx.euclidean_divrem(&mut q, res, x, y);
    ctx.clear(q);
    status
}

/// In a field every nonzero element is associate to one.
fn canonical_associate_field(ux: &mut Elem, u: &mut Elem, x: &Elem, ctx: &Context) -> GrResult {
    if !ctx.is_field().is_true() {
        return Err(GrError::Unable);
    }
    match ctx.is_zero(x) {
        Truth::True => {
            let mut status = Status::SUCCESS;
            status |= ctx.zero(ux);
            status |= ctx.one(u);
            status.into_result()
        }
        Truth::False => {
            let mut status = Status::SUCCESS;
            status |= ctx.one(ux);
            status |= ctx.inv(u, x);
            status.into_result()
        }
        Truth::Unknown => Err(GrError::Unable),
    }
}

/// Conversion of a polynomial source into a leaf ring: only constants have
/// an image.
pub(crate) fn set_other_from_polynomial(
    res: &mut Elem,
    x: &Elem,
    x_ctx: &Context,
    ctx: &Context,
) -> GrResult {
    let (ContextData::Polynomial(data), Elem::Poly(p)) = (&x_ctx.data, x) else {
        return Err(GrError::Unable);
    };
    match p.coeffs.as_slice() {
        [] => ctx.zero(res),
        [c] => ctx.set_other(res, c, &data.base),
        _ => {
            let mut status = Status::SUCCESS;
            status |= ctx.zero(res);
            status |= Err(GrError::Domain);
            status.into_result()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_binexp_matches_repeated_multiplication() {
        let zz = Context::integers();
        let x = zz.elem_i64(3).unwrap();

        for e in 0..20u64 {
            let mut fast = zz.init();
            pow_u64_binexp(&mut fast, &x, e, &zz).unwrap();

            let mut slow = zz.elem_i64(1).unwrap();
            for _ in 0..e {
                let mut t = zz.init();
                zz.mul(&mut t, &slow, &x).unwrap();
                slow = t;
            }
            assert_eq!(zz.equal(&fast, &slow), Truth::True, "exponent {e}");
        }
    }

    #[test]
    fn test_pow_negative_needs_unit() {
        let zz = Context::integers();
        let two = zz.elem_i64(2).unwrap();
        let minus_one = zz.elem_i64(-1).unwrap();
        let mut res = zz.init();

        assert_eq!(zz.pow_i64(&mut res, &two, -1), Err(GrError::Domain));
        zz.pow_i64(&mut res, &minus_one, -3).unwrap();
        assert_eq!(zz.is_neg_one(&res), Truth::True);
    }

    #[test]
    fn test_huge_exponent() {
        let zz = Context::integers();
        let e = IBig::from(10u8).pow(40);
        let mut res = zz.init();

        zz.pow_integer(&mut res, &zz.elem_i64(-1).unwrap(), &e).unwrap();
        assert_eq!(zz.is_one(&res), Truth::True);
        assert_eq!(
            zz.pow_integer(&mut res, &zz.elem_i64(2).unwrap(), &e),
            Err(GrError::Unable)
        );
    }

    #[test]
    fn test_exact_ring_rejects_nonzero_radius() {
        let qq = Context::rationals();
        let mid = qq.elem_i64(3).unwrap();
        let mut res = qq.init();

        qq.set_interval_mid_rad(&mut res, &mid, &qq.init()).unwrap();
        assert_eq!(qq.equal(&res, &mid), Truth::True);

        let rad = qq.elem_i64(1).unwrap();
        assert_eq!(qq.set_interval_mid_rad(&mut res, &mid, &rad), Err(GrError::Unable));
    }

    #[test]
    fn test_constant_polynomial_converts_to_leaf() {
        let zz = Arc::new(Context::integers());
        let zx = Context::polynomial(Arc::clone(&zz));
        let qq = Context::rationals();

        let five = zx.parse("5").unwrap();
        let mut res = qq.init();
        qq.set_other(&mut res, &five, &zx).unwrap();
        assert_eq!(qq.equal(&res, &qq.elem_i64(5).unwrap()), Truth::True);

        let x = zx.parse("x").unwrap();
        assert_eq!(qq.set_other(&mut res, &x, &zx), Err(GrError::Domain));
        assert_eq!(qq.is_zero(&res), Truth::True);
    }
}
