//! The field of rational numbers Q.

use std::fmt;
use std::sync::OnceLock;

use dashu::integer::{IBig, UBig};
use dashu::rational::RBig;
use rand::{Rng, RngCore};

use crate::context::{Context, ContextData, RingKind};
use crate::elem::Elem;
use crate::factor;
use crate::generic::{ctx_predicate_false, ctx_predicate_true, set_other_from_polynomial};
use crate::methods::{Method, MethodFn, MethodTable};
use crate::status::{GrError, GrResult};
use crate::truth::Truth;

static TABLE: OnceLock<MethodTable> = OnceLock::new();

static METHODS: &[(Method, MethodFn)] = &[
    (Method::CtxWrite, MethodFn::CtxWrite(ctx_write)),
    (Method::CtxIsRing, MethodFn::CtxPredicate(ctx_predicate_true)),
    (Method::CtxIsCommutativeRing, MethodFn::CtxPredicate(ctx_predicate_true)),
    (Method::CtxIsIntegralDomain, MethodFn::CtxPredicate(ctx_predicate_true)),
    (Method::CtxIsUniqueFactorizationDomain, MethodFn::CtxPredicate(ctx_predicate_true)),
    (Method::CtxIsField, MethodFn::CtxPredicate(ctx_predicate_true)),
    (Method::CtxIsRationalVectorSpace, MethodFn::CtxPredicate(ctx_predicate_true)),
    (Method::CtxIsRealVectorSpace, MethodFn::CtxPredicate(ctx_predicate_false)),
    (Method::CtxIsComplexVectorSpace, MethodFn::CtxPredicate(ctx_predicate_false)),
    (Method::CtxIsThreadsafe, MethodFn::CtxPredicate(ctx_predicate_true)),
    (Method::Randtest, MethodFn::Randtest(randtest)),
    (Method::Write, MethodFn::Write(write)),
    (Method::IsZero, MethodFn::Predicate(is_zero)),
    (Method::IsOne, MethodFn::Predicate(is_one)),
    (Method::IsNegOne, MethodFn::Predicate(is_neg_one)),
    (Method::Equal, MethodFn::Equal(equal)),
    (Method::SetI64, MethodFn::SetI64(set_i64)),
    (Method::SetInteger, MethodFn::SetInteger(set_integer)),
    (Method::SetRational, MethodFn::SetRational(set_rational)),
    (Method::SetOther, MethodFn::SetOther(set_other)),
    (Method::Neg, MethodFn::Unary(neg)),
    (Method::Add, MethodFn::Binary(add)),
    (Method::Sub, MethodFn::Binary(sub)),
    (Method::Mul, MethodFn::Binary(mul)),
    (Method::MulRational, MethodFn::OpRational(mul_rational)),
    (Method::PowU64, MethodFn::OpU64(pow_u64)),
    (Method::Div, MethodFn::Binary(div)),
    (Method::Inv, MethodFn::Unary(inv)),
    (Method::EuclideanDivRem, MethodFn::DivRem(euclidean_divrem)),
    (Method::Gcd, MethodFn::Binary(gcd)),
    (Method::PolyFactor, MethodFn::Factor(factor::poly_factor_rational)),
];

fn init(_: &Context) -> Elem {
    Elem::Rational(RBig::ZERO)
}

impl Context {
    /// The field of rational numbers.
    #[must_use]
    pub fn rationals() -> Self {
        let methods = TABLE.get_or_init(|| MethodTable::build(RingKind::Rationals, init, METHODS));
        Self::from_parts(
            RingKind::Rationals,
            std::mem::size_of::<RBig>(),
            methods,
            ContextData::Leaf,
        )
    }
}

pub(crate) fn get(x: &Elem) -> GrResult<&RBig> {
    x.as_rational().ok_or_else(|| {
        log::trace!("rational field received a {} element", x.repr_name());
        GrError::Unable
    })
}

fn store(res: &mut Elem, value: RBig) -> GrResult {
    *res = Elem::Rational(value);
    Ok(())
}

fn ctx_write(_: &Context, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("Rational field (Q)")
}

fn randtest(res: &mut Elem, rng: &mut dyn RngCore, _: &Context) -> GrResult {
    let num = IBig::from(rng.gen_range(-100i64..=100));
    let den = if rng.gen_bool(0.5) {
        UBig::ONE
    } else {
        UBig::from(rng.gen_range(1u64..=30))
    };
    store(res, RBig::from_parts(num, den))
}

/// Writes `n` or `n/d` in lowest terms.
pub(crate) fn write_rational(out: &mut dyn fmt::Write, q: &RBig) -> fmt::Result {
    if *q.denominator() == UBig::ONE {
        write!(out, "{}", q.numerator())
    } else {
        write!(out, "{}/{}", q.numerator(), q.denominator())
    }
}

fn write(out: &mut dyn fmt::Write, x: &Elem, _: &Context) -> GrResult {
    write_rational(out, get(x)?).map_err(|_| GrError::Unable)
}

fn compare(x: &Elem, value: &RBig) -> Truth {
    match x.as_rational() {
        Some(x) => Truth::from(x == value),
        None => Truth::Unknown,
    }
}

fn is_zero(x: &Elem, _: &Context) -> Truth {
    compare(x, &RBig::ZERO)
}

fn is_one(x: &Elem, _: &Context) -> Truth {
    compare(x, &RBig::ONE)
}

fn is_neg_one(x: &Elem, _: &Context) -> Truth {
    compare(x, &RBig::NEG_ONE)
}

fn equal(x: &Elem, y: &Elem, _: &Context) -> Truth {
    match (x.as_rational(), y.as_rational()) {
        (Some(x), Some(y)) => Truth::from(x == y),
        _ => Truth::Unknown,
    }
}

fn set_i64(res: &mut Elem, c: i64, _: &Context) -> GrResult {
    store(res, RBig::from(c))
}

fn set_integer(res: &mut Elem, c: &IBig, _: &Context) -> GrResult {
    store(res, RBig::from(c.clone()))
}

fn set_rational(res: &mut Elem, c: &RBig, _: &Context) -> GrResult {
    store(res, c.clone())
}

fn set_other(res: &mut Elem, x: &Elem, x_ctx: &Context, ctx: &Context) -> GrResult {
    match (x_ctx.kind(), x) {
        (RingKind::Integers, Elem::Integer(n)) => set_integer(res, n, ctx),
        (RingKind::Rationals, Elem::Rational(q)) => set_rational(res, q, ctx),
        (RingKind::Balls, Elem::Ball(b)) => match b.exact_value() {
            Some(q) => set_rational(res, q, ctx),
            None => {
                store(res, RBig::ZERO)?;
                Err(GrError::Unable)
            }
        },
        (RingKind::Polynomial, _) => set_other_from_polynomial(res, x, x_ctx, ctx),
        _ => {
            store(res, RBig::ZERO)?;
            Err(GrError::Unable)
        }
    }
}

fn neg(res: &mut Elem, x: &Elem, _: &Context) -> GrResult {
    let value = -get(x)?;
    store(res, value)
}

fn add(res: &mut Elem, x: &Elem, y: &Elem, _: &Context) -> GrResult {
    let value = get(x)? + get(y)?;
    store(res, value)
}

fn sub(res: &mut Elem, x: &Elem, y: &Elem, _: &Context) -> GrResult {
    let value = get(x)? - get(y)?;
    store(res, value)
}

fn mul(res: &mut Elem, x: &Elem, y: &Elem, _: &Context) -> GrResult {
    let value = get(x)? * get(y)?;
    store(res, value)
}

fn mul_rational(res: &mut Elem, x: &Elem, c: &RBig, _: &Context) -> GrResult {
    let value = get(x)? * c;
    store(res, value)
}

fn pow_u64(res: &mut Elem, x: &Elem, e: u64, _: &Context) -> GrResult {
    let x = get(x)?;
    let value = if *x == RBig::ZERO || *x == RBig::ONE {
        if e == 0 {
            RBig::ONE
        } else {
            x.clone()
        }
    } else if *x == RBig::NEG_ONE {
        if e % 2 == 0 {
            RBig::ONE
        } else {
            RBig::NEG_ONE
        }
    } else {
        match u32::try_from(e) {
            Ok(e) => x.pow(e as usize),
            Err(_) => return Err(GrError::Unable),
        }
    };
    store(res, value)
}

fn div(res: &mut Elem, x: &Elem, y: &Elem, _: &Context) -> GrResult {
    let (x, y) = (get(x)?, get(y)?);
    if *y == RBig::ZERO {
        return Err(GrError::Domain);
    }
    store(res, x / y)
}

fn inv(res: &mut Elem, x: &Elem, _: &Context) -> GrResult {
    let x = get(x)?;
    if *x == RBig::ZERO {
        return Err(GrError::Domain);
    }
    store(res, RBig::ONE / x)
}

/// In a field the Euclidean remainder is always zero.
fn euclidean_divrem(q: &mut Elem, r: &mut Elem, x: &Elem, y: &Elem, ctx: &Context) -> GrResult {
    div(q, x, y, ctx)?;
    store(r, RBig::ZERO)
}

fn gcd(res: &mut Elem, x: &Elem, y: &Elem, _: &Context) -> GrResult {
    let both_zero = *get(x)? == RBig::ZERO && *get(y)? == RBig::ZERO;
    store(res, if both_zero { RBig::ZERO } else { RBig::ONE })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(n: i64, d: u64) -> Elem {
        Elem::Rational(RBig::from_parts(IBig::from(n), UBig::from(d)))
    }

    #[test]
    fn test_field_structure() {
        let qq = Context::rationals();
        assert_eq!(qq.is_field(), Truth::True);
        assert_eq!(qq.is_real_vector_space(), Truth::False);
        assert_eq!(format!("{qq}"), "Rational field (Q)");
    }

    #[test]
    fn test_arithmetic() {
        let qq = Context::rationals();
        let mut res = qq.init();

        qq.add(&mut res, &q(1, 2), &q(1, 3)).unwrap();
        assert_eq!(res, q(5, 6));
        qq.div(&mut res, &q(1, 2), &q(-3, 4)).unwrap();
        assert_eq!(res, q(-2, 3));
        assert_eq!(qq.div(&mut res, &q(1, 2), &q(0, 1)), Err(GrError::Domain));
        qq.pow_i64(&mut res, &q(2, 3), -2).unwrap();
        assert_eq!(res, q(9, 4));
    }

    #[test]
    fn test_write() {
        let qq = Context::rationals();
        assert_eq!(qq.to_string_of(&q(-7, 3)).unwrap(), "-7/3");
        assert_eq!(qq.to_string_of(&q(4, 2)).unwrap(), "2");
    }

    #[test]
    fn test_canonical_associate_is_one() {
        let qq = Context::rationals();
        let (mut ux, mut u) = (qq.init(), qq.init());
        qq.canonical_associate(&mut ux, &mut u, &q(-2, 5)).unwrap();
        assert_eq!(ux, q(1, 1));
        assert_eq!(u, q(-5, 2));

        qq.canonical_associate(&mut ux, &mut u, &q(0, 1)).unwrap();
        assert_eq!(qq.is_zero(&ux), Truth::True);
        assert_eq!(qq.is_one(&u), Truth::True);
    }

    #[test]
    fn test_integer_conversion() {
        let zz = Context::integers();
        let qq = Context::rationals();
        let mut res = qq.init();
        qq.set_other(&mut res, &Elem::Integer(IBig::from(-4)), &zz).unwrap();
        assert_eq!(res, q(-4, 1));

        let mut back = zz.init();
        zz.set_other(&mut back, &res, &qq).unwrap();
        assert_eq!(back, Elem::Integer(IBig::from(-4)));
    }
}
