//! The ring of integers Z.

use std::fmt;
use std::sync::OnceLock;

use dashu::base::{Gcd, UnsignedAbs};
use dashu::integer::{IBig, UBig};
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
    (Method::CtxIsIntegralDomain, MethodFn::CtxPredicate(ctx_predicate_true)),
    (Method::CtxIsUniqueFactorizationDomain, MethodFn::CtxPredicate(ctx_predicate_true)),
    (Method::CtxIsField, MethodFn::CtxPredicate(ctx_predicate_false)),
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
    (Method::SetI64, MethodFn::SetI64(set_i64)),
    (Method::SetInteger, MethodFn::SetInteger(set_integer)),
    (Method::SetRational, MethodFn::SetRational(set_rational)),
    (Method::SetOther, MethodFn::SetOther(set_other)),
    (Method::Neg, MethodFn::Unary(neg)),
    (Method::Add, MethodFn::Binary(add)),
    (Method::Sub, MethodFn::Binary(sub)),
    (Method::Mul, MethodFn::Binary(mul)),
    (Method::MulI64, MethodFn::OpI64(mul_i64)),
    (Method::PowU64, MethodFn::OpU64(pow_u64)),
    (Method::Div, MethodFn::Binary(div)),
    (Method::Inv, MethodFn::Unary(inv)),
    (Method::EuclideanDivRem, MethodFn::DivRem(euclidean_divrem)),
    (Method::Gcd, MethodFn::Binary(gcd)),
    (Method::CanonicalAssociate, MethodFn::CanonicalAssociate(canonical_associate)),
];

fn init(_: &Context) -> Elem {
    Elem::Integer(IBig::ZERO)
}

impl Context {
    /// The ring of integers.
    #[must_use]
    pub fn integers() -> Self {
        let methods = TABLE.get_or_init(|| MethodTable::build(RingKind::Integers, init, METHODS));
        Self::from_parts(
            RingKind::Integers,
            std::mem::size_of::<IBig>(),
            methods,
            ContextData::Leaf,
        )
    }
}

fn get(x: &Elem) -> GrResult<&IBig> {
    x.as_integer().ok_or_else(|| {
        log::trace!("integer ring received a {} element", x.repr_name());
        GrError::Unable
    })
}

fn store(res: &mut Elem, value: IBig) -> GrResult {
    *res = Elem::Integer(value);
    Ok(())
}

fn ctx_write(_: &Context, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("Integer ring (Z)")
}

fn randtest(res: &mut Elem, rng: &mut dyn RngCore, _: &Context) -> GrResult {
    let value = match rng.gen_range(0..4) {
        0 => IBig::from(rng.gen_range(-3i64..=3)),
        1 => IBig::from(rng.gen::<i64>()) * IBig::from(rng.gen::<u64>()),
        _ => IBig::from(rng.gen_range(-1000i64..=1000)),
    };
    store(res, value)
}

fn write(out: &mut dyn fmt::Write, x: &Elem, _: &Context) -> GrResult {
    write!(out, "{}", get(x)?).map_err(|_| GrError::Unable)
}

fn compare(x: &Elem, value: i64) -> Truth {
    match x.as_integer() {
        Some(x) => Truth::from(*x == IBig::from(value)),
        None => Truth::Unknown,
    }
}

fn is_zero(x: &Elem, _: &Context) -> Truth {
    compare(x, 0)
}

fn is_one(x: &Elem, _: &Context) -> Truth {
    compare(x, 1)
}

fn is_neg_one(x: &Elem, _: &Context) -> Truth {
    compare(x, -1)
}

fn equal(x: &Elem, y: &Elem, _: &Context) -> Truth {
    match (x.as_integer(), y.as_integer()) {
        (Some(x), Some(y)) => Truth::from(x == y),
        _ => Truth::Unknown,
    }
}

fn set_i64(res: &mut Elem, c: i64, _: &Context) -> GrResult {
    store(res, IBig::from(c))
}

fn set_integer(res: &mut Elem, c: &IBig, _: &Context) -> GrResult {
    store(res, c.clone())
}

fn set_rational(res: &mut Elem, c: &RBig, _: &Context) -> GrResult {
    if *c.denominator() == UBig::ONE {
        store(res, c.numerator().clone())
    } else {
        store(res, IBig::ZERO)?;
        Err(GrError::Domain)
    }
}

fn set_other(res: &mut Elem, x: &Elem, x_ctx: &Context, ctx: &Context) -> GrResult {
    match x_ctx.kind() {
        RingKind::Integers => set_integer(res, get(x)?, ctx),
        RingKind::Rationals => match x.as_rational() {
            Some(q) => set_rational(res, q, ctx),
            None => Err(GrError::Unable),
        },
        RingKind::Balls => match x.as_ball() {
            Some(b) => match b.exact_value() {
                Some(q) => set_rational(res, q, ctx),
                None => {
                    store(res, IBig::ZERO)?;
                    Err(GrError::Unable)
                }
            },
            None => Err(GrError::Unable),
        },
        RingKind::Polynomial => set_other_from_polynomial(res, x, x_ctx, ctx),
        RingKind::IntegersMod => {
            store(res, IBig::ZERO)?;
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

fn mul_i64(res: &mut Elem, x: &Elem, c: i64, _: &Context) -> GrResult {
    let value = get(x)? * IBig::from(c);
    store(res, value)
}

fn pow_u64(res: &mut Elem, x: &Elem, e: u64, _: &Context) -> GrResult {
    let x = get(x)?;
    let value = if *x == IBig::ZERO {
        if e == 0 {
            IBig::ONE
        } else {
            IBig::ZERO
        }
    } else if *x == IBig::ONE {
        IBig::ONE
    } else if *x == IBig::NEG_ONE {
        if e % 2 == 0 {
            IBig::ONE
        } else {
            IBig::NEG_ONE
        }
    } else {
        match u32::try_from(e) {
            Ok(e) => x.pow(e as usize),
            Err(_) => return Err(GrError::Unable),
        }
    };
    store(res, value)
}

/// Quotient and remainder with `0 <= r < |y|`; `y` is nonzero.
pub(crate) fn divrem_nonneg(x: &IBig, y: &IBig) -> (IBig, IBig) {
    let mut q = x / y;
    let mut r = x % y;
    if r < IBig::ZERO {
        if *y > IBig::ZERO {
            q -= IBig::ONE;
            r += y;
        } else {
            q += IBig::ONE;
            r -= y;
        }
    }
    (q, r)
}

/// Exact division; `Domain` if `y` does not divide `x`.
fn div(res: &mut Elem, x: &Elem, y: &Elem, _: &Context) -> GrResult {
    let (x, y) = (get(x)?, get(y)?);
    if *y == IBig::ZERO {
        return Err(GrError::Domain);
    }
    let (q, r) = divrem_nonneg(x, y);
    if r == IBig::ZERO {
        store(res, q)
    } else {
        Err(GrError::Domain)
    }
}

fn inv(res: &mut Elem, x: &Elem, _: &Context) -> GrResult {
    let x = get(x)?;
    if *x == IBig::ONE || *x == IBig::NEG_ONE {
        store(res, x.clone())
    } else {
        Err(GrError::Domain)
    }
}

/// Euclidean division with `0 <= r < |y|`.
fn euclidean_divrem(q: &mut Elem, r: &mut Elem, x: &Elem, y: &Elem, _: &Context) -> GrResult {
    let (x, y) = (get(x)?, get(y)?);
    if *y == IBig::ZERO {
        return Err(GrError::Domain);
    }
    let (quot, rem) = divrem_nonneg(x, y);
    store(q, quot)?;
    store(r, rem)
}

fn gcd(res: &mut Elem, x: &Elem, y: &Elem, _: &Context) -> GrResult {
    let g: UBig = get(x)?.gcd(get(y)?);
    store(res, IBig::from(g))
}

/// The canonical associate of `x` is `|x|`.
fn canonical_associate(ux: &mut Elem, u: &mut Elem, x: &Elem, _: &Context) -> GrResult {
    let x = get(x)?;
    let unit = if *x < IBig::ZERO {
        IBig::NEG_ONE
    } else {
        IBig::ONE
    };
    store(ux, IBig::from(x.unsigned_abs()))?;
    store(u, unit)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn z(v: i64) -> Elem {
        Elem::Integer(IBig::from(v))
    }

    #[test]
    fn test_ring_structure() {
        let zz = Context::integers();
        assert_eq!(zz.is_field(), Truth::False);
        assert_eq!(zz.is_integral_domain(), Truth::True);
        assert_eq!(zz.to_string(), "Integer ring (Z)");
        assert!(std::ptr::eq(zz.methods(), Context::integers().methods()));
    }

    #[test]
    fn test_euclidean_division() {
        let zz = Context::integers();
        let (mut q, mut r) = (zz.init(), zz.init());

        zz.euclidean_divrem(&mut q, &mut r, &z(-7), &z(3)).unwrap();
        assert_eq!((q, r), (z(-3), z(2)));

        let (mut q, mut r) = (zz.init(), zz.init());
        assert_eq!(
            zz.euclidean_divrem(&mut q, &mut r, &z(1), &z(0)),
            Err(GrError::Domain)
        );
    }

    #[test]
    fn test_exact_division() {
        let zz = Context::integers();
        let mut res = zz.init();

        zz.div(&mut res, &z(12), &z(-4)).unwrap();
        assert_eq!(res, z(-3));
        assert_eq!(zz.div(&mut res, &z(7), &z(2)), Err(GrError::Domain));
        assert_eq!(zz.inv(&mut res, &z(2)), Err(GrError::Domain));
        zz.inv(&mut res, &z(-1)).unwrap();
        assert_eq!(res, z(-1));
    }

    #[test]
    fn test_gcd_and_associate() {
        let zz = Context::integers();
        let mut g = zz.init();
        zz.gcd(&mut g, &z(-48), &z(18)).unwrap();
        assert_eq!(g, z(6));

        let (mut ux, mut u) = (zz.init(), zz.init());
        zz.canonical_associate(&mut ux, &mut u, &z(-5)).unwrap();
        assert_eq!((ux, u), (z(5), z(-1)));
    }

    #[test]
    fn test_rational_conversion() {
        let zz = Context::integers();
        let mut res = zz.init();
        zz.set_rational(&mut res, &RBig::from_parts(IBig::from(6), UBig::from(1u8)))
            .unwrap();
        assert_eq!(res, z(6));
        assert_eq!(
            zz.set_rational(&mut res, &RBig::from_parts(IBig::from(1), UBig::from(2u8))),
            Err(GrError::Domain)
        );
        assert_eq!(zz.is_zero(&res), Truth::True);
    }

    #[test]
    fn test_generic_fallbacks() {
        let zz = Context::integers();
        let mut res = zz.init();

        zz.add_u64(&mut res, &z(5), 7).unwrap();
        assert_eq!(res, z(12));
        zz.pow_i64(&mut res, &z(3), 4).unwrap();
        assert_eq!(res, z(81));
        zz.neg_one(&mut res).unwrap();
        assert_eq!(zz.is_neg_one(&res), Truth::True);
        assert_eq!(zz.gen(&mut res), Err(GrError::Unable));

        let mut gens = vec![z(1)];
        zz.gens(&mut gens).unwrap();
        assert!(gens.is_empty());
    }

    #[test]
    fn test_randtest_is_integer() {
        let zz = Context::integers();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..20 {
            let mut x = zz.init();
            zz.randtest(&mut x, &mut rng).unwrap();
            assert!(x.as_integer().is_some());
        }
    }
}
