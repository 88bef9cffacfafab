//! Real balls.
//!
//! A ball `[m +/- r]` stands for some real number in the closed interval
//! `m - r ..= m + r`. Midpoint and radius are exact rationals, so every
//! operation returns a ball that provably contains the exact result. Two
//! overlapping balls may or may not denote the same number; equality and
//! the zero test answer [`Truth::Unknown`] in that case.

use std::fmt;
use std::sync::OnceLock;

use dashu::integer::{IBig, UBig};
use dashu::rational::RBig;
use rand::{Rng, RngCore};

use crate::context::{Context, ContextData, RingKind};
use crate::elem::Elem;
use crate::generic::{ctx_predicate_false, ctx_predicate_true, set_other_from_polynomial};
use crate::methods::{Method, MethodFn, MethodTable};
use crate::rationals::write_rational;
use crate::status::{GrError, GrResult};
use crate::truth::Truth;

/// A real interval with exact rational midpoint and nonnegative radius.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ball {
    mid: RBig,
    rad: RBig,
}

fn abs(q: &RBig) -> RBig {
    if *q < RBig::ZERO {
        -q
    } else {
        q.clone()
    }
}

impl Ball {
    /// Creates the ball `[mid +/- |rad|]`.
    #[must_use]
    pub fn new(mid: RBig, rad: &RBig) -> Self {
        Self { mid, rad: abs(rad) }
    }

    /// A ball of radius zero.
    #[must_use]
    pub fn exact(mid: RBig) -> Self {
        Self {
            mid,
            rad: RBig::ZERO,
        }
    }

    /// The midpoint.
    #[must_use]
    pub fn mid(&self) -> &RBig {
        &self.mid
    }

    /// The radius.
    #[must_use]
    pub fn rad(&self) -> &RBig {
        &self.rad
    }

    /// Returns true if the radius is zero.
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.rad == RBig::ZERO
    }

    /// The represented number, if the ball is exact.
    #[must_use]
    pub fn exact_value(&self) -> Option<&RBig> {
        self.is_exact().then_some(&self.mid)
    }

    /// Returns true if zero lies in the ball.
    #[must_use]
    pub fn contains_zero(&self) -> bool {
        abs(&self.mid) <= self.rad
    }

    /// Whether this ball equals the exact number `c`.
    fn compare_exact(&self, c: &RBig) -> Truth {
        let distance = abs(&(&self.mid - c));
        if distance > self.rad {
            Truth::False
        } else if self.is_exact() {
            Truth::True
        } else {
            Truth::Unknown
        }
    }

    fn add(&self, other: &Self) -> Self {
        Self {
            mid: &self.mid + &other.mid,
            rad: &self.rad + &other.rad,
        }
    }

    fn sub(&self, other: &Self) -> Self {
        Self {
            mid: &self.mid - &other.mid,
            rad: &self.rad + &other.rad,
        }
    }

    fn mul(&self, other: &Self) -> Self {
        let rad = abs(&self.mid) * &other.rad + abs(&other.mid) * &self.rad + &self.rad * &other.rad;
        Self {
            mid: &self.mid * &other.mid,
            rad,
        }
    }

    /// The smallest ball containing `1/x` for every `x` in `self`; `None`
    /// if the ball contains zero.
    fn inv(&self) -> Option<Self> {
        if self.contains_zero() {
            return None;
        }
        let d = &self.mid * &self.mid - &self.rad * &self.rad;
        Some(Self {
            mid: &self.mid / &d,
            rad: &self.rad / &d,
        })
    }
}

static TABLE: OnceLock<MethodTable> = OnceLock::new();

static METHODS: &[(Method, MethodFn)] = &[
    (Method::CtxWrite, MethodFn::CtxWrite(ctx_write)),
    (Method::CtxIsRing, MethodFn::CtxPredicate(ctx_predicate_true)),
    (Method::CtxIsCommutativeRing, MethodFn::CtxPredicate(ctx_predicate_true)),
    (Method::CtxIsIntegralDomain, MethodFn::CtxPredicate(ctx_predicate_true)),
    (Method::CtxIsUniqueFactorizationDomain, MethodFn::CtxPredicate(ctx_predicate_true)),
    (Method::CtxIsField, MethodFn::CtxPredicate(ctx_predicate_true)),
    (Method::CtxIsRationalVectorSpace, MethodFn::CtxPredicate(ctx_predicate_true)),
    (Method::CtxIsRealVectorSpace, MethodFn::CtxPredicate(ctx_predicate_true)),
    (Method::CtxIsComplexVectorSpace, MethodFn::CtxPredicate(ctx_predicate_false)),
    (Method::CtxIsThreadsafe, MethodFn::CtxPredicate(ctx_predicate_true)),
    (Method::Randtest, MethodFn::Randtest(randtest)),
    (Method::Write, MethodFn::Write(write)),
    (Method::I, MethodFn::Constant(i)),
    (Method::Pi, MethodFn::Constant(pi)),
    (Method::IsZero, MethodFn::Predicate(is_zero)),
    (Method::IsOne, MethodFn::Predicate(is_one)),
    (Method::IsNegOne, MethodFn::Predicate(is_neg_one)),
    (Method::Equal, MethodFn::Equal(equal)),
    (Method::SetI64, MethodFn::SetI64(set_i64)),
    (Method::SetInteger, MethodFn::SetInteger(set_integer)),
    (Method::SetRational, MethodFn::SetRational(set_rational)),
    (Method::SetOther, MethodFn::SetOther(set_other)),
    (Method::SetIntervalMidRad, MethodFn::Binary(set_interval_mid_rad)),
    (Method::Neg, MethodFn::Unary(neg)),
    (Method::Add, MethodFn::Binary(add)),
    (Method::Sub, MethodFn::Binary(sub)),
    (Method::Mul, MethodFn::Binary(mul)),
    (Method::Div, MethodFn::Binary(div)),
    (Method::Inv, MethodFn::Unary(inv)),
];

fn init(_: &Context) -> Elem {
    Elem::Ball(Ball::exact(RBig::ZERO))
}

impl Context {
    /// The real numbers, represented by balls with rational endpoints.
    #[must_use]
    pub fn balls() -> Self {
        let methods = TABLE.get_or_init(|| MethodTable::build(RingKind::Balls, init, METHODS));
        Self::from_parts(
            RingKind::Balls,
            std::mem::size_of::<Ball>(),
            methods,
            ContextData::Leaf,
        )
    }
}

fn get(x: &Elem) -> GrResult<&Ball> {
    x.as_ball().ok_or_else(|| {
        log::trace!("ball field received a {} element", x.repr_name());
        GrError::Unable
    })
}

fn store(res: &mut Elem, value: Ball) -> GrResult {
    *res = Elem::Ball(value);
    Ok(())
}

fn ctx_write(_: &Context, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("Real numbers (balls)")
}

fn randtest(res: &mut Elem, rng: &mut dyn RngCore, _: &Context) -> GrResult {
    let mid = RBig::from_parts(
        IBig::from(rng.gen_range(-100i64..=100)),
        UBig::from(rng.gen_range(1u64..=16)),
    );
    let rad = if rng.gen_bool(0.5) {
        RBig::ZERO
    } else {
        RBig::from_parts(IBig::ONE, UBig::ONE << rng.gen_range(4usize..40))
    };
    store(res, Ball::new(mid, &rad))
}

fn write(out: &mut dyn fmt::Write, x: &Elem, _: &Context) -> GrResult {
    let x = get(x)?;
    let written = if x.is_exact() {
        write_rational(out, &x.mid)
    } else {
        out.write_char('[')
            .and_then(|()| write_rational(out, &x.mid))
            .and_then(|()| out.write_str(" +/- "))
            .and_then(|()| write_rational(out, &x.rad))
            .and_then(|()| out.write_char(']'))
    };
    written.map_err(|_| GrError::Unable)
}

fn i(_: &mut Elem, _: &Context) -> GrResult {
    Err(GrError::Domain)
}

/// pi to 20 decimal places; the radius covers the truncation.
fn pi(res: &mut Elem, _: &Context) -> GrResult {
    let scale = UBig::from(10u8).pow(20);
    let mid = RBig::from_parts(
        IBig::from(314_159_265_358_979_323_846u128),
        scale.clone(),
    );
    let rad = RBig::from_parts(IBig::ONE, scale);
    store(res, Ball::new(mid, &rad))
}

fn is_zero(x: &Elem, _: &Context) -> Truth {
    x.as_ball()
        .map_or(Truth::Unknown, |b| b.compare_exact(&RBig::ZERO))
}

fn is_one(x: &Elem, _: &Context) -> Truth {
    x.as_ball()
        .map_or(Truth::Unknown, |b| b.compare_exact(&RBig::ONE))
}

fn is_neg_one(x: &Elem, _: &Context) -> Truth {
    x.as_ball()
        .map_or(Truth::Unknown, |b| b.compare_exact(&RBig::NEG_ONE))
}

fn equal(x: &Elem, y: &Elem, _: &Context) -> Truth {
    match (x.as_ball(), y.as_ball()) {
        (Some(x), Some(y)) => {
            if x.is_exact() && y.is_exact() {
                Truth::from(x.mid == y.mid)
            } else if abs(&(&x.mid - &y.mid)) > &x.rad + &y.rad {
                Truth::False
            } else {
                Truth::Unknown
            }
        }
        _ => Truth::Unknown,
    }
}

fn set_i64(res: &mut Elem, c: i64, _: &Context) -> GrResult {
    store(res, Ball::exact(RBig::from(c)))
}

fn set_integer(res: &mut Elem, c: &IBig, _: &Context) -> GrResult {
    store(res, Ball::exact(RBig::from(c.clone())))
}

fn set_rational(res: &mut Elem, c: &RBig, _: &Context) -> GrResult {
    store(res, Ball::exact(c.clone()))
}

fn set_other(res: &mut Elem, x: &Elem, x_ctx: &Context, ctx: &Context) -> GrResult {
    match (x_ctx.kind(), x) {
        (RingKind::Integers, Elem::Integer(c)) => set_integer(res, c, ctx),
        (RingKind::Rationals, Elem::Rational(c)) => set_rational(res, c, ctx),
        (RingKind::Balls, Elem::Ball(b)) => store(res, b.clone()),
        (RingKind::Polynomial, _) => set_other_from_polynomial(res, x, x_ctx, ctx),
        _ => {
            store(res, Ball::exact(RBig::ZERO))?;
            Err(GrError::Unable)
        }
    }
}

/// The ball centred at the midpoint of `mid`, wide enough to contain every
/// point of `mid` widened by every radius in `rad`.
fn set_interval_mid_rad(res: &mut Elem, mid: &Elem, rad: &Elem, _: &Context) -> GrResult {
    let (m, r) = (get(mid)?, get(rad)?);
    let radius = &m.rad + abs(&r.mid) + &r.rad;
    store(
        res,
        Ball {
            mid: m.mid.clone(),
            rad: radius,
        },
    )
}

fn neg(res: &mut Elem, x: &Elem, _: &Context) -> GrResult {
    let x = get(x)?;
    store(
        res,
        Ball {
            mid: -&x.mid,
            rad: x.rad.clone(),
        },
    )
}

fn add(res: &mut Elem, x: &Elem, y: &Elem, _: &Context) -> GrResult {
    let value = get(x)?.add(get(y)?);
    store(res, value)
}

fn sub(res: &mut Elem, x: &Elem, y: &Elem, _: &Context) -> GrResult {
    let value = get(x)?.sub(get(y)?);
    store(res, value)
}

fn mul(res: &mut Elem, x: &Elem, y: &Elem, _: &Context) -> GrResult {
    let value = get(x)?.mul(get(y)?);
    store(res, value)
}

/// Inversion of a ball around zero is undefined for an exact zero and
/// undecidable otherwise.
fn invert(y: &Ball) -> GrResult<Ball> {
    match y.inv() {
        Some(inv) => Ok(inv),
        None if y.is_exact() => Err(GrError::Domain),
        None => Err(GrError::Unable),
    }
}

fn div(res: &mut Elem, x: &Elem, y: &Elem, _: &Context) -> GrResult {
    let (x, y) = (get(x)?, get(y)?);
    let value = x.mul(&invert(y)?);
    store(res, value)
}

fn inv(res: &mut Elem, x: &Elem, _: &Context) -> GrResult {
    let value = invert(get(x)?)?;
    store(res, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(n: i64, d: u64) -> RBig {
        RBig::from_parts(IBig::from(n), UBig::from(d))
    }

    fn ball(mid: RBig, rad: RBig) -> Elem {
        Elem::Ball(Ball::new(mid, &rad))
    }

    #[test]
    fn test_exact_balls_decide() {
        let rr = Context::balls();
        let x = rr.elem_i64(3).unwrap();
        let y = rr.elem_i64(3).unwrap();
        assert_eq!(rr.equal(&x, &y), Truth::True);
        assert_eq!(rr.is_zero(&rr.init()), Truth::True);
        assert_eq!(rr.is_one(&x), Truth::False);
    }

    #[test]
    fn test_overlapping_balls_are_unknown() {
        let rr = Context::balls();
        let x = ball(q(1, 1), q(1, 10));
        let mut d = rr.init();
        rr.sub(&mut d, &x, &x).unwrap();
        assert_eq!(rr.is_zero(&d), Truth::Unknown);

        let far = ball(q(2, 1), q(1, 10));
        assert_eq!(rr.equal(&x, &far), Truth::False);
    }

    #[test]
    fn test_mul_encloses_product() {
        let rr = Context::balls();
        let x = ball(q(2, 1), q(1, 2));
        let y = ball(q(-3, 1), q(1, 4));
        let mut p = rr.init();
        rr.mul(&mut p, &x, &y).unwrap();

        let p = p.as_ball().unwrap();
        assert_eq!(p.mid(), &q(-6, 1));
        // 2 * 1/4 + 3 * 1/2 + 1/8
        assert_eq!(p.rad(), &q(17, 8));
    }

    #[test]
    fn test_division_near_zero() {
        let rr = Context::balls();
        let one = rr.elem_i64(1).unwrap();
        let mut res = rr.init();

        assert_eq!(rr.div(&mut res, &one, &rr.init()), Err(GrError::Domain));
        let fuzzy_zero = ball(q(0, 1), q(1, 100));
        assert_eq!(rr.div(&mut res, &one, &fuzzy_zero), Err(GrError::Unable));

        rr.inv(&mut res, &ball(q(2, 1), q(1, 1))).unwrap();
        // 1/x for x in [1, 3] is [1/3, 1].
        let res = res.as_ball().unwrap();
        assert_eq!(res.mid(), &q(2, 3));
        assert_eq!(res.rad(), &q(1, 3));
    }

    #[test]
    fn test_interval_construction() {
        let rr = Context::balls();
        let mid = ball(q(5, 1), q(1, 8));
        let rad = ball(q(-1, 4), q(1, 8));
        let mut res = rr.init();
        rr.set_interval_mid_rad(&mut res, &mid, &rad).unwrap();

        let res = res.as_ball().unwrap();
        assert_eq!(res.mid(), &q(5, 1));
        assert_eq!(res.rad(), &q(1, 2));
    }

    #[test]
    fn test_constants_and_output() {
        let rr = Context::balls();
        let mut res = rr.init();
        assert_eq!(rr.i(&mut res), Err(GrError::Domain));

        rr.pi(&mut res).unwrap();
        let pi = res.as_ball().unwrap();
        assert!(pi.mid() > &q(314, 100) && pi.mid() < &q(315, 100));

        let x = ball(q(1, 2), q(1, 4));
        assert_eq!(rr.to_string_of(&x).unwrap(), "[1/2 +/- 1/4]");
        assert_eq!(rr.to_string_of(&rr.elem_i64(-2).unwrap()).unwrap(), "-2");
    }
}
