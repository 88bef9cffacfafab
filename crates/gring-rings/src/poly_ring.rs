//! Polynomial rings R[x] over an arbitrary base ring.
//!
//! Elements are dense coefficient vectors ([`Poly`]) whose entries belong to
//! the base ring. Every coefficient operation dispatches through the base
//! context, so polynomial rings nest to any depth (`Z/nZ[y][x]` and so on).
//! This module holds the context side: construction, structure predicates,
//! conversion, constants and output. The arithmetic is in
//! [`poly_ops`](crate::poly_ops).

use std::fmt;
use std::sync::{Arc, OnceLock};

use dashu::integer::IBig;
use dashu::rational::RBig;
use rand::{Rng, RngCore};

use crate::context::{Context, ContextData, PolyData, RingKind};
use crate::elem::{Elem, Poly};
use crate::generic::ctx_predicate_false;
use crate::methods::{Method, MethodFn, MethodTable};
use crate::poly_ops;
use crate::status::{GrError, GrResult, Status};
use crate::truth::Truth;

/// Construction parameters of a polynomial ring.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PolyRingConfig {
    /// Name of the generator.
    pub var: String,
    /// Bound on `len(a) + len(b)` for products; `None` is unbounded.
    pub size_limit: Option<usize>,
}

impl Default for PolyRingConfig {
    fn default() -> Self {
        Self {
            var: "x".to_string(),
            size_limit: None,
        }
    }
}

impl PolyRingConfig {
    /// Sets the generator name.
    #[must_use]
    pub fn with_var(mut self, var: impl Into<String>) -> Self {
        self.var = var.into();
        self
    }

    /// Sets the product size limit.
    #[must_use]
    pub fn with_size_limit(mut self, limit: usize) -> Self {
        self.size_limit = Some(limit);
        self
    }
}

static TABLE: OnceLock<MethodTable> = OnceLock::new();

static METHODS: &[(Method, MethodFn)] = &[
    (Method::CtxWrite, MethodFn::CtxWrite(ctx_write)),
    (Method::CtxIsRing, MethodFn::CtxPredicate(ctx_is_ring)),
    (Method::CtxIsCommutativeRing, MethodFn::CtxPredicate(ctx_is_commutative_ring)),
    (Method::CtxIsIntegralDomain, MethodFn::CtxPredicate(ctx_is_integral_domain)),
    (Method::CtxIsUniqueFactorizationDomain, MethodFn::CtxPredicate(ctx_is_ufd)),
    (Method::CtxIsField, MethodFn::CtxPredicate(ctx_predicate_false)),
    (Method::CtxIsRationalVectorSpace, MethodFn::CtxPredicate(ctx_is_rational_vector_space)),
    (Method::CtxIsRealVectorSpace, MethodFn::CtxPredicate(ctx_is_real_vector_space)),
    (Method::CtxIsComplexVectorSpace, MethodFn::CtxPredicate(ctx_is_complex_vector_space)),
    (Method::CtxIsThreadsafe, MethodFn::CtxPredicate(ctx_is_threadsafe)),
    (Method::CtxSetGenName, MethodFn::CtxSetGenName(set_gen_name)),
    (Method::CtxSetGenNames, MethodFn::CtxSetGenNames(set_gen_names)),
    (Method::Clear, MethodFn::Clear(clear)),
    (Method::Randtest, MethodFn::Randtest(randtest)),
    (Method::Write, MethodFn::Write(write)),
    (Method::Zero, MethodFn::Constant(zero)),
    (Method::One, MethodFn::Constant(one)),
    (Method::NegOne, MethodFn::Constant(neg_one)),
    (Method::Gen, MethodFn::Constant(gen)),
    (Method::GensRecursive, MethodFn::Gens(gens_recursive)),
    (Method::I, MethodFn::Constant(i)),
    (Method::Pi, MethodFn::Constant(pi)),
    (Method::IsZero, MethodFn::Predicate(is_zero)),
    (Method::IsOne, MethodFn::Predicate(is_one)),
    (Method::Equal, MethodFn::Equal(equal)),
    (Method::SetU64, MethodFn::SetU64(set_u64)),
    (Method::SetI64, MethodFn::SetI64(set_i64)),
    (Method::SetInteger, MethodFn::SetInteger(set_integer)),
    (Method::SetRational, MethodFn::SetRational(set_rational)),
    (Method::SetOther, MethodFn::SetOther(set_other)),
    (Method::SetIntervalMidRad, MethodFn::Binary(poly_ops::set_interval_mid_rad)),
    (Method::Neg, MethodFn::Unary(poly_ops::neg)),
    (Method::Add, MethodFn::Binary(poly_ops::add)),
    (Method::Sub, MethodFn::Binary(poly_ops::sub)),
    (Method::Mul, MethodFn::Binary(poly_ops::mul)),
    (Method::MulU64, MethodFn::OpU64(poly_ops::mul_u64)),
    (Method::MulI64, MethodFn::OpI64(poly_ops::mul_i64)),
    (Method::MulInteger, MethodFn::OpInteger(poly_ops::mul_integer)),
    (Method::MulRational, MethodFn::OpRational(poly_ops::mul_rational)),
    (Method::MulOther, MethodFn::MulOther(poly_ops::mul_other)),
    (Method::OtherMul, MethodFn::OtherMul(poly_ops::other_mul)),
    (Method::PowU64, MethodFn::OpU64(poly_ops::pow_u64)),
    (Method::Div, MethodFn::Binary(poly_ops::div)),
    (Method::Inv, MethodFn::Unary(poly_ops::inv)),
    (Method::EuclideanDivRem, MethodFn::DivRem(poly_ops::euclidean_divrem)),
    (Method::Gcd, MethodFn::Binary(poly_ops::gcd)),
    (Method::CanonicalAssociate, MethodFn::CanonicalAssociate(poly_ops::canonical_associate)),
    (Method::Factor, MethodFn::Factor(poly_ops::factor)),
];

fn init(_: &Context) -> Elem {
    Elem::Poly(Poly::default())
}

impl Context {
    /// The ring of polynomials in `x` over `base`.
    #[must_use]
    pub fn polynomial(base: Arc<Context>) -> Self {
        Self::polynomial_with(base, PolyRingConfig::default())
    }

    /// The ring of polynomials over `base` with explicit parameters.
    #[must_use]
    pub fn polynomial_with(base: Arc<Context>, config: PolyRingConfig) -> Self {
        let methods = TABLE.get_or_init(|| MethodTable::build(RingKind::Polynomial, init, METHODS));
        let mut ctx = Self::from_parts(
            RingKind::Polynomial,
            std::mem::size_of::<Poly>(),
            methods,
            ContextData::Polynomial(PolyData {
                base,
                var: config.var,
            }),
        );
        ctx.set_size_limit(config.size_limit);
        ctx
    }
}

// Shared helpers for this module and `poly_ops`.

pub(crate) fn base(ctx: &Context) -> GrResult<&Context> {
    ctx.poly_data()
        .map(|data| data.base.as_ref())
        .ok_or(GrError::Unable)
}

pub(crate) fn get(x: &Elem) -> GrResult<&Poly> {
    x.as_poly().ok_or_else(|| {
        log::trace!("polynomial ring received a {} element", x.repr_name());
        GrError::Unable
    })
}

/// Drops trailing coefficients that are definitely zero.
pub(crate) fn normalize(coeffs: &mut Vec<Elem>, base: &Context) {
    while let Some(last) = coeffs.last() {
        if !base.is_zero(last).is_true() {
            break;
        }
        if let Some(c) = coeffs.pop() {
            base.clear(c);
        }
    }
}

/// Normalizes `coeffs` and moves them into `res`, releasing its old value.
pub(crate) fn store(res: &mut Elem, mut coeffs: Vec<Elem>, ctx: &Context) -> GrResult {
    normalize(&mut coeffs, base(ctx)?);
    let old = std::mem::replace(res, Elem::Poly(Poly { coeffs }));
    ctx.clear(old);
    Ok(())
}

pub(crate) fn set_zero(res: &mut Elem, ctx: &Context) -> GrResult {
    store(res, Vec::new(), ctx)
}

/// Sets `res` to the constant polynomial built by `make` in the base ring.
/// On failure `res` is zero.
pub(crate) fn set_constant(
    res: &mut Elem,
    ctx: &Context,
    make: impl FnOnce(&Context, &mut Elem) -> GrResult,
) -> GrResult {
    let base = base(ctx)?;
    let mut c = base.init();
    match make(base, &mut c) {
        Ok(()) => store(res, vec![c], ctx),
        Err(e) => {
            base.clear(c);
            set_zero(res, ctx)?;
            Err(e)
        }
    }
}

fn ctx_write(ctx: &Context, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match ctx.base_ring() {
        Some(base) => write!(f, "Ring of polynomials over {base}"),
        None => f.write_str("Ring of polynomials"),
    }
}

macro_rules! forward_ctx_predicates {
    ($($name:ident => $base_fn:ident;)*) => {$(
        fn $name(ctx: &Context) -> Truth {
            base(ctx).map_or(Truth::Unknown, Context::$base_fn)
        }
    )*};
}

forward_ctx_predicates! {
    ctx_is_ring => is_ring;
    ctx_is_commutative_ring => is_commutative_ring;
    ctx_is_integral_domain => is_integral_domain;
    ctx_is_ufd => is_unique_factorization_domain;
    ctx_is_rational_vector_space => is_rational_vector_space;
    ctx_is_real_vector_space => is_real_vector_space;
    ctx_is_complex_vector_space => is_complex_vector_space;
    ctx_is_threadsafe => is_threadsafe;
}

fn set_gen_name(ctx: &mut Context, name: &str) -> GrResult {
    let data = ctx.poly_data_mut().ok_or(GrError::Unable)?;
    data.var = name.to_string();
    Ok(())
}

fn set_gen_names(ctx: &mut Context, names: &[&str]) -> GrResult {
    let name = names.first().ok_or(GrError::Domain)?;
    set_gen_name(ctx, name)
}

fn clear(x: Elem, ctx: &Context) {
    if let (Elem::Poly(p), Ok(base)) = (x, base(ctx)) {
        for c in p.coeffs {
            base.clear(c);
        }
    }
}

fn randtest(res: &mut Elem, rng: &mut dyn RngCore, ctx: &Context) -> GrResult {
    let base = base(ctx)?;
    let len = rng.gen_range(0..5);
    let mut coeffs = Vec::with_capacity(len);
    for _ in 0..len {
        let mut c = base.init();
        base.randtest(&mut c, rng)?;
        coeffs.push(c);
    }
    store(res, coeffs, ctx)
}

/// Nested polynomial bases leave `is_neg_one` undecided, so `-c == 1` is
/// checked instead.
fn is_neg_one_coeff(base: &Context, c: &Elem) -> bool {
    match base.is_neg_one(c) {
        Truth::True => true,
        Truth::False => false,
        Truth::Unknown => {
            let mut t = base.init();
            let found = base.neg(&mut t, c).is_ok() && base.is_one(&t).is_true();
            base.clear(t);
            found
        }
    }
}

/// Writes `x` in ascending powers, e.g. `-1 + x - x^2 + x^3`.
fn write(out: &mut dyn fmt::Write, x: &Elem, ctx: &Context) -> GrResult {
    let (base, p) = (base(ctx)?, get(x)?);
    let var = ctx.var().unwrap_or("x");

    let mut terms: Vec<String> = Vec::new();
    for (i, c) in p.coeffs.iter().enumerate() {
        if base.is_zero(c).is_true() {
            continue;
        }
        if i == 0 {
            terms.push(base.to_string_of(c)?);
            continue;
        }

        let monomial = if i == 1 {
            var.to_string()
        } else {
            format!("{var}^{i}")
        };
        let term = if base.is_one(c).is_true() {
            monomial
        } else if is_neg_one_coeff(base, c) {
            format!("-{monomial}")
        } else {
            let s = base.to_string_of(c)?;
            let body = s.strip_prefix('-').unwrap_or(&s);
            if body.contains(" + ") || body.contains(" - ") {
                format!("({s})*{monomial}")
            } else {
                format!("{s}*{monomial}")
            }
        };
        terms.push(term);
    }

    let mut written = String::new();
    for (k, term) in terms.iter().enumerate() {
        match (k, term.strip_prefix('-')) {
            (0, _) => written.push_str(term),
            (_, Some(rest)) => {
                written.push_str(" - ");
                written.push_str(rest);
            }
            (_, None) => {
                written.push_str(" + ");
                written.push_str(term);
            }
        }
    }
    if written.is_empty() {
        written.push('0');
    }
    out.write_str(&written).map_err(|_| GrError::Unable)
}

fn zero(res: &mut Elem, ctx: &Context) -> GrResult {
    set_zero(res, ctx)
}

fn one(res: &mut Elem, ctx: &Context) -> GrResult {
    set_constant(res, ctx, Context::one)
}

fn neg_one(res: &mut Elem, ctx: &Context) -> GrResult {
    set_constant(res, ctx, Context::neg_one)
}

fn i(res: &mut Elem, ctx: &Context) -> GrResult {
    set_constant(res, ctx, Context::i)
}

fn pi(res: &mut Elem, ctx: &Context) -> GrResult {
    set_constant(res, ctx, Context::pi)
}

fn gen(res: &mut Elem, ctx: &Context) -> GrResult {
    let base = base(ctx)?;
    let mut c0 = base.init();
    let mut c1 = base.init();
    let mut status = Status::SUCCESS;
    status |= base.zero(&mut c0);
    status |= base.one(&mut c1);
    store(res, vec![c0, c1], ctx)?;
    status.into_result()
}

/// Generators of the nested base rings, promoted to constants, followed by
/// the generator of this ring.
fn gens_recursive(res: &mut Vec<Elem>, ctx: &Context) -> GrResult {
    let base = base(ctx)?;
    let mut inner = Vec::new();
    let mut status = Status::SUCCESS;
    status |= base.gens_recursive(&mut inner);

    for old in res.drain(..) {
        ctx.clear(old);
    }
    for g in inner {
        let mut promoted = ctx.init();
        status |= store(&mut promoted, vec![g], ctx);
        res.push(promoted);
    }

    let mut x = ctx.init();
    status |= gen(&mut x, ctx);
    res.push(x);
    status.into_result()
}

fn is_zero(x: &Elem, ctx: &Context) -> Truth {
    let (Ok(base), Ok(p)) = (base(ctx), get(x)) else {
        return Truth::Unknown;
    };
    Truth::all(p.coeffs.iter().map(|c| base.is_zero(c)))
}

fn is_one(x: &Elem, ctx: &Context) -> Truth {
    let (Ok(base), Ok(p)) = (base(ctx), get(x)) else {
        return Truth::Unknown;
    };
    if p.is_empty() {
        // Only the zero ring has 0 = 1.
        return base.is_one(&base.init());
    }
    Truth::all(p.coeffs.iter().enumerate().map(|(i, c)| {
        if i == 0 {
            base.is_one(c)
        } else {
            base.is_zero(c)
        }
    }))
}

fn equal(x: &Elem, y: &Elem, ctx: &Context) -> Truth {
    let (Ok(base), Ok(x), Ok(y)) = (base(ctx), get(x), get(y)) else {
        return Truth::Unknown;
    };
    let len = x.len().max(y.len());
    Truth::all((0..len).map(|i| match (x.coeff(i), y.coeff(i)) {
        (Some(a), Some(b)) => base.equal(a, b),
        (Some(a), None) | (None, Some(a)) => base.is_zero(a),
        (None, None) => Truth::True,
    }))
}

fn set_u64(res: &mut Elem, c: u64, ctx: &Context) -> GrResult {
    set_constant(res, ctx, |base, t| base.set_u64(t, c))
}

fn set_i64(res: &mut Elem, c: i64, ctx: &Context) -> GrResult {
    set_constant(res, ctx, |base, t| base.set_i64(t, c))
}

fn set_integer(res: &mut Elem, c: &IBig, ctx: &Context) -> GrResult {
    set_constant(res, ctx, |base, t| base.set_integer(t, c))
}

fn set_rational(res: &mut Elem, c: &RBig, ctx: &Context) -> GrResult {
    set_constant(res, ctx, |base, t| base.set_rational(t, c))
}

/// Conversion into this ring, trying in order: the same ring, the base
/// ring, a polynomial ring in the same variable, and finally a scalar of
/// any ring the base ring accepts.
fn set_other(res: &mut Elem, x: &Elem, x_ctx: &Context, ctx: &Context) -> GrResult {
    let data = ctx.poly_data().ok_or(GrError::Unable)?;
    let base = data.base.as_ref();

    if x_ctx == ctx {
        let p = get(x)?;
        return store(res, p.coeffs.clone(), ctx);
    }
    if x_ctx == base {
        return set_constant(res, ctx, |base, t| base.set(t, x));
    }
    if let Some(x_data) = x_ctx.poly_data().filter(|d| d.var == data.var) {
        log::trace!("converting coefficients from {} into {}", x_data.base, base);
        let p = get(x)?;
        let mut coeffs = Vec::with_capacity(p.len());
        for xc in &p.coeffs {
            let mut c = base.init();
            if let Err(e) = base.set_other(&mut c, xc, &x_data.base) {
                base.clear(c);
                for c in coeffs {
                    base.clear(c);
                }
                set_zero(res, ctx)?;
                return Err(e);
            }
            coeffs.push(c);
        }
        return store(res, coeffs, ctx);
    }

    set_constant(res, ctx, |base, t| base.set_other(t, x, x_ctx))
}
