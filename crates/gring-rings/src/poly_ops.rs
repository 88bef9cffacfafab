//! Arithmetic in polynomial rings.
//!
//! All functions here are method-table entries of the polynomial kind. They
//! build the result coefficients in a fresh vector and hand it to
//! [`store`], which normalizes and releases the previous value of the output.

use dashu::integer::IBig;
use dashu::rational::RBig;

use crate::context::Context;
use crate::elem::Elem;
use crate::generic::pow_u64_binexp;
use crate::methods::FactorFlags;
use crate::poly_ring::{base, get, set_constant, set_zero, store};
use crate::status::{GrError, GrResult, Status};
use crate::truth::Truth;

/// Applies `f` to every coefficient of `x`.
fn map_coeffs(
    res: &mut Elem,
    x: &Elem,
    ctx: &Context,
    mut f: impl FnMut(&Context, &mut Elem, &Elem) -> GrResult,
) -> GrResult {
    let (b, x) = (base(ctx)?, get(x)?);
    let mut coeffs = Vec::with_capacity(x.len());
    for c in &x.coeffs {
        let mut t = b.init();
        f(b, &mut t, c)?;
        coeffs.push(t);
    }
    store(res, coeffs, ctx)
}

/// Combines `x` and `y` coefficient-wise; a coefficient present in only one
/// operand goes through `only_x` or `only_y`.
fn zip_coeffs(
    res: &mut Elem,
    x: &Elem,
    y: &Elem,
    ctx: &Context,
    both: fn(&Context, &mut Elem, &Elem, &Elem) -> GrResult,
    only_x: fn(&Context, &mut Elem, &Elem) -> GrResult,
    only_y: fn(&Context, &mut Elem, &Elem) -> GrResult,
) -> GrResult {
    let (b, x, y) = (base(ctx)?, get(x)?, get(y)?);
    let len = x.len().max(y.len());
    let mut coeffs = Vec::with_capacity(len);
    for i in 0..len {
        let mut t = b.init();
        match (x.coeff(i), y.coeff(i)) {
            (Some(a), Some(c)) => both(b, &mut t, a, c)?,
            (Some(a), None) => only_x(b, &mut t, a)?,
            (None, Some(c)) => only_y(b, &mut t, c)?,
            (None, None) => {}
        }
        coeffs.push(t);
    }
    store(res, coeffs, ctx)
}

/// Products of total operand length above the ring's size limit are
/// refused before any work is done.
fn check_product_len(len_sum: Option<usize>, ctx: &Context) -> GrResult {
    let Some(limit) = ctx.size_limit() else {
        return Ok(());
    };
    match len_sum {
        Some(len) if len <= limit => Ok(()),
        _ => {
            log::trace!("product of length sum {len_sum:?} exceeds size limit {limit}");
            Err(GrError::Unable)
        }
    }
}

pub(crate) fn neg(res: &mut Elem, x: &Elem, ctx: &Context) -> GrResult {
    map_coeffs(res, x, ctx, Context::neg)
}

pub(crate) fn add(res: &mut Elem, x: &Elem, y: &Elem, ctx: &Context) -> GrResult {
    zip_coeffs(res, x, y, ctx, Context::add, Context::set, Context::set)
}

pub(crate) fn sub(res: &mut Elem, x: &Elem, y: &Elem, ctx: &Context) -> GrResult {
    zip_coeffs(res, x, y, ctx, Context::sub, Context::set, Context::neg)
}

/// Schoolbook multiplication.
pub(crate) fn mul(res: &mut Elem, x: &Elem, y: &Elem, ctx: &Context) -> GrResult {
    let (b, xp, yp) = (base(ctx)?, get(x)?, get(y)?);
    if xp.is_empty() || yp.is_empty() {
        return set_zero(res, ctx);
    }
    check_product_len(xp.len().checked_add(yp.len()), ctx)?;

    let mut coeffs: Vec<Elem> = (0..xp.len() + yp.len() - 1).map(|_| b.init()).collect();
    let mut t = b.init();
    let mut s = b.init();
    for (i, xi) in xp.coeffs.iter().enumerate() {
        for (j, yj) in yp.coeffs.iter().enumerate() {
            b.mul(&mut t, xi, yj)?;
            b.add(&mut s, &coeffs[i + j], &t)?;
            b.swap(&mut coeffs[i + j], &mut s);
        }
    }
    b.clear(t);
    b.clear(s);
    store(res, coeffs, ctx)
}

pub(crate) fn mul_u64(res: &mut Elem, x: &Elem, c: u64, ctx: &Context) -> GrResult {
    map_coeffs(res, x, ctx, |b, t, a| b.mul_u64(t, a, c))
}

pub(crate) fn mul_i64(res: &mut Elem, x: &Elem, c: i64, ctx: &Context) -> GrResult {
    map_coeffs(res, x, ctx, |b, t, a| b.mul_i64(t, a, c))
}

pub(crate) fn mul_integer(res: &mut Elem, x: &Elem, c: &IBig, ctx: &Context) -> GrResult {
    map_coeffs(res, x, ctx, |b, t, a| b.mul_integer(t, a, c))
}

pub(crate) fn mul_rational(res: &mut Elem, x: &Elem, c: &RBig, ctx: &Context) -> GrResult {
    map_coeffs(res, x, ctx, |b, t, a| b.mul_rational(t, a, c))
}

/// `x * y` with `y` from `y_ctx`: a base-ring scalar scales each
/// coefficient, an element of an identical ring multiplies directly, and
/// anything else is converted first.
pub(crate) fn mul_other(
    res: &mut Elem,
    x: &Elem,
    y: &Elem,
    y_ctx: &Context,
    ctx: &Context,
) -> GrResult {
    if y_ctx == base(ctx)? {
        return map_coeffs(res, x, ctx, |b, t, a| b.mul(t, a, y));
    }
    if y_ctx == ctx {
        return mul(res, x, y, ctx);
    }

    let mut t = ctx.init();
    let status = ctx.set_other(&mut t, y, y_ctx).and_then(|()| mul(res, x, &t, ctx));
    ctx.clear(t);
    status
}

/// `x * y` with `x` from `x_ctx`.
pub(crate) fn other_mul(
    res: &mut Elem,
    x: &Elem,
    x_ctx: &Context,
    y: &Elem,
    ctx: &Context,
) -> GrResult {
    if x_ctx == base(ctx)? {
        return map_coeffs(res, y, ctx, |b, t, a| b.mul(t, x, a));
    }
    if x_ctx == ctx {
        return mul(res, x, y, ctx);
    }

    let mut t = ctx.init();
    let status = ctx.set_other(&mut t, x, x_ctx).and_then(|()| mul(res, &t, y, ctx));
    ctx.clear(t);
    status
}

/// Binary exponentiation. With a size limit, the length of the result is
/// checked up front so an oversized power fails without computing anything.
pub(crate) fn pow_u64(res: &mut Elem, x: &Elem, e: u64, ctx: &Context) -> GrResult {
    let p = get(x)?;
    if e == 0 {
        return ctx.one(res);
    }
    if p.is_empty() {
        return set_zero(res, ctx);
    }
    if e == 1 {
        return store(res, p.coeffs.clone(), ctx);
    }

    // Result length (len - 1) * e + 1, checked like a product.
    let result_len = u64::try_from(p.len() - 1)
        .ok()
        .and_then(|d| d.checked_mul(e))
        .and_then(|d| d.checked_add(2))
        .and_then(|d| usize::try_from(d).ok());
    check_product_len(result_len, ctx)?;

    pow_u64_binexp(res, x, e, ctx)
}

/// Exact division. A constant divisor divides each coefficient; otherwise
/// the division succeeds only if the remainder is definitely zero.
pub(crate) fn div(res: &mut Elem, x: &Elem, y: &Elem, ctx: &Context) -> GrResult {
    let yp = get(y)?;
    match yp.coeffs.as_slice() {
        [] => Err(GrError::Domain),
        [d] => map_coeffs(res, x, ctx, |b, t, a| b.div(t, a, d)),
        _ => {
            let mut q = ctx.init();
            let mut r = ctx.init();
            let status = euclidean_divrem(&mut q, &mut r, x, y, ctx).and_then(|()| {
                match ctx.is_zero(&r) {
                    Truth::True => Ok(()),
                    Truth::False => Err(GrError::Domain),
                    Truth::Unknown => Err(GrError::Unable),
                }
            });
            if status.is_ok() {
                ctx.swap(res, &mut q);
            }
            ctx.clear(q);
            ctx.clear(r);
            status
        }
    }
}

/// Polynomial long division. Each step divides by the leading coefficient
/// of `y` in the base ring, so the base ring decides whether it is exact.
pub(crate) fn euclidean_divrem(
    q: &mut Elem,
    r: &mut Elem,
    x: &Elem,
    y: &Elem,
    ctx: &Context,
) -> GrResult {
    let (b, xp, yp) = (base(ctx)?, get(x)?, get(y)?);
    let Some(lead) = yp.coeffs.last() else {
        return Err(GrError::Domain);
    };
    if xp.len() < yp.len() {
        let rem = xp.coeffs.clone();
        set_zero(q, ctx)?;
        return store(r, rem, ctx);
    }

    let qlen = xp.len() - yp.len() + 1;
    let mut quot: Vec<Elem> = (0..qlen).map(|_| b.init()).collect();
    let mut rem = xp.coeffs.clone();
    let mut t = b.init();
    let mut s = b.init();

    for k in (0..qlen).rev() {
        b.div(&mut quot[k], &rem[k + yp.len() - 1], lead)?;
        for (j, yj) in yp.coeffs.iter().enumerate() {
            b.mul(&mut t, &quot[k], yj)?;
            b.sub(&mut s, &rem[k + j], &t)?;
            b.swap(&mut rem[k + j], &mut s);
        }
    }
    b.clear(t);
    b.clear(s);

    // Everything from the divisor's degree up has been eliminated.
    for c in rem.drain(yp.len() - 1..) {
        b.clear(c);
    }
    store(q, quot, ctx)?;
    store(r, rem, ctx)
}

pub(crate) fn inv(res: &mut Elem, x: &Elem, ctx: &Context) -> GrResult {
    let p = get(x)?;
    match p.len() {
        0 => Err(GrError::Domain),
        1 => map_coeffs(res, x, ctx, Context::inv),
        // Over an integral domain only constants are units.
        _ if base(ctx)?.is_integral_domain().is_true() => Err(GrError::Domain),
        _ => Err(GrError::Unable),
    }
}

/// Monic gcd by the Euclidean algorithm; needs a base field.
pub(crate) fn gcd(res: &mut Elem, x: &Elem, y: &Elem, ctx: &Context) -> GrResult {
    if !base(ctx)?.is_field().is_true() {
        return Err(GrError::Unable);
    }

    let mut a = x.clone();
    let mut c = y.clone();
    while !get(&c)?.is_empty() {
        let mut r = ctx.init();
        ctx.euclidean_rem(&mut r, &a, &c)?;
        let old = std::mem::replace(&mut a, std::mem::replace(&mut c, r));
        ctx.clear(old);
    }
    ctx.clear(c);

    let status = match get(&a)?.coeffs.last() {
        None => set_zero(res, ctx),
        Some(lead) => map_coeffs(res, &a, ctx, |b, t, co| b.div(t, co, lead)),
    };
    ctx.clear(a);
    status
}

/// Normalizes the leading coefficient with the base ring's canonical
/// associate; `u` is the corresponding unit as a constant polynomial.
pub(crate) fn canonical_associate(
    ux: &mut Elem,
    u: &mut Elem,
    x: &Elem,
    ctx: &Context,
) -> GrResult {
    let (b, p) = (base(ctx)?, get(x)?);
    let Some(lead) = p.coeffs.last() else {
        let mut status = Status::SUCCESS;
        status |= set_zero(ux, ctx);
        status |= ctx.one(u);
        return status.into_result();
    };

    let mut lead_ux = b.init();
    let mut unit = b.init();
    b.canonical_associate(&mut lead_ux, &mut unit, lead)?;
    b.clear(lead_ux);

    map_coeffs(ux, x, ctx, |b, t, c| b.mul(t, c, &unit))?;
    set_constant(u, ctx, |b, t| {
        b.swap(t, &mut unit);
        Ok(())
    })
}

/// Factorization is delegated to the base ring's polynomial factoring; the
/// content it returns is promoted to a constant polynomial.
pub(crate) fn factor(
    c: &mut Elem,
    factors: &mut Vec<Elem>,
    mults: &mut Vec<u64>,
    x: &Elem,
    flags: FactorFlags,
    ctx: &Context,
) -> GrResult {
    let b = base(ctx)?;
    let mut content = b.init();
    b.poly_factor(&mut content, factors, mults, x, flags)?;
    set_constant(c, ctx, |b, t| {
        b.swap(t, &mut content);
        Ok(())
    })
}

/// Coefficient-wise interval construction. Positions where only `rad` has
/// a coefficient use a zero midpoint.
pub(crate) fn set_interval_mid_rad(
    res: &mut Elem,
    mid: &Elem,
    rad: &Elem,
    ctx: &Context,
) -> GrResult {
    let (b, m, r) = (base(ctx)?, get(mid)?, get(rad)?);
    if r.is_empty() {
        return store(res, m.coeffs.clone(), ctx);
    }

    let len = m.len().max(r.len());
    let mut zero: Option<Elem> = None;
    let mut coeffs = Vec::with_capacity(len);
    let mut status = Status::SUCCESS;
    for i in 0..len {
        let mut c = b.init();
        match (m.coeff(i), r.coeff(i)) {
            (Some(mi), Some(ri)) => status |= b.set_interval_mid_rad(&mut c, mi, ri),
            (Some(mi), None) => status |= b.set(&mut c, mi),
            (None, Some(ri)) => {
                let z = zero.get_or_insert_with(|| b.init());
                status |= b.set_interval_mid_rad(&mut c, z, ri);
            }
            (None, None) => {}
        }
        coeffs.push(c);
    }
    if let Some(z) = zero {
        b.clear(z);
    }

    store(res, coeffs, ctx)?;
    status.into_result()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::poly_ring::PolyRingConfig;

    fn qx() -> Context {
        Context::polynomial(Arc::new(Context::rationals()))
    }

    fn show(ctx: &Context, x: &Elem) -> String {
        ctx.to_string_of(x).unwrap()
    }

    #[test]
    fn test_add_sub_normalize() {
        let ring = qx();
        let a = ring.parse("1 + x + x^2").unwrap();
        let b = ring.parse("2 - x^2").unwrap();
        let mut res = ring.init();

        ring.add(&mut res, &a, &b).unwrap();
        assert_eq!(show(&ring, &res), "3 + x");
        assert_eq!(res.as_poly().map(|p| p.len()), Some(2));

        ring.sub(&mut res, &a, &a).unwrap();
        assert_eq!(ring.is_zero(&res), Truth::True);
        assert_eq!(res.as_poly().map(|p| p.len()), Some(0));
    }

    #[test]
    fn test_product_length() {
        let ring = qx();
        let a = ring.parse("x^2 + 1").unwrap();
        let b = ring.parse("x - 1").unwrap();
        let mut res = ring.init();
        ring.mul(&mut res, &a, &b).unwrap();
        assert_eq!(res.as_poly().map(|p| p.len()), Some(4));
        assert_eq!(show(&ring, &res), "-1 + x - x^2 + x^3");
    }

    #[test]
    fn test_size_limit() {
        let ring = Context::polynomial_with(
            Arc::new(Context::rationals()),
            PolyRingConfig::default().with_size_limit(4),
        );
        let a = ring.parse("x^2 + 1").unwrap();
        let b = ring.parse("x - 1").unwrap();
        let mut res = ring.parse("7").unwrap();

        // len 3 + len 2 > 4
        assert_eq!(ring.mul(&mut res, &a, &b), Err(GrError::Unable));
        assert_eq!(show(&ring, &res), "7");

        ring.mul(&mut res, &b, &b).unwrap();
        assert_eq!(show(&ring, &res), "1 - 2*x + x^2");

        // The zero polynomial is exempt.
        ring.mul(&mut res, &a, &ring.init()).unwrap();
        assert_eq!(ring.is_zero(&res), Truth::True);

        assert_eq!(ring.pow_u64(&mut res, &b, 3), Err(GrError::Unable));
        ring.pow_u64(&mut res, &b, 2).unwrap();
        assert_eq!(show(&ring, &res), "1 - 2*x + x^2");
        assert_eq!(ring.pow_u64(&mut res, &b, u64::MAX), Err(GrError::Unable));
    }

    #[test]
    fn test_division() {
        let ring = qx();
        let a = ring.parse("x^3 - x^2 + x - 1").unwrap();
        let b = ring.parse("x - 1").unwrap();
        let mut res = ring.init();

        ring.div(&mut res, &a, &b).unwrap();
        assert_eq!(show(&ring, &res), "1 + x^2");

        let c = ring.parse("x + 2").unwrap();
        assert_eq!(ring.div(&mut res, &a, &c), Err(GrError::Domain));
        assert_eq!(ring.div(&mut res, &a, &ring.init()), Err(GrError::Domain));

        let two = ring.parse("2").unwrap();
        ring.div(&mut res, &b, &two).unwrap();
        assert_eq!(show(&ring, &res), "-1/2 + 1/2*x");
    }

    #[test]
    fn test_euclidean_division_over_integers() {
        let ring = Context::polynomial(Arc::new(Context::integers()));
        let a = ring.parse("x^2 + 3*x + 5").unwrap();
        let b = ring.parse("x + 1").unwrap();
        let (mut q, mut r) = (ring.init(), ring.init());

        ring.euclidean_divrem(&mut q, &mut r, &a, &b).unwrap();
        assert_eq!(show(&ring, &q), "2 + x");
        assert_eq!(show(&ring, &r), "3");

        let c = ring.parse("2*x + 1").unwrap();
        assert_eq!(
            ring.euclidean_divrem(&mut q, &mut r, &a, &c),
            Err(GrError::Domain)
        );
    }

    #[test]
    fn test_inverse() {
        let ring = qx();
        let mut res = ring.init();

        ring.inv(&mut res, &ring.parse("4").unwrap()).unwrap();
        assert_eq!(show(&ring, &res), "1/4");
        assert_eq!(ring.inv(&mut res, &ring.parse("x").unwrap()), Err(GrError::Domain));
        assert_eq!(ring.inv(&mut res, &ring.init()), Err(GrError::Domain));

        let zmod4 = Context::polynomial(Arc::new(Context::integers_mod(4)));
        let p = zmod4.parse("1 + 2*x").unwrap();
        assert_eq!(zmod4.inv(&mut res, &p), Err(GrError::Unable));
    }

    #[test]
    fn test_gcd() {
        let ring = qx();
        let a = ring.parse("(x - 1)*(x + 2)").unwrap();
        let b = ring.parse("3*(x - 1)*(x - 5)").unwrap();
        let mut g = ring.init();

        ring.gcd(&mut g, &a, &b).unwrap();
        assert_eq!(show(&ring, &g), "-1 + x");

        ring.gcd(&mut g, &ring.init(), &ring.init()).unwrap();
        assert_eq!(ring.is_zero(&g), Truth::True);

        let zx = Context::polynomial(Arc::new(Context::integers()));
        let x = zx.parse("x").unwrap();
        assert_eq!(zx.gcd(&mut g, &x, &x), Err(GrError::Unable));
    }

    #[test]
    fn test_canonical_associate() {
        let ring = Context::polynomial(Arc::new(Context::integers()));
        let p = ring.parse("3 - 2*x").unwrap();
        let (mut ux, mut u) = (ring.init(), ring.init());

        ring.canonical_associate(&mut ux, &mut u, &p).unwrap();
        assert_eq!(show(&ring, &ux), "-3 + 2*x");
        assert_eq!(show(&ring, &u), "-1");
    }

    #[test]
    fn test_scalar_multiples() {
        let ring = Context::polynomial(Arc::new(Context::integers_mod(6)));
        let p = ring.parse("1 + 3*x").unwrap();
        let mut res = ring.init();

        // 2 * 3 = 0 mod 6, so the leading term vanishes.
        ring.mul_u64(&mut res, &p, 2).unwrap();
        assert_eq!(show(&ring, &res), "2");
        ring.mul_i64(&mut res, &p, -1).unwrap();
        assert_eq!(show(&ring, &res), "5 + 3*x");
    }

    #[test]
    fn test_mixed_multiplication() {
        let qq = Arc::new(Context::rationals());
        let ring = Context::polynomial(Arc::clone(&qq));
        let zz = Context::integers();
        let p = ring.parse("x + 1").unwrap();
        let mut res = ring.init();

        let half = qq.parse("1/2").unwrap();
        ring.mul_other(&mut res, &p, &half, &qq).unwrap();
        assert_eq!(show(&ring, &res), "1/2 + 1/2*x");

        let three = zz.elem_i64(3).unwrap();
        ring.other_mul(&mut res, &three, &zz, &p).unwrap();
        assert_eq!(show(&ring, &res), "3 + 3*x");

        ring.mul_other(&mut res, &p, &p, &ring).unwrap();
        assert_eq!(show(&ring, &res), "1 + 2*x + x^2");
    }

    #[test]
    fn test_interval_coefficients() {
        let rr = Arc::new(Context::balls());
        let ring = Context::polynomial(Arc::clone(&rr));
        let mid = ring.parse("1 + 2*x").unwrap();
        let rad = ring.parse("0 + 0*x + 1/8*x^2").unwrap();
        let mut res = ring.init();

        ring.set_interval_mid_rad(&mut res, &mid, &rad).unwrap();
        let p = res.as_poly().unwrap();
        assert_eq!(p.len(), 3);
        assert_eq!(rr.is_zero(&p.coeffs()[2]), Truth::Unknown);
        assert_eq!(rr.is_one(&p.coeffs()[0]), Truth::True);

        let mut d = ring.init();
        ring.sub(&mut d, &res, &res).unwrap();
        assert_eq!(ring.is_zero(&d), Truth::Unknown);
    }

    #[test]
    fn test_interval_in_place() {
        let rr = Arc::new(Context::balls());
        let ring = Context::polynomial(rr);
        let mid = ring.parse("5").unwrap();
        let mut rad = ring.init();

        ring.set_interval_mid_rad_assign(&mut rad, &mid).unwrap();
        assert_eq!(show(&ring, &rad), "5");
    }
}
