//! Property-based tests for polynomial rings over the generic dispatch.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use dashu::integer::IBig;
    use dashu::rational::RBig;
    use proptest::prelude::*;

    use crate::context::Context;
    use crate::elem::Elem;
    use crate::poly_ring::store;
    use crate::truth::Truth;

    fn qx() -> Context {
        Context::polynomial(Arc::new(Context::rationals()))
    }

    fn zx() -> Context {
        Context::polynomial(Arc::new(Context::integers()))
    }

    // Builds a normalized polynomial of `ring` from small integer coefficients.
    fn build(ring: &Context, coeffs: &[i64]) -> Elem {
        let base = ring.base_ring().unwrap();
        let coeffs = coeffs
            .iter()
            .map(|&c| base.elem_i64(c).unwrap())
            .collect();
        let mut res = ring.init();
        store(&mut res, coeffs, ring).unwrap();
        res
    }

    fn len(x: &Elem) -> usize {
        x.as_poly().map_or(0, |p| p.len())
    }

    // Strategy for coefficient lists of degree at most 4, zeros included
    fn small_coeffs() -> impl Strategy<Value = Vec<i64>> {
        proptest::collection::vec(-20i64..20, 0..=5)
    }

    // Strategy for coefficient lists with a nonzero leading coefficient
    fn nonzero_coeffs() -> impl Strategy<Value = Vec<i64>> {
        (small_coeffs(), (1i64..20).prop_union(-20i64..0)).prop_map(|(mut v, lead)| {
            v.push(lead);
            v
        })
    }

    proptest! {
        #[test]
        fn normalized_after_construction(a in small_coeffs()) {
            let ring = qx();
            let p = build(&ring, &a);
            let base = ring.base_ring().unwrap();
            if let Some(last) = p.as_poly().unwrap().coeffs().last() {
                prop_assert_eq!(base.is_zero(last), Truth::False);
            }
        }

        #[test]
        fn product_length(a in nonzero_coeffs(), b in nonzero_coeffs()) {
            let ring = qx();
            let (p, q) = (build(&ring, &a), build(&ring, &b));
            let mut r = ring.init();
            ring.mul(&mut r, &p, &q).unwrap();
            prop_assert_eq!(len(&r), len(&p) + len(&q) - 1);
        }

        #[test]
        fn mul_commutative(a in small_coeffs(), b in small_coeffs()) {
            let ring = zx();
            let (p, q) = (build(&ring, &a), build(&ring, &b));
            let (mut pq, mut qp) = (ring.init(), ring.init());
            ring.mul(&mut pq, &p, &q).unwrap();
            ring.mul(&mut qp, &q, &p).unwrap();
            prop_assert_eq!(ring.equal(&pq, &qp), Truth::True);
        }

        #[test]
        fn distributive(a in small_coeffs(), b in small_coeffs(), c in small_coeffs()) {
            // a * (b + c) = a * b + a * c
            let ring = zx();
            let (p, q, s) = (build(&ring, &a), build(&ring, &b), build(&ring, &c));
            let (mut t, mut left) = (ring.init(), ring.init());
            ring.add(&mut t, &q, &s).unwrap();
            ring.mul(&mut left, &p, &t).unwrap();

            let (mut pq, mut ps, mut right) = (ring.init(), ring.init(), ring.init());
            ring.mul(&mut pq, &p, &q).unwrap();
            ring.mul(&mut ps, &p, &s).unwrap();
            ring.add(&mut right, &pq, &ps).unwrap();
            prop_assert_eq!(ring.equal(&left, &right), Truth::True);
        }

        #[test]
        fn sub_self_is_zero(a in small_coeffs()) {
            let ring = Context::polynomial(Arc::new(Context::integers_mod(7)));
            let p = build(&ring, &a);
            let mut r = ring.init();
            ring.sub(&mut r, &p, &p).unwrap();
            prop_assert_eq!(ring.is_zero(&r), Truth::True);
            prop_assert_eq!(len(&r), 0);
        }

        #[test]
        fn integer_rational_round_trip(a in small_coeffs()) {
            let (zring, qring) = (zx(), qx());
            let p = build(&zring, &a);
            let (mut q, mut back) = (qring.init(), zring.init());
            qring.set_other(&mut q, &p, &zring).unwrap();
            zring.set_other(&mut back, &q, &qring).unwrap();
            prop_assert_eq!(zring.equal(&p, &back), Truth::True);
        }

        #[test]
        fn set_other_same_context_copies(a in small_coeffs(), c in 1i64..10) {
            let ring = qx();
            let mut p = build(&ring, &a);
            let third = RBig::from_parts(IBig::from(c), dashu::integer::UBig::from(3u8));
            let mut t = ring.init();
            ring.mul_rational(&mut t, &p, &third).unwrap();
            ring.swap(&mut p, &mut t);

            let mut r = ring.init();
            ring.set_other(&mut r, &p, &ring).unwrap();
            prop_assert_eq!(ring.equal(&r, &p), Truth::True);
        }

        #[test]
        fn scalar_division_round_trip(a in small_coeffs(), c in 1i64..50) {
            let ring = qx();
            let p = build(&ring, &a);
            let scalar = RBig::from_parts(IBig::from(c), dashu::integer::UBig::from(3u8));
            let (mut scaled, mut d, mut back) = (ring.init(), ring.init(), ring.init());
            ring.mul_rational(&mut scaled, &p, &scalar).unwrap();
            ring.set_rational(&mut d, &scalar).unwrap();
            ring.div(&mut back, &scaled, &d).unwrap();
            prop_assert_eq!(ring.equal(&p, &back), Truth::True);
        }

        #[test]
        fn euclidean_division_identity(a in small_coeffs(), b in nonzero_coeffs()) {
            // a = q * b + r with deg r < deg b
            let ring = qx();
            let (p, d) = (build(&ring, &a), build(&ring, &b));
            let (mut q, mut r) = (ring.init(), ring.init());
            ring.euclidean_divrem(&mut q, &mut r, &p, &d).unwrap();
            prop_assert!(len(&r) < len(&d));

            let (mut qd, mut sum) = (ring.init(), ring.init());
            ring.mul(&mut qd, &q, &d).unwrap();
            ring.add(&mut sum, &qd, &r).unwrap();
            prop_assert_eq!(ring.equal(&sum, &p), Truth::True);
        }

        #[test]
        fn pow_matches_repeated_mul(a in small_coeffs(), e in 0u64..5) {
            let ring = Context::polynomial(Arc::new(Context::integers_mod(7)));
            let p = build(&ring, &a);
            let mut expected = ring.elem_i64(1).unwrap();
            for _ in 0..e {
                let mut t = ring.init();
                ring.mul(&mut t, &expected, &p).unwrap();
                expected = t;
            }
            let mut r = ring.init();
            ring.pow_u64(&mut r, &p, e).unwrap();
            prop_assert_eq!(ring.equal(&r, &expected), Truth::True);
        }
    }
}
