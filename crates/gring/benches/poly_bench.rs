//! Benchmarks for dispatched polynomial arithmetic.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use gring::prelude::*;

/// Builds a polynomial of the given degree with small integer coefficients.
fn test_poly(ring: &Context, degree: usize) -> Elem {
    let text = (0..=degree)
        .map(|i| format!("{}*x^{i}", (i as i64 % 100) - 50))
        .collect::<Vec<_>>()
        .join(" + ");
    ring.parse(&text).unwrap()
}

fn bench_polynomial_multiplication(c: &mut Criterion) {
    let mut group = c.benchmark_group("poly_mul");

    let rings = [
        ("Z[x]", polynomials_over(Context::integers())),
        ("Q[x]", polynomials_over(Context::rationals())),
        ("Z/pZ[x]", polynomials_over(Context::integers_mod(1_000_000_007))),
    ];

    for (name, ring) in &rings {
        for size in [16, 64, 256] {
            let p = test_poly(ring, size);
            let q = test_poly(ring, size);
            let mut res = ring.init();

            group.bench_with_input(BenchmarkId::new(*name, size), &size, |b, _| {
                b.iter(|| {
                    ring.mul(&mut res, black_box(&p), black_box(&q)).unwrap();
                });
            });
        }
    }

    group.finish();
}

fn bench_nested_power(c: &mut Criterion) {
    let mut group = c.benchmark_group("nested_pow");

    let zyx = polynomials_over(polynomials_over_with(Context::integers(), "y", None));
    let base = zyx.parse("x + y + 1").unwrap();

    for exp in [4u64, 8, 16] {
        let mut res = zyx.init();
        group.bench_with_input(BenchmarkId::new("Z[y][x]", exp), &exp, |b, &e| {
            b.iter(|| zyx.pow_u64(&mut res, black_box(&base), e).unwrap());
        });
    }

    group.finish();
}

fn bench_gcd(c: &mut Criterion) {
    let qx = polynomials_over(Context::rationals());
    let a = qx.parse("(x - 1)^6 * (x + 2)^3").unwrap();
    let b = qx.parse("(x - 1)^4 * (x - 3)^5").unwrap();
    let mut g = qx.init();

    c.bench_function("gcd Q[x] degree 9", |bench| {
        bench.iter(|| qx.gcd(&mut g, black_box(&a), black_box(&b)).unwrap());
    });
}

criterion_group!(
    benches,
    bench_polynomial_multiplication,
    bench_nested_power,
    bench_gcd
);
criterion_main!(benches);
