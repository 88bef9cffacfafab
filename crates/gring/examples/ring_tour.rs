//! A short tour of generic ring contexts.
//!
//! Builds leaf rings and polynomial rings over them, then runs the same
//! operations through each context's method table.
//!
//! Run with: cargo run --example ring_tour

use gring::prelude::*;

fn show(ctx: &Context, x: &Elem) -> String {
    ctx.to_string_of(x)
        .unwrap_or_else(|e| format!("<{e}>"))
}

fn main() {
    println!("Generic ring contexts\n");

    example_1_same_code_many_rings();
    example_2_division_outcomes();
    example_3_uncertain_predicates();
    example_4_factorization();
}

/// Example 1: one expression evaluated in several polynomial rings.
fn example_1_same_code_many_rings() {
    println!("Example 1: (x + 1)^5 in different rings");

    let rings = [
        polynomials_over(Context::integers()),
        polynomials_over(Context::rationals()),
        polynomials_over(Context::integers_mod(5)),
        polynomials_over(polynomials_over_with(Context::integers(), "y", None)),
    ];

    for ring in &rings {
        match ring.parse("(x + 1)^5") {
            Ok(p) => println!("  {ring}: {}", show(ring, &p)),
            Err(e) => println!("  {ring}: {e}"),
        }
    }
    println!();
}

/// Example 2: exact division reports Domain when the remainder is nonzero.
fn example_2_division_outcomes() {
    println!("Example 2: exact division in Q[x]");

    let qx = polynomials_over(Context::rationals());
    let p = qx.parse("x^3 - 1").unwrap();
    let mut q = qx.init();

    for divisor in ["x - 1", "x + 1", "0"] {
        let d = qx.parse(divisor).unwrap();
        match qx.div(&mut q, &p, &d) {
            Ok(()) => println!("  (x^3 - 1) / ({divisor}) = {}", show(&qx, &q)),
            Err(e) => println!("  (x^3 - 1) / ({divisor}): {e}"),
        }
    }
    println!();
}

/// Example 3: predicates over real balls may be undecidable.
fn example_3_uncertain_predicates() {
    println!("Example 3: three-valued equality over balls");

    let rx = polynomials_over(Context::balls());
    let mid = rx.parse("1 + x").unwrap();
    let rad = rx.parse("1/1000").unwrap();
    let mut p = rx.init();
    rx.set_interval_mid_rad(&mut p, &mid, &rad).unwrap();

    let mut d = rx.init();
    rx.sub(&mut d, &p, &p).unwrap();
    println!("  p = {}", show(&rx, &p));
    println!("  p - p = {} (is zero: {})", show(&rx, &d), rx.is_zero(&d));
    println!();
}

/// Example 4: factorization over Q.
fn example_4_factorization() {
    println!("Example 4: factoring over Q");

    let qx = polynomials_over(Context::rationals());
    for s in ["2*x^4 - 2", "x^3*(3*x - 1)^2", "x^4 + 1"] {
        let p = qx.parse(s).unwrap();
        let (mut c, mut factors, mut mults) = (qx.init(), Vec::new(), Vec::new());
        match qx.factor(&mut c, &mut factors, &mut mults, &p, FactorFlags::NONE) {
            Ok(()) => {
                let parts: Vec<String> = factors
                    .iter()
                    .zip(&mults)
                    .map(|(f, m)| format!("({})^{m}", show(&qx, f)))
                    .collect();
                println!("  {s} = {} * {}", show(&qx, &c), parts.join(" * "));
            }
            Err(e) => println!("  {s}: {e}"),
        }
    }
}
