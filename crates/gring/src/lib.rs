//! # gring
//!
//! Generic ring arithmetic in Rust.
//!
//! Rings are runtime values: a [`Context`](rings::Context) carries the
//! method table of its kind, and elements are plain data interpreted by the
//! context they belong to. Composite rings such as R\[x\] take any other
//! context as their base, so `Z/7Z[y][x]` is built the same way as `Q[x]`.
//!
//! ## Features
//!
//! - **Runtime Dispatch**: One method table per ring kind, with generic defaults
//! - **Three-Valued Predicates**: Equality and zero tests can answer `Unknown`
//! - **Exact Arithmetic**: Big integers and rationals via `dashu`
//! - **Polynomial Rings**: Dense univariate polynomials over any base ring
//!
//! ## Quick Start
//!
//! ```rust
//! use gring::prelude::*;
//!
//! let zx = polynomials_over(Context::integers());
//! let p = zx.parse("(x + 1)^3").unwrap();
//! assert_eq!(zx.to_string_of(&p).unwrap(), "1 + 3*x + 3*x^2 + x^3");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::sync::Arc;

pub use gring_rings as rings;

use gring_rings::{Context, PolyRingConfig};

/// Builds the polynomial ring in `x` over `base`.
#[must_use]
pub fn polynomials_over(base: Context) -> Context {
    Context::polynomial(Arc::new(base))
}

/// Builds the polynomial ring in `var` over `base` with an optional bound
/// on the length of products.
#[must_use]
pub fn polynomials_over_with(base: Context, var: &str, size_limit: Option<usize>) -> Context {
    let config = PolyRingConfig::default().with_var(var);
    let config = match size_limit {
        Some(limit) => config.with_size_limit(limit),
        None => config,
    };
    Context::polynomial_with(Arc::new(base), config)
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{polynomials_over, polynomials_over_with};
    pub use gring_rings::{
        Context, Elem, FactorFlags, GrError, GrResult, Poly, PolyRingConfig, RingKind, Status,
        Truth,
    };
}
