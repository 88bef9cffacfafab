//! # gring-rings
//!
//! Generic ring arithmetic with runtime dispatch.
//!
//! A [`Context`] describes one concrete ring and owns a method table; every
//! operation on an [`Elem`] goes through the table of the context it belongs
//! to. This crate provides:
//! - The dispatch engine: [`Method`], [`MethodFn`], [`MethodTable`]
//! - Result signalling: [`GrError`], [`Status`] and three-valued [`Truth`]
//! - Leaf rings: Z, Q, Z/nZ and real balls
//! - Polynomial rings R\[x\] over any context, nested to any depth
//!
//! ## Layout
//!
//! ```text
//! Context ── MethodTable ── generic defaults
//!    │                        + kind-specific entries
//!    └── ContextData::Polynomial ── base ring (Arc<Context>)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use gring_rings::{Context, Truth};
//!
//! let qx = Context::polynomial(Arc::new(Context::rationals()));
//! let p = qx.parse("x^2 - 1").unwrap();
//! let q = qx.parse("x + 1").unwrap();
//!
//! let mut r = qx.init();
//! qx.div(&mut r, &p, &q).unwrap();
//! assert_eq!(qx.to_string_of(&r).unwrap(), "-1 + x");
//! assert_eq!(qx.is_one(&r), Truth::False);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod balls;
pub mod context;
mod dispatch;
pub mod elem;
mod factor;
mod generic;
mod integers;
mod integers_mod;
pub mod methods;
mod parse;
mod poly_ops;
pub mod poly_ring;
mod rationals;
pub mod status;
pub mod truth;

#[cfg(test)]
mod proptests;

pub use balls::Ball;
pub use context::{Context, RingKind};
pub use dispatch::ElemDisplay;
pub use elem::{Elem, Poly, Shallow};
pub use methods::{Convention, FactorFlags, Method, MethodFn, MethodTable};
pub use poly_ring::PolyRingConfig;
pub use status::{GrError, GrResult, Status};
pub use truth::Truth;
