//! Dispatch wrappers.
//!
//! Each wrapper resolves one [`Method`] in the context's table and calls the
//! entry with the context appended. Missing entries yield
//! [`GrError::Unable`] for fallible operations and [`Truth::Unknown`] for
//! predicates.

use std::fmt;

use dashu::integer::IBig;
use dashu::rational::RBig;
use rand::RngCore;

use crate::context::Context;
use crate::elem::{Elem, Shallow};
use crate::methods::{FactorFlags, Method, MethodFn};
use crate::status::{GrError, GrResult};
use crate::truth::Truth;

macro_rules! ctx_predicates {
    ($($(#[$meta:meta])* $name:ident => $method:ident;)*) => {$(
        $(#[$meta])*
        #[must_use]
        pub fn $name(&self) -> Truth {
            match self.methods.get(Method::$method) {
                Some(MethodFn::CtxPredicate(f)) => f(self),
                _ => Truth::Unknown,
            }
        }
    )*};
}

macro_rules! constants {
    ($($(#[$meta:meta])* $name:ident => $method:ident;)*) => {$(
        $(#[$meta])*
        ///
        /// # Errors
        ///
        /// Fails if the constant does not exist in this ring.
        pub fn $name(&self, res: &mut Elem) -> GrResult {
            match self.methods.get(Method::$method) {
                Some(MethodFn::Constant(f)) => f(res, self),
                _ => Err(self.unsupported(Method::$method)),
            }
        }
    )*};
}

macro_rules! predicates {
    ($($(#[$meta:meta])* $name:ident => $method:ident;)*) => {$(
        $(#[$meta])*
        #[must_use]
        pub fn $name(&self, x: &Elem) -> Truth {
            match self.methods.get(Method::$method) {
                Some(MethodFn::Predicate(f)) => f(x, self),
                _ => Truth::Unknown,
            }
        }
    )*};
}

macro_rules! unary_ops {
    ($($(#[$meta:meta])* $name:ident => $method:ident;)*) => {$(
        $(#[$meta])*
        ///
        /// # Errors
        ///
        /// Returns `Domain` or `Unable` as reported by the implementation.
        pub fn $name(&self, res: &mut Elem, x: &Elem) -> GrResult {
            match self.methods.get(Method::$method) {
                Some(MethodFn::Unary(f)) => f(res, x, self),
                _ => Err(self.unsupported(Method::$method)),
            }
        }
    )*};
}

macro_rules! binary_ops {
    ($($(#[$meta:meta])* $name:ident => $method:ident;)*) => {$(
        $(#[$meta])*
        ///
        /// # Errors
        ///
        /// Returns `Domain` or `Unable` as reported by the implementation.
        pub fn $name(&self, res: &mut Elem, x: &Elem, y: &Elem) -> GrResult {
            match self.methods.get(Method::$method) {
                Some(MethodFn::Binary(f)) => f(res, x, y, self),
                _ => Err(self.unsupported(Method::$method)),
            }
        }
    )*};
}

macro_rules! scalar_ops {
    ($($(#[$meta:meta])* $name:ident => $method:ident, $conv:ident, $ty:ty;)*) => {$(
        $(#[$meta])*
        ///
        /// # Errors
        ///
        /// Returns `Domain` or `Unable` as reported by the implementation.
        pub fn $name(&self, res: &mut Elem, x: &Elem, c: $ty) -> GrResult {
            match self.methods.get(Method::$method) {
                Some(MethodFn::$conv(f)) => f(res, x, c, self),
                _ => Err(self.unsupported(Method::$method)),
            }
        }
    )*};
}

impl Context {
    fn unsupported(&self, method: Method) -> GrError {
        log::trace!("{:?}: {method:?} is not implemented", self.kind());
        GrError::Unable
    }

    // Context-level operations.

    /// Renames the generator of a polynomial ring.
    ///
    /// # Errors
    ///
    /// `Unable` for contexts without a generator.
    pub fn set_gen_name(&mut self, name: &str) -> GrResult {
        match self.methods.get(Method::CtxSetGenName) {
            Some(MethodFn::CtxSetGenName(f)) => f(self, name),
            _ => Err(self.unsupported(Method::CtxSetGenName)),
        }
    }

    /// Renames the generators of a ring; a univariate ring uses the first.
    ///
    /// # Errors
    ///
    /// `Domain` if `names` is empty, `Unable` for contexts without generators.
    pub fn set_gen_names(&mut self, names: &[&str]) -> GrResult {
        match self.methods.get(Method::CtxSetGenNames) {
            Some(MethodFn::CtxSetGenNames(f)) => f(self, names),
            _ => Err(self.unsupported(Method::CtxSetGenNames)),
        }
    }

    ctx_predicates! {
        /// Whether this structure is a ring.
        is_ring => CtxIsRing;
        /// Whether multiplication commutes.
        is_commutative_ring => CtxIsCommutativeRing;
        /// Whether this is a commutative ring without zero divisors.
        is_integral_domain => CtxIsIntegralDomain;
        /// Whether this is a unique factorization domain.
        is_unique_factorization_domain => CtxIsUniqueFactorizationDomain;
        /// Whether this is a field.
        is_field => CtxIsField;
        /// Whether this is a vector space over Q.
        is_rational_vector_space => CtxIsRationalVectorSpace;
        /// Whether this is a vector space over R.
        is_real_vector_space => CtxIsRealVectorSpace;
        /// Whether this is a vector space over C.
        is_complex_vector_space => CtxIsComplexVectorSpace;
        /// Whether elements may be used from several threads.
        is_threadsafe => CtxIsThreadsafe;
    }

    // Element lifecycle.

    /// Creates the canonical empty element of this context.
    #[must_use]
    pub fn init(&self) -> Elem {
        (self.methods.init())(self)
    }

    /// Releases an element.
    pub fn clear(&self, x: Elem) {
        match self.methods.get(Method::Clear) {
            Some(MethodFn::Clear(f)) => f(x, self),
            _ => drop(x),
        }
    }

    /// Exchanges two elements.
    pub fn swap(&self, x: &mut Elem, y: &mut Elem) {
        match self.methods.get(Method::Swap) {
            Some(MethodFn::Swap(f)) => f(x, y, self),
            _ => std::mem::swap(x, y),
        }
    }

    /// Returns a read-only view of `x` that shares its storage.
    #[must_use]
    pub fn set_shallow<'a>(&self, x: &'a Elem) -> Shallow<'a> {
        Shallow(x)
    }

    /// Replaces `res` with a random element, for testing.
    ///
    /// # Errors
    ///
    /// `Unable` if the ring has no random generator.
    pub fn randtest(&self, res: &mut Elem, rng: &mut dyn RngCore) -> GrResult {
        match self.methods.get(Method::Randtest) {
            Some(MethodFn::Randtest(f)) => f(res, rng, self),
            _ => Err(self.unsupported(Method::Randtest)),
        }
    }

    /// Writes a human-readable rendering of `x`.
    ///
    /// # Errors
    ///
    /// `Unable` if writing fails or the ring cannot render elements.
    pub fn write(&self, out: &mut dyn fmt::Write, x: &Elem) -> GrResult {
        match self.methods.get(Method::Write) {
            Some(MethodFn::Write(f)) => f(out, x, self),
            _ => Err(self.unsupported(Method::Write)),
        }
    }

    /// Adapter implementing [`fmt::Display`] for an element of this context.
    #[must_use]
    pub fn display<'a>(&'a self, x: &'a Elem) -> ElemDisplay<'a> {
        ElemDisplay { ctx: self, x }
    }

    // Constants.

    constants! {
        /// Sets `res` to zero.
        zero => Zero;
        /// Sets `res` to one.
        one => One;
        /// Sets `res` to minus one.
        neg_one => NegOne;
        /// Sets `res` to the generator.
        gen => Gen;
        /// Sets `res` to the imaginary unit.
        i => I;
        /// Sets `res` to pi.
        pi => Pi;
    }

    /// Lists the generators of this ring over its immediate base.
    ///
    /// # Errors
    ///
    /// `Unable` if the ring cannot enumerate its generators.
    pub fn gens(&self, res: &mut Vec<Elem>) -> GrResult {
        match self.methods.get(Method::Gens) {
            Some(MethodFn::Gens(f)) => f(res, self),
            _ => Err(self.unsupported(Method::Gens)),
        }
    }

    /// Lists the generators of this ring and of all nested base rings,
    /// innermost first, as elements of this ring.
    ///
    /// # Errors
    ///
    /// `Unable` if the ring cannot enumerate its generators.
    pub fn gens_recursive(&self, res: &mut Vec<Elem>) -> GrResult {
        match self.methods.get(Method::GensRecursive) {
            Some(MethodFn::Gens(f)) => f(res, self),
            _ => Err(self.unsupported(Method::GensRecursive)),
        }
    }

    // Predicates.

    predicates! {
        /// Whether `x` is zero.
        is_zero => IsZero;
        /// Whether `x` is one.
        is_one => IsOne;
        /// Whether `x` is minus one.
        is_neg_one => IsNegOne;
    }

    /// Whether `x` equals `y`.
    #[must_use]
    pub fn equal(&self, x: &Elem, y: &Elem) -> Truth {
        match self.methods.get(Method::Equal) {
            Some(MethodFn::Equal(f)) => f(x, y, self),
            _ => Truth::Unknown,
        }
    }

    // Assignment and conversion.

    unary_ops! {
        /// Copies `x` into `res`.
        set => Set;
        /// Sets `res = -x`.
        neg => Neg;
        /// Sets `res = 1 / x`.
        inv => Inv;
    }

    /// Sets `res` to the image of an unsigned machine integer.
    ///
    /// # Errors
    ///
    /// Returns `Domain` or `Unable` as reported by the implementation.
    pub fn set_u64(&self, res: &mut Elem, c: u64) -> GrResult {
        match self.methods.get(Method::SetU64) {
            Some(MethodFn::SetU64(f)) => f(res, c, self),
            _ => Err(self.unsupported(Method::SetU64)),
        }
    }

    /// Sets `res` to the image of a signed machine integer.
    ///
    /// # Errors
    ///
    /// Returns `Domain` or `Unable` as reported by the implementation.
    pub fn set_i64(&self, res: &mut Elem, c: i64) -> GrResult {
        match self.methods.get(Method::SetI64) {
            Some(MethodFn::SetI64(f)) => f(res, c, self),
            _ => Err(self.unsupported(Method::SetI64)),
        }
    }

    /// Sets `res` to the image of a big integer.
    ///
    /// # Errors
    ///
    /// Returns `Domain` or `Unable` as reported by the implementation.
    pub fn set_integer(&self, res: &mut Elem, c: &IBig) -> GrResult {
        match self.methods.get(Method::SetInteger) {
            Some(MethodFn::SetInteger(f)) => f(res, c, self),
            _ => Err(self.unsupported(Method::SetInteger)),
        }
    }

    /// Sets `res` to the image of a rational number.
    ///
    /// # Errors
    ///
    /// `Domain` if the denominator is not invertible in this ring.
    pub fn set_rational(&self, res: &mut Elem, c: &RBig) -> GrResult {
        match self.methods.get(Method::SetRational) {
            Some(MethodFn::SetRational(f)) => f(res, c, self),
            _ => Err(self.unsupported(Method::SetRational)),
        }
    }

    /// Converts `x`, an element of `x_ctx`, into this context.
    ///
    /// # Errors
    ///
    /// `Domain` if `x` has no image here, `Unable` if the conversion is
    /// not implemented or cannot be decided. On failure `res` is zero.
    pub fn set_other(&self, res: &mut Elem, x: &Elem, x_ctx: &Context) -> GrResult {
        match self.methods.get(Method::SetOther) {
            Some(MethodFn::SetOther(f)) => f(res, x, x_ctx, self),
            _ => Err(self.unsupported(Method::SetOther)),
        }
    }

    /// Parses `s` into `res`.
    ///
    /// # Errors
    ///
    /// `Unable` for malformed input or unknown identifiers; arithmetic
    /// failures propagate.
    pub fn set_str(&self, res: &mut Elem, s: &str) -> GrResult {
        match self.methods.get(Method::SetStr) {
            Some(MethodFn::SetStr(f)) => f(res, s, self),
            _ => Err(self.unsupported(Method::SetStr)),
        }
    }

    binary_ops! {
        /// Builds the interval with midpoint `mid` and radius `rad`.
        set_interval_mid_rad => SetIntervalMidRad;
        /// Sets `res = x + y`.
        add => Add;
        /// Sets `res = x - y`.
        sub => Sub;
        /// Sets `res = x * y`.
        mul => Mul;
        /// Sets `res = x / y` when the quotient exists.
        div => Div;
        /// Sets `res = x / y`, assuming `y` divides `x`.
        divexact => DivExact;
        /// Euclidean quotient.
        euclidean_div => EuclideanDiv;
        /// Euclidean remainder.
        euclidean_rem => EuclideanRem;
        /// Greatest common divisor.
        gcd => Gcd;
    }

    scalar_ops! {
        /// Sets `res = x + c`.
        add_u64 => AddU64, OpU64, u64;
        /// Sets `res = x + c`.
        add_i64 => AddI64, OpI64, i64;
        /// Sets `res = x + c`.
        add_integer => AddInteger, OpInteger, &IBig;
        /// Sets `res = x + c`.
        add_rational => AddRational, OpRational, &RBig;
        /// Sets `res = x - c`.
        sub_u64 => SubU64, OpU64, u64;
        /// Sets `res = x - c`.
        sub_i64 => SubI64, OpI64, i64;
        /// Sets `res = x - c`.
        sub_integer => SubInteger, OpInteger, &IBig;
        /// Sets `res = x - c`.
        sub_rational => SubRational, OpRational, &RBig;
        /// Sets `res = x * c`.
        mul_u64 => MulU64, OpU64, u64;
        /// Sets `res = x * c`.
        mul_i64 => MulI64, OpI64, i64;
        /// Sets `res = x * c`.
        mul_integer => MulInteger, OpInteger, &IBig;
        /// Sets `res = x * c`.
        mul_rational => MulRational, OpRational, &RBig;
        /// Sets `res = x^e`.
        pow_u64 => PowU64, OpU64, u64;
        /// Sets `res = x^e`; negative exponents invert first.
        pow_i64 => PowI64, OpI64, i64;
        /// Sets `res = x^e`.
        pow_integer => PowInteger, OpInteger, &IBig;
    }

    /// Sets `res = x * y` where `y` is an element of `y_ctx`.
    ///
    /// # Errors
    ///
    /// Returns `Domain` or `Unable` as reported by the implementation.
    pub fn mul_other(&self, res: &mut Elem, x: &Elem, y: &Elem, y_ctx: &Context) -> GrResult {
        match self.methods.get(Method::MulOther) {
            Some(MethodFn::MulOther(f)) => f(res, x, y, y_ctx, self),
            _ => Err(self.unsupported(Method::MulOther)),
        }
    }

    /// Sets `res = x * y` where `x` is an element of `x_ctx`.
    ///
    /// # Errors
    ///
    /// Returns `Domain` or `Unable` as reported by the implementation.
    pub fn other_mul(&self, res: &mut Elem, x: &Elem, x_ctx: &Context, y: &Elem) -> GrResult {
        match self.methods.get(Method::OtherMul) {
            Some(MethodFn::OtherMul(f)) => f(res, x, x_ctx, y, self),
            _ => Err(self.unsupported(Method::OtherMul)),
        }
    }

    /// Euclidean division with remainder.
    ///
    /// # Errors
    ///
    /// `Domain` when dividing by zero or when the leading coefficient of the
    /// divisor does not divide.
    pub fn euclidean_divrem(&self, q: &mut Elem, r: &mut Elem, x: &Elem, y: &Elem) -> GrResult {
        match self.methods.get(Method::EuclideanDivRem) {
            Some(MethodFn::DivRem(f)) => f(q, r, x, y, self),
            _ => Err(self.unsupported(Method::EuclideanDivRem)),
        }
    }

    /// Splits `x` as `ux = u * x` with `u` a unit and `ux` canonical.
    ///
    /// # Errors
    ///
    /// `Unable` if the ring has no notion of canonical associates.
    pub fn canonical_associate(&self, ux: &mut Elem, u: &mut Elem, x: &Elem) -> GrResult {
        match self.methods.get(Method::CanonicalAssociate) {
            Some(MethodFn::CanonicalAssociate(f)) => f(ux, u, x, self),
            _ => Err(self.unsupported(Method::CanonicalAssociate)),
        }
    }

    /// Factors `x` into a content or unit `c`, factors and multiplicities.
    ///
    /// # Errors
    ///
    /// `Unable` if no factorization is available for this ring.
    pub fn factor(
        &self,
        c: &mut Elem,
        factors: &mut Vec<Elem>,
        mults: &mut Vec<u64>,
        x: &Elem,
        flags: FactorFlags,
    ) -> GrResult {
        match self.methods.get(Method::Factor) {
            Some(MethodFn::Factor(f)) => f(c, factors, mults, x, flags, self),
            _ => Err(self.unsupported(Method::Factor)),
        }
    }

    /// Factors a polynomial whose coefficients live in this context.
    ///
    /// `pol` and the returned factors are polynomial elements; `c` is an
    /// element of this context.
    ///
    /// # Errors
    ///
    /// `Unable` if this ring provides no polynomial factorization.
    pub fn poly_factor(
        &self,
        c: &mut Elem,
        factors: &mut Vec<Elem>,
        mults: &mut Vec<u64>,
        pol: &Elem,
        flags: FactorFlags,
    ) -> GrResult {
        match self.methods.get(Method::PolyFactor) {
            Some(MethodFn::Factor(f)) => f(c, factors, mults, pol, flags, self),
            _ => Err(self.unsupported(Method::PolyFactor)),
        }
    }

    // Conveniences built on the wrappers above.

    /// Returns a new element equal to `c`.
    ///
    /// # Errors
    ///
    /// As for [`Context::set_i64`].
    pub fn elem_i64(&self, c: i64) -> GrResult<Elem> {
        let mut res = self.init();
        self.set_i64(&mut res, c)?;
        Ok(res)
    }

    /// Returns a new element parsed from `s`.
    ///
    /// # Errors
    ///
    /// As for [`Context::set_str`].
    pub fn parse(&self, s: &str) -> GrResult<Elem> {
        let mut res = self.init();
        self.set_str(&mut res, s)?;
        Ok(res)
    }

    /// Renders `x` to a string.
    ///
    /// # Errors
    ///
    /// As for [`Context::write`].
    pub fn to_string_of(&self, x: &Elem) -> GrResult<String> {
        let mut out = String::new();
        self.write(&mut out, x)?;
        Ok(out)
    }

    /// Like [`Context::set_interval_mid_rad`], with the result replacing the
    /// radius operand.
    ///
    /// The result is built in a scratch element and swapped into place, so
    /// `rad` is never written while it is being read.
    ///
    /// # Errors
    ///
    /// As for [`Context::set_interval_mid_rad`].
    pub fn set_interval_mid_rad_assign(&self, rad: &mut Elem, mid: &Elem) -> GrResult {
        let mut scratch = self.init();
        let status = self.set_interval_mid_rad(&mut scratch, mid, rad);
        self.swap(rad, &mut scratch);
        self.clear(scratch);
        status
    }
}

/// [`fmt::Display`] adapter returned by [`Context::display`].
pub struct ElemDisplay<'a> {
    ctx: &'a Context,
    x: &'a Elem,
}

impl fmt::Display for ElemDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.ctx.write(f, self.x).map_err(|_| fmt::Error)
    }
}
