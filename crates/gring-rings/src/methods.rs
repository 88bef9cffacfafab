//! Method identifiers and per-kind method tables.
//!
//! Every ring kind owns one [`MethodTable`], built lazily the first time a
//! context of that kind is created and shared by every context of the kind
//! afterwards. A table is assembled from the generic defaults followed by the
//! kind's own `(Method, MethodFn)` list, so later entries override earlier
//! ones. Identifiers that end up without an entry dispatch to "unable".
//!
//! The calling convention of each identifier is fixed: result slot(s) first,
//! then inputs, then the context. Entries whose convention does not match
//! their identifier are rejected when the table is built.

use std::fmt;

use dashu::integer::IBig;
use dashu::rational::RBig;
use rand::RngCore;

use crate::context::{Context, RingKind};
use crate::elem::Elem;
use crate::generic;
use crate::status::GrResult;
use crate::truth::Truth;

/// Identifier of an abstract ring operation.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Method {
    // Context-level operations.
    CtxWrite,
    CtxIsRing,
    CtxIsCommutativeRing,
    CtxIsIntegralDomain,
    CtxIsUniqueFactorizationDomain,
    CtxIsField,
    CtxIsRationalVectorSpace,
    CtxIsRealVectorSpace,
    CtxIsComplexVectorSpace,
    CtxIsThreadsafe,
    CtxSetGenName,
    CtxSetGenNames,

    // Element lifecycle and I/O.
    Clear,
    Swap,
    Randtest,
    Write,

    // Constants and generators.
    Zero,
    One,
    NegOne,
    Gen,
    Gens,
    GensRecursive,
    I,
    Pi,

    // Predicates.
    IsZero,
    IsOne,
    IsNegOne,
    Equal,

    // Assignment and conversion.
    Set,
    SetU64,
    SetI64,
    SetInteger,
    SetRational,
    SetOther,
    SetIntervalMidRad,
    SetStr,

    // Arithmetic.
    Neg,
    Add,
    AddU64,
    AddI64,
    AddInteger,
    AddRational,
    Sub,
    SubU64,
    SubI64,
    SubInteger,
    SubRational,
    Mul,
    MulOther,
    OtherMul,
    MulU64,
    MulI64,
    MulInteger,
    MulRational,
    PowU64,
    PowI64,
    PowInteger,
    Div,
    DivExact,
    Inv,
    EuclideanDiv,
    EuclideanRem,
    EuclideanDivRem,
    Gcd,
    CanonicalAssociate,

    // Factorization.
    Factor,
    PolyFactor,
}

impl Method {
    /// Number of method identifiers.
    pub const COUNT: usize = Self::PolyFactor as usize + 1;

    /// The calling convention an entry for this identifier must use.
    #[must_use]
    pub fn convention(self) -> Convention {
        use Convention as C;
        match self {
            Self::CtxWrite => C::CtxWrite,
            Self::CtxIsRing
            | Self::CtxIsCommutativeRing
            | Self::CtxIsIntegralDomain
            | Self::CtxIsUniqueFactorizationDomain
            | Self::CtxIsField
            | Self::CtxIsRationalVectorSpace
            | Self::CtxIsRealVectorSpace
            | Self::CtxIsComplexVectorSpace
            | Self::CtxIsThreadsafe => C::CtxPredicate,
            Self::CtxSetGenName => C::CtxSetGenName,
            Self::CtxSetGenNames => C::CtxSetGenNames,
            Self::Clear => C::Clear,
            Self::Swap => C::Swap,
            Self::Randtest => C::Randtest,
            Self::Write => C::Write,
            Self::Zero | Self::One | Self::NegOne | Self::Gen | Self::I | Self::Pi => C::Constant,
            Self::Gens | Self::GensRecursive => C::Gens,
            Self::IsZero | Self::IsOne | Self::IsNegOne => C::Predicate,
            Self::Equal => C::Equal,
            Self::Set | Self::Neg | Self::Inv => C::Unary,
            Self::SetU64 => C::SetU64,
            Self::SetI64 => C::SetI64,
            Self::SetInteger => C::SetInteger,
            Self::SetRational => C::SetRational,
            Self::SetOther => C::SetOther,
            Self::SetStr => C::SetStr,
            Self::SetIntervalMidRad
            | Self::Add
            | Self::Sub
            | Self::Mul
            | Self::Div
            | Self::DivExact
            | Self::EuclideanDiv
            | Self::EuclideanRem
            | Self::Gcd => C::Binary,
            Self::AddU64 | Self::SubU64 | Self::MulU64 | Self::PowU64 => C::OpU64,
            Self::AddI64 | Self::SubI64 | Self::MulI64 | Self::PowI64 => C::OpI64,
            Self::AddInteger | Self::SubInteger | Self::MulInteger | Self::PowInteger => {
                C::OpInteger
            }
            Self::AddRational | Self::SubRational | Self::MulRational => C::OpRational,
            Self::MulOther => C::MulOther,
            Self::OtherMul => C::OtherMul,
            Self::EuclideanDivRem => C::DivRem,
            Self::CanonicalAssociate => C::CanonicalAssociate,
            Self::Factor | Self::PolyFactor => C::Factor,
        }
    }
}

/// Opaque behavioural flags passed through to factorization backends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FactorFlags(u32);

impl FactorFlags {
    /// No flags.
    pub const NONE: Self = Self(0);

    /// Creates flags from raw bits.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }
}

/// Element constructor; every kind provides one.
pub type InitFn = fn(&Context) -> Elem;
/// Writes a description of the context.
pub type CtxWriteFn = fn(&Context, &mut fmt::Formatter<'_>) -> fmt::Result;
/// Structural property of the context.
pub type CtxPredicateFn = fn(&Context) -> Truth;
/// Renames the generator.
pub type CtxSetGenNameFn = fn(&mut Context, &str) -> GrResult;
/// Renames several generators.
pub type CtxSetGenNamesFn = fn(&mut Context, &[&str]) -> GrResult;
/// Releases an element.
pub type ClearFn = fn(Elem, &Context);
/// Exchanges two elements.
pub type SwapFn = fn(&mut Elem, &mut Elem, &Context);
/// Produces a random element.
pub type RandtestFn = fn(&mut Elem, &mut dyn RngCore, &Context) -> GrResult;
/// Renders an element.
pub type WriteFn = fn(&mut dyn fmt::Write, &Elem, &Context) -> GrResult;
/// Sets a distinguished constant.
pub type ConstantFn = fn(&mut Elem, &Context) -> GrResult;
/// Lists generators.
pub type GensFn = fn(&mut Vec<Elem>, &Context) -> GrResult;
/// Unary predicate.
pub type PredicateFn = fn(&Elem, &Context) -> Truth;
/// Equality predicate.
pub type EqualFn = fn(&Elem, &Elem, &Context) -> Truth;
/// `res = f(x)`.
pub type UnaryFn = fn(&mut Elem, &Elem, &Context) -> GrResult;
/// `res = f(x, y)`.
pub type BinaryFn = fn(&mut Elem, &Elem, &Elem, &Context) -> GrResult;
/// `(q, r) = f(x, y)`.
pub type DivRemFn = fn(&mut Elem, &mut Elem, &Elem, &Elem, &Context) -> GrResult;
/// `res = c` for a machine word.
pub type SetU64Fn = fn(&mut Elem, u64, &Context) -> GrResult;
/// `res = c` for a signed machine word.
pub type SetI64Fn = fn(&mut Elem, i64, &Context) -> GrResult;
/// `res = c` for a big integer.
pub type SetIntegerFn = fn(&mut Elem, &IBig, &Context) -> GrResult;
/// `res = c` for a rational.
pub type SetRationalFn = fn(&mut Elem, &RBig, &Context) -> GrResult;
/// `res = x` where `x` lives in another context (`x_ctx`, then `ctx`).
pub type SetOtherFn = fn(&mut Elem, &Elem, &Context, &Context) -> GrResult;
/// Parses an element.
pub type SetStrFn = fn(&mut Elem, &str, &Context) -> GrResult;
/// `res = f(x, c)` for a machine word.
pub type OpU64Fn = fn(&mut Elem, &Elem, u64, &Context) -> GrResult;
/// `res = f(x, c)` for a signed machine word.
pub type OpI64Fn = fn(&mut Elem, &Elem, i64, &Context) -> GrResult;
/// `res = f(x, c)` for a big integer.
pub type OpIntegerFn = fn(&mut Elem, &Elem, &IBig, &Context) -> GrResult;
/// `res = f(x, c)` for a rational.
pub type OpRationalFn = fn(&mut Elem, &Elem, &RBig, &Context) -> GrResult;
/// `res = x * y` where `y` lives in `y_ctx`.
pub type MulOtherFn = fn(&mut Elem, &Elem, &Elem, &Context, &Context) -> GrResult;
/// `res = x * y` where `x` lives in `x_ctx`.
pub type OtherMulFn = fn(&mut Elem, &Elem, &Context, &Elem, &Context) -> GrResult;
/// `(ux, u)` with `u` a unit and `ux = u * x` canonical.
pub type CanonicalAssociateFn = fn(&mut Elem, &mut Elem, &Elem, &Context) -> GrResult;
/// `(content, factors, multiplicities) = factor(x, flags)`.
pub type FactorFn =
    fn(&mut Elem, &mut Vec<Elem>, &mut Vec<u64>, &Elem, FactorFlags, &Context) -> GrResult;

/// Calling convention of a method-table entry.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Convention {
    CtxWrite,
    CtxPredicate,
    CtxSetGenName,
    CtxSetGenNames,
    Clear,
    Swap,
    Randtest,
    Write,
    Constant,
    Gens,
    Predicate,
    Equal,
    Unary,
    Binary,
    DivRem,
    SetU64,
    SetI64,
    SetInteger,
    SetRational,
    SetOther,
    SetStr,
    OpU64,
    OpI64,
    OpInteger,
    OpRational,
    MulOther,
    OtherMul,
    CanonicalAssociate,
    Factor,
}

/// A concrete implementation stored in a method table.
#[allow(missing_docs)]
#[derive(Clone, Copy)]
pub enum MethodFn {
    CtxWrite(CtxWriteFn),
    CtxPredicate(CtxPredicateFn),
    CtxSetGenName(CtxSetGenNameFn),
    CtxSetGenNames(CtxSetGenNamesFn),
    Clear(ClearFn),
    Swap(SwapFn),
    Randtest(RandtestFn),
    Write(WriteFn),
    Constant(ConstantFn),
    Gens(GensFn),
    Predicate(PredicateFn),
    Equal(EqualFn),
    Unary(UnaryFn),
    Binary(BinaryFn),
    DivRem(DivRemFn),
    SetU64(SetU64Fn),
    SetI64(SetI64Fn),
    SetInteger(SetIntegerFn),
    SetRational(SetRationalFn),
    SetOther(SetOtherFn),
    SetStr(SetStrFn),
    OpU64(OpU64Fn),
    OpI64(OpI64Fn),
    OpInteger(OpIntegerFn),
    OpRational(OpRationalFn),
    MulOther(MulOtherFn),
    OtherMul(OtherMulFn),
    CanonicalAssociate(CanonicalAssociateFn),
    Factor(FactorFn),
}

impl MethodFn {
    /// The calling convention of this entry.
    #[must_use]
    pub fn convention(&self) -> Convention {
        use Convention as C;
        match self {
            Self::CtxWrite(_) => C::CtxWrite,
            Self::CtxPredicate(_) => C::CtxPredicate,
            Self::CtxSetGenName(_) => C::CtxSetGenName,
            Self::CtxSetGenNames(_) => C::CtxSetGenNames,
            Self::Clear(_) => C::Clear,
            Self::Swap(_) => C::Swap,
            Self::Randtest(_) => C::Randtest,
            Self::Write(_) => C::Write,
            Self::Constant(_) => C::Constant,
            Self::Gens(_) => C::Gens,
            Self::Predicate(_) => C::Predicate,
            Self::Equal(_) => C::Equal,
            Self::Unary(_) => C::Unary,
            Self::Binary(_) => C::Binary,
            Self::DivRem(_) => C::DivRem,
            Self::SetU64(_) => C::SetU64,
            Self::SetI64(_) => C::SetI64,
            Self::SetInteger(_) => C::SetInteger,
            Self::SetRational(_) => C::SetRational,
            Self::SetOther(_) => C::SetOther,
            Self::SetStr(_) => C::SetStr,
            Self::OpU64(_) => C::OpU64,
            Self::OpI64(_) => C::OpI64,
            Self::OpInteger(_) => C::OpInteger,
            Self::OpRational(_) => C::OpRational,
            Self::MulOther(_) => C::MulOther,
            Self::OtherMul(_) => C::OtherMul,
            Self::CanonicalAssociate(_) => C::CanonicalAssociate,
            Self::Factor(_) => C::Factor,
        }
    }
}

/// The method table shared by every context of one kind.
pub struct MethodTable {
    kind: RingKind,
    init: InitFn,
    entries: [Option<MethodFn>; Method::COUNT],
}

impl MethodTable {
    /// Builds a table from the generic defaults and the kind's own entries.
    ///
    /// Entries later in `input` override earlier ones and the defaults.
    #[must_use]
    pub fn build(kind: RingKind, init: InitFn, input: &[(Method, MethodFn)]) -> Self {
        let mut entries = [None; Method::COUNT];

        for &(method, f) in generic::DEFAULT_METHODS.iter().chain(input) {
            if f.convention() == method.convention() {
                entries[method as usize] = Some(f);
            } else {
                log::warn!(
                    "{kind:?}: rejecting {method:?} entry with convention {:?}, expected {:?}",
                    f.convention(),
                    method.convention()
                );
            }
        }

        let table = Self {
            kind,
            init,
            entries,
        };
        log::debug!(
            "built {kind:?} method table with {} of {} entries",
            table.len(),
            Method::COUNT
        );
        table
    }

    /// The kind this table serves.
    #[must_use]
    pub fn kind(&self) -> RingKind {
        self.kind
    }

    /// The element constructor.
    #[must_use]
    pub fn init(&self) -> InitFn {
        self.init
    }

    /// Looks up an entry.
    #[must_use]
    pub fn get(&self, method: Method) -> Option<MethodFn> {
        self.entries[method as usize]
    }

    /// Returns true if `method` has an entry.
    #[must_use]
    pub fn implements(&self, method: Method) -> bool {
        self.entries[method as usize].is_some()
    }

    /// Number of populated entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    /// Returns true if no entry is populated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for MethodTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodTable")
            .field("kind", &self.kind)
            .field("entries", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::GrError;

    fn init_integer(_: &Context) -> Elem {
        Elem::Integer(IBig::ZERO)
    }

    fn always_false(_: &Context) -> Truth {
        Truth::False
    }

    fn broken_neg(_: &mut Elem, _: &Context) -> GrResult {
        Err(GrError::Domain)
    }

    #[test]
    fn test_count_covers_all_identifiers() {
        assert_eq!(Method::Factor as usize + 1, Method::PolyFactor as usize);
        assert_eq!(Method::COUNT, Method::PolyFactor as usize + 1);
    }

    #[test]
    fn test_override_and_reject() {
        let table = MethodTable::build(
            RingKind::Integers,
            init_integer,
            &[
                (Method::CtxIsField, MethodFn::CtxPredicate(always_false)),
                // Wrong convention: `Neg` is unary.
                (Method::Neg, MethodFn::Constant(broken_neg)),
            ],
        );

        assert_eq!(table.kind(), RingKind::Integers);
        assert!(table.implements(Method::CtxIsField));
        assert!(!table.implements(Method::Neg));
        assert!(!table.implements(Method::Gen));
        // Generic defaults are present.
        assert!(table.implements(Method::PowU64));
        assert!(table.implements(Method::SetStr));
    }
}
