//! Ring contexts.
//!
//! A [`Context`] is a small value describing one algebraic structure: which
//! kind it is, how large its elements are, an optional size limit, and the
//! method table of its kind. Composite contexts (polynomial rings) also hold
//! the context of their base ring, so contexts nest to arbitrary depth.

use std::fmt;
use std::sync::Arc;

use crate::methods::MethodTable;

/// Structural family of a context.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RingKind {
    /// The integers Z.
    Integers,
    /// The rationals Q.
    Rationals,
    /// Integers modulo n.
    IntegersMod,
    /// Real balls with rational midpoint and radius.
    Balls,
    /// Dense univariate polynomials over a base ring.
    Polynomial,
}

/// Kind-specific parameters of a context.
#[derive(Clone, Debug)]
pub(crate) enum ContextData {
    Leaf,
    Modulus(u64),
    Polynomial(PolyData),
}

/// Parameters of a polynomial ring.
#[derive(Clone, Debug)]
pub(crate) struct PolyData {
    pub(crate) base: Arc<Context>,
    pub(crate) var: String,
}

/// Description of one algebraic structure.
///
/// Contexts are cheap to clone; clones share the base ring and the method
/// table.
#[derive(Clone)]
pub struct Context {
    kind: RingKind,
    elem_size: usize,
    size_limit: Option<usize>,
    pub(crate) methods: &'static MethodTable,
    pub(crate) data: ContextData,
}

impl Context {
    pub(crate) fn from_parts(
        kind: RingKind,
        elem_size: usize,
        methods: &'static MethodTable,
        data: ContextData,
    ) -> Self {
        debug_assert_eq!(kind, methods.kind());
        Self {
            kind,
            elem_size,
            size_limit: None,
            methods,
            data,
        }
    }

    /// The structural family of this context.
    #[must_use]
    pub fn kind(&self) -> RingKind {
        self.kind
    }

    /// In-memory size of the payload produced by [`Context::init`].
    #[must_use]
    pub fn elem_size(&self) -> usize {
        self.elem_size
    }

    /// The size limit; for polynomial rings this bounds the length of
    /// products. `None` means unbounded.
    #[must_use]
    pub fn size_limit(&self) -> Option<usize> {
        self.size_limit
    }

    /// Sets or removes the size limit.
    pub fn set_size_limit(&mut self, limit: Option<usize>) {
        self.size_limit = limit;
    }

    /// The method table shared by all contexts of this kind.
    #[must_use]
    pub fn methods(&self) -> &'static MethodTable {
        self.methods
    }

    /// The modulus of a `Z/nZ` context.
    #[must_use]
    pub fn modulus(&self) -> Option<u64> {
        match &self.data {
            ContextData::Modulus(n) => Some(*n),
            _ => None,
        }
    }

    /// The base ring of a polynomial ring.
    #[must_use]
    pub fn base_ring(&self) -> Option<&Arc<Context>> {
        match &self.data {
            ContextData::Polynomial(data) => Some(&data.base),
            _ => None,
        }
    }

    /// The generator name of a polynomial ring.
    #[must_use]
    pub fn var(&self) -> Option<&str> {
        match &self.data {
            ContextData::Polynomial(data) => Some(&data.var),
            _ => None,
        }
    }

    /// Names of the generators returned by `gens_recursive`, innermost
    /// ring first.
    #[must_use]
    pub fn generator_names(&self) -> Vec<String> {
        match &self.data {
            ContextData::Polynomial(data) => {
                let mut names = data.base.generator_names();
                names.push(data.var.clone());
                names
            }
            _ => Vec::new(),
        }
    }

    pub(crate) fn poly_data(&self) -> Option<&PolyData> {
        match &self.data {
            ContextData::Polynomial(data) => Some(data),
            _ => None,
        }
    }

    pub(crate) fn poly_data_mut(&mut self) -> Option<&mut PolyData> {
        match &mut self.data {
            ContextData::Polynomial(data) => Some(data),
            _ => None,
        }
    }
}

impl PartialEq for Context {
    /// Structural equality: same kind and same parameters. Size limits do
    /// not change the ring and are ignored.
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        if self.kind != other.kind {
            return false;
        }
        match (&self.data, &other.data) {
            (ContextData::Leaf, ContextData::Leaf) => true,
            (ContextData::Modulus(a), ContextData::Modulus(b)) => a == b,
            (ContextData::Polynomial(a), ContextData::Polynomial(b)) => {
                a.var == b.var && (Arc::ptr_eq(&a.base, &b.base) || a.base == b.base)
            }
            _ => false,
        }
    }
}

impl Eq for Context {}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.methods.get(crate::methods::Method::CtxWrite) {
            Some(crate::methods::MethodFn::CtxWrite(write)) => write(self, f),
            _ => write!(f, "{:?}", self.kind),
        }
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("kind", &self.kind)
            .field("description", &self.to_string())
            .field("size_limit", &self.size_limit)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_equality() {
        let zz = Arc::new(Context::integers());
        let a = Context::polynomial(Arc::clone(&zz));
        let b = Context::polynomial(Arc::new(Context::integers()));
        assert_eq!(a, b);

        let mut c = Context::polynomial(zz);
        c.set_gen_name("y").unwrap();
        assert_ne!(a, c);

        assert_ne!(Context::integers_mod(5), Context::integers_mod(7));
        assert_eq!(Context::integers_mod(5), Context::integers_mod(5));
        assert_ne!(Context::integers(), Context::rationals());
    }

    #[test]
    fn test_size_limit_ignored_by_equality() {
        let qq = Arc::new(Context::rationals());
        let a = Context::polynomial(Arc::clone(&qq));
        let mut b = Context::polynomial(qq);
        b.set_size_limit(Some(10));
        assert_eq!(a, b);
        assert_eq!(b.size_limit(), Some(10));
    }

    #[test]
    fn test_generator_names_nest() {
        let qq = Arc::new(Context::rationals());
        let mut inner = Context::polynomial(qq);
        inner.set_gen_name("y").unwrap();
        let outer = Context::polynomial(Arc::new(inner));
        assert_eq!(outer.generator_names(), vec!["y".to_string(), "x".to_string()]);
        assert_eq!(outer.var(), Some("x"));
        assert!(Context::integers().generator_names().is_empty());
    }
}
