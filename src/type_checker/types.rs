//! Semantic types.
//!
//! Equality is structural and decided by [`Type::hash`]: `bool` is 0, `int`
//! is 1 and an array is 2 plus the hash of its element. Tuples and
//! signatures have no hash and never compare equal.
//!
//! Array types over a primitive element are interned in the owning
//! [`TypeContext`], so building the same shape twice yields the same `Rc`.

use std::{cell::RefCell, collections::HashMap, fmt::Display, rc::Rc};

pub type TypeRef = Rc<Type>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasicKind {
    Bool,
    Int,
}

impl BasicKind {
    pub fn name(&self) -> &'static str {
        match self {
            BasicKind::Bool => "bool",
            BasicKind::Int => "int",
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum Type {
    Basic(BasicKind),
    Array(TypeRef),
    Tuple(Vec<TypeRef>),
    Signature {
        params: Vec<TypeRef>,
        results: Vec<TypeRef>,
    },
}

impl Type {
    /// Structural hash. `None` for tuples and signatures.
    pub fn hash(&self) -> Option<i64> {
        match self {
            Type::Basic(BasicKind::Bool) => Some(0),
            Type::Basic(BasicKind::Int) => Some(1),
            Type::Array(element) => element.hash().map(|hash| hash + 2),
            Type::Tuple(_) | Type::Signature { .. } => None,
        }
    }

    pub fn is_int(&self) -> bool {
        matches!(self, Type::Basic(BasicKind::Int))
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Type::Basic(BasicKind::Bool))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array(_))
    }

    pub fn is_tuple(&self) -> bool {
        matches!(self, Type::Tuple(_))
    }

    /// Number of array levels, 0 for anything that is not an array.
    pub fn dimensions(&self) -> usize {
        match self {
            Type::Array(element) => 1 + element.dimensions(),
            _ => 0,
        }
    }

    /// Element type of an array.
    pub fn element(&self) -> Option<&TypeRef> {
        match self {
            Type::Array(element) => Some(element),
            _ => None,
        }
    }
}

fn write_list(f: &mut std::fmt::Formatter<'_>, types: &[TypeRef]) -> std::fmt::Result {
    write!(f, "(")?;
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            write!(f, ",")?;
        }
        write!(f, "{}", ty)?;
    }
    write!(f, ")")
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Basic(kind) => write!(f, "{}", kind.name()),
            Type::Array(element) => write!(f, "{}[]", element),
            Type::Tuple(types) => write_list(f, types),
            Type::Signature { params, results } => {
                write!(f, "function ")?;
                write_list(f, params)?;
                write!(f, " ")?;
                write_list(f, results)
            }
        }
    }
}

/// Structural equality. Always false if either side has no hash.
pub fn type_equal(a: &Type, b: &Type) -> bool {
    match (a.hash(), b.hash()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Owns the primitive singletons and the array intern cache for one checker.
#[derive(Debug)]
pub struct TypeContext {
    bool_type: TypeRef,
    int_type: TypeRef,
    array_cache: RefCell<HashMap<i64, TypeRef>>,
}

impl Default for TypeContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeContext {
    pub fn new() -> Self {
        TypeContext {
            bool_type: Rc::new(Type::Basic(BasicKind::Bool)),
            int_type: Rc::new(Type::Basic(BasicKind::Int)),
            array_cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn bool(&self) -> TypeRef {
        Rc::clone(&self.bool_type)
    }

    pub fn int(&self) -> TypeRef {
        Rc::clone(&self.int_type)
    }

    pub fn basic(&self, kind: BasicKind) -> TypeRef {
        match kind {
            BasicKind::Bool => self.bool(),
            BasicKind::Int => self.int(),
        }
    }

    /// `element[]`, interned when `element` is built from primitives.
    pub fn array(&self, element: TypeRef) -> TypeRef {
        let Some(hash) = element.hash().map(|hash| hash + 2) else {
            return Rc::new(Type::Array(element));
        };

        let mut cache = self.array_cache.borrow_mut();
        let ty = cache
            .entry(hash)
            .or_insert_with(|| Rc::new(Type::Array(element)));
        Rc::clone(ty)
    }

    /// An array of `kind` with `1 + extra_dimensions` dimensions.
    pub fn array_of(&self, kind: BasicKind, extra_dimensions: usize) -> TypeRef {
        let mut ty = self.array(self.basic(kind));
        for _ in 0..extra_dimensions {
            ty = self.array(ty);
        }
        ty
    }

    pub fn tuple(&self, types: Vec<TypeRef>) -> TypeRef {
        Rc::new(Type::Tuple(types))
    }

    pub fn signature(&self, params: Vec<TypeRef>, results: Vec<TypeRef>) -> TypeRef {
        Rc::new(Type::Signature { params, results })
    }

    /// Number of distinct array shapes interned so far.
    pub fn cached_arrays(&self) -> usize {
        self.array_cache.borrow().len()
    }
}
