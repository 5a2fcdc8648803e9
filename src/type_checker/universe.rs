//! Predeclared names: the `int` and `bool` type names, and the builtins each
//! `use`-able library brings into scope.

use crate::Position;

use super::{
    scope::{Object, ObjectKind, Scopes},
    types::{BasicKind, TypeContext, TypeRef},
};

pub const LIBRARIES: [&str; 2] = ["io", "conv"];

/// A scope stack whose root holds the predeclared type names.
pub fn universe(ctx: &TypeContext) -> Scopes {
    let mut scopes = Scopes::new();
    let root = scopes.root();

    for kind in [BasicKind::Bool, BasicKind::Int] {
        scopes.insert(
            root,
            Object::new(
                ObjectKind::TypeName,
                kind.name(),
                Position::null(),
                ctx.basic(kind),
            ),
        );
    }

    scopes
}

/// The builtins declared by `use lib`, or `None` for an unknown library.
pub fn library_builtins(ctx: &TypeContext, lib: &str) -> Option<Vec<Object>> {
    let string = ctx.array(ctx.int());

    let builtins: Vec<(&str, Vec<TypeRef>, Vec<TypeRef>)> = match lib {
        "io" => vec![
            ("print", vec![string.clone()], vec![]),
            ("println", vec![string.clone()], vec![]),
            ("readln", vec![], vec![string]),
            ("getchar", vec![], vec![ctx.int()]),
            ("eof", vec![], vec![ctx.bool()]),
        ],
        "conv" => vec![
            ("parseInt", vec![string.clone()], vec![ctx.int(), ctx.bool()]),
            ("unparseInt", vec![ctx.int()], vec![string]),
        ],
        _ => return None,
    };

    Some(
        builtins
            .into_iter()
            .map(|(name, params, results)| {
                Object::new(
                    ObjectKind::Builtin,
                    name,
                    Position::null(),
                    ctx.signature(params, results),
                )
            })
            .collect(),
    )
}
