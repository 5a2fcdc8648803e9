//! Objects and the scope stack.
//!
//! Scopes follow the checker's block structure: [`Scopes::open`] pushes a new
//! scope whose parent is the innermost one and [`Scopes::close`] pops it,
//! dropping its bindings. The root scope is never popped.

use std::collections::HashMap;

use tracing::trace;

use crate::Position;

use super::types::TypeRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Var,
    Func,
    TypeName,
    Builtin,
}

/// A named entity bound in a scope.
#[derive(Debug, Clone)]
pub struct Object {
    pub kind: ObjectKind,
    pub name: String,
    pub position: Position,
    pub ty: TypeRef,
    parent: Option<ScopeId>,
}

impl Object {
    pub fn new(kind: ObjectKind, name: &str, position: Position, ty: TypeRef) -> Self {
        Object {
            kind,
            name: name.to_string(),
            position,
            ty,
            parent: None,
        }
    }

    /// The scope that first bound this object.
    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    pub fn is_callable(&self) -> bool {
        matches!(self.kind, ObjectKind::Func | ObjectKind::Builtin)
    }
}

#[derive(Debug, Default)]
pub struct Scope {
    parent: Option<ScopeId>,
    elems: HashMap<String, Object>,
}

impl Scope {
    pub fn len(&self) -> usize {
        self.elems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }
}

#[derive(Debug)]
pub struct Scopes {
    stack: Vec<Scope>,
}

impl Default for Scopes {
    fn default() -> Self {
        Self::new()
    }
}

impl Scopes {
    /// A stack holding only the empty root scope.
    pub fn new() -> Self {
        Scopes {
            stack: vec![Scope::default()],
        }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    /// The innermost open scope.
    pub fn current(&self) -> ScopeId {
        ScopeId(self.stack.len() - 1)
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn get(&self, scope: ScopeId) -> Option<&Scope> {
        self.stack.get(scope.0)
    }

    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.get(scope).and_then(|scope| scope.parent)
    }

    /// Opens a child of the current scope and makes it current.
    pub fn open(&mut self) -> ScopeId {
        let parent = self.current();
        self.stack.push(Scope {
            parent: Some(parent),
            elems: HashMap::new(),
        });
        trace!(depth = self.stack.len(), "open scope");
        self.current()
    }

    /// Closes the current scope and returns its parent, which becomes
    /// current. Returns `None` for the root.
    pub fn close(&mut self) -> Option<ScopeId> {
        if self.stack.len() == 1 {
            return None;
        }

        let closed = self.stack.pop()?;
        trace!(depth = self.stack.len(), bindings = closed.len(), "close scope");
        closed.parent
    }

    /// Binds `object` in `scope`. Returns false and changes nothing if the
    /// name is already bound in that same scope.
    pub fn insert(&mut self, scope: ScopeId, mut object: Object) -> bool {
        let Some(target) = self.stack.get_mut(scope.0) else {
            return false;
        };
        if target.elems.contains_key(&object.name) {
            return false;
        }

        if object.parent.is_none() {
            object.parent = Some(scope);
        }
        target.elems.insert(object.name.clone(), object);
        true
    }

    /// Looks `name` up in `scope` only.
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<&Object> {
        self.get(scope).and_then(|scope| scope.elems.get(name))
    }

    /// Looks `name` up from `scope` outwards and returns the nearest binding.
    pub fn lookup_chain(&self, scope: ScopeId, name: &str) -> Option<&Object> {
        let mut current = Some(scope);
        while let Some(id) = current {
            if let Some(object) = self.lookup(id, name) {
                return Some(object);
            }
            current = self.parent(id);
        }
        None
    }

    /// Like [`Scopes::lookup_chain`], but skips bindings declared after
    /// `position`. Returns the scope the binding was found in as well.
    pub fn lookup_chain_at(
        &self,
        scope: ScopeId,
        name: &str,
        position: Position,
    ) -> Option<(ScopeId, &Object)> {
        let mut current = Some(scope);
        while let Some(id) = current {
            if let Some(object) = self.lookup(id, name).filter(|obj| obj.position <= position) {
                return Some((id, object));
            }
            current = self.parent(id);
        }
        None
    }
}
