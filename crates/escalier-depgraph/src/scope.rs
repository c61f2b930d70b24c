//! The lexical scope stack shared by the dependency visitor (§4.4) and the
//! usage classifier (§4.6).
//!
//! A scope holds two independent name sets — value bindings and type
//! bindings — so a generic's type parameter can shadow a value of the same
//! name (and vice versa) without cross-talk. Push/pop mirrors AST nesting;
//! there is no global mutable state.

use crate::key::BindingKind;
use rustc_hash::FxHashSet;

#[derive(Debug, Default)]
struct Scope {
    values: FxHashSet<String>,
    types: FxHashSet<String>,
}

#[derive(Debug, Default)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self { scopes: Vec::new() }
    }

    pub fn push(&mut self) {
        self.scopes.push(Scope::default());
    }

    pub fn pop(&mut self) {
        self.scopes.pop();
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Bind `name` of the given kind in the *current* (innermost) scope.
    ///
    /// # Panics
    ///
    /// Panics if called with no scope pushed; every binder site pushes a
    /// scope before declaring into it.
    pub fn bind(&mut self, name: &str, kind: BindingKind) {
        let scope = self
            .scopes
            .last_mut()
            .expect("bind called with no active scope");
        match kind {
            BindingKind::Value => scope.values.insert(name.to_string()),
            BindingKind::Type => scope.types.insert(name.to_string()),
        };
    }

    /// Whether `name` is bound locally (in any scope on the stack) as the
    /// given kind. This is the shadowing check the resolver consults before
    /// trying the key table (§4.3 step 1).
    pub fn is_bound(&self, name: &str, kind: BindingKind) -> bool {
        self.scopes.iter().any(|scope| match kind {
            BindingKind::Value => scope.values.contains(name),
            BindingKind::Type => scope.types.contains(name),
        })
    }
}
