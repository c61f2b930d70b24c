//! Binding kind and binding key: the vertex identity of the dependency graph.

/// Whether a binding is a runtime (`Value`) binding or a compile-time-only
/// (`Type`) binding. Classes and enums produce one of each, sharing a single
/// declaration list.
///
/// `Value` sorts before `Type`: the ordering has no semantic meaning beyond
/// giving [`BindingKey`] a total, deterministic order (the compiler's
/// determinism contract only requires *some* fixed order, not this one).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BindingKind {
    Value,
    Type,
}

/// The unique vertex identity in the dependency graph: a kind tag paired
/// with a fully qualified, dotted name. Two keys are equal iff both fields
/// are equal, so the same name can exist as both a value and a type binding
/// (classes, enums) without collision.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingKey {
    pub kind: BindingKind,
    pub qualified_name: String,
}

impl BindingKey {
    pub fn key(name: impl Into<String>, kind: BindingKind) -> Self {
        Self {
            kind,
            qualified_name: name.into(),
        }
    }

    pub fn value_key(name: impl Into<String>) -> Self {
        Self::key(name, BindingKind::Value)
    }

    pub fn type_key(name: impl Into<String>) -> Self {
        Self::key(name, BindingKind::Type)
    }

    pub fn is_value(&self) -> bool {
        self.kind == BindingKind::Value
    }

    pub fn is_type(&self) -> bool {
        self.kind == BindingKind::Type
    }
}

/// Qualify a simple name against the current namespace, per the collector's
/// qualification rule (§4.2): `N + "." + x` when `N` is non-empty, else `x`.
pub fn qualify(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{namespace}.{name}")
    }
}
