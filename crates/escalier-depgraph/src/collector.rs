//! The binding collector (§4.2): a shallow walk of each namespace's
//! top-level declarations that assigns every declaration to one or more
//! binding keys, merging multiply-declared keys (overloads, interfaces).
//!
//! This pass never descends into declaration bodies — that's the dependency
//! visitor's job (§4.4).

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::{debug, span, Level};

use crate::ast::{DeclId, Module, Pattern, TopLevelDecl};
use crate::key::{qualify, BindingKey};
use crate::namespace::NamespaceTable;

/// Most binding keys have exactly one declaration; overloaded `declare fn`
/// groups and merged interfaces are the only multi-declaration case, so a
/// `SmallVec` inline capacity of 1 avoids a heap allocation for the common
/// case.
pub type DeclList = SmallVec<[DeclId; 1]>;

/// Output of the binding collector: the key table plus per-key namespace
/// lookup and the namespace id table built while walking declarations in
/// source order.
#[derive(Debug, Default)]
pub struct KeyTable {
    /// Insertion-ordered (source order) map from key to its declarations.
    /// `all_keys()` on the final graph sorts a snapshot of this map's keys;
    /// this map itself stays insertion-ordered so `decls_of` preserves
    /// source order within a key (§3: "Order preserves source order").
    decls: IndexMap<BindingKey, DeclList>,
    namespace_of: FxHashMap<BindingKey, String>,
}

impl KeyTable {
    pub fn has_key(&self, key: &BindingKey) -> bool {
        self.decls.contains_key(key)
    }

    /// Look up a key by kind + qualified name without allocating a
    /// `BindingKey` unless the lookup succeeds would be nicer, but the key
    /// type owns its name, so a lookup key is built regardless; `IndexMap`
    /// equality is by value, not identity, so this is still one allocation
    /// per candidate tried, matching the resolver's progressive-shortening
    /// cost profile.
    pub fn get(&self, name: &str, kind: crate::key::BindingKind) -> Option<BindingKey> {
        let candidate = BindingKey::key(name, kind);
        self.decls.contains_key(&candidate).then_some(candidate)
    }

    pub fn decls_of(&self, key: &BindingKey) -> &[DeclId] {
        self.decls.get(key).map_or(&[], |v| v.as_slice())
    }

    pub fn namespace_of(&self, key: &BindingKey) -> Option<&str> {
        self.namespace_of.get(key).map(String::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &BindingKey> {
        self.decls.keys()
    }

    fn push(&mut self, key: BindingKey, namespace: &str, decl: DeclId) {
        self.namespace_of
            .entry(key.clone())
            .or_insert_with(|| namespace.to_string());
        self.decls.entry(key).or_default().push(decl);
    }
}

pub struct CollectResult {
    pub keys: KeyTable,
    pub namespaces: NamespaceTable,
}

/// Collect top-level bindings from every namespace in `module`, in source
/// order (§4.2).
pub fn collect(module: &Module) -> CollectResult {
    let _span = span!(Level::DEBUG, "collect").entered();
    let mut keys = KeyTable::default();
    let mut namespaces = NamespaceTable::new();

    for (ns_idx, (namespace, decls)) in module.namespaces.iter().enumerate() {
        namespaces.intern(namespace);
        let ns_idx = u32::try_from(ns_idx).expect("namespace count exceeds u32");
        for (decl_idx, decl) in decls.iter().enumerate() {
            let decl_idx = u32::try_from(decl_idx).expect("declaration count exceeds u32");
            let id = DeclId {
                namespace: ns_idx,
                index: decl_idx,
            };
            collect_decl(&mut keys, namespace, id, decl);
        }
    }

    debug!(key_count = keys.decls.len(), "collected binding keys");
    CollectResult { keys, namespaces }
}

fn collect_decl(keys: &mut KeyTable, namespace: &str, id: DeclId, decl: &TopLevelDecl) {
    match decl {
        TopLevelDecl::Variable(v) => {
            let mut names = Vec::new();
            collect_pattern_idents(&v.pattern, &mut names);
            for name in names {
                let qualified = qualify(namespace, &name);
                keys.push(BindingKey::value_key(qualified), namespace, id);
            }
        }
        TopLevelDecl::Function(f) => {
            let qualified = qualify(namespace, &f.name);
            keys.push(BindingKey::value_key(qualified), namespace, id);
        }
        TopLevelDecl::TypeAlias(t) => {
            let qualified = qualify(namespace, &t.name);
            keys.push(BindingKey::type_key(qualified), namespace, id);
        }
        TopLevelDecl::Interface(i) => {
            let qualified = qualify(namespace, &i.name);
            // Multiple interface declarations with the same key merge here:
            // `push` appends rather than overwriting.
            keys.push(BindingKey::type_key(qualified), namespace, id);
        }
        TopLevelDecl::Enum(e) => {
            let qualified = qualify(namespace, &e.name);
            keys.push(BindingKey::type_key(qualified.clone()), namespace, id);
            keys.push(BindingKey::value_key(qualified), namespace, id);
        }
        TopLevelDecl::Class(c) => {
            let qualified = qualify(namespace, &c.name);
            keys.push(BindingKey::type_key(qualified.clone()), namespace, id);
            keys.push(BindingKey::value_key(qualified), namespace, id);
        }
    }
}

/// Recursively collect every identifier bound by a pattern. Patterns may
/// nest arbitrarily (tuple-of-object-of-tuple, rest elements), so this
/// fully traverses the pattern even though the collector never descends
/// into declaration *bodies*.
fn collect_pattern_idents(pattern: &Pattern, out: &mut Vec<String>) {
    match pattern {
        Pattern::Ident(_, name) => out.push(name.clone()),
        Pattern::Tuple(elements) => {
            for el in elements {
                collect_pattern_idents(el, out);
            }
        }
        Pattern::Object(props) => {
            for prop in props {
                collect_pattern_idents(&prop.value, out);
            }
        }
        Pattern::Rest(inner) => collect_pattern_idents(inner, out),
    }
}
