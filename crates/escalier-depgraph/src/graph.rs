//! Graph assembly (§4.5) and the public API surface (§4.9) consumed by the
//! type checker and code generator.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, span, Level};

use crate::ast::{DeclId, Module, NodeId};
use crate::collector::{self, KeyTable};
use crate::cycle::{self, CycleDiagnostic};
use crate::key::BindingKey;
use crate::namespace::{NamespaceId, NamespaceTable};
use crate::options::GraphOptions;
use crate::resolver::Stamp;
use crate::scc;
use crate::usage::{self, UsedOutsideFunctionBody};
use crate::visitor;

/// The fully assembled, immutable dependency graph for one module. Built
/// once by [`build_graph`]; every query method is a read-only lookup, per
/// the lifecycle contract in §3 ("no component mutates the graph during the
/// downstream passes").
pub struct DependencyGraph {
    module: Module,
    keys: KeyTable,
    namespaces: NamespaceTable,
    /// Deterministic (key-ordered) snapshot of every key, computed once at
    /// build time so `all_keys()` doesn't re-sort on every call.
    sorted_keys: Vec<BindingKey>,
    edges: FxHashMap<BindingKey, FxHashSet<BindingKey>>,
    used_outside_function_body: UsedOutsideFunctionBody,
    illegal_cycles: Vec<CycleDiagnostic>,
    /// Namespace ids stamped onto resolved identifier nodes (§4.3, §6): the
    /// only mutation the core performs on the AST, realized as a side table
    /// rather than in-place tree mutation.
    stamps: FxHashMap<NodeId, NamespaceId>,
}

impl DependencyGraph {
    pub fn all_keys(&self) -> &[BindingKey] {
        &self.sorted_keys
    }

    pub fn has_key(&self, key: &BindingKey) -> bool {
        self.keys.has_key(key)
    }

    pub fn decls_of(&self, key: &BindingKey) -> &[DeclId] {
        self.keys.decls_of(key)
    }

    pub fn deps_of(&self, key: &BindingKey) -> impl Iterator<Item = &BindingKey> {
        self.edges.get(key).into_iter().flatten()
    }

    pub fn namespace_of(&self, key: &BindingKey) -> Option<&str> {
        self.keys.namespace_of(key)
    }

    pub fn namespace_id(&self, namespace: &str) -> Option<NamespaceId> {
        self.namespaces.id_of(namespace)
    }

    pub fn namespace_string(&self, id: NamespaceId) -> Option<&str> {
        self.namespaces.name_of(id)
    }

    /// The namespace id stamped on a resolved identifier node, if any (§4.3).
    pub fn stamp_of(&self, node: NodeId) -> Option<NamespaceId> {
        self.stamps.get(&node).copied()
    }

    /// Every component at threshold 0, in reverse topological order —
    /// ready for the type checker to process in turn (§4.7, §4.9).
    pub fn components(&self) -> Vec<Vec<BindingKey>> {
        scc::strongly_connected_components(&self.sorted_keys, &self.edges, 0)
    }

    /// The diagnostic list produced by applying the cycle-legality policy
    /// to every actual cycle (threshold 1) in the graph (§4.8, §4.9).
    pub fn illegal_cycles(&self) -> &[CycleDiagnostic] {
        &self.illegal_cycles
    }

    /// The module this graph was built from, for callers that need to walk
    /// back from a [`DeclId`] to the concrete AST node.
    pub fn module(&self) -> &Module {
        &self.module
    }
}

/// Build the complete dependency graph for `module`: collect bindings
/// (§4.2), visit every declaration to assemble dependency edges (§4.5),
/// classify outside-function-body usage (§4.6), then classify every
/// threshold-1 component (§4.7, §4.8). Pure function of `module` plus
/// `options` — rebuilding from the same inputs yields byte-identical
/// `all_keys`/`deps_of`/`components`/`illegal_cycles` (§5's determinism
/// contract).
pub fn build_graph(module: Module, options: &GraphOptions) -> DependencyGraph {
    let _span = span!(Level::DEBUG, "build_graph").entered();

    let collector::CollectResult { keys, namespaces } = collector::collect(&module);

    let mut sorted_keys: Vec<BindingKey> = keys.keys().cloned().collect();
    sorted_keys.sort();

    let (edges, stamps) = assemble_edges(&module, &keys, &namespaces, options, &sorted_keys);

    let used_outside_function_body = usage::classify_usage(&module, &keys, &namespaces, options);

    let illegal_cycles = scc::strongly_connected_components(&sorted_keys, &edges, 1)
        .into_iter()
        .filter_map(|component| cycle::classify(&component, &used_outside_function_body))
        .collect();

    debug!(
        key_count = sorted_keys.len(),
        illegal_cycle_count = illegal_cycles.len(),
        "graph build complete"
    );

    DependencyGraph {
        module,
        keys,
        namespaces,
        sorted_keys,
        edges,
        used_outside_function_body,
        illegal_cycles,
        stamps,
    }
}

/// Per-key dependency assembly (§4.5): for every key, union the dependency
/// sets of every declaration in its `decls_of` list. A key's namespace is
/// looked up once via the collector's `namespace_of`, since every
/// declaration contributing to one key was collected under the same
/// namespace (the collector only merges same-name, same-namespace
/// declarations into one key).
fn assemble_edges(
    module: &Module,
    keys: &KeyTable,
    namespaces: &NamespaceTable,
    options: &GraphOptions,
    sorted_keys: &[BindingKey],
) -> (
    FxHashMap<BindingKey, FxHashSet<BindingKey>>,
    FxHashMap<NodeId, NamespaceId>,
) {
    let mut edges: FxHashMap<BindingKey, FxHashSet<BindingKey>> = FxHashMap::default();
    let mut stamps: FxHashMap<NodeId, NamespaceId> = FxHashMap::default();

    for key in sorted_keys {
        let namespace = keys.namespace_of(key).unwrap_or_default().to_string();
        let mut deps: FxHashSet<BindingKey> = FxHashSet::default();

        for decl_id in keys.decls_of(key) {
            let decl = module.decl(*decl_id);
            let (decl_deps, decl_stamps) =
                visitor::visit_declaration(keys, namespaces, options, &namespace, decl);
            deps.extend(decl_deps);
            for (node, resolved_key) in decl_stamps {
                // The stamp records the *defining* namespace — where
                // `resolved_key` is actually declared — not the referencing
                // site's namespace, so codegen can emit a qualified name for
                // a cross-namespace reference without re-resolving (§4.3, §6).
                let target_namespace = keys.namespace_of(&resolved_key).unwrap_or_default();
                let target_namespace_id =
                    namespaces.id_of(target_namespace).unwrap_or(NamespaceId::ROOT);
                stamps.insert(node, target_namespace_id);
            }
        }

        edges.insert(key.clone(), deps);
    }

    (edges, stamps)
}

/// Re-exported for callers that want the raw stamp list rather than the
/// graph's lookup-by-node accessor (e.g. a code generator batch-processing
/// every stamp at once).
pub fn stamps_of(graph: &DependencyGraph) -> impl Iterator<Item = Stamp> + '_ {
    graph
        .stamps
        .iter()
        .map(|(&node, &namespace)| Stamp { node, namespace })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expr, NodeId, Pattern, TopLevelDecl, VariableDecl};
    use crate::key::BindingKind;

    fn var(name: &str, init: Option<Expr>) -> TopLevelDecl {
        TopLevelDecl::Variable(VariableDecl {
            pattern: Pattern::ident(NodeId(0), name),
            type_ann: None,
            init,
        })
    }

    #[test]
    fn every_dependency_edge_points_to_an_extant_key() {
        let module = Module::new().with_namespace(
            "",
            vec![
                var("a", Some(Expr::Ident(NodeId(1), "b".into()))),
                var("b", None),
            ],
        );
        let graph = build_graph(module, &GraphOptions::default());
        for key in graph.all_keys() {
            for dep in graph.deps_of(key) {
                assert!(graph.has_key(dep), "dangling edge from {key:?} to {dep:?}");
            }
        }
    }

    #[test]
    fn class_value_and_type_keys_share_identical_deps() {
        use crate::ast::{ClassDecl, ClassExtends};
        let module = Module::new().with_namespace(
            "",
            vec![
                TopLevelDecl::Class(ClassDecl {
                    name: "A".into(),
                    type_params: vec![],
                    extends: Some(ClassExtends::Type(crate::ast::TypeExpr::Reference {
                        id: NodeId(2),
                        path: vec!["B".into()],
                        args: vec![],
                    })),
                    ctor_params: vec![],
                    members: vec![],
                }),
                TopLevelDecl::Class(ClassDecl {
                    name: "B".into(),
                    type_params: vec![],
                    extends: None,
                    ctor_params: vec![],
                    members: vec![],
                }),
            ],
        );
        let graph = build_graph(module, &GraphOptions::default());
        let value_deps: FxHashSet<_> = graph.deps_of(&BindingKey::value_key("A")).cloned().collect();
        let type_deps: FxHashSet<_> = graph.deps_of(&BindingKey::type_key("A")).cloned().collect();
        assert_eq!(value_deps, type_deps);
        assert!(type_deps.contains(&BindingKey::key("B", BindingKind::Type)));
    }

    #[test]
    fn rebuilding_from_same_module_is_deterministic() {
        let module = Module::new().with_namespace(
            "",
            vec![
                var("a", Some(Expr::Ident(NodeId(1), "b".into()))),
                var("b", Some(Expr::Ident(NodeId(2), "a".into()))),
            ],
        );
        let g1 = build_graph(module.clone(), &GraphOptions::default());
        let g2 = build_graph(module, &GraphOptions::default());
        assert_eq!(g1.all_keys(), g2.all_keys());
        for key in g1.all_keys() {
            let d1: FxHashSet<_> = g1.deps_of(key).cloned().collect();
            let d2: FxHashSet<_> = g2.deps_of(key).cloned().collect();
            assert_eq!(d1, d2);
        }
        assert_eq!(g1.components(), g2.components());
    }
}
