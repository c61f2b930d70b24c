//! The usage classifier (§4.6): a single AST pass over every declaration
//! that records which binding keys are referenced *outside any function
//! body*. The cycle classifier (§4.8) consults this set to decide whether a
//! value-only cycle is legal mutual recursion or an illegal eager reference.

use rustc_hash::FxHashSet;
use tracing::{debug, span, Level};

use crate::ast::{Module, TopLevelDecl};
use crate::collector::KeyTable;
use crate::key::BindingKey;
use crate::namespace::NamespaceTable;
use crate::options::GraphOptions;
use crate::visitor::Walker;

/// The set of keys referenced at `function_depth == 0` somewhere in the
/// module — from a top-level initializer, a type annotation on a
/// declaration's surface, an extends clause, or any other position not
/// enclosed in a function body. Type annotations at a declaration's surface
/// are always depth 0 relative to their enclosing declaration (§4.6 note),
/// which falls out of the walker naturally since only function *bodies*
/// increment `function_depth`, never parameter/return type positions.
#[derive(Debug, Default)]
pub struct UsedOutsideFunctionBody(pub(crate) FxHashSet<BindingKey>);

impl UsedOutsideFunctionBody {
    pub fn contains(&self, key: &BindingKey) -> bool {
        self.0.contains(key)
    }
}

/// Run the usage classifier over every declaration in every namespace of
/// `module`. One fresh scope stack per declaration, same as dependency
/// visiting (§4.5) — a declaration's own parameters/locals don't leak
/// shadowing state into the next declaration.
pub fn classify_usage(
    module: &Module,
    keys: &KeyTable,
    _namespaces: &NamespaceTable,
    options: &GraphOptions,
) -> UsedOutsideFunctionBody {
    let _span = span!(Level::DEBUG, "classify_usage").entered();
    let mut used = FxHashSet::default();

    for (namespace, decls) in &module.namespaces {
        for decl in decls {
            visit_one(decl, namespace, keys, options, &mut used);
        }
    }

    debug!(count = used.len(), "usage classification complete");
    UsedOutsideFunctionBody(used)
}

fn visit_one(
    decl: &TopLevelDecl,
    namespace: &str,
    keys: &KeyTable,
    options: &GraphOptions,
    used: &mut FxHashSet<BindingKey>,
) {
    let mut walker = Walker::new(keys, options, namespace, |resolved, _node, depth| {
        if depth == 0 {
            used.insert(resolved.key.clone());
        }
    });
    walker.visit_top_level(decl);
}
