//! The qualified-name resolver (§4.3), used only inside the dependency
//! visitor and the usage classifier to turn a candidate name into a binding
//! key.

use tracing::{debug, span, Level};

use crate::ast::NodeId;
use crate::collector::KeyTable;
use crate::key::{BindingKey, BindingKind};
use crate::namespace::NamespaceId;
use crate::options::GraphOptions;
use crate::scope::ScopeStack;

/// The outcome of a successful resolution: which key the name resolved to,
/// and how many leading path segments were consumed (1 for a plain
/// identifier; for a dotted member path, the length of the longest prefix
/// that matched — see "progressive right-shortening" below).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub key: BindingKey,
    pub matched_segments: usize,
}

/// Resolve `segments` (a flattened dotted path; length 1 for a plain
/// identifier) against `namespace`'s current scope and the module's key
/// table.
///
/// Implements §4.3 steps 1–4 plus the dotted-path "progressive
/// right-shortening" extension, unified into a single loop: at each
/// candidate length (from the full path down to one segment), try the
/// namespace-qualified form, then the bare form, and return on the first
/// hit. Going longest-first is what makes this "return the longest prefix
/// that exists" for member paths like `obj.field` while degenerating to the
/// simple two-step lookup §4.3 describes when `segments.len() == 1`.
///
/// The root-namespace escape hatch (a leading segment equal to
/// `options.root_escape_sigil`) skips namespace qualification entirely and
/// resolves the remainder starting at the root namespace.
pub fn resolve(
    keys: &KeyTable,
    scopes: &ScopeStack,
    current_namespace: &str,
    kind: BindingKind,
    segments: &[String],
    options: &GraphOptions,
) -> Option<Resolved> {
    let _span = span!(Level::DEBUG, "resolve", path = %segments.join(".")).entered();

    let (path, root_escape) = if segments.first().map(String::as_str) == Some(options.root_escape_sigil) {
        (&segments[1..], true)
    } else {
        (&segments[..], false)
    };
    if path.is_empty() {
        return None;
    }

    if scopes.is_bound(&path[0], kind) {
        debug!(name = %path[0], "shadowed by local scope, no module dependency");
        return None;
    }

    for len in (1..=path.len()).rev() {
        let candidate = path[..len].join(".");

        if !root_escape && !current_namespace.is_empty() {
            let qualified = format!("{current_namespace}.{candidate}");
            if let Some(key) = keys.get(&qualified, kind) {
                debug!(%qualified, "resolved via namespace-qualified lookup");
                return Some(Resolved {
                    key,
                    matched_segments: len,
                });
            }
        }

        if let Some(key) = keys.get(&candidate, kind) {
            debug!(%candidate, "resolved via bare lookup");
            return Some(Resolved {
                key,
                matched_segments: len,
            });
        }
    }

    debug!("no dependency: not in module key table");
    None
}

/// A resolved identifier/path together with the defining namespace's id —
/// the "stamp" the resolver attaches so code generation can emit a fully
/// qualified reference without re-resolving (§4.3, §6).
#[derive(Debug, Clone)]
pub struct Stamp {
    pub node: NodeId,
    pub namespace: NamespaceId,
}
