//! The cycle classifier (§4.8): applies the legality policy to every
//! threshold-1 component and produces the diagnostic list `illegal_cycles()`
//! exposes.

use escalier_common::{Diagnostic, DiagnosticCategory};

use crate::key::{BindingKey, BindingKind};
use crate::usage::UsedOutsideFunctionBody;

/// Which rule an illegal component tripped. Carried alongside the rendered
/// [`Diagnostic`] so callers that want structured handling (rather than
/// parsing the message) don't have to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CycleKind {
    /// The component mixes `Value` and `Type` keys.
    Mixed,
    /// The component is all `Value` keys, and at least one participant is
    /// referenced outside any function body.
    ValueUsedOutsideFunction,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CycleDiagnostic {
    pub kind: CycleKind,
    pub component: Vec<BindingKey>,
    pub diagnostic: Diagnostic,
}

/// Classify one SCC (threshold 1, i.e. an actual cycle) per the policy in
/// §4.8:
///
/// 1. all `Type` → allowed (type recursion is normal).
/// 2. mixed kinds → illegal.
/// 3. all `Value` → illegal iff any participant is used outside a function
///    body; otherwise allowed (pure mutual recursion between callables).
pub fn classify(component: &[BindingKey], used: &UsedOutsideFunctionBody) -> Option<CycleDiagnostic> {
    let all_type = component.iter().all(BindingKey::is_type);
    if all_type {
        return None;
    }

    let all_value = component.iter().all(BindingKey::is_value);
    let kind = if !all_value {
        CycleKind::Mixed
    } else if component.iter().any(|k| used.contains(k)) {
        CycleKind::ValueUsedOutsideFunction
    } else {
        return None;
    };

    Some(CycleDiagnostic {
        kind,
        component: component.to_vec(),
        diagnostic: render(kind, component),
    })
}

fn render(kind: CycleKind, component: &[BindingKey]) -> Diagnostic {
    let names: Vec<&str> = component.iter().map(|k| k.qualified_name.as_str()).collect();
    let participants = names.join(", ");
    let message = match kind {
        CycleKind::Mixed => format!(
            "illegal cycle between value and type bindings: {participants} \
             form a mixed-kind cycle, which is never allowed"
        ),
        CycleKind::ValueUsedOutsideFunction => format!(
            "illegal cycle between value bindings: {participants} reference \
             each other, and at least one is used outside a function body"
        ),
    };
    Diagnostic {
        category: DiagnosticCategory::Error,
        code: "depgraph-illegal-cycle",
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    fn used_set(keys: &[BindingKey]) -> UsedOutsideFunctionBody {
        let mut set = FxHashSet::default();
        for k in keys {
            set.insert(k.clone());
        }
        UsedOutsideFunctionBody(set)
    }

    #[test]
    fn all_type_cycle_is_allowed() {
        let component = vec![BindingKey::type_key("Foo"), BindingKey::type_key("Bar")];
        let used = used_set(&[]);
        assert!(classify(&component, &used).is_none());
    }

    #[test]
    fn mixed_kind_cycle_is_illegal() {
        let component = vec![BindingKey::type_key("Foo"), BindingKey::value_key("Foo")];
        let used = used_set(&[]);
        let diag = classify(&component, &used).expect("mixed cycle must be illegal");
        assert_eq!(diag.kind, CycleKind::Mixed);
    }

    #[test]
    fn value_cycle_unused_outside_function_is_allowed() {
        let component = vec![BindingKey::value_key("a"), BindingKey::value_key("b")];
        let used = used_set(&[]);
        assert!(classify(&component, &used).is_none());
    }

    #[test]
    fn value_cycle_used_outside_function_is_illegal() {
        let component = vec![BindingKey::value_key("a"), BindingKey::value_key("b")];
        let used = used_set(&[BindingKey::value_key("b")]);
        let diag = classify(&component, &used).expect("must be illegal");
        assert_eq!(diag.kind, CycleKind::ValueUsedOutsideFunction);
        assert!(diag.diagnostic.message.contains('a'));
        assert!(diag.diagnostic.message.contains('b'));
    }
}
