//! Integration tests for the qualified-name resolver (§4.3): progressive
//! right-shortening, namespace-qualified-first precedence, shadowing, and
//! the root-namespace escape sigil.

use escalier_depgraph::ast::Module;
use escalier_depgraph::collector::collect;
use escalier_depgraph::key::BindingKind;
use escalier_depgraph::options::GraphOptions;
use escalier_depgraph::resolver::resolve;
use escalier_depgraph::scope::ScopeStack;
use escalier_depgraph::BindingKey;

fn module_with_value_keys(namespace: &str, names: &[&str]) -> Module {
    use escalier_depgraph::ast::{NodeId, Pattern, TopLevelDecl, VariableDecl};
    let decls = names
        .iter()
        .map(|n| {
            TopLevelDecl::Variable(VariableDecl {
                pattern: Pattern::ident(NodeId(0), *n),
                type_ann: None,
                init: None,
            })
        })
        .collect();
    Module::new().with_namespace(namespace, decls)
}

#[test]
fn namespace_qualified_form_is_tried_before_bare_form() {
    // Both `utils.helper` and a root `helper` exist; a reference to
    // `helper` written from inside `utils` must resolve to `utils.helper`.
    let module = Module::new()
        .with_namespace("", {
            use escalier_depgraph::ast::{NodeId, Pattern, TopLevelDecl, VariableDecl};
            vec![TopLevelDecl::Variable(VariableDecl {
                pattern: Pattern::ident(NodeId(0), "helper"),
                type_ann: None,
                init: None,
            })]
        })
        .with_namespace("utils", {
            use escalier_depgraph::ast::{NodeId, Pattern, TopLevelDecl, VariableDecl};
            vec![TopLevelDecl::Variable(VariableDecl {
                pattern: Pattern::ident(NodeId(1), "helper"),
                type_ann: None,
                init: None,
            })]
        });
    let result = collect(&module);
    let scopes = ScopeStack::new();
    let options = GraphOptions::default();
    let resolved = resolve(
        &result.keys,
        &scopes,
        "utils",
        BindingKind::Value,
        &["helper".to_string()],
        &options,
    )
    .expect("helper should resolve");
    assert_eq!(resolved.key, BindingKey::value_key("utils.helper"));
}

#[test]
fn dotted_path_uses_longest_existing_prefix() {
    let module = module_with_value_keys("utils", &["obj"]);
    let result = collect(&module);
    let scopes = ScopeStack::new();
    let options = GraphOptions::default();
    let path: Vec<String> = ["obj", "field", "nested"].iter().map(|s| s.to_string()).collect();
    let resolved = resolve(&result.keys, &scopes, "utils", BindingKind::Value, &path, &options)
        .expect("should resolve to the module-level `obj` via the namespace-qualified form");
    assert_eq!(resolved.key, BindingKey::value_key("utils.obj"));
    assert_eq!(resolved.matched_segments, 1);
}

#[test]
fn local_shadow_blocks_qualified_lookup() {
    let module = module_with_value_keys("", &["x"]);
    let result = collect(&module);
    let mut scopes = ScopeStack::new();
    scopes.push();
    scopes.bind("x", BindingKind::Value);
    let options = GraphOptions::default();
    let resolved = resolve(
        &result.keys,
        &scopes,
        "",
        BindingKind::Value,
        &["x".to_string()],
        &options,
    );
    assert!(resolved.is_none());
}

#[test]
fn unresolvable_name_yields_no_dependency() {
    let module = Module::new();
    let result = collect(&module);
    let scopes = ScopeStack::new();
    let options = GraphOptions::default();
    let resolved = resolve(
        &result.keys,
        &scopes,
        "",
        BindingKind::Value,
        &["builtin_console".to_string()],
        &options,
    );
    assert!(resolved.is_none());
}

#[test]
fn root_escape_sigil_resolves_starting_at_root_namespace() {
    let module = module_with_value_keys("", &["Global"]);
    let result = collect(&module);
    let scopes = ScopeStack::new();
    let options = GraphOptions::default();
    let path = vec!["$Root".to_string(), "Global".to_string()];
    let resolved = resolve(&result.keys, &scopes, "utils", BindingKind::Value, &path, &options)
        .expect("root escape sigil should resolve against the root namespace");
    assert_eq!(resolved.key, BindingKey::value_key("Global"));
}

#[test]
fn type_and_value_lookups_are_independent() {
    let module = Module::new().with_namespace("", {
        use escalier_depgraph::ast::{ClassDecl, TopLevelDecl};
        vec![TopLevelDecl::Class(ClassDecl {
            name: "Widget".into(),
            type_params: vec![],
            extends: None,
            ctor_params: vec![],
            members: vec![],
        })]
    });
    let result = collect(&module);
    let scopes = ScopeStack::new();
    let options = GraphOptions::default();
    let path = vec!["Widget".to_string()];

    let as_value = resolve(&result.keys, &scopes, "", BindingKind::Value, &path, &options).unwrap();
    let as_type = resolve(&result.keys, &scopes, "", BindingKind::Type, &path, &options).unwrap();
    assert_eq!(as_value.key, BindingKey::value_key("Widget"));
    assert_eq!(as_type.key, BindingKey::type_key("Widget"));
}
