//! Integration tests for the SCC engine (§4.7), exercised through
//! `DependencyGraph::components()` built from realistic modules.

use escalier_depgraph::ast::{Expr, FunctionDecl, Module, NodeId, Pattern, TopLevelDecl, VariableDecl};
use escalier_depgraph::options::GraphOptions;
use escalier_depgraph::{build_graph, BindingKey};

fn var(name: &str, init: Option<Expr>) -> TopLevelDecl {
    TopLevelDecl::Variable(VariableDecl {
        pattern: Pattern::ident(NodeId(0), name),
        type_ann: None,
        init,
    })
}

fn ident(n: u32, name: &str) -> Expr {
    Expr::Ident(NodeId(n), name.into())
}

#[test]
fn threshold_zero_includes_singletons_with_no_edges() {
    let module = Module::new().with_namespace("", vec![var("lonely", None)]);
    let graph = build_graph(module, &GraphOptions::default());
    let components = graph.components();
    assert_eq!(components.len(), 1);
    assert_eq!(components[0], vec![BindingKey::value_key("lonely")]);
}

#[test]
fn acyclic_chain_yields_one_component_per_key_in_dependency_order() {
    // a -> b -> c (a depends on b, b depends on c): c's component must
    // come before b's, which must come before a's.
    let module = Module::new().with_namespace(
        "",
        vec![
            var("a", Some(ident(1, "b"))),
            var("b", Some(ident(2, "c"))),
            var("c", None),
        ],
    );
    let graph = build_graph(module, &GraphOptions::default());
    let components = graph.components();
    assert_eq!(components.len(), 3);
    let pos = |name: &str| {
        components
            .iter()
            .position(|c| c.contains(&BindingKey::value_key(name)))
            .unwrap()
    };
    assert!(pos("c") < pos("b"));
    assert!(pos("b") < pos("a"));
}

#[test]
fn every_edge_from_a_component_points_inside_it_or_to_an_earlier_one() {
    let module = Module::new().with_namespace(
        "",
        vec![
            var("a", Some(ident(1, "b"))),
            var("b", Some(ident(2, "a"))),
            var("c", Some(ident(3, "b"))),
        ],
    );
    let graph = build_graph(module, &GraphOptions::default());
    let components = graph.components();
    let component_of = |key: &BindingKey| {
        components
            .iter()
            .position(|c| c.contains(key))
            .expect("every key belongs to some component")
    };
    for (idx, component) in components.iter().enumerate() {
        for key in component {
            for dep in graph.deps_of(key) {
                let dep_idx = component_of(dep);
                assert!(dep_idx <= idx, "edge from component {idx} reaches forward to {dep_idx}");
            }
        }
    }
}

#[test]
fn recursive_function_self_loop_is_a_singleton_cycle_component() {
    let f = TopLevelDecl::Function(FunctionDecl {
        name: "fact".into(),
        type_params: vec![],
        params: vec![],
        return_type: None,
        throws_type: None,
        body: Some(escalier_depgraph::ast::Block {
            statements: vec![escalier_depgraph::ast::Stmt::Expr(Expr::Call(
                Box::new(ident(1, "fact")),
                vec![],
            ))],
        }),
    });
    let module = Module::new().with_namespace("", vec![f]);
    let graph = build_graph(module, &GraphOptions::default());
    assert!(graph.illegal_cycles().is_empty());
    let components = graph.components();
    let fact_component = components
        .iter()
        .find(|c| c.contains(&BindingKey::value_key("fact")))
        .unwrap();
    assert_eq!(fact_component.len(), 1);
}
