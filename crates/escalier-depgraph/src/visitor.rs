//! The scope-aware dependency visitor (§4.4) and the shared walking core it
//! shares with the usage classifier (§4.6).
//!
//! Both passes need the same scope-stack-and-AST-walk machinery; they only
//! differ in what they do at a resolved reference (record an edge, versus
//! record "seen outside a function body"). That's modeled here as a single
//! generic `Walker<F>` parameterized by a reference callback, so the two
//! passes in `graph.rs` and `usage.rs` share one traversal implementation
//! instead of maintaining two AST walks in lockstep.

use tracing::{span, Level};

use crate::ast::{
    Block, ClassDecl, ClassExtends, ClassMember, EnumDecl, EnumElement, Expr, FunctionDecl,
    InterfaceDecl, LocalDecl, ObjectLiteralProp, Param, Pattern, Stmt, TopLevelDecl, TypeAliasDecl,
    TypeExpr, TypeObjectMember, TypeParam, VariableDecl,
};
use crate::ast::NodeId;
use crate::collector::KeyTable;
use crate::key::BindingKind;
use crate::namespace::NamespaceTable;
use crate::options::GraphOptions;
use crate::resolver::{self, Resolved};
use crate::scope::ScopeStack;

/// Walks one top-level declaration's AST, invoking `on_reference` at every
/// resolvable identifier/type/typeof/member reference. Shared by the
/// dependency visitor (which unions references into a dependency set) and
/// the usage classifier (which additionally tracks function-body depth).
pub struct Walker<'a, F>
where
    F: FnMut(&Resolved, NodeId, usize),
{
    keys: &'a KeyTable,
    options: &'a GraphOptions,
    namespace: &'a str,
    scopes: ScopeStack,
    function_depth: usize,
    recursion: usize,
    on_reference: F,
}

impl<'a, F> Walker<'a, F>
where
    F: FnMut(&Resolved, NodeId, usize),
{
    pub fn new(keys: &'a KeyTable, options: &'a GraphOptions, namespace: &'a str, on_reference: F) -> Self {
        Self {
            keys,
            options,
            namespace,
            scopes: ScopeStack::new(),
            function_depth: 0,
            recursion: 0,
            on_reference,
        }
    }

    fn guard_recursion(&mut self) -> bool {
        self.recursion += 1;
        self.recursion <= self.options.max_recursion_depth
    }

    fn resolve_and_emit(&mut self, kind: BindingKind, path: &[String], node: NodeId) {
        if let Some(resolved) = resolver::resolve(
            self.keys,
            &self.scopes,
            self.namespace,
            kind,
            path,
            self.options,
        ) {
            (self.on_reference)(&resolved, node, self.function_depth);
        }
    }

    // -------------------------------------------------------------------
    // Per-declaration drivers (§4.4 "Per-declaration driver")
    // -------------------------------------------------------------------

    pub fn visit_top_level(&mut self, decl: &TopLevelDecl) {
        match decl {
            TopLevelDecl::Variable(v) => self.visit_variable(v),
            TopLevelDecl::Function(f) => self.visit_function(f),
            TopLevelDecl::TypeAlias(t) => self.visit_type_alias(t),
            TopLevelDecl::Interface(i) => self.visit_interface(i),
            TopLevelDecl::Enum(e) => self.visit_enum(e),
            TopLevelDecl::Class(c) => self.visit_class(c),
        }
    }

    fn visit_variable(&mut self, v: &VariableDecl) {
        if let Some(ty) = &v.type_ann {
            self.visit_type(ty);
        }
        if let Some(init) = &v.init {
            self.visit_expr(init);
        }
    }

    fn visit_type_params(&mut self, params: &[TypeParam]) {
        for param in params {
            self.scopes.bind(&param.name, BindingKind::Type);
            if let Some(constraint) = &param.constraint {
                self.visit_type(constraint);
            }
            if let Some(default) = &param.default {
                self.visit_type(default);
            }
        }
    }

    fn visit_function(&mut self, f: &FunctionDecl) {
        // Type parameters live in a scope that stays active through the
        // body too (generics remain visible wherever the parameter/value
        // scope is nested inside it).
        self.scopes.push();
        self.visit_type_params(&f.type_params);
        for param in &f.params {
            if let Some(ty) = &param.type_ann {
                self.visit_type(ty);
            }
        }
        if let Some(ret) = &f.return_type {
            self.visit_type(ret);
        }
        if let Some(throws) = &f.throws_type {
            self.visit_type(throws);
        }
        self.enter_function_body(&f.params, f.body.as_ref());
        self.scopes.pop();
    }

    /// Push the value scope for a function's parameters and visit its body,
    /// bumping `function_depth` for the usage classifier's benefit.
    fn enter_function_body(&mut self, params: &[Param], body: Option<&Block>) {
        self.scopes.push();
        for param in params {
            self.bind_pattern(&param.pattern);
        }
        if let Some(body) = body {
            self.function_depth += 1;
            self.visit_block(body);
            self.function_depth -= 1;
        }
        self.scopes.pop();
    }

    fn visit_type_alias(&mut self, t: &TypeAliasDecl) {
        self.scopes.push();
        self.visit_type_params(&t.type_params);
        self.visit_type(&t.body);
        self.scopes.pop();
    }

    fn visit_interface(&mut self, i: &InterfaceDecl) {
        self.scopes.push();
        self.visit_type_params(&i.type_params);
        for ext in &i.extends {
            self.visit_type(ext);
        }
        self.visit_type(&i.body);
        self.scopes.pop();
    }

    fn visit_enum(&mut self, e: &EnumDecl) {
        self.scopes.push();
        self.visit_type_params(&e.type_params);
        for element in &e.elements {
            match element {
                EnumElement::Variant { params, .. } => {
                    for p in params {
                        self.visit_type(p);
                    }
                }
                EnumElement::Spread { referenced_enum } => {
                    // Spread elements contribute a type-key dependency on
                    // the referenced enum; there's no AST node id to stamp
                    // since the spread syntax has no identifier of its own
                    // distinct from the path itself, so node 0 marks "no
                    // stampable site" for this synthetic reference.
                    self.resolve_and_emit(BindingKind::Type, referenced_enum, NodeId(0));
                }
            }
        }
        self.scopes.pop();
    }

    fn visit_class(&mut self, c: &ClassDecl) {
        self.scopes.push();
        self.visit_type_params(&c.type_params);
        if let Some(extends) = &c.extends {
            match extends {
                ClassExtends::Value(expr) => self.visit_expr(expr),
                ClassExtends::Type(ty) => self.visit_type(ty),
            }
        }
        for param in &c.ctor_params {
            if let Some(ty) = &param.type_ann {
                self.visit_type(ty);
            }
        }

        // Constructor parameters enter the class's scope so method/field
        // bodies may reference them.
        self.scopes.push();
        for param in &c.ctor_params {
            self.bind_pattern(&param.pattern);
        }
        for member in &c.members {
            match member {
                ClassMember::Method(f) => self.visit_function(f),
                ClassMember::Field { type_ann, init, .. } => {
                    if let Some(ty) = type_ann {
                        self.visit_type(ty);
                    }
                    if let Some(init) = init {
                        self.visit_expr(init);
                    }
                }
            }
        }
        self.scopes.pop();
        self.scopes.pop();
    }

    // -------------------------------------------------------------------
    // Patterns
    // -------------------------------------------------------------------

    fn bind_pattern(&mut self, pattern: &Pattern) {
        match pattern {
            Pattern::Ident(_, name) => self.scopes.bind(name, BindingKind::Value),
            Pattern::Tuple(elements) => {
                for el in elements {
                    self.bind_pattern(el);
                }
            }
            Pattern::Object(props) => {
                for prop in props {
                    self.bind_pattern(&prop.value);
                }
            }
            Pattern::Rest(inner) => self.bind_pattern(inner),
        }
    }

    // -------------------------------------------------------------------
    // Blocks / statements (hoisting discipline, §4.4)
    // -------------------------------------------------------------------

    fn visit_block(&mut self, block: &Block) {
        if !self.guard_recursion() {
            return;
        }
        self.scopes.push();

        // Function declarations are hoisted: bind every local function's
        // name before visiting any statement body.
        for stmt in &block.statements {
            if let Stmt::Decl(LocalDecl::Function(f)) = stmt {
                self.scopes.bind(&f.name, BindingKind::Value);
            }
        }

        for stmt in &block.statements {
            self.visit_stmt(stmt);
        }

        self.scopes.pop();
        self.recursion -= 1;
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Decl(LocalDecl::Variable(v)) => {
                // Variable declarations are NOT hoisted: visit the
                // annotation/initializer first, then bind the pattern —
                // so `val x = x` resolves the inner `x` to an outer
                // binding (or nothing), never to itself.
                if let Some(ty) = &v.type_ann {
                    self.visit_type(ty);
                }
                if let Some(init) = &v.init {
                    self.visit_expr(init);
                }
                self.bind_pattern(&v.pattern);
            }
            Stmt::Decl(LocalDecl::Function(f)) => {
                // Name already hoisted into scope by `visit_block`; still
                // need to visit the function's own signature/body.
                self.visit_function(f);
            }
            Stmt::Expr(expr) => self.visit_expr(expr),
            Stmt::Return(expr) => {
                if let Some(expr) = expr {
                    self.visit_expr(expr);
                }
            }
            Stmt::If(cond, then_block, else_block) => {
                self.visit_expr(cond);
                self.visit_block(then_block);
                if let Some(else_block) = else_block {
                    self.visit_block(else_block);
                }
            }
            Stmt::While(cond, body) => {
                self.visit_expr(cond);
                self.visit_block(body);
            }
            Stmt::Block(block) => self.visit_block(block),
        }
    }

    // -------------------------------------------------------------------
    // Expressions
    // -------------------------------------------------------------------

    fn visit_expr(&mut self, expr: &Expr) {
        if !self.guard_recursion() {
            return;
        }
        match expr {
            Expr::Ident(node, name) => {
                self.resolve_and_emit(BindingKind::Value, std::slice::from_ref(name), *node);
            }
            Expr::Member { id, path } => {
                self.resolve_and_emit(BindingKind::Value, path, *id);
            }
            Expr::Call(callee, args) => {
                self.visit_expr(callee);
                for arg in args {
                    self.visit_expr(arg);
                }
            }
            Expr::FunctionExpr(f) => self.visit_function(f),
            Expr::ObjectLiteral(props) => {
                for prop in props {
                    match prop {
                        ObjectLiteralProp::Named { value, .. } => self.visit_expr(value),
                        ObjectLiteralProp::Shorthand(node, name) => {
                            self.resolve_and_emit(BindingKind::Value, std::slice::from_ref(name), *node);
                        }
                        ObjectLiteralProp::Computed { key, value } => {
                            self.visit_expr(key);
                            self.visit_expr(value);
                        }
                    }
                }
            }
            Expr::TupleLiteral(elements) => {
                for el in elements {
                    self.visit_expr(el);
                }
            }
            Expr::Literal => {}
        }
        self.recursion -= 1;
    }

    // -------------------------------------------------------------------
    // Type expressions
    // -------------------------------------------------------------------

    fn visit_type(&mut self, ty: &TypeExpr) {
        if !self.guard_recursion() {
            return;
        }
        match ty {
            TypeExpr::Reference { id, path, args } => {
                self.resolve_and_emit(BindingKind::Type, path, *id);
                for arg in args {
                    self.visit_type(arg);
                }
            }
            TypeExpr::Typeof { id, path } => {
                self.resolve_and_emit(BindingKind::Value, path, *id);
            }
            TypeExpr::Object(members) => {
                for member in members {
                    match member {
                        TypeObjectMember::Named { value, .. } => self.visit_type(value),
                        TypeObjectMember::Computed { key, value } => {
                            self.visit_expr(key);
                            self.visit_type(value);
                        }
                    }
                }
            }
            TypeExpr::Union(members) | TypeExpr::Tuple(members) => {
                for member in members {
                    self.visit_type(member);
                }
            }
            TypeExpr::Function {
                type_params,
                params,
                return_type,
            } => {
                self.scopes.push();
                self.visit_type_params(type_params);
                for (pattern, ty) in params {
                    self.bind_pattern(pattern);
                    if let Some(ty) = ty {
                        self.visit_type(ty);
                    }
                }
                self.visit_type(return_type);
                self.scopes.pop();
            }
        }
        self.recursion -= 1;
    }
}

/// Compute the set of binding keys one declaration depends on (§4.4, used
/// by graph assembly in §4.5). `namespaces` is accepted for symmetry with
/// call sites that also need it for stamping, though the walker itself only
/// needs the key table and the declaration's namespace string.
pub fn visit_declaration(
    keys: &KeyTable,
    _namespaces: &NamespaceTable,
    options: &GraphOptions,
    namespace: &str,
    decl: &TopLevelDecl,
) -> (rustc_hash::FxHashSet<crate::key::BindingKey>, Vec<(NodeId, crate::key::BindingKey)>) {
    let _span = span!(Level::DEBUG, "visit_declaration", %namespace).entered();
    let mut deps = rustc_hash::FxHashSet::default();
    let mut stamps = Vec::new();
    {
        let mut walker = Walker::new(keys, options, namespace, |resolved, node, _depth| {
            deps.insert(resolved.key.clone());
            if node != NodeId(0) {
                stamps.push((node, resolved.key.clone()));
            }
        });
        walker.visit_top_level(decl);
    }
    (deps, stamps)
}
