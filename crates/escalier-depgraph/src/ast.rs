//! AST types accepted by the dependency-graph core.
//!
//! The parser that produces these values, and the file-to-namespace mapper
//! that groups top-level declarations by directory, both live upstream of
//! this crate. What follows is the concrete shape of their output: an owned
//! tree, not an arena — this core has no incremental-reparse story (see
//! Non-goals), so there's no need for arena-of-node-indices machinery.
//! Constructors are kept `pub` so both a real parser and test fixtures can
//! build trees ergonomically.

/// Stable identity for an identifier-bearing AST node, assigned by whatever
/// produced the tree (parser, or test code). The dependency visitor and
/// resolver use this to stamp resolved namespace ids (see
/// [`crate::resolver::Resolved`]) without mutating the tree in place.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// A module: an ordered mapping from namespace path to that namespace's
/// top-level declarations, in source order. Iteration order is part of the
/// contract (the root namespace need not be first; namespace id assignment
/// still pins `""` to id 0 regardless — see [`crate::namespace::NamespaceTable`]).
#[derive(Debug, Default, Clone)]
pub struct Module {
    pub namespaces: Vec<(String, Vec<TopLevelDecl>)>,
}

impl Module {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_namespace(mut self, path: impl Into<String>, decls: Vec<TopLevelDecl>) -> Self {
        self.namespaces.push((path.into(), decls));
        self
    }

    pub fn decl(&self, id: DeclId) -> &TopLevelDecl {
        &self.namespaces[id.namespace as usize].1[id.index as usize]
    }
}

/// Non-owning handle to one top-level declaration, indexing into the
/// [`Module`] that produced it: a cheap, `Copy` handle into arena-owned data
/// rather than an owned reference, scaled down since this crate doesn't need
/// a generic arena allocator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DeclId {
    pub namespace: u32,
    pub index: u32,
}

#[derive(Debug, Clone)]
pub enum TopLevelDecl {
    Variable(VariableDecl),
    Function(FunctionDecl),
    TypeAlias(TypeAliasDecl),
    Interface(InterfaceDecl),
    Enum(EnumDecl),
    Class(ClassDecl),
}

#[derive(Debug, Clone)]
pub struct VariableDecl {
    pub pattern: Pattern,
    pub type_ann: Option<TypeExpr>,
    pub init: Option<Expr>,
}

#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub params: Vec<Param>,
    pub return_type: Option<TypeExpr>,
    pub throws_type: Option<TypeExpr>,
    /// `None` for an ambient/overload signature (`declare fn foo(..): T`).
    pub body: Option<Block>,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub pattern: Pattern,
    pub type_ann: Option<TypeExpr>,
}

#[derive(Debug, Clone)]
pub struct TypeParam {
    pub name: String,
    pub constraint: Option<TypeExpr>,
    pub default: Option<TypeExpr>,
}

#[derive(Debug, Clone)]
pub struct TypeAliasDecl {
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub body: TypeExpr,
}

#[derive(Debug, Clone)]
pub struct InterfaceDecl {
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub extends: Vec<TypeExpr>,
    pub body: TypeExpr,
}

#[derive(Debug, Clone)]
pub struct EnumDecl {
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub elements: Vec<EnumElement>,
}

#[derive(Debug, Clone)]
pub enum EnumElement {
    Variant {
        name: String,
        params: Vec<TypeExpr>,
    },
    /// `...OtherEnum` — contributes a type-key dependency on the referenced enum.
    Spread { referenced_enum: Vec<String> },
}

#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub extends: Option<ClassExtends>,
    pub ctor_params: Vec<Param>,
    pub members: Vec<ClassMember>,
}

#[derive(Debug, Clone)]
pub enum ClassExtends {
    /// `class A extends b` where `b` is a runtime value (mixin factory, etc.)
    Value(Expr),
    /// `class A extends B<T>` — the ordinary case.
    Type(TypeExpr),
}

#[derive(Debug, Clone)]
pub enum ClassMember {
    Method(FunctionDecl),
    Field {
        name: String,
        type_ann: Option<TypeExpr>,
        init: Option<Expr>,
    },
}

// ---------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum Pattern {
    Ident(NodeId, String),
    Tuple(Vec<Pattern>),
    Object(Vec<ObjectPatternProp>),
    Rest(Box<Pattern>),
}

impl Pattern {
    pub fn ident(id: NodeId, name: impl Into<String>) -> Self {
        Pattern::Ident(id, name.into())
    }
}

#[derive(Debug, Clone)]
pub struct ObjectPatternProp {
    pub key: String,
    /// The bound pattern. For a bare `{ foo }` this is `Pattern::Ident` with
    /// the same name as `key`; a rename (`{ foo: bar }`) differs.
    pub value: Pattern,
}

// ---------------------------------------------------------------------
// Type expressions
// ---------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum TypeExpr {
    /// A (possibly dotted, possibly generic) type reference, e.g. `ns.Foo<T>`.
    Reference {
        id: NodeId,
        path: Vec<String>,
        args: Vec<TypeExpr>,
    },
    /// `typeof expr` in type position — operand is a value path.
    Typeof { id: NodeId, path: Vec<String> },
    Object(Vec<TypeObjectMember>),
    Union(Vec<TypeExpr>),
    Tuple(Vec<TypeExpr>),
    Function {
        type_params: Vec<TypeParam>,
        params: Vec<(Pattern, Option<TypeExpr>)>,
        return_type: Box<TypeExpr>,
    },
}

#[derive(Debug, Clone)]
pub enum TypeObjectMember {
    Named {
        key: String,
        value: TypeExpr,
    },
    /// `[k: K]: V` computed member — the key expression is visited as an
    /// ordinary value-position expression.
    Computed { key: Expr, value: TypeExpr },
}

// ---------------------------------------------------------------------
// Expressions / statements
// ---------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum Expr {
    Ident(NodeId, String),
    /// Flattened `a.b.c` member access. `path[0]` is the base identifier.
    Member { id: NodeId, path: Vec<String> },
    Call(Box<Expr>, Vec<Expr>),
    FunctionExpr(Box<FunctionDecl>),
    ObjectLiteral(Vec<ObjectLiteralProp>),
    TupleLiteral(Vec<Expr>),
    Literal,
}

#[derive(Debug, Clone)]
pub enum ObjectLiteralProp {
    Named { key: String, value: Expr },
    /// `{ foo }` — `foo` is a value identifier reference.
    Shorthand(NodeId, String),
    Computed { key: Expr, value: Expr },
}

#[derive(Debug, Clone)]
pub struct Block {
    pub statements: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    /// The only statement kind the core treats specially (hoisting
    /// discipline, §4.4); every other kind is opaque to it structurally and
    /// is simply walked generically for nested expressions/blocks.
    Decl(LocalDecl),
    Expr(Expr),
    Return(Option<Expr>),
    If(Expr, Block, Option<Block>),
    While(Expr, Block),
    Block(Block),
}

#[derive(Debug, Clone)]
pub enum LocalDecl {
    Variable(VariableDecl),
    Function(FunctionDecl),
}
