//! Abstract Syntax Tree (AST) definitions
//!
//! The tree is immutable once parsed. Name references carry a `NameId`
//! identity instead of a mutable slot field; declaration resolution records
//! its results in a side table keyed by that identity, so a tree can be
//! compiled repeatedly without being touched.

use crate::intern::Symbol;
use crate::span::Span;

/// Identity of a single name reference, assigned by the parser
pub type NameId = u32;

/// Top-level program: a list of function declarations
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub functions: Vec<FunctionDecl>,
}

/// Function declaration
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: Symbol,
    pub params: Vec<Param>,
    pub body: Block,
    pub span: Span,
}

/// Function parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: Symbol,
    pub span: Span,
}

/// Brace-delimited statement sequence
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub span: Span,
}

/// Statement
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Expression evaluated for its side effects, value discarded
    Expr(ExprStmt),
    /// `set target = value;`
    Assign(AssignStmt),
    /// `let name;` reserves a frame slot and emits no code itself.
    /// `let name = value;` parses as this followed by an assignment.
    Decl(DeclStmt),
    /// `if cond { } elif cond { } ... else { }`
    If(IfStmt),
    /// `while cond { }`
    While(WhileStmt),
    /// `return value;`
    Return(ReturnStmt),
    /// Nested block
    Block(Block),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprStmt {
    pub expr: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignStmt {
    pub target: Expr,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeclStmt {
    pub name: Symbol,
    pub span: Span,
}

/// Conditional chain: branches tried top to bottom, first true condition
/// wins, optional trailing else
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub branches: Vec<IfBranch>,
    pub else_block: Option<Block>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfBranch {
    pub cond: Expr,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub cond: Expr,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Expr,
    pub span: Span,
}

/// Expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Integer literal
    Literal(Literal),
    /// Variable reference
    Name(NameRef),
    /// Unary operation (`-x`, `!x`)
    Unary(Box<UnaryExpr>),
    /// Binary operation
    Binary(Box<BinaryExpr>),
    /// Function call
    Call(Box<CallExpr>),
    /// Index expression: accepted by the grammar, rejected by codegen
    Index(Box<IndexExpr>),
}

impl Expr {
    /// Source location of this expression
    pub fn span(&self) -> Span {
        match self {
            Expr::Literal(lit) => lit.span,
            Expr::Name(name) => name.span,
            Expr::Unary(unary) => unary.span,
            Expr::Binary(binary) => binary.span,
            Expr::Call(call) => call.span,
            Expr::Index(index) => index.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub value: i64,
    pub span: Span,
}

/// A reference to a variable; `id` keys the resolver's side table
#[derive(Debug, Clone, PartialEq)]
pub struct NameRef {
    pub name: Symbol,
    pub id: NameId,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub operand: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub lhs: Expr,
    pub rhs: Expr,
    pub span: Span,
}

/// Call to a named function
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Symbol,
    pub args: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexExpr {
    pub target: Expr,
    pub index: Expr,
    pub span: Span,
}

/// Unary operator kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Arithmetic negation
    Neg,
    /// Logical not (0 -> 1, nonzero -> 0)
    Not,
}

/// Binary operator kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Gt,
    Lt,
    Gte,
    Lte,
}
