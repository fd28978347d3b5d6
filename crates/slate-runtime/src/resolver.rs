//! Declaration resolution
//!
//! Walks a function body, assigns every `let` a frame slot, and records the
//! slot of every name reference in a side table keyed by `NameId`. The tree
//! itself is never mutated.
//!
//! Slot discipline: locals are numbered first-declared-first-indexed from 0
//! across the whole body, nested blocks included. Parameters sit beyond the
//! locals in reverse declaration order: for arity A and N locals, parameter
//! j gets slot N + (A-1-j), so the last parameter lies nearest the locals,
//! matching the order the caller pushed them.
//!
//! Scoping is standard lexical block scoping: a declaration in a nested
//! block shadows an outer binding only until the block ends. Within one
//! block a later declaration of the same name rebinds all subsequent
//! references.
//!
//! Resolution never fails; a reference that matches no binding is simply
//! left out of the side table and reported by the code generator.

use crate::ast::*;
use crate::intern::Symbol;
use std::collections::HashMap;

/// One resolved local declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: Symbol,
    pub slot: usize,
}

/// Frame shape of a single function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameLayout {
    /// Locals in declaration order; `locals[i].slot == i`
    pub locals: Vec<Declaration>,
    /// Number of parameters
    pub arity: usize,
}

impl FrameLayout {
    pub fn num_locals(&self) -> usize {
        self.locals.len()
    }
}

/// Side table mapping each resolved name reference to its frame slot
pub type Resolutions = HashMap<NameId, usize>;

/// Resolve one function, extending `resolutions` with its name references
pub fn resolve_function(func: &FunctionDecl, resolutions: &mut Resolutions) -> FrameLayout {
    let num_locals = count_locals(&func.body);
    let arity = func.params.len();

    let mut resolver = Resolver {
        locals: Vec::with_capacity(num_locals),
        scopes: Vec::new(),
        resolutions,
    };

    // Parameters live in an outermost scope so any local may shadow them
    let mut param_scope = Vec::with_capacity(arity);
    for (j, param) in func.params.iter().enumerate() {
        param_scope.push((param.name, num_locals + (arity - 1 - j)));
    }
    resolver.scopes.push(param_scope);

    resolver.walk_block(&func.body);
    resolver.scopes.pop();

    FrameLayout {
        locals: resolver.locals,
        arity,
    }
}

/// Count every `let` in a block, nested blocks included
fn count_locals(block: &Block) -> usize {
    let mut count = 0;
    for stmt in &block.statements {
        match stmt {
            Stmt::Decl(_) => count += 1,
            Stmt::If(if_stmt) => {
                for branch in &if_stmt.branches {
                    count += count_locals(&branch.body);
                }
                if let Some(else_block) = &if_stmt.else_block {
                    count += count_locals(else_block);
                }
            }
            Stmt::While(while_stmt) => count += count_locals(&while_stmt.body),
            Stmt::Block(inner) => count += count_locals(inner),
            Stmt::Expr(_) | Stmt::Assign(_) | Stmt::Return(_) => {}
        }
    }
    count
}

struct Resolver<'a> {
    /// Locals in declaration order; index doubles as the slot
    locals: Vec<Declaration>,
    /// Lexical scope stack; each scope is searched newest-binding-first
    scopes: Vec<Vec<(Symbol, usize)>>,
    resolutions: &'a mut Resolutions,
}

impl Resolver<'_> {
    fn walk_block(&mut self, block: &Block) {
        self.scopes.push(Vec::new());
        for stmt in &block.statements {
            self.walk_stmt(stmt);
        }
        self.scopes.pop();
    }

    fn walk_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Decl(decl) => {
                let slot = self.locals.len();
                self.locals.push(Declaration {
                    name: decl.name,
                    slot,
                });
                self.scopes
                    .last_mut()
                    .expect("resolver always has a scope")
                    .push((decl.name, slot));
            }
            Stmt::Assign(assign) => {
                self.walk_expr(&assign.target);
                self.walk_expr(&assign.value);
            }
            Stmt::Expr(expr_stmt) => self.walk_expr(&expr_stmt.expr),
            Stmt::If(if_stmt) => {
                for branch in &if_stmt.branches {
                    self.walk_expr(&branch.cond);
                    self.walk_block(&branch.body);
                }
                if let Some(else_block) = &if_stmt.else_block {
                    self.walk_block(else_block);
                }
            }
            Stmt::While(while_stmt) => {
                self.walk_expr(&while_stmt.cond);
                self.walk_block(&while_stmt.body);
            }
            Stmt::Return(ret) => self.walk_expr(&ret.value),
            Stmt::Block(inner) => self.walk_block(inner),
        }
    }

    fn walk_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(_) => {}
            Expr::Name(name) => {
                if let Some(slot) = self.lookup(name.name) {
                    self.resolutions.insert(name.id, slot);
                }
            }
            Expr::Unary(unary) => self.walk_expr(&unary.operand),
            Expr::Binary(binary) => {
                self.walk_expr(&binary.lhs);
                self.walk_expr(&binary.rhs);
            }
            Expr::Call(call) => {
                for arg in &call.args {
                    self.walk_expr(arg);
                }
            }
            Expr::Index(index) => {
                self.walk_expr(&index.target);
                self.walk_expr(&index.index);
            }
        }
    }

    fn lookup(&self, name: Symbol) -> Option<usize> {
        for scope in self.scopes.iter().rev() {
            for &(bound, slot) in scope.iter().rev() {
                if bound == name {
                    return Some(slot);
                }
            }
        }
        None
    }
}
