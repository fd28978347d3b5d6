//! Statement compilation

use crate::ast::{AssignStmt, Block, Expr, IfStmt, Stmt, WhileStmt};
use crate::code::Inst;
use crate::compiler::Compiler;
use crate::diagnostic::{error_codes, Diagnostic};

impl Compiler<'_> {
    /// Compile a block's statements in sequence
    pub(super) fn compile_block(&mut self, block: &Block) -> Result<(), Diagnostic> {
        for stmt in &block.statements {
            self.compile_stmt(stmt)?;
        }
        Ok(())
    }

    /// Compile a statement
    pub(super) fn compile_stmt(&mut self, stmt: &Stmt) -> Result<(), Diagnostic> {
        match stmt {
            Stmt::Expr(expr_stmt) => {
                // Statement context: compute, then discard the value
                self.compile_expr(&expr_stmt.expr)?;
                self.builder.emit(Inst::PopOperand);
                Ok(())
            }
            Stmt::Assign(assign) => self.compile_assign(assign),
            // The slot was assigned during resolution and the prologue
            // reserves it; the declaration itself emits nothing
            Stmt::Decl(_) => Ok(()),
            Stmt::If(if_stmt) => self.compile_if(if_stmt),
            Stmt::While(while_stmt) => self.compile_while(while_stmt),
            Stmt::Return(ret) => {
                // The value stays on the operand stack through the
                // epilogue's frame teardown
                self.compile_expr(&ret.value)?;
                let epilogue = self.frame().epilogue;
                self.builder.jump(epilogue);
                Ok(())
            }
            Stmt::Block(block) => self.compile_block(block),
        }
    }

    /// Compile `set target = value;`; the target must be a plain resolved
    /// name
    fn compile_assign(&mut self, assign: &AssignStmt) -> Result<(), Diagnostic> {
        match &assign.target {
            Expr::Name(name) => {
                let slot = self
                    .resolutions
                    .get(&name.id)
                    .copied()
                    .ok_or_else(|| self.unresolved_name(name))?;
                self.compile_expr(&assign.value)?;
                let offset = self.slot_offset(slot);
                self.builder.emit(Inst::Save(offset));
                Ok(())
            }
            Expr::Index(index) => Err(Diagnostic::error_with_code(
                error_codes::UNSUPPORTED_INDEXING,
                "indexed assignment is not supported",
                index.span,
            )),
            other => Err(Diagnostic::error_with_code(
                error_codes::INVALID_ASSIGN_TARGET,
                "assignment target must be a variable",
                other.span(),
            )),
        }
    }

    /// Compile a conditional chain.
    ///
    /// Per branch: condition, jump-if-zero to the next branch, body, jump
    /// to the shared exit. Branches are tried top to bottom and the first
    /// true condition's body runs; everything after it is skipped.
    fn compile_if(&mut self, if_stmt: &IfStmt) -> Result<(), Diagnostic> {
        let exit = self.builder.new_label();

        for branch in &if_stmt.branches {
            self.compile_expr(&branch.cond)?;
            let next_branch = self.builder.new_label();
            self.builder.jump_if_zero(next_branch);
            self.compile_block(&branch.body)?;
            self.builder.jump(exit);
            self.builder.bind(next_branch);
        }

        if let Some(else_block) = &if_stmt.else_block {
            self.compile_block(else_block)?;
        }

        self.builder.bind(exit);
        Ok(())
    }

    /// Compile a while loop: condition at the top, exit on zero, body,
    /// back jump to the condition
    fn compile_while(&mut self, while_stmt: &WhileStmt) -> Result<(), Diagnostic> {
        let top = self.builder.new_label();
        let exit = self.builder.new_label();

        self.builder.bind(top);
        self.compile_expr(&while_stmt.cond)?;
        self.builder.jump_if_zero(exit);
        self.compile_block(&while_stmt.body)?;
        self.builder.jump(top);
        self.builder.bind(exit);

        Ok(())
    }
}
