//! Expression compilation
//!
//! Post-order, stack-machine style: operands first, then the instruction
//! that consumes them, leaving the expression's value on the operand stack.

use crate::ast::{BinaryOp, CallExpr, Expr, UnaryOp};
use crate::code::{Inst, Op};
use crate::compiler::Compiler;
use crate::diagnostic::{error_codes, Diagnostic};

impl Compiler<'_> {
    /// Compile an expression; its value ends up on the operand stack
    pub(super) fn compile_expr(&mut self, expr: &Expr) -> Result<(), Diagnostic> {
        match expr {
            Expr::Literal(lit) => {
                self.builder.emit(Inst::PushOperand(lit.value));
                Ok(())
            }
            Expr::Name(name) => {
                let slot = self
                    .resolutions
                    .get(&name.id)
                    .copied()
                    .ok_or_else(|| self.unresolved_name(name))?;
                let offset = self.slot_offset(slot);
                self.builder.emit(Inst::Load(offset));
                Ok(())
            }
            Expr::Unary(unary) => {
                self.compile_expr(&unary.operand)?;
                self.builder.emit(Inst::Operator(unary_op(unary.op)));
                Ok(())
            }
            Expr::Binary(binary) => {
                self.compile_expr(&binary.lhs)?;
                self.compile_expr(&binary.rhs)?;
                self.builder.emit(Inst::Operator(binary_op(binary.op)));
                Ok(())
            }
            Expr::Call(call) => self.compile_call(call),
            Expr::Index(index) => Err(Diagnostic::error_with_code(
                error_codes::UNSUPPORTED_INDEXING,
                "indexing is not supported",
                index.span,
            )),
        }
    }

    /// Compile a function call.
    ///
    /// Per argument, in order: push a zero placeholder onto the call-frame
    /// stack, compute the argument on the operand stack, save it into the
    /// placeholder. Then call; afterwards pop the argument slots plus the
    /// return-address slot the callee consumed. While placeholders are
    /// outstanding every frame-relative offset in the argument expressions
    /// is deepened by `extra_depth`.
    fn compile_call(&mut self, call: &CallExpr) -> Result<(), Diagnostic> {
        let info = self.functions.get(&call.callee).copied().ok_or_else(|| {
            Diagnostic::error_with_code(
                error_codes::UNKNOWN_FUNCTION,
                format!(
                    "call to unknown function `{}`",
                    self.interner.resolve(call.callee)
                ),
                call.span,
            )
        })?;

        if call.args.len() != info.arity {
            return Err(Diagnostic::error_with_code(
                error_codes::ARITY_MISMATCH,
                format!(
                    "function `{}` takes {} argument{}, but {} {} supplied",
                    self.interner.resolve(call.callee),
                    info.arity,
                    if info.arity == 1 { "" } else { "s" },
                    call.args.len(),
                    if call.args.len() == 1 { "was" } else { "were" },
                ),
                call.span,
            ));
        }

        for arg in &call.args {
            self.builder.emit(Inst::PushFrame(0));
            self.frame_mut().extra_depth += 1;
            self.compile_expr(arg)?;
            self.builder.emit(Inst::Save(1));
        }

        self.builder.call(info.label);

        for _ in 0..call.args.len() + 1 {
            self.builder.emit(Inst::PopFrame);
        }
        self.frame_mut().extra_depth -= call.args.len();

        Ok(())
    }
}

fn unary_op(op: UnaryOp) -> Op {
    match op {
        UnaryOp::Neg => Op::Neg,
        UnaryOp::Not => Op::Not,
    }
}

fn binary_op(op: BinaryOp) -> Op {
    match op {
        BinaryOp::Add => Op::Add,
        BinaryOp::Sub => Op::Sub,
        BinaryOp::Mul => Op::Mul,
        BinaryOp::Div => Op::Div,
        BinaryOp::Mod => Op::Mod,
        BinaryOp::Eq => Op::Eq,
        BinaryOp::Gt => Op::Gt,
        BinaryOp::Lt => Op::Lt,
        BinaryOp::Gte => Op::Gte,
        BinaryOp::Lte => Op::Lte,
    }
}
