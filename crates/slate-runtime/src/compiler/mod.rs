//! AST to bytecode compiler
//!
//! Consumes a parsed program and produces a flat instruction sequence with
//! a stack-frame calling convention:
//!
//! - Expressions evaluate on the operand stack, post-order.
//! - Locals and arguments live on the call-frame stack, addressed relative
//!   to its top (`Load`/`Save` offsets).
//! - The caller pushes one zero placeholder per argument and saves each
//!   computed argument into it; `Call` pushes the return address; the
//!   callee's prologue reserves its locals and the shared epilogue unwinds
//!   them and jumps back through the saved address.
//! - All jump targets go through the builder's labels and are resolved in
//!   one validated pass at the end.
//!
//! Compilation is all-or-nothing: the first error aborts with a
//! `Diagnostic` and no program is produced.

mod expr;
mod stmt;

use crate::ast;
use crate::code::{CodeBuilder, Inst, Label, Program};
use crate::diagnostic::{error_codes, Diagnostic};
use crate::intern::{Interner, Symbol};
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::resolver::{resolve_function, Resolutions};
use crate::span::Span;
use std::collections::HashMap;

/// Compile Slate source text to a runnable program
///
/// Runs the whole pipeline: lexing, parsing, declaration resolution, code
/// generation, and jump resolution.
pub fn compile(source: &str) -> Result<Program, Diagnostic> {
    let mut lexer = Lexer::new(source);
    let (tokens, diagnostics) = lexer.tokenize();
    if let Some(diagnostic) = diagnostics.into_iter().next() {
        return Err(diagnostic);
    }
    let (program, interner) = Parser::new(tokens).parse()?;
    Compiler::new(&interner).compile(&program)
}

/// Compile-time record of a registered function
#[derive(Debug, Clone, Copy)]
pub(super) struct FunctionInfo {
    /// Entry label, bound when the body is emitted
    pub(super) label: Label,
    pub(super) arity: usize,
}

/// Per-function code generation state
pub(super) struct FrameState {
    /// Number of frame slots the prologue reserves
    pub(super) num_locals: usize,
    /// Shared frame-teardown point every `return` jumps to
    pub(super) epilogue: Label,
    /// Call-frame slots pushed for in-flight call arguments; every
    /// frame-relative offset is deepened by this while it is nonzero
    pub(super) extra_depth: usize,
}

/// Compiler state
pub struct Compiler<'a> {
    pub(super) interner: &'a Interner,
    pub(super) builder: CodeBuilder,
    /// Function name -> registered info; filled before any body compiles
    /// so forward calls resolve
    pub(super) functions: HashMap<Symbol, FunctionInfo>,
    /// Name reference -> frame slot side table
    pub(super) resolutions: Resolutions,
    /// State of the function currently being compiled
    pub(super) frame: Option<FrameState>,
}

impl<'a> Compiler<'a> {
    /// Create a compiler over the interner that owns the tree's symbols
    pub fn new(interner: &'a Interner) -> Self {
        Self {
            interner,
            builder: CodeBuilder::new(),
            functions: HashMap::new(),
            resolutions: Resolutions::new(),
            frame: None,
        }
    }

    /// Compile a program: all functions, then the synthetic entry sequence
    /// that calls `main` and halts
    pub fn compile(mut self, program: &ast::Program) -> Result<Program, Diagnostic> {
        // Register every function up front so forward calls resolve
        for func in &program.functions {
            let name = self.interner.resolve(func.name);
            if self.functions.contains_key(&func.name) {
                return Err(Diagnostic::error_with_code(
                    error_codes::DUPLICATE_FUNCTION,
                    format!("function `{}` is defined more than once", name),
                    func.span,
                ));
            }
            if name == "main" && !func.params.is_empty() {
                return Err(Diagnostic::error_with_code(
                    error_codes::MAIN_ARITY,
                    "`main` must not take parameters",
                    func.span,
                ));
            }
            let label = self.builder.new_label();
            self.functions.insert(
                func.name,
                FunctionInfo {
                    label,
                    arity: func.params.len(),
                },
            );
        }

        for func in &program.functions {
            self.compile_function(func)?;
        }

        // Entry sequence: call main, pop the return-address slot it
        // consumed, halt
        let main_info = self
            .interner
            .lookup("main")
            .and_then(|sym| self.functions.get(&sym))
            .copied()
            .ok_or_else(|| {
                Diagnostic::error_with_code(
                    error_codes::MISSING_MAIN,
                    "no `main` function defined",
                    Span::dummy(),
                )
                .with_help("every program needs a `func main() { ... }` entry point")
            })?;
        let entry = self.builder.next_index();
        self.builder.call(main_info.label);
        self.builder.emit(Inst::PopFrame);
        self.builder.emit(Inst::Halt);

        // Function labels are all bound now; collect entry offsets before
        // the builder is consumed
        let mut functions = HashMap::new();
        for (&sym, info) in &self.functions {
            let offset = self
                .builder
                .target_of(info.label)
                .expect("function label bound by compile_function");
            functions.insert(self.interner.resolve(sym).to_string(), offset);
        }

        let insts = self.builder.finish().map_err(|err| {
            Diagnostic::error_with_code(
                error_codes::INTERNAL_ERROR,
                format!("jump resolution failed: {}", err),
                Span::dummy(),
            )
        })?;

        Ok(Program {
            insts,
            functions,
            entry,
        })
    }

    /// Compile one function: entry marker, prologue, body, shared epilogue
    fn compile_function(&mut self, func: &ast::FunctionDecl) -> Result<(), Diagnostic> {
        let label = self.functions[&func.name].label;
        let layout = resolve_function(func, &mut self.resolutions);
        let num_locals = layout.num_locals();
        let epilogue = self.builder.new_label();
        self.frame = Some(FrameState {
            num_locals,
            epilogue,
            extra_depth: 0,
        });

        self.builder.bind(label);
        self.builder
            .emit(Inst::Func(self.interner.resolve(func.name).to_string()));

        // Prologue: zero-fill one frame slot per local
        for _ in 0..num_locals {
            self.builder.emit(Inst::PushFrame(0));
        }

        self.compile_block(&func.body)?;

        // Epilogue: unwind the frame in reverse of the prologue, then jump
        // back through the saved return address (a return expression's
        // value stays below it on the operand stack)
        self.builder.bind(epilogue);
        for _ in 0..num_locals {
            self.builder.emit(Inst::PopFrame);
        }
        self.builder.emit(Inst::Load(1));
        self.builder.emit(Inst::JumpIndirect);

        self.frame = None;
        Ok(())
    }

    pub(super) fn frame(&self) -> &FrameState {
        self.frame.as_ref().expect("not compiling a function")
    }

    pub(super) fn frame_mut(&mut self) -> &mut FrameState {
        self.frame.as_mut().expect("not compiling a function")
    }

    /// Frame-relative offset of a resolved slot, adjusted for any call
    /// placeholders currently on the frame stack.
    ///
    /// With N locals: local slot s sits at offset N - s (the last local is
    /// the frame top); argument slot s sits at offset s + 2, one step past
    /// the saved return address.
    pub(super) fn slot_offset(&self, slot: usize) -> usize {
        let frame = self.frame();
        let base = if slot < frame.num_locals {
            frame.num_locals - slot
        } else {
            slot + 2
        };
        base + frame.extra_depth
    }

    pub(super) fn unresolved_name(&self, name: &ast::NameRef) -> Diagnostic {
        Diagnostic::error_with_code(
            error_codes::UNRESOLVED_NAME,
            format!(
                "unresolved name `{}`",
                self.interner.resolve(name.name)
            ),
            name.span,
        )
        .with_help("declare it with `let` before use")
    }
}
