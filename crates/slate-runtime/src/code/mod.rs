//! Bytecode program container and builder
//!
//! The builder appends instructions and hands out symbolic labels for jump
//! and call targets. Targets are patched in a single pass when the builder
//! finishes; a label that is referenced but never bound, or bound past the
//! end of the program, fails assembly. That keeps "every jump lands on a
//! real instruction" a property of every `Program` that exists.

mod disasm;
mod inst;

pub use disasm::disassemble;
pub use inst::{Inst, Op};

use std::collections::HashMap;
use thiserror::Error;

/// A compiled program: flat instruction array plus the entry offset of each
/// function and of the synthetic start sequence
#[derive(Debug, Clone)]
pub struct Program {
    /// Instructions, addressed by 0-based index
    pub insts: Vec<Inst>,
    /// Function name -> entry offset
    pub functions: HashMap<String, usize>,
    /// Index the VM starts at
    pub entry: usize,
}

/// Symbolic jump target handed out by [`CodeBuilder::new_label`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label(usize);

/// Assembly failure: the generator produced an inconsistent program
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssembleError {
    #[error("label {0} referenced but never bound")]
    UnboundLabel(usize),
    #[error("label {label} bound to {target}, past the end of the program ({len} instructions)")]
    TargetOutOfRange {
        label: usize,
        target: usize,
        len: usize,
    },
}

/// Instruction buffer under construction
pub struct CodeBuilder {
    insts: Vec<Inst>,
    /// Label -> bound instruction index
    labels: Vec<Option<usize>>,
    /// Instruction indices whose target field awaits a label
    patches: Vec<(usize, Label)>,
}

/// Placeholder target written into jumps until the patch pass runs
const UNPATCHED: usize = usize::MAX;

impl Default for CodeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeBuilder {
    pub fn new() -> Self {
        Self {
            insts: Vec::new(),
            labels: Vec::new(),
            patches: Vec::new(),
        }
    }

    /// Index the next emitted instruction will get
    pub fn next_index(&self) -> usize {
        self.insts.len()
    }

    /// Create a fresh, unbound label
    pub fn new_label(&mut self) -> Label {
        self.labels.push(None);
        Label(self.labels.len() - 1)
    }

    /// Bind a label to the current position
    pub fn bind(&mut self, label: Label) {
        debug_assert!(self.labels[label.0].is_none(), "label bound twice");
        self.labels[label.0] = Some(self.insts.len());
    }

    /// Bound position of a label, if it has one
    pub fn target_of(&self, label: Label) -> Option<usize> {
        self.labels[label.0]
    }

    /// Append an instruction with no label dependency
    pub fn emit(&mut self, inst: Inst) {
        self.insts.push(inst);
    }

    pub fn jump(&mut self, label: Label) {
        self.emit_patched(Inst::Jump(UNPATCHED), label);
    }

    pub fn jump_if_zero(&mut self, label: Label) {
        self.emit_patched(Inst::JumpIfZero(UNPATCHED), label);
    }

    pub fn jump_if_nonzero(&mut self, label: Label) {
        self.emit_patched(Inst::JumpIfNonzero(UNPATCHED), label);
    }

    pub fn call(&mut self, label: Label) {
        self.emit_patched(Inst::Call(UNPATCHED), label);
    }

    fn emit_patched(&mut self, inst: Inst, label: Label) {
        self.patches.push((self.insts.len(), label));
        self.insts.push(inst);
    }

    /// Resolve every recorded patch and return the finished instructions.
    ///
    /// Fails if any referenced label is unbound or bound out of range.
    pub fn finish(mut self) -> Result<Vec<Inst>, AssembleError> {
        let len = self.insts.len();
        for &(index, label) in &self.patches {
            let target = self.labels[label.0].ok_or(AssembleError::UnboundLabel(label.0))?;
            if target >= len {
                return Err(AssembleError::TargetOutOfRange {
                    label: label.0,
                    target,
                    len,
                });
            }
            match &mut self.insts[index] {
                Inst::Jump(t) | Inst::JumpIfZero(t) | Inst::JumpIfNonzero(t) | Inst::Call(t) => {
                    *t = target;
                }
                other => unreachable!("patch recorded for non-jump instruction {:?}", other),
            }
        }
        Ok(self.insts)
    }
}
