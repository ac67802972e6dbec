use crate::bytecode::{Code, OpCode};
use crate::compiler::symbols::SymbolTable;
use crate::errors::ErrorReport;
use crate::lexer::tokens::Token;
use crate::parser::ast::BlockNode;
use crate::types::TypeRegistry;

// Submodules
mod expressions;
mod statements;
pub mod symbols;

/// Represents Tern's bytecode compiler and its internal state. The
/// compiler lowers a fully type-checked AST into a `Code` buffer,
/// resolving variable names through the symbol table the type checker
/// filled in.
pub struct Compiler<'a> {
    /// The code buffer being emitted into.
    code: Code,
    /// The types known to this compilation run.
    types: &'a TypeRegistry,
    /// The emission symbol table, shared with the type checker.
    symbols: &'a SymbolTable,
}

impl<'a> Compiler<'a> {
    /// Compiles an Abstract Syntax Tree into bytecode. Every expression
    /// node must already carry its resolved type.
    ///
    /// # Parameters
    /// - `program`: The root block of the program.
    /// - `types`: The type registry for this compilation run.
    /// - `symbols`: The symbol table filled by the type checker.
    ///
    /// # Returns
    /// - `Ok(Code)`: The compiled program.
    /// - `Err(ErrorReport)`: The first code-generation error.
    pub fn compile(
        program: &BlockNode,
        types: &'a TypeRegistry,
        symbols: &'a SymbolTable,
    ) -> Result<Code, ErrorReport> {
        let mut compiler = Compiler {
            code: Code::new(),
            types,
            symbols,
        };

        for stmt in program.body.iter() {
            compiler.compile_statement(stmt)?;
        }

        Ok(compiler.code)
    }

    /// Emits an instruction word into the code buffer.
    pub(super) fn emit_op(&mut self, op: OpCode) {
        self.code.push_op(op);
    }

    /// Emits an instruction word followed by its immediate word.
    pub(super) fn emit_op_with(&mut self, op: OpCode, immediate: i64) {
        self.code.push_op(op);
        self.code.push_word(immediate);
    }

    /// Emits a jump instruction against a freshly reserved lookup-table
    /// slot. The slot holds a placeholder target; the caller patches it
    /// with `patch_jump` once the destination position is known.
    ///
    /// # Returns
    /// - `usize`: The reserved slot index.
    pub(super) fn emit_jump(&mut self, op: OpCode) -> usize {
        let slot = self.code.reserve_slot();
        self.emit_op_with(op, slot as i64);
        slot
    }

    /// Patches a reserved lookup-table slot so it targets the current end
    /// of the emitted code.
    pub(super) fn patch_jump(&mut self, slot: usize) {
        let target = self.code.len();
        self.code.patch_slot(slot, target);
    }

    /// Generates a code-generation error report anchored at the given
    /// token.
    pub(super) fn error_at_token(&self, tok: &Token, message: String) -> ErrorReport {
        ErrorReport::at_token(tok, message)
    }
}
