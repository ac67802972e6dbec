use crate::bytecode::OpCode;
use crate::compiler::Compiler;
use crate::errors::ErrorReport;
use crate::parser::ast::*;
use crate::types::{BOOL, INT64};

impl<'a> Compiler<'a> {
    /// Compiles a statement node. Statements are locally balanced on the
    /// operand stack, apart from the cells `PRINT` leaves behind.
    pub(super) fn compile_statement(&mut self, stmt: &Stmt) -> Result<(), ErrorReport> {
        match stmt {
            Stmt::Expression(node) => self.compile_expr(&node.expr),
            Stmt::Block(node) => {
                for stmt in node.body.iter() {
                    self.compile_statement(stmt)?;
                }
                Ok(())
            }
            Stmt::Declaration(node) => self.compile_declaration(node),
            Stmt::If(node) => self.compile_if(node),
        }
    }

    /// Compiles a variable declaration. The initializer (or a zero value
    /// of the declared type) is emitted, then stored through a pointer to
    /// the variable's offset in the variable area.
    fn compile_declaration(&mut self, node: &DeclarationStmtNode) -> Result<(), ErrorReport> {
        let type_idx = match node.type_idx {
            Some(idx) => idx,
            None => {
                return Err(self.error_at_token(
                    &node.name,
                    format!(
                        "Declaration of '{}' reached the compiler without a resolved type.",
                        node.name.lexeme
                    ),
                ));
            }
        };

        let variable = match self.symbols.resolve(&node.name.lexeme) {
            Some(var) => var,
            None => {
                return Err(self.error_at_token(
                    &node.name,
                    format!("Variable '{}' is not declared.", node.name.lexeme),
                ));
            }
        };

        let store = match type_idx {
            INT64 => OpCode::Int64LoadIntoAddress,
            BOOL => OpCode::BoolLoadIntoAddress,
            _ => {
                return Err(self.error_at_token(
                    &node.name,
                    format!(
                        "Variables of type '{}' cannot be stored.",
                        self.types.get(type_idx).name
                    ),
                ));
            }
        };

        let offset = variable.offset;

        match &node.init {
            Some(init) => self.compile_expr(init)?,
            None => {
                // Default-initialize with a zero value of the right type.
                match type_idx {
                    INT64 => self.emit_op_with(OpCode::Int64Load, 0),
                    _ => self.emit_op_with(OpCode::BoolLoad, 0),
                }
            }
        }

        self.emit_op_with(OpCode::Int64Load, offset as i64);
        self.emit_op(OpCode::StackPtrLoad);
        self.emit_op(store);

        Ok(())
    }

    /// Compiles an if statement. The condition is negated and followed by
    /// a `JUMP_IF` against a reserved lookup-table slot, realizing "jump
    /// when the condition is false"; with an else branch a second slot
    /// carries the then-body past the else-body. Both slots are patched
    /// before the statement finishes emitting.
    fn compile_if(&mut self, node: &IfStmtNode) -> Result<(), ErrorReport> {
        self.compile_expr(&node.condition)?;

        self.emit_op(OpCode::Not);
        let skip_then = self.emit_jump(OpCode::JumpIf);

        self.compile_statement(&node.then_body)?;

        match &node.else_body {
            Some(else_body) => {
                let skip_else = self.emit_jump(OpCode::Jump);

                self.patch_jump(skip_then);
                self.compile_statement(else_body)?;
                self.patch_jump(skip_else);
            }
            None => {
                self.patch_jump(skip_then);
            }
        }

        Ok(())
    }
}
