use crate::bytecode::OpCode;
use crate::compiler::Compiler;
use crate::errors::ErrorReport;
use crate::lexer::tokens::TokenKind;
use crate::parser::ast::*;
use crate::types::{BOOL, INT64};

impl<'a> Compiler<'a> {
    /// Compiles an expression node. Executing the emitted sequence leaves
    /// exactly one new cell of the expression's type on the operand stack.
    pub(super) fn compile_expr(&mut self, expr: &Expr) -> Result<(), ErrorReport> {
        match expr {
            Expr::Literal(node) => self.compile_literal(node),
            Expr::Unary(node) => self.compile_unary(node),
            Expr::Binary(node) => self.compile_binary(node),
            Expr::Call(node) => self.compile_call(node),
        }
    }

    /// Compiles a literal expression. Number and boolean literals load an
    /// immediate; a name literal loads the variable's offset, turns it
    /// into a pointer into the variable area, and reads through it with
    /// the load instruction matching the variable's type.
    fn compile_literal(&mut self, node: &LiteralExprNode) -> Result<(), ErrorReport> {
        match node.token.kind {
            TokenKind::NUMBER => {
                let value = match node.token.lexeme.parse::<i64>() {
                    Ok(n) => n,
                    Err(_) => {
                        return Err(self.error_at_token(
                            &node.token,
                            format!("Number literal '{}' is out of range.", node.token.lexeme),
                        ));
                    }
                };

                self.emit_op_with(OpCode::Int64Load, value);
            }
            TokenKind::BOOLEAN => {
                let value = node.token.lexeme == "true";
                self.emit_op_with(OpCode::BoolLoad, value as i64);
            }
            TokenKind::NAME => {
                let variable = match self.symbols.resolve(&node.token.lexeme) {
                    Some(var) => var,
                    None => {
                        return Err(self.error_at_token(
                            &node.token,
                            format!("Variable '{}' is not declared.", node.token.lexeme),
                        ));
                    }
                };

                let load = match variable.type_idx {
                    INT64 => OpCode::Int64LoadFromAddress,
                    BOOL => OpCode::BoolLoadFromAddress,
                    _ => {
                        return Err(self.error_at_token(
                            &node.token,
                            format!(
                                "Variables of type '{}' cannot be loaded.",
                                self.types.get(variable.type_idx).name
                            ),
                        ));
                    }
                };

                self.emit_op_with(OpCode::Int64Load, variable.offset as i64);
                self.emit_op(OpCode::StackPtrLoad);
                self.emit_op(load);
            }
            _ => {
                return Err(self.error_at_token(
                    &node.token,
                    format!(
                        "Unsupported kind of literal: {}.",
                        node.token.kind.name()
                    ),
                ));
            }
        }

        Ok(())
    }

    /// Compiles a unary expression. Unary plus is a no-op; unary minus
    /// negates; both nots lower to the same type-polymorphic instruction.
    fn compile_unary(&mut self, node: &UnaryExprNode) -> Result<(), ErrorReport> {
        self.compile_expr(&node.operand)?;

        match node.opr {
            TokenKind::UNARY_PLUS => {}
            TokenKind::UNARY_MINUS => self.emit_op(OpCode::Negate),
            TokenKind::BIT_NOT | TokenKind::BANG => self.emit_op(OpCode::Not),
            _ => {
                return Err(self.error_at_token(
                    &node.token,
                    format!(
                        "Unary operation '{}' is currently not supported.",
                        node.opr.name()
                    ),
                ));
            }
        }

        Ok(())
    }

    /// Compiles a binary expression: left operand, right operand, then the
    /// operator-selected instruction.
    fn compile_binary(&mut self, node: &BinaryExprNode) -> Result<(), ErrorReport> {
        self.compile_expr(&node.left)?;
        self.compile_expr(&node.right)?;

        let op = match node.opr {
            TokenKind::PLUS => OpCode::Add,
            TokenKind::MINUS => OpCode::Subtract,
            TokenKind::STAR => OpCode::Multiply,
            TokenKind::SLASH => OpCode::Divide,
            TokenKind::MODULO => OpCode::Modulo,
            TokenKind::BIT_OR | TokenKind::LOGIC_OR => OpCode::Or,
            TokenKind::BIT_AND | TokenKind::LOGIC_AND => OpCode::And,
            TokenKind::BIT_XOR | TokenKind::LOGIC_XOR => OpCode::Xor,
            TokenKind::EQ_EQ => OpCode::Equal,
            TokenKind::BANG_EQ => OpCode::NotEqual,
            TokenKind::LESS => OpCode::Smaller,
            TokenKind::LESS_EQ => OpCode::SmallerEqual,
            TokenKind::GREATER => OpCode::Bigger,
            TokenKind::GREATER_EQ => OpCode::BiggerEqual,
            _ => {
                return Err(self.error_at_token(
                    &node.token,
                    format!(
                        "Binary operation '{}' is currently not supported.",
                        node.opr.name()
                    ),
                ));
            }
        };

        self.emit_op(op);
        Ok(())
    }

    /// Compiles an intrinsic function call. `print` emits each argument
    /// followed by a `PRINT`; the casts emit their operand followed by the
    /// cast instruction.
    fn compile_call(&mut self, node: &CallExprNode) -> Result<(), ErrorReport> {
        match node.name.lexeme.as_str() {
            "print" => {
                for arg in node.args.iter() {
                    self.compile_expr(arg)?;
                    self.emit_op(OpCode::Print);
                }
            }
            "int64" => {
                // Arity was checked along with the types.
                self.compile_expr(&node.args[0])?;
                self.emit_op(OpCode::BoolToInt64);
            }
            "bool" => {
                self.compile_expr(&node.args[0])?;
                self.emit_op(OpCode::Int64ToBool);
            }
            _ => {
                return Err(self.error_at_token(
                    &node.name,
                    format!(
                        "Unknown function '{}': only intrinsic functions are supported.",
                        node.name.lexeme
                    ),
                ));
            }
        }

        Ok(())
    }
}
