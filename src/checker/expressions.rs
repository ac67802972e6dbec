use crate::checker::TypeChecker;
use crate::errors::ErrorReport;
use crate::lexer::tokens::TokenKind;
use crate::parser::ast::*;
use crate::types::{TypeIdx, BOOL, INT64, VOID};

impl<'a> TypeChecker<'a> {
    /// Deduces the type of an expression bottom-up, annotating the node.
    /// Deduction is idempotent: a node whose type is already resolved is
    /// returned immediately.
    pub(super) fn deduce_expr(&mut self, expr: &mut Expr) -> Result<TypeIdx, ErrorReport> {
        if let Some(idx) = expr.type_idx() {
            return Ok(idx);
        }

        match expr {
            Expr::Literal(node) => self.deduce_literal(node),
            Expr::Unary(node) => self.deduce_unary(node),
            Expr::Binary(node) => self.deduce_binary(node),
            Expr::Call(node) => self.deduce_call(node),
        }
    }

    /// Deduces the type of a literal expression. Number literals are
    /// `int64`, boolean literals are `bool`, and a name literal has the
    /// type of the variable it resolves to.
    fn deduce_literal(&mut self, node: &mut LiteralExprNode) -> Result<TypeIdx, ErrorReport> {
        let idx = match node.token.kind {
            TokenKind::NUMBER => INT64,
            TokenKind::BOOLEAN => BOOL,
            TokenKind::NAME => match self.symbols.resolve(&node.token.lexeme) {
                Some(var) => var.type_idx,
                None => {
                    return Err(self.error_at_token(
                        &node.token,
                        format!("Variable '{}' is not declared.", node.token.lexeme),
                    ));
                }
            },
            _ => {
                return Err(self.error_at_token(
                    &node.token,
                    format!(
                        "Unsupported kind of literal: {}.",
                        node.token.kind.name()
                    ),
                ));
            }
        };

        node.type_idx = Some(idx);
        Ok(idx)
    }

    /// Deduces the type of a unary expression. The result type is the
    /// operand type; the operator must be legal for it.
    fn deduce_unary(&mut self, node: &mut UnaryExprNode) -> Result<TypeIdx, ErrorReport> {
        let operand = self.deduce_expr(&mut node.operand)?;

        let legal = match node.opr {
            TokenKind::UNARY_PLUS | TokenKind::UNARY_MINUS | TokenKind::BIT_NOT => operand == INT64,
            TokenKind::BANG => operand == BOOL,
            // Address-of and dereference have no lowering in this version.
            _ => false,
        };

        if !legal {
            return Err(self.error_at_token(
                &node.token,
                format!(
                    "Operator '{}' is not defined for operand of type '{}'.",
                    node.opr.name(),
                    self.type_name(operand)
                ),
            ));
        }

        node.type_idx = Some(operand);
        Ok(operand)
    }

    /// Deduces the type of a binary expression. Operands must have the
    /// exact same type; there are no implicit conversions. Comparison
    /// operators produce `bool`, all other operators produce the operand
    /// type.
    fn deduce_binary(&mut self, node: &mut BinaryExprNode) -> Result<TypeIdx, ErrorReport> {
        let left = self.deduce_expr(&mut node.left)?;
        let right = self.deduce_expr(&mut node.right)?;

        if left != right {
            return Err(self.error_at_token(
                &node.token,
                format!(
                    "Types '{}' and '{}' are incompatible for operation '{}'.",
                    self.type_name(left),
                    self.type_name(right),
                    node.opr.name()
                ),
            ));
        }

        use TokenKind::*;

        let legal = match node.opr {
            PLUS | MINUS | STAR | SLASH | MODULO => left == INT64,
            BIT_OR | BIT_AND | BIT_XOR | LOGIC_OR | LOGIC_AND | LOGIC_XOR => {
                left == INT64 || left == BOOL
            }
            EQ_EQ | BANG_EQ => left == INT64 || left == BOOL,
            LESS | LESS_EQ | GREATER | GREATER_EQ => left == INT64,
            // The assignment family has no lowering in this version.
            _ => false,
        };

        if !legal {
            return Err(self.error_at_token(
                &node.token,
                format!(
                    "Operator '{}' is not defined for operands of type '{}'.",
                    node.opr.name(),
                    self.type_name(left)
                ),
            ));
        }

        let result = match node.opr {
            LESS | LESS_EQ | GREATER | GREATER_EQ | EQ_EQ | BANG_EQ => BOOL,
            _ => left,
        };

        node.type_idx = Some(result);
        Ok(result)
    }

    /// Deduces the type of an intrinsic function call. `print` accepts any
    /// printable arguments and produces `void`; `int64` and `bool` are
    /// explicit casts with exactly one argument.
    fn deduce_call(&mut self, node: &mut CallExprNode) -> Result<TypeIdx, ErrorReport> {
        let idx = match node.name.lexeme.as_str() {
            "print" => {
                for arg in node.args.iter_mut() {
                    let arg_type = self.deduce_expr(arg)?;

                    if arg_type == VOID {
                        return Err(self.error_at_token(
                            arg.token(),
                            String::from("Cannot print a value of type 'void'."),
                        ));
                    }
                }

                VOID
            }
            "int64" => {
                self.check_cast_operand(node, BOOL)?;
                INT64
            }
            "bool" => {
                self.check_cast_operand(node, INT64)?;
                BOOL
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
        };

        node.type_idx = Some(idx);
        Ok(idx)
    }

    /// Checks the single operand of a cast intrinsic against the type it
    /// converts from.
    fn check_cast_operand(
        &mut self,
        node: &mut CallExprNode,
        expected: TypeIdx,
    ) -> Result<(), ErrorReport> {
        if node.args.len() != 1 {
            return Err(self.error_at_token(
                &node.name,
                format!(
                    "Cast '{}' expects 1 argument but got {}.",
                    node.name.lexeme,
                    node.args.len()
                ),
            ));
        }

        let arg_type = self.deduce_expr(&mut node.args[0])?;

        if arg_type != expected {
            return Err(self.error_at_token(
                &node.name,
                format!(
                    "Cast '{}' expects an argument of type '{}' but got '{}'.",
                    node.name.lexeme,
                    self.type_name(expected),
                    self.type_name(arg_type)
                ),
            ));
        }

        Ok(())
    }
}
