use crate::checker::TypeChecker;
use crate::errors::ErrorReport;
use crate::parser::ast::*;
use crate::types::BOOL;

impl<'a> TypeChecker<'a> {
    /// Type checks a single statement.
    pub(super) fn check_statement(&mut self, stmt: &mut Stmt) -> Result<(), ErrorReport> {
        match stmt {
            Stmt::Expression(node) => {
                self.deduce_expr(&mut node.expr)?;
                Ok(())
            }
            Stmt::Block(node) => {
                for stmt in node.body.iter_mut() {
                    self.check_statement(stmt)?;
                }
                Ok(())
            }
            Stmt::Declaration(node) => self.check_declaration(node),
            Stmt::If(node) => self.check_if(node),
        }
    }

    /// Type checks a variable declaration and registers the variable in the
    /// shared symbol table, assigning it a fresh offset in the variable
    /// area. A declared type must match the initializer type exactly; a
    /// declaration without a type adopts the initializer type.
    fn check_declaration(&mut self, node: &mut DeclarationStmtNode) -> Result<(), ErrorReport> {
        let declared = match &node.declared_type {
            Some(type_name) => match self.types.find(&type_name.lexeme) {
                Some(idx) => Some(idx),
                None => {
                    return Err(self.error_at_token(
                        type_name,
                        format!("Unknown type name '{}'.", type_name.lexeme),
                    ));
                }
            },
            None => None,
        };

        let deduced = match &mut node.init {
            Some(init) => Some(self.deduce_expr(init)?),
            None => None,
        };

        let type_idx = match (declared, deduced) {
            (Some(d), Some(i)) => {
                if d != i {
                    return Err(self.error_at_token(
                        &node.name,
                        format!(
                            "Type mismatch in declaration of '{}': declared '{}' but initialized with '{}'.",
                            node.name.lexeme,
                            self.type_name(d),
                            self.type_name(i)
                        ),
                    ));
                }
                d
            }
            (Some(d), None) => d,
            (None, Some(i)) => i,
            (None, None) => {
                return Err(self.error_at_token(
                    &node.name,
                    format!(
                        "Cannot infer a type for '{}': the declaration has no type and no initializer.",
                        node.name.lexeme
                    ),
                ));
            }
        };

        node.type_idx = Some(type_idx);
        self.symbols.declare(&node.name.lexeme, type_idx, self.types);

        Ok(())
    }

    /// Type checks an if statement. The condition must be a boolean; both
    /// bodies are checked under the same symbol table.
    fn check_if(&mut self, node: &mut IfStmtNode) -> Result<(), ErrorReport> {
        let condition = self.deduce_expr(&mut node.condition)?;

        if condition != BOOL {
            return Err(self.error_at_token(
                node.condition.token(),
                format!(
                    "If condition must evaluate to a boolean, but has type '{}'.",
                    self.type_name(condition)
                ),
            ));
        }

        self.check_statement(&mut node.then_body)?;

        if let Some(else_body) = &mut node.else_body {
            self.check_statement(else_body)?;
        }

        Ok(())
    }
}
