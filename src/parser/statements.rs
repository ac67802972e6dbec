use crate::errors::ErrorReport;
use crate::lexer::tokens::TokenKind;
use crate::parser::ast::*;
use crate::parser::Parser;

impl Parser {
    /// Parses a block, `{ stmt* }`. A block preceded by `do` instead of
    /// `{` parses a single statement and wraps it in a singleton block.
    pub(super) fn parse_block(&mut self) -> Result<Stmt, ErrorReport> {
        if self.matches(TokenKind::DO_KW) {
            let stmt = self.parse_statement()?;
            return Ok(Stmt::Block(BlockNode { body: vec![stmt] }));
        }

        self.consume(TokenKind::L_BRACE, "Expected '{' to open a block.")?;

        let mut body: Vec<Stmt> = Vec::new();

        while !self.check(TokenKind::R_BRACE) {
            if self.check(TokenKind::EOF) {
                return Err(
                    self.error_at_current("Unexpected end of file while parsing a block.")
                );
            }

            body.push(self.parse_statement()?);
        }

        self.advance(); // Consume the `}`.
        Ok(Stmt::Block(BlockNode { body }))
    }

    /// Parses a single statement, dispatching on the first token.
    pub(super) fn parse_statement(&mut self) -> Result<Stmt, ErrorReport> {
        match self.peek().kind {
            TokenKind::IF_KW => self.parse_if(),
            TokenKind::VAR_KW => self.parse_declaration(),
            TokenKind::L_BRACE | TokenKind::DO_KW => self.parse_block(),
            _ => self.parse_expression_statement(),
        }
    }

    /// Parses an if statement, `if cond body (else body)?`, where each body
    /// is a block or a `do` singleton block, and the else body may be
    /// another if statement (an `else if` chain).
    fn parse_if(&mut self) -> Result<Stmt, ErrorReport> {
        self.advance(); // Consume the `if`.

        let condition = self.parse_expression()?;
        let then_body = Box::new(self.parse_block()?);

        let else_body = if self.matches(TokenKind::ELSE_KW) {
            if self.check(TokenKind::IF_KW) {
                Some(Box::new(self.parse_if()?))
            } else {
                Some(Box::new(self.parse_block()?))
            }
        } else {
            None
        };

        Ok(Stmt::If(IfStmtNode {
            condition,
            then_body,
            else_body,
        }))
    }

    /// Parses a variable declaration, `var NAME (: TYPE)? (= expr)? ;`.
    /// The type annotation and the initializer are both optional in the
    /// grammar; the checker rejects a declaration that has neither.
    fn parse_declaration(&mut self) -> Result<Stmt, ErrorReport> {
        self.advance(); // Consume the `var`.

        let name = self
            .consume(TokenKind::NAME, "Expected a variable name after 'var'.")?
            .clone();

        let declared_type = if self.matches(TokenKind::COLON) {
            let type_name = self
                .consume(TokenKind::NAME, "Expected a type name after ':'.")?
                .clone();
            Some(type_name)
        } else {
            None
        };

        let init = if self.matches(TokenKind::EQUALS) {
            Some(self.parse_expression()?)
        } else {
            None
        };

        self.consume(TokenKind::SEMICOLON, "Expected ';' after variable declaration.")?;

        Ok(Stmt::Declaration(DeclarationStmtNode {
            name,
            declared_type,
            type_idx: None,
            init,
        }))
    }

    /// Parses an expression statement, `expr ;`.
    fn parse_expression_statement(&mut self) -> Result<Stmt, ErrorReport> {
        if !self.peek().kind.starts_expression() {
            return Err(self.error_at_current("Expected the start of a statement."));
        }

        let expr = self.parse_expression()?;
        self.consume(TokenKind::SEMICOLON, "Expected ';' after expression.")?;

        Ok(Stmt::Expression(ExpressionStmtNode { expr }))
    }
}
