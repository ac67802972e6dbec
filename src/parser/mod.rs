use crate::errors::ErrorReport;
use crate::lexer::tokens::{Token, TokenKind};
use crate::parser::ast::BlockNode;

// Submodules
pub mod ast;
mod expressions;
mod statements;

/// Represents Tern's parser, which converts a token sequence into an
/// Abstract Syntax Tree representation of the program.
pub struct Parser {
    /// The tokens to be parsed, ending with an `EOF` token.
    tokens: Vec<Token>,
    /// The index of the current token.
    current: usize,
}

impl Parser {
    /// Parses a list of tokens into a Tern AST. A program is a single
    /// top-level block.
    ///
    /// # Parameters
    /// - `tokens`: The scanned tokens for the program.
    ///
    /// # Returns
    /// - `Ok(BlockNode)`: The generated abstract syntax tree.
    /// - `Err(ErrorReport)`: The first parsing error in the program.
    pub fn parse(tokens: Vec<Token>) -> Result<BlockNode, ErrorReport> {
        let mut parser = Parser { tokens, current: 0 };

        let program = match parser.parse_block()? {
            ast::Stmt::Block(block) => block,
            _ => unreachable!("parse_block() always produces a block statement."),
        };

        if !parser.check(TokenKind::EOF) {
            return Err(parser.error_at_current("Expected end of file after top-level block."));
        }

        Ok(program)
    }

    /// Gets the current token without consuming it.
    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    /// Checks that the current token matches the kind provided.
    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    /// Advances the parser to the next token, returning the consumed one.
    /// The cursor never moves past the closing `EOF` token.
    fn advance(&mut self) -> &Token {
        if self.current < self.tokens.len() - 1 {
            self.current += 1;
            &self.tokens[self.current - 1]
        } else {
            &self.tokens[self.current]
        }
    }

    /// Moves the cursor back by one token. Used where a token turns out to
    /// belong to the enclosing construct, e.g. the `)` that closes a
    /// function-call argument list.
    fn step_back(&mut self) {
        self.current -= 1;
    }

    /// Checks that the current token matches the kind provided. If the
    /// tokens match, the current token gets consumed and the function
    /// returns true. Otherwise the token is not consumed.
    fn matches(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes the current token only if it is of a given kind, producing
    /// an error report otherwise.
    fn consume(&mut self, kind: TokenKind, message: &str) -> Result<&Token, ErrorReport> {
        if self.check(kind) {
            return Ok(self.advance());
        }

        Err(self.error_at_current(message))
    }

    /// Generates an error report anchored at the current token.
    fn error_at_current(&self, message: &str) -> ErrorReport {
        self.error_at_token(self.peek(), message)
    }

    /// Generates an error report anchored at the given token.
    fn error_at_token(&self, tok: &Token, message: &str) -> ErrorReport {
        let detail = if tok.kind == TokenKind::EOF {
            format!("{} Found the end of the program.", message)
        } else {
            format!("{} Found '{}'.", message, tok.lexeme)
        };

        ErrorReport::at_token(tok, detail)
    }
}
