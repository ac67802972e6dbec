use crate::errors::ErrorReport;
use crate::lexer::tokens::{Token, TokenKind};
use crate::parser::ast::*;
use crate::parser::Parser;

impl Parser {
    /// Parses a general expression with an operator-precedence algorithm
    /// over two stacks, one for partial expressions and one for pending
    /// operator tokens.
    ///
    /// Operator precedence levels come from `TokenKind::precedence`; the
    /// parity of a level encodes associativity (even = left, odd = right).
    /// The `can_be_unary` flag tracks whether the next operator token is in
    /// prefix position and must be rewritten to its unary form.
    ///
    /// Parsing stops, without consuming the terminator, at `,`, `;`, `{`,
    /// `do`, or at a `)` that closes an enclosing argument list.
    pub(super) fn parse_expression(&mut self) -> Result<Expr, ErrorReport> {
        let mut expr_stack: Vec<Expr> = Vec::new();
        let mut opr_stack: Vec<Token> = Vec::new();
        let mut can_be_unary = true;
        let mut open_parens = 0u32;

        loop {
            if self.check(TokenKind::EOF) {
                return Err(
                    self.error_at_current("Unexpected end of file while parsing an expression.")
                );
            }

            if self.peek().kind.ends_expression() {
                break;
            }

            let mut token = self.advance().clone();

            if token.kind.precedence().is_some() {
                if can_be_unary && token.kind.has_unary_form() {
                    token.kind = token.kind.to_unary_form();
                }

                self.apply_tighter_operators(&mut expr_stack, &mut opr_stack, &token)?;
                opr_stack.push(token);

                // Another unary operator may follow directly, e.g. `--x`.
                can_be_unary = true;
                continue;
            }

            match token.kind {
                TokenKind::L_PAREN => {
                    opr_stack.push(token);
                    open_parens += 1;

                    // After a `(` an unary operator can follow.
                    can_be_unary = true;
                    continue;
                }
                TokenKind::R_PAREN => {
                    if open_parens == 0 {
                        // This `)` closes an enclosing argument list; leave
                        // it for the caller.
                        self.step_back();
                        break;
                    }

                    loop {
                        match opr_stack.last() {
                            Some(top) if top.kind == TokenKind::L_PAREN => break,
                            Some(_) => self.combine_top(&mut expr_stack, &mut opr_stack)?,
                            None => {
                                return Err(
                                    self.error_at_token(&token, "No matching '(' for ')'.")
                                );
                            }
                        }
                    }

                    opr_stack.pop();
                    open_parens -= 1;
                }
                TokenKind::CHARACTER
                | TokenKind::NUMBER
                | TokenKind::BOOLEAN
                | TokenKind::STRING => {
                    expr_stack.push(Expr::Literal(LiteralExprNode { token, type_idx: None }));
                }
                TokenKind::NAME => {
                    if self.check(TokenKind::L_PAREN) {
                        // A name directly followed by `(` is a function call.
                        self.step_back();
                        expr_stack.push(self.parse_call()?);
                    } else {
                        expr_stack.push(Expr::Literal(LiteralExprNode { token, type_idx: None }));
                    }
                }
                _ => {
                    return Err(self.error_at_token(&token, "Unexpected token in expression."));
                }
            }

            // The next operator cannot be unary.
            can_be_unary = false;
        }

        // Apply all remaining pending operators.
        while !opr_stack.is_empty() {
            self.combine_top(&mut expr_stack, &mut opr_stack)?;
        }

        if expr_stack.len() > 1 {
            return Err(self.error_at_current("Malformed expression: not enough operators."));
        }

        match expr_stack.pop() {
            Some(expr) => Ok(expr),
            None => Err(self.error_at_current("Empty expression.")),
        }
    }

    /// Pops and applies pending operators that bind at least as tightly as
    /// the incoming one. An operator on top of the stack is applied while
    /// its level is strictly tighter than the incoming operator's, or equal
    /// with the incoming operator left-associative.
    fn apply_tighter_operators(
        &self,
        expr_stack: &mut Vec<Expr>,
        opr_stack: &mut Vec<Token>,
        incoming: &Token,
    ) -> Result<(), ErrorReport> {
        let incoming_level = incoming
            .kind
            .precedence()
            .expect("Incoming token is an operator.");

        while let Some(top) = opr_stack.last() {
            if top.kind == TokenKind::L_PAREN {
                break;
            }

            let top_level = top.kind.precedence().expect("Operator stack holds operators.");

            if top_level < incoming_level || (top_level == incoming_level && incoming_level % 2 == 0)
            {
                self.combine_top(expr_stack, opr_stack)?;
            } else {
                break;
            }
        }

        Ok(())
    }

    /// Pops the top operator and combines one (unary) or two (binary)
    /// expressions from the expression stack into a new node.
    fn combine_top(
        &self,
        expr_stack: &mut Vec<Expr>,
        opr_stack: &mut Vec<Token>,
    ) -> Result<(), ErrorReport> {
        let opr = match opr_stack.pop() {
            Some(t) => t,
            None => return Err(self.error_at_current("Not enough operators in expression.")),
        };

        if opr.kind == TokenKind::L_PAREN {
            return Err(self.error_at_token(&opr, "Unmatched '(' in expression."));
        }

        if opr.kind.is_unary_operator() {
            let operand = match expr_stack.pop() {
                Some(e) => e,
                None => {
                    return Err(self.error_at_token(&opr, "Not enough operands for operator."));
                }
            };

            expr_stack.push(Expr::Unary(UnaryExprNode {
                operand: Box::new(operand),
                opr: opr.kind,
                token: opr,
                type_idx: None,
            }));
        } else {
            let right = expr_stack.pop();
            let left = expr_stack.pop();

            let (left, right) = match (left, right) {
                (Some(l), Some(r)) => (l, r),
                _ => {
                    return Err(self.error_at_token(&opr, "Not enough operands for operator."));
                }
            };

            expr_stack.push(Expr::Binary(BinaryExprNode {
                left: Box::new(left),
                right: Box::new(right),
                opr: opr.kind,
                token: opr,
                type_idx: None,
            }));
        }

        Ok(())
    }

    /// Parses a function call, `NAME ( args? )`. Arguments are expressions
    /// separated by commas; zero arguments is allowed, a trailing comma
    /// is not.
    fn parse_call(&mut self) -> Result<Expr, ErrorReport> {
        let name = self.advance().clone();
        self.consume(TokenKind::L_PAREN, "Expected '(' after function name.")?;

        let mut args: Vec<Expr> = Vec::new();

        loop {
            if self.matches(TokenKind::R_PAREN) {
                break;
            }

            if !self.peek().kind.starts_expression() {
                return Err(self.error_at_current("Unexpected token in function call arguments."));
            }

            args.push(self.parse_expression()?);

            if self.matches(TokenKind::COMMA) {
                if !self.peek().kind.starts_expression() {
                    return Err(
                        self.error_at_current("Expected an argument after ',' in function call.")
                    );
                }
                continue;
            } else if self.matches(TokenKind::R_PAREN) {
                break;
            } else {
                return Err(
                    self.error_at_current("Expected ',' or ')' in function call arguments.")
                );
            }
        }

        Ok(Expr::Call(CallExprNode {
            name,
            args,
            type_idx: None,
        }))
    }
}
