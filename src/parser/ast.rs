use std::fmt;

use crate::lexer::tokens::{Token, TokenKind};
use crate::types::TypeIdx;

/// Represents a single expression node in Tern's Abstract Syntax Tree.
#[derive(Debug, Clone)]
pub enum Expr {
    Literal(LiteralExprNode),
    Unary(UnaryExprNode),
    Binary(BinaryExprNode),
    Call(CallExprNode),
}

/// Represents a literal expression node. This node holds number, boolean,
/// character, string, and variable-name literals.
#[derive(Debug, Clone)]
pub struct LiteralExprNode {
    pub token: Token,
    /// The deduced type of this node. Resolved exactly once by the checker.
    pub type_idx: Option<TypeIdx>,
}

/// Represents a unary expression node.
#[derive(Debug, Clone)]
pub struct UnaryExprNode {
    pub operand: Box<Expr>,
    /// The unary form of the operator token kind.
    pub opr: TokenKind,
    /// The operator token, kept for diagnostics.
    pub token: Token,
    pub type_idx: Option<TypeIdx>,
}

/// Represents a binary expression node.
#[derive(Debug, Clone)]
pub struct BinaryExprNode {
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub opr: TokenKind,
    pub token: Token,
    pub type_idx: Option<TypeIdx>,
}

/// Represents an intrinsic function call node, e.g. `print(x)`.
#[derive(Debug, Clone)]
pub struct CallExprNode {
    /// The name token of the called function.
    pub name: Token,
    /// The ordered argument expressions.
    pub args: Vec<Expr>,
    pub type_idx: Option<TypeIdx>,
}

impl Expr {
    /// The resolved type of this expression, if the checker has run.
    pub fn type_idx(&self) -> Option<TypeIdx> {
        match self {
            Expr::Literal(x) => x.type_idx,
            Expr::Unary(x) => x.type_idx,
            Expr::Binary(x) => x.type_idx,
            Expr::Call(x) => x.type_idx,
        }
    }

    /// A token to anchor diagnostics about this expression.
    pub fn token(&self) -> &Token {
        match self {
            Expr::Literal(x) => &x.token,
            Expr::Unary(x) => &x.token,
            Expr::Binary(x) => &x.token,
            Expr::Call(x) => &x.name,
        }
    }
}

/// Represents a single statement node in Tern's Abstract Syntax Tree.
#[derive(Debug, Clone)]
pub enum Stmt {
    Expression(ExpressionStmtNode),
    Declaration(DeclarationStmtNode),
    If(IfStmtNode),
    Block(BlockNode),
}

/// A statement consisting only of an expression.
#[derive(Debug, Clone)]
pub struct ExpressionStmtNode {
    pub expr: Expr,
}

/// A variable declaration, `var NAME [: TYPE] [= expr];`.
#[derive(Debug, Clone)]
pub struct DeclarationStmtNode {
    pub name: Token,
    /// The declared type name, when the source spells one out.
    pub declared_type: Option<Token>,
    /// The resolved type of the variable. Set by the checker, either from
    /// the declared type name or adopted from the initializer.
    pub type_idx: Option<TypeIdx>,
    pub init: Option<Expr>,
}

/// An if statement. The else body may itself be another if statement,
/// which is how `else if` chains are represented.
#[derive(Debug, Clone)]
pub struct IfStmtNode {
    pub condition: Expr,
    pub then_body: Box<Stmt>,
    pub else_body: Option<Box<Stmt>>,
}

/// An ordered list of statements. A `do` statement parses into a
/// singleton block.
#[derive(Debug, Clone)]
pub struct BlockNode {
    pub body: Vec<Stmt>,
}

// The `Display` implementations render the AST back into parseable source
// form, with every compound expression fully parenthesized. Re-parsing the
// printed form yields a structurally identical tree.

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(x) => write!(f, "{}", x.token.lexeme),
            Expr::Unary(x) => write!(f, "({}{})", x.opr.name(), x.operand),
            Expr::Binary(x) => write!(f, "({} {} {})", x.left, x.opr.name(), x.right),
            Expr::Call(x) => {
                write!(f, "{}(", x.name.lexeme)?;
                for (i, arg) in x.args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Expression(stmt) => write!(f, "{};", stmt.expr),
            Stmt::Declaration(decl) => {
                write!(f, "var {}", decl.name.lexeme)?;
                if let Some(type_name) = &decl.declared_type {
                    write!(f, ": {}", type_name.lexeme)?;
                }
                if let Some(init) = &decl.init {
                    write!(f, " = {}", init)?;
                }
                write!(f, ";")
            }
            Stmt::If(stmt) => {
                write!(f, "if {} {}", stmt.condition, stmt.then_body)?;
                if let Some(else_body) = &stmt.else_body {
                    write!(f, " else {}", else_body)?;
                }
                Ok(())
            }
            Stmt::Block(block) => {
                write!(f, "{{")?;
                for stmt in block.body.iter() {
                    write!(f, " {}", stmt)?;
                }
                write!(f, " }}")
            }
        }
    }
}

impl fmt::Display for BlockNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for stmt in self.body.iter() {
            write!(f, " {}", stmt)?;
        }
        write!(f, " }}")
    }
}
