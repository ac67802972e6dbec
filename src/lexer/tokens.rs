/// A token that represents a single unit of Tern code.
#[derive(Debug, Clone)]
pub struct Token {
    /// The token's line number.
    pub line_num: usize,
    /// The token's column start.
    pub column_start: usize,
    /// The token's kind.
    pub kind: TokenKind,
    /// The token's lexeme.
    pub lexeme: String,
}

/// The kinds of tokens in a Tern program.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TokenKind {
    // Keywords
    ELSE_KW,
    FUNCTION_KW,
    FOR_KW,
    IF_KW,
    RETURN_KW,
    VAR_KW,
    WHILE_KW,
    DO_KW,

    // Operators
    PLUS,
    MINUS,
    STAR,
    SLASH,
    MODULO,
    BIT_OR,
    BIT_AND,
    BIT_XOR,
    BIT_NOT,
    PLUS_EQ,
    MINUS_EQ,
    STAR_EQ,
    SLASH_EQ,
    MODULO_EQ,
    OR_EQ,
    AND_EQ,
    XOR_EQ,
    EQUALS,

    // Boolean operators
    BANG,
    BANG_EQ,
    EQ_EQ,
    LESS,
    LESS_EQ,
    GREATER,
    GREATER_EQ,
    LOGIC_OR,
    LOGIC_AND,
    LOGIC_XOR,

    // Unary forms, produced by the expression parser only
    UNARY_PLUS,
    UNARY_MINUS,
    UNARY_REF,
    UNARY_DEREF,

    // Separators
    COMMA,
    SEMICOLON,
    DOT,
    COLON,
    QUESTION,

    // Brackets
    L_BRACE,
    R_BRACE,
    L_PAREN,
    R_PAREN,
    L_SQUARE,
    R_SQUARE,

    // Literals
    CHARACTER,
    NUMBER,
    BOOLEAN,
    STRING,
    NAME,

    EOF,
}

impl TokenKind {
    /// The precedence level of this token when used as an operator, or
    /// `None` when the token is not an operator. Lower levels bind tighter.
    /// The parity of a level encodes associativity: even levels are
    /// left-associative, odd levels are right-associative.
    pub fn precedence(&self) -> Option<i32> {
        use TokenKind::*;

        let level = match self {
            UNARY_PLUS | UNARY_MINUS | UNARY_REF | UNARY_DEREF | BIT_NOT | BANG => 7,
            STAR | SLASH | MODULO => 10,
            PLUS | MINUS => 12,
            LESS | LESS_EQ | GREATER | GREATER_EQ => 18,
            EQ_EQ | BANG_EQ => 20,
            BIT_AND => 22,
            BIT_XOR => 24,
            BIT_OR => 26,
            LOGIC_AND => 28,
            LOGIC_XOR => 30,
            LOGIC_OR => 32,
            PLUS_EQ | MINUS_EQ | STAR_EQ | SLASH_EQ | MODULO_EQ | OR_EQ | AND_EQ | XOR_EQ
            | EQUALS => 35,
            _ => return None,
        };

        Some(level)
    }

    /// Whether this operator token also has a unary form.
    pub fn has_unary_form(&self) -> bool {
        use TokenKind::*;
        matches!(self, PLUS | MINUS | STAR | BIT_AND | BIT_NOT | BANG)
    }

    /// Rewrites an operator token to its unary form. Tokens without a
    /// distinct unary spelling (`~`, `!`) are returned unchanged.
    pub fn to_unary_form(self) -> TokenKind {
        match self {
            TokenKind::PLUS => TokenKind::UNARY_PLUS,
            TokenKind::MINUS => TokenKind::UNARY_MINUS,
            TokenKind::STAR => TokenKind::UNARY_DEREF,
            TokenKind::BIT_AND => TokenKind::UNARY_REF,
            _ => self,
        }
    }

    /// Whether this token is consumed by one (unary) or two (binary)
    /// operands when applied by the expression parser.
    pub fn is_unary_operator(&self) -> bool {
        self.precedence() == Some(7)
    }

    /// Tokens that terminate expression parsing without being consumed.
    pub fn ends_expression(&self) -> bool {
        use TokenKind::*;
        matches!(self, COMMA | SEMICOLON | L_BRACE | DO_KW)
    }

    /// Whether a token of this kind can begin an expression.
    pub fn starts_expression(&self) -> bool {
        use TokenKind::*;
        matches!(self, CHARACTER | NUMBER | BOOLEAN | STRING | NAME | L_PAREN)
            || self.has_unary_form()
    }

    /// The display spelling of this token kind, used by diagnostics and
    /// the AST printer.
    pub fn name(&self) -> &'static str {
        use TokenKind::*;

        match self {
            ELSE_KW => "else",
            FUNCTION_KW => "function",
            FOR_KW => "for",
            IF_KW => "if",
            RETURN_KW => "return",
            VAR_KW => "var",
            WHILE_KW => "while",
            DO_KW => "do",
            PLUS | UNARY_PLUS => "+",
            MINUS | UNARY_MINUS => "-",
            STAR | UNARY_DEREF => "*",
            SLASH => "/",
            MODULO => "%",
            BIT_OR => "|",
            BIT_AND | UNARY_REF => "&",
            BIT_XOR => "^",
            BIT_NOT => "~",
            PLUS_EQ => "+=",
            MINUS_EQ => "-=",
            STAR_EQ => "*=",
            SLASH_EQ => "/=",
            MODULO_EQ => "%=",
            OR_EQ => "|=",
            AND_EQ => "&=",
            XOR_EQ => "^=",
            EQUALS => "=",
            BANG => "!",
            BANG_EQ => "!=",
            EQ_EQ => "==",
            LESS => "<",
            LESS_EQ => "<=",
            GREATER => ">",
            GREATER_EQ => ">=",
            LOGIC_OR => "||",
            LOGIC_AND => "&&",
            LOGIC_XOR => "^^",
            COMMA => ",",
            SEMICOLON => ";",
            DOT => ".",
            COLON => ":",
            QUESTION => "?",
            L_BRACE => "{",
            R_BRACE => "}",
            L_PAREN => "(",
            R_PAREN => ")",
            L_SQUARE => "[",
            R_SQUARE => "]",
            CHARACTER => "character",
            NUMBER => "number",
            BOOLEAN => "boolean",
            STRING => "string",
            NAME => "name",
            EOF => "EOF",
        }
    }
}

/// Maps a keyword string to a token kind.
///
/// # Parameters
/// - `id`: The identifier's string name.
pub fn make_identifier_kind(id: &str) -> TokenKind {
    match id {
        "else" => TokenKind::ELSE_KW,
        "function" => TokenKind::FUNCTION_KW,
        "for" => TokenKind::FOR_KW,
        "if" => TokenKind::IF_KW,
        "return" => TokenKind::RETURN_KW,
        "var" => TokenKind::VAR_KW,
        "while" => TokenKind::WHILE_KW,
        "do" => TokenKind::DO_KW,
        "true" | "false" => TokenKind::BOOLEAN,
        _ => TokenKind::NAME,
    }
}
