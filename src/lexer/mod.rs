use crate::errors::ErrorReport;
use crate::lexer::tokens::{make_identifier_kind, Token, TokenKind};

// Submodules
pub mod tokens;

/// Represents Tern's lexical scanner, which converts source text into a
/// finite sequence of tokens terminated by an end-of-file token.
pub struct Lexer {
    /// A flat list of characters from the source file.
    source: Vec<char>,
    /// The index of the current character.
    current: usize,
    /// The current line number.
    line_num: usize,
    /// The position in the flat source vector of the first character
    /// for the current line.
    line_start: usize,
    /// The position of the first character for the current token.
    token_start: usize,
}

impl Lexer {
    /// Scans a string of source text into a list of tokens.
    ///
    /// # Parameters
    /// - `src`: The source string for the program.
    ///
    /// # Returns
    /// - `Ok(Vec<Token>)`: The scanned tokens, ending with an `EOF` token.
    /// - `Err(ErrorReport)`: The first lexical error in the program.
    pub fn lex(src: &str) -> Result<Vec<Token>, ErrorReport> {
        let mut lexer = Lexer {
            source: src.chars().collect(),
            current: 0,
            line_num: 1,
            line_start: 0,
            token_start: 0,
        };

        let mut tokens = Vec::new();

        loop {
            let token = lexer.next_token()?;
            let is_eof = token.kind == TokenKind::EOF;
            tokens.push(token);

            if is_eof {
                break;
            }
        }

        Ok(tokens)
    }

    /// Scans the next token out of the source.
    fn next_token(&mut self) -> Result<Token, ErrorReport> {
        self.skip_whitespace();
        self.token_start = self.current;

        if self.is_at_end() {
            return Ok(self.make_token(TokenKind::EOF));
        }

        let c = self.advance();

        let kind = match c {
            '{' => TokenKind::L_BRACE,
            '}' => TokenKind::R_BRACE,
            '(' => TokenKind::L_PAREN,
            ')' => TokenKind::R_PAREN,
            '[' => TokenKind::L_SQUARE,
            ']' => TokenKind::R_SQUARE,
            ',' => TokenKind::COMMA,
            ';' => TokenKind::SEMICOLON,
            '.' => TokenKind::DOT,
            ':' => TokenKind::COLON,
            '?' => TokenKind::QUESTION,
            '~' => TokenKind::BIT_NOT,
            '+' => self.pick('=', TokenKind::PLUS_EQ, TokenKind::PLUS),
            '-' => self.pick('=', TokenKind::MINUS_EQ, TokenKind::MINUS),
            '*' => self.pick('=', TokenKind::STAR_EQ, TokenKind::STAR),
            '/' => self.pick('=', TokenKind::SLASH_EQ, TokenKind::SLASH),
            '%' => self.pick('=', TokenKind::MODULO_EQ, TokenKind::MODULO),
            '=' => self.pick('=', TokenKind::EQ_EQ, TokenKind::EQUALS),
            '!' => self.pick('=', TokenKind::BANG_EQ, TokenKind::BANG),
            '<' => self.pick('=', TokenKind::LESS_EQ, TokenKind::LESS),
            '>' => self.pick('=', TokenKind::GREATER_EQ, TokenKind::GREATER),
            '|' => {
                if self.matches('|') {
                    TokenKind::LOGIC_OR
                } else {
                    self.pick('=', TokenKind::OR_EQ, TokenKind::BIT_OR)
                }
            }
            '&' => {
                if self.matches('&') {
                    TokenKind::LOGIC_AND
                } else {
                    self.pick('=', TokenKind::AND_EQ, TokenKind::BIT_AND)
                }
            }
            '^' => {
                if self.matches('^') {
                    TokenKind::LOGIC_XOR
                } else {
                    self.pick('=', TokenKind::XOR_EQ, TokenKind::BIT_XOR)
                }
            }
            '"' => return self.make_string_token(),
            '\'' => return self.make_character_token(),
            _ if c.is_ascii_digit() => return Ok(self.make_number_token()),
            _ if c.is_alphabetic() || c == '_' => return Ok(self.make_identifier_token()),
            _ => {
                return Err(self.error_at_current(&format!("Unexpected character '{}'.", c)));
            }
        };

        Ok(self.make_token(kind))
    }

    /// Gets the current character without consuming it.
    fn get_current(&self) -> char {
        self.source[self.current]
    }

    /// Checks if the scanner is at the end of the source.
    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    /// Advances to the next char and returns the consumed char.
    fn advance(&mut self) -> char {
        let current = self.get_current();
        self.current += 1;
        current
    }

    /// Matches the current character against a provided character,
    /// consuming it on success.
    fn matches(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.get_current() != expected {
            return false;
        }
        self.current += 1;
        true
    }

    /// Consumes `expected` and returns `on_match`, or returns `otherwise`.
    fn pick(&mut self, expected: char, on_match: TokenKind, otherwise: TokenKind) -> TokenKind {
        if self.matches(expected) {
            on_match
        } else {
            otherwise
        }
    }

    /// Skips whitespace-like characters and line comments.
    fn skip_whitespace(&mut self) {
        loop {
            if self.is_at_end() {
                break;
            }

            let c = self.get_current();

            if c == ' ' || c == '\r' || c == '\t' {
                self.advance();
            } else if c == '\n' {
                self.line_num += 1;
                self.line_start = self.current + 1;
                self.advance();
            } else if c == '/' && self.current + 1 < self.source.len() && self.source[self.current + 1] == '/' {
                while !self.is_at_end() && self.get_current() != '\n' {
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    /// Generates a number token with the current state of the scanner.
    fn make_number_token(&mut self) -> Token {
        while !self.is_at_end() && self.get_current().is_ascii_digit() {
            self.advance();
        }

        self.make_token(TokenKind::NUMBER)
    }

    /// Generates an identifier, keyword, or boolean token with the
    /// current state of the scanner.
    fn make_identifier_token(&mut self) -> Token {
        while !self.is_at_end() {
            let c = self.get_current();

            if c.is_alphabetic() || c.is_ascii_digit() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }

        let id: String = self.source[self.token_start..self.current].iter().collect();
        self.make_token(make_identifier_kind(id.as_str()))
    }

    /// Generates a string token, or an error when the literal never closes.
    fn make_string_token(&mut self) -> Result<Token, ErrorReport> {
        while !self.is_at_end() && self.get_current() != '"' {
            if self.get_current() == '\n' {
                break;
            }
            self.advance();
        }

        if self.is_at_end() || self.get_current() != '"' {
            return Err(self.error_at_current("Unterminated string literal."));
        }

        self.advance();
        Ok(self.make_token(TokenKind::STRING))
    }

    /// Generates a character token, or an error when the literal never closes.
    fn make_character_token(&mut self) -> Result<Token, ErrorReport> {
        if self.is_at_end() {
            return Err(self.error_at_current("Unterminated character literal."));
        }

        self.advance();

        if self.is_at_end() || self.get_current() != '\'' {
            return Err(self.error_at_current("Unterminated character literal."));
        }

        self.advance();
        Ok(self.make_token(TokenKind::CHARACTER))
    }

    /// Generates a token with the current state of the scanner.
    fn make_token(&self, kind: TokenKind) -> Token {
        let lexeme = match kind {
            TokenKind::EOF => String::from("\0"),
            // Strip the quotes off string and character literals.
            TokenKind::STRING | TokenKind::CHARACTER => self.source
                [(self.token_start + 1)..(self.current - 1)]
                .iter()
                .collect(),
            _ => self.source[self.token_start..self.current].iter().collect(),
        };

        Token {
            line_num: self.line_num,
            column_start: self.token_start.saturating_sub(self.line_start),
            kind,
            lexeme,
        }
    }

    /// Generates an error report anchored at the current token start.
    fn error_at_current(&self, message: &str) -> ErrorReport {
        ErrorReport {
            line: self.line_num,
            column: self.token_start.saturating_sub(self.line_start),
            lexeme_len: (self.current - self.token_start).max(1),
            message: String::from(message),
        }
    }
}
