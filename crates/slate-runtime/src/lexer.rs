//! Lexical analysis (tokenization)
//!
//! The lexer converts Slate source code into a stream of tokens with span
//! and line information.

use crate::diagnostic::{error_codes, Diagnostic};
use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Lexer state for tokenizing source code
pub struct Lexer {
    /// Characters of source code
    chars: Vec<char>,
    /// Current position in chars
    current: usize,
    /// Current line number (1-indexed)
    line: u32,
    /// Start position of current token
    start_pos: usize,
    /// Start line of current token
    start_line: u32,
    /// Collected diagnostics
    diagnostics: Vec<Diagnostic>,
}

impl Lexer {
    /// Create a new lexer for the given source code
    pub fn new(source: impl AsRef<str>) -> Self {
        Self {
            chars: source.as_ref().chars().collect(),
            current: 0,
            line: 1,
            start_pos: 0,
            start_line: 1,
            diagnostics: Vec::new(),
        }
    }

    /// Tokenize the source code, returning tokens and any diagnostics
    pub fn tokenize(&mut self) -> (Vec<Token>, Vec<Diagnostic>) {
        let mut tokens = Vec::new();

        loop {
            match self.next_token() {
                Some(token) => {
                    let is_eof = token.kind == TokenKind::Eof;
                    tokens.push(token);
                    if is_eof {
                        break;
                    }
                }
                // Bad character: diagnostic already recorded, keep scanning
                None => continue,
            }
        }

        (tokens, std::mem::take(&mut self.diagnostics))
    }

    /// Scan the next token; `None` if an unexpected character was skipped
    fn next_token(&mut self) -> Option<Token> {
        self.skip_whitespace_and_comments();

        self.start_pos = self.current;
        self.start_line = self.line;

        if self.is_at_end() {
            return Some(self.make_token(TokenKind::Eof, ""));
        }

        let c = self.advance();

        match c {
            // Single-character tokens
            '(' => Some(self.make_token(TokenKind::LeftParen, "(")),
            ')' => Some(self.make_token(TokenKind::RightParen, ")")),
            '{' => Some(self.make_token(TokenKind::LeftBrace, "{")),
            '}' => Some(self.make_token(TokenKind::RightBrace, "}")),
            '[' => Some(self.make_token(TokenKind::LeftBracket, "[")),
            ']' => Some(self.make_token(TokenKind::RightBracket, "]")),
            ';' => Some(self.make_token(TokenKind::Semicolon, ";")),
            ',' => Some(self.make_token(TokenKind::Comma, ",")),
            '+' => Some(self.make_token(TokenKind::Plus, "+")),
            '-' => Some(self.make_token(TokenKind::Minus, "-")),
            '*' => Some(self.make_token(TokenKind::Star, "*")),
            '/' => Some(self.make_token(TokenKind::Slash, "/")),
            '%' => Some(self.make_token(TokenKind::Percent, "%")),
            '!' => Some(self.make_token(TokenKind::Bang, "!")),

            // One-or-two-character tokens
            '=' => {
                if self.match_char('=') {
                    Some(self.make_token(TokenKind::EqualEqual, "=="))
                } else {
                    Some(self.make_token(TokenKind::Equal, "="))
                }
            }
            '<' => {
                if self.match_char('=') {
                    Some(self.make_token(TokenKind::LessEqual, "<="))
                } else {
                    Some(self.make_token(TokenKind::Less, "<"))
                }
            }
            '>' => {
                if self.match_char('=') {
                    Some(self.make_token(TokenKind::GreaterEqual, ">="))
                } else {
                    Some(self.make_token(TokenKind::Greater, ">"))
                }
            }

            // Numbers
            c if c.is_ascii_digit() => Some(self.number()),

            // Identifiers and keywords
            c if c.is_ascii_alphabetic() || c == '_' => Some(self.identifier()),

            // Unexpected character
            _ => {
                self.diagnostics.push(Diagnostic::error_with_code(
                    error_codes::UNEXPECTED_CHARACTER,
                    format!("unexpected character '{}'", c),
                    self.current_span(),
                ));
                None
            }
        }
    }

    /// Skip whitespace and `//` line comments
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            if self.is_at_end() {
                return;
            }

            match self.peek() {
                ' ' | '\r' | '\t' => {
                    self.advance();
                }
                '\n' => {
                    self.advance();
                    self.line += 1;
                }
                '/' => {
                    if self.peek_next() == Some('/') {
                        while !self.is_at_end() && self.peek() != '\n' {
                            self.advance();
                        }
                    } else {
                        return;
                    }
                }
                _ => return,
            }
        }
    }

    /// Scan an integer literal
    fn number(&mut self) -> Token {
        while !self.is_at_end() && self.peek().is_ascii_digit() {
            self.advance();
        }
        let lexeme: String = self.chars[self.start_pos..self.current].iter().collect();
        self.make_token(TokenKind::Number, lexeme)
    }

    /// Scan an identifier or keyword
    fn identifier(&mut self) -> Token {
        while !self.is_at_end() {
            let c = self.peek();
            if c.is_ascii_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }

        let lexeme: String = self.chars[self.start_pos..self.current].iter().collect();
        let kind = match lexeme.as_str() {
            "func" => TokenKind::Func,
            "let" => TokenKind::Let,
            "set" => TokenKind::Set,
            "if" => TokenKind::If,
            "elif" => TokenKind::Elif,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            "return" => TokenKind::Return,
            _ => TokenKind::Identifier,
        };
        self.make_token(kind, lexeme)
    }

    fn make_token(&self, kind: TokenKind, lexeme: impl Into<String>) -> Token {
        Token::new(kind, lexeme, self.current_span())
    }

    fn current_span(&self) -> Span {
        Span::new(self.start_pos, self.current, self.start_line)
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.chars.len()
    }

    fn advance(&mut self) -> char {
        let c = self.chars[self.current];
        self.current += 1;
        c
    }

    fn peek(&self) -> char {
        self.chars[self.current]
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.current + 1).copied()
    }

    fn match_char(&mut self, expected: char) -> bool {
        if !self.is_at_end() && self.peek() == expected {
            self.current += 1;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        let (tokens, diagnostics) = lexer.tokenize();
        assert!(diagnostics.is_empty(), "lex errors: {:?}", diagnostics);
        tokens
    }

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_empty_source() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_number_literal() {
        let tokens = lex("42");
        assert_eq!(tokens[0].kind, TokenKind::Number);
        assert_eq!(tokens[0].lexeme, "42");
    }

    #[test]
    fn test_keywords() {
        assert_eq!(
            kinds("func let set if elif else while return"),
            vec![
                TokenKind::Func,
                TokenKind::Let,
                TokenKind::Set,
                TokenKind::If,
                TokenKind::Elif,
                TokenKind::Else,
                TokenKind::While,
                TokenKind::Return,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_identifier_not_keyword_prefix() {
        let tokens = lex("lettuce whiled");
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[0].lexeme, "lettuce");
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("+ - * / % ! = == < <= > >="),
            vec![
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Percent,
                TokenKind::Bang,
                TokenKind::Equal,
                TokenKind::EqualEqual,
                TokenKind::Less,
                TokenKind::LessEqual,
                TokenKind::Greater,
                TokenKind::GreaterEqual,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_two_char_operators_no_space() {
        // `==` must not lex as two `=`
        assert_eq!(
            kinds("a==b"),
            vec![
                TokenKind::Identifier,
                TokenKind::EqualEqual,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_declaration_statement() {
        let source = "let x = 15;";
        assert_eq!(
            kinds(source),
            vec![
                TokenKind::Let,
                TokenKind::Identifier,
                TokenKind::Equal,
                TokenKind::Number,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_while_loop_snippet() {
        let source = "while x >= 0 {\n    set x = x - 1;\n}";
        let tokens = lex(source);
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::While,
                TokenKind::Identifier,
                TokenKind::GreaterEqual,
                TokenKind::Number,
                TokenKind::LeftBrace,
                TokenKind::Set,
                TokenKind::Identifier,
                TokenKind::Equal,
                TokenKind::Identifier,
                TokenKind::Minus,
                TokenKind::Number,
                TokenKind::Semicolon,
                TokenKind::RightBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_line_tracking() {
        let tokens = lex("1\n2\n\n3");
        assert_eq!(tokens[0].span.line, 1);
        assert_eq!(tokens[1].span.line, 2);
        assert_eq!(tokens[2].span.line, 4);
    }

    #[test]
    fn test_line_comment_skipped() {
        let tokens = lex("1 // the answer\n2");
        assert_eq!(tokens.len(), 3); // 1, 2, Eof
        assert_eq!(tokens[1].lexeme, "2");
        assert_eq!(tokens[1].span.line, 2);
    }

    #[test]
    fn test_unexpected_character_reported() {
        let mut lexer = Lexer::new("let @ x");
        let (tokens, diagnostics) = lexer.tokenize();
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains('@'));
        // Scanning continues past the bad character
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
    }

    #[test]
    fn test_underscore_identifier() {
        let tokens = lex("_tmp x_1");
        assert_eq!(tokens[0].lexeme, "_tmp");
        assert_eq!(tokens[1].lexeme, "x_1");
    }
}
