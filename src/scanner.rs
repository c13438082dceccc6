use std::str::Chars;

use peekmore::{PeekMore, PeekMoreIterator};

use crate::error::ScanError;
use crate::literal::Literal;
use crate::token::{Token, Type};

/// Converts source text into a flat list of tokens. Lexical errors (an
/// unterminated string, a stray character) don't stop scanning — they're
/// collected and returned alongside whatever tokens were produced.
pub struct Scanner<'a> {
    source: PeekMoreIterator<Chars<'a>>,
    tokens: Vec<Token>,
    errors: Vec<ScanError>,
    start_line: usize,
    line: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Scanner<'a> {
        Scanner {
            source: source.chars().peekmore(),
            tokens: Vec::new(),
            errors: Vec::new(),
            start_line: 1,
            line: 1,
        }
    }

    pub fn scan_tokens(mut self) -> (Vec<Token>, Vec<ScanError>) {
        while !self.is_at_end() {
            self.start_line = self.line;
            self.scan_token();
        }

        self.tokens.push(Token::new(Type::Eof, String::new(), None, self.line));

        (self.tokens, self.errors)
    }

    fn advance(&mut self) -> char {
        self.source.next().expect("advance to be called only when a character remains")
    }

    fn peek(&mut self) -> char {
        self.source.peek().copied().unwrap_or('\0')
    }

    fn peek_next(&mut self) -> char {
        self.source.peek_next().copied().unwrap_or('\0')
    }

    fn match_next(&mut self, expected: char) -> bool {
        if self.peek() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    fn is_at_end(&mut self) -> bool {
        self.source.peek().is_none()
    }

    fn add_token(&mut self, r#type: Type, lexeme: String, literal: Option<Literal>) {
        self.tokens.push(Token::new(r#type, lexeme, literal, self.start_line));
    }

    fn string(&mut self) {
        let mut value = String::new();

        while self.peek() != '"' && !self.is_at_end() {
            if self.peek() == '\n' {
                self.line += 1;
            }
            value.push(self.advance());
        }

        if self.is_at_end() {
            self.errors.push(ScanError { line: self.start_line, message: "Unterminated string.".to_string() });
            return;
        }

        self.advance(); // the closing quote

        self.add_token(Type::String, value.clone(), Some(Literal::String(value)));
    }

    fn number(&mut self, first: char) {
        let mut lexeme = String::from(first);

        while self.peek().is_ascii_digit() {
            lexeme.push(self.advance());
        }

        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            lexeme.push(self.advance()); // the dot

            while self.peek().is_ascii_digit() {
                lexeme.push(self.advance());
            }
        }

        let value: f64 = lexeme.parse().expect("a digit sequence to parse as a float");
        self.add_token(Type::Number, lexeme, Some(Literal::Number(value)));
    }

    fn identifier(&mut self, first: char) {
        let mut lexeme = String::from(first);

        while self.peek().is_ascii_alphanumeric() || self.peek() == '_' {
            lexeme.push(self.advance());
        }

        let r#type = match lexeme.as_str() {
            "and" => Type::And,
            "class" => Type::Class,
            "else" => Type::Else,
            "false" => Type::False,
            "for" => Type::For,
            "fun" => Type::Fun,
            "if" => Type::If,
            "nil" => Type::Nil,
            "or" => Type::Or,
            "print" => Type::Print,
            "return" => Type::Return,
            "super" => Type::Super,
            "this" => Type::This,
            "true" => Type::True,
            "var" => Type::Var,
            "while" => Type::While,
            _ => Type::Identifier,
        };

        self.add_token(r#type, lexeme, None);
    }

    fn scan_token(&mut self) {
        let c = self.advance();

        match c {
            '(' => self.add_token(Type::LeftParen, c.to_string(), None),
            ')' => self.add_token(Type::RightParen, c.to_string(), None),
            '{' => self.add_token(Type::LeftBrace, c.to_string(), None),
            '}' => self.add_token(Type::RightBrace, c.to_string(), None),
            ',' => self.add_token(Type::Comma, c.to_string(), None),
            '.' => self.add_token(Type::Dot, c.to_string(), None),
            '-' => self.add_token(Type::Minus, c.to_string(), None),
            '+' => self.add_token(Type::Plus, c.to_string(), None),
            ';' => self.add_token(Type::Semicolon, c.to_string(), None),
            '*' => self.add_token(Type::Star, c.to_string(), None),

            '!' => {
                if self.match_next('=') { self.add_token(Type::BangEqual, "!=".to_string(), None) }
                else { self.add_token(Type::Bang, "!".to_string(), None) }
            }
            '=' => {
                if self.match_next('=') { self.add_token(Type::EqualEqual, "==".to_string(), None) }
                else { self.add_token(Type::Equal, "=".to_string(), None) }
            }
            '<' => {
                if self.match_next('=') { self.add_token(Type::LessEqual, "<=".to_string(), None) }
                else { self.add_token(Type::Less, "<".to_string(), None) }
            }
            '>' => {
                if self.match_next('=') { self.add_token(Type::GreaterEqual, ">=".to_string(), None) }
                else { self.add_token(Type::Greater, ">".to_string(), None) }
            }
            '/' => {
                if self.match_next('/') {
                    while self.peek() != '\n' && !self.is_at_end() {
                        self.advance();
                    }
                } else {
                    self.add_token(Type::Slash, "/".to_string(), None);
                }
            }

            ' ' | '\r' | '\t' => {}

            '\n' => { self.line += 1; }

            '"' => self.string(),

            c if c.is_ascii_digit() => self.number(c),
            c if c.is_ascii_alphabetic() || c == '_' => self.identifier(c),

            _ => self.errors.push(ScanError { line: self.start_line, message: "Unexpected character.".to_string() }),
        }
    }
}
