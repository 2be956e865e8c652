//! Source text to [`Token`]s.
//!
//! [`Scanner`] walks the source once, byte by byte, and yields one
//! `Result<Token>` per lexeme.  A bad character or an unterminated string
//! yields an `Err` and scanning resumes right after it, so a single pass
//! surfaces every lexical error.  The last item is always one `EOF` token.
//!
//! Everything the language itself recognises is ASCII.  Non‑ASCII text is only
//! valid inside string literals; anywhere else the whole character is
//! reported once.
//!
//! ```rust
//! use lox_interpreter::scanner::Scanner;
//!
//! for result in Scanner::new("print 123; // trailing comment") {
//!     match result {
//!         Ok(token) => println!("{}", token),
//!         Err(err) => eprintln!("{}", err),
//!     }
//! }
//! ```

use std::iter::FusedIterator;

use log::{debug, info};
use memchr::{memchr, memchr_iter};
use phf::phf_map;

use crate::diagnostics::Diagnostics;
use crate::error::{LoxError, Result};
use crate::token::{Token, TokenType};

static KEYWORDS: phf::Map<&'static str, TokenType> = phf_map! {
    "and"    => TokenType::AND,
    "class"  => TokenType::CLASS,
    "else"   => TokenType::ELSE,
    "false"  => TokenType::FALSE,
    "fun"    => TokenType::FUN,
    "for"    => TokenType::FOR,
    "if"     => TokenType::IF,
    "nil"    => TokenType::NIL,
    "or"     => TokenType::OR,
    "print"  => TokenType::PRINT,
    "return" => TokenType::RETURN,
    "super"  => TokenType::SUPER,
    "this"   => TokenType::THIS,
    "true"   => TokenType::TRUE,
    "var"    => TokenType::VAR,
    "while"  => TokenType::WHILE,
};

/// Check that raw input is UTF‑8 and borrow it as source text.
pub fn decode_source(bytes: &[u8]) -> Result<&str> {
    Ok(std::str::from_utf8(bytes)?)
}

pub struct Scanner<'a> {
    text: &'a str,
    bytes: &'a [u8],
    /// First byte of the lexeme being scanned.
    start: usize,
    /// Next unread byte.
    pos: usize,
    line: usize,
    finished: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a str) -> Self {
        info!("Scanner created over {} bytes", text.len());

        Self {
            text,
            bytes: text.as_bytes(),
            start: 0,
            pos: 0,
            line: 1,
            finished: false,
        }
    }

    #[inline]
    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    #[inline]
    fn peek_next(&self) -> Option<u8> {
        self.bytes.get(self.pos + 1).copied()
    }

    /// Consume the next byte if it is `expected`.
    #[inline]
    fn eat(&mut self, expected: u8) -> bool {
        let hit: bool = self.peek() == Some(expected);
        if hit {
            self.pos += 1;
        }
        hit
    }

    /// `long` if the next byte is `second` (consuming it), `short` otherwise.
    #[inline]
    fn either(&mut self, second: u8, long: TokenType, short: TokenType) -> TokenType {
        if self.eat(second) {
            long
        } else {
            short
        }
    }

    #[inline]
    fn skip_while(&mut self, pred: impl Fn(u8) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }
    }

    #[inline]
    fn lexeme(&self) -> &'a str {
        &self.text[self.start..self.pos]
    }

    /// Scan from `self.start`.  `Ok(None)` means the bytes were trivia
    /// (whitespace, newline or comment) and produced no token.
    fn lex_one(&mut self) -> Result<Option<TokenType>> {
        let byte: u8 = self.bytes[self.pos];
        self.pos += 1;

        let kind: TokenType = match byte {
            b'(' => TokenType::LEFT_PAREN,
            b')' => TokenType::RIGHT_PAREN,
            b'{' => TokenType::LEFT_BRACE,
            b'}' => TokenType::RIGHT_BRACE,
            b',' => TokenType::COMMA,
            b'.' => TokenType::DOT,
            b'-' => TokenType::MINUS,
            b'+' => TokenType::PLUS,
            b';' => TokenType::SEMICOLON,
            b'*' => TokenType::STAR,

            b'!' => self.either(b'=', TokenType::BANG_EQUAL, TokenType::BANG),
            b'=' => self.either(b'=', TokenType::EQUAL_EQUAL, TokenType::EQUAL),
            b'<' => self.either(b'=', TokenType::LESS_EQUAL, TokenType::LESS),
            b'>' => self.either(b'=', TokenType::GREATER_EQUAL, TokenType::GREATER),

            b'/' if self.eat(b'/') => {
                // Leave the newline for the next call so the line count stays right.
                self.pos = memchr(b'\n', &self.bytes[self.pos..])
                    .map_or(self.bytes.len(), |offset| self.pos + offset);
                return Ok(None);
            }
            b'/' => TokenType::SLASH,

            b' ' | b'\r' | b'\t' => return Ok(None),
            b'\n' => {
                self.line += 1;
                return Ok(None);
            }

            b'"' => self.string()?,
            b'0'..=b'9' => self.number(),
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.identifier(),

            _ => return Err(self.unexpected()),
        };

        Ok(Some(kind))
    }

    /// Body of a string literal; the opening quote is already consumed.
    /// Newlines inside the literal are counted.
    fn string(&mut self) -> Result<TokenType> {
        let rest: &[u8] = &self.bytes[self.pos..];

        let Some(close) = memchr(b'"', rest) else {
            self.line += memchr_iter(b'\n', rest).count();
            self.pos = self.bytes.len();
            return Err(LoxError::lex(self.line, "Unterminated string."));
        };

        let body: &str = &self.text[self.pos..self.pos + close];
        self.line += memchr_iter(b'\n', body.as_bytes()).count();
        self.pos += close + 1;

        Ok(TokenType::STRING(body.to_owned()))
    }

    /// Digits with an optional `.digits` part.  A trailing `.` is left alone.
    fn number(&mut self) -> TokenType {
        self.skip_while(|b| b.is_ascii_digit());

        if self.peek() == Some(b'.') && self.peek_next().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
            self.skip_while(|b| b.is_ascii_digit());
        }

        // Only ASCII digits and at most one interior '.' were consumed.
        TokenType::NUMBER(self.lexeme().parse().unwrap_or_default())
    }

    fn identifier(&mut self) -> TokenType {
        self.skip_while(|b| b.is_ascii_alphanumeric() || b == b'_');

        KEYWORDS
            .get(self.lexeme())
            .cloned()
            .unwrap_or(TokenType::IDENTIFIER)
    }

    /// Report the character at `self.start` and step over all of its bytes.
    fn unexpected(&mut self) -> LoxError {
        let c: char = self.text[self.start..]
            .chars()
            .next()
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        self.pos = self.start + c.len_utf8();

        LoxError::lex(self.line, format!("Unexpected character: {}", c))
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            self.start = self.pos;

            if self.at_end() {
                self.finished = true;
                debug!("Reached end of input on line {}", self.line);
                return Some(Ok(Token::eof(self.line)));
            }

            match self.lex_one() {
                Ok(Some(kind)) => return Some(Ok(Token::new(kind, self.lexeme(), self.line))),
                Ok(None) => continue,
                Err(err) => return Some(Err(err)),
            }
        }
    }
}

impl<'a> FusedIterator for Scanner<'a> {}

/// Scan all of `source`, reporting lexing errors into `diagnostics`.
///
/// The returned sequence always ends with an `EOF` token.
pub fn tokenize(source: &str, diagnostics: &mut Diagnostics) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::new();

    for result in Scanner::new(source) {
        match result {
            Ok(token) => tokens.push(token),
            Err(e) => diagnostics.report(e),
        }
    }

    info!("Tokenized {} token(s)", tokens.len());

    tokens
}
