use crate::lexer::{LexerError, Position, Token, TokenKind};
use std::collections::VecDeque;
use std::io::BufRead;

/// Anything the parser can pull tokens from.
pub trait TokenSource {
    /// Produce the next token. Once `Eof` is reached it is returned forever.
    fn next_token(&mut self) -> Result<Token, LexerError>;
}

/// Streaming scanner that reads its input one line at a time, so a
/// statement can be compiled before the following line is read.
pub struct Scanner<R> {
    reader: R,
    buffer: Vec<char>,
    current: usize,
    line: usize,
    column: usize,
    exhausted: bool,
}

impl<R: BufRead> Scanner<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: Vec::new(),
            current: 0,
            line: 0,
            column: 1,
            exhausted: false,
        }
    }

    pub fn scan_all(&mut self) -> Result<Vec<Token>, LexerError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.scan_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn current_position(&self) -> Position {
        Position::new(self.line.max(1), self.column)
    }

    /// Refill the line buffer if it has been consumed. Returns false at end of input.
    fn fill(&mut self) -> Result<bool, LexerError> {
        if self.current < self.buffer.len() {
            return Ok(true);
        }
        if self.exhausted {
            return Ok(false);
        }

        let mut bytes = Vec::new();
        let read = self.reader.read_until(b'\n', &mut bytes)?;
        if read == 0 {
            self.exhausted = true;
            return Ok(false);
        }

        // Invalid UTF-8 becomes U+FFFD and is scanned as an unknown character
        let mut text = String::from_utf8_lossy(&bytes).into_owned();

        // A final line without a terminator still ends its statement
        if !text.ends_with('\n') {
            text.push('\n');
        }

        self.buffer = text.chars().collect();
        self.current = 0;
        self.line += 1;
        self.column = 1;
        Ok(true)
    }

    fn peek(&self) -> Option<char> {
        self.buffer.get(self.current).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.current += 1;
        self.column += 1;
        Some(ch)
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t')) {
            self.advance();
        }
    }

    fn scan_token(&mut self) -> Result<Token, LexerError> {
        if !self.fill()? {
            return Ok(Token::new(TokenKind::Eof, self.current_position(), String::new()));
        }

        self.skip_whitespace();

        let start_pos = self.current_position();
        let start_idx = self.current;

        // The buffer always ends with '\n', so whitespace never runs off the end
        let Some(ch) = self.advance() else {
            return Ok(Token::new(TokenKind::Eof, start_pos, String::new()));
        };

        let kind = match ch {
            '(' => TokenKind::OpenParen,
            ')' => TokenKind::CloseParen,
            '*' => TokenKind::Asterisk,
            '/' => TokenKind::Slash,
            '&' => TokenKind::Ampersand,
            '|' => TokenKind::Pipe,
            '^' => TokenKind::Caret,
            '=' => TokenKind::Assign,

            '\n' => {
                return Ok(Token::new(TokenKind::Newline, start_pos, String::new()));
            }

            '+' => {
                if self.match_char('+') {
                    TokenKind::Increment
                } else {
                    TokenKind::Plus
                }
            }
            '-' => {
                if self.match_char('-') {
                    TokenKind::Decrement
                } else {
                    TokenKind::Minus
                }
            }

            '0'..='9' => return self.scan_number(start_pos, start_idx),

            ch if ch.is_ascii_alphabetic() || ch == '_' => {
                return Ok(self.scan_identifier(start_pos, start_idx));
            }

            other => TokenKind::Unknown(other),
        };

        Ok(Token::new(kind, start_pos, self.lexeme_from(start_idx)))
    }

    fn lexeme_from(&self, start_idx: usize) -> String {
        self.buffer[start_idx..self.current].iter().collect()
    }

    fn scan_number(&mut self, start_pos: Position, start_idx: usize) -> Result<Token, LexerError> {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        let lexeme = self.lexeme_from(start_idx);
        let value: i32 = lexeme
            .parse()
            .map_err(|_| LexerError::InvalidNumber(lexeme.clone(), start_pos))?;
        Ok(Token::new(TokenKind::Integer(value), start_pos, lexeme))
    }

    fn scan_identifier(&mut self, start_pos: Position, start_idx: usize) -> Token {
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.advance();
        }

        let text = self.lexeme_from(start_idx);
        Token::new(TokenKind::Identifier(text.clone()), start_pos, text)
    }
}

impl<R: BufRead> TokenSource for Scanner<R> {
    fn next_token(&mut self) -> Result<Token, LexerError> {
        self.scan_token()
    }
}

/// Pre-tokenized input. Keeps yielding `Eof` once drained.
impl TokenSource for VecDeque<Token> {
    fn next_token(&mut self) -> Result<Token, LexerError> {
        match self.pop_front() {
            Some(token) => Ok(token),
            None => Ok(Token::new(TokenKind::Eof, Position::default(), String::new())),
        }
    }
}

// Convenience function for tokenizing input
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexerError> {
    let mut scanner = Scanner::new(input.as_bytes());
    scanner.scan_all()
}
