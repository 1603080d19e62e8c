use crate::lexer::Position;
use std::fmt;

/// Token kinds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    // Punctuation
    OpenParen,          // (
    CloseParen,         // )

    // Arithmetic operators
    Plus,               // +
    Minus,              // -
    Asterisk,           // *
    Slash,              // /

    // Bitwise operators
    Ampersand,          // &
    Pipe,               // |
    Caret,              // ^

    // Prefix operators
    Increment,          // ++
    Decrement,          // --

    Assign,             // =

    // Literals and identifiers
    Integer(i32),
    Identifier(String),

    // Special tokens
    Newline,            // \n (statement terminator)
    Eof,                // End of input
    Unknown(char),
}

impl TokenKind {
    /// Whether two kinds are the same tag, ignoring any payload
    pub fn same_tag(&self, other: &TokenKind) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// A token with position information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: Position,
    pub lexeme: String,
}

impl Token {
    pub fn new(kind: TokenKind, pos: Position, lexeme: String) -> Self {
        Self { kind, pos, lexeme }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenKind::OpenParen => write!(f, "("),
            TokenKind::CloseParen => write!(f, ")"),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::Asterisk => write!(f, "*"),
            TokenKind::Slash => write!(f, "/"),
            TokenKind::Ampersand => write!(f, "&"),
            TokenKind::Pipe => write!(f, "|"),
            TokenKind::Caret => write!(f, "^"),
            TokenKind::Increment => write!(f, "++"),
            TokenKind::Decrement => write!(f, "--"),
            TokenKind::Assign => write!(f, "="),
            TokenKind::Integer(n) => write!(f, "{}", n),
            TokenKind::Identifier(s) => write!(f, "{}", s),
            TokenKind::Newline => write!(f, "\\n"),
            TokenKind::Eof => write!(f, "EOF"),
            TokenKind::Unknown(ch) => write!(f, "{}", ch.escape_default()),
        }
    }
}
