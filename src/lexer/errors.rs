use thiserror::Error;

/// Position in source input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    pub fn start() -> Self {
        Self { line: 1, column: 1 }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Lexer error types
#[derive(Error, Debug)]
pub enum LexerError {
    #[error("Invalid number format '{0}' at {1}")]
    InvalidNumber(String, Position),

    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),
}
