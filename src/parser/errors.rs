use thiserror::Error;
use crate::lexer::Position;

/// Parser error types. Every variant is a syntax error.
#[derive(Error, Debug)]
pub enum ParserError {
    #[error("Mismatched parenthesis at {0}")]
    MismatchedParen(Position),

    #[error("Number or identifier expected but found '{0}' at {1}")]
    ExpectedNumberOrIdentifier(String, Position),

    #[error("Identifier expected after '{0}' but found '{1}' at {2}")]
    InvalidIncDecTarget(String, String, Position),

    #[error("Chained increment/decrement after '{0}' at {1}")]
    ChainedIncDec(String, Position),

    #[error("Lvalue required as left operand of assignment at {0}")]
    NotAnLvalue(Position),

    #[error("Expression nested deeper than {0} levels at {1}")]
    NestingTooDeep(usize, Position),

    #[error("Unexpected token '{0}' at {1}")]
    UnexpectedToken(String, Position),

    #[error("Lexer error: {0}")]
    LexerError(#[from] crate::lexer::LexerError),
}
