use thiserror::Error;
use crate::lexer::Position;
use crate::symbol::SymbolError;

/// Code generation error types
#[derive(Error, Debug)]
pub enum CodegenError {
    #[error("Variable '{0}' not defined at {1}")]
    UndefinedVariable(String, Position),

    #[error("Divide by constant zero at {0}")]
    DivideByZero(Position),

    #[error(transparent)]
    Symbol(#[from] SymbolError),
}
