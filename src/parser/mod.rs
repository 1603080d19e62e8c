pub mod ast;
mod errors;
pub mod expressions;
pub mod statements;

pub use ast::*;
pub use errors::*;
pub use expressions::{Parser, DEFAULT_MAX_NESTING};
