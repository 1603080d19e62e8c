//! Register machine calculator compiler
//!
//! Reads one arithmetic statement per line and lowers each into instructions
//! for an idealized register machine, keeping variables in a small persistent
//! store across statements.

pub mod lexer;
pub mod parser;
pub mod symbol;
pub mod codegen;
pub mod driver;

pub use lexer::*;
pub use parser::*;
pub use symbol::*;
pub use codegen::*;
pub use driver::*;
