//! Read-evaluate-emit session.
//!
//! Each input line is parsed, annotated and lowered before the next one is
//! read. The first error of any kind ends the session: `EXIT 1` is written in
//! place of further instructions and the error is handed back to the caller.

use std::io::{self, BufRead, Write};

use thiserror::Error;
use tracing::{debug, error, info};

use crate::codegen::{CodeGenerator, CodegenError, Instruction};
use crate::lexer::Scanner;
use crate::parser::{Parser, ParserError, Statement, DEFAULT_MAX_NESTING};
use crate::symbol::{SymbolError, SymbolTable};

/// Prompt printed to stderr before each statement in interactive mode
pub const PROMPT: &str = ">> ";

/// Error classes reported to the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Syntax,
    UndefinedVariable,
    StoreCapacityExceeded,
    DivideByConstantZero,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            ErrorKind::Syntax => "syntax error",
            ErrorKind::UndefinedVariable => "variable not defined",
            ErrorKind::StoreCapacityExceeded => "out of memory",
            ErrorKind::DivideByConstantZero => "divide by constant zero",
        };
        write!(f, "{}", s)
    }
}

/// Fatal session errors
#[derive(Error, Debug)]
pub enum CompileError {
    #[error(transparent)]
    Parser(#[from] ParserError),

    #[error(transparent)]
    Codegen(#[from] CodegenError),

    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),
}

impl CompileError {
    /// Error class, `None` for output failures
    #[must_use]
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            CompileError::Parser(ParserError::LexerError(crate::lexer::LexerError::Io(_))) => None,
            CompileError::Parser(_) => Some(ErrorKind::Syntax),
            CompileError::Codegen(CodegenError::UndefinedVariable(..)) => Some(ErrorKind::UndefinedVariable),
            CompileError::Codegen(CodegenError::DivideByZero(_)) => Some(ErrorKind::DivideByConstantZero),
            CompileError::Codegen(CodegenError::Symbol(SymbolError::TableFull { .. })) => {
                Some(ErrorKind::StoreCapacityExceeded)
            }
            CompileError::Output(_) => None,
        }
    }
}

/// Session settings
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Number of variables the store can hold
    pub capacity: usize,
    /// Print a prompt to stderr before each statement
    pub prompt: bool,
    /// Deepest nesting of parentheses, signs and assignments a statement may use
    pub max_nesting: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            capacity: crate::symbol::DEFAULT_CAPACITY,
            prompt: false,
            max_nesting: DEFAULT_MAX_NESTING,
        }
    }
}

pub struct Session<R, W> {
    parser: Parser<Scanner<R>>,
    codegen: CodeGenerator,
    output: W,
    options: SessionOptions,
    statements: usize,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, output: W, options: SessionOptions) -> Self {
        Self {
            parser: Parser::with_max_nesting(Scanner::new(input), options.max_nesting),
            codegen: CodeGenerator::new(SymbolTable::with_capacity(options.capacity)),
            output,
            options,
            statements: 0,
        }
    }

    /// Variable store as it stands
    #[must_use]
    pub fn symbols(&self) -> &SymbolTable {
        self.codegen.symbols()
    }

    /// Number of statements compiled so far
    #[must_use]
    pub fn statements(&self) -> usize {
        self.statements
    }

    /// Run until end of input or the first error
    /// # Errors
    /// The error that ended the session, after `EXIT 1` has been written.
    pub fn run(&mut self) -> Result<(), CompileError> {
        info!(capacity = self.options.capacity, "starting session");

        match self.run_statements() {
            Ok(()) => {
                let finish = self.codegen.finish();
                self.write_instructions(&finish)?;
                self.output.flush()?;
                info!(statements = self.statements, "session finished");
                Ok(())
            }
            Err(err) => {
                error!(%err, kind = ?err.kind(), statements = self.statements, "session aborted");
                if !matches!(err, CompileError::Output(_)) {
                    self.write_instructions(&[Instruction::Exit(1)])?;
                    self.output.flush()?;
                }
                Err(err)
            }
        }
    }

    fn run_statements(&mut self) -> Result<(), CompileError> {
        loop {
            if self.options.prompt {
                eprint!("{PROMPT}");
            }

            let mut expr = match self.parser.parse_statement()? {
                Statement::EndOfInput => return Ok(()),
                Statement::Empty => continue,
                Statement::Expression(expr) => expr,
            };

            debug!(statement = self.statements, tree = %expr, "compiling");
            let compiled = self.codegen.compile(&mut expr)?;
            self.write_instructions(&compiled.instructions)?;
            self.statements += 1;
        }
    }

    fn write_instructions(&mut self, instructions: &[Instruction]) -> Result<(), CompileError> {
        for instruction in instructions {
            writeln!(self.output, "{instruction}")?;
        }
        self.output.flush()?;
        Ok(())
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

/// Compile all of `input` and return the emitted instruction text
/// # Errors
/// The first error; the returned text is lost, use [`Session`] to keep it.
pub fn compile_str(input: &str) -> Result<String, CompileError> {
    let mut session = Session::new(input.as_bytes(), Vec::new(), SessionOptions::default());
    session.run()?;
    Ok(String::from_utf8_lossy(&session.into_output()).into_owned())
}
