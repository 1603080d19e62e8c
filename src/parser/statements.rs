use tracing::debug;

use crate::lexer::{TokenKind, TokenSource};
use crate::parser::expressions::Parser;
use crate::parser::{ParserError, Statement};

impl<S: TokenSource> Parser<S> {
    /// Parse one line: end of input, a blank line, or an expression ended by a newline
    /// # Errors
    /// Any syntax error; the statement's remaining tokens are left unread.
    pub fn parse_statement(&mut self) -> Result<Statement, ParserError> {
        if self.check(&TokenKind::Eof)? {
            return Ok(Statement::EndOfInput);
        }

        if self.check(&TokenKind::Newline)? {
            self.advance()?;
            return Ok(Statement::Empty);
        }

        let expr = self.parse_expression()?;

        let next = self.peek()?;
        if !next.kind.same_tag(&TokenKind::Newline) {
            return Err(ParserError::UnexpectedToken(next.kind.to_string(), next.pos));
        }
        self.advance()?;

        debug!(tree = %expr, "parsed statement");
        Ok(Statement::Expression(expr))
    }

    /// Parse statements until end of input
    /// # Errors
    /// The first syntax error encountered.
    pub fn parse_all(&mut self) -> Result<Vec<Statement>, ParserError> {
        let mut statements = Vec::new();
        loop {
            match self.parse_statement()? {
                Statement::EndOfInput => return Ok(statements),
                statement => statements.push(statement),
            }
        }
    }
}
