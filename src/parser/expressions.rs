use tracing::debug;

use crate::lexer::{Position, Token, TokenKind, TokenSource};
use crate::parser::{BinaryOp, ExprKind, Expression, IncDecOp, ParserError, UnaryOp};

/// Default limit on nested parentheses, signs and assignments in one statement
pub const DEFAULT_MAX_NESTING: usize = 64;

pub struct Parser<S> {
    source: S,
    /// Lookahead token, fetched lazily so a consumed newline never blocks on the next line
    current: Option<Token>,
    depth: usize,
    max_nesting: usize,
}

impl<S: TokenSource> Parser<S> {
    #[must_use]
    pub fn new(source: S) -> Self {
        Self::with_max_nesting(source, DEFAULT_MAX_NESTING)
    }

    #[must_use]
    pub fn with_max_nesting(source: S, max_nesting: usize) -> Self {
        Self {
            source,
            current: None,
            depth: 0,
            max_nesting,
        }
    }

    /// Run `parse` one nesting level deeper, failing once the limit is reached
    fn nested<T>(
        &mut self,
        pos: Position,
        parse: impl FnOnce(&mut Self) -> Result<T, ParserError>,
    ) -> Result<T, ParserError> {
        if self.depth >= self.max_nesting {
            return Err(ParserError::NestingTooDeep(self.max_nesting, pos));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    /// Fetch the lookahead token if needed, skipping unknown characters
    fn fill(&mut self) -> Result<&Token, ParserError> {
        loop {
            if let Some(token) = self.current.take() {
                if let TokenKind::Unknown(ch) = token.kind {
                    debug!(ch = %ch.escape_default(), pos = %token.pos, "skipping unknown character");
                } else {
                    return Ok(&*self.current.insert(token));
                }
            }
            self.current = Some(self.source.next_token()?);
        }
    }

    /// Peek at current token without consuming it
    pub fn peek(&mut self) -> Result<&Token, ParserError> {
        self.fill()
    }

    /// Consume the current token and return it
    pub fn advance(&mut self) -> Result<Token, ParserError> {
        let token = self.fill()?.clone();
        self.current = None;
        Ok(token)
    }

    /// Check if current token has the same tag as `kind`, without consuming it
    pub fn check(&mut self, kind: &TokenKind) -> Result<bool, ParserError> {
        Ok(self.peek()?.kind.same_tag(kind))
    }

    /// Exact source text of the current token
    pub fn current_lexeme(&mut self) -> Result<&str, ParserError> {
        Ok(self.peek()?.lexeme.as_str())
    }

    /// Parse an expression, assignment included
    pub fn parse_expression(&mut self) -> Result<Expression, ParserError> {
        self.parse_assign()
    }

    /// Parse assignment (right-associative, identifier target only)
    fn parse_assign(&mut self) -> Result<Expression, ParserError> {
        let starts_with_identifier = self.check(&TokenKind::Identifier(String::new()))?;
        let target = self.parse_bitwise_or()?;

        if !self.check(&TokenKind::Assign)? {
            return Ok(target);
        }

        let assign = self.advance()?;
        let pos = target.pos;

        // `(x) = 1` parses to a bare variable too, so the leading token decides
        let name = match target.kind {
            ExprKind::Variable(name) if starts_with_identifier => name,
            _ => return Err(ParserError::NotAnLvalue(assign.pos)),
        };

        let value = self.nested(assign.pos, Self::parse_assign)?;

        Ok(Expression::new(
            ExprKind::Assign {
                name,
                value: Box::new(value),
            },
            assign.lexeme,
            pos,
        ))
    }

    /// Parse bitwise OR expressions
    fn parse_bitwise_or(&mut self) -> Result<Expression, ParserError> {
        self.parse_binary_expr(Self::parse_bitwise_xor, &[TokenKind::Pipe])
    }

    /// Parse bitwise XOR expressions
    fn parse_bitwise_xor(&mut self) -> Result<Expression, ParserError> {
        self.parse_binary_expr(Self::parse_bitwise_and, &[TokenKind::Caret])
    }

    /// Parse bitwise AND expressions
    fn parse_bitwise_and(&mut self) -> Result<Expression, ParserError> {
        self.parse_binary_expr(Self::parse_additive, &[TokenKind::Ampersand])
    }

    /// Parse additive expressions (+, -)
    fn parse_additive(&mut self) -> Result<Expression, ParserError> {
        self.parse_binary_expr(Self::parse_multiplicative, &[TokenKind::Plus, TokenKind::Minus])
    }

    /// Parse multiplicative expressions (*, /)
    fn parse_multiplicative(&mut self) -> Result<Expression, ParserError> {
        self.parse_binary_expr(Self::parse_unary, &[TokenKind::Asterisk, TokenKind::Slash])
    }

    /// Generic left-associative binary expression parser
    fn parse_binary_expr<F>(&mut self, next_level: F, operators: &[TokenKind]) -> Result<Expression, ParserError>
    where
        F: Fn(&mut Self) -> Result<Expression, ParserError>,
    {
        let mut left = next_level(self)?;

        loop {
            let kind = &self.peek()?.kind;
            if !operators.iter().any(|op| op.same_tag(kind)) {
                break;
            }

            let token = self.advance()?;
            let op = Self::token_to_binary_op(&token)?;
            let right = next_level(self)?;
            let pos = left.pos;

            left = Expression::new(
                ExprKind::Binary {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                },
                token.lexeme,
                pos,
            );
        }

        Ok(left)
    }

    /// Convert token to binary operator
    fn token_to_binary_op(token: &Token) -> Result<BinaryOp, ParserError> {
        match token.kind {
            TokenKind::Plus => Ok(BinaryOp::Add),
            TokenKind::Minus => Ok(BinaryOp::Sub),
            TokenKind::Asterisk => Ok(BinaryOp::Mul),
            TokenKind::Slash => Ok(BinaryOp::Div),
            TokenKind::Ampersand => Ok(BinaryOp::And),
            TokenKind::Pipe => Ok(BinaryOp::Or),
            TokenKind::Caret => Ok(BinaryOp::Xor),
            _ => Err(ParserError::UnexpectedToken(token.kind.to_string(), token.pos)),
        }
    }

    /// Parse unary sign expressions (+, -)
    fn parse_unary(&mut self) -> Result<Expression, ParserError> {
        let op = match self.peek()?.kind {
            TokenKind::Plus => Some(UnaryOp::Plus),
            TokenKind::Minus => Some(UnaryOp::Minus),
            _ => None,
        };
        let Some(op) = op else {
            return self.parse_primary();
        };

        let sign = self.advance()?;
        let operand = self.nested(sign.pos, Self::parse_unary)?;

        Ok(Expression::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            sign.lexeme,
            sign.pos,
        ))
    }

    /// Parse primary expressions (literals, identifiers, ++/-- targets, parenthesized expressions)
    fn parse_primary(&mut self) -> Result<Expression, ParserError> {
        let token = self.advance()?;

        match token.kind {
            TokenKind::Integer(value) => Ok(Expression::new(
                ExprKind::Literal(value),
                token.lexeme,
                token.pos,
            )),

            TokenKind::Identifier(name) => Ok(Expression::new(
                ExprKind::Variable(name),
                token.lexeme,
                token.pos,
            )),

            TokenKind::Increment => self.parse_inc_dec(IncDecOp::Increment, token),
            TokenKind::Decrement => self.parse_inc_dec(IncDecOp::Decrement, token),

            TokenKind::OpenParen => {
                let expr = self.nested(token.pos, Self::parse_assign)?;
                if !self.check(&TokenKind::CloseParen)? {
                    return Err(ParserError::MismatchedParen(token.pos));
                }
                self.advance()?;
                Ok(expr)
            }

            other => Err(ParserError::ExpectedNumberOrIdentifier(other.to_string(), token.pos)),
        }
    }

    /// Parse the identifier after a prefix `++` / `--`
    fn parse_inc_dec(&mut self, op: IncDecOp, marker: Token) -> Result<Expression, ParserError> {
        let target = self.advance()?;

        let TokenKind::Identifier(name) = target.kind else {
            return Err(ParserError::InvalidIncDecTarget(
                marker.lexeme,
                target.kind.to_string(),
                target.pos,
            ));
        };

        if self.check(&TokenKind::Increment)? || self.check(&TokenKind::Decrement)? {
            return Err(ParserError::ChainedIncDec(name, self.peek()?.pos));
        }

        Ok(Expression::new(
            ExprKind::IncDec { op, name },
            marker.lexeme,
            marker.pos,
        ))
    }
}
