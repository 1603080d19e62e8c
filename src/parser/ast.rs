use crate::lexer::Position;
use std::fmt;

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,

    // Bitwise
    And,
    Or,
    Xor,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::And => "&",
            BinaryOp::Or => "|",
            BinaryOp::Xor => "^",
        }
    }
}

/// Prefix sign operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
}

impl UnaryOp {
    /// The binary operator applied against an implicit zero left operand
    pub fn as_binary(&self) -> BinaryOp {
        match self {
            UnaryOp::Plus => BinaryOp::Add,
            UnaryOp::Minus => BinaryOp::Sub,
        }
    }
}

/// Prefix increment / decrement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncDecOp {
    Increment,
    Decrement,
}

impl IncDecOp {
    pub fn delta(&self) -> i32 {
        match self {
            IncDecOp::Increment => 1,
            IncDecOp::Decrement => -1,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            IncDecOp::Increment => "++",
            IncDecOp::Decrement => "--",
        }
    }
}

/// Expression variants
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Literal(i32),
    Variable(String),
    IncDec {
        op: IncDecOp,
        name: String,
    },
    Assign {
        name: String,
        value: Box<Expression>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
    },
    Binary {
        left: Box<Expression>,
        op: BinaryOp,
        right: Box<Expression>,
    },
}

/// Expression tree node
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub kind: ExprKind,
    pub lexeme: String,
    pub pos: Position,
    /// Set by the annotator: whether this subtree reads or writes any variable
    pub has_identifier: bool,
    /// Set by the code generator: register holding this subtree's value
    pub register: Option<usize>,
}

impl Expression {
    pub fn new(kind: ExprKind, lexeme: impl Into<String>, pos: Position) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            pos,
            has_identifier: false,
            register: None,
        }
    }
}

/// Prefix traversal, operator first
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.kind {
            ExprKind::Literal(value) => write!(f, "{}", value),
            ExprKind::Variable(name) => write!(f, "{}", name),
            ExprKind::IncDec { op, name } => write!(f, "{} {}", op.symbol(), name),
            ExprKind::Assign { name, value } => write!(f, "= {} {}", name, value),
            ExprKind::Unary { operand, .. } => write!(f, "{} {}", self.lexeme, operand),
            ExprKind::Binary { left, op, right } => {
                write!(f, "{} {} {}", op.symbol(), left, right)
            }
        }
    }
}

/// One parsed input line
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// End of the input stream
    EndOfInput,
    /// A blank line
    Empty,
    Expression(Expression),
}
