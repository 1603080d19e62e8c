use tracing::debug;

use crate::codegen::{annotate, CodegenError, Instruction, Register};
use crate::lexer::Position;
use crate::parser::{BinaryOp, ExprKind, Expression, IncDecOp};
use crate::symbol::SymbolTable;

/// A value held in a register, plus whatever is statically known about it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Operand {
    register: Register,
    value: i32,
}

/// Result of compiling one statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledStatement {
    pub instructions: Vec<Instruction>,
    /// Register holding the statement's result
    pub register: Register,
    /// Folded value of the statement
    pub value: i32,
}

/// Lowers expression trees into register machine instructions.
///
/// Registers are handed out like a stack: allocating takes `next_register`,
/// combining two operands frees the right one again.
pub struct CodeGenerator {
    symbols: SymbolTable,
    next_register: Register,
    instructions: Vec<Instruction>,
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new(SymbolTable::new())
    }
}

impl CodeGenerator {
    pub fn new(symbols: SymbolTable) -> Self {
        Self {
            symbols,
            next_register: 0,
            instructions: Vec::new(),
        }
    }

    /// Get reference to symbol table
    #[must_use]
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Annotate and lower one statement's tree.
    ///
    /// Instructions are only handed back on success; a failing statement emits nothing.
    /// Variables written before the failure keep their new values.
    /// # Errors
    /// Undefined variable reads, divisions by a constant zero, and a full symbol table.
    pub fn compile(&mut self, expr: &mut Expression) -> Result<CompiledStatement, CodegenError> {
        annotate(expr);

        self.next_register = 0;
        self.instructions.clear();

        let result = self.generate_expression(expr);
        let instructions = std::mem::take(&mut self.instructions);
        let operand = result?;

        debug!(
            register = operand.register,
            value = operand.value,
            instructions = instructions.len(),
            "compiled statement"
        );

        Ok(CompiledStatement {
            instructions,
            register: operand.register,
            value: operand.value,
        })
    }

    /// Instructions that end a successful session
    #[must_use]
    pub fn finish(&self) -> Vec<Instruction> {
        vec![
            Instruction::Load { dst: 0, address: 0 },
            Instruction::Load { dst: 1, address: 4 },
            Instruction::Load { dst: 2, address: 8 },
            Instruction::Exit(0),
        ]
    }

    fn allocate(&mut self) -> Register {
        let register = self.next_register;
        self.next_register += 1;
        register
    }

    fn free(&mut self, count: usize) {
        self.next_register -= count;
    }

    fn emit(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    fn generate_expression(&mut self, expr: &mut Expression) -> Result<Operand, CodegenError> {
        let pos = expr.pos;
        let depends_on_variable = expr.has_identifier;

        let operand = match &mut expr.kind {
            ExprKind::Literal(value) => self.load_immediate(*value),

            ExprKind::Variable(name) => {
                let register = self.allocate();
                let address = self.symbols.address_of(name)?;
                self.emit(Instruction::Load { dst: register, address });

                let value = self
                    .symbols
                    .get(name)?
                    .ok_or_else(|| CodegenError::UndefinedVariable(name.clone(), pos))?;

                Operand { register, value }
            }

            ExprKind::IncDec { op, name } => self.generate_inc_dec(*op, name, pos)?,

            ExprKind::Assign { name, value } => {
                let rhs = self.generate_expression(value)?;
                self.symbols.set(name, rhs.value)?;

                let temp = self.allocate();
                self.emit(Instruction::Move { dst: temp, src: rhs.register });
                let address = self.symbols.address_of(name)?;
                self.emit(Instruction::Store { address, src: temp });
                self.free(1);

                rhs
            }

            ExprKind::Unary { op, operand } => {
                self.generate_binary(None, op.as_binary(), operand, depends_on_variable, pos)?
            }

            ExprKind::Binary { left, op, right } => {
                self.generate_binary(Some(left.as_mut()), *op, right, depends_on_variable, pos)?
            }
        };

        expr.register = Some(operand.register);
        Ok(operand)
    }

    fn load_immediate(&mut self, value: i32) -> Operand {
        let register = self.allocate();
        self.emit(Instruction::LoadImmediate { dst: register, value });
        Operand { register, value }
    }

    /// Load, adjust by one and write back, leaving one live register
    fn generate_inc_dec(&mut self, op: IncDecOp, name: &str, pos: Position) -> Result<Operand, CodegenError> {
        let register = self.allocate();
        let address = self.symbols.address_of(name)?;
        self.emit(Instruction::Load { dst: register, address });

        let delta = self.allocate();
        self.emit(Instruction::LoadImmediate { dst: delta, value: 1 });

        let current = self
            .symbols
            .get(name)?
            .ok_or_else(|| CodegenError::UndefinedVariable(name.to_string(), pos))?;
        let value = self.symbols.set(name, current.wrapping_add(op.delta()))?;

        let arith = match op {
            IncDecOp::Increment => BinaryOp::Add,
            IncDecOp::Decrement => BinaryOp::Sub,
        };
        self.emit(Instruction::Arith { op: arith, dst: register, src: delta });
        self.emit(Instruction::Store { address, src: register });
        self.free(1);

        Ok(Operand { register, value })
    }

    /// Combine two operands into the left one's register.
    /// A missing left operand (unary sign) is an implicit zero.
    fn generate_binary(
        &mut self,
        left: Option<&mut Expression>,
        op: BinaryOp,
        right: &mut Expression,
        depends_on_variable: bool,
        pos: Position,
    ) -> Result<Operand, CodegenError> {
        let lhs = match left {
            Some(left) => self.generate_expression(left)?,
            None => self.load_immediate(0),
        };
        let rhs = self.generate_expression(right)?;

        let value = match op {
            BinaryOp::Add => lhs.value.wrapping_add(rhs.value),
            BinaryOp::Sub => lhs.value.wrapping_sub(rhs.value),
            BinaryOp::Mul => lhs.value.wrapping_mul(rhs.value),
            BinaryOp::Div => {
                if rhs.value == 0 {
                    if !depends_on_variable {
                        return Err(CodegenError::DivideByZero(pos));
                    }
                    // Only known at run time
                    0
                } else {
                    lhs.value.wrapping_div(rhs.value)
                }
            }
            BinaryOp::And => lhs.value & rhs.value,
            BinaryOp::Or => lhs.value | rhs.value,
            BinaryOp::Xor => lhs.value ^ rhs.value,
        };

        self.emit(Instruction::Arith {
            op,
            dst: lhs.register,
            src: rhs.register,
        });
        self.free(1);

        Ok(Operand {
            register: lhs.register,
            value,
        })
    }
}
