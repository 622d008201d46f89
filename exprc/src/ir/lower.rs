use tracing::debug;

use super::ast;
use super::tac::{BinaryOp, Instruction, Operand};
use crate::error::LoweringError;

/// Lowers a program into three-address code.
///
/// Instructions come out in execution order: the code for both operands
/// (left, then right) precedes the instruction that consumes them, and
/// statements follow each other in source order. Every leaf and every
/// operator result gets its own temporary `t0`, `t1`, ... numbered from
/// zero on each call.
pub fn lower(program: &ast::Program) -> Result<Vec<Instruction>, LoweringError> {
    let mut lowerer = Lowerer::default();
    for statement in &program.statements {
        lowerer.lower_statement(statement)?;
    }
    debug!(
        instructions = lowerer.code.len(),
        temporaries = lowerer.next_temp,
        "lowered program"
    );
    Ok(lowerer.code)
}

#[derive(Default)]
struct Lowerer {
    code: Vec<Instruction>,
    next_temp: usize,
}

impl Lowerer {
    fn fresh_temp(&mut self) -> String {
        let name = format!("t{}", self.next_temp);
        self.next_temp += 1;
        name
    }

    fn lower_statement(&mut self, statement: &ast::Statement) -> Result<(), LoweringError> {
        match statement {
            ast::Statement::Assign { target, value, span } => {
                if target.is_empty() {
                    return Err(LoweringError::MalformedAssignment {
                        line: span.line,
                        column: span.column,
                    });
                }
                let src = self.lower_expression(value)?;
                self.code.push(Instruction::Assign {
                    dest: target.clone(),
                    src: Operand::Reference(src),
                });
            }
            ast::Statement::Assert { condition, .. } => {
                let src = self.lower_expression(condition)?;
                self.code.push(Instruction::Assert {
                    src: Operand::Reference(src),
                });
            }
        }
        Ok(())
    }

    /// Returns the temporary holding the expression's value.
    fn lower_expression(&mut self, expression: &ast::Expression) -> Result<String, LoweringError> {
        match expression {
            ast::Expression::Literal { value, span } => {
                let constant = value
                    .parse::<i64>()
                    .map_err(|_| LoweringError::LiteralOutOfRange {
                        literal: value.clone(),
                        line: span.line,
                        column: span.column,
                    })?;
                Ok(self.bind(Operand::Constant(constant)))
            }
            ast::Expression::Variable { name, .. } => Ok(self.bind(Operand::reference(name.as_str()))),
            ast::Expression::BinaryOp { left, op, right, .. } => {
                let lhs = self.lower_expression(left)?;
                let rhs = self.lower_expression(right)?;
                let dest = self.fresh_temp();
                self.code.push(Instruction::Binary {
                    op: lower_operator(*op),
                    dest: dest.clone(),
                    lhs: Operand::Reference(lhs),
                    rhs: Operand::Reference(rhs),
                });
                Ok(dest)
            }
        }
    }

    fn bind(&mut self, src: Operand) -> String {
        let dest = self.fresh_temp();
        self.code.push(Instruction::Assign {
            dest: dest.clone(),
            src,
        });
        dest
    }
}

fn lower_operator(op: ast::BinaryOperator) -> BinaryOp {
    match op {
        ast::BinaryOperator::Add => BinaryOp::Add,
        ast::BinaryOperator::Subtract => BinaryOp::Sub,
        ast::BinaryOperator::Multiply => BinaryOp::Mul,
        ast::BinaryOperator::Divide => BinaryOp::Div,
        ast::BinaryOperator::Equal => BinaryOp::Eq,
    }
}
