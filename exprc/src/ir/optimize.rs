use tracing::debug;

use super::tac::{BinaryOp, Instruction, Operand};
use crate::error::ArithmeticError;

/// Constant folding and propagation, in place, in a single forward sweep.
///
/// An arithmetic instruction whose operands are both constants becomes an
/// `Assign` of the computed value. Every `Assign` of a constant, folded or
/// not, then has its value substituted into all later operands naming its
/// destination. Substitution is purely by name: a later redefinition of the
/// same name does not stop it. `eq` is never folded.
pub fn optimize(ir: &mut [Instruction]) -> Result<(), ArithmeticError> {
    let mut folded = 0;
    let mut propagated = 0;

    for index in 0..ir.len() {
        let (head, tail) = ir.split_at_mut(index + 1);
        let current = &mut head[index];

        if let Some(value) = fold(current)? {
            if let Instruction::Binary { dest, .. } = current {
                let dest = std::mem::take(dest);
                *current = Instruction::Assign {
                    dest,
                    src: Operand::Constant(value),
                };
            }
            folded += 1;
        }

        if let Instruction::Assign {
            dest,
            src: Operand::Constant(value),
        } = current
        {
            propagated += propagate(dest, *value, tail);
        }
    }

    debug!(folded, propagated, "optimized IR");
    Ok(())
}

/// Computes the value of an arithmetic instruction over two constants.
fn fold(instruction: &Instruction) -> Result<Option<i64>, ArithmeticError> {
    let Instruction::Binary { op, dest, lhs, rhs } = instruction else {
        return Ok(None);
    };
    let (Some(a), Some(b)) = (lhs.as_constant(), rhs.as_constant()) else {
        return Ok(None);
    };

    let overflow = |symbol| ArithmeticError::Overflow {
        op: symbol,
        lhs: a,
        rhs: b,
    };
    let result = match op {
        BinaryOp::Add => a.checked_add(b).ok_or_else(|| overflow("+"))?,
        BinaryOp::Sub => a.checked_sub(b).ok_or_else(|| overflow("-"))?,
        BinaryOp::Mul => a.checked_mul(b).ok_or_else(|| overflow("*"))?,
        BinaryOp::Div => {
            if b == 0 {
                return Err(ArithmeticError::DivisionByZero { dest: dest.clone() });
            }
            a.checked_div(b).ok_or_else(|| overflow("/"))?
        }
        BinaryOp::Eq => return Ok(None),
    };

    debug!(%dest, lhs = a, op = op.mnemonic(), rhs = b, result, "folding operation");
    Ok(Some(result))
}

fn propagate(name: &str, value: i64, rest: &mut [Instruction]) -> usize {
    let mut count = 0;
    for instruction in rest.iter_mut() {
        for operand in instruction.operands_mut() {
            if operand.refers_to(name) {
                *operand = Operand::Constant(value);
                count += 1;
            }
        }
    }
    if count > 0 {
        debug!(name, value, uses = count, "propagating constant");
    }
    count
}
