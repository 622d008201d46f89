use std::fmt;

/// Operand of an instruction: either a known integer or the name of a
/// variable or temporary defined earlier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Constant(i64),
    Reference(String),
}

impl Operand {
    pub fn reference(name: impl Into<String>) -> Self {
        Self::Reference(name.into())
    }

    pub fn as_constant(&self) -> Option<i64> {
        match self {
            Self::Constant(value) => Some(*value),
            Self::Reference(_) => None,
        }
    }

    pub fn refers_to(&self, name: &str) -> bool {
        matches!(self, Self::Reference(n) if n == name)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(value) => write!(f, "{}", value),
            Self::Reference(name) => write!(f, "{}", name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
}

impl BinaryOp {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Div => "div",
            Self::Eq => "eq",
        }
    }
}

/// Flat tag of an instruction, used for dumps and quick filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Assert,
}

impl From<BinaryOp> for Opcode {
    fn from(op: BinaryOp) -> Self {
        match op {
            BinaryOp::Add => Self::Add,
            BinaryOp::Sub => Self::Sub,
            BinaryOp::Mul => Self::Mul,
            BinaryOp::Div => Self::Div,
            BinaryOp::Eq => Self::Eq,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// dest = src
    Assign { dest: String, src: Operand },
    /// dest = op lhs, rhs
    Binary {
        op: BinaryOp,
        dest: String,
        lhs: Operand,
        rhs: Operand,
    },
    /// assert src
    Assert { src: Operand },
}

impl Instruction {
    pub fn opcode(&self) -> Opcode {
        match self {
            Self::Assign { .. } => Opcode::Assign,
            Self::Binary { op, .. } => (*op).into(),
            Self::Assert { .. } => Opcode::Assert,
        }
    }

    pub fn dest(&self) -> Option<&str> {
        match self {
            Self::Assign { dest, .. } | Self::Binary { dest, .. } => Some(dest),
            Self::Assert { .. } => None,
        }
    }

    pub fn operands_mut(&mut self) -> Vec<&mut Operand> {
        match self {
            Self::Assign { src, .. } | Self::Assert { src } => vec![src],
            Self::Binary { lhs, rhs, .. } => vec![lhs, rhs],
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Assign { dest, src } => write!(f, "{} = {}", dest, src),
            Self::Binary { op, dest, lhs, rhs } => {
                write!(f, "{} = {} {}, {}", dest, op.mnemonic(), lhs, rhs)
            }
            Self::Assert { src } => write!(f, "assert {}", src),
        }
    }
}
