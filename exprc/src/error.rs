use thiserror::Error;

/// Top-level error for a single compilation run. The first failure of any
/// stage ends the run.
#[derive(Error, Debug)]
pub enum CompileError {
    #[error(transparent)]
    Lexical(#[from] LexicalError),

    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Semantic(#[from] SemanticError),

    #[error(transparent)]
    Lowering(#[from] LoweringError),

    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexicalError {
    #[error("Lexer error at line {line}, column {column}: unexpected character '{ch}'")]
    UnexpectedCharacter { ch: char, line: usize, column: usize },

    #[error("Lexer error at line {line}, column {column}: token limit of {limit} reached")]
    TokenLimit { limit: usize, line: usize, column: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyntaxError {
    #[error("Syntax error at line {line}, column {column}: unexpected token '{found}'")]
    UnexpectedToken { found: String, line: usize, column: usize },

    #[error("Syntax error at line {line}, column {column}: expected '=' after variable '{name}'")]
    ExpectedAssign { name: String, line: usize, column: usize },

    #[error("Syntax error at line {line}, column {column}: expected '(' after 'assert', found '{found}'")]
    ExpectedLParen { found: String, line: usize, column: usize },

    #[error("Syntax error at line {line}, column {column}: expected ')' after {context}, found '{found}'")]
    ExpectedRParen {
        context: &'static str,
        found: String,
        line: usize,
        column: usize,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SemanticError {
    #[error("Semantic error at line {line}, column {column}: undefined variable '{name}'")]
    UndefinedVariable { name: String, line: usize, column: usize },

    #[error("Semantic error at line {line}, column {column}: assignment must have a variable name")]
    MalformedAssignment { line: usize, column: usize },
}

/// Reaching any of these means the program skipped validation or was built
/// by hand.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoweringError {
    #[error("Lowering error at line {line}, column {column}: literal '{literal}' does not fit in a 64-bit integer")]
    LiteralOutOfRange { literal: String, line: usize, column: usize },

    #[error("Lowering error at line {line}, column {column}: assignment must have a variable name")]
    MalformedAssignment { line: usize, column: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArithmeticError {
    #[error("Arithmetic error: division by zero while folding '{dest}'")]
    DivisionByZero { dest: String },

    #[error("Arithmetic error: {lhs} {op} {rhs} overflows a 64-bit integer")]
    Overflow { op: &'static str, lhs: i64, rhs: i64 },
}
