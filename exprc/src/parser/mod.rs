pub mod lexer;
pub mod parser;

use crate::error::CompileError;
use crate::ir::ast;

/// Из текста в AST: tokenize + parse with the default token ceiling.
pub fn parse_source(source: &str) -> Result<ast::Program, CompileError> {
    let tokens = lexer::tokenize(source)?;
    let program = parser::parse_tokens(tokens)?;
    Ok(program)
}
