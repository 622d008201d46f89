//! Ahead-of-time front end for a tiny assignment/assert language.
//!
//! Source text flows through five stages, each consuming the previous
//! stage's output: [`tokenize`] → [`parse_tokens`] → [`validate`] →
//! [`lower`] → [`optimize`]. The first error of any stage ends the run.

pub mod config;
pub mod emit;
pub mod error;
pub mod ir;
pub mod parser;
pub mod span;
pub mod validator;

use std::fs;
use std::path::Path;

use tracing::info_span;

pub use config::CompileOptions;
pub use error::CompileError;
pub use ir::ast::Program;
pub use ir::lower::lower;
pub use ir::optimize::optimize;
pub use ir::tac::{Instruction, Operand};
pub use parser::lexer::{Token, TokenKind, tokenize, tokenize_with_limit};
pub use parser::parser::parse_tokens;
pub use validator::validate;

pub fn read_source(path: impl AsRef<Path>) -> Result<String, CompileError> {
    Ok(fs::read_to_string(path)?)
}

/// Tokenizes, parses and validates `source`.
pub fn check(source: &str, options: &CompileOptions) -> Result<Program, CompileError> {
    let tokens = info_span!("lex").in_scope(|| tokenize_with_limit(source, options.max_tokens))?;
    let program = info_span!("parse").in_scope(|| parse_tokens(tokens))?;
    info_span!("validate").in_scope(|| validate(&program))?;
    Ok(program)
}

/// Runs the whole pipeline and returns the (optionally optimized) IR.
pub fn compile(source: &str, options: &CompileOptions) -> Result<Vec<Instruction>, CompileError> {
    let program = check(source, options)?;
    compile_program(&program, options)
}

/// Lowers an already validated program and optimizes it if asked to.
pub fn compile_program(program: &Program, options: &CompileOptions) -> Result<Vec<Instruction>, CompileError> {
    let mut ir = info_span!("lower").in_scope(|| lower(program))?;
    if options.optimize {
        info_span!("optimize").in_scope(|| optimize(&mut ir))?;
    }
    Ok(ir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_respects_optimize_switch() {
        let source = "x = 2 * 3";
        let raw = compile(
            source,
            &CompileOptions {
                optimize: false,
                ..CompileOptions::default()
            },
        )
        .unwrap();
        assert_eq!(raw[2].to_string(), "t2 = mul t0, t1");

        let folded = compile(source, &CompileOptions::default()).unwrap();
        assert_eq!(folded[2].to_string(), "t2 = 6");
    }

    #[test]
    fn test_errors_convert_per_stage() {
        let options = CompileOptions::default();
        assert!(matches!(compile("x = 1 $", &options), Err(CompileError::Lexical(_))));
        assert!(matches!(compile("x = (1", &options), Err(CompileError::Syntax(_))));
        assert!(matches!(compile("x = y", &options), Err(CompileError::Semantic(_))));
        assert!(matches!(
            compile("x = 100000000000000000000", &options),
            Err(CompileError::Lowering(_))
        ));
        assert!(matches!(compile("x = 1 / 0", &options), Err(CompileError::Arithmetic(_))));
    }

    #[test]
    fn test_missing_source_file() {
        let err = read_source("does/not/exist.ex").unwrap_err();
        assert!(matches!(err, CompileError::IoError { .. }));
    }

    #[test]
    fn test_token_ceiling_from_options() {
        let options = CompileOptions {
            max_tokens: 2,
            ..CompileOptions::default()
        };
        assert!(matches!(check("x = 1", &options), Err(CompileError::Lexical(_))));
    }
}
