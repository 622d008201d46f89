use crate::config::CompileOptions;
use crate::error::CompileError;
use crate::ir::ast::Program;
use crate::ir::tac::Instruction;
use crate::parser::lexer::tokenize_with_limit;
use crate::{check, compile_program};

/// Pipeline stage whose output the CLI prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emit {
    Tokens,
    Ast,
    Ir,
    RawIr,
}

impl Emit {
    pub fn all() -> Vec<Self> {
        vec![Self::Tokens, Self::Ast, Self::Ir, Self::RawIr]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Tokens => "tokens",
            Self::Ast => "ast",
            Self::Ir => "ir",
            Self::RawIr => "ir-raw",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Tokens => "token stream with positions",
            Self::Ast => "validated syntax tree",
            Self::Ir => "three-address code after constant folding",
            Self::RawIr => "three-address code straight from lowering",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().into_iter().find(|e| e.name() == name)
    }

    /// Runs the pipeline as far as this stage needs and renders its output,
    /// one item per line.
    pub fn render(&self, source: &str, options: &CompileOptions) -> Result<String, CompileError> {
        match self {
            Self::Tokens => {
                let tokens = tokenize_with_limit(source, options.max_tokens)?;
                Ok(tokens.iter().map(|token| format!("{}\n", token)).collect())
            }
            _ => {
                let program = check(source, options)?;
                Ok(self.render_program(&program, options)?.unwrap_or_default())
            }
        }
    }

    /// Renders this stage from a program that already passed [`check`].
    /// `None` for `tokens`, which the tree no longer carries.
    pub fn render_program(
        &self,
        program: &Program,
        options: &CompileOptions,
    ) -> Result<Option<String>, CompileError> {
        let rendered = match self {
            Self::Tokens => return Ok(None),
            Self::Ast => program.to_string(),
            Self::Ir => render_ir(&compile_program(program, options)?),
            Self::RawIr => {
                let raw = CompileOptions {
                    optimize: false,
                    ..options.clone()
                };
                render_ir(&compile_program(program, &raw)?)
            }
        };
        Ok(Some(rendered))
    }
}

fn render_ir(ir: &[Instruction]) -> String {
    ir.iter().map(|instruction| format!("{}\n", instruction)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "x = 3 + 5\nassert(x == 8)";

    #[test]
    fn test_names_round_trip() {
        for emit in Emit::all() {
            assert_eq!(Emit::from_name(emit.name()), Some(emit));
        }
        assert_eq!(Emit::from_name("chip8"), None);
    }

    #[test]
    fn test_tokens() {
        let out = Emit::Tokens.render(SOURCE, &CompileOptions::default()).unwrap();
        assert_eq!(out.lines().count(), 12);
        assert_eq!(out.lines().next(), Some("Identifier 'x' at 1:1"));
        assert_eq!(out.lines().last(), Some("Eof 'EOF' at 2:15"));
    }

    #[test]
    fn test_ast() {
        let out = Emit::Ast.render(SOURCE, &CompileOptions::default()).unwrap();
        assert!(out.starts_with("Program\n  Assignment x\n    BinaryOp +\n"));
        assert!(out.contains("  Assertion\n    BinaryOp ==\n      Variable x\n"));
    }

    #[test]
    fn test_ir_variants() {
        let options = CompileOptions::default();
        let raw = Emit::RawIr.render(SOURCE, &options).unwrap();
        let folded = Emit::Ir.render(SOURCE, &options).unwrap();
        assert!(raw.contains("t2 = add t0, t1\n"));
        assert!(folded.contains("t2 = 8\n"));
        assert!(folded.ends_with("assert t5\n"));
    }

    #[test]
    fn test_render_from_checked_program() {
        let options = CompileOptions::default();
        let program = check(SOURCE, &options).unwrap();
        for stage in [Emit::Ast, Emit::Ir, Emit::RawIr] {
            assert_eq!(
                stage.render_program(&program, &options).unwrap(),
                Some(stage.render(SOURCE, &options).unwrap())
            );
        }
        assert_eq!(Emit::Tokens.render_program(&program, &options).unwrap(), None);
    }

    #[test]
    fn test_errors_surface() {
        let err = Emit::Ast.render("assert(y == 1)", &CompileOptions::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Semantic error at line 1, column 8: undefined variable 'y'"
        );
    }
}
