use std::collections::HashSet;

use tracing::debug;

use crate::error::SemanticError;
use crate::ir::ast;

/// Rejects any use of a variable before an assignment to it has completed.
/// A variable becomes visible only after its whole right-hand side has been
/// checked, so `x = x` fails even as the first statement.
pub fn validate(program: &ast::Program) -> Result<(), SemanticError> {
    let mut validator = Validator::default();
    for statement in &program.statements {
        validator.check_statement(statement)?;
    }
    debug!(defined = validator.defined.len(), "validated program");
    Ok(())
}

#[derive(Default)]
struct Validator {
    defined: HashSet<String>,
}

impl Validator {
    fn check_statement(&mut self, statement: &ast::Statement) -> Result<(), SemanticError> {
        match statement {
            ast::Statement::Assign { target, value, span } => {
                if target.is_empty() {
                    return Err(SemanticError::MalformedAssignment {
                        line: span.line,
                        column: span.column,
                    });
                }
                self.check_expression(value)?;
                self.defined.insert(target.clone());
            }
            ast::Statement::Assert { condition, .. } => {
                self.check_expression(condition)?;
            }
        }
        Ok(())
    }

    fn check_expression(&self, expression: &ast::Expression) -> Result<(), SemanticError> {
        match expression {
            ast::Expression::Literal { .. } => Ok(()),
            ast::Expression::Variable { name, span } => {
                if self.defined.contains(name) {
                    Ok(())
                } else {
                    Err(SemanticError::UndefinedVariable {
                        name: name.clone(),
                        line: span.line,
                        column: span.column,
                    })
                }
            }
            ast::Expression::BinaryOp { left, right, .. } => {
                self.check_expression(left)?;
                self.check_expression(right)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;
    use crate::span::Span;

    fn check(source: &str) -> Result<(), SemanticError> {
        validate(&parse_source(source).unwrap())
    }

    #[test]
    fn test_defined_before_use() {
        assert!(check("x = 3 + 5\nassert(x == 8)").is_ok());
        assert!(check("a = 1\nb = a * 2\nc = (a + b) / b\nassert(c == 1)").is_ok());
    }

    #[test]
    fn test_undefined_variable() {
        let err = check("y = x + 1").unwrap_err();
        assert_eq!(
            err,
            SemanticError::UndefinedVariable {
                name: "x".to_string(),
                line: 1,
                column: 5
            }
        );
        assert!(err.to_string().contains("'x'"));
    }

    #[test]
    fn test_self_reference_fails() {
        let err = check("x = x").unwrap_err();
        assert!(matches!(err, SemanticError::UndefinedVariable { ref name, .. } if name == "x"));
    }

    #[test]
    fn test_redefinition_sees_previous_value() {
        assert!(check("x = 1\nx = x + 1").is_ok());
    }

    #[test]
    fn test_later_statements_are_checked() {
        let err = check("x = 1\nassert(x == 1)\nassert(y == 2)").unwrap_err();
        assert!(matches!(err, SemanticError::UndefinedVariable { line: 3, column: 8, .. }));
    }

    #[test]
    fn test_left_operand_reported_first() {
        let err = check("z = a + b").unwrap_err();
        assert!(matches!(err, SemanticError::UndefinedVariable { ref name, .. } if name == "a"));
    }

    #[test]
    fn test_empty_target_is_malformed() {
        let program = ast::Program {
            statements: vec![ast::Statement::Assign {
                target: String::new(),
                value: ast::Expression::Literal {
                    value: "1".to_string(),
                    span: Span::default(),
                },
                span: Span::default(),
            }],
        };
        assert_eq!(
            validate(&program).unwrap_err(),
            SemanticError::MalformedAssignment { line: 1, column: 1 }
        );
    }

    #[test]
    fn test_empty_program() {
        assert!(validate(&ast::Program::default()).is_ok());
    }
}
