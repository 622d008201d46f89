use tracing::debug;

use super::lexer::{Token, TokenKind};
use crate::error::SyntaxError;
use crate::ir::ast::{self, BinaryOperator};
use crate::span::Span;

pub fn parse_tokens(tokens: Vec<Token>) -> Result<ast::Program, SyntaxError> {
    let mut parser = Parser::new(tokens);
    let program = parser.parse_program()?;
    debug!(statements = program.statements.len(), "parsed program");
    Ok(program)
}

struct Parser {
    tokens: Vec<Token>,
    position: usize,
    eof: Token,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        // Stands in for a missing terminator so peeking never runs off the end.
        let eof = match tokens.last() {
            Some(last) if last.kind == TokenKind::Eof => last.clone(),
            Some(last) => {
                let span = Span::new(last.span.line, last.span.column, last.span.end, last.span.end);
                Token::new(TokenKind::Eof, "EOF", span)
            }
            None => Token::new(TokenKind::Eof, "EOF", Span::default()),
        };
        Self {
            tokens,
            position: 0,
            eof,
        }
    }

    fn parse_program(&mut self) -> Result<ast::Program, SyntaxError> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            statements.push(self.parse_statement()?);
        }

        Ok(ast::Program { statements })
    }

    fn parse_statement(&mut self) -> Result<ast::Statement, SyntaxError> {
        let kind = self.peek().kind;
        match kind {
            TokenKind::Identifier => self.parse_assignment(),
            TokenKind::KeywordAssert => self.parse_assert(),
            _ => Err(unexpected(self.peek())),
        }
    }

    // identifier = expression
    fn parse_assignment(&mut self) -> Result<ast::Statement, SyntaxError> {
        let name = self.advance().clone();

        if self.peek().kind != TokenKind::Assign {
            let found = self.peek();
            return Err(SyntaxError::ExpectedAssign {
                name: name.text,
                line: found.span.line,
                column: found.span.column,
            });
        }
        self.advance(); // consume '='

        let value = self.parse_expression()?;
        let span = name.span.to(value.span());
        Ok(ast::Statement::Assign {
            target: name.text,
            value,
            span,
        })
    }

    // assert ( expression )
    fn parse_assert(&mut self) -> Result<ast::Statement, SyntaxError> {
        let keyword = self.advance().span;

        if self.peek().kind != TokenKind::LParen {
            let found = self.peek();
            return Err(SyntaxError::ExpectedLParen {
                found: found.text.clone(),
                line: found.span.line,
                column: found.span.column,
            });
        }
        self.advance(); // consume '('

        let condition = self.parse_expression()?;
        let close = self.expect_rparen("assertion expression")?;
        Ok(ast::Statement::Assert {
            condition,
            span: keyword.to(close),
        })
    }

    /// `==` shares the lowest level with `+` and `-`, so `1 + 2 == 3` groups
    /// as `(1 + 2) == 3` and `1 == 2 + 3` as `(1 == 2) + 3`.
    fn parse_expression(&mut self) -> Result<ast::Expression, SyntaxError> {
        let mut left = self.parse_term()?;

        while let Some(op) = self.peek_operator(&[
            BinaryOperator::Add,
            BinaryOperator::Subtract,
            BinaryOperator::Equal,
        ]) {
            self.advance(); // consume operator
            let right = self.parse_term()?;
            left = binary(left, op, right);
        }

        Ok(left)
    }

    fn parse_term(&mut self) -> Result<ast::Expression, SyntaxError> {
        let mut left = self.parse_factor()?;

        while let Some(op) = self.peek_operator(&[BinaryOperator::Multiply, BinaryOperator::Divide]) {
            self.advance(); // consume operator
            let right = self.parse_factor()?;
            left = binary(left, op, right);
        }

        Ok(left)
    }

    fn parse_factor(&mut self) -> Result<ast::Expression, SyntaxError> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Number => {
                self.advance();
                Ok(ast::Expression::Literal {
                    value: token.text,
                    span: token.span,
                })
            }
            TokenKind::Identifier => {
                self.advance();
                Ok(ast::Expression::Variable {
                    name: token.text,
                    span: token.span,
                })
            }
            TokenKind::LParen => {
                self.advance(); // consume '('
                let expr = self.parse_expression()?;
                self.expect_rparen("expression")?;
                Ok(expr)
            }
            _ => Err(unexpected(&token)),
        }
    }

    // Вспомогательные методы
    fn peek(&self) -> &Token {
        self.tokens.get(self.position).unwrap_or(&self.eof)
    }

    fn peek_operator(&self, accepted: &[BinaryOperator]) -> Option<BinaryOperator> {
        match self.peek().kind {
            TokenKind::Operator(op) if accepted.contains(&op) => Some(op),
            _ => None,
        }
    }

    fn advance(&mut self) -> &Token {
        let index = self.position;
        if self.position < self.tokens.len() {
            self.position += 1;
        }
        self.tokens.get(index).unwrap_or(&self.eof)
    }

    fn expect_rparen(&mut self, context: &'static str) -> Result<Span, SyntaxError> {
        let token = self.peek();
        if token.kind == TokenKind::RParen {
            let span = token.span;
            self.advance();
            Ok(span)
        } else {
            Err(SyntaxError::ExpectedRParen {
                context,
                found: token.text.clone(),
                line: token.span.line,
                column: token.span.column,
            })
        }
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }
}

fn binary(left: ast::Expression, op: BinaryOperator, right: ast::Expression) -> ast::Expression {
    let span = left.span().to(right.span());
    ast::Expression::BinaryOp {
        left: Box::new(left),
        op,
        right: Box::new(right),
        span,
    }
}

fn unexpected(token: &Token) -> SyntaxError {
    SyntaxError::UnexpectedToken {
        found: token.text.clone(),
        line: token.span.line,
        column: token.span.column,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::ast::{Expression, Statement};
    use crate::parser::lexer::tokenize;

    fn parse(source: &str) -> Result<ast::Program, SyntaxError> {
        parse_tokens(tokenize(source).unwrap())
    }

    /// Fully parenthesised rendering of an expression.
    fn shape(expr: &Expression) -> String {
        match expr {
            Expression::Literal { value, .. } => value.clone(),
            Expression::Variable { name, .. } => name.clone(),
            Expression::BinaryOp { left, op, right, .. } => {
                format!("({} {} {})", shape(left), op.symbol(), shape(right))
            }
        }
    }

    fn assigned(source: &str) -> String {
        let program = parse(source).unwrap();
        match &program.statements[0] {
            Statement::Assign { value, .. } => shape(value),
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_program_in_source_order() {
        let program = parse("x = 3 + 5\nassert(x == 8)").unwrap();
        assert_eq!(program.statements.len(), 2);
        assert_eq!(program.statements[0].kind(), "Assignment");
        assert_eq!(program.statements[0].value(), Some("x"));
        match &program.statements[1] {
            Statement::Assert { condition, .. } => assert_eq!(shape(condition), "(x == 8)"),
            other => panic!("expected assertion, got {:?}", other),
        }
    }

    #[test]
    fn test_multiplication_binds_tighter() {
        assert_eq!(assigned("x = 2 + 3 * 4"), "(2 + (3 * 4))");
        assert_eq!(assigned("x = 2 * 3 + 4"), "((2 * 3) + 4)");
    }

    #[test]
    fn test_left_associative() {
        assert_eq!(assigned("x = 8 - 3 - 2"), "((8 - 3) - 2)");
        assert_eq!(assigned("x = 8 / 4 / 2"), "((8 / 4) / 2)");
    }

    #[test]
    fn test_equality_shares_additive_level() {
        assert_eq!(assigned("x = 1 + 2 == 3"), "((1 + 2) == 3)");
        assert_eq!(assigned("x = 1 == 2 + 3"), "((1 == 2) + 3)");
    }

    #[test]
    fn test_parentheses_override() {
        assert_eq!(assigned("x = (2 + 3) * 4"), "((2 + 3) * 4)");
        assert_eq!(assigned("x = ((7))"), "7");
    }

    #[test]
    fn test_statement_spans() {
        let program = parse("x = 1\n  assert(x == 1)").unwrap();
        let span = program.statements[1].span();
        assert_eq!((span.line, span.column), (2, 3));
    }

    #[test]
    fn test_empty_program() {
        assert!(parse("").unwrap().statements.is_empty());
    }

    #[test]
    fn test_missing_assign() {
        let err = parse("x 3").unwrap_err();
        assert_eq!(
            err,
            SyntaxError::ExpectedAssign {
                name: "x".to_string(),
                line: 1,
                column: 3
            }
        );
    }

    #[test]
    fn test_assert_requires_parentheses() {
        let err = parse("assert x == 1").unwrap_err();
        assert!(matches!(err, SyntaxError::ExpectedLParen { ref found, .. } if found == "x"));

        let err = parse("assert(1 == 1").unwrap_err();
        assert!(matches!(
            err,
            SyntaxError::ExpectedRParen { context: "assertion expression", ref found, .. } if found == "EOF"
        ));
    }

    #[test]
    fn test_unbalanced_group() {
        let err = parse("x = (1 + 2").unwrap_err();
        assert!(matches!(err, SyntaxError::ExpectedRParen { context: "expression", .. }));
    }

    #[test]
    fn test_statement_cannot_start_with_number() {
        let err = parse("x = 1\n42").unwrap_err();
        assert_eq!(
            err,
            SyntaxError::UnexpectedToken {
                found: "42".to_string(),
                line: 2,
                column: 1
            }
        );
    }

    #[test]
    fn test_dangling_operator() {
        let err = parse("x = 1 +").unwrap_err();
        assert!(matches!(err, SyntaxError::UnexpectedToken { ref found, .. } if found == "EOF"));
    }

    #[test]
    fn test_stray_closing_paren() {
        let err = parse("x = 1)").unwrap_err();
        assert!(matches!(err, SyntaxError::UnexpectedToken { ref found, .. } if found == ")"));
    }

    #[test]
    fn test_missing_eof_token() {
        let mut tokens = tokenize("x = 1").unwrap();
        tokens.pop();
        let program = parse_tokens(tokens).unwrap();
        assert_eq!(program.statements.len(), 1);
    }
}
