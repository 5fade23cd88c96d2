// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! A recursive descent parser for the script subset.
//!
//! Semicolons may be omitted wherever a line break, a closing brace or the
//! end of input follows the statement.

use crate::ast::*;
use crate::lexer::{Keyword, Scanner, Token, TokenKind};
use spacey_value::Error;
use spacey_value::value::number_to_string;
use std::rc::Rc;

/// A recursive descent parser.
pub struct Parser<'a> {
    scanner: Scanner<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given source code.
    pub fn new(source: &'a str) -> Self {
        let mut scanner = Scanner::new(source);
        let current = scanner.next_token();
        Self { scanner, current }
    }

    /// Parses the source code into a Program AST node.
    pub fn parse_program(&mut self) -> Result<Program, Error> {
        let mut body = Vec::new();

        while !self.is_at_end() {
            body.push(self.parse_statement()?);
        }

        Ok(Program { body })
    }

    /// Parses a single statement.
    pub fn parse_statement(&mut self) -> Result<Statement, Error> {
        match &self.current.kind {
            TokenKind::Keyword(Keyword::Var | Keyword::Let | Keyword::Const) => {
                self.parse_variable_declaration()
            }
            TokenKind::Keyword(Keyword::Function) => self.parse_function_declaration(),
            TokenKind::Keyword(Keyword::If) => self.parse_if_statement(),
            TokenKind::Keyword(Keyword::Return) => self.parse_return_statement(),
            TokenKind::LeftBrace => Ok(Statement::Block(self.parse_block_body()?)),
            TokenKind::Semicolon => {
                self.advance();
                Ok(Statement::Empty)
            }
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_variable_declaration(&mut self) -> Result<Statement, Error> {
        let kind = match &self.current.kind {
            TokenKind::Keyword(Keyword::Var) => VariableKind::Var,
            TokenKind::Keyword(Keyword::Let) => VariableKind::Let,
            _ => VariableKind::Const,
        };
        self.advance();

        let mut declarations = Vec::new();
        loop {
            let id = self.expect_identifier()?;
            let init = if self.check(&TokenKind::Equal) {
                self.advance();
                Some(self.parse_assignment()?)
            } else if kind == VariableKind::Const {
                return Err(Error::syntax_error("Missing initializer in const declaration"));
            } else {
                None
            };
            declarations.push(VariableDeclarator { id, init });

            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }

        self.consume_semicolon()?;
        Ok(Statement::VariableDeclaration(VariableDeclaration { kind, declarations }))
    }

    fn parse_function_declaration(&mut self) -> Result<Statement, Error> {
        self.advance(); // consume 'function'
        let id = self.expect_identifier()?;
        let params = self.parse_parameters()?;
        let body = self.parse_block_body()?;

        Ok(Statement::FunctionDeclaration(Rc::new(FunctionNode {
            id: Some(id),
            params,
            body: FunctionBody::Block(body),
            is_arrow: false,
        })))
    }

    fn parse_parameters(&mut self) -> Result<Vec<Identifier>, Error> {
        self.expect(&TokenKind::LeftParen)?;
        let mut params = Vec::new();

        while !self.check(&TokenKind::RightParen) {
            params.push(self.expect_identifier()?);
            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }

        self.expect(&TokenKind::RightParen)?;
        Ok(params)
    }

    fn parse_block_body(&mut self) -> Result<Vec<Statement>, Error> {
        self.expect(&TokenKind::LeftBrace)?;
        let mut body = Vec::new();

        while !self.check(&TokenKind::RightBrace) && !self.is_at_end() {
            body.push(self.parse_statement()?);
        }

        self.expect(&TokenKind::RightBrace)?;
        Ok(body)
    }

    fn parse_if_statement(&mut self) -> Result<Statement, Error> {
        self.advance(); // consume 'if'
        self.expect(&TokenKind::LeftParen)?;
        let test = self.parse_expression()?;
        self.expect(&TokenKind::RightParen)?;

        let consequent = Box::new(self.parse_statement()?);
        let alternate = if self.check_keyword(Keyword::Else) {
            self.advance();
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };

        Ok(Statement::If(IfStatement {
            test,
            consequent,
            alternate,
        }))
    }

    fn parse_return_statement(&mut self) -> Result<Statement, Error> {
        self.advance(); // consume 'return'

        let argument = if self.at_statement_end() {
            None
        } else {
            Some(self.parse_expression()?)
        };

        self.consume_semicolon()?;
        Ok(Statement::Return(argument))
    }

    fn parse_expression_statement(&mut self) -> Result<Statement, Error> {
        let expression = self.parse_expression()?;
        self.consume_semicolon()?;
        Ok(Statement::Expression(expression))
    }

    /// Parses an expression.
    pub fn parse_expression(&mut self) -> Result<Expression, Error> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> Result<Expression, Error> {
        if self.at_arrow_function() {
            return self.parse_arrow_function();
        }

        let left = self.parse_logical_or()?;

        let operator = match self.current.kind {
            TokenKind::Equal => AssignmentOperator::Assign,
            TokenKind::PipePipeEqual => AssignmentOperator::OrAssign,
            _ => return Ok(left),
        };

        if !matches!(left, Expression::Identifier(_) | Expression::Member(_)) {
            return Err(Error::syntax_error("Invalid left-hand side in assignment"));
        }

        self.advance();
        let right = self.parse_assignment()?;

        Ok(Expression::Assignment(AssignmentExpression {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }))
    }

    fn parse_logical_or(&mut self) -> Result<Expression, Error> {
        let mut left = self.parse_logical_and()?;

        while self.check(&TokenKind::PipePipe) {
            self.advance();
            let right = self.parse_logical_and()?;
            left = binary(BinaryOperator::LogicalOr, left, right);
        }

        Ok(left)
    }

    fn parse_logical_and(&mut self) -> Result<Expression, Error> {
        let mut left = self.parse_equality()?;

        while self.check(&TokenKind::AmpersandAmpersand) {
            self.advance();
            let right = self.parse_equality()?;
            left = binary(BinaryOperator::LogicalAnd, left, right);
        }

        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Expression, Error> {
        let mut left = self.parse_comparison()?;

        loop {
            let operator = match self.current.kind {
                TokenKind::EqualEqual => BinaryOperator::Equal,
                TokenKind::NotEqual => BinaryOperator::NotEqual,
                TokenKind::StrictEqual => BinaryOperator::StrictEqual,
                TokenKind::StrictNotEqual => BinaryOperator::StrictNotEqual,
                _ => break,
            };
            self.advance();
            let right = self.parse_comparison()?;
            left = binary(operator, left, right);
        }

        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Expression, Error> {
        let mut left = self.parse_additive()?;

        loop {
            let operator = match self.current.kind {
                TokenKind::LessThan => BinaryOperator::LessThan,
                TokenKind::LessThanEqual => BinaryOperator::LessThanEqual,
                TokenKind::GreaterThan => BinaryOperator::GreaterThan,
                TokenKind::GreaterThanEqual => BinaryOperator::GreaterThanEqual,
                _ => break,
            };
            self.advance();
            let right = self.parse_additive()?;
            left = binary(operator, left, right);
        }

        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expression, Error> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let operator = match self.current.kind {
                TokenKind::Plus => BinaryOperator::Add,
                TokenKind::Minus => BinaryOperator::Subtract,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = binary(operator, left, right);
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expression, Error> {
        let mut left = self.parse_unary()?;

        loop {
            let operator = match self.current.kind {
                TokenKind::Star => BinaryOperator::Multiply,
                TokenKind::Slash => BinaryOperator::Divide,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = binary(operator, left, right);
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expression, Error> {
        let operator = match self.current.kind {
            TokenKind::Bang => UnaryOperator::LogicalNot,
            TokenKind::Minus => UnaryOperator::Minus,
            TokenKind::Keyword(Keyword::Typeof) => UnaryOperator::Typeof,
            _ => return self.parse_call(),
        };
        self.advance();
        let argument = self.parse_unary()?;

        Ok(Expression::Unary(UnaryExpression {
            operator,
            argument: Box::new(argument),
        }))
    }

    fn parse_call(&mut self) -> Result<Expression, Error> {
        let mut expr = self.parse_primary()?;

        loop {
            match self.current.kind {
                TokenKind::Dot => {
                    self.advance();
                    let property = self.expect_property_name()?;
                    expr = Expression::Member(MemberExpression {
                        object: Box::new(expr),
                        property: MemberProperty::Identifier(property),
                    });
                }
                TokenKind::LeftBracket => {
                    self.advance();
                    let property = self.parse_expression()?;
                    self.expect(&TokenKind::RightBracket)?;
                    expr = Expression::Member(MemberExpression {
                        object: Box::new(expr),
                        property: MemberProperty::Computed(Box::new(property)),
                    });
                }
                TokenKind::LeftParen => {
                    let arguments = self.parse_arguments()?;
                    expr = Expression::Call(CallExpression {
                        callee: Box::new(expr),
                        arguments,
                    });
                }
                _ => break,
            }
        }

        Ok(expr)
    }

    fn parse_arguments(&mut self) -> Result<Vec<Expression>, Error> {
        self.expect(&TokenKind::LeftParen)?;
        let mut arguments = Vec::new();

        while !self.check(&TokenKind::RightParen) {
            arguments.push(self.parse_assignment()?);
            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }

        self.expect(&TokenKind::RightParen)?;
        Ok(arguments)
    }

    fn parse_primary(&mut self) -> Result<Expression, Error> {
        let expr = match &self.current.kind {
            TokenKind::Number(n) => Expression::Literal(Literal::Number(*n)),
            TokenKind::String(s) => Expression::Literal(Literal::String(s.clone())),
            TokenKind::Keyword(Keyword::True) => Expression::Literal(Literal::Boolean(true)),
            TokenKind::Keyword(Keyword::False) => Expression::Literal(Literal::Boolean(false)),
            TokenKind::Keyword(Keyword::Null) => Expression::Literal(Literal::Null),
            TokenKind::Keyword(Keyword::This) => Expression::This,
            TokenKind::Identifier(name) => Expression::Identifier(Identifier::new(name.clone())),
            TokenKind::Keyword(Keyword::Function) => return self.parse_function_expression(),
            TokenKind::LeftParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(&TokenKind::RightParen)?;
                return Ok(expr);
            }
            TokenKind::LeftBracket => return self.parse_array_literal(),
            TokenKind::LeftBrace => return self.parse_object_literal(),
            _ => return Err(self.unexpected()),
        };

        self.advance();
        Ok(expr)
    }

    fn parse_function_expression(&mut self) -> Result<Expression, Error> {
        self.advance(); // consume 'function'

        let id = match &self.current.kind {
            TokenKind::Identifier(_) => Some(self.expect_identifier()?),
            _ => None,
        };
        let params = self.parse_parameters()?;
        let body = self.parse_block_body()?;

        Ok(Expression::Function(Rc::new(FunctionNode {
            id,
            params,
            body: FunctionBody::Block(body),
            is_arrow: false,
        })))
    }

    /// `x => ...` or `(a, b) => ...` at the current position.
    fn at_arrow_function(&self) -> bool {
        let mut lookahead = self.scanner.clone();
        match self.current.kind {
            TokenKind::Identifier(_) => lookahead.next_token().kind == TokenKind::Arrow,
            TokenKind::LeftParen => {
                let mut depth = 1;
                while depth > 0 {
                    match lookahead.next_token().kind {
                        TokenKind::LeftParen => depth += 1,
                        TokenKind::RightParen => depth -= 1,
                        TokenKind::Eof => return false,
                        _ => {}
                    }
                }
                let next = lookahead.next_token();
                next.kind == TokenKind::Arrow && !next.newline_before
            }
            _ => false,
        }
    }

    fn parse_arrow_function(&mut self) -> Result<Expression, Error> {
        let params = if self.check(&TokenKind::LeftParen) {
            self.parse_parameters()?
        } else {
            vec![self.expect_identifier()?]
        };
        self.expect(&TokenKind::Arrow)?;

        let body = self.parse_arrow_function_body()?;

        Ok(Expression::Function(Rc::new(FunctionNode {
            id: None,
            params,
            body,
            is_arrow: true,
        })))
    }

    fn parse_arrow_function_body(&mut self) -> Result<FunctionBody, Error> {
        if self.check(&TokenKind::LeftBrace) {
            Ok(FunctionBody::Block(self.parse_block_body()?))
        } else {
            Ok(FunctionBody::Expression(Box::new(self.parse_assignment()?)))
        }
    }

    fn parse_array_literal(&mut self) -> Result<Expression, Error> {
        self.expect(&TokenKind::LeftBracket)?;
        let mut elements = Vec::new();

        while !self.check(&TokenKind::RightBracket) {
            elements.push(self.parse_assignment()?);
            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }

        self.expect(&TokenKind::RightBracket)?;
        Ok(Expression::Array(elements))
    }

    fn parse_object_literal(&mut self) -> Result<Expression, Error> {
        self.expect(&TokenKind::LeftBrace)?;
        let mut properties = Vec::new();

        while !self.check(&TokenKind::RightBrace) {
            properties.push(self.parse_property()?);
            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }

        self.expect(&TokenKind::RightBrace)?;
        Ok(Expression::Object(properties))
    }

    fn parse_property(&mut self) -> Result<Property, Error> {
        let shorthand_candidate = matches!(self.current.kind, TokenKind::Identifier(_));

        let key = match &self.current.kind {
            TokenKind::Identifier(name) => PropertyKey::Static(name.clone()),
            TokenKind::Keyword(keyword) => PropertyKey::Static(keyword.as_str().to_string()),
            TokenKind::String(s) => PropertyKey::Static(s.clone()),
            TokenKind::Number(n) => PropertyKey::Static(number_to_string(*n)),
            TokenKind::LeftBracket => {
                self.advance();
                let key = self.parse_assignment()?;
                self.expect(&TokenKind::RightBracket)?;
                self.expect(&TokenKind::Colon)?;
                return Ok(Property {
                    key: PropertyKey::Computed(Box::new(key)),
                    value: self.parse_assignment()?,
                    shorthand: false,
                });
            }
            _ => return Err(self.unexpected()),
        };
        self.advance();

        if shorthand_candidate && matches!(self.current.kind, TokenKind::Comma | TokenKind::RightBrace) {
            if let PropertyKey::Static(name) = &key {
                let value = Expression::Identifier(Identifier::new(name.clone()));
                return Ok(Property {
                    key,
                    value,
                    shorthand: true,
                });
            }
        }

        self.expect(&TokenKind::Colon)?;
        let value = self.parse_assignment()?;

        Ok(Property {
            key,
            value,
            shorthand: false,
        })
    }

    fn advance(&mut self) {
        self.current = self.scanner.next_token();
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current.kind) == std::mem::discriminant(kind)
    }

    fn check_keyword(&self, keyword: Keyword) -> bool {
        self.current.kind == TokenKind::Keyword(keyword)
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<(), Error> {
        if self.check(kind) {
            self.advance();
            Ok(())
        } else {
            Err(Error::syntax_error(format!(
                "Expected '{}', found '{}' (line {})",
                kind, self.current.kind, self.current.span.line
            )))
        }
    }

    fn expect_identifier(&mut self) -> Result<Identifier, Error> {
        if let TokenKind::Identifier(name) = &self.current.kind {
            let id = Identifier::new(name.clone());
            self.advance();
            Ok(id)
        } else {
            Err(Error::syntax_error(format!(
                "Expected identifier, found '{}' (line {})",
                self.current.kind, self.current.span.line
            )))
        }
    }

    /// A name after `.`; reserved words are allowed here.
    fn expect_property_name(&mut self) -> Result<Identifier, Error> {
        let name = match &self.current.kind {
            TokenKind::Identifier(name) => name.clone(),
            TokenKind::Keyword(keyword) => keyword.as_str().to_string(),
            _ => return Err(self.unexpected()),
        };
        self.advance();
        Ok(Identifier::new(name))
    }

    fn at_statement_end(&self) -> bool {
        matches!(
            self.current.kind,
            TokenKind::Semicolon | TokenKind::RightBrace | TokenKind::Eof
        ) || self.current.newline_before
    }

    fn consume_semicolon(&mut self) -> Result<(), Error> {
        if self.check(&TokenKind::Semicolon) {
            self.advance();
            Ok(())
        } else if self.at_statement_end() {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn unexpected(&self) -> Error {
        match &self.current.kind {
            TokenKind::Eof => Error::syntax_error("Unexpected end of input"),
            TokenKind::Invalid(text) if text.starts_with(['\'', '"']) => Error::syntax_error(
                format!("Invalid or unexpected token (line {})", self.current.span.line),
            ),
            kind => Error::syntax_error(format!(
                "Unexpected token '{}' (line {})",
                kind, self.current.span.line
            )),
        }
    }

    fn is_at_end(&self) -> bool {
        matches!(self.current.kind, TokenKind::Eof)
    }
}

fn binary(operator: BinaryOperator, left: Expression, right: Expression) -> Expression {
    Expression::Binary(BinaryExpression {
        operator,
        left: Box::new(left),
        right: Box::new(right),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use spacey_macros::assert_matches;

    fn parse_stmt(src: &str) -> Statement {
        let mut parser = Parser::new(src);
        let program = parser.parse_program().unwrap();
        program.body.into_iter().next().unwrap()
    }

    fn parse_ok(src: &str) -> Program {
        Parser::new(src).parse_program().unwrap()
    }

    fn parse_err(src: &str) -> Error {
        Parser::new(src).parse_program().unwrap_err()
    }

    #[test]
    fn test_parse_variable_declaration() {
        let stmt = parse_stmt("let x = 42;");
        assert_matches!(
            stmt,
            Statement::VariableDeclaration(VariableDeclaration { kind: VariableKind::Let, .. })
        );
    }

    #[test]
    fn test_parse_multiple_declarations() {
        let Statement::VariableDeclaration(decl) = parse_stmt("var a = 1, b, c = 3") else {
            panic!("expected declaration");
        };
        assert_eq!(decl.declarations.len(), 3);
        assert!(decl.declarations[1].init.is_none());
    }

    #[test]
    fn test_const_requires_initializer() {
        let err = parse_err("const x;");
        assert_eq!(err.message(), "Missing initializer in const declaration");
    }

    #[test]
    fn test_parse_function_declaration() {
        let Statement::FunctionDeclaration(node) = parse_stmt("function foo(a, b) { return a }") else {
            panic!("expected function declaration");
        };
        assert_eq!(node.id.as_ref().unwrap().name, "foo");
        assert_eq!(node.params.len(), 2);
        assert!(!node.is_arrow);
    }

    #[test]
    fn test_optional_semicolons() {
        let program = parse_ok("exports.foo = 1\nexports.bar = 2\n{ let x = 3 }");
        assert_eq!(program.body.len(), 3);
    }

    #[test]
    fn test_missing_semicolon_on_one_line() {
        let err = parse_err("let a = 1 let b = 2");
        assert_matches!(err, Error::SyntaxError(_));
    }

    #[test]
    fn test_return_without_value_before_newline() {
        let Statement::FunctionDeclaration(node) = parse_stmt("function f() { return\n42 }") else {
            panic!("expected function declaration");
        };
        let FunctionBody::Block(body) = &node.body else {
            panic!("expected block body");
        };
        assert_eq!(body[0], Statement::Return(None));
        assert_eq!(body.len(), 2);
    }

    #[test]
    fn test_parse_member_and_call() {
        let stmt = parse_stmt("module.exports.foo(1, 'two')");
        let Statement::Expression(Expression::Call(call)) = stmt else {
            panic!("expected call");
        };
        assert_eq!(call.arguments.len(), 2);
        assert_matches!(*call.callee, Expression::Member(_));
    }

    #[test]
    fn test_keyword_property_names() {
        let stmt = parse_stmt("module.default = this.if");
        assert_matches!(stmt, Statement::Expression(Expression::Assignment(_)));
    }

    #[test]
    fn test_parse_arrow_functions() {
        let stmt = parse_stmt("let f = (a, b) => a + b");
        let Statement::VariableDeclaration(decl) = stmt else {
            panic!("expected declaration");
        };
        let Some(Expression::Function(node)) = &decl.declarations[0].init else {
            panic!("expected arrow");
        };
        assert!(node.is_arrow);
        assert_matches!(node.body, FunctionBody::Expression(_));

        assert_matches!(parse_stmt("x => { return x }"), Statement::Expression(Expression::Function(_)));
        assert_matches!(parse_stmt("() => 1"), Statement::Expression(Expression::Function(_)));
    }

    #[test]
    fn test_parenthesized_expression_is_not_arrow() {
        let stmt = parse_stmt("(a + b) * c");
        assert_matches!(
            stmt,
            Statement::Expression(Expression::Binary(BinaryExpression {
                operator: BinaryOperator::Multiply,
                ..
            }))
        );
    }

    #[test]
    fn test_parse_object_literal() {
        let stmt = parse_stmt("({ foo, 'bar': 1, 2: true, [key]: null, default: 3 })");
        let Statement::Expression(Expression::Object(properties)) = stmt else {
            panic!("expected object literal");
        };
        assert_eq!(properties.len(), 5);
        assert!(properties[0].shorthand);
        assert_eq!(properties[1].key, PropertyKey::Static("bar".into()));
        assert_eq!(properties[2].key, PropertyKey::Static("2".into()));
        assert_matches!(properties[3].key, PropertyKey::Computed(_));
        assert_eq!(properties[4].key, PropertyKey::Static("default".into()));
    }

    #[test]
    fn test_parse_or_assign() {
        let stmt = parse_stmt("globalThis.module ||= {}");
        assert_matches!(
            stmt,
            Statement::Expression(Expression::Assignment(AssignmentExpression {
                operator: AssignmentOperator::OrAssign,
                ..
            }))
        );
    }

    #[test]
    fn test_invalid_assignment_target() {
        let err = parse_err("1 = 2");
        assert_eq!(err.message(), "Invalid left-hand side in assignment");
    }

    #[test]
    fn test_parse_if_else() {
        let stmt = parse_stmt("if (a) b = 1; else { b = 2 }");
        let Statement::If(stmt) = stmt else {
            panic!("expected if");
        };
        assert!(stmt.alternate.is_some());
    }

    #[test]
    fn test_precedence() {
        let stmt = parse_stmt("a || b && c === d + e * f");
        assert_matches!(
            stmt,
            Statement::Expression(Expression::Binary(BinaryExpression {
                operator: BinaryOperator::LogicalOr,
                ..
            }))
        );
    }

    #[test]
    fn test_unexpected_end_of_input() {
        let err = parse_err("exports.foo = (");
        assert_eq!(err, Error::syntax_error("Unexpected end of input"));
    }

    #[test]
    fn test_unterminated_string() {
        let err = parse_err("let s = 'abc");
        assert_eq!(err.message(), "Invalid or unexpected token (line 1)");
    }
}
