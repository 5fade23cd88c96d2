// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Abstract Syntax Tree (AST) definitions for scripts.
//!
//! These structures follow ESTree naming where possible.

use std::rc::Rc;

/// A complete script.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// The statements in the program
    pub body: Vec<Statement>,
}

/// An identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    /// The name of the identifier
    pub name: String,
}

impl Identifier {
    /// Creates an identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Variable declaration (var, let, const)
    VariableDeclaration(VariableDeclaration),
    /// Function declaration
    FunctionDeclaration(Rc<FunctionNode>),
    /// Expression statement
    Expression(Expression),
    /// Block statement { ... }
    Block(Vec<Statement>),
    /// If statement
    If(IfStatement),
    /// Return statement
    Return(Option<Expression>),
    /// Empty statement (;)
    Empty,
}

/// Variable declaration kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    /// var declaration
    Var,
    /// let declaration
    Let,
    /// const declaration
    Const,
}

/// A variable declaration statement.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    /// The kind of declaration
    pub kind: VariableKind,
    /// The declarators
    pub declarations: Vec<VariableDeclarator>,
}

/// A single variable declarator.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclarator {
    /// The identifier being declared
    pub id: Identifier,
    /// Optional initializer expression
    pub init: Option<Expression>,
}

/// An if statement.
#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    /// The condition
    pub test: Expression,
    /// The then branch
    pub consequent: Box<Statement>,
    /// The optional else branch
    pub alternate: Option<Box<Statement>>,
}

/// A function declaration, function expression or arrow function.
///
/// Shared behind an `Rc` so closures can hold on to their code.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionNode {
    /// The function name, if written in the source
    pub id: Option<Identifier>,
    /// The parameters
    pub params: Vec<Identifier>,
    /// The function body
    pub body: FunctionBody,
    /// Whether this is an arrow function (lexical `this`)
    pub is_arrow: bool,
}

/// Function body.
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionBody {
    /// Block body
    Block(Vec<Statement>),
    /// Expression body (arrow functions only)
    Expression(Box<Expression>),
}

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Literal value
    Literal(Literal),
    /// Identifier reference
    Identifier(Identifier),
    /// this keyword
    This,
    /// Array literal
    Array(Vec<Expression>),
    /// Object literal
    Object(Vec<Property>),
    /// Binary expression
    Binary(BinaryExpression),
    /// Unary expression
    Unary(UnaryExpression),
    /// Assignment expression
    Assignment(AssignmentExpression),
    /// Call expression
    Call(CallExpression),
    /// Member access expression
    Member(MemberExpression),
    /// Function or arrow function expression
    Function(Rc<FunctionNode>),
}

impl Expression {
    /// Whether this expression is an anonymous function, which takes its
    /// name from the binding it is assigned to.
    pub fn is_anonymous_function(&self) -> bool {
        matches!(self, Expression::Function(node) if node.id.is_none())
    }
}

/// A literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Numeric literal
    Number(f64),
    /// String literal
    String(String),
    /// Boolean literal
    Boolean(bool),
    /// null literal
    Null,
}

/// An object property.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// The property key
    pub key: PropertyKey,
    /// The property value
    pub value: Expression,
    /// Whether this is shorthand syntax
    pub shorthand: bool,
}

/// A property key.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKey {
    /// Identifier, string or number key, already converted to its name
    Static(String),
    /// Computed key
    Computed(Box<Expression>),
}

/// A binary expression.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpression {
    /// The operator
    pub operator: BinaryOperator,
    /// The left operand
    pub left: Box<Expression>,
    /// The right operand
    pub right: Box<Expression>,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    /// +
    Add,
    /// -
    Subtract,
    /// *
    Multiply,
    /// /
    Divide,
    /// ==
    Equal,
    /// !=
    NotEqual,
    /// ===
    StrictEqual,
    /// !==
    StrictNotEqual,
    /// <
    LessThan,
    /// <=
    LessThanEqual,
    /// >
    GreaterThan,
    /// >=
    GreaterThanEqual,
    /// &&
    LogicalAnd,
    /// ||
    LogicalOr,
}

/// A unary expression.
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpression {
    /// The operator
    pub operator: UnaryOperator,
    /// The operand
    pub argument: Box<Expression>,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    /// -
    Minus,
    /// !
    LogicalNot,
    /// typeof
    Typeof,
}

/// An assignment expression.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentExpression {
    /// The operator
    pub operator: AssignmentOperator,
    /// The left-hand side (identifier or member expression)
    pub left: Box<Expression>,
    /// The right-hand side
    pub right: Box<Expression>,
}

/// Assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentOperator {
    /// =
    Assign,
    /// ||=
    OrAssign,
}

/// A call expression.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    /// The function being called
    pub callee: Box<Expression>,
    /// The arguments
    pub arguments: Vec<Expression>,
}

/// A member access expression.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberExpression {
    /// The object
    pub object: Box<Expression>,
    /// The property
    pub property: MemberProperty,
}

/// The property part of a member expression.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberProperty {
    /// obj.name
    Identifier(Identifier),
    /// obj[expr]
    Computed(Box<Expression>),
}
