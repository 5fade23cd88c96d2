// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! A tree-walking interpreter over the AST.
//!
//! Scripts run in sloppy-mode-like fashion: assigning an undeclared name
//! creates a global, and refused property writes are silently ignored.
//! Top-level `var` and function declarations become properties of the
//! global object, while `let` and `const` live in the root scope.

use crate::ast::{self, *};
use crate::parser::Parser;
use rustc_hash::FxHashMap;
use spacey_value::{Error, Function, Object, ObjectRef, PropertyKey, Result, Value, object};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::trace;

/// A single variable binding.
#[derive(Debug)]
struct Binding {
    value: Value,
    mutable: bool,
    initialized: bool,
}

/// A lexical scope.
#[derive(Debug)]
struct Scope {
    bindings: RefCell<FxHashMap<String, Binding>>,
    parent: Option<Rc<Scope>>,
    global: ObjectRef,
    /// `this` for function and root scopes; `None` for blocks and arrows
    this: Option<Value>,
    is_function: bool,
}

impl Scope {
    /// Creates the root scope backed by a global object.
    fn root(global: ObjectRef, this: Value) -> Rc<Self> {
        Rc::new(Self {
            bindings: RefCell::new(FxHashMap::default()),
            parent: None,
            global,
            this: Some(this),
            is_function: true,
        })
    }

    fn child(parent: &Rc<Scope>, this: Option<Value>, is_function: bool) -> Rc<Self> {
        Rc::new(Self {
            bindings: RefCell::new(FxHashMap::default()),
            parent: Some(Rc::clone(parent)),
            global: Rc::clone(&parent.global),
            this,
            is_function,
        })
    }

    fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    fn this(&self) -> Value {
        let mut scope = self;
        loop {
            if let Some(this) = &scope.this {
                return this.clone();
            }
            match &scope.parent {
                Some(parent) => scope = &**parent,
                None => return Value::Undefined,
            }
        }
    }

    fn global_value(&self) -> Value {
        Value::Object(Rc::clone(&self.global))
    }

    fn declare(&self, name: &str, value: Value, mutable: bool) {
        self.bindings.borrow_mut().insert(
            name.to_string(),
            Binding {
                value,
                mutable,
                initialized: true,
            },
        );
    }

    fn declare_uninitialized(&self, name: &str, mutable: bool) -> Result<()> {
        let mut bindings = self.bindings.borrow_mut();
        if bindings.contains_key(name) {
            return Err(Error::syntax_error(format!(
                "Identifier '{}' has already been declared",
                name
            )));
        }
        bindings.insert(
            name.to_string(),
            Binding {
                value: Value::Undefined,
                mutable,
                initialized: false,
            },
        );
        Ok(())
    }

    fn initialize(&self, name: &str, value: Value, mutable: bool) {
        self.declare(name, value, mutable);
    }

    /// Whether `name` resolves to anything, for `typeof`.
    fn resolves(&self, name: &str) -> bool {
        let mut scope = self;
        loop {
            if scope.bindings.borrow().contains_key(name) {
                return true;
            }
            match &scope.parent {
                Some(parent) => scope = &**parent,
                None => return self.global.borrow().has(&PropertyKey::from(name)),
            }
        }
    }

    fn lookup(&self, name: &str) -> Result<Value> {
        let mut scope = self;
        loop {
            if let Some(binding) = scope.bindings.borrow().get(name) {
                if !binding.initialized {
                    return Err(Error::reference_error(format!(
                        "Cannot access '{}' before initialization",
                        name
                    )));
                }
                return Ok(binding.value.clone());
            }
            match &scope.parent {
                Some(parent) => scope = &**parent,
                None => break,
            }
        }

        let key = PropertyKey::from(name);
        if !self.global.borrow().has(&key) {
            return Err(Error::reference_error(format!("{} is not defined", name)));
        }
        object::get(&self.global, &key, &self.global_value())
    }

    fn assign(&self, name: &str, value: Value) -> Result<()> {
        let mut scope = self;
        loop {
            if let Some(binding) = scope.bindings.borrow_mut().get_mut(name) {
                if !binding.initialized {
                    return Err(Error::reference_error(format!(
                        "Cannot access '{}' before initialization",
                        name
                    )));
                }
                if !binding.mutable {
                    return Err(Error::type_error("Assignment to constant variable."));
                }
                binding.value = value;
                return Ok(());
            }
            match &scope.parent {
                Some(parent) => scope = &**parent,
                None => break,
            }
        }

        object::put(&self.global, PropertyKey::from(name), value, &self.global_value())?;
        Ok(())
    }

    /// The nearest function (or root) scope, where `var` lives.
    fn var_scope(self: &Rc<Self>) -> Rc<Scope> {
        let mut scope = Rc::clone(self);
        while !scope.is_function {
            let parent = match &scope.parent {
                Some(parent) => Rc::clone(parent),
                None => break,
            };
            scope = parent;
        }
        scope
    }
}

/// How a statement list finished.
#[derive(Debug)]
enum Completion {
    /// Ran to the end; carries the value of the last expression statement
    Normal(Option<Value>),
    /// Hit a `return`
    Return(Value),
}

/// Evaluates programs against a global object.
#[derive(Debug, Clone)]
pub struct Interpreter {
    scope: Rc<Scope>,
}

impl Interpreter {
    /// Creates an interpreter whose top-level `this` is the global object.
    pub fn new(global: ObjectRef) -> Self {
        let this = Value::Object(Rc::clone(&global));
        Self::with_this(global, this)
    }

    /// Creates an interpreter with an explicit top-level `this`.
    pub fn with_this(global: ObjectRef, this: Value) -> Self {
        Self {
            scope: Scope::root(global, this),
        }
    }

    /// The global object.
    pub fn global(&self) -> &ObjectRef {
        &self.scope.global
    }

    /// Parses and runs `source`, returning the completion value.
    pub fn eval(&self, source: &str) -> Result<Value> {
        let program = Parser::new(source).parse_program()?;
        self.execute(&program)
    }

    /// Runs a parsed program, returning the value of the last expression
    /// statement. A top-level `return` ends the program with its value.
    pub fn execute(&self, program: &Program) -> Result<Value> {
        trace!("executing program with {} statements", program.body.len());
        hoist_vars(&program.body, &self.scope)?;

        match exec_statements(&program.body, &self.scope)? {
            Completion::Normal(value) => Ok(value.unwrap_or_default()),
            Completion::Return(value) => Ok(value),
        }
    }
}

/// Declares every `var` in `body` (including nested blocks) in `scope`.
fn hoist_vars(body: &[Statement], scope: &Rc<Scope>) -> Result<()> {
    for stmt in body {
        match stmt {
            Statement::VariableDeclaration(decl) if decl.kind == VariableKind::Var => {
                for declarator in &decl.declarations {
                    let name = declarator.id.name.as_str();
                    if scope.is_root() {
                        let key = PropertyKey::from(name);
                        let mut global = scope.global.borrow_mut();
                        if !global.has(&key) {
                            global.set(key, Value::Undefined);
                        }
                    } else if !scope.bindings.borrow().contains_key(name) {
                        scope.declare(name, Value::Undefined, true);
                    }
                }
            }
            Statement::Block(body) => hoist_vars(body, scope)?,
            Statement::If(stmt) => {
                hoist_vars(std::slice::from_ref(&*stmt.consequent), scope)?;
                if let Some(alternate) = &stmt.alternate {
                    hoist_vars(std::slice::from_ref(&**alternate), scope)?;
                }
            }
            _ => {}
        }
    }
    Ok(())
}

/// Declares the lexical bindings and functions of one statement list.
fn hoist_lexical(body: &[Statement], scope: &Rc<Scope>) -> Result<()> {
    for stmt in body {
        match stmt {
            Statement::VariableDeclaration(decl) if decl.kind != VariableKind::Var => {
                let mutable = decl.kind == VariableKind::Let;
                for declarator in &decl.declarations {
                    scope.declare_uninitialized(&declarator.id.name, mutable)?;
                }
            }
            Statement::FunctionDeclaration(node) => {
                let name = node.id.as_ref().map(|id| id.name.as_str()).unwrap_or_default();
                let func = create_function(node, scope, name);
                if scope.is_root() {
                    object::put(&scope.global, PropertyKey::from(name), func, &scope.global_value())?;
                } else {
                    scope.declare(name, func, true);
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn exec_statements(body: &[Statement], scope: &Rc<Scope>) -> Result<Completion> {
    hoist_lexical(body, scope)?;

    let mut last = None;
    for stmt in body {
        match exec_statement(stmt, scope)? {
            Completion::Normal(Some(value)) => last = Some(value),
            Completion::Normal(None) => {}
            done @ Completion::Return(_) => return Ok(done),
        }
    }
    Ok(Completion::Normal(last))
}

fn exec_statement(stmt: &Statement, scope: &Rc<Scope>) -> Result<Completion> {
    match stmt {
        Statement::Expression(expr) => Ok(Completion::Normal(Some(evaluate(expr, scope)?))),
        Statement::VariableDeclaration(decl) => {
            exec_variable_declaration(decl, scope)?;
            Ok(Completion::Normal(None))
        }
        Statement::FunctionDeclaration(_) | Statement::Empty => Ok(Completion::Normal(None)),
        Statement::Block(body) => {
            let block = Scope::child(scope, None, false);
            exec_statements(body, &block)
        }
        Statement::If(stmt) => {
            if evaluate(&stmt.test, scope)?.to_boolean() {
                exec_statement(&stmt.consequent, scope)
            } else if let Some(alternate) = &stmt.alternate {
                exec_statement(alternate, scope)
            } else {
                Ok(Completion::Normal(None))
            }
        }
        Statement::Return(argument) => {
            let value = match argument {
                Some(expr) => evaluate(expr, scope)?,
                None => Value::Undefined,
            };
            Ok(Completion::Return(value))
        }
    }
}

fn exec_variable_declaration(decl: &VariableDeclaration, scope: &Rc<Scope>) -> Result<()> {
    for declarator in &decl.declarations {
        let name = declarator.id.name.as_str();
        match (&declarator.init, decl.kind) {
            (Some(init), VariableKind::Var) => {
                let value = evaluate_named(init, name, scope)?;
                scope.var_scope().assign(name, value)?;
            }
            (None, VariableKind::Var) => {}
            (init, kind) => {
                let value = match init {
                    Some(init) => evaluate_named(init, name, scope)?,
                    None => Value::Undefined,
                };
                scope.initialize(name, value, kind == VariableKind::Let);
            }
        }
    }
    Ok(())
}

/// Evaluates `expr`, naming it `name` if it is an anonymous function.
fn evaluate_named(expr: &Expression, name: &str, scope: &Rc<Scope>) -> Result<Value> {
    match expr {
        Expression::Function(node) if node.id.is_none() => Ok(create_function(node, scope, name)),
        _ => evaluate(expr, scope),
    }
}

fn evaluate(expr: &Expression, scope: &Rc<Scope>) -> Result<Value> {
    match expr {
        Expression::Literal(literal) => Ok(match literal {
            Literal::Number(n) => Value::Number(*n),
            Literal::String(s) => Value::String(s.clone()),
            Literal::Boolean(b) => Value::Boolean(*b),
            Literal::Null => Value::Null,
        }),
        Expression::Identifier(id) => scope.lookup(&id.name),
        Expression::This => Ok(scope.this()),
        Expression::Array(elements) => {
            let values = elements
                .iter()
                .map(|element| evaluate(element, scope))
                .collect::<Result<Vec<_>>>()?;
            Ok(Value::array(values))
        }
        Expression::Object(properties) => evaluate_object(properties, scope),
        Expression::Binary(binary) => evaluate_binary(binary, scope),
        Expression::Unary(unary) => evaluate_unary(unary, scope),
        Expression::Assignment(assignment) => evaluate_assignment(assignment, scope),
        Expression::Call(call) => evaluate_call(call, scope),
        Expression::Member(member) => {
            let object = evaluate(&member.object, scope)?;
            let key = member_key(&member.property, scope)?;
            object.get(&key)
        }
        Expression::Function(node) => {
            let name = node.id.as_ref().map(|id| id.name.as_str()).unwrap_or_default();
            Ok(create_function(node, scope, name))
        }
    }
}

fn evaluate_object(properties: &[Property], scope: &Rc<Scope>) -> Result<Value> {
    let mut object = Object::new();

    for property in properties {
        let (key, value) = match &property.key {
            ast::PropertyKey::Static(name) => (
                PropertyKey::from(name.as_str()),
                evaluate_named(&property.value, name, scope)?,
            ),
            ast::PropertyKey::Computed(expr) => {
                let key = evaluate(expr, scope)?.to_property_key();
                (key, evaluate(&property.value, scope)?)
            }
        };
        object.set(key, value);
    }

    Ok(Value::object(object))
}

fn member_key(property: &MemberProperty, scope: &Rc<Scope>) -> Result<PropertyKey> {
    match property {
        MemberProperty::Identifier(id) => Ok(id.name.as_str().into()),
        MemberProperty::Computed(expr) => Ok(evaluate(expr, scope)?.to_property_key()),
    }
}

fn evaluate_assignment(assignment: &AssignmentExpression, scope: &Rc<Scope>) -> Result<Value> {
    let or_assign = assignment.operator == AssignmentOperator::OrAssign;

    match &*assignment.left {
        Expression::Identifier(id) => {
            if or_assign {
                let current = scope.lookup(&id.name)?;
                if current.to_boolean() {
                    return Ok(current);
                }
            }
            let value = evaluate_named(&assignment.right, &id.name, scope)?;
            scope.assign(&id.name, value.clone())?;
            Ok(value)
        }
        Expression::Member(member) => {
            let object = evaluate(&member.object, scope)?;
            let key = member_key(&member.property, scope)?;
            if or_assign {
                let current = object.get(&key)?;
                if current.to_boolean() {
                    return Ok(current);
                }
            }
            let value = evaluate(&assignment.right, scope)?;
            // refused writes are ignored, as in sloppy mode
            if !object.set(key.clone(), value.clone())? {
                trace!("write to {} refused", key);
            }
            Ok(value)
        }
        _ => Err(Error::syntax_error("Invalid left-hand side in assignment")),
    }
}

fn evaluate_call(call: &CallExpression, scope: &Rc<Scope>) -> Result<Value> {
    let (this, callee) = match &*call.callee {
        Expression::Member(member) => {
            let object = evaluate(&member.object, scope)?;
            let key = member_key(&member.property, scope)?;
            let callee = object.get(&key)?;
            (object, callee)
        }
        other => (Value::Undefined, evaluate(other, scope)?),
    };

    let args = call
        .arguments
        .iter()
        .map(|arg| evaluate(arg, scope))
        .collect::<Result<Vec<_>>>()?;

    match callee.as_function() {
        Some(func) => func.call(&this, &args),
        None => Err(Error::type_error(format!(
            "{} is not a function",
            describe(&call.callee)
        ))),
    }
}

fn evaluate_unary(unary: &UnaryExpression, scope: &Rc<Scope>) -> Result<Value> {
    if unary.operator == UnaryOperator::Typeof {
        if let Expression::Identifier(id) = &*unary.argument {
            if !scope.resolves(&id.name) {
                return Ok(Value::from("undefined"));
            }
        }
        let value = evaluate(&unary.argument, scope)?;
        return Ok(Value::from(value.type_of()));
    }

    let value = evaluate(&unary.argument, scope)?;
    Ok(match unary.operator {
        UnaryOperator::LogicalNot => Value::Boolean(!value.to_boolean()),
        UnaryOperator::Minus => Value::Number(-to_numeric(&value)?),
        UnaryOperator::Typeof => Value::from(value.type_of()),
    })
}

fn evaluate_binary(binary: &BinaryExpression, scope: &Rc<Scope>) -> Result<Value> {
    let left = evaluate(&binary.left, scope)?;

    match binary.operator {
        BinaryOperator::LogicalAnd if !left.to_boolean() => return Ok(left),
        BinaryOperator::LogicalOr if left.to_boolean() => return Ok(left),
        BinaryOperator::LogicalAnd | BinaryOperator::LogicalOr => {
            return evaluate(&binary.right, scope);
        }
        _ => {}
    }

    let right = evaluate(&binary.right, scope)?;

    Ok(match binary.operator {
        BinaryOperator::Add => add(&left, &right)?,
        BinaryOperator::Subtract => Value::Number(to_numeric(&left)? - to_numeric(&right)?),
        BinaryOperator::Multiply => Value::Number(to_numeric(&left)? * to_numeric(&right)?),
        BinaryOperator::Divide => Value::Number(to_numeric(&left)? / to_numeric(&right)?),
        BinaryOperator::StrictEqual => Value::Boolean(left == right),
        BinaryOperator::StrictNotEqual => Value::Boolean(left != right),
        BinaryOperator::Equal => Value::Boolean(loose_equals(&left, &right)),
        BinaryOperator::NotEqual => Value::Boolean(!loose_equals(&left, &right)),
        BinaryOperator::LessThan => compare(&left, &right, |o| o.is_lt())?,
        BinaryOperator::LessThanEqual => compare(&left, &right, |o| o.is_le())?,
        BinaryOperator::GreaterThan => compare(&left, &right, |o| o.is_gt())?,
        BinaryOperator::GreaterThanEqual => compare(&left, &right, |o| o.is_ge())?,
        BinaryOperator::LogicalAnd | BinaryOperator::LogicalOr => right,
    })
}

fn to_numeric(value: &Value) -> Result<f64> {
    match value {
        Value::Symbol(_) => Err(Error::type_error("Cannot convert a Symbol value to a number")),
        other => Ok(other.to_number()),
    }
}

fn add(left: &Value, right: &Value) -> Result<Value> {
    let concatenates = |v: &Value| {
        !matches!(
            v,
            Value::Undefined | Value::Null | Value::Boolean(_) | Value::Number(_)
        )
    };

    if concatenates(left) || concatenates(right) {
        if matches!(left, Value::Symbol(_)) || matches!(right, Value::Symbol(_)) {
            return Err(Error::type_error("Cannot convert a Symbol value to a string"));
        }
        Ok(Value::String(left.to_js_string() + &right.to_js_string()))
    } else {
        Ok(Value::Number(left.to_number() + right.to_number()))
    }
}

fn loose_equals(left: &Value, right: &Value) -> bool {
    (left.is_nullish() && right.is_nullish()) || left == right
}

fn compare(left: &Value, right: &Value, test: impl Fn(std::cmp::Ordering) -> bool) -> Result<Value> {
    let ordering = match (left, right) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => to_numeric(left)?.partial_cmp(&to_numeric(right)?),
    };
    Ok(Value::Boolean(ordering.is_some_and(test)))
}

/// Source-like rendering of a callee for error messages.
fn describe(expr: &Expression) -> String {
    match expr {
        Expression::Identifier(id) => id.name.clone(),
        Expression::This => "this".to_string(),
        Expression::Member(member) => match &member.property {
            MemberProperty::Identifier(id) => format!("{}.{}", describe(&member.object), id.name),
            MemberProperty::Computed(_) => format!("{}[...]", describe(&member.object)),
        },
        Expression::Call(call) => format!("{}(...)", describe(&call.callee)),
        _ => "expression".to_string(),
    }
}

fn create_function(node: &Rc<FunctionNode>, scope: &Rc<Scope>, name: &str) -> Value {
    let code = Rc::clone(node);
    let closure = Rc::clone(scope);
    Value::from(Function::native(name, node.params.len(), move |this, args| {
        call_function(&code, &closure, this, args)
    }))
}

fn call_function(node: &FunctionNode, closure: &Rc<Scope>, this: &Value, args: &[Value]) -> Result<Value> {
    let this = if node.is_arrow { None } else { Some(this.clone()) };
    let scope = Scope::child(closure, this, true);

    for (i, param) in node.params.iter().enumerate() {
        scope.declare(&param.name, args.get(i).cloned().unwrap_or_default(), true);
    }

    match &node.body {
        FunctionBody::Expression(expr) => evaluate(expr, &scope),
        FunctionBody::Block(body) => {
            hoist_vars(body, &scope)?;
            match exec_statements(body, &scope)? {
                Completion::Return(value) => Ok(value),
                Completion::Normal(_) => Ok(Value::Undefined),
            }
        }
    }
}
