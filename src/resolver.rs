use std::collections::HashMap;
use std::mem;

use crate::error::ResolveError;
use crate::expr::{Expr, ExprVisitor};
use crate::interpreter::Interpreter;
use crate::stmt::{Stmt, StmtVisitor};
use crate::token::Token;

#[derive(Clone, Copy, PartialEq)]
enum FunctionType {
    None,
    Function,
    Initializer,
    Method,
}

#[derive(Clone, Copy, PartialEq)]
enum ClassType {
    None,
    Class,
    Subclass,
}

/// A static pass over the AST that computes, for every variable reference,
/// how many enclosing scopes out its declaration lives. The result feeds
/// `Interpreter::resolve` so the interpreter never has to search scopes at
/// runtime.
pub struct Resolver<'a> {
    interpreter: &'a mut Interpreter,
    scopes: Vec<HashMap<String, bool>>,
    current_function: FunctionType,
    current_class: ClassType,
    errors: Vec<ResolveError>,
}

impl<'a> Resolver<'a> {
    pub fn new(interpreter: &'a mut Interpreter) -> Self {
        Resolver {
            interpreter,
            scopes: Vec::new(),
            current_function: FunctionType::None,
            current_class: ClassType::None,
            errors: Vec::new(),
        }
    }

    pub fn resolve(mut self, statements: &[Stmt]) -> Vec<ResolveError> {
        self.resolve_statements(statements);
        self.errors
    }

    fn resolve_statements(&mut self, statements: &[Stmt]) {
        for statement in statements {
            self.resolve_stmt(statement);
        }
    }

    fn resolve_stmt(&mut self, stmt: &Stmt) {
        stmt.accept(self);
    }

    fn resolve_expr(&mut self, expr: &Expr) {
        expr.accept(self);
    }

    fn resolve_function(&mut self, name: &Token, params: &[Token], body: &[Stmt], r#type: FunctionType) {
        let enclosing_function = mem::replace(&mut self.current_function, r#type);

        self.begin_scope();
        for param in params {
            self.declare(param);
            self.define(param);
        }
        self.resolve_statements(body);
        self.end_scope();

        let _ = name;
        self.current_function = enclosing_function;
    }

    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    fn declare(&mut self, name: &Token) {
        let Some(scope) = self.scopes.last_mut() else { return };

        if scope.contains_key(&name.lexeme) {
            self.errors.push(ResolveError {
                token: name.clone(),
                message: "Already a variable with this name in this scope.".to_string(),
            });
        }

        scope.insert(name.lexeme.clone(), false);
    }

    fn define(&mut self, name: &Token) {
        let Some(scope) = self.scopes.last_mut() else { return };
        scope.insert(name.lexeme.clone(), true);
    }

    fn resolve_local(&mut self, expr: &Expr, name: &Token) {
        for (i, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(&name.lexeme) {
                self.interpreter.resolve(expr, i);
                return;
            }
        }
    }
}

impl ExprVisitor<()> for Resolver<'_> {
    fn visit_variable_expr(&mut self, expr: &Expr) {
        let Expr::Variable(data) = expr else { unreachable!() };

        if let Some(scope) = self.scopes.last() {
            if scope.get(&data.name.lexeme) == Some(&false) {
                self.errors.push(ResolveError {
                    token: data.name.clone(),
                    message: "Can't read local variable in its own initializer.".to_string(),
                });
            }
        }

        self.resolve_local(expr, &data.name);
    }

    fn visit_assign_expr(&mut self, expr: &Expr) {
        let Expr::Assign(data) = expr else { unreachable!() };

        self.resolve_expr(&data.value);
        self.resolve_local(expr, &data.name);
    }

    fn visit_literal_expr(&mut self, expr: &Expr) {
        let Expr::Literal(_) = expr else { unreachable!() };
    }

    fn visit_logical_expr(&mut self, expr: &Expr) {
        let Expr::Logical(data) = expr else { unreachable!() };

        self.resolve_expr(&data.left);
        self.resolve_expr(&data.right);
    }

    fn visit_unary_expr(&mut self, expr: &Expr) {
        let Expr::Unary(data) = expr else { unreachable!() };
        self.resolve_expr(&data.expr);
    }

    fn visit_binary_expr(&mut self, expr: &Expr) {
        let Expr::Binary(data) = expr else { unreachable!() };

        self.resolve_expr(&data.left);
        self.resolve_expr(&data.right);
    }

    fn visit_grouping_expr(&mut self, expr: &Expr) {
        let Expr::Grouping(data) = expr else { unreachable!() };
        self.resolve_expr(&data.expr);
    }

    fn visit_call_expr(&mut self, expr: &Expr) {
        let Expr::Call(data) = expr else { unreachable!() };

        self.resolve_expr(&data.callee);
        for argument in &data.arguments {
            self.resolve_expr(argument);
        }
    }

    fn visit_get_expr(&mut self, expr: &Expr) {
        let Expr::Get(data) = expr else { unreachable!() };
        self.resolve_expr(&data.object);
    }

    fn visit_set_expr(&mut self, expr: &Expr) {
        let Expr::Set(data) = expr else { unreachable!() };

        self.resolve_expr(&data.value);
        self.resolve_expr(&data.object);
    }

    fn visit_this_expr(&mut self, expr: &Expr) {
        let Expr::This(data) = expr else { unreachable!() };

        if self.current_class == ClassType::None {
            self.errors.push(ResolveError {
                token: data.keyword.clone(),
                message: "Can't use 'this' outside of a class.".to_string(),
            });
            return;
        }

        self.resolve_local(expr, &data.keyword);
    }

    fn visit_super_expr(&mut self, expr: &Expr) {
        let Expr::Super(data) = expr else { unreachable!() };

        match self.current_class {
            ClassType::Subclass => {}
            ClassType::None => self.errors.push(ResolveError {
                token: data.keyword.clone(),
                message: "Can't use 'super' outside of a class.".to_string(),
            }),
            ClassType::Class => self.errors.push(ResolveError {
                token: data.keyword.clone(),
                message: "Can't use 'super' in a class with no superclass.".to_string(),
            }),
        }

        self.resolve_local(expr, &data.keyword);
    }
}

impl StmtVisitor<()> for Resolver<'_> {
    fn visit_block_stmt(&mut self, stmt: &Stmt) {
        let Stmt::Block(data) = stmt else { unreachable!() };

        self.begin_scope();
        self.resolve_statements(&data.statements);
        self.end_scope();
    }

    fn visit_var_stmt(&mut self, stmt: &Stmt) {
        let Stmt::Var(data) = stmt else { unreachable!() };

        self.declare(&data.name);
        if let Some(initializer) = &data.initializer {
            self.resolve_expr(initializer);
        }
        self.define(&data.name);
    }

    fn visit_function_stmt(&mut self, stmt: &Stmt) {
        let Stmt::Function(declaration) = stmt else { unreachable!() };

        self.declare(&declaration.name);
        self.define(&declaration.name);

        self.resolve_function(&declaration.name, &declaration.params, &declaration.body, FunctionType::Function);
    }

    fn visit_expression_stmt(&mut self, stmt: &Stmt) {
        let Stmt::Expression(data) = stmt else { unreachable!() };
        self.resolve_expr(&data.expr);
    }

    fn visit_if_stmt(&mut self, stmt: &Stmt) {
        let Stmt::If(data) = stmt else { unreachable!() };

        self.resolve_expr(&data.condition);
        self.resolve_stmt(&data.then_branch);
        if let Some(else_branch) = &data.else_branch {
            self.resolve_stmt(else_branch);
        }
    }

    fn visit_print_stmt(&mut self, stmt: &Stmt) {
        let Stmt::Print(data) = stmt else { unreachable!() };
        self.resolve_expr(&data.expr);
    }

    fn visit_return_stmt(&mut self, stmt: &Stmt) {
        let Stmt::Return(data) = stmt else { unreachable!() };

        if self.current_function == FunctionType::None {
            self.errors.push(ResolveError {
                token: data.keyword.clone(),
                message: "Can't return from top-level code.".to_string(),
            });
        }

        if let Some(value) = &data.value {
            if self.current_function == FunctionType::Initializer {
                self.errors.push(ResolveError {
                    token: data.keyword.clone(),
                    message: "Can't return a value from an initializer.".to_string(),
                });
                return;
            }

            self.resolve_expr(value);
        }
    }

    fn visit_while_stmt(&mut self, stmt: &Stmt) {
        let Stmt::While(data) = stmt else { unreachable!() };

        self.resolve_expr(&data.condition);
        self.resolve_stmt(&data.body);
    }

    fn visit_class_stmt(&mut self, stmt: &Stmt) {
        let Stmt::Class(data) = stmt else { unreachable!() };

        let enclosing_class = mem::replace(&mut self.current_class, ClassType::Class);

        self.declare(&data.name);
        self.define(&data.name);

        if let Some(superclass) = &data.superclass {
            if let Expr::Variable(variable) = superclass {
                if data.name.lexeme == variable.name.lexeme {
                    self.errors.push(ResolveError {
                        token: variable.name.clone(),
                        message: "A class can't inherit from itself.".to_string(),
                    });
                }
            }

            self.current_class = ClassType::Subclass;
            self.resolve_expr(superclass);

            self.begin_scope();
            self.scopes.last_mut().expect("scope stack to be non-empty").insert("super".to_string(), true);
        }

        self.begin_scope();
        self.scopes.last_mut().expect("scope stack to be non-empty").insert("this".to_string(), true);

        for method in &data.methods {
            let declaration = if method.name.lexeme == "init" { FunctionType::Initializer } else { FunctionType::Method };
            self.resolve_function(&method.name, &method.params, &method.body, declaration);
        }

        self.end_scope();

        if data.superclass.is_some() {
            self.end_scope();
        }

        self.current_class = enclosing_class;
    }
}
