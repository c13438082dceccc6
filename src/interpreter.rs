use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;

use crate::class::{Class, Instance};
use crate::environment::Environment;
use crate::error::RuntimeError;
use crate::expr::{Expr, ExprVisitor};
use crate::function::{Function, NativeFunction};
use crate::object::{Callable, Object};
use crate::stmt::{Stmt, StmtVisitor};
use crate::token::{Token, Type};

/// The two ways executing a statement can unwind the normal flow: a runtime
/// error, or a `return` carrying a value back to the enclosing call.
pub enum Signal {
    Error(RuntimeError),
    Return(Object),
}

impl From<RuntimeError> for Signal {
    fn from(error: RuntimeError) -> Self {
        Signal::Error(error)
    }
}

/// Walks the AST and evaluates it directly. Holds the global scope, the
/// current scope, the resolver's scope-distance side table, and the sink
/// `print` writes to.
pub struct Interpreter {
    pub globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    locals: HashMap<*const Expr, usize>,
    out: Box<dyn Write>,
}

impl Interpreter {
    pub fn new(out: Box<dyn Write>) -> Self {
        let globals = Rc::new(RefCell::new(Environment::default()));

        for (name, native) in NativeFunction::globals() {
            globals.borrow_mut().define(name, Object::Callable(Callable::Native(Rc::new(native))));
        }

        Interpreter {
            globals: Rc::clone(&globals),
            environment: globals,
            locals: HashMap::new(),
            out,
        }
    }

    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<(), RuntimeError> {
        for statement in statements {
            match self.execute(statement) {
                Ok(()) => {}
                Err(Signal::Error(error)) => return Err(error),
                Err(Signal::Return(_)) => unreachable!("top-level return is rejected by the resolver"),
            }
        }

        Ok(())
    }

    /// Records the scope distance the resolver computed for `expr`, keyed by
    /// the node's pointer identity.
    pub fn resolve(&mut self, expr: &Expr, depth: usize) {
        self.locals.insert(expr.id(), depth);
    }

    fn look_up_variable(&self, name: &Token, expr: &Expr) -> Result<Object, RuntimeError> {
        match self.locals.get(&expr.id()) {
            Some(distance) => self.environment.borrow().get_at(*distance, name),
            None => self.globals.borrow().get(name),
        }
    }

    fn evaluate(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        expr.accept(self)
    }

    fn execute(&mut self, stmt: &Stmt) -> Result<(), Signal> {
        stmt.accept(self)
    }

    /// Executes `statements` in a fresh child scope of `environment`,
    /// restoring the previous scope afterwards even if execution unwinds.
    pub fn execute_block(&mut self, statements: &[Stmt], environment: Rc<RefCell<Environment>>) -> Result<(), Signal> {
        let previous = std::mem::replace(&mut self.environment, environment);

        let result = (|| {
            for statement in statements {
                self.execute(statement)?;
            }
            Ok(())
        })();

        self.environment = previous;
        result
    }
}

impl ExprVisitor<Result<Object, RuntimeError>> for Interpreter {
    fn visit_literal_expr(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        let Expr::Literal(literal) = expr else { unreachable!() };
        Ok(Object::from(literal))
    }

    fn visit_grouping_expr(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        let Expr::Grouping(data) = expr else { unreachable!() };
        self.evaluate(&data.expr)
    }

    fn visit_variable_expr(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        let Expr::Variable(data) = expr else { unreachable!() };
        self.look_up_variable(&data.name, expr)
    }

    fn visit_assign_expr(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        let Expr::Assign(data) = expr else { unreachable!() };

        let value = self.evaluate(&data.value)?;

        match self.locals.get(&expr.id()) {
            Some(distance) => self.environment.borrow_mut().assign_at(*distance, &data.name, value.clone()),
            None => self.globals.borrow_mut().assign(&data.name, value.clone())?,
        }

        Ok(value)
    }

    fn visit_logical_expr(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        let Expr::Logical(data) = expr else { unreachable!() };

        let left = self.evaluate(&data.left)?;

        match data.operator.r#type {
            Type::Or if left.is_truthy() => Ok(left),
            Type::Or => self.evaluate(&data.right),
            _ if !left.is_truthy() => Ok(left),
            _ => self.evaluate(&data.right),
        }
    }

    fn visit_unary_expr(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        let Expr::Unary(data) = expr else { unreachable!() };

        let right = self.evaluate(&data.expr)?;

        match data.operator.r#type {
            Type::Minus => match right {
                Object::Number(n) => Ok(Object::Number(-n)),
                _ => Err(RuntimeError { token: data.operator.clone(), message: "Operand must be a number.".to_string() }),
            },
            Type::Bang => Ok(Object::Bool(!right.is_truthy())),
            _ => unreachable!(),
        }
    }

    fn visit_binary_expr(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        let Expr::Binary(data) = expr else { unreachable!() };

        let left = self.evaluate(&data.left)?;
        let right = self.evaluate(&data.right)?;

        let numbers_required = || RuntimeError { token: data.operator.clone(), message: "Operands must be numbers.".to_string() };

        match data.operator.r#type {
            Type::Greater => match (left, right) { (Object::Number(l), Object::Number(r)) => Ok(Object::Bool(l > r)), _ => Err(numbers_required()) },
            Type::GreaterEqual => match (left, right) { (Object::Number(l), Object::Number(r)) => Ok(Object::Bool(l >= r)), _ => Err(numbers_required()) },
            Type::Less => match (left, right) { (Object::Number(l), Object::Number(r)) => Ok(Object::Bool(l < r)), _ => Err(numbers_required()) },
            Type::LessEqual => match (left, right) { (Object::Number(l), Object::Number(r)) => Ok(Object::Bool(l <= r)), _ => Err(numbers_required()) },
            Type::BangEqual => Ok(Object::Bool(left != right)),
            Type::EqualEqual => Ok(Object::Bool(left == right)),
            Type::Minus => match (left, right) { (Object::Number(l), Object::Number(r)) => Ok(Object::Number(l - r)), _ => Err(numbers_required()) },
            Type::Slash => match (left, right) { (Object::Number(l), Object::Number(r)) => Ok(Object::Number(l / r)), _ => Err(numbers_required()) },
            Type::Star => match (left, right) { (Object::Number(l), Object::Number(r)) => Ok(Object::Number(l * r)), _ => Err(numbers_required()) },
            Type::Plus => match (left, right) {
                (Object::Number(l), Object::Number(r)) => Ok(Object::Number(l + r)),
                (Object::String(l), Object::String(r)) => Ok(Object::String(l + &r)),
                _ => Err(RuntimeError {
                    token: data.operator.clone(),
                    message: "Operands must be two numbers or two strings.".to_string(),
                }),
            },
            _ => unreachable!(),
        }
    }

    fn visit_call_expr(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        let Expr::Call(data) = expr else { unreachable!() };

        let callee = self.evaluate(&data.callee)?;

        let mut arguments = Vec::with_capacity(data.arguments.len());
        for argument in &data.arguments {
            arguments.push(self.evaluate(argument)?);
        }

        let Object::Callable(callable) = callee else {
            return Err(RuntimeError { token: data.paren.clone(), message: "Can only call functions and classes.".to_string() });
        };

        let arity = callable.arity();
        if arguments.len() != arity {
            return Err(RuntimeError {
                token: data.paren.clone(),
                message: format!("Expected {arity} arguments but got {}.", arguments.len()),
            });
        }

        callable.call(self, &data.paren, arguments)
    }

    fn visit_get_expr(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        let Expr::Get(data) = expr else { unreachable!() };

        let object = self.evaluate(&data.object)?;

        match object {
            Object::Instance(instance) => Instance::get(&instance, &data.name),
            _ => Err(RuntimeError { token: data.name.clone(), message: "Only instances have properties.".to_string() }),
        }
    }

    fn visit_set_expr(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        let Expr::Set(data) = expr else { unreachable!() };

        let object = self.evaluate(&data.object)?;

        let Object::Instance(instance) = object else {
            return Err(RuntimeError { token: data.name.clone(), message: "Only instances have fields.".to_string() });
        };

        let value = self.evaluate(&data.value)?;
        instance.borrow_mut().set(&data.name, value.clone())?;

        Ok(value)
    }

    fn visit_this_expr(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        let Expr::This(data) = expr else { unreachable!() };
        self.look_up_variable(&data.keyword, expr)
    }

    fn visit_super_expr(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        let Expr::Super(data) = expr else { unreachable!() };

        let distance = *self.locals.get(&expr.id()).expect("`super` to always be resolved");

        let superclass_token = Token::new(Type::Super, "super".to_string(), None, data.keyword.line);
        let superclass = self.environment.borrow().get_at(distance, &superclass_token)?;
        let Object::Callable(Callable::Class(superclass)) = superclass else {
            unreachable!("`super` is always bound to a class")
        };

        let this_token = Token::new(Type::This, "this".to_string(), None, data.keyword.line);
        let instance = self.environment.borrow().get_at(distance - 1, &this_token)?;

        let method = superclass.find_method(&data.method.lexeme).ok_or_else(|| RuntimeError {
            token: data.method.clone(),
            message: format!("Undefined property '{}'.", data.method.lexeme),
        })?;

        Ok(Object::from(method.bind(instance)))
    }
}

impl StmtVisitor<Result<(), Signal>> for Interpreter {
    fn visit_expression_stmt(&mut self, stmt: &Stmt) -> Result<(), Signal> {
        let Stmt::Expression(data) = stmt else { unreachable!() };
        self.evaluate(&data.expr)?;
        Ok(())
    }

    fn visit_print_stmt(&mut self, stmt: &Stmt) -> Result<(), Signal> {
        let Stmt::Print(data) = stmt else { unreachable!() };
        let value = self.evaluate(&data.expr)?;
        writeln!(self.out, "{value}").expect("stdout to accept writes");
        Ok(())
    }

    fn visit_var_stmt(&mut self, stmt: &Stmt) -> Result<(), Signal> {
        let Stmt::Var(data) = stmt else { unreachable!() };

        let value = match &data.initializer {
            Some(initializer) => self.evaluate(initializer)?,
            None => Object::Nil,
        };

        self.environment.borrow_mut().define(&data.name.lexeme, value);
        Ok(())
    }

    fn visit_block_stmt(&mut self, stmt: &Stmt) -> Result<(), Signal> {
        let Stmt::Block(data) = stmt else { unreachable!() };
        let environment = Rc::new(RefCell::new(Environment::new(Some(Rc::clone(&self.environment)))));
        self.execute_block(&data.statements, environment)
    }

    fn visit_if_stmt(&mut self, stmt: &Stmt) -> Result<(), Signal> {
        let Stmt::If(data) = stmt else { unreachable!() };

        if self.evaluate(&data.condition)?.is_truthy() {
            self.execute(&data.then_branch)
        } else if let Some(else_branch) = &data.else_branch {
            self.execute(else_branch)
        } else {
            Ok(())
        }
    }

    fn visit_while_stmt(&mut self, stmt: &Stmt) -> Result<(), Signal> {
        let Stmt::While(data) = stmt else { unreachable!() };

        while self.evaluate(&data.condition)?.is_truthy() {
            self.execute(&data.body)?;
        }

        Ok(())
    }

    fn visit_function_stmt(&mut self, stmt: &Stmt) -> Result<(), Signal> {
        let Stmt::Function(declaration) = stmt else { unreachable!() };
        let function = Function::new(Rc::clone(declaration), Rc::clone(&self.environment), false);
        self.environment.borrow_mut().define(&declaration.name.lexeme, Object::from(function));
        Ok(())
    }

    fn visit_return_stmt(&mut self, stmt: &Stmt) -> Result<(), Signal> {
        let Stmt::Return(data) = stmt else { unreachable!() };

        let value = match &data.value {
            Some(expr) => self.evaluate(expr)?,
            None => Object::Nil,
        };

        Err(Signal::Return(value))
    }

    fn visit_class_stmt(&mut self, stmt: &Stmt) -> Result<(), Signal> {
        let Stmt::Class(data) = stmt else { unreachable!() };

        let superclass = match &data.superclass {
            Some(superclass_expr) => {
                let value = self.evaluate(superclass_expr)?;
                let Object::Callable(Callable::Class(class)) = value else {
                    let token = match superclass_expr {
                        Expr::Variable(v) => v.name.clone(),
                        _ => data.name.clone(),
                    };
                    return Err(Signal::Error(RuntimeError { token, message: "Superclass must be a class.".to_string() }));
                };
                Some(class)
            }
            None => None,
        };

        let outer_environment = Rc::clone(&self.environment);
        if let Some(superclass) = &superclass {
            let scope = Rc::new(RefCell::new(Environment::new(Some(Rc::clone(&self.environment)))));
            scope.borrow_mut().define("super", Object::from(Rc::clone(superclass)));
            self.environment = scope;
        }

        let methods = data.methods.iter().map(|declaration| {
            let is_initializer = declaration.name.lexeme == "init";
            let function = Rc::new(Function::new(Rc::clone(declaration), Rc::clone(&self.environment), is_initializer));
            (declaration.name.lexeme.clone(), function)
        }).collect::<HashMap<String, Rc<Function>>>();

        let class = Rc::new(Class::new(data.name.lexeme.clone(), superclass, methods));

        if data.superclass.is_some() {
            self.environment = outer_environment;
        }

        self.environment.borrow_mut().define(&data.name.lexeme, Object::from(class));
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::expr::{BinaryData, LogicalData, UnaryData, VariableData};
    use crate::literal::Literal;

    fn interpreter() -> Interpreter {
        Interpreter::new(Box::new(Vec::new()))
    }

    #[test]
    fn evaluate_literal() {
        let mut interpreter = interpreter();
        let expr = Expr::Literal(Literal::Number(12.0));
        assert_eq!(interpreter.evaluate(&expr).unwrap(), Object::Number(12.0));
    }

    #[test]
    fn evaluate_unary_negation() {
        let mut interpreter = interpreter();
        let expr = Expr::Unary(UnaryData {
            operator: Token::new(Type::Minus, "-".to_string(), None, 1),
            expr: Box::new(Expr::Literal(Literal::Number(12.0))),
        });
        assert_eq!(interpreter.evaluate(&expr).unwrap(), Object::Number(-12.0));
    }

    #[test]
    fn unary_negation_requires_number() {
        let mut interpreter = interpreter();
        let expr = Expr::Unary(UnaryData {
            operator: Token::new(Type::Minus, "-".to_string(), None, 1),
            expr: Box::new(Expr::Literal(Literal::String("x".to_string()))),
        });
        let error = interpreter.evaluate(&expr).unwrap_err();
        assert_eq!(error.message, "Operand must be a number.");
    }

    #[test]
    fn evaluate_arithmetic() {
        let mut interpreter = interpreter();
        let expr = Expr::Binary(BinaryData {
            left: Box::new(Expr::Literal(Literal::Number(6.0))),
            operator: Token::new(Type::Minus, "-".to_string(), None, 1),
            right: Box::new(Expr::Literal(Literal::Number(4.0))),
        });
        assert_eq!(interpreter.evaluate(&expr).unwrap(), Object::Number(2.0));
    }

    #[test]
    fn plus_concatenates_strings() {
        let mut interpreter = interpreter();
        let expr = Expr::Binary(BinaryData {
            left: Box::new(Expr::Literal(Literal::String("Hello, ".to_string()))),
            operator: Token::new(Type::Plus, "+".to_string(), None, 1),
            right: Box::new(Expr::Literal(Literal::String("World".to_string()))),
        });
        assert_eq!(interpreter.evaluate(&expr).unwrap(), Object::String("Hello, World".to_string()));
    }

    #[test]
    fn plus_rejects_mixed_types() {
        let mut interpreter = interpreter();
        let expr = Expr::Binary(BinaryData {
            left: Box::new(Expr::Literal(Literal::String("Hello".to_string()))),
            operator: Token::new(Type::Plus, "+".to_string(), None, 1),
            right: Box::new(Expr::Literal(Literal::Number(12.0))),
        });
        let error = interpreter.evaluate(&expr).unwrap_err();
        assert_eq!(error.message, "Operands must be two numbers or two strings.");
    }

    #[test]
    fn comparisons_require_numbers() {
        let mut interpreter = interpreter();
        let expr = Expr::Binary(BinaryData {
            left: Box::new(Expr::Literal(Literal::String("a".to_string()))),
            operator: Token::new(Type::Greater, ">".to_string(), None, 1),
            right: Box::new(Expr::Literal(Literal::Number(1.0))),
        });
        let error = interpreter.evaluate(&expr).unwrap_err();
        assert_eq!(error.message, "Operands must be numbers.");
    }

    #[test]
    fn logical_or_short_circuits() {
        let mut interpreter = interpreter();
        let expr = Expr::Logical(LogicalData {
            left: Box::new(Expr::Literal(Literal::Bool(true))),
            operator: Token::new(Type::Or, "or".to_string(), None, 1),
            right: Box::new(Expr::Literal(Literal::Bool(false))),
        });
        assert_eq!(interpreter.evaluate(&expr).unwrap(), Object::Bool(true));
    }

    #[test]
    fn undefined_variable_errors() {
        let mut interpreter = interpreter();
        let name = Token::new(Type::Identifier, "x".to_string(), None, 1);
        let expr = Expr::Variable(VariableData { name: name.clone() });
        let error = interpreter.evaluate(&expr).unwrap_err();
        assert_eq!(error.message, "Undefined variable 'x'.");
    }

    #[test]
    fn interpret_runs_statements_in_order() {
        let mut interpreter = interpreter();
        let statements = vec![
            Stmt::Var(crate::stmt::VarData {
                name: Token::new(Type::Identifier, "a".to_string(), None, 1),
                initializer: Some(Expr::Literal(Literal::Number(1.0))),
            }),
            Stmt::Print(crate::stmt::PrintData {
                expr: Expr::Variable(VariableData { name: Token::new(Type::Identifier, "a".to_string(), None, 1) }),
            }),
        ];
        assert!(interpreter.interpret(&statements).is_ok());
    }
}
