use std::cell::RefCell;
use std::fmt::{self, Debug, Display};
use std::rc::Rc;

use crate::environment::Environment;
use crate::error::RuntimeError;
use crate::interpreter::{Interpreter, Signal};
use crate::object::Object;
use crate::stmt::FunctionData;
use crate::token::{Token, Type};

/// A user-defined function or method value. Two functions built from the
/// same declaration but bound to different instances (see `bind`) are
/// distinct values — each carries its own closure.
#[derive(Clone)]
pub struct Function {
    pub declaration: Rc<FunctionData>,
    pub closure: Rc<RefCell<Environment>>,
    pub is_initializer: bool,
}

impl Function {
    pub fn new(declaration: Rc<FunctionData>, closure: Rc<RefCell<Environment>>, is_initializer: bool) -> Self {
        Function { declaration, closure, is_initializer }
    }

    /// Returns a copy of this function whose closure additionally defines
    /// `this` as `instance`. Used when a method is accessed off an instance.
    pub fn bind(&self, instance: Object) -> Function {
        let environment = Rc::new(RefCell::new(Environment::new(Some(Rc::clone(&self.closure)))));
        environment.borrow_mut().define("this", instance);

        Function {
            declaration: Rc::clone(&self.declaration),
            closure: environment,
            is_initializer: self.is_initializer,
        }
    }

    pub fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Object>) -> Result<Object, RuntimeError> {
        let environment = Rc::new(RefCell::new(Environment::new(Some(Rc::clone(&self.closure)))));

        for (param, arg) in self.declaration.params.iter().zip(arguments.into_iter()) {
            environment.borrow_mut().define(&param.lexeme, arg);
        }

        match interpreter.execute_block(&self.declaration.body, environment) {
            Ok(()) => {
                if self.is_initializer {
                    self.read_this()
                } else {
                    Ok(Object::Nil)
                }
            }
            Err(Signal::Return(value)) => {
                if self.is_initializer {
                    self.read_this()
                } else {
                    Ok(value)
                }
            }
            Err(Signal::Error(error)) => Err(error),
        }
    }

    fn read_this(&self) -> Result<Object, RuntimeError> {
        self.closure.borrow().get(&Token::new(Type::This, "this".to_string(), None, self.declaration.name.line))
    }

    pub fn arity(&self) -> usize {
        self.declaration.params.len()
    }
}

impl Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}>", self.declaration.name.lexeme)
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}>", self.declaration.name.lexeme)
    }
}

type NativeFn = Rc<dyn Fn(&mut Interpreter, &Token, Vec<Object>) -> Result<Object, RuntimeError>>;

/// A built-in callable implemented in the host language rather than Lox.
/// `func` may close over state (e.g. a specific list instance) to act as a
/// bound native method.
#[derive(Clone)]
pub struct NativeFunction {
    pub name: String,
    pub arity: usize,
    pub display_as_class: bool,
    pub func: NativeFn,
}

impl NativeFunction {
    pub fn call(&self, interpreter: &mut Interpreter, token: &Token, arguments: Vec<Object>) -> Result<Object, RuntimeError> {
        (self.func)(interpreter, token, arguments)
    }

    /// The natives available in every global environment: `clock` and `list`.
    pub fn globals() -> Vec<(&'static str, NativeFunction)> {
        vec![
            ("clock", NativeFunction {
                name: "clock".to_string(),
                arity: 0,
                display_as_class: false,
                func: Rc::new(|_, _, _| {
                    let now = std::time::SystemTime::now()
                        .duration_since(std::time::UNIX_EPOCH)
                        .expect("system clock to be after the Unix epoch");
                    Ok(Object::Number(now.as_secs_f64()))
                }),
            }),
            ("list", NativeFunction {
                name: "list".to_string(),
                arity: 0,
                display_as_class: true,
                func: Rc::new(|_, _, _| Ok(crate::class::Instance::new_list())),
            }),
        ]
    }
}

impl Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.display_as_class { write!(f, "<native class>") } else { write!(f, "<native fn>") }
    }
}

impl Display for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.display_as_class { write!(f, "<native class>") } else { write!(f, "<native fn>") }
    }
}
