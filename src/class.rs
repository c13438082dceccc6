use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{self, Display};
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::function::{Function, NativeFunction};
use crate::interpreter::Interpreter;
use crate::object::{Callable, Object};
use crate::token::Token;

/// A class value. Its method table is fixed once built; instances hold the
/// mutable state.
#[derive(Debug)]
pub struct Class {
    pub name: String,
    pub superclass: Option<Rc<Class>>,
    pub methods: HashMap<String, Rc<Function>>,
}

impl Class {
    pub fn new(name: String, superclass: Option<Rc<Class>>, methods: HashMap<String, Rc<Function>>) -> Self {
        Class { name, superclass, methods }
    }

    /// Looks up a method in this class, falling back to the superclass
    /// chain on miss.
    pub fn find_method(&self, name: &str) -> Option<Rc<Function>> {
        if let Some(method) = self.methods.get(name) {
            return Some(Rc::clone(method));
        }
        self.superclass.as_ref().and_then(|s| s.find_method(name))
    }

    pub fn arity(&self) -> usize {
        self.find_method("init").map(|init| init.arity()).unwrap_or(0)
    }

    /// Constructs an instance and, if an `init` method exists, runs it.
    /// `self_rc` is a separate parameter (rather than an `Rc<Self>`
    /// receiver) so the caller supplies the same `Rc` it already holds.
    pub fn call(self_rc: &Rc<Class>, interpreter: &mut Interpreter, arguments: Vec<Object>) -> Result<Object, RuntimeError> {
        let instance = Rc::new(RefCell::new(Instance::new(Rc::clone(self_rc))));

        if let Some(initializer) = self_rc.find_method("init") {
            initializer.bind(Object::Instance(Rc::clone(&instance))).call(interpreter, arguments)?;
        }

        Ok(Object::Instance(instance))
    }
}

impl Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} class", self.name)
    }
}

/// The state backing an `Instance` value: either a user's class instance
/// with a field map, or the backing sequence of a `list()` native instance.
#[derive(Debug)]
enum Fields {
    User(HashMap<String, Object>),
    List(Vec<Object>),
}

#[derive(Debug)]
pub struct Instance {
    pub class: Option<Rc<Class>>,
    fields: Fields,
}

impl Instance {
    pub fn new(class: Rc<Class>) -> Self {
        Instance { class: Some(class), fields: Fields::User(HashMap::new()) }
    }

    /// Constructs the backing instance for the `list` native.
    pub fn new_list() -> Object {
        Object::Instance(Rc::new(RefCell::new(Instance { class: None, fields: Fields::List(Vec::new()) })))
    }

    pub fn get(this: &Rc<RefCell<Instance>>, name: &Token) -> Result<Object, RuntimeError> {
        let borrowed = this.borrow();
        match &borrowed.fields {
            Fields::User(fields) => {
                if let Some(value) = fields.get(&name.lexeme) {
                    return Ok(value.clone());
                }
                let class = borrowed.class.as_ref().expect("user instance to have a class");
                if let Some(method) = class.find_method(&name.lexeme) {
                    return Ok(Object::from(method.bind(Object::Instance(Rc::clone(this)))));
                }
                Err(RuntimeError {
                    token: name.clone(),
                    message: format!("Undefined property '{}'.", name.lexeme),
                })
            }
            Fields::List(_) => {
                drop(borrowed);
                list_method(this, &name.lexeme).ok_or_else(|| RuntimeError {
                    token: name.clone(),
                    message: format!("Undefined property '{}'.", name.lexeme),
                })
            }
        }
    }

    pub fn set(&mut self, name: &Token, value: Object) -> Result<(), RuntimeError> {
        match &mut self.fields {
            Fields::User(fields) => {
                fields.insert(name.lexeme.clone(), value);
                Ok(())
            }
            Fields::List(_) => Err(RuntimeError {
                token: name.clone(),
                message: "Can't set properties on a native instance.".to_string(),
            }),
        }
    }
}

impl Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.class, &self.fields) {
            (Some(class), _) => write!(f, "{} instance", class.name),
            (None, Fields::List(elements)) => {
                write!(f, "[{}]", elements.iter().map(|e| e.to_string()).collect::<Vec<_>>().join(", "))
            }
            (None, Fields::User(_)) => unreachable!("a class-less instance is always list-backed"),
        }
    }
}

/// Returns an index into a list's elements for a numeric, in-range index.
fn list_index(token: &Token, elements_len: usize, index: &Object) -> Result<usize, RuntimeError> {
    let n = match index {
        Object::Number(n) => *n,
        _ => return Err(RuntimeError {
            token: token.clone(),
            message: "List index must be a number.".to_string(),
        }),
    };

    if n.fract() != 0.0 || n < 0.0 || n as usize >= elements_len {
        return Err(RuntimeError {
            token: token.clone(),
            message: "List index out of range.".to_string(),
        });
    }

    Ok(n as usize)
}

/// Builds a bound native method for a list instance, or `None` if `name`
/// doesn't name one. Each closure captures a clone of the `Rc` so it can
/// mutate the instance's backing vector when called.
fn list_method(instance: &Rc<RefCell<Instance>>, name: &str) -> Option<Object> {
    let instance = Rc::clone(instance);

    let (arity, func): (usize, Rc<dyn Fn(&mut Interpreter, &Token, Vec<Object>) -> Result<Object, RuntimeError>>) = match name {
        "add" => (1, Rc::new(move |_, _, mut args| {
            let Fields::List(elements) = &mut instance.borrow_mut().fields else { unreachable!() };
            elements.push(args.remove(0));
            Ok(Object::Instance(Rc::clone(&instance)))
        })),
        "clear" => (0, Rc::new(move |_, _, _| {
            let Fields::List(elements) = &mut instance.borrow_mut().fields else { unreachable!() };
            elements.clear();
            Ok(Object::Instance(Rc::clone(&instance)))
        })),
        "get" => (1, Rc::new(move |_, token, args| {
            let borrowed = instance.borrow();
            let Fields::List(elements) = &borrowed.fields else { unreachable!() };
            let i = list_index(token, elements.len(), &args[0])?;
            Ok(elements[i].clone())
        })),
        "length" => (0, Rc::new(move |_, _, _| {
            let Fields::List(elements) = &instance.borrow().fields else { unreachable!() };
            Ok(Object::Number(elements.len() as f64))
        })),
        "remove" => (1, Rc::new(move |_, token, args| {
            let mut borrowed = instance.borrow_mut();
            let Fields::List(elements) = &mut borrowed.fields else { unreachable!() };
            let i = list_index(token, elements.len(), &args[0])?;
            elements.remove(i);
            drop(borrowed);
            Ok(Object::Instance(Rc::clone(&instance)))
        })),
        "set" => (2, Rc::new(move |_, token, args| {
            let mut borrowed = instance.borrow_mut();
            let Fields::List(elements) = &mut borrowed.fields else { unreachable!() };
            let i = list_index(token, elements.len(), &args[0])?;
            elements[i] = args[1].clone();
            drop(borrowed);
            Ok(Object::Instance(Rc::clone(&instance)))
        })),
        "toString" => (0, Rc::new(move |_, _, _| Ok(Object::String(instance.borrow().to_string())))),
        _ => return None,
    };

    Some(Object::Callable(Callable::Native(Rc::new(NativeFunction {
        name: name.to_string(),
        arity,
        display_as_class: false,
        func,
    }))))
}
