use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::callable::LoxFunction;
use crate::error::{LoxError, Result};
use crate::interpreter::Interpreter;
use crate::token::Token;
use crate::value::Value;

/// A class: a name, a method table, and an optional superclass.
pub struct LoxClass {
    pub name: String,
    superclass: Option<Rc<LoxClass>>,
    methods: HashMap<String, LoxFunction>,
}

impl LoxClass {
    pub fn new(
        name: String,
        superclass: Option<Rc<LoxClass>>,
        methods: HashMap<String, LoxFunction>,
    ) -> Self {
        LoxClass {
            name,
            superclass,
            methods,
        }
    }

    /// Method lookup climbs the superclass chain, first match wins.
    pub fn find_method(&self, name: &str) -> Option<&LoxFunction> {
        if let Some(method) = self.methods.get(name) {
            return Some(method);
        }

        self.superclass
            .as_deref()
            .and_then(|superclass| superclass.find_method(name))
    }

    /// A class's arity is its initializer's arity, or 0 without one.
    pub fn arity(&self) -> usize {
        self.find_method("init").map_or(0, LoxFunction::arity)
    }

    /// Calling a class constructs an instance, then runs `init` bound to it
    /// if the class (or an ancestor) declares one.
    pub fn call(
        class: &Rc<LoxClass>,
        interpreter: &mut Interpreter,
        arguments: Vec<Value>,
    ) -> Result<Value> {
        let instance = Rc::new(RefCell::new(LoxInstance::new(Rc::clone(class))));

        if let Some(initializer) = class.find_method("init") {
            initializer.bind(Rc::clone(&instance)).call(interpreter, arguments)?;
        }

        Ok(Value::Instance(instance))
    }
}

/// An instance: its class plus a field map created on assignment.
pub struct LoxInstance {
    class: Rc<LoxClass>,
    fields: HashMap<String, Value>,
}

impl LoxInstance {
    pub fn new(class: Rc<LoxClass>) -> Self {
        LoxInstance {
            class,
            fields: HashMap::new(),
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class.name
    }

    /// Property read: fields shadow methods; a method is returned bound to
    /// the receiving instance.
    pub fn get(instance: &Rc<RefCell<LoxInstance>>, name: &Token) -> Result<Value> {
        if let Some(value) = instance.borrow().fields.get(&name.lexeme) {
            return Ok(value.clone());
        }

        let class = Rc::clone(&instance.borrow().class);
        if let Some(method) = class.find_method(&name.lexeme) {
            return Ok(Value::Function(Rc::new(method.bind(Rc::clone(instance)))));
        }

        Err(LoxError::runtime(
            name,
            format!("Undefined property '{}'.", name.lexeme),
        ))
    }

    pub fn set(&mut self, name: &Token, value: Value) {
        self.fields.insert(name.lexeme.clone(), value);
    }
}
