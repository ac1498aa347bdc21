use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{LoxError, Result};
use crate::token::Token;
use crate::value::Value;

/// A single frame of name→value bindings plus a link to its enclosing frame.
///
/// Frames are shared (`Rc<RefCell<_>>`): every closure keeps its declaration
/// environment alive, so the frames form a graph across function
/// activations even though the active chain at any moment is linear.
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: None,
        }
    }

    pub fn with_enclosing(enclosing: Rc<RefCell<Environment>>) -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    pub fn define(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    /// Read a binding from the innermost frame only, without climbing.
    pub fn get_local(&self, name: &str) -> Option<Value> {
        self.values.get(name).cloned()
    }

    pub fn get(&self, name: &Token) -> Result<Value> {
        if let Some(value) = self.values.get(&name.lexeme) {
            Ok(value.clone())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow().get(name)
        } else {
            Err(undefined_variable(name))
        }
    }

    pub fn assign(&mut self, name: &Token, value: Value) -> Result<()> {
        if self.values.contains_key(&name.lexeme) {
            self.values.insert(name.lexeme.clone(), value);
            Ok(())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow_mut().assign(name, value)
        } else {
            Err(undefined_variable(name))
        }
    }

    /// Read `name` exactly `distance` frames up from `env`.
    ///
    /// `at` anchors the diagnostic; the looked-up name can differ from its
    /// lexeme (`super` expressions read `this` one frame below `super`).
    pub fn get_at(
        env: &Rc<RefCell<Environment>>,
        distance: usize,
        name: &str,
        at: &Token,
    ) -> Result<Value> {
        let frame = Environment::ancestor(env, distance, at)?;
        let value = frame.borrow().get_local(name);
        value.ok_or_else(|| undefined_variable(at))
    }

    /// Write `name` exactly `distance` frames up from `env`.
    pub fn assign_at(
        env: &Rc<RefCell<Environment>>,
        distance: usize,
        name: &Token,
        value: Value,
    ) -> Result<()> {
        let frame = Environment::ancestor(env, distance, name)?;
        frame.borrow_mut().define(&name.lexeme, value);
        Ok(())
    }

    fn ancestor(
        env: &Rc<RefCell<Environment>>,
        distance: usize,
        at: &Token,
    ) -> Result<Rc<RefCell<Environment>>> {
        let mut current = Rc::clone(env);
        for _ in 0..distance {
            let next = current.borrow().enclosing.clone();
            match next {
                Some(enclosing) => current = enclosing,
                None => return Err(undefined_variable(at)),
            }
        }
        Ok(current)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::new()
    }
}

fn undefined_variable(name: &Token) -> LoxError {
    LoxError::runtime(name, format!("Undefined variable: '{}'.", name.lexeme))
}
