use std::cell::RefCell;
use std::rc::Rc;

use crate::class::LoxInstance;
use crate::environment::Environment;
use crate::error::Result;
use crate::interpreter::{Interpreter, Unwind};
use crate::stmt::FunctionDecl;
use crate::value::Value;

/// A host-provided function bound in globals.
#[derive(Clone)]
pub struct NativeFunction {
    pub name: String,
    pub arity: usize,
    pub func: fn(&[Value]) -> Value,
}

/// A user-declared function or method.
///
/// The closure is the environment in effect at the declaration site; it
/// never changes afterwards and is what the resolver's depths were computed
/// against.  Binding a method shares the declaration but wraps the closure
/// in one extra frame holding `this`.
#[derive(Clone)]
pub struct LoxFunction {
    declaration: Rc<FunctionDecl>,
    closure: Rc<RefCell<Environment>>,
    is_initializer: bool,
}

impl LoxFunction {
    pub fn new(
        declaration: Rc<FunctionDecl>,
        closure: Rc<RefCell<Environment>>,
        is_initializer: bool,
    ) -> Self {
        LoxFunction {
            declaration,
            closure,
            is_initializer,
        }
    }

    pub fn name(&self) -> &str {
        &self.declaration.name.lexeme
    }

    pub fn arity(&self) -> usize {
        self.declaration.params.len()
    }

    /// Produce the method bound to `instance`: same declaration and flags,
    /// closure extended with a frame defining `this`.
    pub fn bind(&self, instance: Rc<RefCell<LoxInstance>>) -> LoxFunction {
        let environment = Rc::new(RefCell::new(Environment::with_enclosing(Rc::clone(
            &self.closure,
        ))));
        environment
            .borrow_mut()
            .define("this", Value::Instance(instance));

        LoxFunction::new(
            Rc::clone(&self.declaration),
            environment,
            self.is_initializer,
        )
    }

    /// Invoke the function: fresh frame over the closure, parameters bound
    /// by position, body run as a block.  A `Return` unwind delivers its
    /// value here; initializers always yield the bound `this`, on every
    /// exit path.
    pub fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Value>) -> Result<Value> {
        let environment = Rc::new(RefCell::new(Environment::with_enclosing(Rc::clone(
            &self.closure,
        ))));

        for (param, argument) in self.declaration.params.iter().zip(arguments) {
            environment.borrow_mut().define(&param.lexeme, argument);
        }

        match interpreter.execute_block(&self.declaration.body, environment) {
            Ok(()) => {}

            Err(Unwind::Return(value)) => {
                if !self.is_initializer {
                    return Ok(value);
                }
            }

            Err(Unwind::Error(e)) => return Err(e),
        }

        if self.is_initializer {
            let this = self.closure.borrow().get_local("this");
            Ok(this.unwrap_or(Value::Nil))
        } else {
            Ok(Value::Nil)
        }
    }
}
