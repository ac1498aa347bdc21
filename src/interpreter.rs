use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{self, Write};
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::callable::{LoxFunction, NativeFunction};
use crate::class::{LoxClass, LoxInstance};
use crate::environment::Environment;
use crate::error::{LoxError, Result};
use crate::expr::{Expr, ExprId, LiteralValue};
use crate::stmt::Stmt;
use crate::token::{Token, TokenType};
use crate::value::Value;

/// Non-local exit from statement execution.
///
/// `Return` unwinds an arbitrary number of nested blocks up to the nearest
/// call frame; `Error` is a genuine runtime failure.  Keeping them in one
/// enum lets `?` thread both through every statement, while the distinct
/// variants guarantee a handler of one can never swallow the other.
pub enum Unwind {
    Return(Value),
    Error(LoxError),
}

impl From<LoxError> for Unwind {
    fn from(e: LoxError) -> Self {
        Unwind::Error(e)
    }
}

pub struct Interpreter {
    globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    /// Resolver side table: expression node id → number of frames to climb.
    /// Absence means the name lives in globals.
    locals: HashMap<ExprId, usize>,
    out: Box<dyn Write>,
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter::with_output(Box::new(io::stdout()))
    }

    /// Build an interpreter whose `print` statements write to `out` instead
    /// of standard output.
    pub fn with_output(out: Box<dyn Write>) -> Self {
        let globals = Rc::new(RefCell::new(Environment::new()));
        globals.borrow_mut().define(
            "clock",
            Value::Native(NativeFunction {
                name: "clock".to_string(),
                arity: 0,
                func: clock_native,
            }),
        );

        Interpreter {
            environment: Rc::clone(&globals),
            globals,
            locals: HashMap::new(),
            out,
        }
    }

    /// Record a resolved local: the resolver calls this once per bound
    /// variable occurrence.
    pub fn resolve(&mut self, id: ExprId, depth: usize) {
        self.locals.insert(id, depth);
    }

    /// The resolver side table, keyed by expression node id.
    pub fn locals(&self) -> &HashMap<ExprId, usize> {
        &self.locals
    }

    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<()> {
        for statement in statements {
            match self.execute(statement) {
                Ok(()) => {}

                Err(Unwind::Error(e)) => return Err(e),

                // The resolver rejects top-level `return`; a stray unwind
                // here simply ends the run.
                Err(Unwind::Return(_)) => return Ok(()),
            }
        }

        Ok(())
    }

    fn execute(&mut self, stmt: &Stmt) -> std::result::Result<(), Unwind> {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;

                Ok(())
            }

            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;

                writeln!(self.out, "{}", value).map_err(LoxError::from)?;

                Ok(())
            }

            Stmt::Var { name, initializer } => {
                // A fresh global springs into existence as nil before its own
                // initializer runs, so `var a = a;` at top level yields nil.
                // Redeclarations keep the old value visible to the initializer.
                if Rc::ptr_eq(&self.environment, &self.globals)
                    && self.globals.borrow().get_local(&name.lexeme).is_none()
                {
                    self.globals.borrow_mut().define(&name.lexeme, Value::Nil);
                }

                let value: Value = if let Some(expr) = initializer {
                    self.evaluate(expr)?
                } else {
                    Value::Nil
                };

                self.environment.borrow_mut().define(&name.lexeme, value);

                Ok(())
            }

            Stmt::Block(statements) => {
                let environment = Rc::new(RefCell::new(Environment::with_enclosing(Rc::clone(
                    &self.environment,
                ))));

                self.execute_block(statements, environment)
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)?;
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)?;
                }

                Ok(())
            }

            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    self.execute(body)?;
                }

                Ok(())
            }

            Stmt::Function(declaration) => {
                let function = LoxFunction::new(
                    Rc::clone(declaration),
                    Rc::clone(&self.environment),
                    false,
                );

                self.environment
                    .borrow_mut()
                    .define(&declaration.name.lexeme, Value::Function(Rc::new(function)));

                Ok(())
            }

            Stmt::Return { keyword: _, value } => {
                let value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };

                Err(Unwind::Return(value))
            }

            Stmt::Class {
                name,
                superclass,
                methods,
            } => self.execute_class(name, superclass.as_ref(), methods),
        }
    }

    /// Swap in `environment`, run the statements, and restore the previous
    /// chain head on every exit path (normal, return-unwind, error-unwind).
    pub fn execute_block(
        &mut self,
        statements: &[Stmt],
        environment: Rc<RefCell<Environment>>,
    ) -> std::result::Result<(), Unwind> {
        let previous = std::mem::replace(&mut self.environment, environment);

        let mut result = Ok(());
        for statement in statements {
            result = self.execute(statement);
            if result.is_err() {
                break;
            }
        }

        self.environment = previous;
        result
    }

    fn execute_class(
        &mut self,
        name: &Token,
        superclass: Option<&Expr>,
        methods: &[Rc<crate::stmt::FunctionDecl>],
    ) -> std::result::Result<(), Unwind> {
        self.environment.borrow_mut().define(&name.lexeme, Value::Nil);

        let superclass_rc = match superclass {
            Some(expr) => match self.evaluate(expr)? {
                Value::Class(class) => Some(class),

                _ => {
                    let at = match expr {
                        Expr::Variable { name, .. } => name,
                        _ => name,
                    };
                    return Err(LoxError::runtime(at, "Superclass must be a class.").into());
                }
            },

            None => None,
        };

        // Methods close over a frame holding `super` when there is a
        // superclass; the frame is popped before the class is stored.
        let previous = Rc::clone(&self.environment);
        if let Some(superclass_rc) = &superclass_rc {
            let environment = Rc::new(RefCell::new(Environment::with_enclosing(Rc::clone(
                &self.environment,
            ))));
            environment
                .borrow_mut()
                .define("super", Value::Class(Rc::clone(superclass_rc)));
            self.environment = environment;
        }

        let mut method_table: HashMap<String, LoxFunction> = HashMap::new();
        for method in methods {
            let is_initializer = method.name.lexeme == "init";
            let function =
                LoxFunction::new(Rc::clone(method), Rc::clone(&self.environment), is_initializer);
            method_table.insert(method.name.lexeme.clone(), function);
        }

        let class = LoxClass::new(name.lexeme.clone(), superclass_rc, method_table);

        self.environment = previous;

        self.environment
            .borrow_mut()
            .assign(name, Value::Class(Rc::new(class)))?;

        Ok(())
    }

    pub fn evaluate(&mut self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Literal(literal) => Ok(match literal {
                LiteralValue::Number(n) => Value::Number(*n),
                LiteralValue::Str(s) => Value::String(s.clone()),
                LiteralValue::True => Value::Bool(true),
                LiteralValue::False => Value::Bool(false),
                LiteralValue::Nil => Value::Nil,
            }),

            Expr::Grouping(inner) => self.evaluate(inner),

            Expr::Unary { operator, right } => self.evaluate_unary(operator, right),

            Expr::Binary {
                left,
                operator,
                right,
            } => self.evaluate_binary(left, operator, right),

            Expr::Logical {
                left,
                operator,
                right,
            } => {
                let left_value = self.evaluate(left)?;

                let short_circuits = match operator.token_type {
                    TokenType::OR => left_value.is_truthy(),
                    _ => !left_value.is_truthy(),
                };

                if short_circuits {
                    Ok(left_value)
                } else {
                    self.evaluate(right)
                }
            }

            Expr::Variable { id, name } => self.look_up_variable(*id, name),

            Expr::This { id, keyword } => self.look_up_variable(*id, keyword),

            Expr::Assign { id, name, value } => {
                let value = self.evaluate(value)?;

                match self.locals.get(id) {
                    Some(distance) => Environment::assign_at(
                        &self.environment,
                        *distance,
                        name,
                        value.clone(),
                    )?,

                    None => self.globals.borrow_mut().assign(name, value.clone())?,
                }

                Ok(value)
            }

            Expr::Call {
                callee,
                paren,
                arguments,
            } => {
                let callee_value = self.evaluate(callee)?;

                let mut args = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    args.push(self.evaluate(argument)?);
                }

                match callee_value {
                    Value::Function(function) => {
                        check_arity(function.arity(), args.len(), paren)?;
                        function.call(self, args)
                    }

                    Value::Class(class) => {
                        check_arity(class.arity(), args.len(), paren)?;
                        LoxClass::call(&class, self, args)
                    }

                    Value::Native(native) => {
                        check_arity(native.arity, args.len(), paren)?;
                        Ok((native.func)(&args))
                    }

                    _ => Err(LoxError::runtime(
                        paren,
                        "Can only call functions and classes.",
                    )),
                }
            }

            Expr::Get { object, name } => match self.evaluate(object)? {
                Value::Instance(instance) => LoxInstance::get(&instance, name),

                _ => Err(LoxError::runtime(name, "Only instances have properties.")),
            },

            Expr::Set {
                object,
                name,
                value,
            } => {
                let object = self.evaluate(object)?;

                match object {
                    Value::Instance(instance) => {
                        let value = self.evaluate(value)?;
                        instance.borrow_mut().set(name, value.clone());
                        Ok(value)
                    }

                    _ => Err(LoxError::runtime(name, "Only instances have fields.")),
                }
            }

            Expr::Super {
                id,
                keyword,
                method,
            } => self.evaluate_super(*id, keyword, method),
        }
    }

    fn evaluate_unary(&mut self, operator: &Token, right: &Expr) -> Result<Value> {
        let value = self.evaluate(right)?;

        match operator.token_type {
            TokenType::MINUS => match value {
                Value::Number(n) => Ok(Value::Number(-n)),

                _ => Err(LoxError::runtime(operator, "Operand must be a number.")),
            },

            TokenType::BANG => Ok(Value::Bool(!value.is_truthy())),

            _ => Err(LoxError::runtime(operator, "Invalid unary operator.")),
        }
    }

    fn evaluate_binary(&mut self, left: &Expr, operator: &Token, right: &Expr) -> Result<Value> {
        let left_value = self.evaluate(left)?;
        let right_value = self.evaluate(right)?;

        match operator.token_type {
            TokenType::PLUS => match (left_value, right_value) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),

                (Value::String(a), Value::String(b)) => Ok(Value::String(a + &b)),

                _ => Err(LoxError::runtime(
                    operator,
                    "Operands must be two numbers or strings.",
                )),
            },

            TokenType::MINUS => {
                let (a, b) = number_operands(operator, &left_value, &right_value)?;
                Ok(Value::Number(a - b))
            }

            TokenType::STAR => {
                let (a, b) = number_operands(operator, &left_value, &right_value)?;
                Ok(Value::Number(a * b))
            }

            TokenType::SLASH => {
                let (a, b) = number_operands(operator, &left_value, &right_value)?;
                Ok(Value::Number(a / b))
            }

            TokenType::GREATER => {
                let (a, b) = number_operands(operator, &left_value, &right_value)?;
                Ok(Value::Bool(a > b))
            }

            TokenType::GREATER_EQUAL => {
                let (a, b) = number_operands(operator, &left_value, &right_value)?;
                Ok(Value::Bool(a >= b))
            }

            TokenType::LESS => {
                let (a, b) = number_operands(operator, &left_value, &right_value)?;
                Ok(Value::Bool(a < b))
            }

            TokenType::LESS_EQUAL => {
                let (a, b) = number_operands(operator, &left_value, &right_value)?;
                Ok(Value::Bool(a <= b))
            }

            TokenType::EQUAL_EQUAL => Ok(Value::Bool(left_value.equals(&right_value))),

            TokenType::BANG_EQUAL => Ok(Value::Bool(!left_value.equals(&right_value))),

            _ => Err(LoxError::runtime(operator, "Invalid binary operator.")),
        }
    }

    fn evaluate_super(&mut self, id: ExprId, keyword: &Token, method: &Token) -> Result<Value> {
        let distance = match self.locals.get(&id) {
            Some(distance) => *distance,

            None => {
                return Err(LoxError::runtime(
                    keyword,
                    "Can't use 'super' outside of a class.",
                ))
            }
        };

        let superclass = match Environment::get_at(&self.environment, distance, "super", keyword)? {
            Value::Class(class) => class,

            _ => return Err(LoxError::runtime(keyword, "Superclass must be a class.")),
        };

        // `this` is bound one frame inside the `super` frame.
        let receiver = Environment::get_at(
            &self.environment,
            distance.saturating_sub(1),
            "this",
            keyword,
        )?;

        let instance = match receiver {
            Value::Instance(instance) => instance,

            _ => return Err(LoxError::runtime(keyword, "Only instances have properties.")),
        };

        match superclass.find_method(&method.lexeme) {
            Some(found) => Ok(Value::Function(Rc::new(found.bind(instance)))),

            None => Err(LoxError::runtime(
                method,
                format!("Undefined property '{}'.", method.lexeme),
            )),
        }
    }

    fn look_up_variable(&self, id: ExprId, name: &Token) -> Result<Value> {
        match self.locals.get(&id) {
            Some(distance) => {
                Environment::get_at(&self.environment, *distance, &name.lexeme, name)
            }

            None => self.globals.borrow().get(name),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new()
    }
}

fn check_arity(expected: usize, got: usize, paren: &Token) -> Result<()> {
    if expected != got {
        return Err(LoxError::runtime(
            paren,
            format!("Expected {} arguments but got {}.", expected, got),
        ));
    }
    Ok(())
}

fn number_operands(operator: &Token, left: &Value, right: &Value) -> Result<(f64, f64)> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok((*a, *b)),

        _ => Err(LoxError::runtime(operator, "Operands must be numbers")),
    }
}

fn clock_native(_args: &[Value]) -> Value {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(0.0);

    Value::Number(millis)
}
