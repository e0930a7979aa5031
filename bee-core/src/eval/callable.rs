use std::cell::RefCell;
use std::fmt::{Debug, Display};
use std::rc::Rc;

use tracing::trace;

use crate::environment::prelude::{EnvRef, Environment, Value};
use crate::lexer::prelude::Token;
use crate::parser::prelude::FunctionDecl;
use super::error::RuntimeError;
use super::interpreter::{Flow, Interpreter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Fixed(usize),
    /// Any number of arguments, the count is not checked.
    Variadic,
}

pub trait Callable: Debug + Display {
    fn name(&self) -> &str;

    fn arity(&self) -> Arity;

    /// `paren` is the closing parenthesis of the call, errors are reported there.
    fn call(
        &self,
        interpreter: &mut Interpreter,
        arguments: Vec<Value>,
        paren: &Token
    ) -> Result<Value, RuntimeError>;
}

/// A user defined function together with the scope it was declared in.
pub struct Function {
    pub declaration: Rc<FunctionDecl>,
    pub closure: EnvRef,
}

impl Function {
    pub fn new(declaration: Rc<FunctionDecl>, closure: EnvRef) -> Self {
        Self { declaration, closure }
    }
}

// The closure may hold the function itself.
impl Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.declaration.name.lexeme)
            .field("arity", &self.declaration.params.len())
            .finish_non_exhaustive()
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<fn {}>", self.name())
    }
}

impl Callable for Function {
    fn name(&self) -> &str {
        &self.declaration.name.lexeme
    }

    fn arity(&self) -> Arity {
        Arity::Fixed(self.declaration.params.len())
    }

    fn call(
        &self,
        interpreter: &mut Interpreter,
        arguments: Vec<Value>,
        _paren: &Token
    ) -> Result<Value, RuntimeError> {
        trace!(name = self.name(), arguments = arguments.len(), "calling function");

        let environment = Rc::new(RefCell::new(Environment::with_enclosing(self.closure.clone())));

        for (param, argument) in self.declaration.params.iter().zip(arguments) {
            environment.borrow_mut().define(param, argument)?;
        }

        match interpreter.execute_block(&self.declaration.body, environment)? {
            Flow::Return(value) => Ok(value),
            Flow::Normal => Ok(Value::Nil),
        }
    }
}
