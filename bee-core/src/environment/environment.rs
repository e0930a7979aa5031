use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::eval::prelude::{RuntimeError, RuntimeErrorType};
use crate::lexer::prelude::Token;

use super::prelude::Value;

pub type EnvRef = Rc<RefCell<Environment>>;

/// One lexical scope. Lookups that miss fall through to `enclosing`.
#[derive(Default, Debug)]
pub struct Environment {
    pub store: HashMap<String, Value>,
    pub enclosing: Option<EnvRef>,
}

impl Environment {
    pub fn new() -> Self {
        Self {
            store: HashMap::new(),
            enclosing: None
        }
    }

    pub fn with_enclosing(enclosing: EnvRef) -> Self {
        Self {
            store: HashMap::new(),
            enclosing: Some(enclosing)
        }
    }

    /// Binds `name` in this scope. A name may be bound only once per scope,
    /// enclosing scopes are not consulted.
    pub fn define(&mut self, name: &Token, value: Value) -> Result<(), RuntimeError> {
        if self.store.contains_key(&name.lexeme) {
            return Err(RuntimeError::new(
                RuntimeErrorType::AlreadyInUse { name: name.lexeme.clone() },
                name.clone()
            ));
        }

        self.store.insert(name.lexeme.clone(), value);

        Ok(())
    }

    /// Binds a builtin, replacing any previous binding.
    pub fn define_global(&mut self, name: &str, value: Value) {
        self.store.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &Token) -> Result<Value, RuntimeError> {
        if let Some(value) = self.store.get(&name.lexeme) {
            return Ok(value.clone());
        }

        match &self.enclosing {
            Some(enclosing) => enclosing.borrow().get(name),
            None => Err(undefined(name)),
        }
    }

    pub fn assign(&mut self, name: &Token, value: Value) -> Result<(), RuntimeError> {
        if let Some(var) = self.store.get_mut(&name.lexeme) {
            *var = value;

            return Ok(());
        }

        match &self.enclosing {
            Some(enclosing) => enclosing.borrow_mut().assign(name, value),
            None => Err(undefined(name)),
        }
    }
}

fn undefined(name: &Token) -> RuntimeError {
    RuntimeError::new(
        RuntimeErrorType::UndefinedVariable { name: name.lexeme.clone() },
        name.clone()
    )
}
