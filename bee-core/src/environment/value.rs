use std::fmt::Display;
use std::rc::Rc;

use crate::eval::prelude::Callable;
use crate::lexer::prelude::Literal;
use crate::parser::prelude::Primitive;

pub const TRUE: Value = Value::Boolean { value: true };
pub const FALSE: Value = Value::Boolean { value: false };

#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Boolean {
        value: bool
    },
    Integer {
        value: i64
    },
    String {
        value: String,
    },
    Bytes {
        value: Vec<u8>
    },
    Callable {
        value: Rc<dyn Callable>
    },
}

impl Value {
    /// `nil` and `false` are falsy, everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Boolean { value: false })
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Boolean { value: left }, Value::Boolean { value: right }) => left == right,
            (Value::Integer { value: left }, Value::Integer { value: right }) => left == right,
            (Value::String { value: left }, Value::String { value: right }) => left == right,
            (Value::Bytes { value: left }, Value::Bytes { value: right }) => left == right,
            // callables compare by identity
            (Value::Callable { value: left }, Value::Callable { value: right }) => {
                Rc::ptr_eq(left, right)
            },
            _ => false,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Boolean { value } => write!(f, "{value}"),
            Value::Integer { value } => write!(f, "{value}"),
            Value::String { value } => write!(f, "{value}"),
            Value::Bytes { value } => write!(f, "'{}'", Literal::Bytes(value.clone())),
            Value::Callable { value } => write!(f, "{value}"),
        }
    }
}

impl From<Primitive> for Value {
    fn from(primitive: Primitive) -> Self {
        match primitive {
            Primitive::Nil => Value::Nil,
            Primitive::Bool { value } => Value::Boolean { value },
            Primitive::Int { value } => Value::Integer { value },
            Primitive::String { value } => Value::String { value },
            Primitive::Bytes { value } => Value::Bytes { value },
        }
    }
}

