use std::fmt::{Debug, Display};
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::trace;

use crate::environment::prelude::{Environment, Value};
use crate::lexer::prelude::Token;
use super::callable::{Arity, Callable};
use super::error::{RuntimeError, RuntimeErrorType};
use super::interpreter::Interpreter;

type NativeFn = fn(&mut Interpreter, &[Value], &Token) -> Result<Value, RuntimeError>;

#[derive(Clone)]
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: Arity,
    function: NativeFn,
}

impl Debug for NativeFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

impl Display for NativeFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<native fn {}>", self.name)
    }
}

impl Callable for NativeFunction {
    fn name(&self) -> &str {
        self.name
    }

    fn arity(&self) -> Arity {
        self.arity
    }

    fn call(
        &self,
        interpreter: &mut Interpreter,
        arguments: Vec<Value>,
        paren: &Token
    ) -> Result<Value, RuntimeError> {
        trace!(name = self.name, arguments = arguments.len(), "calling native function");

        (self.function)(interpreter, &arguments, paren)
    }
}

pub const NATIVES: [NativeFunction; 4] = [
    NativeFunction { name: "clock", arity: Arity::Fixed(0), function: clock },
    NativeFunction { name: "print", arity: Arity::Variadic, function: print },
    NativeFunction { name: "println", arity: Arity::Variadic, function: println },
    NativeFunction { name: "inHex", arity: Arity::Variadic, function: in_hex },
];

pub fn define_natives(globals: &mut Environment) {
    for native in NATIVES {
        let name = native.name;

        globals.define_global(name, Value::Callable { value: Rc::new(native) });
    }
}

/// Whole seconds since the Unix epoch.
fn clock(_: &mut Interpreter, _: &[Value], _: &Token) -> Result<Value, RuntimeError> {
    let seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default();

    Ok(Value::Integer { value: seconds as i64 })
}

fn stringify(arguments: &[Value]) -> String {
    arguments.iter()
        .map(|argument| argument.to_string())
        .collect::<Vec<String>>()
        .join("")
}

fn print(interpreter: &mut Interpreter, arguments: &[Value], _: &Token) -> Result<Value, RuntimeError> {
    interpreter.emit(&stringify(arguments));

    Ok(Value::Nil)
}

fn println(interpreter: &mut Interpreter, arguments: &[Value], _: &Token) -> Result<Value, RuntimeError> {
    interpreter.emit(&format!("{}\n", stringify(arguments)));

    Ok(Value::Nil)
}

/// Bytes print as two hex digits each, integers as at least two digits.
fn in_hex(interpreter: &mut Interpreter, arguments: &[Value], paren: &Token) -> Result<Value, RuntimeError> {
    let mut text = String::new();

    for argument in arguments {
        match argument {
            Value::Bytes { value } => {
                for byte in value {
                    text.push_str(&format!("{byte:02X}"));
                }
            },
            Value::Integer { value } => text.push_str(&format!("{value:02X}")),
            _ => {
                return Err(RuntimeError::new(RuntimeErrorType::InvalidHexArgument, paren.clone()))
            }
        }
    }

    text.push('\n');
    interpreter.emit(&text);

    Ok(Value::Nil)
}
