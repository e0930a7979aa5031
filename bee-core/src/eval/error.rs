use thiserror::Error;

use crate::lexer::prelude::Token;
use super::interpreter::MAX_CALL_DEPTH;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeErrorType {
    #[error("Undefined variable '{name}'.")]
    UndefinedVariable { name: String },
    #[error("identifier '{name}' is already in use.")]
    AlreadyInUse { name: String },
    #[error("Operands must be numbers.")]
    OperandsMustBeNumbers,
    #[error("Operands must be two numbers or two strings.")]
    OperandsMustBeNumbersOrStrings,
    #[error("Operand must be a number.")]
    OperandMustBeNumber,
    #[error("Operand must be of type int.")]
    OperandMustBeInteger,
    #[error("Can only call functions and classes.")]
    NotCallable,
    #[error("Expected {expected} arguments but got {got}.")]
    ArityMismatch { expected: usize, got: usize },
    #[error("Division by zero.")]
    DivisionByZero,
    #[error("Integer overflow.")]
    IntegerOverflow,
    #[error("inHex expects integers or byte sequences.")]
    InvalidHexArgument,
    #[error("Stack overflow.")]
    StackOverflow,
}

/// Aborts the running program. `token` is the closest token to the failure
/// and gives the reported line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{error}\n[line {}]", .token.line)]
pub struct RuntimeError {
    pub error: RuntimeErrorType,
    pub token: Token,
}

impl RuntimeError {
    pub fn new(error: RuntimeErrorType, token: Token) -> Self {
        Self { error, token }
    }

    pub fn details(&self) -> (String, Vec<String>) {
        let extra = match &self.error {
            RuntimeErrorType::UndefinedVariable { .. } => {
                vec!["Declare it with `var` before use".to_string()]
            },
            RuntimeErrorType::AlreadyInUse { .. } => {
                vec!["Names can be declared only once per scope".to_string()]
            },
            RuntimeErrorType::NotCallable => {
                vec!["Only functions can be called".to_string()]
            },
            RuntimeErrorType::ArityMismatch { expected, .. } => {
                vec![format!("The function takes {expected} arguments")]
            },
            RuntimeErrorType::StackOverflow => {
                vec![format!("Calls can nest at most {MAX_CALL_DEPTH} deep")]
            },
            _ => vec![],
        };

        (self.error.to_string(), extra)
    }
}
