use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::environment::prelude::{EnvRef, Environment, Value, FALSE, TRUE};
use crate::lexer::prelude::{Token, TokenKind};
use crate::parser::prelude::{Expr, Stmt};
use crate::utils::prelude::OutputEmitterIO;
use super::callable::{Arity, Function};
use super::error::{RuntimeError, RuntimeErrorType};
use super::native::define_natives;

pub type EvalResult<T> = Result<T, RuntimeError>;

/// Calls nested deeper than this fail instead of exhausting the native stack.
pub const MAX_CALL_DEPTH: usize = 255;

/// How a statement finished.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Normal,
    /// A `return` is unwinding to the nearest call.
    Return(Value),
}

pub struct Interpreter {
    pub globals: EnvRef,
    environment: EnvRef,
    output: Rc<dyn OutputEmitterIO>,
    depth: usize,
}

impl Interpreter {
    pub fn new(output: Rc<dyn OutputEmitterIO>) -> Self {
        let mut globals = Environment::new();
        define_natives(&mut globals);

        let globals = Rc::new(RefCell::new(globals));

        Self {
            environment: globals.clone(),
            globals,
            output,
            depth: 0,
        }
    }

    /// Runs top level statements until the first runtime error. A top level
    /// `return` ends the run early without error.
    pub fn interpret(&mut self, statements: &[Stmt]) -> EvalResult<()> {
        debug!(statements = statements.len(), "interpreting");

        for statement in statements {
            if let Flow::Return(_) = self.execute(statement)? {
                debug!("top level return");
                break;
            }
        }

        Ok(())
    }

    pub fn emit(&self, text: &str) {
        self.output.emit_output(text);
    }

    /// Runs `statements` inside `environment`, the previous environment is
    /// restored however the block is left.
    pub fn execute_block(&mut self, statements: &[Stmt], environment: EnvRef) -> EvalResult<Flow> {
        trace!(statements = statements.len(), "entering block");

        let previous = std::mem::replace(&mut self.environment, environment);
        let result = self.execute_all(statements);
        self.environment = previous;

        result
    }

    fn execute_all(&mut self, statements: &[Stmt]) -> EvalResult<Flow> {
        for statement in statements {
            match self.execute(statement)? {
                Flow::Normal => {},
                flow => return Ok(flow),
            }
        }

        Ok(Flow::Normal)
    }

    fn execute(&mut self, statement: &Stmt) -> EvalResult<Flow> {
        match statement {
            Stmt::Expression { expression } => {
                self.evaluate(expression)?;
            },
            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(initializer) => self.evaluate(initializer)?,
                    None => Value::Nil,
                };

                self.environment.borrow_mut().define(name, value)?;
            },
            Stmt::Block { statements } => {
                let environment = Environment::with_enclosing(self.environment.clone());

                return self.execute_block(statements, Rc::new(RefCell::new(environment)));
            },
            Stmt::If { condition, then_branch, else_branch } => {
                if self.evaluate(condition)?.is_truthy() {
                    return self.execute(then_branch);
                }

                if let Some(else_branch) = else_branch {
                    return self.execute(else_branch);
                }
            },
            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    if let Flow::Return(value) = self.execute(body)? {
                        return Ok(Flow::Return(value));
                    }
                }
            },
            Stmt::Function(declaration) => {
                let function = Function::new(declaration.clone(), self.environment.clone());
                let value = Value::Callable { value: Rc::new(function) };

                self.environment.borrow_mut().define(&declaration.name, value)?;
            },
            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(value) => self.evaluate(value)?,
                    None => Value::Nil,
                };

                return Ok(Flow::Return(value));
            },
        }

        Ok(Flow::Normal)
    }

    pub fn evaluate(&mut self, expression: &Expr) -> EvalResult<Value> {
        match expression {
            Expr::Literal(primitive) => Ok(Value::from(primitive.clone())),
            Expr::Grouping { expression } => self.evaluate(expression),
            Expr::Unary { operator, right } => {
                let right = self.evaluate(right)?;
                eval_prefix(operator, right)
            },
            Expr::Binary { left, operator, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;

                eval_infix(operator, left, right)
            },
            Expr::Logical { left, operator, right } => {
                let left = self.evaluate(left)?;

                let decided = match operator.kind {
                    TokenKind::Or => left.is_truthy(),
                    _ => !left.is_truthy(),
                };

                match decided {
                    true => Ok(left),
                    false => self.evaluate(right),
                }
            },
            Expr::Variable { name } => self.environment.borrow().get(name),
            Expr::Assign { name, value } => {
                let value = self.evaluate(value)?;
                self.environment.borrow_mut().assign(name, value.clone())?;

                Ok(value)
            },
            Expr::Call { callee, paren, arguments } => {
                let callee = self.evaluate(callee)?;

                let arguments = arguments.iter()
                    .map(|argument| self.evaluate(argument))
                    .collect::<EvalResult<Vec<Value>>>()?;

                let Value::Callable { value: function } = callee else {
                    return Err(RuntimeError::new(RuntimeErrorType::NotCallable, paren.clone()));
                };

                if let Arity::Fixed(expected) = function.arity() {
                    if arguments.len() != expected {
                        return Err(RuntimeError::new(
                            RuntimeErrorType::ArityMismatch { expected, got: arguments.len() },
                            paren.clone()
                        ));
                    }
                }

                if self.depth >= MAX_CALL_DEPTH {
                    return Err(RuntimeError::new(RuntimeErrorType::StackOverflow, paren.clone()));
                }

                self.depth += 1;
                let result = function.call(self, arguments, paren);
                self.depth -= 1;

                result
            },
            Expr::Increment { name, sign } => {
                let current = self.environment.borrow().get(name)?;

                let Value::Integer { value } = current else {
                    return Err(RuntimeError::new(RuntimeErrorType::OperandMustBeInteger, sign.clone()));
                };

                let updated = match sign.kind {
                    TokenKind::Increment => value.checked_add(1),
                    _ => value.checked_sub(1),
                };
                let updated = Value::Integer { value: updated.ok_or_else(|| overflow(sign))? };

                self.environment.borrow_mut().assign(name, updated.clone())?;

                Ok(updated)
            },
        }
    }
}

fn overflow(token: &Token) -> RuntimeError {
    RuntimeError::new(RuntimeErrorType::IntegerOverflow, token.clone())
}

fn eval_prefix(operator: &Token, right: Value) -> EvalResult<Value> {
    match operator.kind {
        TokenKind::Bang => match right.is_truthy() {
            true => Ok(FALSE),
            false => Ok(TRUE),
        },
        _ => match right {
            Value::Integer { value } => {
                let value = value.checked_neg().ok_or_else(|| overflow(operator))?;

                Ok(Value::Integer { value })
            },
            _ => Err(RuntimeError::new(RuntimeErrorType::OperandMustBeNumber, operator.clone())),
        },
    }
}

fn eval_infix(operator: &Token, left: Value, right: Value) -> EvalResult<Value> {
    match operator.kind {
        TokenKind::Equal => return Ok(Value::Boolean { value: left == right }),
        TokenKind::NotEqual => return Ok(Value::Boolean { value: left != right }),
        _ => {}
    }

    match (left, right) {
        (
            Value::Integer { value: left_value },
            Value::Integer { value: right_value }
        ) => {
            let value = match operator.kind {
                TokenKind::Plus => left_value.checked_add(right_value),
                TokenKind::Minus => left_value.checked_sub(right_value),
                TokenKind::Mult => left_value.checked_mul(right_value),
                TokenKind::Div => {
                    if right_value == 0 {
                        return Err(RuntimeError::new(RuntimeErrorType::DivisionByZero, operator.clone()));
                    }

                    left_value.checked_div(right_value)
                },
                TokenKind::LessThan => return Ok(Value::Boolean { value: left_value < right_value }),
                TokenKind::LessThanOrEqual => return Ok(Value::Boolean { value: left_value <= right_value }),
                TokenKind::GreaterThan => return Ok(Value::Boolean { value: left_value > right_value }),
                TokenKind::GreaterThanOrEqual => return Ok(Value::Boolean { value: left_value >= right_value }),
                _ => return Err(RuntimeError::new(RuntimeErrorType::OperandsMustBeNumbers, operator.clone())),
            };

            let value = value.ok_or_else(|| overflow(operator))?;

            Ok(Value::Integer { value })
        },
        (
            Value::String { value: left },
            Value::String { value: right }
        ) if operator.is(TokenKind::Plus) => {
            Ok(Value::String { value: format!("{left}{right}") })
        },
        _ => {
            let error = match operator.kind {
                TokenKind::Plus => RuntimeErrorType::OperandsMustBeNumbersOrStrings,
                _ => RuntimeErrorType::OperandsMustBeNumbers,
            };

            Err(RuntimeError::new(error, operator.clone()))
        }
    }
}
