use thiserror::Error;

use crate::lexer::prelude::{Token, TokenKind};

/// Upper bound for parameters and call arguments.
pub const MAX_ARGUMENTS: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorType {
    #[error("Expect expression.")]
    ExpectedExpression,
    /// A required token is missing, `what` names it with its context,
    /// e.g. "')' after arguments".
    #[error("Expect {what}.")]
    Expected { what: String },
    #[error("Invalid assignment target.")]
    InvalidAssignmentTarget,
    #[error("Invalid increment target.")]
    InvalidIncrementTarget,
    #[error("Can't have more than 255 parameters.")]
    TooManyParameters,
    #[error("Can't have more than 255 arguments.")]
    TooManyArguments,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[line {}] Error{}: {error}", .token.line, location(.token))]
pub struct ParseError {
    pub error: ParseErrorType,
    pub token: Token,
}

/// The `<where>` part of a syntax error report.
fn location(token: &Token) -> String {
    match token.kind {
        TokenKind::Eof => " at end".to_string(),
        _ => format!(" at '{}'", token.lexeme),
    }
}

impl ParseError {
    pub fn new(error: ParseErrorType, token: Token) -> Self {
        Self { error, token }
    }

    pub fn details(&self) -> (String, Vec<String>) {
        let found = match self.token.kind {
            TokenKind::Eof => "the end of input".to_string(),
            TokenKind::Ident => format!("the identifier `{}`", self.token.lexeme),
            TokenKind::Number => "a number".to_string(),
            TokenKind::String => "a string".to_string(),
            TokenKind::Bytes => "a byte string".to_string(),
            kind if kind.is_reserved_word() => format!("the keyword `{}`", self.token.lexeme),
            _ => format!("`{}`", self.token.lexeme),
        };

        let extra = match &self.error {
            ParseErrorType::ExpectedExpression
            | ParseErrorType::Expected { .. } => vec![format!("Found {found}")],
            ParseErrorType::InvalidAssignmentTarget => {
                vec!["Only variables can be assigned to".to_string()]
            },
            ParseErrorType::InvalidIncrementTarget => {
                vec!["Only variables can be incremented or decremented".to_string()]
            },
            _ => vec![],
        };

        (self.error.to_string(), extra)
    }
}
