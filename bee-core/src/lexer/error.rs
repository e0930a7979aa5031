use thiserror::Error;

use crate::utils::prelude::SrcSpan;
use super::token::{Token, TokenKind};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexicalErrorType {
    #[error("Unexpected character.")]
    UnexpectedCharacter { ch: char },
    #[error("Unterminated string.")]
    UnterminatedString,
    #[error("Unterminated byte string.")]
    UnterminatedBytes,
    #[error("Invalid byte string.")]
    InvalidBytes,
    #[error("Number literal is out of range.")]
    NumberOutOfRange,
    #[error("Expect hex digits after '0x'.")]
    MissingHexDigits,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[line {line}] Error: {error}")]
pub struct LexicalError {
    pub error: LexicalErrorType,
    pub lexeme: String,
    pub line: u32,
    pub location: SrcSpan,
}

impl LexicalError {
    /// `ILLEGAL` token standing in for the malformed text, for token dumps.
    pub fn to_illegal_token(&self) -> Token {
        Token::new(TokenKind::Illegal, self.lexeme.clone(), self.line, self.location)
    }

    pub fn details(&self) -> (String, Vec<String>) {
        let extra = match &self.error {
            LexicalErrorType::UnexpectedCharacter { ch } => vec![format!("found `{ch}`")],
            LexicalErrorType::NumberOutOfRange => {
                vec![format!("numbers must fit in {} bits", i64::BITS)]
            }
            LexicalErrorType::InvalidBytes => {
                vec!["byte strings may only contain hex digits and whitespace".to_string()]
            }
            _ => vec![],
        };

        (self.error.to_string(), extra)
    }
}
