use std::fmt::Display;

use crate::utils::prelude::SrcSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Разделители
    LParen, // (
    RParen, // )
    LBrace, // {
    RBrace, // }
    LSBracket, // [
    RSBracket, // ]
    Comma, // ,
    Dot, // .
    Semicolon, // ;

    // Операции
    Plus, // +
    Minus, // -
    Mult, // *
    Div, // /
    Bang, // !
    Assign, // =
    Increment, // ++
    Decrement, // --

    // Операции группы отношения
    Equal, // ==
    NotEqual, // !=
    LessThan, // <
    LessThanOrEqual, // <=
    GreaterThan, // >
    GreaterThanOrEqual, // >=

    // Литералы
    Ident,
    String,
    Number,
    Bytes,

    // Ключевые слова
    Var,
    Fun,
    Class,
    Super,
    This,
    Nil,
    Or,
    And,
    If,
    Else,
    True,
    False,
    For,
    While,
    Return,

    Eof,
    Illegal,
}

impl TokenKind {
    /// Tokens that start a statement; the parser stops discarding on them
    /// while recovering from a syntax error.
    pub fn is_statement_start(&self) -> bool {
        matches!(
            self,
            TokenKind::Class
                | TokenKind::Fun
                | TokenKind::Var
                | TokenKind::For
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Return
        )
    }

    pub fn is_reserved_word(&self) -> bool {
        str_to_keyword(self.as_literal()).is_some()
    }

    pub fn as_literal(&self) -> &'static str {
        match self {
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LSBracket => "[",
            TokenKind::RSBracket => "]",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::Semicolon => ";",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Mult => "*",
            TokenKind::Div => "/",
            TokenKind::Bang => "!",
            TokenKind::Assign => "=",
            TokenKind::Increment => "++",
            TokenKind::Decrement => "--",
            TokenKind::Equal => "==",
            TokenKind::NotEqual => "!=",
            TokenKind::LessThan => "<",
            TokenKind::LessThanOrEqual => "<=",
            TokenKind::GreaterThan => ">",
            TokenKind::GreaterThanOrEqual => ">=",
            TokenKind::Ident => "identifier",
            TokenKind::String => "string",
            TokenKind::Number => "number",
            TokenKind::Bytes => "byte string",
            TokenKind::Var => "var",
            TokenKind::Fun => "fun",
            TokenKind::Class => "class",
            TokenKind::Super => "super",
            TokenKind::This => "this",
            TokenKind::Nil => "nil",
            TokenKind::Or => "or",
            TokenKind::And => "and",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::For => "for",
            TokenKind::While => "while",
            TokenKind::Return => "return",
            TokenKind::Eof => "end of file",
            TokenKind::Illegal => "illegal",
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::LBrace => "LBRACE",
            TokenKind::RBrace => "RBRACE",
            TokenKind::LSBracket => "LBRACKET",
            TokenKind::RSBracket => "RBRACKET",
            TokenKind::Comma => "COMMA",
            TokenKind::Dot => "DOT",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Mult => "STAR",
            TokenKind::Div => "SLASH",
            TokenKind::Bang => "BANG",
            TokenKind::Assign => "ASSIGN",
            TokenKind::Increment => "INCREMENT",
            TokenKind::Decrement => "DECREMENT",
            TokenKind::Equal => "EQ",
            TokenKind::NotEqual => "NOT_EQ",
            TokenKind::LessThan => "LT",
            TokenKind::LessThanOrEqual => "LE",
            TokenKind::GreaterThan => "GT",
            TokenKind::GreaterThanOrEqual => "GE",
            TokenKind::Ident => "IDENT",
            TokenKind::String => "STRING",
            TokenKind::Number => "NUMBER",
            TokenKind::Bytes => "BYTES",
            TokenKind::Eof => "EOF",
            TokenKind::Illegal => "ILLEGAL",
            keyword => return write!(f, "{}", keyword.as_literal().to_uppercase()),
        };

        write!(f, "{name}")
    }
}

pub fn str_to_keyword(word: &str) -> Option<TokenKind> {
    Some(match word {
        "var" => TokenKind::Var,
        "fun" => TokenKind::Fun,
        "class" => TokenKind::Class,
        "super" => TokenKind::Super,
        "this" => TokenKind::This,
        "nil" => TokenKind::Nil,
        "or" => TokenKind::Or,
        "and" => TokenKind::And,
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "for" => TokenKind::For,
        "while" => TokenKind::While,
        "return" => TokenKind::Return,
        _ => return None,
    })
}

/// Decoded value of a literal token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Int(i64),
    Str(String),
    Bytes(Vec<u8>),
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Int(value) => write!(f, "{value}"),
            Literal::Str(value) => write!(f, "{value}"),
            Literal::Bytes(value) => {
                for byte in value {
                    write!(f, "{byte:02X}")?;
                }

                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub literal: Option<Literal>,
    pub line: u32,
    pub span: SrcSpan,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: u32, span: SrcSpan) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            literal: None,
            line,
            span,
        }
    }

    pub fn with_literal(mut self, literal: Literal) -> Self {
        self.literal = Some(literal);
        self
    }

    /// Token that does not come from source text, e.g. the callee of a
    /// desugared `print` statement. Borrows the position of `at`.
    pub fn synthetic(kind: TokenKind, lexeme: &str, at: &Token) -> Self {
        Self::new(kind, lexeme, at.line, at.span)
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.literal {
            Some(literal) => write!(f, "{} {} {}", self.kind, self.lexeme, literal),
            None => write!(f, "{} {}", self.kind, self.lexeme),
        }
    }
}
