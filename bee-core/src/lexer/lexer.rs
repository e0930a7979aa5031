use std::fmt::Display;

use super::error::{LexicalError, LexicalErrorType};
use super::token::{str_to_keyword, Literal, Token, TokenKind};
use crate::utils::prelude::SrcSpan;

pub type LexResult = std::result::Result<Token, LexicalError>;

/// Source text as the `(byte offset, char)` stream the lexer consumes.
pub type SourceChars<'a> = std::iter::Map<std::str::CharIndices<'a>, fn((usize, char)) -> (u32, char)>;

fn with_offset((idx, ch): (usize, char)) -> (u32, char) {
	(idx as u32, ch)
}

#[derive(Debug)]
pub struct Lexer<T: Iterator<Item = (u32, char)>> {
	position: u32,
	next_position: u32,
	ch: Option<char>,
	next_ch: Option<char>,
	input: T,

	start: u32,
	line: u32,
	lexeme: String,
	finished: bool,
}

impl<T: Iterator<Item = (u32, char)>> Display for Lexer<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f,
			"Lexer {{\n\tposition: {},\n\tline: {},\n\tch: {:?}, next_ch: {:?}\n}}",
			self.position, self.line, self.ch, self.next_ch
		)
	}
}

impl<'a> Lexer<SourceChars<'a>> {
	pub fn from_source(src: &'a str) -> Self {
		Lexer::new(src.char_indices().map(with_offset as fn((usize, char)) -> (u32, char)))
	}
}

impl<T: Iterator<Item = (u32, char)>> Lexer<T> {
	pub fn new(input: T) -> Self {
		let mut lexer = Self {
			position: 0,
			next_position: 0,
			ch: None,
			next_ch: None,
			input,

			start: 0,
			line: 1,
			lexeme: String::new(),
			finished: false,
		};

		lexer.next_char();
		lexer.next_char();

		lexer
	}

	pub fn next_token(&mut self) -> LexResult {
		self.skip_trivia();

		self.start = self.position;
		self.lexeme.clear();

		let ch = match self.advance() {
			Some(ch) => ch,
			None => return Ok(self.make_token(TokenKind::Eof)),
		};

		let kind = match ch {
			'(' => TokenKind::LParen,
			')' => TokenKind::RParen,
			'{' => TokenKind::LBrace,
			'}' => TokenKind::RBrace,
			'[' => TokenKind::LSBracket,
			']' => TokenKind::RSBracket,
			',' => TokenKind::Comma,
			'.' => TokenKind::Dot,
			';' => TokenKind::Semicolon,
			'*' => TokenKind::Mult,
			'/' => TokenKind::Div,
			'-' => self.either('-', TokenKind::Decrement, TokenKind::Minus),
			'+' => self.either('+', TokenKind::Increment, TokenKind::Plus),
			'!' => self.either('=', TokenKind::NotEqual, TokenKind::Bang),
			'=' => self.either('=', TokenKind::Equal, TokenKind::Assign),
			'<' => self.either('=', TokenKind::LessThanOrEqual, TokenKind::LessThan),
			'>' => self.either('=', TokenKind::GreaterThanOrEqual, TokenKind::GreaterThan),
			'"' => return self.lex_string(),
			'\'' => return self.lex_bytes(),
			'0'..='9' => return self.lex_number(ch),
			c if is_alpha(c) => return Ok(self.lex_ident()),
			c => return Err(self.error(LexicalErrorType::UnexpectedCharacter { ch: c })),
		};

		Ok(self.make_token(kind))
	}

	fn next_char(&mut self) -> Option<char> {
		let ch = self.ch;

		let next = self.input.next();
		let next_position = match next {
			Some((pos, _)) => pos,
			None => self.next_position + self.next_ch.map_or(0, |c| c.len_utf8() as u32),
		};

		self.position = self.next_position;
		self.next_position = next_position;

		self.ch = self.next_ch;
		self.next_ch = next.map(|(_, c)| c);

		ch
	}

	/// Consumes the current char as part of the lexeme.
	fn advance(&mut self) -> Option<char> {
		let ch = self.next_char();

		if let Some(ch) = ch {
			self.lexeme.push(ch);
		}

		ch
	}

	fn either(&mut self, expected: char, matched: TokenKind, single: TokenKind) -> TokenKind {
		if self.ch == Some(expected) {
			self.advance();
			matched
		} else {
			single
		}
	}

	fn skip_trivia(&mut self) {
		loop {
			match self.ch {
				Some(' ' | '\r' | '\t') => {
					self.next_char();
				},
				Some('\n') => {
					self.line += 1;
					self.next_char();
				},
				Some('/') if self.next_ch == Some('/') => {
					while !matches!(self.ch, Some('\n') | None) {
						self.next_char();
					}
				},
				_ => break
			}
		}
	}

	fn make_token(&self, kind: TokenKind) -> Token {
		Token::new(kind, self.lexeme.clone(), self.line, SrcSpan::from(self.start, self.position))
	}

	fn error(&self, error: LexicalErrorType) -> LexicalError {
		LexicalError {
			error,
			lexeme: self.lexeme.clone(),
			line: self.line,
			location: SrcSpan::from(self.start, self.position),
		}
	}

	fn lex_ident(&mut self) -> Token {
		while matches!(self.ch, Some(ch) if is_alpha(ch) || ch.is_ascii_digit()) {
			self.advance();
		}

		let kind = str_to_keyword(&self.lexeme).unwrap_or(TokenKind::Ident);

		self.make_token(kind)
	}

	fn lex_number(&mut self, first: char) -> LexResult {
		let radix = if first == '0' && self.ch == Some('x') {
			self.advance();

			while matches!(self.ch, Some(ch) if ch.is_ascii_hexdigit()) {
				self.advance();
			}

			16
		} else {
			while matches!(self.ch, Some(ch) if ch.is_ascii_digit()) {
				self.advance();
			}

			10
		};

		let digits = match radix {
			16 => &self.lexeme[2..],
			_ => &self.lexeme[..],
		};

		if digits.is_empty() {
			return Err(self.error(LexicalErrorType::MissingHexDigits));
		}

		match i64::from_str_radix(digits, radix) {
			Ok(value) => Ok(self.make_token(TokenKind::Number).with_literal(Literal::Int(value))),
			Err(_) => Err(self.error(LexicalErrorType::NumberOutOfRange)),
		}
	}

	/// Consumes up to and including `delimiter`. Returns `false` when the
	/// input ends first.
	fn consume_delimited(&mut self, delimiter: char) -> bool {
		loop {
			match self.ch {
				Some(ch) if ch == delimiter => {
					self.advance();
					return true;
				},
				Some(ch) => {
					if ch == '\n' {
						self.line += 1;
					}
					self.advance();
				},
				None => return false
			}
		}
	}

	fn lex_string(&mut self) -> LexResult {
		if !self.consume_delimited('"') {
			return Err(self.error(LexicalErrorType::UnterminatedString));
		}

		let value = self.lexeme[1..self.lexeme.len() - 1].to_string();

		Ok(self.make_token(TokenKind::String).with_literal(Literal::Str(value)))
	}

	fn lex_bytes(&mut self) -> LexResult {
		if !self.consume_delimited('\'') {
			return Err(self.error(LexicalErrorType::UnterminatedBytes));
		}

		match decode_hex_bytes(&self.lexeme[1..self.lexeme.len() - 1]) {
			Some(bytes) => Ok(self.make_token(TokenKind::Bytes).with_literal(Literal::Bytes(bytes))),
			None => Err(self.error(LexicalErrorType::InvalidBytes)),
		}
	}
}

fn is_alpha(ch: char) -> bool {
	ch.is_ascii_alphabetic() || ch == '_'
}

/// Decodes the body of a `'...'` literal. Whitespace is dropped and an odd
/// number of digits gets a leading `0` nibble.
pub fn decode_hex_bytes(text: &str) -> Option<Vec<u8>> {
	let mut nibbles = text.chars()
		.filter(|ch| !ch.is_whitespace())
		.map(|ch| ch.to_ascii_uppercase().to_digit(16).map(|digit| digit as u8))
		.collect::<Option<Vec<u8>>>()?;

	if nibbles.len() % 2 != 0 {
		nibbles.insert(0, 0);
	}

	Some(nibbles.chunks(2)
		.map(|pair| (pair[0] << 4) | pair[1])
		.collect())
}

/// Scans the whole source. Lexical errors are collected next to the tokens;
/// the token list always ends with exactly one `EOF`.
pub fn scan(src: &str) -> (Vec<Token>, Vec<LexicalError>) {
	let mut tokens = vec![];
	let mut errors = vec![];

	for result in Lexer::from_source(src) {
		match result {
			Ok(token) => tokens.push(token),
			Err(err) => errors.push(err),
		}
	}

	(tokens, errors)
}

impl<T: Iterator<Item = (u32, char)>> Iterator for Lexer<T> {
	type Item = LexResult;

	fn next(&mut self) -> Option<Self::Item> {
		if self.finished {
			return None;
		}

		let token = self.next_token();

		if matches!(&token, Ok(token) if token.kind == TokenKind::Eof) {
			self.finished = true;
		}

		Some(token)
	}
}
