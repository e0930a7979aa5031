use std::rc::Rc;

use crate::lexer::prelude::{LexResult, LexicalError, Lexer, Token, TokenKind};
use crate::utils::prelude::SrcSpan;
use super::ast::{Expr, FunctionDecl, Parsed, Primitive, Stmt};
use super::error::{ParseError, ParseErrorType, MAX_ARGUMENTS};

pub type ParseResult<T> = Result<T, ParseError>;

/// Recursive descent parser, one method per grammar rule (see `ast.rs`).
///
/// Tokens are pulled lazily from `T`; lexical errors met on the way are set
/// aside in `lex_errors` and the parser carries on with the next token.
pub struct Parser<T: Iterator<Item = LexResult>> {
    pub previous_token: Option<Token>,
    pub current_token: Token,
    pub next_token: Token,
    pub lex_errors: Vec<LexicalError>,
    pub errors: Vec<ParseError>,

    tokens: T,
    eof: Option<Token>,
}

impl<T: Iterator<Item = LexResult>> Parser<T> {
    pub fn new(input: T) -> Self {
        let placeholder = Token::new(TokenKind::Eof, "", 1, SrcSpan::default());

        let mut parser = Self {
            previous_token: None,
            current_token: placeholder.clone(),
            next_token: placeholder,
            lex_errors: vec![],
            errors: vec![],

            tokens: input,
            eof: None,
        };

        parser.current_token = parser.pull();
        parser.next_token = parser.pull();

        parser
    }

    fn pull(&mut self) -> Token {
        if let Some(eof) = &self.eof {
            return eof.clone();
        }

        loop {
            match self.tokens.next() {
                Some(Ok(token)) => {
                    if token.is(TokenKind::Eof) {
                        self.eof = Some(token.clone());
                    }

                    return token;
                },
                Some(Err(err)) => self.lex_errors.push(err),
                None => {
                    // The stream ended without `EOF`, make one up after the last token.
                    let last = match self.previous_token.as_ref() {
                        Some(token) => token.clone(),
                        None => self.current_token.clone(),
                    };
                    let eof = Token::new(
                        TokenKind::Eof,
                        "",
                        last.line,
                        SrcSpan::from(last.span.end, last.span.end)
                    );

                    self.eof = Some(eof.clone());
                    return eof;
                }
            }
        }
    }

    pub fn parse(mut self) -> Parsed {
        let mut statements = vec![];

        while !self.is_at_end() {
            if let Some(statement) = self.declaration() {
                statements.push(statement);
            }
        }

        Parsed {
            statements,
            errors: self.errors,
            lex_errors: self.lex_errors,
        }
    }

    /// Parses a single expression, the rest of the input is left untouched.
    pub fn parse_expression(mut self) -> ParseResult<Expr> {
        self.expression()
    }

    // ---------------------------------------------------------------------
    // declarations and statements

    fn declaration(&mut self) -> Option<Stmt> {
        let statement = if self.matches(&[TokenKind::Fun]) {
            self.function("function")
        } else if self.matches(&[TokenKind::Var]) {
            self.var_declaration()
        } else {
            self.statement()
        };

        match statement {
            Ok(statement) => Some(statement),
            Err(err) => {
                self.errors.push(err);
                self.synchronize();

                None
            }
        }
    }

    // funDecl -> "fun" IDENT "(" [ IDENT { "," IDENT } ] ")" block
    fn function(&mut self, kind: &str) -> ParseResult<Stmt> {
        let name = self.consume(TokenKind::Ident, format!("{kind} name"))?;
        self.consume(TokenKind::LParen, format!("'(' after {kind} name"))?;

        let mut params = vec![];

        if !self.check(TokenKind::RParen) {
            loop {
                params.push(self.consume(TokenKind::Ident, "parameter name")?);

                if !self.matches(&[TokenKind::Comma]) {
                    break;
                }
            }

            if params.len() >= MAX_ARGUMENTS {
                self.report(ParseErrorType::TooManyParameters);
            }
        }

        self.consume(TokenKind::RParen, "')' after parameters")?;
        self.consume(TokenKind::LBrace, format!("'{{' before {kind} body"))?;

        let body = self.block()?;

        Ok(Stmt::Function(Rc::new(FunctionDecl { name, params, body })))
    }

    // varDecl -> "var" IDENT [ "=" expression ] ";"
    fn var_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.consume(TokenKind::Ident, "variable name")?;

        let initializer = match self.matches(&[TokenKind::Assign]) {
            true => Some(self.expression()?),
            false => None,
        };

        self.consume(TokenKind::Semicolon, "';' after variable declaration")?;

        Ok(Stmt::Var { name, initializer })
    }

    fn statement(&mut self) -> ParseResult<Stmt> {
        if self.matches(&[TokenKind::For]) {
            return self.for_statement();
        }
        if self.matches(&[TokenKind::If]) {
            return self.if_statement();
        }
        if self.matches(&[TokenKind::Return]) {
            return self.return_statement();
        }
        if self.matches(&[TokenKind::While]) {
            return self.while_statement();
        }
        if self.matches(&[TokenKind::LBrace]) {
            return Ok(Stmt::Block { statements: self.block()? });
        }
        if self.at_print_statement() {
            return self.print_statement();
        }

        self.expression_statement()
    }

    /// `print` without a following `(` starts a print statement, otherwise it
    /// is an ordinary reference to the native function.
    fn at_print_statement(&self) -> bool {
        self.current_token.is(TokenKind::Ident)
            && self.current_token.lexeme == "print"
            && !self.next_token.is(TokenKind::LParen)
    }

    // printStmt -> "print" expression ";"
    //
    // Desugared into `println(expression);`.
    fn print_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.advance();
        let value = self.expression()?;
        let paren = self.consume(TokenKind::Semicolon, "';' after value")?;

        let callee = Expr::Variable {
            name: Token::synthetic(TokenKind::Ident, "println", &keyword),
        };

        Ok(Stmt::Expression {
            expression: Expr::Call {
                callee: Box::new(callee),
                paren: Token::synthetic(TokenKind::RParen, ")", &paren),
                arguments: vec![value],
            }
        })
    }

    fn expression_statement(&mut self) -> ParseResult<Stmt> {
        let expression = self.expression()?;
        self.consume(TokenKind::Semicolon, "';' after expression")?;

        Ok(Stmt::Expression { expression })
    }

    // forStmt -> "for" "(" ( varDecl | exprStmt | ";" ) [ expression ] ";" [ expression ] ")" statement
    //
    // { initializer; while (condition) { body; increment; } }
    fn for_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::LParen, "'(' after 'for'")?;

        let initializer = if self.matches(&[TokenKind::Semicolon]) {
            None
        } else if self.matches(&[TokenKind::Var]) {
            Some(self.var_declaration()?)
        } else {
            Some(self.expression_statement()?)
        };

        let condition = match self.check(TokenKind::Semicolon) {
            true => None,
            false => Some(self.expression()?),
        };
        self.consume(TokenKind::Semicolon, "';' after loop condition")?;

        let increment = match self.check(TokenKind::RParen) {
            true => None,
            false => Some(self.expression()?),
        };
        self.consume(TokenKind::RParen, "')' after for clauses")?;

        let mut body = self.statement()?;

        if let Some(increment) = increment {
            body = Stmt::Block {
                statements: vec![body, Stmt::Expression { expression: increment }],
            };
        }

        let condition = condition.unwrap_or(Expr::Literal(Primitive::Bool { value: true }));
        body = Stmt::While { condition, body: Box::new(body) };

        if let Some(initializer) = initializer {
            body = Stmt::Block { statements: vec![initializer, body] };
        }

        Ok(body)
    }

    // ifStmt -> "if" "(" expression ")" statement [ "else" statement ]
    fn if_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::LParen, "'(' after 'if'")?;
        let condition = self.expression()?;
        self.consume(TokenKind::RParen, "')' after if condition")?;

        let then_branch = Box::new(self.statement()?);
        let else_branch = match self.matches(&[TokenKind::Else]) {
            true => Some(Box::new(self.statement()?)),
            false => None,
        };

        Ok(Stmt::If { condition, then_branch, else_branch })
    }

    // whileStmt -> "while" "(" expression ")" statement
    fn while_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::LParen, "'(' after 'while'")?;
        let condition = self.expression()?;
        self.consume(TokenKind::RParen, "')' after condition")?;

        let body = Box::new(self.statement()?);

        Ok(Stmt::While { condition, body })
    }

    // returnStmt -> "return" [ expression ] ";"
    fn return_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous();

        let value = match self.check(TokenKind::Semicolon) {
            true => None,
            false => Some(self.expression()?),
        };

        self.consume(TokenKind::Semicolon, "';' after return value")?;

        Ok(Stmt::Return { keyword, value })
    }

    // block -> "{" { declaration } "}"
    fn block(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut statements = vec![];

        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            if let Some(statement) = self.declaration() {
                statements.push(statement);
            }
        }

        self.consume(TokenKind::RBrace, "'}' after block")?;

        Ok(statements)
    }

    // ---------------------------------------------------------------------
    // expressions, lowest precedence first

    fn expression(&mut self) -> ParseResult<Expr> {
        self.assignment()
    }

    fn assignment(&mut self) -> ParseResult<Expr> {
        let expr = self.or()?;

        if self.matches(&[TokenKind::Assign]) {
            let equals = self.previous();
            let value = Box::new(self.assignment()?);

            if let Expr::Variable { name } = expr {
                return Ok(Expr::Assign { name, value });
            }

            self.errors.push(ParseError::new(ParseErrorType::InvalidAssignmentTarget, equals));
        }

        Ok(expr)
    }

    fn or(&mut self) -> ParseResult<Expr> {
        let mut expr = self.and()?;

        while self.matches(&[TokenKind::Or]) {
            let operator = self.previous();
            let right = self.and()?;

            expr = Expr::Logical { left: Box::new(expr), operator, right: Box::new(right) };
        }

        Ok(expr)
    }

    fn and(&mut self) -> ParseResult<Expr> {
        let mut expr = self.equality()?;

        while self.matches(&[TokenKind::And]) {
            let operator = self.previous();
            let right = self.equality()?;

            expr = Expr::Logical { left: Box::new(expr), operator, right: Box::new(right) };
        }

        Ok(expr)
    }

    /// Left associative chain of `operand` separated by any of `operators`.
    fn binary(
        &mut self,
        operators: &[TokenKind],
        operand: fn(&mut Self) -> ParseResult<Expr>
    ) -> ParseResult<Expr> {
        let mut expr = operand(self)?;

        while self.matches(operators) {
            let operator = self.previous();
            let right = operand(self)?;

            expr = Expr::Binary { left: Box::new(expr), operator, right: Box::new(right) };
        }

        Ok(expr)
    }

    fn equality(&mut self) -> ParseResult<Expr> {
        self.binary(&[TokenKind::NotEqual, TokenKind::Equal], Self::comparison)
    }

    fn comparison(&mut self) -> ParseResult<Expr> {
        self.binary(
            &[
                TokenKind::GreaterThan,
                TokenKind::GreaterThanOrEqual,
                TokenKind::LessThan,
                TokenKind::LessThanOrEqual,
            ],
            Self::term
        )
    }

    fn term(&mut self) -> ParseResult<Expr> {
        self.binary(&[TokenKind::Minus, TokenKind::Plus], Self::factor)
    }

    fn factor(&mut self) -> ParseResult<Expr> {
        self.binary(&[TokenKind::Div, TokenKind::Mult], Self::unary)
    }

    fn unary(&mut self) -> ParseResult<Expr> {
        if self.matches(&[TokenKind::Bang, TokenKind::Minus]) {
            let operator = self.previous();
            let right = self.unary()?;

            return Ok(Expr::Unary { operator, right: Box::new(right) });
        }

        self.call()
    }

    fn call(&mut self) -> ParseResult<Expr> {
        let mut expr = self.increment()?;

        while self.matches(&[TokenKind::LParen]) {
            expr = self.finish_call(expr)?;
        }

        Ok(expr)
    }

    fn finish_call(&mut self, callee: Expr) -> ParseResult<Expr> {
        let mut arguments = vec![];

        if !self.check(TokenKind::RParen) {
            loop {
                arguments.push(self.expression()?);

                if !self.matches(&[TokenKind::Comma]) {
                    break;
                }
            }

            if arguments.len() >= MAX_ARGUMENTS {
                self.report(ParseErrorType::TooManyArguments);
            }
        }

        let paren = self.consume(TokenKind::RParen, "')' after arguments")?;

        Ok(Expr::Call { callee: Box::new(callee), paren, arguments })
    }

    fn increment(&mut self) -> ParseResult<Expr> {
        let expr = self.primary()?;

        if self.matches(&[TokenKind::Increment, TokenKind::Decrement]) {
            let sign = self.previous();

            if let Expr::Variable { name } = expr {
                return Ok(Expr::Increment { name, sign });
            }

            self.errors.push(ParseError::new(ParseErrorType::InvalidIncrementTarget, sign));
        }

        Ok(expr)
    }

    fn primary(&mut self) -> ParseResult<Expr> {
        if self.matches(&[TokenKind::False]) {
            return Ok(Expr::Literal(Primitive::Bool { value: false }));
        }
        if self.matches(&[TokenKind::True]) {
            return Ok(Expr::Literal(Primitive::Bool { value: true }));
        }
        if self.matches(&[TokenKind::Nil]) {
            return Ok(Expr::Literal(Primitive::Nil));
        }
        if self.matches(&[TokenKind::Number, TokenKind::String, TokenKind::Bytes]) {
            let primitive = self.previous().literal
                .map(Primitive::from)
                .unwrap_or(Primitive::Nil);

            return Ok(Expr::Literal(primitive));
        }
        if self.matches(&[TokenKind::Ident]) {
            return Ok(Expr::Variable { name: self.previous() });
        }
        if self.matches(&[TokenKind::LParen]) {
            let expression = self.expression()?;
            self.consume(TokenKind::RParen, "')' after expression")?;

            return Ok(Expr::Grouping { expression: Box::new(expression) });
        }

        Err(ParseError::new(ParseErrorType::ExpectedExpression, self.current_token.clone()))
    }

    // ---------------------------------------------------------------------
    // helpers

    /// Records an error at the current token without unwinding.
    fn report(&mut self, error: ParseErrorType) {
        let err = ParseError::new(error, self.current_token.clone());
        self.errors.push(err);
    }

    /// Discards tokens until the start of the next statement.
    fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if matches!(&self.previous_token, Some(token) if token.is(TokenKind::Semicolon)) {
                return;
            }

            if self.current_token.kind.is_statement_start() {
                return;
            }

            self.advance();
        }
    }

    fn consume(&mut self, kind: TokenKind, what: impl Into<String>) -> ParseResult<Token> {
        if self.check(kind) {
            return Ok(self.advance());
        }

        Err(ParseError::new(
            ParseErrorType::Expected { what: what.into() },
            self.current_token.clone()
        ))
    }

    fn matches(&mut self, kinds: &[TokenKind]) -> bool {
        if kinds.iter().any(|kind| self.check(*kind)) {
            self.advance();
            return true;
        }

        false
    }

    fn check(&self, kind: TokenKind) -> bool {
        !self.is_at_end() && self.current_token.is(kind)
    }

    fn advance(&mut self) -> Token {
        if !self.is_at_end() {
            let next = self.pull();
            let current = std::mem::replace(&mut self.next_token, next);
            let consumed = std::mem::replace(&mut self.current_token, current);

            self.previous_token = Some(consumed);
        }

        self.previous()
    }

    fn previous(&self) -> Token {
        match &self.previous_token {
            Some(token) => token.clone(),
            None => self.current_token.clone(),
        }
    }

    fn is_at_end(&self) -> bool {
        self.current_token.is(TokenKind::Eof)
    }
}

/// Parses an already scanned token list.
pub fn parse(tokens: Vec<Token>) -> Parsed {
    Parser::new(tokens.into_iter().map(Ok)).parse()
}

pub fn parse_source(src: &str) -> Parsed {
    Parser::new(Lexer::from_source(src)).parse()
}

pub fn parse_source_from_stream(stream: impl Iterator<Item = char>) -> Parsed {
    let lexer = Lexer::new(stream
        .scan(0, |pos, c| {
            *pos += c.len_utf8() as u32;
            Some((*pos - c.len_utf8() as u32, c))
        })
    );

    Parser::new(lexer).parse()
}

pub fn parse_expression(src: &str) -> ParseResult<Expr> {
    Parser::new(Lexer::from_source(src)).parse_expression()
}
