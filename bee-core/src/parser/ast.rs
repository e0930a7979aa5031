use std::fmt::Display;
use std::rc::Rc;

use crate::lexer::prelude::{LexicalError, Literal, Token};
use super::error::ParseError;

/// Result of parsing one source text.
///
/// Statements that failed to parse are left out; each of them has a matching
/// entry in `errors`.
#[derive(Debug, Default)]
pub struct Parsed {
    pub statements: Vec<Stmt>,
    pub errors: Vec<ParseError>,
    pub lex_errors: Vec<LexicalError>,
}

impl Parsed {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty() || !self.lex_errors.is_empty()
    }
}

impl Display for Parsed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let statements = self.statements.iter()
            .map(|statement| format!("{statement}"))
            .collect::<Vec<String>>();

        write!(f, "{}", statements.join("\n"))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Nil,
    Bool {
        value: bool
    },
    Int {
        value: i64
    },
    String {
        value: String
    },
    Bytes {
        value: Vec<u8>
    },
}

impl From<Literal> for Primitive {
    fn from(value: Literal) -> Self {
        match value {
            Literal::Int(value) => Primitive::Int { value },
            Literal::Str(value) => Primitive::String { value },
            Literal::Bytes(value) => Primitive::Bytes { value },
        }
    }
}

impl Display for Primitive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Primitive::Nil => write!(f, "nil"),
            Primitive::Bool { value } => write!(f, "{value}"),
            Primitive::Int { value } => write!(f, "{value}"),
            Primitive::String { value } => write!(f, "\"{value}\""),
            Primitive::Bytes { value } => {
                write!(f, "'{}'", Literal::Bytes(value.clone()))
            }
        }
    }
}

// expression -> assignment
// assignment -> IDENT "=" assignment | logic_or
// logic_or -> logic_and { "or" logic_and }
// logic_and -> equality { "and" equality }
// equality -> comparison { ( "!=" | "==" ) comparison }
// comparison -> term { ( ">" | ">=" | "<" | "<=" ) term }
// term -> factor { ( "-" | "+" ) factor }
// factor -> unary { ( "/" | "*" ) unary }
// unary -> ( "!" | "-" ) unary | call
// call -> increment { "(" [ arguments ] ")" }
// increment -> primary [ "++" | "--" ]
// primary -> "true" | "false" | "nil" | NUMBER | STRING | BYTES | IDENT | "(" expression ")"
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Primitive),
    Grouping {
        expression: Box<Expr>
    },
    Unary {
        operator: Token,
        right: Box<Expr>
    },
    Binary {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>
    },
    /// `and` / `or`, evaluated with short circuit.
    Logical {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>
    },
    Variable {
        name: Token
    },
    Assign {
        name: Token,
        value: Box<Expr>
    },
    Call {
        callee: Box<Expr>,
        paren: Token,
        arguments: Vec<Expr>
    },
    Increment {
        name: Token,
        sign: Token
    },
}

impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Literal(primitive) => write!(f, "{primitive}"),
            Expr::Grouping { expression } => write!(f, "({expression})"),
            Expr::Unary { operator, right } => match right.as_ref() {
                // `- -a` must not turn into `--a`
                Expr::Unary { .. } => write!(f, "{} {right}", operator.lexeme),
                _ => write!(f, "{}{right}", operator.lexeme),
            },
            Expr::Binary { left, operator, right }
            | Expr::Logical { left, operator, right } => {
                write!(f, "{left} {} {right}", operator.lexeme)
            },
            Expr::Variable { name } => write!(f, "{}", name.lexeme),
            Expr::Assign { name, value } => write!(f, "{} = {value}", name.lexeme),
            Expr::Call { callee, arguments, .. } => {
                let arguments = arguments.iter()
                    .map(|argument| format!("{argument}"))
                    .collect::<Vec<String>>();

                write!(f, "{callee}({})", arguments.join(", "))
            },
            Expr::Increment { name, sign } => write!(f, "{}{}", name.lexeme, sign.lexeme),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: Token,
    pub params: Vec<Token>,
    pub body: Vec<Stmt>,
}

// program -> { declaration } EOF
// declaration -> funDecl | varDecl | statement
// statement -> exprStmt | forStmt | ifStmt | printStmt | returnStmt | whileStmt | block
//
// `for` and `print` have no node of their own, the parser desugars them.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expression {
        expression: Expr
    },
    Var {
        name: Token,
        initializer: Option<Expr>
    },
    Block {
        statements: Vec<Stmt>
    },
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>
    },
    While {
        condition: Expr,
        body: Box<Stmt>
    },
    /// Shared so that function values can keep the declaration alive.
    Function(Rc<FunctionDecl>),
    Return {
        keyword: Token,
        value: Option<Expr>
    },
}

fn write_statements(f: &mut std::fmt::Formatter<'_>, statements: &[Stmt]) -> std::fmt::Result {
    if statements.is_empty() {
        return write!(f, "{{ }}");
    }

    let statements = statements.iter()
        .map(|statement| format!("{statement}"))
        .collect::<Vec<String>>();

    write!(f, "{{ {} }}", statements.join(" "))
}

impl Display for Stmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stmt::Expression { expression } => write!(f, "{expression};"),
            Stmt::Var { name, initializer } => match initializer {
                Some(initializer) => write!(f, "var {} = {initializer};", name.lexeme),
                None => write!(f, "var {};", name.lexeme),
            },
            Stmt::Block { statements } => write_statements(f, statements),
            Stmt::If { condition, then_branch, else_branch } => {
                write!(f, "if ({condition}) {then_branch}")?;

                match else_branch {
                    Some(else_branch) => write!(f, " else {else_branch}"),
                    None => Ok(()),
                }
            },
            Stmt::While { condition, body } => write!(f, "while ({condition}) {body}"),
            Stmt::Function(declaration) => {
                let params = declaration.params.iter()
                    .map(|param| param.lexeme.as_str())
                    .collect::<Vec<&str>>();

                write!(f, "fun {}({}) ", declaration.name.lexeme, params.join(", "))?;
                write_statements(f, &declaration.body)
            },
            Stmt::Return { value, .. } => match value {
                Some(value) => write!(f, "return {value};"),
                None => write!(f, "return;"),
            },
        }
    }
}
