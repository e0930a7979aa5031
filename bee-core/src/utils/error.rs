use std::path::PathBuf;

use termcolor::Buffer;
use thiserror::Error;

use crate::{
    eval::prelude::RuntimeError,
    lexer::prelude::LexicalError,
    parser::prelude::ParseError,
};
use super::diagnostic::{Diagnostic, Label, Location};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("failed to parse source code")]
    Syntax {
        path: PathBuf,
        src: String,
        lexical: Vec<LexicalError>,
        parse: Vec<ParseError>
    },
    #[error("program aborted")]
    Runtime {
        path: PathBuf,
        src: String,
        error: RuntimeError
    },
    #[error("IO operation failed")]
    StdIo {
        err: std::io::ErrorKind
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::StdIo { err: err.kind() }
    }
}

impl Error {
    /// Process exit status for the error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Syntax { .. } => 65,
            Error::Runtime { .. } => 70,
            Error::StdIo { .. } => 74,
        }
    }

    /// One report per line, `[line n] Error at 'x': message` for syntax
    /// errors and `message\n[line n]` for runtime errors.
    pub fn plain(&self) -> String {
        match self {
            Error::Syntax { lexical, parse, .. } => {
                lexical.iter()
                    .map(|err| err.to_string())
                    .chain(parse.iter().map(|err| err.to_string()))
                    .collect::<Vec<String>>()
                    .join("\n")
            },
            Error::Runtime { error, .. } => error.to_string(),
            Error::StdIo { err } => format!("error: {err}"),
        }
    }

    pub fn pretty_string(&self) -> String {
        let mut nocolor = Buffer::no_color();
        self.pretty(&mut nocolor);
        String::from_utf8(nocolor.into_inner()).expect("Error printing produced invalid utf8")
    }

    pub fn pretty(&self, buf: &mut Buffer) {
        use std::io::Write;

        for diagnostic in self.to_diagnostics() {
            diagnostic.write(buf);
            writeln!(buf).expect("write new line diagnostic");
        }
    }

    pub fn to_diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            Error::Syntax { path, src, lexical, parse } => {
                let lexical = lexical.iter().map(|error| {
                    let (label, extra) = error.details();

                    Diagnostic {
                        title: "Syntax error".into(),
                        text: extra.join("\n"),
                        location: Some(Location {
                            src,
                            path: path.clone(),
                            label: Label {
                                text: Some(label),
                                span: error.location,
                            },
                        }),
                    }
                });

                let parse = parse.iter().map(|error| {
                    let (label, extra) = error.details();

                    Diagnostic {
                        title: "Syntax error".into(),
                        text: extra.join("\n"),
                        location: Some(Location {
                            src,
                            path: path.clone(),
                            label: Label {
                                text: Some(label),
                                span: error.token.span,
                            },
                        }),
                    }
                });

                lexical.chain(parse).collect()
            },
            Error::Runtime { path, src, error } => {
                let (label, extra) = error.details();

                vec![Diagnostic {
                    title: "Runtime error".into(),
                    text: extra.join("\n"),
                    location: Some(Location {
                        src,
                        path: path.clone(),
                        label: Label {
                            text: Some(label),
                            span: error.token.span,
                        },
                    }),
                }]
            },
            Error::StdIo { err } => {
                vec![Diagnostic {
                    title: "Standard IO error".into(),
                    text: format!("{err}"),
                    location: None,
                }]
            }
        }
    }
}
