use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::debug;
use utf8_chars::BufReadCharsExt;

use crate::eval::prelude::Interpreter;
use crate::parser::prelude::{parse_source, parse_source_from_stream, Parsed};
use crate::utils::prelude::{Error, OutputEmitterIO};

/// Scan, parse and run pipeline. The interpreter, and with it every global
/// definition, lives as long as the session.
pub struct Session {
    interpreter: Interpreter,
}

impl Session {
    pub fn new(output: Rc<dyn OutputEmitterIO>) -> Self {
        Self {
            interpreter: Interpreter::new(output),
        }
    }

    /// Runs `src`. Nothing is executed when it has a syntax error.
    pub fn run(&mut self, path: impl Into<PathBuf>, src: &str) -> Result<(), Error> {
        let path = path.into();
        let parsed = parse_source(src);

        self.run_parsed(path, src.to_string(), parsed)
    }

    /// Streams the file through the lexer, keeping a copy of the text for
    /// error reports.
    pub fn run_file(&mut self, path: &Path) -> Result<(), Error> {
        debug!(path = %path.display(), "reading script");

        let file = File::open(path)?;
        let file_size = file.metadata()?.len() as usize;

        let mut src = String::with_capacity(file_size);
        let mut reader = BufReader::new(file);
        let mut io_error = None;

        let chars = reader.chars()
            .map_while(|ch| match ch {
                Ok(ch) => Some(ch),
                Err(err) => {
                    io_error = Some(err);
                    None
                }
            })
            .inspect(|ch| src.push(*ch));

        let parsed = parse_source_from_stream(chars);

        if let Some(err) = io_error {
            return Err(Error::StdIo { err: err.kind() });
        }

        self.run_parsed(path.to_path_buf(), src, parsed)
    }

    fn run_parsed(&mut self, path: PathBuf, src: String, parsed: Parsed) -> Result<(), Error> {
        debug!(
            statements = parsed.statements.len(),
            syntax_errors = parsed.errors.len() + parsed.lex_errors.len(),
            "parsed"
        );

        if parsed.has_errors() {
            return Err(Error::Syntax {
                path,
                src,
                lexical: parsed.lex_errors,
                parse: parsed.errors,
            });
        }

        let result = self.interpreter.interpret(&parsed.statements);
        debug!(ok = result.is_ok(), "run finished");

        result.map_err(|error| Error::Runtime { path, src, error })
    }
}
