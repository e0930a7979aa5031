mod cli;
mod repl;
mod rlpl;
mod rppl;

use std::{path::Path, rc::Rc};

use clap::Parser;
use cli::{print_finished, print_running, report};
use bee_core::{
    session::Session,
    utils::prelude::StdoutEmitterIO
};

#[derive(Parser)]
enum Command {
    /// Runs scripts one after another in a single session
    Run {
        /// Paths of source files, separated by `;`
        scripts: String,
        /// Print errors with source snippets
        #[arg(long, default_value_t = false)]
        pretty: bool,
        /// Print how long every script took
        #[arg(long, default_value_t = false)]
        timings: bool,
    },
    /// Runs Read Eval Print Loop
    Repl {
        /// Print errors with source snippets
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// Runs Read Lex Print Loop
    Rlpl,
    /// Runs Read Parse Print Loop
    Rppl
}

fn main() {
    init_tracing();

    let code = match Command::parse() {
        Command::Run { scripts, pretty, timings } => run(&scripts, pretty, timings),
        Command::Repl { pretty } => exit_code(repl::start(pretty)),
        Command::Rlpl => exit_code(rlpl::start()),
        Command::Rppl => exit_code(rppl::start()),
    };

    std::process::exit(code);
}

/// Logs go to stderr, filtered by `BEE_LOG` (`warn` when unset).
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_env("BEE_LOG")
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .with(filter)
        .init();
}

fn run(scripts: &str, pretty: bool, timings: bool) -> i32 {
    let mut session = Session::new(Rc::new(StdoutEmitterIO));

    let paths = scripts.split(';')
        .map(str::trim)
        .filter(|path| !path.is_empty());

    for path in paths {
        if timings {
            print_running(path);
        }

        let start = std::time::Instant::now();
        let result = session.run_file(Path::new(path));

        if timings {
            print_finished(std::time::Instant::now() - start);
        }

        if let Err(err) = result {
            tracing::debug!(path, code = err.exit_code(), "script failed");
            report(&err, pretty);

            return err.exit_code();
        }
    }

    0
}

fn exit_code(result: std::io::Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {err}");
            74
        }
    }
}
