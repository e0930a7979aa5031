use std::rc::Rc;

use bee_core::{
	session::Session,
	utils::prelude::StdoutEmitterIO
};

use crate::cli::{read_line, report};

/// Every line runs in the same session, so definitions carry over while
/// errors only affect their own line.
pub fn start(pretty: bool) -> std::io::Result<()> {
	let mut session = Session::new(Rc::new(StdoutEmitterIO));

	while let Some(input) = read_line()? {
		if input.is_empty() {
			continue;
		}

		if let Err(err) = session.run("<repl>", &input) {
			report(&err, pretty);
		}
	}

	Ok(())
}
