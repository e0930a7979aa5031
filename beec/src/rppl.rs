use bee_core::parser::prelude::parse_source;

use crate::cli::read_line;

pub fn start() -> std::io::Result<()> {
	while let Some(input) = read_line()? {
		if input.is_empty() {
			continue;
		}

		let parsed = parse_source(&input);

		for err in &parsed.lex_errors {
			println!("{err}");
		}

		for err in &parsed.errors {
			let (_, messages) = err.details();

			println!("{err}");
			if !messages.is_empty() {
				println!("\t{}", messages.join(";\n\t"));
			}
		}

		if !parsed.statements.is_empty() {
			println!("{parsed}");
		}
	}

	Ok(())
}
