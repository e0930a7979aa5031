use bee_core::lexer::prelude::Lexer;

use crate::cli::read_line;

pub fn start() -> std::io::Result<()> {
	while let Some(input) = read_line()? {
		if input.is_empty() {
			continue;
		}

		for res in Lexer::from_source(&input) {
			match res {
				Ok(token) => println!("{token}"),
				Err(err) => {
					let (_, messages) = err.details();

					println!("{}", err.to_illegal_token());
					println!("{err}");
					if !messages.is_empty() {
						println!("\t{}", messages.join("\n\t"));
					}
				}
			}
		}
	}

	Ok(())
}
