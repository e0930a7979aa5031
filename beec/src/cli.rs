use std::{
    io::{IsTerminal, Write},
    time::Duration,
};
use bee_core::utils::prelude::Error;
use termcolor::{BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

pub(crate) fn print_running(text: &str) {
    print_colourful_prefix("Running", Color::Magenta, text)
}

pub(crate) fn print_finished(duration: Duration) {
    print_colourful_prefix("Finished", Color::Green, &format!("in {}", seconds(duration)))
}

/// Writes `err` to stderr, as source snippets when `pretty` is set.
pub(crate) fn report(err: &Error, pretty: bool) {
    if !pretty {
        eprintln!("{}", err.plain());
        return;
    }

    let buf_writer = stderr_buffer_writer();
    let mut buf = buf_writer.buffer();

    err.pretty(&mut buf);
    buf_writer
        .print(&buf)
        .expect("Writing error to stderr");
}

pub fn seconds(duration: Duration) -> String {
    format!("{:.2}s", duration.as_millis() as f32 / 1000.)
}

pub fn print_colourful_prefix(prefix: &str, color: Color, text: &str) {
    let buffer_writer = stderr_buffer_writer();
    let mut buffer = buffer_writer.buffer();
    buffer
        .set_color(
            ColorSpec::new()
                .set_intense(true)
                .set_bold(true)
                .set_fg(Some(color)),
        )
        .expect("print_colourful_prefix");
    write!(buffer, "{prefix: >11}").expect("print_colourful_prefix");
    buffer
        .set_color(&ColorSpec::new())
        .expect("print_colourful_prefix");
    writeln!(buffer, " {text}").expect("print_colourful_prefix");
    buffer_writer.print(&buffer).expect("print_colourful_prefix");
}

pub fn stderr_buffer_writer() -> BufferWriter {
    BufferWriter::stderr(color_choice())
}

fn colour_forced() -> bool {
    std::env::var("FORCE_COLOR").is_ok_and(|force| !force.is_empty())
}

fn color_choice() -> ColorChoice {
    if colour_forced() {
        ColorChoice::Always
    } else if std::io::stderr().is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

const PROMPT: &str = ">> ";

/// Prompts for one line. `None` on end of input or `.exit`.
pub(crate) fn read_line() -> std::io::Result<Option<String>> {
	let mut input = String::from("");

	print!("{}", PROMPT);
	std::io::stdout().flush()?;

	if std::io::stdin().read_line(&mut input)? == 0 {
		return Ok(None);
	}

	if let Some('\n') = input.chars().next_back() {
		input.pop();
	}
	if let Some('\r') = input.chars().next_back() {
		input.pop();
	}

	match input.as_str() {
		".exit" => Ok(None),
		_ => Ok(Some(input)),
	}
}
