//! Interactive prompts for the `fill` command

use std::io::{self, BufRead, Write};
use std::path::Path;

/// Answer that selects the configured default
const DEFAULT_KEYWORD: &str = "default";

/// Append `.<extension>` to a name that has none
pub fn with_extension(name: &str, extension: &str) -> String {
    if Path::new(name).extension().is_some() {
        name.to_string()
    } else {
        format!("{name}.{extension}")
    }
}

/// Turn a prompt answer into a file name
///
/// Blank input or `default` (any case) selects `default_name`.
pub fn normalize_answer(answer: &str, default_name: &str, extension: &str) -> String {
    let answer = answer.trim();
    if answer.is_empty() || answer.eq_ignore_ascii_case(DEFAULT_KEYWORD) {
        with_extension(default_name, extension)
    } else {
        with_extension(answer, extension)
    }
}

fn read_answer<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
) -> io::Result<String> {
    write!(output, "{question}")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line)
}

/// Ask for a file name, offering the configured default
pub fn ask_file_name<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    what: &str,
    default_name: &str,
    extension: &str,
) -> io::Result<String> {
    let question = format!(
        "Enter the {what} name (press enter or type '{DEFAULT_KEYWORD}' for '{}'): ",
        with_extension(default_name, extension)
    );
    let answer = read_answer(input, output, &question)?;
    Ok(normalize_answer(&answer, default_name, extension))
}

/// Ask for the jurisdiction; blank means none
pub fn ask_jurisdiction<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> io::Result<String> {
    let answer = read_answer(input, output, "Enter the jurisdiction (blank for none): ")?;
    Ok(answer.trim().to_string())
}
