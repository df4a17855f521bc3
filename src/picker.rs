//! Line-based prompts for the interactive flow.

use std::io::{self, BufRead, Write};

use crate::discovery::{ApplicationIndex, ApplicationRecord};

pub const SELECTED_PREFIX: &str = "You selected ";

/// Prints `message`, then reads one trimmed line. `None` on EOF or an empty line.
pub fn prompt_line<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    message: &str,
) -> io::Result<Option<String>> {
    writeln!(out, "{}", message)?;
    write!(out, "> ")?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }

    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    Ok(Some(line.to_string()))
}

/// Exact name first, then case-insensitive prefix matches.
pub fn matches<'a>(index: &'a ApplicationIndex, query: &str) -> Vec<&'a ApplicationRecord> {
    if let Some(record) = index.get(query) {
        return vec![record];
    }

    let query = query.to_lowercase();
    index
        .values()
        .filter(|record| record.name.to_lowercase().starts_with(&query))
        .collect()
}

/// Asks until the input names exactly one application, or the user gives up.
pub fn pick_application<'a, R: BufRead, W: Write>(
    index: &'a ApplicationIndex,
    input: &mut R,
    out: &mut W,
) -> io::Result<Option<&'a ApplicationRecord>> {
    let mut message = "Please input application name (empty to cancel)";

    loop {
        let Some(query) = prompt_line(input, out, message)? else {
            return Ok(None);
        };

        let found = matches(index, &query);
        match found.as_slice() {
            [] => {
                writeln!(out, "No application matches \"{}\"", query)?;
            }
            [record] => {
                writeln!(out, "{}{}", SELECTED_PREFIX, record.name)?;
                return Ok(Some(*record));
            }
            candidates => {
                writeln!(out, "{} applications match \"{}\":", candidates.len(), query)?;
                for record in candidates {
                    writeln!(out, "  {:<40} uti: {}", record.name, record.identifier)?;
                }
            }
        }

        message = "Please refine the application name";
    }
}
