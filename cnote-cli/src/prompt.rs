//! Interactive questions: yes/no confirmation and first-run setup.

use crate::settings::expand_home;
use anyhow::{bail, Context, Result};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

const YES: [&str; 7] = ["y", "yes", "yeah", "sure", "yep", "okay", "aye"];
const NO: [&str; 4] = ["n", "no", "nope", "nay"];

/// Interprets a yes/no answer; `None` if it is neither.
pub fn answer(line: &str) -> Option<bool> {
    let line = line.trim().to_lowercase();
    if YES.contains(&line.as_str()) {
        Some(true)
    } else if NO.contains(&line.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// Reads one line; `None` at end of input.
pub fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Asks `message [y/n]` until a recognisable answer arrives.
///
/// End of input counts as "no".
pub fn confirm<R: BufRead, W: Write>(input: &mut R, out: &mut W, message: &str) -> io::Result<bool> {
    let mut message = message.to_string();
    loop {
        write!(out, "{message} [y/n]: ")?;
        out.flush()?;
        let Some(line) = read_line(input)? else {
            writeln!(out)?;
            return Ok(false);
        };
        match answer(&line) {
            Some(yes) => return Ok(yes),
            None => message = "Sorry, didn't quite get that...".to_string(),
        }
    }
}

/// Asks for the note folder until an existing directory is given, offering
/// to create missing ones.
///
/// # Errors
///
/// Fails if input ends before a folder is chosen or a folder cannot be created.
pub fn ask_note_path<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<PathBuf> {
    writeln!(out, "Welcome, new user!")?;
    loop {
        write!(out, "Enter a path for your note folder: ")?;
        out.flush()?;
        let Some(line) = read_line(input)? else {
            bail!("No note folder was given");
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let path = expand_home(line);
        if path.is_dir() {
            writeln!(out, "Okay, we're ready to go!")?;
            return Ok(path);
        }
        if path.exists() {
            writeln!(out, "Hey, that's not a folder!")?;
            continue;
        }
        if confirm(input, out, "That folder doesn't exist yet. Do you want to create it?")? {
            fs::create_dir_all(&path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            writeln!(out, "Done!")?;
        } else {
            writeln!(out, "Okay.")?;
        }
    }
}
