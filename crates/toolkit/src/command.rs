//! Workflow commands understood by the runner (`::name::message` lines on stdout
//! and the `GITHUB_OUTPUT` file).

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use uuid::Uuid;

pub const OUTPUT_FILE_ENV: &str = "GITHUB_OUTPUT";

pub fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

pub fn format_command(command: &str, message: &str) -> String {
    format!("::{command}::{}", escape_data(message))
}

fn issue(command: &str, message: &str) {
    println!("{}", format_command(command, message));
}

/// Reports the step as failed. The caller is responsible for the exit status.
pub fn set_failed(message: &str) {
    error(message);
}

pub fn error(message: &str) {
    issue("error", message);
}

/// Masks `value` in all subsequent log output.
pub fn set_secret(value: &str) {
    issue("add-mask", value);
}

pub fn start_group(title: &str) {
    issue("group", title);
}

pub fn end_group() {
    issue("endgroup", "");
}

pub fn is_debug() -> bool {
    std::env::var("RUNNER_DEBUG").is_ok_and(|value| value == "1")
}

/// Publishes a step output.
pub fn set_output(name: &str, value: &str) -> io::Result<()> {
    match std::env::var_os(OUTPUT_FILE_ENV).filter(|path| !path.is_empty()) {
        Some(path) => append_output(Path::new(&path), name, value),
        None => {
            println!();
            println!("::set-output name={name}::{}", escape_data(value));
            Ok(())
        }
    }
}

pub fn append_output(path: &Path, name: &str, value: &str) -> io::Result<()> {
    let record = output_record(name, value, &delimiter())?;
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(record.as_bytes())
}

fn delimiter() -> String {
    format!("ghadelimiter_{}", Uuid::new_v4())
}

fn output_record(name: &str, value: &str, delimiter: &str) -> io::Result<String> {
    if name.contains(delimiter) || value.contains(delimiter) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("output '{name}' collides with delimiter {delimiter}"),
        ));
    }
    Ok(format!("{name}<<{delimiter}\n{value}\n{delimiter}\n"))
}
