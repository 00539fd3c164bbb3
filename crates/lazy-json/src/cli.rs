//! `json-lazy`: read and edit a JSON document from the command line.
//!
//! Core logic for the binary entry point. The document comes from stdin:
//! - `json-lazy get <path>`: print the value at `path`
//! - `json-lazy set <path> <json>`: write `json` at `path`, print the document
//! - `json-lazy del <path>`: remove `path`, print the document
//! - `json-lazy keys <path>`: print the object keys at `path`, one per line
//!
//! `--pretty` re-indents printed documents.

use lazy_json_path::{PathError, SmartPath};
use serde_json::Value;

use crate::{Error, Json};

// ── Errors ────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum CliError {
    Usage(String),
    Path(PathError),
    Document(Error),
    NotFound(String),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(e)    => write!(f, "{e}\n\n{USAGE}"),
            CliError::Path(e)     => write!(f, "{e}"),
            CliError::Document(e) => write!(f, "{e}"),
            CliError::NotFound(p) => write!(f, "Nothing at path: {p}"),
            CliError::Json(e)     => write!(f, "{e}"),
        }
    }
}

impl From<PathError> for CliError {
    fn from(e: PathError) -> Self { CliError::Path(e) }
}

impl From<Error> for CliError {
    fn from(e: Error) -> Self { CliError::Document(e) }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self { CliError::Json(e) }
}

pub const USAGE: &str = "Usage: json-lazy [--pretty] <get|set|del|keys> <path> [json]";

// ── Arguments ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOptions {
    /// Re-indent printed documents.
    pub pretty: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Get { path: SmartPath },
    Set { path: SmartPath, value: String },
    Del { path: SmartPath },
    Keys { path: SmartPath },
}

/// Parse arguments, not including the program name.
pub fn parse_args(args: &[String]) -> Result<(Command, CliOptions), CliError> {
    let mut options = CliOptions::default();
    let mut positional = Vec::new();
    for arg in args {
        match arg.as_str() {
            "--pretty" | "-p" => options.pretty = true,
            _ => positional.push(arg.as_str()),
        }
    }

    let (name, rest) = positional
        .split_first()
        .ok_or_else(|| CliError::Usage("Missing command.".to_string()))?;
    let path = match rest.first() {
        Some(path) => SmartPath::parse(path)?,
        None => return Err(CliError::Usage("Missing path.".to_string())),
    };
    let command = match *name {
        "get" => Command::Get { path },
        "del" => Command::Del { path },
        "keys" => Command::Keys { path },
        "set" => {
            let value = rest
                .get(1)
                .ok_or_else(|| CliError::Usage("Missing JSON value.".to_string()))?;
            Command::Set {
                path,
                value: value.to_string(),
            }
        }
        other => return Err(CliError::Usage(format!("Unknown command: {other}"))),
    };
    Ok((command, options))
}

// ── Run ───────────────────────────────────────────────────────────────────

/// Apply `command` to the document `input` and return what to print.
pub fn run(input: &str, command: &Command, options: &CliOptions) -> Result<String, CliError> {
    let doc = Json::from_text(input);
    match command {
        Command::Get { path } => {
            let value = doc.get_path(path);
            if !value.exists() {
                return Err(CliError::NotFound(path.to_string()));
            }
            render(&value.raw_string(), options)
        }
        Command::Set { path, value } => {
            doc.get_path(path).set_raw(value)?;
            render(&doc.raw_string(), options)
        }
        Command::Del { path } => {
            doc.get_path(path).remove();
            render(&doc.raw_string(), options)
        }
        Command::Keys { path } => Ok(doc.get_path(path).keys().join("\n")),
    }
}

fn render(raw: &str, options: &CliOptions) -> Result<String, CliError> {
    if !options.pretty {
        return Ok(raw.to_string());
    }
    let value: Value = serde_json::from_str(raw)?;
    Ok(serde_json::to_string_pretty(&value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn exec(input: &str, list: &[&str]) -> Result<String, CliError> {
        let (command, options) = parse_args(&args(list))?;
        run(input, &command, &options)
    }

    #[test]
    fn test_parse_args() {
        let (command, options) = parse_args(&args(&["--pretty", "set", "a[0]", "1"])).unwrap();
        assert!(options.pretty);
        assert_eq!(
            command,
            Command::Set {
                path: SmartPath::parse("a[0]").unwrap(),
                value: "1".to_string()
            }
        );
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(matches!(parse_args(&args(&[])), Err(CliError::Usage(_))));
        assert!(matches!(parse_args(&args(&["get"])), Err(CliError::Usage(_))));
        assert!(matches!(parse_args(&args(&["set", "a"])), Err(CliError::Usage(_))));
        assert!(matches!(parse_args(&args(&["pop", "a"])), Err(CliError::Usage(_))));
        assert!(matches!(parse_args(&args(&["get", "a.[0]"])), Err(CliError::Path(_))));
    }

    #[test]
    fn test_get() {
        let doc = r#"{"a":{"b":[1,2.50]}}"#;
        assert_eq!(exec(doc, &["get", "a.b[-1]"]).unwrap(), "2.50");
        assert!(matches!(exec(doc, &["get", "a.c"]), Err(CliError::NotFound(_))));
    }

    #[test]
    fn test_set_and_del() {
        let doc = r#"{"a":1,"b":2}"#;
        assert_eq!(exec(doc, &["set", "c.d", "[true]"]).unwrap(), r#"{"a":1,"b":2,"c":{"d":[true]}}"#);
        assert_eq!(exec(doc, &["del", "a"]).unwrap(), r#"{"b":2}"#);
        assert!(matches!(
            exec(doc, &["set", "a", "nope"]),
            Err(CliError::Document(Error::InvalidJson))
        ));
    }

    #[test]
    fn test_keys() {
        assert_eq!(exec(r#"{"x":{"z":1,"y":2}}"#, &["keys", "x"]).unwrap(), "z\ny");
    }

    #[test]
    fn test_pretty_keeps_order() {
        let out = exec(r#"{"z":1,"a":2}"#, &["-p", "del", "q"]).unwrap();
        assert_eq!(out, "{\n  \"z\": 1,\n  \"a\": 2\n}");
    }
}
