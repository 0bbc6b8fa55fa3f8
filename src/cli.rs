//! Command-line console driving page navigation and state edits

use crate::faces::FaceTable;
use crate::state::{keys, State, Value};
use anyhow::Result;
use colored::*;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::sync::Arc;
use tracing::debug;

/// Parsed console command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Next,
    Prev,
    Page(String),
    Face(String),
    Get(String),
    Set(String, Value),
    Keys,
    Dump,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line; `Ok(None)` for blank lines
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match (verb, rest) {
            ("next" | "n", "") => Command::Next,
            ("prev" | "p", "") => Command::Prev,
            ("page", arg) if !arg.is_empty() => Command::Page(arg.to_string()),
            ("face", arg) if !arg.is_empty() => Command::Face(arg.to_uppercase()),
            ("get", arg) if !arg.is_empty() => Command::Get(arg.to_string()),
            ("set", arg) => {
                let (key, value) = arg
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| "usage: set <key> <value>".to_string())?;
                Command::Set(key.to_string(), parse_value(value.trim()))
            }
            ("keys", "") => Command::Keys,
            ("dump", "") => Command::Dump,
            ("help" | "?", "") => Command::Help,
            ("quit" | "exit", "") => Command::Quit,
            _ => return Err(format!("unknown command: {} (try 'help')", line)),
        };
        Ok(Some(command))
    }
}

/// Parse a console value as YAML (int, float, bool, null, list), falling back
/// to plain text
pub fn parse_value(input: &str) -> Value {
    serde_yaml::from_str::<Value>(input).unwrap_or_else(|_| Value::Text(input.to_string()))
}

/// Execute a command against the store, returning the text to print
pub fn execute(command: &Command, state: &State, faces: &FaceTable) -> String {
    match command {
        Command::Next => {
            state.next_page();
            page_line(state)
        }
        Command::Prev => {
            state.prev_page();
            page_line(state)
        }
        Command::Page(target) => match state.goto_page(target) {
            Ok(()) => page_line(state),
            Err(e) => e.to_string().red().to_string(),
        },
        Command::Face(name) => {
            if !faces.contains(name) {
                return format!("unknown face: {}", name).red().to_string();
            }
            state.set_as(&keys::FACE, name.clone());
            format!("face: {}", faces.get(name).unwrap_or_default())
        }
        Command::Get(key) => match state.get(key) {
            Some(value) => format!("{} = {}", key.yellow(), value),
            None => format!("{} is not defined", key).red().to_string(),
        },
        Command::Set(key, value) => {
            if !state.has_element(key) {
                return format!("{} is not defined", key).red().to_string();
            }
            if state.set(key, value.clone()) {
                format!("{} = {}", key.yellow(), value)
            } else {
                format!("{} unchanged", key)
            }
        }
        Command::Keys => state
            .items()
            .into_iter()
            .map(|(key, _)| key)
            .collect::<Vec<_>>()
            .join(" "),
        Command::Dump => {
            let snapshot: serde_json::Map<String, serde_json::Value> = state
                .items()
                .into_iter()
                .map(|(key, element)| {
                    let value = serde_json::to_value(element.value())
                        .unwrap_or(serde_json::Value::Null);
                    (key, value)
                })
                .collect();
            serde_json::to_string_pretty(&snapshot).unwrap_or_default()
        }
        Command::Help => help_text(),
        Command::Quit => String::new(),
    }
}

fn page_line(state: &State) -> String {
    match state.current_page_name() {
        Some(name) => format!("page: {}", name.green()),
        None => "no pages defined".to_string(),
    }
}

fn help_text() -> String {
    [
        "next | n              next page",
        "prev | p              previous page",
        "page <name|index>     jump to a page",
        "face <NAME>           change the face",
        "get <key>             print a value",
        "set <key> <value>     change a value",
        "keys                  list keys",
        "dump                  print all values as JSON",
        "quit                  exit",
    ]
    .join("\n")
}

/// Run the interactive console until `quit`, EOF or Ctrl-C
///
/// Blocking; run it on a dedicated thread.
pub fn run_repl(state: Arc<State>, faces: Arc<FaceTable>) -> Result<()> {
    let mut rl = DefaultEditor::new()?;

    loop {
        let line = match rl.readline("wifu> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };

        match Command::parse(&line) {
            Ok(None) => {}
            Ok(Some(Command::Quit)) => break,
            Ok(Some(command)) => {
                let _ = rl.add_history_entry(line.as_str());
                debug!("Console command: {:?}", command);
                println!("{}", execute(&command, &state, &faces));
            }
            Err(message) => println!("{}", message.red()),
        }
    }

    Ok(())
}
