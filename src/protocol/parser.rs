//! Protocol line parser
//!
//! Fields are separated by TAB so that empty values survive.

use super::commands::Command;

fn field(value: Option<&str>) -> Option<String> {
    value.map(str::to_string)
}

/// Parses a raw line received from a client into a `Command`.
///
/// Returns `UNKNOWN` for unrecognised verbs and for `CHECK` without a path.
pub fn parse_command(raw: &str) -> Command {
    let line = raw.trim_end_matches(['\r', '\n']);
    let mut parts = line.split('\t');
    let verb = parts.next().unwrap_or("").trim().to_ascii_uppercase();

    match verb.as_str() {
        "LOGIN" => Command::LOGIN {
            username: field(parts.next()),
            password: field(parts.next()),
        },
        "CHECK" => match parts.next().map(str::trim) {
            Some(path) if !path.is_empty() => Command::CHECK {
                path: path.to_string(),
                token: parts
                    .next()
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string),
            },
            _ => Command::UNKNOWN,
        },
        "FORM" => Command::FORM,
        "QUIT" => Command::QUIT,
        _ => Command::UNKNOWN,
    }
}
