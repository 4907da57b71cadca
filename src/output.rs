//! Rendering a resolved store as shell exports or JSON.

use crate::store::ParameterStore;
use anyhow::Result;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;
use tracing::warn;

/// Default prefix for exported variable names.
pub const DEFAULT_PREFIX: &str = "ARGMAP_";

/// Escape a string for safe use in a shell double-quoted context.
///
/// Backslash-escapes `$`, `` ` ``, `\`, `"` and `!`, and writes newline,
/// carriage return and tab as `\n`, `\r` and `\t`.
fn escape_shell_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '$' => escaped.push_str("\\$"),
            '`' => escaped.push_str("\\`"),
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '!' => escaped.push_str("\\!"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Convert an option name to a shell variable name.
///
/// Drops leading dashes, uppercases, and maps any other character that is
/// not valid in a variable name to `_`.
fn to_shell_var_name(name: &str) -> String {
    name.trim_start_matches('-')
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Whether `name` can be assigned with `export name=...`.
fn is_valid_shell_var(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Generate the export statements as a string, one per option name.
///
/// Each variable holds the last value recorded for its option. Names are
/// visited in sorted order; when two names map to the same variable (such as
/// `-MTK` and `-mtk`) only the first is exported. Names that would not make a
/// valid variable (`-` with an empty prefix, a leading digit) are skipped.
/// Both cases log a warning.
pub fn generate_exports_string(store: &ParameterStore, prefix: &str) -> String {
    let mut output = String::new();
    let mut exported: HashSet<String> = HashSet::new();

    for name in store.names() {
        let var_name = format!("{}{}", prefix, to_shell_var_name(name));
        if !is_valid_shell_var(&var_name) {
            warn!(option = name, variable = %var_name, "skipping option: not a valid shell variable");
            continue;
        }
        if !exported.insert(var_name.clone()) {
            warn!(option = name, variable = %var_name, "skipping option: variable already exported");
            continue;
        }

        let value = store.get_string(name, "");
        let escaped_value = escape_shell_value(&value);
        output.push_str(&format!("export {}=\"{}\"\n", var_name, escaped_value));
    }

    output
}

/// Write the export statements to a temporary file and return its path.
///
/// The file is kept on disk so a script can `source` it.
pub fn generate_exports(store: &ParameterStore, prefix: &str) -> Result<PathBuf> {
    let mut file = NamedTempFile::new()?;
    file.write_all(generate_exports_string(store, prefix).as_bytes())?;
    let path = file.into_temp_path().keep()?;
    Ok(path)
}

#[derive(Debug, Serialize)]
struct Dump<'a> {
    options: BTreeMap<&'a str, Vec<&'a str>>,
    positionals: &'a [String],
}

/// Render every recorded value and positional as pretty JSON.
pub fn to_json(store: &ParameterStore) -> Result<String> {
    let dump = Dump {
        options: store.names().map(|name| (name, store.get_all(name))).collect(),
        positionals: store.positionals(),
    };
    Ok(serde_json::to_string_pretty(&dump)?)
}
