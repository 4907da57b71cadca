//! Config file parsing for the layer beneath the command line.
//!
//! The format is one `key=value` per line. Blank lines and `#` comments are
//! skipped, and keys are written without the leading dash used on the
//! command line (`noX=1` negates `X` just like `-noX=1`).

use crate::tokenizer::{dashed_name, ParsedOption};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while reading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: expected key=value, got '{content}'")]
    MalformedLine { line: usize, content: String },

    #[error("line {0}: empty key")]
    EmptyKey(usize),
}

/// Parse config file text into options, in file order.
pub fn parse_config_str(text: &str) -> Result<Vec<ParsedOption>, ConfigError> {
    let mut options = Vec::new();

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (key, value) = line.split_once('=').ok_or_else(|| ConfigError::MalformedLine {
            line: line_no,
            content: line.to_string(),
        })?;

        let key = key.trim();
        if key.is_empty() || key.chars().all(|c| c == '-') {
            return Err(ConfigError::EmptyKey(line_no));
        }

        options.push(ParsedOption {
            name: dashed_name(key),
            value: Some(value.trim().to_string()),
        });
    }

    Ok(options)
}

/// Read and parse a config file from disk.
pub fn read_config_file(path: &Path) -> Result<Vec<ParsedOption>, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let options = parse_config_str(&text)?;
    debug!(path = %path.display(), entries = options.len(), "read config file");
    Ok(options)
}
