//! Splitting raw argument tokens into option names and values.

use std::ffi::OsString;
use tracing::{debug, trace};

/// A single `-name[=value]` token after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedOption {
    /// Option name including its single leading dash.
    pub name: String,
    /// Text after the first `=`, or `None` for a bare flag.
    pub value: Option<String>,
}

impl ParsedOption {
    /// Value as it is recorded in the store: a bare flag records `""`.
    pub fn recorded_value(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }
}

/// Output of tokenizing an argument vector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokenized {
    /// Option tokens in arrival order.
    pub options: Vec<ParsedOption>,
    /// Tokens that do not start with a dash, in arrival order.
    pub positionals: Vec<String>,
}

/// Split one option token on its first `=` and normalize a `--` prefix.
///
/// The caller guarantees `token` starts with `-`.
pub fn parse_option(token: &str) -> ParsedOption {
    let (name, value) = if let Some(eq_pos) = token.find('=') {
        let (n, v) = token.split_at(eq_pos);
        (n, Some(v[1..].to_string())) // Skip the '='
    } else {
        (token, None)
    };

    ParsedOption {
        name: normalize_name(name).to_string(),
        value,
    }
}

/// Treat `--name` as `-name` by dropping one leading dash.
pub fn normalize_name(name: &str) -> &str {
    if name.starts_with("--") {
        &name[1..]
    } else {
        name
    }
}

/// Give a name its store form: one leading dash, added when missing.
///
/// `port`, `-port` and `--port` all become `-port`.
pub fn dashed_name(name: &str) -> String {
    if name.starts_with('-') {
        normalize_name(name).to_string()
    } else {
        format!("-{}", name)
    }
}

/// Tokenize an argument vector that does not include the program name.
pub fn tokenize<I, S>(args: I) -> Tokenized
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tokenized = Tokenized::default();

    for arg in args {
        let arg = arg.as_ref();
        if arg.starts_with('-') {
            let option = parse_option(arg);
            trace!(token = arg, name = %option.name, value = ?option.value, "option token");
            tokenized.options.push(option);
        } else {
            trace!(token = arg, "positional token");
            tokenized.positionals.push(arg.to_string());
        }
    }

    tokenized
}

/// Tokenize OS strings, replacing invalid UTF-8 with U+FFFD.
pub fn tokenize_os<I>(args: I) -> Tokenized
where
    I: IntoIterator<Item = OsString>,
{
    tokenize(args.into_iter().map(|arg| match arg.into_string() {
        Ok(arg) => arg,
        Err(raw) => {
            let lossy = raw.to_string_lossy().into_owned();
            debug!(token = %lossy, "argument is not valid UTF-8");
            lossy
        }
    }))
}

/// Tokenize the current process arguments, skipping the program name.
pub fn tokenize_env() -> Tokenized {
    tokenize_os(std::env::args_os().skip(1))
}
