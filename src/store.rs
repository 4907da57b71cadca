//! The parameter store and its typed accessors.

use crate::coerce::{interpret_bool, negated_name, parse_or_zero};
use crate::config::{parse_config_str, read_config_file, ConfigError};
use crate::tokenizer::{tokenize, tokenize_env, tokenize_os, ParsedOption, Tokenized};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::Path;
use tracing::debug;

/// Values recorded per option name from one source.
///
/// Every key maps to a non-empty list; a bare flag records `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Layer {
    values: BTreeMap<String, Vec<String>>,
}

impl Layer {
    fn from_options<I>(options: I) -> Self
    where
        I: IntoIterator<Item = ParsedOption>,
    {
        let mut layer = Layer::default();
        for option in options {
            let value = option.value.unwrap_or_default();
            layer.values.entry(option.name).or_default().push(value);
        }
        layer
    }

    fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    fn last(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .and_then(|values| values.last())
            .map(String::as_str)
    }

    fn all(&self, name: &str) -> &[String] {
        self.values.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// A positive entry always wins over its negated counterpart.
    fn resolve_bool(&self, name: &str, negated: &str) -> Option<bool> {
        if let Some(value) = self.last(name) {
            return Some(interpret_bool(value));
        }
        self.last(negated).map(|value| !interpret_bool(value))
    }

    fn len(&self) -> usize {
        self.values.len()
    }
}

/// Options parsed from a command line, optionally backed by a config file.
///
/// Built once and read many times. The command line always answers first;
/// config file entries only fill in names the command line says nothing
/// about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterStore {
    command_line: Layer,
    config_file: Layer,
    positionals: Vec<String>,
}

impl ParameterStore {
    /// Build a store from arguments that exclude the program name.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_tokens(tokenize(args))
    }

    /// Build a store from a full argument vector whose first element is the
    /// program name.
    pub fn from_argv<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_args(argv.into_iter().skip(1))
    }

    /// Build a store from OS strings that exclude the program name.
    ///
    /// Arguments that are not valid UTF-8 are converted lossily.
    pub fn from_args_os<I>(args: I) -> Self
    where
        I: IntoIterator<Item = OsString>,
    {
        Self::from_tokens(tokenize_os(args))
    }

    /// Build a store from the current process arguments.
    pub fn from_env() -> Self {
        Self::from_tokens(tokenize_env())
    }

    /// Build a store from already tokenized arguments.
    pub fn from_tokens(tokenized: Tokenized) -> Self {
        let store = Self {
            command_line: Layer::from_options(tokenized.options),
            config_file: Layer::default(),
            positionals: tokenized.positionals,
        };
        debug!(
            options = store.command_line.len(),
            positionals = store.positionals.len(),
            "built parameter store"
        );
        store
    }

    /// Attach config file entries beneath the command line.
    pub fn with_config_options<I>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = ParsedOption>,
    {
        self.config_file = Layer::from_options(options);
        debug!(options = self.config_file.len(), "attached config layer");
        self
    }

    /// Parse config text and attach it beneath the command line.
    pub fn with_config_str(self, text: &str) -> Result<Self, ConfigError> {
        let options = parse_config_str(text)?;
        Ok(self.with_config_options(options))
    }

    /// Read a config file and attach it beneath the command line.
    pub fn with_config_file(self, path: &Path) -> Result<Self, ConfigError> {
        let options = read_config_file(path)?;
        Ok(self.with_config_options(options))
    }

    /// Whether `name` was supplied at all.
    pub fn has_option(&self, name: &str) -> bool {
        self.command_line.contains(name) || self.config_file.contains(name)
    }

    /// Last value recorded for `name`, from whichever layer answers.
    fn last_value(&self, name: &str) -> Option<&str> {
        self.command_line
            .last(name)
            .or_else(|| self.config_file.last(name))
    }

    /// Last value of `name`, or `default` when it was never supplied.
    ///
    /// A bare flag yields `""`, not `default`.
    pub fn get_string(&self, name: &str, default: &str) -> String {
        self.last_value(name).unwrap_or(default).to_string()
    }

    /// Last value of `name` as an integer, or `default` when never supplied.
    ///
    /// A value that is present but not an integer yields `0`.
    pub fn get_int(&self, name: &str, default: i64) -> i64 {
        match self.last_value(name) {
            Some(value) => parse_or_zero(value),
            None => default,
        }
    }

    /// Boolean value of `name`, honoring the `-noX` negation convention.
    ///
    /// An explicit `name` beats its negated form whatever their order. The
    /// command line is consulted for both forms before the config file.
    pub fn get_bool(&self, name: &str, default: bool) -> bool {
        let negated = negated_name(name);
        self.command_line
            .resolve_bool(name, &negated)
            .or_else(|| self.config_file.resolve_bool(name, &negated))
            .unwrap_or(default)
    }

    /// Shorthand for [`get_bool`](Self::get_bool) with a `false` default.
    pub fn get_flag(&self, name: &str) -> bool {
        self.get_bool(name, false)
    }

    /// Every value recorded for `name`: config file values first, then
    /// command line values, each in arrival order.
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.config_file
            .all(name)
            .iter()
            .chain(self.command_line.all(name))
            .map(String::as_str)
            .collect()
    }

    /// Every option name present in either layer, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        let mut names: Vec<&str> = self
            .command_line
            .values
            .keys()
            .chain(self.config_file.values.keys())
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names.dedup();
        names.into_iter()
    }

    /// Non-option tokens in arrival order.
    pub fn positionals(&self) -> &[String] {
        &self.positionals
    }

    /// Whether no options or positionals were recorded.
    pub fn is_empty(&self) -> bool {
        self.command_line.len() == 0 && self.config_file.len() == 0 && self.positionals.is_empty()
    }
}
