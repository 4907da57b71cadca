//! argmap - Command-line option store with `-noX` negation.
//!
//! This library turns a raw argument vector into a read-only
//! [`ParameterStore`] that answers string, integer, and boolean queries,
//! optionally backed by a `key=value` config file, and renders the result
//! as shell export statements or JSON.

pub mod coerce;
pub mod config;
pub mod logging;
pub mod output;
pub mod shared;
pub mod store;
pub mod tokenizer;

pub use coerce::{interpret_bool, negated_name, parse_or_zero};
pub use config::{parse_config_str, read_config_file, ConfigError};
pub use output::{generate_exports, generate_exports_string, to_json, DEFAULT_PREFIX};
pub use shared::SharedParameters;
pub use store::ParameterStore;
pub use tokenizer::{tokenize, tokenize_env, ParsedOption, Tokenized};
