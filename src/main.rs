//! argmap - Resolve `-name=value` style arguments for shell scripts.

use anyhow::{bail, Context, Result};
use argmap::tokenizer::dashed_name;
use argmap::{generate_exports, logging, to_json, ParameterStore, DEFAULT_PREFIX};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::debug;

/// Resolve `-name=value` style arguments with `-noX` negation.
#[derive(Parser, Debug)]
#[command(name = "argmap", version, about, disable_help_subcommand = true)]
struct Cli {
    /// Increase log verbosity (repeatable, given before the subcommand)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the resolved value of a single option
    // No short flags here, so any `-x` in the name slot is read as the name.
    #[command(disable_help_flag = true)]
    Get {
        /// Option name, with or without its leading dash (e.g. -port or port)
        #[arg(allow_hyphen_values = true)]
        name: String,

        /// Value to print when the option was not supplied
        #[arg(long)]
        default: Option<String>,

        /// How to interpret the option's value
        #[arg(long = "type", value_enum, default_value_t = ValueKind::String)]
        kind: ValueKind,

        #[command(flatten)]
        input: Input,

        /// Print help
        #[arg(long, action = ArgAction::Help)]
        help: Option<bool>,
    },

    /// Write every option as shell export statements and print the file path
    Export {
        /// Environment variable prefix
        #[arg(long, default_value = DEFAULT_PREFIX)]
        prefix: String,

        #[command(flatten)]
        input: Input,
    },

    /// Print every recorded value as JSON
    Dump {
        #[command(flatten)]
        input: Input,
    },
}

/// Where the options come from.
#[derive(Args, Debug)]
struct Input {
    /// Config file with key=value lines, consulted after the arguments
    #[arg(long)]
    conf: Option<PathBuf>,

    /// Arguments to resolve
    #[arg(last = true)]
    args: Vec<OsString>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ValueKind {
    String,
    Int,
    Bool,
}

fn load_store(input: &Input) -> Result<ParameterStore> {
    let store = ParameterStore::from_args_os(input.args.iter().cloned());
    match input.conf {
        Some(ref path) => store
            .with_config_file(path)
            .with_context(|| format!("failed to load config file {}", path.display())),
        None => Ok(store),
    }
}

fn parse_bool_default(value: &str) -> Result<bool> {
    match value {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => bail!("invalid boolean default '{}': expected true, false, 1 or 0", other),
    }
}

/// Resolve one option to the text printed by `argmap get`.
fn resolve(
    store: &ParameterStore,
    name: &str,
    kind: ValueKind,
    default: Option<&str>,
) -> Result<String> {
    let resolved = match kind {
        ValueKind::String => store.get_string(name, default.unwrap_or("")),
        ValueKind::Int => {
            let default = match default {
                Some(d) => d
                    .parse::<i64>()
                    .with_context(|| format!("invalid integer default '{}'", d))?,
                None => 0,
            };
            store.get_int(name, default).to_string()
        }
        ValueKind::Bool => {
            let default = match default {
                Some(d) => parse_bool_default(d)?,
                None => false,
            };
            store.get_bool(name, default).to_string()
        }
    };
    Ok(resolved)
}

/// Run `argmap get`: load the store and resolve `name` in it.
fn run_get(name: &str, kind: ValueKind, default: Option<&str>, input: &Input) -> Result<String> {
    let store = load_store(input)?;
    let name = dashed_name(name);
    debug!(name = %name, kind = ?kind, "resolving option");
    resolve(&store, &name, kind, default)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Get {
            name,
            default,
            kind,
            input,
            ..
        } => {
            let value = run_get(&name, kind, default.as_deref(), &input)?;
            println!("{}", value);
        }
        Commands::Export { prefix, input } => {
            let store = load_store(&input)?;
            let path =
                generate_exports(&store, &prefix).context("failed to generate exports file")?;
            println!("{}", path.display());
        }
        Commands::Dump { input } => {
            let store = load_store(&input)?;
            println!("{}", to_json(&store).context("failed to serialize store")?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_help() {
        // Verify the command can generate help without panicking
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_requires_subcommand() {
        let result = Cli::try_parse_from(["argmap"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_get_parses_dashed_name_and_args() {
        let cli = Cli::try_parse_from([
            "argmap", "get", "-MTK", "--type", "bool", "--", "-noMTK", "-bar=1",
        ])
        .unwrap();

        match cli.command {
            Commands::Get {
                name,
                default,
                kind,
                input,
                ..
            } => {
                assert_eq!(name, "-MTK");
                assert!(default.is_none());
                assert_eq!(kind, ValueKind::Bool);
                assert!(input.conf.is_none());
                assert_eq!(input.args, vec!["-noMTK", "-bar=1"]);
            }
            _ => panic!("Expected Get command"),
        }
    }

    #[test]
    fn test_get_defaults_to_string_kind() {
        let cli = Cli::try_parse_from(["argmap", "get", "-name", "--"]).unwrap();
        match cli.command {
            Commands::Get { kind, .. } => assert_eq!(kind, ValueKind::String),
            _ => panic!("Expected Get command"),
        }
    }

    #[test]
    fn test_export_default_prefix() {
        let cli = Cli::try_parse_from(["argmap", "export", "--", "-a"]).unwrap();
        match cli.command {
            Commands::Export { prefix, input } => {
                assert_eq!(prefix, "ARGMAP_");
                assert_eq!(input.args, vec!["-a"]);
            }
            _ => panic!("Expected Export command"),
        }
    }

    #[test]
    fn test_dump_parses_conf() {
        let cli =
            Cli::try_parse_from(["argmap", "-vv", "dump", "--conf", "app.conf", "--"]).unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Dump { input } => {
                assert_eq!(input.conf, Some(PathBuf::from("app.conf")));
            }
            _ => panic!("Expected Dump command"),
        }
    }

    /// Parse an `argmap get` command line and run it.
    fn get_output(argv: &[&str]) -> String {
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Commands::Get {
                name,
                default,
                kind,
                input,
                ..
            } => run_get(&name, kind, default.as_deref(), &input).unwrap(),
            _ => panic!("Expected Get command"),
        }
    }

    #[test]
    fn test_get_name_that_looks_like_own_flags() {
        assert_eq!(get_output(&["argmap", "get", "-v", "--", "-v=3"]), "3");
        assert_eq!(get_output(&["argmap", "get", "-vv", "--", "-vv=4"]), "4");
        assert_eq!(get_output(&["argmap", "get", "-h", "--", "-h=help"]), "help");
        assert_eq!(get_output(&["argmap", "get", "-V", "--", "--V=5"]), "5");
    }

    #[test]
    fn test_get_name_without_dash() {
        assert_eq!(get_output(&["argmap", "get", "v", "--", "-v=3"]), "3");
        assert_eq!(
            get_output(&["argmap", "get", "MTK", "--type", "bool", "--", "-noMTK"]),
            "false"
        );
    }

    #[test]
    fn test_get_long_help_still_works() {
        let err = Cli::try_parse_from(["argmap", "get", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_verbose_before_subcommand() {
        let cli = Cli::try_parse_from(["argmap", "-v", "get", "-v", "--"]).unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Get { name, .. } => assert_eq!(name, "-v"),
            _ => panic!("Expected Get command"),
        }
    }

    #[test]
    fn test_resolve_string() {
        let store = ParameterStore::from_args(["-MTK=eleven"]);
        assert_eq!(resolve(&store, "-MTK", ValueKind::String, None).unwrap(), "eleven");
        assert_eq!(
            resolve(&store, "-bar", ValueKind::String, Some("dflt")).unwrap(),
            "dflt"
        );
    }

    #[test]
    fn test_resolve_int() {
        let store = ParameterStore::from_args(["-MTK=NaN", "-bar=12"]);
        assert_eq!(resolve(&store, "-MTK", ValueKind::Int, Some("1")).unwrap(), "0");
        assert_eq!(resolve(&store, "-bar", ValueKind::Int, None).unwrap(), "12");
        assert_eq!(resolve(&store, "-baz", ValueKind::Int, Some("11")).unwrap(), "11");
        assert!(resolve(&store, "-baz", ValueKind::Int, Some("eleven")).is_err());
    }

    #[test]
    fn test_resolve_bool() {
        let store = ParameterStore::from_args(["-noMTK"]);
        assert_eq!(resolve(&store, "-MTK", ValueKind::Bool, Some("true")).unwrap(), "false");
        assert_eq!(resolve(&store, "-bar", ValueKind::Bool, Some("1")).unwrap(), "true");
        assert_eq!(resolve(&store, "-bar", ValueKind::Bool, None).unwrap(), "false");
        assert!(resolve(&store, "-bar", ValueKind::Bool, Some("yes")).is_err());
    }

    #[test]
    fn test_load_store_missing_conf_fails() {
        let dir = tempfile::tempdir().unwrap();
        let input = Input {
            conf: Some(dir.path().join("absent.conf")),
            args: vec![],
        };
        assert!(load_store(&input).is_err());
    }
}
