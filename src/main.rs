use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing_subscriber::EnvFilter;

use ssm_exec::SsmExecError;
use ssm_exec::config::Options;
use ssm_exec::store::SsmStore;

/// Command-line interface for ssm-exec.
///
/// Fetches parameters from AWS SSM Parameter Store, turns them into
/// environment variables and replaces this process with the target command.
#[derive(Parser)]
#[command(name = "ssm-exec")]
#[command(version)]
#[command(about = "Exec a command with its environment built from AWS SSM Parameter Store")]
struct Cli {
    /// Parameter path prefix to fetch; conflicts with --secret
    #[arg(long, value_name = "PATH")]
    path: Option<String>,

    /// Fetch only direct children of the path, not the full subtree
    #[arg(long)]
    no_recursive: bool,

    /// Keep the path prefix in generated keys instead of stripping it
    #[arg(long)]
    no_omit_path_prefix: bool,

    /// Preserve original case instead of upper-casing generated keys
    #[arg(long)]
    no_uppercase: bool,

    /// Start from an empty environment instead of inheriting the current one
    #[arg(long)]
    with_clean_env: bool,

    /// Substring replacement applied to generated keys (repeatable)
    #[arg(long, value_name = "OLD:NEW", value_parser = parse_replacement)]
    replace_map: Vec<(String, String)>,

    /// AWS region override
    #[arg(long, value_name = "REGION")]
    region: Option<String>,

    /// Environment variable NAME receives the value fetched from parameter VALUE_FROM (repeatable); conflicts with --path
    #[arg(short = 's', long = "secret", value_name = "NAME:VALUE_FROM", value_parser = parse_secret)]
    secrets: Vec<(String, String)>,

    /// Target command and its arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    command: Vec<String>,
}

fn parse_replacement(raw: &str) -> std::result::Result<(String, String), SsmExecError> {
    match raw.split_once(':') {
        Some((old, new)) if !old.is_empty() => Ok((old.to_string(), new.to_string())),
        _ => Err(SsmExecError::InvalidReplacement(raw.to_string())),
    }
}

fn parse_secret(raw: &str) -> std::result::Result<(String, String), SsmExecError> {
    match raw.split_once(':') {
        Some((name, source)) if !name.is_empty() && !source.is_empty() => {
            Ok((name.to_string(), source.to_string()))
        }
        _ => Err(SsmExecError::InvalidSecretMapping(raw.to_string())),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let options = Options {
        path: cli.path.unwrap_or_default(),
        secrets: cli.secrets,
        no_recursive: cli.no_recursive,
        no_omit_path_prefix: cli.no_omit_path_prefix,
        no_uppercase: cli.no_uppercase,
        clean_env: cli.with_clean_env,
        replace_map: cli.replace_map,
        region: cli.region,
    };

    // Reject bad option combinations before any credentials are resolved or
    // network requests go out.
    options.mode().wrap_err("Invalid options")?;

    let store = SsmStore::new(options.region.clone())
        .wrap_err("Failed to initialize the parameter store client")?;

    match ssm_exec::run(&options, &store, &cli.command).wrap_err("Failed to run command")? {}
}
