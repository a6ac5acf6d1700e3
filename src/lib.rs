use std::collections::BTreeMap;
use std::convert::Infallible;

use thiserror::Error;

pub mod config;
pub mod environment;
pub mod exec;
pub mod store;
pub mod transform;

use config::{Options, RetrievalMode};
use store::ParameterStore;

#[derive(Error, Debug)]
pub enum SsmExecError {
    #[error("either --path or --secret is required")]
    MissingMode,
    #[error("--path and --secret conflict; use one or the other")]
    ConflictingModes,
    #[error(
        "--no-recursive, --no-omit-path-prefix, --no-uppercase and --replace-map require --path"
    )]
    IncompatibleFlags,
    #[error("invalid replacement rule '{0}': expected OLD:NEW with a non-empty OLD")]
    InvalidReplacement(String),
    #[error("invalid secret mapping '{0}': expected NAME:VALUE_FROM")]
    InvalidSecretMapping(String),
    #[error("no command given; usage: ssm-exec [OPTIONS] -- <command> [args...]")]
    MissingCommand,
    #[error("parameter store request failed: {0}")]
    Store(String),
    #[error("missing parameter: {0}")]
    MissingParameter(String),
    #[error("{0} is not found")]
    ExecutableNotFound(String),
    #[error("failed to replace process image: {0}")]
    Exec(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SsmExecError>;

/// Resolve the retrieval mode and produce the environment keys and values
/// for it.
///
/// Validation runs first, so configuration errors surface before any store
/// request is made.
pub fn resolve(
    options: &Options,
    store: &dyn ParameterStore,
) -> Result<BTreeMap<String, String>> {
    match options.mode()? {
        RetrievalMode::ByPath {
            path,
            recursive,
            rules,
        } => {
            let params = store.fetch_by_path(&path, recursive)?;
            Ok(transform::build_key_values(&params, &rules))
        }
        RetrievalMode::ByNames { mapping } => {
            // two env names may share a source; fetch each source once
            let names: Vec<String> = mapping
                .iter()
                .map(|(_, source)| source.clone())
                .collect::<std::collections::BTreeSet<_>>()
                .into_iter()
                .collect();
            let params = store.fetch_by_names(&names)?;
            transform::bind_names(&params, &mapping)
        }
    }
}

/// Fetch, transform, assemble the environment and hand the process over to
/// `command`. Does not return on success.
pub fn run(
    options: &Options,
    store: &dyn ParameterStore,
    command: &[String],
) -> Result<Infallible> {
    if command.is_empty() {
        return Err(SsmExecError::MissingCommand);
    }

    let key_values = resolve(options, store)?;
    let base = environment::inherited(options.clean_env);
    tracing::debug!(
        generated = key_values.len(),
        inherited = base.len(),
        "environment assembled"
    );

    let env = environment::build(&base, &key_values);
    exec::replace_process(command, &env)
}
