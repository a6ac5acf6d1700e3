use std::collections::BTreeMap;

use ssm_exec::config::Options;
use ssm_exec::store::{ParameterStore, RawParameter};
use ssm_exec::{SsmExecError, environment, resolve};

/// In-memory stand-in for the parameter store, mimicking its path and batch
/// lookup semantics.
struct MemoryStore {
    params: Vec<RawParameter>,
}

impl MemoryStore {
    fn new(entries: &[(&str, &str)]) -> Self {
        Self {
            params: entries
                .iter()
                .map(|(name, value)| RawParameter {
                    name: name.to_string(),
                    value: value.to_string(),
                })
                .collect(),
        }
    }
}

impl ParameterStore for MemoryStore {
    fn fetch_by_path(&self, path: &str, recursive: bool) -> ssm_exec::Result<Vec<RawParameter>> {
        Ok(self
            .params
            .iter()
            .filter(|p| {
                let Some(rest) = p.name.strip_prefix(path) else {
                    return false;
                };
                let rest = rest.strip_prefix('/').unwrap_or(rest);
                recursive || !rest.contains('/')
            })
            .cloned()
            .collect())
    }

    fn fetch_by_names(&self, names: &[String]) -> ssm_exec::Result<Vec<RawParameter>> {
        Ok(self
            .params
            .iter()
            .filter(|p| names.contains(&p.name))
            .cloned()
            .collect())
    }
}

/// Store whose every request fails, for error-propagation tests.
struct FailingStore;

impl ParameterStore for FailingStore {
    fn fetch_by_path(&self, _path: &str, _recursive: bool) -> ssm_exec::Result<Vec<RawParameter>> {
        Err(SsmExecError::Store("connection refused".to_string()))
    }

    fn fetch_by_names(&self, _names: &[String]) -> ssm_exec::Result<Vec<RawParameter>> {
        Err(SsmExecError::Store("connection refused".to_string()))
    }
}

fn path_options(path: &str) -> Options {
    Options {
        path: path.to_string(),
        ..Options::default()
    }
}

#[test]
fn path_mode_resolves_the_whole_subtree() {
    let store = MemoryStore::new(&[
        ("/app/db/password", "s3cr3t"),
        ("/app/db/user", "admin"),
        ("/other/key", "ignored"),
    ]);

    let resolved = resolve(&path_options("/app"), &store).unwrap();

    let expected: BTreeMap<String, String> = [
        ("DB_PASSWORD".to_string(), "s3cr3t".to_string()),
        ("DB_USER".to_string(), "admin".to_string()),
    ]
    .into();
    assert_eq!(resolved, expected);
}

#[test]
fn path_mode_without_recursion_skips_nested_parameters() {
    let store = MemoryStore::new(&[("/app/flat", "kept"), ("/app/db/password", "nested")]);

    let options = Options {
        no_recursive: true,
        ..path_options("/app")
    };
    let resolved = resolve(&options, &store).unwrap();

    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved["FLAT"], "kept");
}

#[test]
fn path_mode_honors_replacements_prefix_and_case_flags() {
    let store = MemoryStore::new(&[("/app/db/password", "s3cr3t")]);

    let options = Options {
        no_omit_path_prefix: true,
        no_uppercase: true,
        replace_map: vec![("db".to_string(), "database".to_string())],
        ..path_options("/app")
    };
    let resolved = resolve(&options, &store).unwrap();

    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved["_app_database_password"], "s3cr3t");
}

#[test]
fn explicit_mode_binds_only_the_requested_names() {
    let store = MemoryStore::new(&[
        ("/app/db/password", "s3cr3t"),
        ("/app/db/user", "admin"),
    ]);

    let options = Options {
        secrets: vec![("DB_PASS".to_string(), "/app/db/password".to_string())],
        ..Options::default()
    };
    let resolved = resolve(&options, &store).unwrap();

    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved["DB_PASS"], "s3cr3t");
}

#[test]
fn explicit_mode_binds_two_env_names_to_one_parameter() {
    let store = MemoryStore::new(&[("/app/db/password", "s3cr3t")]);

    let options = Options {
        secrets: vec![
            ("DB_PASS".to_string(), "/app/db/password".to_string()),
            ("PGPASSWORD".to_string(), "/app/db/password".to_string()),
        ],
        ..Options::default()
    };
    let resolved = resolve(&options, &store).unwrap();

    assert_eq!(resolved.len(), 2);
    assert_eq!(resolved["DB_PASS"], "s3cr3t");
    assert_eq!(resolved["PGPASSWORD"], "s3cr3t");
}

#[test]
fn explicit_mode_fails_on_a_name_the_store_does_not_have() {
    let store = MemoryStore::new(&[("/app/db/password", "s3cr3t")]);

    let options = Options {
        secrets: vec![
            ("DB_PASS".to_string(), "/app/db/password".to_string()),
            ("MISSING".to_string(), "/app/absent".to_string()),
        ],
        ..Options::default()
    };

    match resolve(&options, &store) {
        Err(SsmExecError::MissingParameter(names)) => assert_eq!(names, "/app/absent"),
        other => panic!("expected MissingParameter, got {other:?}"),
    }
}

#[test]
fn store_failures_propagate() {
    let err = resolve(&path_options("/app"), &FailingStore).unwrap_err();
    assert!(matches!(err, SsmExecError::Store(_)));
}

#[test]
fn validation_runs_before_any_store_request() {
    // FailingStore would error on contact; a configuration mistake must win.
    let err = resolve(&Options::default(), &FailingStore).unwrap_err();
    assert!(matches!(err, SsmExecError::MissingMode));
}

#[test]
fn resolved_values_flow_into_the_final_environment() {
    let store = MemoryStore::new(&[("/app/db/password", "s3cr3t")]);
    let resolved = resolve(&path_options("/app"), &store).unwrap();

    let base = vec![("PATH".to_string(), "/usr/bin".to_string())];
    let env = environment::build(&base, &resolved);

    assert_eq!(env, vec!["PATH=/usr/bin", "DB_PASSWORD=s3cr3t"]);
}
