use std::collections::BTreeMap;
use std::env;

/// The environment the target command starts from: the full inherited
/// environment, or nothing when a clean environment was requested.
pub fn inherited(clean_env: bool) -> Vec<(String, String)> {
    if clean_env {
        Vec::new()
    } else {
        env::vars().collect()
    }
}

/// Assemble the final `KEY=VALUE` entries handed to the process replacer.
///
/// Base entries keep their original relative order and come first; one entry
/// per generated pair follows. A generated key that shadows an inherited one
/// appears twice, and the later entry is the one the target process sees.
pub fn build(base: &[(String, String)], generated: &BTreeMap<String, String>) -> Vec<String> {
    let mut env: Vec<String> = base.iter().map(|(k, v)| format!("{k}={v}")).collect();
    env.extend(generated.iter().map(|(k, v)| format!("{k}={v}")));
    env
}
