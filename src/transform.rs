use std::collections::{BTreeMap, BTreeSet};

use crate::store::RawParameter;
use crate::{Result, SsmExecError};

/// Hierarchical delimiter of the parameter store's naming scheme.
pub const SEPARATOR: char = '/';

/// Rules for turning a raw parameter name into an environment-variable key,
/// applied in the fixed order: prefix strip, substring replacements,
/// separator substitution, case normalization.
#[derive(Debug, Clone, Default)]
pub struct TransformRules {
    pub strip_prefix: bool,
    pub path_prefix: String,
    pub replacements: Vec<(String, String)>,
    pub uppercase: bool,
}

/// Map a raw parameter name to its environment-variable key.
///
/// Pure function of the name and the rules. The leading separator is
/// stripped whether or not the prefix itself matched, so `/app/db/password`
/// under prefix `/app` becomes `db/password` and a name outside the prefix
/// still loses its leading slash.
pub fn replace_name(name: &str, rules: &TransformRules) -> String {
    let mut rest = name;
    if rules.strip_prefix {
        rest = rest.strip_prefix(&rules.path_prefix).unwrap_or(rest);
        rest = rest.strip_prefix(SEPARATOR).unwrap_or(rest);
    }

    let mut result = rest.to_string();
    for (old, new) in &rules.replacements {
        // rejected at validation; an empty pattern would expand the key
        if old.is_empty() {
            continue;
        }
        result = result.replace(old.as_str(), new);
    }

    result = result.replace(SEPARATOR, "_");

    if rules.uppercase {
        result = result.to_uppercase();
    }

    result
}

/// Transform every fetched parameter into a key/value entry.
///
/// Parameters are processed in raw-name order, so when two raw names
/// transform to the same key the lexicographically-last raw name wins on
/// every run. A collision is logged with the names involved, never the
/// values.
pub fn build_key_values(
    params: &[RawParameter],
    rules: &TransformRules,
) -> BTreeMap<String, String> {
    let mut sorted: Vec<&RawParameter> = params.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));

    let mut key_values = BTreeMap::new();
    let mut origins: BTreeMap<String, String> = BTreeMap::new();
    for param in sorted {
        let key = replace_name(&param.name, rules);
        if let Some(dropped) = origins.insert(key.clone(), param.name.clone()) {
            tracing::warn!(
                key = %key,
                dropped = %dropped,
                kept = %param.name,
                "parameter names collide after transformation"
            );
        }
        key_values.insert(key, param.value.clone());
    }
    key_values
}

/// Bind each requested environment-variable name to the value of the
/// parameter it maps to.
///
/// Every requested source must be present in `params`; a fetch that came
/// back short fails rather than producing an incomplete environment.
/// Fetched parameters not named in the mapping are ignored.
pub fn bind_names(
    params: &[RawParameter],
    mapping: &[(String, String)],
) -> Result<BTreeMap<String, String>> {
    let by_name: BTreeMap<&str, &str> = params
        .iter()
        .map(|p| (p.name.as_str(), p.value.as_str()))
        .collect();

    let missing: BTreeSet<&str> = mapping
        .iter()
        .map(|(_, source)| source.as_str())
        .filter(|source| !by_name.contains_key(*source))
        .collect();
    if !missing.is_empty() {
        let missing = missing.into_iter().collect::<Vec<_>>().join(", ");
        return Err(SsmExecError::MissingParameter(missing));
    }

    Ok(mapping
        .iter()
        .map(|(env_name, source)| (env_name.clone(), by_name[source.as_str()].to_string()))
        .collect())
}
