use crate::transform::TransformRules;
use crate::{Result, SsmExecError};

/// Everything the tool needs for one invocation, parsed once by the entry
/// point and passed by reference into the core. Field meanings follow the
/// CLI flags one to one.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Parameter path prefix; selects path mode when non-empty.
    pub path: String,
    /// Environment-variable name to parameter name, in the order given;
    /// selects explicit-name mode when non-empty.
    pub secrets: Vec<(String, String)>,
    pub no_recursive: bool,
    pub no_omit_path_prefix: bool,
    pub no_uppercase: bool,
    pub clean_env: bool,
    pub replace_map: Vec<(String, String)>,
    pub region: Option<String>,
}

/// How parameters are retrieved and named. Exactly one variant applies per
/// invocation.
#[derive(Debug, Clone)]
pub enum RetrievalMode {
    ByPath {
        path: String,
        recursive: bool,
        rules: TransformRules,
    },
    ByNames {
        mapping: Vec<(String, String)>,
    },
}

impl Options {
    /// Validate the option combination and resolve the retrieval mode.
    ///
    /// Pure gate with no side effects; callers run it before any network
    /// access so user mistakes never cost a store request.
    pub fn mode(&self) -> Result<RetrievalMode> {
        if self.path.is_empty() && self.secrets.is_empty() {
            return Err(SsmExecError::MissingMode);
        }
        if !self.path.is_empty() && !self.secrets.is_empty() {
            return Err(SsmExecError::ConflictingModes);
        }

        let path_only_flags = self.no_recursive
            || self.no_omit_path_prefix
            || self.no_uppercase
            || !self.replace_map.is_empty();
        if !self.secrets.is_empty() && path_only_flags {
            return Err(SsmExecError::IncompatibleFlags);
        }

        // An empty OLD substring would expand at every position of the key.
        if let Some((old, new)) = self.replace_map.iter().find(|(old, _)| old.is_empty()) {
            return Err(SsmExecError::InvalidReplacement(format!("{old}:{new}")));
        }

        if self.secrets.is_empty() {
            Ok(RetrievalMode::ByPath {
                path: self.path.clone(),
                recursive: !self.no_recursive,
                rules: TransformRules {
                    strip_prefix: !self.no_omit_path_prefix,
                    path_prefix: self.path.clone(),
                    replacements: self.replace_map.clone(),
                    uppercase: !self.no_uppercase,
                },
            })
        } else {
            Ok(RetrievalMode::ByNames {
                mapping: self.secrets.clone(),
            })
        }
    }
}
