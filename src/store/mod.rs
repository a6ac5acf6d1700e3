use std::fmt;

use crate::Result;

pub mod ssm;

pub use ssm::SsmStore;

/// A single decrypted parameter as returned by the store.
#[derive(Clone, PartialEq, Eq)]
pub struct RawParameter {
    pub name: String,
    pub value: String,
}

impl fmt::Debug for RawParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // values are secrets; keep them out of logs and panic output
        f.debug_struct("RawParameter")
            .field("name", &self.name)
            .field("value", &"<redacted>")
            .finish()
    }
}

pub trait ParameterStore {
    /// Every parameter under `path`, decrypted. Pagination is handled
    /// internally; the full set is returned or the call fails. Direct
    /// children only when `recursive` is false.
    fn fetch_by_path(&self, path: &str, recursive: bool) -> Result<Vec<RawParameter>>;

    /// The named parameters, decrypted, in one batch. Names absent from the
    /// store are absent from the result; callers decide whether that is an
    /// error.
    fn fetch_by_names(&self, names: &[String]) -> Result<Vec<RawParameter>>;
}
