use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalCheckout {
    pub path: PathBuf,
    pub branch: String,
    /// False when the directory already existed and the clone was skipped.
    pub freshly_cloned: bool,
}
