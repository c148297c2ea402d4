use crate::error::{DevforkError, Result};
use crate::git::repo::{checked_out_branch, VersionControl};
use crate::git::types::LocalCheckout;
use crate::ownership::Ownership;
use crate::pipeline::check_module_name;
use std::os::unix::fs::DirBuilderExt;
use std::path::Path;

const CHECKOUT_MODE: u32 = 0o755;

pub struct RepoSync<'a> {
    vcs: &'a dyn VersionControl,
    ownership: &'a dyn Ownership,
}

impl<'a> RepoSync<'a> {
    pub fn new(vcs: &'a dyn VersionControl, ownership: &'a dyn Ownership) -> Self {
        Self { vcs, ownership }
    }

    /// [`ensure_clone`](Self::ensure_clone) into `{clone_root}/{module}`.
    pub fn ensure_module_clone(
        &self,
        remote: &str,
        branch: &str,
        clone_root: &Path,
        module: &str,
    ) -> Result<LocalCheckout> {
        check_module_name(module).map_err(|cause| DevforkError::CloneFailed {
            path: clone_root.to_path_buf(),
            cause,
        })?;
        self.ensure_clone(remote, branch, &clone_root.join(module))
    }

    /// Clones `branch` of `remote` into `target` unless `target` already exists.
    ///
    /// An existing entry is never validated or refreshed. A failed clone leaves the
    /// created directory behind.
    pub fn ensure_clone(&self, remote: &str, branch: &str, target: &Path) -> Result<LocalCheckout> {
        if target.symlink_metadata().is_ok() {
            let current = checked_out_branch(target);
            match current.as_deref() {
                Some(current) if current != branch => tracing::warn!(
                    path = %target.display(),
                    %current,
                    requested = %branch,
                    "existing checkout is on another branch, leaving it alone"
                ),
                _ => tracing::info!(path = %target.display(), "checkout present, skipping clone"),
            }
            return Ok(LocalCheckout {
                path: target.to_path_buf(),
                branch: current.unwrap_or_else(|| branch.to_string()),
                freshly_cloned: false,
            });
        }

        std::fs::DirBuilder::new()
            .recursive(true)
            .mode(CHECKOUT_MODE)
            .create(target)
            .map_err(|e| DevforkError::CloneFailed {
                path: target.to_path_buf(),
                cause: format!("create directory: {e}"),
            })?;

        self.ownership.assign(target)?;

        tracing::info!(%remote, %branch, path = %target.display(), "cloning");
        self.vcs.clone_branch(remote, branch, target)?;

        Ok(LocalCheckout {
            path: target.to_path_buf(),
            branch: branch.to_string(),
            freshly_cloned: true,
        })
    }
}
