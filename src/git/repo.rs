use crate::error::{DevforkError, Result};
use git2::build::RepoBuilder;
use git2::{Cred, CredentialType, FetchOptions, RemoteCallbacks, Repository};
use std::path::Path;

/// Local version control capability: check out one branch of a remote into a directory.
pub trait VersionControl {
    fn clone_branch(&self, remote: &str, branch: &str, into: &Path) -> Result<()>;
}

pub struct Git2Vcs {
    depth: Option<i32>,
}

impl Git2Vcs {
    pub fn shallow() -> Self {
        Self { depth: Some(1) }
    }

    // libgit2's local transport rejects shallow fetches.
    #[cfg(test)]
    pub fn full_history() -> Self {
        Self { depth: None }
    }
}

impl VersionControl for Git2Vcs {
    fn clone_branch(&self, remote: &str, branch: &str, into: &Path) -> Result<()> {
        let mut callbacks = RemoteCallbacks::new();
        callbacks.credentials(|_url, username, allowed| {
            if allowed.contains(CredentialType::SSH_KEY) {
                Cred::ssh_key_from_agent(username.unwrap_or("git"))
            } else {
                Cred::default()
            }
        });

        let mut fetch = FetchOptions::new();
        fetch.remote_callbacks(callbacks);
        if let Some(depth) = self.depth {
            fetch.depth(depth);
        }

        RepoBuilder::new()
            .branch(branch)
            .fetch_options(fetch)
            .clone(remote, into)
            .map_err(|e| DevforkError::CloneFailed {
                path: into.to_path_buf(),
                cause: e.message().to_string(),
            })?;

        tracing::debug!(%remote, %branch, path = %into.display(), "cloned");
        Ok(())
    }
}

/// Branch checked out at `path`, if it holds a repository with a named HEAD.
pub fn checked_out_branch(path: &Path) -> Option<String> {
    let repo = Repository::open(path).ok()?;
    let head = repo.head().ok()?;
    head.shorthand().map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::make_upstream_repo;

    #[test]
    fn clones_requested_branch() {
        let dir = tempfile::tempdir().unwrap();
        let upstream = make_upstream_repo(dir.path(), "release/17.0");
        let target = dir.path().join("checkout");

        Git2Vcs::full_history()
            .clone_branch(upstream.to_str().unwrap(), "release/17.0", &target)
            .unwrap();

        assert_eq!(checked_out_branch(&target).as_deref(), Some("release/17.0"));
        assert!(target.join("module.xml").exists());
    }

    #[test]
    fn missing_branch_is_clone_failed() {
        let dir = tempfile::tempdir().unwrap();
        let upstream = make_upstream_repo(dir.path(), "release/17.0");
        let target = dir.path().join("checkout");

        let err = Git2Vcs::full_history()
            .clone_branch(upstream.to_str().unwrap(), "release/99.0", &target)
            .unwrap_err();
        assert_eq!(err.kind(), "CloneFailed");
    }

    #[test]
    fn checked_out_branch_of_plain_dir_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(checked_out_branch(dir.path()), None);
    }
}
