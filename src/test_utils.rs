#![cfg(test)]

use crate::deploy::Installer;
use crate::error::{DevforkError, Result};
use crate::git::repo::VersionControl;
use crate::github::client::ForkApi;
use crate::github::types::ForkResult;
use crate::ownership::Ownership;
use crate::resolve::EffectiveConfig;
use std::cell::RefCell;
use std::path::{Path, PathBuf};

pub fn effective_config(root: &Path) -> EffectiveConfig {
    let web_root = root.join("web");
    std::fs::create_dir_all(&web_root).unwrap();
    EffectiveConfig {
        github_username: "jdoe".to_string(),
        github_token: "ghp_test".to_string().into(),
        clone_root: root.join("clones"),
        web_root,
    }
}

/// Builds a repository at `{base}/upstream` with one commit on HEAD and on `branch`.
pub fn make_upstream_repo(base: &Path, branch: &str) -> PathBuf {
    let path = base.join("upstream");
    let repo = git2::Repository::init(&path).unwrap();
    std::fs::write(path.join("module.xml"), "<module><rawname>voicemail</rawname></module>").unwrap();

    let mut index = repo.index().unwrap();
    index.add_path(Path::new("module.xml")).unwrap();
    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
    let sig = git2::Signature::now("test", "test@example.com").unwrap();
    let commit_id = repo
        .commit(Some("HEAD"), &sig, &sig, "initial", &tree, &[])
        .unwrap();
    let commit = repo.find_commit(commit_id).unwrap();
    repo.branch(branch, &commit, false).unwrap();
    path
}

pub struct FakeForker {
    namespace: String,
    failing: Vec<String>,
    calls: RefCell<Vec<String>>,
}

impl FakeForker {
    pub fn new(namespace: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            failing: Vec::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn failing_on(mut self, repo: &str) -> Self {
        self.failing.push(repo.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl ForkApi for FakeForker {
    async fn fork(&self, upstream_owner: &str, repo: &str) -> Result<ForkResult> {
        let upstream = format!("{upstream_owner}/{repo}");
        self.calls.borrow_mut().push(upstream.clone());
        if self.failing.iter().any(|r| r == repo) {
            return Err(DevforkError::ForkFailed {
                repo: upstream,
                cause: "Not Found".to_string(),
            });
        }
        Ok(ForkResult::from_full_name(format!("{}/{repo}", self.namespace)))
    }
}

#[derive(Default)]
pub struct FakeVcs {
    fail: bool,
    calls: RefCell<Vec<(String, String, PathBuf)>>,
}

impl FakeVcs {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<(String, String, PathBuf)> {
        self.calls.borrow().clone()
    }
}

impl VersionControl for FakeVcs {
    fn clone_branch(&self, remote: &str, branch: &str, into: &Path) -> Result<()> {
        self.calls
            .borrow_mut()
            .push((remote.to_string(), branch.to_string(), into.to_path_buf()));
        if self.fail {
            return Err(DevforkError::CloneFailed {
                path: into.to_path_buf(),
                cause: "remote branch not found".to_string(),
            });
        }
        std::fs::write(into.join("module.xml"), branch)?;
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingOwnership {
    fail: bool,
    paths: RefCell<Vec<PathBuf>>,
}

impl RecordingOwnership {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.paths.borrow().clone()
    }
}

impl Ownership for RecordingOwnership {
    fn assign(&self, path: &Path) -> Result<()> {
        if self.fail {
            return Err(DevforkError::CloneFailed {
                path: path.to_path_buf(),
                cause: "chown: Operation not permitted".to_string(),
            });
        }
        self.paths.borrow_mut().push(path.to_path_buf());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeInstaller {
    fail: bool,
    installed: RefCell<Vec<String>>,
}

impl FakeInstaller {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn installed(&self) -> Vec<String> {
        self.installed.borrow().clone()
    }
}

impl Installer for FakeInstaller {
    fn install(&self, module: &str) -> Result<()> {
        if self.fail {
            return Err(DevforkError::InstallFailed {
                module: module.to_string(),
                cause: "exit status: 1".to_string(),
            });
        }
        self.installed.borrow_mut().push(module.to_string());
        Ok(())
    }
}
