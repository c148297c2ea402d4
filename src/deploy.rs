use crate::error::{DevforkError, Result};
use crate::pipeline::check_module_name;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;

/// External step that registers a published module with the host application.
pub trait Installer {
    fn install(&self, module: &str) -> Result<()>;
}

/// Runs a fixed argv with the module name appended, e.g. `fwconsole ma install <module>`.
pub struct CommandInstaller {
    argv: Vec<String>,
}

impl CommandInstaller {
    pub fn new(argv: Vec<String>) -> Self {
        Self { argv }
    }
}

impl Installer for CommandInstaller {
    fn install(&self, module: &str) -> Result<()> {
        let fail = |cause: String| DevforkError::InstallFailed {
            module: module.to_string(),
            cause,
        };

        let (program, args) = self
            .argv
            .split_first()
            .ok_or_else(|| fail("no installer command configured".to_string()))?;

        let output = Command::new(program)
            .args(args)
            .arg(module)
            .output()
            .map_err(|e| fail(format!("{program}: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(fail(format!("{program} exited with {}: {}", output.status, stderr.trim())));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallStatus {
    Installed,
    Skipped,
    Failed(String),
}

pub struct Deployer<'a> {
    installer: &'a dyn Installer,
}

impl<'a> Deployer<'a> {
    pub fn new(installer: &'a dyn Installer) -> Self {
        Self { installer }
    }

    /// Points `{web_root}/{module}` at `source`, replacing whatever was there.
    ///
    /// Link failures abort with `PublishFailed`. Installer failures are reported in
    /// the returned status and leave the new link in place.
    pub fn publish(
        &self,
        module: &str,
        source: &Path,
        web_root: &Path,
        install: bool,
    ) -> Result<InstallStatus> {
        check_module_name(module).map_err(|cause| DevforkError::PublishFailed {
            path: web_root.to_path_buf(),
            cause,
        })?;

        let link = web_root.join(module);
        let fail = |step: &str, e: std::io::Error| DevforkError::PublishFailed {
            path: link.clone(),
            cause: format!("{step}: {e}"),
        };

        remove_entry(&link).map_err(|e| fail("remove existing entry", e))?;
        std::os::unix::fs::symlink(source, &link).map_err(|e| fail("create symlink", e))?;
        tracing::info!(%module, link = %link.display(), target = %source.display(), "published");

        if !install {
            return Ok(InstallStatus::Skipped);
        }

        match self.installer.install(module) {
            Ok(()) => {
                tracing::info!(%module, "installed");
                Ok(InstallStatus::Installed)
            }
            Err(e) => {
                tracing::warn!(%module, "install failed: {e}");
                Ok(InstallStatus::Failed(e.to_string()))
            }
        }
    }
}

/// Removes a file, symlink or directory tree at `path`. Absent is fine.
fn remove_entry(path: &Path) -> std::io::Result<()> {
    match path.symlink_metadata() {
        Ok(meta) if meta.is_dir() => std::fs::remove_dir_all(path),
        Ok(_) => std::fs::remove_file(path),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
