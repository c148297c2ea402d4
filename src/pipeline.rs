use crate::deploy::{Deployer, InstallStatus};
use crate::error::{DevforkError, Result};
use crate::git::sync::RepoSync;
use crate::git::types::LocalCheckout;
use crate::github::client::ForkApi;
use crate::github::types::ForkResult;
use crate::resolve::EffectiveConfig;
use std::path::{Component, Path, PathBuf};

pub const DEFAULT_BRANCH: &str = "master";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRequest {
    pub name: String,
    pub branch: String,
}

impl ModuleRequest {
    pub fn new(name: impl Into<String>, branch: impl Into<String>) -> Result<Self> {
        let name = name.into();
        check_module_name(&name).map_err(DevforkError::InvalidModule)?;
        Ok(Self {
            name,
            branch: branch.into(),
        })
    }
}

/// A module name must be exactly one plain path component, so that
/// `{root}/{name}` can never escape or replace `root`.
pub fn check_module_name(name: &str) -> std::result::Result<(), String> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(part)), None) if part == name => Ok(()),
        _ => Err(format!("'{name}' is not a single directory name")),
    }
}

#[derive(Debug)]
pub struct Provisioned {
    pub fork: ForkResult,
    pub checkout: LocalCheckout,
    pub link: PathBuf,
    pub install: InstallStatus,
}

#[derive(Debug)]
pub struct ModuleOutcome {
    pub module: String,
    pub result: Result<Provisioned>,
}

pub struct Pipeline<'a, F: ForkApi> {
    forker: &'a F,
    sync: RepoSync<'a>,
    deployer: Deployer<'a>,
    upstream: String,
    install: bool,
}

impl<'a, F: ForkApi> Pipeline<'a, F> {
    pub fn new(
        forker: &'a F,
        sync: RepoSync<'a>,
        deployer: Deployer<'a>,
        upstream: &str,
        install: bool,
    ) -> Self {
        Self {
            forker,
            sync,
            deployer,
            upstream: upstream.to_string(),
            install,
        }
    }

    /// Provisions each module in order. A failing module never stops the ones after it.
    pub async fn run(&self, modules: &[ModuleRequest], config: &EffectiveConfig) -> Vec<ModuleOutcome> {
        let mut outcomes = Vec::with_capacity(modules.len());
        for request in modules {
            let result = self.provision(request, config).await;
            if let Err(ref e) = result {
                tracing::error!(module = %request.name, kind = e.kind(), "{e}");
            }
            outcomes.push(ModuleOutcome {
                module: request.name.clone(),
                result,
            });
        }
        outcomes
    }

    async fn provision(&self, request: &ModuleRequest, config: &EffectiveConfig) -> Result<Provisioned> {
        let fork = self.forker.fork(&self.upstream, &request.name).await?;

        let checkout = self.sync.ensure_module_clone(
            &fork.clone_url,
            &request.branch,
            &config.clone_root,
            &request.name,
        )?;

        let install = self.deployer.publish(
            &request.name,
            &checkout.path,
            &config.web_root,
            self.install,
        )?;

        Ok(Provisioned {
            fork,
            checkout,
            link: config.web_root.join(&request.name),
            install,
        })
    }
}
