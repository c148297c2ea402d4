use crate::error::{DevforkError, Result};
use crate::github::types::ForkResult;
use octocrab::Octocrab;

/// Remote side of provisioning: ask the code host for a fork of `upstream_owner/repo`.
#[allow(async_fn_in_trait)]
pub trait ForkApi {
    async fn fork(&self, upstream_owner: &str, repo: &str) -> Result<ForkResult>;
}

#[derive(Clone)]
pub struct GitHubClient {
    octo: Octocrab,
    username: String,
    organization: Option<String>,
}

impl GitHubClient {
    pub fn new(username: &str, token: &str, organization: Option<&str>) -> Result<Self> {
        let octo = Octocrab::builder()
            .personal_token(token.to_string())
            .build()
            .map_err(|e| DevforkError::GitHub(e.to_string()))?;

        Ok(Self {
            octo,
            username: username.to_string(),
            organization: organization.filter(|o| !o.is_empty()).map(str::to_string),
        })
    }

    fn namespace(&self) -> &str {
        self.organization.as_deref().unwrap_or(&self.username)
    }
}

impl ForkApi for GitHubClient {
    async fn fork(&self, upstream_owner: &str, repo: &str) -> Result<ForkResult> {
        let upstream = format!("{upstream_owner}/{repo}");
        let repos = self.octo.repos(upstream_owner, repo);
        let mut request = repos.create_fork();
        if let Some(ref org) = self.organization {
            request = request.organization(org.clone());
        }

        let created = request.send().await.map_err(|e| DevforkError::ForkFailed {
            repo: upstream.clone(),
            cause: e.to_string(),
        })?;

        // GitHub always sends full_name; fall back to the namespace we asked for.
        let full_name = created
            .full_name
            .unwrap_or_else(|| format!("{}/{}", self.namespace(), created.name));
        tracing::info!(%upstream, fork = %full_name, "fork ready");

        Ok(ForkResult::from_full_name(full_name))
    }
}
