#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForkResult {
    /// `owner/repo` of the fork.
    pub full_name: String,
    pub clone_url: String,
}

impl ForkResult {
    pub fn from_full_name(full_name: impl Into<String>) -> Self {
        let full_name = full_name.into();
        let clone_url = ssh_remote(&full_name);
        Self {
            full_name,
            clone_url,
        }
    }
}

pub const GITHUB_SSH_HOST: &str = "github.com";

pub fn ssh_remote(full_name: &str) -> String {
    format!("git@{GITHUB_SSH_HOST}:{full_name}.git")
}
