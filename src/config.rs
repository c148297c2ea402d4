use crate::error::{DevforkError, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Clone, Serialize, Deserialize)]
pub struct GithubSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Fork into this organization instead of the token owner's account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default = "default_upstream")]
    pub upstream: String,
}

impl fmt::Debug for GithubSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GithubSettings")
            .field("username", &self.username)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("organization", &self.organization)
            .field("upstream", &self.upstream)
            .finish()
    }
}

impl Default for GithubSettings {
    fn default() -> Self {
        Self {
            username: None,
            token: None,
            organization: None,
            upstream: default_upstream(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploySettings {
    /// System account that owns fresh checkouts so the web server can read them.
    #[serde(default = "default_service_account")]
    pub service_account: String,
    /// Installer argv; the module name is appended as the last argument.
    #[serde(default = "default_installer")]
    pub installer: Vec<String>,
}

impl Default for DeploySettings {
    fn default() -> Self {
        Self {
            service_account: default_service_account(),
            installer: default_installer(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub github: GithubSettings,
    #[serde(default)]
    pub paths: PathSettings,
    #[serde(default)]
    pub deploy: DeploySettings,
    /// Set when loading fell back to defaults; saving would clobber the user's file.
    #[serde(skip)]
    fell_back: bool,
}

fn default_upstream() -> String {
    "FreePBX".to_string()
}

fn default_service_account() -> String {
    "asterisk".to_string()
}

fn default_installer() -> Vec<String> {
    vec!["fwconsole".to_string(), "ma".to_string(), "install".to_string()]
}

impl Settings {
    pub fn load(file: &Path) -> Self {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()));

        if file.exists() {
            figment = figment.merge(Toml::file(file));
        }

        figment = figment.merge(Env::prefixed("DEVFORK_").split("__")).merge(
            Env::raw()
                .only(&["GITHUB_TOKEN"])
                .map(|_| "github.token".into()),
        );

        match figment.extract() {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(path = %file.display(), "settings parse error, using defaults: {e}");
                Settings {
                    fell_back: true,
                    ..Settings::default()
                }
            }
        }
    }

    pub fn save(&self, file: &Path) -> Result<()> {
        if self.fell_back {
            return Err(DevforkError::Settings(format!(
                "{} did not parse; fix it before saving over it",
                file.display()
            )));
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| DevforkError::Settings(e.to_string()))?;
        if let Some(parent) = file.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut out = options.open(file)?;
        out.write_all(content.as_bytes())?;
        tracing::debug!(path = %file.display(), "settings saved");
        Ok(())
    }
}

pub fn default_settings_path() -> PathBuf {
    config_dir().join("devfork").join("config.toml")
}

pub fn config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(".config"))
        })
        .unwrap_or_else(|| PathBuf::from("."))
}
