use crate::config::Settings;
use crate::error::{DevforkError, Result};
use dialoguer::{theme::ColorfulTheme, Input, Password};
use std::fmt;
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    GithubUsername,
    GithubToken,
    ClonePath,
    WebPath,
}

impl Field {
    pub const ALL: [Field; 4] = [
        Field::GithubUsername,
        Field::GithubToken,
        Field::ClonePath,
        Field::WebPath,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Field::GithubUsername => "github.username",
            Field::GithubToken => "github.token",
            Field::ClonePath => "paths.clone",
            Field::WebPath => "paths.web",
        }
    }

    fn question(self) -> &'static str {
        match self {
            Field::GithubUsername => "Enter your GitHub username",
            Field::GithubToken => "Enter your GitHub personal access token",
            Field::ClonePath => "Enter the path for cloning repositories",
            Field::WebPath => "Enter the path for the web modules",
        }
    }
}

/// Any subset of the four required settings, as given by one source.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PartialConfig {
    pub github_username: Option<String>,
    pub github_token: Option<String>,
    pub clone_path: Option<String>,
    pub web_path: Option<String>,
}

impl fmt::Debug for PartialConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartialConfig")
            .field("github_username", &self.github_username)
            .field("github_token", &self.github_token.as_ref().map(|_| "[REDACTED]"))
            .field("clone_path", &self.clone_path)
            .field("web_path", &self.web_path)
            .finish()
    }
}

impl PartialConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            github_username: settings.github.username.clone(),
            github_token: settings.github.token.clone(),
            clone_path: settings.paths.clone.clone(),
            web_path: settings.paths.web.clone(),
        }
    }

    pub fn apply_to(&self, settings: &mut Settings) {
        settings.github.username = self.github_username.clone();
        settings.github.token = self.github_token.clone();
        settings.paths.clone = self.clone_path.clone();
        settings.paths.web = self.web_path.clone();
    }

    /// The value for `field`, ignoring blanks.
    pub fn get(&self, field: Field) -> Option<&str> {
        self.raw(field).filter(|v| !v.trim().is_empty())
    }

    fn raw(&self, field: Field) -> Option<&str> {
        match field {
            Field::GithubUsername => self.github_username.as_deref(),
            Field::GithubToken => self.github_token.as_deref(),
            Field::ClonePath => self.clone_path.as_deref(),
            Field::WebPath => self.web_path.as_deref(),
        }
    }

    fn set(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::GithubUsername => &mut self.github_username,
            Field::GithubToken => &mut self.github_token,
            Field::ClonePath => &mut self.clone_path,
            Field::WebPath => &mut self.web_path,
        };
        *slot = Some(value);
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Secret {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Settings every module run depends on. Built once by [`resolve`], read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveConfig {
    pub github_username: String,
    pub github_token: Secret,
    pub clone_root: PathBuf,
    pub web_root: PathBuf,
}

/// Picks each field from `explicit`, then `persisted`, then `prompt`, in that order.
///
/// `prompt` receives the persisted value as a suggested default. Every resolved
/// value is mirrored into `persisted` so the caller can flush it to disk.
pub fn resolve<P>(
    explicit: &PartialConfig,
    persisted: &mut PartialConfig,
    mut prompt: P,
) -> Result<EffectiveConfig>
where
    P: FnMut(Field, Option<&str>) -> Result<String>,
{
    let mut resolved = PartialConfig::default();
    let mut missing = Vec::new();

    for field in Field::ALL {
        let value = match explicit.get(field).or_else(|| persisted.get(field)) {
            Some(v) => v.to_string(),
            None => {
                tracing::debug!(key = field.key(), "prompting for setting");
                prompt(field, persisted.get(field))?
            }
        };

        if value.trim().is_empty() {
            missing.push(field.key());
        } else {
            resolved.set(field, value);
        }
    }

    if !missing.is_empty() {
        return Err(DevforkError::ConfigIncomplete { missing });
    }

    for field in Field::ALL {
        if let Some(v) = resolved.get(field) {
            persisted.set(field, v.to_string());
        }
    }

    let take = |field: Field| resolved.get(field).map(str::to_string).unwrap_or_default();
    Ok(EffectiveConfig {
        github_username: take(Field::GithubUsername),
        github_token: Secret(take(Field::GithubToken)),
        clone_root: PathBuf::from(take(Field::ClonePath)),
        web_root: PathBuf::from(take(Field::WebPath)),
    })
}

/// Terminal prompt used outside of tests. Fails when stdin is closed or not a TTY.
pub fn interactive_prompt(field: Field, suggested: Option<&str>) -> Result<String> {
    let theme = ColorfulTheme::default();

    if field == Field::GithubToken {
        let value = Password::with_theme(&theme)
            .with_prompt(field.question())
            .allow_empty_password(true)
            .interact()?;
        return Ok(value);
    }

    let mut input = Input::<String>::with_theme(&theme)
        .with_prompt(field.question())
        .allow_empty(true);
    if let Some(default) = suggested {
        input = input.default(default.to_string());
    }
    Ok(input.interact_text()?)
}
