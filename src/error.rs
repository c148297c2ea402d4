use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DevforkError {
    #[error("configuration incomplete: no value for {}", .missing.join(", "))]
    ConfigIncomplete { missing: Vec<&'static str> },

    #[error("invalid module name: {0}")]
    InvalidModule(String),

    #[error("failed to fork {repo}: {cause}")]
    ForkFailed { repo: String, cause: String },

    #[error("failed to clone into {}: {cause}", .path.display())]
    CloneFailed { path: PathBuf, cause: String },

    #[error("failed to publish {}: {cause}", .path.display())]
    PublishFailed { path: PathBuf, cause: String },

    #[error("installer failed for {module}: {cause}")]
    InstallFailed { module: String, cause: String },

    #[error("github error: {0}")]
    GitHub(String),

    #[error("prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("settings error: {0}")]
    Settings(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl DevforkError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConfigIncomplete { .. } => "ConfigIncomplete",
            Self::InvalidModule(_) => "InvalidModule",
            Self::ForkFailed { .. } => "ForkFailed",
            Self::CloneFailed { .. } => "CloneFailed",
            Self::PublishFailed { .. } => "PublishFailed",
            Self::InstallFailed { .. } => "InstallFailed",
            Self::GitHub(_) => "GitHub",
            Self::Prompt(_) => "Prompt",
            Self::Settings(_) => "Settings",
            Self::Io(_) => "Io",
        }
    }
}

pub type Result<T> = std::result::Result<T, DevforkError>;
