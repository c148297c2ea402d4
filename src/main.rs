mod config;
mod deploy;
mod error;
mod git;
mod github;
mod logging;
mod ownership;
mod pipeline;
mod resolve;
#[cfg(test)]
mod test_utils;

use clap::Parser;
use config::Settings;
use deploy::{CommandInstaller, Deployer, InstallStatus};
use git::{repo::Git2Vcs, sync::RepoSync};
use github::client::GitHubClient;
use ownership::ServiceAccount;
use pipeline::{check_module_name, ModuleOutcome, ModuleRequest, Pipeline, DEFAULT_BRANCH};
use resolve::{interactive_prompt, resolve, PartialConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "devfork", about = "Fork, clone and publish FreePBX modules")]
struct Cli {
    #[arg(required = true, value_parser = parse_module_name, help = "The names of the modules to update")]
    modules: Vec<String>,

    #[arg(long, short, default_value = DEFAULT_BRANCH, help = "The branch to check out (e.g. release/17.0)")]
    branch: String,

    #[arg(long, short, help = "Your GitHub username")]
    username: Option<String>,

    #[arg(long, short, help = "Your GitHub personal access token")]
    token: Option<String>,

    #[arg(long, help = "The path for cloning repositories")]
    clone_path: Option<String>,

    #[arg(long, help = "The path for the web modules")]
    web_path: Option<String>,

    #[arg(long, help = "Upstream owner to fork from")]
    upstream: Option<String>,

    #[arg(long, help = "Fork into this organization instead of your account")]
    org: Option<String>,

    #[arg(long, help = "Skip the installer after publishing")]
    no_install: bool,

    #[arg(long, help = "Write the resolved settings back to the settings file")]
    save: bool,

    #[arg(long, help = "Path to the settings file")]
    config: Option<PathBuf>,

    #[arg(long, short, help = "Log debug details")]
    verbose: bool,
}

fn parse_module_name(name: &str) -> std::result::Result<String, String> {
    check_module_name(name)?;
    Ok(name.to_string())
}

impl Cli {
    fn explicit(&self) -> PartialConfig {
        PartialConfig {
            github_username: self.username.clone(),
            github_token: self.token.clone(),
            clone_path: self.clone_path.clone(),
            web_path: self.web_path.clone(),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let settings_path = cli
        .config
        .clone()
        .unwrap_or_else(config::default_settings_path);
    let mut settings = Settings::load(&settings_path);

    let mut persisted = PartialConfig::from_settings(&settings);
    let config = match resolve(&cli.explicit(), &mut persisted, interactive_prompt) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    persisted.apply_to(&mut settings);
    if cli.save {
        if let Err(e) = settings.save(&settings_path) {
            tracing::warn!(path = %settings_path.display(), "could not save settings: {e}");
        }
    }

    let upstream = cli.upstream.as_deref().unwrap_or(&settings.github.upstream);
    let org = cli.org.as_deref().or(settings.github.organization.as_deref());
    let client = GitHubClient::new(&config.github_username, config.github_token.expose(), org)?;
    let vcs = Git2Vcs::shallow();
    let account = ServiceAccount::new(&settings.deploy.service_account);
    let installer = CommandInstaller::new(settings.deploy.installer.clone());
    let pipeline = Pipeline::new(
        &client,
        RepoSync::new(&vcs, &account),
        Deployer::new(&installer),
        upstream,
        !cli.no_install,
    );

    let requests = cli
        .modules
        .iter()
        .map(|name| ModuleRequest::new(name, &cli.branch))
        .collect::<error::Result<Vec<_>>>()?;
    let outcomes = pipeline.run(&requests, &config).await;

    report(&outcomes);
    Ok(())
}

fn report(outcomes: &[ModuleOutcome]) {
    let mut provisioned = 0;
    for outcome in outcomes {
        match &outcome.result {
            Ok(done) => {
                provisioned += 1;
                let cloned = if done.checkout.freshly_cloned {
                    "cloned"
                } else {
                    "already cloned"
                };
                println!(
                    "Module '{}' forked to {}, {cloned} at {} ({}), linked from {}.",
                    outcome.module,
                    done.fork.full_name,
                    done.checkout.path.display(),
                    done.checkout.branch,
                    done.link.display()
                );
                if let InstallStatus::Failed(reason) = &done.install {
                    println!("  install step failed: {reason}");
                }
            }
            Err(e) => println!("Module '{}' failed ({}): {e}", outcome.module, e.kind()),
        }
    }
    println!(
        "devfork finished: {provisioned} of {} modules provisioned.",
        outcomes.len()
    );
}
