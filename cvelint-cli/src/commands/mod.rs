//! Command handlers -- one module per subcommand

pub mod config;
pub mod export;
pub mod lint;

use std::path::PathBuf;

use tracing::info;

use cvelint_core::config::CvelintConfig;
use cvelint_linter::{GitOptions, Repository};

use crate::cli::RepoArgs;
use crate::error::CliError;

/// Open (or clone, then optionally pull) the content repository.
///
/// `-r` overrides `repository.path` from the configuration. Git work runs on
/// the blocking pool.
pub(crate) async fn open_repository(
    args: &RepoArgs,
    config: &CvelintConfig,
) -> Result<Repository, CliError> {
    let path = args
        .repo
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.repository.path));
    let options = GitOptions {
        clone: args.clone_repo,
        pull: args.pull,
    };
    let clone_url = config.repository.clone_url.clone();

    info!(
        path = %path.display(),
        clone = options.clone,
        pull = options.pull,
        "opening repository"
    );
    let repo = tokio::task::spawn_blocking(move || Repository::open(&path, &options, &clone_url))
        .await
        .map_err(|e| CliError::Command(format!("repository task failed: {e}")))??;
    Ok(repo)
}
