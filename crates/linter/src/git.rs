//! 버전 관리 연동 (git2)
//!
//! [`VersionControl`]은 커밋이 추가 / 수정한 파일 목록을 제공하는 단일 연산 trait입니다.
//! [`GitBackend`]는 git2 기반 구현으로, 저장소 open / clone / fast-forward pull을 담당합니다.
//!
//! 모든 연산은 blocking이므로 async 컨텍스트에서는 `spawn_blocking`으로 호출합니다.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use git2::{Delta, ErrorCode, Repository};
use tracing::info;

use crate::error::LinterError;

/// 커밋 변경 파일 조회 trait
pub trait VersionControl: Send + Sync {
    /// 커밋이 첫 번째 부모 대비 추가 / 수정한 파일을 git 순서대로, 중복 없이 반환합니다.
    ///
    /// 삭제된 파일은 제외됩니다. 부모가 없는 커밋은 `NoParentCommit`입니다.
    fn changed_files(&self, revspec: &str) -> Result<Vec<String>, LinterError>;
}

/// 저장소 초기화 옵션
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GitOptions {
    /// 새로 clone (대상 디렉토리가 없어야 함)
    pub clone: bool,
    /// open 후 origin에서 fast-forward pull
    pub pull: bool,
}

/// git2 기반 [`VersionControl`] 구현
pub struct GitBackend {
    path: PathBuf,
    repo: Mutex<Repository>,
}

impl std::fmt::Debug for GitBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitBackend")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl GitBackend {
    /// 옵션에 따라 저장소를 clone 하거나 open 합니다.
    ///
    /// - `clone`이고 디렉토리가 존재: `RepositoryAlreadyExists`
    /// - `clone`이 아니고 디렉토리가 없거나 git 저장소가 아님: `RepositoryNotFound`
    /// - `pull`: open 후 fast-forward pull
    pub fn open_or_clone(
        path: impl AsRef<Path>,
        options: GitOptions,
        clone_url: &str,
    ) -> Result<Self, LinterError> {
        let path = path.as_ref();
        let exists = path
            .try_exists()
            .map_err(|e| LinterError::io(path.display().to_string(), e))?;

        if options.clone {
            if exists {
                return Err(LinterError::RepositoryAlreadyExists {
                    path: path.display().to_string(),
                });
            }
            info!(url = clone_url, path = %path.display(), "cloning repository");
            let repo = Repository::clone(clone_url, path)?;
            return Ok(Self::from_repository(path, repo));
        }

        if !exists || !path.is_dir() {
            return Err(LinterError::RepositoryNotFound {
                path: path.display().to_string(),
            });
        }

        let repo = Repository::open(path).map_err(|e| match e.code() {
            ErrorCode::NotFound => LinterError::RepositoryNotFound {
                path: path.display().to_string(),
            },
            _ => e.into(),
        })?;
        let backend = Self::from_repository(path, repo);

        if options.pull {
            backend.pull()?;
        }
        Ok(backend)
    }

    /// 기존 저장소를 엽니다.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LinterError> {
        Self::open_or_clone(path, GitOptions::default(), "")
    }

    fn from_repository(path: &Path, repo: Repository) -> Self {
        Self {
            path: path.to_path_buf(),
            repo: Mutex::new(repo),
        }
    }

    /// 작업 디렉토리 경로
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 현재 브랜치를 origin에서 fetch 한 뒤 fast-forward 합니다.
    ///
    /// 이미 최신이면 성공, fast-forward가 불가능하면 에러입니다.
    pub fn pull(&self) -> Result<(), LinterError> {
        let repo = self.lock()?;

        let head = repo.head()?;
        let branch = head
            .shorthand()
            .filter(|_| head.is_branch())
            .ok_or_else(|| LinterError::Git("HEAD is not on a branch".to_owned()))?
            .to_owned();

        let mut remote = repo.find_remote("origin")?;
        remote.fetch(&[branch.as_str()], None, None)?;

        let fetch_head = repo.find_reference("FETCH_HEAD")?;
        let fetched = repo.reference_to_annotated_commit(&fetch_head)?;
        let (analysis, _) = repo.merge_analysis(&[&fetched])?;

        if analysis.is_up_to_date() {
            info!(branch = %branch, "repository already up to date");
            return Ok(());
        }
        if !analysis.is_fast_forward() {
            return Err(LinterError::Git(format!(
                "cannot fast-forward {branch} to origin"
            )));
        }

        let refname = format!("refs/heads/{branch}");
        let mut reference = repo.find_reference(&refname)?;
        reference.set_target(fetched.id(), "cvelint: fast-forward pull")?;
        repo.set_head(&refname)?;
        repo.checkout_head(Some(git2::build::CheckoutBuilder::new().force()))?;

        info!(branch = %branch, commit = %fetched.id(), "fast-forwarded repository");
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Repository>, LinterError> {
        self.repo
            .lock()
            .map_err(|_| LinterError::Git("repository lock poisoned".to_owned()))
    }
}

impl VersionControl for GitBackend {
    fn changed_files(&self, revspec: &str) -> Result<Vec<String>, LinterError> {
        let repo = self.lock()?;

        let commit = repo.revparse_single(revspec)?.peel_to_commit()?;
        if commit.parent_count() == 0 {
            return Err(LinterError::NoParentCommit {
                commit: revspec.to_owned(),
            });
        }

        let parent_tree = commit.parent(0)?.tree()?;
        let tree = commit.tree()?;
        let diff = repo.diff_tree_to_tree(Some(&parent_tree), Some(&tree), None)?;

        let mut seen = HashSet::new();
        let mut files = Vec::new();
        for delta in diff.deltas() {
            if delta.status() == Delta::Deleted {
                continue;
            }
            let Some(path) = delta.new_file().path() else {
                continue;
            };
            let path = path.to_string_lossy().replace('\\', "/");
            if seen.insert(path.clone()) {
                files.push(path);
            }
        }
        Ok(files)
    }
}
