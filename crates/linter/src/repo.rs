//! 저장소 핸들
//!
//! [`Repository`]는 콘텐츠 저장소 루트와 버전 관리 상태에 대한 공유 핸들을 가집니다.
//! 모든 파일 연산은 루트를 기준으로 해석됩니다.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::error::LinterError;
use crate::git::{GitBackend, GitOptions, VersionControl};

/// 콘텐츠 저장소 핸들
#[derive(Clone)]
pub struct Repository {
    root: PathBuf,
    vcs: Arc<dyn VersionControl>,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl Repository {
    /// git 저장소를 열거나 clone 합니다.
    ///
    /// blocking 연산입니다 (clone / fetch 포함).
    pub fn open(
        path: impl AsRef<Path>,
        options: &GitOptions,
        clone_url: &str,
    ) -> Result<Self, LinterError> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(LinterError::Config {
                field: "repository.path".to_owned(),
                reason: "repository path not set".to_owned(),
            });
        }
        let backend = GitBackend::open_or_clone(path, *options, clone_url)?;
        Ok(Self::with_vcs(path, Arc::new(backend)))
    }

    /// 임의의 버전 관리 구현으로 핸들을 만듭니다.
    pub fn with_vcs(root: impl Into<PathBuf>, vcs: Arc<dyn VersionControl>) -> Self {
        Self {
            root: root.into(),
            vcs,
        }
    }

    /// 저장소 루트
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 상대 경로를 루트 기준 전체 경로로 바꿉니다.
    pub fn full_path(&self, rel_path: &str) -> PathBuf {
        self.root.join(rel_path)
    }

    /// 루트 아래 경로를 `/` 구분 상대 경로 문자열로 바꿉니다.
    ///
    /// 루트 밖의 경로는 `None`입니다.
    pub fn rel_path(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.root).ok()?;
        let parts = rel
            .components()
            .map(|c| match c {
                Component::Normal(part) => part.to_str(),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()?;
        Some(parts.join("/"))
    }

    /// 버전 관리 핸들
    pub fn vcs(&self) -> Arc<dyn VersionControl> {
        Arc::clone(&self.vcs)
    }

    /// 커밋이 추가 / 수정한 파일 목록 (blocking)
    pub fn changed_files(&self, revspec: &str) -> Result<Vec<String>, LinterError> {
        self.vcs.changed_files(revspec)
    }
}
