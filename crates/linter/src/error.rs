//! 린터 에러 타입
//!
//! [`LinterError`]는 린터 모듈 내에서 발생할 수 있는 모든 에러를 나타냅니다.
//! `From<LinterError> for CvelintError` 구현을 통해 `?` 연산자로
//! 상위 에러 타입으로 자연스럽게 전파됩니다.
//!
//! # 에러 카테고리
//!
//! - **식별자**: `InvalidIdentifier`, `MalformedIdentifier`
//! - **경로**: `UnclassifiablePath`
//! - **스캔**: `ScanFailure`, `ScanCanceled`, `Canceled`
//! - **문서**: `ParseFailure`, `WriteFailure`, `Io`
//! - **저장소**: `RepositoryNotFound`, `RepositoryAlreadyExists`, `NoParentCommit`, `Git`
//! - **설정 / 태스크**: `Config`, `Task`

use cvelint_core::error::{ConfigError, CvelintError, LintError, RepositoryError};

/// 린터 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum LinterError {
    /// 식별자를 분해하거나 버킷으로 변환할 수 없음
    #[error("invalid identifier '{id}': {reason}")]
    InvalidIdentifier {
        /// 입력 식별자
        id: String,
        /// 실패 사유
        reason: String,
    },

    /// 문서 헤더의 식별자가 린트 규칙을 통과하지 못함
    #[error("malformed identifier in {path}: '{id}'")]
    MalformedIdentifier {
        /// 문서 경로
        path: String,
        /// 헤더에 기록된 식별자
        id: String,
    },

    /// 어떤 문서 형태에도 해당하지 않는 경로
    #[error("unable to classify path: {path}")]
    UnclassifiablePath {
        /// 저장소 기준 상대 경로
        path: String,
    },

    /// 트리 순회 중 I/O 실패
    #[error("scan failed under {root}: {reason}")]
    ScanFailure {
        /// 스캔 루트
        root: String,
        /// 실패 사유
        reason: String,
    },

    /// 소비자가 채널을 닫았거나 토큰이 취소되어 스캔이 중단됨
    #[error("scan canceled: {root}")]
    ScanCanceled {
        /// 스캔 루트
        root: String,
    },

    /// 린트 실행이 취소됨
    #[error("operation canceled")]
    Canceled,

    /// front matter 또는 레코드 디코딩 실패
    #[error("parse error: {path}: {reason}")]
    ParseFailure {
        /// 문서 경로
        path: String,
        /// 실패 사유
        reason: String,
    },

    /// 직렬화 또는 파일 재작성 실패
    #[error("write error: {path}: {reason}")]
    WriteFailure {
        /// 문서 경로
        path: String,
        /// 실패 사유
        reason: String,
    },

    /// 파일 I/O 에러
    #[error("io error: {path}: {source}")]
    Io {
        /// 관련 파일 경로
        path: String,
        /// 원본 I/O 에러
        source: std::io::Error,
    },

    /// 저장소 디렉토리가 없거나 git 저장소가 아님
    #[error("repository not found: {path}")]
    RepositoryNotFound {
        /// 저장소 경로
        path: String,
    },

    /// clone 대상 디렉토리가 이미 존재함
    #[error("repository already exists: {path}")]
    RepositoryAlreadyExists {
        /// 저장소 경로
        path: String,
    },

    /// 최초 커밋에는 비교할 부모가 없음
    #[error("commit has no parent: {commit}")]
    NoParentCommit {
        /// 요청한 revspec
        commit: String,
    },

    /// 기타 git 연산 실패
    #[error("git error: {0}")]
    Git(String),

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// blocking 태스크 / 워커 태스크 실패
    #[error("task error: {0}")]
    Task(String),
}

impl LinterError {
    /// 경로 정보를 붙여 I/O 에러를 감쌉니다.
    pub(crate) fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<git2::Error> for LinterError {
    fn from(err: git2::Error) -> Self {
        Self::Git(err.message().to_owned())
    }
}

impl From<LinterError> for CvelintError {
    fn from(err: LinterError) -> Self {
        match err {
            LinterError::InvalidIdentifier { .. } | LinterError::MalformedIdentifier { .. } => {
                CvelintError::Lint(LintError::Identifier(err.to_string()))
            }
            LinterError::UnclassifiablePath { path } => {
                CvelintError::Lint(LintError::Path(path))
            }
            LinterError::ScanFailure { .. } | LinterError::ScanCanceled { .. } => {
                CvelintError::Lint(LintError::Scan(err.to_string()))
            }
            LinterError::ParseFailure { .. } | LinterError::WriteFailure { .. } => {
                CvelintError::Lint(LintError::Document(err.to_string()))
            }
            LinterError::Canceled | LinterError::Task(_) => {
                CvelintError::Lint(LintError::Aborted(err.to_string()))
            }
            LinterError::Io { path, source } => {
                CvelintError::Io(std::io::Error::new(source.kind(), format!("{path}: {source}")))
            }
            LinterError::RepositoryNotFound { path } => {
                CvelintError::Repository(RepositoryError::NotFound { path })
            }
            LinterError::RepositoryAlreadyExists { path } => {
                CvelintError::Repository(RepositoryError::AlreadyExists { path })
            }
            LinterError::NoParentCommit { commit } => {
                CvelintError::Repository(RepositoryError::NoParentCommit { commit })
            }
            LinterError::Git(msg) => CvelintError::Repository(RepositoryError::Git(msg)),
            LinterError::Config { field, reason } => {
                CvelintError::Config(ConfigError::InvalidValue { field, reason })
            }
        }
    }
}
