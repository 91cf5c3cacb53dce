//! 에러 타입: 도메인별 에러 정의

/// cvelint 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum CvelintError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 저장소 / git 관련 에러
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// 린트 / 스캔 / 문서 처리 에러
    #[error("lint error: {0}")]
    Lint(#[from] LintError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 저장소 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// 저장소 디렉토리가 없거나 git 저장소가 아님
    #[error("repository not found: {path}")]
    NotFound { path: String },

    /// clone 대상 디렉토리가 이미 존재함
    #[error("repository already exists: {path}")]
    AlreadyExists { path: String },

    /// 부모가 없는 (최초) 커밋
    #[error("commit has no parent: {commit}")]
    NoParentCommit { commit: String },

    /// 기타 git 연산 실패
    #[error("git error: {0}")]
    Git(String),
}

/// 린트 처리 에러
#[derive(Debug, thiserror::Error)]
pub enum LintError {
    /// 식별자 형식 오류
    #[error("identifier error: {0}")]
    Identifier(String),

    /// 분류할 수 없는 경로
    #[error("unclassifiable path: {0}")]
    Path(String),

    /// 트리 스캔 실패 또는 취소
    #[error("scan failed: {0}")]
    Scan(String),

    /// 문서 파싱 / 쓰기 실패
    #[error("document error: {0}")]
    Document(String),

    /// 작업 취소 또는 태스크 실패
    #[error("aborted: {0}")]
    Aborted(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_converts_to_top_level() {
        let err: CvelintError = ConfigError::InvalidValue {
            field: "lint.max_workers".to_owned(),
            reason: "must be greater than 0".to_owned(),
        }
        .into();
        assert!(matches!(err, CvelintError::Config(_)));
        assert!(err.to_string().contains("lint.max_workers"));
    }

    #[test]
    fn repository_error_display() {
        let err = RepositoryError::NoParentCommit {
            commit: "78cce29".to_owned(),
        };
        assert!(err.to_string().contains("78cce29"));
    }

    #[test]
    fn lint_error_converts_to_top_level() {
        let err: CvelintError = LintError::Scan("cve: permission denied".to_owned()).into();
        assert!(matches!(err, CvelintError::Lint(LintError::Scan(_))));
    }
}
