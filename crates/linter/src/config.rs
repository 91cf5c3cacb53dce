//! 린터 설정
//!
//! [`LinterConfig`]는 core의 [`CvelintConfig`](cvelint_core::config::CvelintConfig)에서
//! 린터가 사용하는 필드만 추려낸 설정입니다.
//!
//! # 사용 예시
//!
//! ```
//! use cvelint_linter::{LinterConfig, LinterConfigBuilder};
//!
//! // 기본값으로 생성
//! let config = LinterConfig::default();
//! config.validate().unwrap();
//!
//! // 빌더로 생성
//! let config = LinterConfigBuilder::new()
//!     .max_workers(4)
//!     .atomic_write(false)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.max_workers, 4);
//! ```

use serde::{Deserialize, Serialize};

use cvelint_core::config::CvelintConfig;

use crate::cve::DEFAULT_BASE_URL;
use crate::error::LinterError;

/// 워커 수 상한
const MAX_WORKERS_LIMIT: usize = 1024;

/// 린터 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinterConfig {
    /// 취약점 문서 서브트리
    pub cve_dir: String,
    /// 연구자 문서 서브트리
    pub researcher_dir: String,
    /// 문서 파일 확장자
    pub file_ext: String,
    /// 전체 스윕 워커 수
    pub max_workers: usize,
    /// 스캐너 채널 용량
    pub channel_capacity: usize,
    /// 임시 파일 + rename 재작성
    pub atomic_write: bool,
    /// export URL 기준 경로
    pub base_url: String,
    /// clone 원격 URL
    pub clone_url: String,
}

impl Default for LinterConfig {
    fn default() -> Self {
        Self {
            cve_dir: "cve".to_owned(),
            researcher_dir: "researcher".to_owned(),
            file_ext: ".md".to_owned(),
            max_workers: 20,
            channel_capacity: 64,
            atomic_write: true,
            base_url: DEFAULT_BASE_URL.to_owned(),
            clone_url: "https://github.com/cvebase/cvebase.com".to_owned(),
        }
    }
}

impl LinterConfig {
    /// core 설정에서 린터 설정을 생성합니다.
    pub fn from_core(core: &CvelintConfig) -> Self {
        Self {
            cve_dir: core.repository.cve_dir.clone(),
            researcher_dir: core.repository.researcher_dir.clone(),
            file_ext: core.repository.file_ext.clone(),
            max_workers: core.lint.max_workers,
            channel_capacity: core.lint.channel_capacity,
            atomic_write: core.lint.atomic_write,
            base_url: core.export.base_url.clone(),
            clone_url: core.repository.clone_url.clone(),
        }
    }

    /// 설정 값의 유효성을 검증합니다.
    ///
    /// # 검증 규칙
    ///
    /// - `max_workers`: 1-1024
    /// - `channel_capacity`: 1 이상
    /// - `cve_dir`, `researcher_dir`: 비어있지 않은 단일 디렉토리 이름, 서로 달라야 함
    /// - `file_ext`: `.`으로 시작
    pub fn validate(&self) -> Result<(), LinterError> {
        if self.max_workers == 0 || self.max_workers > MAX_WORKERS_LIMIT {
            return Err(config_err(
                "max_workers",
                format!("must be 1-{MAX_WORKERS_LIMIT}"),
            ));
        }

        if self.channel_capacity == 0 {
            return Err(config_err(
                "channel_capacity",
                "must be greater than 0".to_owned(),
            ));
        }

        for (field, dir) in [
            ("cve_dir", &self.cve_dir),
            ("researcher_dir", &self.researcher_dir),
        ] {
            if dir.is_empty()
                || dir == "."
                || dir.contains("..")
                || dir.contains('/')
                || dir.contains('\\')
            {
                return Err(config_err(
                    field,
                    format!("'{dir}' must be a single directory name"),
                ));
            }
        }

        if self.cve_dir == self.researcher_dir {
            return Err(config_err(
                "researcher_dir",
                "must differ from cve_dir".to_owned(),
            ));
        }

        if self.file_ext.len() < 2 || !self.file_ext.starts_with('.') {
            return Err(config_err(
                "file_ext",
                format!("'{}' must start with '.'", self.file_ext),
            ));
        }

        Ok(())
    }
}

fn config_err(field: &str, reason: String) -> LinterError {
    LinterError::Config {
        field: field.to_owned(),
        reason,
    }
}

/// [`LinterConfig`] 빌더
#[derive(Default)]
pub struct LinterConfigBuilder {
    config: LinterConfig,
}

impl LinterConfigBuilder {
    /// 기본값을 가진 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 취약점 서브트리를 설정합니다.
    pub fn cve_dir(mut self, dir: impl Into<String>) -> Self {
        self.config.cve_dir = dir.into();
        self
    }

    /// 연구자 서브트리를 설정합니다.
    pub fn researcher_dir(mut self, dir: impl Into<String>) -> Self {
        self.config.researcher_dir = dir.into();
        self
    }

    /// 문서 확장자를 설정합니다.
    pub fn file_ext(mut self, ext: impl Into<String>) -> Self {
        self.config.file_ext = ext.into();
        self
    }

    /// 워커 수를 설정합니다.
    pub fn max_workers(mut self, workers: usize) -> Self {
        self.config.max_workers = workers;
        self
    }

    /// 스캐너 채널 용량을 설정합니다.
    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.config.channel_capacity = capacity;
        self
    }

    /// 원자적 재작성 여부를 설정합니다.
    pub fn atomic_write(mut self, atomic: bool) -> Self {
        self.config.atomic_write = atomic;
        self
    }

    /// export URL 기준 경로를 설정합니다.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// clone 원격 URL을 설정합니다.
    pub fn clone_url(mut self, url: impl Into<String>) -> Self {
        self.config.clone_url = url.into();
        self
    }

    /// 설정을 검증하고 빌드합니다.
    ///
    /// # Errors
    ///
    /// 유효성 검증 실패 시 `LinterError::Config` 반환
    pub fn build(self) -> Result<LinterConfig, LinterError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        LinterConfig::default().validate().unwrap();
    }

    #[test]
    fn from_core_preserves_values() {
        let mut core = CvelintConfig::default();
        core.repository.cve_dir = "vulns".to_owned();
        core.repository.file_ext = ".markdown".to_owned();
        core.lint.max_workers = 3;
        core.lint.atomic_write = false;
        core.export.base_url = "https://mirror.example.org/cve".to_owned();

        let config = LinterConfig::from_core(&core);
        assert_eq!(config.cve_dir, "vulns");
        assert_eq!(config.researcher_dir, "researcher");
        assert_eq!(config.file_ext, ".markdown");
        assert_eq!(config.max_workers, 3);
        assert!(!config.atomic_write);
        assert_eq!(config.base_url, "https://mirror.example.org/cve");
    }

    #[test]
    fn from_core_defaults_match_default() {
        let config = LinterConfig::from_core(&CvelintConfig::default());
        assert_eq!(config, LinterConfig::default());
    }

    #[test]
    fn validate_rejects_zero_workers() {
        let config = LinterConfig {
            max_workers: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_workers"));
    }

    #[test]
    fn validate_rejects_zero_capacity() {
        let config = LinterConfig {
            channel_capacity: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_traversal_in_subtree() {
        let config = LinterConfig {
            cve_dir: "..".to_owned(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_identical_subtrees() {
        let config = LinterConfig {
            researcher_dir: "cve".to_owned(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn builder_rejects_bad_extension() {
        let result = LinterConfigBuilder::new().file_ext("md").build();
        assert!(matches!(result, Err(LinterError::Config { .. })));
    }

    #[test]
    fn builder_sets_fields() {
        let config = LinterConfigBuilder::new()
            .cve_dir("vulns")
            .researcher_dir("people")
            .channel_capacity(8)
            .base_url("https://mirror.example.org/cve")
            .build()
            .unwrap();
        assert_eq!(config.cve_dir, "vulns");
        assert_eq!(config.researcher_dir, "people");
        assert_eq!(config.channel_capacity, 8);
    }
}
