//! 설정 관리: cvelint.toml 파싱 및 런타임 설정
//!
//! [`CvelintConfig`]는 모든 구성 요소의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`CVELINT_LINT_MAX_WORKERS=8` 형식)
//! 3. 설정 파일 (`cvelint.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), cvelint_core::error::CvelintError> {
//! use cvelint_core::config::CvelintConfig;
//!
//! // 파일이 없으면 기본값 사용 + 환경변수 오버라이드
//! let config = CvelintConfig::load_or_default("cvelint.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = CvelintConfig::parse("[lint]\nmax_workers = 8")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, CvelintError};

/// 워커 수 상한
const MAX_WORKERS_LIMIT: usize = 1024;

/// cvelint 통합 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CvelintConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 콘텐츠 저장소 설정
    #[serde(default)]
    pub repository: RepositoryConfig,
    /// 린트 설정
    #[serde(default)]
    pub lint: LintConfig,
    /// export 설정
    #[serde(default)]
    pub export: ExportConfig,
}

impl CvelintConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    ///
    /// 파일이 없으면 `ConfigError::FileNotFound`를 반환합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, CvelintError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 설정 파일이 있으면 로드하고, 없으면 기본값을 사용합니다.
    ///
    /// 어느 쪽이든 환경변수 오버라이드와 검증을 적용합니다.
    pub async fn load_or_default(path: impl AsRef<Path>) -> Result<Self, CvelintError> {
        let path = path.as_ref();
        let mut config = match Self::from_file(path).await {
            Ok(config) => config,
            Err(CvelintError::Config(ConfigError::FileNotFound { .. })) => {
                tracing::debug!(path = %path.display(), "config file not found, using defaults");
                Self::default()
            }
            Err(e) => return Err(e),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, CvelintError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CvelintError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                CvelintError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, CvelintError> {
        toml::from_str(toml_str).map_err(|e| {
            CvelintError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `CVELINT_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "CVELINT_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "CVELINT_GENERAL_LOG_FORMAT");

        // Repository
        override_string(&mut self.repository.path, "CVELINT_REPOSITORY_PATH");
        override_string(&mut self.repository.clone_url, "CVELINT_REPOSITORY_CLONE_URL");
        override_string(&mut self.repository.cve_dir, "CVELINT_REPOSITORY_CVE_DIR");
        override_string(
            &mut self.repository.researcher_dir,
            "CVELINT_REPOSITORY_RESEARCHER_DIR",
        );
        override_string(&mut self.repository.file_ext, "CVELINT_REPOSITORY_FILE_EXT");

        // Lint
        override_usize(&mut self.lint.max_workers, "CVELINT_LINT_MAX_WORKERS");
        override_usize(
            &mut self.lint.channel_capacity,
            "CVELINT_LINT_CHANNEL_CAPACITY",
        );
        override_bool(&mut self.lint.atomic_write, "CVELINT_LINT_ATOMIC_WRITE");

        // Export
        override_string(&mut self.export.base_url, "CVELINT_EXPORT_BASE_URL");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), CvelintError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(invalid(
                "general.log_level",
                format!("must be one of: {}", valid_levels.join(", ")),
            ));
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(invalid(
                "general.log_format",
                format!("must be one of: {}", valid_formats.join(", ")),
            ));
        }

        if self.repository.path.is_empty() {
            return Err(invalid("repository.path", "must not be empty".to_owned()));
        }

        validate_subdir("repository.cve_dir", &self.repository.cve_dir)?;
        validate_subdir("repository.researcher_dir", &self.repository.researcher_dir)?;

        if self.repository.cve_dir == self.repository.researcher_dir {
            return Err(invalid(
                "repository.researcher_dir",
                "must differ from repository.cve_dir".to_owned(),
            ));
        }

        let ext = &self.repository.file_ext;
        if ext.len() < 2 || !ext.starts_with('.') || ext.contains('/') {
            return Err(invalid(
                "repository.file_ext",
                format!("'{ext}' must start with '.' and name an extension"),
            ));
        }

        if self.lint.max_workers == 0 || self.lint.max_workers > MAX_WORKERS_LIMIT {
            return Err(invalid(
                "lint.max_workers",
                format!("must be 1-{MAX_WORKERS_LIMIT}"),
            ));
        }

        if self.lint.channel_capacity == 0 {
            return Err(invalid(
                "lint.channel_capacity",
                "must be greater than 0".to_owned(),
            ));
        }

        if !(self.export.base_url.starts_with("https://")
            || self.export.base_url.starts_with("http://"))
        {
            return Err(invalid(
                "export.base_url",
                "must be an http(s) URL".to_owned(),
            ));
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: String) -> CvelintError {
    ConfigError::InvalidValue {
        field: field.to_owned(),
        reason,
    }
    .into()
}

/// 하위 디렉토리 이름은 저장소 루트 바로 아래의 단일 컴포넌트여야 합니다.
fn validate_subdir(field: &str, value: &str) -> Result<(), CvelintError> {
    if value.is_empty() {
        return Err(invalid(field, "must not be empty".to_owned()));
    }
    if value.contains('/') || value.contains('\\') || value == "." || value == ".." {
        return Err(invalid(
            field,
            format!("'{value}' must be a single directory name"),
        ));
    }
    Ok(())
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 콘텐츠 저장소 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// 저장소 체크아웃 경로
    pub path: String,
    /// `--clone` 시 사용할 원격 URL
    pub clone_url: String,
    /// 취약점 문서 하위 디렉토리
    pub cve_dir: String,
    /// 연구자 문서 하위 디렉토리
    pub researcher_dir: String,
    /// 문서 파일 확장자 (접미사 필터)
    pub file_ext: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            path: ".".to_owned(),
            clone_url: "https://github.com/cvebase/cvebase.com".to_owned(),
            cve_dir: "cve".to_owned(),
            researcher_dir: "researcher".to_owned(),
            file_ext: ".md".to_owned(),
        }
    }
}

/// 린트 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    /// 전체 스윕 워커 수
    pub max_workers: usize,
    /// 스캐너 → 워커 경로 채널 용량
    pub channel_capacity: usize,
    /// 임시 파일 + rename 방식으로 재작성
    pub atomic_write: bool,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            max_workers: 20,
            channel_capacity: 64,
            atomic_write: true,
        }
    }
}

/// export 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// 공개 참조 URL 기준 경로
    pub base_url: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.cvebase.com/cve".to_owned(),
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}
