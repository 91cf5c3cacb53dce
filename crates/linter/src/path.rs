//! 경로 분류 및 정규 위치 계산
//!
//! 저장소 기준 상대 경로를 두 문서 형태 중 하나로 분류합니다.
//!
//! - `{cve_dir}/*/*/*{ext}` → [`DocumentKind::Vulnerability`]
//! - `{researcher_dir}/*{ext}` → [`DocumentKind::Researcher`]
//!
//! `*`는 `/`를 넘지 않으므로 두 형태는 깊이가 달라 서로 겹치지 않습니다.

use globset::{GlobBuilder, GlobMatcher};

use crate::config::LinterConfig;
use crate::cve;
use crate::document::DocumentKind;
use crate::error::LinterError;

/// 경로 분류기
#[derive(Debug, Clone)]
pub struct PathClassifier {
    cve_dir: String,
    researcher_dir: String,
    ext: String,
    cve_glob: GlobMatcher,
    researcher_glob: GlobMatcher,
}

impl PathClassifier {
    /// 설정의 서브트리 이름과 확장자로 분류기를 생성합니다.
    pub fn new(config: &LinterConfig) -> Result<Self, LinterError> {
        let cve_glob = compile(&format!("{}/*/*/*{}", config.cve_dir, config.file_ext))?;
        let researcher_glob =
            compile(&format!("{}/*{}", config.researcher_dir, config.file_ext))?;

        Ok(Self {
            cve_dir: config.cve_dir.clone(),
            researcher_dir: config.researcher_dir.clone(),
            ext: config.file_ext.clone(),
            cve_glob,
            researcher_glob,
        })
    }

    /// 상대 경로의 문서 종류를 판별합니다.
    pub fn classify(&self, rel_path: &str) -> Result<DocumentKind, LinterError> {
        if self.cve_glob.is_match(rel_path) {
            Ok(DocumentKind::Vulnerability)
        } else if self.researcher_glob.is_match(rel_path) {
            Ok(DocumentKind::Researcher)
        } else {
            Err(LinterError::UnclassifiablePath {
                path: rel_path.to_owned(),
            })
        }
    }

    /// 문서 종류의 서브트리 디렉토리 이름
    pub fn subtree(&self, kind: DocumentKind) -> &str {
        match kind {
            DocumentKind::Vulnerability => &self.cve_dir,
            DocumentKind::Researcher => &self.researcher_dir,
        }
    }

    /// 문서 확장자
    pub fn ext(&self) -> &str {
        &self.ext
    }

    /// 상대 경로에서 서브트리 접두어를 제거합니다.
    pub fn strip_subtree<'a>(&self, kind: DocumentKind, rel_path: &'a str) -> &'a str {
        rel_path
            .strip_prefix(self.subtree(kind))
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(rel_path)
    }

    /// 잘못 배치되었을 수 있는 파일의 정규 위치를 파일 이름으로부터 계산합니다.
    ///
    /// 취약점은 식별자를 교정한 뒤 [`cve::to_path_with`]를, 연구자는 `alias.md`를 사용합니다.
    pub fn want_path(&self, rel_path: &str) -> Result<String, LinterError> {
        let kind = self.classify(rel_path)?;
        let stem = cve::id_from_path(rel_path).ok_or_else(|| LinterError::UnclassifiablePath {
            path: rel_path.to_owned(),
        })?;

        match kind {
            DocumentKind::Vulnerability => {
                let id = cve::fix_id(stem);
                let sub = cve::to_path_with(&id, &self.ext)?;
                Ok(format!("{}/{sub}", self.cve_dir))
            }
            DocumentKind::Researcher => Ok(format!("{}/{stem}{}", self.researcher_dir, self.ext)),
        }
    }
}

fn compile(pattern: &str) -> Result<GlobMatcher, LinterError> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|e| LinterError::Config {
            field: "path_pattern".to_owned(),
            reason: format!("{pattern}: {e}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> PathClassifier {
        PathClassifier::new(&LinterConfig::default()).unwrap()
    }

    #[test]
    fn classify_vulnerability_path() {
        assert_eq!(
            classifier()
                .classify("cve/2016/1000xxx/CVE-2016-1000123.md")
                .unwrap(),
            DocumentKind::Vulnerability
        );
    }

    #[test]
    fn classify_researcher_path() {
        assert_eq!(
            classifier().classify("researcher/ma7h1as.md").unwrap(),
            DocumentKind::Researcher
        );
    }

    #[test]
    fn classify_rejects_other_shapes() {
        let c = classifier();
        for path in [
            "README.md",
            "cve/2016/CVE-2016-0974.md",
            "cve/2016/0xxx/extra/CVE-2016-0974.md",
            "researcher/team/orange.md",
            "researcher/orange.txt",
            "cve/2016/0xxx/CVE-2016-0974.md.bak",
            "docs/researcher/orange.md",
        ] {
            let err = c.classify(path).unwrap_err();
            assert!(
                matches!(err, LinterError::UnclassifiablePath { .. }),
                "{path}"
            );
        }
    }

    #[test]
    fn classify_uses_configured_subtrees() {
        let config = LinterConfig {
            cve_dir: "vulns".to_owned(),
            researcher_dir: "people".to_owned(),
            ..Default::default()
        };
        let c = PathClassifier::new(&config).unwrap();
        assert_eq!(
            c.classify("vulns/2020/14xxx/CVE-2020-14882.md").unwrap(),
            DocumentKind::Vulnerability
        );
        assert_eq!(
            c.classify("people/orange.md").unwrap(),
            DocumentKind::Researcher
        );
        assert!(c.classify("cve/2020/14xxx/CVE-2020-14882.md").is_err());
    }

    #[test]
    fn want_path_keeps_canonical_paths() {
        let c = classifier();
        assert_eq!(
            c.want_path("cve/2016/1000xxx/CVE-2016-1000123.md").unwrap(),
            "cve/2016/1000xxx/CVE-2016-1000123.md"
        );
        assert_eq!(
            c.want_path("researcher/ma7h1as.md").unwrap(),
            "researcher/ma7h1as.md"
        );
    }

    #[test]
    fn want_path_repairs_bucket_and_identifier() {
        let c = classifier();
        assert_eq!(
            c.want_path("cve/2016/000xxx/CVE-2016-1000123.md").unwrap(),
            "cve/2016/1000xxx/CVE-2016-1000123.md"
        );
        assert_eq!(
            c.want_path("cve/2016/1000xxx/CVE-2016-01000123.md").unwrap(),
            "cve/2016/1000xxx/CVE-2016-1000123.md"
        );
    }

    #[test]
    fn want_path_fails_on_unparseable_stem() {
        let err = classifier()
            .want_path("cve/2016/0xxx/advisory.md")
            .unwrap_err();
        assert!(matches!(err, LinterError::InvalidIdentifier { .. }));
    }

    #[test]
    fn strip_subtree_returns_inner_path() {
        let c = classifier();
        assert_eq!(
            c.strip_subtree(
                DocumentKind::Vulnerability,
                "cve/2020/14xxx/CVE-2020-14882.md"
            ),
            "2020/14xxx/CVE-2020-14882.md"
        );
        assert_eq!(
            c.strip_subtree(DocumentKind::Researcher, "researcher/orange.md"),
            "orange.md"
        );
    }
}
