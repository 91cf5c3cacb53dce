//! 문서 모델
//!
//! 두 문서 종류는 [`Document`] trait 하나로 같은 변환 과정
//! (parse → validate → normalize → render)을 거칩니다.
//!
//! - [`cve::CveDocument`]: 취약점 레코드, 본문은 `advisory`
//! - [`researcher::ResearcherDocument`]: 연구자 프로필, 본문은 `bio`

pub mod cve;
pub mod frontmatter;
pub mod researcher;

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::{Mapping, Value};

use crate::error::LinterError;
use crate::path::PathClassifier;

/// 분류기가 판별한 문서 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// 취약점 레코드
    Vulnerability,
    /// 연구자 프로필
    Researcher,
}

impl DocumentKind {
    /// 로그 / 메트릭 레이블용 이름
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vulnerability => "cve",
            Self::Researcher => "researcher",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 재작성을 막지 않는 린트 경고
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "warning", rename_all = "snake_case")]
pub enum LintWarning {
    /// 식별자 / 별칭이 가리키는 위치와 실제 위치가 다름
    Misplaced {
        /// 현재 상대 경로
        got: String,
        /// 정규 상대 경로
        want: String,
    },
    /// 연구자 프로필에 CVE 목록이 비어 있음
    NoCves,
    /// 연구자 프로필의 CVE 항목이 린트 규칙을 통과하지 못함
    InvalidCveReference {
        /// 해당 항목
        id: String,
    },
}

impl fmt::Display for LintWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Misplaced { got, want } => write!(f, "invalid path: {got} -> {want}"),
            Self::NoCves => f.write_str("no cves listed"),
            Self::InvalidCveReference { id } => write!(f, "invalid cve reference: {id}"),
        }
    }
}

/// 검증 시점의 문서 위치
#[derive(Debug, Clone, Copy)]
pub struct DocumentLocation<'a> {
    rel_path: &'a str,
    classifier: &'a PathClassifier,
}

impl<'a> DocumentLocation<'a> {
    /// 저장소 기준 상대 경로와 분류기로 위치를 만듭니다.
    pub fn new(rel_path: &'a str, classifier: &'a PathClassifier) -> Self {
        Self {
            rel_path,
            classifier,
        }
    }

    /// 저장소 기준 상대 경로
    pub fn rel_path(&self) -> &'a str {
        self.rel_path
    }

    /// 서브트리 접두어를 뗀 경로
    pub fn subtree_path(&self, kind: DocumentKind) -> &'a str {
        self.classifier.strip_subtree(kind, self.rel_path)
    }

    /// 파일 이름
    pub fn file_name(&self) -> &'a str {
        self.rel_path
            .rsplit_once('/')
            .map_or(self.rel_path, |(_, name)| name)
    }

    /// 서브트리 디렉토리 이름
    pub fn subtree(&self, kind: DocumentKind) -> &'a str {
        self.classifier.subtree(kind)
    }

    /// 문서 확장자
    pub fn ext(&self) -> &'a str {
        self.classifier.ext()
    }
}

/// 문서 종류별 변환 능력
///
/// 헤더 필드는 serde 직렬화 순서를 그대로 따르고, 본문 필드는 `#[serde(skip)]`입니다.
pub trait Document: Serialize + DeserializeOwned + Send + Sized {
    /// 문서 종류
    const KIND: DocumentKind;

    /// 본문
    fn body(&self) -> &str;

    /// 본문을 설정합니다.
    fn set_body(&mut self, body: String);

    /// 필드를 검증합니다. 치명적인 문제는 `Err`, 나머지는 경고 목록으로 돌려줍니다.
    fn validate(&self, location: &DocumentLocation<'_>) -> Result<Vec<LintWarning>, LinterError>;

    /// 컬렉션을 정렬하고 중복을 제거합니다. 여러 번 적용해도 결과가 같습니다.
    fn normalize(&mut self);

    /// 헤더 매핑과 본문으로부터 문서를 만듭니다.
    fn parse(header: Mapping, body: &str, path: &str) -> Result<Self, LinterError> {
        let mut doc: Self =
            serde_yaml::from_value(Value::Mapping(header)).map_err(|e| LinterError::ParseFailure {
                path: path.to_owned(),
                reason: e.to_string(),
            })?;
        doc.set_body(body.to_owned());
        Ok(doc)
    }

    /// 본문을 제외한 헤더를 순서 있는 매핑으로 변환합니다.
    fn to_header(&self, path: &str) -> Result<Mapping, LinterError> {
        let write_err = |reason: String| LinterError::WriteFailure {
            path: path.to_owned(),
            reason,
        };
        match serde_yaml::to_value(self).map_err(|e| write_err(e.to_string()))? {
            Value::Mapping(map) => Ok(map),
            _ => Err(write_err("record did not serialize to a mapping".to_owned())),
        }
    }

    /// 파일에 기록할 전체 문서를 렌더링합니다.
    fn render(&self, path: &str) -> Result<String, LinterError> {
        let header = self.to_header(path)?;
        frontmatter::render_document(&header, self.body()).map_err(|e| LinterError::WriteFailure {
            path: path.to_owned(),
            reason: e.to_string(),
        })
    }
}

/// 바이트 순으로 정렬하고 정확히 같은 항목을 제거합니다.
pub fn sort_uniq(list: &mut Vec<String>) {
    list.sort_unstable();
    list.dedup();
}

/// YAML `null`을 기본값으로 받아들입니다.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_uniq_sorts_and_dedupes() {
        let mut list = vec!["b", "a", "b", "c"]
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>();
        sort_uniq(&mut list);
        assert_eq!(list, vec!["a", "b", "c"]);
    }

    #[test]
    fn sort_uniq_uses_byte_order() {
        let mut list = vec!["b".to_owned(), "B".to_owned(), "a".to_owned()];
        sort_uniq(&mut list);
        assert_eq!(list, vec!["B", "a", "b"]);
    }

    #[test]
    fn sort_uniq_is_idempotent() {
        let mut list = vec!["z".to_owned(), "z".to_owned(), "y".to_owned()];
        sort_uniq(&mut list);
        let once = list.clone();
        sort_uniq(&mut list);
        assert_eq!(list, once);
    }

    #[test]
    fn warning_display() {
        let w = LintWarning::Misplaced {
            got: "cve/2016/000xxx/CVE-2016-1000123.md".to_owned(),
            want: "cve/2016/1000xxx/CVE-2016-1000123.md".to_owned(),
        };
        assert!(w.to_string().contains("000xxx"));
        assert_eq!(LintWarning::NoCves.to_string(), "no cves listed");
    }

    #[test]
    fn kind_serializes_lowercase() {
        let json = serde_json::to_string(&DocumentKind::Vulnerability).unwrap();
        assert_eq!(json, "\"vulnerability\"");
        assert_eq!(DocumentKind::Researcher.to_string(), "researcher");
    }

    // Property-based tests using proptest
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn sort_uniq_is_sorted_unique_and_idempotent(
                mut list in prop::collection::vec("[a-zA-Z0-9:/._-]{0,12}", 0..40)
            ) {
                sort_uniq(&mut list);
                prop_assert!(list.windows(2).all(|w| w[0] < w[1]));
                let once = list.clone();
                sort_uniq(&mut list);
                prop_assert_eq!(list, once);
            }
        }
    }
}
