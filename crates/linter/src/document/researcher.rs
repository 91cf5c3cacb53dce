//! 연구자 프로필

use serde::{Deserialize, Serialize};

use super::{Document, DocumentKind, DocumentLocation, LintWarning, null_as_default, sort_uniq};
use crate::cve;
use crate::error::LinterError;

/// 연구자 프로필 (`researcher/{alias}.md`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearcherDocument {
    /// 이름
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// 별칭 (파일 이름)
    #[serde(default, deserialize_with = "null_as_default")]
    pub alias: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub nationality: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub website: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub twitter: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub github: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub linkedin: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub hackerone: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub bugcrowd: String,
    /// 참여한 CVE 목록 (비어 있어도 항상 출력)
    #[serde(default, deserialize_with = "null_as_default")]
    pub cves: Vec<String>,
    /// 본문
    #[serde(skip)]
    pub bio: String,
}

impl ResearcherDocument {
    /// 별칭으로부터 정규 파일 이름을 만듭니다.
    pub fn file_name(&self, ext: &str) -> String {
        format!("{}{ext}", self.alias)
    }
}

impl Document for ResearcherDocument {
    const KIND: DocumentKind = DocumentKind::Researcher;

    fn body(&self) -> &str {
        &self.bio
    }

    fn set_body(&mut self, body: String) {
        self.bio = body;
    }

    fn validate(&self, location: &DocumentLocation<'_>) -> Result<Vec<LintWarning>, LinterError> {
        let mut warnings = Vec::new();

        let want = self.file_name(location.ext());
        if location.file_name() != want {
            warnings.push(LintWarning::Misplaced {
                got: location.rel_path().to_owned(),
                want: format!("{}/{want}", location.subtree(Self::KIND)),
            });
        }

        if self.cves.is_empty() {
            warnings.push(LintWarning::NoCves);
        }

        // 정규화 후 기준으로 항목당 한 번씩
        let mut cves = self.cves.clone();
        sort_uniq(&mut cves);
        warnings.extend(
            cves.into_iter()
                .filter(|id| !cve::is_valid(id))
                .map(|id| LintWarning::InvalidCveReference { id }),
        );

        Ok(warnings)
    }

    fn normalize(&mut self) {
        sort_uniq(&mut self.cves);
    }
}
