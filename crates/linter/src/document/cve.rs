//! 취약점 레코드

use serde::{Deserialize, Serialize};

use super::{Document, DocumentKind, DocumentLocation, LintWarning, null_as_default, sort_uniq};
use crate::cve;
use crate::error::LinterError;

/// 취약점 레코드 (`cve/{year}/{bucket}/{id}.md`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CveDocument {
    /// 식별자
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    /// PoC 링크
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub pocs: Vec<String>,
    /// 강의 링크
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub courses: Vec<String>,
    /// writeup 링크
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub writeups: Vec<String>,
    /// 본문
    #[serde(skip)]
    pub advisory: String,
}

impl Document for CveDocument {
    const KIND: DocumentKind = DocumentKind::Vulnerability;

    fn body(&self) -> &str {
        &self.advisory
    }

    fn set_body(&mut self, body: String) {
        self.advisory = body;
    }

    fn validate(&self, location: &DocumentLocation<'_>) -> Result<Vec<LintWarning>, LinterError> {
        if !cve::is_valid(&self.id) {
            return Err(LinterError::MalformedIdentifier {
                path: location.rel_path().to_owned(),
                id: self.id.clone(),
            });
        }

        let mut warnings = Vec::new();
        let want = cve::to_path_with(&self.id, location.ext())?;
        if location.subtree_path(Self::KIND) != want {
            warnings.push(LintWarning::Misplaced {
                got: location.rel_path().to_owned(),
                want: format!("{}/{want}", location.subtree(Self::KIND)),
            });
        }
        Ok(warnings)
    }

    fn normalize(&mut self) {
        sort_uniq(&mut self.pocs);
        sort_uniq(&mut self.courses);
        sort_uniq(&mut self.writeups);
    }
}
