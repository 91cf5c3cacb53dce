//! 문서 변환: parse → validate → normalize → write
//!
//! 파일 하나는 첫 실패에서 끝나며 파일 내 재시도는 없습니다.
//! 렌더링은 대상 파일을 건드리기 전에 버퍼에서 끝나므로,
//! 직렬화 실패 시 원본은 그대로 남습니다.
//!
//! 모든 함수는 blocking I/O를 수행하므로 `spawn_blocking` 안에서 호출합니다.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use crate::document::cve::CveDocument;
use crate::document::researcher::ResearcherDocument;
use crate::document::{Document, DocumentKind, DocumentLocation, LintWarning, frontmatter};
use crate::error::LinterError;
use crate::path::PathClassifier;

/// 파일 한 개의 린트 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintOutcome {
    /// 저장소 기준 상대 경로
    pub path: String,
    /// 문서 종류
    pub kind: DocumentKind,
    /// 발생한 경고
    pub warnings: Vec<LintWarning>,
    /// 파일 내용이 실제로 바뀌었는지
    pub modified: bool,
}

/// 저장소 루트 기준으로 문서를 변환하는 실행기
#[derive(Debug, Clone)]
pub struct Transformer {
    root: PathBuf,
    classifier: PathClassifier,
    atomic_write: bool,
}

impl Transformer {
    /// 새 실행기를 생성합니다.
    pub fn new(root: impl Into<PathBuf>, classifier: PathClassifier, atomic_write: bool) -> Self {
        Self {
            root: root.into(),
            classifier,
            atomic_write,
        }
    }

    /// 경로 분류기
    pub fn classifier(&self) -> &PathClassifier {
        &self.classifier
    }

    /// 상대 경로의 문서를 종류에 맞게 변환합니다.
    pub fn lint_file(&self, rel_path: &str, kind: DocumentKind) -> Result<LintOutcome, LinterError> {
        let result = match kind {
            DocumentKind::Vulnerability => self.run::<CveDocument>(rel_path),
            DocumentKind::Researcher => self.run::<ResearcherDocument>(rel_path),
        };
        if result.is_err()
            && let Ok(want) = self.classifier.want_path(rel_path)
            && want != rel_path
        {
            warn!(path = rel_path, want = %want, "document is not at its canonical path");
        }
        result
    }

    fn run<D: Document>(&self, rel_path: &str) -> Result<LintOutcome, LinterError> {
        let full = self.root.join(rel_path);
        let mut file = OpenOptions::new()
            .read(true)
            .write(!self.atomic_write)
            .open(&full)
            .map_err(|e| LinterError::io(rel_path, e))?;

        let mut raw = Vec::new();
        file.read_to_end(&mut raw)
            .map_err(|e| LinterError::io(rel_path, e))?;

        let parse_err = |reason: String| LinterError::ParseFailure {
            path: rel_path.to_owned(),
            reason,
        };
        let text = std::str::from_utf8(&raw).map_err(|e| parse_err(e.to_string()))?;
        let (header, body) = frontmatter::split(text).map_err(|e| parse_err(e.to_string()))?;
        let mut doc = D::parse(header, body, rel_path)?;

        let location = DocumentLocation::new(rel_path, &self.classifier);
        let warnings = doc.validate(&location)?;
        for warning in &warnings {
            warn!(path = rel_path, kind = %D::KIND, warning = %warning, "lint warning");
        }

        doc.normalize();
        let rendered = doc.render(rel_path)?;

        let modified = rendered.as_bytes() != raw.as_slice();
        if modified {
            let written = if self.atomic_write {
                drop(file);
                write_atomic(&full, rendered.as_bytes())
            } else {
                rewrite_in_place(&mut file, rendered.as_bytes())
            };
            written.map_err(|e| LinterError::WriteFailure {
                path: rel_path.to_owned(),
                reason: e.to_string(),
            })?;
            debug!(path = rel_path, "rewrote document");
        }

        Ok(LintOutcome {
            path: rel_path.to_owned(),
            kind: D::KIND,
            warnings,
            modified,
        })
    }
}

/// 형제 임시 파일에 쓰고 원본 권한을 복사한 뒤 rename 합니다.
fn write_atomic(target: &Path, contents: &[u8]) -> std::io::Result<()> {
    let parent = target.parent().unwrap_or_else(|| Path::new("."));
    let permissions = std::fs::metadata(target)?.permissions();

    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(contents)?;
    tmp.as_file().set_permissions(permissions)?;
    tmp.persist(target).map_err(|e| e.error)?;
    Ok(())
}

/// 열린 핸들을 잘라내고 처음부터 다시 씁니다.
fn rewrite_in_place(file: &mut File, contents: &[u8]) -> std::io::Result<()> {
    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    file.write_all(contents)?;
    file.flush()
}
