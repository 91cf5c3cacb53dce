//! PoC export
//!
//! 취약점 서브트리를 정렬 순서로 순회하여 PoC 링크가 있는 레코드를
//! 한 줄에 하나씩 JSON으로 기록합니다 (NDJSON).
//!
//! ```text
//! {"cve_id":"CVE-2020-14882","url":"https://www.cvebase.com/cve/2020/14882","pocs":["..."]}
//! ```

use std::path::{Path, PathBuf};

use metrics::counter;
use serde::Serialize;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use cvelint_core::metrics as m;

use crate::config::LinterConfig;
use crate::cve;
use crate::document::cve::CveDocument;
use crate::document::{Document, frontmatter};
use crate::error::LinterError;
use crate::repo::Repository;
use crate::scanner::{ScanOptions, ScanOrder, TreeScan};

/// export 한 줄
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRecord {
    pub cve_id: String,
    pub url: String,
    pub pocs: Vec<String>,
}

/// export 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportReport {
    /// 읽은 취약점 파일 수
    pub scanned: usize,
    /// 기록한 레코드 수
    pub exported: usize,
    /// 출력 파일 경로
    pub output: PathBuf,
}

/// PoC export 실행기
pub struct Exporter {
    repo: Repository,
    config: LinterConfig,
    cancel: CancellationToken,
}

impl Exporter {
    /// 새 실행기를 생성합니다.
    pub fn new(
        repo: Repository,
        config: LinterConfig,
        cancel: CancellationToken,
    ) -> Result<Self, LinterError> {
        config.validate()?;
        Ok(Self {
            repo,
            config,
            cancel,
        })
    }

    /// 레코드를 `output` 파일에 기록합니다. 기존 파일은 덮어씁니다.
    pub async fn export_to(&self, output: impl AsRef<Path>) -> Result<ExportReport, LinterError> {
        let output = output.as_ref();
        let file = tokio::fs::File::create(output)
            .await
            .map_err(|e| LinterError::io(output.display().to_string(), e))?;
        let mut writer = BufWriter::new(file);

        let (scanned, exported) = self.write_records(&mut writer).await?;
        writer
            .flush()
            .await
            .map_err(|e| LinterError::io(output.display().to_string(), e))?;

        info!(scanned, exported, output = %output.display(), "export finished");
        Ok(ExportReport {
            scanned,
            exported,
            output: output.to_path_buf(),
        })
    }

    /// 임의의 writer에 레코드를 기록하고 `(scanned, exported)`를 반환합니다.
    pub async fn write_records<W>(&self, writer: &mut W) -> Result<(usize, usize), LinterError>
    where
        W: tokio::io::AsyncWrite + Unpin,
    {
        let root = self.repo.full_path(&self.config.cve_dir);
        let options = ScanOptions {
            order: ScanOrder::Sorted,
            suffix: self.config.file_ext.clone(),
            capacity: self.config.channel_capacity,
        };
        let token = self.cancel.child_token();
        let _guard = token.clone().drop_guard();
        let mut scan = TreeScan::spawn(root, options, token);

        let mut scanned = 0usize;
        let mut exported = 0usize;
        while let Some(full) = scan.next().await {
            let rel = self
                .repo
                .rel_path(&full)
                .unwrap_or_else(|| full.display().to_string());
            scanned += 1;

            let Some(record) = read_record(&full, &rel, &self.config.base_url).await? else {
                debug!(path = %rel, "no pocs, skipping");
                continue;
            };

            let mut line = serde_json::to_vec(&record).map_err(|e| LinterError::WriteFailure {
                path: rel.clone(),
                reason: e.to_string(),
            })?;
            line.push(b'\n');
            writer
                .write_all(&line)
                .await
                .map_err(|e| LinterError::io(rel.clone(), e))?;

            exported += 1;
            counter!(m::EXPORT_RECORDS_TOTAL).increment(1);
        }

        if self.cancel.is_cancelled() {
            return Err(LinterError::Canceled);
        }
        scan.finish().await?;
        Ok((scanned, exported))
    }
}

async fn read_record(
    full: &Path,
    rel: &str,
    base_url: &str,
) -> Result<Option<ExportRecord>, LinterError> {
    let text = tokio::fs::read_to_string(full)
        .await
        .map_err(|e| LinterError::io(rel, e))?;
    let (header, body) = frontmatter::split(&text).map_err(|e| LinterError::ParseFailure {
        path: rel.to_owned(),
        reason: e.to_string(),
    })?;
    let doc = CveDocument::parse(header, body, rel)?;
    if doc.pocs.is_empty() {
        return Ok(None);
    }

    Ok(Some(ExportRecord {
        url: cve::build_url_with(base_url, &doc.id),
        cve_id: doc.id,
        pocs: doc.pocs,
    }))
}
