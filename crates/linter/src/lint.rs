//! 린트 오케스트레이터
//!
//! # 전체 스윕
//!
//! ```text
//! TreeScan(cve/) ───────► Arc<Mutex<Receiver>> ─┐
//!                                               ├─► worker × N ──► results ──► LintReport
//! TreeScan(researcher/) ► Arc<Mutex<Receiver>> ─┘    (spawn_blocking)
//! ```
//!
//! 각 워커는 취약점 큐를 모두 비운 뒤 연구자 큐로 넘어갑니다.
//! 파일 단위 에러는 기록만 하고 계속 진행하며, 스캔 실패는 전체 실행을 실패시킵니다.
//!
//! # 커밋 스윕
//!
//! 커밋이 추가 / 수정한 파일을 모두 분류한 뒤 git 순서대로 하나씩 처리합니다.
//! 분류할 수 없는 경로가 하나라도 있으면 아무 파일도 건드리지 않고 실패합니다.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use metrics::{counter, histogram};
use serde::Serialize;
use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use cvelint_core::metrics as m;

use crate::config::LinterConfig;
use crate::document::DocumentKind;
use crate::error::LinterError;
use crate::path::PathClassifier;
use crate::repo::Repository;
use crate::scanner::{ScanOptions, ScanOrder, TreeScan};
use crate::transform::{LintOutcome, Transformer};

type SharedQueue = Arc<Mutex<mpsc::Receiver<PathBuf>>>;

/// 파일 단위 실패 기록
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    /// 저장소 기준 상대 경로
    pub path: String,
    /// 에러 메시지
    pub error: String,
}

/// 린트 실행 결과
#[derive(Debug, Clone, Serialize)]
pub struct LintReport {
    /// 시작 시각
    pub started_at: SystemTime,
    /// 종료 시각
    pub finished_at: SystemTime,
    /// 성공한 파일 수
    pub successful: usize,
    /// 실패한 파일 수
    pub failed: usize,
    /// 실제로 재작성된 파일 수
    pub modified: usize,
    /// 경고 수
    pub warnings: usize,
    /// 실패 목록
    pub failures: Vec<FileFailure>,
}

impl LintReport {
    fn start() -> Self {
        let now = SystemTime::now();
        Self {
            started_at: now,
            finished_at: now,
            successful: 0,
            failed: 0,
            modified: 0,
            warnings: 0,
            failures: Vec::new(),
        }
    }

    /// 실행 시간
    pub fn duration(&self) -> Duration {
        self.finished_at
            .duration_since(self.started_at)
            .unwrap_or_default()
    }

    /// 처리한 전체 파일 수
    pub fn total(&self) -> usize {
        self.successful + self.failed
    }

    /// 실패가 없었는지
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }

    fn record(&mut self, path: String, result: Result<LintOutcome, LinterError>) {
        match result {
            Ok(outcome) => {
                self.successful += 1;
                self.warnings += outcome.warnings.len();
                counter!(m::LINT_FILES_TOTAL, m::LABEL_RESULT => "success").increment(1);
                counter!(m::LINT_WARNINGS_TOTAL, m::LABEL_KIND => outcome.kind.as_str())
                    .increment(outcome.warnings.len() as u64);
                if outcome.modified {
                    self.modified += 1;
                    counter!(m::LINT_FILES_MODIFIED_TOTAL).increment(1);
                }
            }
            Err(e) => {
                error!(path = %path, error = %e, "failed to lint file");
                counter!(m::LINT_FILES_TOTAL, m::LABEL_RESULT => "failure").increment(1);
                self.failed += 1;
                self.failures.push(FileFailure {
                    path,
                    error: e.to_string(),
                });
            }
        }
    }

    fn finish(&mut self) {
        self.finished_at = SystemTime::now();
        histogram!(m::LINT_DURATION_SECONDS).record(self.duration().as_secs_f64());
    }
}

/// 워커가 보내는 파일 단위 결과
struct FileResult {
    path: String,
    result: Result<LintOutcome, LinterError>,
}

/// 린트 오케스트레이터
pub struct Linter {
    repo: Repository,
    config: LinterConfig,
    transformer: Arc<Transformer>,
    cancel: CancellationToken,
}

impl Linter {
    /// 설정을 검증하고 린터를 생성합니다.
    pub fn new(
        repo: Repository,
        config: LinterConfig,
        cancel: CancellationToken,
    ) -> Result<Self, LinterError> {
        config.validate()?;
        let classifier = PathClassifier::new(&config)?;
        let transformer = Arc::new(Transformer::new(
            repo.root(),
            classifier,
            config.atomic_write,
        ));
        Ok(Self {
            repo,
            config,
            transformer,
            cancel,
        })
    }

    /// 저장소 핸들
    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    /// 설정
    pub fn config(&self) -> &LinterConfig {
        &self.config
    }

    /// 경로 분류기
    pub fn classifier(&self) -> &PathClassifier {
        self.transformer.classifier()
    }

    /// 두 서브트리의 모든 문서를 `max_workers`개 워커로 린트합니다.
    pub async fn lint_all(&self, max_workers: usize) -> Result<LintReport, LinterError> {
        if max_workers == 0 {
            return Err(LinterError::Config {
                field: "max_workers".to_owned(),
                reason: "must be greater than 0".to_owned(),
            });
        }

        let mut report = LintReport::start();
        info!(
            root = %self.repo.root().display(),
            workers = max_workers,
            "starting full lint"
        );

        // 어느 경로로 반환되든 스캐너가 멈추도록 하위 토큰 사용
        let token = self.cancel.child_token();
        let _guard = token.clone().drop_guard();

        let options = ScanOptions {
            order: ScanOrder::Unsorted,
            suffix: self.config.file_ext.clone(),
            capacity: self.config.channel_capacity,
        };
        let (cve_rx, cve_scan) = TreeScan::spawn(
            self.repo.full_path(&self.config.cve_dir),
            options.clone(),
            token.clone(),
        )
        .into_parts();
        let (researcher_rx, researcher_scan) = TreeScan::spawn(
            self.repo.full_path(&self.config.researcher_dir),
            options,
            token.clone(),
        )
        .into_parts();

        let queues: Arc<[(DocumentKind, SharedQueue); 2]> = Arc::new([
            (DocumentKind::Vulnerability, Arc::new(Mutex::new(cve_rx))),
            (DocumentKind::Researcher, Arc::new(Mutex::new(researcher_rx))),
        ]);

        let (result_tx, mut result_rx) = mpsc::channel(self.config.channel_capacity);
        let mut workers = Vec::with_capacity(max_workers);
        for worker_id in 0..max_workers {
            workers.push(tokio::spawn(run_worker(
                worker_id,
                Arc::clone(&queues),
                Arc::clone(&self.transformer),
                self.repo.clone(),
                result_tx.clone(),
                token.clone(),
            )));
        }
        drop(result_tx);

        while let Some(FileResult { path, result }) = result_rx.recv().await {
            report.record(path, result);
        }

        for worker in workers {
            worker
                .await
                .map_err(|e| LinterError::Task(format!("lint worker failed: {e}")))?;
        }
        // 큐를 닫아 혹시 남은 스캐너를 깨움
        drop(queues);

        if self.cancel.is_cancelled() {
            info!("full lint canceled");
            return Err(LinterError::Canceled);
        }

        cve_scan.wait().await?;
        researcher_scan.wait().await?;

        report.finish();
        info!(
            successful = report.successful,
            failed = report.failed,
            modified = report.modified,
            warnings = report.warnings,
            duration_ms = report.duration().as_millis() as u64,
            "full lint finished"
        );
        Ok(report)
    }

    /// 커밋이 추가 / 수정한 문서만 순차적으로 린트합니다.
    pub async fn lint_commit(&self, commit: &str) -> Result<LintReport, LinterError> {
        let mut report = LintReport::start();
        info!(commit, "starting commit lint");

        let repo = self.repo.clone();
        let revspec = commit.to_owned();
        let files = tokio::task::spawn_blocking(move || repo.changed_files(&revspec))
            .await
            .map_err(|e| LinterError::Task(format!("git task failed: {e}")))??;
        debug!(commit, files = files.len(), "collected changed files");

        let classified = files
            .into_iter()
            .map(|path| {
                let kind = self.classifier().classify(&path)?;
                Ok((path, kind))
            })
            .collect::<Result<Vec<_>, LinterError>>()?;

        for (path, kind) in classified {
            if self.cancel.is_cancelled() {
                return Err(LinterError::Canceled);
            }
            let result = lint_on_blocking(&self.transformer, path.clone(), kind).await;
            report.record(path, result);
        }

        report.finish();
        info!(
            commit,
            successful = report.successful,
            failed = report.failed,
            modified = report.modified,
            "commit lint finished"
        );
        Ok(report)
    }
}

async fn run_worker(
    worker_id: usize,
    queues: Arc<[(DocumentKind, SharedQueue); 2]>,
    transformer: Arc<Transformer>,
    repo: Repository,
    results: mpsc::Sender<FileResult>,
    cancel: CancellationToken,
) {
    for (kind, queue) in queues.iter() {
        loop {
            let next = {
                let mut rx = queue.lock().await;
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => None,
                    path = rx.recv() => path,
                }
            };
            let Some(full) = next else {
                break;
            };

            let Some(path) = repo.rel_path(&full) else {
                debug!(worker_id, path = %full.display(), "path outside repository, skipping");
                continue;
            };
            let result = lint_on_blocking(&transformer, path.clone(), *kind).await;
            if results.send(FileResult { path, result }).await.is_err() {
                return;
            }
        }
        if cancel.is_cancelled() {
            return;
        }
    }
    debug!(worker_id, "lint worker drained all queues");
}

async fn lint_on_blocking(
    transformer: &Arc<Transformer>,
    path: String,
    kind: DocumentKind,
) -> Result<LintOutcome, LinterError> {
    let transformer = Arc::clone(transformer);
    tokio::task::spawn_blocking(move || transformer.lint_file(&path, kind))
        .await
        .map_err(|e| LinterError::Task(format!("lint task failed: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::VersionControl;
    use std::fs;

    struct FixedVcs(Vec<String>);

    impl VersionControl for FixedVcs {
        fn changed_files(&self, _revspec: &str) -> Result<Vec<String>, LinterError> {
            Ok(self.0.clone())
        }
    }

    fn linter(root: &std::path::Path, files: &[&str]) -> Linter {
        let vcs = FixedVcs(files.iter().map(|s| (*s).to_owned()).collect());
        let repo = Repository::with_vcs(root, Arc::new(vcs));
        Linter::new(repo, LinterConfig::default(), CancellationToken::new()).unwrap()
    }

    fn write(root: &std::path::Path, rel: &str, contents: &str) {
        let full = root.join(rel);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, contents).unwrap();
    }

    #[tokio::test]
    async fn lint_all_rejects_zero_workers() {
        let dir = tempfile::tempdir().unwrap();
        let err = linter(dir.path(), &[]).lint_all(0).await.unwrap_err();
        assert!(matches!(err, LinterError::Config { .. }));
    }

    #[tokio::test]
    async fn lint_all_missing_subtree_is_scan_failure() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "researcher/orange.md", "---\nname: O\nalias: orange\ncves: []\n---\n");
        let err = linter(dir.path(), &[]).lint_all(2).await.unwrap_err();
        assert!(matches!(err, LinterError::ScanFailure { .. }), "{err}");
    }

    #[tokio::test]
    async fn lint_all_records_per_file_failures() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "cve/2020/14xxx/CVE-2020-14882.md",
            "---\nid: CVE-2020-14882\npocs: [b, a]\n---\nbody",
        );
        write(dir.path(), "cve/2020/14xxx/CVE-2020-14883.md", "not front matter");
        write(
            dir.path(),
            "researcher/orange.md",
            "---\nname: O\nalias: orange\ncves: [CVE-2020-14882]\n---\n",
        );

        let report = linter(dir.path(), &[]).lint_all(3).await.unwrap();
        assert_eq!(report.successful, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.failures[0].path, "cve/2020/14xxx/CVE-2020-14883.md");
        assert!(!report.is_clean());
    }

    #[tokio::test]
    async fn lint_all_canceled_before_start() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "cve/2020/14xxx/CVE-2020-14882.md", "---\nid: CVE-2020-14882\n---\n");
        fs::create_dir_all(dir.path().join("researcher")).unwrap();

        let cancel = CancellationToken::new();
        let repo = Repository::with_vcs(dir.path(), Arc::new(FixedVcs(vec![])));
        let linter = Linter::new(repo, LinterConfig::default(), cancel.clone()).unwrap();
        cancel.cancel();
        let err = linter.lint_all(2).await.unwrap_err();
        assert!(matches!(err, LinterError::Canceled));
    }

    #[tokio::test]
    async fn lint_commit_processes_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "cve/2016/0xxx/CVE-2016-0974.md",
            "---\nid: CVE-2016-0974\nwriteups: [z, a, z]\n---\n",
        );
        write(
            dir.path(),
            "researcher/orange.md",
            "---\nname: O\nalias: orange\ncves: []\n---\n",
        );
        let l = linter(
            dir.path(),
            &["cve/2016/0xxx/CVE-2016-0974.md", "researcher/orange.md"],
        );

        let report = l.lint_commit("HEAD").await.unwrap();
        assert_eq!(report.successful, 2);
        assert_eq!(report.modified, 1);
        assert_eq!(report.warnings, 1);
        assert_eq!(
            fs::read_to_string(dir.path().join("cve/2016/0xxx/CVE-2016-0974.md")).unwrap(),
            "---\nid: CVE-2016-0974\nwriteups:\n  - a\n  - z\n---\n"
        );
    }

    #[tokio::test]
    async fn lint_commit_unclassifiable_path_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let original = "---\nid: CVE-2016-0974\nwriteups: [z, a]\n---\n";
        write(dir.path(), "cve/2016/0xxx/CVE-2016-0974.md", original);
        let l = linter(dir.path(), &["cve/2016/0xxx/CVE-2016-0974.md", "README.md"]);

        let err = l.lint_commit("HEAD").await.unwrap_err();
        assert!(matches!(err, LinterError::UnclassifiablePath { .. }));
        // 분류 단계에서 실패했으므로 파일은 그대로
        assert_eq!(
            fs::read_to_string(dir.path().join("cve/2016/0xxx/CVE-2016-0974.md")).unwrap(),
            original
        );
    }

    #[test]
    fn report_duration_is_non_negative() {
        let mut report = LintReport::start();
        report.finish();
        assert!(report.duration() >= Duration::ZERO);
        assert_eq!(report.total(), 0);
        assert!(report.is_clean());
    }
}
