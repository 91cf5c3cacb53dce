//! 트리 스캐너
//!
//! 서브트리를 blocking 태스크에서 순회하며, 파일 이름이 접미사로 끝나는
//! 일반 파일 경로를 bounded 채널로 전달합니다.
//!
//! # 종료 프로토콜
//!
//! - 순회 완료: [`TreeScan::finish`] / [`ScanCompletion::wait`]가 `Ok(count)` 반환
//! - I/O 에러: 순회를 멈추고 `ScanFailure` 반환
//! - 수신 측 close 또는 토큰 취소: 채널이 가득 차 대기 중이어도 즉시 멈추고 `ScanCanceled` 반환

use std::path::{Path, PathBuf};

use metrics::counter;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use walkdir::WalkDir;

use cvelint_core::metrics as m;

use crate::error::LinterError;

/// 디렉토리 항목 순회 순서
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanOrder {
    /// 각 디렉토리의 항목을 이름순으로 정렬 (결정적)
    Sorted,
    /// 파일 시스템 순서
    #[default]
    Unsorted,
}

/// 스캔 옵션
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// 순회 순서
    pub order: ScanOrder,
    /// 파일 이름 접미사 (대소문자 구분)
    pub suffix: String,
    /// 경로 채널 용량
    pub capacity: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            order: ScanOrder::Unsorted,
            suffix: ".md".to_owned(),
            capacity: 64,
        }
    }
}

/// 진행 중인 트리 스캔
pub struct TreeScan {
    paths: mpsc::Receiver<PathBuf>,
    completion: ScanCompletion,
}

/// 스캔 태스크의 완료 핸들
pub struct ScanCompletion {
    root: PathBuf,
    task: JoinHandle<Result<usize, LinterError>>,
}

impl TreeScan {
    /// `root` 순회를 blocking 태스크로 시작합니다.
    ///
    /// tokio 런타임 안에서 호출해야 합니다.
    pub fn spawn(root: impl Into<PathBuf>, options: ScanOptions, cancel: CancellationToken) -> Self {
        let root = root.into();
        let (tx, rx) = mpsc::channel(options.capacity.max(1));
        let handle = Handle::current();
        let walk_root = root.clone();

        let task = tokio::task::spawn_blocking(move || {
            let result = walk(&walk_root, &options, &tx, &cancel, &handle);
            debug!(root = %walk_root.display(), ok = result.is_ok(), "tree scan finished");
            result
        });

        Self {
            paths: rx,
            completion: ScanCompletion { root, task },
        }
    }

    /// 다음 경로를 기다립니다. 스캔이 끝나면 `None`입니다.
    pub async fn next(&mut self) -> Option<PathBuf> {
        self.paths.recv().await
    }

    /// 수신 측을 닫아 더 이상 경로를 읽지 않음을 알립니다.
    pub fn close(&mut self) {
        self.paths.close();
    }

    /// 스캔 루트
    pub fn root(&self) -> &Path {
        &self.completion.root
    }

    /// 수신 측을 닫고 스캔 결과를 기다립니다.
    ///
    /// 모든 경로를 읽기 전에 호출하면 `ScanCanceled`가 됩니다.
    pub async fn finish(self) -> Result<usize, LinterError> {
        drop(self.paths);
        self.completion.wait().await
    }

    /// 수신 채널과 완료 핸들을 분리합니다.
    pub fn into_parts(self) -> (mpsc::Receiver<PathBuf>, ScanCompletion) {
        (self.paths, self.completion)
    }
}

impl ScanCompletion {
    /// 스캔 태스크 종료를 기다리고 발견한 경로 수를 반환합니다.
    pub async fn wait(self) -> Result<usize, LinterError> {
        self.task.await.map_err(|e| {
            LinterError::Task(format!("scan task for {} failed: {e}", self.root.display()))
        })?
    }

    /// 스캔 루트
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// blocking 스레드에서 실행되는 순회 본체
fn walk(
    root: &Path,
    options: &ScanOptions,
    tx: &mpsc::Sender<PathBuf>,
    cancel: &CancellationToken,
    handle: &Handle,
) -> Result<usize, LinterError> {
    let canceled = || LinterError::ScanCanceled {
        root: root.display().to_string(),
    };

    let mut walker = WalkDir::new(root).follow_links(false);
    if options.order == ScanOrder::Sorted {
        walker = walker.sort_by_file_name();
    }

    let mut count = 0usize;
    for entry in walker {
        if cancel.is_cancelled() {
            return Err(canceled());
        }

        let entry = entry.map_err(|e| LinterError::ScanFailure {
            root: root.display().to_string(),
            reason: e.to_string(),
        })?;

        if !entry.file_type().is_file() {
            continue;
        }
        let matches = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.ends_with(options.suffix.as_str()));
        if !matches {
            continue;
        }

        let path = entry.into_path();
        let sent = handle.block_on(async {
            tokio::select! {
                biased;
                () = cancel.cancelled() => false,
                result = tx.send(path) => result.is_ok(),
            }
        });
        if !sent {
            return Err(canceled());
        }

        count += 1;
        counter!(m::SCAN_PATHS_TOTAL).increment(1);
    }

    Ok(count)
}
