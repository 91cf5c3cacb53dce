//! 메트릭 상수
//!
//! 모든 메트릭의 이름을 중앙에서 정의합니다.
//! 각 모듈은 이 상수를 사용하여 `metrics::counter!()`,
//! `metrics::histogram!()` 매크로를 호출합니다.
//! 레코더가 설치되지 않으면 모든 호출은 no-op입니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `cvelint_`
//! - 모듈명: `lint_`, `scan_`, `export_`
//! - 접미어: `_total` (counter), `_seconds` (histogram)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(cvelint_core::metrics::SCAN_PATHS_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 결과 레이블 키 (success, failure)
pub const LABEL_RESULT: &str = "result";

/// 문서 종류 레이블 키 (cve, researcher)
pub const LABEL_KIND: &str = "kind";

// ─── Lint 메트릭 ───────────────────────────────────────────────────

/// Lint: 처리된 파일 수 (counter, label: result)
pub const LINT_FILES_TOTAL: &str = "cvelint_lint_files_total";

/// Lint: 발생한 경고 수 (counter, label: kind)
pub const LINT_WARNINGS_TOTAL: &str = "cvelint_lint_warnings_total";

/// Lint: 실제로 재작성된 파일 수 (counter)
pub const LINT_FILES_MODIFIED_TOTAL: &str = "cvelint_lint_files_modified_total";

/// Lint: 실행 1회 소요 시간 (histogram, 초)
pub const LINT_DURATION_SECONDS: &str = "cvelint_lint_duration_seconds";

// ─── Scanner 메트릭 ────────────────────────────────────────────────

/// Scanner: 발견된 경로 수 (counter)
pub const SCAN_PATHS_TOTAL: &str = "cvelint_scan_paths_total";

// ─── Export 메트릭 ─────────────────────────────────────────────────

/// Export: 기록된 레코드 수 (counter)
pub const EXPORT_RECORDS_TOTAL: &str = "cvelint_export_records_total";

/// 모든 메트릭의 설명을 등록합니다.
///
/// 레코더 설치 후 한 번 호출합니다. 레코더가 없으면 아무 일도 하지 않습니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_histogram};

    describe_counter!(
        LINT_FILES_TOTAL,
        "Documents processed by the linter, labeled by result"
    );
    describe_counter!(LINT_WARNINGS_TOTAL, "Non-fatal lint warnings emitted");
    describe_counter!(
        LINT_FILES_MODIFIED_TOTAL,
        "Documents whose bytes changed after normalization"
    );
    describe_histogram!(LINT_DURATION_SECONDS, "Wall time of a lint run in seconds");
    describe_counter!(SCAN_PATHS_TOTAL, "Paths discovered by tree scans");
    describe_counter!(EXPORT_RECORDS_TOTAL, "Records written by export");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_metric_names_have_prefix() {
        let names = [
            LINT_FILES_TOTAL,
            LINT_WARNINGS_TOTAL,
            LINT_FILES_MODIFIED_TOTAL,
            LINT_DURATION_SECONDS,
            SCAN_PATHS_TOTAL,
            EXPORT_RECORDS_TOTAL,
        ];
        for name in names {
            assert!(name.starts_with("cvelint_"), "{name} lacks prefix");
        }
    }

    #[test]
    fn describe_all_does_not_panic() {
        describe_all();
    }

    #[test]
    fn label_keys_are_lowercase() {
        for label in [LABEL_RESULT, LABEL_KIND] {
            assert_eq!(label, label.to_lowercase());
        }
    }

    #[test]
    fn counters_end_with_total() {
        for name in [
            LINT_FILES_TOTAL,
            LINT_WARNINGS_TOTAL,
            SCAN_PATHS_TOTAL,
            EXPORT_RECORDS_TOTAL,
        ] {
            assert!(name.ends_with("_total"));
        }
    }
}
