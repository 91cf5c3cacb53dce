//! 식별자 코덱
//!
//! 취약점 식별자(`PREFIX-YEAR-SEQUENCE`)와 저장소 내 정규 경로 사이의 변환,
//! 식별자 검증, 공개 참조 URL 생성을 담당합니다.
//!
//! # 버킷 디렉토리
//!
//! 시퀀스를 최소 4자리로 0 패딩한 뒤 마지막 3자리를 떼고 `xxx`를 붙입니다.
//!
//! ```
//! use cvelint_linter::cve;
//!
//! assert_eq!(cve::seq_dir(974).unwrap(), "0xxx");
//! assert_eq!(cve::seq_dir(14882).unwrap(), "14xxx");
//! assert_eq!(
//!     cve::to_path("CVE-2020-14882").unwrap(),
//!     "2020/14xxx/CVE-2020-14882.md"
//! );
//! ```

use std::path::Path;

use crate::error::LinterError;

/// 버킷 디렉토리 접미 마커
pub const BUCKET_MARKER: &str = "xxx";

/// 린트 규칙이 요구하는 식별자 접두어
pub const CVE_PREFIX: &str = "CVE";

/// 공개 참조 URL 기본 경로
pub const DEFAULT_BASE_URL: &str = "https://www.cvebase.com/cve";

/// 기본 문서 확장자
pub const DEFAULT_EXT: &str = ".md";

/// 시퀀스 최소 자릿수
const MIN_SEQUENCE_WIDTH: usize = 4;

/// 분해된 식별자
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdParts<'a> {
    /// 접두어 (`CVE`)
    pub prefix: &'a str,
    /// 연도
    pub year: u32,
    /// 시퀀스 번호 (선행 0 제거됨)
    pub sequence: u64,
}

/// 식별자를 접두어, 연도, 시퀀스로 분해합니다.
///
/// 접두어는 임의의 비어있지 않은 문자열이 허용되며, 연도와 시퀀스는 숫자여야 합니다.
pub fn parse(id: &str) -> Result<IdParts<'_>, LinterError> {
    let invalid = |reason: &str| LinterError::InvalidIdentifier {
        id: id.to_owned(),
        reason: reason.to_owned(),
    };

    let mut parts = id.splitn(3, '-');
    let prefix = parts.next().unwrap_or_default();
    let (Some(year), Some(sequence)) = (parts.next(), parts.next()) else {
        return Err(invalid("expected PREFIX-YEAR-SEQUENCE"));
    };
    if prefix.is_empty() {
        return Err(invalid("empty prefix"));
    }
    if !is_digits(year) {
        return Err(invalid("year is not numeric"));
    }
    if !is_digits(sequence) {
        return Err(invalid("sequence is not numeric"));
    }

    let year = year.parse::<u32>().map_err(|e| invalid(&e.to_string()))?;
    let sequence = sequence
        .parse::<u64>()
        .map_err(|e| invalid(&e.to_string()))?;

    Ok(IdParts {
        prefix,
        year,
        sequence,
    })
}

/// 시퀀스 번호를 버킷 디렉토리 이름으로 변환합니다.
pub fn seq_dir(sequence: u64) -> Result<String, LinterError> {
    let padded = format!("{sequence:0width$}", width = MIN_SEQUENCE_WIDTH);
    let head = &padded[..padded.len().saturating_sub(3)];
    if head.is_empty() {
        return Err(LinterError::InvalidIdentifier {
            id: padded.clone(),
            reason: "sequence bucket would be empty".to_owned(),
        });
    }
    Ok(format!("{head}{BUCKET_MARKER}"))
}

/// 식별자를 `year/bucket/ID.md` 형태의 서브트리 기준 경로로 변환합니다.
pub fn to_path(id: &str) -> Result<String, LinterError> {
    to_path_with(id, DEFAULT_EXT)
}

/// [`to_path`]와 같지만 파일 확장자를 지정합니다.
pub fn to_path_with(id: &str, ext: &str) -> Result<String, LinterError> {
    let parts = parse(id)?;
    let bucket = seq_dir(parts.sequence)?;
    Ok(format!("{}/{bucket}/{id}{ext}", parts.year))
}

/// 경로의 파일 이름에서 확장자를 뗀 식별자를 꺼냅니다.
pub fn id_from_path(path: &str) -> Option<&str> {
    Path::new(path).file_stem().and_then(|stem| stem.to_str())
}

/// 린트 규칙: `CVE-` + 4자리 연도 + 4자리 이상 시퀀스
pub fn is_valid(id: &str) -> bool {
    lint_parts(id).is_some()
}

/// URL / export 규칙: [`is_valid`]에 더해 시퀀스의 불필요한 선행 0을 거부합니다.
///
/// 시퀀스는 정확히 4자리이거나, 5자리 이상이면서 0으로 시작하지 않아야 합니다.
pub fn is_strict(id: &str) -> bool {
    match lint_parts(id) {
        Some((_, seq)) => seq.len() == MIN_SEQUENCE_WIDTH || !seq.starts_with('0'),
        None => false,
    }
}

/// 대문자화하고 시퀀스를 다시 패딩하여 식별자를 교정합니다.
///
/// `CVE-2016-01000123` → `CVE-2016-1000123`. 분해할 수 없으면 정리된 입력을 그대로 돌려줍니다.
pub fn fix_id(id: &str) -> String {
    let cleaned = id.trim().to_uppercase();
    match parse(&cleaned) {
        Ok(parts) => format!(
            "{}-{}-{:0width$}",
            parts.prefix,
            parts.year,
            parts.sequence,
            width = MIN_SEQUENCE_WIDTH
        ),
        Err(_) => cleaned,
    }
}

/// 기본 URL로 공개 참조 URL을 생성합니다. 엄격 검증 실패 시 빈 문자열입니다.
pub fn build_url(id: &str) -> String {
    build_url_with(DEFAULT_BASE_URL, id)
}

/// 지정한 기준 경로로 `{base}/{year}/{sequence}` URL을 생성합니다.
pub fn build_url_with(base: &str, id: &str) -> String {
    if !is_strict(id) {
        return String::new();
    }
    match parse(id) {
        Ok(parts) => format!(
            "{}/{}/{}",
            base.trim_end_matches('/'),
            parts.year,
            parts.sequence
        ),
        Err(_) => String::new(),
    }
}

/// `CVE-YYYY-NNNN...` 형태이면 (연도, 시퀀스) 문자열을 돌려줍니다.
fn lint_parts(id: &str) -> Option<(&str, &str)> {
    let rest = id.strip_prefix(CVE_PREFIX)?.strip_prefix('-')?;
    let (year, seq) = rest.split_once('-')?;
    let ok = year.len() == 4
        && is_digits(year)
        && seq.len() >= MIN_SEQUENCE_WIDTH
        && is_digits(seq);
    ok.then_some((year, seq))
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
