//! front matter 코덱
//!
//! ```text
//! ---
//! id: CVE-2020-14882
//! pocs:
//!   - https://github.com/jas502n/CVE-2020-14882
//! ---
//! 본문 (바이트 그대로 보존)
//! ```
//!
//! [`split`]은 구분선 사이의 헤더를 YAML 매핑으로 파싱하고 본문을 그대로 돌려줍니다.
//! [`render`]는 2칸 들여쓰기 블록 스타일로 매핑을 출력합니다.
//! 스칼라 인용 규칙은 `serde_yaml`을 따릅니다.

use serde_yaml::{Mapping, Value};

/// front matter 구분선
pub const DELIMITER: &str = "---";

const BOM: char = '\u{feff}';
const INDENT: usize = 2;

/// front matter 코덱 에러
#[derive(Debug, thiserror::Error)]
pub enum FrontMatterError {
    /// 첫 줄이 구분선이 아님
    #[error("missing opening '---' delimiter")]
    MissingOpening,

    /// 닫는 구분선이 없음
    #[error("missing closing '---' delimiter")]
    MissingClosing,

    /// 헤더가 매핑이 아님
    #[error("front matter is not a mapping")]
    NotMapping,

    /// YAML 구문 / 직렬화 에러
    #[error("invalid yaml: {0}")]
    Yaml(String),
}

/// 문서를 헤더 매핑과 본문으로 분리합니다.
///
/// 첫 줄(BOM 허용)과 이후 첫 번째로 정확히 `---`인 줄 사이가 헤더입니다.
/// 두 구분선 모두 끝의 `\r`을 허용하며, 본문은 닫는 구분선 다음 바이트부터입니다.
pub fn split(text: &str) -> Result<(Mapping, &str), FrontMatterError> {
    let text = text.strip_prefix(BOM).unwrap_or(text);

    let (first, mut rest) = next_line(text);
    if !is_delimiter(first) {
        return Err(FrontMatterError::MissingOpening);
    }

    let header_start = rest;
    let mut header_len = 0usize;
    let body = loop {
        if rest.is_empty() {
            return Err(FrontMatterError::MissingClosing);
        }
        let (line, after) = next_line(rest);
        if is_delimiter(line) {
            break after;
        }
        header_len += rest.len() - after.len();
        rest = after;
    };

    let header = parse_header(&header_start[..header_len])?;
    Ok((header, body))
}

/// 헤더 텍스트를 매핑으로 파싱합니다. 비어 있으면 빈 매핑입니다.
pub fn parse_header(header: &str) -> Result<Mapping, FrontMatterError> {
    if header.trim().is_empty() {
        return Ok(Mapping::new());
    }
    match serde_yaml::from_str::<Value>(header) {
        Ok(Value::Mapping(map)) => Ok(map),
        Ok(Value::Null) => Ok(Mapping::new()),
        Ok(_) => Err(FrontMatterError::NotMapping),
        Err(e) => Err(FrontMatterError::Yaml(e.to_string())),
    }
}

/// 매핑을 블록 스타일 YAML로 출력합니다.
///
/// 시퀀스 항목은 `  - item`, 중첩 매핑은 2칸 들여쓰기, 빈 시퀀스는 `[]`입니다.
pub fn render(map: &Mapping) -> Result<String, FrontMatterError> {
    let mut out = String::new();
    emit_mapping(&mut out, map, 0)?;
    Ok(out)
}

/// `---\n` + 헤더 + `---\n` + 본문을 조립합니다.
pub fn render_document(map: &Mapping, body: &str) -> Result<String, FrontMatterError> {
    let header = render(map)?;
    let mut out = String::with_capacity(header.len() + body.len() + 8);
    out.push_str(DELIMITER);
    out.push('\n');
    out.push_str(&header);
    out.push_str(DELIMITER);
    out.push('\n');
    out.push_str(body);
    Ok(out)
}

fn next_line(s: &str) -> (&str, &str) {
    match s.find('\n') {
        Some(i) => (&s[..i], &s[i + 1..]),
        None => (s, ""),
    }
}

fn is_delimiter(line: &str) -> bool {
    line.strip_suffix('\r').unwrap_or(line) == DELIMITER
}

fn emit_mapping(out: &mut String, map: &Mapping, indent: usize) -> Result<(), FrontMatterError> {
    let pad = " ".repeat(indent);
    for (key, value) in map {
        let key = scalar(key, indent)?;
        match value {
            Value::Sequence(seq) if seq.is_empty() => {
                out.push_str(&format!("{pad}{key}: []\n"));
            }
            Value::Sequence(seq) => {
                out.push_str(&format!("{pad}{key}:\n"));
                for item in seq {
                    emit_item(out, item, indent + INDENT)?;
                }
            }
            Value::Mapping(inner) if inner.is_empty() => {
                out.push_str(&format!("{pad}{key}: {{}}\n"));
            }
            Value::Mapping(inner) => {
                out.push_str(&format!("{pad}{key}:\n"));
                emit_mapping(out, inner, indent + INDENT)?;
            }
            other => {
                let value = scalar(other, indent)?;
                out.push_str(&format!("{pad}{key}: {value}\n"));
            }
        }
    }
    Ok(())
}

fn emit_item(out: &mut String, item: &Value, indent: usize) -> Result<(), FrontMatterError> {
    let pad = " ".repeat(indent);
    match item {
        Value::Sequence(seq) if seq.is_empty() => out.push_str(&format!("{pad}- []\n")),
        Value::Mapping(map) if map.is_empty() => out.push_str(&format!("{pad}- {{}}\n")),
        Value::Sequence(seq) => {
            out.push_str(&format!("{pad}-\n"));
            for inner in seq {
                emit_item(out, inner, indent + INDENT)?;
            }
        }
        Value::Mapping(map) => {
            out.push_str(&format!("{pad}-\n"));
            emit_mapping(out, map, indent + INDENT)?;
        }
        other => {
            let value = scalar(other, indent)?;
            out.push_str(&format!("{pad}- {value}\n"));
        }
    }
    Ok(())
}

/// serde_yaml로 스칼라를 직렬화합니다.
///
/// 여러 줄 블록 스칼라의 이어지는 줄은 현재 들여쓰기만큼 밀어 넣습니다.
fn scalar(value: &Value, indent: usize) -> Result<String, FrontMatterError> {
    let rendered = serde_yaml::to_string(value).map_err(|e| FrontMatterError::Yaml(e.to_string()))?;
    let rendered = rendered.strip_suffix('\n').unwrap_or(&rendered);
    if !rendered.contains('\n') {
        return Ok(rendered.to_owned());
    }

    let pad = " ".repeat(indent);
    let mut lines = rendered.split('\n');
    let mut out = lines.next().unwrap_or_default().to_owned();
    for line in lines {
        out.push('\n');
        if !line.is_empty() {
            out.push_str(&pad);
        }
        out.push_str(line);
    }
    Ok(out)
}
