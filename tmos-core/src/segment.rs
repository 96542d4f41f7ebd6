//! Top-level object segmentation.
//!
//! TMOS has no formal grammar; an object starts at column 0 with a module
//! keyword and ends either on the same line (`{ ... }`) or at a line holding a
//! lone `}` that is followed by the next object or the end of the input. The
//! second condition keeps embedded scripts, whose own `}` lines also sit at
//! column 0, inside their enclosing object.

use std::borrow::Cow;

use serde::Serialize;

use crate::dialect::PatternDialect;

/// One segmented top-level object before name/body decomposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawObject<'a> {
    /// Full object text, header through closing brace and newline.
    pub text: &'a str,
    /// 1-based line of the header.
    pub line: usize,
}

/// Result of segmenting one configuration text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segmented<'a> {
    pub objects: Vec<RawObject<'a>>,
    /// Header lines (1-based) whose object never closed.
    pub unterminated: Vec<usize>,
}

/// A decomposed object: name path plus the raw text between its braces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectRecord {
    pub path: Vec<String>,
    pub body: String,
}

impl ObjectRecord {
    /// Final path segment, the object's canonical name.
    pub fn name(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or_default()
    }
}

/// Normalise `\r\n` and lone `\r` line endings to `\n`.
pub fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    start: usize,
    /// Offset just past the line's newline (or end of input).
    end: usize,
    text: &'a str,
}

fn split_lines(text: &str) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    let mut start = 0;
    for segment in text.split_inclusive('\n') {
        let end = start + segment.len();
        lines.push(Line {
            start,
            end,
            text: segment.trim_end_matches('\n'),
        });
        start = end;
    }
    lines
}

/// Scan `text` for top-level objects using the dialect's module keywords.
pub fn segment<'a>(text: &'a str, dialect: &PatternDialect) -> Segmented<'a> {
    let lines = split_lines(text);
    let mut out = Segmented::default();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        if !is_header(line.text, dialect) {
            i += 1;
            continue;
        }

        if line.text.trim_end().ends_with('}') {
            out.objects.push(RawObject {
                text: &text[line.start..line.end],
                line: i + 1,
            });
            i += 1;
            continue;
        }

        match find_close(&lines, i, dialect) {
            Some(close) => {
                out.objects.push(RawObject {
                    text: &text[line.start..lines[close].end],
                    line: i + 1,
                });
                i = close + 1;
            }
            None => {
                out.unterminated.push(i + 1);
                i += 1;
            }
        }
    }

    out
}

fn is_header(line: &str, dialect: &PatternDialect) -> bool {
    let Some((keyword, _)) = line.split_once(' ') else {
        return false;
    };
    if !dialect.is_module(keyword) {
        return false;
    }
    let trimmed = line.trim_end();
    trimmed.ends_with('{') || trimmed.ends_with('}')
}

fn find_close(lines: &[Line<'_>], header: usize, dialect: &PatternDialect) -> Option<usize> {
    (header + 1..lines.len()).find(|&idx| {
        lines[idx].text.trim_end() == "}" && next_is_boundary(lines, idx + 1, dialect)
    })
}

fn next_is_boundary(lines: &[Line<'_>], from: usize, dialect: &PatternDialect) -> bool {
    lines[from..]
        .iter()
        .find(|line| {
            let trimmed = line.text.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
        .map_or(true, |line| is_header(line.text, dialect))
}

/// Split a raw object into name path and body with the dialect's name/value pattern.
///
/// Returns `None` when the decomposition does not yield exactly a name and a body.
pub fn split_record(raw: &RawObject<'_>, dialect: &PatternDialect) -> Option<ObjectRecord> {
    let caps = dialect.name_value.captures(raw.text)?;
    let name = caps.get(1)?.as_str();
    let body = caps.get(2)?.as_str();
    let path: Vec<String> = name.split_whitespace().map(ToOwned::to_owned).collect();
    if path.is_empty() {
        return None;
    }
    Some(ObjectRecord {
        path,
        body: body.to_string(),
    })
}
