use std::time::Instant;

use serde::Serialize;
use thiserror::Error;

use crate::config::ParsedConfig;
use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::dialect::select_dialect;
use crate::index::TreeIndex;
use crate::segment::{normalize_line_endings, segment, split_record};
use crate::stats::{count_objects, ParseStats};
use crate::tree::ConfigTree;
use crate::version::detect_version;

/// Errors that abort a whole parse pass.
#[derive(Debug, Error)]
pub enum ParseError {
    /// No files were supplied.
    #[error("no configuration files to parse")]
    NoInput,
    /// A file carries no `#TMSH-VERSION:` header, so it is not a config dump.
    #[error("{file}: missing #TMSH-VERSION header, not a TMOS configuration")]
    MissingVersion { file: String },
}

/// One configuration text handed in by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub file_name: String,
    pub size: u64,
    pub content: String,
}

impl ConfigFile {
    pub fn new(file_name: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            file_name: file_name.into(),
            size: content.len() as u64,
            content,
        }
    }

    pub fn source_info(&self) -> SourceInfo {
        SourceInfo {
            file_name: self.file_name.clone(),
            size: self.size,
        }
    }
}

/// Name and size of a file accepted into the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceInfo {
    pub file_name: String,
    pub size: u64,
}

/// Progress reported to a parse observer, in processing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseEvent<'a> {
    File { name: &'a str, num: usize, of: usize },
    Object { name: &'a str, num: usize, of: usize },
}

/// Parse a set of configuration files into one tree.
pub fn parse(files: &[ConfigFile]) -> Result<ParsedConfig, ParseError> {
    parse_with_observer(files, |_| {})
}

/// Like [`parse`], reporting each file and object to `observer` as it is processed.
///
/// The first file fixes the version and dialect. A later file declaring any
/// other version is skipped whole and recorded as a diagnostic.
pub fn parse_with_observer<F>(
    files: &[ConfigFile],
    mut observer: F,
) -> Result<ParsedConfig, ParseError>
where
    F: FnMut(ParseEvent<'_>),
{
    let started = Instant::now();
    let Some(first) = files.first() else {
        return Err(ParseError::NoInput);
    };

    let version = detect_version(&first.content)
        .ok_or_else(|| ParseError::MissingVersion {
            file: first.file_name.clone(),
        })?
        .to_string();
    let selection = select_dialect(&version);
    let dialect = selection.dialect;

    let mut diagnostics = Vec::new();
    if selection.exact {
        tracing::info!(%version, dialect = dialect.name, "selected dialect");
    } else {
        tracing::warn!(
            %version,
            dialect = dialect.name,
            "no dialect registered for version, using base"
        );
        diagnostics.push(
            Diagnostic::new(
                DiagnosticKind::DialectFallback,
                format!("no dialect registered for {version}, using {}", dialect.name),
            )
            .in_file(&first.file_name),
        );
    }

    let mut tree = ConfigTree::new();
    let mut stats = ParseStats::default();
    let mut sources = Vec::new();

    for (idx, file) in files.iter().enumerate() {
        observer(ParseEvent::File {
            name: &file.file_name,
            num: idx + 1,
            of: files.len(),
        });

        let file_version =
            detect_version(&file.content).ok_or_else(|| ParseError::MissingVersion {
                file: file.file_name.clone(),
            })?;
        if file_version != version {
            tracing::warn!(
                file = %file.file_name,
                expected = %version,
                found = file_version,
                "skipping file with mismatched version"
            );
            diagnostics.push(
                Diagnostic::new(
                    DiagnosticKind::VersionMismatch,
                    format!("expected version {version}, found {file_version}"),
                )
                .in_file(&file.file_name),
            );
            stats.files_skipped += 1;
            continue;
        }

        let text = normalize_line_endings(&file.content);
        let segmented = segment(&text, dialect);
        for line in &segmented.unterminated {
            tracing::warn!(file = %file.file_name, line, "object never closes");
            diagnostics.push(
                Diagnostic::new(
                    DiagnosticKind::MalformedObjectRecord,
                    format!("object at line {line} never closes"),
                )
                .in_file(&file.file_name),
            );
        }

        let total = segmented.objects.len();
        let mut records = Vec::with_capacity(total);
        for (num, raw) in segmented.objects.iter().enumerate() {
            match split_record(raw, dialect) {
                Some(record) => {
                    let name = record.path.join(" ");
                    tracing::debug!(object = %name, "segmented object");
                    observer(ParseEvent::Object {
                        name: &name,
                        num: num + 1,
                        of: total,
                    });
                    records.push(record);
                }
                None => {
                    let header = raw.text.lines().next().unwrap_or_default();
                    tracing::warn!(
                        file = %file.file_name,
                        line = raw.line,
                        header,
                        "dropping malformed object"
                    );
                    diagnostics.push(
                        Diagnostic::new(
                            DiagnosticKind::MalformedObjectRecord,
                            format!("cannot split object at line {}: {header}", raw.line),
                        )
                        .in_file(&file.file_name),
                    );
                }
            }
        }

        stats.object_count += records.len();
        stats.files_parsed += 1;
        tree.merge(ConfigTree::from_records(records));
        sources.push(file.source_info());
    }

    let index = TreeIndex::build(&tree);
    stats.objects = count_objects(&tree);
    stats.parse_time_ms = started.elapsed().as_secs_f64() * 1000.0;
    tracing::info!(
        objects = stats.object_count,
        files = stats.files_parsed,
        skipped = stats.files_skipped,
        "parse complete"
    );

    Ok(ParsedConfig {
        tree,
        index,
        version,
        selection,
        sources,
        stats,
        diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::{parse, parse_with_observer, ConfigFile, ParseError, ParseEvent};
    use crate::diagnostic::DiagnosticKind;

    const CONF: &str = "#TMSH-VERSION: 15.1.0.4\n\nltm node /Common/n1 {\n    address 10.0.0.1\n}\nltm pool /Common/p1 { }\n";

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(parse(&[]), Err(ParseError::NoInput)));
    }

    #[test]
    fn missing_version_aborts() {
        let files = [ConfigFile::new("bad.conf", "ltm node /Common/n1 { }\n")];
        let err = parse(&files).expect_err("fatal");
        assert!(matches!(err, ParseError::MissingVersion { ref file } if file == "bad.conf"));
    }

    #[test]
    fn missing_version_in_later_file_aborts() {
        let files = [
            ConfigFile::new("a.conf", CONF),
            ConfigFile::new("b.conf", "ltm node /Common/n2 { }\n"),
        ];
        assert!(matches!(
            parse(&files),
            Err(ParseError::MissingVersion { .. })
        ));
    }

    #[test]
    fn counts_objects_and_sources() {
        let parsed = parse(&[ConfigFile::new("bigip.conf", CONF)]).expect("parse");
        assert_eq!(parsed.stats().object_count, 2);
        assert_eq!(parsed.stats().files_parsed, 1);
        assert_eq!(parsed.sources()[0].size, CONF.len() as u64);
        assert_eq!(parsed.version(), "15.1.0.4");
        assert!(parsed.diagnostics().is_empty());
    }

    #[test]
    fn observer_sees_files_then_objects_in_order() {
        let mut events = Vec::new();
        parse_with_observer(&[ConfigFile::new("bigip.conf", CONF)], |event| {
            events.push(match event {
                ParseEvent::File { name, num, of } => format!("file {name} {num}/{of}"),
                ParseEvent::Object { name, num, of } => format!("object {name} {num}/{of}"),
            });
        })
        .expect("parse");
        assert_eq!(
            events,
            vec![
                "file bigip.conf 1/1",
                "object ltm node /Common/n1 1/2",
                "object ltm pool /Common/p1 2/2",
            ]
        );
    }

    #[test]
    fn unregistered_version_records_fallback() {
        let conf = CONF.replace("15.1.0.4", "9.4.8");
        let parsed = parse(&[ConfigFile::new("old.conf", conf)]).expect("parse");
        assert!(!parsed.selection().exact);
        assert_eq!(parsed.diagnostics()[0].kind, DiagnosticKind::DialectFallback);
        assert_eq!(parsed.stats().object_count, 2);
    }

    #[test]
    fn crlf_input_is_normalised() {
        let conf = CONF.replace('\n', "\r\n");
        let parsed = parse(&[ConfigFile::new("win.conf", conf)]).expect("parse");
        assert_eq!(
            parsed.tree().leaf(&["ltm", "node", "/Common/n1"]),
            Some("\n    address 10.0.0.1\n")
        );
    }

    #[test]
    fn malformed_record_is_dropped_and_reported() {
        let conf = format!("{CONF}ltm pool \"/Common/quoted name\" {{ }}\n");
        let parsed = parse(&[ConfigFile::new("bigip.conf", conf)]).expect("parse");
        assert_eq!(parsed.stats().object_count, 2);
        assert_eq!(
            parsed.diagnostics()[0].kind,
            DiagnosticKind::MalformedObjectRecord
        );
    }
}
