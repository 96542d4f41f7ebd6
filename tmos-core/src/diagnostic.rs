use std::fmt::{self, Display, Formatter};

use serde::Serialize;

/// Recoverable conditions met while parsing or digging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A later file declared a different version; it was skipped.
    VersionMismatch,
    /// No dialect range covered the version; the base dialect was used.
    DialectFallback,
    /// A segmented object could not be split into name and body, or never closed.
    MalformedObjectRecord,
    /// A feature block was present but listed no names.
    EmptyFeatureList,
    /// A reference that should exist in the tree could not be found.
    UnresolvedReference,
}

impl DiagnosticKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticKind::VersionMismatch => "version_mismatch",
            DiagnosticKind::DialectFallback => "dialect_fallback",
            DiagnosticKind::MalformedObjectRecord => "malformed_object_record",
            DiagnosticKind::EmptyFeatureList => "empty_feature_list",
            DiagnosticKind::UnresolvedReference => "unresolved_reference",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            file: None,
            message: message.into(),
        }
    }

    pub fn in_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "[{}] {}: {}", self.kind.as_str(), file, self.message),
            None => write!(f, "[{}] {}", self.kind.as_str(), self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Diagnostic, DiagnosticKind};

    #[test]
    fn display_includes_kind_and_file() {
        let diag = Diagnostic::new(DiagnosticKind::VersionMismatch, "expected 15.1.0.4")
            .in_file("partition.conf");
        assert_eq!(
            diag.to_string(),
            "[version_mismatch] partition.conf: expected 15.1.0.4"
        );
    }

    #[test]
    fn serializes_kind_in_snake_case() {
        let diag = Diagnostic::new(DiagnosticKind::EmptyFeatureList, "rules");
        let json = serde_json::to_value(&diag).expect("json");
        assert_eq!(json["kind"], "empty_feature_list");
        assert!(json.get("file").is_none());
    }
}
