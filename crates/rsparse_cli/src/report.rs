//! Rendering parse results for the terminal and as JSON.

use miette::{LabeledSpan, MietteDiagnostic, NamedSource, Report, Severity};
use rsparse_ast::{ScriptKind, SourceFile};
use rsparse_diagnostics::{Diagnostic, DiagnosticCategory};
use serde::Serialize;

/// Machine-readable summary of one parsed file.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSummary {
    pub file: String,
    pub script_kind: ScriptKind,
    pub statements: usize,
    pub node_count: usize,
    pub identifier_count: usize,
    pub is_external_module: bool,
    pub is_declaration_file: bool,
    pub pragmas: Vec<String>,
    pub diagnostics: Vec<DiagnosticSummary>,
    pub js_doc_diagnostics: Vec<DiagnosticSummary>,
}

#[derive(Debug, Serialize)]
pub struct DiagnosticSummary {
    pub start: u32,
    pub length: u32,
    pub code: u32,
    pub category: String,
    pub message: String,
}

impl From<&Diagnostic> for DiagnosticSummary {
    fn from(diagnostic: &Diagnostic) -> Self {
        Self {
            start: diagnostic.start(),
            length: diagnostic.length(),
            code: diagnostic.code,
            category: diagnostic.category.to_string(),
            message: diagnostic.message_text.clone(),
        }
    }
}

impl FileSummary {
    pub fn new(file: &SourceFile) -> Self {
        Self {
            file: file.file_name.clone(),
            script_kind: file.script_kind,
            statements: file.statements().len(),
            node_count: file.node_count,
            identifier_count: file.identifier_count,
            is_external_module: file.is_external_module(),
            is_declaration_file: file.is_declaration_file,
            pragmas: file.pragmas.iter().map(|p| p.name.clone()).collect(),
            diagnostics: file.parse_diagnostics.iter().map(DiagnosticSummary::from).collect(),
            js_doc_diagnostics: file.js_doc_diagnostics.iter().map(DiagnosticSummary::from).collect(),
        }
    }
}

fn severity(category: DiagnosticCategory) -> Severity {
    match category {
        DiagnosticCategory::Error => Severity::Error,
        DiagnosticCategory::Warning => Severity::Warning,
        DiagnosticCategory::Suggestion | DiagnosticCategory::Message => Severity::Advice,
    }
}

/// Convert a parser diagnostic into a labelled miette diagnostic over `text`.
pub fn to_miette(diagnostic: &Diagnostic, text: &str) -> MietteDiagnostic {
    let start = (diagnostic.start() as usize).min(text.len());
    let end = (start + diagnostic.length() as usize).min(text.len());
    let mut out = MietteDiagnostic::new(diagnostic.message_text.clone())
        .with_code(format!("RS{}", diagnostic.code))
        .with_severity(severity(diagnostic.category))
        .with_label(LabeledSpan::at(start..end, "here"));
    if !diagnostic.related_information.is_empty() {
        let related: Vec<&str> = diagnostic
            .related_information
            .iter()
            .map(|r| r.message_text.as_str())
            .collect();
        out = out.with_help(related.join("\n"));
    }
    out
}

/// Print every parse and documentation diagnostic of `file` to stderr.
pub fn print_diagnostics(file: &SourceFile) {
    for diagnostic in file.parse_diagnostics.iter().chain(&file.js_doc_diagnostics) {
        let report = Report::new(to_miette(diagnostic, &file.text))
            .with_source_code(NamedSource::new(file.file_name.clone(), file.text.clone()));
        eprintln!("{report:?}");
    }
}

/// A file that could not be read.
pub fn io_failure(err: &rsparse_core::Error) -> MietteDiagnostic {
    MietteDiagnostic::new(err.to_string())
        .with_code("rsp::io")
        .with_severity(Severity::Error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rsparse_parser::{parse_source_file, ParseOptions};

    fn parse(name: &str, text: &str) -> SourceFile {
        parse_source_file(name, text, ParseOptions::for_file_name(name))
    }

    #[test]
    fn test_expression_expected_label() {
        let file = parse("a.ts", "let x = ");
        let diagnostic = to_miette(&file.parse_diagnostics[0], &file.text);
        assert_eq!(diagnostic.message, "Expression expected.");
        assert_eq!(diagnostic.code.as_deref(), Some("RS1109"));
        assert_eq!(diagnostic.severity, Some(Severity::Error));
        let labels = diagnostic.labels.expect("labelled");
        assert_eq!(labels[0].offset(), 8);
    }

    #[test]
    fn test_label_is_clamped_to_text() {
        let file = parse("a.ts", "[1, 2");
        for diagnostic in &file.parse_diagnostics {
            let converted = to_miette(diagnostic, &file.text);
            for label in converted.labels.unwrap_or_default() {
                assert!(label.offset() + label.len() <= file.text.len());
            }
        }
    }

    #[test]
    fn test_summary_counts() {
        let file = parse("m.ts", "/// <reference path=\"x.d.ts\" />\nexport const a = 1;\nfoo(");
        let summary = FileSummary::new(&file);
        assert_eq!(summary.statements, 2);
        assert!(summary.is_external_module);
        assert!(!summary.is_declaration_file);
        assert_eq!(summary.pragmas, vec!["reference".to_string()]);
        assert_eq!(summary.diagnostics.len(), file.parse_diagnostics.len());
        assert!(!summary.diagnostics.is_empty());

        let json = serde_json::to_value(&summary).expect("serializable");
        assert_eq!(json["scriptKind"], "ts");
        assert_eq!(json["isExternalModule"], true);
    }

    #[test]
    fn test_io_failure_code() {
        let err = rsparse_core::Error::TextTooLarge(usize::MAX);
        let diagnostic = io_failure(&err);
        assert_eq!(diagnostic.code.as_deref(), Some("rsp::io"));
        assert_eq!(diagnostic.message, err.to_string());
    }
}
