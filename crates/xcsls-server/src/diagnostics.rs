use rustc_hash::FxHashSet;
use tower_lsp_server::lsp_types;
use xcsls_compiler::translate;
use xcsls_compiler::CompilerDiagnostic;
use xcsls_compiler::Severity;
use xcsls_compiler::TranslatedDiagnostic;
use xcsls_workspace::FileMetadata;

pub const SOURCE_NAME: &str = "xcsls";

/// Translate a batch of derived-file diagnostics into LSP diagnostics in
/// original-file coordinates. Suppressed codes are dropped, as are
/// diagnostics with no usable mapping.
#[must_use]
pub fn translate_for_file(
    diagnostics: &[CompilerDiagnostic],
    metadata: &FileMetadata,
    source: &str,
    suppressions: &FxHashSet<String>,
) -> Vec<lsp_types::Diagnostic> {
    diagnostics
        .iter()
        .filter(|diagnostic| !suppressions.contains(&diagnostic.code))
        .filter_map(|diagnostic| {
            translate(
                diagnostic,
                &metadata.source_maps,
                &metadata.transformed_content,
                source,
            )
        })
        .map(|translated| to_lsp_diagnostic(&translated))
        .collect()
}

#[must_use]
pub fn to_lsp_diagnostic(translated: &TranslatedDiagnostic) -> lsp_types::Diagnostic {
    lsp_types::Diagnostic {
        range: lsp_types::Range {
            start: lsp_types::Position {
                line: translated.start.line(),
                character: translated.start.column(),
            },
            end: lsp_types::Position {
                line: translated.end.line(),
                character: translated.end.column(),
            },
        },
        severity: Some(to_lsp_severity(translated.severity)),
        code: Some(lsp_types::NumberOrString::String(translated.code.clone())),
        code_description: None,
        source: Some(SOURCE_NAME.to_string()),
        message: translated.message.clone(),
        related_information: None,
        tags: None,
        data: None,
    }
}

fn to_lsp_severity(severity: Severity) -> lsp_types::DiagnosticSeverity {
    match severity {
        Severity::Error => lsp_types::DiagnosticSeverity::ERROR,
        Severity::Warning => lsp_types::DiagnosticSeverity::WARNING,
        Severity::Info => lsp_types::DiagnosticSeverity::INFORMATION,
    }
}
