use camino::Utf8PathBuf;
use serde::Deserialize;
use serde::Serialize;
use xcsls_source::ByteOffset;
use xcsls_source::LineCol;
use xcsls_source::LineIndex;
use xcsls_source::SourceMap;
use xcsls_source::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// A diagnostic reported by the downstream compiler against a derived
/// file, in derived-file byte coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompilerDiagnostic {
    pub file: Utf8PathBuf,
    pub start: u32,
    pub length: u32,
    pub code: String,
    pub severity: Severity,
    pub message: String,
}

/// The same diagnostic re-expressed in original-file coordinates.
#[derive(Debug, Clone, Serialize)]
pub struct TranslatedDiagnostic {
    pub span: Span,
    pub start: LineCol,
    pub end: LineCol,
    pub code: String,
    pub severity: Severity,
    pub message: String,
}

/// Project a derived-file diagnostic back onto the original source.
///
/// When the diagnostic sits inside a property container (an object
/// creation whose type name ends with `Props`), the range widens to the
/// owning tag name so the squiggle lands somewhere meaningful. Returns
/// `None` when no mapping precedes the position; dropping beats
/// mis-reporting.
#[must_use]
pub fn translate(
    diagnostic: &CompilerDiagnostic,
    map: &SourceMap,
    transformed: &str,
    source: &str,
) -> Option<TranslatedDiagnostic> {
    let (lookup_pos, is_prop_error) =
        match find_property_container(transformed, diagnostic.start as usize) {
            Some(container_start) => (u32::try_from(container_start).unwrap_or(u32::MAX), true),
            None => (diagnostic.start, false),
        };

    let entry = map.resolve(lookup_pos)?;

    let rel = if is_prop_error {
        0
    } else {
        lookup_pos.saturating_sub(entry.transformed_start)
    };
    let source_len = u32::try_from(source.len()).unwrap_or(u32::MAX);
    let orig_pos = entry.original_start.saturating_add(rel).min(source_len);

    let width = if is_prop_error {
        tag_name_width(source, orig_pos as usize)
    } else {
        diagnostic.length.max(1)
    };
    let span = Span::new(orig_pos, width.min(source_len.saturating_sub(orig_pos)).max(1));

    let line_index = LineIndex::from_text(source);
    let start = line_index.to_line_col(ByteOffset::new(span.start()));
    let end = line_index.to_line_col(ByteOffset::new(span.end()));

    Some(TranslatedDiagnostic {
        span,
        start,
        end,
        code: diagnostic.code.clone(),
        severity: diagnostic.severity,
        message: diagnostic.message.clone(),
    })
}

/// Detect whether the diagnostic points at a property-container header —
/// the `new` keyword or the `<Ident>Props` type name of an object
/// creation — and return the offset of its `new`. A position merely
/// inside the initializer braces does not count: those diagnostics keep
/// their exact projection.
fn find_property_container(transformed: &str, offset: usize) -> Option<usize> {
    let bytes = transformed.as_bytes();
    let len = bytes.len();

    let mut word_start = offset.min(len);
    while word_start > 0 && is_ident_byte(bytes[word_start - 1]) {
        word_start -= 1;
    }
    let mut word_end = offset.min(len);
    while word_end < len && is_ident_byte(bytes[word_end]) {
        word_end += 1;
    }
    let word = &transformed[word_start..word_end];

    if word == "new" {
        let mut i = word_end;
        while i < len && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        let type_start = i;
        while i < len && is_ident_byte(bytes[i]) {
            i += 1;
        }
        let type_name = &transformed[type_start..i];
        if type_name.ends_with("Props") && type_name != "Props" {
            return Some(word_start);
        }
        return None;
    }

    if word.ends_with("Props") && word != "Props" {
        let mut i = word_start;
        while i > 0 && bytes[i - 1].is_ascii_whitespace() {
            i -= 1;
        }
        if i >= 3 && &transformed[i - 3..i] == "new" {
            return Some(i - 3);
        }
    }
    None
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Width of the tag name at `pos` in the original source: an optional
/// leading `<`, then the maximal run of letters, digits, `_`, `.`;
/// minimum 1.
fn tag_name_width(source: &str, pos: usize) -> u32 {
    let bytes = source.as_bytes();
    let mut i = pos;
    let mut width = 0usize;
    if i < bytes.len() && bytes[i] == b'<' {
        i += 1;
        width += 1;
    }
    let mut run = 0usize;
    while i + run < bytes.len() {
        let b = bytes[i + run];
        if b.is_ascii_alphanumeric() || b == b'_' || b == b'.' {
            run += 1;
        } else {
            break;
        }
    }
    u32::try_from(width + run.max(1)).unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use xcsls_markup::GeneratorConfig;

    use crate::weaver::transform_source;

    fn diagnostic(start: u32, length: u32) -> CompilerDiagnostic {
        CompilerDiagnostic {
            file: Utf8PathBuf::from("Generated/a.cs"),
            start,
            length,
            code: "CS1002".to_string(),
            severity: Severity::Error,
            message: "test".to_string(),
        }
    }

    #[test]
    fn test_identity_region_projects_one_to_one() {
        let source = "class C { int x = 1; }";
        let (content, map) = transform_source(source, &GeneratorConfig::default());
        let translated = translate(&diagnostic(10, 3), &map, &content, source).unwrap();
        assert_eq!(translated.span.start(), 10);
        assert_eq!(translated.span.length(), 3);
    }

    #[test]
    fn test_expression_attribute_value_projects_exactly() {
        let source = "var e = (<btn onclick={H}/>);";
        let (content, map) = transform_source(source, &GeneratorConfig::default());
        // Position of the emitted `H` (the value of `Onclick = H`).
        let value_pos = content.find("= H").unwrap() + 2;
        let translated =
            translate(&diagnostic(u32::try_from(value_pos).unwrap(), 1), &map, &content, source)
                .unwrap();
        let projected =
            &source[translated.span.start_usize()..translated.span.end_usize()];
        assert_eq!(projected, "H");
    }

    #[test]
    fn test_prop_error_widens_to_tag_name() {
        let source = "var e = (<btn onclick={H}/>);";
        let (content, map) = transform_source(source, &GeneratorConfig::default());
        // A diagnostic on the Props type name widens to the owning tag.
        let type_pos = content.find("BtnProps").unwrap() + 1;
        let translated =
            translate(&diagnostic(u32::try_from(type_pos).unwrap(), 8), &map, &content, source)
                .unwrap();
        let projected =
            &source[translated.span.start_usize()..translated.span.end_usize()];
        assert_eq!(projected, "<btn");
    }

    #[test]
    fn test_no_mapping_drops_diagnostic() {
        let map = SourceMap::new();
        let translated = translate(&diagnostic(5, 1), &map, "text", "text");
        assert!(translated.is_none());
    }

    #[test]
    fn test_line_col_conversion() {
        let source = "line1\nvar x = 1;\n";
        let (content, map) = transform_source(source, &GeneratorConfig::default());
        let translated = translate(&diagnostic(10, 1), &map, &content, source).unwrap();
        assert_eq!(translated.start.line(), 1);
        assert_eq!(translated.start.column(), 4);
    }

    #[test]
    fn test_props_detection_helpers() {
        let text = r#"Document.CreateElement("b", new BProps { X = 1 })"#;
        let on_type = text.find("BProps").unwrap() + 3;
        let container = find_property_container(text, on_type).unwrap();
        assert_eq!(&text[container..container + 3], "new");

        let on_new = text.find("new").unwrap() + 1;
        assert_eq!(find_property_container(text, on_new), Some(container));

        // A position inside the initializer keeps its exact projection.
        let inside = text.find("X =").unwrap();
        assert!(find_property_container(text, inside).is_none());
    }

    #[test]
    fn test_tag_name_width_scan() {
        assert_eq!(tag_name_width("<div.x rest", 0), 6);
        assert_eq!(tag_name_width("div rest", 0), 3);
        assert_eq!(tag_name_width("!", 0), 1);
    }
}
