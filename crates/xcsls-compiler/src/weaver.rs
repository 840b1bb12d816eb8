use camino::Utf8PathBuf;
use serde::Serialize;
use xcsls_markup::generate;
use xcsls_markup::Builder;
use xcsls_markup::GeneratorConfig;
use xcsls_markup::Lexer;
use xcsls_source::SourceMap;
use xcsls_source::SourceMapEntry;

use crate::host::HostTree;
use crate::locator::locate_regions;

/// The unit of output of the core: the complete derived text plus the
/// ordered map spanning the whole file.
#[derive(Debug, Clone, Serialize)]
pub struct FileTransformedPayload {
    pub file: Utf8PathBuf,
    pub content: String,
    pub source_maps: SourceMap,
}

/// Transform one file: locate the markup regions and weave them through
/// the markup pipeline.
#[must_use]
pub fn transform_source(source: &str, config: &GeneratorConfig) -> (String, SourceMap) {
    let tree = HostTree::parse(source);
    let regions = locate_regions(&tree, source);
    weave(source, &regions, config)
}

/// Interleave identity-mapped host slices with transformed regions.
///
/// Regions overlapping an earlier region are skipped, which prevents
/// double-processing when the host exposes both an outer and an inner
/// parenthesized node over the same markup. A region whose markup yields
/// no nodes is preserved verbatim under an identity map so the downstream
/// compiler surfaces the syntax error at its original coordinates.
#[must_use]
pub fn weave(source: &str, regions: &[(usize, usize)], config: &GeneratorConfig) -> (String, SourceMap) {
    let mut output = String::with_capacity(source.len());
    let mut entries: Vec<SourceMapEntry> = Vec::new();
    let mut last_pos = 0usize;

    for &(region_start, region_end) in regions {
        if region_start < last_pos {
            continue;
        }
        if last_pos < region_start {
            entries.push(SourceMapEntry::identity(last_pos, region_start, output.len()));
            output.push_str(&source[last_pos..region_start]);
        }

        let raw = &source[region_start..region_end];
        let (prefix, xml_only, suffix) = split_region(raw);
        let xml_offset = prefix.len();

        if !prefix.is_empty() {
            entries.push(SourceMapEntry::identity(
                region_start,
                region_start + prefix.len(),
                output.len(),
            ));
            output.push_str(prefix);
        }

        let tokens = Lexer::for_region(xml_only, 0).tokenize();
        let nodes = Builder::new(tokens, xml_only, 0).build();
        let generated = generate(&nodes, config);

        let xml_abs = region_start + xml_offset;
        if generated.code.is_empty() {
            entries.push(SourceMapEntry::identity(
                xml_abs,
                xml_abs + xml_only.len(),
                output.len(),
            ));
            output.push_str(xml_only);
        } else {
            let code_start = output.len();
            output.push_str(&generated.code);
            // Region-wide parent entry: every generated byte is covered
            // even where no leaf mapping applies.
            entries.push(SourceMapEntry::from_bounds(
                xml_abs,
                xml_abs + xml_only.len(),
                code_start,
                output.len(),
            ));
            for local in &generated.maps {
                entries.push(SourceMapEntry::new(
                    u32::try_from(xml_abs).unwrap_or(u32::MAX) + local.original_start,
                    u32::try_from(xml_abs).unwrap_or(u32::MAX) + local.original_end,
                    u32::try_from(code_start).unwrap_or(u32::MAX) + local.transformed_start,
                    u32::try_from(code_start).unwrap_or(u32::MAX) + local.transformed_end,
                ));
            }
        }

        if !suffix.is_empty() {
            entries.push(SourceMapEntry::identity(
                region_end - suffix.len(),
                region_end,
                output.len(),
            ));
            output.push_str(suffix);
        }

        last_pos = region_end;
    }

    if last_pos < source.len() {
        entries.push(SourceMapEntry::identity(last_pos, source.len(), output.len()));
        output.push_str(&source[last_pos..]);
    } else if source.is_empty() {
        entries.push(SourceMapEntry::identity(0, 0, 0));
    }

    (output, SourceMap::from_entries(entries))
}

/// Split a raw region into leading-whitespace-and-optional-`(`, the
/// markup itself, and trailing-whitespace-and-optional-`)`. The locator's
/// ranges usually carry neither, but the weaver stays tolerant so the
/// derived call remains a valid host expression either way.
fn split_region(raw: &str) -> (&str, &str, &str) {
    let bytes = raw.as_bytes();

    let mut start = 0;
    while start < bytes.len() && bytes[start].is_ascii_whitespace() {
        start += 1;
    }
    if start < bytes.len() && bytes[start] == b'(' {
        start += 1;
        while start < bytes.len() && bytes[start].is_ascii_whitespace() {
            start += 1;
        }
    }

    let mut end = bytes.len();
    while end > start && bytes[end - 1].is_ascii_whitespace() {
        end -= 1;
    }
    if end > start && bytes[end - 1] == b')' {
        end -= 1;
        while end > start && bytes[end - 1].is_ascii_whitespace() {
            end -= 1;
        }
    }

    (&raw[..start], &raw[start..end], &raw[end..])
}
