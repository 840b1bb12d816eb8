use rustc_hash::FxHashSet;
use tower_lsp_server::lsp_types::CompletionItem;
use tower_lsp_server::lsp_types::CompletionItemKind;
use xcsls_compiler::locate_regions;
use xcsls_compiler::HostTree;
use xcsls_markup::Lexer;
use xcsls_markup::TokenKind;

/// Tag names offered everywhere, regardless of what the document uses.
pub const WELL_KNOWN_TAGS: &[&str] = &[
    "a", "body", "btn", "button", "div", "form", "h1", "h2", "h3", "img", "input", "label", "li",
    "nav", "ol", "p", "section", "span", "table", "td", "tr", "ul",
];

/// Identifiers available at the cursor, unioned with the well-known tag
/// set. Tag and attribute names are harvested from the document's markup
/// regions when the cursor sits inside one.
#[must_use]
pub fn completions_at(source: &str, offset: usize) -> Vec<CompletionItem> {
    let tree = HostTree::parse(source);
    let regions = locate_regions(&tree, source);
    let in_region = regions
        .iter()
        .any(|&(start, end)| offset >= start && offset <= end);

    let mut seen: FxHashSet<String> = FxHashSet::default();
    let mut items = Vec::new();

    if in_region {
        for &(start, end) in &regions {
            let tokens = Lexer::new(&source[start..end], start, true).tokenize();
            for token in &tokens {
                let text = &source[token.span.start_usize()..token.span.end_usize()];
                let kind = match token.kind {
                    TokenKind::TagName => CompletionItemKind::CLASS,
                    TokenKind::AttributeName if is_identifier(text) => {
                        CompletionItemKind::PROPERTY
                    }
                    _ => continue,
                };
                if !text.is_empty() && seen.insert(text.to_string()) {
                    items.push(CompletionItem {
                        label: text.to_string(),
                        kind: Some(kind),
                        ..CompletionItem::default()
                    });
                }
            }
        }
    }

    for tag in WELL_KNOWN_TAGS {
        if seen.insert((*tag).to_string()) {
            items.push(CompletionItem {
                label: (*tag).to_string(),
                kind: Some(CompletionItemKind::CLASS),
                ..CompletionItem::default()
            });
        }
    }

    items.sort_by(|a, b| a.label.cmp(&b.label));
    items
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
