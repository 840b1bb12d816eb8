use xcsls_source::SourceMapEntry;
use xcsls_source::Span;

use crate::ast::AstNode;
use crate::ast::Attribute;
use crate::ast::Element;
use crate::ast::Expression;
use crate::ast::StringLiteral;

/// Identifiers and formatting for the factory-call emission.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Factory identifier, the `F` in `F.M("tag", …)`.
    pub factory: String,
    /// Method identifier, the `M` in `F.M("tag", …)`.
    pub method: String,
    /// Spaces per indent level. Constant within a run.
    pub indent_width: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            factory: "Document".to_string(),
            method: "CreateElement".to_string(),
            indent_width: 4,
        }
    }
}

/// Output of one generator run over a region's node list. Map entries
/// carry absolute original offsets and zero-based transformed offsets
/// local to `code`.
#[derive(Debug, Clone, Default)]
pub struct Generated {
    pub code: String,
    pub maps: Vec<SourceMapEntry>,
}

#[must_use]
pub fn generate(nodes: &[AstNode], config: &GeneratorConfig) -> Generated {
    let mut emitter = Emitter {
        out: String::new(),
        maps: Vec::new(),
        config,
    };
    emitter.emit_siblings(nodes, 0);
    Generated {
        code: emitter.out,
        maps: emitter.maps,
    }
}

struct Emitter<'cfg> {
    out: String,
    maps: Vec<SourceMapEntry>,
    config: &'cfg GeneratorConfig,
}

impl Emitter<'_> {
    fn emit_siblings(&mut self, nodes: &[AstNode], indent: usize) {
        let mut first = true;
        for node in nodes.iter().filter(|n| !n.is_blank()) {
            if !first {
                self.out.push_str(",\n");
            }
            first = false;
            self.emit_node(node, indent);
        }
    }

    fn emit_node(&mut self, node: &AstNode, indent: usize) {
        match node {
            AstNode::Element(el) => self.emit_element(el, indent),
            AstNode::Expression(expr) => self.emit_expression(expr, indent, true),
            AstNode::StringLiteral(lit) => {
                self.push_indent(indent);
                self.emit_string(lit);
            }
        }
    }

    fn emit_element(&mut self, el: &Element, indent: usize) {
        self.push_indent(indent);
        let element_start = self.out.len();
        let factory: &str = &self.config.factory;
        let method: &str = &self.config.method;
        self.out.push_str(factory);
        self.out.push('.');
        self.out.push_str(method);
        self.out.push_str("(\n");

        self.push_indent(indent + 1);
        let tag_start = self.out.len();
        self.out.push('"');
        self.out.push_str(&el.tag_name);
        self.out.push('"');
        self.record(el.tag_span, tag_start);
        self.out.push_str(",\n");

        self.push_indent(indent + 1);
        self.out.push_str("new ");
        self.out.push_str(&pascal_case(&el.tag_name));
        self.out.push_str("Props");
        if el.attributes.is_empty() {
            self.out.push_str("()");
        } else {
            self.out.push_str(" { ");
            let mut first = true;
            for attr in &el.attributes {
                if attr.name.is_empty() {
                    continue;
                }
                if !first {
                    self.out.push_str(", ");
                }
                first = false;
                self.emit_attribute(attr, indent + 1);
            }
            self.out.push_str(" }");
        }

        for child in el.children.iter().filter(|c| !c.is_blank()) {
            self.out.push_str(",\n");
            self.emit_node(child, indent + 1);
        }

        self.out.push('\n');
        self.push_indent(indent);
        self.out.push(')');
        // Whole-element entry: a narrower parent than the region for
        // diagnostics landing on generated scaffolding inside this call.
        self.record(el.span, element_start);
    }

    fn emit_attribute(&mut self, attr: &Attribute, indent: usize) {
        let name_start = self.out.len();
        self.out.push_str(&pascal_case(&attr.name));
        self.record(attr.name_span, name_start);
        self.out.push_str(" = ");
        match &attr.value {
            None => self.out.push_str("null"),
            Some(AstNode::StringLiteral(lit)) => self.emit_string(lit),
            Some(AstNode::Expression(expr)) => self.emit_expression(expr, indent, false),
            Some(AstNode::Element(el)) => self.emit_element(el, indent),
        }
    }

    fn emit_expression(&mut self, expr: &Expression, indent: usize, with_indent: bool) {
        if with_indent {
            self.push_indent(indent);
        }
        let (content, content_offset) = strip_braces(&expr.text);

        if expr.children.is_empty() {
            let start = self.out.len();
            self.out.push_str(content);
            let original_start = expr.span.start_usize() + content_offset;
            self.maps.push(SourceMapEntry::from_bounds(
                original_start,
                original_start + content.len(),
                start,
                self.out.len(),
            ));
            return;
        }

        // Hybrid: re-open the lambda body around the nested markup.
        let (head, rest) = split_head(content);
        let head_start = self.out.len();
        self.out.push_str(head);
        let original_start = expr.span.start_usize() + 1;
        self.maps.push(SourceMapEntry::from_bounds(
            original_start,
            original_start + head.len(),
            head_start,
            self.out.len(),
        ));

        self.out.push_str(" (\n");
        self.emit_siblings(&expr.children, indent + 1);
        self.out.push('\n');
        self.push_indent(indent);
        self.out.push(')');
        if rest.trim_end().ends_with(')') {
            self.out.push(')');
        }
    }

    fn emit_string(&mut self, lit: &StringLiteral) {
        let trimmed = lit.value.trim();
        if trimmed.is_empty() {
            return;
        }
        let inner = strip_quotes(trimmed);
        let start = self.out.len();
        self.out.push('"');
        self.out.push_str(&escape_quotes(inner));
        self.out.push('"');

        let leading = lit.value.len() - lit.value.trim_start().len();
        let original_start = lit.span.start_usize() + leading;
        self.maps.push(SourceMapEntry::from_bounds(
            original_start,
            original_start + trimmed.len(),
            start,
            self.out.len(),
        ));
    }

    fn push_indent(&mut self, indent: usize) {
        for _ in 0..indent * self.config.indent_width {
            self.out.push(' ');
        }
    }

    fn record(&mut self, original: Span, transformed_start: usize) {
        self.maps.push(SourceMapEntry::from_bounds(
            original.start_usize(),
            original.end_usize(),
            transformed_start,
            self.out.len(),
        ));
    }
}

/// Strip a surrounding `{…}` pair and trim; also report the byte offset
/// of the kept content within the original text so map entries can point
/// inside the braces.
fn strip_braces(text: &str) -> (&str, usize) {
    let (inner, mut offset) = if text.starts_with('{') && text.ends_with('}') && text.len() >= 2 {
        (&text[1..text.len() - 1], 1)
    } else {
        (text, 0)
    };
    let trimmed_start = inner.trim_start();
    offset += inner.len() - trimmed_start.len();
    (trimmed_start.trim_end(), offset)
}

/// The lambda head: everything up to and including `=>`, or up to the
/// first `<` when there is no arrow, or the whole text.
fn split_head(content: &str) -> (&str, &str) {
    if let Some(idx) = content.find("=>") {
        content.split_at(idx + 2)
    } else if let Some(idx) = content.find('<') {
        content.split_at(idx)
    } else {
        (content, "")
    }
}

fn strip_quotes(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

/// Escape embedded quotes that are not already backslash-escaped.
fn escape_quotes(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut escaped = false;
    for ch in value.chars() {
        if ch == '"' && !escaped {
            out.push('\\');
        }
        escaped = ch == '\\' && !escaped;
        out.push(ch);
    }
    out
}

fn pascal_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
