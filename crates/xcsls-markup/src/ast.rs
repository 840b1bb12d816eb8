use serde::Serialize;
use xcsls_source::Span;

/// A markup AST node. The set is closed: elements, embedded host
/// expressions, and string literals (free text or quoted attribute
/// values). Every node's span lies within its parent's span.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AstNode {
    Element(Element),
    Expression(Expression),
    StringLiteral(StringLiteral),
}

impl AstNode {
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            AstNode::Element(el) => el.span,
            AstNode::Expression(expr) => expr.span,
            AstNode::StringLiteral(lit) => lit.span,
        }
    }

    /// String literals that trim to nothing are dropped by the generator
    /// and by structural comparisons.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            AstNode::StringLiteral(lit) => lit.value.trim().is_empty(),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    pub tag_name: String,
    /// Span of the tag name itself (starts one past the `<`).
    pub tag_span: Span,
    pub attributes: Vec<Attribute>,
    pub children: Vec<AstNode>,
    pub span: Span,
}

/// One attribute slot. A slot without a resolved value node renders as
/// the literal `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    pub name: String,
    pub name_span: Span,
    pub value: Option<AstNode>,
}

/// Raw host code between a matched brace pair, braces included.
/// `children` is non-empty only for hybrid expressions whose text embeds
/// nested markup; the generator re-opens the lambda body around them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expression {
    pub text: String,
    pub children: Vec<AstNode>,
    pub span: Span,
}

/// Free text inside an element, or a quoted attribute value (quotes kept;
/// the generator strips them on emission).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StringLiteral {
    pub value: String,
    pub span: Span,
}
