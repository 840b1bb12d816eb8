use xcsls_source::Span;

use crate::ast::AstNode;
use crate::ast::Attribute;
use crate::ast::Element;
use crate::ast::Expression;
use crate::ast::StringLiteral;
use crate::lexer::Lexer;
use crate::tokens::Token;
use crate::tokens::TokenKind;

/// Recursive-descent consumer over a token vector. The cursor is
/// monotone: no token is ever re-read. Malformed input degrades into a
/// partial tree rather than an error.
pub struct Builder<'src> {
    tokens: Vec<Token>,
    source: &'src str,
    /// Absolute offset of `source[0]`; token spans are absolute.
    base: usize,
    current: usize,
    last_end: usize,
}

impl<'src> Builder<'src> {
    #[must_use]
    pub fn new(tokens: Vec<Token>, source: &'src str, start_offset: usize) -> Self {
        Self {
            tokens,
            source,
            base: start_offset,
            current: 0,
            last_end: start_offset,
        }
    }

    #[must_use]
    pub fn build(mut self) -> Vec<AstNode> {
        let mut nodes = Vec::new();
        while self.peek().is_some() {
            let before = self.current;
            nodes.append(&mut self.parse_siblings(None));
            // A stray closing tag or structural token at the root: skip
            // past it so the cursor keeps moving.
            if self.current == before {
                self.advance();
            }
        }
        nodes
    }

    /// Accumulate sibling nodes until a closing tag, a structural break,
    /// or the end of tokens. Closing tags are left for the caller.
    fn parse_siblings(&mut self, _stop_at: Option<&str>) -> Vec<AstNode> {
        let mut nodes = Vec::new();
        while let Some(token) = self.peek() {
            match token.kind {
                TokenKind::TagOpen => {
                    if self.token_text(&token) == "</" {
                        break;
                    }
                    nodes.push(self.parse_element());
                }
                TokenKind::RightParen | TokenKind::Semicolon => break,
                TokenKind::AttributeExpression => nodes.push(self.parse_expression()),
                TokenKind::AttributeName | TokenKind::AttributeStringLiteral => {
                    let text = self.token_text(&token).to_string();
                    let span = token.span;
                    self.advance();
                    if !text.trim().is_empty() {
                        nodes.push(AstNode::StringLiteral(StringLiteral { value: text, span }));
                    }
                }
                _ => {
                    self.advance();
                }
            }
        }
        nodes
    }

    fn parse_element(&mut self) -> AstNode {
        let open = self.advance().expect("caller checked TagOpen");
        let start = open.span.start_usize();

        let (tag_name, tag_span) = match self.peek() {
            Some(tok) if tok.kind == TokenKind::TagName => {
                let name = self.token_text(&tok).to_string();
                let span = tok.span;
                self.advance();
                (name, span)
            }
            _ => (String::new(), Span::from_bounds(start + 1, start + 1)),
        };

        let mut attributes = Vec::new();
        let mut children = Vec::new();
        let mut end = tag_span.end_usize();

        loop {
            let Some(token) = self.peek() else {
                // Ran out mid-tag; close the element at the last
                // consumed token.
                end = end.max(self.last_end);
                break;
            };
            match token.kind {
                TokenKind::TagClose => {
                    let text = self.token_text(&token).to_string();
                    let close_end = token.span.end_usize();
                    self.advance();
                    if text == "/>" {
                        end = close_end;
                        break;
                    }
                    end = self.parse_children(&tag_name, &mut children, close_end);
                    break;
                }
                TokenKind::AttributeName | TokenKind::AttributeStringLiteral => {
                    attributes.push(self.parse_attribute());
                }
                TokenKind::AttributeExpression => {
                    // An expression in attribute position without a name;
                    // keep the slot so lexical order is preserved.
                    let value = self.parse_expression();
                    let span = value.span();
                    attributes.push(Attribute {
                        name: String::new(),
                        name_span: Span::from_bounds(span.start_usize(), span.start_usize()),
                        value: Some(value),
                    });
                }
                TokenKind::AttributeEquals | TokenKind::Unknown => {
                    self.advance();
                }
                _ => {
                    // A TagOpen or structural token while still inside the
                    // attribute list: the tag never closed.
                    end = end.max(self.last_end);
                    break;
                }
            }
        }

        AstNode::Element(Element {
            tag_name,
            tag_span,
            attributes,
            children,
            span: Span::from_bounds(start, end),
        })
    }

    fn parse_attribute(&mut self) -> Attribute {
        let name_tok = self.advance().expect("caller checked name token");
        let raw = self.token_text(&name_tok).to_string();
        let name_span = name_tok.span;

        let has_equals = matches!(
            self.peek(),
            Some(tok) if tok.kind == TokenKind::AttributeEquals
        );
        if !has_equals {
            return Attribute {
                name: raw,
                name_span,
                value: None,
            };
        }
        self.advance();

        let value = match self.peek() {
            Some(tok)
                if tok.kind == TokenKind::AttributeName
                    || tok.kind == TokenKind::AttributeStringLiteral =>
            {
                let value = self.token_text(&tok).to_string();
                let span = tok.span;
                self.advance();
                Some(AstNode::StringLiteral(StringLiteral { value, span }))
            }
            Some(tok) if tok.kind == TokenKind::AttributeExpression => {
                Some(self.parse_expression())
            }
            _ => None,
        };

        Attribute {
            name: raw,
            name_span,
            value,
        }
    }

    /// Children plus the matching close tag. A close tag with the wrong
    /// name is swallowed and scanning continues until the right one is
    /// found or the tokens run out; the element then ends at the last
    /// consumed token.
    fn parse_children(&mut self, tag_name: &str, children: &mut Vec<AstNode>, open_end: usize) -> usize {
        let mut end = open_end;
        loop {
            children.append(&mut self.parse_siblings(Some(tag_name)));

            let Some(token) = self.peek() else {
                return end.max(self.last_end);
            };
            match token.kind {
                TokenKind::TagOpen if self.token_text(&token) == "</" => {
                    self.advance();
                    let matches_parent = match self.peek() {
                        Some(name_tok) if name_tok.kind == TokenKind::TagName => {
                            let name = self.token_text(&name_tok).to_string();
                            self.advance();
                            name == tag_name
                        }
                        _ => false,
                    };
                    if let Some(close) = self.peek() {
                        if close.kind == TokenKind::TagClose {
                            self.advance();
                        }
                    }
                    end = self.last_end;
                    if matches_parent {
                        return end;
                    }
                }
                TokenKind::RightParen | TokenKind::Semicolon => {
                    return end.max(self.last_end);
                }
                _ => {
                    // parse_siblings made no progress on this token.
                    self.advance();
                    end = self.last_end;
                }
            }
        }
    }

    /// Expression nodes have three shapes:
    /// - plain: raw `{…}` text, no children;
    /// - bridge: the lexer split a parenthesized lambda body into
    ///   head / LeftParen / nested markup / tail — reassembled here;
    /// - hybrid re-lex: the whole lambda was captured as one token and
    ///   its embedded markup is parsed out of the text.
    fn parse_expression(&mut self) -> AstNode {
        let token = self.advance().expect("caller checked AttributeExpression");
        let raw = self.token_text(&token).to_string();
        let mut span = token.span;

        if matches!(self.peek(), Some(t) if t.kind == TokenKind::LeftParen) {
            self.advance();
            let mut children = Vec::new();
            loop {
                let Some(next) = self.peek() else { break };
                match next.kind {
                    TokenKind::TagOpen if self.token_text(&next) == "<" => {
                        children.push(self.parse_element());
                    }
                    TokenKind::AttributeName => {
                        let text = self.token_text(&next).to_string();
                        let text_span = next.span;
                        self.advance();
                        if !text.trim().is_empty() {
                            children.push(AstNode::StringLiteral(StringLiteral {
                                value: text,
                                span: text_span,
                            }));
                        }
                    }
                    _ => break,
                }
            }

            let mut text = raw;
            while let Some(next) = self.peek() {
                match next.kind {
                    TokenKind::AttributeExpression => {
                        text.push_str(self.token_text(&next));
                        span = Span::from_bounds(span.start_usize(), next.span.end_usize());
                        self.advance();
                    }
                    TokenKind::RightParen => {
                        text.push(')');
                        span = Span::from_bounds(span.start_usize(), next.span.end_usize());
                        self.advance();
                    }
                    _ => break,
                }
            }

            return AstNode::Expression(Expression {
                text,
                children,
                span,
            });
        }

        if raw.starts_with('{') && raw.ends_with('}') && raw.contains('<') && raw.contains('>') {
            if let Some(node) = reparse_hybrid(&raw, span) {
                return node;
            }
        }

        AstNode::Expression(Expression {
            text: raw,
            children: Vec::new(),
            span,
        })
    }

    fn token_text(&self, token: &Token) -> &'src str {
        let start = token.span.start_usize() - self.base;
        let end = token.span.end_usize() - self.base;
        &self.source[start..end]
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.current).copied()
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.current).copied();
        if let Some(tok) = token {
            self.current += 1;
            self.last_end = tok.span.end_usize();
        }
        token
    }
}

/// Strip the outer `{`, lex and build the embedded markup, and keep the
/// header plus raw tail as the node's text. The tail carries any `)` the
/// generator must re-emit after the children.
fn reparse_hybrid(raw: &str, span: Span) -> Option<AstNode> {
    let inner = &raw[1..];
    let lt = inner.find('<')?;
    let header = inner[..lt].trim();

    let nested_offset = span.start_usize() + 1 + lt;
    let (tokens, consumed) = Lexer::new(&inner[lt..], nested_offset, false).tokenize_with_pos();
    let children = Builder::new(tokens, &inner[lt..], nested_offset).build();
    if children.is_empty() {
        return None;
    }
    let tail = &inner[lt + consumed..];

    let mut text = String::from("{");
    text.push_str(header);
    text.push_str(tail);

    Some(AstNode::Expression(Expression {
        text,
        children,
        span,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(source: &str) -> Vec<AstNode> {
        let tokens = Lexer::new(source, 0, true).tokenize();
        Builder::new(tokens, source, 0).build()
    }

    fn as_element(node: &AstNode) -> &Element {
        match node {
            AstNode::Element(el) => el,
            other => panic!("expected element, got {other:?}"),
        }
    }

    #[test]
    fn test_self_closing_element() {
        let nodes = build("<t/>");
        assert_eq!(nodes.len(), 1);
        let el = as_element(&nodes[0]);
        assert_eq!(el.tag_name, "t");
        assert!(el.children.is_empty());
        assert_eq!(el.span.end_usize(), 4);
    }

    #[test]
    fn test_nested_children_ordered() {
        let nodes = build("<div>hello<span/></div>");
        let el = as_element(&nodes[0]);
        assert_eq!(el.children.len(), 2);
        assert!(matches!(&el.children[0], AstNode::StringLiteral(s) if s.value == "hello"));
        assert!(matches!(&el.children[1], AstNode::Element(e) if e.tag_name == "span"));
        assert_eq!(el.span.end_usize(), 23);
    }

    #[test]
    fn test_attributes_preserve_order() {
        let nodes = build(r#"<a href="x" onclick={H} disabled/>"#);
        let el = as_element(&nodes[0]);
        let names: Vec<&str> = el.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["href", "onclick", "disabled"]);
        assert!(matches!(
            el.attributes[0].value,
            Some(AstNode::StringLiteral(_))
        ));
        assert!(matches!(
            el.attributes[1].value,
            Some(AstNode::Expression(_))
        ));
        assert!(el.attributes[2].value.is_none());
    }

    #[test]
    fn test_quoted_value_keeps_quotes() {
        let nodes = build(r#"<a key="a\"b"/>"#);
        let el = as_element(&nodes[0]);
        match el.attributes[0].value.as_ref().unwrap() {
            AstNode::StringLiteral(s) => assert_eq!(s.value, r#""a\"b""#),
            other => panic!("expected string literal, got {other:?}"),
        }
    }

    #[test]
    fn test_hybrid_from_whole_capture() {
        let nodes = build("<ul>{xs.Map(x => <li/>)}</ul>");
        let ul = as_element(&nodes[0]);
        assert_eq!(ul.children.len(), 1);
        match &ul.children[0] {
            AstNode::Expression(expr) => {
                assert_eq!(expr.children.len(), 1);
                assert!(matches!(&expr.children[0], AstNode::Element(e) if e.tag_name == "li"));
                assert_eq!(expr.text, "{xs.Map(x =>)}");
            }
            other => panic!("expected hybrid expression, got {other:?}"),
        }
    }

    #[test]
    fn test_hybrid_from_bridge_tokens() {
        let nodes = build("{xs.Map(x => (<li/>))}");
        assert_eq!(nodes.len(), 1);
        match &nodes[0] {
            AstNode::Expression(expr) => {
                assert_eq!(expr.children.len(), 1);
                assert_eq!(expr.text, "{xs.Map(x => ))}");
                assert_eq!(expr.span.end_usize(), 22);
            }
            other => panic!("expected hybrid expression, got {other:?}"),
        }
    }

    #[test]
    fn test_mismatched_close_recovers() {
        let nodes = build("<div><p></div>");
        let el = as_element(&nodes[0]);
        assert_eq!(el.tag_name, "div");
        assert_eq!(el.children.len(), 1);
        // The inner <p> never closed; the outer element still ends at the
        // last consumed token.
        assert_eq!(el.span.end_usize(), 14);
    }

    #[test]
    fn test_unterminated_element_ends_at_last_token() {
        let nodes = build("<div>hello");
        let el = as_element(&nodes[0]);
        assert_eq!(el.span.end_usize(), 10);
    }

    #[test]
    fn test_empty_tokens_empty_nodes() {
        assert!(build("").is_empty());
    }

    #[test]
    fn test_child_spans_within_parent() {
        let nodes = build("<div>hello<span/></div>");
        let el = as_element(&nodes[0]);
        for child in &el.children {
            assert!(child.span().start() >= el.span.start());
            assert!(child.span().end() <= el.span.end());
        }
    }
}
