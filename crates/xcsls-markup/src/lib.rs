//! The markup pipeline: lexer, AST builder and code generator for one
//! embedded markup region. Tokens and nodes are per-region and ephemeral;
//! callers discard them once the generator has emitted the region.

mod ast;
mod builder;
mod generator;
mod lexer;
mod tokens;

pub use ast::AstNode;
pub use ast::Attribute;
pub use ast::Element;
pub use ast::Expression;
pub use ast::StringLiteral;
pub use builder::Builder;
pub use generator::generate;
pub use generator::Generated;
pub use generator::GeneratorConfig;
pub use lexer::Lexer;
pub use tokens::Token;
pub use tokens::TokenKind;
