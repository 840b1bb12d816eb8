//! The compile-to-derived-text core: host-tree scanning, markup region
//! location, file weaving with source-map composition, and reverse
//! diagnostic projection. Reused by both the one-shot CLI and the
//! language server.

mod host;
mod locator;
mod translate;
mod weaver;

pub use host::HostTree;
pub use host::ParenExpr;
pub use locator::locate_regions;
pub use translate::translate;
pub use translate::CompilerDiagnostic;
pub use translate::Severity;
pub use translate::TranslatedDiagnostic;
pub use weaver::transform_source;
pub use weaver::weave;
pub use weaver::FileTransformedPayload;
