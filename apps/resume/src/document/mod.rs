// Résumé data document: loading from disk and node classification.
// The parsed tree is read-only for both the validator and the renderer.

pub mod kind;
pub mod loader;

pub use kind::NodeKind;
pub use loader::{load_document, LoadError};
