// Validation engine: dotted-path resolution, declarative rules, the ordered
// fail-fast pass, built-in profiles and failure reporting.
// Nothing here prints; progress goes through the injected OutputSink.

pub mod engine;
pub mod path;
pub mod profiles;
pub mod report;
pub mod rules;

pub use engine::{validate, ValidationSummary};
pub use path::PathError;
pub use profiles::Profile;
pub use report::{ValidationError, ValidationReport};
