//! Input resolution for corpus processing

pub mod corpus;
pub mod glob_resolver;

pub use corpus::CorpusLayout;
pub use glob_resolver::resolve_patterns;
