//! gowire - dependency injection code generation for annotated Go sources
//!
//! This is the root workspace crate that hosts the pipeline integration
//! tests. The actual implementation is in the workspace member crates.

// Re-export main crates for convenience
pub use gowire_analyzer as analyzer;
pub use gowire_codegen as codegen;
pub use gowire_scanner as scanner;
pub use gowire_types as types;
