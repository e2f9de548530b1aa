//! gowire-scanner: annotation scanner for Go source trees
//!
//! Finds `//gowire:provide` and `//gowire:invoke` annotations on top-level
//! declarations and turns them into the provider/invocation entities the
//! analyzer consumes. Only the declaration subset is parsed; bodies are
//! skipped by delimiter matching.
//!
//! # Example
//!
//! ```ignore
//! use gowire_resolver::Resolver;
//! use gowire_scanner::scan_dir;
//!
//! let resolver = Resolver::new();
//! let parsed = scan_dir("./internal".as_ref(), &resolver)?;
//! ```

mod error;
mod parser;
mod walk;

pub use error::ScanError;
pub use parser::{scan_source, to_lower_camel};
pub use walk::{output_info, scan_dir};
