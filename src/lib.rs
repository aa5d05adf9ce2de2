//! Generates binary `BinaryCoder` impls for classified record types.
//!
//! A classifier describes each record field by its [`FieldShape`] (a plain
//! scalar, a derived scalar, a slice, a nested record, ...) together with the
//! names its code needs. `bincodegen` picks the code fragment for every field,
//! expands it and nests the results into one impl per type and one module per
//! output file.
//!
//! To generate coders at build time, add `bincodegen` to your `Cargo.toml`
//! both as a build dependency (for the generation) and as a dependency (for
//! the [`alias`] helpers used by the generated code), then add a `build.rs`:
//!
//! ```no_run
//! # std::env::set_var("OUT_DIR", "./");
//! fn main() {
//!     println!("cargo:rerun-if-changed=types.json");
//!
//!     std::fs::write(
//!         std::path::Path::new(std::env::var("OUT_DIR").unwrap().as_str()).join("coders.rs"),
//!         bincodegen::Generator::default()
//!             .generate_json(std::fs::read_to_string("types.json").unwrap())
//!             .unwrap(),
//!     )
//!     .unwrap();
//! }
//! ```
//!
//! And include the generated module next to the types it implements:
//!
//! ```compile_fail
//! include!(concat!(env!("OUT_DIR"), "/coders.rs"));
//! ```
//!
//! The generated code expects a runtime crate (see
//! [`Generator::with_runtime()`]) exporting `BinaryCoder`, `Reader`, `Writer`
//! and `Error`.

#![allow(clippy::needless_doctest_main)]

pub mod alias;
pub mod assemble;
pub mod catalog;
pub mod context;
pub mod error;
pub mod layout;
pub mod render;
pub mod unit;

pub use crate::catalog::{Direction, FieldShape};
pub use crate::context::FieldContext;
pub use crate::error::Error;
pub use crate::layout::{Layout, DEFAULT_INDENT};
pub use crate::unit::{Field, FileUnit, Record, RecordSlice, TypeDecl};

use crate::assemble::assemble_file;
use log::info;

/// `DEFAULT_RUNTIME` is the crate path the generated code imports its coder
/// types from.
///
/// A different runtime can be used with
/// [`Generator::with_runtime()`](Generator::with_runtime).
pub const DEFAULT_RUNTIME: &str = "bincoder";

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone)]
pub struct Generator {
    runtime: String,
    layout: Layout,
}

impl std::default::Default for Generator {
    fn default() -> Self {
        Generator {
            runtime: DEFAULT_RUNTIME.to_string(),
            layout: Layout::default(),
        }
    }
}

impl Generator {
    pub fn with_runtime<R: AsRef<str>>(self, runtime: R) -> Self {
        Self {
            runtime: runtime.as_ref().to_string(),
            ..self
        }
    }

    /// Indent generated code by `width` spaces per level instead of
    /// [`DEFAULT_INDENT`].
    pub fn with_indent(self, width: usize) -> Self {
        Self {
            layout: Layout::new(width),
            ..self
        }
    }

    /// Returns the `use` paths of the generated module: the runtime types,
    /// the alias helpers, then the unit's own imports, without duplicates.
    pub fn imports(&self, unit: &FileUnit) -> Vec<String> {
        let mut out = vec![
            format!("{}::{{BinaryCoder, Error, Reader, Writer}}", self.runtime),
            "bincodegen::alias".to_string(),
        ];

        for v in unit.imports.iter() {
            if !out.contains(v) {
                out.push(v.clone());
            }
        }

        out
    }

    pub fn generate(&self, unit: &FileUnit) -> Result<String> {
        info!(
            "generating package {} with {} types",
            unit.package,
            unit.types.len()
        );

        assemble_file(unit, &self.imports(unit), &self.layout)
    }

    /// Parses a JSON manifest into a [`FileUnit`] and generates it.
    pub fn generate_json<T: AsRef<str>>(&self, manifest: T) -> Result<String> {
        self.generate(&FileUnit::from_json(manifest)?)
    }
}
