//! The classified input handed to the generator.
//!
//! These types are produced by the field classifier. Their JSON form is what
//! the `bincodegen` binary reads:
//!
//! ```json
//! {
//!     "package": "wire",
//!     "types": [
//!         {
//!             "kind": "record",
//!             "name": "Header",
//!             "fields": [
//!                 { "shape": "scalar_exact", "field": "id", "method": "u64" }
//!             ]
//!         },
//!         { "kind": "record_slice", "name": "Headers", "element": "Header" }
//!     ]
//! }
//! ```

use crate::catalog::FieldShape;
use crate::context::FieldContext;
use crate::Result;
use serde::{Deserialize, Serialize};

/// A classified field: its shape and the data its fragments expand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub shape: FieldShape,

    #[serde(flatten)]
    pub context: FieldContext,
}

impl Field {
    pub fn new(shape: FieldShape, context: FieldContext) -> Self {
        Self { shape, context }
    }
}

fn default_receiver() -> String {
    "self".to_string()
}

/// A record type and its fields, in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub name: String,

    /// The name the generated methods access the record through. Every field
    /// must use the same receiver.
    #[serde(default = "default_receiver")]
    pub receiver: String,

    #[serde(default)]
    pub fields: Vec<Field>,
}

impl Record {
    pub fn new<N: Into<String>>(name: N, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            receiver: default_receiver(),
            fields,
        }
    }

    pub fn with_receiver<R: Into<String>>(self, receiver: R) -> Self {
        Self {
            receiver: receiver.into(),
            ..self
        }
    }
}

/// A named newtype over `Vec<element>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSlice {
    pub name: String,
    pub element: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeDecl {
    Record(Record),
    RecordSlice(RecordSlice),
}

impl TypeDecl {
    pub fn name(&self) -> &str {
        match self {
            Self::Record(v) => &v.name,
            Self::RecordSlice(v) => &v.name,
        }
    }
}

/// FileUnit is everything emitted into one output file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileUnit {
    pub package: String,

    /// Extra `use` paths, without the `use` keyword.
    #[serde(default)]
    pub imports: Vec<String>,

    #[serde(default)]
    pub types: Vec<TypeDecl>,
}

impl FileUnit {
    pub fn new<P: Into<String>>(package: P, types: Vec<TypeDecl>) -> Self {
        Self {
            package: package.into(),
            imports: Vec::new(),
            types,
        }
    }

    pub fn from_json<T: AsRef<str>>(manifest: T) -> Result<Self> {
        Ok(serde_json::from_str(manifest.as_ref())?)
    }
}
