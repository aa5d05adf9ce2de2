//! Substitution data for the field, type and file fragments.

use crate::layout::Layout;
use serde::{Deserialize, Serialize};

fn default_receiver() -> String {
    "self".to_string()
}

fn default_by_ref() -> bool {
    true
}

/// FieldContext carries the substitution data of a single field fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldContext {
    /// The variable the field is accessed through.
    #[serde(default = "default_receiver")]
    pub receiver: String,

    /// The field name as declared.
    pub field: String,

    /// The `Reader`/`Writer` method handling this field.
    #[serde(default)]
    pub method: String,

    /// The declared type of the field, or of its elements for slices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,

    /// The base type a derived or aliased type wraps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_type: Option<String>,

    /// The temporary used to bridge conversions. Generated per field when
    /// not set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transient: Option<String>,

    /// True when the field (or slice element) is held by value and the call
    /// site must take a reference, false when it already sits behind a `Box`.
    #[serde(default = "default_by_ref")]
    pub by_ref: bool,
}

impl FieldContext {
    pub fn new<F: Into<String>, M: Into<String>>(field: F, method: M) -> Self {
        Self {
            receiver: default_receiver(),
            field: field.into(),
            method: method.into(),
            field_type: None,
            base_type: None,
            transient: None,
            by_ref: default_by_ref(),
        }
    }

    pub fn with_receiver<R: Into<String>>(self, receiver: R) -> Self {
        Self {
            receiver: receiver.into(),
            ..self
        }
    }

    pub fn with_field_type<T: Into<String>>(self, field_type: T) -> Self {
        Self {
            field_type: Some(field_type.into()),
            ..self
        }
    }

    pub fn with_base_type<T: Into<String>>(self, base_type: T) -> Self {
        Self {
            base_type: Some(base_type.into()),
            ..self
        }
    }

    pub fn with_transient<T: Into<String>>(self, transient: T) -> Self {
        Self {
            transient: Some(transient.into()),
            ..self
        }
    }

    /// Marks the field as already boxed.
    pub fn boxed(self) -> Self {
        Self {
            by_ref: false,
            ..self
        }
    }

    /// Returns a copy ready to render as field number `index` of a record.
    ///
    /// Field and transient names that are Rust keywords are escaped, and a
    /// transient name is generated when none was given.
    pub fn resolve(&self, index: usize) -> Self {
        let transient = match self.transient.as_deref() {
            Some(v) => SafeName(v).to_string(),
            None => format!("tmp{}", index),
        };

        Self {
            field: SafeName(&self.field).to_string(),
            transient: Some(transient),
            ..self.clone()
        }
    }
}

/// FieldData is the handlebars data of a field fragment.
///
/// Empty strings are left out, so a fragment that needs them fails in strict
/// mode instead of emitting an unnamed type or variable.
#[derive(Debug, Serialize)]
pub(crate) struct FieldData<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    receiver: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    method: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    field_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    base_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    transient: Option<&'a str>,
    by_ref: bool,
    indent: &'a str,
}

fn non_empty(v: &str) -> Option<&str> {
    Some(v).filter(|v| !v.is_empty())
}

impl<'a> FieldData<'a> {
    pub(crate) fn new(v: &'a FieldContext, layout: &'a Layout) -> Self {
        Self {
            receiver: non_empty(&v.receiver),
            field: non_empty(&v.field),
            method: non_empty(&v.method),
            field_type: v.field_type.as_deref().and_then(non_empty),
            base_type: v.base_type.as_deref().and_then(non_empty),
            transient: v.transient.as_deref().and_then(non_empty),
            by_ref: v.by_ref,
            indent: layout.unit(),
        }
    }
}

/// TypeContext carries the substitution data of a record or record slice
/// wrapper.
///
/// `indent` is one indentation unit; the wrappers nest their method bodies
/// with it. `alias_receiver` is set when `receiver` is not `self`, in which
/// case the methods rebind `self` under that name.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TypeContext<'a> {
    pub type_name: &'a str,
    pub receiver: &'a str,
    pub alias_receiver: bool,
    pub indent: &'a str,
    pub encode_body: &'a str,
    pub decode_body: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element_type: Option<&'a str>,
}

/// FileContext carries the substitution data of the file wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FileContext<'a> {
    pub package: &'a str,
    pub imports: &'a str,
    pub code: &'a str,
}

/// SafeName renders an identifier usable in generated code.
///
/// Keywords are written as raw identifiers, except for the few keywords that
/// cannot be raw, which get a `_v` suffix.
pub(crate) struct SafeName<T>(pub(crate) T)
where
    T: AsRef<str>;

impl<T> std::fmt::Display for SafeName<T>
where
    T: AsRef<str>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0.as_ref() {
            "self" | "Self" | "super" | "crate" => write!(f, "{}_v", self.0.as_ref()),
            "abstract" | "as" | "async" | "await" | "become" | "box" | "break" | "const"
            | "continue" | "do" | "dyn" | "else" | "enum" | "extern" | "false" | "final"
            | "fn" | "for" | "if" | "impl" | "in" | "let" | "loop" | "macro" | "match"
            | "mod" | "move" | "mut" | "override" | "priv" | "pub" | "ref" | "return"
            | "static" | "struct" | "trait" | "true" | "try" | "type" | "typeof"
            | "unsafe" | "unsized" | "use" | "virtual" | "where" | "while" | "yield" => {
                write!(f, "r#{}", self.0.as_ref())
            }
            _ => write!(f, "{}", self.0.as_ref()),
        }
    }
}
