use super::{Catalog, Direction};
use serde::{Deserialize, Serialize};

/// FieldShape classifies how a single record field is written to and read
/// from the wire.
///
/// The shape is decided by the field's declared type alone, never by its
/// value, and exactly one shape applies to each field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldShape {
    /// A base scalar (`i32`, `String`, ...) matching the coder method exactly.
    ScalarExact,
    /// A named type over a base scalar, converted with `From` in both
    /// directions.
    ScalarDerived,
    /// A `Vec` of base scalars.
    ScalarSlice,
    /// A `Vec` of named scalar types, converted element by element.
    DerivedScalarSlice,
    /// A `Vec` of `SliceAlias` wrappers, reinterpreted as the base slice
    /// without copying.
    AliasedSlice,
    /// A nested record held by value or behind a `Box`.
    Record,
    /// A `Vec` of nested records, written with a length token.
    RecordSlice,
    /// An embedded type carrying its own generated coder.
    EmbeddedAlias,
    /// An embedded slice type carrying its own generated coder.
    EmbeddedAliasSlice,
}

impl FieldShape {
    pub const ALL: [FieldShape; 9] = [
        FieldShape::ScalarExact,
        FieldShape::ScalarDerived,
        FieldShape::ScalarSlice,
        FieldShape::DerivedScalarSlice,
        FieldShape::AliasedSlice,
        FieldShape::Record,
        FieldShape::RecordSlice,
        FieldShape::EmbeddedAlias,
        FieldShape::EmbeddedAliasSlice,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ScalarExact => "scalar_exact",
            Self::ScalarDerived => "scalar_derived",
            Self::ScalarSlice => "scalar_slice",
            Self::DerivedScalarSlice => "derived_scalar_slice",
            Self::AliasedSlice => "aliased_slice",
            Self::Record => "record",
            Self::RecordSlice => "record_slice",
            Self::EmbeddedAlias => "embedded_alias",
            Self::EmbeddedAliasSlice => "embedded_alias_slice",
        }
    }
}

impl std::fmt::Display for FieldShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// FieldTemplate is the key of a field fragment: one shape in one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldTemplate {
    pub shape: FieldShape,
    pub direction: Direction,
}

impl FieldTemplate {
    pub const fn new(shape: FieldShape, direction: Direction) -> Self {
        Self { shape, direction }
    }

    pub const fn encode(shape: FieldShape) -> Self {
        Self::new(shape, Direction::Encode)
    }

    pub const fn decode(shape: FieldShape) -> Self {
        Self::new(shape, Direction::Decode)
    }
}

impl std::fmt::Display for FieldTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.direction, self.shape)
    }
}

// Fragments are written at column zero; the assembler indents them into the
// method bodies, and `indent` is the unit for any nesting inside a fragment. Encode fragments see `coder: &mut Writer`, decode fragments
// see `coder: &mut Reader`.

const ENCODE_SCALAR_EXACT: &str = "coder.{{method}}(&{{receiver}}.{{field}})?;";

const DECODE_SCALAR_EXACT: &str = "coder.{{method}}(&mut {{receiver}}.{{field}})?;";

const ENCODE_SCALAR_DERIVED: &str =
    "coder.{{method}}(&{{base_type}}::from({{receiver}}.{{field}}.clone()))?;";

// The coder only knows the base type, so decode through a base typed
// temporary and convert it into the field.
const DECODE_SCALAR_DERIVED: &str = r#"let mut {{transient}} = {{base_type}}::default();
coder.{{method}}(&mut {{transient}})?;
{{receiver}}.{{field}} = {{field_type}}::from({{transient}});"#;

const ENCODE_SCALAR_SLICE: &str = "coder.{{method}}(&{{receiver}}.{{field}})?;";

const DECODE_SCALAR_SLICE: &str = r#"let mut {{transient}}: Vec<{{base_type}}> = Vec::new();
coder.{{method}}(&mut {{transient}})?;
{{receiver}}.{{field}} = {{transient}};"#;

const ENCODE_DERIVED_SCALAR_SLICE: &str = r#"let {{transient}}: Vec<{{base_type}}> = {{receiver}}.{{field}}.iter().cloned().map({{base_type}}::from).collect();
coder.{{method}}(&{{transient}})?;"#;

const DECODE_DERIVED_SCALAR_SLICE: &str = r#"let mut {{transient}}: Vec<{{base_type}}> = Vec::new();
coder.{{method}}(&mut {{transient}})?;
{{receiver}}.{{field}} = {{transient}}.into_iter().map({{field_type}}::from).collect();"#;

// Aliased slices are never copied: the field's memory is handed to the coder
// as the base slice type. The layout proof is the `SliceAlias` impl.
const ENCODE_ALIASED_SLICE: &str =
    "coder.{{method}}(alias::as_base_slice(&{{receiver}}.{{field}}))?;";

const DECODE_ALIASED_SLICE: &str =
    "alias::with_base_vec(&mut {{receiver}}.{{field}}, |base| coder.{{method}}(base))?;";

const ENCODE_RECORD: &str =
    "coder.{{method}}(&{{#unless by_ref}}*{{/unless}}{{receiver}}.{{field}})?;";

// Boxed records are decoded into a freshly allocated instance.
const DECODE_RECORD: &str = r#"{{#unless by_ref}}{{receiver}}.{{field}} = Box::new({{field_type}}::default());
{{/unless}}coder.{{method}}(&mut {{#unless by_ref}}*{{/unless}}{{receiver}}.{{field}})?;"#;

const ENCODE_RECORD_SLICE: &str = r#"let {{transient}} = {{receiver}}.{{field}}.len();
coder.alloc({{transient}})?;
for i in 0..{{transient}} {
{{indent}}coder.{{method}}(&{{#unless by_ref}}*{{/unless}}{{receiver}}.{{field}}[i])?;
}"#;

const DECODE_RECORD_SLICE: &str = r#"let {{transient}} = coder.alloc()?;
{{receiver}}.{{field}} = (0..{{transient}}).map(|_| {{#if by_ref}}{{field_type}}::default(){{else}}Box::new({{field_type}}::default()){{/if}}).collect();
for i in 0..{{transient}} {
{{indent}}coder.{{method}}(&mut {{#unless by_ref}}*{{/unless}}{{receiver}}.{{field}}[i])?;
}"#;

const ENCODE_EMBEDDED: &str = "{{receiver}}.{{field}}.encode_binary(coder)?;";

const DECODE_EMBEDDED: &str = "{{receiver}}.{{field}}.decode_binary(coder)?;";

const FIELD_ENTRIES: &[(FieldTemplate, &str)] = &[
    (FieldTemplate::encode(FieldShape::ScalarExact), ENCODE_SCALAR_EXACT),
    (FieldTemplate::decode(FieldShape::ScalarExact), DECODE_SCALAR_EXACT),
    (FieldTemplate::encode(FieldShape::ScalarDerived), ENCODE_SCALAR_DERIVED),
    (FieldTemplate::decode(FieldShape::ScalarDerived), DECODE_SCALAR_DERIVED),
    (FieldTemplate::encode(FieldShape::ScalarSlice), ENCODE_SCALAR_SLICE),
    (FieldTemplate::decode(FieldShape::ScalarSlice), DECODE_SCALAR_SLICE),
    (
        FieldTemplate::encode(FieldShape::DerivedScalarSlice),
        ENCODE_DERIVED_SCALAR_SLICE,
    ),
    (
        FieldTemplate::decode(FieldShape::DerivedScalarSlice),
        DECODE_DERIVED_SCALAR_SLICE,
    ),
    (FieldTemplate::encode(FieldShape::AliasedSlice), ENCODE_ALIASED_SLICE),
    (FieldTemplate::decode(FieldShape::AliasedSlice), DECODE_ALIASED_SLICE),
    (FieldTemplate::encode(FieldShape::Record), ENCODE_RECORD),
    (FieldTemplate::decode(FieldShape::Record), DECODE_RECORD),
    (FieldTemplate::encode(FieldShape::RecordSlice), ENCODE_RECORD_SLICE),
    (FieldTemplate::decode(FieldShape::RecordSlice), DECODE_RECORD_SLICE),
    (FieldTemplate::encode(FieldShape::EmbeddedAlias), ENCODE_EMBEDDED),
    (FieldTemplate::decode(FieldShape::EmbeddedAlias), DECODE_EMBEDDED),
    (FieldTemplate::encode(FieldShape::EmbeddedAliasSlice), ENCODE_EMBEDDED),
    (FieldTemplate::decode(FieldShape::EmbeddedAliasSlice), DECODE_EMBEDDED),
];

/// The field fragment catalog, one entry per shape and direction.
pub static FIELD_CATALOG: Catalog<FieldTemplate> = Catalog::new("field", FIELD_ENTRIES);
