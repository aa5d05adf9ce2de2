use super::Catalog;

/// BlockTemplate is the key of a wrapper fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockTemplate {
    /// The output unit: header, module declaration, imports and code.
    File,
    /// A `BinaryCoder` impl for a record, around its rendered field bodies.
    Record,
    /// A `BinaryCoder` impl for a newtype over `Vec<Record>`.
    RecordSlice,
}

impl BlockTemplate {
    pub const ALL: [BlockTemplate; 3] = [
        BlockTemplate::File,
        BlockTemplate::Record,
        BlockTemplate::RecordSlice,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Record => "record",
            Self::RecordSlice => "record_slice",
        }
    }
}

impl std::fmt::Display for BlockTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// `imports` and `code` arrive indented and newline terminated.
const FILE: &str = r#"// Code generated by bincodegen. DO NOT EDIT.

#[allow(unused_imports, unused_variables, clippy::all)]
pub mod {{package}} {
{{imports}}
{{code}}}
"#;

// The bodies arrive indented into the method and newline terminated, so an
// empty record still renders a well formed impl. A receiver other than `self`
// is bound at the top of each method.
const RECORD: &str = r#"impl BinaryCoder for {{type_name}} {
{{indent}}fn encode_binary(&self, coder: &mut Writer) -> Result<(), Error> {
{{#if alias_receiver}}{{indent}}{{indent}}let {{receiver}} = self;
{{/if}}{{encode_body}}{{indent}}{{indent}}Ok(())
{{indent}}}

{{indent}}fn decode_binary(&mut self, coder: &mut Reader) -> Result<(), Error> {
{{#if alias_receiver}}{{indent}}{{indent}}let {{receiver}} = self;
{{/if}}{{decode_body}}{{indent}}{{indent}}Ok(())
{{indent}}}
}"#;

const RECORD_SLICE: &str = r#"impl BinaryCoder for {{type_name}} {
{{indent}}fn encode_binary(&self, coder: &mut Writer) -> Result<(), Error> {
{{indent}}{{indent}}let size = self.0.len();
{{indent}}{{indent}}coder.alloc(size)?;
{{indent}}{{indent}}for i in 0..size {
{{indent}}{{indent}}{{indent}}coder.coder(&self.0[i])?;
{{indent}}{{indent}}}
{{indent}}{{indent}}Ok(())
{{indent}}}

{{indent}}fn decode_binary(&mut self, coder: &mut Reader) -> Result<(), Error> {
{{indent}}{{indent}}let size = coder.alloc()?;
{{indent}}{{indent}}self.0 = (0..size).map(|_| {{element_type}}::default()).collect();
{{indent}}{{indent}}for i in 0..size {
{{indent}}{{indent}}{{indent}}coder.coder(&mut self.0[i])?;
{{indent}}{{indent}}}
{{indent}}{{indent}}Ok(())
{{indent}}}
}"#;

const BLOCK_ENTRIES: &[(BlockTemplate, &str)] = &[
    (BlockTemplate::File, FILE),
    (BlockTemplate::Record, RECORD),
    (BlockTemplate::RecordSlice, RECORD_SLICE),
];

/// The wrapper catalog.
pub static BLOCK_CATALOG: Catalog<BlockTemplate> = Catalog::new("block", BLOCK_ENTRIES);
