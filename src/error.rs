use crate::catalog::Direction;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to lookup template for {catalog}.{key}")]
    TemplateNotFound { catalog: &'static str, key: String },

    #[error("failed to parse template {template}: {source}")]
    TemplateSyntax {
        template: String,
        #[source]
        source: Box<handlebars::TemplateError>,
    },

    #[error("failed to expand template {template}: {source}")]
    TemplateExecution {
        template: String,
        #[source]
        source: Box<handlebars::RenderError>,
    },

    #[error("failed to {direction} field {field} of {record}: {source}")]
    Field {
        record: String,
        field: String,
        direction: Direction,
        #[source]
        source: Box<Error>,
    },

    #[error("transient variable {name} used by more than one field of {record}")]
    DuplicateTransient { record: String, name: String },

    #[error("transient variable {name} of {record} shadows a name used by the generated code")]
    ReservedTransient { record: String, name: String },

    #[error("field {field} of {record} is accessed through {got}, but the record binds {want}")]
    ReceiverMismatch {
        record: String,
        field: String,
        got: String,
        want: String,
    },

    #[error("type {name} declared more than once in package {package}")]
    DuplicateType { package: String, name: String },

    #[error("invalid manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}
