//! Composes rendered fragments into coder impls and output files.
//!
//! Field fragments are nested in the record wrapper, which in turn is nested
//! with the import list in the file wrapper. Indentation at each level is owned
//! by a [`Block`] tree rendered with the caller's [`Layout`], never by the
//! fragments themselves.

mod block;
pub use block::*;

use crate::catalog::{BlockTemplate, Direction, FieldTemplate};
use crate::context::{FieldContext, FileContext, SafeName, TypeContext};
use crate::layout::Layout;
use crate::render::{render_block, render_field};
use crate::unit::{Field, FileUnit, Record, RecordSlice, TypeDecl};
use crate::{Error, Result};
use log::debug;
use std::collections::HashSet;

/// Names bound by the generated methods themselves: the coder parameter, the
/// record slice loop index and the aliased slice closure argument.
const RESERVED: [&str; 3] = ["coder", "i", "base"];

/// Renders the `BinaryCoder` impl of `record`.
///
/// Every field is rendered once per direction, in declaration order, so the
/// encode and decode bodies always agree on the wire layout. The first field
/// that fails to render aborts the whole record.
pub fn assemble_record(record: &Record, layout: &Layout) -> Result<String> {
    let contexts = resolve_fields(record)?;

    let mut encode = Vec::with_capacity(record.fields.len());
    let mut decode = Vec::with_capacity(record.fields.len());
    for (field, ctx) in record.fields.iter().zip(contexts.iter()) {
        encode.push(Block::text(render_record_field(
            record,
            field,
            ctx,
            Direction::Encode,
            layout,
        )?));
        decode.push(Block::text(render_record_field(
            record,
            field,
            ctx,
            Direction::Decode,
            layout,
        )?));
    }

    // Bodies sit inside the impl and the method.
    let encode_body = Block::Seq(encode).indent().indent().render(layout);
    let decode_body = Block::Seq(decode).indent().indent().render(layout);

    let out = render_block(
        BlockTemplate::Record,
        &TypeContext {
            type_name: &record.name,
            receiver: &record.receiver,
            alias_receiver: record.receiver != "self",
            indent: layout.unit(),
            encode_body: &encode_body,
            decode_body: &decode_body,
            element_type: None,
        },
    )?;

    debug!(
        "assembled coder for {} ({} fields)",
        record.name,
        record.fields.len()
    );

    Ok(out)
}

/// Renders the `BinaryCoder` impl of a newtype over `Vec<element>`.
pub fn assemble_record_slice(slice: &RecordSlice, layout: &Layout) -> Result<String> {
    let out = render_block(
        BlockTemplate::RecordSlice,
        &TypeContext {
            type_name: &slice.name,
            receiver: "self",
            alias_receiver: false,
            indent: layout.unit(),
            encode_body: "",
            decode_body: "",
            element_type: Some(&slice.element),
        },
    )?;

    debug!("assembled coder for {} (slice of {})", slice.name, slice.element);

    Ok(out)
}

pub fn assemble_type(decl: &TypeDecl, layout: &Layout) -> Result<String> {
    match decl {
        TypeDecl::Record(v) => assemble_record(v, layout),
        TypeDecl::RecordSlice(v) => assemble_record_slice(v, layout),
    }
}

/// Renders the complete output file for `unit`.
///
/// `imports` are `use` paths without the `use` keyword. A type declared twice
/// in `unit` is an error, as it would produce conflicting impls.
pub fn assemble_file(unit: &FileUnit, imports: &[String], layout: &Layout) -> Result<String> {
    let mut names = HashSet::new();
    let mut code = Vec::with_capacity(unit.types.len() * 2);
    for (i, decl) in unit.types.iter().enumerate() {
        if !names.insert(decl.name()) {
            return Err(Error::DuplicateType {
                package: unit.package.clone(),
                name: decl.name().to_string(),
            });
        }

        if i > 0 {
            code.push(Block::blank());
        }
        code.push(Block::text(assemble_type(decl, layout)?));
    }

    let imports = imports
        .iter()
        .map(|v| Block::text(format!("use {};", v)))
        .collect::<Vec<_>>();

    let package = SafeName(&unit.package).to_string();
    let imports = Block::Seq(imports).indent().render(layout);
    let code = Block::Seq(code).indent().render(layout);

    let out = render_block(
        BlockTemplate::File,
        &FileContext {
            package: &package,
            imports: &imports,
            code: &code,
        },
    )?;

    debug!(
        "assembled package {} ({} types)",
        unit.package,
        unit.types.len()
    );

    Ok(out)
}

fn render_record_field(
    record: &Record,
    field: &Field,
    ctx: &FieldContext,
    direction: Direction,
    layout: &Layout,
) -> Result<String> {
    render_field(FieldTemplate::new(field.shape, direction), ctx, layout).map_err(|e| {
        Error::Field {
            record: record.name.clone(),
            field: field.context.field.clone(),
            direction,
            source: Box::new(e),
        }
    })
}

/// Resolves the render context of every field.
///
/// Every field must be accessed through the record's receiver, and no
/// transient may be shared between fields or shadow a name the generated
/// methods bind.
fn resolve_fields(record: &Record) -> Result<Vec<FieldContext>> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(record.fields.len());

    for (i, f) in record.fields.iter().enumerate() {
        if f.context.receiver != record.receiver {
            return Err(Error::ReceiverMismatch {
                record: record.name.clone(),
                field: f.context.field.clone(),
                got: f.context.receiver.clone(),
                want: record.receiver.clone(),
            });
        }

        let ctx = f.context.resolve(i);
        if let Some(name) = ctx.transient.as_deref() {
            if RESERVED.contains(&name) || name == record.receiver {
                return Err(Error::ReservedTransient {
                    record: record.name.clone(),
                    name: name.to_string(),
                });
            }

            if !seen.insert(name.to_string()) {
                return Err(Error::DuplicateTransient {
                    record: record.name.clone(),
                    name: name.to_string(),
                });
            }
        }
        out.push(ctx);
    }

    Ok(out)
}
