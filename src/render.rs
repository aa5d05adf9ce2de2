//! Expands catalog fragments with handlebars.
//!
//! The registry runs in strict mode, so a fragment that references a value
//! the context does not carry fails instead of rendering an empty string, and
//! without escaping, since the output is Rust source rather than HTML.

use crate::catalog::{BlockTemplate, Catalog, FieldTemplate, BLOCK_CATALOG, FIELD_CATALOG};
use crate::context::{FieldContext, FieldData};
use crate::layout::Layout;
use crate::{Error, Result};
use handlebars::Handlebars;
use log::trace;
use serde::Serialize;

/// Looks up `key` in `catalog`, registers the fragment and expands it with
/// `data`.
///
/// Every call registers a fresh template instance named `<catalog>_<key>`, so
/// errors point at the catalog entry they came from and concurrent callers
/// share nothing but the immutable catalog.
pub fn render<K, T>(catalog: &Catalog<K>, key: K, data: &T) -> Result<String>
where
    K: Copy + PartialEq + std::fmt::Display + 'static,
    T: Serialize,
{
    let text = catalog.get(key)?;
    let name = format!("{}_{}", catalog.name(), key);

    trace!("rendering template {}", name);

    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    registry.register_escape_fn(handlebars::no_escape);

    if let Err(e) = registry.register_template_string(&name, text) {
        return Err(Error::TemplateSyntax {
            template: name,
            source: Box::new(e),
        });
    }

    registry
        .render(&name, data)
        .map_err(|e| Error::TemplateExecution {
            template: name.clone(),
            source: Box::new(e),
        })
}

pub fn render_field(key: FieldTemplate, ctx: &FieldContext, layout: &Layout) -> Result<String> {
    render(&FIELD_CATALOG, key, &FieldData::new(ctx, layout))
}

pub fn render_block<T: Serialize>(key: BlockTemplate, data: &T) -> Result<String> {
    render(&BLOCK_CATALOG, key, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Direction, FieldShape};

    macro_rules! test_render {
        ($name: ident, $shape: expr, $ctx: expr, $encode: expr, $decode: expr) => {
            #[test]
            fn $name() {
                let ctx = $ctx;

                let layout = Layout::default();

                let got = render_field(FieldTemplate::encode($shape), &ctx, &layout).unwrap();
                assert_eq!(got, $encode);

                let got = render_field(FieldTemplate::decode($shape), &ctx, &layout).unwrap();
                assert_eq!(got, $decode);
            }
        };
    }

    test_render!(
        test_scalar_exact,
        FieldShape::ScalarExact,
        FieldContext::new("name", "string").with_transient("tmp0"),
        "coder.string(&self.name)?;",
        "coder.string(&mut self.name)?;"
    );

    test_render!(
        test_scalar_derived,
        FieldShape::ScalarDerived,
        FieldContext::new("Count", "i32")
            .with_field_type("Count")
            .with_base_type("i32")
            .with_transient("tmp0"),
        "coder.i32(&i32::from(self.Count.clone()))?;",
        r#"let mut tmp0 = i32::default();
coder.i32(&mut tmp0)?;
self.Count = Count::from(tmp0);"#
    );

    test_render!(
        test_scalar_slice,
        FieldShape::ScalarSlice,
        FieldContext::new("values", "u64s")
            .with_base_type("u64")
            .with_transient("tmp1"),
        "coder.u64s(&self.values)?;",
        r#"let mut tmp1: Vec<u64> = Vec::new();
coder.u64s(&mut tmp1)?;
self.values = tmp1;"#
    );

    test_render!(
        test_derived_scalar_slice,
        FieldShape::DerivedScalarSlice,
        FieldContext::new("ids", "i32s")
            .with_field_type("UserId")
            .with_base_type("i32")
            .with_transient("tmp2"),
        r#"let tmp2: Vec<i32> = self.ids.iter().cloned().map(i32::from).collect();
coder.i32s(&tmp2)?;"#,
        r#"let mut tmp2: Vec<i32> = Vec::new();
coder.i32s(&mut tmp2)?;
self.ids = tmp2.into_iter().map(UserId::from).collect();"#
    );

    test_render!(
        test_aliased_slice,
        FieldShape::AliasedSlice,
        FieldContext::new("ids", "i32s")
            .with_field_type("UserId")
            .with_base_type("i32")
            .with_transient("tmp2"),
        "coder.i32s(alias::as_base_slice(&self.ids))?;",
        "alias::with_base_vec(&mut self.ids, |base| coder.i32s(base))?;"
    );

    test_render!(
        test_record_by_value,
        FieldShape::Record,
        FieldContext::new("header", "coder")
            .with_field_type("Header")
            .with_transient("tmp0"),
        "coder.coder(&self.header)?;",
        "coder.coder(&mut self.header)?;"
    );

    test_render!(
        test_record_boxed,
        FieldShape::Record,
        FieldContext::new("next", "coder")
            .with_field_type("Node")
            .with_transient("tmp0")
            .boxed(),
        "coder.coder(&*self.next)?;",
        r#"self.next = Box::new(Node::default());
coder.coder(&mut *self.next)?;"#
    );

    test_render!(
        test_record_slice,
        FieldShape::RecordSlice,
        FieldContext::new("Items", "coder")
            .with_field_type("Item")
            .with_transient("tmp4"),
        r#"let tmp4 = self.Items.len();
coder.alloc(tmp4)?;
for i in 0..tmp4 {
    coder.coder(&self.Items[i])?;
}"#,
        r#"let tmp4 = coder.alloc()?;
self.Items = (0..tmp4).map(|_| Item::default()).collect();
for i in 0..tmp4 {
    coder.coder(&mut self.Items[i])?;
}"#
    );

    test_render!(
        test_record_slice_boxed,
        FieldShape::RecordSlice,
        FieldContext::new("children", "coder")
            .with_field_type("Node")
            .with_transient("tmp5")
            .boxed(),
        r#"let tmp5 = self.children.len();
coder.alloc(tmp5)?;
for i in 0..tmp5 {
    coder.coder(&*self.children[i])?;
}"#,
        r#"let tmp5 = coder.alloc()?;
self.children = (0..tmp5).map(|_| Box::new(Node::default())).collect();
for i in 0..tmp5 {
    coder.coder(&mut *self.children[i])?;
}"#
    );

    test_render!(
        test_embedded_alias,
        FieldShape::EmbeddedAlias,
        FieldContext::new("meta", "coder").with_transient("tmp0"),
        "self.meta.encode_binary(coder)?;",
        "self.meta.decode_binary(coder)?;"
    );

    test_render!(
        test_embedded_alias_slice,
        FieldShape::EmbeddedAliasSlice,
        FieldContext::new("tags", "coder").with_transient("tmp0"),
        "self.tags.encode_binary(coder)?;",
        "self.tags.decode_binary(coder)?;"
    );

    test_render!(
        test_custom_receiver,
        FieldShape::ScalarExact,
        FieldContext::new("flag", "bool").with_receiver("msg"),
        "coder.bool(&msg.flag)?;",
        "coder.bool(&mut msg.flag)?;"
    );

    fn full_context() -> FieldContext {
        FieldContext::new("value", "i64")
            .with_field_type("Stamp")
            .with_base_type("i64")
            .with_transient("tmp9")
    }

    #[test]
    fn test_every_shape_renders_without_placeholders() {
        for shape in FieldShape::ALL.iter() {
            for direction in Direction::ALL.iter() {
                let key = FieldTemplate::new(*shape, *direction);
                let got = render_field(key, &full_context(), &Layout::default()).unwrap();

                assert!(!got.contains("{{"), "{} left a placeholder: {}", key, got);
                assert!(!got.contains("}}"), "{} left a placeholder: {}", key, got);
                assert!(got.contains("self.value"), "{} lost the field: {}", key, got);

                let token = match shape {
                    FieldShape::EmbeddedAlias | FieldShape::EmbeddedAliasSlice => {
                        format!("{}_binary(coder)", direction)
                    }
                    _ => "i64(".to_string(),
                };
                assert!(got.contains(&token), "{} missing {}: {}", key, token, got);
            }
        }
    }

    #[test]
    fn test_scalar_round_trip_symmetry() {
        for shape in &[
            FieldShape::ScalarExact,
            FieldShape::ScalarDerived,
            FieldShape::ScalarSlice,
            FieldShape::DerivedScalarSlice,
            FieldShape::AliasedSlice,
        ] {
            let layout = Layout::default();
            let encode =
                render_field(FieldTemplate::encode(*shape), &full_context(), &layout).unwrap();
            let decode =
                render_field(FieldTemplate::decode(*shape), &full_context(), &layout).unwrap();

            for got in &[encode, decode] {
                assert!(got.contains("self.value"), "{}: {}", shape, got);
                assert!(got.contains("coder.i64("), "{}: {}", shape, got);
            }
        }
    }

    #[test]
    fn test_aliased_slice_never_uses_transient() {
        for direction in Direction::ALL.iter() {
            let key = FieldTemplate::new(FieldShape::AliasedSlice, *direction);
            let got = render_field(key, &full_context(), &Layout::default()).unwrap();

            assert!(!got.contains("tmp9"), "{}: {}", key, got);
            assert!(!got.contains("let "), "{}: {}", key, got);
            assert!(!got.contains("Vec<"), "{}: {}", key, got);
        }

        let got = render_field(
            FieldTemplate::decode(FieldShape::DerivedScalarSlice),
            &full_context(),
            &Layout::default(),
        )
        .unwrap();
        assert!(got.contains("let mut tmp9: Vec<i64>"), "{}", got);
    }

    #[test]
    fn test_record_slice_loop_bound_is_length_token() {
        let got = render_field(
            FieldTemplate::decode(FieldShape::RecordSlice),
            &FieldContext::new("Items", "coder")
                .with_field_type("Item")
                .with_transient("n"),
            &Layout::default(),
        )
        .unwrap();

        let lines = got.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "let n = coder.alloc()?;");
        assert_eq!(lines[1], "self.Items = (0..n).map(|_| Item::default()).collect();");
        assert_eq!(lines[2], "for i in 0..n {");
        assert!(!got.contains("with_capacity"), "{}", got);
    }

    #[test]
    fn test_record_slice_indent_unit() {
        let ctx = FieldContext::new("items", "coder")
            .with_field_type("Item")
            .with_transient("n");

        let got = render_field(
            FieldTemplate::encode(FieldShape::RecordSlice),
            &ctx,
            &Layout::new(2),
        )
        .unwrap();

        assert_eq!(
            got,
            r#"let n = self.items.len();
coder.alloc(n)?;
for i in 0..n {
  coder.coder(&self.items[i])?;
}"#
        );
    }

    #[test]
    fn test_record_slice_propagates_element_errors() {
        for direction in Direction::ALL.iter() {
            let key = FieldTemplate::new(FieldShape::RecordSlice, *direction);
            let got = render_field(key, &full_context(), &Layout::default()).unwrap();

            let call = got
                .lines()
                .find(|l| l.contains("coder.i64("))
                .unwrap_or_else(|| panic!("{} has no element call: {}", key, got));
            assert!(call.trim_end().ends_with(")?;"), "{}: {}", key, call);
            assert!(!got.contains("return"), "{} swallows errors: {}", key, got);
        }
    }

    #[test]
    fn test_missing_base_type() {
        let ctx = FieldContext::new("count", "i32")
            .with_field_type("Count")
            .with_transient("tmp0");

        let key = FieldTemplate::decode(FieldShape::ScalarDerived);
        match render_field(key, &ctx, &Layout::default()) {
            Err(Error::TemplateExecution { template, source }) => {
                assert_eq!(template, "field_decode_scalar_derived");
                assert!(source.to_string().contains("base_type"), "{}", source);
            }
            e => panic!("unexpected result {:?}", e),
        }
    }

    #[test]
    fn test_empty_value_is_missing() {
        let ctx = full_context().with_base_type("");

        let key = FieldTemplate::encode(FieldShape::ScalarDerived);
        match render_field(key, &ctx, &Layout::default()) {
            Err(Error::TemplateExecution { template, .. }) => {
                assert_eq!(template, "field_encode_scalar_derived")
            }
            e => panic!("unexpected result {:?}", e),
        }
    }

    #[test]
    fn test_unregistered_key() {
        const ENTRIES: &[(FieldTemplate, &str)] = &[];
        static EMPTY: Catalog<FieldTemplate> = Catalog::new("empty", ENTRIES);

        let got = render(
            &EMPTY,
            FieldTemplate::encode(FieldShape::ScalarExact),
            &full_context(),
        );
        match got {
            Err(Error::TemplateNotFound { catalog, key }) => {
                assert_eq!(catalog, "empty");
                assert_eq!(key, "encode_scalar_exact");
            }
            e => panic!("unexpected result {:?}", e),
        }
    }

    #[test]
    fn test_broken_fragment() {
        const ENTRIES: &[(FieldTemplate, &str)] = &[(
            FieldTemplate::encode(FieldShape::ScalarExact),
            "{{#if by_ref}}coder.{{method}}(&{{receiver}}.{{field}})?;{{/unless}}",
        )];
        static BROKEN: Catalog<FieldTemplate> = Catalog::new("broken", ENTRIES);

        let got = render(
            &BROKEN,
            FieldTemplate::encode(FieldShape::ScalarExact),
            &full_context(),
        );
        match got {
            Err(Error::TemplateSyntax { template, .. }) => {
                assert_eq!(template, "broken_encode_scalar_exact")
            }
            e => panic!("unexpected result {:?}", e),
        }
    }

    #[test]
    fn test_concurrent_rendering() {
        let want = render_field(
            FieldTemplate::decode(FieldShape::RecordSlice),
            &full_context(),
            &Layout::default(),
        )
        .unwrap();

        std::thread::scope(|s| {
            let handles = (0..8)
                .map(|_| {
                    s.spawn(|| {
                        render_field(
                            FieldTemplate::decode(FieldShape::RecordSlice),
                            &full_context(),
                            &Layout::default(),
                        )
                        .unwrap()
                    })
                })
                .collect::<Vec<_>>();

            for h in handles {
                assert_eq!(h.join().unwrap(), want);
            }
        });
    }
}
