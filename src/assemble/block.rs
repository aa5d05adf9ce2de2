use crate::layout::Layout;

/// Block is a tree of text that owns the indentation of its content.
///
/// Rendered fragments are always written at column zero; nesting a block in
/// an [`Block::Indent`] shifts every non-empty line by one [`Layout::unit()`].
/// Every line is written newline terminated.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Text(String),
    Indent(Box<Block>),
    Seq(Vec<Block>),
}

impl Block {
    pub fn text<T: Into<String>>(v: T) -> Self {
        Self::Text(v.into())
    }

    /// A single empty line.
    pub fn blank() -> Self {
        Self::Text("\n".to_string())
    }

    pub fn indent(self) -> Self {
        Self::Indent(Box::new(self))
    }

    /// Renders the tree with `layout`.
    pub fn render(&self, layout: &Layout) -> String {
        let mut out = String::new();
        self.write_to(&mut out, layout.unit(), 0);
        out
    }

    fn write_to(&self, out: &mut String, unit: &str, depth: usize) {
        match self {
            Self::Text(v) => {
                for line in v.lines() {
                    if !line.is_empty() {
                        for _ in 0..depth {
                            out.push_str(unit);
                        }
                    }
                    out.push_str(line);
                    out.push('\n');
                }
            }
            Self::Indent(v) => v.write_to(out, unit, depth + 1),
            Self::Seq(v) => {
                for b in v {
                    b.write_to(out, unit, depth);
                }
            }
        }
    }
}
