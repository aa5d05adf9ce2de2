/// The indentation width of generated code when none is configured.
pub const DEFAULT_INDENT: usize = 4;

/// Layout controls the whitespace of generated code.
///
/// Fragments never carry literal indentation; every nesting level is one
/// [`Layout::unit()`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    unit: String,
}

impl std::default::Default for Layout {
    fn default() -> Self {
        Self::new(DEFAULT_INDENT)
    }
}

impl Layout {
    /// Indent by `width` spaces per level.
    pub fn new(width: usize) -> Self {
        Self {
            unit: " ".repeat(width),
        }
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }
}
