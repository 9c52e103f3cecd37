//! Bounded textual rendering of remote values

use crate::config::Config;
use crate::core::types::Result;
use crate::objects::object::PyObject;

/// Rendering limits, usually derived from the engine configuration
#[derive(Debug, Clone)]
pub struct ReprOptions {
    /// Container element count above which a top-level repr shows only a
    /// length summary
    pub max_joined_items: usize,
    /// Upper bound for remote string reads during rendering
    pub max_string_length: usize,
    /// Nesting depth past which elements render as an elision marker.
    /// Self-referential containers in target memory would otherwise
    /// recurse without bound.
    pub max_depth: usize,
}

impl ReprOptions {
    /// Derives options from an engine configuration
    pub fn from_config(config: &Config) -> Self {
        ReprOptions {
            max_joined_items: config.repr.max_joined_items,
            max_string_length: config.repr.max_string_length,
            max_depth: config.repr.max_depth,
        }
    }
}

impl Default for ReprOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Accumulates the textual form of a value tree.
///
/// The builder tracks nesting depth: a container rendered at the top
/// level bounds its output with a length-only summary, while the same
/// container nested inside another repr renders its full element list so
/// previews stay informative.
pub struct ReprBuilder {
    out: String,
    options: ReprOptions,
    depth: usize,
}

impl ReprBuilder {
    /// Creates a top-level builder
    pub fn new(options: ReprOptions) -> Self {
        ReprBuilder {
            out: String::new(),
            options,
            depth: 0,
        }
    }

    /// True while rendering the outermost value
    pub fn is_top_level(&self) -> bool {
        self.depth == 0
    }

    /// Rendering limits
    pub fn options(&self) -> &ReprOptions {
        &self.options
    }

    /// Appends literal text
    pub fn append(&mut self, text: &str) {
        self.out.push_str(text);
    }

    /// Resolves and renders a nested object.
    ///
    /// An element that fails to resolve or render with a recoverable error
    /// becomes an `<unreadable>` leaf instead of aborting the enclosing
    /// repr; `TypeMismatch`/`Unsupported` still propagate. Past
    /// `max_depth` levels of nesting the element renders as `...`, which
    /// keeps cyclic object graphs in corrupt targets from recursing
    /// without bound.
    pub fn append_repr(&mut self, object: &PyObject) -> Result<()> {
        if self.depth >= self.options.max_depth {
            self.append("...");
            return Ok(());
        }
        self.depth += 1;
        let rendered = object.resolve().and_then(|value| value.repr(self));
        self.depth -= 1;

        match rendered {
            Ok(()) => Ok(()),
            Err(e) if e.is_recoverable() => {
                self.append("<unreadable>");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Renders `items` separated by `separator`
    pub fn append_joined<T, I, F>(&mut self, separator: &str, items: I, mut f: F) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        F: FnMut(&mut Self, T) -> Result<()>,
    {
        let mut first = true;
        for item in items {
            if !first {
                self.append(separator);
            }
            first = false;
            f(self, item)?;
        }
        Ok(())
    }

    /// Consumes the builder and returns the accumulated text
    pub fn finish(self) -> String {
        self.out
    }
}
