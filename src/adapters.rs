//! Adapter traits for plugins.
//!
//! Each plugin has to implement one of the traits available in this module.

use std::io::{self, Write};

use crate::nodes::NodeMath;

/// Implement this adapter for creating a plugin for custom rendering of
/// math spans and blocks, e.g. server-side KaTeX or MathML.
pub trait MathAdapter {
    /// Writes the rendered form of `math` to `output`.
    ///
    /// `display` is true for block math and for inline spans written with
    /// `$$`.  The content is passed raw; escaping is up to the adapter.
    fn write_math(&self, output: &mut dyn Write, math: &NodeMath, display: bool)
        -> io::Result<()>;
}
