//! A CommonMark-style Markdown parser with dollar-delimited math.
//!
//! Inline math is written `$...$`; block math opens a line with `$$` and
//! runs to the first line ending in `$$`, optionally followed by an
//! equation label such as `(eq1)`.  The extension is off by default.
//!
//! ```rust
//! use dollarmath::{markdown_to_html, MathOptions, Options};
//!
//! let mut options = Options::default();
//! options.extension.math_dollars = Some(MathOptions::default());
//! assert_eq!(markdown_to_html("Euler: $e^{i\\pi} + 1 = 0$\n", &options),
//!            "<p>Euler: <eq>e^{i\\pi} + 1 = 0</eq></p>\n");
//! ```
//!
//! Parsing and rendering can also be done separately:
//!
//! ```rust
//! use dollarmath::{format_html, parse_document, MathOptions, Options};
//! use dollarmath::nodes::MathKind;
//!
//! let mut options = Options::default();
//! options.extension.math_dollars = Some(MathOptions::default());
//! let tokens = parse_document("$$ a = 1 $$ (eq1)\n", &options);
//! let math = tokens[0].math().unwrap();
//! assert_eq!(math.kind, MathKind::BlockWithLabel("eq1".into()));
//!
//! let mut html = vec![];
//! format_html(&tokens, &options, &mut html).unwrap();
//! assert_eq!(String::from_utf8(html).unwrap(),
//!            "<section>\n<eqn> a = 1 </eqn>\n<span class=\"eqno\">(eq1)</span>\n</section>\n");
//! ```

#![deny(
    missing_docs,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]
#![allow(unknown_lints, clippy::doc_markdown, clippy::too_many_arguments)]

use std::io::{self, Write};

use tracing::warn;

pub mod adapters;
pub mod cm;
mod ctype;
pub mod html;
pub mod nodes;
pub mod parser;
mod strings;
#[cfg(test)]
mod tests;

pub use cm::format_document as format_commonmark;
pub use html::format_document as format_html;
pub use html::format_document_with_plugins as format_html_with_plugins;
pub use nodes::{MathKind, NodeMath, Token, TokenValue};
pub use parser::{
    parse_document, Extension, MathOptions, Options, Parse, Parser, Plugins, Render,
    RenderPlugins, RulerError,
};

/// Render Markdown to HTML.
///
/// See the documentation of the crate root for an example.
pub fn markdown_to_html(md: &str, options: &Options) -> String {
    markdown_to_html_with_plugins(md, options, &Plugins::default())
}

/// Render Markdown to HTML using plugins.
///
/// See the documentation of the crate root for an example.
pub fn markdown_to_html_with_plugins(md: &str, options: &Options, plugins: &Plugins) -> String {
    let tokens = parse_document(md, options);
    render_to_string(|out| format_html_with_plugins(&tokens, options, out, plugins))
}

/// Render Markdown back to CommonMark.
///
/// Math is written back with the delimiters it was parsed from.
///
/// ```rust
/// # use dollarmath::{markdown_to_commonmark, MathOptions, Options};
/// let mut options = Options::default();
/// options.extension.math_dollars = Some(MathOptions::default());
/// assert_eq!(markdown_to_commonmark("Costs \\$5, or $x$.\n", &options),
///            "Costs \\$5, or $x$.\n");
/// ```
pub fn markdown_to_commonmark(md: &str, options: &Options) -> String {
    let tokens = parse_document(md, options);
    render_to_string(|out| format_commonmark(&tokens, options, out))
}

fn render_to_string(render: impl FnOnce(&mut dyn Write) -> io::Result<()>) -> String {
    let mut out = Vec::with_capacity(256);
    if let Err(err) = render(&mut out) {
        warn!(%err, "rendering to a buffer failed");
    }
    match String::from_utf8(out) {
        Ok(s) => s,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    }
}
