//! Configuration for the parser and renderer.  Extensions affect both.

#[cfg(feature = "bon")]
use bon::Builder;

use crate::adapters::MathAdapter;
use std::fmt::{self, Debug, Formatter};

#[derive(Default, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
/// Umbrella options struct.
pub struct Options {
    /// Enable extensions.
    pub extension: Extension,

    /// Configure parse-time options.
    pub parse: Parse,

    /// Configure render-time options.
    pub render: Render,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "bon", derive(Builder))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
/// Options to select extensions.
pub struct Extension {
    /// Enables dollar math, configured by the given [`MathOptions`].
    ///
    /// Inline math is written `$1 + 2$`; block math opens a line with `$$`
    /// and closes at the first line ending in `$$`, optionally followed by
    /// an equation label.
    ///
    /// ```rust
    /// # use dollarmath::{markdown_to_html, MathOptions, Options};
    /// let mut options = Options::default();
    /// options.extension.math_dollars = Some(MathOptions::default());
    /// assert_eq!(markdown_to_html("Inline $1 + 2$.\n", &options),
    ///            "<p>Inline <eq>1 + 2</eq>.</p>\n");
    /// assert_eq!(markdown_to_html("$$\nx^2\n$$ (eq1)\n", &options),
    ///            "<section>\n<eqn>\nx^2\n</eqn>\n<span class=\"eqno\">(eq1)</span>\n</section>\n");
    /// ```
    pub math_dollars: Option<MathOptions>,
}

/// The switches for dollar math.  Fixed once a parser is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "bon", derive(Builder))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct MathOptions {
    /// Recognise a trailing equation label on block math, e.g.
    /// `$$ a=1 $$ (eq1)`.
    ///
    /// ```rust
    /// # use dollarmath::{markdown_to_html, MathOptions, Options};
    /// let mut options = Options::default();
    /// options.extension.math_dollars = Some(MathOptions::default());
    /// assert_eq!(markdown_to_html("$$a$$ (1)\n", &options),
    ///            "<section>\n<eqn>a</eqn>\n<span class=\"eqno\">(1)</span>\n</section>\n");
    /// ```
    #[cfg_attr(feature = "bon", builder(default = true))]
    pub allow_labels: bool,

    /// Accept inline math with whitespace just inside a delimiter, e.g.
    /// `$ a $`.
    ///
    /// ```rust
    /// # use dollarmath::{markdown_to_html, MathOptions, Options};
    /// let mut options = Options::default();
    /// options.extension.math_dollars = Some(MathOptions {
    ///     allow_space_adjacency: false,
    ///     ..MathOptions::default()
    /// });
    /// assert_eq!(markdown_to_html("$ a $ and $b$\n", &options),
    ///            "<p>$ a $ and <eq>b</eq></p>\n");
    /// ```
    #[cfg_attr(feature = "bon", builder(default = true))]
    pub allow_space_adjacency: bool,

    /// Accept inline math with a digit just outside a delimiter, e.g.
    /// `1$a$` or `$a$2`.
    ///
    /// ```rust
    /// # use dollarmath::{markdown_to_html, MathOptions, Options};
    /// let mut options = Options::default();
    /// options.extension.math_dollars = Some(MathOptions {
    ///     allow_digit_adjacency: false,
    ///     ..MathOptions::default()
    /// });
    /// assert_eq!(markdown_to_html("$x$2\n", &options),
    ///            "<p>$x$2</p>\n");
    /// ```
    #[cfg_attr(feature = "bon", builder(default = true))]
    pub allow_digit_adjacency: bool,

    /// Look for `$$...$$` spans inside paragraphs as well as at the start
    /// of a line.
    ///
    /// ```rust
    /// # use dollarmath::{markdown_to_html, MathOptions, Options};
    /// let mut options = Options::default();
    /// options.extension.math_dollars = Some(MathOptions {
    ///     double_dollar_inline: true,
    ///     ..MathOptions::default()
    /// });
    /// assert_eq!(markdown_to_html("so $$x$$ holds\n", &options),
    ///            "<p>so <eqn>x</eqn> holds</p>\n");
    /// ```
    #[cfg_attr(feature = "bon", builder(default))]
    pub double_dollar_inline: bool,
}

impl Default for MathOptions {
    fn default() -> Self {
        MathOptions {
            allow_labels: true,
            allow_space_adjacency: true,
            allow_digit_adjacency: true,
            double_dollar_inline: false,
        }
    }
}

#[derive(Default, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "bon", derive(Builder))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
/// Options for parser functions.
pub struct Parse {
    /// The default info string for fenced code blocks.
    ///
    /// ```rust
    /// # use dollarmath::{markdown_to_html, Options};
    /// let mut options = Options::default();
    /// assert_eq!(markdown_to_html("```\nfn hello();\n```\n", &options),
    ///            "<pre><code>fn hello();\n</code></pre>\n");
    ///
    /// options.parse.default_info_string = Some("rust".into());
    /// assert_eq!(markdown_to_html("```\nfn hello();\n```\n", &options),
    ///            "<pre><code class=\"language-rust\">fn hello();\n</code></pre>\n");
    /// ```
    pub default_info_string: Option<String>,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "bon", derive(Builder))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
/// Options for formatter functions.
pub struct Render {
    /// [Soft line breaks](http://spec.commonmark.org/0.27/#soft-line-breaks) in the input
    /// translate into hard line breaks in the output.
    ///
    /// ```rust
    /// # use dollarmath::{markdown_to_html, Options};
    /// let mut options = Options::default();
    /// assert_eq!(markdown_to_html("Hello.\nWorld.\n", &options),
    ///            "<p>Hello.\nWorld.</p>\n");
    ///
    /// options.render.hardbreaks = true;
    /// assert_eq!(markdown_to_html("Hello.\nWorld.\n", &options),
    ///            "<p>Hello.<br />\nWorld.</p>\n");
    /// ```
    #[cfg_attr(feature = "bon", builder(default))]
    pub hardbreaks: bool,
}

#[derive(Default, Debug, Clone, Copy)]
#[cfg_attr(feature = "bon", derive(Builder))]
/// Umbrella plugins struct.
pub struct Plugins<'p> {
    /// Configure render-time plugins.
    #[cfg_attr(feature = "bon", builder(default))]
    pub render: RenderPlugins<'p>,
}

#[derive(Default, Clone, Copy)]
#[cfg_attr(feature = "bon", derive(Builder))]
/// Plugins for alternative rendering.
pub struct RenderPlugins<'p> {
    /// Provide a math renderer plugin to be used instead of the default
    /// `<eq>`/`<eqn>`/`<section>` markup.
    ///
    /// ```rust
    /// # use dollarmath::{markdown_to_html_with_plugins, MathOptions, Options, Plugins};
    /// # use dollarmath::adapters::MathAdapter;
    /// # use dollarmath::nodes::NodeMath;
    /// # use std::io::{self, Write};
    /// struct Katexish;
    ///
    /// impl MathAdapter for Katexish {
    ///     fn write_math(
    ///         &self,
    ///         output: &mut dyn Write,
    ///         math: &NodeMath,
    ///         _display: bool,
    ///     ) -> io::Result<()> {
    ///         write!(output, "<katex>{}</katex>", math.content)
    ///     }
    /// }
    ///
    /// let mut options = Options::default();
    /// options.extension.math_dollars = Some(MathOptions::default());
    /// let mut plugins = Plugins::default();
    /// plugins.render.math_renderer = Some(&Katexish);
    /// assert_eq!(markdown_to_html_with_plugins("$x$\n", &options, &plugins),
    ///            "<p><katex>x</katex></p>\n");
    /// ```
    pub math_renderer: Option<&'p dyn MathAdapter>,
}

impl Debug for RenderPlugins<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderPlugins")
            .field(
                "math_renderer",
                &self.math_renderer.map(|_| "impl MathAdapter"),
            )
            .finish()
    }
}
