//! The HTML renderer for the token stream.

use std::cell::Cell;
use std::io::{self, Write};

use crate::ctype::is_html_unsafe;
use crate::nodes::{MathKind, NodeMath, Token, TokenValue};
use crate::parser::{Options, Plugins};

/// Formats a token stream as HTML, with the default plugins.
pub fn format_document(
    tokens: &[Token],
    options: &Options,
    output: &mut dyn Write,
) -> io::Result<()> {
    format_document_with_plugins(tokens, options, output, &Plugins::default())
}

/// Formats a token stream as HTML, with the given plugins.
pub fn format_document_with_plugins(
    tokens: &[Token],
    options: &Options,
    output: &mut dyn Write,
    plugins: &Plugins,
) -> io::Result<()> {
    let mut f = HtmlFormatter::new(output, options, plugins);
    for token in tokens {
        f.format(token)?;
    }
    f.flush()
}

struct HtmlFormatter<'o, 'p> {
    output: &'o mut dyn Write,
    last_was_lf: Cell<bool>,
    options: &'o Options,
    plugins: &'o Plugins<'p>,
}

impl<'o, 'p> Write for HtmlFormatter<'o, 'p> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let l = buf.len();
        if l > 0 {
            self.last_was_lf.set(buf[l - 1] == b'\n');
        }
        self.output.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.output.flush()
    }
}

/// Writes `buffer` to `output`, escaping `"`, `&`, `<` and `>`.
///
/// ```rust
/// # use dollarmath::html::escape;
/// let mut out = vec![];
/// escape(&mut out, b"a < b && c").unwrap();
/// assert_eq!(out, b"a &lt; b &amp;&amp; c");
/// ```
pub fn escape(output: &mut dyn Write, buffer: &[u8]) -> io::Result<()> {
    let mut offset = 0;
    for (i, &byte) in buffer.iter().enumerate() {
        if !is_html_unsafe(byte) {
            continue;
        }

        let esc: &[u8] = match byte {
            b'"' => b"&quot;",
            b'&' => b"&amp;",
            b'<' => b"&lt;",
            _ => b"&gt;",
        };
        output.write_all(&buffer[offset..i])?;
        output.write_all(esc)?;
        offset = i + 1;
    }
    output.write_all(&buffer[offset..])
}

impl<'o, 'p> HtmlFormatter<'o, 'p> {
    fn new(output: &'o mut dyn Write, options: &'o Options, plugins: &'o Plugins<'p>) -> Self {
        HtmlFormatter {
            output,
            last_was_lf: Cell::new(true),
            options,
            plugins,
        }
    }

    fn cr(&mut self) -> io::Result<()> {
        if !self.last_was_lf.get() {
            self.write_all(b"\n")?;
        }
        Ok(())
    }

    fn escape(&mut self, buffer: &[u8]) -> io::Result<()> {
        escape(self, buffer)
    }

    fn format(&mut self, token: &Token) -> io::Result<()> {
        match token.value {
            TokenValue::ParagraphOpen => {
                self.cr()?;
                self.write_all(b"<p>")?;
            }
            TokenValue::ParagraphClose => {
                self.write_all(b"</p>\n")?;
            }
            TokenValue::HeadingOpen(level) => {
                self.cr()?;
                write!(self, "<h{}>", level)?;
            }
            TokenValue::HeadingClose(level) => {
                writeln!(self, "</h{}>", level)?;
            }
            TokenValue::ThematicBreak => {
                self.cr()?;
                self.write_all(b"<hr />\n")?;
            }
            TokenValue::CodeBlock(ref literal) => {
                self.cr()?;
                self.write_all(b"<pre><code>")?;
                self.escape(literal.as_bytes())?;
                self.write_all(b"</code></pre>\n")?;
            }
            TokenValue::Fence(ref fence) => {
                self.cr()?;
                match fence.info.split_whitespace().next() {
                    Some(lang) => {
                        self.write_all(b"<pre><code class=\"language-")?;
                        self.escape(lang.as_bytes())?;
                        self.write_all(b"\">")?;
                    }
                    None => self.write_all(b"<pre><code>")?,
                }
                self.escape(fence.literal.as_bytes())?;
                self.write_all(b"</code></pre>\n")?;
            }
            TokenValue::Inline(ref inline) => {
                for child in &inline.children {
                    self.format(child)?;
                }
            }
            TokenValue::Text(ref literal) => {
                self.escape(literal.as_bytes())?;
            }
            TokenValue::SoftBreak => {
                if self.options.render.hardbreaks {
                    self.write_all(b"<br />\n")?;
                } else {
                    self.write_all(b"\n")?;
                }
            }
            TokenValue::HardBreak => {
                self.write_all(b"<br />\n")?;
            }
            TokenValue::Code(ref literal) => {
                self.write_all(b"<code>")?;
                self.escape(literal.as_bytes())?;
                self.write_all(b"</code>")?;
            }
            TokenValue::Math(ref math) => {
                self.format_math(math, token.markup == "$$")?;
            }
        }
        Ok(())
    }

    fn format_math(&mut self, math: &NodeMath, display: bool) -> io::Result<()> {
        let block = math.is_block();
        if block {
            self.cr()?;
        }

        if let Some(adapter) = self.plugins.render.math_renderer {
            adapter.write_math(self, math, display)?;
            if block {
                self.cr()?;
            }
            return Ok(());
        }

        let tag = if display { "eqn" } else { "eq" };
        if block {
            self.write_all(b"<section>\n")?;
        }
        write!(self, "<{}>", tag)?;
        self.escape(math.content.as_bytes())?;
        write!(self, "</{}>", tag)?;

        if block {
            self.write_all(b"\n")?;
            if let MathKind::BlockWithLabel(ref label) = math.kind {
                self.write_all(b"<span class=\"eqno\">(")?;
                self.escape(label.as_bytes())?;
                self.write_all(b")</span>\n")?;
            }
            self.write_all(b"</section>\n")?;
        }
        Ok(())
    }
}
