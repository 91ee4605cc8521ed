//! The CommonMark renderer for the token stream.
//!
//! Math is written back exactly as it was delimited, so parsing the output
//! with the same options yields the same math payloads.

use std::cmp::max;
use std::io::{self, Write};

use crate::ctype::ispunct;
use crate::nodes::{MathKind, NodeFence, NodeMath, Token, TokenValue};
use crate::parser::Options;
use crate::strings::longest_run;

/// Formats a token stream as CommonMark, modified by the given options.
pub fn format_document(
    tokens: &[Token],
    options: &Options,
    output: &mut dyn Write,
) -> io::Result<()> {
    let mut f = CommonMarkFormatter::new(options);
    for token in tokens {
        f.format(token);
    }
    if f.v.last().map_or(false, |&c| c != b'\n') {
        f.v.push(b'\n');
    }
    output.write_all(&f.v)
}

struct CommonMarkFormatter<'o> {
    options: &'o Options,
    v: Vec<u8>,
    need_cr: u8,
    begin_content: bool,
}

#[derive(PartialEq, Clone, Copy)]
enum Escaping {
    Literal,
    Normal,
}

impl<'o> CommonMarkFormatter<'o> {
    fn new(options: &'o Options) -> Self {
        CommonMarkFormatter {
            options,
            v: vec![],
            need_cr: 0,
            begin_content: true,
        }
    }

    fn output(&mut self, buf: &[u8], escaping: Escaping) {
        let mut k = self.v.len();
        while self.need_cr > 0 {
            if k == 0 || self.v[k - 1] == b'\n' {
                k = k.saturating_sub(1);
            } else {
                self.v.push(b'\n');
            }
            self.begin_content = true;
            self.need_cr -= 1;
        }

        for &c in buf {
            if escaping == Escaping::Normal && self.needs_escaping(c) {
                self.v.push(b'\\');
            }
            self.v.push(c);

            self.begin_content = c == b'\n';
        }
    }

    fn needs_escaping(&self, c: u8) -> bool {
        if !ispunct(c) {
            return false;
        }

        // Always significant inline, or capable of closing a heading.
        if matches!(c, b'\\' | b'`' | b'$' | b'#' | b'*' | b'_') {
            return true;
        }

        // Could open a block at the start of a line.
        self.begin_content && matches!(c, b'-' | b'+' | b'=' | b'~')
    }

    fn literal(&mut self, buf: &[u8]) {
        self.output(buf, Escaping::Literal);
    }

    fn cr(&mut self) {
        self.need_cr = max(self.need_cr, 1);
    }

    fn blankline(&mut self) {
        self.need_cr = max(self.need_cr, 2);
    }

    fn format(&mut self, token: &Token) {
        match token.value {
            TokenValue::ParagraphOpen => {
                self.blankline();
            }
            TokenValue::ParagraphClose => {
                self.cr();
            }
            TokenValue::HeadingOpen(level) => {
                self.blankline();
                self.literal(&b"######"[..usize::from(level.clamp(1, 6))]);
                self.literal(b" ");
            }
            TokenValue::HeadingClose(_) => {
                self.cr();
            }
            TokenValue::ThematicBreak => {
                self.blankline();
                self.literal(b"-----");
                self.cr();
            }
            TokenValue::CodeBlock(ref literal) => {
                self.blankline();
                self.format_code_block(literal);
            }
            TokenValue::Fence(ref fence) => {
                self.blankline();
                self.format_fence(fence);
            }
            TokenValue::Inline(ref inline) => {
                for child in &inline.children {
                    self.format(child);
                }
            }
            TokenValue::Text(ref literal) => {
                self.output(literal.as_bytes(), Escaping::Normal);
            }
            TokenValue::SoftBreak => {
                if self.options.render.hardbreaks {
                    self.literal(b"\\\n");
                } else {
                    self.literal(b"\n");
                }
            }
            TokenValue::HardBreak => {
                self.literal(b"\\\n");
            }
            TokenValue::Code(ref literal) => {
                self.format_code(literal.as_bytes());
            }
            TokenValue::Math(ref math) => {
                self.format_math(math, &token.markup);
            }
        }
    }

    fn format_code(&mut self, literal: &[u8]) {
        let numticks = longest_run(literal, b'`') + 1;
        let all_space = literal.iter().all(|&c| c == b' ');
        let has_edge_space = literal.first() == Some(&b' ') || literal.last() == Some(&b' ');
        let has_edge_backtick = literal.first() == Some(&b'`') || literal.last() == Some(&b'`');
        let pad = literal.is_empty() || has_edge_backtick || (!all_space && has_edge_space);

        let ticks = vec![b'`'; numticks];
        self.literal(&ticks);
        if pad {
            self.literal(b" ");
        }
        self.literal(literal);
        if pad {
            self.literal(b" ");
        }
        self.literal(&ticks);
    }

    fn format_code_block(&mut self, literal: &str) {
        for line in literal.lines() {
            if !line.is_empty() {
                self.literal(b"    ");
                self.literal(line.as_bytes());
            }
            self.literal(b"\n");
        }
        self.cr();
    }

    fn format_fence(&mut self, fence: &NodeFence) {
        let marker = if fence.info.contains('`') { b'~' } else { b'`' };
        let fence_len = max(3, longest_run(fence.literal.as_bytes(), marker) + 1);
        let delimiter = vec![marker; fence_len];

        self.literal(&delimiter);
        self.literal(fence.info.as_bytes());
        self.literal(b"\n");
        self.literal(fence.literal.as_bytes());
        if !fence.literal.is_empty() && !fence.literal.ends_with('\n') {
            self.literal(b"\n");
        }
        self.literal(&delimiter);
        self.cr();
    }

    fn format_math(&mut self, math: &NodeMath, markup: &str) {
        let delimiter = if markup.is_empty() {
            if math.is_block() {
                "$$"
            } else {
                "$"
            }
        } else {
            markup
        };

        if math.is_block() {
            self.blankline();
        }

        self.literal(delimiter.as_bytes());
        self.literal(math.content.as_bytes());
        self.literal(delimiter.as_bytes());

        if let MathKind::BlockWithLabel(ref label) = math.kind {
            self.literal(b" (");
            self.literal(label.as_bytes());
            self.literal(b")");
        }

        if math.is_block() {
            self.cr();
        }
    }
}
