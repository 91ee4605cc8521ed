//! Block-level parsing state and the core block rules.

use crate::ctype::isspace;
use crate::nodes::{LineRange, NodeFence, NodeInline, Token, TokenValue};
use crate::parser::options::Options;
use crate::parser::ruler::Ruler;

use smallvec::SmallVec;

pub(crate) const TAB_STOP: usize = 4;
pub(crate) const CODE_INDENT: usize = 4;

/// A block rule: `(state, start_line, end_line, silent)`.
///
/// A rule is called with `state.line == start_line`.  On a match it pushes
/// its tokens, moves `state.line` past the lines it consumed and returns
/// `true`.  In silent mode it only reports whether it would match.  A rule
/// that does not match must leave `state` untouched.
pub type BlockRule = fn(&mut BlockState<'_>, usize, usize, bool) -> bool;

/// The block pass cursor over one document.
///
/// Lines are indexed from zero.  There is one extra sentinel line at
/// `line_max`, empty and positioned at the end of the source, so rules may
/// look one line past the last real one.
#[derive(Debug)]
pub struct BlockState<'p> {
    /// The normalized document source.
    pub src: &'p str,

    /// Active options.
    pub options: &'p Options,

    /// The chain this state is being driven by.
    pub rules: &'p Ruler<BlockRule>,

    /// Tokens emitted so far.
    pub tokens: Vec<Token>,

    /// Byte offset of the start of each line.
    pub b_marks: Vec<usize>,

    /// Byte offset of the end of each line, excluding the newline.
    pub e_marks: Vec<usize>,

    /// Bytes of leading spaces and tabs on each line.
    pub t_shift: Vec<usize>,

    /// Indent of each line in columns, with tabs expanded.
    pub s_count: Vec<usize>,

    /// The indent required of the current block's content.
    pub blk_indent: usize,

    /// The line currently being scanned.
    pub line: usize,

    /// The number of real lines.
    pub line_max: usize,
}

impl<'p> BlockState<'p> {
    /// Split `src` into lines and measure their indentation.
    pub fn new(src: &'p str, options: &'p Options, rules: &'p Ruler<BlockRule>) -> Self {
        let bytes = src.as_bytes();
        let matcher = jetscii::bytes!(b'\n');

        let mut state = BlockState {
            src,
            options,
            rules,
            tokens: Vec::new(),
            b_marks: Vec::new(),
            e_marks: Vec::new(),
            t_shift: Vec::new(),
            s_count: Vec::new(),
            blk_indent: 0,
            line: 0,
            line_max: 0,
        };

        let mut start = 0;
        while start < bytes.len() {
            let end = match matcher.find(&bytes[start..]) {
                Some(offset) => start + offset,
                None => bytes.len(),
            };

            let mut pos = start;
            let mut column = 0;
            while pos < end {
                match bytes[pos] {
                    b' ' => column += 1,
                    b'\t' => column += TAB_STOP - column % TAB_STOP,
                    _ => break,
                }
                pos += 1;
            }

            state.b_marks.push(start);
            state.e_marks.push(end);
            state.t_shift.push(pos - start);
            state.s_count.push(column);

            start = end + 1;
        }

        state.line_max = state.b_marks.len();
        state.b_marks.push(bytes.len());
        state.e_marks.push(bytes.len());
        state.t_shift.push(0);
        state.s_count.push(0);

        state
    }

    /// Offset of the first non-indent byte of `line`.
    pub fn line_start(&self, line: usize) -> usize {
        self.b_marks[line] + self.t_shift[line]
    }

    /// The text of `line` from its first non-indent byte, without the
    /// newline.
    pub fn line_text(&self, line: usize) -> &'p str {
        &self.src[self.line_start(line)..self.e_marks[line]]
    }

    /// Whether `line` holds nothing but indentation.
    pub fn is_empty(&self, line: usize) -> bool {
        self.line_start(line) >= self.e_marks[line]
    }

    /// The first non-empty line at or after `from`.
    pub fn skip_empty_lines(&self, mut from: usize) -> usize {
        while from < self.line_max && self.is_empty(from) {
            from += 1;
        }
        from
    }

    /// Whether `line` is indented far enough to be code relative to the
    /// current block.
    pub fn is_code_indented(&self, line: usize) -> bool {
        self.s_count[line] >= self.blk_indent + CODE_INDENT
    }

    /// Offset of the first byte at or after `pos` that is not `c`.
    pub fn skip_chars(&self, mut pos: usize, c: u8) -> usize {
        let bytes = self.src.as_bytes();
        while pos < bytes.len() && bytes[pos] == c {
            pos += 1;
        }
        pos
    }

    /// Offset of the first byte at or after `pos` that is not a space or
    /// tab.
    pub fn skip_spaces(&self, mut pos: usize) -> usize {
        let bytes = self.src.as_bytes();
        while pos < bytes.len() && matches!(bytes[pos], b' ' | b'\t') {
            pos += 1;
        }
        pos
    }

    /// Joins lines `begin..end`, removing up to `indent` columns of
    /// indentation from each.  Every line but the last keeps its newline;
    /// the last keeps it only if `keep_last_lf`.
    pub fn get_lines(&self, begin: usize, end: usize, indent: usize, keep_last_lf: bool) -> String {
        let bytes = self.src.as_bytes();
        let mut out = String::new();

        for line in begin..end {
            let line_start = self.b_marks[line];
            let mut first = line_start;
            let last = if line + 1 < end || keep_last_lf {
                (self.e_marks[line] + 1).min(bytes.len())
            } else {
                self.e_marks[line]
            };

            let mut line_indent = 0;
            while first < last && line_indent < indent {
                match bytes[first] {
                    b'\t' => line_indent += TAB_STOP - line_indent % TAB_STOP,
                    b' ' => line_indent += 1,
                    _ => break,
                }
                first += 1;
            }

            // A tab may overshoot the indent; keep the surplus as spaces.
            for _ in indent..line_indent {
                out.push(' ');
            }
            out.push_str(&self.src[first..last]);
        }

        out
    }

    /// Append a token to the stream.
    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }
}

/// Indented code.
pub fn code(state: &mut BlockState<'_>, start_line: usize, end_line: usize, _silent: bool) -> bool {
    if !state.is_code_indented(start_line) {
        return false;
    }

    let mut next = start_line + 1;
    let mut last = next;
    while next < end_line {
        if state.is_empty(next) {
            next += 1;
            continue;
        }
        if state.is_code_indented(next) {
            next += 1;
            last = next;
            continue;
        }
        break;
    }

    let mut literal = state.get_lines(start_line, last, CODE_INDENT + state.blk_indent, false);
    literal.push('\n');

    state.line = last;
    state.push(Token::new_block(
        TokenValue::CodeBlock(literal),
        LineRange::new(start_line, last),
    ));
    true
}

/// Fenced code, opened by three or more backticks or tildes.
pub fn fence(state: &mut BlockState<'_>, start_line: usize, end_line: usize, silent: bool) -> bool {
    if state.is_code_indented(start_line) {
        return false;
    }

    let bytes = state.src.as_bytes();
    let mut pos = state.line_start(start_line);
    let max = state.e_marks[start_line];
    if pos + 3 > max {
        return false;
    }

    let marker = bytes[pos];
    if marker != b'~' && marker != b'`' {
        return false;
    }

    let mem = pos;
    pos = state.skip_chars(pos, marker);
    let len = pos - mem;
    if len < 3 {
        return false;
    }

    let markup = &state.src[mem..pos];
    let params = &state.src[pos..max];
    if marker == b'`' && params.contains('`') {
        return false;
    }

    if silent {
        return true;
    }

    let mut next = start_line;
    let mut have_end_marker = false;
    loop {
        next += 1;
        if next >= end_line {
            break;
        }

        let pos = state.line_start(next);
        let max = state.e_marks[next];
        if pos < max && state.s_count[next] < state.blk_indent {
            // A non-empty line with less indent than the block closes it.
            break;
        }
        if bytes.get(pos) != Some(&marker) || state.is_code_indented(next) {
            continue;
        }

        let close = state.skip_chars(pos, marker);
        if close - pos < len {
            continue;
        }
        if state.skip_spaces(close) < max {
            continue;
        }

        have_end_marker = true;
        break;
    }

    let literal = state.get_lines(start_line + 1, next, state.s_count[start_line], true);
    let info = match params.trim() {
        "" => state
            .options
            .parse
            .default_info_string
            .clone()
            .unwrap_or_default(),
        info => info.to_string(),
    };

    state.line = next + usize::from(have_end_marker);
    let token = Token::new_block(
        TokenValue::Fence(NodeFence { info, literal }),
        LineRange::new(start_line, state.line),
    )
    .with_markup(markup);
    state.push(token);
    true
}

/// ATX headings, `#` through `######`.
pub fn heading(state: &mut BlockState<'_>, start_line: usize, _end_line: usize, silent: bool) -> bool {
    if state.is_code_indented(start_line) {
        return false;
    }

    let bytes = state.src.as_bytes();
    let mut pos = state.line_start(start_line);
    let mut max = state.e_marks[start_line];
    if pos >= max || bytes[pos] != b'#' {
        return false;
    }

    let level = state.skip_chars(pos, b'#').min(max) - pos;
    if level > 6 {
        return false;
    }
    pos += level;
    if pos < max && !matches!(bytes[pos], b' ' | b'\t') {
        return false;
    }

    if silent {
        return true;
    }

    // Drop an optional closing sequence of `#`s.
    while max > pos && isspace(bytes[max - 1]) {
        max -= 1;
    }
    let mut tmp = max;
    while tmp > pos && bytes[tmp - 1] == b'#' {
        tmp -= 1;
    }
    if tmp > pos && isspace(bytes[tmp - 1]) {
        max = tmp;
    }

    let level_u8 = level as u8;
    let markup = &state.src[pos - level..pos];
    let content = state.src[pos..max].trim().to_string();
    let map = LineRange::new(start_line, start_line + 1);

    state.line = start_line + 1;
    state.push(Token::new_block(TokenValue::HeadingOpen(level_u8), map).with_markup(markup));
    state.push(Token::new_block(
        TokenValue::Inline(NodeInline {
            content,
            children: Vec::new(),
        }),
        map,
    ));
    state.push(Token::new_block(TokenValue::HeadingClose(level_u8), map).with_markup(markup));
    true
}

/// Thematic breaks: three or more `*`, `-` or `_`, optionally spaced.
pub fn hr(state: &mut BlockState<'_>, start_line: usize, _end_line: usize, silent: bool) -> bool {
    if state.is_code_indented(start_line) {
        return false;
    }

    let bytes = state.src.as_bytes();
    let pos = state.line_start(start_line);
    let max = state.e_marks[start_line];
    if pos >= max {
        return false;
    }
    let marker = bytes[pos];
    if !matches!(marker, b'*' | b'-' | b'_') {
        return false;
    }

    let mut count = 0;
    for &b in &bytes[pos..max] {
        if b == marker {
            count += 1;
        } else if b != b' ' && b != b'\t' {
            return false;
        }
    }
    if count < 3 {
        return false;
    }

    if silent {
        return true;
    }

    state.line = start_line + 1;
    let markup = (marker as char).to_string().repeat(count);
    state.push(
        Token::new_block(
            TokenValue::ThematicBreak,
            LineRange::new(start_line, start_line + 1),
        )
        .with_markup(markup),
    );
    true
}

/// Paragraphs.  Always matches; the last rule in the chain.
pub fn paragraph(state: &mut BlockState<'_>, start_line: usize, end_line: usize, _silent: bool) -> bool {
    let rules = state.rules;
    let terminators = rules
        .rules_for_chain("paragraph")
        .collect::<SmallVec<[BlockRule; 8]>>();

    let mut next = start_line + 1;
    while next < end_line && !state.is_empty(next) {
        // Continuation lines indented like code can't start a new block.
        if state.is_code_indented(next) {
            next += 1;
            continue;
        }

        if terminators
            .iter()
            .any(|terminator| terminator(state, next, end_line, true))
        {
            break;
        }
        next += 1;
    }

    let content = state
        .get_lines(start_line, next, state.blk_indent, false)
        .trim()
        .to_string();
    let map = LineRange::new(start_line, next);

    state.line = next;
    state.push(Token::new_block(TokenValue::ParagraphOpen, map));
    state.push(Token::new_block(
        TokenValue::Inline(NodeInline {
            content,
            children: Vec::new(),
        }),
        map,
    ));
    state.push(Token::new_block(TokenValue::ParagraphClose, map));
    true
}
