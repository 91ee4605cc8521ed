//! Inline parsing state and the core inline rules.

use crate::ctype::{is_inline_terminator, ispunct};
use crate::nodes::{Token, TokenValue};
use crate::parser::options::Options;
use crate::parser::ruler::Ruler;
use crate::strings::{self, normalize_code};

use rustc_hash::FxHashMap;

/// An inline rule: `(state, silent)`.
///
/// A rule is called at `state.pos`.  On a match it emits its tokens (unless
/// `silent`), advances `state.pos` past what it consumed and returns `true`.
/// A rule that does not match must leave `state` untouched.
pub type InlineRule = fn(&mut InlineState<'_>, bool) -> bool;

/// The inline pass cursor over one run of inline content.
#[derive(Debug)]
pub struct InlineState<'p> {
    /// The inline source being scanned.
    pub src: &'p str,

    /// Active options.
    pub options: &'p Options,

    /// The chain this state is being driven by.
    pub rules: &'p Ruler<InlineRule>,

    /// The byte offset being scanned.
    pub pos: usize,

    /// The byte offset scanning stops at.
    pub pos_max: usize,

    /// Literal text accumulated but not yet emitted as a `Text` token.
    pub pending: String,

    /// Tokens emitted so far.
    pub tokens: Vec<Token>,

    /// Where a silent run of the chain left off, by starting offset.
    skip_cache: FxHashMap<usize, usize>,
}

impl<'p> InlineState<'p> {
    /// Start scanning `src` from its beginning.
    pub fn new(src: &'p str, options: &'p Options, rules: &'p Ruler<InlineRule>) -> Self {
        InlineState {
            src,
            options,
            rules,
            pos: 0,
            pos_max: src.len(),
            pending: String::new(),
            tokens: Vec::new(),
            skip_cache: FxHashMap::default(),
        }
    }

    /// The source as bytes, up to `pos_max`.
    pub fn bytes(&self) -> &'p [u8] {
        let src: &'p str = self.src;
        &src.as_bytes()[..self.pos_max]
    }

    /// Flush `pending` into a `Text` token.
    pub fn push_pending(&mut self) {
        if !self.pending.is_empty() {
            let text = std::mem::take(&mut self.pending);
            self.tokens.push(Token::new(TokenValue::Text(text)));
        }
    }

    /// Append a token to the stream, flushing pending text first.
    pub fn push(&mut self, token: Token) {
        self.push_pending();
        self.tokens.push(token);
    }

    /// Move the character at `pos` into `pending`.
    pub(crate) fn take_char(&mut self) {
        match self.src[self.pos..self.pos_max].chars().next() {
            Some(c) => {
                self.pending.push(c);
                self.pos += c.len_utf8();
            }
            None => self.pos = self.pos_max,
        }
    }

    /// Advance past whatever token starts at `pos`, without emitting
    /// anything.  Used for speculative lookahead; results are cached per
    /// starting offset.
    pub fn skip_token(&mut self) {
        let start = self.pos;
        if let Some(&end) = self.skip_cache.get(&start) {
            self.pos = end;
            return;
        }

        let rules = self.rules;
        let matched = rules.rules().any(|rule| rule(self, true));
        if !matched {
            let len = self.src[self.pos..self.pos_max]
                .chars()
                .next()
                .map_or(1, char::len_utf8);
            self.pos += len;
        }

        self.skip_cache.insert(start, self.pos);
    }

    fn skip_spaces(&mut self) {
        let bytes = self.bytes();
        while self.pos < self.pos_max && matches!(bytes[self.pos], b' ' | b'\t') {
            self.pos += 1;
        }
    }
}

/// Runs of text containing nothing another inline rule cares about.
pub fn text(state: &mut InlineState<'_>, silent: bool) -> bool {
    let bytes = state.bytes();
    let mut pos = state.pos;
    while pos < state.pos_max && !is_inline_terminator(bytes[pos]) {
        pos += 1;
    }

    if pos == state.pos {
        return false;
    }

    if !silent {
        state.pending.push_str(&state.src[state.pos..pos]);
    }
    state.pos = pos;
    true
}

/// Line endings: a hard break after two or more spaces, else a soft break.
pub fn newline(state: &mut InlineState<'_>, silent: bool) -> bool {
    if state.bytes().get(state.pos) != Some(&b'\n') {
        return false;
    }

    if !silent {
        let trailing = strings::trim_trailing_spaces(&mut state.pending);
        let value = if trailing >= 2 {
            TokenValue::HardBreak
        } else {
            TokenValue::SoftBreak
        };
        state.push(Token::new(value));
    }

    state.pos += 1;
    state.skip_spaces();
    true
}

/// Backslash escapes of ASCII punctuation, and backslash hard breaks.
pub fn escape(state: &mut InlineState<'_>, silent: bool) -> bool {
    let bytes = state.bytes();
    if bytes.get(state.pos) != Some(&b'\\') {
        return false;
    }

    match bytes.get(state.pos + 1) {
        Some(&ch) if ispunct(ch) => {
            if !silent {
                state.pending.push(ch as char);
            }
            state.pos += 2;
        }
        Some(b'\n') => {
            if !silent {
                state.push(Token::new(TokenValue::HardBreak));
            }
            state.pos += 2;
            state.skip_spaces();
        }
        _ => {
            if !silent {
                state.pending.push('\\');
            }
            state.pos += 1;
        }
    }
    true
}

/// Code spans.  An unmatched backtick run is literal text.
pub fn backticks(state: &mut InlineState<'_>, silent: bool) -> bool {
    let bytes = state.bytes();
    let start = state.pos;
    if bytes.get(start) != Some(&b'`') {
        return false;
    }

    let mut pos = start;
    while pos < state.pos_max && bytes[pos] == b'`' {
        pos += 1;
    }
    let opener = pos - start;

    let mut search = pos;
    while let Some(offset) = bytes[search..].iter().position(|&b| b == b'`') {
        let close_start = search + offset;
        let mut close_end = close_start;
        while close_end < state.pos_max && bytes[close_end] == b'`' {
            close_end += 1;
        }

        if close_end - close_start == opener {
            if !silent {
                let literal = normalize_code(&state.src[pos..close_start]);
                let token = Token::new(TokenValue::Code(literal))
                    .with_markup(&state.src[start..pos]);
                state.push(token);
            }
            state.pos = close_end;
            return true;
        }
        search = close_end;
    }

    if !silent {
        state.pending.push_str(&state.src[start..pos]);
    }
    state.pos = pos;
    true
}
