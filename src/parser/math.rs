//! Dollar math.
//!
//! Inline spans are `$...$`, or `$$...$$` when
//! [`MathOptions::double_dollar_inline`] is set.  Blocks open with `$$` at
//! the start of a line and close at the first line whose trimmed text ends
//! in `$$`, or, with [`MathOptions::allow_labels`], in `$$ (label)`.
//!
//! Both rules work out the whole match before touching the cursor, so a
//! rejected candidate leaves no trace.

use std::ops::Range;

use tracing::trace;

use crate::ctype::{is_digit, is_white_space};
use crate::nodes::{LineRange, MathKind, NodeMath, Token, TokenValue};
use crate::parser::block::BlockState;
use crate::parser::inlines::InlineState;
use crate::parser::options::MathOptions;
use crate::parser::ruler::RulerError;
use crate::parser::Parser;

const BACKSLASH: u8 = b'\\';
const DOLLAR: u8 = b'$';

/// Slot the math rules into `parser`: `math_block` before `fence` in the
/// block chain, `math_inline` before `escape` in the inline chain.
pub fn register(parser: &mut Parser<'_>) -> Result<(), RulerError> {
    parser.block.before("fence", "math_block", math_block, &[])?;
    parser
        .inline
        .before("escape", "math_inline", math_inline, &[])?;
    Ok(())
}

/// Whether the byte at `pos` is escaped by the backslashes right before it.
///
/// With `parity` 0 an odd run of backslashes escapes; with 1, an even
/// non-empty run does.  No backslashes at all, including at the very start
/// of `src`, means not escaped.
///
/// ```rust
/// # use dollarmath::parser::math::is_escaped;
/// assert!(is_escaped(br"\$", 1, 0));
/// assert!(!is_escaped(br"\\$", 2, 0));
/// assert!(is_escaped(br"\\$", 2, 1));
/// assert!(!is_escaped(b"$", 0, 1));
/// ```
pub fn is_escaped(src: &[u8], pos: usize, parity: usize) -> bool {
    let backslashes = src[..pos.min(src.len())]
        .iter()
        .rev()
        .take_while(|&&b| b == BACKSLASH)
        .count();

    backslashes != 0 && backslashes % 2 != parity
}

/// Matches an equation label at the end of a block math line, e.g. the
/// `$$ (eq1)` in `$$ a = 1 $$ (eq1)`.
///
/// Reads backwards from the end of `line`: optional whitespace, `)`, a
/// non-empty label without `)`, `$` or line breaks, `(`, optional
/// whitespace, then `$$`.  Returns the label and the length of the matched
/// suffix, measured from the first `$` of the closing `$$`.
///
/// ```rust
/// # use dollarmath::parser::math::match_label;
/// assert_eq!(match_label("$$ a $$ (eq1)  "), Some(("eq1", 10)));
/// assert_eq!(match_label("$$ a $$"), None);
/// assert_eq!(match_label("$$ a $$ ()"), None);
/// ```
pub fn match_label(line: &str) -> Option<(&str, usize)> {
    let body = line.trim_end().strip_suffix(')')?;

    // The nearest `(` preceded by `$$` wins, so the label is as short as
    // possible; an earlier `(` is just part of the label.
    for (ix, c) in body.char_indices().rev() {
        match c {
            ')' | '$' | '\r' | '\n' => return None,
            '(' if ix + 1 < body.len() => {
                let before = body[..ix].trim_end();
                if before.ends_with("$$") {
                    let suffix = line.len() - (before.len() - 2);
                    return Some((&body[ix + 1..], suffix));
                }
            }
            _ => {}
        }
    }

    None
}

/// An accepted inline span, as offsets into the inline source.
#[derive(Debug, Clone, PartialEq, Eq)]
struct InlineMatch {
    content: Range<usize>,
    end: usize,
    double: bool,
}

fn char_after(src: &str, pos: usize) -> Option<char> {
    src.get(pos..).and_then(|s| s.chars().next())
}

fn char_before(src: &str, pos: usize) -> Option<char> {
    src.get(..pos).and_then(|s| s.chars().next_back())
}

/// Decide whether an inline span opens at `pos`.  `src` ends at the
/// caller's scan limit.
fn scan_inline(src: &str, pos: usize, options: &MathOptions) -> Option<InlineMatch> {
    let bytes = src.as_bytes();
    if bytes.get(pos) != Some(&DOLLAR) {
        return None;
    }

    if !options.allow_space_adjacency && char_after(src, pos + 1).map_or(true, is_white_space) {
        return None;
    }

    if !options.allow_digit_adjacency && char_before(src, pos).map_or(false, is_digit) {
        return None;
    }

    if is_escaped(bytes, pos, 0) {
        return None;
    }

    let double = options.double_dollar_inline && bytes.get(pos + 1) == Some(&DOLLAR);
    let run = if double { 2 } else { 1 };

    let matcher = jetscii::bytes!(DOLLAR);
    let mut search = pos + run;
    let close = loop {
        let found = search + matcher.find(bytes.get(search..)?)?;

        if is_escaped(bytes, found, 0) {
            search = found + 1;
            continue;
        }

        if double && bytes.get(found + 1) != Some(&DOLLAR) {
            search = found + 1;
            continue;
        }

        break found;
    };
    let end = close + run;

    if !options.allow_space_adjacency && char_before(src, close).map_or(true, is_white_space) {
        return None;
    }

    if !options.allow_digit_adjacency && char_after(src, end).map_or(false, is_digit) {
        return None;
    }

    let content = pos + run..close;
    if content.is_empty() {
        return None;
    }

    Some(InlineMatch {
        content,
        end,
        double,
    })
}

/// Inline math, tried at every `$`.
pub fn math_inline(state: &mut InlineState<'_>, silent: bool) -> bool {
    let Some(options) = state.options.extension.math_dollars else {
        return false;
    };

    let src = state.src;
    let src = &src[..state.pos_max];
    let Some(m) = scan_inline(src, state.pos, &options) else {
        return false;
    };

    if !silent {
        let markup = if m.double { "$$" } else { "$" };
        let content = src[m.content].to_string();
        trace!(pos = state.pos, markup, "inline math");
        state.push(
            Token::new(TokenValue::Math(NodeMath {
                kind: MathKind::Inline,
                content,
            }))
            .with_markup(markup),
        );
    }

    state.pos = m.end;
    true
}

/// An accepted block, as offsets into the document source.
#[derive(Debug, Clone, PartialEq, Eq)]
struct BlockMatch {
    content: Range<usize>,
    label: Option<String>,
    next_line: usize,
}

/// Whether `text` closes a block.  Returns the length of the closing suffix
/// (delimiter, label and trailing whitespace) and the label, if any.
fn closing_suffix(text: &str, allow_labels: bool) -> Option<(usize, Option<&str>)> {
    let trimmed = text.trim_end();
    if trimmed.ends_with("$$") {
        return Some((text.len() - trimmed.len() + 2, None));
    }

    if allow_labels {
        if let Some((label, suffix)) = match_label(text) {
            return Some((suffix, Some(label)));
        }
    }

    None
}

fn has_content(src: &str, start: usize, end: usize) -> bool {
    end > start && !src[start..end].trim().is_empty()
}

/// Decide whether a block opens on `start_line`, searching no further than
/// `end_line`.
fn scan_block(
    state: &BlockState<'_>,
    start_line: usize,
    end_line: usize,
    options: &MathOptions,
) -> Option<BlockMatch> {
    if state.is_code_indented(start_line) {
        return None;
    }

    let start = state.line_start(start_line);
    let line_end = state.e_marks[start_line];
    if start + 2 > line_end || &state.src.as_bytes()[start..start + 2] != b"$$" {
        return None;
    }

    // The opening line can close itself, e.g. `$$a$$`.  It needs more than
    // the bare delimiters for that, so `$$` and `$$$` always look further,
    // as does a close that leaves nothing between the delimiters, such as
    // `$$ $$` or a label swallowing the opener in `$$ (1)`.
    let line = &state.src[start..line_end];
    let same_line = if line.trim().len() > 3 {
        closing_suffix(line, options.allow_labels)
            .map(|(suffix, label)| (start_line, line_end - suffix, label))
            .filter(|&(_, content_end, _)| has_content(state.src, start + 2, content_end))
    } else {
        None
    };

    let (close_line, content_end, label) = same_line.or_else(|| {
        (start_line + 1..end_line).find_map(|next| {
            let first = state.line_start(next);
            let last = state.e_marks[next];
            if last - first < 2 {
                return None;
            }
            closing_suffix(&state.src[first..last], options.allow_labels)
                .map(|(suffix, label)| (next, last - suffix, label))
        })
    })?;

    if !has_content(state.src, start + 2, content_end) {
        return None;
    }

    let content = start + 2..content_end;

    Some(BlockMatch {
        content,
        label: label.map(str::to_string),
        next_line: close_line + 1,
    })
}

/// Block math, tried at the start of every block.
pub fn math_block(
    state: &mut BlockState<'_>,
    start_line: usize,
    end_line: usize,
    silent: bool,
) -> bool {
    let Some(options) = state.options.extension.math_dollars else {
        return false;
    };

    let Some(m) = scan_block(state, start_line, end_line, &options) else {
        return false;
    };

    if silent {
        return true;
    }

    let kind = match m.label {
        Some(label) => MathKind::BlockWithLabel(label),
        None => MathKind::Block,
    };
    let content = state.src[m.content].to_string();
    let map = LineRange::new(start_line, m.next_line);

    trace!(start = map.start, end = map.end, "math block");
    state.line = m.next_line;
    state.push(
        Token::new_block(TokenValue::Math(NodeMath { kind, content }), map).with_markup("$$"),
    );
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use ntest::test_case;

    fn double() -> MathOptions {
        MathOptions {
            double_dollar_inline: true,
            ..MathOptions::default()
        }
    }

    fn no_spaces() -> MathOptions {
        MathOptions {
            allow_space_adjacency: false,
            ..MathOptions::default()
        }
    }

    fn no_digits() -> MathOptions {
        MathOptions {
            allow_digit_adjacency: false,
            ..MathOptions::default()
        }
    }

    fn content(src: &str, pos: usize, options: MathOptions) -> Option<&str> {
        scan_inline(src, pos, &options).map(|m| &src[m.content])
    }

    #[test_case("$x$", "x", 3)]
    #[test_case("$a + b$ rest", "a + b", 7)]
    #[test_case("$ x $", " x ", 5)]
    #[test_case("$x\\$y$", "x\\$y", 6)]
    #[test_case("$x\\\\$y", "x\\\\", 5)]
    fn inline_accepts(src: &str, expected: &str, end: usize) {
        let m = scan_inline(src, 0, &MathOptions::default()).unwrap();
        assert_eq!(&src[m.content], expected);
        assert_eq!(m.end, end);
        assert!(!m.double);
    }

    #[test_case("$$x$")]
    #[test_case("$")]
    #[test_case("$x")]
    #[test_case("$x\\$")]
    #[test_case("x$y$")]
    fn inline_rejects(src: &str) {
        assert_eq!(scan_inline(src, 0, &MathOptions::default()), None);
    }

    #[test_case("$$x$$", "x", 5)]
    #[test_case("$$a$b$$", "a$b", 7)]
    fn inline_double_accepts(src: &str, expected: &str, end: usize) {
        let m = scan_inline(src, 0, &double()).unwrap();
        assert_eq!(&src[m.content], expected);
        assert_eq!(m.end, end);
        assert!(m.double);
    }

    #[test_case("$$x$")]
    #[test_case("$$$$")]
    fn inline_double_rejects(src: &str) {
        assert_eq!(scan_inline(src, 0, &double()), None);
    }

    #[test]
    fn inline_double_falls_back_to_single() {
        let m = scan_inline("$x$", 0, &double()).unwrap();
        assert_eq!(m.content, 1..2);
        assert!(!m.double);
    }

    #[test_case("$ x$", name = "space_after_opener")]
    #[test_case("$x $", name = "space_before_closer")]
    #[test_case("$x\u{3000}$", name = "ideographic_space_before_closer")]
    #[test_case("$\tx$", name = "tab_after_opener")]
    fn inline_no_spaces_rejects(src: &str) {
        assert_eq!(scan_inline(src, 0, &no_spaces()), None);
    }

    #[test]
    fn inline_no_spaces_accepts_tight() {
        assert_eq!(content("$x$", 0, no_spaces()), Some("x"));
        assert_eq!(content("$a b$", 0, no_spaces()), Some("a b"));
    }

    #[test]
    fn inline_no_digits() {
        assert_eq!(content("1$x$", 1, no_digits()), None);
        assert_eq!(content("$x$1", 0, no_digits()), None);
        assert_eq!(content("a$x$b", 1, no_digits()), Some("x"));
        assert_eq!(content("$x$", 0, no_digits()), Some("x"));
        assert_eq!(content("1$x$", 1, MathOptions::default()), Some("x"));
    }

    #[test]
    fn inline_no_digits_unicode() {
        assert_eq!(content("\u{663}$x$", 2, no_digits()), None);
        assert_eq!(content("$x$\u{b2}", 0, no_digits()), None);
        assert_eq!(content("\u{663}$x$", 2, MathOptions::default()), Some("x"));
    }

    #[test]
    fn inline_no_digits_double() {
        let options = MathOptions {
            double_dollar_inline: true,
            allow_digit_adjacency: false,
            ..MathOptions::default()
        };

        // The digit follows the whole `$$` closer.
        assert_eq!(content("a $$x$$1 b", 2, options), None);
        assert_eq!(content("a $$x$$1 b", 3, options), Some("x"));
        assert_eq!(content("a $$x$$ b", 2, options), Some("x"));
    }

    #[test]
    fn inline_escaped_opener() {
        assert_eq!(content("\\$x$", 1, MathOptions::default()), None);
        assert_eq!(content("\\\\$x$", 2, MathOptions::default()), Some("x"));
    }

    #[test]
    fn escape_counting() {
        assert!(!is_escaped(b"$", 0, 0));
        assert!(!is_escaped(b"a$", 1, 0));
        assert!(is_escaped(b"\\$", 1, 0));
        assert!(!is_escaped(b"\\\\$", 2, 0));
        assert!(is_escaped(b"\\\\\\$", 3, 0));
        assert!(is_escaped(b"\\\\$", 2, 1));
        assert!(!is_escaped(b"\\$", 1, 1));
        assert!(!is_escaped(b"a$", 1, 1));
    }

    #[test_case("$$ b=2 $$ (eq1)", "eq1", 8)]
    #[test_case("$$x$$(1)", "1", 5)]
    #[test_case("$$ x $$ (a(b)", "a(b", 8)]
    #[test_case("$$ x $$ (a) \t", "a", 8)]
    #[test_case("$$ x $$ (a b)", "a b", 8)]
    fn label_matches(line: &str, label: &str, suffix: usize) {
        assert_eq!(match_label(line), Some((label, suffix)));
    }

    #[test_case("$$ x $$ (a)b")]
    #[test_case("$$ x $$ (a$b)")]
    #[test_case("$$ x $$ (a))")]
    #[test_case("$$ x $$ ()")]
    #[test_case("$ x $ (a)")]
    #[test_case("(a)")]
    #[test_case("$$ x $$")]
    fn label_rejects(line: &str) {
        assert_eq!(match_label(line), None);
    }

    #[test]
    fn closing_suffixes() {
        assert_eq!(closing_suffix("a $$", true), Some((2, None)));
        assert_eq!(closing_suffix("a $$  ", false), Some((4, None)));
        assert_eq!(closing_suffix("a $$ (1)", true), Some((6, Some("1"))));
        assert_eq!(closing_suffix("a $$ (1)", false), None);
        assert_eq!(closing_suffix("a $", true), None);
    }
}
