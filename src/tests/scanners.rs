use super::*;
use pretty_assertions::assert_eq;
use crate::parser::math::{is_escaped, match_label, math_block, math_inline};
use crate::parser::{BlockState, InlineState, Parser};

#[test]
fn inline_rule_leaves_state_untouched_on_failure() {
    let options = math_options();
    let parser = Parser::new(&options);

    for src in ["$", "$x", "$$", "$ \\$", "x$y$"] {
        let mut state = InlineState::new(src, &options, &parser.inline);
        assert!(!math_inline(&mut state, false), "{:?}", src);
        assert_eq!(state.pos, 0);
        assert!(state.tokens.is_empty());
        assert!(state.pending.is_empty());
    }
}

#[test]
fn inline_rule_silent() {
    let options = math_options();
    let parser = Parser::new(&options);
    let mut state = InlineState::new("$x$ y", &options, &parser.inline);

    assert!(math_inline(&mut state, true));
    assert_eq!(state.pos, 3);
    assert!(state.tokens.is_empty());
}

#[test]
fn inline_rule_respects_pos_max() {
    let options = math_options();
    let parser = Parser::new(&options);
    let mut state = InlineState::new("$x$", &options, &parser.inline);
    state.pos_max = 2;

    assert!(!math_inline(&mut state, false));
    assert_eq!(state.pos, 0);
}

#[test]
fn inline_rule_off_without_extension() {
    let options = Options::default();
    let parser = Parser::new(&options);
    let mut state = InlineState::new("$x$", &options, &parser.inline);

    assert!(!math_inline(&mut state, false));
    assert!(state.tokens.is_empty());
}

#[test]
fn skip_token_steps_over_math() {
    let options = math_options();
    let parser = Parser::new(&options);
    let mut state = InlineState::new("$x$ rest", &options, &parser.inline);

    state.skip_token();
    assert_eq!(state.pos, 3);
    assert!(state.tokens.is_empty());

    state.pos = 0;
    state.skip_token();
    assert_eq!(state.pos, 3);

    state.skip_token();
    assert_eq!(state.pos, 8);
}

#[test]
fn block_rule_leaves_state_untouched_on_failure() {
    let options = math_options();
    let parser = Parser::new(&options);

    for src in ["$$\nx\n", "$ x $\n", "$$$$\n", "    $$a$$\n", "$$ (1)\n"] {
        let mut state = BlockState::new(src, &options, &parser.block);
        let end = state.line_max;
        assert!(!math_block(&mut state, 0, end, false), "{:?}", src);
        assert_eq!(state.line, 0);
        assert!(state.tokens.is_empty());
    }
}

#[test]
fn block_rule_silent() {
    let options = math_options();
    let parser = Parser::new(&options);
    let mut state = BlockState::new("$$\nx\n$$\n", &options, &parser.block);
    let end = state.line_max;

    assert!(math_block(&mut state, 0, end, true));
    assert_eq!(state.line, 0);
    assert!(state.tokens.is_empty());

    assert!(math_block(&mut state, 0, end, false));
    assert_eq!(state.line, 3);
    assert_eq!(state.tokens.len(), 1);
}

#[test]
fn block_rule_honours_end_line() {
    let options = math_options();
    let parser = Parser::new(&options);
    let mut state = BlockState::new("$$\nx\n$$\n", &options, &parser.block);

    assert!(!math_block(&mut state, 0, 2, false));
    assert!(math_block(&mut state, 0, 3, false));
}

#[test]
fn block_rule_indent_is_relative_to_block() {
    let options = math_options();
    let parser = Parser::new(&options);
    let mut state = BlockState::new("    $$a$$\n", &options, &parser.block);
    let end = state.line_max;

    assert!(!math_block(&mut state, 0, end, false));

    state.blk_indent = 4;
    assert!(math_block(&mut state, 0, end, false));
    assert_eq!(state.tokens[0].math().unwrap().content, "a");
}

#[test]
fn block_state_lines() {
    let options = Options::default();
    let parser = Parser::new(&options);
    let state = BlockState::new("a\n\n  \tb\n", &options, &parser.block);

    assert_eq!(state.line_max, 3);
    assert_eq!(state.b_marks, vec![0, 2, 3, 8]);
    assert_eq!(state.e_marks, vec![1, 2, 7, 8]);
    assert_eq!(state.t_shift, vec![0, 0, 3, 0]);
    assert_eq!(state.s_count, vec![0, 0, 4, 0]);
    assert!(state.is_empty(1));
    assert_eq!(state.skip_empty_lines(1), 2);
    assert_eq!(state.line_text(2), "b");
}

#[test]
fn escape_parity_through_the_parser() {
    html_math!("\\\\\\$x$", "<p>\\$x$</p>\n");
    html_math!("\\\\\\\\$x$", "<p>\\\\<eq>x</eq></p>\n");
}

#[test]
fn escape_counting() {
    assert!(!is_escaped(b"$", 0, 0));
    assert!(is_escaped(b"a\\$", 2, 0));
    assert!(!is_escaped(b"a\\\\$", 3, 0));
    assert!(is_escaped(b"a\\\\$", 3, 1));
    assert!(!is_escaped(b"\\\\\\$", 3, 1));
}

#[test]
fn labels() {
    assert_eq!(match_label("$$ x $$ (eq1)"), Some(("eq1", 8)));
    assert_eq!(match_label("x $$(a)"), Some(("a", 5)));
    assert_eq!(match_label("x $$ ()"), None);
    assert_eq!(match_label("x $ (a)"), None);
}
