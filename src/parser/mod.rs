//! The two-pass parser: blocks first, then inline content within them.

pub mod block;
pub mod inlines;
pub mod math;
pub mod options;
pub mod ruler;

use tracing::{debug, warn};

use crate::nodes::{Token, TokenValue};
use crate::strings;

pub use self::block::{BlockRule, BlockState};
pub use self::inlines::{InlineRule, InlineState};
pub use self::options::{Extension, MathOptions, Options, Parse, Plugins, Render, RenderPlugins};
pub use self::ruler::{Ruler, RulerError};

/// Parse a Markdown document to a token stream.
///
/// ```rust
/// # use dollarmath::{parse_document, MathOptions, Options};
/// let mut options = Options::default();
/// options.extension.math_dollars = Some(MathOptions::default());
/// let tokens = parse_document("$$\nx\n$$\n", &options);
/// assert_eq!(tokens.len(), 1);
/// assert_eq!(tokens[0].math().map(|m| m.content.as_str()), Some("\nx\n"));
/// ```
pub fn parse_document(md: &str, options: &Options) -> Vec<Token> {
    Parser::new(options).parse(md)
}

/// A parser: the options plus the block and inline rule chains they call
/// for.
///
/// The chains are public so callers may add, reorder or disable rules
/// before parsing.
#[derive(Debug)]
pub struct Parser<'o> {
    options: &'o Options,

    /// The block rule chain.
    pub block: Ruler<BlockRule>,

    /// The inline rule chain.
    pub inline: Ruler<InlineRule>,
}

impl<'o> Parser<'o> {
    /// Build the core chains, plus the math rules when
    /// [`Extension::math_dollars`] is set.
    pub fn new(options: &'o Options) -> Self {
        let block = Ruler::<BlockRule>::with_rules(&[
            ("code", block::code, &[]),
            ("fence", block::fence, &["paragraph"]),
            ("heading", block::heading, &["paragraph"]),
            ("hr", block::hr, &["paragraph"]),
            ("paragraph", block::paragraph, &[]),
        ]);
        let inline = Ruler::<InlineRule>::with_rules(&[
            ("text", inlines::text, &[]),
            ("newline", inlines::newline, &[]),
            ("escape", inlines::escape, &[]),
            ("backticks", inlines::backticks, &[]),
        ]);

        let mut parser = Parser {
            options,
            block,
            inline,
        };

        if options.extension.math_dollars.is_some() {
            if let Err(err) = math::register(&mut parser) {
                warn!(%err, "could not register math rules");
            }
        }

        parser
    }

    /// The options this parser was built with.
    pub fn options(&self) -> &'o Options {
        self.options
    }

    /// Parse `md` to a token stream.  Line endings are normalized first.
    pub fn parse(&self, md: &str) -> Vec<Token> {
        let src = strings::normalize_input(md);

        let mut state = BlockState::new(&src, self.options, &self.block);
        let line_max = state.line_max;
        self.tokenize_block(&mut state, 0, line_max);
        let mut tokens = state.tokens;

        for token in tokens.iter_mut() {
            if let TokenValue::Inline(ref mut inline) = token.value {
                inline.children = self.tokenize_inline(&inline.content);
            }
        }

        debug!(lines = line_max, tokens = tokens.len(), "parsed document");
        tokens
    }

    fn tokenize_block(&self, state: &mut BlockState<'_>, start_line: usize, end_line: usize) {
        let rules = state.rules;
        let mut line = start_line;

        while line < end_line {
            line = state.skip_empty_lines(line);
            state.line = line;
            if line >= end_line {
                break;
            }

            // Lines dedented past the current block end it.
            if state.s_count[line] < state.blk_indent {
                break;
            }

            let matched = rules.rules().any(|rule| rule(state, line, end_line, false));
            if !matched || state.line <= line {
                // No rule consumed the line; step past it so the loop ends.
                state.line = line + 1;
            }
            line = state.line;
        }
    }

    fn tokenize_inline(&self, content: &str) -> Vec<Token> {
        let mut state = InlineState::new(content, self.options, &self.inline);
        let rules = state.rules;

        while state.pos < state.pos_max {
            if !rules.rules().any(|rule| rule(&mut state, false)) {
                state.take_char();
            }
        }

        state.push_pending();
        state.tokens
    }
}
