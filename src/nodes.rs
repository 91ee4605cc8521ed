//! The token stream produced by the parser.
//!
//! Block tokens carry the source lines they were built from; inline tokens
//! live as children of a [`TokenValue::Inline`] token.

/// A half-open range of source lines, `start` inclusive and `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    /// The first line covered.
    pub start: usize,

    /// One past the last line covered.
    pub end: usize,
}

impl LineRange {
    /// Construct a line range.
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        LineRange { start, end }
    }
}

/// A single entry in the token stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// What the token is, along with its payload.
    pub value: TokenValue,

    /// The delimiter characters the token was written with, e.g. `$`, `$$`,
    /// `` ``` `` or `##`.
    pub markup: String,

    /// The source lines the token spans.  Only set on block tokens.
    pub map: Option<LineRange>,

    /// Whether this is a block-level token.
    pub block: bool,
}

impl Token {
    /// Construct an inline token.
    pub fn new(value: TokenValue) -> Self {
        Token {
            value,
            markup: String::new(),
            map: None,
            block: false,
        }
    }

    /// Construct a block token spanning `map`.
    pub fn new_block(value: TokenValue, map: LineRange) -> Self {
        Token {
            value,
            markup: String::new(),
            map: Some(map),
            block: true,
        }
    }

    /// Set the markup, builder style.
    pub fn with_markup(mut self, markup: impl Into<String>) -> Self {
        self.markup = markup.into();
        self
    }

    /// The inline children of this token, if it is an `Inline` token.
    pub fn children(&self) -> &[Token] {
        match self.value {
            TokenValue::Inline(ref inline) => &inline.children,
            _ => &[],
        }
    }

    /// The math payload of this token, if it is a math token.
    pub fn math(&self) -> Option<&NodeMath> {
        match self.value {
            TokenValue::Math(ref math) => Some(math),
            _ => None,
        }
    }
}

/// The kinds of token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenValue {
    /// **Block**. Opens a paragraph.
    ParagraphOpen,

    /// **Block**. Closes a paragraph.
    ParagraphClose,

    /// **Block**. Opens an ATX heading of the given level (1 to 6).
    HeadingOpen(u8),

    /// **Block**. Closes an ATX heading of the given level.
    HeadingClose(u8),

    /// **Block**. A thematic break.
    ThematicBreak,

    /// **Block**. An indented code block.  The literal is not interpreted.
    CodeBlock(String),

    /// **Block**. A fenced code block.
    Fence(NodeFence),

    /// **Block**. A run of inline content belonging to the enclosing block.
    /// The children are filled in by the inline pass.
    Inline(NodeInline),

    /// **Inline**. Literal text.
    Text(String),

    /// **Inline**. A soft line break.
    SoftBreak,

    /// **Inline**. A hard line break.
    HardBreak,

    /// **Inline**. A code span.
    Code(String),

    /// **Block** or **Inline**. Dollar-delimited math.  Inline math is never
    /// given a line map; block math always is.
    Math(NodeMath),
}

/// A fenced code block.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NodeFence {
    /// The info string following the opening fence, trimmed.
    pub info: String,

    /// The literal contents of the block, including the final newline.
    pub literal: String,
}

/// Source text awaiting, or holding the result of, the inline pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NodeInline {
    /// The raw inline source.
    pub content: String,

    /// Tokens produced by the inline pass.
    pub children: Vec<Token>,
}

/// Which flavour of math a token holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MathKind {
    /// `$...$`, or `$$...$$` within a paragraph.
    Inline,

    /// A `$$` block.
    Block,

    /// A `$$` block closed with an equation label, e.g. `$$ a=1 $$ (eq1)`.
    /// The label excludes the parentheses.
    BlockWithLabel(String),
}

/// A math span or block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeMath {
    /// The kind of math, and the label for labeled blocks.
    pub kind: MathKind,

    /// The raw text between the delimiters.  Never empty; nothing in it is
    /// unescaped.
    pub content: String,
}

impl NodeMath {
    /// The equation label, present only for [`MathKind::BlockWithLabel`].
    pub fn label(&self) -> Option<&str> {
        match self.kind {
            MathKind::BlockWithLabel(ref label) => Some(label),
            _ => None,
        }
    }

    /// Whether this is block math, labeled or not.
    pub fn is_block(&self) -> bool {
        !matches!(self.kind, MathKind::Inline)
    }
}
