/// Builds a 256-entry membership table from one or more byte strings.
macro_rules! byte_set {
    ($($value:literal),*) => {{
        let mut table = [false; 256];
        $(
            let bytes: &[u8] = $value;
            let mut i = 0;
            while i < bytes.len() {
                table[bytes[i] as usize] = true;
                i += 1;
            }
        )*
        table
    }};
}

const SPACE: [bool; 256] = byte_set!(b"\t\n\x0b\x0c\r ");
const ASCII_PUNCT: [bool; 256] = byte_set!(
    b"!\"#$%&'()*+,-./",
    b":;<=>?@",
    b"[\\]^_`",
    b"{|}~"
);

const HTML_UNSAFE: [bool; 256] = byte_set!(b"\"&<>");

// Bytes the text rule stops at, so that a later inline rule gets a chance.
const INLINE_TERMINATOR: [bool; 256] = byte_set!(b"\n\\`$");

pub fn isspace(ch: u8) -> bool {
    SPACE[ch as usize]
}

pub fn ispunct(ch: u8) -> bool {
    ASCII_PUNCT[ch as usize]
}

pub fn is_html_unsafe(ch: u8) -> bool {
    HTML_UNSAFE[ch as usize]
}

pub fn is_inline_terminator(ch: u8) -> bool {
    INLINE_TERMINATOR[ch as usize]
}

/// Whitespace as the inline adjacency rules see it: ASCII space and control
/// whitespace plus the Unicode space separators.
pub fn is_white_space(c: char) -> bool {
    matches!(
        u32::from(c),
        0x09..=0x0d
            | 0x20
            | 0xa0
            | 0x1680
            | 0x2000..=0x200a
            | 0x202f
            | 0x205f
            | 0x3000
    )
}

/// Digits as the inline adjacency rules see them: any Unicode numeric
/// character, so `٣` and `²` count as well as `0-9`.
pub fn is_digit(c: char) -> bool {
    c.is_numeric()
}
