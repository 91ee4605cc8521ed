use std::borrow::Cow;

/// Normalizes line endings to `\n` and replaces NUL with U+FFFD.
pub fn normalize_input(s: &str) -> Cow<'_, str> {
    if !s.bytes().any(|b| b == b'\r' || b == b'\0') {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push('\n');
            }
            '\0' => out.push('\u{fffd}'),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Code span contents: line endings become spaces, and a single space is
/// stripped from each end when both ends have one and the span is not all
/// spaces.
pub fn normalize_code(v: &str) -> String {
    let mut r = v.replace('\n', " ");

    let contains_nonspace = r.bytes().any(|b| b != b' ');
    if contains_nonspace && r.len() >= 2 && r.starts_with(' ') && r.ends_with(' ') {
        r.remove(0);
        r.pop();
    }

    r
}

/// Length of the longest run of `c` in `s`.
pub fn longest_run(s: &[u8], c: u8) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for &b in s {
        if b == c {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// Removes the trailing run of spaces from `s`, returning how many went.
pub fn trim_trailing_spaces(s: &mut String) -> usize {
    let trimmed = s.trim_end_matches(' ').len();
    let removed = s.len() - trimmed;
    s.truncate(trimmed);
    removed
}
