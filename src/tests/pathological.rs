use super::*;
use pretty_assertions::assert_eq;
use ntest::timeout;

fn math_html(input: &str) -> String {
    render_html(input, &math_options())
}

// input: python3 -c 'n = 50000; print("a " + "$" * n)'
#[test]
#[timeout(4000)]
fn pathological_dollar_run() {
    let n = 50_000;
    let input = format!("a {}", "$".repeat(n));

    assert_eq!(math_html(&input), format!("<p>{}</p>\n", input));
}

// input: python3 -c 'n = 50000; print("$a " * n)'
#[test]
#[timeout(4000)]
fn pathological_alternating_spans() {
    let n = 50_000;
    let input = "$a ".repeat(n);
    let tokens = parse_document(&input, &math_options());

    let spans = tokens[1]
        .children()
        .iter()
        .filter(|t| t.math().is_some())
        .count();
    assert_eq!(spans, n / 2);
}

// input: python3 -c 'n = 50000; print("\\" * n + "$x$")'
#[test]
#[timeout(4000)]
fn pathological_backslash_run() {
    let n = 50_000;
    let input = format!("{}$x$", "\\".repeat(n));
    let exp = format!("<p>{}<eq>x</eq></p>\n", "\\".repeat(n / 2));

    assert_eq!(math_html(&input), exp);
}

// input: python3 -c 'n = 50000; print("\\$" * n)'
#[test]
#[timeout(4000)]
fn pathological_escaped_dollars() {
    let n = 50_000;
    let input = "\\$".repeat(n);

    assert_eq!(math_html(&input), format!("<p>{}</p>\n", "$".repeat(n)));
}

// input: python3 -c 'n = 50000; print("$$\n" + "x\n" * n + "$$")'
#[test]
#[timeout(4000)]
fn pathological_long_block() {
    let n = 50_000;
    let input = format!("$$\n{}$$\n", "x\n".repeat(n));
    let tokens = parse_document(&input, &math_options());

    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].math().map(|m| m.content.len()), Some(2 * n + 1));
}

// Every opener scans to the end of the document, so keep this modest.
// input: python3 -c 'n = 1000; print("$$ a\n\n" * n)'
#[test]
#[timeout(4000)]
fn pathological_unclosed_blocks() {
    let n = 1_000;
    let input = "$$ a\n\n".repeat(n);

    assert_eq!(math_html(&input), "<p>$$ a</p>\n".repeat(n));
}

// input: python3 -c 'n = 50000; print("$$ x" + " (a" * n + ")")'
#[test]
#[timeout(4000)]
fn pathological_label_parens() {
    let n = 50_000;
    let input = format!("$$ x{})", " (a".repeat(n));

    assert_eq!(math_html(&input), format!("<p>{}</p>\n", input));
}
