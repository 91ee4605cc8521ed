use super::*;
use pretty_assertions::assert_eq;
use ntest::test_case;

#[test_case("$x^2$ and $1 + 2$", "$x^2$ and $1 + 2$\n")]
#[test_case("$$\nx^2\n$$", "$$\nx^2\n$$\n")]
#[test_case("$$ a $$   (eq1)", "$$ a $$ (eq1)\n")]
#[test_case("$$a$$(1)", "$$a$$ (1)\n")]
#[test_case("costs $5", "costs \\$5\n")]
#[test_case("\\$x$", "\\$x\\$\n")]
#[test_case("a\n$$\nx\n$$", "a\n\\$$\nx\n$\\$\n")]
fn math_blocks_and_spans(input: &str, expected: &str) {
    commonmark(input, expected, Some(&math_options()));
}

#[test_case("---", "-----\n")]
#[test_case("`a``b`", "```a``b```\n")]
#[test_case("`` `a ``", "`` `a ``\n")]
#[test_case("## Hi ##", "## Hi\n")]
#[test_case("a *b* \\_c", "a \\*b\\* \\_c\n")]
#[test_case("\\- item", "\\- item\n")]
#[test_case("a - b", "a - b\n")]
#[test_case("$x$", "\\$x\\$\n")]
fn core_constructs(input: &str, expected: &str) {
    commonmark(input, expected, None);
}

#[test]
fn blocks_are_separated() {
    commonmark(
        "# a\nb\n```\nc\n```\n    d\n",
        "# a\n\nb\n\n```\nc\n```\n\n    d\n",
        None,
    );
}

#[test]
fn fence_markers() {
    commonmark("````\n```\n````\n", "````\n```\n````\n", None);
    commonmark("~~~ a`b\nx\n~~~\n", "~~~a`b\nx\n~~~\n", None);
}

#[test]
fn breaks() {
    commonmark("a  \nb\n", "a\\\nb\n", None);

    let mut options = Options::default();
    options.render.hardbreaks = true;
    commonmark("a\nb\n", "a\\\nb\n", Some(&options));
}

#[test]
fn math_blocks_between_paragraphs() {
    commonmark(
        "a\n\n$$ x $$ (1)\nb\n",
        "a\n\n$$ x $$ (1)\n\nb\n",
        Some(&math_options()),
    );
}

/// Rendering is a fixed point after one pass.
#[test_case("Costs \\$5, or $x$.\n\n$$\na\n$$ (eq1)\n")]
#[test_case("$$ b=2 $$\nmore $y$ text\n")]
#[test_case("a $ b $ c\n\n---\n\n$$a$$\n")]
#[test_case("\\\\$x$ and \\$y$\n")]
fn idempotent(input: &str) {
    let options = math_options();
    let once = render_commonmark(input, &options);
    let twice = render_commonmark(&once, &options);
    compare_strs(&twice, &once, "idempotence", input);
}

fn math_payloads(input: &str, options: &Options) -> Vec<NodeMath> {
    parse_document(input, options)
        .iter()
        .flat_map(|token| std::iter::once(token).chain(token.children()))
        .filter_map(|token| token.math().cloned())
        .collect()
}

#[test]
fn math_payloads_survive() {
    let mut options = math_options();
    options.extension.math_dollars = Some(MathOptions {
        double_dollar_inline: true,
        ..MathOptions::default()
    });

    let input = concat!(
        "Let $a_1$ and $$\\sum b$$ be given.\n",
        "\n",
        "$$\n",
        "a*b = c_d\n",
        "$$ (sum)\n",
        "\n",
        "$$ \\frac{1}{2} $$\n",
    );
    let before = math_payloads(input, &options);
    assert_eq!(before.len(), 4);

    let md = render_commonmark(input, &options);
    assert_eq!(math_payloads(&md, &options), before);
}
