use crate::*;
use pretty_assertions::assert_eq;

mod commonmark;
mod pathological;
mod scanners;

#[track_caller]
fn compare_strs(output: &str, expected: &str, kind: &str, original_input: &str) {
    if output != expected {
        println!("Running {} test", kind);
        println!("Original input:");
        println!("==============================");
        println!("{}", original_input);
        println!("==============================");
    }

    assert_eq!(expected, output);
}

fn render_html(input: &str, options: &Options) -> String {
    let tokens = parse_document(input, options);
    let mut output = vec![];
    html::format_document(&tokens, options, &mut output).unwrap();
    String::from_utf8(output).unwrap()
}

fn render_commonmark(input: &str, options: &Options) -> String {
    let tokens = parse_document(input, options);
    let mut output = vec![];
    cm::format_document(&tokens, options, &mut output).unwrap();
    String::from_utf8(output).unwrap()
}

/// Options with dollar math enabled at its defaults.
fn math_options() -> Options {
    let mut options = Options::default();
    options.extension.math_dollars = Some(MathOptions::default());
    options
}

#[track_caller]
fn html(input: &str, expected: &str) {
    html_opts_i(input, expected, true, |_| ());
}

/// Renders `input` with the options `opts` sets up, and checks the HTML.
///
/// With `roundtrip`, the CommonMark rendering of `input` must also render
/// to the same HTML.
#[track_caller]
fn html_opts_i<F>(input: &str, expected: &str, roundtrip: bool, opts: F)
where
    F: FnOnce(&mut Options),
{
    let mut options = Options::default();
    opts(&mut options);

    let output = render_html(input, &options);
    compare_strs(&output, expected, "regular", input);

    if !roundtrip {
        return;
    }

    let md = render_commonmark(input, &options);
    let output_from_rt = render_html(&md, &options);
    compare_strs(&output_from_rt, expected, "roundtrip", &md);
}

#[track_caller]
fn commonmark(input: &str, expected: &str, opts: Option<&Options>) {
    let defaults = Options::default();
    let options = opts.unwrap_or(&defaults);

    let output = render_commonmark(input, options);
    compare_strs(&output, expected, "regular", input);
}

/// Checks HTML output with boolean options switched on, e.g.
/// `html_opts!([render.hardbreaks], "a\nb\n", "<p>a<br />\nb</p>\n")`.
macro_rules! html_opts {
    ([$($optclass:ident.$optname:ident),*], $lhs:expr, $rhs:expr $(,)?) => {
        crate::tests::html_opts_i($lhs, $rhs, true, |opts| {
            $(opts.$optclass.$optname = true;)*
        })
    };
}
pub(crate) use html_opts;

/// Checks HTML output with dollar math enabled, overriding the given
/// [`MathOptions`] fields, e.g.
/// `html_math!([allow_labels = false], "$$a$$ (1)\n", "...")`.
macro_rules! html_math {
    ([$($optname:ident = $val:expr),*], $lhs:expr, $rhs:expr $(,)?) => {
        crate::tests::html_opts_i($lhs, $rhs, true, |opts| {
            #[allow(unused_mut)]
            let mut math = crate::MathOptions::default();
            $(math.$optname = $val;)*
            opts.extension.math_dollars = Some(math);
        })
    };
    ($lhs:expr, $rhs:expr $(,)?) => {
        crate::tests::html_math!([], $lhs, $rhs)
    };
}
pub(crate) use html_math;
