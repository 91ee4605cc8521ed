#![no_main]
use dollarmath::{markdown_to_commonmark, parse_document, Options};
use libfuzzer_sys::arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    options: Options,
    markdown: &'a str,
}

fuzz_target!(|input: Input| {
    let md = markdown_to_commonmark(input.markdown, &input.options);
    let _ = parse_document(&md, &input.options);
});
