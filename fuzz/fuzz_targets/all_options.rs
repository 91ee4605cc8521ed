#![no_main]

use libfuzzer_sys::fuzz_target;

use dollarmath::{markdown_to_html, Extension, MathOptions, Options, Parse, Render};

fuzz_target!(|s: &str| {
    let extension = Extension {
        math_dollars: Some(MathOptions {
            allow_labels: true,
            allow_space_adjacency: true,
            allow_digit_adjacency: true,
            double_dollar_inline: true,
        }),
    };

    let parse = Parse {
        default_info_string: Some("rust".to_string()),
    };

    let render = Render { hardbreaks: true };

    markdown_to_html(
        s,
        &Options {
            extension,
            parse,
            render,
        },
    );
});
