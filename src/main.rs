//! The `dollarmath` binary.

use std::env;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::string::FromUtf8Error;

use clap::{Parser, ValueEnum};
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use dollarmath::{format_commonmark, format_html, parse_document, MathOptions, Options};

const ENV_LOG: &str = "DOLLARMATH_LOG";

#[derive(Debug, Parser)]
#[command(about, author, version)]
#[command(after_help = "\
By default, dollarmath will attempt to read command-line options from a config file \
specified by --config-file. This behaviour can be disabled by passing --config-file none. \
It is not an error if the config file does not exist.\n\n\
Logging is controlled with the DOLLARMATH_LOG environment variable, e.g. \
DOLLARMATH_LOG=trace.")]
struct Cli {
    /// Markdown file(s) to parse; or standard input if none passed
    #[arg(value_name = "FILE")]
    files: Option<Vec<PathBuf>>,

    /// Path to config file containing command-line arguments, or 'none'
    #[arg(short, long, value_name = "PATH", default_value = get_default_config_path())]
    config_file: String,

    /// Treat newlines as hard line breaks
    #[arg(long)]
    hardbreaks: bool,

    /// Default value for fenced code block's info strings if none is given
    #[arg(long, value_name = "INFO")]
    default_info_string: Option<String>,

    /// Disable dollar math entirely
    #[arg(long)]
    no_math: bool,

    /// Don't recognise equation labels after block math, e.g. `$$ x $$ (1)`
    #[arg(long)]
    no_labels: bool,

    /// Reject inline math with whitespace just inside a delimiter
    #[arg(long)]
    no_space_adjacency: bool,

    /// Reject inline math with a digit just outside a delimiter
    #[arg(long)]
    no_digit_adjacency: bool,

    /// Recognise `$$...$$` spans within paragraphs
    #[arg(long)]
    double_inline: bool,

    /// Specify output format
    #[arg(short = 't', long = "to", value_enum, default_value_t = Format::Html)]
    format: Format,

    /// Write output to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Html,
    #[value(name = "commonmark")]
    CommonMark,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("could not read {path}: {source}")]
    ReadInput { path: String, source: io::Error },

    #[error("input is not valid UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),

    #[error("could not parse config file {path}: {source}")]
    Config {
        path: String,
        source: shell_words::ParseError,
    },

    #[error("could not write output: {0}")]
    Write(#[source] io::Error),
}

impl Cli {
    fn options(&self) -> Options {
        let mut options = Options::default();

        if !self.no_math {
            options.extension.math_dollars = Some(MathOptions {
                allow_labels: !self.no_labels,
                allow_space_adjacency: !self.no_space_adjacency,
                allow_digit_adjacency: !self.no_digit_adjacency,
                double_dollar_inline: self.double_inline,
            });
        }
        options.parse.default_info_string = self.default_info_string.clone();
        options.render.hardbreaks = self.hardbreaks;

        options
    }
}

fn main() -> ExitCode {
    init_logging();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("dollarmath: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run() -> Result<(), CliError> {
    let cli = parse_cli_with_config()?;
    let options = cli.options();

    let mut s = Vec::with_capacity(2048);
    match cli.files {
        None => {
            io::stdin()
                .read_to_end(&mut s)
                .map_err(|source| CliError::ReadInput {
                    path: "<stdin>".into(),
                    source,
                })?;
        }
        Some(ref paths) => {
            for path in paths {
                let mut file = fs::File::open(path).map_err(|source| CliError::ReadInput {
                    path: path.display().to_string(),
                    source,
                })?;
                file.read_to_end(&mut s)
                    .map_err(|source| CliError::ReadInput {
                        path: path.display().to_string(),
                        source,
                    })?;
            }
        }
    }

    let input = String::from_utf8(s)?;
    let tokens = parse_document(&input, &options);
    debug!(format = ?cli.format, tokens = tokens.len(), "rendering");

    let formatter = match cli.format {
        Format::Html => format_html,
        Format::CommonMark => format_commonmark,
    };

    match cli.output {
        Some(ref path) => {
            let mut bw = io::BufWriter::new(fs::File::create(path).map_err(CliError::Write)?);
            formatter(&tokens, &options, &mut bw).map_err(CliError::Write)?;
            bw.flush().map_err(CliError::Write)?;
        }
        None => {
            let stdout = io::stdout();
            let mut bw = io::BufWriter::new(stdout.lock());
            formatter(&tokens, &options, &mut bw).map_err(CliError::Write)?;
            bw.flush().map_err(CliError::Write)?;
        }
    }

    Ok(())
}

/// Parse the command line, splicing in the arguments from the config file
/// ahead of those given explicitly.
fn parse_cli_with_config() -> Result<Cli, CliError> {
    let cli = Cli::parse();
    if cli.config_file == "none" {
        return Ok(cli);
    }

    let Ok(contents) = fs::read_to_string(&cli.config_file) else {
        debug!(path = %cli.config_file, "no config file");
        return Ok(cli);
    };

    let mut args = shell_words::split(&contents).map_err(|source| CliError::Config {
        path: cli.config_file.clone(),
        source,
    })?;
    debug!(path = %cli.config_file, count = args.len(), "read config file");

    let mut argv = env::args_os();
    let mut spliced = Vec::with_capacity(args.len() + 1);
    spliced.extend(argv.next());
    spliced.extend(args.drain(..).map(Into::into));
    spliced.extend(argv);

    Ok(Cli::parse_from(spliced))
}

#[cfg(all(not(windows), not(target_arch = "wasm32")))]
fn get_default_config_path() -> String {
    if let Ok(xdg_dirs) = xdg::BaseDirectories::with_prefix("dollarmath") {
        if let Some(path) = xdg_dirs.find_config_file("config") {
            if let Some(path_str) = path.to_str() {
                return path_str.into();
            }
        }
    }

    "dollarmath.config".into()
}

#[cfg(any(windows, target_arch = "wasm32"))]
fn get_default_config_path() -> String {
    "dollarmath.config".into()
}
