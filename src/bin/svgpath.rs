#![warn(unused)]

use anyhow::{Context, Result};
use clap::crate_version;
use thiserror::Error;

use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use svgpath::{CubicBezierCurve, ParseError, PathBuilder, PathCommand, PathProgram};

fn build_cli() -> clap::Command {
    clap::Command::new("svgpath")
        .version(concat!("version ", crate_version!()))
        .about("Parse SVG path data and print it as normalized drawing commands")
        .disable_version_flag(true)
        .after_help(
            "Set the SVGPATH_LOG environment variable to print diagnostics about malformed \
             path data.  They are written to stdout, interleaved with the output.",
        )
        .arg(
            clap::Arg::new("version")
                .short('v')
                .long("version")
                .help("Display the version information")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("file")
                .short('f')
                .long("file")
                .num_args(1)
                .value_parser(clap::value_parser!(PathBuf))
                .value_name("FILE")
                .help("Read path data from a file, you can use - for stdin")
                .action(clap::ArgAction::Append),
        )
        .arg(
            clap::Arg::new("format")
                .long("format")
                .num_args(1)
                .value_parser(clap::builder::PossibleValuesParser::new(["text", "svg"]))
                .default_value("text")
                .help("Output format")
                .action(clap::ArgAction::Set),
        )
        .arg(
            clap::Arg::new("strict")
                .long("strict")
                .help("Fail on malformed path data instead of printing what could be parsed")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("DATA")
                .value_parser(clap::value_parser!(String))
                .help("Path data to parse; read from stdin if no data or files are given")
                .num_args(1..)
                .action(clap::ArgAction::Append),
        )
}

#[derive(Debug, Error)]
enum Error {
    #[error("{input}: {error}")]
    Malformed { input: Input, error: ParseError },

    #[error("Only one input can be read from stdin.")]
    StdinTwice,
}

#[derive(Clone, Debug)]
enum Input {
    Argument(usize),
    Stdin,
    File(PathBuf),
}

impl std::fmt::Display for Input {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Input::Argument(n) => write!(f, "argument {n}"),
            Input::Stdin => "stdin".fmt(f),
            Input::File(p) => p.display().fmt(f),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum Format {
    Text,
    Svg,
}

struct Options {
    format: Format,
    strict: bool,
}

fn read_input(input: &Input, data: Option<&String>) -> Result<String> {
    match input {
        Input::Argument(_) => Ok(data.cloned().unwrap_or_default()),

        Input::Stdin => {
            let mut s = String::new();
            io::stdin()
                .read_to_string(&mut s)
                .context("could not read path data from stdin")?;
            Ok(s)
        }

        Input::File(p) => {
            fs::read_to_string(p).with_context(|| format!("could not read {}", p.display()))
        }
    }
}

fn parse_input(input: &Input, path_str: &str, options: &Options) -> Result<PathProgram, Error> {
    if !options.strict {
        return Ok(svgpath::parse(path_str));
    }

    let mut builder = PathBuilder::default();
    builder.parse(path_str).map_err(|error| Error::Malformed {
        input: input.clone(),
        error,
    })?;

    Ok(builder.into_program())
}

fn write_program<W: Write>(out: &mut W, program: &PathProgram, format: Format) -> io::Result<()> {
    if format == Format::Svg {
        return writeln!(out, "{program}");
    }

    for cmd in program.iter() {
        match cmd {
            PathCommand::MoveTo(p) => writeln!(out, "MoveTo {} {}", p.x, p.y)?,
            PathCommand::LineTo(p) => writeln!(out, "LineTo {} {}", p.x, p.y)?,
            PathCommand::CurveTo(CubicBezierCurve { pt1, pt2, to }) => writeln!(
                out,
                "CubicTo {} {} {} {} {} {}",
                pt1.x, pt1.y, pt2.x, pt2.y, to.x, to.y
            )?,
            PathCommand::ClosePath => writeln!(out, "Close")?,
        }
    }

    Ok(())
}

fn run() -> Result<()> {
    let matches = build_cli().get_matches();

    if matches.get_flag("version") {
        println!("svgpath version {}", crate_version!());
        return Ok(());
    }

    let format_str: &String = matches
        .get_one("format")
        .expect("already provided default_value");

    let options = Options {
        format: match format_str.as_str() {
            "svg" => Format::Svg,
            _ => Format::Text,
        },
        strict: matches.get_flag("strict"),
    };

    let data: Vec<&String> = matches
        .get_many::<String>("DATA")
        .map(|values| values.collect())
        .unwrap_or_default();

    let mut inputs: Vec<Input> = (0..data.len()).map(|i| Input::Argument(i + 1)).collect();

    if let Some(files) = matches.get_many::<PathBuf>("file") {
        inputs.extend(files.map(|p| {
            if p.as_path() == Path::new("-") {
                Input::Stdin
            } else {
                Input::File(p.clone())
            }
        }));
    }

    if inputs.is_empty() {
        inputs.push(Input::Stdin);
    }

    if inputs.iter().filter(|i| matches!(i, Input::Stdin)).count() > 1 {
        return Err(Error::StdinTwice.into());
    }

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    for input in &inputs {
        let arg = match input {
            Input::Argument(n) => data.get(n - 1).copied(),
            _ => None,
        };

        let path_str = read_input(input, arg)?;
        let program = parse_input(input, &path_str, &options)?;

        write_program(&mut out, &program, options.format)
            .context("could not write to stdout")?;
    }

    out.flush().context("could not write to stdout")?;

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("svgpath: {e:#}");
        process::exit(1);
    }
}
