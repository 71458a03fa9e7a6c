use anyhow::{Context, Result};
use clap::Parser;
use itertools::Itertools;
use log::{LevelFilter, debug};

use bip32_template::{HardenedMarker, ParseOptions, Template};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Template to parse, e.g. m/44'/0'/[0-5]'/0/*
    #[arg(value_name = "TEMPLATE")]
    template: String,

    /// Concrete paths to match against the template
    #[arg(value_name = "PATH")]
    paths: Vec<String>,

    /// Maximum number of sections
    #[arg(long, value_name = "N", default_value_t = 16)]
    max_sections: usize,

    /// Maximum number of ranges in one bracketed section
    #[arg(long, value_name = "N", default_value_t = 8)]
    max_ranges: usize,

    /// Accept only concrete paths (no `*` or `[...]`)
    #[arg(long)]
    only_path: bool,

    /// Reject ranges that should have been written merged
    #[arg(long)]
    unambiguous: bool,

    /// Accepted hardened marker glyphs (one or two of `h` and `'`)
    #[arg(
        long,
        value_name = "GLYPHS",
        default_value = "h'",
        value_parser = parse_markers
    )]
    markers: [HardenedMarker; 2],

    /// Log more detail (repeat for trace output)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let options = ParseOptions::default()
        .with_max_sections(args.max_sections)
        .with_max_ranges_per_section(args.max_ranges)
        .with_format_onlypath(args.only_path)
        .with_format_unambiguous(args.unambiguous)
        .with_hardened_markers(args.markers);
    debug!("parse options: {options:?}");

    let template = Template::parse(&args.template, &options)
        .with_context(|| format!("Invalid template `{}`", args.template))?;

    println!("{template}");
    println!("partial: {}", template.is_partial());
    println!("sections: {}", template.sections().len());
    if let Some(path) = template.to_path() {
        println!("path: {}", path.iter().join("/"));
    }

    let path_options = options.with_format_onlypath(true);
    for input in &args.paths {
        let path = Template::parse(input, &path_options)
            .with_context(|| format!("Invalid path `{input}`"))?
            .to_path()
            .with_context(|| format!("`{input}` is not a concrete path"))?;
        let verdict = if template.matches(&path) {
            "match"
        } else {
            "no match"
        };
        println!("{input}: {verdict}");
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn parse_markers(s: &str) -> Result<[HardenedMarker; 2], String> {
    let markers: Vec<HardenedMarker> = s
        .chars()
        .map(HardenedMarker::try_from)
        .collect::<Result<_, _>>()
        .map_err(|e| format!("{e} in {s:?}"))?;
    match markers.as_slice() {
        [m] => Ok([*m, *m]),
        [a, b] => Ok([*a, *b]),
        _ => Err("expected one or two glyphs out of `h` and `'`".to_string()),
    }
}
