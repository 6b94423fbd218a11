mod config;
mod display;
mod extractor;
mod font_type;
mod pipeline;
mod report;
mod scanner;
mod stats;
mod subsetter;

use clap::Parser;
use std::io;
use std::path::PathBuf;

use crate::config::DEFAULT_FLAVOR;
use crate::pipeline::RunOptions;
use crate::subsetter::Pyftsubset;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Subset a Material Symbols webfont to the icons a web project uses"
)]
struct Args {
    /// Compare the two most recent reports instead of subsetting
    #[arg(long)]
    compare: bool,

    /// Font style: rounded, outlined or sharp
    #[arg(long = "type", value_name = "TYPE", default_value = "rounded")]
    font_type: String,

    /// Project root to scan; assets/webfont lives below it
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Subsetting command to run
    #[arg(long, value_name = "BIN", default_value = "pyftsubset")]
    subsetter: String,

    /// Container format of the subset font
    #[arg(long, default_value = DEFAULT_FLAVOR, value_parser = ["woff2", "woff"])]
    flavor: String,

    /// Additional patterns to exclude (comma-separated glob patterns)
    #[arg(short, long)]
    exclude: Option<String>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    // Parse exclude patterns
    let exclude: Vec<String> = match args.exclude {
        Some(ref patterns) => patterns
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        None => Vec::new(),
    };

    let options = RunOptions {
        root: args.root,
        font_type: args.font_type,
        compare: args.compare,
        exclude,
    };
    let subsetter = Pyftsubset::new(args.subsetter, args.flavor);

    // Failures are reported, never turned into a non-zero exit
    if let Err(err) = pipeline::run(&options, &subsetter, &mut io::stdout().lock()) {
        log::error!("{:#}", err);
    }
}
