use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use md2opml::pipeline::{self, RunOptions};
use md2opml::Config;

#[derive(Parser, Debug)]
#[command(
    name = "md2opml",
    about = "Convert markdown tables of feed sources into an OPML subscription list"
)]
struct Args {
    /// Markdown document to read [default: README.md]
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// OPML file to write, replacing any existing file [default: feeds.opml]
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Title for the OPML head [default: RSS Feeds]
    #[arg(long)]
    title: Option<String>,

    /// Config file (missing file means defaults)
    #[arg(long, value_name = "FILE", default_value = "md2opml.toml")]
    config: PathBuf,

    /// Print the OPML document to stdout instead of writing a file
    #[arg(long)]
    stdout: bool,
}

impl Args {
    /// Command-line values win over the config file.
    fn into_options(self, config: Config) -> RunOptions {
        RunOptions {
            input: self.input.unwrap_or(config.input),
            output: self.output.unwrap_or(config.output),
            title: self.title.unwrap_or(config.title),
        }
    }
}

fn main() -> ExitCode {
    // Logs go to stderr so stdout carries only the result
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut stdout = std::io::stdout().lock();
    let result = run(args, &mut stdout);
    report(result, &mut stdout)
}

fn run(args: Args, out: &mut impl Write) -> Result<()> {
    let config = Config::load(&args.config)
        .with_context(|| format!("Failed to load config file: {}", args.config.display()))?;

    let to_stdout = args.stdout;
    let options = args.into_options(config);
    tracing::debug!(?options, "Resolved options");

    if to_stdout {
        let opml = pipeline::render(&options)?;
        out.write_all(opml.as_bytes())?;
        return Ok(());
    }

    let summary = pipeline::run(&options)?;
    writeln!(
        out,
        "OPML file generated: {} ({} feeds)",
        summary.output.display(),
        summary.records
    )?;
    Ok(())
}

/// Prints the failure, if any, and maps the outcome to an exit status.
fn report(result: Result<()>, out: &mut impl Write) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let _ = writeln!(out, "{:#}", e);
            ExitCode::FAILURE
        }
    }
}
