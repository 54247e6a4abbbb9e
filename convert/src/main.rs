use std::path::PathBuf;

use clap::{crate_version, Parser};
use sf2xrni::{sf2xrni_converter, utils::normalize_args};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(
    name = "sf2xrni",
    version = crate_version!(),
    about = "Converts SF2 banks into key split instruments, one per preset."
)]
struct Cli {
    /// The SF2 files to convert. Each one is written into a directory named
    /// after the file, without its extension.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Only convert presets whose name contains this string (case sensitive).
    /// Also accepted as `--filter:<substring>`.
    #[arg(long)]
    filter: Option<String>,

    /// Print debug output, such as skipped zones.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    for input in &cli.inputs {
        let result = sf2xrni_converter(input)
            .with_filter(cli.filter.clone())
            .run();

        match result {
            Ok(stats) => info!(
                "{}: wrote {} presets with {} samples to {}",
                input.display(),
                stats.presets,
                stats.samples,
                stats.output_dir.display()
            ),
            Err(e) => error!("{}: {}", input.display(), error_chain(&e)),
        }
    }
}

fn error_chain(e: &dyn std::error::Error) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
