use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use evodist::phylip::{self, ConvertConfig, OutputTarget};

/// Converts a FASTA alignment to relaxed sequential PHYLIP, with identifiers
/// of any length.
#[derive(Parser)]
#[command(name = "fasta2phylip")]
#[command(version)]
struct Cli {
    /// Alignment in FASTA (or Clustal) format
    #[arg(value_name = "ALIGNMENT")]
    input: PathBuf,

    /// Mark gap characters at the sequence ends as missing (for variable length sequences)
    #[arg(long)]
    missing_ends: bool,

    /// Delete duplicate sequences, keeping the first of each
    #[arg(long)]
    deldups: bool,

    /// Output file (default: stdout)
    #[arg(short = 'o', long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Verbose level: 1=error, 2=warning, 3=message, 4+=debugging
    #[arg(short = 'v', long, value_name = "INT", default_value = "2")]
    verbosity: i32,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
            let _ = e.print();
            return code;
        }
    };

    evodist::logging::init(cli.verbosity);

    let config = ConvertConfig::new()
        .with_missing_ends(cli.missing_ends)
        .with_duplicate_deletion(cli.deldups);
    let target = match cli.output {
        Some(path) => OutputTarget::File(path),
        None => OutputTarget::Stdout,
    };

    match phylip::convert(&cli.input, &config, &target) {
        Ok(alignment) => {
            log::info!(
                "{} sequences written, longest identifier {} characters",
                alignment.len(),
                alignment.max_id_len
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            evodist::logging::fatal(&e);
            ExitCode::FAILURE
        }
    }
}
