use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use evodist::distance::Aggregation;
use evodist::locate::CommandLocator;
use evodist::pipeline::{
    self, AlignmentInput, PipelineConfig, StatisticMode, Toolbox, TreeProgram,
};

#[derive(Parser)]
#[command(name = "evodist")]
#[command(
    about = "Average evolutionary distance of protein sequences from tree branch lengths",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// FASTA file of protein sequences, or an alignment with --my-msa
    #[arg(value_name = "FASTA")]
    input: PathBuf,

    /// Report the distance of every sequence, in input order, before the summary
    #[arg(long)]
    per_seq: bool,

    /// Input is a precomputed alignment (FASTA or Clustal), skip muscle
    #[arg(long)]
    my_msa: bool,

    /// Directory for the tree (and the alignment, unless --my-msa)
    #[arg(long, value_name = "DIR", default_value = ".")]
    odir: PathBuf,

    /// Program building the tree
    #[arg(long, value_enum, default_value_t = TreeProgram::Phyml)]
    tree_builder: TreeProgram,

    /// Aggregate node distances by median rather than mean
    #[arg(long)]
    median: bool,

    /// Verbose level: 1=error, 2=warning, 3=message, 4+=debugging
    #[arg(short = 'v', long, value_name = "INT", default_value = "3")]
    verbosity: i32,
}

impl Cli {
    fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig::new()
            .with_tree_program(self.tree_builder)
            .with_statistic_mode(if self.per_seq {
                StatisticMode::PerSequence
            } else {
                StatisticMode::Aggregate
            })
            .with_alignment_input(if self.my_msa {
                AlignmentInput::Supplied
            } else {
                AlignmentInput::Compute
            })
            .with_output_dir(self.odir.clone())
            .with_aggregation(if self.median {
                Aggregation::Median
            } else {
                Aggregation::Mean
            })
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version go to stdout and are not failures
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

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            evodist::logging::fatal(&e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> evodist::Result<()> {
    let config = cli.pipeline_config();
    log::info!("Tree builder: {}", config.tree_program().executable());

    let toolbox = Toolbox::locate(&config, &CommandLocator::from_env())?;
    let outcome = pipeline::run(&cli.input, config, &toolbox)?;

    let mut stdout = io::stdout().lock();
    write!(stdout, "{outcome}")?;
    stdout.flush()?;
    Ok(())
}
