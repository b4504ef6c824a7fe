//! Average evolutionary distance of one protein family.
//!
//! A run walks through these stages, stopping early when there is too little
//! to analyse:
//! 1. size check of the input: median length and taxon count
//! 2. alignment with `muscle`, unless an alignment is supplied
//! 3. conversion to relaxed PHYLIP with duplicate deletion
//! 4. tree building with PhyML or neighbor
//! 5. parsing the tree and computing leaf distance statistics
//! 6. moving the tree (and computed alignment) to the output directory
//!
//! All intermediates live in a [Workspace] removed at the end of the run.
//!
//! # Example
//! ```no_run
//! use evodist::locate::CommandLocator;
//! use evodist::pipeline::{self, PipelineConfig, Toolbox};
//!
//! let config = PipelineConfig::new().with_output_dir("trees");
//! let toolbox = Toolbox::locate(&config, &CommandLocator::from_env())?;
//! let outcome = pipeline::run("P12345.fasta", config, &toolbox)?;
//! print!("{outcome}");
//! # Ok::<(), evodist::Error>(())
//! ```

mod config;
mod report;
mod tools;
mod workspace;

pub use self::config::{
    AlignmentInput, PipelineConfig, RunParameters, StatisticMode, TreeProgram, label_for,
};
pub use self::report::{DistanceReport, SequenceDistance, format_general};
pub use self::tools::{ALIGNER, Toolbox};
pub use self::workspace::Workspace;

use crate::distance::{DistanceMatrix, LeafDistanceStats};
use crate::error::{Error, Result};
use crate::newick;
use crate::phylip::{self, ConvertConfig, OutputTarget};
use crate::sequence::length;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

/// Fewest input sequences worth building a tree for
pub const MIN_TAXA: usize = 4;

/// Fewest distinct sequences left after duplicate deletion
pub const MIN_DISTINCT_TAXA: usize = 3;

/// How a run ended. Only [Outcome::Completed] carries a result; the other
/// variants are successful runs with nothing to analyse.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The input file is empty
    NoTaxa { label: String },
    /// Fewer than [MIN_TAXA] input sequences
    TooFewTaxa { label: String, count: usize },
    /// Fewer than [MIN_DISTINCT_TAXA] sequences left after duplicate deletion
    TooFewAfterDedup {
        label: String,
        original: usize,
        remaining: usize,
    },
    Completed {
        report: DistanceReport,
        /// Per-sequence lines, empty in aggregate mode
        per_sequence: Vec<SequenceDistance>,
    },
}

impl Outcome {
    pub fn report(&self) -> Option<&DistanceReport> {
        match self {
            Outcome::Completed { report, .. } => Some(report),
            _ => None,
        }
    }

    pub fn is_skip(&self) -> bool {
        self.report().is_none()
    }
}

/// Writes the standard output lines of the outcome, each terminated by a newline.
impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::NoTaxa { label } => writeln!(f, "{label} No taxa"),
            Outcome::TooFewTaxa { label, count } => {
                writeln!(f, "{label} Count of taxa {count} less than minimum {MIN_TAXA} taxa")
            }
            Outcome::TooFewAfterDedup {
                label,
                original,
                remaining,
            } => writeln!(
                f,
                "{label} From {original} original sequences only {remaining} remain(s) \
                 after deletion of duplicates, too few to analyse"
            ),
            Outcome::Completed {
                report,
                per_sequence,
            } => {
                for line in per_sequence {
                    writeln!(f, "{line}")?;
                }
                writeln!(f, "{report}")
            }
        }
    }
}

// =#========================================================================#=
// STAGES
// =#========================================================================#=
/// Runs the whole pipeline on `input`.
///
/// # Errors
/// * [Error::InputNotFound] if `input` is not a file
/// * [Error::Io], [Error::LengthMismatch] for unreadable or malformed input
/// * [Error::ToolLaunch], [Error::MissingToolOutput] if an external program fails
/// * [Error::Tree], [Error::TooFewLeaves] if the tree is unusable
pub fn run<P: AsRef<Path>>(input: P, config: PipelineConfig, toolbox: &Toolbox) -> Result<Outcome> {
    let input = input.as_ref();
    if !input.is_file() {
        return Err(Error::InputNotFound(input.to_path_buf()));
    }
    let label = label_for(input);

    match size_check(input, label, config)? {
        SizeCheck::Skip(outcome) => Ok(outcome),
        SizeCheck::Proceed(params) => process(&params, toolbox),
    }
}

/// Decision of the size check.
#[derive(Debug, Clone, PartialEq)]
pub enum SizeCheck {
    Proceed(RunParameters),
    Skip(Outcome),
}

/// Measures the input and decides whether it is worth analysing.
///
/// # Returns
/// The frozen [RunParameters], or the skip [Outcome] if there are too few taxa.
pub fn size_check(input: &Path, label: String, config: PipelineConfig) -> Result<SizeCheck> {
    let size = fs::metadata(input).map_err(|e| Error::io(input, e))?.len();
    if size == 0 {
        return Ok(SizeCheck::Skip(Outcome::NoTaxa { label }));
    }

    let summary = match config.alignment_input() {
        AlignmentInput::Compute => length::summarize_raw(input)?,
        AlignmentInput::Supplied => length::summarize_aligned(input)?,
    };
    if summary.num_taxa < MIN_TAXA {
        return Ok(SizeCheck::Skip(Outcome::TooFewTaxa {
            label,
            count: summary.num_taxa,
        }));
    }

    log::info!(
        "{label}: {} taxa, median length {:.2}",
        summary.num_taxa,
        summary.median_length
    );
    Ok(SizeCheck::Proceed(RunParameters::new(config, input, label, summary)))
}

/// Runs the stages after the size check: alignment, conversion, tree
/// building, distance statistics and cleanup.
pub fn process(params: &RunParameters, toolbox: &Toolbox) -> Result<Outcome> {
    let config = params.config();
    let label = params.label();
    let workspace = Workspace::create(config.output_dir())?;

    let alignment = match config.alignment_input() {
        AlignmentInput::Supplied => params.input().to_path_buf(),
        AlignmentInput::Compute => {
            let computed = workspace.file(&format!("{label}.aln"));
            toolbox.align(params.input(), &computed)?;
            computed
        }
    };

    let converted = phylip::convert_file(
        &alignment,
        &ConvertConfig::new().with_duplicate_deletion(true),
    )?;
    if converted.len() < MIN_DISTINCT_TAXA {
        workspace.close()?;
        return Ok(Outcome::TooFewAfterDedup {
            label: label.to_string(),
            original: params.nominal_taxa(),
            remaining: converted.len(),
        });
    }
    let phylip_file = workspace.file(&format!("{label}.phylip"));
    OutputTarget::File(phylip_file.clone()).write(&converted)?;

    let tree_file = toolbox.build_tree(&phylip_file, workspace.path())?;
    let tree = newick::parse_file(&tree_file).map_err(|source| Error::Tree {
        path: tree_file.clone(),
        source,
    })?;

    let matrix = DistanceMatrix::from_tree(&tree);
    let stats = LeafDistanceStats::compute(
        &matrix,
        &converted.multiplicities(),
        config.aggregation(),
        params.median_length(),
    )
    .ok_or_else(|| Error::TooFewLeaves {
        path: tree_file.clone(),
        found: matrix.len(),
    })?;

    workspace.retain(&tree_file, &params.tree_destination())?;
    if config.alignment_input() == AlignmentInput::Compute {
        workspace.retain(&alignment, &params.alignment_destination())?;
    }
    workspace.close()?;

    let per_sequence = match config.statistic_mode() {
        StatisticMode::Aggregate => Vec::new(),
        StatisticMode::PerSequence => {
            // Input order of the surviving sequences, not tree order
            let input_order: HashMap<&str, usize> = converted
                .taxa
                .iter()
                .enumerate()
                .map(|(position, taxon)| (taxon.identifier.as_str(), position))
                .collect();
            let mut leaves: Vec<_> = stats.leaves.iter().collect();
            leaves.sort_by_key(|leaf| {
                input_order
                    .get(leaf.label.as_str())
                    .copied()
                    .unwrap_or(usize::MAX)
            });
            leaves
                .into_iter()
                .map(|leaf| SequenceDistance::new(label, leaf))
                .collect()
        }
    };
    Ok(Outcome::Completed {
        report: DistanceReport::new(label, params.median_length(), &stats, params.nominal_taxa()),
        per_sequence,
    })
}
