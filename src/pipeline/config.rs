//! Typed run configuration.
//!
//! [PipelineConfig] holds what the user chose on the command line;
//! [RunParameters] freezes it together with what the size check measured.

use crate::distance::Aggregation;
use crate::sequence::length::LengthSummary;
use std::path::{Path, PathBuf};

/// External program building the tree from the PHYLIP file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum TreeProgram {
    /// Maximum likelihood with PhyML
    #[default]
    Phyml,
    /// Neighbor joining through the `run_neighbor` wrapper of PHYLIP's neighbor
    Neighbor,
}

impl TreeProgram {
    /// Name of the executable to locate
    pub fn executable(&self) -> &'static str {
        match self {
            TreeProgram::Phyml => "phyml",
            TreeProgram::Neighbor => "run_neighbor",
        }
    }

    /// File name suffix of the retained tree, appended to the label
    pub fn tree_suffix(&self) -> &'static str {
        match self {
            TreeProgram::Phyml => ".tree",
            TreeProgram::Neighbor => "_nj.tree",
        }
    }
}

/// Which statistics are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatisticMode {
    /// Only the summary line
    #[default]
    Aggregate,
    /// One line per surviving sequence, then the summary line
    PerSequence,
}

/// Where the multiple sequence alignment comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AlignmentInput {
    /// Input is raw FASTA, the aligner computes the alignment
    #[default]
    Compute,
    /// Input already is an alignment (FASTA or block format)
    Supplied,
}

// =#========================================================================#=
// PIPELINE CONFIG
// =#========================================================================#=
/// Options of a pipeline run.
///
/// Defaults: PhyML, aggregate statistics, computed alignment, output into
/// the current directory, mean aggregation of leaf distances.
///
/// # Example
/// ```
/// use evodist::pipeline::{AlignmentInput, PipelineConfig, TreeProgram};
///
/// let config = PipelineConfig::new()
///     .with_alignment_input(AlignmentInput::Supplied)
///     .with_tree_program(TreeProgram::Neighbor)
///     .with_output_dir("results");
/// assert_eq!(config.tree_program(), TreeProgram::Neighbor);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    tree_program: TreeProgram,
    statistic_mode: StatisticMode,
    alignment_input: AlignmentInput,
    output_dir: PathBuf,
    aggregation: Aggregation,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tree_program: TreeProgram::default(),
            statistic_mode: StatisticMode::default(),
            alignment_input: AlignmentInput::default(),
            output_dir: PathBuf::from("."),
            aggregation: Aggregation::default(),
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tree_program(mut self, tree_program: TreeProgram) -> Self {
        self.tree_program = tree_program;
        self
    }

    pub fn with_statistic_mode(mut self, statistic_mode: StatisticMode) -> Self {
        self.statistic_mode = statistic_mode;
        self
    }

    pub fn with_alignment_input(mut self, alignment_input: AlignmentInput) -> Self {
        self.alignment_input = alignment_input;
        self
    }

    /// Directory receiving the retained tree (and computed alignment).
    pub fn with_output_dir<P: Into<PathBuf>>(mut self, output_dir: P) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// How distances of one leaf to all others are combined.
    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = aggregation;
        self
    }

    pub fn tree_program(&self) -> TreeProgram {
        self.tree_program
    }

    pub fn statistic_mode(&self) -> StatisticMode {
        self.statistic_mode
    }

    pub fn alignment_input(&self) -> AlignmentInput {
        self.alignment_input
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn aggregation(&self) -> Aggregation {
        self.aggregation
    }
}

// =#========================================================================#=
// RUN PARAMETERS
// =#========================================================================#=
/// Everything fixed for one input file once it passed the size check.
#[derive(Debug, Clone, PartialEq)]
pub struct RunParameters {
    config: PipelineConfig,
    input: PathBuf,
    label: String,
    median_length: f64,
    nominal_taxa: usize,
}

impl RunParameters {
    pub fn new(config: PipelineConfig, input: &Path, label: String, summary: LengthSummary) -> Self {
        Self {
            config,
            input: input.to_path_buf(),
            label,
            median_length: summary.median_length,
            nominal_taxa: summary.num_taxa,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    /// Input file name without its last extension
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Median input sequence length, gaps excluded
    pub fn median_length(&self) -> f64 {
        self.median_length
    }

    /// Number of input sequences before duplicate deletion
    pub fn nominal_taxa(&self) -> usize {
        self.nominal_taxa
    }

    /// Final path of the retained tree
    pub fn tree_destination(&self) -> PathBuf {
        let suffix = self.config.tree_program.tree_suffix();
        self.config
            .output_dir
            .join(format!("{}{suffix}", self.label))
    }

    /// Final path of a computed alignment
    pub fn alignment_destination(&self) -> PathBuf {
        self.config.output_dir.join(format!("{}.aln", self.label))
    }
}

/// Derives the label of an input file: its file name without the last extension.
///
/// ```
/// use evodist::pipeline::label_for;
/// use std::path::Path;
///
/// assert_eq!(label_for(Path::new("data/P12345.fasta")), "P12345");
/// assert_eq!(label_for(Path::new("family.v2.aln")), "family.v2");
/// assert_eq!(label_for(Path::new("noext")), "noext");
/// ```
pub fn label_for(input: &Path) -> String {
    input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
