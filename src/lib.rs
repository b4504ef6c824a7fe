//! Evodist estimates how far the members of a protein family have diverged.
//!
//! For a set of homologous protein sequences it reports the average
//! evolutionary distance of each sequence from all others, normalised per
//! residue site. Distances are read off a phylogenetic tree built by an
//! external program rather than computed from percent identity.
//!
//! Core functionality provided:
//! - Sequences: read raw FASTA, aligned FASTA and Clustal-style block
//!   alignments, measure median length and taxon count.
//!   See [crate::sequence].
//! - PHYLIP: convert alignments to relaxed sequential PHYLIP with optional
//!   duplicate deletion and end-gap marking. See [crate::phylip].
//! - Newick: parse the trees written by PhyML or neighbor, including
//!   multifurcating ones, into an arena [Tree](crate::model::Tree).
//!   See [crate::newick].
//! - Distances: leaf-to-leaf path lengths and their (duplicate adjusted)
//!   averages. See [crate::distance].
//! - Pipeline: runs `muscle`, the converter, the tree builder and the
//!   statistics for one input file. See [crate::pipeline].
//!
//! One invocation handles one file. Intermediate files are named after the
//! process id, so many invocations can run side by side in one directory.
//!
//! # Usage patterns
//! 1. The quick functions below cover single steps with default settings.
//! 2. Configure a [PipelineConfig](crate::pipeline::PipelineConfig) and call
//!    [pipeline::run] for the full analysis.
//!
//! ## Example
//!
//! Convert an alignment, dropping duplicate sequences:
//! ```no_run
//! use evodist::phylip::{ConvertConfig, OutputTarget};
//!
//! let config = ConvertConfig::new().with_duplicate_deletion(true);
//! let alignment = evodist::phylip::convert("family.aln", &config, &OutputTarget::Stdout)?;
//! eprintln!("{} of {} sequences kept", alignment.len(), alignment.num_input);
//! # Ok::<(), evodist::Error>(())
//! ```
//!
//! Average distance of the leaves of a tree:
//! ```
//! use evodist::distance::{Aggregation, DistanceMatrix, LeafDistanceStats};
//! use std::collections::HashMap;
//!
//! let tree = evodist::parse_newick_str("(A:0.1,B:0.1,C:0.1,D:0.1);")?;
//! let matrix = DistanceMatrix::from_tree(&tree);
//! let stats = LeafDistanceStats::compute(&matrix, &HashMap::new(), Aggregation::Mean, 10.0).unwrap();
//! assert!((stats.mean - 0.2).abs() < 1e-12);
//! # Ok::<(), evodist::parser::ParsingError>(())
//! ```

pub mod distance;
pub mod error;
pub mod locate;
pub mod logging;
pub mod model;
pub mod newick;
pub mod parser;
pub mod phylip;
pub mod pipeline;
pub mod sequence;

pub use crate::error::{Error, Result};

use crate::model::Tree;
use crate::parser::parsing_error::ParsingError;
use crate::sequence::length::LengthSummary;
use std::path::Path;

// ============================================================================
// Quick Newick API
// ============================================================================
/// Parses a Newick string using default settings.
///
/// See [`newick::parse_str`] for full documentation of this convenience function.
pub fn parse_newick_str<S: AsRef<str>>(newick: S) -> std::result::Result<Tree, ParsingError> {
    newick::parse_str(newick)
}

/// Parses the first tree of a Newick file using default settings.
///
/// See [`newick::parse_file`] for full documentation of this convenience function.
pub fn parse_newick_file<P: AsRef<Path>>(path: P) -> std::result::Result<Tree, ParsingError> {
    newick::parse_file(path)
}

// ============================================================================
// Quick sequence API
// ============================================================================
/// Median length and taxon count of a raw (unaligned) FASTA file.
///
/// See [`sequence::length::summarize_raw`].
pub fn median_length_raw<P: AsRef<Path>>(path: P) -> Result<LengthSummary> {
    sequence::length::summarize_raw(path)
}

/// Median ungapped length and taxon count of an alignment file.
///
/// See [`sequence::length::summarize_aligned`].
pub fn median_length_aligned<P: AsRef<Path>>(path: P) -> Result<LengthSummary> {
    sequence::length::summarize_aligned(path)
}
