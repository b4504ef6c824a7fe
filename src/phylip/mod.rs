//! Conversion of multiple sequence alignments to relaxed sequential PHYLIP.
//!
//! ```text
//! 3 8
//! seq1 MKV-LLAG
//! seq2 MKVQLL-G
//! seq3 MRVQLLAG
//! ```
//! The header holds the taxon and column counts, then one line per taxon with
//! identifier and residues separated by a single space. No padding, no
//! wrapping, so identifiers may be of any length.
//!
//! # Quick API
//! * [`convert`] - read, normalise, validate and write in one call
//! * [`convert_file`] - read, normalise and validate only
//! * [`write_phylip`] - serialise a [`ConvertedAlignment`]

mod writer;

pub use self::writer::{OutputTarget, write_phylip};

use crate::error::{Error, Result};
use crate::sequence::{GAP, read_alignment};
use std::collections::HashMap;
use std::path::Path;

/// Symbol replacing gaps at the ends of sequences when marking missing ends
pub const MISSING: char = '?';

// =#========================================================================#=
// CONFIGURATION
// =#========================================================================#=
/// Options of an alignment conversion. Both are off by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertConfig {
    mark_missing_ends: bool,
    delete_duplicates: bool,
}

impl ConvertConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace leading and trailing gap runs by [MISSING], for sequences of
    /// variable length.
    pub fn with_missing_ends(mut self, mark: bool) -> Self {
        self.mark_missing_ends = mark;
        self
    }

    /// Keep only the first of several sequences with identical residues.
    pub fn with_duplicate_deletion(mut self, delete: bool) -> Self {
        self.delete_duplicates = delete;
        self
    }

    pub fn marks_missing_ends(&self) -> bool {
        self.mark_missing_ends
    }

    pub fn deletes_duplicates(&self) -> bool {
        self.delete_duplicates
    }
}

// =#========================================================================#=
// CONVERTED ALIGNMENT
// =#========================================================================#=
/// One surviving sequence of a conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedTaxon {
    pub identifier: String,
    /// Uppercase residues, end gaps marked if configured
    pub residues: String,
    /// Identifiers of later sequences dropped as duplicates of this one
    pub aliases: Vec<String>,
}

impl AlignedTaxon {
    /// Number of input sequences this taxon represents, itself included.
    pub fn multiplicity(&self) -> usize {
        1 + self.aliases.len()
    }
}

/// Result of a conversion: the surviving taxa in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedAlignment {
    pub taxa: Vec<AlignedTaxon>,
    /// Column count shared by all sequences
    pub nchar: usize,
    /// Longest identifier among all input sequences, duplicates included
    pub max_id_len: usize,
    /// Number of input sequences before duplicate deletion
    pub num_input: usize,
}

impl ConvertedAlignment {
    /// Number of surviving taxa
    pub fn len(&self) -> usize {
        self.taxa.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taxa.is_empty()
    }

    /// Multiplicity of each surviving taxon, keyed by identifier.
    pub fn multiplicities(&self) -> HashMap<String, usize> {
        self.taxa
            .iter()
            .map(|taxon| (taxon.identifier.clone(), taxon.multiplicity()))
            .collect()
    }
}

// =#========================================================================#=
// CONVERSION
// =#========================================================================#=
/// Replaces the maximal gap run at each end of `residues` with [MISSING].
///
/// Internal gaps are kept; a sequence of only gaps becomes all missing.
///
/// # Example
/// ```
/// use evodist::phylip::mark_missing_ends;
///
/// assert_eq!(mark_missing_ends("--MK-V---"), "??MK-V???");
/// ```
pub fn mark_missing_ends(residues: &str) -> String {
    let core = residues.trim_matches(GAP);
    if core.is_empty() {
        return residues.chars().map(|_| MISSING).collect();
    }
    let leading = residues.len() - residues.trim_start_matches(GAP).len();
    let trailing = residues.len() - residues.trim_end_matches(GAP).len();

    let mut marked = String::with_capacity(residues.len());
    marked.extend(std::iter::repeat_n(MISSING, leading));
    marked.push_str(core);
    marked.extend(std::iter::repeat_n(MISSING, trailing));
    marked
}

/// Reads an alignment file and applies `config`, without writing anything.
///
/// All sequences are validated for equal length before any normalisation,
/// so a malformed alignment never produces partial output.
///
/// # Errors
/// * [Error::Io] if the file cannot be read
/// * [Error::LengthMismatch] if two sequences differ in length
pub fn convert_file<P: AsRef<Path>>(path: P, config: &ConvertConfig) -> Result<ConvertedAlignment> {
    let path = path.as_ref();
    let (_, records) = read_alignment(path)?;

    let nchar = records.first().map_or(0, |r| r.residues.len());
    if let Some(bad) = records.iter().find(|r| r.residues.len() != nchar) {
        return Err(Error::LengthMismatch {
            expected: nchar,
            found: bad.residues.len(),
            identifier: bad.identifier.clone(),
        });
    }

    let max_id_len = records
        .iter()
        .map(|r| r.identifier.len())
        .max()
        .unwrap_or(0);
    let num_input = records.len();

    let mut taxa: Vec<AlignedTaxon> = Vec::with_capacity(records.len());
    let mut first_seen: HashMap<String, usize> = HashMap::new();

    for record in records {
        let mut residues = if config.mark_missing_ends {
            mark_missing_ends(&record.residues)
        } else {
            record.residues
        };
        residues.make_ascii_uppercase();

        if config.delete_duplicates {
            if let Some(&survivor) = first_seen.get(&residues) {
                log::debug!(
                    "Dropping {} as duplicate of {}",
                    record.identifier,
                    taxa[survivor].identifier
                );
                taxa[survivor].aliases.push(record.identifier);
                continue;
            }
            first_seen.insert(residues.clone(), taxa.len());
        }

        taxa.push(AlignedTaxon {
            identifier: record.identifier,
            residues,
            aliases: Vec::new(),
        });
    }

    log::info!(
        "Converted {}: {} of {num_input} sequences kept, {nchar} columns",
        path.display(),
        taxa.len()
    );

    Ok(ConvertedAlignment {
        taxa,
        nchar,
        max_id_len,
        num_input,
    })
}

/// Converts an alignment file and writes it as relaxed PHYLIP to `target`.
///
/// # Errors
/// As [convert_file], plus [Error::Io] if the output cannot be written.
pub fn convert<P: AsRef<Path>>(
    path: P,
    config: &ConvertConfig,
    target: &OutputTarget,
) -> Result<ConvertedAlignment> {
    let alignment = convert_file(path, config)?;
    target.write(&alignment)?;
    Ok(alignment)
}
