//! Median sequence length and taxon count of an input file.
//!
//! The pipeline measures its input once before doing anything expensive: the
//! taxon count decides whether the family is worth analysing at all, the
//! median length later normalises the adjusted mean per site.

use crate::error::{Error, Result};
use crate::sequence::{AlignmentFormat, SequenceSet, fasta, read_alignment};
use std::path::Path;

/// Median length and number of taxa of one input file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LengthSummary {
    /// Median residue count, gaps excluded
    pub median_length: f64,
    /// Number of sequences (raw) or distinct identifiers (aligned)
    pub num_taxa: usize,
}

impl LengthSummary {
    fn from_lengths(lengths: &[usize]) -> Self {
        Self {
            median_length: median(lengths).unwrap_or(0.0),
            num_taxa: lengths.len(),
        }
    }
}

/// Median of `values`, `None` if empty.
///
/// For an even count the two middle values are averaged, so
/// `median(&[1, 2, 3, 4]) == Some(2.5)`.
pub fn median(values: &[usize]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid] as f64)
    } else {
        Some((sorted[mid - 1] + sorted[mid]) as f64 / 2.0)
    }
}

/// Same as [median] for floating point values; NaNs sort last.
pub fn median_f64(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

/// Measures unaligned FASTA: one length per record that has residues.
///
/// An empty file yields zero taxa, which is not an error here.
///
/// # Errors
/// Returns [Error::Io] if the file cannot be read.
pub fn summarize_raw<P: AsRef<Path>>(path: P) -> Result<LengthSummary> {
    let path = path.as_ref();
    let records = fasta::read_records(crate::sequence::open(path)?)
        .map_err(|e| Error::io(path, e))?;

    let lengths: Vec<usize> = records
        .iter()
        .filter(|record| !record.residues.is_empty())
        .map(|record| record.residues.chars().count())
        .collect();

    let summary = LengthSummary::from_lengths(&lengths);
    log::debug!("{}: {summary:?} (raw FASTA)", path.display());
    Ok(summary)
}

/// Measures an alignment, FASTA or block format: ungapped length per
/// distinct identifier.
///
/// A repeated FASTA identifier replaces the earlier residues and counts once.
///
/// # Errors
/// Returns [Error::Io] if the file cannot be read.
pub fn summarize_aligned<P: AsRef<Path>>(path: P) -> Result<LengthSummary> {
    let path = path.as_ref();
    let (format, records) = read_alignment(path)?;

    let mut set = SequenceSet::new();
    for record in records.into_iter().filter(|r| !r.residues.is_empty()) {
        set.insert(&record.identifier, record.residues);
    }
    let lengths: Vec<usize> = set.iter().map(|s| s.ungapped_len()).collect();

    let summary = LengthSummary::from_lengths(&lengths);
    if format == AlignmentFormat::Blocks {
        log::debug!("{}: {summary:?} (block alignment)", path.display());
    } else {
        log::debug!("{}: {summary:?} (aligned FASTA)", path.display());
    }
    Ok(summary)
}
