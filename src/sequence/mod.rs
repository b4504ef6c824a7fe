//! Protein sequences and the readers for raw and aligned input files.
//!
//! - [Sequence]: one identifier with its residues
//! - [SequenceSet]: ordered identifier -> residues mapping, first-seen order
//! - [fasta]: FASTA records, raw or aligned
//! - [blocks]: row/column block alignments (Clustal style)
//! - [length]: median length and taxon count of an input file

pub mod blocks;
pub mod fasta;
pub mod length;

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Gap character used in alignments
pub const GAP: char = '-';

// =#========================================================================#=
// SEQUENCE
// =#========================================================================#=
/// A named protein sequence, raw or aligned (then containing [GAP]s).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    pub identifier: String,
    pub residues: String,
}

impl Sequence {
    pub fn new<I: Into<String>, R: Into<String>>(identifier: I, residues: R) -> Self {
        Self {
            identifier: identifier.into(),
            residues: residues.into(),
        }
    }

    /// Number of residues, not counting gaps.
    pub fn ungapped_len(&self) -> usize {
        self.residues.chars().filter(|&c| c != GAP).count()
    }
}

// =#========================================================================#=
// SEQUENCE SET
// =#========================================================================#=
/// Sequences keyed by identifier, kept in order of first appearance.
///
/// Storage is a vector plus an identifier-to-position map, so lookups are
/// constant time while iteration order stays deterministic.
#[derive(Debug, Clone, Default)]
pub struct SequenceSet {
    sequences: Vec<Sequence>,
    positions: HashMap<String, usize>,
}

impl SequenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the residues of `identifier`, replacing earlier residues but
    /// keeping the position of its first appearance.
    pub fn insert(&mut self, identifier: &str, residues: String) {
        match self.positions.get(identifier) {
            Some(&pos) => self.sequences[pos].residues = residues,
            None => self.push_new(identifier, residues),
        }
    }

    /// Appends a fragment to the residues of `identifier`, adding it if new.
    pub fn append(&mut self, identifier: &str, fragment: &str) {
        match self.positions.get(identifier) {
            Some(&pos) => self.sequences[pos].residues.push_str(fragment),
            None => self.push_new(identifier, fragment.to_string()),
        }
    }

    fn push_new(&mut self, identifier: &str, residues: String) {
        self.positions
            .insert(identifier.to_string(), self.sequences.len());
        self.sequences.push(Sequence::new(identifier, residues));
    }

    /// Returns the residues stored for `identifier`.
    pub fn get(&self, identifier: &str) -> Option<&str> {
        self.positions
            .get(identifier)
            .map(|&pos| self.sequences[pos].residues.as_str())
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sequence> {
        self.sequences.iter()
    }

    pub fn into_vec(self) -> Vec<Sequence> {
        self.sequences
    }
}

// =#========================================================================#=
// ALIGNMENT FILES
// =#========================================================================#=
/// Layout of an alignment file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentFormat {
    /// FASTA records with gapped residues
    Fasta,
    /// Row/column blocks: `identifier fragment` lines, repeated per block
    Blocks,
}

impl AlignmentFormat {
    /// Detects the format from the first non-empty line: FASTA if it starts with `>`.
    pub fn detect<R: BufRead>(reader: R) -> std::io::Result<Self> {
        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if !line.is_empty() {
                return Ok(if line.starts_with('>') {
                    AlignmentFormat::Fasta
                } else {
                    AlignmentFormat::Blocks
                });
            }
        }
        Ok(AlignmentFormat::Fasta)
    }
}

pub(crate) fn open<P: AsRef<Path>>(path: P) -> Result<BufReader<File>> {
    File::open(&path)
        .map(BufReader::new)
        .map_err(|e| Error::io(&path, e))
}

/// Reads all records of an alignment file in file order, auto-detecting its format.
///
/// FASTA records are returned one per header, even when identifiers repeat.
/// Block alignments are returned one record per distinct identifier.
///
/// # Errors
/// Returns [Error::Io] if the file cannot be opened or read.
pub fn read_alignment<P: AsRef<Path>>(path: P) -> Result<(AlignmentFormat, Vec<Sequence>)> {
    let path = path.as_ref();
    let format = AlignmentFormat::detect(open(path)?).map_err(|e| Error::io(path, e))?;
    let records = match format {
        AlignmentFormat::Fasta => fasta::read_records(open(path)?),
        AlignmentFormat::Blocks => blocks::read_blocks(open(path)?).map(SequenceSet::into_vec),
    }
    .map_err(|e| Error::io(path, e))?;

    log::debug!(
        "Read {} aligned records ({format:?}) from {}",
        records.len(),
        path.display()
    );
    Ok((format, records))
}
