//! Newick format parser for the trees written by tree-building programs.
//!
//! # Quick API
//! * [`parse_file`] - parses the first tree of a file, e.g. `*_phyml_tree.txt`
//! * [`parse_str`] - parses a single string
//!
//! # Full API
//! Configure a [`NewickParser`] and provide a [`ByteParser`]:
//! * [`NewickParser::parse_str`] - parse a single tree
//! * [`NewickParser::parse_all`] - parse all trees until EOF

mod parser;

pub use self::parser::NewickParser;

use crate::model::Tree;
use crate::parser::ParsingError;
use crate::parser::byte_parser::ByteParser;
use std::path::Path;

// ============================================================================
// QUICK PARSING API (pub)
// ============================================================================
/// Parses the first Newick tree in a file.
///
/// Tree-building programs write exactly one tree per output file; anything
/// after the first terminating `;` is ignored.
///
/// # Errors
/// Returns a [ParsingError] if the file cannot be read, holds no tree,
/// or the tree is malformed.
///
/// # Example
/// ```no_run
/// use evodist::newick::parse_file;
///
/// let tree = parse_file("family.phylip_phyml_tree.txt")?;
/// println!("Tree with {} leaves", tree.num_leaves());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Tree, ParsingError> {
    let mut byte_parser = ByteParser::from_file(path)?;
    NewickParser::new().parse_str(&mut byte_parser)
}

/// Parses a single Newick string.
///
/// # Errors
/// Returns a [ParsingError] if the string is not valid Newick format.
pub fn parse_str<S: AsRef<str>>(newick: S) -> Result<Tree, ParsingError> {
    let mut byte_parser = ByteParser::for_str(newick.as_ref());
    NewickParser::new().parse_str(&mut byte_parser)
}
