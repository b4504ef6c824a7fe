//! Error type of the distance pipeline.
//!
//! Every variant is fatal: the binary reports it on standard error and exits
//! with status 1. The two legitimate "nothing to analyse" results are not
//! errors, see [Outcome](crate::pipeline::Outcome).

use crate::parser::ParsingError;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal conditions of one pipeline run.
#[derive(Error, Debug)]
pub enum Error {
    /// A required external program was not found by the
    /// [CommandLocator](crate::locate::CommandLocator)
    #[error("Cannot find the application {0}")]
    ToolNotFound(String),

    /// The input file does not exist
    #[error("No file with the name {} is found", .0.display())]
    InputNotFound(PathBuf),

    /// A file could not be opened, read or written
    #[error("Cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Two sequences of an alignment have different lengths
    #[error(
        "Length of two sequences in the file differ, {expected} versus {found} (sequence {identifier})"
    )]
    LengthMismatch {
        expected: usize,
        found: usize,
        identifier: String,
    },

    /// An external program could not be started
    #[error("Failed to run {tool}: {source}")]
    ToolLaunch {
        tool: String,
        #[source]
        source: io::Error,
    },

    /// An external program returned without producing its expected output file
    #[error("Cannot open {} generated by {tool}", path.display())]
    MissingToolOutput { tool: String, path: PathBuf },

    /// The tree written by the tree builder could not be parsed
    #[error("Cannot parse tree file {}: {source}", path.display())]
    Tree {
        path: PathBuf,
        #[source]
        source: ParsingError,
    },

    /// The tree holds fewer than two leaves, so there are no distances
    #[error("Tree in {} has {found} leaves, at least 2 are needed", path.display())]
    TooFewLeaves { path: PathBuf, found: usize },

    /// Writing to standard output failed
    #[error("Cannot write output: {0}")]
    Output(#[from] io::Error),
}

impl Error {
    /// Wraps an I/O error together with the path it occurred on.
    pub fn io<P: AsRef<Path>>(path: P, source: io::Error) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
